use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};

use common::error::AppError;

use crate::session::Turn;

/// Standing instruction for document question answering.
const CHAT_INSTRUCTION: &str = "You are an AI assistant specialized in providing in-depth \
answers about a PDF document. When a user asks a question, analyze the provided context and \
any previously answered questions to deliver comprehensive, detailed responses. Aim to \
include relevant examples, explanations, and connections to enhance the user's \
understanding. If you cannot find the answer in the context, be transparent about it.";

const SUMMARY_INSTRUCTION: &str = "Please provide a brief summary of the following document.";

/// Assembles the message list for one chat turn: standing instruction,
/// prior exchanges in order, the new question, and the retrieved context as
/// a trailing system message.
pub fn build_chat_messages(
    history: &[Turn],
    question: &str,
    context: &str,
) -> Result<Vec<ChatCompletionRequestMessage>, AppError> {
    let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(history.len() + 3);

    messages.push(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(CHAT_INSTRUCTION)
            .build()?
            .into(),
    );

    for turn in history {
        messages.push(match turn {
            Turn::Human(text) => ChatCompletionRequestUserMessageArgs::default()
                .content(text.as_str())
                .build()?
                .into(),
            Turn::Assistant(text) => ChatCompletionRequestAssistantMessageArgs::default()
                .content(text.as_str())
                .build()?
                .into(),
        });
    }

    messages.push(
        ChatCompletionRequestUserMessageArgs::default()
            .content(question)
            .build()?
            .into(),
    );

    messages.push(
        ChatCompletionRequestSystemMessageArgs::default()
            .content(format!("Relevant context: {context}"))
            .build()?
            .into(),
    );

    Ok(messages)
}

/// Messages for the one-shot summary generated at ingestion time. The whole
/// cleaned document rides in a single user message.
pub fn build_summary_messages(
    document_text: &str,
) -> Result<Vec<ChatCompletionRequestMessage>, AppError> {
    Ok(vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(SUMMARY_INSTRUCTION)
            .build()?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(document_text)
            .build()?
            .into(),
    ])
}
