use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, RwLock};

use crate::index::SearchIndex;

/// One side of a question/answer exchange, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Human(String),
    Assistant(String),
}

/// Per-session conversation state: the active document's index and the
/// chat history accumulated against it.
#[derive(Default)]
pub struct DocumentSession {
    pub index: Option<SearchIndex>,
    pub history: Vec<Turn>,
    pub document_id: Option<String>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a freshly ingested document the active one. The previous index
    /// and all history against it are discarded together so no answer can be
    /// grounded in one document while the history refers to another.
    pub fn install_index(&mut self, index: SearchIndex, document_id: String) {
        self.index = Some(index);
        self.document_id = Some(document_id);
        self.history.clear();
    }

    pub fn record_exchange(&mut self, question: String, answer: String) {
        self.history.push(Turn::Human(question));
        self.history.push(Turn::Assistant(answer));
    }
}

/// Shared map from session context id to that session's state.
///
/// Each session's state sits behind its own `Mutex`, so the upload and chat
/// handlers serialize per session while unrelated sessions proceed
/// independently. The outer `RwLock` only guards map membership.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<Mutex<DocumentSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_create(&self, context_id: &str) -> Arc<Mutex<DocumentSession>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(context_id) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(context_id.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(DocumentSession::new()))),
        )
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
