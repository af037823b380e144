use async_trait::async_trait;
use bytes::Bytes;
use lopdf::Document;
use tracing::debug;

use common::error::AppError;

const PDF_MAGIC: &[u8] = b"%PDF";

/// Text recovered from a single page, 1-indexed as in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

/// Checks the upload's claimed name and leading bytes before any parsing
/// work. Both have to agree that this is a PDF.
pub fn is_pdf_upload(file_name: &str, bytes: &[u8]) -> bool {
    let has_pdf_extension = file_name
        .rsplit('.')
        .next()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    has_pdf_extension && bytes.starts_with(PDF_MAGIC)
}

/// Recovers per-page text from an uploaded document. A seam so pipeline
/// tests can substitute fixed text for real PDF parsing.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_pages(&self, bytes: Bytes) -> Result<Vec<PageText>, AppError>;
}

/// Extractor over the document's embedded text layer. Pages are read
/// individually so chunks can carry their source page; when per-page
/// extraction yields nothing the whole document is retried as a single
/// page, which copes with PDFs whose text layer lopdf cannot walk.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_pages(&self, bytes: Bytes) -> Result<Vec<PageText>, AppError> {
        let pages = tokio::task::spawn_blocking(move || extract_with_text_layer(&bytes)).await??;

        if pages.is_empty() {
            return Err(AppError::Processing(
                "PDF contained no extractable text".into(),
            ));
        }

        debug!(pages = pages.len(), "Extracted PDF text layer");

        Ok(pages)
    }
}

fn extract_with_text_layer(bytes: &[u8]) -> Result<Vec<PageText>, AppError> {
    let per_page = match Document::load_mem(bytes) {
        Ok(document) => {
            let mut page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
            page_numbers.sort_unstable();

            page_numbers
                .into_iter()
                .filter_map(|number| {
                    document
                        .extract_text(&[number])
                        .ok()
                        .map(|text| PageText { number, text })
                })
                .filter(|page| !page.text.trim().is_empty())
                .collect()
        }
        Err(err) => {
            debug!(error = %err, "lopdf could not parse document, trying whole-document extraction");
            Vec::new()
        }
    };

    if !per_page.is_empty() {
        return Ok(per_page);
    }

    let whole = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|err| AppError::Processing(format!("Failed to extract text from PDF: {err}")))?;

    if whole.trim().is_empty() {
        return Ok(Vec::new());
    }

    Ok(vec![PageText {
        number: 1,
        text: whole,
    }])
}
