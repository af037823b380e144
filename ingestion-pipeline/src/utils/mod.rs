pub mod chunking;
pub mod pdf_text;
