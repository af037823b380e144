use bytes::Bytes;
use mime_guess::from_path;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    storage::{db::SurrealDbClient, store::StorageManager},
    stored_object,
};

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("IO error occurred: {0}")]
    Io(#[from] std::io::Error),

    #[error("SurrealDB error: {0}")]
    SurrealError(#[from] surrealdb::Error),

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("File name missing in upload metadata")]
    MissingFileName,
}

stored_object!(StoredDocument, "document", {
    file_name: String,
    sha256: String,
    location: String,
    mime_type: String,
    byte_size: u64
});

impl StoredDocument {
    /// Persists the raw upload bytes in the object store and records the
    /// document in the database. Every upload gets a fresh record; nothing
    /// is ever pruned.
    pub async fn create(
        file_name: &str,
        bytes: Bytes,
        db: &SurrealDbClient,
        storage: &StorageManager,
    ) -> Result<Self, DocumentError> {
        let uuid = Uuid::new_v4();
        let sanitized_file_name = Self::sanitize_file_name(file_name);
        let location = format!("uploads/{uuid}/{sanitized_file_name}");
        let sha256 = Self::sha256_hex(&bytes);
        let byte_size = bytes.len() as u64;

        storage.put(&location, bytes).await?;

        let now = Utc::now();
        let document = Self {
            id: uuid.to_string(),
            created_at: now,
            updated_at: now,
            file_name: file_name.to_owned(),
            sha256,
            location,
            mime_type: Self::guess_mime_type(Path::new(&sanitized_file_name)),
            byte_size,
        };

        db.store_item(document.clone()).await?;

        Ok(document)
    }

    /// Fetches a document record and its raw bytes back from storage.
    pub async fn load_bytes(
        id: &str,
        db: &SurrealDbClient,
        storage: &StorageManager,
    ) -> Result<(Self, Bytes), DocumentError> {
        let document: Self = db
            .get_item(id)
            .await?
            .ok_or_else(|| DocumentError::NotFound(id.to_owned()))?;
        let bytes = storage.get(&document.location).await?;
        Ok((document, bytes))
    }

    /// Guesses the MIME type from the file extension.
    fn guess_mime_type(path: &Path) -> String {
        from_path(path)
            .first_or(mime::APPLICATION_OCTET_STREAM)
            .to_string()
    }

    fn sha256_hex(bytes: &Bytes) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    /// Sanitizes the file name to prevent directory traversal in object paths.
    /// Replaces any character outside `[A-Za-z0-9_]` (excluding the extension
    /// separator) with an underscore.
    fn sanitize_file_name(file_name: &str) -> String {
        let sanitize = |segment: &str| -> String {
            segment
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect()
        };

        if let Some(idx) = file_name.rfind('.') {
            let (name, ext) = file_name.split_at(idx);
            format!("{}{}", sanitize(name), ext)
        } else {
            sanitize(file_name)
        }
    }
}
