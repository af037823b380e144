use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Local,
    Memory,
}

fn default_storage_kind() -> StorageKind {
    StorageKind::Local
}

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    /// Hosted LLM credentials. Absence is not validated up front; a missing
    /// key surfaces on the first hosted-model call.
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    /// OpenAI-compatible endpoint for locally served models (e.g. Ollama).
    #[serde(default = "default_local_llm_base_url")]
    pub local_llm_base_url: String,
    /// Model used when the session has no explicit choice, and for
    /// document summaries.
    #[serde(default = "default_hosted_model")]
    pub hosted_model: String,
    /// Names resolvable to the locally served backend.
    #[serde(default = "default_local_models")]
    pub local_models: Vec<String>,
    pub surrealdb_address: String,
    pub surrealdb_username: String,
    pub surrealdb_password: String,
    pub surrealdb_namespace: String,
    pub surrealdb_database: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_storage_kind")]
    pub storage: StorageKind,
    /// "openai", "fastembed", or "hashed".
    #[serde(default = "default_embedding_backend")]
    pub embedding_backend: String,
    #[serde(default)]
    pub embedding_model: Option<String>,
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: u32,
    /// Chunking is character based, not token based.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    #[serde(default = "default_retrieval_top_k")]
    pub retrieval_top_k: usize,
    #[serde(default = "default_upload_max_body_bytes")]
    pub upload_max_body_bytes: usize,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_local_llm_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_hosted_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_local_models() -> Vec<String> {
    vec!["mistral".to_string(), "llama3.2".to_string()]
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_http_port() -> u16 {
    3000
}

fn default_embedding_backend() -> String {
    "fastembed".to_string()
}

fn default_embedding_dimensions() -> u32 {
    1536
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    20
}

fn default_retrieval_top_k() -> usize {
    4
}

fn default_upload_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(Environment::default())
        .build()?;

    config.try_deserialize()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_base_url: default_openai_base_url(),
            local_llm_base_url: default_local_llm_base_url(),
            hosted_model: default_hosted_model(),
            local_models: default_local_models(),
            surrealdb_address: "mem://".to_string(),
            surrealdb_username: "root".to_string(),
            surrealdb_password: "root".to_string(),
            surrealdb_namespace: "paperchat".to_string(),
            surrealdb_database: "paperchat".to_string(),
            data_dir: default_data_dir(),
            http_port: default_http_port(),
            storage: default_storage_kind(),
            embedding_backend: default_embedding_backend(),
            embedding_model: None,
            embedding_dimensions: default_embedding_dimensions(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            retrieval_top_k: default_retrieval_top_k(),
            upload_max_body_bytes: default_upload_max_body_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let value = serde_json::json!({
            "surrealdb_address": "ws://localhost:8000",
            "surrealdb_username": "root",
            "surrealdb_password": "root",
            "surrealdb_namespace": "ns",
            "surrealdb_database": "db",
        });

        let config: AppConfig = serde_json::from_value(value).expect("deserialize config");
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 20);
        assert_eq!(config.retrieval_top_k, 4);
        assert_eq!(config.hosted_model, "gpt-4o-mini");
        assert_eq!(config.storage, StorageKind::Local);
        assert!(config.local_models.contains(&"mistral".to_string()));
    }

    #[test]
    fn test_storage_kind_lowercase() {
        let value = serde_json::json!({
            "surrealdb_address": "mem://",
            "surrealdb_username": "root",
            "surrealdb_password": "root",
            "surrealdb_namespace": "ns",
            "surrealdb_database": "db",
            "storage": "memory",
        });

        let config: AppConfig = serde_json::from_value(value).expect("deserialize config");
        assert_eq!(config.storage, StorageKind::Memory);
    }
}
