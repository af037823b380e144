use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use common::utils::{
    config::AppConfig,
    llm::{ChatCompletionModel, LanguageModel},
};

/// The chat backends a session may select between: one hosted default plus
/// the configured locally served models.
pub struct ModelCatalog {
    default_model: Arc<dyn LanguageModel>,
    local_models: HashMap<String, Arc<dyn LanguageModel>>,
}

impl ModelCatalog {
    pub fn new(
        default_model: Arc<dyn LanguageModel>,
        local_models: HashMap<String, Arc<dyn LanguageModel>>,
    ) -> Self {
        Self {
            default_model,
            local_models,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let local_models = config
            .local_models
            .iter()
            .map(|name| {
                let model: Arc<dyn LanguageModel> =
                    Arc::new(ChatCompletionModel::local(config, name));
                (name.clone(), model)
            })
            .collect();

        Self::new(Arc::new(ChatCompletionModel::hosted(config)), local_models)
    }

    pub fn default_model(&self) -> Arc<dyn LanguageModel> {
        Arc::clone(&self.default_model)
    }

    /// Maps a requested model name to a backend. Unknown or absent names
    /// resolve to the default; selection never fails.
    pub fn resolve(&self, requested: Option<&str>) -> Arc<dyn LanguageModel> {
        match requested {
            Some(name) if name == self.default_model.model_id() => self.default_model(),
            Some(name) => match self.local_models.get(name) {
                Some(model) => Arc::clone(model),
                None => {
                    debug!(requested = name, "Unknown model requested, using default");
                    self.default_model()
                }
            },
            None => self.default_model(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ModelCatalog {
        let config = AppConfig {
            hosted_model: "gpt-4o-mini".into(),
            local_models: vec!["mistral".into(), "llama3.2".into()],
            ..AppConfig::default()
        };
        ModelCatalog::from_config(&config)
    }

    #[test]
    fn test_resolve_known_local_model() {
        assert_eq!(catalog().resolve(Some("mistral")).model_id(), "mistral");
        assert_eq!(catalog().resolve(Some("llama3.2")).model_id(), "llama3.2");
    }

    #[test]
    fn test_resolve_hosted_name() {
        assert_eq!(catalog().resolve(Some("gpt-4o-mini")).model_id(), "gpt-4o-mini");
    }

    #[test]
    fn test_unknown_name_falls_back_to_default() {
        assert_eq!(catalog().resolve(Some("gpt-7")).model_id(), "gpt-4o-mini");
    }

    #[test]
    fn test_absent_name_resolves_to_default() {
        assert_eq!(catalog().resolve(None).model_id(), "gpt-4o-mini");
    }
}
