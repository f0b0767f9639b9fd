//! Generative-text adapters used to write and polish product descriptions.
//!
//! [`AiService`] is the capability consumed by the product services. It is
//! implemented once, by [`PromptedAiService`], on top of any [`TextGenerator`]
//! backend; [`create_ai_service`] picks the backend from configuration.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::config::AiConfig;

pub mod errors;
pub mod gemini;
pub mod prompts;

pub use errors::{AiError, AiResult};

/// Default number of suggestions requested for a category.
pub const DEFAULT_SUGGESTION_COUNT: i32 = 5;

/// Text-generation backends that can be selected through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Google Gemini through the public Generative Language API.
    #[default]
    Gemini,
}

impl FromStr for AiProvider {
    type Err = AiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            other => Err(AiError::Configuration(format!(
                "unsupported AI provider `{other}`"
            ))),
        }
    }
}

/// Status information about the configured AI backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiServiceInfo {
    pub service: String,
    pub model: String,
    pub provider: AiProvider,
}

/// Product copywriting operations backed by a generative model.
pub trait AiService: Send + Sync {
    fn generate_product_description(
        &self,
        name: &str,
        category: &str,
        brand: &str,
        basic_info: Option<&str>,
    ) -> AiResult<String>;

    fn generate_product_suggestions(&self, category: &str, count: i32) -> AiResult<String>;

    fn improve_product_description(&self, current_description: &str) -> AiResult<String>;

    fn service_info(&self) -> AiServiceInfo;
}

/// A single synchronous prompt-in, text-out backend call.
pub trait TextGenerator: Send + Sync {
    fn service_name(&self) -> &str;

    fn model(&self) -> &str;

    /// Send `prompt` to the backend. `Ok(None)` means the backend answered
    /// without any text.
    fn generate(&self, prompt: &str) -> AiResult<Option<String>>;
}

/// [`AiService`] that validates input, renders a prompt template and makes
/// one unretried call to its generator.
pub struct PromptedAiService<G> {
    generator: G,
    provider: AiProvider,
}

impl<G: TextGenerator> PromptedAiService<G> {
    pub fn new(generator: G, provider: AiProvider) -> Self {
        Self {
            generator,
            provider,
        }
    }

    fn complete(&self, task: &str, prompt: &str) -> AiResult<String> {
        let service = self.generator.service_name();

        let outcome = self.generator.generate(prompt).and_then(|text| {
            text.map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty())
                .ok_or_else(|| AiError::generation(service, "empty response from AI service"))
        });

        match outcome {
            Ok(text) => {
                log::info!("{service} completed: {task}");
                Ok(text)
            }
            Err(err) => {
                let err = err.during(task);
                log::error!("{err}");
                Err(err)
            }
        }
    }
}

impl<G: TextGenerator> AiService for PromptedAiService<G> {
    fn generate_product_description(
        &self,
        name: &str,
        category: &str,
        brand: &str,
        basic_info: Option<&str>,
    ) -> AiResult<String> {
        require_text("name", name)?;
        require_text("category", category)?;
        require_text("brand", brand)?;

        log::info!(
            "Generating product description with {} for: {name}",
            self.generator.service_name()
        );
        let prompt = prompts::product_description(name, category, brand, basic_info);
        self.complete("generate description", &prompt)
    }

    fn generate_product_suggestions(&self, category: &str, count: i32) -> AiResult<String> {
        require_text("category", category)?;
        if count <= 0 {
            return Err(AiError::Validation(
                "parameter 'count' must be a positive integer".to_string(),
            ));
        }

        log::info!(
            "Generating {count} product suggestions with {} for category: {category}",
            self.generator.service_name()
        );
        let prompt = prompts::product_suggestions(category, count);
        self.complete("generate suggestions", &prompt)
    }

    fn improve_product_description(&self, current_description: &str) -> AiResult<String> {
        require_text("current_description", current_description)?;

        log::info!(
            "Improving product description with {}",
            self.generator.service_name()
        );
        let prompt = prompts::improve_description(current_description);
        self.complete("improve description", &prompt)
    }

    fn service_info(&self) -> AiServiceInfo {
        AiServiceInfo {
            service: self.generator.service_name().to_string(),
            model: self.generator.model().to_string(),
            provider: self.provider,
        }
    }
}

/// Build the AI service selected by `config`.
pub fn create_ai_service(config: &AiConfig) -> AiResult<Arc<dyn AiService>> {
    match config.provider {
        AiProvider::Gemini => {
            let client = gemini::GeminiClient::new(config)?;
            log::info!(
                "{} initialized with model {}",
                client.service_name(),
                client.model()
            );
            Ok(Arc::new(PromptedAiService::new(client, AiProvider::Gemini)))
        }
    }
}

fn require_text(parameter: &str, value: &str) -> AiResult<()> {
    if value.trim().is_empty() {
        return Err(AiError::Validation(format!(
            "parameter '{parameter}' cannot be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Generator that records prompts and replays a canned outcome.
    struct ScriptedGenerator {
        reply: fn() -> AiResult<Option<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(reply: fn() -> AiResult<Option<String>>) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().map(|prompts| prompts.len()).unwrap_or(0)
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn service_name(&self) -> &str {
            "Scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        fn generate(&self, prompt: &str) -> AiResult<Option<String>> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            (self.reply)()
        }
    }

    fn service(reply: fn() -> AiResult<Option<String>>) -> PromptedAiService<ScriptedGenerator> {
        PromptedAiService::new(ScriptedGenerator::new(reply), AiProvider::Gemini)
    }

    #[test]
    fn description_is_trimmed() {
        let ai = service(|| Ok(Some("  A sleek phone.\n".to_string())));

        let text = ai
            .generate_product_description("iPhone", "Phones", "Apple", Some("A17 chip"))
            .expect("description");

        assert_eq!(text, "A sleek phone.");
        let prompts = ai.generator.prompts.lock().expect("lock");
        assert!(prompts[0].contains("- Additional information: A17 chip"));
    }

    #[test]
    fn blank_inputs_fail_before_calling_backend() {
        let ai = service(|| Ok(Some("unused".to_string())));

        assert!(matches!(
            ai.generate_product_description(" ", "Phones", "Apple", None),
            Err(AiError::Validation(_))
        ));
        assert!(matches!(
            ai.generate_product_suggestions("", 3),
            Err(AiError::Validation(_))
        ));
        assert!(matches!(
            ai.improve_product_description("\n\t"),
            Err(AiError::Validation(_))
        ));
        assert_eq!(ai.generator.calls(), 0);
    }

    #[test]
    fn suggestion_count_must_be_positive() {
        let ai = service(|| Ok(Some("unused".to_string())));

        let err = ai
            .generate_product_suggestions("Laptops", 0)
            .expect_err("zero count");

        assert!(matches!(err, AiError::Validation(message) if message.contains("count")));
        assert_eq!(ai.generator.calls(), 0);
    }

    #[test]
    fn missing_or_empty_text_is_a_generation_error() {
        let ai = service(|| Ok(None));
        let err = ai.improve_product_description("Old text").expect_err("no text");
        assert!(matches!(
            err,
            AiError::Generation { ref service, ref message, .. }
                if service == "Scripted" && message.starts_with("failed to improve description")
        ));

        let ai = service(|| Ok(Some("   ".to_string())));
        let err = ai
            .generate_product_suggestions("Laptops", 2)
            .expect_err("blank text");
        assert!(matches!(err, AiError::Generation { .. }));
    }

    #[test]
    fn backend_failures_carry_the_task() {
        let ai = service(|| Err(AiError::generation("Scripted", "quota exceeded")));

        let err = ai
            .generate_product_description("iPhone", "Phones", "Apple", None)
            .expect_err("backend failure");

        assert_eq!(
            err.to_string(),
            "Scripted: failed to generate description: quota exceeded"
        );
    }

    #[test]
    fn service_info_reports_backend() {
        let ai = service(|| Ok(None));

        assert_eq!(
            ai.service_info(),
            AiServiceInfo {
                service: "Scripted".to_string(),
                model: "scripted-1".to_string(),
                provider: AiProvider::Gemini,
            }
        );
    }

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("Gemini".parse::<AiProvider>().ok(), Some(AiProvider::Gemini));
        assert!(matches!(
            "vertex".parse::<AiProvider>(),
            Err(AiError::Configuration(_))
        ));
    }

    #[test]
    fn factory_rejects_missing_api_key() {
        let config = AiConfig {
            provider: AiProvider::Gemini,
            api_key: String::new(),
            model: gemini::DEFAULT_MODEL.to_string(),
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
        };

        assert!(matches!(
            create_ai_service(&config),
            Err(AiError::Configuration(_))
        ));
    }
}
