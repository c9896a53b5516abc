use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Usage;

/// Represents an OpenAI chat model identifier.
///
/// This can be a model with a known price list or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (fine-tunes, new releases)
    Custom(String),
}

/// Chat models with a known price list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// GPT-3.5 Turbo (rolling alias)
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,

    /// GPT-3.5 Turbo (0125 snapshot)
    #[serde(rename = "gpt-3.5-turbo-0125")]
    Gpt35Turbo0125,

    /// GPT-4
    #[serde(rename = "gpt-4")]
    Gpt4,

    /// GPT-4 Turbo
    #[serde(rename = "gpt-4-turbo")]
    Gpt4Turbo,

    /// GPT-4o
    #[serde(rename = "gpt-4o")]
    Gpt4o,

    /// GPT-4o mini
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl KnownModel {
    /// Every known model, in display order.
    pub const ALL: [KnownModel; 6] = [
        KnownModel::Gpt35Turbo,
        KnownModel::Gpt35Turbo0125,
        KnownModel::Gpt4,
        KnownModel::Gpt4Turbo,
        KnownModel::Gpt4o,
        KnownModel::Gpt4oMini,
    ];

    /// The identifier the API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownModel::Gpt35Turbo => "gpt-3.5-turbo",
            KnownModel::Gpt35Turbo0125 => "gpt-3.5-turbo-0125",
            KnownModel::Gpt4 => "gpt-4",
            KnownModel::Gpt4Turbo => "gpt-4-turbo",
            KnownModel::Gpt4o => "gpt-4o",
            KnownModel::Gpt4oMini => "gpt-4o-mini",
        }
    }

    /// USD per 1K tokens for this model.
    pub fn pricing(&self) -> ModelPricing {
        match self {
            KnownModel::Gpt35Turbo => ModelPricing::new(0.0015, 0.002),
            KnownModel::Gpt35Turbo0125 => ModelPricing::new(0.0005, 0.0015),
            KnownModel::Gpt4 => ModelPricing::new(0.03, 0.06),
            KnownModel::Gpt4Turbo => ModelPricing::new(0.01, 0.03),
            KnownModel::Gpt4o => ModelPricing::new(0.005, 0.015),
            KnownModel::Gpt4oMini => ModelPricing::new(0.00015, 0.0006),
        }
    }
}

impl Model {
    /// Price list for this model; custom models have none.
    pub fn pricing(&self) -> Option<ModelPricing> {
        match self {
            Model::Known(known) => Some(known.pricing()),
            Model::Custom(_) => None,
        }
    }

    /// Monetary cost in USD of a call with the given usage.  Unpriced models cost nothing.
    pub fn cost(&self, usage: &Usage) -> f64 {
        self.pricing().map(|p| p.cost(usage)).unwrap_or(0.0)
    }
}

/// Price of prompt and completion tokens, in USD per 1K tokens.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModelPricing {
    /// USD per 1K prompt tokens.
    pub prompt_per_1k: f64,
    /// USD per 1K completion tokens.
    pub completion_per_1k: f64,
}

impl ModelPricing {
    /// Create a new price list.
    pub const fn new(prompt_per_1k: f64, completion_per_1k: f64) -> Self {
        Self {
            prompt_per_1k,
            completion_per_1k,
        }
    }

    /// Cost in USD of the given usage.
    pub fn cost(&self, usage: &Usage) -> f64 {
        usage.prompt_tokens as f64 / 1000.0 * self.prompt_per_1k
            + usage.completion_tokens as f64 / 1000.0 * self.completion_per_1k
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        match KnownModel::ALL.iter().find(|known| known.as_str() == model) {
            Some(known) => Model::Known(*known),
            None => Model::Custom(model),
        }
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::from(model.to_string())
    }
}
