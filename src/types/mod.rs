// Public modules
pub mod chat_completion;
pub mod chat_message;
pub mod model;
pub mod usage;

// Re-exports
pub use chat_completion::{ChatCompletion, ChatCompletionParams, Choice, ResponseMessage};
pub use chat_message::{ChatMessage, ChatRole};
pub use model::{KnownModel, Model, ModelPricing};
pub use usage::Usage;
