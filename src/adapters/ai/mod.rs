//! AI Provider Adapters.
//!
//! - `OpenAIProvider` - OpenAI chat completions
//! - `MockAIProvider` - scripted provider for tests
//! - `LlmRecordExtractor` - record extraction over any provider
//! - `LlmTaskInterpreter` - task cards over any provider

mod json_response;
mod llm_record_extractor;
mod llm_task_interpreter;
mod mock_provider;
mod openai_provider;

pub use json_response::{JsonResponseError, JsonResponseParser};
pub use llm_record_extractor::{LlmExtractorConfig, LlmRecordExtractor};
pub use llm_task_interpreter::LlmTaskInterpreter;
pub use mock_provider::{MockAIProvider, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub(crate) use openai_provider::{backoff_delay, map_transport_error};
