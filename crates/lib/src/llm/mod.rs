//! Text-generation client (Hugging Face Inference API).
//!
//! One outbound call per prompt, response shape normalized to a display string.

mod huggingface;

pub use huggingface::{InferenceClient, InferenceError, InferencePayload, INFERENCE_ERROR_REPLY};
