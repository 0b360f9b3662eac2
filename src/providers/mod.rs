//! Inference endpoint implementations

pub mod huggingface;

// Re-export for convenience
pub use huggingface::InferenceClient;

/// Anything that turns a prompt into raw response bytes
#[async_trait::async_trait]
pub trait InferenceBackend: Send + Sync
{   async fn infer(&self, prompt: &str)
      -> crate::error::Result<Vec<u8>>;
}
