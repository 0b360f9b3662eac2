//! Configuration for the inference endpoint and progress indicator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use log::{debug, warn};

use crate::error::{Error, Result};

pub const DEFAULT_ENDPOINT: &str
  = "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";

pub const ENV_API_TOKEN: &str = "PROMPTPIX_API_TOKEN";
pub const ENV_API_TOKEN_FALLBACK: &str = "HUGGING_FACE_API";
pub const ENV_ENDPOINT: &str = "PROMPTPIX_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "PROMPTPIX_TIMEOUT_SECS";

/// Cosmetic progress ramp configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig
{   /// Number of increments from 0% to 100%
    pub steps: u32
  , /// Delay between increments in milliseconds
    pub interval_ms: u64
}

impl Default for ProgressConfig
{   fn default() -> Self
    {   ProgressConfig
        {   steps: 10
          , interval_ms: 500
        }
    }
}

impl ProgressConfig
{   pub fn interval(&self) -> Duration
    {   Duration::from_millis(self.interval_ms)
    }
}

/// promptpix configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct PromptpixConfig
{   /// Inference endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String
  , /// Bearer token sent with every request
    pub api_key: String
  , /// Request timeout in seconds, None leaves the transport default
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>
  , /// Enable detailed logging of request payloads
    #[serde(default)]
    pub verbose: bool
  , #[serde(default)]
    pub progress: ProgressConfig
}

fn default_endpoint() -> String
{   DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> Option<u64>
{   Some(120)
}

impl fmt::Debug for PromptpixConfig
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("PromptpixConfig")
          .field("endpoint", &self.endpoint)
          .field("api_key", &"<redacted>")
          .field("timeout_secs", &self.timeout_secs)
          .field("verbose", &self.verbose)
          .field("progress", &self.progress)
          .finish()
    }
}

impl PromptpixConfig
{   pub fn new(api_key: impl Into<String>) -> Self
    {   PromptpixConfig
        {   endpoint: default_endpoint()
          , api_key: api_key.into()
          , timeout_secs: default_timeout_secs()
          , verbose: false
          , progress: ProgressConfig::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self
    {   self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: Option<u64>) -> Self
    {   self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_progress(mut self, progress: ProgressConfig) -> Self
    {   self.progress = progress;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self
    {   self.verbose = verbose;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self>
    {   let api_key = std::env::var(ENV_API_TOKEN)
          .or_else(|_| std::env::var(ENV_API_TOKEN_FALLBACK))
          .map_err(|_| {
            Error::InvalidConfiguration(format!(
              "{} (or {}) is not set",
              ENV_API_TOKEN, ENV_API_TOKEN_FALLBACK
            ))
          })?;

        let mut config = PromptpixConfig::new(api_key);

        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT)
        {   debug!("Endpoint overridden from environment");
            config.endpoint = endpoint;
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS)
        {   let secs = raw.trim().parse::<u64>().map_err(|e| {
              Error::InvalidConfiguration(format!(
                "{}={:?}: {}", ENV_TIMEOUT_SECS, raw, e
              ))
            })?;
            config.timeout_secs = Some(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| {
          Error::InvalidConfiguration(format!(
            "{}: {}", path.display(), e
          ))
        })?;
        let config: PromptpixConfig = serde_json::from_str(&raw)
          .map_err(|e| {
            Error::InvalidConfiguration(format!(
              "{}: {}", path.display(), e
            ))
          })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()>
    {   if self.api_key.trim().is_empty()
        {   warn!("API key is empty");
            return Err(Error::InvalidConfiguration(
              "api_key must not be empty".to_string()
            ));
        }
        if self.endpoint.trim().is_empty()
        {   return Err(Error::InvalidConfiguration(
              "endpoint must not be empty".to_string()
            ));
        }
        if self.timeout_secs == Some(0)
        {   return Err(Error::InvalidConfiguration(
              "timeout_secs must be positive".to_string()
            ));
        }
        if self.progress.steps == 0
        {   return Err(Error::InvalidConfiguration(
              "progress.steps must be positive".to_string()
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration>
    {   self.timeout_secs.map(Duration::from_secs)
    }
}
