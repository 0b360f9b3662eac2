use log::{debug, trace, error, info};

use crate::config::PromptpixConfig;
use crate::error::{Error, Result};
use crate::request::InferenceRequest;

/// Hugging Face style text-to-image client
#[derive(Clone)]
pub struct InferenceClient
{   endpoint: String
  , api_key: String
  , verbose: bool
  , http_client: reqwest::Client
}

impl InferenceClient
{   /// Build a client from configuration; the timeout applies per request
    pub fn new(config: &PromptpixConfig) -> Result<Self>
    {   debug!("Creating InferenceClient for {}", config.endpoint);
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout()
        {   builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          Error::InvalidConfiguration(e.to_string())
        })?;

        Ok(InferenceClient
        {   endpoint: config.endpoint.clone()
          , api_key: config.api_key.clone()
          , verbose: config.verbose
          , http_client
        })
    }

    pub fn endpoint(&self) -> &str
    {   &self.endpoint
    }

    /// POST the prompt and return the raw response body
    pub async fn infer(&self, prompt: &str) -> Result<Vec<u8>>
    {   let body = InferenceRequest::from_prompt(prompt).to_json()?;
        if self.verbose
        {   info!("Sending request with payload: {}", body);
        } else
        {   debug!("Sending request ({} bytes)", body.len());
        }

        let response = self.http_client
          .post(&self.endpoint)
          .header("Authorization", format!("Bearer {}", self.api_key))
          .header("Content-Type", "application/json")
          .body(body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::from(e)
          })?;

        let status = response.status();
        info!("Received response code: {}", status.as_u16());

        if status != reqwest::StatusCode::OK
        {   let body = match response.text().await
            {   Ok(text) if !text.is_empty() => Some(text)
              , Ok(_) => None
              , Err(e) => {
                  debug!("Could not read error body: {}", e);
                  None
                }
            };
            if let Some(text) = &body
            {   error!("Error response: {}", text);
            }
            return Err(Error::HttpStatus
            {   code: status.as_u16()
              , body
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          Error::from(e)
        })?;
        trace!("Response body: {} bytes", bytes.len());

        if bytes.is_empty()
        {   error!("Empty response body");
            return Err(Error::EmptyResponse);
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl super::InferenceBackend for InferenceClient
{   async fn infer(&self, prompt: &str) -> Result<Vec<u8>>
    {   InferenceClient::infer(self, prompt).await
    }
}
