//! Inference request body

use serde::{Deserialize, Serialize};

pub const NUM_INFERENCE_STEPS: u32 = 30;

/// Fixed inference parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceParameters
{   pub negative_prompt: String
  , pub num_inference_steps: u32
}

impl Default for InferenceParameters
{   fn default() -> Self
    {   InferenceParameters
        {   negative_prompt: String::new()
          , num_inference_steps: NUM_INFERENCE_STEPS
        }
    }
}

/// Body POSTed to the inference endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest
{   /// The prompt text
    pub inputs: String
  , pub parameters: InferenceParameters
}

impl InferenceRequest
{   pub fn from_prompt(prompt: impl Into<String>) -> Self
    {   InferenceRequest
        {   inputs: prompt.into()
          , parameters: InferenceParameters::default()
        }
    }

    /// Serialized JSON body; quotes in the prompt come out as `\"`
    pub fn to_json(&self) -> Result<String, crate::error::Error>
    {   serde_json::to_string(self).map_err(|e| {
          crate::error::Error::Other(format!(
            "Failed to serialize request: {}", e
          ))
        })
    }
}
