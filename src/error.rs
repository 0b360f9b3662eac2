use std::fmt;

/// Custom error type for promptpix operations
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// Prompt was empty or whitespace-only
    EmptyPrompt
  , /// Connection, DNS or transport failure
    Network(String)
  , /// Request exceeded the configured timeout
    Timeout
  , /// Endpoint answered with a non-success status
    HttpStatus
    {   code: u16
      , body: Option<String>
    }
  , /// Endpoint answered 2xx with an empty body
    EmptyResponse
  , /// 2xx body that sniffs as a JSON error object
    ApiErrorResponse
    {   raw: String
    }
  , /// Bytes present but not decodable as an image
    InvalidImage(String)
  , /// Another generation is already in flight
    GenerationInProgress
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Generic error
    Other(String)
}

impl Error
{   /// Connection-level failures, timeouts included
    pub fn is_network(&self) -> bool
    {   matches!(self, Error::Network(_) | Error::Timeout)
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::EmptyPrompt => {
              write!(f, "Please enter a prompt first.")
            }
          , Error::Network(msg) => {
              write!(f, "Network error: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::HttpStatus { code, body: Some(body) } => {
              write!(f, "HTTP error code: {}\nError: {}", code, body)
            }
          , Error::HttpStatus { code, body: None } => {
              write!(f, "HTTP error code: {}", code)
            }
          , Error::EmptyResponse => {
              write!(f, "Received empty response from API")
            }
          , Error::ApiErrorResponse { raw } => {
              write!(f, "API returned error: {}", raw)
            }
          , Error::InvalidImage(msg) => {
              write!(f,
                "Failed to create image from response data: {}",
                msg
              )
            }
          , Error::GenerationInProgress => {
              write!(f, "A generation is already in progress")
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Other(msg) => {
              write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else
        {   Error::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
