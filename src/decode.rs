//! Response body to bitmap

use log::{debug, error};

use crate::error::{Error, Result};

/// A decoded RGBA bitmap ready for display
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayImage
{   pixels: image::RgbaImage
}

impl DisplayImage
{   pub fn width(&self) -> u32
    {   self.pixels.width()
    }

    pub fn height(&self) -> u32
    {   self.pixels.height()
    }

    pub fn pixels(&self) -> &image::RgbaImage
    {   &self.pixels
    }

    pub fn into_pixels(self) -> image::RgbaImage
    {   self.pixels
    }
}

impl From<image::RgbaImage> for DisplayImage
{   fn from(pixels: image::RgbaImage) -> Self
    {   DisplayImage { pixels }
    }
}

/// Sniff-by-first-byte: a body whose text starts with `{` is taken to be an
/// error object. Binary payloads beginning with 0x7B are misclassified.
pub fn sniff_error_body(bytes: &[u8]) -> Option<String>
{   if bytes.first() != Some(&b'{')
    {   return None;
    }
    Some(String::from_utf8_lossy(bytes).into_owned())
}

/// Decode a response body into a bitmap
pub fn decode(bytes: &[u8]) -> Result<DisplayImage>
{   if bytes.is_empty()
    {   return Err(Error::EmptyResponse);
    }

    if let Some(raw) = sniff_error_body(bytes)
    {   error!("Received error JSON response: {}", raw);
        return Err(Error::ApiErrorResponse { raw });
    }

    let decoded = image::load_from_memory(bytes).map_err(|e| {
      error!("Image decode failed: {}", e);
      Error::InvalidImage(e.to_string())
    })?;

    if decoded.width() == 0 || decoded.height() == 0
    {   return Err(Error::InvalidImage(
          "decoded image has no pixels".to_string()
        ));
    }

    debug!("Decoded {}x{} image", decoded.width(), decoded.height());
    Ok(DisplayImage::from(decoded.to_rgba8()))
}
