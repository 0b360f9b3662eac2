#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Notify};

use promptpix::{DisplayImage, InferenceBackend, PresentationSurface};

// ===== Stub endpoint =====

/// Request as seen by the stub endpoint
#[derive(Debug, Clone)]
pub struct CapturedRequest
{   pub request_line: String
  , pub headers: Vec<(String, String)>
  , pub body: String
}

impl CapturedRequest
{   pub fn header(&self, name: &str) -> Option<&str>
    {   self.headers
          .iter()
          .find(|(k, _)| k.eq_ignore_ascii_case(name))
          .map(|(_, v)| v.as_str())
    }
}

/// Serve exactly one canned HTTP response on a random local port
pub async fn serve_once(
  status: u16
, response_body: Vec<u8>
) -> (String, oneshot::Receiver<CapturedRequest>)
{   let listener = TcpListener::bind("127.0.0.1:0").await
      .expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    let (captured_tx, captured_rx) = oneshot::channel();

    tokio::spawn(async move {
      let (mut socket, _) = match listener.accept().await
      {   Ok(conn) => conn
        , Err(_) => return
      };

      let mut buf = Vec::new();
      let mut chunk = [0u8; 4096];
      let header_end = loop
      {   let n = socket.read(&mut chunk).await.unwrap_or(0);
          if n == 0
          {   return;
          }
          buf.extend_from_slice(&chunk[..n]);
          if let Some(pos) = find(&buf, b"\r\n\r\n")
          {   break pos + 4;
          }
      };

      let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
      let mut lines = head.split("\r\n");
      let request_line = lines.next().unwrap_or_default().to_string();
      let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
      let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

      while buf.len() < header_end + content_length
      {   let n = socket.read(&mut chunk).await.unwrap_or(0);
          if n == 0
          {   break;
          }
          buf.extend_from_slice(&chunk[..n]);
      }
      let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

      let _ = captured_tx.send(CapturedRequest
      {   request_line
        , headers
        , body
      });

      let head = format!(
        "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        response_body.len()
      );
      let _ = socket.write_all(head.as_bytes()).await;
      let _ = socket.write_all(&response_body).await;
      let _ = socket.shutdown().await;
    });

    (format!("http://{}/models/test", addr), captured_rx)
}

/// Accept one connection and never answer it
pub async fn serve_silence() -> String
{   let listener = TcpListener::bind("127.0.0.1:0").await
      .expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
      if let Ok((socket, _)) = listener.accept().await
      {   tokio::time::sleep(std::time::Duration::from_secs(30)).await;
          drop(socket);
      }
    });
    format!("http://{}/models/test", addr)
}

/// A local URL nothing listens on
pub async fn closed_endpoint() -> String
{   let listener = TcpListener::bind("127.0.0.1:0").await
      .expect("bind stub server");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/models/test", addr)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize>
{   haystack.windows(needle.len()).position(|w| w == needle)
}

// ===== Images =====

pub fn sample_image() -> image::RgbaImage
{   image::RgbaImage::from_fn(3, 2, |x, y| {
      image::Rgba([(x * 80) as u8, (y * 120) as u8, 200, 255])
    })
}

pub fn png_bytes(img: &image::RgbaImage) -> Vec<u8>
{   let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img.clone())
      .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
      .expect("encode png");
    out
}

// ===== Fake backend =====

/// Scripted backend that counts calls and can be held open
#[derive(Clone)]
pub struct FakeBackend
{   pub reply: Result<Vec<u8>, promptpix::Error>
  , pub calls: Arc<AtomicUsize>
  , pub gate: Option<Arc<Notify>>
  , pub panic: bool
}

impl FakeBackend
{   pub fn replying(reply: Result<Vec<u8>, promptpix::Error>) -> Self
    {   FakeBackend
        {   reply
          , calls: Arc::new(AtomicUsize::new(0))
          , gate: None
          , panic: false
        }
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self
    {   self.gate = Some(gate);
        self
    }

    pub fn panicking(mut self) -> Self
    {   self.panic = true;
        self
    }

    pub fn call_count(&self) -> usize
    {   self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl InferenceBackend for FakeBackend
{   async fn infer(&self, _prompt: &str)
      -> promptpix::Result<Vec<u8>>
    {   self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate
        {   gate.notified().await;
        }
        if self.panic
        {   panic!("backend blew up");
        }
        self.reply.clone()
    }
}

// ===== Recording surface =====

#[derive(Debug, Default)]
pub struct RecordingSurface
{   pub prompt: String
  , pub image: Option<DisplayImage>
  , pub controls_history: Vec<bool>
  , pub indicator_visible: bool
  , pub indicator_values: Vec<f32>
  , pub errors: Vec<String>
  , pub logs: Vec<String>
}

impl RecordingSurface
{   pub fn with_prompt(prompt: &str) -> Self
    {   RecordingSurface
        {   prompt: prompt.to_string()
          , ..RecordingSurface::default()
        }
    }

    pub fn controls_enabled(&self) -> bool
    {   self.controls_history.last().copied().unwrap_or(true)
    }
}

impl PresentationSurface for RecordingSurface
{   fn prompt_text(&self) -> String
    {   self.prompt.clone()
    }

    fn set_image(&mut self, image: DisplayImage)
    {   self.image = Some(image);
    }

    fn set_controls_enabled(&mut self, enabled: bool)
    {   self.controls_history.push(enabled);
    }

    fn set_indicator_visible(&mut self, visible: bool)
    {   self.indicator_visible = visible;
    }

    fn set_indicator_value(&mut self, value: f32)
    {   self.indicator_values.push(value);
    }

    fn show_error_dialog(&mut self, message: &str)
    {   self.errors.push(message.to_string());
    }

    fn append_log(&mut self, message: &str)
    {   self.logs.push(message.to_string());
    }
}

pub fn quick_progress() -> promptpix::ProgressConfig
{   promptpix::ProgressConfig
    {   steps: 2
      , interval_ms: 10
    }
}
