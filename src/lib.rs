pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod decode;
pub mod surface;
pub mod progress;
pub mod worker;

/*

promptpix: type a prompt, POST it to a text-to-image inference
endpoint, show the image that comes back.

Flow:

  Presenter::submit ──► GenerationWorker::generate
                              │  (tokio task)
                              ├─► InferenceClient::infer   (providers/)
                              ├─► decode                   (decode.rs)
                              ▼
                        UiEvent channel ──► Presenter ──► PresentationSurface

ProgressDriver ramps the indicator on its own task alongside the
request; the worker stops it and resets the indicator on completion.

*/

pub use config::{ProgressConfig, PromptpixConfig};
pub use decode::{decode, DisplayImage};
pub use error::{Error, Result};
pub use providers::{InferenceBackend, InferenceClient};
pub use request::InferenceRequest;
pub use surface::{PresentationSurface, Presenter, UiEvent};
pub use worker::{Generation, GenerationWorker, WorkerState};

/// PROMPTPIX CHANNEL TYPES:

pub type UiEventSender
  = tokio::sync::mpsc::UnboundedSender<surface::UiEvent>;
pub type UiEventReceiver
  = tokio::sync::mpsc::UnboundedReceiver<surface::UiEvent>;

/// Wire a presenter, an HTTP client and a worker together from config
pub fn connect<S>(
  config: &PromptpixConfig
, surface: S
) -> Result<(Presenter<S>, GenerationWorker<InferenceClient>)>
where
  S: PresentationSurface
{   let client = InferenceClient::new(config)?;
    let (presenter, events_tx) = Presenter::new(surface);
    let worker = GenerationWorker::new(
      client,
      events_tx,
      config.progress.clone()
    );
    Ok((presenter, worker))
}
