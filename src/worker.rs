use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use log::{debug, error, info, warn};

use crate::config::ProgressConfig;
use crate::decode::{decode, DisplayImage};
use crate::error::{Error, Result};
use crate::progress::ProgressDriver;
use crate::providers::InferenceBackend;
use crate::surface::UiEvent;

/// Where a generate cycle currently is (or last ended)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WorkerState
{   Idle = 0
  , Validating = 1
  , Requesting = 2
  , Decoding = 3
  , Displaying = 4
  , Failed = 5
}

impl WorkerState
{   fn from_u8(raw: u8) -> Self
    {   match raw
        {   1 => WorkerState::Validating
          , 2 => WorkerState::Requesting
          , 3 => WorkerState::Decoding
          , 4 => WorkerState::Displaying
          , 5 => WorkerState::Failed
          , _ => WorkerState::Idle
        }
    }
}

#[derive(Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState
{   fn set(&self, state: WorkerState)
    {   debug!("Worker state -> {:?}", state);
        self.0.store(state as u8, Ordering::SeqCst);
    }

    fn get(&self) -> WorkerState
    {   WorkerState::from_u8(self.0.load(Ordering::SeqCst))
    }
}

/// Releases the in-flight flag when dropped, panics included
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard
{   fn acquire(flag: &Arc<AtomicBool>) -> Option<Self>
    {   flag
          .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
          .ok()
          .map(|_| InFlightGuard(flag.clone()))
    }
}

impl Drop for InFlightGuard
{   fn drop(&mut self)
    {   self.0.store(false, Ordering::Release);
    }
}

/// Handle to one in-flight generation
pub struct Generation
{   handle: tokio::task::JoinHandle<Result<()>>
}

impl Generation
{   /// Resolves once every UI event for this generation has been sent
    pub async fn wait(self) -> Result<()>
    {   match self.handle.await
        {   Ok(outcome) => outcome
          , Err(e) => Err(Error::Other(format!(
              "generation task failed: {}", e
            )))
        }
    }

    pub fn is_finished(&self) -> bool
    {   self.handle.is_finished()
    }
}

/// Runs prompt → infer → decode off the presentation thread, one at a time
pub struct GenerationWorker<B>
{   backend: Arc<B>
  , events: crate::UiEventSender
  , progress: ProgressConfig
  , in_flight: Arc<AtomicBool>
  , state: SharedState
}

impl<B> GenerationWorker<B>
where
  B: InferenceBackend + 'static
{   pub fn new(
      backend: B
    , events: crate::UiEventSender
    , progress: ProgressConfig
    ) -> Self
    {   debug!("Creating GenerationWorker");
        GenerationWorker
        {   backend: Arc::new(backend)
          , events
          , progress
          , in_flight: Arc::new(AtomicBool::new(false))
          , state: SharedState(Arc::new(AtomicU8::new(
              WorkerState::Idle as u8
            )))
        }
    }

    pub fn state(&self) -> WorkerState
    {   self.state.get()
    }

    pub fn is_busy(&self) -> bool
    {   self.in_flight.load(Ordering::Acquire)
    }

    /// Start a generation - returns immediately
    ///
    /// Rejects with `GenerationInProgress` while another one runs and with
    /// `EmptyPrompt` for blank input. Must be called inside a tokio runtime.
    pub fn generate(&self, prompt: &str) -> Result<Generation>
    {   tokio::runtime::Handle::try_current().map_err(|e| {
          Error::Other(format!("no async runtime: {}", e))
        })?;

        let prompt = prompt.trim().to_string();
        if prompt.is_empty()
        {   if !self.is_busy()
            {   self.state.set(WorkerState::Failed);
            }
            self.emit(UiEvent::ShowError(Error::EmptyPrompt.to_string()));
            return Err(Error::EmptyPrompt);
        }

        let guard = match InFlightGuard::acquire(&self.in_flight)
        {   Some(guard) => guard
          , None => {
              warn!("Generate ignored: a generation is already in flight");
              self.emit(UiEvent::AppendLog(
                "Generation already in progress, request ignored".to_string()
              ));
              return Err(Error::GenerationInProgress);
            }
        };
        self.state.set(WorkerState::Validating);

        self.emit(UiEvent::SetControlsEnabled(false));
        self.emit(UiEvent::SetIndicatorValue(0.0));
        self.emit(UiEvent::SetIndicatorVisible(true));
        self.emit(UiEvent::AppendLog(format!(
          "Starting image generation for prompt: {}", prompt
        )));
        info!("Starting image generation");

        let progress = ProgressDriver::start(
          &self.progress,
          self.events.clone()
        );

        self.state.set(WorkerState::Requesting);
        let pipeline = tokio::spawn(run_pipeline(
          self.backend.clone(),
          prompt,
          self.state.clone(),
          self.events.clone()
        ));

        let events = self.events.clone();
        let state = self.state.clone();
        let handle = tokio::spawn(async move {
          let _guard = guard;
          let outcome = match pipeline.await
          {   Ok(outcome) => outcome
            , Err(e) => {
                error!("Generation task aborted: {}", e);
                Err(Error::Other(format!("unexpected failure: {}", e)))
              }
          };
          progress.stop().await;
          finish(&events, &state, outcome)
        });

        Ok(Generation { handle })
    }

    fn emit(&self, event: UiEvent)
    {   if self.events.send(event).is_err()
        {   debug!("Presenter gone, dropping UI event");
        }
    }
}

async fn run_pipeline<B>(
  backend: Arc<B>
, prompt: String
, state: SharedState
, events: crate::UiEventSender
) -> Result<DisplayImage>
where
  B: InferenceBackend + 'static
{   let _ = events.send(UiEvent::AppendLog(
      "Calling inference API...".to_string()
    ));
    let bytes = match backend.infer(&prompt).await
    {   Ok(bytes) => bytes
      , Err(e) => {
          if let Error::HttpStatus { code, body } = &e
          {   let _ = events.send(UiEvent::AppendLog(format!(
                "Received response code: {}", code
              )));
              if let Some(body) = body
              {   let _ = events.send(UiEvent::AppendLog(format!(
                    "Error response: {}", body
                  )));
              }
          }
          return Err(e);
        }
    };
    let _ = events.send(UiEvent::AppendLog(
      "Received response from API".to_string()
    ));

    state.set(WorkerState::Decoding);
    tokio::task::spawn_blocking(move || decode(&bytes))
      .await
      .map_err(|e| Error::Other(format!("decode task failed: {}", e)))?
}

/// Hand the outcome to the surface and return it to Idle-ready controls
fn finish(
  events: &crate::UiEventSender
, state: &SharedState
, outcome: Result<DisplayImage>
) -> Result<()>
{   let result = match outcome
    {   Ok(image) => {
          info!(
            "Image generated successfully ({}x{})",
            image.width(), image.height()
          );
          let _ = events.send(UiEvent::SetImage(image));
          state.set(WorkerState::Displaying);
          Ok(())
        }
      , Err(e) => {
          error!("Generation failed: {}", e);
          let _ = events.send(UiEvent::AppendLog(format!("Error: {}", e)));
          state.set(WorkerState::Failed);
          Err(e)
        }
    };

    let _ = events.send(UiEvent::SetIndicatorValue(0.0));
    let _ = events.send(UiEvent::SetIndicatorVisible(false));
    let _ = events.send(UiEvent::SetControlsEnabled(true));

    match &result
    {   Ok(()) => {
          let _ = events.send(UiEvent::AppendLog(
            "Image generated successfully!".to_string()
          ));
        }
      , Err(e) => {
          let _ = events.send(UiEvent::ShowError(format!(
            "Error generating image: {}", e
          )));
        }
    }
    result
}
