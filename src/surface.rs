//! Presentation surface boundary
//!
//! The core never touches a UI toolkit. Background tasks send `UiEvent`s
//! over a channel and the `Presenter` applies them to the surface on
//! whichever thread drives it.

use tokio::sync::mpsc;
use log::{debug, trace};

use crate::decode::DisplayImage;

/// Narrow capability set the core needs from a UI
pub trait PresentationSurface
{   fn prompt_text(&self) -> String;
    fn set_image(&mut self, image: DisplayImage);
    fn set_controls_enabled(&mut self, enabled: bool);
    fn set_indicator_visible(&mut self, visible: bool);
    /// Fraction in `0.0..=1.0`
    fn set_indicator_value(&mut self, value: f32);
    fn show_error_dialog(&mut self, message: &str);
    fn append_log(&mut self, message: &str);
}

/// One mutation of on-screen state
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent
{   SetImage(DisplayImage)
  , SetControlsEnabled(bool)
  , SetIndicatorVisible(bool)
  , SetIndicatorValue(f32)
  , ShowError(String)
  , AppendLog(String)
}

impl UiEvent
{   pub fn apply<S: PresentationSurface + ?Sized>(self, surface: &mut S)
    {   match self
        {   UiEvent::SetImage(image) => surface.set_image(image)
          , UiEvent::SetControlsEnabled(enabled) => {
              surface.set_controls_enabled(enabled)
            }
          , UiEvent::SetIndicatorVisible(visible) => {
              surface.set_indicator_visible(visible)
            }
          , UiEvent::SetIndicatorValue(value) => {
              surface.set_indicator_value(value.clamp(0.0, 1.0))
            }
          , UiEvent::ShowError(message) => {
              surface.show_error_dialog(&message)
            }
          , UiEvent::AppendLog(message) => surface.append_log(&message)
        }
    }
}

/// Owns the surface and applies queued events to it
pub struct Presenter<S>
{   surface: S
  , events_rx: crate::UiEventReceiver
}

impl<S: PresentationSurface> Presenter<S>
{   /// Create a presenter and the sender background tasks report through
    pub fn new(surface: S) -> (Self, crate::UiEventSender)
    {   let (events_tx, events_rx) = mpsc::unbounded_channel();
        (Presenter { surface, events_rx }, events_tx)
    }

    /// Apply everything already queued; returns how many events ran
    pub fn pump(&mut self) -> usize
    {   let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv()
        {   trace!("Applying {:?}", event);
            event.apply(&mut self.surface);
            applied += 1;
        }
        applied
    }

    /// Wait for and apply one event; false once every sender is gone
    pub async fn next_event(&mut self) -> bool
    {   match self.events_rx.recv().await
        {   Some(event) => {
              trace!("Applying {:?}", event);
              event.apply(&mut self.surface);
              true
            }
          , None => {
              debug!("Event channel closed");
              false
            }
        }
    }

    /// Apply events until the channel closes
    pub async fn run(&mut self)
    {   while self.next_event().await {}
    }

    /// Read the prompt from the surface and hand it to the worker
    pub fn submit<B>(
      &self
    , worker: &crate::worker::GenerationWorker<B>
    ) -> crate::error::Result<crate::worker::Generation>
    where
      B: crate::providers::InferenceBackend + 'static
    {   worker.generate(&self.surface.prompt_text())
    }

    pub fn surface(&self) -> &S
    {   &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S
    {   &mut self.surface
    }

    pub fn into_surface(self) -> S
    {   self.surface
    }
}
