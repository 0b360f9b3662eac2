//! Cosmetic progress ramp, not tied to real request progress

use log::trace;

use crate::config::ProgressConfig;
use crate::surface::UiEvent;

/// Advances the indicator in fixed steps until stopped or full
pub struct ProgressDriver
{   handle: tokio::task::JoinHandle<()>
}

impl ProgressDriver
{   /// Spawn the ramp; must be called inside a tokio runtime
    pub fn start(
      config: &ProgressConfig
    , events: crate::UiEventSender
    ) -> Self
    {   let steps = config.steps.max(1);
        let interval = config.interval();

        let handle = tokio::spawn(async move {
          for step in 0..=steps
          {   let value = step as f32 / steps as f32;
              trace!("Progress {:.0}%", value * 100.0);
              if events.send(UiEvent::SetIndicatorValue(value)).is_err()
              {   break;
              }
              if step < steps
              {   tokio::time::sleep(interval).await;
              }
          }
        });

        ProgressDriver { handle }
    }

    pub fn is_finished(&self) -> bool
    {   self.handle.is_finished()
    }

    /// Abort the ramp and wait until it can no longer emit
    pub async fn stop(self)
    {   self.handle.abort();
        let _ = self.handle.await;
    }
}
