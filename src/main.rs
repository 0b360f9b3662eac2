use log::{error, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use promptpix::{
  DisplayImage, Error, PresentationSurface, PromptpixConfig,
};

/// Terminal stand-in for a window: one prompt per stdin line
#[derive(Default)]
struct ConsoleSurface
{   prompt: String
  , controls_enabled: bool
  , indicator_visible: bool
  , last_percent: Option<u32>
}

impl PresentationSurface for ConsoleSurface
{   fn prompt_text(&self) -> String
    {   self.prompt.clone()
    }

    fn set_image(&mut self, image: DisplayImage)
    {   println!(
          "Image ready: {}x{} pixels",
          image.width(), image.height()
        );
    }

    fn set_controls_enabled(&mut self, enabled: bool)
    {   self.controls_enabled = enabled;
        if enabled
        {   println!("Enter your image prompt:");
        }
    }

    fn set_indicator_visible(&mut self, visible: bool)
    {   self.indicator_visible = visible;
        if !visible
        {   self.last_percent = None;
        }
    }

    fn set_indicator_value(&mut self, value: f32)
    {   let percent = (value * 100.0).round() as u32;
        if self.indicator_visible && self.last_percent != Some(percent)
        {   eprintln!("[{:>3}%]", percent);
            self.last_percent = Some(percent);
        }
    }

    fn show_error_dialog(&mut self, message: &str)
    {   println!("Error: {}", message);
    }

    fn append_log(&mut self, message: &str)
    {   eprintln!("log: {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>>
{   env_logger::init();

    let config = match std::env::args().nth(1)
    {   Some(path) => PromptpixConfig::from_file(path)
      , None => PromptpixConfig::from_env()
    };
    let config = match config
    {   Ok(config) => config
      , Err(e) => {
          error!("{}", e);
          println!("Please set your Hugging Face API key: {}", e);
          return Err(e.into());
        }
    };

    let surface = ConsoleSurface
    {   controls_enabled: true
      , ..ConsoleSurface::default()
    };
    let (mut presenter, worker) = promptpix::connect(&config, surface)?;

    println!("Hugging Face Image Generator");
    println!("Enter your image prompt:");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut current = None;

    enum Input
    {   Line(Option<String>)
      , Event
    }

    loop
    {   let input = tokio::select!
        { line = lines.next_line() => Input::Line(line?)
        , _ = presenter.next_event() => Input::Event
        };

        match input
        {   Input::Line(Some(line)) => {
              if !presenter.surface().controls_enabled
              {   warn!("Input disabled while a generation runs");
              }
              presenter.surface_mut().prompt = line;
              match presenter.submit(&worker)
              {   Ok(generation) => current = Some(generation)
                , Err(Error::GenerationInProgress) => {}
                , Err(e) => warn!("{}", e)
              }
            }
          , Input::Line(None) => break
          , Input::Event => {}
        }
    }

    if let Some(generation) = current.take()
    {   let _ = generation.wait().await;
    }
    presenter.pump();
    Ok(())
}
