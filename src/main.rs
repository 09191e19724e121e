//! # polymeasure Main Entry Point
//!
//! Loads measuring options and opens the demo window. Options come from the
//! JSON file named on the command line, or from `polymeasure.json` in the
//! working directory when it exists; otherwise defaults are used.

use log::{info, warn};
use std::error::Error;
use std::path::PathBuf;

use polymeasure::config::MeasureOptions;

const DEFAULT_OPTIONS_FILE: &str = "polymeasure.json";

fn load_options() -> MeasureOptions {
    let explicit = std::env::args().nth(1).map(PathBuf::from);
    let path = match explicit {
        Some(path) => path,
        None => {
            let fallback = PathBuf::from(DEFAULT_OPTIONS_FILE);
            if !fallback.exists() {
                info!("No {} found, using default options", DEFAULT_OPTIONS_FILE);
                return MeasureOptions::default();
            }
            fallback
        }
    };

    match MeasureOptions::load(&path) {
        Ok(options) => {
            info!("Loaded options from {}", path.display());
            options
        }
        Err(err) => {
            warn!("Could not load {}: {}. Using defaults.", path.display(), err);
            MeasureOptions::default()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();
    info!("polymeasure starting...");

    let options = load_options();

    #[cfg(feature = "gui")]
    polymeasure::ui::run_main_window(options)?;

    #[cfg(not(feature = "gui"))]
    {
        let _ = options;
        println!("polymeasure was built without the `gui` feature; nothing to show.");
    }

    info!("polymeasure exiting.");
    Ok(())
}
