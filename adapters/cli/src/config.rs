use std::{fs, path::Path};

use anyhow::{Context, Result};
use tron_rider_core::Tuning;

/// Loads tuning overrides from `path`, or the defaults when no file is given.
///
/// The result is validated; an unplayable tuning is an error.
pub(crate) fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let tuning = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
            let tuning = toml::from_str::<Tuning>(&contents)
                .with_context(|| format!("failed to parse tuning file at {}", path.display()))?;
            tracing::info!(path = %path.display(), "loaded tuning overrides");
            tuning
        }
        None => Tuning::default(),
    };

    tuning
        .validate()
        .context("tuning does not describe a playable session")?;
    Ok(tuning)
}
