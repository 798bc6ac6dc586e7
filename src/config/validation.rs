//! Configuration validation functionality.
//!
//! Rejects values outside their documented ranges before any default is applied.

use anyhow::Result;

use super::Config;
use crate::common::constants::*;

/// Validate every field that is set.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(volume) = config.cue_volume
        && !(MINIMUM_CUE_VOLUME..=MAXIMUM_CUE_VOLUME).contains(&volume)
    {
        anyhow::bail!(
            "cue_volume ({}%) must be between {}% and {}%",
            volume,
            MINIMUM_CUE_VOLUME,
            MAXIMUM_CUE_VOLUME
        );
    }

    if let Some(step) = config.time_adjust_step
        && !(MINIMUM_TIME_ADJUST_STEP..=MAXIMUM_TIME_ADJUST_STEP).contains(&step)
    {
        anyhow::bail!(
            "time_adjust_step ({} seconds) must be between {} and {} seconds",
            step,
            MINIMUM_TIME_ADJUST_STEP,
            MAXIMUM_TIME_ADJUST_STEP
        );
    }

    if let Some(ref program_file) = config.program_file {
        if program_file.trim().is_empty() {
            anyhow::bail!("program_file must not be empty");
        }
        if !program_file.to_ascii_lowercase().ends_with(".json") {
            anyhow::bail!(
                "program_file ({}) must point to a .json program document",
                program_file
            );
        }
    }

    if let Some(ref data_dir) = config.data_dir
        && data_dir.trim().is_empty()
    {
        anyhow::bail!("data_dir must not be empty");
    }

    Ok(())
}
