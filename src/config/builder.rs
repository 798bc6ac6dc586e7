//! Default configuration file generation.
//!
//! The generated file lists every setting with its default value and an
//! aligned comment, grouped under `#[Section]` headers.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;
use crate::common::utils::private_path;

/// Write a commented default configuration to `path`.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let content = default_config_content();
    fs::write(path, content)
        .with_context(|| format!("Failed to write default config to {}", private_path(path)))?;

    log_block_start!("Created default configuration");
    log_indented!("{}", private_path(path));

    Ok(())
}

/// Text of the default configuration file.
pub fn default_config_content() -> String {
    let mut content = ConfigBuilder::new()
        .add_section("Program")
        .add_commented_setting(
            "program_file",
            "\"~/workouts/program.json\"",
            "Seed program JSON (built-in program when unset)",
        )
        .add_commented_setting(
            "data_dir",
            "\"~/.local/share/calistimer\"",
            "Where notes, programs and preferences are stored",
        )
        .add_section("Audio cues")
        .add_setting(
            "audio_cues",
            &DEFAULT_AUDIO_CUES.to_string(),
            "Announce work, rest and completion",
        )
        .add_setting(
            "cue_backend",
            &format!("\"{}\"", DEFAULT_CUE_BACKEND.as_str()),
            "Select: \"auto\", \"tone\", \"bell\", \"none\"",
        )
        .add_setting(
            "cue_volume",
            &DEFAULT_CUE_VOLUME.to_string(),
            &format!(
                "Tone volume in percent ({}-{})",
                MINIMUM_CUE_VOLUME, MAXIMUM_CUE_VOLUME
            ),
        )
        .add_section("Controls")
        .add_setting(
            "time_adjust_step",
            &DEFAULT_TIME_ADJUST_STEP.to_string(),
            &format!(
                "Seconds added or removed by +/- ({}-{})",
                MINIMUM_TIME_ADJUST_STEP, MAXIMUM_TIME_ADJUST_STEP
            ),
        )
        .build();
    content.push('\n');
    content
}

/// Builder for properly formatted configuration files with aligned comments.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

#[derive(Clone)]
struct ConfigEntry {
    content: String,
    entry_type: EntryType,
}

#[derive(Clone)]
enum EntryType {
    Section,
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry {
            content: format!("#[{title}]"),
            entry_type: EntryType::Section,
        });
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        let line = format!("{key} = {value}");
        self.entries.push(ConfigEntry {
            content: line.clone(),
            entry_type: EntryType::Setting {
                line,
                comment: format!("# {comment}"),
            },
        });
        self
    }

    /// A setting written commented out, so its default stays in effect.
    fn add_commented_setting(self, key: &str, value: &str, comment: &str) -> Self {
        self.add_setting(&format!("# {key}"), value, comment)
    }

    fn build(self) -> String {
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match &entry.entry_type {
                EntryType::Setting { line, .. } => Some(line.len()),
                EntryType::Section => None,
            })
            .max()
            .unwrap_or(0)
            + 1; // +1 for one space between setting and comment

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry.entry_type {
                EntryType::Section => {
                    if !first_section {
                        result.push(String::new()); // Empty line before new section
                    }
                    result.push(entry.content);
                    first_section = false;
                }
                EntryType::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.join("\n")
    }
}
