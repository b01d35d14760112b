// src/utils/progress_bars/progress_config.rs

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::utils::env::env_or;

/// Configuration for progress tracking throughout the pipeline
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show progress bars at all
    pub enabled: bool,
    /// Whether to show per-seed clustering progress
    pub detailed: bool,
    /// Whether to show memory usage in progress messages
    pub show_memory: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            detailed: true,
            show_memory: true,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env_or("PROGRESS_ENABLED", true),
            detailed: env_or("PROGRESS_DETAILED", true),
            show_memory: env_or("PROGRESS_SHOW_MEMORY", true),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            detailed: false,
            show_memory: false,
        }
    }

    /// Create a MultiProgress instance if progress is enabled, None otherwise
    pub fn create_multi_progress(&self) -> Option<MultiProgress> {
        if self.enabled {
            Some(MultiProgress::new())
        } else {
            None
        }
    }

    pub fn should_show_detailed(&self) -> bool {
        self.enabled && self.detailed
    }

    pub fn should_show_memory(&self) -> bool {
        self.enabled && self.show_memory
    }
}

/// Adds a bar with the pipeline's shared style to `multi_progress`, if any.
pub fn add_bar(multi_progress: Option<&MultiProgress>, len: u64, label: &str) -> Option<ProgressBar> {
    let mp = multi_progress?;
    let pb = mp.add(ProgressBar::new(len));
    let template = format!(
        "  📍 [{{elapsed_precise}}] {{bar:30.cyan/blue}} {{pos}}/{{len}} {} {{msg}}",
        label
    );
    match ProgressStyle::default_bar().template(&template) {
        Ok(style) => pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  ")),
        Err(e) => log::debug!("Falling back to default progress style: {}", e),
    }
    Some(pb)
}
