//! Build and process metadata.
//!
//! Captured once in `main` and handed to the commands that need it.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::Serialize;

/// Immutable facts about this binary and the current process.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Set at build time through `STENCIL_GIT_REVISION`.
    pub git_revision: Option<&'static str>,
    pub platform: String,
    pub started_at: DateTime<Local>,
    #[serde(skip)]
    started: Instant,
}

impl BuildInfo {
    pub fn capture() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            git_revision: option_env!("STENCIL_GIT_REVISION"),
            platform: format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS),
            started_at: Local::now(),
            started: Instant::now(),
        }
    }

    /// Time since the process started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stencil {}", self.version)?;
        if let Some(rev) = self.git_revision {
            write!(f, " ({rev})")?;
        }
        write!(f, " {}", self.platform)
    }
}
