//! Terminal progress for a dispatch.

use indicatif::{ProgressBar, ProgressStyle};

use stencil_core::application::{DispatchObserver, RepositoryOutcome};

/// Advances a progress bar as repositories finish.
///
/// Clones share the bar, so the caller keeps one to finish it.
#[derive(Clone)]
pub struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    /// A bar for `total` repositories, or a hidden one when not `visible`.
    pub fn new(total: usize, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) =
            ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl DispatchObserver for ProgressObserver {
    fn on_started(&self, repository: &str) {
        self.bar.set_message(repository.to_string());
    }

    fn on_finished(&self, _outcome: &RepositoryOutcome) {
        self.bar.inc(1);
    }
}
