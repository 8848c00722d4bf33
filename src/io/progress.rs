//! Round progress display for the command-line driver

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::tessellation::coordinator::RoundSummary;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static ROUND_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Rounds: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Single progress bar tracking coordinator rounds
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a bar for `total_rounds` rounds
    pub fn new(total_rounds: usize) -> Self {
        let bar = ProgressBar::new(total_rounds as u64);
        bar.set_style(ROUND_STYLE.clone());
        Self { bar }
    }

    /// Advance to a finished round and show its mean error
    pub fn update(&self, summary: &RoundSummary) {
        self.bar.set_position(summary.round as u64);
        self.bar.set_message(format!(
            "error {:.3} ({} updated)",
            summary.mean_error(),
            summary.updated
        ));
    }

    /// Rounds shown as done
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Leave the bar at its final state
    pub fn finish(&self) {
        self.bar.finish();
    }
}
