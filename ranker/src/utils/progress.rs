use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use crate::utils::traits::ProgressObserver;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sources ({eta})";

/// Terminal progress bar for long ranking passes.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total_sources: usize) -> Self {
        let bar = ProgressBar::new(total_sources as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=>-"));
        }
        Self { bar }
    }

    /// A bar that draws nowhere, for tests and `--no-progress`.
    pub fn hidden(total_sources: usize) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total_sources as u64), ProgressDrawTarget::hidden());
        Self { bar }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressObserver for BarProgress {
    fn on_source_ranked(&self, completed: usize, _total: usize) {
        // completions can arrive out of order from worker threads
        if completed as u64 > self.bar.position() {
            self.bar.set_position(completed as u64);
        }
    }

    fn on_finished(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_highest_completed_count() {
        let progress = BarProgress::hidden(3);
        progress.on_source_ranked(2, 3);
        progress.on_source_ranked(1, 3);
        assert_eq!(progress.position(), 2);
        progress.on_source_ranked(3, 3);
        assert_eq!(progress.position(), 3);
    }
}
