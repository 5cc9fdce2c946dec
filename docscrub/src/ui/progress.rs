// docscrub/src/ui/progress.rs
//! Progress bar for batch sanitization, using indicatif.

use docscrub_core::Progress;
use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {percent}% | ETA: {eta} | {pos}/{len}";

/// Draws a bar on stderr; indicatif hides it when stderr is not a terminal.
#[derive(Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for BarProgress {
    fn start(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█░");
        bar.set_style(style);
        self.bar = Some(bar);
    }

    fn advance(&mut self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
