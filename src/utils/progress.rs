use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn style(bar_colors: &str) -> ProgressStyle {
    let template = format!(
        "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.{}}}] {{pos}}/{{len}} {{msg}}",
        bar_colors
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Progress over the entries of one archive. Does nothing when disabled.
#[derive(Clone)]
pub struct ProgressTracker {
    progress_bar: Option<ProgressBar>,
    archive_name: String,
}

impl ProgressTracker {
    pub fn new(enabled: bool, total_entries: u64, archive_name: &str) -> Self {
        let progress_bar = enabled.then(|| {
            let pb = ProgressBar::new(total_entries);
            pb.set_style(style("cyan/blue"));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        Self {
            progress_bar,
            archive_name: archive_name.to_string(),
        }
    }

    pub fn update_message(&self, entry: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(format!("[{}] {}", self.archive_name, entry));
        }
    }

    pub fn increment(&self, delta: u64) {
        if let Some(pb) = &self.progress_bar {
            pb.inc(delta);
        }
    }

    pub fn finish(&self, rows: usize) {
        if let Some(pb) = &self.progress_bar {
            pb.set_style(style("green/blue"));
            pb.finish_with_message(format!("Complete [{}] {} rows", self.archive_name, rows));
        }
    }
}
