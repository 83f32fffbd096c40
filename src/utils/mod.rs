use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

const ONLY_MESSAGE_TEMPLATE: &str = "{spinner} {wide_msg}";

fn message_style() -> ProgressStyle {
    ProgressStyle::with_template(ONLY_MESSAGE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

pub trait MultiProgressNew {
    fn add_spinner(&self) -> ProgressBar;
}

impl MultiProgressNew for MultiProgress {
    fn add_spinner(&self) -> ProgressBar {
        let pb = self.add(ProgressBar::new_spinner());
        pb.set_style(message_style());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
