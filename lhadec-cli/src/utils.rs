//! Shared CLI helpers.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a byte-count progress bar, or a hidden one when disabled.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb
}

/// Space saved by compression in percent, 0 for empty entries.
pub fn compression_ratio(compressed: u64, original: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        (1.0 - compressed as f64 / original as f64) * 100.0
    }
}
