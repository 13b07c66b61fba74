//! Progress reporting: count-style bars (windows reduced out of total).

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, OnceLock};

/// Optional global MultiProgress that allows multiple bars to render concurrently.
/// If unset, progress bars draw to the default terminal target.
static GLOBAL_MP: OnceLock<Arc<MultiProgress>> = OnceLock::new();

/// Install a global MultiProgress used by all subsequently created progress bars.
/// Safe to call once; additional calls are ignored.
pub fn set_global_multiprogress(mp: Arc<MultiProgress>) {
    let _ = GLOBAL_MP.set(mp);
}

fn new_bar(total: u64) -> ProgressBar {
    if let Some(mp) = GLOBAL_MP.get() {
        mp.add(ProgressBar::new(total))
    } else {
        ProgressBar::new(total)
    }
}

/// Count-style progress bar (windows processed out of total), with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = new_bar(total);
    let style = ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} windows [{bar:.cyan/blue}] {percent:>3}%  \
         elapsed: {elapsed_precise}  eta: {eta_precise}"
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ");
    pb.set_style(style);
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
