//! Progress indicators for the clusterup CLI.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Create a progress bar for `len` steps, hidden when `quiet`
pub fn bar(len: u64, prefix: &str, quiet: bool) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if quiet {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb.set_message(prefix.to_string());
    pb
}

/// Finish a bar and leave a success line behind
pub fn finish_success(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "✓".green(), msg);
}

/// Finish a bar and leave a warning line behind
pub fn finish_warn(pb: &ProgressBar, msg: &str) {
    pb.finish_and_clear();
    println!("  {} {}", "⚠".yellow(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_counts_steps() {
        let pb = bar(3, "disks", true);
        pb.inc(2);
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.length(), Some(3));
        assert_eq!(pb.message(), "disks");
        pb.finish_and_clear();
    }
}
