//! Progress reporting for a single transfer.

use std::path::Path;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Receives byte-count deltas while a file is streamed to disk.
///
/// The downloader calls `start`, `advance` and `finish` only when reporting is
/// enabled (not quiet and the size is known). `saved` is the completion
/// notice and is called unless quiet.
pub trait ProgressSink: Send {
    /// A determinate transfer of `total` bytes begins.
    fn start(&mut self, total: u64, label: &str);

    /// `delta` more bytes were written.
    fn advance(&mut self, delta: u64);

    /// The last chunk has been written.
    fn finish(&mut self);

    /// The transfer failed after `start`.
    fn abandon(&mut self) {}

    /// The file was saved at `path`.
    fn saved(&mut self, path: &Path) {
        let _ = path;
    }
}

/// Discards all progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&mut self, _total: u64, _label: &str) {}

    fn advance(&mut self, _delta: u64) {}

    fn finish(&mut self) {}
}

/// Terminal byte progress bar on stderr, plus a saved-file notice on stdout.
#[derive(Default)]
pub struct ProgressBarSink {
    bar: Option<ProgressBar>,
}

impl std::fmt::Debug for ProgressBarSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressBarSink")
            .field("active", &self.bar.is_some())
            .finish()
    }
}

impl ProgressBarSink {
    /// Creates a sink with no bar drawn yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg} [{elapsed_precise}] [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ")
}

impl ProgressSink for ProgressBarSink {
    fn start(&mut self, total: u64, label: &str) {
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        bar.set_style(bytes_style());
        bar.set_message(label.to_string());
        self.bar = Some(bar);
    }

    fn advance(&mut self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }

    fn abandon(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }

    fn saved(&mut self, path: &Path) {
        println!("[qdown] saved file: {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_sink_tracks_position_until_finish() {
        let mut sink = ProgressBarSink::new();
        sink.start(100, "Downloading: a.bin");
        sink.advance(40);
        sink.advance(60);
        let position = sink.bar.as_ref().map(ProgressBar::position);
        assert_eq!(position, Some(100));

        sink.finish();
        assert!(sink.bar.is_none(), "finish should release the bar");
    }

    #[test]
    fn test_progress_bar_sink_abandon_releases_bar() {
        let mut sink = ProgressBarSink::new();
        sink.start(10, "Downloading: a.bin");
        sink.advance(3);
        sink.abandon();
        assert!(sink.bar.is_none());
    }

    #[test]
    fn test_progress_bar_sink_advance_without_start_is_noop() {
        let mut sink = ProgressBarSink::new();
        sink.advance(5);
        sink.finish();
        assert!(sink.bar.is_none());
    }
}
