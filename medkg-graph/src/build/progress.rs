//! Progress bars for build stages.
//!
//! The property task and the relationship phase run at the same time, so
//! every stage bar is registered with one shared [`MultiProgress`].

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Creates one progress bar per stage, or hidden bars when disabled.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    multi: Option<MultiProgress>,
}

impl Progress {
    /// Draw to stderr when `enabled`.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self::with_draw_target(ProgressDrawTarget::stderr())
        } else {
            Self::hidden()
        }
    }

    pub fn hidden() -> Self {
        Self { multi: None }
    }

    pub(crate) fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: Some(MultiProgress::with_draw_target(target)),
        }
    }

    /// A bar of `len` steps labelled `msg`.
    pub fn stage(&self, len: usize, msg: impl Into<String>) -> ProgressBar {
        let Some(multi) = &self.multi else {
            return ProgressBar::hidden();
        };

        let bar = multi.add(ProgressBar::new(len as u64));
        let style = ProgressStyle::default_bar()
            .template("{msg:<28} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(msg.into());
        bar
    }
}
