#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal reporting for the `street_heat` binary.
//!
//! A [`StageBar`] walks the four stages of a compose run, a [`ComposeBar`]
//! counts segments through the composition batch, and [`init_logger`]
//! routes `log` output through the same [`MultiProgress`] so log lines and
//! bars do not overwrite each other.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use street_heat_compose::ComposeProgress;
use street_heat_segment_models::SegmentId;

pub use indicatif::{MultiProgress, ProgressDrawTarget};

/// The stages of a compose run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading every input file.
    Load,
    /// Joining the segment sources and projecting segments.
    Fuse,
    /// Composing and length-checking every segment.
    Compose,
    /// Shuffling and writing the output table.
    Write,
}

impl Stage {
    /// Every stage, in order.
    pub const ALL: [Self; 4] = [Self::Load, Self::Fuse, Self::Compose, Self::Write];

    /// One-based position of the stage.
    #[must_use]
    pub const fn number(self) -> usize {
        match self {
            Self::Load => 1,
            Self::Fuse => 2,
            Self::Compose => 3,
            Self::Write => 4,
        }
    }

    /// Short present-tense description.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "Loading inputs",
            Self::Fuse => "Fusing segment sources",
            Self::Compose => "Composing texts",
            Self::Write => "Writing output",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.number(), Self::ALL.len(), self.label())
    }
}

/// Top-level bar that advances once per [`Stage`].
pub struct StageBar {
    bar: ProgressBar,
}

impl StageBar {
    /// Adds a stage bar to `multi`.
    #[must_use]
    pub fn new(multi: &MultiProgress) -> Self {
        let bar = multi.add(ProgressBar::new(Stage::ALL.len() as u64));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Marks the stages before `stage` as done and shows `stage`.
    pub fn enter(&self, stage: Stage) {
        log::info!("{stage}...");
        self.bar.set_position(stage.number() as u64 - 1);
        self.bar.set_message(stage.to_string());
    }

    /// Completes the bar with the total run time.
    pub fn finish(&self, elapsed: Duration) {
        self.bar.set_position(Stage::ALL.len() as u64);
        self.bar
            .finish_with_message(format!("Done in {:.1}s", elapsed.as_secs_f64()));
    }

    /// Stages completed so far.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.bar.position()
    }
}

/// Per-segment bar for the composition batch.
///
/// Also tracks the longest composed text, which is reported when the batch
/// finishes so the margin under the character limit is visible.
pub struct ComposeBar {
    bar: ProgressBar,
    longest: AtomicUsize,
}

impl ComposeBar {
    /// Adds a composition bar to `multi`.
    #[must_use]
    pub fn new(multi: &MultiProgress) -> Self {
        let bar = multi.add(ProgressBar::new(0));
        bar.set_style(
            ProgressStyle::with_template(
                "  {msg} {wide_bar:.yellow/dim} {pos}/{len} segments [{eta}]",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
        );
        bar.set_message("Composing");
        Self {
            bar,
            longest: AtomicUsize::new(0),
        }
    }

    /// Longest text composed so far, in characters.
    #[must_use]
    pub fn longest(&self) -> usize {
        self.longest.load(Ordering::Relaxed)
    }

    /// Segments composed so far.
    #[must_use]
    pub fn composed_count(&self) -> u64 {
        self.bar.position()
    }
}

impl ComposeProgress for ComposeBar {
    fn start(&self, segments: usize) {
        self.bar.set_length(segments as u64);
        self.bar.set_position(0);
        self.longest.store(0, Ordering::Relaxed);
    }

    fn composed(&self, segment_id: SegmentId, chars: usize) {
        self.longest.fetch_max(chars, Ordering::Relaxed);
        self.bar.inc(1);
        log::trace!("{segment_id}: composed {chars} characters");
    }

    fn finish(&self, composed: usize) {
        self.bar.finish_with_message(format!(
            "Composed {composed} texts, longest {} characters",
            self.longest()
        ));
    }
}

/// Initializes the global logger behind `indicatif-log-bridge`.
///
/// The street heat crates log at `info` unless `RUST_LOG` says otherwise.
/// Returns the [`MultiProgress`] that every bar must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("street_heat", LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // A logger may already be installed (tests).
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}
