//! Batch composition with a character limit.
//!
//! Segments are composed in parallel; results are collected in input order
//! and the first failure, in that order, rejects the whole batch.

use std::sync::Arc;

use rayon::prelude::*;
use street_heat_segment_models::{ComposedText, Segment};

use crate::ValidationError;
use crate::composer::TweetComposer;
use crate::progress::ComposeProgress;

/// Default maximum text length, in characters.
pub const DEFAULT_CHAR_LIMIT: usize = 280;

/// Composes every segment and checks each text against `limit`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] in input order: either a
/// composition failure or a text longer than `limit` characters.
pub fn validate_batch(
    composer: &TweetComposer<'_>,
    segments: &[Segment],
    fused_mean: f64,
    limit: usize,
    progress: &Arc<dyn ComposeProgress>,
) -> Result<Vec<ComposedText>, ValidationError> {
    progress.start(segments.len());

    let results: Vec<Result<ComposedText, ValidationError>> = segments
        .par_iter()
        .map(|segment| {
            let result = compose_one(composer, segment, fused_mean, limit);
            if let Ok(text) = &result {
                progress.composed(text.segment_id, text.char_len());
            }
            result
        })
        .collect();

    let texts = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    progress.finish(texts.len());
    log::info!(
        "Composed {} texts within the {limit}-character limit",
        texts.len()
    );

    Ok(texts)
}

fn compose_one(
    composer: &TweetComposer<'_>,
    segment: &Segment,
    fused_mean: f64,
    limit: usize,
) -> Result<ComposedText, ValidationError> {
    let text = composer.compose(segment, fused_mean)?;

    let composed = ComposedText {
        segment_id: segment.id,
        text,
    };

    let length = composed.char_len();
    if length > limit {
        return Err(ValidationError::TooLong {
            segment_id: segment.id,
            length,
            limit,
            text: composed.text,
        });
    }

    log::debug!("{}: {length} characters", segment.id);
    Ok(composed)
}
