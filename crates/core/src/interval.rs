//! Watch-interval spans and the canonical merge pass.
//!
//! A [`Span`] is one contiguous stretch of video playback, positions in
//! seconds. [`merge_spans`] folds any collection of spans into the minimal
//! sorted set of disjoint spans covering the same positions; that canonical
//! set is the only representation the storage layer persists, and every
//! progress figure is derived from its total coverage.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A contiguous span of watched video, positions in seconds.
///
/// Also serves as the wire shape for reported intervals, so the field names
/// match the JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Start position in seconds.
    pub start_secs: f64,
    /// End position in seconds.
    pub end_secs: f64,
}

impl Span {
    pub fn new(start_secs: f64, end_secs: f64) -> Self {
        Self {
            start_secs,
            end_secs,
        }
    }

    /// Seconds covered by this span.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a reported span before it reaches the merger or storage.
///
/// Rejects non-finite positions, negative starts, and empty or inverted
/// ranges. Spans may extend past the chapter's nominal duration; player
/// timelines and stored durations routinely disagree by a few seconds.
pub fn validate_span(span: &Span) -> Result<(), CoreError> {
    if !span.start_secs.is_finite() || !span.end_secs.is_finite() {
        return Err(CoreError::Validation(
            "start_secs and end_secs must be finite numbers".into(),
        ));
    }
    if span.start_secs < 0.0 {
        return Err(CoreError::Validation(
            "start_secs must not be negative".into(),
        ));
    }
    if span.end_secs <= span.start_secs {
        return Err(CoreError::Validation(
            "end_secs must be greater than start_secs".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Result of a merge pass: the canonical span set plus its total coverage.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSpans {
    /// Disjoint spans, ascending by start position.
    pub spans: Vec<Span>,
    /// Total seconds covered by the union of the input spans.
    pub total_secs: f64,
}

/// Merge spans into the minimal sorted set of disjoint spans.
///
/// Sorts by start position, then folds in one linear pass: a span whose
/// start lies at or before the running end extends it, so exactly touching
/// spans coalesce into one. Assumes every span is finite with `end > start`
/// (see [`validate_span`]); merging already-merged output is a no-op.
pub fn merge_spans(mut spans: Vec<Span>) -> MergedSpans {
    if spans.is_empty() {
        return MergedSpans {
            spans,
            total_secs: 0.0,
        };
    }

    spans.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    let mut current = spans[0];

    for span in spans.into_iter().skip(1) {
        if span.start_secs <= current.end_secs {
            current.end_secs = current.end_secs.max(span.end_secs);
        } else {
            merged.push(current);
            current = span;
        }
    }
    merged.push(current);

    let total_secs = merged.iter().map(Span::duration_secs).sum();

    MergedSpans {
        spans: merged,
        total_secs,
    }
}
