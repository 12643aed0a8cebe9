//! Chapter and course progress math.
//!
//! The derivation rules for every stored progress figure. Chapter progress
//! is merged watch coverage against the chapter's nominal duration; the
//! course figure is the arithmetic mean across all of the course's
//! chapters. Figures are always derived fresh from current state, never
//! incremented in place.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Progress percentage at which a chapter counts as completed.
pub const COMPLETED_PROGRESS: f64 = 100.0;

/// Seconds per minute, for converting stored chapter durations.
pub const SECS_PER_MINUTE: f64 = 60.0;

// ---------------------------------------------------------------------------
// Chapter figures
// ---------------------------------------------------------------------------

/// Convert a chapter's stored nominal duration (minutes) to seconds.
///
/// Chapters without a duration, or with a non-positive or non-finite one,
/// yield 0, which pins their progress at 0 until a real duration is set.
pub fn chapter_duration_secs(duration_minutes: Option<f64>) -> f64 {
    match duration_minutes {
        Some(minutes) if minutes > 0.0 && minutes.is_finite() => minutes * SECS_PER_MINUTE,
        _ => 0.0,
    }
}

/// Percentage of a chapter's nominal duration covered by watched time.
///
/// Capped at 100 so re-watching or player overshoot can never push a
/// chapter past completion. A chapter with no usable duration reports 0
/// regardless of watch time.
pub fn chapter_progress(watched_secs: f64, duration_secs: f64) -> f64 {
    if duration_secs > 0.0 {
        (watched_secs / duration_secs * 100.0).min(COMPLETED_PROGRESS)
    } else {
        0.0
    }
}

/// Whether a progress percentage counts as chapter completion.
pub fn is_completed(progress: f64) -> bool {
    progress >= COMPLETED_PROGRESS
}

// ---------------------------------------------------------------------------
// Course figure
// ---------------------------------------------------------------------------

/// Arithmetic-mean course progress across all chapters of a course.
///
/// `chapter_progresses` holds one entry per chapter the learner has touched;
/// untouched chapters contribute 0 through the `total_chapters` denominator.
/// A course with no chapters reports 0.
pub fn course_progress(chapter_progresses: &[f64], total_chapters: usize) -> f64 {
    if total_chapters == 0 {
        return 0.0;
    }
    chapter_progresses.iter().sum::<f64>() / total_chapters as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- chapter_duration_secs --

    #[test]
    fn duration_converts_minutes_to_seconds() {
        assert_eq!(chapter_duration_secs(Some(10.0)), 600.0);
        assert_eq!(chapter_duration_secs(Some(0.5)), 30.0);
    }

    #[test]
    fn duration_absent_is_zero() {
        assert_eq!(chapter_duration_secs(None), 0.0);
    }

    #[test]
    fn duration_non_positive_is_zero() {
        assert_eq!(chapter_duration_secs(Some(0.0)), 0.0);
        assert_eq!(chapter_duration_secs(Some(-5.0)), 0.0);
    }

    #[test]
    fn duration_non_finite_is_zero() {
        assert_eq!(chapter_duration_secs(Some(f64::NAN)), 0.0);
        assert_eq!(chapter_duration_secs(Some(f64::INFINITY)), 0.0);
    }

    // -- chapter_progress --

    #[test]
    fn progress_is_proportional_to_coverage() {
        assert_eq!(chapter_progress(300.0, 600.0), 50.0);
        assert_eq!(chapter_progress(150.0, 600.0), 25.0);
    }

    #[test]
    fn progress_reaches_exactly_100_at_full_coverage() {
        let progress = chapter_progress(600.0, 600.0);
        assert_eq!(progress, 100.0);
        assert!(is_completed(progress));
    }

    #[test]
    fn progress_just_short_of_full_is_not_complete() {
        let progress = chapter_progress(599.999, 600.0);
        assert!(progress < 100.0);
        assert!(!is_completed(progress));
    }

    #[test]
    fn progress_is_capped_at_100() {
        let progress = chapter_progress(700.0, 600.0);
        assert_eq!(progress, 100.0);
        assert!(is_completed(progress));
    }

    #[test]
    fn progress_without_duration_is_zero() {
        assert_eq!(chapter_progress(500.0, 0.0), 0.0);
        assert!(!is_completed(chapter_progress(500.0, 0.0)));
    }

    // -- course_progress --

    #[test]
    fn course_progress_is_mean_of_chapter_figures() {
        assert_eq!(course_progress(&[100.0, 50.0], 2), 75.0);
    }

    #[test]
    fn untouched_chapters_count_as_zero() {
        // Two records at 100 and 50, third chapter never watched.
        assert_eq!(course_progress(&[100.0, 50.0], 3), 50.0);
    }

    #[test]
    fn course_without_chapters_reports_zero() {
        assert_eq!(course_progress(&[], 0), 0.0);
    }

    #[test]
    fn enrollment_without_records_reports_zero() {
        assert_eq!(course_progress(&[], 4), 0.0);
    }
}
