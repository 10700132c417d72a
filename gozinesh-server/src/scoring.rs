//! Quiz attempt mechanics: shuffling and the cooldown gate.
//!
//! The scoring arithmetic itself lives on [`gozinesh_core::Scorecard`];
//! this module owns what is specific to running an attempt.

use std::time::Duration;

use rand::seq::SliceRandom;

use gozinesh_core::QuizQuestion;

/// How long a failed attempt locks out the next one.
pub const ATTEMPT_COOLDOWN: Duration = Duration::from_secs(24 * 60 * 60);

/// Uniformly shuffle the question set for one attempt. Every permutation
/// is equally likely; each attempt reshuffles from scratch.
pub fn shuffle_questions(questions: &mut [QuizQuestion]) {
    questions.shuffle(&mut rand::thread_rng());
}

/// Time left on the cooldown started at `last_attempt_secs`, as of
/// `now_secs`. `None` once the window has fully elapsed (or if the clock
/// went backwards far enough to make the record meaningless).
pub fn cooldown_remaining(last_attempt_secs: u64, now_secs: u64) -> Option<Duration> {
    let elapsed = now_secs.saturating_sub(last_attempt_secs);
    let window = ATTEMPT_COOLDOWN.as_secs();
    if elapsed >= window {
        None
    } else {
        Some(Duration::from_secs(window - elapsed))
    }
}

/// Floor-truncated hours and minutes of a remaining duration, for the
/// lockout notice.
pub fn hours_minutes(remaining: Duration) -> (u64, u64) {
    let secs = remaining.as_secs();
    (secs / 3600, (secs % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gozinesh_core::{QuestionId, TestType};
    use std::collections::HashMap;

    fn question(id: i64) -> QuizQuestion {
        QuizQuestion {
            id: QuestionId(id),
            test_type: TestType::General,
            text: format!("q{}", id),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: 0,
        }
    }

    #[test]
    fn test_cooldown_one_hour_in_reports_23h0m() {
        let last = 1_000_000;
        let now = last + 3600;
        let remaining = cooldown_remaining(last, now).unwrap();
        assert_eq!(hours_minutes(remaining), (23, 0));
    }

    #[test]
    fn test_cooldown_partial_minutes_floor() {
        let last = 0;
        // 30 minutes and 59 seconds in: 23h29m left, seconds dropped.
        let now = 30 * 60 + 59;
        let remaining = cooldown_remaining(last, now).unwrap();
        assert_eq!(hours_minutes(remaining), (23, 29));
    }

    #[test]
    fn test_cooldown_elapsed_is_none() {
        let last = 1_000_000;
        assert_eq!(cooldown_remaining(last, last + 24 * 3600), None);
        assert_eq!(cooldown_remaining(last, last + 24 * 3600 + 1), None);
    }

    #[test]
    fn test_cooldown_clock_skew_does_not_underflow() {
        // A record stamped "in the future" still gates, bounded by the
        // full window.
        let remaining = cooldown_remaining(2_000_000, 1_000_000).unwrap();
        assert_eq!(remaining, ATTEMPT_COOLDOWN);
    }

    #[test]
    fn test_shuffle_preserves_question_set() {
        let original: Vec<_> = (0..10).map(question).collect();
        let mut shuffled = original.clone();
        shuffle_questions(&mut shuffled);

        let mut ids: Vec<_> = shuffled.iter().map(|q| q.id).collect();
        ids.sort_by_key(|id| id.0);
        let expected: Vec<_> = original.iter().map(|q| q.id).collect();
        assert_eq!(ids, expected);
    }

    /// Every permutation of a three-question set should appear with
    /// roughly equal frequency over many shuffles.
    #[test]
    fn test_shuffle_is_roughly_uniform() {
        let base: Vec<_> = (0..3).map(question).collect();
        let trials = 6000;
        let mut counts: HashMap<Vec<i64>, u32> = HashMap::new();

        for _ in 0..trials {
            let mut attempt = base.clone();
            shuffle_questions(&mut attempt);
            let order: Vec<i64> = attempt.iter().map(|q| q.id.0).collect();
            *counts.entry(order).or_insert(0) += 1;
        }

        assert_eq!(counts.len(), 6, "all 6 permutations should occur");
        let expected = trials / 6;
        for (order, count) in counts {
            // Loose bound: ~1000 expected per permutation, allow +/-25%.
            assert!(
                count > expected * 3 / 4 && count < expected * 5 / 4,
                "permutation {:?} occurred {} times (expected ~{})",
                order,
                count,
                expected
            );
        }
    }
}
