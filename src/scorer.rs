//! # Interval Scorer
//! Pure logic mapping a declared 95% interval and the true answer to a reward.
//! No I/O, no state; safe to call from any number of threads.
//!
//! Policy: a miss scores 0. A hit is scored in log10 space so that ranges
//! around small and large answers are judged comparably. An exact guess
//! (zero-width interval sitting on the answer) is widened by ±5% and the
//! result is tripled.
//!
//! The browser preview computes the same formula; keep the operation order
//! below untouched so both sides agree bit-for-bit.

use serde::{Deserialize, Serialize};

/// Offset added before `log10` so that zero and small negative bounds stay in the domain.
pub const LOG_OFFSET: f64 = 1.1;
/// Factors applied to the bounds of an exact guess (a ±5% buffer).
pub const EXACT_GUESS_LOWER_FACTOR: f64 = 0.95;
pub const EXACT_GUESS_UPPER_FACTOR: f64 = 1.05;
/// Multiplier applied to the buffered score of an exact guess.
pub const EXACT_GUESS_BONUS: f64 = 3.0;
/// Decimal places kept by [`total_score`].
pub const SCORE_DECIMALS: i32 = 2;

/// User-declared confidence range for one question.
///
/// Construction does not validate `lower <= upper`; an inverted interval
/// simply never contains the answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn is_ordered(&self) -> bool {
        self.lower <= self.upper
    }

    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// Inclusive containment, same as [`in_bounds`].
    pub fn contains(&self, value: f64) -> bool {
        in_bounds(self.lower, self.upper, value)
    }
}

/// Outcome of scoring one interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgement {
    pub hit: bool,
    pub score: f64,
}

/// Intermediate terms of the log-space formula, for explanation screens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub upper_log: f64,
    pub lower_log: f64,
    pub answer_log: f64,
    pub width_log: f64,
    pub centered_term: f64,
    pub normalized_square: f64,
    /// Core formula output, before any exact-guess bonus.
    pub raw_score: f64,
    pub exact_guess: bool,
    /// Final score as recorded.
    pub score: f64,
}

/// Inclusive hit test: `lower <= true_value <= upper`.
#[inline]
pub fn in_bounds(lower: f64, upper: f64, true_value: f64) -> bool {
    true_value >= lower && true_value <= upper
}

/// Score one interval against the true value. Misses return exactly `0.0`.
///
/// Non-finite inputs are not guarded: NaN/∞ propagate through the arithmetic.
pub fn compute_score(lower: f64, upper: f64, true_value: f64) -> f64 {
    explain(lower, upper, true_value).map_or(0.0, |b| b.score)
}

/// Same as [`compute_score`] but returns every intermediate term. `None` on a miss.
pub fn explain(lower: f64, upper: f64, true_value: f64) -> Option<ScoreBreakdown> {
    if !in_bounds(lower, upper, true_value) {
        return None;
    }

    if lower == true_value && upper == true_value {
        let adjusted_lower = lower * EXACT_GUESS_LOWER_FACTOR;
        let adjusted_upper = upper * EXACT_GUESS_UPPER_FACTOR;
        let mut b = core_formula(adjusted_lower, adjusted_upper, true_value);
        b.exact_guess = true;
        b.score = b.raw_score * EXACT_GUESS_BONUS;
        return Some(b);
    }

    Some(core_formula(lower, upper, true_value))
}

/// Hit flag and score in one call.
pub fn judge(interval: Interval, true_value: f64) -> Judgement {
    let hit = interval.contains(true_value);
    let score = if hit {
        compute_score(interval.lower, interval.upper, true_value)
    } else {
        0.0
    };
    Judgement { hit, score }
}

/// Sum of per-question scores rounded to 2 decimals. Empty input gives `0.0`.
pub fn total_score(scores: &[f64]) -> f64 {
    total_score_iter(scores.iter().copied())
}

pub fn total_score_iter<I>(scores: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let sum: f64 = scores.into_iter().sum();
    round_to_decimals(sum)
}

pub(crate) fn round_to_decimals(x: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (x * factor).round() / factor
}

fn core_formula(lower: f64, upper: f64, true_value: f64) -> ScoreBreakdown {
    let upper_log = (upper + LOG_OFFSET).log10();
    let lower_log = (lower + LOG_OFFSET).log10();
    let answer_log = (true_value + LOG_OFFSET).log10();
    let width_log = upper_log - lower_log;
    let centered_term = answer_log - 2.0 * upper_log - 2.0 * lower_log;
    let normalized_square = (centered_term / width_log).powi(2);
    let raw_score = (width_log / 4.0 + 2.0 * normalized_square).sqrt();

    ScoreBreakdown {
        upper_log,
        lower_log,
        answer_log,
        width_log,
        centered_term,
        normalized_square,
        raw_score,
        exact_guess: false,
        score: raw_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_below_and_above_scores_zero() {
        assert_eq!(compute_score(10.0, 20.0, 9.999), 0.0);
        assert_eq!(compute_score(10.0, 20.0, 20.001), 0.0);
        assert!(!in_bounds(10.0, 20.0, 9.999));
        assert!(!in_bounds(10.0, 20.0, 20.001));
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert!(in_bounds(5.0, 10.0, 5.0));
        assert!(in_bounds(5.0, 10.0, 10.0));
        assert!(compute_score(5.0, 10.0, 5.0) > 0.0);
        assert!(compute_score(5.0, 10.0, 10.0) > 0.0);
    }

    #[test]
    fn exact_guess_is_tripled_buffered_score() {
        let exact = compute_score(100.0, 100.0, 100.0);
        let buffered = compute_score(95.0, 105.0, 100.0);
        assert!(exact > 0.0);
        assert!((exact - 3.0 * buffered).abs() < 1e-9);
    }

    #[test]
    fn narrow_hit_beats_wide_hit() {
        let narrow = compute_score(8700.0, 9000.0, 8849.0);
        let wide = compute_score(2000.0, 15000.0, 8849.0);
        assert!(wide > 0.0);
        assert!(narrow > wide);
    }

    #[test]
    fn everest_reference_value() {
        let s = compute_score(8000.0, 9500.0, 8849.0);
        assert!((s - 223.905_858_747_494_96).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn inverted_interval_is_a_miss() {
        assert_eq!(compute_score(20.0, 10.0, 15.0), 0.0);
        assert_eq!(compute_score(20.0, 10.0, 20.0), 0.0);
        assert!(!Interval::new(20.0, 10.0).is_ordered());
    }

    #[test]
    fn zero_and_negative_bounds_do_not_panic() {
        assert!(compute_score(0.0, 10.0, 5.0) > 0.0);
        assert!(compute_score(-1.0, 1.0, 0.0) > 0.0);
        // exact guess at zero collapses the buffered width; infinity is accepted
        assert!(compute_score(0.0, 0.0, 0.0).is_infinite());
    }

    #[test]
    fn nan_input_propagates_without_panic() {
        // NaN never compares true, so the hit test fails
        assert_eq!(compute_score(f64::NAN, 10.0, 5.0), 0.0);
        assert!(!in_bounds(0.0, 10.0, f64::NAN));
        assert!(compute_score(0.0, f64::INFINITY, 5.0).is_nan());
    }

    #[test]
    fn explain_matches_compute_score() {
        let b = explain(8000.0, 9500.0, 8849.0).unwrap();
        assert!(!b.exact_guess);
        assert_eq!(b.score, compute_score(8000.0, 9500.0, 8849.0));
        assert_eq!(b.raw_score, b.score);
        assert!(b.width_log > 0.0);

        let e = explain(100.0, 100.0, 100.0).unwrap();
        assert!(e.exact_guess);
        assert_eq!(e.score, e.raw_score * EXACT_GUESS_BONUS);
        assert_eq!(e.score, compute_score(100.0, 100.0, 100.0));

        assert!(explain(1.0, 2.0, 3.0).is_none());
    }

    #[test]
    fn judge_pairs_hit_and_score() {
        let hit = judge(Interval::new(8000.0, 9500.0), 8849.0);
        assert!(hit.hit && hit.score > 0.0);

        let miss = judge(Interval::new(1.0, 2.0), 8849.0);
        assert_eq!(miss, Judgement { hit: false, score: 0.0 });
    }

    #[test]
    fn total_score_rounds_to_two_decimals() {
        assert_eq!(total_score(&[]), 0.0);
        assert_eq!(total_score(&[10.0, 20.456, 5.0]), 35.46);
        assert_eq!(total_score_iter(vec![1.004, 1.004]), 2.01);
    }
}
