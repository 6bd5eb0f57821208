//! # Session Finalisation
//! Turns the answers of one daily session into per-question judgements and a
//! session total. Pure; the request handler that calls it owns persistence.
//!
//! Input is validated here rather than in the scorer: the scorer stays a
//! direct mirror of the client-side preview, while the session boundary
//! refuses to record NaN/∞ or malformed batches. A finite answer can still
//! score ∞ or NaN (exact guess at 0 or below); such sessions are rejected
//! too, so every recorded score and total is finite.

use std::collections::BTreeSet;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::scorer::{self, Interval, Judgement};
use crate::telemetry::{
    METRIC_INTERVALS_SCORED, METRIC_SESSIONS_FINALIZED, METRIC_SESSIONS_REJECTED,
};

fn default_questions() -> usize {
    3
}
fn default_require_full() -> bool {
    true
}

/// How many answers a session expects and whether partial sessions are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionPolicy {
    #[serde(default = "default_questions")]
    pub questions_per_session: usize,
    #[serde(default = "default_require_full")]
    pub require_full_session: bool,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            questions_per_session: default_questions(),
            require_full_session: default_require_full(),
        }
    }
}

/// One submitted answer, as received from the handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub lower: f64,
    pub upper: f64,
    pub true_value: f64,
}

impl Answer {
    pub fn new(question_id: impl Into<String>, lower: f64, upper: f64, true_value: f64) -> Self {
        Self {
            question_id: question_id.into(),
            lower,
            upper,
            true_value,
        }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.lower, self.upper)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub interval: Interval,
    pub true_value: f64,
    #[serde(flatten)]
    pub judgement: Judgement,
}

/// Complete outcome of a finalised session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// In submission order.
    pub results: Vec<QuestionResult>,
    /// Sum of scores rounded to 2 decimals.
    pub total_score: f64,
    pub hits: usize,
    pub questions: usize,
}

/// Validate a batch of answers and score it.
pub fn finalize_session(
    answers: &[Answer],
    policy: &SessionPolicy,
) -> Result<SessionResult, SessionError> {
    if let Err(e) = validate(answers, policy) {
        return Err(reject(e, answers.len()));
    }

    let mut results = Vec::with_capacity(answers.len());
    for a in answers {
        let interval = a.interval();
        if !interval.is_ordered() {
            warn!(
                question = %a.question_id,
                lower = a.lower,
                upper = a.upper,
                "inverted interval, scoring as a miss"
            );
        }

        let judgement = scorer::judge(interval, a.true_value);
        // exact guesses at 0 or below leave the formula's domain (∞ / NaN)
        if !judgement.score.is_finite() {
            let e = SessionError::NonFiniteScore {
                question_id: a.question_id.clone(),
            };
            return Err(reject(e, answers.len()));
        }
        debug!(
            question = %a.question_id,
            hit = judgement.hit,
            score = judgement.score,
            "answer judged"
        );

        results.push(QuestionResult {
            question_id: a.question_id.clone(),
            interval,
            true_value: a.true_value,
            judgement,
        });
    }

    let total_score = scorer::total_score_iter(results.iter().map(|r| r.judgement.score));
    let hits = results.iter().filter(|r| r.judgement.hit).count();

    for r in &results {
        let outcome = if r.judgement.hit { "hit" } else { "miss" };
        counter!(METRIC_INTERVALS_SCORED, "outcome" => outcome).increment(1);
    }

    counter!(METRIC_SESSIONS_FINALIZED).increment(1);
    info!(
        questions = results.len(),
        hits,
        total_score,
        "session finalized"
    );

    Ok(SessionResult {
        questions: results.len(),
        results,
        total_score,
        hits,
    })
}

fn validate(answers: &[Answer], policy: &SessionPolicy) -> Result<(), SessionError> {
    if answers.is_empty() {
        return Err(SessionError::Empty);
    }

    if policy.require_full_session && answers.len() != policy.questions_per_session {
        return Err(SessionError::WrongQuestionCount {
            expected: policy.questions_per_session,
            actual: answers.len(),
        });
    }

    let mut seen = BTreeSet::new();
    for a in answers {
        if !seen.insert(a.question_id.as_str()) {
            return Err(SessionError::DuplicateQuestion(a.question_id.clone()));
        }
        if !(a.interval().is_finite() && a.true_value.is_finite()) {
            return Err(SessionError::NonFiniteInput {
                question_id: a.question_id.clone(),
            });
        }
    }

    Ok(())
}

fn reject(e: SessionError, answers: usize) -> SessionError {
    counter!(METRIC_SESSIONS_REJECTED, "reason" => reject_reason(&e)).increment(1);
    warn!(error = %e, answers, "session rejected");
    e
}

fn reject_reason(e: &SessionError) -> &'static str {
    match e {
        SessionError::Empty => "empty",
        SessionError::WrongQuestionCount { .. } => "wrong_count",
        SessionError::DuplicateQuestion(_) => "duplicate",
        SessionError::NonFiniteInput { .. } => "non_finite",
        SessionError::NonFiniteScore { .. } => "non_finite_score",
    }
}
