//! # Community Stats
//! Process-wide, best-effort cache of recent scores per question, used only to
//! show an illustrative "community average" next to a player's result.
//!
//! Contract: contents live in memory and are lost on restart. Nothing here is
//! authoritative; the persisted response log is.
//!
//! Both dimensions are bounded: samples per question (oldest dropped first)
//! and number of questions (the question first seen longest ago is evicted).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CommunityConfig;
use crate::scorer::round_to_decimals;
use crate::session::SessionResult;

static GLOBAL: OnceCell<CommunityStats> = OnceCell::new();

/// Aggregate view of one question's cached scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySummary {
    pub samples: usize,
    /// Mean score, rounded to 2 decimals.
    pub average: f64,
    pub best: f64,
}

/// Thread-safe keyed accumulator of per-question scores.
#[derive(Debug)]
pub struct CommunityStats {
    inner: Mutex<Inner>,
    cap: usize,
    max_questions: usize,
    enabled: bool,
}

#[derive(Debug, Default)]
struct Inner {
    samples: HashMap<String, VecDeque<f64>>,
    /// Question ids in first-seen order, for eviction.
    order: VecDeque<String>,
}

impl CommunityStats {
    pub fn new(cfg: &CommunityConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            cap: cfg.max_samples_per_question.max(1),
            max_questions: cfg.max_questions.max(1),
            enabled: cfg.enabled,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self::new(&CommunityConfig {
            enabled: true,
            max_samples_per_question: cap,
            ..CommunityConfig::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one score; drops the oldest sample once the question is at capacity.
    /// Non-finite scores are skipped so they cannot poison the average.
    pub fn record(&self, question_id: &str, score: f64) {
        if !self.enabled {
            return;
        }
        if !score.is_finite() {
            debug!(question = question_id, "skipping non-finite score");
            return;
        }

        let mut inner = self.inner.lock().expect("community stats mutex poisoned");
        if !inner.samples.contains_key(question_id) {
            while inner.order.len() >= self.max_questions {
                match inner.order.pop_front() {
                    Some(old) => {
                        inner.samples.remove(&old);
                        debug!(question = %old, "evicting community stats");
                    }
                    None => break,
                }
            }
            inner.order.push_back(question_id.to_string());
        }
        let buf = inner.samples.entry(question_id.to_string()).or_default();
        buf.push_back(score);
        while buf.len() > self.cap {
            buf.pop_front();
        }
    }

    /// Record every result of a finalised session, misses included.
    pub fn record_session(&self, session: &SessionResult) {
        for r in &session.results {
            self.record(&r.question_id, r.judgement.score);
        }
    }

    pub fn summary(&self, question_id: &str) -> Option<CommunitySummary> {
        let inner = self.inner.lock().expect("community stats mutex poisoned");
        let buf = inner.samples.get(question_id)?;
        if buf.is_empty() {
            return None;
        }

        let sum: f64 = buf.iter().sum();
        let best = buf.iter().copied().fold(f64::MIN, f64::max);
        Some(CommunitySummary {
            samples: buf.len(),
            average: round_to_decimals(sum / buf.len() as f64),
            best,
        })
    }

    /// Number of questions with at least one sample.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("community stats mutex poisoned")
            .samples
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock().expect("community stats mutex poisoned");
        let dropped = inner.samples.len();
        inner.samples.clear();
        inner.order.clear();
        info!(questions = dropped, "community stats reset");
    }
}

impl Default for CommunityStats {
    fn default() -> Self {
        Self::new(&CommunityConfig::default())
    }
}

/// Install the process-wide instance with explicit settings.
/// Returns `false` if it was already created (first caller wins).
pub fn init_global(cfg: &CommunityConfig) -> bool {
    GLOBAL.set(CommunityStats::new(cfg)).is_ok()
}

/// Process-wide instance; created with defaults on first use.
pub fn global() -> &'static CommunityStats {
    GLOBAL.get_or_init(CommunityStats::default)
}
