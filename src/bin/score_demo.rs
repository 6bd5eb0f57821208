//! Demo that replays a sample session through the scorer and prints the results as JSON.
//!
//! `score_demo`                      -> scores a built-in three-question session
//! `score_demo <lower> <upper> <true>` -> explains a single interval

use anyhow::{Context, Result};
use calibration_scorer::{community, config, explain, finalize_session, telemetry, Answer};

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cfg = config::load_default().context("loading configuration")?;
    telemetry::init_tracing(&cfg.log_filter, false);
    community::init_global(&cfg.community);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [lower, upper, truth] = args.as_slice() {
        let lower: f64 = lower.parse().context("parsing <lower>")?;
        let upper: f64 = upper.parse().context("parsing <upper>")?;
        let truth: f64 = truth.parse().context("parsing <true>")?;
        let out = serde_json::json!({
            "hit": calibration_scorer::in_bounds(lower, upper, truth),
            "score": calibration_scorer::compute_score(lower, upper, truth),
            "breakdown": explain(lower, upper, truth),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let answers = [
        Answer::new("everest-height-m", 8000.0, 9500.0, 8849.0),
        Answer::new("moon-distance-km", 350_000.0, 390_000.0, 384_400.0),
        Answer::new("adult-bones", 206.0, 206.0, 206.0),
    ];
    let result = finalize_session(&answers, &cfg.session)?;

    let stats = community::global();
    stats.record_session(&result);

    println!("{}", serde_json::to_string_pretty(&result)?);
    for a in &answers {
        if let Some(s) = stats.summary(&a.question_id) {
            println!(
                "{}: community average {:.2} over {} sample(s)",
                a.question_id, s.average, s.samples
            );
        }
    }

    Ok(())
}
