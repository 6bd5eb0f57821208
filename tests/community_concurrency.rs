// tests/community_concurrency.rs
//
// Scorer and community cache used from many threads at once.

use std::sync::Arc;
use std::thread;

use calibration_scorer::community::CommunityStats;
use calibration_scorer::compute_score;
use parking_lot::Mutex;

#[test]
fn parallel_scoring_matches_sequential() {
    let inputs: Vec<(f64, f64, f64)> = (1..=64)
        .map(|i| {
            let i = i as f64;
            (i * 10.0, i * 20.0, i * 15.0)
        })
        .collect();
    let expected: Vec<f64> = inputs.iter().map(|&(l, u, t)| compute_score(l, u, t)).collect();

    let collected = Arc::new(Mutex::new(vec![0.0; inputs.len()]));
    let handles: Vec<_> = inputs
        .iter()
        .copied()
        .enumerate()
        .map(|(idx, (l, u, t))| {
            let out = Arc::clone(&collected);
            thread::spawn(move || {
                let s = compute_score(l, u, t);
                out.lock()[idx] = s;
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    // bit-identical, not just close
    assert_eq!(*collected.lock(), expected);
}

#[test]
fn concurrent_records_are_all_counted() {
    let stats = Arc::new(CommunityStats::with_capacity(10_000));
    let threads = 8;
    let per_thread = 250;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let s = Arc::clone(&stats);
            thread::spawn(move || {
                for _ in 0..per_thread {
                    s.record("everest", 2.0);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let sum = stats.summary("everest").unwrap();
    assert_eq!(sum.samples, threads * per_thread);
    assert_eq!(sum.average, 2.0);
}
