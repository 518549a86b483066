/*!
 * Barrier Integration Tests
 *
 * Phase accounting, completion ordering, and cohort shrinking
 */

use lazy_rendezvous::{Barrier, StrategyType, SyncConfig, SyncError};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const STRATEGIES: [StrategyType; 3] = [
    StrategyType::Futex,
    StrategyType::Condvar,
    StrategyType::SpinWait,
];

#[test]
fn test_completion_runs_once_per_round() {
    for strategy in STRATEGIES {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let barrier = Arc::new(
            Barrier::with_completion_and_config(
                3,
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                SyncConfig {
                    strategy,
                    ..Default::default()
                },
            )
            .unwrap(),
        );

        let workers: Vec<_> = (0..3u64)
            .map(|i| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.arrive_and_wait(1).unwrap();
                    thread::sleep(Duration::from_millis(5 * i));
                    barrier.arrive_and_wait(1).unwrap();
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(runs.load(Ordering::SeqCst), 2, "{:?}", strategy);
        assert_eq!(barrier.phase(), 2);
    }
}

#[test]
fn test_completion_happens_before_release() {
    const PARTIES: usize = 4;
    const PHASES: usize = 25;

    let completed = Arc::new(AtomicUsize::new(0));
    let counter = completed.clone();
    let barrier = Arc::new(
        Barrier::with_completion(PARTIES, move || {
            // Widen the window in which an early release would be visible
            thread::sleep(Duration::from_micros(200));
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap(),
    );
    let violation = Arc::new(AtomicBool::new(false));

    let workers: Vec<_> = (0..PARTIES)
        .map(|_| {
            let barrier = barrier.clone();
            let completed = completed.clone();
            let violation = violation.clone();
            thread::spawn(move || {
                for phase in 0..PHASES {
                    let token = barrier.arrive_and_wait(1).unwrap();
                    assert_eq!(token.phase(), phase as u64);
                    if completed.load(Ordering::SeqCst) < phase + 1 {
                        violation.store(true, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert!(!violation.load(Ordering::SeqCst));
    assert_eq!(completed.load(Ordering::SeqCst), PHASES);
}

#[test]
fn test_exactly_one_completer_per_phase() {
    const PARTIES: usize = 5;
    let barrier = Arc::new(Barrier::new(PARTIES).unwrap());
    let completers = Arc::new(AtomicUsize::new(0));

    let workers: Vec<_> = (0..PARTIES)
        .map(|_| {
            let barrier = barrier.clone();
            let completers = completers.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    if barrier.arrive_and_wait(1).unwrap().completed_phase() {
                        completers.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(completers.load(Ordering::SeqCst), 10);
}

#[test]
fn test_split_arrive_and_wait() {
    let barrier = Arc::new(Barrier::new(2).unwrap());

    // Arrive now, do unrelated work, then wait on the token
    let token = barrier.arrive(1).unwrap();
    assert_eq!(token.phase(), 0);

    let partner = {
        let barrier = barrier.clone();
        thread::spawn(move || barrier.arrive_and_wait(1).unwrap())
    };

    barrier.wait(token);
    partner.join().unwrap();
    assert_eq!(barrier.phase(), 1);

    // A stale token never blocks
    barrier.wait(token);
}

#[test]
fn test_arrive_and_drop_reduces_cohort() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let barrier = Arc::new(
        Barrier::with_completion(3, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap(),
    );

    let leaver = {
        let barrier = barrier.clone();
        thread::spawn(move || barrier.arrive_and_drop().unwrap())
    };

    let stayers: Vec<_> = (0..2)
        .map(|_| {
            let barrier = barrier.clone();
            thread::spawn(move || {
                for _ in 0..3 {
                    barrier.arrive_and_wait(1).unwrap();
                }
            })
        })
        .collect();

    leaver.join().unwrap();
    for stayer in stayers {
        stayer.join().unwrap();
    }

    assert_eq!(barrier.capacity(), 2);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}

#[test]
fn test_over_arrival_rejected() {
    let barrier = Barrier::new(3).unwrap();
    barrier.arrive(2).unwrap();

    assert_eq!(
        barrier.arrive(2),
        Err(SyncError::BarrierOverflow {
            requested: 2,
            remaining: 1,
            phase: 0
        })
    );
    // State untouched: the last arrival still completes the phase
    assert!(barrier.arrive(1).unwrap().completed_phase());
}
