/*!
 * Semaphore Integration Tests
 *
 * Bounded concurrency, cross-thread release, and timed acquisition
 */

use lazy_rendezvous::{BinarySemaphore, CountingSemaphore, StrategyType, SyncConfig, SyncError};
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const STRATEGIES: [StrategyType; 3] = [
    StrategyType::Futex,
    StrategyType::Condvar,
    StrategyType::SpinWait,
];

/// Run `workers` threads that each hold a permit briefly; return peak holders
fn peak_holders<const MAX: usize>(sem: Arc<CountingSemaphore<MAX>>, workers: usize) -> usize {
    let holding = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..workers)
        .map(|i| {
            let sem = sem.clone();
            let holding = holding.clone();
            let peak = peak.clone();
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(i as u64);
                sem.acquire();
                let now = holding.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(rng.gen_range(5..20)));
                holding.fetch_sub(1, Ordering::SeqCst);
                sem.release(1).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    peak.load(Ordering::SeqCst)
}

#[test]
fn test_counting_semaphore_bounds_concurrency() {
    for strategy in STRATEGIES {
        let sem = Arc::new(
            CountingSemaphore::<10>::with_config(
                3,
                SyncConfig {
                    strategy,
                    ..Default::default()
                },
            )
            .unwrap(),
        );

        let peak = peak_holders(sem.clone(), 10);
        assert!(peak <= 3, "{:?}: {} holders at once", strategy, peak);
        assert!(peak >= 1);
        assert_eq!(sem.available(), 3);
    }
}

#[test]
fn test_binary_semaphore_is_exclusive() {
    let sem = Arc::new(BinarySemaphore::new(1).unwrap());
    assert_eq!(peak_holders(sem.clone(), 10), 1);
    assert_eq!(sem.available(), 1);
}

#[test]
fn test_at_most_initial_acquires_without_release() {
    let sem = CountingSemaphore::<8>::new(5).unwrap();
    let acquired = (0..8).filter(|_| sem.try_acquire()).count();
    assert_eq!(acquired, 5);
}

#[test]
fn test_release_unblocks_waiting_acquirers() {
    for strategy in STRATEGIES {
        let sem = Arc::new(
            CountingSemaphore::<4>::with_config(
                0,
                SyncConfig {
                    strategy,
                    ..Default::default()
                },
            )
            .unwrap(),
        );
        let acquired = Arc::new(AtomicUsize::new(0));

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let sem = sem.clone();
                let acquired = acquired.clone();
                thread::spawn(move || {
                    sem.acquire();
                    acquired.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(30));
        assert_eq!(acquired.load(Ordering::SeqCst), 0);

        sem.release(4).unwrap();
        for waiter in waiters {
            waiter.join().unwrap();
        }
        assert_eq!(acquired.load(Ordering::SeqCst), 4);
        assert_eq!(sem.available(), 0);
    }
}

#[test]
fn test_timed_acquire_succeeds_when_released() {
    let sem = Arc::new(BinarySemaphore::new(0).unwrap());

    let releaser = {
        let sem = sem.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            sem.release(1).unwrap();
        })
    };

    assert!(sem.try_acquire_for(Duration::from_secs(5)));
    releaser.join().unwrap();
}

#[test]
fn test_timed_acquire_deadline() {
    let sem = CountingSemaphore::<2>::new(0).unwrap();
    let start = Instant::now();

    assert!(!sem.try_acquire_until(start + Duration::from_millis(60)));
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(60));
    assert!(elapsed < Duration::from_secs(2));
}

#[test]
fn test_over_release_rejected() {
    let sem = BinarySemaphore::new(1).unwrap();
    assert_eq!(
        sem.release(1),
        Err(SyncError::SemaphoreOverflow {
            requested: 1,
            available: 1,
            max: 1
        })
    );
    assert_eq!(sem.available(), 1);
}
