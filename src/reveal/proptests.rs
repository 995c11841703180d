//! Property-based tests for the renderer
//!
//! These check the reveal guarantees across arbitrary texts, speeds and
//! restart/disposal points.

use super::*;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    renderer: Renderer<ManualScheduler>,
    emitted: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn new() -> Self {
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let sink = emitted.clone();
        let renderer = Renderer::manual(move |prefix: &str| {
            sink.lock().unwrap().push(prefix.to_string());
        });
        Self { renderer, emitted }
    }

    fn emitted(&self) -> Vec<String> {
        self.emitted.lock().unwrap().clone()
    }
}

fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let inner = hits.clone();
    (hits, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 .,\n-]{0,60}",
        "\\PC{0,30}",
        Just("1. Rest\n2. Drink water\n\n**See a doctor**".to_string()),
    ]
}

fn arb_speed() -> impl Strategy<Value = Duration> {
    (0u64..8).prop_map(Duration::from_millis)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_reveal_is_monotonic_and_complete(text in arb_text(), speed in arb_speed()) {
        let mut h = Harness::new();
        let (hits, on_complete) = counter();
        h.renderer.render(text.as_str(), speed, on_complete).unwrap();
        h.renderer.run_until_idle();

        let emitted = h.emitted();
        prop_assert_eq!(emitted.first().map(String::as_str), Some(""));
        prop_assert_eq!(emitted.last(), Some(&text));
        for pair in emitted.windows(2) {
            prop_assert!(pair[0].len() <= pair[1].len());
            prop_assert!(pair[1].starts_with(pair[0].as_str()));
        }
        prop_assert_eq!(hits.load(Ordering::SeqCst), 1);
        prop_assert!(h.renderer.state().is_settled());
    }

    #[test]
    fn prop_tick_count_is_linear(text in arb_text(), speed in arb_speed()) {
        let mut h = Harness::new();
        h.renderer.render(text.as_str(), speed, || {}).unwrap();
        let fired = h.renderer.run_until_idle();

        let chars = text.chars().count();
        let step = step_for(speed);
        prop_assert_eq!(fired, chars.div_ceil(step));
    }

    #[test]
    fn prop_completion_fires_after_last_emission(text in arb_text(), speed in arb_speed()) {
        let mut h = Harness::new();
        let emitted = h.emitted.clone();
        let expected = text.clone();
        let seen_at_completion = Arc::new(Mutex::new(None));
        let slot = seen_at_completion.clone();

        h.renderer.render(text.as_str(), speed, move || {
            let last = emitted.lock().unwrap().last().cloned();
            *slot.lock().unwrap() = Some(last);
        }).unwrap();
        h.renderer.run_until_idle();

        let seen = seen_at_completion.lock().unwrap().clone();
        prop_assert_eq!(seen, Some(Some(expected)));
    }

    #[test]
    fn prop_restart_completes_exactly_once(
        first in arb_text(),
        second in arb_text(),
        speed in arb_speed(),
        ticks_before in 0usize..10,
    ) {
        let mut h = Harness::new();
        let (first_hits, first_done) = counter();
        let (second_hits, second_done) = counter();

        h.renderer.render(first.as_str(), speed, first_done).unwrap();
        for _ in 0..ticks_before {
            if !h.renderer.state().is_revealing() {
                break;
            }
            let step = h.renderer.scheduler().next_deadline().unwrap_or_default();
            h.renderer.advance(step.saturating_sub(h.renderer.scheduler().now()));
        }
        let first_settled = h.renderer.state().is_settled();

        h.renderer.render(second.as_str(), speed, second_done).unwrap();
        h.renderer.run_until_idle();

        let total = first_hits.load(Ordering::SeqCst) + second_hits.load(Ordering::SeqCst);
        if first_settled {
            prop_assert_eq!(total, 2);
        } else {
            prop_assert_eq!(first_hits.load(Ordering::SeqCst), 0);
            prop_assert_eq!(total, 1);
        }
        prop_assert_eq!(second_hits.load(Ordering::SeqCst), 1);
        prop_assert_eq!(h.renderer.shown_text(), second.as_str());
    }

    #[test]
    fn prop_no_activity_after_dispose(
        text in arb_text(),
        speed in arb_speed(),
        ticks_before in 0usize..5,
    ) {
        let mut h = Harness::new();
        let (hits, on_complete) = counter();
        h.renderer.render(text.as_str(), speed, on_complete).unwrap();
        for _ in 0..ticks_before {
            h.renderer.advance(speed);
        }
        let completed_before = hits.load(Ordering::SeqCst);

        h.renderer.dispose();
        let emitted_at_dispose = h.emitted();
        h.renderer.on_tick(Tick { generation: h.renderer.generation() });
        h.renderer.advance(Duration::from_secs(10));

        prop_assert_eq!(h.emitted(), emitted_at_dispose);
        prop_assert_eq!(hits.load(Ordering::SeqCst), completed_before);
        prop_assert_eq!(h.renderer.scheduler().pending(), 0);
    }
}
