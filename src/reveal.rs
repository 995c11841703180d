//! Incremental text renderer
//!
//! Reveals a reply a few characters at a time. The pure [`transition`]
//! function decides what happens; [`Renderer`] owns the state, the pending
//! timer handle and the callbacks, and executes the resulting effects.

mod effect;
mod event;
pub mod markup;
mod state;
mod task;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Prefix, RevealEffect};
pub use event::RevealEvent;
pub use markup::{Block, RevealFrame};
pub use state::RevealState;
pub use task::{spawn_reveal, Completion, RevealHandle, RevealUpdate};
pub use transition::{step_for, transition, RevealError, BATCH_SIZE, BATCH_THRESHOLD};

use crate::scheduler::{ManualScheduler, Scheduler, Tick};
use std::sync::Arc;
use std::time::Duration;

/// Delay between reveal ticks when the caller has no preference
pub const DEFAULT_SPEED: Duration = Duration::from_millis(2);

type PrefixSink = Box<dyn FnMut(&str) + Send>;
type CompletionFn = Box<dyn FnOnce() + Send>;

/// Executes renderer transitions against a [`Scheduler`]
pub struct Renderer<S: Scheduler> {
    state: RevealState,
    scheduler: S,
    /// Handle of the one tick this renderer may have outstanding
    pending: Option<S::Handle>,
    generation: u64,
    sink: PrefixSink,
    on_complete: Option<CompletionFn>,
    ticks: u64,
}

impl<S: Scheduler> Renderer<S> {
    /// Create an idle renderer. `sink` receives every emitted prefix.
    pub fn new(scheduler: S, sink: impl FnMut(&str) + Send + 'static) -> Self {
        Self {
            state: RevealState::Idle,
            scheduler,
            pending: None,
            generation: 0,
            sink: Box::new(sink),
            on_complete: None,
            ticks: 0,
        }
    }

    /// Start revealing `text`, replacing whatever was being revealed.
    ///
    /// A previous, unfired `on_complete` is dropped without being called.
    /// Empty text settles immediately and calls `on_complete` before
    /// returning.
    pub fn render(
        &mut self,
        text: impl Into<Arc<str>>,
        speed: Duration,
        on_complete: impl FnOnce() + Send + 'static,
    ) -> Result<(), RevealError> {
        if self.state.is_disposed() {
            return Err(RevealError::Disposed);
        }

        self.generation += 1;
        self.ticks = 0;
        self.on_complete = Some(Box::new(on_complete));

        let text = text.into();
        tracing::debug!(
            generation = self.generation,
            chars = text.chars().count(),
            speed_ms = %speed.as_millis(),
            "Starting reveal"
        );

        self.apply(RevealEvent::Render {
            text,
            speed,
            generation: self.generation,
        })
    }

    /// Deliver a tick from the scheduler
    pub fn on_tick(&mut self, tick: Tick) {
        if tick.generation == self.generation {
            // The timer behind this tick has fired; its handle is spent.
            self.pending = None;
            self.ticks += 1;
        }
        // Ticks never fail; only Render can be rejected.
        let _ = self.apply(RevealEvent::Tick(tick));
    }

    /// Discard the renderer. Nothing is emitted or called afterwards.
    pub fn dispose(&mut self) {
        if self.state.is_disposed() {
            return;
        }
        self.on_complete = None;
        let _ = self.apply(RevealEvent::Dispose);
        tracing::debug!(generation = self.generation, "Reveal disposed");
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    /// The prefix currently on screen
    pub fn shown_text(&self) -> &str {
        self.state.shown_text()
    }

    /// Display blocks for the current prefix
    pub fn frame(&self) -> RevealFrame {
        markup::frame(self.state.shown_text(), !self.state.is_revealing())
    }

    /// Number of `render` calls so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticks applied since the last `render`
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn has_pending_tick(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn apply(&mut self, event: RevealEvent) -> Result<(), RevealError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;
        for effect in result.effects {
            self.execute(effect);
        }
        Ok(())
    }

    fn execute(&mut self, effect: RevealEffect) {
        match effect {
            RevealEffect::CancelTick => {
                if let Some(handle) = self.pending.take() {
                    self.scheduler.cancel(handle);
                }
            }
            RevealEffect::ScheduleTick { delay, tick } => {
                let handle = self.scheduler.schedule(delay, tick);
                if let Some(stale) = self.pending.replace(handle) {
                    self.scheduler.cancel(stale);
                }
            }
            RevealEffect::Emit(prefix) => (self.sink)(prefix.as_str()),
            RevealEffect::Complete { generation } => {
                if generation != self.generation {
                    return;
                }
                if let Some(on_complete) = self.on_complete.take() {
                    tracing::debug!(generation, ticks = self.ticks, "Reveal settled");
                    on_complete();
                }
            }
        }
    }
}

impl Renderer<ManualScheduler> {
    /// Renderer on a fresh virtual clock
    pub fn manual(sink: impl FnMut(&str) + Send + 'static) -> Self {
        Self::new(ManualScheduler::new(), sink)
    }

    /// Advance the virtual clock by `by`, firing every tick that falls due.
    ///
    /// Ticks scheduled by earlier ticks inside the window fire too. Returns
    /// the number of ticks delivered.
    pub fn advance(&mut self, by: Duration) -> usize {
        let until = self.scheduler.now() + by;
        let mut fired = 0;
        while let Some(tick) = self.scheduler.pop_due(until) {
            self.on_tick(tick);
            fired += 1;
        }
        self.scheduler.set_now(until);
        fired
    }

    /// Fire ticks until nothing is pending. Returns the number delivered.
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.scheduler.next_deadline() {
            let by = deadline.saturating_sub(self.scheduler.now());
            fired += self.advance(by);
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recorder {
        emitted: Arc<Mutex<Vec<String>>>,
        completions: Arc<AtomicUsize>,
    }

    impl Recorder {
        fn new() -> (Self, Renderer<ManualScheduler>) {
            let emitted = Arc::new(Mutex::new(Vec::new()));
            let sink = emitted.clone();
            let renderer = Renderer::manual(move |prefix: &str| {
                sink.lock().unwrap().push(prefix.to_string());
            });
            (
                Self {
                    emitted,
                    completions: Arc::new(AtomicUsize::new(0)),
                },
                renderer,
            )
        }

        fn on_complete(&self) -> impl FnOnce() + Send + 'static {
            let completions = self.completions.clone();
            move || {
                completions.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn emitted(&self) -> Vec<String> {
            self.emitted.lock().unwrap().clone()
        }

        fn completions(&self) -> usize {
            self.completions.load(Ordering::SeqCst)
        }
    }

    const SLOW: Duration = Duration::from_millis(10);

    #[test]
    fn test_reveals_one_char_per_tick() {
        let (rec, mut renderer) = Recorder::new();
        renderer.render("abc", SLOW, rec.on_complete()).unwrap();

        assert_eq!(renderer.advance(SLOW), 1);
        assert_eq!(renderer.shown_text(), "a");
        assert_eq!(rec.completions(), 0);

        renderer.run_until_idle();
        assert_eq!(rec.emitted(), vec!["", "a", "ab", "abc"]);
        assert_eq!(rec.completions(), 1);
        assert_eq!(renderer.ticks(), 3);
        assert!(renderer.state().is_settled());
        assert!(!renderer.has_pending_tick());
    }

    #[test]
    fn test_fast_speed_batches_three_chars() {
        let (rec, mut renderer) = Recorder::new();
        renderer
            .render("abcdefg", Duration::from_millis(1), rec.on_complete())
            .unwrap();

        let fired = renderer.run_until_idle();
        assert_eq!(fired, 3);
        assert_eq!(rec.emitted(), vec!["", "abc", "abcdef", "abcdefg"]);
        assert_eq!(rec.completions(), 1);
    }

    #[test]
    fn test_zero_speed_still_terminates() {
        let (rec, mut renderer) = Recorder::new();
        renderer
            .render("x".repeat(10), Duration::ZERO, rec.on_complete())
            .unwrap();

        assert_eq!(renderer.advance(Duration::ZERO), 4);
        assert_eq!(rec.completions(), 1);
        assert_eq!(renderer.shown_text(), "x".repeat(10));
    }

    #[test]
    fn test_empty_text_completes_without_ticks() {
        let (rec, mut renderer) = Recorder::new();
        renderer.render("", SLOW, rec.on_complete()).unwrap();

        assert_eq!(rec.completions(), 1);
        assert_eq!(renderer.scheduler().pending(), 0);
        assert_eq!(renderer.run_until_idle(), 0);
        assert_eq!(rec.emitted(), vec![""]);
    }

    #[test]
    fn test_restart_fires_only_new_completion() {
        let (rec, mut renderer) = Recorder::new();
        let stale = Arc::new(AtomicUsize::new(0));
        let stale_hits = stale.clone();

        renderer
            .render("first reply", SLOW, move || {
                stale_hits.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        renderer.advance(SLOW * 3);
        assert_eq!(renderer.shown_text(), "fir");

        renderer.render("second", SLOW, rec.on_complete()).unwrap();
        assert_eq!(renderer.shown_text(), "");
        assert_eq!(renderer.scheduler().pending(), 1);

        renderer.run_until_idle();
        assert_eq!(stale.load(Ordering::SeqCst), 0);
        assert_eq!(rec.completions(), 1);
        assert_eq!(rec.emitted().last().map(String::as_str), Some("second"));
    }

    #[test]
    fn test_restart_after_settle_reveals_again() {
        let (rec, mut renderer) = Recorder::new();
        renderer.render("one", SLOW, rec.on_complete()).unwrap();
        renderer.run_until_idle();
        renderer.render("two", SLOW, rec.on_complete()).unwrap();
        renderer.run_until_idle();

        assert_eq!(rec.completions(), 2);
        assert_eq!(renderer.generation(), 2);
        assert_eq!(renderer.shown_text(), "two");
    }

    #[test]
    fn test_dispose_stops_everything() {
        let (rec, mut renderer) = Recorder::new();
        renderer.render("hello", SLOW, rec.on_complete()).unwrap();
        renderer.advance(SLOW * 2);
        let before = rec.emitted();

        renderer.dispose();
        assert_eq!(renderer.scheduler().pending(), 0);
        assert_eq!(renderer.scheduler().cancelled(), 1);

        // Deliver a tick by hand as if a timer had leaked
        renderer.on_tick(Tick { generation: 1 });
        renderer.advance(SLOW * 10);

        assert_eq!(rec.emitted(), before);
        assert_eq!(rec.completions(), 0);
        assert!(renderer.state().is_disposed());
        assert_eq!(
            renderer.render("again", SLOW, || {}),
            Err(RevealError::Disposed)
        );
    }

    #[test]
    fn test_frame_tracks_typing() {
        let (rec, mut renderer) = Recorder::new();
        renderer.render("- one\n- two", SLOW, rec.on_complete()).unwrap();
        renderer.advance(SLOW * 5);
        assert!(renderer.frame().typing);

        renderer.run_until_idle();
        let frame = renderer.frame();
        assert!(!frame.typing);
        assert_eq!(
            frame.blocks,
            vec![Block::BulletList(vec!["one".to_string(), "two".to_string()])]
        );
    }
}
