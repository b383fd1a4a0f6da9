use crate::{
    clock::Clock,
    config::SpinConfig,
    error::{RouletteError, RouletteResult},
    resolver::resolve_nonzero,
    rng::RandomSource,
    scheduler::{FrameScheduler, FrameToken},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::{debug, info, trace};

/// Cubic ease-out: fast start, decelerating into 1.
pub fn ease_out_cubic(t: f64) -> f64 {
    if t < 1.0 {
        1.0 - (1.0 - t).powi(3)
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Episode {
    pub start_time: Duration,
    pub duration: Duration,
    /// Random stopping offset in `[0, 2π)`, added on top of the eased turns.
    pub target_offset: f64,
    /// Rotation the wheel was resting at when the spin began.
    pub start_rotation: f64,
    pub item_count: NonZeroUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpinState {
    #[default]
    Idle,
    Spinning(Episode),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub rotation: f64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinTrigger {
    Started,
    /// A spin was already running; nothing changed.
    AlreadySpinning,
    /// The engine was torn down and no longer spins.
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinEvent {
    Started { duration: Duration, target_offset: f64 },
    Rotated(f64),
    Settled(SpinOutcome),
}

pub trait SpinListener {
    fn on_event(&mut self, event: &SpinEvent);
}

impl<F: FnMut(&SpinEvent)> SpinListener for F {
    fn on_event(&mut self, event: &SpinEvent) {
        self(event);
    }
}

/// Drives one spin at a time from trigger to settlement.
///
/// Time comes from the injected [`Clock`] and frames from the injected
/// [`FrameScheduler`], so elapsed time rather than frame count shapes the
/// animation. Dropping the engine cancels its pending frame.
pub struct SpinEngine<C: Clock, S: FrameScheduler, R: RandomSource> {
    clock: C,
    scheduler: S,
    rng: R,
    config: SpinConfig,
    state: SpinState,
    rotation: f64,
    pending: Option<FrameToken>,
    listeners: Vec<Box<dyn SpinListener>>,
    torn_down: bool,
}

impl<C: Clock, S: FrameScheduler, R: RandomSource> SpinEngine<C, S, R> {
    pub fn new(clock: C, scheduler: S, rng: R, config: SpinConfig) -> Self {
        Self {
            clock,
            scheduler,
            rng,
            config,
            state: SpinState::Idle,
            rotation: 0.0,
            pending: None,
            listeners: Vec::new(),
            torn_down: false,
        }
    }

    pub fn subscribe(&mut self, listener: impl SpinListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Starts a spin over `item_count` wedges and emits its first frame.
    ///
    /// # Errors
    ///
    /// [`RouletteError::InvalidItemCount`] for an empty wheel.
    pub fn spin(&mut self, item_count: usize) -> RouletteResult<SpinTrigger> {
        if self.torn_down {
            return Ok(SpinTrigger::TornDown);
        }
        let item_count =
            NonZeroUsize::new(item_count).ok_or(RouletteError::InvalidItemCount(item_count))?;
        if self.is_spinning() {
            debug!("spin requested while spinning, ignoring");
            return Ok(SpinTrigger::AlreadySpinning);
        }

        let duration_ms = self.rng.next_range(
            self.config.min_duration_ms as f64,
            self.config.max_duration_ms as f64,
        );
        let duration = Duration::from_secs_f64(duration_ms / 1000.0);
        let target_offset = self.rng.next_unit() * TAU;
        let episode = Episode {
            start_time: self.clock.now(),
            duration,
            target_offset,
            start_rotation: self.rotation,
            item_count,
        };
        debug!(
            duration_ms,
            target_offset,
            items = item_count.get(),
            "spin started"
        );
        self.state = SpinState::Spinning(episode);
        self.emit(SpinEvent::Started {
            duration,
            target_offset,
        });

        // draw right away; settling always waits for a scheduled frame
        self.rotation = self.rotation_at(&episode, self.progress_of(&episode));
        self.emit(SpinEvent::Rotated(self.rotation));
        self.pending = Some(self.scheduler.request_frame());
        Ok(SpinTrigger::Started)
    }

    /// Handles a scheduled frame. Returns the outcome on the frame that
    /// settles the spin. Tokens other than the one currently awaited are
    /// ignored.
    pub fn on_frame(&mut self, token: FrameToken) -> Option<SpinOutcome> {
        if self.torn_down || self.pending != Some(token) {
            trace!(?token, "stale frame ignored");
            return None;
        }
        self.pending = None;
        let SpinState::Spinning(episode) = self.state else {
            return None;
        };

        let progress = self.progress_of(&episode);
        self.rotation = self.rotation_at(&episode, progress);
        trace!(progress, rotation = self.rotation, "frame");
        self.emit(SpinEvent::Rotated(self.rotation));

        if progress < 1.0 {
            self.pending = Some(self.scheduler.request_frame());
            return None;
        }

        let outcome = SpinOutcome {
            rotation: self.rotation,
            index: resolve_nonzero(self.rotation, episode.item_count),
        };
        self.state = SpinState::Idle;
        info!(rotation = outcome.rotation, index = outcome.index, "spin settled");
        self.emit(SpinEvent::Settled(outcome));
        Some(outcome)
    }

    /// Cancels any pending frame and stops emitting. Later spins are
    /// refused with [`SpinTrigger::TornDown`].
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.state = SpinState::Idle;
        self.listeners.clear();
        self.torn_down = true;
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, SpinState::Spinning(_))
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn progress_of(&self, episode: &Episode) -> f64 {
        let elapsed = self.clock.now().saturating_sub(episode.start_time);
        if episode.duration.is_zero() {
            return 1.0;
        }
        elapsed.as_secs_f64() / episode.duration.as_secs_f64()
    }

    fn rotation_at(&self, episode: &Episode, progress: f64) -> f64 {
        let turns = TAU * f64::from(self.config.extra_turns);
        episode.start_rotation + ease_out_cubic(progress) * turns + episode.target_offset
    }

    fn emit(&mut self, event: SpinEvent) {
        for listener in &mut self.listeners {
            listener.on_event(&event);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            debug!(?token, "cancelling pending frame");
            self.scheduler.cancel_frame(token);
        }
    }
}

impl<C: Clock, S: FrameScheduler, R: RandomSource> Drop for SpinEngine<C, S, R> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::rng::SeededStream;
    use crate::scheduler::FrameQueue;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replays fixed values, cycling.
    struct Scripted(Vec<f64>, usize);

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f64 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    fn engine(values: Vec<f64>) -> (ManualClock, SpinEngine<ManualClock, FrameQueue, Scripted>) {
        let clock = ManualClock::new();
        let engine = SpinEngine::new(
            clock.clone(),
            FrameQueue::new(),
            Scripted(values, 0),
            SpinConfig::default(),
        );
        (clock, engine)
    }

    fn step(engine: &mut SpinEngine<ManualClock, FrameQueue, Scripted>) -> Option<SpinOutcome> {
        let token = engine.scheduler_mut().pop()?;
        engine.on_frame(token)
    }

    #[test]
    fn ease_boundaries_and_monotonic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(1.7), 1.0);
        let mut prev = 0.0;
        for i in 0..=1000 {
            let v = ease_out_cubic(f64::from(i) / 1000.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn samples_duration_and_offset() {
        // 0.5 -> 3500ms, 0.25 -> quarter turn
        let (_clock, mut engine) = engine(vec![0.5, 0.25]);
        assert_eq!(engine.spin(3), Ok(SpinTrigger::Started));
        let SpinState::Spinning(ep) = *engine.state() else {
            panic!("expected spinning");
        };
        assert_eq!(ep.duration, Duration::from_millis(3500));
        assert!((ep.target_offset - TAU / 4.0).abs() < 1e-12);
        assert!((engine.rotation() - TAU / 4.0).abs() < 1e-12);
    }

    #[test]
    fn zero_items_rejected() {
        let (_clock, mut engine) = engine(vec![0.5]);
        assert_eq!(engine.spin(0), Err(RouletteError::InvalidItemCount(0)));
        assert!(!engine.is_spinning());
        assert!(engine.scheduler().is_empty());
    }

    #[test]
    fn settles_once_after_duration() {
        let (clock, mut engine) = engine(vec![0.0, 0.1]);
        engine.spin(4).unwrap();
        let mut outcomes = Vec::new();
        let mut prev = engine.rotation();
        for _ in 0..200 {
            clock.advance(Duration::from_millis(16));
            if let Some(o) = step(&mut engine) {
                outcomes.push(o);
            }
            assert!(engine.rotation() >= prev);
            prev = engine.rotation();
        }
        assert_eq!(outcomes.len(), 1);
        assert!(!engine.is_spinning());
        assert!(engine.scheduler().is_empty());
        let expected = TAU * 10.0 + 0.1 * TAU;
        assert!((outcomes[0].rotation - expected).abs() < 1e-9);
        assert_eq!(outcomes[0].index, crate::resolve(expected, 4).unwrap());
    }

    #[test]
    fn reentrant_spin_is_ignored() {
        let (clock, mut engine) = engine(vec![0.3, 0.6]);
        let settled = Rc::new(RefCell::new(0));
        let counter = settled.clone();
        engine.subscribe(move |e: &SpinEvent| {
            if matches!(e, SpinEvent::Settled(_)) {
                *counter.borrow_mut() += 1;
            }
        });
        assert_eq!(engine.spin(5), Ok(SpinTrigger::Started));
        assert_eq!(engine.spin(5), Ok(SpinTrigger::AlreadySpinning));
        assert_eq!(engine.scheduler().len(), 1);
        clock.advance(Duration::from_secs(6));
        while step(&mut engine).is_none() && !engine.scheduler().is_empty() {}
        assert_eq!(*settled.borrow(), 1);
    }

    #[test]
    fn final_rotation_ignores_frame_timing() {
        let run = |frame_ms: u64| {
            let (clock, mut engine) = engine(vec![0.42, 0.77]);
            engine.spin(6).unwrap();
            loop {
                clock.advance(Duration::from_millis(frame_ms));
                if let Some(o) = step(&mut engine) {
                    return o;
                }
            }
        };
        assert_eq!(run(8), run(33));
        assert_eq!(run(8), run(10_000));
    }

    #[test]
    fn rotation_accumulates_across_spins() {
        let (clock, mut engine) = engine(vec![0.0, 0.5]);
        engine.spin(2).unwrap();
        clock.advance(Duration::from_secs(10));
        let first = step(&mut engine).unwrap();
        engine.spin(2).unwrap();
        assert!(engine.rotation() >= first.rotation);
        clock.advance(Duration::from_secs(10));
        let second = step(&mut engine).unwrap();
        let expected = first.rotation + TAU * 10.0 + 0.5 * TAU;
        assert!((second.rotation - expected).abs() < 1e-9);
    }

    #[test]
    fn teardown_cancels_and_silences() {
        let (clock, mut engine) = engine(vec![0.5, 0.5]);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        engine.subscribe(move |e: &SpinEvent| sink.borrow_mut().push(*e));
        engine.spin(3).unwrap();
        let token = engine.pending_frame().unwrap();
        let seen = events.borrow().len();

        engine.teardown();
        assert!(engine.scheduler().is_empty());
        assert_eq!(engine.scheduler().cancelled(), 1);
        clock.advance(Duration::from_secs(10));
        assert_eq!(engine.on_frame(token), None);
        assert_eq!(engine.spin(3), Ok(SpinTrigger::TornDown));
        assert_eq!(events.borrow().len(), seen);
    }

    #[test]
    fn drop_cancels_pending_frame() {
        let clock = ManualClock::new();
        let mut queue = FrameQueue::new();
        {
            let mut engine = SpinEngine::new(
                clock.clone(),
                &mut queue,
                SeededStream::new("s", "c", 0),
                SpinConfig::default(),
            );
            engine.spin(3).unwrap();
            assert!(engine.pending_frame().is_some());
        }
        assert!(queue.is_empty());
        assert_eq!(queue.cancelled(), 1);
    }

    #[test]
    fn stale_tokens_are_ignored() {
        let (clock, mut engine) = engine(vec![0.5, 0.5]);
        engine.spin(3).unwrap();
        clock.advance(Duration::from_secs(10));
        assert_eq!(engine.on_frame(FrameToken(999)), None);
        assert!(engine.is_spinning());
        assert!(step(&mut engine).is_some());
    }

    #[test]
    fn emits_started_rotations_then_settled() {
        let (clock, mut engine) = engine(vec![0.0, 0.0]);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        engine.subscribe(move |e: &SpinEvent| sink.borrow_mut().push(*e));
        engine.spin(3).unwrap();
        for _ in 0..3 {
            clock.advance(Duration::from_millis(1000));
            step(&mut engine);
        }
        let events = events.borrow();
        assert!(matches!(events.first(), Some(SpinEvent::Started { .. })));
        assert!(matches!(events.last(), Some(SpinEvent::Settled(_))));
        let rotations = events
            .iter()
            .filter(|e| matches!(e, SpinEvent::Rotated(_)))
            .count();
        // one synchronous frame plus one per scheduled frame
        assert_eq!(rotations, 3);
    }
}
