//! Round state machine: one [`GameController`] owns the [`Session`], the
//! round's timer subscriptions and the page surface.
//!
//! Flow of a round:
//! - first click on an idle target starts it (movement, clock and rate timers
//!   plus a one-shot end timer are subscribed)
//! - every further click counts, relocates the target and swaps the taunt
//! - the end timer (or a reset) clears every subscription in one go
//!
//! All time-dependent operations take `now` in milliseconds; the browser passes
//! `performance.now()`, tests pass virtual time.

pub mod movement;
pub mod schedule;
pub mod taunts;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::random::{RandomSource, SeededRandom};
use crate::surface::{Layout, Point, Surface};

use movement::Bounds;
use schedule::{Scheduler, TimerKind};
use taunts::{DEFAULT_TAUNT_INDEX, TAUNTS};

// --- Session -----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// Waiting for the first click.
    Idle,
    Running,
    /// Ended by the round timer; target disabled until reset.
    Over,
}

/// Mutable state of the current (or last) round.
#[derive(Clone, Debug)]
pub struct Session {
    pub phase: RoundPhase,
    pub started_at_ms: Option<f64>,
    pub click_count: u32,
    pub button_position: Point,
    pub button_scale: f64,
    pub current_message_index: usize,
    pub rate_text: String,
    pub elapsed_text: String,
    pub target_enabled: bool,
}

impl Session {
    fn idle(center: Point) -> Self {
        Self {
            phase: RoundPhase::Idle,
            started_at_ms: None,
            click_count: 0,
            button_position: center,
            button_scale: 1.0,
            current_message_index: DEFAULT_TAUNT_INDEX,
            rate_text: ZERO_RATE.to_owned(),
            elapsed_text: ZERO_ELAPSED.to_owned(),
            target_enabled: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }
}

const ZERO_RATE: &str = "0.00";
const ZERO_ELAPSED: &str = "0.00s";

// Transient ring drawn where a click landed.
struct ClickEffect {
    id: u64,
    start_ms: f64,
}

// --- Controller --------------------------------------------------------------

pub struct GameController<S: Surface, R: RandomSource = SeededRandom> {
    config: GameConfig,
    surface: S,
    rng: R,
    session: Session,
    timers: Scheduler,
    effects: Vec<ClickEffect>,
    next_effect_id: u64,
}

impl<S: Surface, R: RandomSource> GameController<S, R> {
    /// Builds an idle controller and paints the idle state onto `surface`.
    pub fn new(config: GameConfig, surface: S, rng: R) -> Self {
        let center = Bounds::from_layout(&surface.layout()).center();
        let mut ctl = Self {
            config,
            surface,
            rng,
            session: Session::idle(center),
            timers: Scheduler::new(),
            effects: Vec::new(),
            next_effect_id: 0,
        };
        ctl.paint_idle();
        ctl
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn timers(&self) -> &Scheduler {
        &self.timers
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // --- Input -------------------------------------------------------------

    pub fn handle_primary_click(&mut self, now: f64) {
        if !self.session.target_enabled {
            log::debug!("click ignored: target disabled");
            return;
        }
        if self.session.phase == RoundPhase::Idle {
            self.start_round(now);
        }
        if !self.session.is_running() {
            return;
        }

        self.session.click_count += 1;
        self.surface.show_count(self.session.click_count);
        self.spawn_effect(now);
        self.relocate_target();
        self.change_taunt();

        // Pulse: shrink now, restore on the Pulse timer.
        self.surface.scale_target(self.config.pulse_scale);
        self.timers.after(TimerKind::Pulse, now, self.config.pulse_ms);
    }

    /// `pointer` is in play-area coordinates.
    pub fn handle_pointer_move(&mut self, pointer: Point) {
        if !self.session.is_running() || self.session.started_at_ms.is_none() {
            return;
        }
        if !self.rng.chance(self.config.avoid_chance) {
            return;
        }
        let (layout, current) = match self.read_position() {
            Ok(read) => read,
            Err(err) => {
                log::debug!("pointer nudge skipped: {err}");
                return;
            }
        };
        let next = movement::evade(&self.config, current, pointer, Bounds::from_layout(&layout));
        self.place(next);
    }

    // --- Lifecycle ---------------------------------------------------------

    fn start_round(&mut self, now: f64) {
        if self.session.is_running() {
            return;
        }
        self.session.phase = RoundPhase::Running;
        self.session.started_at_ms = Some(now);

        let cfg = &self.config;
        self.timers.every(TimerKind::Movement, now, cfg.movement_interval_ms);
        self.timers.every(TimerKind::Clock, now, cfg.clock_interval_ms);
        self.timers.every(TimerKind::Rate, now, cfg.rate_interval_ms);
        self.timers.after(TimerKind::RoundEnd, now, cfg.round_ms);
        log::info!("round started ({} ms)", cfg.round_ms);
    }

    pub fn end_round(&mut self) {
        if !self.session.is_running() {
            return;
        }
        self.session.phase = RoundPhase::Over;
        self.timers.clear();
        self.recenter();

        self.session.target_enabled = false;
        self.surface.set_target_enabled(false);
        let summary = taunts::summary(&self.session.rate_text);
        self.surface.show_taunt(&summary);
        log::info!(
            "round over: {} clicks, {} cps",
            self.session.click_count,
            self.session.rate_text
        );
    }

    /// Back to idle from any phase.
    pub fn reset_round(&mut self) {
        self.timers.clear();
        let center = self.center();
        self.session = Session::idle(center);
        self.paint_idle();
        log::info!("round reset");
    }

    fn paint_idle(&mut self) {
        self.surface.show_count(0);
        self.surface.show_rate(ZERO_RATE);
        self.surface.show_elapsed(ZERO_ELAPSED);
        self.recenter();
        self.surface.set_target_enabled(true);
        self.surface.show_taunt(TAUNTS[DEFAULT_TAUNT_INDEX]);
    }

    // --- Movement ----------------------------------------------------------

    /// Move the target once according to the relocation policy. No-op outside
    /// a running round.
    pub fn relocate_target(&mut self) {
        if !self.session.is_running() || self.session.started_at_ms.is_none() {
            return;
        }
        let (layout, current) = match self.read_position() {
            Ok(read) => read,
            Err(err) => {
                self.recover(err);
                return;
            }
        };
        let bounds = Bounds::from_layout(&layout);
        let step = movement::relocate(&mut self.rng, &self.config, current, bounds);
        self.place(step.position);
        // Every relocation drops the previous rescale; only a fresh hit keeps
        // the target off 1.0.
        let scale = step.scale.unwrap_or(1.0);
        self.session.button_scale = scale;
        self.surface.scale_target(scale);
    }

    fn read_position(&self) -> Result<(Layout, Point), GameError> {
        let layout = self.surface.layout();
        let current = self.surface.target_offset();
        if !current.is_finite() {
            return Err(GameError::InvalidPosition { x: current.x, y: current.y });
        }
        if !layout.is_finite() {
            return Err(GameError::InvalidPosition { x: layout.area.width, y: layout.area.height });
        }
        Ok((layout, current))
    }

    // Layout readback failed: freeze the target in the middle and stop the
    // movement timer. Clicks and the other timers keep running.
    fn recover(&mut self, err: GameError) {
        log::warn!("target movement error, recentering: {err}");
        self.surface.recenter_fallback();
        self.session.button_position = self.center();
        self.session.button_scale = 1.0;
        self.timers.cancel(TimerKind::Movement);
    }

    fn place(&mut self, at: Point) {
        self.session.button_position = at;
        self.surface.place_target(at);
    }

    fn center(&self) -> Point {
        Bounds::from_layout(&self.surface.layout()).center()
    }

    fn recenter(&mut self) {
        let center = self.center();
        self.place(center);
        self.session.button_scale = 1.0;
        self.surface.scale_target(1.0);
    }

    fn change_taunt(&mut self) {
        let idx = self.rng.index(TAUNTS.len());
        self.session.current_message_index = idx;
        self.surface.show_taunt(TAUNTS[idx]);
    }

    // --- Timers ------------------------------------------------------------

    /// Drive the round from the page's ticking loop: fire every due timer in
    /// order, then expire finished click effects.
    pub fn advance(&mut self, now: f64) {
        while let Some(kind) = self.timers.pop_due(now) {
            self.fire(kind, now);
        }
        self.expire_effects(now);
    }

    fn fire(&mut self, kind: TimerKind, now: f64) {
        match kind {
            TimerKind::Movement => self.relocate_target(),
            TimerKind::Clock => self.tick_clock_display(now),
            TimerKind::Rate => self.tick_rate_display(now),
            TimerKind::RoundEnd => self.end_round(),
            TimerKind::Pulse => self.surface.scale_target(self.session.button_scale),
        }
    }

    pub fn tick_clock_display(&mut self, now: f64) {
        let Some(elapsed) = self.elapsed_secs(now) else { return };
        self.session.elapsed_text = format!("{elapsed:.2}s");
        self.surface.show_elapsed(&self.session.elapsed_text);
    }

    pub fn tick_rate_display(&mut self, now: f64) {
        let Some(elapsed) = self.elapsed_secs(now) else { return };
        if elapsed > 0.0 {
            let rate = self.session.click_count as f64 / elapsed;
            self.session.rate_text = format!("{rate:.2}");
            self.surface.show_rate(&self.session.rate_text);
        }
    }

    fn elapsed_secs(&self, now: f64) -> Option<f64> {
        self.session.started_at_ms.map(|start| (now - start) / 1000.0)
    }

    // --- Effects -----------------------------------------------------------

    fn spawn_effect(&mut self, now: f64) {
        let id = self.next_effect_id;
        self.next_effect_id += 1;
        self.surface.spawn_effect(id, self.session.button_position);
        self.effects.push(ClickEffect { id, start_ms: now });
    }

    fn expire_effects(&mut self, now: f64) {
        let ttl = self.config.effect_ms;
        let surface = &mut self.surface;
        self.effects.retain(|e| {
            let alive = now - e.start_ms < ttl;
            if !alive {
                surface.remove_effect(e.id);
            }
            alive
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;
    use std::collections::VecDeque;

    fn controller(seed: u64) -> GameController<HeadlessSurface> {
        GameController::new(GameConfig::default(), HeadlessSurface::default(), SeededRandom::new(seed))
    }

    // Replays fixed samples; panics when a test draws more than it scripted.
    struct Scripted(VecDeque<f64>);

    impl Scripted {
        fn push(&mut self, samples: &[f64]) {
            self.0.extend(samples.iter().copied());
        }
    }

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f64 {
            self.0.pop_front().expect("script exhausted")
        }
    }

    fn scripted_controller() -> GameController<HeadlessSurface, Scripted> {
        GameController::new(GameConfig::default(), HeadlessSurface::default(), Scripted(VecDeque::new()))
    }

    // Samples for a relocation that stays put: no teleport, slow tier, zero
    // step on both axes, then the rescale roll.
    const STAY: [f64; 4] = [0.5, 0.1, 0.5, 0.5];

    // Start a round with the target left at the center and taunt index 0.
    fn start_centered(ctl: &mut GameController<HeadlessSurface, Scripted>) {
        ctl.rng.push(&STAY);
        ctl.rng.push(&[0.5, 0.0]); // rescale miss, taunt index
        ctl.handle_primary_click(0.0);
        assert_eq!(ctl.surface().position, Point::new(225.0, 160.0));
    }

    #[test]
    fn test_new_controller_is_idle_and_centered() {
        let ctl = controller(1);
        let s = ctl.session();
        assert_eq!(s.phase, RoundPhase::Idle);
        assert_eq!(s.started_at_ms, None);
        assert_eq!(s.button_position, Point::new(225.0, 160.0));
        assert_eq!(ctl.surface().taunt, taunts::default_taunt());
        assert!(ctl.timers().is_empty());
    }

    #[test]
    fn test_first_click_starts_round_and_counts() {
        let mut ctl = controller(2);
        ctl.handle_primary_click(1_000.0);
        let s = ctl.session();
        assert!(s.is_running());
        assert_eq!(s.started_at_ms, Some(1_000.0));
        assert_eq!(s.click_count, 1);
        assert_eq!(ctl.surface().count, "1");
        for kind in [TimerKind::Movement, TimerKind::Clock, TimerKind::Rate, TimerKind::RoundEnd] {
            assert!(ctl.timers().is_armed(kind), "{kind:?} not armed");
        }
    }

    #[test]
    fn test_pulse_shrinks_then_restores() {
        let mut ctl = controller(3);
        ctl.handle_primary_click(0.0);
        assert_eq!(ctl.surface().scale, ctl.config().pulse_scale);
        ctl.advance(100.0);
        assert_eq!(ctl.surface().scale, ctl.session().button_scale);
    }

    #[test]
    fn test_pointer_move_ignored_when_idle() {
        let mut ctl = controller(4);
        let before = ctl.surface().position;
        for i in 0..200 {
            ctl.handle_pointer_move(Point::new(i as f64, 0.0));
        }
        assert_eq!(ctl.surface().position, before);
    }

    #[test]
    fn test_relocate_ignored_when_idle() {
        let mut ctl = controller(5);
        let before = ctl.session().button_position;
        ctl.relocate_target();
        assert_eq!(ctl.session().button_position, before);
    }

    #[test]
    fn test_effects_expire() {
        let mut ctl = controller(6);
        ctl.handle_primary_click(0.0);
        assert_eq!(ctl.surface().effects.len(), 1);
        ctl.advance(299.0);
        assert_eq!(ctl.surface().effects.len(), 1);
        ctl.advance(300.0);
        assert!(ctl.surface().effects.is_empty());
    }

    #[test]
    fn test_ticks_are_noops_without_start() {
        let mut ctl = controller(7);
        ctl.tick_clock_display(5_000.0);
        ctl.tick_rate_display(5_000.0);
        assert_eq!(ctl.surface().elapsed, "0.00s");
        assert_eq!(ctl.surface().rate, "0.00");
    }

    #[test]
    fn test_rescale_lasts_one_relocation() {
        let mut ctl = scripted_controller();
        ctl.rng.push(&STAY);
        ctl.rng.push(&[0.05, 0.0, 0.0]); // rescale hit at 0.8, taunt index
        ctl.handle_primary_click(0.0);
        assert_eq!(ctl.session().button_scale, 0.8);

        ctl.rng.push(&STAY);
        ctl.rng.push(&[0.5]); // rescale miss
        ctl.relocate_target();
        assert_eq!(ctl.session().button_scale, 1.0);
        assert_eq!(ctl.surface().scale, 1.0);
    }

    #[test]
    fn test_pointer_nudge_follows_avoid_roll() {
        let mut ctl = scripted_controller();
        start_centered(&mut ctl);

        // 0.09 < 0.1: pushed 10% of (target - pointer) further away
        ctl.rng.push(&[0.09]);
        ctl.handle_pointer_move(Point::new(125.0, 160.0));
        assert_eq!(ctl.surface().position, Point::new(235.0, 160.0));

        // 0.1 is a miss
        ctl.rng.push(&[0.1]);
        ctl.handle_pointer_move(Point::new(125.0, 160.0));
        assert_eq!(ctl.surface().position, Point::new(235.0, 160.0));

        // far pointer: nudge clamps to the right edge
        ctl.rng.push(&[0.0]);
        ctl.handle_pointer_move(Point::new(-3_000.0, 160.0));
        assert_eq!(ctl.surface().position, Point::new(450.0, 160.0));
        assert_eq!(ctl.session().button_position, Point::new(450.0, 160.0));
    }

    #[test]
    fn test_pointer_nudge_skips_unreadable_position() {
        let mut ctl = scripted_controller();
        start_centered(&mut ctl);
        ctl.surface_mut().report_offset(Point::new(f64::NAN, 0.0));

        ctl.rng.push(&[0.0]);
        ctl.handle_pointer_move(Point::new(0.0, 0.0));
        assert!(!ctl.surface().centered_by_fallback);
        assert!(ctl.timers().is_armed(TimerKind::Movement));
        assert_eq!(ctl.session().button_position, Point::new(225.0, 160.0));
    }
}
