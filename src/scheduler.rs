use crate::canvas::Canvas;
use crate::engine::GrowthEngine;
use crate::noise::NoiseSource;
use std::io;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_GENERATIONS: u32 = 7;
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1500);

/// Time source for the cooldown deadline, injectable so tests can step time
/// by hand instead of sleeping.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Host-side affordance toggles. The scheduler calls these on every phase
/// transition so the host can flip its "press to grow" cue.
pub trait InteractionHooks {
    fn enable_interaction(&mut self);
    fn disable_interaction(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Accepting a trigger.
    Armed,
    /// A growth just ran; triggers are dropped until the deadline passes.
    Cooldown,
    /// Generation cap reached. Terminal; never re-arms.
    Exhausted,
}

/// Gates generation advancement behind user triggers. Each generation
/// quadruples the drawn primitives and needs time to settle visually, so a
/// successful trigger starts a cooldown, and a hard cap keeps the 4^k blowup
/// from burying the terminal.
pub struct GrowthScheduler<C: Clock> {
    clock: C,
    phase: Phase,
    rearm_at: Option<Instant>,
    generation_index: u32,
    max_generations: u32,
    cooldown: Duration,
}

impl<C: Clock> GrowthScheduler<C> {
    pub fn new(clock: C, max_generations: u32, cooldown: Duration) -> Self {
        Self {
            clock,
            phase: Phase::Armed,
            rearm_at: None,
            generation_index: 0,
            max_generations,
            cooldown,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation_index(&self) -> u32 {
        self.generation_index
    }

    pub fn max_generations(&self) -> u32 {
        self.max_generations
    }

    /// Handle one external trigger. Anything but Armed drops it silently.
    /// Returns whether a generation actually grew; canvas failures from the
    /// growth pass propagate to the caller untouched.
    pub fn on_trigger(
        &mut self,
        engine: &mut GrowthEngine,
        canvas: &mut dyn Canvas,
        noise: &mut dyn NoiseSource,
        hooks: &mut dyn InteractionHooks,
    ) -> io::Result<bool> {
        if self.phase != Phase::Armed {
            return Ok(false);
        }

        engine.grow_one_generation(canvas, noise)?;
        self.generation_index += 1;

        if self.generation_index > self.max_generations {
            self.phase = Phase::Exhausted;
            self.rearm_at = None;
        } else {
            self.phase = Phase::Cooldown;
            self.rearm_at = Some(self.clock.now() + self.cooldown);
        }
        hooks.disable_interaction();

        Ok(true)
    }

    /// Re-arm once the cooldown deadline has passed. The single-threaded
    /// stand-in for a one-shot deferred callback: at most one deadline is
    /// ever outstanding, and Exhausted supersedes it. Returns whether the
    /// scheduler re-armed on this poll.
    pub fn poll(&mut self, hooks: &mut dyn InteractionHooks) -> bool {
        if self.phase != Phase::Cooldown {
            return false;
        }
        match self.rearm_at {
            Some(at) if self.clock.now() >= at => {
                self.phase = Phase::Armed;
                self.rearm_at = None;
                hooks.enable_interaction();
                true
            }
            _ => false,
        }
    }
}
