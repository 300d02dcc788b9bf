//! Ambient background particles.
//!
//! The engine is a two-state machine (stopped / running) over a batch of
//! particles. It owns the physics and the frame-handle bookkeeping; the DOM
//! runtime only asks for a frame, draws what comes back, and reschedules when
//! told to.

use rand::rngs::SmallRng;
use rand::{Rng as _, SeedableRng};

use crate::config::PageConfig;

// --- Randomness --------------------------------------------------------------

/// Particle RNG. `SmallRng` is fast and not crypto secure, which is all
/// ambient motion needs.
#[derive(Clone, Debug)]
pub struct Rng(SmallRng);

impl Rng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Seed from the OS (`rng` feature) or from the page clock.
    #[cfg(feature = "rng")]
    pub fn from_entropy() -> Self {
        Self(SmallRng::from_entropy())
    }

    #[cfg(not(feature = "rng"))]
    pub fn from_entropy() -> Self {
        let now = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        Self::seeded((now * 1000.0) as u64)
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen()
    }

    /// Uniform in `[lo, hi)`; `lo` when the range is empty.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        if hi > lo { self.0.gen_range(lo..hi) } else { lo }
    }
}

// --- Particles ---------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub alpha: f64,
}

impl Particle {
    fn random(rng: &mut Rng, bounds: Bounds, config: &PageConfig) -> Self {
        Self {
            x: rng.unit() * bounds.width,
            y: rng.unit() * bounds.height,
            radius: rng.range(config.radius_min, config.radius_max),
            speed_x: rng.range(-config.max_speed, config.max_speed),
            speed_y: rng.range(-config.max_speed, config.max_speed),
            alpha: rng.range(config.alpha_min, config.alpha_max),
        }
    }

    /// Advance one frame, reflecting velocity once the particle is outside the
    /// canvas on either axis.
    pub fn step(&mut self, bounds: Bounds) {
        self.x += self.speed_x;
        self.y += self.speed_y;
        if self.x < 0.0 || self.x > bounds.width {
            self.speed_x = -self.speed_x;
        }
        if self.y < 0.0 || self.y > bounds.height {
            self.speed_y = -self.speed_y;
        }
    }
}

/// Handle returned by `requestAnimationFrame`.
pub type FrameHandle = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    /// `frame` is the pending animation-frame request, if one is queued.
    Running { frame: Option<FrameHandle> },
}

#[derive(Debug)]
pub struct ParticleEngine {
    particles: Vec<Particle>,
    state: EngineState,
    bounds: Bounds,
    count: usize,
}

impl ParticleEngine {
    pub fn new(bounds: Bounds, count: usize) -> Self {
        Self {
            particles: Vec::new(),
            state: EngineState::Stopped,
            bounds,
            count,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, EngineState::Running { .. })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// New viewport size. Existing particles keep their positions.
    pub fn resize(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// STOPPED -> RUNNING. Generates a batch if none exists. Returns `true`
    /// when the caller must draw the first frame and start the loop; `false`
    /// if a loop is already running.
    pub fn start(&mut self, rng: &mut Rng, config: &PageConfig) -> bool {
        if self.particles.is_empty() {
            self.particles = (0..self.count)
                .map(|_| Particle::random(rng, self.bounds, config))
                .collect();
        }
        if self.is_running() {
            return false;
        }
        self.state = EngineState::Running { frame: None };
        true
    }

    /// RUNNING -> STOPPED. Returns the pending frame to cancel, if any. The
    /// batch is kept so a later start resumes it.
    pub fn stop(&mut self) -> Option<FrameHandle> {
        let pending = match self.state {
            EngineState::Running { frame } => frame,
            EngineState::Stopped => None,
        };
        self.state = EngineState::Stopped;
        pending
    }

    /// Advance every particle by one frame.
    pub fn tick(&mut self) {
        let bounds = self.bounds;
        for p in &mut self.particles {
            p.step(bounds);
        }
    }

    /// End-of-frame continuation check. Keeps running only while `enabled`.
    pub fn finish_frame(&mut self, enabled: bool) -> bool {
        if enabled && self.is_running() {
            self.state = EngineState::Running { frame: None };
            true
        } else {
            self.state = EngineState::Stopped;
            false
        }
    }

    /// Record the handle of the frame just requested.
    pub fn frame_requested(&mut self, handle: FrameHandle) {
        if let EngineState::Running { frame } = &mut self.state {
            *frame = Some(handle);
        }
    }
}
