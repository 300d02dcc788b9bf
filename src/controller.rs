//! Page controller: discrete UI events in, DOM effects out.
//!
//! `PageController::handle` is the whole state machine of the page. It holds
//! the preference snapshot, menu state, keystroke buffer, skill tracker and
//! particle engine, and never touches the document; the runtime in
//! `crate::page` applies the returned effects.

use crate::config::PageConfig;
use crate::particles::{Bounds, FrameHandle, Particle, ParticleEngine, Rng};
use crate::prefs::{PrefKey, UiPreferences, Visuals};
use crate::secret::SecretPhraseDetector;
use crate::skills::SkillTracker;

#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Page loaded with the given viewport size.
    Boot { viewport: Bounds },
    /// A `data-toggle` input changed.
    ToggleChanged { key: String, checked: bool },
    /// Preference written programmatically (state is the write origin).
    PreferenceSet { key: String, value: bool },
    MenuClicked,
    KeyPressed { key: String },
    HintRequested,
    SkillVisibility { index: usize, ratio: f64 },
    Resized { viewport: Bounds },
    ToastExpired,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    SyncVisuals(Visuals),
    /// Mirror a preference onto every toggle input bound to `key`.
    SetToggleChecked { key: String, checked: bool },
    SetNavOpen(bool),
    RevealSkill { index: usize, width: String },
    ShowToast,
    HideToast,
    ScheduleToastHide { delay_ms: u32 },
    Alert(String),
    ResizeCanvas { width: u32, height: u32 },
    /// Draw a frame now and keep the animation loop going.
    BeginParticleLoop,
    /// Cancel the pending frame (if any) and clear the canvas.
    StopParticles { cancel: Option<FrameHandle> },
}

/// Result of one animation frame.
#[derive(Debug)]
pub struct Frame<'a> {
    pub bounds: Bounds,
    pub particles: &'a [Particle],
    /// Request another frame after drawing this one.
    pub schedule_next: bool,
}

pub struct PageController {
    config: PageConfig,
    prefs: UiPreferences,
    nav_open: bool,
    secret: SecretPhraseDetector,
    skills: SkillTracker,
    particles: ParticleEngine,
    rng: Rng,
}

impl PageController {
    pub fn new(config: PageConfig, rng: Rng) -> Self {
        Self {
            prefs: config.defaults.clone(),
            nav_open: false,
            secret: SecretPhraseDetector::new(&config.secret_word),
            skills: SkillTracker::new(config.reveal_threshold),
            particles: ParticleEngine::new(
                Bounds {
                    width: 0.0,
                    height: 0.0,
                },
                config.particle_count,
            ),
            rng,
            config,
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn preferences(&self) -> &UiPreferences {
        &self.prefs
    }

    pub fn particles(&self) -> &ParticleEngine {
        &self.particles
    }

    pub fn skills(&self) -> &SkillTracker {
        &self.skills
    }

    pub fn secret(&self) -> &SecretPhraseDetector {
        &self.secret
    }

    /// Register a skill bar with a parsed level; returns its index.
    pub fn register_skill(&mut self, level: f64) -> usize {
        self.skills.register(level)
    }

    pub fn visuals(&self) -> Visuals {
        Visuals::derive(&self.prefs, &self.config)
    }

    pub fn handle(&mut self, event: UiEvent) -> Vec<Effect> {
        match event {
            UiEvent::Boot { viewport } => self.boot(viewport),
            UiEvent::ToggleChanged { key, checked } => self.set_preference(&key, checked),
            UiEvent::PreferenceSet { key, value } => {
                let mut effects = vec![Effect::SetToggleChecked {
                    key: key.clone(),
                    checked: value,
                }];
                effects.extend(self.set_preference(&key, value));
                effects
            }
            UiEvent::MenuClicked => {
                self.nav_open = !self.nav_open;
                vec![Effect::SetNavOpen(self.nav_open)]
            }
            UiEvent::KeyPressed { key } => {
                if self.secret.push_key(&key) {
                    log::info!("secret word typed; showing easter egg");
                    vec![
                        Effect::ShowToast,
                        Effect::ScheduleToastHide {
                            delay_ms: self.config.toast_ms,
                        },
                    ]
                } else {
                    Vec::new()
                }
            }
            UiEvent::HintRequested => vec![Effect::Alert(self.config.hint_text.clone())],
            UiEvent::SkillVisibility { index, ratio } => self
                .skills
                .observe(index, ratio)
                .map(|r| Effect::RevealSkill {
                    index: r.index,
                    width: r.width,
                })
                .into_iter()
                .collect(),
            UiEvent::Resized { viewport } => self.resize(viewport),
            UiEvent::ToastExpired => vec![Effect::HideToast],
        }
    }

    fn boot(&mut self, viewport: Bounds) -> Vec<Effect> {
        let mut effects = self.resize(viewport);
        effects.push(Effect::SyncVisuals(self.visuals()));
        if self.prefs.particles && self.particles.start(&mut self.rng, &self.config) {
            effects.push(Effect::BeginParticleLoop);
        }
        effects
    }

    fn resize(&mut self, viewport: Bounds) -> Vec<Effect> {
        self.particles.resize(viewport);
        vec![Effect::ResizeCanvas {
            width: viewport.width.max(0.0) as u32,
            height: viewport.height.max(0.0) as u32,
        }]
    }

    /// Store a flag, resync visuals, and start/stop particles when the
    /// `particles` flag is the one that changed.
    fn set_preference(&mut self, key: &str, value: bool) -> Vec<Effect> {
        let known = self.prefs.set(key, value);
        log::debug!("preference {key} = {value}");
        let mut effects = vec![Effect::SyncVisuals(self.visuals())];
        if known == Some(PrefKey::Particles) {
            if value {
                if self.particles.start(&mut self.rng, &self.config) {
                    log::debug!("particles started ({})", self.particles.particles().len());
                    effects.push(Effect::BeginParticleLoop);
                }
            } else {
                let cancel = self.particles.stop();
                log::debug!("particles stopped");
                effects.push(Effect::StopParticles { cancel });
            }
        }
        effects
    }

    /// Advance and hand back one animation frame.
    ///
    /// A frame that fires after the engine stopped (already dispatched before
    /// the cancel) moves nothing and hands back no particles.
    pub fn particle_frame(&mut self) -> Frame<'_> {
        if !self.particles.is_running() {
            return Frame {
                bounds: self.particles.bounds(),
                particles: &[],
                schedule_next: false,
            };
        }
        self.particles.tick();
        let schedule_next = self.particles.finish_frame(self.prefs.particles);
        Frame {
            bounds: self.particles.bounds(),
            particles: self.particles.particles(),
            schedule_next,
        }
    }

    pub fn frame_requested(&mut self, handle: FrameHandle) {
        self.particles.frame_requested(handle);
    }
}
