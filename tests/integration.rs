// Integration tests (native) for the `learning-hub` crate.
// These drive `PageController` with UI events and check the effects it hands
// back, so they run under `cargo test` on the host without a browser.

use learning_hub::controller::{Effect, PageController, UiEvent};
use learning_hub::particles::{Bounds, Rng};
use learning_hub::{PageConfig, PrefKey};

const VIEW: Bounds = Bounds {
    width: 1280.0,
    height: 720.0,
};

fn booted() -> PageController {
    let mut c = PageController::new(PageConfig::default(), Rng::seeded(99));
    c.handle(UiEvent::Boot { viewport: VIEW });
    c
}

fn toggle(c: &mut PageController, key: &str, checked: bool) -> Vec<Effect> {
    c.handle(UiEvent::ToggleChanged {
        key: key.to_string(),
        checked,
    })
}

fn synced(effects: &[Effect]) -> &learning_hub::Visuals {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::SyncVisuals(v) => Some(v),
            _ => None,
        })
        .expect("toggle must resync visuals")
}

#[test]
fn every_toggle_updates_state_and_resyncs() {
    let mut c = booted();
    for key in PrefKey::ALL {
        for checked in [false, true] {
            let effects = toggle(&mut c, key.as_str(), checked);
            assert_eq!(c.preferences().flag(key), checked, "{key}");
            assert_eq!(synced(&effects), &c.visuals());
        }
    }
}

#[test]
fn disabling_dark_mode_adds_light_presentation() {
    let mut c = booted();
    assert!(!c.visuals().light);
    let effects = toggle(&mut c, "darkMode", false);
    assert!(synced(&effects).light);
    let effects = toggle(&mut c, "darkMode", true);
    assert!(!synced(&effects).light);
}

#[test]
fn animations_toggle_drives_duration_property() {
    let mut c = booted();
    let off = toggle(&mut c, "animations", false);
    assert!(synced(&off).animations_off);
    assert_eq!(synced(&off).anim_duration, "0s");
    let on = toggle(&mut c, "animations", true);
    assert_eq!(synced(&on).anim_duration, "0.55s");
}

#[test]
fn unknown_toggle_key_is_stored_without_error() {
    let mut c = booted();
    let before = c.visuals();
    let effects = toggle(&mut c, "confetti", true);
    assert_eq!(effects, vec![Effect::SyncVisuals(before)]);
    assert!(c.preferences().get("confetti"));
}

#[test]
fn skill_bar_reveals_exactly_once() {
    let mut c = booted();
    let idx = c.register_skill(73.0);
    let reveals = |effects: Vec<Effect>| {
        effects
            .into_iter()
            .filter(|e| matches!(e, Effect::RevealSkill { .. }))
            .collect::<Vec<_>>()
    };
    assert!(reveals(c.handle(UiEvent::SkillVisibility { index: idx, ratio: 0.3 })).is_empty());
    assert_eq!(
        reveals(c.handle(UiEvent::SkillVisibility { index: idx, ratio: 0.6 })),
        vec![Effect::RevealSkill {
            index: idx,
            width: "73%".into()
        }]
    );
    for ratio in [0.0, 0.9, 1.0] {
        assert!(reveals(c.handle(UiEvent::SkillVisibility { index: idx, ratio })).is_empty());
    }
}

#[test]
fn never_visible_skill_is_never_revealed() {
    let mut c = booted();
    let idx = c.register_skill(40.0);
    c.handle(UiEvent::SkillVisibility { index: idx, ratio: 0.49 });
    assert!(!c.skills().is_revealed(idx));
}

#[test]
fn secret_word_shows_toast_once_and_schedules_hide() {
    let mut c = booted();
    let mut shown = 0;
    for key in ["l", "e", "a", "r", "n", "n"] {
        let effects = c.handle(UiEvent::KeyPressed { key: key.into() });
        if effects.contains(&Effect::ShowToast) {
            shown += 1;
            assert!(effects.contains(&Effect::ScheduleToastHide { delay_ms: 2800 }));
        }
        assert!(c.secret().buffered().chars().count() <= 5);
    }
    assert_eq!(shown, 1);
    assert_eq!(c.handle(UiEvent::ToastExpired), vec![Effect::HideToast]);
}

#[test]
fn resize_sets_canvas_and_keeps_particle_count() {
    let mut c = booted();
    let count = c.particles().particles().len();
    let effects = c.handle(UiEvent::Resized {
        viewport: Bounds {
            width: 390.0,
            height: 844.0,
        },
    });
    assert_eq!(
        effects,
        vec![Effect::ResizeCanvas {
            width: 390,
            height: 844
        }]
    );
    assert_eq!(c.particles().particles().len(), count);
    assert_eq!(c.particles().bounds().width, 390.0);
}
