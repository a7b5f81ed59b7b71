//! Animation phases of one overlay session.
//!
//! ```text
//! Expanding --(done)--> Pulsing --(dismiss)--> DismissingConfirm --(done)--> Dismissed
//!     |                  ^   |                 DismissingCancel  --(done)--> Dismissed
//!     |                  +---+ (repeat)
//!     +--(dismiss)--> Dismissing*
//! ```

use crate::settings::Timings;
use serde_with::DeserializeFromStr;
use std::f64::consts::PI;
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};

/// Peak growth of the target circle while pulsing, relative to its radius.
pub const PULSE_FRACTION: f64 = 0.1;

const GROWTH_RATE: f64 = 1.5;
const TEXT_DELAY: f64 = 0.7;
const PULSE_DELAY: f64 = 0.5;
const CONFIRM_GROWTH: f64 = 0.2;

/// 0 until `threshold`, then rises linearly to 1.
pub fn delayed_lerp(progress: f64, threshold: f64) -> f64 {
    if progress < threshold {
        return 0.0;
    }
    (progress - threshold) / (1.0 - threshold)
}

pub fn halfway_lerp(progress: f64) -> f64 {
    if progress < 0.5 {
        return progress / 0.5;
    }
    (1.0 - progress) / 0.5
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, DeserializeFromStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Curve {
    Linear,
    #[default]
    AccelerateDecelerate,
}

impl Curve {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::AccelerateDecelerate => ((t + 1.0) * PI).cos() / 2.0 + 0.5,
        }
    }
}

/// Timing of one phase: what the host ticker would be configured with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub duration: Duration,
    pub delay: Duration,
    pub repeat: bool,
    pub curve: Curve,
    /// Runs the eased value from 1 down to 0.
    pub reversed: bool,
}

impl Tween {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            repeat: false,
            curve: Curve::default(),
            reversed: false,
        }
    }

    pub fn delay_by(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = curve;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn value(&self, progress: f64) -> f64 {
        let eased = self.curve.apply(progress.clamp(0.0, 1.0));
        if self.reversed { 1.0 - eased } else { eased }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Clock {
    tween: Tween,
    elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Step {
    progress: f64,
    finished: bool,
}

impl Clock {
    fn new(tween: Tween) -> Self {
        Self {
            tween,
            elapsed: Duration::ZERO,
        }
    }

    fn advance(&mut self, dt: Duration) -> Step {
        self.elapsed = self.elapsed.saturating_add(dt);

        let Some(active) = self.elapsed.checked_sub(self.tween.delay) else {
            return Step {
                progress: 0.0,
                finished: false,
            };
        };

        let duration = self.tween.duration.as_secs_f64();
        if duration <= 0.0 {
            return Step {
                progress: 1.0,
                finished: !self.tween.repeat,
            };
        }

        let progress = active.as_secs_f64() / duration;
        if progress < 1.0 {
            return Step {
                progress,
                finished: false,
            };
        }

        if self.tween.repeat {
            let progress = progress.fract();
            self.elapsed = self.tween.delay + self.tween.duration.mul_f64(progress);
            Step {
                progress,
                finished: false,
            }
        } else {
            Step {
                progress: 1.0,
                finished: true,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Phase {
    Expanding,
    Pulsing,
    DismissingConfirm,
    DismissingCancel,
    Dismissed,
}

/// Per-frame values for the renderer. Alphas are in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderParams {
    pub outer_radius: f64,
    pub outer_alpha: f64,
    pub target_radius: f64,
    pub target_alpha: f64,
    pub text_alpha: f64,
    pub pulse_radius: f64,
    pub pulse_alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub phase: Phase,
    /// Time fraction of the current phase (or pulse repetition).
    pub progress: f64,
    pub params: RenderParams,
}

#[derive(Debug, Clone)]
pub struct AnimationController {
    outer_radius: f64,
    target_radius: f64,
    outer_alpha: f64,
    timings: Timings,
    clock: Clock,
    state: AnimationState,
    // params when the current phase was entered
    entry: RenderParams,
    interactable: bool,
}

impl AnimationController {
    pub fn new(outer_radius: f64, target_radius: f64, outer_alpha: f64, timings: Timings) -> Self {
        Self {
            outer_radius,
            target_radius,
            outer_alpha,
            timings,
            clock: Clock::new(timings.expand_tween()),
            state: AnimationState {
                phase: Phase::Expanding,
                progress: 0.0,
                params: RenderParams::default(),
            },
            entry: RenderParams::default(),
            interactable: false,
        }
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn params(&self) -> &RenderParams {
        &self.state.params
    }

    /// True only while pulsing, i.e. after the expansion finished and before
    /// any dismissal started.
    pub fn is_interactable(&self) -> bool {
        self.interactable
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn target_radius(&self) -> f64 {
        self.target_radius
    }

    /// Follows a relayout. Takes effect immediately while pulsing and on the
    /// next tick otherwise.
    pub fn set_outer_radius(&mut self, radius: f64) {
        self.outer_radius = radius;
        if self.state.phase == Phase::Pulsing {
            self.state.params.outer_radius = radius;
        }
    }

    pub fn tick(&mut self, dt: Duration) -> Option<Phase> {
        if self.state.phase == Phase::Dismissed {
            return None;
        }

        let step = self.clock.advance(dt);
        self.state.progress = step.progress;
        self.apply(self.clock.tween.value(step.progress));

        if !step.finished {
            return None;
        }

        match self.state.phase {
            Phase::Expanding => {
                self.interactable = true;
                self.enter(Phase::Pulsing, self.timings.pulse_tween());
                Some(Phase::Pulsing)
            }
            Phase::DismissingConfirm | Phase::DismissingCancel => {
                log::debug!("Animation {} -> {}", self.state.phase, Phase::Dismissed);
                self.state.phase = Phase::Dismissed;
                Some(Phase::Dismissed)
            }
            Phase::Pulsing | Phase::Dismissed => None,
        }
    }

    /// Starts the confirm or cancel dismissal. Ignored once dismissing.
    pub fn dismiss(&mut self, confirmed: bool) -> bool {
        if !matches!(self.state.phase, Phase::Expanding | Phase::Pulsing) {
            return false;
        }

        self.interactable = false;
        let phase = if confirmed {
            Phase::DismissingConfirm
        } else {
            Phase::DismissingCancel
        };
        self.enter(phase, self.timings.dismiss_tween(confirmed));
        true
    }

    pub fn finish(&mut self) {
        self.interactable = false;
        self.state.phase = Phase::Dismissed;
    }

    fn enter(&mut self, phase: Phase, tween: Tween) {
        log::debug!("Animation {} -> {}", self.state.phase, phase);
        self.entry = self.state.params;
        self.state.phase = phase;
        self.state.progress = 0.0;
        self.clock = Clock::new(tween);
        self.apply(tween.value(0.0));
    }

    fn apply(&mut self, value: f64) {
        let (radius, target, alpha) = (self.outer_radius, self.target_radius, self.outer_alpha);
        let entry = self.entry;
        let params = &mut self.state.params;

        match self.state.phase {
            Phase::Expanding => {
                params.outer_radius = radius * value;
                params.outer_alpha = (value * GROWTH_RATE * alpha).min(alpha);
                params.target_alpha = (value * GROWTH_RATE).min(1.0);
                params.target_radius = target * (value * GROWTH_RATE).min(1.0);
                params.text_alpha = delayed_lerp(value, TEXT_DELAY);
            }
            Phase::Pulsing => {
                let pulse = delayed_lerp(value, PULSE_DELAY);
                params.outer_radius = radius;
                params.outer_alpha = alpha;
                params.target_alpha = 1.0;
                params.text_alpha = 1.0;
                params.pulse_radius = (1.0 + pulse) * target;
                params.pulse_alpha = 1.0 - pulse;
                params.target_radius = target + halfway_lerp(value) * target * PULSE_FRACTION;
            }
            Phase::DismissingConfirm => {
                let sped_up = (value * 2.0).min(1.0);
                params.outer_radius = radius * (1.0 + sped_up * CONFIRM_GROWTH);
                params.outer_alpha = (1.0 - sped_up) * alpha;
                params.target_radius = (1.0 - value) * target;
                params.target_alpha = 1.0 - value;
                params.pulse_radius = (1.0 + value) * target;
                params.pulse_alpha = (1.0 - value) * entry.pulse_alpha;
                params.text_alpha = 1.0 - sped_up;
            }
            Phase::DismissingCancel => {
                // the expansion played backwards; value runs 1 -> 0
                params.outer_radius = radius * value;
                params.outer_alpha = (value * GROWTH_RATE * alpha).min(alpha);
                params.target_alpha = (value * GROWTH_RATE).min(1.0);
                params.target_radius = target * value;
                params.pulse_radius = entry.pulse_radius * value;
                params.pulse_alpha = entry.pulse_alpha * value;
                params.text_alpha = delayed_lerp(value, TEXT_DELAY);
            }
            Phase::Dismissed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const FRAME: Duration = Duration::from_millis(16);

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn linear_timings() -> Timings {
        Timings {
            curve: Curve::Linear,
            ..Timings::default()
        }
    }

    fn controller() -> AnimationController {
        AnimationController::new(300.0, 44.0, 0.96, linear_timings())
    }

    fn run_until(controller: &mut AnimationController, phase: Phase) -> Vec<Phase> {
        let mut entered = Vec::new();
        for _ in 0..1000 {
            if let Some(next) = controller.tick(FRAME) {
                entered.push(next);
                if next == phase {
                    break;
                }
            }
        }
        entered
    }

    #[test]
    fn test_lerp_helpers() {
        assert_eq!(delayed_lerp(0.5, 0.7), 0.0);
        assert!(close(delayed_lerp(0.85, 0.7), 0.5));
        assert!(close(delayed_lerp(1.0, 0.7), 1.0));
        assert_eq!(halfway_lerp(0.0), 0.0);
        assert_eq!(halfway_lerp(0.25), 0.5);
        assert_eq!(halfway_lerp(0.5), 1.0);
        assert_eq!(halfway_lerp(1.0), 0.0);
    }

    #[test]
    fn test_curve_endpoints() {
        for curve in Curve::iter() {
            assert!(close(curve.apply(0.0), 0.0), "{curve} at 0");
            assert!(close(curve.apply(0.5), 0.5), "{curve} at 0.5");
            assert!(close(curve.apply(1.0), 1.0), "{curve} at 1");
        }
        assert!(Curve::AccelerateDecelerate.apply(0.1) < 0.1);
    }

    #[test]
    fn test_expanding_waits_for_start_delay() {
        let mut controller = controller();
        controller.tick(Duration::from_millis(200));
        assert_eq!(controller.phase(), Phase::Expanding);
        assert_eq!(controller.params().outer_radius, 0.0);

        controller.tick(Duration::from_millis(175));
        let params = controller.params();
        assert!(close(controller.state().progress, 0.5));
        assert!(close(params.outer_radius, 150.0));
        assert!(close(params.outer_alpha, 0.96 * 0.75));
        assert!(close(params.target_radius, 44.0 * 0.75));
        assert_eq!(params.text_alpha, 0.0);
        assert!(!controller.is_interactable());
    }

    #[test]
    fn test_expansion_completes_into_pulsing() {
        let mut controller = controller();
        let entered = run_until(&mut controller, Phase::Pulsing);
        assert_eq!(entered, vec![Phase::Pulsing]);
        assert!(controller.is_interactable());

        let params = controller.params();
        assert_eq!(params.outer_radius, 300.0);
        assert_eq!(params.outer_alpha, 0.96);
        assert_eq!(params.text_alpha, 1.0);
        assert_eq!(params.target_radius, 44.0);
    }

    #[test]
    fn test_pulse_repeats_forever() {
        let mut controller = controller();
        run_until(&mut controller, Phase::Pulsing);

        controller.tick(Duration::from_millis(500));
        assert!(close(controller.params().target_radius, 44.0 * (1.0 + PULSE_FRACTION)));
        assert!(close(controller.params().pulse_radius, 44.0));

        controller.tick(Duration::from_millis(250));
        assert!(close(controller.params().pulse_radius, 44.0 * 1.5));
        assert!(close(controller.params().pulse_alpha, 0.5));

        for _ in 0..20 {
            assert_eq!(controller.tick(Duration::from_millis(333)), None);
        }
        assert_eq!(controller.phase(), Phase::Pulsing);
        assert!(controller.state().progress < 1.0);
    }

    #[test]
    fn test_confirm_dismissal() {
        let mut controller = controller();
        run_until(&mut controller, Phase::Pulsing);

        assert!(controller.dismiss(true));
        assert_eq!(controller.phase(), Phase::DismissingConfirm);
        assert!(!controller.is_interactable());

        controller.tick(Duration::from_millis(125));
        let params = controller.params();
        assert!(close(params.outer_radius, 300.0 * 1.2));
        assert!(close(params.outer_alpha, 0.0));
        assert!(close(params.target_radius, 22.0));
        assert!(close(params.text_alpha, 0.0));

        assert_eq!(controller.tick(Duration::from_millis(125)), Some(Phase::Dismissed));
        assert_eq!(controller.tick(FRAME), None);
    }

    #[test]
    fn test_cancel_dismissal_runs_expansion_backwards() {
        let mut controller = controller();
        run_until(&mut controller, Phase::Pulsing);

        assert!(controller.dismiss(false));
        assert_eq!(controller.phase(), Phase::DismissingCancel);
        assert!(close(controller.params().outer_radius, 300.0));

        controller.tick(Duration::from_millis(125));
        assert!(close(controller.params().outer_radius, 150.0));
        assert!(close(controller.params().target_radius, 22.0));

        run_until(&mut controller, Phase::Dismissed);
        assert_eq!(controller.phase(), Phase::Dismissed);
        assert!(close(controller.params().outer_radius, 0.0));
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let mut controller = controller();
        run_until(&mut controller, Phase::Pulsing);
        assert!(controller.dismiss(true));
        assert!(!controller.dismiss(true));
        assert!(!controller.dismiss(false));
        assert_eq!(controller.phase(), Phase::DismissingConfirm);

        run_until(&mut controller, Phase::Dismissed);
        assert!(!controller.dismiss(true));
    }

    #[test]
    fn test_pulsing_never_jumps_to_dismissed() {
        let mut controller = controller();
        let mut seen = vec![controller.phase()];
        seen.extend(run_until(&mut controller, Phase::Pulsing));
        controller.dismiss(false);
        seen.push(controller.phase());
        seen.extend(run_until(&mut controller, Phase::Dismissed));

        assert_eq!(
            seen,
            vec![
                Phase::Expanding,
                Phase::Pulsing,
                Phase::DismissingCancel,
                Phase::Dismissed
            ]
        );
    }

    #[test]
    fn test_dismiss_during_expansion_skips_pulsing() {
        let mut controller = controller();
        controller.tick(Duration::from_millis(300));
        assert!(controller.dismiss(true));
        let entered = run_until(&mut controller, Phase::Dismissed);
        assert_eq!(entered, vec![Phase::Dismissed]);
        assert!(!controller.is_interactable());
    }

    #[test]
    fn test_relayout_while_pulsing() {
        let mut controller = controller();
        run_until(&mut controller, Phase::Pulsing);
        controller.set_outer_radius(420.0);
        assert_eq!(controller.params().outer_radius, 420.0);
        assert_eq!(controller.outer_radius(), 420.0);
    }
}
