use crate::animation::{Curve, Tween};
use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

/// Layout constants, in logical units before [`Dimensions::scaled`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub target_radius: f64,
    pub target_padding: f64,
    pub circle_padding: f64,
    pub text_padding: f64,
    pub text_spacing: f64,
    /// Band near the top/bottom boundary where the halo centers on the target.
    pub gutter: f64,
    pub shadow: f64,
    /// Horizontal nudge of the text block toward the viewport center.
    pub text_bias: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            target_radius: 44.0,
            target_padding: 20.0,
            circle_padding: 40.0,
            text_padding: 40.0,
            text_spacing: 8.0,
            gutter: 88.0,
            shadow: 8.0,
            text_bias: 20.0,
        }
    }
}

impl Dimensions {
    /// Converts logical units to device units.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            target_radius: self.target_radius * factor,
            target_padding: self.target_padding * factor,
            circle_padding: self.circle_padding * factor,
            text_padding: self.text_padding * factor,
            text_spacing: self.text_spacing * factor,
            gutter: self.gutter * factor,
            shadow: self.shadow * factor,
            text_bias: self.text_bias * factor,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timings {
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub expand_delay: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub expand: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub pulse: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub dismiss: Duration,
    pub curve: Curve,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            expand_delay: Duration::from_millis(250),
            expand: Duration::from_millis(250),
            pulse: Duration::from_millis(1000),
            dismiss: Duration::from_millis(250),
            curve: Curve::default(),
        }
    }
}

impl Timings {
    pub fn expand_tween(&self) -> Tween {
        Tween::new(self.expand)
            .delay_by(self.expand_delay)
            .curve(self.curve)
    }

    pub fn pulse_tween(&self) -> Tween {
        Tween::new(self.pulse).repeating().curve(self.curve)
    }

    pub fn dismiss_tween(&self, confirmed: bool) -> Tween {
        let tween = Tween::new(self.dismiss).curve(self.curve);
        if confirmed { tween } else { tween.reversed() }
    }
}
