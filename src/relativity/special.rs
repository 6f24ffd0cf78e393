//! Lorentz boosts along a single spatial axis.
//!
//! Coordinates are `(x, t)` pairs. Velocities are expressed as `beta`, a fraction
//! of the speed of light. The forward transforms map rest-frame coordinates into a
//! frame moving at `beta`; the `rest_*` functions map an observed value back,
//! given the rest-frame value of the other axis.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::RelativityError;

pub const C: f64 = 299_792_458.0;
pub const APPROXIMATE_C: f64 = 3.0e8;

/// The value of the speed of light used by every transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpeedOfLight {
    /// c = 1, distances measured in light-seconds.
    #[default]
    #[value(name = "one")]
    #[serde(rename = "one")]
    Normalized,
    /// c = 3e8 m/s
    Approximate,
    /// c = 299 792 458 m/s
    Exact,
}

impl SpeedOfLight {
    pub fn value(self) -> f64 {
        match self {
            SpeedOfLight::Normalized => 1.0,
            SpeedOfLight::Approximate => APPROXIMATE_C,
            SpeedOfLight::Exact => C,
        }
    }

    /// The next setting in the order one, approximate, exact.
    pub fn cycle(self) -> Self {
        match self {
            SpeedOfLight::Normalized => SpeedOfLight::Approximate,
            SpeedOfLight::Approximate => SpeedOfLight::Exact,
            SpeedOfLight::Exact => SpeedOfLight::Normalized,
        }
    }

    fn to_raw(self) -> u8 {
        match self {
            SpeedOfLight::Normalized => 0,
            SpeedOfLight::Approximate => 1,
            SpeedOfLight::Exact => 2,
        }
    }

    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => SpeedOfLight::Approximate,
            2 => SpeedOfLight::Exact,
            _ => SpeedOfLight::Normalized,
        }
    }
}

impl fmt::Display for SpeedOfLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedOfLight::Normalized => write!(f, "c = 1 s/s"),
            SpeedOfLight::Approximate => write!(f, "c = 300,000,000 m/s"),
            SpeedOfLight::Exact => write!(f, "c = 299,792,458 m/s"),
        }
    }
}

static SPEED_OF_LIGHT: AtomicU8 = AtomicU8::new(0);

/// Select the process-wide speed of light.
///
/// Stored coordinates are left alone; only later transforms see the new value.
pub fn set_speed_of_light(c: SpeedOfLight) {
    SPEED_OF_LIGHT.store(c.to_raw(), Ordering::Relaxed);
    log::info!("speed of light set to {c}");
}

pub fn speed_of_light() -> SpeedOfLight {
    SpeedOfLight::from_raw(SPEED_OF_LIGHT.load(Ordering::Relaxed))
}

/// Lorentz factor γ = 1 / sqrt(1 + β²)
///
/// NOTE: this is deliberately *not* the textbook 1 / sqrt(1 - β²). Diagrams drawn
/// by this tool have always used the `1 + β²` form and every transform below is
/// built on it, so forward and inverse maps still compose to the identity.
pub fn lorentz_factor(beta: f64) -> f64 {
    // hypot keeps 1 + β² from overflowing for huge β
    1.0 / beta.hypot(1.0)
}

/// Fails unless `|beta| < 1`.
pub fn check_velocity(beta: f64) -> Result<f64, RelativityError> {
    if beta.is_finite() && beta.abs() < 1.0 {
        Ok(beta)
    } else {
        Err(RelativityError::InvalidVelocity { beta })
    }
}

/// A boost calculator bound to one value of c.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LorentzTransform {
    c: f64,
}

impl Default for LorentzTransform {
    fn default() -> Self {
        Self::new(SpeedOfLight::Normalized)
    }
}

impl LorentzTransform {
    pub fn new(c: SpeedOfLight) -> Self {
        Self { c: c.value() }
    }

    /// Snapshot of the process-wide speed of light.
    pub fn current() -> Self {
        Self::new(speed_of_light())
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    /// x′ = γ (x − β c t)
    pub fn x_transform(&self, beta: f64, x: f64, t: f64) -> f64 {
        lorentz_factor(beta) * (x - beta * self.c * t)
    }

    /// t′ = γ (c t − β x) / c
    pub fn t_transform(&self, beta: f64, x: f64, t: f64) -> f64 {
        lorentz_factor(beta) * (self.c * t - beta * x) / self.c
    }

    /// Rest-frame x from the observed `x` and the rest-frame `rest_t`.
    pub fn rest_x(&self, beta: f64, x: f64, rest_t: f64) -> f64 {
        x / lorentz_factor(beta) + beta * self.c * rest_t
    }

    /// Rest-frame t from the rest-frame `rest_x` and the observed `t`.
    pub fn rest_t(&self, beta: f64, rest_x: f64, t: f64) -> f64 {
        (self.c * t / lorentz_factor(beta) + beta * rest_x) / self.c
    }

    /// Rest-frame `(x, t)` of the point observed at `(x, t)` from a frame moving
    /// at `beta`. Inverts both forward transforms at once; the boost matrix has
    /// determinant γ²(1 − β²).
    pub fn rest_coordinates(&self, beta: f64, x: f64, t: f64) -> (f64, f64) {
        let scale = lorentz_factor(beta) * (1.0 - beta * beta);
        let ct = self.c * t;
        let rest_x = (x + beta * ct) / scale;
        let rest_ct = (ct + beta * x) / scale;
        (rest_x, rest_ct / self.c)
    }

    /// Velocity of an object moving at `rest_beta` as seen by an observer moving
    /// at `observer_beta`.
    pub fn speed_transform(&self, rest_beta: f64, observer_beta: f64) -> f64 {
        (rest_beta - observer_beta) / (1.0 - observer_beta * rest_beta)
    }

    /// Inverse of [`speed_transform`](Self::speed_transform): relativistic
    /// velocity addition.
    pub fn rest_beta(&self, observer_beta: f64, observed_beta: f64) -> f64 {
        (observer_beta + observed_beta) / (1.0 + observer_beta * observed_beta)
    }
}

/// The frame a diagram is viewed from: a validated observer velocity together
/// with the transform used to view it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverFrame {
    beta: f64,
    lorentz: LorentzTransform,
}

impl ObserverFrame {
    /// Observer moving at `beta` under the process-wide speed of light.
    pub fn new(beta: f64) -> Result<Self, RelativityError> {
        Self::with_transform(beta, LorentzTransform::current())
    }

    pub fn with_transform(beta: f64, lorentz: LorentzTransform) -> Result<Self, RelativityError> {
        if beta.is_finite() && beta.abs() < 1.0 {
            Ok(Self { beta, lorentz })
        } else {
            Err(RelativityError::InvalidObserverFrame { beta })
        }
    }

    /// The frame the objects are stored in.
    pub fn rest() -> Self {
        Self {
            beta: 0.0,
            lorentz: LorentzTransform::current(),
        }
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn lorentz(&self) -> &LorentzTransform {
        &self.lorentz
    }
}
