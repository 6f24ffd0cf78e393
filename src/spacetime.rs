//! Events and travellers placed on a spacetime diagram.
//!
//! Every object stores its coordinates (and velocity) in one fixed rest frame.
//! Anything observed from another frame is computed on demand through an
//! [`ObserverFrame`], and edits made in that frame are converted back before
//! they are stored.

use std::fmt;

use uuid::Uuid;

use crate::error::RelativityError;
use crate::relativity::{check_velocity, ObserverFrame};

/// A point occurrence in spacetime.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacetimeEvent {
    id: Uuid,
    name: String,
    t: f64,
    x: f64,
}

impl SpacetimeEvent {
    pub fn new(name: impl Into<String>, t: f64, x: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            t,
            x,
        }
    }

    /// Identifier used to correlate the object with UI state. Never used in any
    /// calculation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn x(&self, frame: &ObserverFrame) -> f64 {
        frame.lorentz().x_transform(frame.beta(), self.x, self.t)
    }

    pub fn t(&self, frame: &ObserverFrame) -> f64 {
        frame.lorentz().t_transform(frame.beta(), self.x, self.t)
    }

    /// Move the event so that `frame` observes it at `observed_x`, keeping its
    /// rest-frame time.
    pub fn set_x(&mut self, frame: &ObserverFrame, observed_x: f64) {
        self.x = frame.lorentz().rest_x(frame.beta(), observed_x, self.t);
    }

    /// Move the event so that `frame` observes it at `observed_t`, keeping its
    /// rest-frame position.
    pub fn set_t(&mut self, frame: &ObserverFrame, observed_t: f64) {
        self.t = frame.lorentz().rest_t(frame.beta(), self.x, observed_t);
    }

    /// Move the event so that `frame` observes it at `(observed_x, observed_t)`.
    ///
    /// In a moving frame, `set_x` followed by `set_t` does not land on both
    /// values, since each keeps the other rest-frame coordinate fixed.
    pub fn set_position(&mut self, frame: &ObserverFrame, observed_x: f64, observed_t: f64) {
        let (x, t) = frame.lorentz().rest_coordinates(frame.beta(), observed_x, observed_t);
        self.x = x;
        self.t = t;
    }

    pub fn rest_x(&self) -> f64 {
        self.x
    }

    pub fn rest_t(&self) -> f64 {
        self.t
    }
}

impl fmt::Display for SpacetimeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An object moving at constant sub-light velocity.
///
/// `(t, x)` is one point its worldline passes through, not an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacetimeTraveller {
    event: SpacetimeEvent,
    beta: f64,
}

impl SpacetimeTraveller {
    pub fn new(name: impl Into<String>, beta: f64, t: f64, x: f64) -> Result<Self, RelativityError> {
        let beta = check_velocity(beta)?;
        Ok(Self {
            event: SpacetimeEvent::new(name, t, x),
            beta,
        })
    }

    pub fn event(&self) -> &SpacetimeEvent {
        &self.event
    }

    pub fn event_mut(&mut self) -> &mut SpacetimeEvent {
        &mut self.event
    }

    /// Velocity as seen from `frame`.
    pub fn beta(&self, frame: &ObserverFrame) -> f64 {
        frame.lorentz().speed_transform(self.beta, frame.beta())
    }

    /// Change the velocity so that `frame` observes `observed_beta`.
    ///
    /// Returns the observed velocity now in effect. If the matching rest-frame
    /// velocity would reach the speed of light, nothing is changed and the
    /// rejected rest-frame velocity is reported.
    pub fn set_beta(&mut self, frame: &ObserverFrame, observed_beta: f64) -> Result<f64, RelativityError> {
        let rest_beta = frame.lorentz().rest_beta(frame.beta(), observed_beta);
        self.beta = check_velocity(rest_beta)?;
        Ok(observed_beta)
    }

    /// Like [`set_beta`](Self::set_beta), but falls back to the velocity still
    /// observed from `frame` when the update is rejected. Convenient for
    /// displays that simply re-show whatever value is in effect.
    pub fn set_beta_or_current(&mut self, frame: &ObserverFrame, observed_beta: f64) -> f64 {
        match self.set_beta(frame, observed_beta) {
            Ok(beta) => beta,
            Err(err) => {
                log::debug!("{}: {err}", self.event.name);
                self.beta(frame)
            }
        }
    }

    /// Position where the worldline crosses `t = 0` in `frame`.
    pub fn x_intercept(&self, frame: &ObserverFrame) -> f64 {
        self.event.x(frame) - self.beta(frame) * self.event.t(frame)
    }

    pub fn rest_beta(&self) -> f64 {
        self.beta
    }
}

/// Anything that can be placed on a diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum SpacetimeEntity {
    Event(SpacetimeEvent),
    Traveller(SpacetimeTraveller),
}

impl SpacetimeEntity {
    pub fn event(name: impl Into<String>, t: f64, x: f64) -> Self {
        SpacetimeEntity::Event(SpacetimeEvent::new(name, t, x))
    }

    pub fn traveller(name: impl Into<String>, beta: f64, t: f64, x: f64) -> Result<Self, RelativityError> {
        SpacetimeTraveller::new(name, beta, t, x).map(SpacetimeEntity::Traveller)
    }

    fn common(&self) -> &SpacetimeEvent {
        match self {
            SpacetimeEntity::Event(event) => event,
            SpacetimeEntity::Traveller(traveller) => traveller.event(),
        }
    }

    fn common_mut(&mut self) -> &mut SpacetimeEvent {
        match self {
            SpacetimeEntity::Event(event) => event,
            SpacetimeEntity::Traveller(traveller) => traveller.event_mut(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.common().id()
    }

    pub fn name(&self) -> &str {
        self.common().name()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.common_mut().set_name(name);
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SpacetimeEntity::Event(_) => "event",
            SpacetimeEntity::Traveller(_) => "traveller",
        }
    }

    pub fn x(&self, frame: &ObserverFrame) -> f64 {
        self.common().x(frame)
    }

    pub fn t(&self, frame: &ObserverFrame) -> f64 {
        self.common().t(frame)
    }

    pub fn set_x(&mut self, frame: &ObserverFrame, observed_x: f64) {
        self.common_mut().set_x(frame, observed_x);
    }

    pub fn set_t(&mut self, frame: &ObserverFrame, observed_t: f64) {
        self.common_mut().set_t(frame, observed_t);
    }

    pub fn set_position(&mut self, frame: &ObserverFrame, observed_x: f64, observed_t: f64) {
        self.common_mut().set_position(frame, observed_x, observed_t);
    }

    pub fn rest_x(&self) -> f64 {
        self.common().rest_x()
    }

    pub fn rest_t(&self) -> f64 {
        self.common().rest_t()
    }

    pub fn as_traveller(&self) -> Option<&SpacetimeTraveller> {
        match self {
            SpacetimeEntity::Traveller(traveller) => Some(traveller),
            SpacetimeEntity::Event(_) => None,
        }
    }

    pub fn as_traveller_mut(&mut self) -> Option<&mut SpacetimeTraveller> {
        match self {
            SpacetimeEntity::Traveller(traveller) => Some(traveller),
            SpacetimeEntity::Event(_) => None,
        }
    }
}

impl fmt::Display for SpacetimeEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.common(), f)
    }
}
