use log::debug;

use crate::config::LocatorConfig;
use crate::geodesy::Enu;
use crate::navigation::Navigation;
use crate::position::Position;
use crate::status::{StatusBits, StatusSink};
use crate::target::Target;

/// Outcome of checking one resolved fix against the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    pub position: Position,
    /// Offset from the target; `None` when the position is not valid.
    pub offset: Option<Enu>,
    /// Straight-line distance to the target in meters; `None` when the
    /// position is not valid.
    pub distance: Option<f32>,
    pub reached: bool,
}

impl Proximity {
    /// Returns `true` if the fix behind this result was valid.
    pub fn gps_fix(&self) -> bool {
        self.position.is_valid()
    }
}

/// Drives a [`Navigation`] byte by byte and reports, for every resolved fix,
/// whether the target has been reached.
pub struct Locator<S: StatusSink = StatusBits> {
    navigation: Navigation,
    target: Target,
    sink: S,
    last: Option<Proximity>,
}

impl<S: StatusSink> Locator<S> {
    pub fn new(config: &LocatorConfig, sink: S) -> Self {
        Self {
            navigation: Navigation::with_capacity(config.buffer_capacity),
            target: config.target,
            sink,
            last: None,
        }
    }

    /// Feed one byte from the receiver. Returns the proximity result when the
    /// byte completes a GGA sentence; the status sink has been updated by then.
    pub fn step(&mut self, byte: u8) -> Option<Proximity> {
        let position = self.navigation.add_nmea_byte(byte)?;
        Some(self.evaluate(position))
    }

    /// Check `position` against the target and publish both status signals.
    pub fn evaluate(&mut self, position: Position) -> Proximity {
        let proximity = if position.is_valid() {
            let offset = self.target.enu_of(&position);
            let distance = offset.norm();
            Proximity {
                position,
                offset: Some(offset),
                distance: Some(distance),
                reached: self.target.in_range(distance),
            }
        } else {
            Proximity {
                position,
                offset: None,
                distance: None,
                reached: false,
            }
        };

        debug!(
            "fix={} distance={:?} reached={}",
            proximity.gps_fix(),
            proximity.distance,
            proximity.reached
        );
        self.sink.set_gps_fix(proximity.gps_fix());
        self.sink.set_target_reached(proximity.reached);
        self.last = Some(proximity);
        proximity
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The result of the most recent fix, if any since the last reset.
    pub fn last_proximity(&self) -> Option<&Proximity> {
        self.last.as_ref()
    }

    /// Forget the current fix. The status sink is left as it is.
    pub fn reset(&mut self) {
        self.navigation.reset();
        self.last = None;
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
