use crate::metering::clock::epoch_seconds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::SystemTime;

/// Closing figures of a completed ride.
///
/// The meter resets itself as part of `finish`, so this is the only place
/// the final fare survives; callers keep it for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RideSummary {
    pub total_fare: f64,
    pub moving_seconds: f64,
    pub stopped_seconds: f64,
}

impl RideSummary {
    pub fn elapsed_seconds(&self) -> f64 {
        self.moving_seconds + self.stopped_seconds
    }
}

/// What happened on the meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MeterEventKind {
    RideStarted,
    VehicleMoving,
    VehicleStopped,
    RideFinished(RideSummary),
    MeterReset,
}

impl fmt::Display for MeterEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeterEventKind::RideStarted => write!(f, "ride started"),
            MeterEventKind::VehicleMoving => write!(f, "vehicle set in motion"),
            MeterEventKind::VehicleStopped => write!(f, "vehicle stopped"),
            MeterEventKind::RideFinished(summary) => write!(
                f,
                "ride finished. moving and stopped time: {:.2} seconds, total fare: {:.2} €",
                summary.elapsed_seconds(),
                summary.total_fare
            ),
            MeterEventKind::MeterReset => write!(f, "meter reset"),
        }
    }
}

/// A meter transition as a plain value.
///
/// Transitions return these instead of calling into a logging subsystem;
/// the session routes each one to the process log, the message board and,
/// when attached, the ride-events queue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterEvent {
    /// Seconds since the Unix epoch at the moment of the transition.
    pub timestamp: u64,
    pub kind: MeterEventKind,
}

impl MeterEvent {
    pub(crate) fn at(now: SystemTime, kind: MeterEventKind) -> Self {
        Self {
            timestamp: epoch_seconds(now) as u64,
            kind,
        }
    }
}
