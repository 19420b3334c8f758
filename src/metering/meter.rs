use crate::metering::clock::{epoch_seconds, Clock, SystemClock};
use crate::metering::events::{MeterEvent, MeterEventKind, RideSummary};
use crate::metering::tariff::Tariff;
use std::fmt;
use std::time::SystemTime;
use thiserror::Error;

/// The three situations a meter can be in. A meter that is not running is
/// implicitly "not moving".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterState {
    /// No ride in progress.
    Idle,
    /// Ride in progress, vehicle standing still.
    Stopped,
    /// Ride in progress, vehicle in motion.
    Moving,
}

impl fmt::Display for MeterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeterState::Idle => write!(f, "idle"),
            MeterState::Stopped => write!(f, "stopped"),
            MeterState::Moving => write!(f, "moving"),
        }
    }
}

/// Rejections of the benign kind: the meter was asked for a transition that
/// does not apply. State is never modified when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MeterError {
    #[error("a ride is already in progress")]
    AlreadyRunning,
    #[error("no ride in progress to finish")]
    NoRideInProgress,
}

/// The taxi fare meter.
///
/// Tracks whether a ride is running, whether the vehicle is moving, the
/// seconds spent in each sub-state and the fare accrued so far. Fare only
/// changes in [`FareMeter::accrue`], which every transition routes through,
/// so it always reflects real elapsed clock time in the correct sub-state.
///
/// One meter serves one ride at a time and is reused across rides;
/// `finish` resets it for the next ride.
#[derive(Debug, Clone)]
pub struct FareMeter<C: Clock = SystemClock> {
    tariff: Tariff,
    state: MeterState,
    fare_total: f64,
    started_at: Option<SystemTime>,
    last_event_at: Option<SystemTime>,
    moving_seconds: f64,
    stopped_seconds: f64,
    clock: C,
}

impl FareMeter<SystemClock> {
    /// A meter on the real wall clock.
    pub fn new(tariff: Tariff) -> Self {
        Self::with_clock(tariff, SystemClock)
    }
}

impl<C: Clock> FareMeter<C> {
    pub fn with_clock(tariff: Tariff, clock: C) -> Self {
        let mut meter = Self {
            tariff,
            state: MeterState::Idle,
            fare_total: 0.0,
            started_at: None,
            last_event_at: None,
            moving_seconds: 0.0,
            stopped_seconds: 0.0,
            clock,
        };
        meter.clear_ride();
        meter
    }

    /// Begins a ride in the stopped sub-state; the stopped rate applies
    /// from this instant. Rejected while a ride is running so an accidental
    /// second press cannot wipe the accrued fare.
    pub fn start(&mut self) -> Result<MeterEvent, MeterError> {
        if self.is_running() {
            return Err(MeterError::AlreadyRunning);
        }
        let now = self.clock.now();
        self.state = MeterState::Stopped;
        self.started_at = Some(now);
        self.last_event_at = Some(now);
        Ok(MeterEvent::at(now, MeterEventKind::RideStarted))
    }

    /// Marks the vehicle as moving. Charges the stopped interval that just
    /// ended. Silent no-op unless the ride is running and stopped.
    pub fn begin_moving(&mut self) -> Option<MeterEvent> {
        if self.state != MeterState::Stopped {
            return None;
        }
        let now = self.accrue();
        self.state = MeterState::Moving;
        Some(MeterEvent::at(now, MeterEventKind::VehicleMoving))
    }

    /// Marks the vehicle as stopped. Charges the moving interval that just
    /// ended. Silent no-op unless the ride is running and moving.
    pub fn stop(&mut self) -> Option<MeterEvent> {
        if self.state != MeterState::Moving {
            return None;
        }
        let now = self.accrue();
        self.state = MeterState::Stopped;
        Some(MeterEvent::at(now, MeterEventKind::VehicleStopped))
    }

    /// Closes out the ride: charges the interval still open in whichever
    /// sub-state was active, returns the closing figures inside the
    /// `RideFinished` event and resets the meter for the next ride.
    pub fn finish(&mut self) -> Result<MeterEvent, MeterError> {
        if !self.is_running() {
            return Err(MeterError::NoRideInProgress);
        }
        let now = self.accrue();
        let summary = RideSummary {
            total_fare: self.fare_total,
            moving_seconds: self.moving_seconds,
            stopped_seconds: self.stopped_seconds,
        };
        self.clear_ride();
        Ok(MeterEvent::at(now, MeterEventKind::RideFinished(summary)))
    }

    /// Unconditionally returns the meter to idle with a fresh base fare,
    /// discarding any ride in progress.
    pub fn reset(&mut self) -> MeterEvent {
        self.clear_ride();
        MeterEvent::at(self.clock.now(), MeterEventKind::MeterReset)
    }

    /// Replaces the tariff. Only allowed between rides; the fare of a
    /// running ride must keep the rates it started under.
    pub fn set_tariff(&mut self, tariff: Tariff) -> Result<(), MeterError> {
        if self.is_running() {
            return Err(MeterError::AlreadyRunning);
        }
        self.tariff = tariff;
        self.clear_ride();
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.state != MeterState::Idle
    }

    pub fn is_moving(&self) -> bool {
        self.state == MeterState::Moving
    }

    pub fn state(&self) -> MeterState {
        self.state
    }

    /// Fare accrued up to the last transition of the current ride; equals
    /// the base fare whenever the meter is idle.
    pub fn current_fare(&self) -> f64 {
        self.fare_total
    }

    pub fn moving_seconds(&self) -> f64 {
        self.moving_seconds
    }

    pub fn stopped_seconds(&self) -> f64 {
        self.stopped_seconds
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }

    pub fn tariff(&self) -> Tariff {
        self.tariff
    }

    pub(crate) fn clock_timestamp(&self) -> u64 {
        epoch_seconds(self.clock.now()) as u64
    }

    /// Charges the interval since the last checkpoint at the rate of the
    /// active sub-state and moves the checkpoint to now. The sole mutator
    /// of the fare. An interval that comes out negative (adjusted wall
    /// clock) is clamped to zero so the fare never decreases.
    fn accrue(&mut self) -> SystemTime {
        let now = self.clock.now();
        if !self.is_running() {
            return now;
        }
        if let Some(last) = self.last_event_at {
            let delta = now
                .duration_since(last)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0);
            if self.is_moving() {
                self.moving_seconds += delta;
                self.fare_total += self.tariff.moving_charge(delta);
            } else {
                self.stopped_seconds += delta;
                self.fare_total += self.tariff.stopped_charge(delta);
            }
            self.last_event_at = Some(now);
        }
        now
    }

    fn clear_ride(&mut self) {
        self.state = MeterState::Idle;
        self.fare_total = self.tariff.base_fare;
        self.started_at = None;
        self.last_event_at = None;
        self.moving_seconds = 0.0;
        self.stopped_seconds = 0.0;
    }
}
