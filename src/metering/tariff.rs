use serde::{Deserialize, Serialize};

/// Per-ride pricing, fixed for the duration of a ride.
///
/// Rates are currency per minute; the meter charges them pro rata per
/// elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    /// Flag-fall charged as soon as a ride starts.
    pub base_fare: f64,
    /// Rate while the vehicle is in motion.
    pub per_minute_moving: f64,
    /// Rate while the vehicle is stopped but the ride is running.
    pub per_minute_stopped: f64,
}

impl Tariff {
    pub fn new(base_fare: f64, per_minute_moving: f64, per_minute_stopped: f64) -> Self {
        Self {
            base_fare,
            per_minute_moving,
            per_minute_stopped,
        }
    }

    /// Currency charged for `seconds` spent in motion.
    pub fn moving_charge(&self, seconds: f64) -> f64 {
        seconds * (self.per_minute_moving / 60.0)
    }

    /// Currency charged for `seconds` spent stopped.
    pub fn stopped_charge(&self, seconds: f64) -> f64 {
        seconds * (self.per_minute_stopped / 60.0)
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            base_fare: 2.5,
            per_minute_moving: 3.0,
            per_minute_stopped: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tariff_matches_city_rates() {
        let tariff = Tariff::default();
        assert_eq!(tariff.base_fare, 2.5);
        assert_eq!(tariff.per_minute_moving, 3.0);
        assert_eq!(tariff.per_minute_stopped, 1.2);
    }

    #[test]
    fn charges_are_pro_rata_per_second() {
        let tariff = Tariff::new(2.0, 6.0, 3.0);
        assert!((tariff.moving_charge(30.0) - 3.0).abs() < 1e-9);
        assert!((tariff.stopped_charge(20.0) - 1.0).abs() < 1e-9);
    }
}
