// communication/mod.rs
pub mod event_publisher;

use crate::metering::events::MeterEvent;
use std::error::Error;

/// A recipient of meter events. The session fans each event out to every
/// attached sink and absorbs individual delivery failures.
pub trait EventSink {
    fn deliver(&self, event: &MeterEvent) -> Result<(), Box<dyn Error>>;
}
