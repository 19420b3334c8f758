use crate::communication::EventSink;
use crate::global_variables::QUEUE_RIDE_EVENTS;
use crate::metering::events::MeterEvent;
use amiquip::{
    Channel, Connection, Exchange, Publish, QueueDeclareOptions, Result as AmiquipResult,
};
use std::error::Error;

/// Publishes meter events to the "ride_events" queue as JSON payloads, so
/// the ride monitor can record them from another process.
pub struct EventPublisher {
    connection: Connection,
    channel: Channel,
}

impl EventPublisher {
    /// Opens the broker connection and declares the queue up front, so
    /// events published before the monitor attaches are kept.
    pub fn connect(url: &str) -> AmiquipResult<Self> {
        let mut connection = Connection::insecure_open(url)?;
        let channel = connection.open_channel(None)?;
        channel.queue_declare(QUEUE_RIDE_EVENTS, QueueDeclareOptions::default())?;
        Ok(Self {
            connection,
            channel,
        })
    }

    pub fn publish(&self, event: &MeterEvent) -> Result<(), Box<dyn Error>> {
        let payload = serde_json::to_vec(event)?;
        let exchange = Exchange::direct(&self.channel);
        exchange.publish(Publish::new(&payload, QUEUE_RIDE_EVENTS))?;
        Ok(())
    }

    pub fn close(self) -> AmiquipResult<()> {
        self.connection.close()
    }
}

impl EventSink for EventPublisher {
    fn deliver(&self, event: &MeterEvent) -> Result<(), Box<dyn Error>> {
        self.publish(event)
    }
}
