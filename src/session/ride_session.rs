use crate::communication::EventSink;
use crate::metering::clock::{Clock, SystemClock};
use crate::metering::events::{MeterEvent, MeterEventKind, RideSummary};
use crate::metering::meter::{FareMeter, MeterError};
use crate::metering::tariff::Tariff;
use crate::session::message_board::MessageBoard;

/// One driver's working session: the meter, the visible message board, the
/// retained figures of the last finished ride, and the sinks that receive
/// each meter event.
///
/// The meter itself only returns event values; this is the adapter that
/// routes them to the process log, the board and any attached sinks. A
/// sink failure is logged and absorbed so the ride keeps being metered.
pub struct RideSession<C: Clock = SystemClock> {
    meter: FareMeter<C>,
    board: MessageBoard,
    last_summary: Option<RideSummary>,
    sinks: Vec<Box<dyn EventSink>>,
}

impl RideSession<SystemClock> {
    pub fn new(tariff: Tariff) -> Self {
        Self::with_meter(FareMeter::new(tariff))
    }
}

impl<C: Clock> RideSession<C> {
    pub fn with_meter(meter: FareMeter<C>) -> Self {
        Self {
            meter,
            board: MessageBoard::new(),
            last_summary: None,
            sinks: Vec::new(),
        }
    }

    /// Registers another recipient for meter events (e.g. the ride-events
    /// queue publisher).
    pub fn attach_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn start_ride(&mut self) {
        match self.meter.start() {
            Ok(event) => self.dispatch(event),
            Err(rejection) => self.note_rejection(rejection),
        }
    }

    pub fn vehicle_moving(&mut self) {
        if let Some(event) = self.meter.begin_moving() {
            self.dispatch(event);
        }
    }

    pub fn vehicle_stopped(&mut self) {
        if let Some(event) = self.meter.stop() {
            self.dispatch(event);
        }
    }

    /// Finishes the ride and retains its summary; the meter resets, so
    /// this copy is what the shell displays afterwards.
    pub fn finish_ride(&mut self) -> Option<RideSummary> {
        match self.meter.finish() {
            Ok(event) => {
                if let MeterEventKind::RideFinished(summary) = event.kind {
                    self.last_summary = Some(summary);
                }
                self.dispatch(event);
                self.last_summary
            }
            Err(rejection) => {
                self.note_rejection(rejection);
                None
            }
        }
    }

    pub fn reset_meter(&mut self) {
        let event = self.meter.reset();
        self.dispatch(event);
    }

    /// Swaps the tariff between rides; rejected while a ride is running.
    pub fn change_tariff(&mut self, tariff: Tariff) {
        match self.meter.set_tariff(tariff) {
            Ok(()) => {
                let text = format!(
                    "tariff updated: base {:.2}, moving {:.2}/min, stopped {:.2}/min",
                    tariff.base_fare, tariff.per_minute_moving, tariff.per_minute_stopped
                );
                log::info!("{}", text);
                let timestamp = self.meter.clock_timestamp();
                self.board.post(timestamp, &text);
            }
            Err(rejection) => self.note_rejection(rejection),
        }
    }

    pub fn clear_messages(&mut self) {
        self.board.clear();
    }

    pub fn meter(&self) -> &FareMeter<C> {
        &self.meter
    }

    pub fn board(&self) -> &MessageBoard {
        &self.board
    }

    pub fn last_summary(&self) -> Option<RideSummary> {
        self.last_summary
    }

    fn dispatch(&mut self, event: MeterEvent) {
        let text = event.kind.to_string();
        log::info!("{}", text);
        self.board.post(event.timestamp, &text);
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(&event) {
                log::warn!("could not deliver meter event to a sink: {}", e);
            }
        }
    }

    fn note_rejection(&mut self, rejection: MeterError) {
        log::warn!("{}", rejection);
        let timestamp = self.meter.clock_timestamp();
        self.board.post(timestamp, &rejection.to_string());
    }
}
