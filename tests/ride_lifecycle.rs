use std::time::{Duration, UNIX_EPOCH};
use taximeter::logging;
use taximeter::metering::clock::ManualClock;
use taximeter::metering::events::{MeterEvent, MeterEventKind, RideSummary};
use taximeter::metering::meter::FareMeter;
use taximeter::metering::tariff::Tariff;
use taximeter::session::ride_session::RideSession;

fn session_at(epoch: u64) -> (RideSession<ManualClock>, ManualClock) {
    let clock = ManualClock::starting_at(UNIX_EPOCH + Duration::from_secs(epoch));
    let session = RideSession::with_meter(FareMeter::with_clock(Tariff::default(), clock.clone()));
    (session, clock)
}

#[test]
fn a_city_ride_accrues_per_minute_rates_on_top_of_base() {
    let (mut session, clock) = session_at(1_756_000_000);

    session.start_ride();
    clock.advance(Duration::from_secs(30));
    session.vehicle_moving();
    clock.advance(Duration::from_secs(40));
    session.vehicle_stopped();
    clock.advance(Duration::from_secs(20));
    let summary = session.finish_ride().unwrap();

    // base 2.5 + 50 s stopped at 1.2/min + 40 s moving at 3.0/min
    assert!((summary.total_fare - 5.5).abs() < 1e-9);
    assert!((summary.moving_seconds - 40.0).abs() < 1e-9);
    assert!((summary.stopped_seconds - 50.0).abs() < 1e-9);

    let lines = session.board().lines();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("ride started"));
    assert!(lines[1].ends_with("vehicle set in motion"));
    assert!(lines[2].ends_with("vehicle stopped"));
    assert!(lines[3].contains("total fare: 5.50 €"));
}

#[test]
fn double_start_cannot_wipe_a_running_fare() {
    let (mut session, clock) = session_at(1_756_000_000);

    session.start_ride();
    clock.advance(Duration::from_secs(60));
    session.start_ride();
    clock.advance(Duration::from_secs(60));
    let summary = session.finish_ride().unwrap();

    // The rejected second start left the 120 s stopped interval intact.
    assert!((summary.total_fare - 4.9).abs() < 1e-9);
    assert!(session
        .board()
        .lines()
        .iter()
        .any(|line| line.ends_with("a ride is already in progress")));
}

#[test]
fn a_new_tariff_applies_to_the_next_ride_only() {
    let (mut session, clock) = session_at(1_756_000_000);

    session.start_ride();
    clock.advance(Duration::from_secs(60));
    session.change_tariff(Tariff::new(4.0, 6.0, 2.4));
    assert_eq!(session.meter().tariff(), Tariff::default());
    let first = session.finish_ride().unwrap();
    assert!((first.total_fare - 3.7).abs() < 1e-9);

    session.change_tariff(Tariff::new(4.0, 6.0, 2.4));
    session.start_ride();
    session.vehicle_moving();
    clock.advance(Duration::from_secs(60));
    let second = session.finish_ride().unwrap();
    assert!((second.total_fare - 10.0).abs() < 1e-9);
}

#[test]
fn missing_meter_log_shows_the_sentinel_line() {
    let path = std::env::temp_dir().join(format!("taximeter-it-{}.log", std::process::id()));
    let _ = std::fs::remove_file(&path);
    assert_eq!(logging::read_log(path.to_str().unwrap()), "log file not found.");
}

#[test]
fn queue_payloads_parse_back_into_the_same_event() {
    let event = MeterEvent {
        timestamp: 1_756_000_000,
        kind: MeterEventKind::RideFinished(RideSummary {
            total_fare: 5.5,
            moving_seconds: 40.0,
            stopped_seconds: 50.0,
        }),
    };
    let payload = serde_json::to_vec(&event).unwrap();
    let parsed: MeterEvent = serde_json::from_slice(&payload).unwrap();
    assert_eq!(parsed, event);
}
