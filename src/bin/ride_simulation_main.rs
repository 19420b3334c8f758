// ride_simulation_main.rs
use rand::Rng;
use std::time::Duration;
use taximeter::communication::event_publisher::EventPublisher;
use taximeter::global_variables::AMQP_URL;
use taximeter::metering::clock::ManualClock;
use taximeter::metering::meter::FareMeter;
use taximeter::metering::tariff::Tariff;
use taximeter::session::ride_session::RideSession;

const RIDES: u32 = 10;

/// Drives the meter through randomized rides on a hand-advanced clock, so a
/// day of fares takes seconds and still lands on the ride-events queue.
#[tokio::main]
async fn main() {
    env_logger::init();

    let clock = ManualClock::starting_now();
    let mut session =
        RideSession::with_meter(FareMeter::with_clock(Tariff::default(), clock.clone()));
    match EventPublisher::connect(AMQP_URL) {
        Ok(publisher) => session.attach_sink(Box::new(publisher)),
        Err(e) => eprintln!("Ride events queue unavailable, simulating offline: {}", e),
    }

    let mut rng = rand::rng();
    for ride in 1..=RIDES {
        session.start_ride();
        let legs = rng.random_range(2..=6);
        for _ in 0..legs {
            clock.advance(Duration::from_secs(rng.random_range(20..=180)));
            if rng.random_bool(0.7) {
                session.vehicle_moving();
            } else {
                session.vehicle_stopped();
            }
        }
        clock.advance(Duration::from_secs(rng.random_range(20..=180)));
        if let Some(summary) = session.finish_ride() {
            println!(
                "Ride {} finished: {:.2} € ({:.0}s moving, {:.0}s stopped)",
                ride, summary.total_fare, summary.moving_seconds, summary.stopped_seconds
            );
        }
        // Gap between fares, and a breather so the queue keeps up.
        clock.advance(Duration::from_secs(rng.random_range(60..=600)));
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    println!("Simulation complete: {} rides.", RIDES);
}
