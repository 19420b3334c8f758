// taxi_cli_main.rs
use std::io::{stdin, stdout, Write};
use taximeter::communication::event_publisher::EventPublisher;
use taximeter::global_variables::{AMQP_URL, METER_LOG_FILE};
use taximeter::logging;
use taximeter::metering::tariff::Tariff;
use taximeter::session::ride_session::RideSession;

fn main() {
    if let Err(e) = logging::init(METER_LOG_FILE) {
        eprintln!("Could not initialize logging: {}", e);
    }
    log::info!("taximeter session initialized");

    let mut session = RideSession::new(Tariff::default());
    match EventPublisher::connect(AMQP_URL) {
        Ok(publisher) => session.attach_sink(Box::new(publisher)),
        Err(e) => log::warn!("ride events queue unavailable, running offline: {}", e),
    }

    println!("Welcome to the digital taximeter.");
    loop {
        print_menu(&session);
        print!("Enter your choice: ");
        stdout().flush().unwrap();
        let mut input = String::new();
        stdin().read_line(&mut input).unwrap();
        let choice = input.trim().parse::<u32>().unwrap_or(u32::MAX);
        match choice {
            1 => session.start_ride(),
            2 => session.vehicle_moving(),
            3 => session.vehicle_stopped(),
            4 => {
                if let Some(summary) = session.finish_ride() {
                    println!(
                        "Ride total: {:.2} € ({:.0}s moving, {:.0}s stopped)",
                        summary.total_fare, summary.moving_seconds, summary.stopped_seconds
                    );
                }
            }
            5 => show_messages(&session),
            6 => {
                session.clear_messages();
                println!("Messages cleared.");
            }
            7 => {
                log::info!("log viewed from the menu");
                println!("{}", logging::read_log(METER_LOG_FILE));
            }
            8 => change_tariff(&mut session),
            9 => {
                log::info!("help screen opened");
                show_help(session.meter().tariff());
            }
            0 => {
                log::info!("taximeter session closed");
                println!("Goodbye.");
                break;
            }
            _ => println!("Invalid choice. Try again."),
        }
    }
}

fn print_menu(session: &RideSession) {
    let meter = session.meter();
    println!("\nDigital Taximeter");
    println!(
        "State: {} | Fare on the meter: {:.2} €",
        meter.state(),
        meter.current_fare()
    );
    if let Some(summary) = session.last_summary() {
        println!("Last ride total: {:.2} €", summary.total_fare);
    }
    println!("1. Start Ride");
    println!("2. Vehicle Moving");
    println!("3. Vehicle Stopped");
    println!("4. Finish Ride");
    println!("5. Show Messages");
    println!("6. Clear Messages");
    println!("7. View Log");
    println!("8. Change Tariff");
    println!("9. Help");
    println!("0. Exit");
}

fn show_messages(session: &RideSession) {
    if session.board().is_empty() {
        println!("No messages yet.");
        return;
    }
    println!("Messages:");
    for line in session.board().lines() {
        println!("{}", line);
    }
}

fn prompt_rate(label: &str, current: f64) -> f64 {
    print!("{} [{:.2}]: ", label, current);
    stdout().flush().unwrap();
    let mut input = String::new();
    stdin().read_line(&mut input).unwrap();
    // Blank or unparseable input keeps the current rate.
    input.trim().parse::<f64>().unwrap_or(current).max(0.0)
}

fn change_tariff(session: &mut RideSession) {
    let current = session.meter().tariff();
    println!("New tariff (enter to keep the current value):");
    let base_fare = prompt_rate("Base fare (€)", current.base_fare);
    let per_minute_moving = prompt_rate("Moving rate (€/min)", current.per_minute_moving);
    let per_minute_stopped = prompt_rate("Stopped rate (€/min)", current.per_minute_stopped);
    session.change_tariff(Tariff::new(base_fare, per_minute_moving, per_minute_stopped));
}

fn show_help(tariff: Tariff) {
    println!("\nHow the taximeter works:");
    println!(
        "- Starting a ride puts the base fare of {:.2} € on the meter.",
        tariff.base_fare
    );
    println!(
        "- While the vehicle moves, the fare grows by {:.2} € per minute.",
        tariff.per_minute_moving
    );
    println!(
        "- While the vehicle waits, the fare grows by {:.2} € per minute.",
        tariff.per_minute_stopped
    );
    println!("- Finishing the ride shows the total and readies the meter for the next one.");
    println!("- Tariffs can only be changed between rides.");
}
