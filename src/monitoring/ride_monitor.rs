use crate::global_variables::{
    AMQP_URL, FARES_CHART_PNG, METER_EVENTS_CSV, QUEUE_RIDE_EVENTS, RIDES_CSV,
};
use crate::metering::clock::{clock_time, epoch_seconds};
use crate::metering::events::{MeterEvent, MeterEventKind, RideSummary};
use amiquip::{
    Connection, ConsumerMessage, ConsumerOptions, Exchange, QueueDeclareOptions,
    Result as AmiquipResult,
};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{stdin, stdout, Write};
use std::path::Path;
use std::time::SystemTime;

/// One CSV row per meter event, with the event flattened to its display line.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeterEventRecord {
    pub timestamp: u64,
    pub event: String,
}

/// One CSV row per finished ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideRecord {
    pub timestamp: u64,
    pub total_fare: f64,
    pub moving_seconds: f64,
    pub stopped_seconds: f64,
}

fn event_row(event: &MeterEvent) -> MeterEventRecord {
    MeterEventRecord {
        timestamp: event.timestamp,
        event: event.kind.to_string(),
    }
}

fn ride_row(timestamp: u64, summary: &RideSummary) -> RideRecord {
    RideRecord {
        timestamp,
        total_fare: summary.total_fare,
        moving_seconds: summary.moving_seconds,
        stopped_seconds: summary.stopped_seconds,
    }
}

// Generic helper to log a record to a CSV file.
fn log_to_csv<T: Serialize>(filename: &str, record: &T) -> Result<(), Box<dyn Error>> {
    let file_exists = Path::new(filename).exists();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(filename)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

pub fn log_meter_event_record(record: MeterEventRecord) {
    if let Err(e) = log_to_csv(METER_EVENTS_CSV, &record) {
        eprintln!("Error logging meter event: {}", e);
    }
}

pub fn log_ride_record(record: RideRecord) {
    if let Err(e) = log_to_csv(RIDES_CSV, &record) {
        eprintln!("Error logging ride record: {}", e);
    }
}

// Log the event row and, for a finished ride, the ride row as well.
pub fn log_meter_event(event: &MeterEvent) {
    log_meter_event_record(event_row(event));
    if let MeterEventKind::RideFinished(summary) = event.kind {
        log_ride_record(ride_row(event.timestamp, &summary));
    }
}

/// Listens to the "ride_events" queue and logs each incoming event.
pub async fn listen_ride_events() -> AmiquipResult<()> {
    tokio::task::spawn_blocking(|| -> AmiquipResult<()> {
        let mut connection = Connection::insecure_open(AMQP_URL)?;
        let channel = connection.open_channel(None)?;
        let _exchange = Exchange::direct(&channel);
        let queue = channel.queue_declare(QUEUE_RIDE_EVENTS, QueueDeclareOptions::default())?;
        let consumer = queue.consume(ConsumerOptions::default())?;
        for message in consumer.receiver() {
            match message {
                ConsumerMessage::Delivery(delivery) => {
                    let ts = epoch_seconds(SystemTime::now()) as u64;
                    if let Ok(json_str) = std::str::from_utf8(&delivery.body) {
                        match serde_json::from_str::<MeterEvent>(json_str) {
                            Ok(event) => log_meter_event(&event),
                            // Keep unparseable payloads as raw text rows.
                            Err(_) => log_meter_event_record(MeterEventRecord {
                                timestamp: ts,
                                event: json_str.to_string(),
                            }),
                        }
                    }
                    consumer.ack(delivery)?;
                }
                other => {
                    println!("Ride events consumer ended: {:?}", other);
                    break;
                }
            }
        }
        connection.close()
    })
    .await
    .unwrap()
}

// Helper: Count records in a CSV file.
fn count_csv_records(filename: &str) -> Result<usize, Box<dyn Error>> {
    let file = File::open(filename)?;
    let mut rdr = csv::Reader::from_reader(file);
    let count = rdr.deserialize::<serde_json::Value>().count();
    Ok(count)
}

/// Reads and displays records from "meter_events.csv".
pub fn show_meter_events() -> Result<(), Box<dyn Error>> {
    if !Path::new(METER_EVENTS_CSV).exists() {
        println!("No meter events recorded yet.");
        return Ok(());
    }
    let file = File::open(METER_EVENTS_CSV)?;
    let mut rdr = csv::Reader::from_reader(file);
    println!("Meter Events:");
    for result in rdr.deserialize() {
        let record: MeterEventRecord = result?;
        println!("{} - {}", clock_time(record.timestamp), record.event);
    }
    Ok(())
}

/// Reads and displays records from "rides.csv".
pub fn show_ride_records() -> Result<(), Box<dyn Error>> {
    if !Path::new(RIDES_CSV).exists() {
        println!("No rides recorded yet.");
        return Ok(());
    }
    let file = File::open(RIDES_CSV)?;
    let mut rdr = csv::Reader::from_reader(file);
    println!("Rides:");
    for result in rdr.deserialize() {
        let record: RideRecord = result?;
        println!(
            "{} - fare {:.2} € ({:.0}s moving, {:.0}s stopped)",
            clock_time(record.timestamp),
            record.total_fare,
            record.moving_seconds,
            record.stopped_seconds
        );
    }
    Ok(())
}

/// Record counts plus revenue figures across the two CSV files.
pub fn generate_report_summary() -> Result<(), Box<dyn Error>> {
    println!("Generating Report Summary...");
    let event_count = if Path::new(METER_EVENTS_CSV).exists() {
        count_csv_records(METER_EVENTS_CSV)?
    } else {
        0
    };
    let rides = load_ride_records()?;
    println!("Report Summary:");
    println!("Meter Events: {} records", event_count);
    println!("Finished Rides: {} records", rides.len());
    if !rides.is_empty() {
        let total: f64 = rides.iter().map(|r| r.total_fare).sum();
        println!("Total Revenue: {:.2} €", total);
        println!("Average Fare: {:.2} €", total / rides.len() as f64);
    }
    Ok(())
}

fn load_ride_records() -> Result<Vec<RideRecord>, Box<dyn Error>> {
    if !Path::new(RIDES_CSV).exists() {
        return Ok(Vec::new());
    }
    let mut rdr = csv::Reader::from_path(RIDES_CSV)?;
    Ok(rdr.deserialize().filter_map(Result::ok).collect())
}

/// Scatterplot of ride fares over time using Plotters.
pub fn show_fares_chart() -> Result<(), Box<dyn Error>> {
    let rides = load_ride_records()?;
    if rides.is_empty() {
        println!("No ride data available.");
        return Ok(());
    }

    let min_ts = rides.iter().map(|r| r.timestamp).min().unwrap();
    let max_ts = rides.iter().map(|r| r.timestamp).max().unwrap();
    let min_fare = rides
        .iter()
        .map(|r| r.total_fare)
        .fold(f64::INFINITY, f64::min);
    let max_fare = rides
        .iter()
        .map(|r| r.total_fare)
        .fold(f64::NEG_INFINITY, f64::max);

    let backend = BitMapBackend::new(FARES_CHART_PNG, (800, 600));
    let root = backend.into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Ride Fares Over Time", ("sans-serif", 20))
        .margin(40)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(min_ts..max_ts, min_fare..max_fare)?;

    chart.configure_mesh().draw()?;
    chart.draw_series(
        rides
            .iter()
            .map(|r| Circle::new((r.timestamp, r.total_fare), 5, RED.filled())),
    )?;

    root.present()?;
    println!("Fares chart saved to {}", FARES_CHART_PNG);
    Ok(())
}

/// Provides a simple CLI for fleet reporting.
pub async fn run_cli() {
    loop {
        println!("\nRide Monitor Admin CLI");
        println!("1. Display Meter Events");
        println!("2. Display Finished Rides");
        println!("3. Generate Report Summary");
        println!("4. Show Fares Chart");
        println!("5. Exit");
        print!("Enter your choice: ");
        stdout().flush().unwrap();
        let mut input = String::new();
        stdin().read_line(&mut input).unwrap();
        let choice = input.trim().parse::<u32>().unwrap_or(0);
        match choice {
            1 => {
                if let Err(e) = show_meter_events() {
                    eprintln!("Error displaying meter events: {}", e);
                }
            }
            2 => {
                if let Err(e) = show_ride_records() {
                    eprintln!("Error displaying rides: {}", e);
                }
            }
            3 => {
                if let Err(e) = generate_report_summary() {
                    eprintln!("Error generating report summary: {}", e);
                }
            }
            4 => {
                if let Err(e) = show_fares_chart() {
                    eprintln!("Error generating fares chart: {}", e);
                }
            }
            5 => {
                println!("Exiting CLI.");
                break;
            }
            _ => {
                println!("Invalid choice. Try again.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    fn scratch_csv(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("taximeter-monitor-{}-{}.csv", std::process::id(), name))
    }

    #[test]
    fn event_row_flattens_the_kind_to_its_display_line() {
        let event = MeterEvent::at(
            UNIX_EPOCH + Duration::from_secs(100),
            MeterEventKind::VehicleMoving,
        );
        let row = event_row(&event);
        assert_eq!(row.timestamp, 100);
        assert_eq!(row.event, "vehicle set in motion");
    }

    #[test]
    fn ride_row_copies_the_summary_figures() {
        let summary = RideSummary {
            total_fare: 5.5,
            moving_seconds: 40.0,
            stopped_seconds: 20.0,
        };
        let row = ride_row(200, &summary);
        assert_eq!(row.timestamp, 200);
        assert!((row.total_fare - 5.5).abs() < 1e-9);
        assert!((row.moving_seconds - 40.0).abs() < 1e-9);
        assert!((row.stopped_seconds - 20.0).abs() < 1e-9);
    }

    #[test]
    fn csv_appends_write_one_header_and_read_back() {
        let path = scratch_csv("appends");
        let _ = std::fs::remove_file(&path);
        let filename = path.to_str().unwrap();

        for ts in [10u64, 20u64] {
            log_to_csv(
                filename,
                &MeterEventRecord {
                    timestamp: ts,
                    event: "ride started".to_string(),
                },
            )
            .unwrap();
        }

        let mut rdr = csv::Reader::from_path(filename).unwrap();
        let rows: Vec<MeterEventRecord> = rdr.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].timestamp, 10);
        assert_eq!(rows[1].timestamp, 20);
        assert_eq!(count_csv_records(filename).unwrap(), 2);

        let _ = std::fs::remove_file(&path);
    }
}
