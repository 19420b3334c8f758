use taximeter::monitoring::ride_monitor::{listen_ride_events, run_cli};
use tokio::join;

#[tokio::main]
async fn main() {
    env_logger::init();

    // Consume the ride-events queue in the background.
    let events_listener = tokio::spawn(async {
        if let Err(e) = listen_ride_events().await {
            eprintln!("Error in ride events listener: {}", e);
        }
    });

    // Run the admin CLI concurrently.
    let cli_handle = tokio::spawn(async {
        run_cli().await;
    });

    // Wait for both tasks (the CLI will exit on its own).
    let _ = join!(events_listener, cli_handle);
}
