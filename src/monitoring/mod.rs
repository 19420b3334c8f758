// monitoring/mod.rs
pub mod ride_monitor;
