// metering/mod.rs
pub mod clock;
pub mod events;
pub mod meter;
pub mod tariff;
