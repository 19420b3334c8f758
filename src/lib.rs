pub mod communication;
pub mod global_variables;
pub mod logging;
pub mod metering;
pub mod monitoring;
pub mod session;
