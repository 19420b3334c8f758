// session/mod.rs
pub mod message_board;
pub mod ride_session;
