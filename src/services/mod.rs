pub mod booking;
pub mod commands;
pub mod notify;
