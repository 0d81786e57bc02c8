pub mod appointment;
pub mod config;
pub mod schedule;
pub mod settings;
