//! Tracing setup for applications embedding the client
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the application through [`init_tracing`].

pub mod config;
pub mod init;

pub use config::InstrumentationConfig;
pub use init::{init_default, init_tracing};
