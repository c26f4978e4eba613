//! Operations center simulation core.
//!
//! A fixed roster of operators, a stream of generated emergencies, and a
//! tick-driven assignment loop. Presentation layers drive it through
//! [`engine::SimEngine`] commands and read it through snapshots.

pub mod clock;
pub mod command;
pub mod config;
pub mod emergency;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator_subsystem;
pub mod ledger;
pub mod rng;
pub mod roster;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod subsystem;
pub mod timeout_subsystem;
pub mod types;
