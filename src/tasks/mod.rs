//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiry sweep: removes uploaded files older than the configured maximum age

mod sweeper;

pub use sweeper::{spawn_expiry_sweeper, sweep_once};
