//! Background Tasks Module
//!
//! Periodic maintenance that runs alongside the HTTP server.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
