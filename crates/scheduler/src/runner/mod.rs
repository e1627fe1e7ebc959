//! Scheduler facade.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, constructors, registration, and accessors
//! - `execution`: `start()`, which dispatches every task and drains results

mod core;
mod execution;

pub use self::core::Scheduler;
