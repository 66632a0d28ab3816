//! # Fault Trials
//!
//! Runs eleven independent operations that each fail in a different way, and
//! recovers from every one of them.
//!
//! ## Trials
//!
//! 1. **Read a missing file** - generic I/O error
//! 2. **Open a missing file** - file-not-found, else I/O error
//! 3. **Read two bytes from a one-byte file** - end of input, else I/O error
//! 4. **Connect to a database nobody serves** - database error
//! 5. **Resolve an unregistered type name** - type resolution error
//! 6. **Divide by zero** - arithmetic error
//! 7. **Use an absent value** - null reference error
//! 8. **Index past the end of an array** - index out of bounds error
//! 9. **Downcast to the wrong type** - type mismatch error
//! 10. **Square root of a negative number** - illegal argument error
//! 11. **Parse `"abc"` as an integer** - number format error
//!
//! Each caught fault becomes one line on stderr, `<label> caught: <message>`,
//! and the process always exits with status 0.
//!
//! ## Running
//!
//! ```bash
//! cargo run --bin fault_trials
//!
//! # Structured trace of every attempt
//! RUST_LOG=debug cargo run --bin fault_trials
//! ```
//!
//! ## Key Dependencies
//!
//! - `thiserror` - Derive macro for the fault taxonomy
//! - `sqlx` / `tokio` - MySQL connection attempt and its timeout
//! - `tracing` - Structured events for each attempt
//! - `colored` - Highlighted diagnostic labels on a terminal

pub mod config;
pub mod fault;
pub mod registry;
pub mod runner;
pub mod trials;

pub use config::RunnerConfig;
pub use fault::{Fault, FaultKind};
pub use runner::{install_panic_hook, run, run_trial, run_trials, run_with, Diagnostic, Trial};
pub use trials::TRIALS;
