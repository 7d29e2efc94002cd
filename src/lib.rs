//! Production logbook for a photo/video shoot studio.
//!
//! The session table lives in one CSV file shared with an older deployment;
//! this crate loads it, heals historical damage (renamed columns, loose
//! boolean tokens, legacy markers), enforces the cross-field consistency
//! rules, and computes time-filtered statistics. The binary in `main.rs`
//! is a thin CLI over this library.

pub mod config;
pub mod logging;
pub mod normalize;
pub mod record;
pub mod report;
pub mod schema;
pub mod store;
pub mod table;

pub use normalize::{enforce_consistency, normalize};
pub use record::{NewSession, SessionRecord, ValidationError};
pub use store::Logbook;
pub use table::{distinct_advisors, Table, Value};
