//! mindspace-core
//!
//! Pure domain types for the depression screening flow. No network or
//! runtime dependency — this is the shared vocabulary between the
//! screening session, the scan backend client, and the front end.

pub mod error;
pub mod models;
