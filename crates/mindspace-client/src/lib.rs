//! mindspace-client
//!
//! HTTP access to the MindSpace REST backend. Implements the screening
//! crate's `ScanBackend` over the depression-scan endpoint.

pub mod client;
pub mod scan;
