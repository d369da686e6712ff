//! Outbound adapters implementing the domain ports.
//!
//! - **memory**: in-process account service, document store, live view and
//!   profile snapshot, with call counters and fault injection
//! - **snapshot**: profile snapshot persisted as a JSON file
//!
//! Adapters translate between port types and their storage. They contain no
//! business logic.

pub mod memory;
pub mod snapshot;
