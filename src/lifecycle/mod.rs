//! Process lifecycle subsystem.
//!
//! Startup is linear (config → logging → metrics → listener → server);
//! shutdown fans out through a broadcast channel so the server drains
//! in-flight requests before the process exits.

pub mod shutdown;

pub use shutdown::Shutdown;
