//! Precache - versioned offline asset cache
//!
//! A service-worker style cache engine: one versioned, named cache of
//! site assets, a dual routing policy (network-first for documents,
//! cache-first with background refresh for everything else), and an
//! offline fallback document when both miss.

pub mod config;
pub mod error;
pub mod fetch;
pub mod store;
pub mod worker;

pub use error::{PrecacheError, PrecacheResult};
