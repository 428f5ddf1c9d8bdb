//! The cache worker
//!
//! Composes the versioned cache lifecycle (install, activate, prune),
//! the per-request routing policy, and the page-facing control channel.

mod clients;
mod events;
mod lifecycle;
mod router;
mod state;
mod tasks;

pub use clients::{Client, ClientRegistry};
pub use events::{ControlMessage, WorkerEvent};
pub use lifecycle::ServiceWorker;
pub use router::{FetchOutcome, Router};
pub use state::WorkerState;
pub use tasks::BackgroundTasks;
