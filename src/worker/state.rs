//! Worker lifecycle states

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a cache worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Created, install not yet attempted
    New,
    /// Install in progress
    Installing,
    /// Cache fully provisioned, waiting to activate
    Installed,
    /// Activation in progress (pruning old generations)
    Activating,
    /// Active and routing fetches
    Activated,
    /// Last install attempt failed; install may be retried
    Failed,
}

impl WorkerState {
    /// Whether fetches should be routed through this worker
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, Self::Activated)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Installing => write!(f, "installing"),
            Self::Installed => write!(f, "installed"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Failed => write!(f, "failed"),
        }
    }
}
