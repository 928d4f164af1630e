//! Build requests emitted for cache misses.
//!
//! A rewrite pass never builds anything. Each cache miss becomes a
//! [`BuildRequest`] in the pass outcome, and the caller hands the collected
//! requests to a [`BuildScheduler`] once the pass has finished.

use kiln_common::Coordinate;
use serde::{Deserialize, Serialize};

use crate::ids::ModuleId;

/// A request to (re)build one module's artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// The module whose cache was found invalid.
    pub module: ModuleId,
    /// The module's project path.
    pub path: String,
    /// The artifact the build is expected to produce.
    pub artifact: Coordinate,
}

/// Receives build requests after a pass.
///
/// Implementations should be idempotent: the same module may be requested
/// once per edge that reaches it.
pub trait BuildScheduler {
    /// Schedules the module named by `request` for building.
    fn schedule_build(&mut self, request: &BuildRequest);
}

/// Hands every request to `scheduler` in emission order.
pub fn dispatch(requests: &[BuildRequest], scheduler: &mut dyn BuildScheduler) {
    for request in requests {
        scheduler.schedule_build(request);
    }
}

/// An ordered, de-duplicated list of modules to build.
///
/// Serializes to JSON for consumption by an external build executor.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    builds: Vec<BuildRequest>,
}

impl BuildPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a plan from a list of requests.
    pub fn from_requests(requests: &[BuildRequest]) -> Self {
        let mut plan = Self::new();
        dispatch(requests, &mut plan);
        plan
    }

    /// The planned builds, in first-requested order.
    pub fn builds(&self) -> &[BuildRequest] {
        &self.builds
    }

    /// Returns `true` if `module` is already planned.
    pub fn contains(&self, module: ModuleId) -> bool {
        self.builds.iter().any(|b| b.module == module)
    }

    /// The number of distinct modules planned.
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    /// Returns `true` if nothing needs building.
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

impl BuildScheduler for BuildPlan {
    fn schedule_build(&mut self, request: &BuildRequest) {
        if self.contains(request.module) {
            return;
        }
        tracing::debug!(module = %request.path, artifact = %request.artifact, "planned build");
        self.builds.push(request.clone());
    }
}
