//! telescope-types — Rust mirrors of the netcon custom resources.
//!
//! The upstream operator owns these schemas; this crate only mirrors
//! them so the dashboard can list, render, and patch the objects.
//! Field names follow the wire format exactly (camelCase, with the
//! upstream's `externalIPAddress`-style spellings).
//!
//! | Kind | Scope | Purpose |
//! |---|---|---|
//! | `Problem` | namespaced | workload template + desired assignable replicas |
//! | `ProblemEnvironment` | namespaced | instantiated deployment of a Problem |
//! | `Worker` | cluster | fleet node with capacity telemetry |

pub mod condition;
pub mod environment;
pub mod problem;
pub mod worker;

pub use condition::{Condition, ConditionStatus};
pub use environment::{
    ContainerDetailStatus, ContainersStatus, ConfigMapFileSource, EnvListPhase, EnvPhase,
    FileSource, ProblemEnvironment, ProblemEnvironmentSpec, ProblemEnvironmentStatus,
    CONDITION_ASSIGNED, CONDITION_DEPLOYED, CONDITION_READY, CONDITION_SCHEDULED,
};
pub use problem::{Problem, ProblemReplicas, ProblemSpec, ProblemStatus};
pub use worker::{Worker, WorkerInfo, WorkerSpec, WorkerStatus};

/// API group of the netcon custom resources.
pub const GROUP: &str = "netcon.janog.gr.jp";

/// API version of the netcon custom resources.
pub const VERSION: &str = "v1alpha1";

/// Namespace the operator deploys Problems and ProblemEnvironments into.
pub const DEFAULT_NAMESPACE: &str = "netcon";
