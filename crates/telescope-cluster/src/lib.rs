//! telescope-cluster — thin read-through client for the netcon resources.
//!
//! The dashboard never computes cluster state; it lists/gets the
//! custom objects, reads ConfigMaps (file sources and deploy logs),
//! and performs a handful of administrative patches. Everything else
//! is the upstream operator's job.
//!
//! The [`Cluster`] trait is the seam between the web layer and the
//! API server: [`KubeCluster`] talks to a real cluster, while
//! [`MemCluster`] backs handler tests and local development.

pub mod error;
pub mod kube;
pub mod mem;

use std::collections::BTreeMap;

use async_trait::async_trait;
use telescope_types::{Problem, ProblemEnvironment, Worker};

pub use error::{ClusterError, ClusterResult};
pub use self::kube::KubeCluster;
pub use self::mem::MemCluster;

/// Key under which the node agent stores an environment's deploy log.
pub const DEPLOY_LOG_KEY: &str = "deploy.log";

/// Name of the ConfigMap holding an environment's deploy log.
pub fn deploy_log_config_map(environment: &str) -> String {
    format!("{environment}-log")
}

/// Read/write access to the netcon resources.
#[async_trait]
pub trait Cluster: Send + Sync + 'static {
    async fn list_problems(&self) -> ClusterResult<Vec<Problem>>;
    async fn get_problem(&self, name: &str) -> ClusterResult<Option<Problem>>;

    async fn list_environments(&self) -> ClusterResult<Vec<ProblemEnvironment>>;
    async fn get_environment(&self, name: &str) -> ClusterResult<Option<ProblemEnvironment>>;

    async fn list_workers(&self) -> ClusterResult<Vec<Worker>>;
    async fn get_worker(&self, name: &str) -> ClusterResult<Option<Worker>>;

    /// Data of the named ConfigMap, `None` when it does not exist.
    async fn get_config_map(&self, name: &str) -> ClusterResult<Option<BTreeMap<String, String>>>;

    /// Flip the `Assigned` status condition on an environment.
    async fn assign_environment(&self, name: &str, assigned: bool) -> ClusterResult<()>;

    /// Delete an environment; the operator replaces it to keep the
    /// assignable replica count.
    async fn delete_environment(&self, name: &str) -> ClusterResult<()>;

    /// Patch `spec.disableSchedule` on a worker.
    async fn set_worker_schedulable(&self, name: &str, schedulable: bool) -> ClusterResult<()>;

    /// Deploy log for an environment, if the agent has stored one.
    async fn get_deploy_log(&self, environment: &str) -> ClusterResult<Option<String>> {
        let name = deploy_log_config_map(environment);
        Ok(self
            .get_config_map(&name)
            .await?
            .and_then(|mut data| data.remove(DEPLOY_LOG_KEY)))
    }
}
