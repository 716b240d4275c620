//! In-memory [`Cluster`] implementation.
//!
//! Backs handler tests and local development without an API server.
//! Mutation semantics mirror [`KubeCluster`]: assign rewrites the
//! `Assigned` condition, delete removes the object, and the worker
//! patch flips `spec.disableSchedule`.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use kube::ResourceExt;

use telescope_types::{condition, environment, ConditionStatus};
use telescope_types::{Problem, ProblemEnvironment, Worker};

use crate::error::{ClusterError, ClusterResult};
use crate::Cluster;

#[derive(Default)]
struct Inner {
    problems: Vec<Problem>,
    environments: Vec<ProblemEnvironment>,
    workers: Vec<Worker>,
    config_maps: BTreeMap<String, BTreeMap<String, String>>,
    failure: Option<String>,
}

#[derive(Clone, Default)]
pub struct MemCluster {
    inner: Arc<RwLock<Inner>>,
}

impl MemCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_problem(&self, problem: Problem) {
        self.inner.write().unwrap().problems.push(problem);
    }

    pub fn add_environment(&self, environment: ProblemEnvironment) {
        self.inner.write().unwrap().environments.push(environment);
    }

    pub fn add_worker(&self, worker: Worker) {
        self.inner.write().unwrap().workers.push(worker);
    }

    pub fn add_config_map(&self, name: &str, data: BTreeMap<String, String>) {
        self.inner
            .write()
            .unwrap()
            .config_maps
            .insert(name.to_string(), data);
    }

    /// Make every subsequent call fail, simulating an unreachable API
    /// server.
    pub fn fail_requests(&self, message: &str) {
        self.inner.write().unwrap().failure = Some(message.to_string());
    }

    fn check_failure(&self) -> ClusterResult<()> {
        if let Some(message) = self.inner.read().unwrap().failure.clone() {
            return Err(ClusterError::Api(kube::Error::Api(
                kube::core::ErrorResponse {
                    status: "Failure".to_string(),
                    message,
                    reason: "InternalError".to_string(),
                    code: 500,
                },
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Cluster for MemCluster {
    async fn list_problems(&self) -> ClusterResult<Vec<Problem>> {
        self.check_failure()?;
        Ok(self.inner.read().unwrap().problems.clone())
    }

    async fn get_problem(&self, name: &str) -> ClusterResult<Option<Problem>> {
        self.check_failure()?;
        let inner = self.inner.read().unwrap();
        Ok(inner.problems.iter().find(|p| p.name_any() == name).cloned())
    }

    async fn list_environments(&self) -> ClusterResult<Vec<ProblemEnvironment>> {
        self.check_failure()?;
        Ok(self.inner.read().unwrap().environments.clone())
    }

    async fn get_environment(&self, name: &str) -> ClusterResult<Option<ProblemEnvironment>> {
        self.check_failure()?;
        let inner = self.inner.read().unwrap();
        Ok(inner
            .environments
            .iter()
            .find(|e| e.name_any() == name)
            .cloned())
    }

    async fn list_workers(&self) -> ClusterResult<Vec<Worker>> {
        self.check_failure()?;
        Ok(self.inner.read().unwrap().workers.clone())
    }

    async fn get_worker(&self, name: &str) -> ClusterResult<Option<Worker>> {
        self.check_failure()?;
        let inner = self.inner.read().unwrap();
        Ok(inner.workers.iter().find(|w| w.name_any() == name).cloned())
    }

    async fn get_config_map(&self, name: &str) -> ClusterResult<Option<BTreeMap<String, String>>> {
        self.check_failure()?;
        Ok(self.inner.read().unwrap().config_maps.get(name).cloned())
    }

    async fn assign_environment(&self, name: &str, assigned: bool) -> ClusterResult<()> {
        self.check_failure()?;
        let mut inner = self.inner.write().unwrap();
        let env = inner
            .environments
            .iter_mut()
            .find(|e| e.name_any() == name)
            .ok_or_else(|| ClusterError::EnvironmentNotFound(name.to_string()))?;

        let generation = env.metadata.generation;
        let status = env.status.get_or_insert_with(Default::default);
        let (value, reason, message) = if assigned {
            (ConditionStatus::True, "Assigned", "assigned by operator console")
        } else {
            (ConditionStatus::False, "Unassigned", "unassigned by operator console")
        };
        condition::set(
            &mut status.conditions,
            environment::CONDITION_ASSIGNED,
            value,
            reason,
            message,
            generation,
        );
        Ok(())
    }

    async fn delete_environment(&self, name: &str) -> ClusterResult<()> {
        self.check_failure()?;
        let mut inner = self.inner.write().unwrap();
        let before = inner.environments.len();
        inner.environments.retain(|e| e.name_any() != name);
        if inner.environments.len() == before {
            return Err(ClusterError::EnvironmentNotFound(name.to_string()));
        }
        Ok(())
    }

    async fn set_worker_schedulable(&self, name: &str, schedulable: bool) -> ClusterResult<()> {
        self.check_failure()?;
        let mut inner = self.inner.write().unwrap();
        let worker = inner
            .workers
            .iter_mut()
            .find(|w| w.name_any() == name)
            .ok_or_else(|| ClusterError::WorkerNotFound(name.to_string()))?;
        worker.spec.disable_schedule = !schedulable;
        Ok(())
    }
}
