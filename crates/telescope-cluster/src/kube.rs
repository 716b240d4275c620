//! Kubernetes-backed [`Cluster`] implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams};
use kube::Client;
use tracing::debug;

use telescope_types::{condition, environment, ConditionStatus};
use telescope_types::{Problem, ProblemEnvironment, Worker};

use crate::error::{ClusterError, ClusterResult};
use crate::Cluster;

/// Read-through client over the cluster API.
///
/// Problems, ProblemEnvironments, and ConfigMaps are namespaced;
/// Workers are cluster-scoped.
#[derive(Clone)]
pub struct KubeCluster {
    problems: Api<Problem>,
    environments: Api<ProblemEnvironment>,
    workers: Api<Worker>,
    config_maps: Api<ConfigMap>,
}

impl KubeCluster {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            problems: Api::namespaced(client.clone(), namespace),
            environments: Api::namespaced(client.clone(), namespace),
            workers: Api::all(client.clone()),
            config_maps: Api::namespaced(client, namespace),
        }
    }

    /// Connect using the ambient kubeconfig or in-cluster environment.
    pub async fn connect(namespace: &str) -> ClusterResult<Self> {
        let client = Client::try_default().await?;
        Ok(Self::new(client, namespace))
    }
}

fn api_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}

#[async_trait]
impl Cluster for KubeCluster {
    async fn list_problems(&self) -> ClusterResult<Vec<Problem>> {
        Ok(self.problems.list(&ListParams::default()).await?.items)
    }

    async fn get_problem(&self, name: &str) -> ClusterResult<Option<Problem>> {
        Ok(self.problems.get_opt(name).await?)
    }

    async fn list_environments(&self) -> ClusterResult<Vec<ProblemEnvironment>> {
        Ok(self.environments.list(&ListParams::default()).await?.items)
    }

    async fn get_environment(&self, name: &str) -> ClusterResult<Option<ProblemEnvironment>> {
        Ok(self.environments.get_opt(name).await?)
    }

    async fn list_workers(&self) -> ClusterResult<Vec<Worker>> {
        Ok(self.workers.list(&ListParams::default()).await?.items)
    }

    async fn get_worker(&self, name: &str) -> ClusterResult<Option<Worker>> {
        Ok(self.workers.get_opt(name).await?)
    }

    async fn get_config_map(&self, name: &str) -> ClusterResult<Option<BTreeMap<String, String>>> {
        Ok(self
            .config_maps
            .get_opt(name)
            .await?
            .map(|cm| cm.data.unwrap_or_default()))
    }

    async fn assign_environment(&self, name: &str, assigned: bool) -> ClusterResult<()> {
        let env = self
            .get_environment(name)
            .await?
            .ok_or_else(|| ClusterError::EnvironmentNotFound(name.to_string()))?;

        let mut conditions = env.conditions().to_vec();
        let (status, reason, message) = if assigned {
            (ConditionStatus::True, "Assigned", "assigned by operator console")
        } else {
            (ConditionStatus::False, "Unassigned", "unassigned by operator console")
        };
        condition::set(
            &mut conditions,
            environment::CONDITION_ASSIGNED,
            status,
            reason,
            message,
            env.metadata.generation,
        );

        let patch = serde_json::json!({ "status": { "conditions": conditions } });
        self.environments
            .patch_status(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await?;
        debug!(environment = name, assigned, "patched Assigned condition");
        Ok(())
    }

    async fn delete_environment(&self, name: &str) -> ClusterResult<()> {
        match self.environments.delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                debug!(environment = name, "deleted environment");
                Ok(())
            }
            Err(err) if api_not_found(&err) => {
                Err(ClusterError::EnvironmentNotFound(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn set_worker_schedulable(&self, name: &str, schedulable: bool) -> ClusterResult<()> {
        let patch = serde_json::json!({ "spec": { "disableSchedule": !schedulable } });
        match self
            .workers
            .patch(name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
        {
            Ok(_) => {
                debug!(worker = name, schedulable, "patched disableSchedule");
                Ok(())
            }
            Err(err) if api_not_found(&err) => Err(ClusterError::WorkerNotFound(name.to_string())),
            Err(err) => Err(err.into()),
        }
    }
}
