//! ProblemEnvironment — an instantiated deployment of a Problem.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::{self, Condition};

/// True when the environment is scheduled and its worker exists.
pub const CONDITION_SCHEDULED: &str = "Scheduled";
/// True when the environment is deployed on its worker.
pub const CONDITION_DEPLOYED: &str = "Deployed";
/// True when the environment is ready on its worker.
pub const CONDITION_READY: &str = "Ready";
/// True when the environment is assigned to some users.
pub const CONDITION_ASSIGNED: &str = "Assigned";

/// Desired state of a ProblemEnvironment.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "netcon.janog.gr.jp",
    version = "v1alpha1",
    kind = "ProblemEnvironment",
    plural = "problemenvironments",
    shortname = "pe",
    shortname = "probenv",
    namespaced,
    status = "ProblemEnvironmentStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ProblemEnvironmentSpec {
    /// Placed as `topology.yml` in the environment's working directory.
    pub topology_file: FileSource,

    /// Placed under the `config` directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_files: Vec<FileSource>,

    /// Worker this environment is scheduled onto, empty until scheduled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
}

/// A file sourced from a ConfigMap key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSource {
    pub config_map_ref: ConfigMapFileSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapFileSource {
    pub name: String,
    pub key: String,
}

/// Observed state of a ProblemEnvironment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemEnvironmentStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<ContainersStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainersStatus {
    /// e.g. `3/4` — ready containers over total.
    pub summary: String,
    pub details: Vec<ContainerDetailStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDetailStatus {
    pub name: String,
    pub image: String,
    #[serde(rename = "containerID")]
    pub container_id: String,
    pub container_name: String,
    pub ready: bool,
    #[serde(rename = "managementIPAddress")]
    pub management_ip_address: String,
}

/// Coarse lifecycle phase shown on the environment detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvPhase {
    Assigned,
    Ready,
    Deploying,
}

impl std::fmt::Display for EnvPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvPhase::Assigned => write!(f, "Assigned"),
            EnvPhase::Ready => write!(f, "Ready"),
            EnvPhase::Deploying => write!(f, "Deploying"),
        }
    }
}

/// Finer-grained phase shown in the environment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvListPhase {
    Ready,
    Deployed,
    Scheduled,
    Unknown,
}

impl std::fmt::Display for EnvListPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvListPhase::Ready => write!(f, "Ready"),
            EnvListPhase::Deployed => write!(f, "Deployed"),
            EnvListPhase::Scheduled => write!(f, "Scheduled"),
            EnvListPhase::Unknown => write!(f, "Unknown"),
        }
    }
}

impl ProblemEnvironment {
    pub fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    pub fn is_ready(&self) -> bool {
        condition::is_true(self.conditions(), CONDITION_READY)
    }

    pub fn is_assigned(&self) -> bool {
        condition::is_true(self.conditions(), CONDITION_ASSIGNED)
    }

    /// Assigned > Ready > Deploying.
    pub fn phase(&self) -> EnvPhase {
        if self.is_assigned() {
            EnvPhase::Assigned
        } else if self.is_ready() {
            EnvPhase::Ready
        } else {
            EnvPhase::Deploying
        }
    }

    /// Ready > Deployed > Scheduled > Unknown.
    pub fn list_phase(&self) -> EnvListPhase {
        let conditions = self.conditions();
        if condition::is_true(conditions, CONDITION_READY) {
            EnvListPhase::Ready
        } else if condition::is_true(conditions, CONDITION_DEPLOYED) {
            EnvListPhase::Deployed
        } else if condition::is_true(conditions, CONDITION_SCHEDULED) {
            EnvListPhase::Scheduled
        } else {
            EnvListPhase::Unknown
        }
    }
}
