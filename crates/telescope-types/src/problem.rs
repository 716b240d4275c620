//! Problem — a workload template with a desired assignable replica count.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::environment::ProblemEnvironmentSpec;

/// Desired state of a Problem.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "netcon.janog.gr.jp",
    version = "v1alpha1",
    kind = "Problem",
    plural = "problems",
    shortname = "p",
    shortname = "prob",
    namespaced,
    status = "ProblemStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSpec {
    /// Template stamped out for each ProblemEnvironment replica.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<ProblemEnvironmentTemplate>,

    /// How many ready-but-unassigned environments the operator keeps.
    pub assignable_replicas: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemEnvironmentTemplate {
    #[schemars(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ObjectMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<ProblemEnvironmentSpec>,
}

/// Observed state of a Problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatus {
    #[serde(default)]
    pub replicas: ProblemReplicas,
}

/// Replica counters maintained by the upstream controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemReplicas {
    /// Total number of ProblemEnvironments.
    pub total: i32,
    /// Scheduled but not yet ready.
    pub scheduled: i32,
    /// Ready but not assigned.
    pub assignable: i32,
    /// Assigned to users.
    pub assigned: i32,
}

impl Problem {
    /// Replica counters, zero when the controller has not reported yet.
    pub fn replicas(&self) -> ProblemReplicas {
        self.status.as_ref().map(|s| s.replicas).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicas_default_to_zero() {
        let problem = Problem::new(
            "rip-and-tear",
            ProblemSpec {
                template: None,
                assignable_replicas: 3,
            },
        );
        let replicas = problem.replicas();
        assert_eq!(replicas.total, 0);
        assert_eq!(replicas.assignable, 0);
    }

    #[test]
    fn spec_wire_names() {
        let spec = ProblemSpec {
            template: None,
            assignable_replicas: 5,
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["assignableReplicas"], 5);
    }

    #[test]
    fn status_parses_upstream_shape() {
        let status: ProblemStatus = serde_json::from_value(serde_json::json!({
            "replicas": { "total": 4, "scheduled": 1, "assignable": 2, "assigned": 1 }
        }))
        .unwrap();
        assert_eq!(status.replicas.total, 4);
        assert_eq!(status.replicas.assigned, 1);
    }
}
