//! Worker — a cluster-scoped fleet node.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::condition::{self, Condition};

pub const CONDITION_READY: &str = "Ready";

/// Desired state of a Worker.
#[derive(CustomResource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "netcon.janog.gr.jp",
    version = "v1alpha1",
    kind = "Worker",
    plural = "workers",
    status = "WorkerStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSpec {
    /// When true the scheduler skips this worker for new environments.
    #[serde(default)]
    pub disable_schedule: bool,
}

/// Observed state of a Worker, reported by its node agent heartbeat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatus {
    #[serde(default)]
    pub worker_info: WorkerInfo,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInfo {
    #[serde(rename = "externalIPAddress")]
    pub external_ip_address: String,
    pub external_port: u16,
    pub hostname: String,
    /// Percentages arrive as strings from the agent; parse leniently.
    pub memory_used_percent: String,
    pub cpu_used_percent: String,
}

impl Worker {
    pub fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|s| s.conditions.as_slice())
            .unwrap_or_default()
    }

    pub fn is_ready(&self) -> bool {
        condition::is_true(self.conditions(), CONDITION_READY)
    }

    pub fn info(&self) -> Option<&WorkerInfo> {
        self.status.as_ref().map(|s| &s.worker_info)
    }

    pub fn cpu_used_percent(&self) -> f64 {
        self.info()
            .map(|i| parse_percent(&i.cpu_used_percent))
            .unwrap_or(0.0)
    }

    pub fn memory_used_percent(&self) -> f64 {
        self.info()
            .map(|i| parse_percent(&i.memory_used_percent))
            .unwrap_or(0.0)
    }
}

/// Missing or malformed values read as 0.
fn parse_percent(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionStatus;

    fn worker(cpu: &str, memory: &str) -> Worker {
        let mut worker = Worker::new("worker-1", WorkerSpec::default());
        worker.status = Some(WorkerStatus {
            worker_info: WorkerInfo {
                external_ip_address: "203.0.113.10".to_string(),
                external_port: 22,
                hostname: "worker-1".to_string(),
                memory_used_percent: memory.to_string(),
                cpu_used_percent: cpu.to_string(),
            },
            conditions: vec![Condition {
                condition_type: CONDITION_READY.to_string(),
                status: ConditionStatus::True,
                observed_generation: None,
                last_transition_time: None,
                reason: None,
                message: None,
            }],
        });
        worker
    }

    #[test]
    fn percent_parsing_is_lenient() {
        assert_eq!(worker("42.5", "80").cpu_used_percent(), 42.5);
        assert_eq!(worker("42.5", "80").memory_used_percent(), 80.0);
        assert_eq!(worker("", "n/a").cpu_used_percent(), 0.0);
        assert_eq!(worker("", "n/a").memory_used_percent(), 0.0);

        let bare = Worker::new("worker-2", WorkerSpec::default());
        assert_eq!(bare.cpu_used_percent(), 0.0);
    }

    #[test]
    fn readiness_from_condition() {
        assert!(worker("0", "0").is_ready());
        let bare = Worker::new("worker-2", WorkerSpec::default());
        assert!(!bare.is_ready());
    }

    #[test]
    fn info_wire_names() {
        let json = serde_json::to_value(worker("1.0", "2.0").status.unwrap()).unwrap();
        let info = &json["workerInfo"];
        assert_eq!(info["externalIPAddress"], "203.0.113.10");
        assert_eq!(info["externalPort"], 22);
        assert_eq!(info["cpuUsedPercent"], "1.0");
        assert_eq!(info["memoryUsedPercent"], "2.0");
    }
}
