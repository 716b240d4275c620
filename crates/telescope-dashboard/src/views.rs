//! View types for dashboard template rendering.
//!
//! These types are purpose-built for Askama templates: they carry
//! pre-formatted strings and computed fields so templates stay simple.

use kube::ResourceExt;
use telescope_types::{
    Condition, EnvListPhase, EnvPhase, Problem, ProblemEnvironment, ProblemReplicas, Worker,
};

// ── Cluster Summary ─────────────────────────────────────────────

pub struct ClusterSummary {
    pub problem_count: usize,
    pub environment_count: usize,
    /// Ready and not yet handed to a user.
    pub environments_ready: usize,
    pub environments_assigned: usize,
    pub worker_count: usize,
    pub workers_ready: usize,
    pub workers_schedulable: usize,
    pub replicas: ProblemReplicas,
}

pub fn build_cluster_summary(
    problems: &[Problem],
    environments: &[ProblemEnvironment],
    workers: &[Worker],
) -> ClusterSummary {
    let mut replicas = ProblemReplicas::default();
    for p in problems {
        let r = p.replicas();
        replicas.total += r.total;
        replicas.scheduled += r.scheduled;
        replicas.assignable += r.assignable;
        replicas.assigned += r.assigned;
    }

    ClusterSummary {
        problem_count: problems.len(),
        environment_count: environments.len(),
        environments_ready: environments
            .iter()
            .filter(|e| e.is_ready() && !e.is_assigned())
            .count(),
        environments_assigned: environments.iter().filter(|e| e.is_assigned()).count(),
        worker_count: workers.len(),
        workers_ready: workers.iter().filter(|w| w.is_ready()).count(),
        workers_schedulable: workers
            .iter()
            .filter(|w| !w.spec.disable_schedule)
            .count(),
        replicas,
    }
}

// ── Problem View ────────────────────────────────────────────────

pub struct ProblemView {
    pub name: String,
    pub namespace: String,
    pub assignable_replicas: i32,
    pub replicas: ProblemReplicas,
    pub created_display: String,
}

impl ProblemView {
    pub fn from_problem(problem: &Problem) -> Self {
        Self {
            name: problem.name_any(),
            namespace: problem.namespace().unwrap_or_default(),
            assignable_replicas: problem.spec.assignable_replicas,
            replicas: problem.replicas(),
            created_display: format_creation(problem.metadata.creation_timestamp.as_ref()),
        }
    }
}

/// Environments created for a problem, matched by owner reference.
pub fn environments_of<'a>(
    problem: &Problem,
    environments: &'a [ProblemEnvironment],
) -> Vec<&'a ProblemEnvironment> {
    let problem_name = problem.name_any();
    environments
        .iter()
        .filter(|env| {
            env.owner_references()
                .iter()
                .any(|r| r.kind == "Problem" && r.name == problem_name)
        })
        .collect()
}

// ── Environment View ────────────────────────────────────────────

pub struct EnvironmentView {
    pub name: String,
    pub namespace: String,
    pub worker_name: String,
    pub scheduled: bool,
    pub phase: String,
    pub phase_badge: &'static str,
    pub list_phase: String,
    pub list_phase_badge: &'static str,
    pub assigned: bool,
    pub password: Option<String>,
    pub container_summary: String,
    pub containers: Vec<ContainerView>,
    pub conditions: Vec<ConditionView>,
    pub created_display: String,
}

pub struct ContainerView {
    pub name: String,
    pub image: String,
    pub container_id_short: String,
    pub container_name: String,
    pub ready: bool,
    pub ready_badge: &'static str,
    pub management_ip: String,
}

pub struct ConditionView {
    pub condition_type: String,
    pub status: String,
    pub is_true: bool,
    pub badge: &'static str,
    pub reason: String,
    pub message: String,
    pub last_transition_display: String,
}

impl EnvironmentView {
    pub fn from_environment(env: &ProblemEnvironment) -> Self {
        let phase = env.phase();
        let list_phase = env.list_phase();

        let (container_summary, containers) = match env.status.as_ref().and_then(|s| s.containers.as_ref()) {
            Some(c) => (
                c.summary.clone(),
                c.details
                    .iter()
                    .map(|d| ContainerView {
                        name: d.name.clone(),
                        image: d.image.clone(),
                        container_id_short: short_container_id(&d.container_id),
                        container_name: d.container_name.clone(),
                        ready: d.ready,
                        ready_badge: if d.ready {
                            "bg-green-100 text-green-800"
                        } else {
                            "bg-gray-100 text-gray-800"
                        },
                        management_ip: d.management_ip_address.clone(),
                    })
                    .collect(),
            ),
            None => (String::new(), Vec::new()),
        };

        Self {
            name: env.name_any(),
            namespace: env.namespace().unwrap_or_default(),
            worker_name: env.spec.worker_name.clone().unwrap_or_default(),
            scheduled: env.spec.worker_name.is_some(),
            phase: phase.to_string(),
            phase_badge: env_phase_badge(phase),
            list_phase: list_phase.to_string(),
            list_phase_badge: env_list_phase_badge(list_phase),
            assigned: env.is_assigned(),
            password: env.status.as_ref().and_then(|s| s.password.clone()),
            container_summary,
            containers,
            conditions: env.conditions().iter().map(ConditionView::from_condition).collect(),
            created_display: format_creation(env.metadata.creation_timestamp.as_ref()),
        }
    }
}

impl ConditionView {
    pub fn from_condition(c: &Condition) -> Self {
        let is_true = c.status.is_true();
        Self {
            condition_type: c.condition_type.clone(),
            status: c.status.to_string(),
            is_true,
            badge: if is_true {
                "bg-green-100 text-green-800"
            } else {
                "bg-gray-100 text-gray-600"
            },
            reason: c.reason.clone().unwrap_or_default(),
            message: c.message.clone().unwrap_or_default(),
            last_transition_display: c
                .last_transition_time
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_default(),
        }
    }
}

/// A ConfigMap referenced from an environment spec, rendered as a
/// manifest alongside the resource itself.
pub struct ConfigMapView {
    pub name: String,
    pub yaml: String,
}

// ── Worker View ─────────────────────────────────────────────────

pub struct WorkerView {
    pub name: String,
    pub ready: bool,
    pub ready_badge: &'static str,
    pub schedulable: bool,
    pub schedule_badge: &'static str,
    pub schedule_display: &'static str,
    pub hostname: String,
    pub external_address: String,
    pub cpu: UsageBar,
    pub memory: UsageBar,
    pub conditions: Vec<ConditionView>,
}

pub struct UsageBar {
    pub percent: f64,
    pub percent_display: String,
    pub percent_int: String,
}

impl UsageBar {
    pub fn from_percent(percent: f64) -> Self {
        let percent = percent.clamp(0.0, 100.0);
        Self {
            percent,
            percent_display: format!("{percent:.1}"),
            percent_int: format!("{percent:.0}"),
        }
    }

    pub fn bar_color(&self) -> &'static str {
        if self.percent > 90.0 {
            "bg-rose-400"
        } else if self.percent > 70.0 {
            "bg-amber-400"
        } else {
            "bg-emerald-400"
        }
    }
}

impl WorkerView {
    pub fn from_worker(worker: &Worker) -> Self {
        let info = worker.info();
        let schedulable = !worker.spec.disable_schedule;
        let external_address = match info {
            Some(i) if !i.external_ip_address.is_empty() => {
                format!("{}:{}", i.external_ip_address, i.external_port)
            }
            _ => String::new(),
        };

        Self {
            name: worker.name_any(),
            ready: worker.is_ready(),
            ready_badge: if worker.is_ready() {
                "bg-green-100 text-green-800"
            } else {
                "bg-gray-100 text-gray-800"
            },
            schedulable,
            schedule_badge: if schedulable {
                "bg-green-100 text-green-800"
            } else {
                "bg-red-100 text-red-800"
            },
            schedule_display: if schedulable {
                "Scheduling Enabled"
            } else {
                "Scheduling Disabled"
            },
            hostname: info.map(|i| i.hostname.clone()).unwrap_or_default(),
            external_address,
            cpu: UsageBar::from_percent(worker.cpu_used_percent()),
            memory: UsageBar::from_percent(worker.memory_used_percent()),
            conditions: worker
                .status
                .as_ref()
                .map(|s| s.conditions.iter().map(ConditionView::from_condition).collect())
                .unwrap_or_default(),
        }
    }
}

/// Environments scheduled onto a worker.
pub fn environments_on<'a>(
    worker_name: &str,
    environments: &'a [ProblemEnvironment],
) -> Vec<&'a ProblemEnvironment> {
    environments
        .iter()
        .filter(|env| env.spec.worker_name.as_deref() == Some(worker_name))
        .collect()
}

// ── Badge Helpers ───────────────────────────────────────────────

pub fn env_phase_badge(phase: EnvPhase) -> &'static str {
    match phase {
        EnvPhase::Assigned => "bg-indigo-100 text-indigo-800",
        EnvPhase::Ready => "bg-green-100 text-green-800",
        EnvPhase::Deploying => "bg-blue-100 text-blue-800",
    }
}

pub fn env_list_phase_badge(phase: EnvListPhase) -> &'static str {
    match phase {
        EnvListPhase::Ready => "bg-green-100 text-green-800",
        EnvListPhase::Deployed => "bg-blue-100 text-blue-800",
        EnvListPhase::Scheduled => "bg-yellow-100 text-yellow-800",
        EnvListPhase::Unknown => "bg-gray-100 text-gray-800",
    }
}

// ── Format Helpers ──────────────────────────────────────────────

pub fn format_timestamp(rfc3339: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(rfc3339)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| rfc3339.to_string())
}

fn format_creation(
    time: Option<&k8s_openapi::apimachinery::pkg::apis::meta::v1::Time>,
) -> String {
    time.map(|t| t.0.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn short_container_id(id: &str) -> String {
    // docker://<64 hex>; keep the runtime prefix out and truncate.
    let id = id.rsplit("//").next().unwrap_or(id);
    id.chars().take(12).collect()
}
