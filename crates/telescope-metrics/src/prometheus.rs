//! Prometheus text exposition format.

use kube::ResourceExt;
use telescope_types::{Problem, ProblemEnvironment, Worker};

fn gauge_bool(value: bool) -> u8 {
    if value { 1 } else { 0 }
}

/// Render resource lists into the Prometheus text exposition format.
pub fn render_prometheus(
    problems: &[Problem],
    environments: &[ProblemEnvironment],
    workers: &[Worker],
) -> String {
    let mut out = String::new();

    out.push_str("# HELP telescope_problem_replicas ProblemEnvironment replicas by status.\n");
    out.push_str("# TYPE telescope_problem_replicas gauge\n");
    for p in problems {
        let namespace = p.namespace().unwrap_or_default();
        let name = p.name_any();
        let replicas = p.replicas();
        for (status, value) in [
            ("total", replicas.total),
            ("scheduled", replicas.scheduled),
            ("assignable", replicas.assignable),
            ("assigned", replicas.assigned),
        ] {
            out.push_str(&format!(
                "telescope_problem_replicas{{namespace=\"{namespace}\",name=\"{name}\",status=\"{status}\"}} {value}\n",
            ));
        }
    }

    out.push_str(
        "# HELP telescope_problem_desired_assignable_replicas Desired assignable replicas.\n",
    );
    out.push_str("# TYPE telescope_problem_desired_assignable_replicas gauge\n");
    for p in problems {
        out.push_str(&format!(
            "telescope_problem_desired_assignable_replicas{{namespace=\"{}\",name=\"{}\"}} {}\n",
            p.namespace().unwrap_or_default(),
            p.name_any(),
            p.spec.assignable_replicas,
        ));
    }

    out.push_str("# HELP telescope_environment_ready Whether the Ready condition is True.\n");
    out.push_str("# TYPE telescope_environment_ready gauge\n");
    for e in environments {
        out.push_str(&format!(
            "telescope_environment_ready{{namespace=\"{}\",name=\"{}\"}} {}\n",
            e.namespace().unwrap_or_default(),
            e.name_any(),
            gauge_bool(e.is_ready()),
        ));
    }

    out.push_str("# HELP telescope_environment_assigned Whether the Assigned condition is True.\n");
    out.push_str("# TYPE telescope_environment_assigned gauge\n");
    for e in environments {
        out.push_str(&format!(
            "telescope_environment_assigned{{namespace=\"{}\",name=\"{}\"}} {}\n",
            e.namespace().unwrap_or_default(),
            e.name_any(),
            gauge_bool(e.is_assigned()),
        ));
    }

    out.push_str("# HELP telescope_worker_ready Whether the worker's Ready condition is True.\n");
    out.push_str("# TYPE telescope_worker_ready gauge\n");
    for w in workers {
        out.push_str(&format!(
            "telescope_worker_ready{{name=\"{}\"}} {}\n",
            w.name_any(),
            gauge_bool(w.is_ready()),
        ));
    }

    out.push_str("# HELP telescope_worker_schedulable Whether scheduling is enabled.\n");
    out.push_str("# TYPE telescope_worker_schedulable gauge\n");
    for w in workers {
        out.push_str(&format!(
            "telescope_worker_schedulable{{name=\"{}\"}} {}\n",
            w.name_any(),
            gauge_bool(!w.spec.disable_schedule),
        ));
    }

    out.push_str("# HELP telescope_worker_cpu_used_percent CPU usage reported by the agent.\n");
    out.push_str("# TYPE telescope_worker_cpu_used_percent gauge\n");
    for w in workers {
        out.push_str(&format!(
            "telescope_worker_cpu_used_percent{{name=\"{}\"}} {:.1}\n",
            w.name_any(),
            w.cpu_used_percent(),
        ));
    }

    out.push_str("# HELP telescope_worker_memory_used_percent Memory usage reported by the agent.\n");
    out.push_str("# TYPE telescope_worker_memory_used_percent gauge\n");
    for w in workers {
        out.push_str(&format!(
            "telescope_worker_memory_used_percent{{name=\"{}\"}} {:.1}\n",
            w.name_any(),
            w.memory_used_percent(),
        ));
    }

    out
}
