//! Dashboard action endpoints.
//!
//! Form POST handlers that patch or delete cluster objects and
//! redirect back to the page the form lives on.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use telescope_cluster::{Cluster, ClusterError};

use crate::DashboardState;

fn action_error(err: ClusterError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Html(format!("<pre>{err}</pre>"))).into_response()
}

// ── Assign / Unassign ───────────────────────────────────────────

pub async fn assign_environment<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    match state.cluster.assign_environment(&name, true).await {
        Ok(()) => {
            tracing::info!(environment = %name, "assigned environment");
            Redirect::to(&format!("/dashboard/problem-environments/{name}")).into_response()
        }
        Err(e) => action_error(e),
    }
}

pub async fn unassign_environment<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    match state.cluster.assign_environment(&name, false).await {
        Ok(()) => {
            tracing::info!(environment = %name, "unassigned environment");
            Redirect::to(&format!("/dashboard/problem-environments/{name}")).into_response()
        }
        Err(e) => action_error(e),
    }
}

// ── Delete Environment ──────────────────────────────────────────

pub async fn delete_environment<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    match state.cluster.delete_environment(&name).await {
        Ok(()) => {
            tracing::info!(environment = %name, "deleted environment");
            Redirect::to("/dashboard/problem-environments").into_response()
        }
        Err(e) => action_error(e),
    }
}

// ── Worker Scheduling ───────────────────────────────────────────

pub async fn enable_schedule<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    match state.cluster.set_worker_schedulable(&name, true).await {
        Ok(()) => {
            tracing::info!(worker = %name, "enabled scheduling");
            Redirect::to(&format!("/dashboard/workers/{name}")).into_response()
        }
        Err(e) => action_error(e),
    }
}

pub async fn disable_schedule<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    match state.cluster.set_worker_schedulable(&name, false).await {
        Ok(()) => {
            tracing::info!(worker = %name, "disabled scheduling");
            Redirect::to(&format!("/dashboard/workers/{name}")).into_response()
        }
        Err(e) => action_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use telescope_cluster::MemCluster;
    use telescope_types::{
        ProblemEnvironment, ProblemEnvironmentSpec, Worker, WorkerSpec,
    };

    fn test_state() -> DashboardState<MemCluster> {
        DashboardState::new(Arc::new(MemCluster::default()))
    }

    #[tokio::test]
    async fn assign_then_unassign() {
        let state = test_state();
        state.cluster.add_environment(ProblemEnvironment::new(
            "prob-001",
            ProblemEnvironmentSpec::default(),
        ));

        let resp = assign_environment(State(state.clone()), Path("prob-001".to_string())).await;
        assert_eq!(resp.status(), 303);
        let env = state.cluster.get_environment("prob-001").await.unwrap().unwrap();
        assert!(env.is_assigned());

        let resp = unassign_environment(State(state.clone()), Path("prob-001".to_string())).await;
        assert_eq!(resp.status(), 303);
        let env = state.cluster.get_environment("prob-001").await.unwrap().unwrap();
        assert!(!env.is_assigned());
    }

    #[tokio::test]
    async fn assign_missing_environment_is_404() {
        let resp = assign_environment(State(test_state()), Path("nope".to_string())).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn delete_redirects_to_list() {
        let state = test_state();
        state.cluster.add_environment(ProblemEnvironment::new(
            "prob-001",
            ProblemEnvironmentSpec::default(),
        ));

        let resp = delete_environment(State(state.clone()), Path("prob-001".to_string())).await;
        assert_eq!(resp.status(), 303);
        assert!(state.cluster.get_environment("prob-001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_missing_environment_is_404() {
        let resp = delete_environment(State(test_state()), Path("nope".to_string())).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn schedule_toggle_round_trip() {
        let state = test_state();
        state.cluster.add_worker(Worker::new("worker-1", WorkerSpec::default()));

        let resp = disable_schedule(State(state.clone()), Path("worker-1".to_string())).await;
        assert_eq!(resp.status(), 303);
        let worker = state.cluster.get_worker("worker-1").await.unwrap().unwrap();
        assert!(worker.spec.disable_schedule);

        let resp = enable_schedule(State(state.clone()), Path("worker-1".to_string())).await;
        assert_eq!(resp.status(), 303);
        let worker = state.cluster.get_worker("worker-1").await.unwrap().unwrap();
        assert!(!worker.spec.disable_schedule);
    }
}
