//! REST API handlers.
//!
//! Each handler reads/writes via the [`Cluster`] trait and returns
//! JSON responses in a uniform envelope.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use kube::ResourceExt;

use telescope_cluster::{Cluster, ClusterError};

use crate::ApiState;

/// Response wrapper for consistent API format.
#[derive(serde::Serialize)]
struct ApiResponse<T: serde::Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: serde::Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

fn error_response(msg: &str, status: StatusCode) -> impl IntoResponse {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }),
    )
}

fn cluster_error(err: ClusterError) -> axum::response::Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(&err.to_string(), status).into_response()
}

// ── Problems ────────────────────────────────────────────────────

/// GET /api/v1/problems
pub async fn list_problems<C: Cluster>(State(state): State<ApiState<C>>) -> impl IntoResponse {
    match state.cluster.list_problems().await {
        Ok(problems) => ApiResponse::ok(problems).into_response(),
        Err(e) => cluster_error(e),
    }
}

/// GET /api/v1/problems/:name
pub async fn get_problem<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.get_problem(&name).await {
        Ok(Some(problem)) => ApiResponse::ok(problem).into_response(),
        Ok(None) => error_response("problem not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => cluster_error(e),
    }
}

/// GET /api/v1/problems/:name/environments
pub async fn list_problem_environments<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.get_problem(&name).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error_response("problem not found", StatusCode::NOT_FOUND).into_response();
        }
        Err(e) => return cluster_error(e),
    }

    match state.cluster.list_environments().await {
        Ok(environments) => {
            let owned: Vec<_> = environments
                .into_iter()
                .filter(|env| {
                    env.owner_references()
                        .iter()
                        .any(|r| r.kind == "Problem" && r.name == name)
                })
                .collect();
            ApiResponse::ok(owned).into_response()
        }
        Err(e) => cluster_error(e),
    }
}

// ── Problem Environments ────────────────────────────────────────

/// GET /api/v1/problem-environments
pub async fn list_environments<C: Cluster>(State(state): State<ApiState<C>>) -> impl IntoResponse {
    match state.cluster.list_environments().await {
        Ok(environments) => ApiResponse::ok(environments).into_response(),
        Err(e) => cluster_error(e),
    }
}

/// GET /api/v1/problem-environments/:name
pub async fn get_environment<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.get_environment(&name).await {
        Ok(Some(env)) => ApiResponse::ok(env).into_response(),
        Ok(None) => error_response("environment not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => cluster_error(e),
    }
}

/// DELETE /api/v1/problem-environments/:name
pub async fn delete_environment<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.delete_environment(&name).await {
        Ok(()) => {
            tracing::info!(environment = %name, "deleted environment");
            ApiResponse::ok("deleted").into_response()
        }
        Err(e) => cluster_error(e),
    }
}

/// POST /api/v1/problem-environments/:name/assign
pub async fn assign_environment<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.assign_environment(&name, true).await {
        Ok(()) => {
            tracing::info!(environment = %name, "assigned environment");
            ApiResponse::ok("assigned").into_response()
        }
        Err(e) => cluster_error(e),
    }
}

/// POST /api/v1/problem-environments/:name/unassign
pub async fn unassign_environment<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.assign_environment(&name, false).await {
        Ok(()) => {
            tracing::info!(environment = %name, "unassigned environment");
            ApiResponse::ok("unassigned").into_response()
        }
        Err(e) => cluster_error(e),
    }
}

/// GET /api/v1/problem-environments/:name/log
pub async fn get_deploy_log<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.get_deploy_log(&name).await {
        Ok(Some(log)) => (
            StatusCode::OK,
            [("content-type", "text/plain; charset=utf-8")],
            log,
        )
            .into_response(),
        Ok(None) => error_response("no deploy log", StatusCode::NOT_FOUND).into_response(),
        Err(e) => cluster_error(e),
    }
}

// ── Workers ─────────────────────────────────────────────────────

/// GET /api/v1/workers
pub async fn list_workers<C: Cluster>(State(state): State<ApiState<C>>) -> impl IntoResponse {
    match state.cluster.list_workers().await {
        Ok(workers) => ApiResponse::ok(workers).into_response(),
        Err(e) => cluster_error(e),
    }
}

/// GET /api/v1/workers/:name
pub async fn get_worker<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.cluster.get_worker(&name).await {
        Ok(Some(worker)) => ApiResponse::ok(worker).into_response(),
        Ok(None) => error_response("worker not found", StatusCode::NOT_FOUND).into_response(),
        Err(e) => cluster_error(e),
    }
}

/// Schedulable request body.
#[derive(serde::Deserialize)]
pub struct SchedulableRequest {
    pub enabled: bool,
}

/// POST /api/v1/workers/:name/schedulable
pub async fn set_worker_schedulable<C: Cluster>(
    State(state): State<ApiState<C>>,
    Path(name): Path<String>,
    Json(req): Json<SchedulableRequest>,
) -> impl IntoResponse {
    match state.cluster.set_worker_schedulable(&name, req.enabled).await {
        Ok(()) => {
            tracing::info!(worker = %name, enabled = req.enabled, "set worker schedulable");
            ApiResponse::ok(serde_json::json!({
                "worker": name,
                "schedulable": req.enabled,
            }))
            .into_response()
        }
        Err(e) => cluster_error(e),
    }
}

// ── Prometheus ──────────────────────────────────────────────────

/// GET /metrics
pub async fn prometheus_metrics<C: Cluster>(State(state): State<ApiState<C>>) -> impl IntoResponse {
    let problems = match state.cluster.list_problems().await {
        Ok(problems) => problems,
        Err(e) => return cluster_error(e),
    };
    let environments = match state.cluster.list_environments().await {
        Ok(environments) => environments,
        Err(e) => return cluster_error(e),
    };
    let workers = match state.cluster.list_workers().await {
        Ok(workers) => workers,
        Err(e) => return cluster_error(e),
    };

    let body = telescope_metrics::render_prometheus(&problems, &environments, &workers);
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
