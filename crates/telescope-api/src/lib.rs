//! telescope-api — REST API over the netcon custom resources.
//!
//! Provides axum route handlers mirroring what the dashboard shows,
//! for scripting and the contest tooling. Mounts the dashboard under
//! `/dashboard/`.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/v1/problems` | List problems |
//! | GET | `/api/v1/problems/:name` | Get a problem |
//! | GET | `/api/v1/problems/:name/environments` | Environments of a problem |
//! | GET | `/api/v1/problem-environments` | List environments |
//! | GET | `/api/v1/problem-environments/:name` | Get an environment |
//! | DELETE | `/api/v1/problem-environments/:name` | Delete an environment |
//! | POST | `/api/v1/problem-environments/:name/assign` | Set the Assigned condition |
//! | POST | `/api/v1/problem-environments/:name/unassign` | Clear the Assigned condition |
//! | GET | `/api/v1/problem-environments/:name/log` | Deploy log (plain text) |
//! | GET | `/api/v1/workers` | List workers |
//! | GET | `/api/v1/workers/:name` | Get a worker |
//! | POST | `/api/v1/workers/:name/schedulable` | Enable/disable scheduling |
//! | GET | `/metrics` | Prometheus exposition |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use telescope_cluster::Cluster;
use telescope_dashboard::DashboardState;

/// Shared state for API handlers.
pub struct ApiState<C> {
    pub cluster: Arc<C>,
}

impl<C> Clone for ApiState<C> {
    fn clone(&self) -> Self {
        Self {
            cluster: Arc::clone(&self.cluster),
        }
    }
}

/// Build the complete router (REST + dashboard + metrics).
pub fn build_router<C: Cluster>(cluster: Arc<C>) -> Router {
    let api_state = ApiState {
        cluster: Arc::clone(&cluster),
    };
    let dashboard_state = DashboardState::new(cluster);

    let api_routes = Router::new()
        .route("/problems", get(handlers::list_problems::<C>))
        .route("/problems/{name}", get(handlers::get_problem::<C>))
        .route(
            "/problems/{name}/environments",
            get(handlers::list_problem_environments::<C>),
        )
        .route(
            "/problem-environments",
            get(handlers::list_environments::<C>),
        )
        .route(
            "/problem-environments/{name}",
            get(handlers::get_environment::<C>).delete(handlers::delete_environment::<C>),
        )
        .route(
            "/problem-environments/{name}/assign",
            post(handlers::assign_environment::<C>),
        )
        .route(
            "/problem-environments/{name}/unassign",
            post(handlers::unassign_environment::<C>),
        )
        .route(
            "/problem-environments/{name}/log",
            get(handlers::get_deploy_log::<C>),
        )
        .route("/workers", get(handlers::list_workers::<C>))
        .route("/workers/{name}", get(handlers::get_worker::<C>))
        .route(
            "/workers/{name}/schedulable",
            post(handlers::set_worker_schedulable::<C>),
        )
        .with_state(api_state.clone());

    Router::new()
        .nest("/api/v1", api_routes)
        .nest(
            "/dashboard",
            telescope_dashboard::dashboard_router(dashboard_state),
        )
        .route(
            "/metrics",
            get(handlers::prometheus_metrics::<C>).with_state(api_state),
        )
}
