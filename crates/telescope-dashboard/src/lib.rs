//! telescope-dashboard — server-rendered web UI for the netcon
//! problem management system.
//!
//! Provides axum route handlers that render HTML pages over the
//! custom resources. Mutations are plain form POSTs that redirect
//! back to the page they came from.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `/` | Cluster overview |
//! | `/problems` | Problem list |
//! | `/problems/{name}` | Problem detail |
//! | `/problem-environments` | Environment list |
//! | `/problem-environments/{name}` | Environment detail |
//! | `/workers` | Worker list |
//! | `/workers/{name}` | Worker detail |

pub mod actions;
pub mod ansi;
pub mod manifest;
pub mod pages;
pub mod query;
pub mod topology;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use telescope_cluster::Cluster;

/// Shared state for dashboard handlers.
pub struct DashboardState<C> {
    pub cluster: Arc<C>,
}

impl<C> DashboardState<C> {
    pub fn new(cluster: Arc<C>) -> Self {
        Self { cluster }
    }
}

impl<C> Clone for DashboardState<C> {
    fn clone(&self) -> Self {
        Self {
            cluster: Arc::clone(&self.cluster),
        }
    }
}

/// Build the dashboard router.
pub fn dashboard_router<C: Cluster>(state: DashboardState<C>) -> Router {
    Router::new()
        .route("/", get(pages::overview::<C>))
        .route("/problems", get(pages::problems::<C>))
        .route("/problems/{name}", get(pages::problem_detail::<C>))
        .route("/problem-environments", get(pages::environments::<C>))
        .route(
            "/problem-environments/{name}",
            get(pages::environment_detail::<C>),
        )
        .route(
            "/problem-environments/{name}/assign",
            post(actions::assign_environment::<C>),
        )
        .route(
            "/problem-environments/{name}/unassign",
            post(actions::unassign_environment::<C>),
        )
        .route(
            "/problem-environments/{name}/delete",
            post(actions::delete_environment::<C>),
        )
        .route("/workers", get(pages::workers::<C>))
        .route("/workers/{name}", get(pages::worker_detail::<C>))
        .route(
            "/workers/{name}/enable-schedule",
            post(actions::enable_schedule::<C>),
        )
        .route(
            "/workers/{name}/disable-schedule",
            post(actions::disable_schedule::<C>),
        )
        .with_state(state)
}
