//! Dashboard page handlers.
//!
//! Each handler queries the cluster, builds view types, and renders
//! an Askama template. Mutating form handlers are in `actions.rs`.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use kube::ResourceExt;

use telescope_cluster::{Cluster, ClusterError};

use crate::DashboardState;
use crate::ansi::ansi_to_html;
use crate::manifest::manifest_yaml;
use crate::query::{ListQuery, Page};
use crate::topology::topology_dot;
use crate::views::*;

fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

fn not_found(kind: &str, name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(format!("<pre>{kind} {name:?} not found</pre>")),
    )
        .into_response()
}

fn cluster_error(err: &ClusterError) -> Response {
    tracing::error!(error = %err, "cluster request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("<pre>cluster error: {err}</pre>")),
    )
        .into_response()
}

// ── Overview ────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "overview.html")]
struct OverviewTemplate {
    active_page: &'static str,
    summary: ClusterSummary,
    problems: Vec<ProblemView>,
    workers: Vec<WorkerView>,
}

pub async fn overview<C: Cluster>(State(state): State<DashboardState<C>>) -> Response {
    let problems = match state.cluster.list_problems().await {
        Ok(problems) => problems,
        Err(e) => return cluster_error(&e),
    };
    let environments = match state.cluster.list_environments().await {
        Ok(environments) => environments,
        Err(e) => return cluster_error(&e),
    };
    let workers = match state.cluster.list_workers().await {
        Ok(workers) => workers,
        Err(e) => return cluster_error(&e),
    };

    let summary = build_cluster_summary(&problems, &environments, &workers);
    let problem_views = problems.iter().map(ProblemView::from_problem).collect();
    let worker_views = workers.iter().map(WorkerView::from_worker).collect();

    render(OverviewTemplate {
        active_page: "overview",
        summary,
        problems: problem_views,
        workers: worker_views,
    })
    .into_response()
}

// ── Problems ────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "problems.html")]
struct ProblemsTemplate {
    active_page: &'static str,
    q: String,
    page: Page<ProblemView>,
}

pub async fn problems<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut problems = match state.cluster.list_problems().await {
        Ok(problems) => problems,
        Err(e) => return cluster_error(&e),
    };
    problems.sort_by_key(|p| p.name_any());
    problems.retain(|p| query.matches(&p.name_any()));

    let views: Vec<ProblemView> = problems.iter().map(ProblemView::from_problem).collect();

    render(ProblemsTemplate {
        active_page: "problems",
        q: query.q.clone(),
        page: Page::paginate(views, query.p),
    })
    .into_response()
}

#[derive(Template)]
#[template(path = "problem_detail.html")]
struct ProblemDetailTemplate {
    active_page: &'static str,
    problem: ProblemView,
    environments: Vec<EnvironmentView>,
    manifest_yaml: String,
}

pub async fn problem_detail<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    let problem = match state.cluster.get_problem(&name).await {
        Ok(Some(problem)) => problem,
        Ok(None) => return not_found("problem", &name),
        Err(e) => return cluster_error(&e),
    };
    let environments = match state.cluster.list_environments().await {
        Ok(environments) => environments,
        Err(e) => return cluster_error(&e),
    };

    let related: Vec<EnvironmentView> = environments_of(&problem, &environments)
        .into_iter()
        .map(EnvironmentView::from_environment)
        .collect();

    render(ProblemDetailTemplate {
        active_page: "problems",
        problem: ProblemView::from_problem(&problem),
        environments: related,
        manifest_yaml: manifest_yaml(&problem),
    })
    .into_response()
}

// ── Problem Environments ────────────────────────────────────────

#[derive(Template)]
#[template(path = "environments.html")]
struct EnvironmentsTemplate {
    active_page: &'static str,
    q: String,
    page: Page<EnvironmentView>,
}

pub async fn environments<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut environments = match state.cluster.list_environments().await {
        Ok(environments) => environments,
        Err(e) => return cluster_error(&e),
    };
    environments.sort_by_key(|e| e.name_any());
    environments.retain(|e| query.matches(&e.name_any()));

    let views: Vec<EnvironmentView> = environments
        .iter()
        .map(EnvironmentView::from_environment)
        .collect();

    render(EnvironmentsTemplate {
        active_page: "environments",
        q: query.q.clone(),
        page: Page::paginate(views, query.p),
    })
    .into_response()
}

#[derive(Template)]
#[template(path = "environment_detail.html")]
struct EnvironmentDetailTemplate {
    active_page: &'static str,
    env: EnvironmentView,
    manifest_yaml: String,
    config_maps: Vec<ConfigMapView>,
    topology_dot: Option<String>,
    topology_error: Option<String>,
    log_html: Option<String>,
}

pub async fn environment_detail<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    let env = match state.cluster.get_environment(&name).await {
        Ok(Some(env)) => env,
        Ok(None) => return not_found("problem environment", &name),
        Err(e) => return cluster_error(&e),
    };

    let (topology, topology_error) = match topology_source(&state, &env).await {
        Ok(Some(source)) => match topology_dot(&source) {
            Ok(dot) => (Some(dot), None),
            Err(e) => (None, Some(e.to_string())),
        },
        Ok(None) => (None, Some("No topology found in manifest.".to_string())),
        Err(e) => (None, Some(format!("failed to read topology file: {e}"))),
    };

    let log_html = match state.cluster.get_deploy_log(&name).await {
        Ok(log) => log.map(|text| ansi_to_html(&text)),
        Err(e) => {
            tracing::warn!(environment = %name, error = %e, "failed to read deploy log");
            None
        }
    };

    let config_maps = match referenced_config_maps(&state, &env).await {
        Ok(views) => views,
        Err(e) => return cluster_error(&e),
    };

    render(EnvironmentDetailTemplate {
        active_page: "environments",
        env: EnvironmentView::from_environment(&env),
        manifest_yaml: manifest_yaml(&env),
        config_maps,
        topology_dot: topology,
        topology_error,
        log_html,
    })
    .into_response()
}

/// Contents of the environment's topology file, read from the
/// ConfigMap its spec points at.
async fn topology_source<C: Cluster>(
    state: &DashboardState<C>,
    env: &telescope_types::ProblemEnvironment,
) -> Result<Option<String>, ClusterError> {
    let source = &env.spec.topology_file.config_map_ref;
    if source.name.is_empty() {
        return Ok(None);
    }
    Ok(state
        .cluster
        .get_config_map(&source.name)
        .await?
        .and_then(|mut data| data.remove(&source.key)))
}

/// Manifests of the ConfigMaps the environment spec references, in
/// spec order with duplicates collapsed. Missing ConfigMaps are
/// skipped.
async fn referenced_config_maps<C: Cluster>(
    state: &DashboardState<C>,
    env: &telescope_types::ProblemEnvironment,
) -> Result<Vec<ConfigMapView>, ClusterError> {
    let mut names: Vec<&str> = Vec::new();
    let topology = env.spec.topology_file.config_map_ref.name.as_str();
    if !topology.is_empty() {
        names.push(topology);
    }
    for file in &env.spec.config_files {
        let name = file.config_map_ref.name.as_str();
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }

    let mut views = Vec::new();
    for name in names {
        if let Some(data) = state.cluster.get_config_map(name).await? {
            let manifest = serde_json::json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": { "name": name },
                "data": data,
            });
            views.push(ConfigMapView {
                name: name.to_string(),
                yaml: manifest_yaml(&manifest),
            });
        }
    }
    Ok(views)
}

// ── Workers ─────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "workers.html")]
struct WorkersTemplate {
    active_page: &'static str,
    q: String,
    page: Page<WorkerView>,
}

pub async fn workers<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut workers = match state.cluster.list_workers().await {
        Ok(workers) => workers,
        Err(e) => return cluster_error(&e),
    };
    workers.sort_by_key(|w| w.name_any());
    workers.retain(|w| query.matches(&w.name_any()));

    let views: Vec<WorkerView> = workers.iter().map(WorkerView::from_worker).collect();

    render(WorkersTemplate {
        active_page: "workers",
        q: query.q.clone(),
        page: Page::paginate(views, query.p),
    })
    .into_response()
}

#[derive(Template)]
#[template(path = "worker_detail.html")]
struct WorkerDetailTemplate {
    active_page: &'static str,
    worker: WorkerView,
    environments: Vec<EnvironmentView>,
    manifest_yaml: String,
}

pub async fn worker_detail<C: Cluster>(
    State(state): State<DashboardState<C>>,
    Path(name): Path<String>,
) -> Response {
    let worker = match state.cluster.get_worker(&name).await {
        Ok(Some(worker)) => worker,
        Ok(None) => return not_found("worker", &name),
        Err(e) => return cluster_error(&e),
    };
    let environments = match state.cluster.list_environments().await {
        Ok(environments) => environments,
        Err(e) => return cluster_error(&e),
    };

    let running: Vec<EnvironmentView> = environments_on(&name, &environments)
        .into_iter()
        .map(EnvironmentView::from_environment)
        .collect();

    render(WorkerDetailTemplate {
        active_page: "workers",
        worker: WorkerView::from_worker(&worker),
        environments: running,
        manifest_yaml: manifest_yaml(&worker),
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use telescope_cluster::{DEPLOY_LOG_KEY, MemCluster, deploy_log_config_map};
    use telescope_types::{
        CONDITION_READY, ConditionStatus, ConfigMapFileSource, FileSource, Problem,
        ProblemEnvironment, ProblemEnvironmentSpec, ProblemEnvironmentStatus, ProblemSpec, Worker,
        WorkerSpec, condition,
    };

    fn test_state() -> DashboardState<MemCluster> {
        DashboardState::new(Arc::new(MemCluster::default()))
    }

    fn test_problem(name: &str) -> Problem {
        Problem::new(
            name,
            ProblemSpec {
                template: None,
                assignable_replicas: 1,
            },
        )
    }

    fn test_environment(name: &str) -> ProblemEnvironment {
        let mut env = ProblemEnvironment::new(
            name,
            ProblemEnvironmentSpec {
                topology_file: FileSource {
                    config_map_ref: ConfigMapFileSource {
                        name: format!("{name}-files"),
                        key: "topology.yml".to_string(),
                    },
                },
                config_files: Vec::new(),
                worker_name: Some("worker-1".to_string()),
            },
        );
        let mut conditions = Vec::new();
        condition::set(
            &mut conditions,
            CONDITION_READY,
            ConditionStatus::True,
            "Ready",
            "",
            None,
        );
        env.status = Some(ProblemEnvironmentStatus {
            conditions,
            ..Default::default()
        });
        env
    }

    #[tokio::test]
    async fn overview_renders_html() {
        let state = test_state();
        state.cluster.add_problem(test_problem("rip-and-tear"));
        state.cluster.add_worker(Worker::new("worker-1", WorkerSpec::default()));

        let resp = overview(State(state)).await.into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn overview_empty_cluster() {
        let resp = overview(State(test_state())).await.into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn problems_page_renders() {
        let state = test_state();
        state.cluster.add_problem(test_problem("rip-and-tear"));
        state.cluster.add_problem(test_problem("bgp-hijack"));

        let resp = problems(State(state), Query(ListQuery::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn problem_detail_renders() {
        let state = test_state();
        state.cluster.add_problem(test_problem("rip-and-tear"));

        let resp = problem_detail(State(state), Path("rip-and-tear".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn problem_detail_missing_is_404() {
        let resp = problem_detail(State(test_state()), Path("nope".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn environments_page_renders() {
        let state = test_state();
        state.cluster.add_environment(test_environment("rip-and-tear-001"));

        let resp = environments(State(state), Query(ListQuery::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn environment_detail_with_topology_and_log() {
        let state = test_state();
        let env = test_environment("rip-and-tear-001");
        state.cluster.add_config_map(
            "rip-and-tear-001-files",
            [(
                "topology.yml".to_string(),
                "topology:\n  nodes:\n    r1: {}\n  links: []\n".to_string(),
            )]
            .into(),
        );
        state.cluster.add_config_map(
            &deploy_log_config_map("rip-and-tear-001"),
            [(
                DEPLOY_LOG_KEY.to_string(),
                "\u{1b}[32mdeploy ok\u{1b}[0m\n".to_string(),
            )]
            .into(),
        );
        state.cluster.add_environment(env);

        let resp = environment_detail(State(state), Path("rip-and-tear-001".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn environment_detail_renders_referenced_config_maps() {
        let state = test_state();
        let mut env = test_environment("rip-and-tear-001");
        env.spec.config_files = vec![FileSource {
            config_map_ref: ConfigMapFileSource {
                name: "rip-and-tear-001-configs".to_string(),
                key: "r1.cfg".to_string(),
            },
        }];
        state.cluster.add_config_map(
            "rip-and-tear-001-files",
            [(
                "topology.yml".to_string(),
                "topology:\n  nodes:\n    r1: {}\n  links: []\n".to_string(),
            )]
            .into(),
        );
        state.cluster.add_config_map(
            "rip-and-tear-001-configs",
            [("r1.cfg".to_string(), "hostname r1\n".to_string())].into(),
        );

        let views = referenced_config_maps(&state, &env).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].name, "rip-and-tear-001-files");
        assert_eq!(views[1].name, "rip-and-tear-001-configs");
        assert!(views[1].yaml.contains("kind: ConfigMap"));
        assert!(views[1].yaml.contains("hostname r1"));

        state.cluster.add_environment(env);
        let resp = environment_detail(State(state), Path("rip-and-tear-001".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn referenced_config_maps_skip_missing_and_duplicates() {
        let state = test_state();
        let mut env = test_environment("rip-and-tear-001");
        // Same ConfigMap referenced twice, and nothing stored for it.
        env.spec.config_files = vec![
            FileSource {
                config_map_ref: ConfigMapFileSource {
                    name: "rip-and-tear-001-files".to_string(),
                    key: "r1.cfg".to_string(),
                },
            },
            FileSource {
                config_map_ref: ConfigMapFileSource {
                    name: "rip-and-tear-001-files".to_string(),
                    key: "r2.cfg".to_string(),
                },
            },
        ];

        let views = referenced_config_maps(&state, &env).await.unwrap();
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn environment_detail_missing_is_404() {
        let resp = environment_detail(State(test_state()), Path("nope".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn workers_page_renders() {
        let state = test_state();
        state.cluster.add_worker(Worker::new("worker-1", WorkerSpec::default()));

        let resp = workers(State(state), Query(ListQuery::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn worker_detail_lists_its_environments() {
        let state = test_state();
        state.cluster.add_worker(Worker::new("worker-1", WorkerSpec::default()));
        state.cluster.add_environment(test_environment("rip-and-tear-001"));

        let resp = worker_detail(State(state), Path("worker-1".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn overview_cluster_error_is_500() {
        let state = test_state();
        state.cluster.fail_requests("connection refused");

        let resp = overview(State(state)).await.into_response();
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn list_pages_cluster_error_is_500() {
        let state = test_state();
        state.cluster.fail_requests("connection refused");

        let resp = problems(State(state.clone()), Query(ListQuery::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), 500);

        let resp = environments(State(state.clone()), Query(ListQuery::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), 500);

        let resp = workers(State(state), Query(ListQuery::default()))
            .await
            .into_response();
        assert_eq!(resp.status(), 500);
    }

    #[tokio::test]
    async fn detail_pages_cluster_error_is_500_not_404() {
        let state = test_state();
        state.cluster.add_problem(test_problem("rip-and-tear"));
        state.cluster.add_worker(Worker::new("worker-1", WorkerSpec::default()));
        state.cluster.fail_requests("connection refused");

        let resp = problem_detail(State(state.clone()), Path("rip-and-tear".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 500);

        let resp = environment_detail(State(state.clone()), Path("rip-and-tear-001".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 500);

        let resp = worker_detail(State(state), Path("worker-1".to_string()))
            .await
            .into_response();
        assert_eq!(resp.status(), 500);
    }
}
