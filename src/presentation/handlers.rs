// HTTP request handlers
use crate::application::layout_adapter::{Breakpoint, GridLayoutDescriptor, GridSettings, LayoutItem};
use crate::application::renderer::RenderedWidget;
use crate::domain::dashboard::{DashboardSnapshot, DashboardSummary};
use crate::domain::widget::{WidgetSettingsPatch, WidgetTemplate};
use crate::error::DashboardError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

type ApiResult<T> = Result<Json<T>, DashboardError>;

#[derive(Deserialize)]
pub struct LayoutQuery {
    /// Viewport width in pixels; defaults to the largest breakpoint
    pub width: Option<u32>,
}

#[derive(Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
}

#[derive(Deserialize)]
pub struct AddWidgetRequest {
    pub template_id: String,
}

#[derive(Serialize)]
pub struct GridLayoutResponse {
    pub breakpoint: Breakpoint,
    pub columns: u32,
    pub grid: GridSettings,
    pub layout: Vec<GridLayoutDescriptor>,
}

#[derive(Serialize)]
pub struct ResponsiveLayoutResponse {
    pub grid: GridSettings,
    pub columns: BTreeMap<Breakpoint, u32>,
    pub layouts: BTreeMap<Breakpoint, Vec<GridLayoutDescriptor>>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all dashboards
pub async fn list_dashboards(State(state): State<Arc<AppState>>) -> Json<Vec<DashboardSummary>> {
    Json(state.dashboards.list().await)
}

pub async fn get_dashboard(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let snapshot = dashboard.lock().await.snapshot();
    Ok(Json(snapshot))
}

/// Widget catalog for the "add widget" picker, optionally one category only
pub async fn list_templates(
    Path(id): Path<String>,
    Query(query): Query<TemplateQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<WidgetTemplate>> {
    let dashboard = state.dashboards.get(&id)?;
    let dashboard = dashboard.lock().await;
    let templates = match &query.category {
        Some(category) => dashboard.catalog().by_category(category).cloned().collect(),
        None => dashboard.catalog().templates().to_vec(),
    };
    Ok(Json(templates))
}

/// Grid description for the breakpoint matching the client's viewport
pub async fn get_layout(
    Path(id): Path<String>,
    Query(query): Query<LayoutQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<GridLayoutResponse> {
    let dashboard = state.dashboards.get(&id)?;
    let dashboard = dashboard.lock().await;
    let (breakpoint, layout) = match query.width {
        Some(width) => {
            let breakpoint = Breakpoint::for_width(width);
            (breakpoint, dashboard.breakpoint_layout(breakpoint))
        }
        None => (Breakpoint::Lg, dashboard.grid_layout()),
    };
    Ok(Json(GridLayoutResponse {
        breakpoint,
        columns: breakpoint.columns(),
        grid: dashboard.grid().clone(),
        layout,
    }))
}

/// Grid descriptions for every breakpoint at once
pub async fn get_layouts(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<ResponsiveLayoutResponse> {
    let dashboard = state.dashboards.get(&id)?;
    let dashboard = dashboard.lock().await;
    Ok(Json(ResponsiveLayoutResponse {
        grid: dashboard.grid().clone(),
        columns: Breakpoint::ALL.iter().map(|bp| (*bp, bp.columns())).collect(),
        layouts: Breakpoint::ALL
            .iter()
            .map(|bp| (*bp, dashboard.breakpoint_layout(*bp)))
            .collect(),
    }))
}

pub async fn render_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<RenderedWidget>> {
    let dashboard = state.dashboards.get(&id)?;
    let cells = dashboard.lock().await.render();
    Ok(Json(cells))
}

pub async fn begin_edit(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    dashboard.begin_edit();
    Ok(Json(dashboard.snapshot()))
}

pub async fn save_dashboard(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    dashboard.save();
    Ok(Json(dashboard.snapshot()))
}

pub async fn add_widget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddWidgetRequest>,
) -> Result<(StatusCode, Json<DashboardSnapshot>), DashboardError> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    let status = match dashboard.add(&request.template_id)? {
        Some(_) => StatusCode::CREATED,
        None => StatusCode::OK,
    };
    Ok((status, Json(dashboard.snapshot())))
}

pub async fn remove_widget(
    Path((id, widget_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    dashboard.remove(&widget_id);
    Ok(Json(dashboard.snapshot()))
}

pub async fn duplicate_widget(
    Path((id, widget_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    dashboard.duplicate(&widget_id);
    Ok(Json(dashboard.snapshot()))
}

pub async fn configure_widget(
    Path((id, widget_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<WidgetSettingsPatch>,
) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    dashboard.configure(&widget_id, &patch);
    Ok(Json(dashboard.snapshot()))
}

pub async fn select_widget(
    Path((id, widget_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    dashboard.select(&widget_id);
    Ok(Json(dashboard.snapshot()))
}

/// Layout-change callback from the grid engine after a drag or resize
pub async fn update_layout(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(items): Json<Vec<LayoutItem>>,
) -> ApiResult<DashboardSnapshot> {
    let dashboard = state.dashboards.get(&id)?;
    let mut dashboard = dashboard.lock().await;
    dashboard.apply_layout_change(&items);
    Ok(Json(dashboard.snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_registry::{DashboardRegistry, DashboardSeed};
    use crate::application::dashboard_service::DashboardDefinition;
    use crate::application::layout_repository::{InMemoryLayoutRepository, LayoutRepository};
    use crate::domain::catalog::WidgetCatalog;
    use crate::domain::edit_mode::EditMode;
    use crate::domain::widget::DefaultLayout;
    use crate::presentation::widgets::builtin_renderers;
    use serde_json::json;

    async fn state(repo: Arc<InMemoryLayoutRepository>) -> Arc<AppState> {
        let template = WidgetTemplate {
            id: "orders".to_string(),
            kind: "metric".to_string(),
            name: "Orders".to_string(),
            description: "Orders today".to_string(),
            category: "sales".to_string(),
            icon: "cart".to_string(),
            default_props: json!({ "value": 12 }).as_object().cloned().unwrap(),
            default_layout: DefaultLayout {
                w: 4,
                h: 2,
                min_w: None,
                min_h: None,
                max_w: None,
                max_h: None,
            },
        };
        let seed = DashboardSeed {
            definition: DashboardDefinition {
                id: "admin".to_string(),
                title: "Admin".to_string(),
                editable: true,
                catalog: Arc::new(WidgetCatalog::new(vec![template])),
                renderers: Arc::new(builtin_renderers()),
                grid: GridSettings::default(),
            },
            seed: vec!["orders".to_string()],
        };
        Arc::new(AppState {
            dashboards: DashboardRegistry::load(vec![seed], repo).await,
        })
    }

    fn path(id: &str) -> Path<String> {
        Path(id.to_string())
    }

    #[tokio::test]
    async fn test_unknown_dashboard_is_404() {
        let state = state(Arc::new(InMemoryLayoutRepository::new())).await;
        let err = get_dashboard(path("nope"), State(state)).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_edit_add_save_flow() {
        let repo = Arc::new(InMemoryLayoutRepository::new());
        let state = state(repo.clone()).await;

        // Adding while viewing is accepted but changes nothing
        let request = AddWidgetRequest {
            template_id: "orders".to_string(),
        };
        let (status, Json(snapshot)) = add_widget(path("admin"), State(state.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(snapshot.widgets.len(), 1);

        let Json(snapshot) = begin_edit(path("admin"), State(state.clone())).await.unwrap();
        assert_eq!(snapshot.mode, EditMode::Editing);

        let request = AddWidgetRequest {
            template_id: "orders".to_string(),
        };
        let (status, Json(snapshot)) = add_widget(path("admin"), State(state.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!((snapshot.widgets[1].layout.x, snapshot.widgets[1].layout.y), (4, 0));

        let Json(snapshot) = save_dashboard(path("admin"), State(state.clone())).await.unwrap();
        assert_eq!(snapshot.mode, EditMode::Viewing);

        for _ in 0..50 {
            if repo.load("admin").await.unwrap().is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(repo.load("admin").await.unwrap().map(|w| w.len()), Some(2));
    }

    #[tokio::test]
    async fn test_layout_reports_static_outside_edit_mode() {
        let state = state(Arc::new(InMemoryLayoutRepository::new())).await;
        let Json(response) = get_layout(path("admin"), Query(LayoutQuery { width: Some(500) }), State(state))
            .await
            .unwrap();
        assert_eq!(response.breakpoint, Breakpoint::Xs);
        assert_eq!(response.columns, 4);
        assert!(response.layout.iter().all(|d| d.is_static));
    }

    #[tokio::test]
    async fn test_all_breakpoints_are_described() {
        let state = state(Arc::new(InMemoryLayoutRepository::new())).await;
        let Json(response) = get_layouts(path("admin"), State(state)).await.unwrap();
        assert_eq!(response.layouts.len(), 5);
        assert_eq!(response.columns[&Breakpoint::Xxs], 2);
    }

    #[tokio::test]
    async fn test_templates_filter_by_category() {
        let state = state(Arc::new(InMemoryLayoutRepository::new())).await;
        let query = TemplateQuery {
            category: Some("sales".to_string()),
        };
        let Json(templates) = list_templates(path("admin"), Query(query), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(templates.len(), 1);

        let query = TemplateQuery {
            category: Some("finance".to_string()),
        };
        let Json(templates) = list_templates(path("admin"), Query(query), State(state)).await.unwrap();
        assert!(templates.is_empty());
    }

    #[tokio::test]
    async fn test_render_returns_one_cell_per_widget() {
        let state = state(Arc::new(InMemoryLayoutRepository::new())).await;
        let Json(cells) = render_dashboard(path("admin"), State(state)).await.unwrap();
        assert_eq!(cells.len(), 1);
        assert!(!cells[0].outcome.is_fallback());
    }
}
