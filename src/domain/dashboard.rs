// Dashboard domain model
use super::edit_mode::EditMode;
use super::widget::WidgetInstance;
use serde::Serialize;

/// Point-in-time view of a dashboard, as returned to API clients
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub id: String,
    pub title: String,
    pub editable: bool,
    pub mode: EditMode,
    pub selected: Option<String>,
    pub widgets: Vec<WidgetInstance>,
}

/// Short listing entry for the dashboards index
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub id: String,
    pub title: String,
    pub editable: bool,
    pub mode: EditMode,
    pub widget_count: usize,
}

impl From<&DashboardSnapshot> for DashboardSummary {
    fn from(snapshot: &DashboardSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            title: snapshot.title.clone(),
            editable: snapshot.editable,
            mode: snapshot.mode,
            widget_count: snapshot.widgets.len(),
        }
    }
}

/// Events published to live consumers of a dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DashboardEvent {
    WidgetsChanged { widgets: Vec<WidgetInstance> },
    ModeChanged { mode: EditMode },
    Refresh { widget_id: String },
}

impl DashboardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::WidgetsChanged { .. } => "widgets_changed",
            DashboardEvent::ModeChanged { .. } => "mode_changed",
            DashboardEvent::Refresh { .. } => "refresh",
        }
    }
}
