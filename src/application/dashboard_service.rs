// Dashboard service - one mounted dashboard: store, edit mode, timers, persistence
use crate::application::layout_adapter::{
    to_breakpoint_layout, to_grid_layout, to_layout_deltas, Breakpoint, GridLayoutDescriptor, GridSettings,
    LayoutItem,
};
use crate::application::layout_repository::LayoutRepository;
use crate::application::refresh::RefreshScheduler;
use crate::application::renderer::{render_all, RenderedWidget, RendererRegistry};
use crate::application::widget_store::WidgetStore;
use crate::domain::catalog::WidgetCatalog;
use crate::domain::dashboard::{DashboardEvent, DashboardSnapshot};
use crate::domain::edit_mode::{EditMode, EditModeController, Mutation};
use crate::domain::widget::{WidgetInstance, WidgetSettingsPatch};
use crate::error::DashboardError;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 128;

/// Everything a dashboard needs besides its widgets
#[derive(Clone)]
pub struct DashboardDefinition {
    pub id: String,
    pub title: String,
    pub editable: bool,
    pub catalog: Arc<WidgetCatalog>,
    pub renderers: Arc<RendererRegistry>,
    pub grid: GridSettings,
}

/// A mounted dashboard.
///
/// Mutations are gated by the edit-mode controller and are silent no-ops
/// while viewing. After every effective mutation the full widget list is
/// published as `widgets_changed`. Saving hands the snapshot to the
/// repository from a spawned task and does not wait for it.
pub struct DashboardService {
    definition: DashboardDefinition,
    store: WidgetStore,
    controller: EditModeController,
    refresh: RefreshScheduler,
    events: broadcast::Sender<DashboardEvent>,
    repository: Arc<dyn LayoutRepository>,
}

impl DashboardService {
    /// Mount a dashboard with its initial widgets. Initial population is
    /// allowed regardless of edit mode. Must be called inside a runtime.
    pub fn mount(definition: DashboardDefinition, widgets: Vec<WidgetInstance>, repository: Arc<dyn LayoutRepository>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut store = WidgetStore::new(definition.grid.columns(), definition.grid.max_rows);
        store.populate(widgets);

        let mut refresh = RefreshScheduler::new(events.clone());
        for widget in store.widgets() {
            refresh.start(&widget.id, widget.config.refresh_interval);
        }

        if store.is_empty() {
            tracing::info!("Mounted empty dashboard {}", definition.id);
        } else {
            tracing::info!("Mounted dashboard {} with {} widgets", definition.id, store.len());
        }
        Self {
            controller: EditModeController::new(definition.editable),
            definition,
            store,
            refresh,
            events,
            repository,
        }
    }

    /// Mount with widgets seeded from catalog template ids, placed in order.
    pub fn mount_seeded(definition: DashboardDefinition, seed: &[String], repository: Arc<dyn LayoutRepository>) -> Self {
        let mut store = WidgetStore::new(definition.grid.columns(), definition.grid.max_rows);
        for template_id in seed {
            match definition.catalog.get(template_id) {
                Some(template) => {
                    store.add(template);
                }
                None => tracing::warn!("Seed template {} not in catalog for {}", template_id, definition.id),
            }
        }
        let widgets = store.widgets().to_vec();
        Self::mount(definition, widgets, repository)
    }

    pub fn catalog(&self) -> &WidgetCatalog {
        &self.definition.catalog
    }

    pub fn grid(&self) -> &GridSettings {
        &self.definition.grid
    }

    pub fn mode(&self) -> EditMode {
        self.controller.mode()
    }

    pub fn widgets(&self) -> &[WidgetInstance] {
        self.store.widgets()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn has_refresh_timer(&self, widget_id: &str) -> bool {
        self.refresh.is_scheduled(widget_id)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            id: self.definition.id.clone(),
            title: self.definition.title.clone(),
            editable: self.controller.editable(),
            mode: self.controller.mode(),
            selected: self.store.selected().map(str::to_string),
            widgets: self.store.widgets().to_vec(),
        }
    }

    pub fn begin_edit(&mut self) -> bool {
        if !self.controller.begin_edit() {
            return false;
        }
        tracing::info!("Dashboard {} entered edit mode", self.definition.id);
        self.publish(DashboardEvent::ModeChanged { mode: EditMode::Editing });
        true
    }

    /// Editing -> Viewing, handing the current widgets to the repository.
    pub fn save(&mut self) -> bool {
        if !self.controller.save() {
            return false;
        }

        let repository = self.repository.clone();
        let dashboard_id = self.definition.id.clone();
        let widgets = self.store.widgets().to_vec();
        tokio::spawn(async move {
            match repository.save(&dashboard_id, &widgets).await {
                Ok(()) => tracing::info!("Saved {} widgets for dashboard {}", widgets.len(), dashboard_id),
                Err(e) => tracing::error!("Failed to save dashboard {}: {:#}", dashboard_id, e),
            }
        });

        self.publish(DashboardEvent::ModeChanged { mode: EditMode::Viewing });
        true
    }

    /// Add a widget from the catalog. `Ok(None)` while viewing.
    ///
    /// The template is looked up before the edit-mode gate, so an unknown
    /// template id is an error in either mode.
    pub fn add(&mut self, template_id: &str) -> Result<Option<WidgetInstance>, DashboardError> {
        let template = self
            .definition
            .catalog
            .get(template_id)
            .ok_or_else(|| DashboardError::UnknownTemplate(template_id.to_string()))?;
        if !self.controller.permits(Mutation::Add) {
            return Ok(None);
        }

        let widget = self.store.add(template);
        self.refresh.start(&widget.id, widget.config.refresh_interval);
        self.publish_widgets();
        Ok(Some(widget))
    }

    pub fn remove(&mut self, widget_id: &str) -> bool {
        if !self.controller.permits(Mutation::Remove) {
            return false;
        }
        if self.store.remove(widget_id).is_none() {
            return false;
        }
        self.refresh.cancel(widget_id);
        self.publish_widgets();
        true
    }

    pub fn duplicate(&mut self, widget_id: &str) -> Option<WidgetInstance> {
        if !self.controller.permits(Mutation::Duplicate) {
            return None;
        }
        let copy = self.store.duplicate(widget_id)?;
        self.refresh.start(&copy.id, copy.config.refresh_interval);
        self.publish_widgets();
        Some(copy)
    }

    pub fn configure(&mut self, widget_id: &str, patch: &WidgetSettingsPatch) -> bool {
        if !self.controller.permits(Mutation::Configure) {
            return false;
        }
        let Some(before) = self.store.get(widget_id).map(|w| w.config.refresh_interval) else {
            return false;
        };
        if self.store.configure(widget_id, patch) != Some(true) {
            return false;
        }

        if let Some(after) = self.store.get(widget_id).map(|w| w.config.refresh_interval) {
            if after != before {
                self.refresh.start(widget_id, after);
            }
        }
        self.publish_widgets();
        true
    }

    /// Apply a grid-engine layout change. Discarded while viewing.
    pub fn apply_layout_change(&mut self, items: &[LayoutItem]) -> bool {
        if !self.controller.permits(Mutation::Layout) {
            return false;
        }
        let deltas = to_layout_deltas(self.store.widgets(), items, self.store.columns());
        if !self.store.apply_layout_change(&deltas) {
            return false;
        }
        self.publish_widgets();
        true
    }

    pub fn select(&mut self, widget_id: &str) -> bool {
        self.controller.permits(Mutation::Select) && self.store.select(widget_id)
    }

    pub fn grid_layout(&self) -> Vec<GridLayoutDescriptor> {
        to_grid_layout(self.store.widgets(), self.controller.is_editing())
    }

    pub fn breakpoint_layout(&self, breakpoint: Breakpoint) -> Vec<GridLayoutDescriptor> {
        to_breakpoint_layout(self.store.widgets(), self.controller.is_editing(), breakpoint)
    }

    pub fn render(&self) -> Vec<RenderedWidget> {
        render_all(&self.definition.renderers, self.store.widgets())
    }

    fn publish_widgets(&self) {
        self.publish(DashboardEvent::WidgetsChanged {
            widgets: self.store.widgets().to_vec(),
        });
    }

    fn publish(&self, event: DashboardEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
