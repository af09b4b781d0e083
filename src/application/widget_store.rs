// Widget store - the ordered list of widget instances and their lifecycle
use crate::application::layout_adapter::LayoutDelta;
use crate::domain::placement::{place, resolve_collisions};
use crate::domain::widget::{GridRect, WidgetInstance, WidgetSettingsPatch, WidgetTemplate};
use chrono::Utc;
use uuid::Uuid;

const COPY_SUFFIX: &str = " (Copy)";

/// Single source of truth for what a dashboard renders.
///
/// Every operation is synchronous and total: an id that is not in the store
/// is ignored rather than reported, since UI events can race a removal.
#[derive(Debug, Clone)]
pub struct WidgetStore {
    widgets: Vec<WidgetInstance>,
    selected: Option<String>,
    columns: u32,
    max_rows: u32,
}

impl WidgetStore {
    pub fn new(columns: u32, max_rows: u32) -> Self {
        Self {
            widgets: Vec::new(),
            selected: None,
            columns: columns.max(1),
            max_rows,
        }
    }

    /// Initial population. Later duplicates of an id are dropped, layouts
    /// are pulled in-bounds and overlaps pushed apart.
    pub fn populate(&mut self, widgets: Vec<WidgetInstance>) {
        self.widgets.clear();
        self.selected = None;
        for mut widget in widgets {
            if self.contains(&widget.id) {
                tracing::warn!("Dropping widget with duplicate id {}", widget.id);
                continue;
            }
            widget.layout.normalize(self.columns);
            self.widgets.push(widget);
        }
        self.settle(&[]);
    }

    pub fn widgets(&self) -> &[WidgetInstance] {
        &self.widgets
    }

    pub fn get(&self, id: &str) -> Option<&WidgetInstance> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    fn rects(&self) -> Vec<GridRect> {
        self.widgets.iter().map(WidgetInstance::rect).collect()
    }

    /// Instantiate a template at the first free origin and append it.
    pub fn add(&mut self, template: &WidgetTemplate) -> WidgetInstance {
        let footprint = template
            .default_layout
            .limits()
            .clamp(template.default_layout.footprint(), self.columns);
        let origin = place(&self.rects(), footprint, self.columns, self.max_rows);
        let widget = WidgetInstance::from_template(self.fresh_id(), template, origin.x, origin.y, footprint);

        tracing::info!(
            "Added widget {} from template {} at ({}, {})",
            widget.id,
            template.id,
            origin.x,
            origin.y
        );
        self.widgets.push(widget.clone());
        widget
    }

    /// Remove a widget and clear any selection pointing at it.
    pub fn remove(&mut self, id: &str) -> Option<WidgetInstance> {
        let pos = self.widgets.iter().position(|w| w.id == id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        tracing::info!("Removed widget {}", id);
        Some(self.widgets.remove(pos))
    }

    /// Copy a widget one cell down and right, clamped to the right edge.
    ///
    /// The copy is not run through the placement engine, so it may overlap
    /// its source until the user drags it or the next layout change settles
    /// the grid.
    pub fn duplicate(&mut self, id: &str) -> Option<WidgetInstance> {
        let source = self.get(id)?;
        let mut copy = source.clone();
        copy.id = self.fresh_id();
        copy.title = format!("{}{}", source.title, COPY_SUFFIX);
        copy.layout.x = (source.layout.x + 1).min(self.columns.saturating_sub(copy.layout.w));
        copy.layout.y = source.layout.y.saturating_add(1);

        tracing::info!("Duplicated widget {} as {}", id, copy.id);
        self.widgets.push(copy.clone());
        Some(copy)
    }

    /// Merge title/config settings. Returns `None` for an unknown id,
    /// otherwise whether anything changed. Layout is untouched.
    pub fn configure(&mut self, id: &str, patch: &WidgetSettingsPatch) -> Option<bool> {
        let widget = self.widgets.iter_mut().find(|w| w.id == id)?;
        Some(patch.apply_to(widget))
    }

    /// Merge dragged/resized rectangles, then push anything they now cover
    /// further down. Returns true if any widget moved.
    pub fn apply_layout_change(&mut self, deltas: &[LayoutDelta]) -> bool {
        let mut pinned = Vec::with_capacity(deltas.len());
        for delta in deltas {
            let Some(pos) = self.widgets.iter().position(|w| w.id == delta.id) else {
                continue;
            };
            let layout = &mut self.widgets[pos].layout;
            layout.x = delta.x;
            layout.y = delta.y;
            layout.w = delta.w;
            layout.h = delta.h;
            layout.normalize(self.columns);
            pinned.push(pos);
        }
        if pinned.is_empty() {
            return false;
        }

        let pushed = self.settle(&pinned);
        tracing::debug!("Applied {} layout deltas, pushed {} widgets", pinned.len(), pushed);
        true
    }

    pub fn select(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    /// Resolve overlaps, keeping `pinned` positions in place where possible.
    fn settle(&mut self, pinned: &[usize]) -> usize {
        let mut rects = self.rects();
        let moved = resolve_collisions(&mut rects, pinned);
        for idx in &moved {
            self.widgets[*idx].layout.y = rects[*idx].y;
        }
        moved.len()
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = new_widget_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

/// `widget-<unix millis>-<random suffix>`
pub fn new_widget_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("widget-{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}
