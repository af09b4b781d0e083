// Widget domain models - templates, instances and their grid footprints
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Width/height of a widget in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub w: u32,
    pub h: u32,
}

impl Footprint {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned rectangle on the grid, origin at the top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl GridRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Strict overlap: rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Highest row or height accepted from clients and saved layouts
pub const ROW_LIMIT: u32 = 10_000;

/// Optional min/max bounds on a widget's footprint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeLimits {
    pub min_w: Option<u32>,
    pub min_h: Option<u32>,
    pub max_w: Option<u32>,
    pub max_h: Option<u32>,
}

impl SizeLimits {
    /// Clamp a footprint into these limits and into a grid `columns` wide.
    /// Width and height never drop below one cell.
    pub fn clamp(&self, footprint: Footprint, columns: u32) -> Footprint {
        let columns = columns.max(1);
        let w = clamp_axis(footprint.w, self.min_w, self.max_w).min(columns);
        let h = clamp_axis(footprint.h, self.min_h, self.max_h);
        Footprint::new(w.max(1), h.max(1))
    }
}

fn clamp_axis(value: u32, min: Option<u32>, max: Option<u32>) -> u32 {
    let mut value = value;
    if let Some(max) = max {
        value = value.min(max);
    }
    if let Some(min) = min {
        value = value.max(min);
    }
    value
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultLayout {
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u32>,
}

impl DefaultLayout {
    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.w, self.h)
    }

    pub fn limits(&self) -> SizeLimits {
        SizeLimits {
            min_w: self.min_w,
            min_h: self.min_h,
            max_w: self.max_w,
            max_h: self.max_h,
        }
    }
}

/// Reusable definition a widget instance is created from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetTemplate {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub default_props: Map<String, Value>,
    pub default_layout: DefaultLayout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Auto-refresh period in milliseconds; 0 disables refreshing.
    pub refresh_interval: u64,
    pub show_header: bool,
    pub exportable: bool,
    pub resizable: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            refresh_interval: 0,
            show_header: true,
            exportable: true,
            resizable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayout {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u32>,
}

impl WidgetLayout {
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    pub fn limits(&self) -> SizeLimits {
        SizeLimits {
            min_w: self.min_w,
            min_h: self.min_h,
            max_w: self.max_w,
            max_h: self.max_h,
        }
    }

    /// Bring size and origin back inside limits and a grid `columns` wide.
    /// Row and height are capped at `ROW_LIMIT`.
    pub fn normalize(&mut self, columns: u32) {
        let footprint = self.limits().clamp(Footprint::new(self.w, self.h), columns);
        self.w = footprint.w;
        self.h = footprint.h.min(ROW_LIMIT);
        self.x = self.x.min(columns.max(1) - self.w);
        self.y = self.y.min(ROW_LIMIT);
    }
}

/// A placed widget, owned by the widget store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub template_id: String,
    pub title: String,
    #[serde(default)]
    pub props: Map<String, Value>,
    #[serde(default)]
    pub config: WidgetConfig,
    pub layout: WidgetLayout,
}

impl WidgetInstance {
    /// Build an instance from template defaults at the given origin.
    pub fn from_template(id: String, template: &WidgetTemplate, x: u32, y: u32, footprint: Footprint) -> Self {
        let limits = template.default_layout.limits();
        Self {
            id,
            kind: template.kind.clone(),
            template_id: template.id.clone(),
            title: template.name.clone(),
            props: template.default_props.clone(),
            config: WidgetConfig::default(),
            layout: WidgetLayout {
                x,
                y,
                w: footprint.w,
                h: footprint.h,
                min_w: limits.min_w,
                min_h: limits.min_h,
                max_w: limits.max_w,
                max_h: limits.max_h,
            },
        }
    }

    pub fn rect(&self) -> GridRect {
        self.layout.rect()
    }
}

/// Partial settings accepted by the configure operation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetSettingsPatch {
    pub title: Option<String>,
    #[serde(default)]
    pub config: WidgetConfigPatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetConfigPatch {
    pub refresh_interval: Option<u64>,
    pub show_header: Option<bool>,
    pub exportable: Option<bool>,
    pub resizable: Option<bool>,
}

impl WidgetSettingsPatch {
    /// Merge the patch into an instance; returns true if anything changed.
    pub fn apply_to(&self, widget: &mut WidgetInstance) -> bool {
        let before = (widget.title.clone(), widget.config.clone());

        if let Some(title) = &self.title {
            widget.title = title.clone();
        }
        let config = &mut widget.config;
        if let Some(refresh_interval) = self.config.refresh_interval {
            config.refresh_interval = refresh_interval;
        }
        if let Some(show_header) = self.config.show_header {
            config.show_header = show_header;
        }
        if let Some(exportable) = self.config.exportable {
            config.exportable = exportable;
        }
        if let Some(resizable) = self.config.resizable {
            config.resizable = resizable;
        }

        before != (widget.title.clone(), widget.config.clone())
    }
}
