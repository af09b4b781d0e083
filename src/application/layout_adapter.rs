// Layout adapter - widget instances <-> breakpoint-aware grid descriptors
use crate::domain::placement::resolve_collisions;
use crate::domain::widget::{Footprint, GridRect, WidgetInstance, ROW_LIMIT};
use serde::{Deserialize, Serialize};

/// Viewport tiers, largest first. Widgets are authored against `Lg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Lg,
    Md,
    Sm,
    Xs,
    Xxs,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 5] = [
        Breakpoint::Lg,
        Breakpoint::Md,
        Breakpoint::Sm,
        Breakpoint::Xs,
        Breakpoint::Xxs,
    ];

    pub fn columns(self) -> u32 {
        match self {
            Breakpoint::Lg => 12,
            Breakpoint::Md => 10,
            Breakpoint::Sm => 6,
            Breakpoint::Xs => 4,
            Breakpoint::Xxs => 2,
        }
    }

    /// Smallest viewport width, in pixels, at which this tier applies
    pub fn min_width(self) -> u32 {
        match self {
            Breakpoint::Lg => 1200,
            Breakpoint::Md => 996,
            Breakpoint::Sm => 768,
            Breakpoint::Xs => 480,
            Breakpoint::Xxs => 0,
        }
    }

    pub fn for_width(width: u32) -> Breakpoint {
        Self::ALL
            .into_iter()
            .find(|bp| width >= bp.min_width())
            .unwrap_or(Breakpoint::Xxs)
    }
}

/// Grid geometry handed to the rendering side along with the descriptors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Rows scanned by the placement engine before appending
    pub max_rows: u32,
    pub row_height: u32,
    pub margin: [u32; 2],
    pub container_padding: [u32; 2],
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            max_rows: 20,
            row_height: 60,
            margin: [16, 16],
            container_padding: [16, 16],
        }
    }
}

impl GridSettings {
    /// Column count instances are authored against
    pub fn columns(&self) -> u32 {
        Breakpoint::Lg.columns()
    }
}

/// One item of the grid engine's layout description
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayoutDescriptor {
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_h: Option<u32>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub is_resizable: bool,
}

impl GridLayoutDescriptor {
    fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }
}

/// Layout item reported by the grid engine after a drag or resize
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutItem {
    pub i: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// New rectangle for one widget, ready to merge into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDelta {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Describe instances for the largest breakpoint. `static` is derived from
/// the edit mode and never stored on the instance.
pub fn to_grid_layout(instances: &[WidgetInstance], edit_mode: bool) -> Vec<GridLayoutDescriptor> {
    instances
        .iter()
        .map(|widget| {
            let layout = &widget.layout;
            GridLayoutDescriptor {
                i: widget.id.clone(),
                x: layout.x,
                y: layout.y,
                w: layout.w,
                h: layout.h,
                min_w: layout.min_w,
                min_h: layout.min_h,
                max_w: layout.max_w,
                max_h: layout.max_h,
                is_static: !edit_mode,
                is_resizable: edit_mode && widget.config.resizable,
            }
        })
        .collect()
}

/// Describe instances for `breakpoint`, re-flowed into its column count.
///
/// Widths shrink to fit, origins are pulled back in-bounds, and any
/// collisions this creates are pushed down in reading order.
pub fn to_breakpoint_layout(
    instances: &[WidgetInstance],
    edit_mode: bool,
    breakpoint: Breakpoint,
) -> Vec<GridLayoutDescriptor> {
    let mut items = to_grid_layout(instances, edit_mode);
    if breakpoint == Breakpoint::Lg {
        return items;
    }

    let columns = breakpoint.columns();
    for item in &mut items {
        item.w = item.w.min(columns).max(1);
        item.x = item.x.min(columns - item.w);
        item.min_w = item.min_w.map(|w| w.min(columns));
        item.max_w = item.max_w.map(|w| w.min(columns));
    }

    let mut rects: Vec<GridRect> = items.iter().map(GridLayoutDescriptor::rect).collect();
    resolve_collisions(&mut rects, &[]);
    for (item, rect) in items.iter_mut().zip(rects) {
        item.y = rect.y;
    }
    items
}

/// Convert grid-engine items into store deltas.
///
/// Items for unknown widgets and items that match the current rectangle
/// are dropped. When an id appears more than once the last item wins. Sizes
/// are clamped to each widget's limits, a widget whose config disables
/// resizing keeps its size, `x` is kept in-bounds and `y` is capped at
/// `ROW_LIMIT`.
pub fn to_layout_deltas(instances: &[WidgetInstance], items: &[LayoutItem], columns: u32) -> Vec<LayoutDelta> {
    items
        .iter()
        .enumerate()
        .filter(|(pos, item)| !items[pos + 1..].iter().any(|later| later.i == item.i))
        .filter_map(|(_, item)| {
            let widget = instances.iter().find(|w| w.id == item.i)?;
            let layout = &widget.layout;

            let requested = if widget.config.resizable {
                Footprint::new(item.w, item.h)
            } else {
                Footprint::new(layout.w, layout.h)
            };
            let size = layout.limits().clamp(requested, columns);
            let x = item.x.min(columns.max(1) - size.w);

            let delta = LayoutDelta {
                id: item.i.clone(),
                x,
                y: item.y.min(ROW_LIMIT),
                w: size.w,
                h: size.h,
            };
            let unchanged = (delta.x, delta.y, delta.w, delta.h) == (layout.x, layout.y, layout.w, layout.h);
            (!unchanged).then_some(delta)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::{WidgetConfig, WidgetLayout};

    fn widget(id: &str, x: u32, y: u32, w: u32, h: u32) -> WidgetInstance {
        WidgetInstance {
            id: id.to_string(),
            kind: "metric".to_string(),
            template_id: "t".to_string(),
            title: id.to_string(),
            props: Default::default(),
            config: WidgetConfig::default(),
            layout: WidgetLayout {
                x,
                y,
                w,
                h,
                min_w: None,
                min_h: None,
                max_w: None,
                max_h: None,
            },
        }
    }

    fn item(i: &str, x: u32, y: u32, w: u32, h: u32) -> LayoutItem {
        LayoutItem {
            i: i.to_string(),
            x,
            y,
            w,
            h,
        }
    }

    #[test]
    fn test_breakpoint_columns_and_widths() {
        let columns: Vec<u32> = Breakpoint::ALL.iter().map(|bp| bp.columns()).collect();
        assert_eq!(columns, vec![12, 10, 6, 4, 2]);
        assert_eq!(Breakpoint::for_width(1600), Breakpoint::Lg);
        assert_eq!(Breakpoint::for_width(1000), Breakpoint::Md);
        assert_eq!(Breakpoint::for_width(768), Breakpoint::Sm);
        assert_eq!(Breakpoint::for_width(500), Breakpoint::Xs);
        assert_eq!(Breakpoint::for_width(320), Breakpoint::Xxs);
    }

    #[test]
    fn test_static_flag_follows_edit_mode() {
        let mut locked = widget("a", 0, 0, 4, 2);
        locked.config.resizable = false;
        let widgets = vec![locked, widget("b", 4, 0, 4, 2)];

        let viewing = to_grid_layout(&widgets, false);
        assert!(viewing.iter().all(|d| d.is_static && !d.is_resizable));

        let editing = to_grid_layout(&widgets, true);
        assert!(editing.iter().all(|d| !d.is_static));
        assert!(!editing[0].is_resizable);
        assert!(editing[1].is_resizable);
    }

    #[test]
    fn test_descriptor_wire_shape() {
        let mut w = widget("a", 1, 2, 3, 4);
        w.layout.min_w = Some(2);
        let json = serde_json::to_value(&to_grid_layout(&[w], false)[0]).unwrap();
        assert_eq!(json["i"], "a");
        assert_eq!(json["minW"], 2);
        assert_eq!(json["static"], true);
        assert!(json.get("maxH").is_none());
    }

    #[test]
    fn test_reflow_stays_in_bounds_without_overlap() {
        let widgets = vec![
            widget("a", 0, 0, 4, 2),
            widget("b", 4, 0, 4, 2),
            widget("c", 8, 0, 4, 2),
            widget("d", 0, 2, 12, 3),
        ];
        for bp in Breakpoint::ALL {
            let items = to_breakpoint_layout(&widgets, false, bp);
            for (i, a) in items.iter().enumerate() {
                assert!(a.x + a.w <= bp.columns(), "{:?} out of bounds at {:?}", a, bp);
                for b in &items[i + 1..] {
                    assert!(!a.rect().overlaps(&b.rect()), "{:?} overlaps {:?} at {:?}", a, b, bp);
                }
            }
        }
    }

    #[test]
    fn test_reflow_keeps_large_breakpoint_untouched() {
        let widgets = vec![widget("a", 8, 0, 4, 2)];
        assert_eq!(to_breakpoint_layout(&widgets, true, Breakpoint::Lg), to_grid_layout(&widgets, true));

        let xs = to_breakpoint_layout(&widgets, true, Breakpoint::Xs);
        assert_eq!((xs[0].x, xs[0].w), (0, 4));
    }

    #[test]
    fn test_deltas_drop_unknown_and_unchanged_items() {
        let widgets = vec![widget("a", 0, 0, 4, 2), widget("b", 4, 0, 4, 2)];
        let items = vec![item("a", 0, 0, 4, 2), item("b", 4, 2, 4, 2), item("ghost", 0, 0, 1, 1)];
        let deltas = to_layout_deltas(&widgets, &items, 12);
        assert_eq!(
            deltas,
            vec![LayoutDelta {
                id: "b".to_string(),
                x: 4,
                y: 2,
                w: 4,
                h: 2,
            }]
        );
    }

    #[test]
    fn test_deltas_clamp_to_limits_and_grid() {
        let mut a = widget("a", 0, 0, 4, 2);
        a.layout.max_w = Some(6);
        a.layout.min_h = Some(2);
        let mut locked = widget("b", 4, 0, 4, 2);
        locked.config.resizable = false;

        let items = vec![item("a", 10, 0, 9, 1), item("b", 6, 1, 8, 8)];
        let deltas = to_layout_deltas(&[a, locked], &items, 12);

        assert_eq!((deltas[0].x, deltas[0].w, deltas[0].h), (6, 6, 2));
        assert_eq!((deltas[1].x, deltas[1].y, deltas[1].w, deltas[1].h), (6, 1, 4, 2));
    }

    #[test]
    fn test_deltas_keep_last_item_per_widget() {
        let widgets = vec![widget("a", 0, 0, 4, 2), widget("b", 4, 0, 4, 2)];
        let items = vec![item("a", 0, 3, 4, 2), item("b", 4, 3, 4, 2), item("a", 0, 4, 4, 2)];
        let deltas = to_layout_deltas(&widgets, &items, 12);

        let ids: Vec<&str> = deltas.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(deltas[1].y, 4);
    }

    #[test]
    fn test_deltas_cap_row() {
        let widgets = vec![widget("a", 0, 0, 4, 2)];
        let deltas = to_layout_deltas(&widgets, &[item("a", 0, u32::MAX - 1, 4, 2)], 12);
        assert_eq!(deltas[0].y, ROW_LIMIT);
    }
}
