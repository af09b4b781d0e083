// Widget renderer port and the per-widget isolation boundary
use crate::domain::widget::{WidgetInstance, WidgetLayout};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Produces the view model for one widget type
pub trait WidgetRenderer: Send + Sync {
    fn render(&self, widget: &WidgetInstance) -> anyhow::Result<Value>;
}

/// Renderer table keyed by widget `type`
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn WidgetRenderer>>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: impl Into<String>, renderer: Arc<dyn WidgetRenderer>) {
        self.renderers.insert(kind.into(), renderer);
    }

    pub fn with(mut self, kind: impl Into<String>, renderer: Arc<dyn WidgetRenderer>) -> Self {
        self.register(kind, renderer);
        self
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn WidgetRenderer>> {
        self.renderers.get(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutcome {
    Rendered { view: Value },
    Fallback { message: String },
}

impl RenderOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RenderOutcome::Fallback { .. })
    }
}

/// One cell of the rendered dashboard
#[derive(Debug, Clone, Serialize)]
pub struct RenderedWidget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub show_header: bool,
    pub exportable: bool,
    pub layout: WidgetLayout,
    #[serde(flatten)]
    pub outcome: RenderOutcome,
}

/// Render a widget so that neither an error nor a panic escapes this cell.
pub fn render_isolated(registry: &RendererRegistry, widget: &WidgetInstance) -> RenderedWidget {
    let outcome = match registry.get(&widget.kind) {
        None => RenderOutcome::Fallback {
            message: format!("No renderer for widget type '{}'", widget.kind),
        },
        Some(renderer) => match panic::catch_unwind(AssertUnwindSafe(|| renderer.render(widget))) {
            Ok(Ok(view)) => RenderOutcome::Rendered { view },
            Ok(Err(e)) => RenderOutcome::Fallback {
                message: e.to_string(),
            },
            Err(payload) => RenderOutcome::Fallback {
                message: format!("Widget crashed: {}", panic_message(payload.as_ref())),
            },
        },
    };

    if let RenderOutcome::Fallback { message } = &outcome {
        tracing::warn!("Widget {} ({}) rendered fallback: {}", widget.id, widget.kind, message);
    }

    RenderedWidget {
        id: widget.id.clone(),
        kind: widget.kind.clone(),
        title: widget.title.clone(),
        show_header: widget.config.show_header,
        exportable: widget.config.exportable,
        layout: widget.layout.clone(),
        outcome,
    }
}

pub fn render_all(registry: &RendererRegistry, widgets: &[WidgetInstance]) -> Vec<RenderedWidget> {
    widgets.iter().map(|w| render_isolated(registry, w)).collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::widget::WidgetConfig;
    use serde_json::json;

    struct Echo;
    impl WidgetRenderer for Echo {
        fn render(&self, widget: &WidgetInstance) -> anyhow::Result<Value> {
            Ok(json!({ "title": widget.title }))
        }
    }

    struct Failing;
    impl WidgetRenderer for Failing {
        fn render(&self, _widget: &WidgetInstance) -> anyhow::Result<Value> {
            anyhow::bail!("data source unavailable")
        }
    }

    struct Panicking;
    impl WidgetRenderer for Panicking {
        fn render(&self, _widget: &WidgetInstance) -> anyhow::Result<Value> {
            panic!("index out of range")
        }
    }

    fn widget(id: &str, kind: &str) -> WidgetInstance {
        WidgetInstance {
            id: id.to_string(),
            kind: kind.to_string(),
            template_id: String::new(),
            title: id.to_uppercase(),
            props: Default::default(),
            config: WidgetConfig::default(),
            layout: WidgetLayout {
                x: 0,
                y: 0,
                w: 2,
                h: 2,
                min_w: None,
                min_h: None,
                max_w: None,
                max_h: None,
            },
        }
    }

    fn registry() -> RendererRegistry {
        RendererRegistry::new()
            .with("echo", Arc::new(Echo))
            .with("failing", Arc::new(Failing))
            .with("panicking", Arc::new(Panicking))
    }

    #[test]
    fn test_failures_are_isolated_per_widget() {
        let widgets = vec![
            widget("a", "echo"),
            widget("b", "failing"),
            widget("c", "panicking"),
            widget("d", "unknown"),
            widget("e", "echo"),
        ];
        let cells = render_all(&registry(), &widgets);

        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0].outcome, RenderOutcome::Rendered { view: json!({ "title": "A" }) });
        assert_eq!(
            cells[1].outcome,
            RenderOutcome::Fallback {
                message: "data source unavailable".to_string()
            }
        );
        assert_eq!(
            cells[2].outcome,
            RenderOutcome::Fallback {
                message: "Widget crashed: index out of range".to_string()
            }
        );
        assert!(cells[3].outcome.is_fallback());
        assert!(!cells[4].outcome.is_fallback());
    }

    #[test]
    fn test_rendered_cell_json_shape() {
        let cell = render_isolated(&registry(), &widget("b", "failing"));
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["status"], "fallback");
        assert_eq!(json["type"], "failing");
        assert_eq!(json["layout"]["w"], 2);
    }
}
