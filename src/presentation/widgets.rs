// Built-in widget renderers: metric tiles, charts and tables.
// They turn widget props into JSON view models; drawing is the client's job.
use crate::application::renderer::{RendererRegistry, WidgetRenderer};
use crate::domain::widget::WidgetInstance;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Registry with every built-in widget type
pub fn builtin_renderers() -> RendererRegistry {
    RendererRegistry::new()
        .with("metric", Arc::new(MetricRenderer))
        .with("chart", Arc::new(ChartRenderer))
        .with("table", Arc::new(TableRenderer))
}

fn props<T: DeserializeOwned>(widget: &WidgetInstance) -> anyhow::Result<T> {
    serde_json::from_value(Value::Object(widget.props.clone()))
        .with_context(|| format!("invalid props for {} widget", widget.kind))
}

#[derive(Debug, Deserialize)]
struct MetricProps {
    value: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    precision: usize,
    #[serde(default)]
    previous: Option<f64>,
}

#[derive(Debug, Serialize)]
struct MetricView {
    value: f64,
    unit: Option<String>,
    formatted: String,
    change_pct: Option<f64>,
}

pub struct MetricRenderer;

impl WidgetRenderer for MetricRenderer {
    fn render(&self, widget: &WidgetInstance) -> anyhow::Result<Value> {
        let props: MetricProps = props(widget)?;
        let mut formatted = format!("{:.*}", props.precision, props.value);
        if let Some(unit) = &props.unit {
            formatted.push(' ');
            formatted.push_str(unit);
        }
        let change_pct = props
            .previous
            .filter(|previous| *previous != 0.0)
            .map(|previous| (props.value - previous) / previous.abs() * 100.0);

        Ok(serde_json::to_value(MetricView {
            value: props.value,
            unit: props.unit,
            formatted,
            change_pct,
        })?)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
enum ChartKind {
    #[default]
    Line,
    MultiLine,
    Bar,
}

#[derive(Debug, Deserialize, Serialize)]
struct SeriesProps {
    name: String,
    #[serde(default)]
    color: Option<String>,
    points: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartProps {
    #[serde(default)]
    kind: ChartKind,
    series: Vec<SeriesProps>,
    #[serde(default)]
    y_min: Option<f64>,
    #[serde(default)]
    y_max: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ChartView {
    kind: ChartKind,
    series: Vec<SeriesProps>,
    y_min: Option<f64>,
    y_max: Option<f64>,
}

pub struct ChartRenderer;

impl WidgetRenderer for ChartRenderer {
    fn render(&self, widget: &WidgetInstance) -> anyhow::Result<Value> {
        let props: ChartProps = props(widget)?;
        if props.kind != ChartKind::MultiLine && props.series.len() > 1 {
            anyhow::bail!("{:?} chart takes one series, got {}", props.kind, props.series.len());
        }

        // Axis bounds default to the data range
        let values = props.series.iter().flat_map(|s| s.points.iter().copied());
        let (lo, hi) = values.fold((None, None), |(lo, hi): (Option<f64>, Option<f64>), v| {
            (Some(lo.map_or(v, |l| l.min(v))), Some(hi.map_or(v, |h| h.max(v))))
        });

        Ok(serde_json::to_value(ChartView {
            kind: props.kind,
            y_min: props.y_min.or(lo),
            y_max: props.y_max.or(hi),
            series: props.series,
        })?)
    }
}

#[derive(Debug, Deserialize)]
struct TableProps {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
    #[serde(default)]
    page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TableView {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    total_rows: usize,
}

pub struct TableRenderer;

impl WidgetRenderer for TableRenderer {
    fn render(&self, widget: &WidgetInstance) -> anyhow::Result<Value> {
        let props: TableProps = props(widget)?;
        if let Some(i) = props.rows.iter().position(|row| row.len() != props.columns.len()) {
            anyhow::bail!(
                "row {} has {} cells, expected {}",
                i,
                props.rows[i].len(),
                props.columns.len()
            );
        }

        let total_rows = props.rows.len();
        let mut rows = props.rows;
        if let Some(page_size) = props.page_size {
            rows.truncate(page_size);
        }
        Ok(serde_json::to_value(TableView {
            columns: props.columns,
            rows,
            total_rows,
        })?)
    }
}
