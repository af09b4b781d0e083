// Live dashboard events over Server-Sent Events
use crate::domain::dashboard::DashboardEvent;
use crate::error::DashboardError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};

/// Stream `widgets_changed`, `mode_changed` and `refresh` events for one
/// dashboard. A slow client that falls behind skips the missed events.
pub async fn stream_events(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, DashboardError> {
    let rx = state.dashboards.get(&id)?.lock().await.subscribe();
    Ok(Sse::new(event_stream(id, rx)).keep_alive(KeepAlive::default()))
}

fn event_stream(
    dashboard_id: String,
    mut rx: broadcast::Receiver<DashboardEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => match Event::default().event(event.name()).json_data(&event) {
                    Ok(sse) => yield Ok(sse),
                    Err(e) => tracing::error!("Failed to encode {} event: {}", event.name(), e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event subscriber for {} lagged, skipped {} events", dashboard_id, skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}
