// Presentation layer - HTTP API, live events and built-in widget renderers
pub mod app_state;
pub mod events;
pub mod handlers;
pub mod widgets;
