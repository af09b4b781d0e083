// Application layer - dashboard use cases and the ports they depend on
pub mod dashboard_registry;
pub mod dashboard_service;
pub mod layout_adapter;
pub mod layout_repository;
pub mod refresh;
pub mod renderer;
pub mod widget_store;
