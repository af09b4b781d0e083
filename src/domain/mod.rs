// Domain layer - pure dashboard model, no I/O
pub mod catalog;
pub mod dashboard;
pub mod edit_mode;
pub mod placement;
pub mod widget;
