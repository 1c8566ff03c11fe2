pub mod app;
pub mod chart_view;
pub mod windows;
