pub mod action;
pub mod alert;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod event;
pub mod format;
pub mod model;
pub mod monitor;
pub mod ranking;
pub mod system;
pub mod ui;
