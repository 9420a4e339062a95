pub mod api;
pub mod app;
pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod metrics;
pub mod sink;
pub mod telemetry;
pub mod theme;
pub mod tui;
