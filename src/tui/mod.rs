pub mod event;
pub mod screens;
pub mod sink;
pub mod terminal;
pub mod view_model;
pub mod views;
pub mod widgets;

pub use sink::TuiSink;
pub use view_model::{SharedViewModel, ViewModel};
