pub mod controller;
pub mod format;
pub mod history;
pub mod poller;
pub mod projection;
pub mod score;

pub use controller::MetricsController;
pub use poller::{PollOutcome, PollRequest, PollTarget, PollerHandle, PollingScheduler};
