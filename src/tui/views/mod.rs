pub mod alerts;
pub mod network;
pub mod overview;
pub mod performance;
pub mod system;
