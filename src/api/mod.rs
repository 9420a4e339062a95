pub mod client;
pub mod types;

pub use client::{ApiClient, DashboardApi};
pub use types::{
    AlertRuleForm, AlertRuleRequest, AlertsOverview, FieldError, FormField, NetworkNode,
    NetworkStatus,
};
