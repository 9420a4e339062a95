use crate::telemetry::{AlertEvent, Severity};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkStatus {
    pub status: String,
    pub uptime: String,
    pub version: String,
}

/// One node of the engine network. Fields this client does not display are
/// kept so exports stay lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub facts: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertsOverview {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub active_alerts: Vec<AlertEvent>,
    #[serde(default)]
    pub rules_count: usize,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/alerts/rules`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRuleRequest {
    pub name: String,
    pub description: String,
    pub condition: String,
    pub threshold: f64,
    pub severity: Severity,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum FormField {
    Name,
    Description,
    Condition,
    Threshold,
    Severity,
}

impl FormField {
    pub fn next(self) -> Self {
        let fields: Vec<_> = FormField::iter().collect();
        let idx = fields.iter().position(|f| *f == self).unwrap_or(0);
        fields[(idx + 1) % fields.len()]
    }

    pub fn previous(self) -> Self {
        let fields: Vec<_> = FormField::iter().collect();
        let idx = fields.iter().position(|f| *f == self).unwrap_or(0);
        fields[(idx + fields.len() - 1) % fields.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

/// Raw text of the alert-rule form, as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRuleForm {
    pub name: String,
    pub description: String,
    pub condition: String,
    pub threshold: String,
    pub severity: String,
}

impl Default for AlertRuleForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            condition: String::new(),
            threshold: String::new(),
            severity: Severity::Medium.to_string(),
        }
    }
}

impl AlertRuleForm {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Description => &self.description,
            FormField::Condition => &self.condition,
            FormField::Threshold => &self.threshold,
            FormField::Severity => &self.severity,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
            FormField::Condition => &mut self.condition,
            FormField::Threshold => &mut self.threshold,
            FormField::Severity => &mut self.severity,
        }
    }

    /// Cycles the severity field through the known levels.
    pub fn cycle_severity(&mut self) {
        let current = Severity::from_str(self.severity.trim()).unwrap_or(Severity::Low);
        let levels: Vec<_> = Severity::iter().collect();
        let idx = levels.iter().position(|s| *s == current).unwrap_or(0);
        self.severity = levels[(idx + 1) % levels.len()].to_string();
    }

    /// Returns the request to submit, or every field problem found. Nothing is
    /// sent while any error remains.
    pub fn validate(&self) -> Result<AlertRuleRequest, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new(FormField::Name, "name is required"));
        }

        let condition = self.condition.trim();
        if condition.is_empty() {
            errors.push(FieldError::new(FormField::Condition, "condition is required"));
        }

        let threshold = match self.threshold.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                errors.push(FieldError::new(
                    FormField::Threshold,
                    "threshold must be a number",
                ));
                None
            }
        };

        let severity = match Severity::from_str(self.severity.trim()) {
            Ok(severity) => Some(severity),
            Err(_) => {
                errors.push(FieldError::new(
                    FormField::Severity,
                    "severity must be critical, high, medium or low",
                ));
                None
            }
        };

        match (threshold, severity) {
            (Some(threshold), Some(severity)) if errors.is_empty() => Ok(AlertRuleRequest {
                name: name.to_string(),
                description: self.description.trim().to_string(),
                condition: condition.to_string(),
                threshold,
                severity,
                is_enabled: true,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled_form() -> AlertRuleForm {
        AlertRuleForm {
            name: " High latency ".to_string(),
            description: "p95 above budget".to_string(),
            condition: "average_latency_ms > threshold".to_string(),
            threshold: "250".to_string(),
            severity: "High".to_string(),
        }
    }

    #[test]
    fn test_valid_form_builds_enabled_rule() {
        let rule = filled_form().validate().unwrap();
        assert_eq!(
            rule,
            AlertRuleRequest {
                name: "High latency".to_string(),
                description: "p95 above budget".to_string(),
                condition: "average_latency_ms > threshold".to_string(),
                threshold: 250.0,
                severity: Severity::High,
                is_enabled: true,
            }
        );

        let body = serde_json::to_value(&rule).unwrap();
        assert_eq!(body["severity"], "high");
        assert_eq!(body["is_enabled"], true);
    }

    #[test]
    fn test_invalid_form_reports_every_field() {
        let form = AlertRuleForm {
            name: "  ".to_string(),
            threshold: "lots".to_string(),
            severity: "urgent".to_string(),
            ..filled_form()
        };

        let fields: Vec<_> = form
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec![FormField::Name, FormField::Threshold, FormField::Severity]
        );
    }

    #[test]
    fn test_non_finite_threshold_rejected() {
        let form = AlertRuleForm {
            threshold: "NaN".to_string(),
            ..filled_form()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_field_navigation_wraps() {
        assert_eq!(FormField::Severity.next(), FormField::Name);
        assert_eq!(FormField::Name.previous(), FormField::Severity);

        let mut form = AlertRuleForm::default();
        form.cycle_severity();
        assert_eq!(form.severity, "low");
        form.cycle_severity();
        assert_eq!(form.severity, "critical");
    }

    #[test]
    fn test_alerts_overview_accepts_null_list() {
        let overview: AlertsOverview =
            serde_json::from_str(r#"{"active_alerts":null,"rules_count":3,"is_enabled":true}"#)
                .unwrap();
        assert!(overview.active_alerts.is_empty());
        assert_eq!(overview.rules_count, 3);
    }

    #[test]
    fn test_network_node_keeps_extra_fields() {
        let node: NetworkNode = serde_json::from_str(
            r#"{"id":"root_node","type":"RootNode","status":"active","facts":0,"depth":1}"#,
        )
        .unwrap();
        assert_eq!(node.node_type, "RootNode");
        assert_eq!(node.extra.get("depth"), Some(&Value::from(1)));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["type"], "RootNode");
        assert_eq!(back["depth"], 1);
    }
}
