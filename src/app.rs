use crate::api::{AlertRuleForm, AlertRuleRequest, FieldError, FormField};
use crate::theme::Theme;
use crate::tui::view_model::SharedViewModel;
use strum::{Display, EnumIter, IntoEnumIterator};

/// Dashboard tabs. Only `Network` and `Alerts` are refreshed by polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Section {
    Overview,
    Performance,
    Network,
    Alerts,
    System,
}

impl Section {
    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn index(self) -> usize {
        Self::iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn title(&self) -> &str {
        match self {
            Section::Overview => "Overview",
            Section::Performance => "Performance",
            Section::Network => "Network",
            Section::Alerts => "Alerts",
            Section::System => "System",
        }
    }

    pub fn all() -> [Section; 5] {
        [
            Section::Overview,
            Section::Performance,
            Section::Network,
            Section::Alerts,
            Section::System,
        ]
    }

    pub fn is_polled(self) -> bool {
        matches!(self, Section::Network | Section::Alerts)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Help,
    ConfirmExport,
    RuleForm,
    ExportSuccess(String),
}

pub struct App {
    pub should_quit: bool,
    pub current_section: Section,
    pub view: SharedViewModel,
    pub mode: AppMode,
    pub scroll_offset: usize,
    pub rule_form: AlertRuleForm,
    pub form_field: FormField,
    pub form_errors: Vec<FieldError>,
    pub theme: Theme,
}

impl App {
    pub fn new(view: SharedViewModel) -> Self {
        Self {
            should_quit: false,
            current_section: Section::Overview,
            view,
            mode: AppMode::Normal,
            scroll_offset: 0,
            rule_form: AlertRuleForm::default(),
            form_field: FormField::Name,
            form_errors: Vec::new(),
            theme: Theme,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn next_section(&mut self) {
        self.current_section = self.current_section.next();
        self.scroll_offset = 0;
    }

    pub fn previous_section(&mut self) {
        self.current_section = self.current_section.previous();
        self.scroll_offset = 0;
    }

    pub fn select_section(&mut self, index: usize) {
        if let Some(section) = Section::from_index(index) {
            self.current_section = section;
            self.scroll_offset = 0;
        }
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => AppMode::Help,
        };
    }

    pub fn show_export_confirmation(&mut self) {
        self.mode = AppMode::ConfirmExport;
    }

    pub fn show_export_success(&mut self, path: String) {
        self.mode = AppMode::ExportSuccess(path);
    }

    pub fn cancel_dialog(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn open_rule_form(&mut self) {
        self.rule_form = AlertRuleForm::default();
        self.form_field = FormField::Name;
        self.form_errors.clear();
        self.mode = AppMode::RuleForm;
    }

    pub fn next_form_field(&mut self) {
        self.form_field = self.form_field.next();
    }

    pub fn previous_form_field(&mut self) {
        self.form_field = self.form_field.previous();
    }

    pub fn push_form_char(&mut self, c: char) {
        if self.form_field == FormField::Severity {
            self.rule_form.cycle_severity();
        } else {
            self.rule_form.field_mut(self.form_field).push(c);
        }
    }

    pub fn pop_form_char(&mut self) {
        if self.form_field != FormField::Severity {
            self.rule_form.field_mut(self.form_field).pop();
        }
    }

    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.form_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Validates the form. On success the form closes and the request is
    /// returned; otherwise the errors stay inline and nothing is submitted.
    pub fn submit_rule_form(&mut self) -> std::result::Result<AlertRuleRequest, usize> {
        match self.rule_form.validate() {
            Ok(request) => {
                self.form_errors.clear();
                self.mode = AppMode::Normal;
                Ok(request)
            }
            Err(errors) => {
                let count = errors.len();
                if let Some(first) = errors.first() {
                    self.form_field = first.field;
                }
                self.form_errors = errors;
                Err(count)
            }
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::view_model::ViewModel;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(ViewModel::shared(std::time::Duration::from_secs(5)))
    }

    #[test]
    fn test_section_cycle_and_polling() {
        assert_eq!(Section::System.next(), Section::Overview);
        assert_eq!(Section::Overview.previous(), Section::System);
        assert_eq!(Section::from_index(2), Some(Section::Network));
        assert_eq!(Section::from_index(9), None);

        let polled: Vec<_> = Section::iter().filter(|s| s.is_polled()).collect();
        assert_eq!(polled, vec![Section::Network, Section::Alerts]);
    }

    #[test]
    fn test_invalid_rule_form_stays_open() {
        let mut app = app();
        app.open_rule_form();
        app.form_field = FormField::Condition;
        for c in "error_rate > threshold".chars() {
            app.push_form_char(c);
        }

        assert_eq!(app.submit_rule_form(), Err(2));
        assert_eq!(app.mode, AppMode::RuleForm);
        assert_eq!(app.form_field, FormField::Name);
        assert!(app.field_error(FormField::Threshold).is_some());
        assert!(app.field_error(FormField::Condition).is_none());
    }

    #[test]
    fn test_valid_rule_form_submits_and_closes() {
        let mut app = app();
        app.open_rule_form();
        app.rule_form.name = "errors".to_string();
        app.rule_form.condition = "error_rate > threshold".to_string();
        app.rule_form.threshold = "5".to_string();
        app.form_field = FormField::Severity;
        app.push_form_char(' ');

        let request = app.submit_rule_form().unwrap();
        assert_eq!(request.severity, crate::telemetry::Severity::Low);
        assert!(request.is_enabled);
        assert_eq!(app.mode, AppMode::Normal);
    }
}
