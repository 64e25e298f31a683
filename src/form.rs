//! Form field schema
//!
//! Includes the fluent FormBuilder, field definitions, required-field
//! validation and the in-progress FormState of an open form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FieldErrors;
use crate::record::is_blank;

/// Input type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Number,
    Select,
    Textarea,
    Date,
}

impl FieldType {
    /// Default layout width for this type: number and date fields are half
    /// width, everything else spans the full row
    pub fn default_width(self) -> FieldWidth {
        match self {
            FieldType::Number | FieldType::Date => FieldWidth::Half,
            _ => FieldWidth::Full,
        }
    }
}

/// Layout width of a form field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldWidth {
    #[default]
    Full,
    Half,
}

/// One choice of a select field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    /// String or number
    pub value: Value,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose value equals its label
    pub fn same(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: Value::String(label.clone()),
            label,
        }
    }
}

/// One form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Payload attribute the field writes
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "defaultValue", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    pub width: FieldWidth,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            options: None,
            placeholder: None,
            default_value: None,
            width: field_type.default_width(),
        }
    }

    fn apply(mut self, options: FieldOptions) -> Self {
        if let Some(required) = options.required {
            self.required = required;
        }
        if options.placeholder.is_some() {
            self.placeholder = options.placeholder;
        }
        if options.default_value.is_some() {
            self.default_value = options.default_value;
        }
        if options.options.is_some() {
            self.options = options.options;
        }
        if let Some(width) = options.width {
            self.width = width;
        }
        self
    }
}

/// Overrides accepted by every FormBuilder method
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    required: Option<bool>,
    placeholder: Option<String>,
    default_value: Option<Value>,
    options: Option<Vec<FieldOption>>,
    width: Option<FieldWidth>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn width(mut self, width: FieldWidth) -> Self {
        self.width = Some(width);
        self
    }
}

/// Fluent, order-preserving field list builder
#[derive(Debug, Default)]
pub struct FormBuilder {
    fields: Vec<FieldDefinition>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
        options: FieldOptions,
    ) -> Self {
        self.fields
            .push(FieldDefinition::new(name, label, field_type).apply(options));
        self
    }

    pub fn text(self, name: impl Into<String>, label: impl Into<String>, options: FieldOptions) -> Self {
        self.push(name, label, FieldType::Text, options)
    }

    pub fn email(self, name: impl Into<String>, label: impl Into<String>, options: FieldOptions) -> Self {
        self.push(name, label, FieldType::Email, options)
    }

    pub fn password(self, name: impl Into<String>, label: impl Into<String>, options: FieldOptions) -> Self {
        self.push(name, label, FieldType::Password, options)
    }

    pub fn number(self, name: impl Into<String>, label: impl Into<String>, options: FieldOptions) -> Self {
        self.push(name, label, FieldType::Number, options)
    }

    /// Select field; `choices` become the field's options
    pub fn select(
        self,
        name: impl Into<String>,
        label: impl Into<String>,
        choices: Vec<FieldOption>,
        options: FieldOptions,
    ) -> Self {
        self.push(name, label, FieldType::Select, FieldOptions::new().options(choices))
            .override_last(options)
    }

    pub fn textarea(self, name: impl Into<String>, label: impl Into<String>, options: FieldOptions) -> Self {
        self.push(name, label, FieldType::Textarea, options)
    }

    pub fn date(self, name: impl Into<String>, label: impl Into<String>, options: FieldOptions) -> Self {
        self.push(name, label, FieldType::Date, options)
    }

    pub fn build(self) -> Vec<FieldDefinition> {
        self.fields
    }

    fn override_last(mut self, options: FieldOptions) -> Self {
        if let Some(field) = self.fields.pop() {
            self.fields.push(field.apply(options));
        }
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Check that every required field has a value in `payload`
///
/// Missing, null, `false` and empty-string values fail with
/// "<label> is required". Errors are reported in schema order.
pub fn validate_required(
    fields: &[FieldDefinition],
    payload: &Map<String, Value>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in fields.iter().filter(|f| f.required) {
        if is_blank(payload.get(&field.name)) {
            errors.push(field.name.clone(), format!("{} is required", field.label));
        }
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Values and errors of a form being filled in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: Map<String, Value>,
    errors: FieldErrors,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing values, e.g. the record being edited
    pub fn from_defaults(values: Map<String, Value>) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    /// Start from the schema's declared default values
    pub fn from_schema(fields: &[FieldDefinition]) -> Self {
        let values = fields
            .iter()
            .filter_map(|f| f.default_value.clone().map(|v| (f.name.clone(), v)))
            .collect();
        Self::from_defaults(values)
    }

    /// Set a value and clear any error shown for that field
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.errors.clear(&name);
        self.values.insert(name, value.into());
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error_for(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    /// Validate against `fields`; on success return the payload to submit,
    /// otherwise keep the errors for display
    pub fn submit(&mut self, fields: &[FieldDefinition]) -> Result<Map<String, Value>, FieldErrors> {
        match validate_required(fields, &self.values) {
            Ok(()) => {
                self.errors = FieldErrors::new();
                Ok(self.values.clone())
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_form() -> Vec<FieldDefinition> {
        FormBuilder::new()
            .text("name", "Name", FieldOptions::new().required().placeholder("Enter user name"))
            .email("email", "Email", FieldOptions::new().required())
            .select(
                "role",
                "Role",
                vec![
                    FieldOption::same("User"),
                    FieldOption::same("Editor"),
                    FieldOption::same("Admin"),
                ],
                FieldOptions::new().required(),
            )
            .build()
    }

    // =========================================================================
    // Builder Tests
    // =========================================================================

    #[test]
    fn test_default_widths() {
        let fields = FormBuilder::new()
            .text("a", "A", FieldOptions::new())
            .email("b", "B", FieldOptions::new())
            .password("c", "C", FieldOptions::new())
            .number("d", "D", FieldOptions::new())
            .textarea("e", "E", FieldOptions::new())
            .date("f", "F", FieldOptions::new())
            .build();

        let widths: Vec<FieldWidth> = fields.iter().map(|f| f.width).collect();
        assert_eq!(
            widths,
            vec![
                FieldWidth::Full,
                FieldWidth::Full,
                FieldWidth::Full,
                FieldWidth::Half,
                FieldWidth::Full,
                FieldWidth::Half,
            ]
        );
        assert_eq!(fields[3].field_type, FieldType::Number);
    }

    #[test]
    fn test_width_override() {
        let fields = FormBuilder::new()
            .number("age", "Age", FieldOptions::new().width(FieldWidth::Full))
            .text("city", "City", FieldOptions::new().width(FieldWidth::Half))
            .build();
        assert_eq!(fields[0].width, FieldWidth::Full);
        assert_eq!(fields[1].width, FieldWidth::Half);
    }

    #[test]
    fn test_select_carries_options() {
        let fields = user_form();
        let role = &fields[2];
        assert_eq!(role.field_type, FieldType::Select);
        assert!(role.required);
        assert_eq!(role.options.as_ref().map(Vec::len), Some(3));
        assert_eq!(role.width, FieldWidth::Full);
    }

    #[test]
    fn test_field_serialization() {
        let fields = user_form();
        let json = serde_json::to_value(&fields[0]).unwrap();
        assert_eq!(json["type"], json!("text"));
        assert_eq!(json["width"], json!("full"));
        assert_eq!(json["placeholder"], json!("Enter user name"));
        assert!(json.get("options").is_none());

        let back: FieldDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, fields[0]);
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[test]
    fn test_validate_required_reports_in_order() {
        let payload = json!({"email": "", "role": "User"});
        let errors = validate_required(&user_form(), payload.as_object().unwrap()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email"]);
        assert_eq!(errors.get("name"), Some("Name is required"));
    }

    #[test]
    fn test_validate_required_passes() {
        let payload = json!({"name": "X", "email": "x@example.com", "role": "User"});
        assert!(validate_required(&user_form(), payload.as_object().unwrap()).is_ok());
    }

    #[test]
    fn test_zero_counts_as_present() {
        let fields = FormBuilder::new()
            .number("qty", "Quantity", FieldOptions::new().required())
            .build();
        let payload = json!({"qty": 0});
        assert!(validate_required(&fields, payload.as_object().unwrap()).is_ok());
    }

    // =========================================================================
    // FormState Tests
    // =========================================================================

    #[test]
    fn test_form_state_clears_error_on_change() {
        let fields = user_form();
        let mut form = FormState::new();
        assert!(form.submit(&fields).is_err());
        assert_eq!(form.error_for("name"), Some("Name is required"));

        form.set_value("name", "Jane");
        assert!(form.error_for("name").is_none());
        assert_eq!(form.error_for("email"), Some("Email is required"));
    }

    #[test]
    fn test_form_state_submit_returns_payload() {
        let fields = user_form();
        let mut form = FormState::from_schema(
            &FormBuilder::new()
                .text("role", "Role", FieldOptions::new().default_value("User"))
                .build(),
        );
        form.set_value("name", "Jane");
        form.set_value("email", "jane@example.com");

        let payload = form.submit(&fields).unwrap();
        assert_eq!(payload.get("role"), Some(&json!("User")));
        assert!(form.errors().is_empty());
    }
}
