use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::models::{generate_id, Environment, EnvironmentStatus};

/// Minimum length of a non-empty name
pub const MIN_NAME_LEN: usize = 3;

/// Field-level validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: &'static str, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

/// What a submitted form asks the parent to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Create(Environment),
    Update(Environment),
}

/// State of the create/edit modal
#[derive(Debug, Clone)]
pub struct EnvironmentForm {
    editing: Option<Environment>,
    pub name: String,
    pub url: String,
    pub version: String,
    pub status: EnvironmentStatus,
    pub notes: String,
    confirm_delete: bool,
}

impl Default for EnvironmentForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentForm {
    /// Blank form in create mode
    pub fn new() -> Self {
        Self {
            editing: None,
            name: String::new(),
            url: String::new(),
            version: String::new(),
            status: EnvironmentStatus::Working,
            notes: String::new(),
            confirm_delete: false,
        }
    }

    /// Form in edit mode, populated from `env`
    pub fn edit(env: &Environment) -> Self {
        Self {
            editing: Some(env.clone()),
            name: env.name.clone().unwrap_or_default(),
            url: env.url.clone(),
            version: env.version.clone().unwrap_or_default(),
            status: env.status,
            notes: env.notes.clone().unwrap_or_default(),
            confirm_delete: false,
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.editing.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit_mode() {
            "Edit Environment"
        } else {
            "Create New Environment"
        }
    }

    /// Discard edits and go back to the initial state for the current mode
    pub fn reset(&mut self) {
        *self = match &self.editing {
            Some(env) => Self::edit(env),
            None => Self::new(),
        };
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        if self.url.trim().is_empty() {
            errors.insert("url", "URL or IP address is required");
        }

        let name = self.name.trim();
        if !name.is_empty() && name.chars().count() < MIN_NAME_LEN {
            errors.insert("name", "Name must be at least 3 characters");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and build the full record to save.
    /// New records get a placeholder id that the server replaces.
    pub fn submit(&self) -> Result<FormOutcome, FormErrors> {
        self.validate()?;

        let env = Environment {
            id: match &self.editing {
                Some(existing) => existing.id.clone(),
                None => generate_id(),
            },
            name: trimmed(&self.name),
            url: self.url.trim().to_string(),
            version: trimmed(&self.version),
            status: self.status,
            notes: trimmed(&self.notes),
            last_updated: OffsetDateTime::now_utc(),
        };

        Ok(if self.is_edit_mode() {
            FormOutcome::Update(env)
        } else {
            FormOutcome::Create(env)
        })
    }

    /// First step of deletion; only meaningful in edit mode
    pub fn request_delete(&mut self) {
        if self.is_edit_mode() {
            self.confirm_delete = true;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirm_delete
    }

    /// Id to delete, once deletion was requested
    pub fn confirm_delete(&self) -> Option<String> {
        match &self.editing {
            Some(env) if self.confirm_delete => Some(env.id.clone()),
            _ => None,
        }
    }
}

fn trimmed(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
