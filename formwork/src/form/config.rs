//! Form configuration.

use std::sync::Arc;

use crate::rules::{MessageCatalog, RuleBuilder};

/// When fields re-validate in response to widget events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Validate on every user-driven change once the field has been touched.
    #[default]
    OnChange,
    /// Validate when the field loses focus.
    OnFocusLoss,
}

/// Per-form configuration.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    /// Which widget event triggers field validation.
    pub mode: ValidationMode,

    /// Catalog handed to builders created through [`FormConfig::rules`].
    pub catalog: Arc<MessageCatalog>,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validation mode.
    pub fn mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Validate on focus loss instead of on change.
    pub fn on_focus_loss(mut self) -> Self {
        self.mode = ValidationMode::OnFocusLoss;
        self
    }

    /// Use a custom message catalog.
    pub fn catalog(mut self, catalog: MessageCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// Start a rule builder that resolves messages from this config's catalog.
    pub fn rules(&self, label: impl Into<String>) -> RuleBuilder {
        RuleBuilder::with_catalog(label, Arc::clone(&self.catalog))
    }
}
