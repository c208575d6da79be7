//! Page type system error types with clear, actionable messages.
//!
//! All errors name the plugin or model involved so a misconfigured
//! registration can be traced without a debugger.

use thiserror::Error;

/// Errors raised by the page type pool and plugin contract.
#[derive(Debug, Error)]
pub enum PageTypeError {
    /// A plugin or model with this name is already registered.
    #[error("'{name}' is already registered with the page type pool")]
    AlreadyRegistered { name: String },

    /// No plugin is registered for the given model.
    #[error("no page type plugin found for model '{model}'")]
    PluginNotFound { model: String },

    /// No model admin is registered for the given model.
    #[error("no model admin found for model '{model}'")]
    AdminNotFound { model: String },

    /// The plugin's model binding failed validation.
    #[error("plugin '{plugin}': invalid model binding: {details}")]
    InvalidModel { plugin: String, details: String },

    /// The plugin resolves no render template and does not override `respond`.
    #[error(
        "plugin '{plugin}' should either provide a 'render_template' or an implementation of 'respond()'"
    )]
    Configuration { plugin: String },

    /// Template rendering failed for the plugin.
    #[error("plugin '{plugin}': template rendering failed: {details}")]
    Render { plugin: String, details: String },
}

impl PageTypeError {
    /// Create an already-registered error.
    pub fn already_registered(name: impl Into<String>) -> Self {
        Self::AlreadyRegistered { name: name.into() }
    }

    /// Create a plugin-not-found error.
    pub fn plugin_not_found(model: impl Into<String>) -> Self {
        Self::PluginNotFound {
            model: model.into(),
        }
    }

    /// Create an invalid-model error.
    pub fn invalid_model(plugin: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidModel {
            plugin: plugin.into(),
            details: details.into(),
        }
    }

    /// Create a configuration error naming the offending plugin.
    pub fn configuration(plugin: impl Into<String>) -> Self {
        Self::Configuration {
            plugin: plugin.into(),
        }
    }

    /// Create a render error.
    pub fn render(plugin: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Render {
            plugin: plugin.into(),
            details: details.into(),
        }
    }
}
