//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Tokens used when rendering usage strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct UsageSyntax {
    /// Opens an optional group.
    pub optional_open: String,
    /// Closes an optional group.
    pub optional_close: String,
    /// Opens a required group.
    pub required_open: String,
    /// Closes a required group.
    pub required_close: String,
    /// Separates alternatives within a group.
    pub or: String,
    /// Stands for a redirect back to the root.
    pub root_redirect: String,
    /// Precedes the target of any other redirect.
    pub redirect_arrow: String,
}

impl Default for UsageSyntax {
    fn default() -> Self {
        Self {
            optional_open: "[".into(),
            optional_close: "]".into(),
            required_open: "(".into(),
            required_close: ")".into(),
            or: "|".into(),
            root_redirect: "...".into(),
            redirect_arrow: "->".into(),
        }
    }
}

/// Settings for a [`CommandDispatcher`](crate::CommandDispatcher).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct DispatcherConfig {
    /// Usage string syntax.
    pub usage: UsageSyntax,
}

impl DispatcherConfig {
    /// Replace the usage syntax (builder pattern).
    pub fn with_usage(mut self, usage: UsageSyntax) -> Self {
        self.usage = usage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_usage_syntax() {
        let usage = UsageSyntax::default();
        assert_eq!(usage.optional_open, "[");
        assert_eq!(usage.required_close, ")");
        assert_eq!(usage.root_redirect, "...");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: DispatcherConfig =
            serde_json::from_str(r#"{"usage":{"or":" / "}}"#).unwrap();
        assert_eq!(config.usage.or, " / ");
        assert_eq!(config.usage.optional_open, "[");
    }
}
