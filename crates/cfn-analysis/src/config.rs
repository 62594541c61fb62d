//! Configuration for this crate.

use std::sync::Arc;

use cfn_ast::DocumentType;

/// Configuration for `cfn-analysis`.
///
/// This type is a wrapper around an `Arc`, and so can be cheaply cloned and
/// sent between threads.
#[derive(Clone, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    /// The actual fields, `Arc`ed up for easy cloning.
    #[serde(flatten)]
    inner: Arc<ConfigInner>,
}

// Custom `Debug` impl for the `Config` wrapper type that simplifies away the
// arc and the private inner struct
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("apply_globals", &self.inner.apply_globals)
            .field("document_type", &self.inner.document_type)
            .field("validate_resources", &self.inner.validate_resources)
            .finish()
    }
}

impl Config {
    /// Gets whether the schema is adjusted for the document's `Globals`
    /// before validation.
    pub fn apply_globals(&self) -> bool {
        self.inner.apply_globals
    }

    /// Gets the document type that overrides detection, if any.
    pub fn document_type(&self) -> Option<DocumentType> {
        self.inner.document_type
    }

    /// Gets whether resources are validated against their type's definition.
    pub fn validate_resources(&self) -> bool {
        self.inner.validate_resources
    }

    /// Return a new configuration with the previous `apply_globals` option
    /// replaced by the argument.
    ///
    /// When disabled, properties supplied by a template's `Globals` section
    /// are reported as missing from the resources that rely on them.
    pub fn with_apply_globals(&self, apply_globals: bool) -> Self {
        let mut inner = (*self.inner).clone();
        inner.apply_globals = apply_globals;
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Return a new configuration with the previous document type override
    /// replaced by the argument.
    ///
    /// The default value is `None`, in which case the document type is
    /// detected from the document's contents.
    pub fn with_document_type(&self, document_type: Option<DocumentType>) -> Self {
        let mut inner = (*self.inner).clone();
        inner.document_type = document_type;
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Return a new configuration with the previous `validate_resources`
    /// option replaced by the argument.
    pub fn with_validate_resources(&self, validate_resources: bool) -> Self {
        let mut inner = (*self.inner).clone();
        inner.validate_resources = validate_resources;
        Self {
            inner: Arc::new(inner),
        }
    }
}

/// The actual configuration fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default, rename_all = "snake_case")]
struct ConfigInner {
    /// See [`Config::with_apply_globals()`].
    apply_globals: bool,
    /// See [`Config::with_document_type()`].
    #[serde(skip_serializing_if = "Option::is_none")]
    document_type: Option<DocumentType>,
    /// See [`Config::with_validate_resources()`].
    validate_resources: bool,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            apply_globals: true,
            document_type: None,
            validate_resources: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_enable_everything() {
        let config = Config::default();
        assert!(config.apply_globals());
        assert!(config.validate_resources());
        assert_eq!(config.document_type(), None);
    }

    #[test]
    fn builders_do_not_affect_the_original() {
        let config = Config::default();
        let changed = config
            .with_apply_globals(false)
            .with_document_type(Some(DocumentType::Sam));
        assert!(config.apply_globals());
        assert!(!changed.apply_globals());
        assert_eq!(changed.document_type(), Some(DocumentType::Sam));
    }

    #[test]
    fn deserializes_from_toml() {
        let config: Config = toml::from_str(
            r#"
            apply_globals = false
            document_type = "sam"
            "#,
        )
        .unwrap();
        assert!(!config.apply_globals());
        assert!(config.validate_resources());
        assert_eq!(config.document_type(), Some(DocumentType::Sam));

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }
}
