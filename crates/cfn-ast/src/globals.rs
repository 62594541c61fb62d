//! Collection of a template's `Globals` section.
//!
//! A SAM template may declare properties once under `Globals.<Key>`; those
//! properties then apply to every resource of the matching type. The set of
//! keys is closed, so [`GlobalsConfig`] has one field per key rather than
//! being a map.

use std::fmt;

use tracing::debug;
use tracing::trace;

use crate::Document;
use crate::NodeId;
use crate::NodeKind;

/// The name of the top-level `Globals` section.
pub const GLOBALS_KEY: &str = "Globals";

/// A key that may appear under a template's `Globals` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GlobalKey {
    /// The `Api` key.
    Api,
    /// The `Function` key.
    Function,
    /// The `SimpleTable` key.
    SimpleTable,
}

impl GlobalKey {
    /// Every global key, in declaration order.
    pub const ALL: [Self; 3] = [Self::Api, Self::Function, Self::SimpleTable];

    /// Gets the key for the given `Globals` property name.
    ///
    /// Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Api" => Some(Self::Api),
            "Function" => Some(Self::Function),
            "SimpleTable" => Some(Self::SimpleTable),
            _ => None,
        }
    }

    /// Gets the property name of the key as it appears under `Globals`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Api => "Api",
            Self::Function => "Function",
            Self::SimpleTable => "SimpleTable",
        }
    }

    /// Gets the resource types to which properties under this key apply.
    pub fn resource_types(&self) -> &'static [&'static str] {
        match self {
            Self::Api => &["AWS::Serverless::Api"],
            Self::Function => &["AWS::Serverless::Function"],
            Self::SimpleTable => &["AWS::Serverless::SimpleTable"],
        }
    }
}

impl fmt::Display for GlobalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The properties declared under a single `Globals` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfigItem {
    /// The key the item is for.
    key: GlobalKey,
    /// The declared property names, in document order.
    ///
    /// Duplicates are preserved.
    pub properties: Vec<String>,
}

impl GlobalConfigItem {
    /// Creates an empty item for the given key.
    pub fn new(key: GlobalKey) -> Self {
        Self {
            key,
            properties: Vec::new(),
        }
    }

    /// Gets the key the item is for.
    pub fn key(&self) -> GlobalKey {
        self.key
    }

    /// Gets the resource types the item's properties apply to.
    pub fn resource_types(&self) -> &'static [&'static str] {
        self.key.resource_types()
    }
}

/// The properties declared under a template's `Globals` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalsConfig {
    /// The properties declared under `Globals.Api`.
    pub api: GlobalConfigItem,
    /// The properties declared under `Globals.Function`.
    pub function: GlobalConfigItem,
    /// The properties declared under `Globals.SimpleTable`.
    pub simple_table: GlobalConfigItem,
}

impl Default for GlobalsConfig {
    fn default() -> Self {
        Self {
            api: GlobalConfigItem::new(GlobalKey::Api),
            function: GlobalConfigItem::new(GlobalKey::Function),
            simple_table: GlobalConfigItem::new(GlobalKey::SimpleTable),
        }
    }
}

impl GlobalsConfig {
    /// Gets the item for the given key.
    pub fn item(&self, key: GlobalKey) -> &GlobalConfigItem {
        match key {
            GlobalKey::Api => &self.api,
            GlobalKey::Function => &self.function,
            GlobalKey::SimpleTable => &self.simple_table,
        }
    }

    /// Gets the mutable item for the given key.
    pub fn item_mut(&mut self, key: GlobalKey) -> &mut GlobalConfigItem {
        match key {
            GlobalKey::Api => &mut self.api,
            GlobalKey::Function => &mut self.function,
            GlobalKey::SimpleTable => &mut self.simple_table,
        }
    }

    /// Gets an iterator over the items, in key order.
    pub fn items(&self) -> impl Iterator<Item = &GlobalConfigItem> {
        [&self.api, &self.function, &self.simple_table].into_iter()
    }

    /// Determines if no key declares any properties.
    pub fn is_empty(&self) -> bool {
        self.items().all(|item| item.properties.is_empty())
    }
}

/// Gets the globals configuration for a document that declares no globals.
pub fn default_globals_config() -> GlobalsConfig {
    GlobalsConfig::default()
}

/// Collects the globals declared by the given `Globals` object node.
///
/// Children that are not properties, keys outside of the known set, and
/// values that are not objects are ignored.
pub fn collect_global_properties_from_node(document: &Document, globals: NodeId) -> GlobalsConfig {
    let mut config = GlobalsConfig::default();
    let Some(object) = document.node(globals).as_object() else {
        return config;
    };

    for child in object.properties() {
        let Some(property) = document.node(*child).as_property() else {
            continue;
        };

        let Some(key) = GlobalKey::from_name(property.key()) else {
            trace!("ignoring unknown globals key `{key}`", key = property.key());
            continue;
        };

        let Some(value) = property.value() else {
            continue;
        };

        let NodeKind::Object(declared) = document.node(value).kind() else {
            continue;
        };

        let item = config.item_mut(key);
        item.properties.extend(
            declared
                .properties()
                .iter()
                .filter_map(|p| document.node(*p).as_property())
                .map(|p| p.key().to_string()),
        );
    }

    config
}

/// Collects the globals declared by the given document.
///
/// Only documents whose type supports globals are examined; every other
/// document, and any document without a `Globals` object, yields the
/// default (empty) configuration.
pub fn collect_globals(document: &Document) -> GlobalsConfig {
    if !document.document_type().supports_globals() {
        return default_globals_config();
    }

    let Some(globals) = document.find(&[GLOBALS_KEY.into()]) else {
        return default_globals_config();
    };

    let Some(value) = document.node(globals).as_property().and_then(|p| p.value()) else {
        return default_globals_config();
    };

    if document.node(value).as_object().is_none() {
        return default_globals_config();
    }

    let config = collect_global_properties_from_node(document, value);
    debug!(
        "collected {count} global property name(s)",
        count = config.items().map(|i| i.properties.len()).sum::<usize>()
    );
    config
}
