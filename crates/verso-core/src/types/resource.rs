//! Resource property bags.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::version::Version;
use crate::error::{VersoError, VersoResult};
use crate::key::normalize_key;

/// A family of free-form JSON properties.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Name of the system-managed property family.
pub const SYSTEM_FAMILY: &str = "sys";

/// Name of the user-managed property family.
pub const PROPERTIES_FAMILY: &str = "properties";

/// `sys` field names owned by [`SystemProperties`]; never stored in `extra`.
pub const RESERVED_SYSTEM_FIELDS: [&str; 4] = ["path", "key", "created", "updated"];

fn is_reserved_system_field(name: &str) -> bool {
    RESERVED_SYSTEM_FIELDS.contains(&name)
}

/// System-managed properties of a resource.
///
/// The key is written as `sys.path`; `sys.key` is accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SystemProperties {
    /// Normalized resource key.
    #[serde(default, rename = "path", alias = "key")]
    pub key: String,
    /// Version at which the resource was first stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Version>,
    /// Version of the latest revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Version>,
    /// Backend-specific system fields. Reserved names are dropped on output.
    #[serde(flatten)]
    pub extra: PropertyMap,
}

impl SystemProperties {
    /// Set a free-form system field, returning the previous value.
    ///
    /// Fails for the reserved names in [`RESERVED_SYSTEM_FIELDS`].
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> VersoResult<Option<Value>> {
        if is_reserved_system_field(name) {
            return Err(VersoError::validation(format!(
                "'sys.{}' is managed by the repository",
                name
            )));
        }
        Ok(self.extra.insert(name.to_string(), value.into()))
    }
}

#[derive(Serialize)]
struct SystemPropertiesOut<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<&'a Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<&'a Version>,
    #[serde(flatten)]
    extra: BTreeMap<&'a str, &'a Value>,
}

impl Serialize for SystemProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SystemPropertiesOut {
            path: &self.key,
            created: self.created.as_ref(),
            updated: self.updated.as_ref(),
            extra: self
                .extra
                .iter()
                .filter(|(name, _)| !is_reserved_system_field(name))
                .map(|(name, value)| (name.as_str(), value))
                .collect(),
        }
        .serialize(serializer)
    }
}

/// A versioned property bag managed by a project.
///
/// Every resource has a `sys` family (key and version stamps) and a
/// `properties` family (user data). Further named families may be added with
/// [`Resource::property_family_mut`]; other top-level JSON values are kept as
/// plain fields. Resources are plain values: `Clone` produces a fully
/// independent deep copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    sys: SystemProperties,
    #[serde(default)]
    properties: PropertyMap,
    #[serde(flatten)]
    families: BTreeMap<String, Value>,
}

impl Resource {
    /// Create an empty resource with the given key.
    pub fn new(key: &str) -> Self {
        let mut resource = Self::default();
        resource.set_key(key);
        resource
    }

    /// Build a resource from an arbitrary JSON object.
    ///
    /// The `sys.path` (or `sys.key`) field is normalized.
    pub fn from_value(value: Value) -> VersoResult<Self> {
        if !value.is_object() {
            return Err(VersoError::invalid_resource(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        let mut resource: Resource = serde_json::from_value(value)?;
        let key = std::mem::take(&mut resource.sys.key);
        resource.set_key(&key);
        Ok(resource)
    }

    /// Parse a resource from JSON text.
    pub fn from_json(text: &str) -> VersoResult<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| VersoError::parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Render this resource as a JSON value.
    pub fn to_value(&self) -> VersoResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Return an independent deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Normalized key of this resource.
    pub fn key(&self) -> &str {
        &self.sys.key
    }

    /// Set the key; the value is normalized.
    pub fn set_key(&mut self, key: &str) {
        self.sys.key = normalize_key(key);
    }

    /// Version at which this resource was created.
    pub fn created(&self) -> Option<&Version> {
        self.sys.created.as_ref()
    }

    /// Version of this revision, falling back to the creation version.
    pub fn updated(&self) -> Option<&Version> {
        self.sys.updated.as_ref().or(self.sys.created.as_ref())
    }

    /// Stamp this resource with a new version.
    ///
    /// `created` is only set if it is still unset; `updated` always moves.
    pub fn update_version(&mut self, version: Version) {
        if self.sys.created.is_none() {
            self.sys.created = Some(version.clone());
        }
        self.sys.updated = Some(version);
    }

    /// System-managed properties.
    pub fn system_properties(&self) -> &SystemProperties {
        &self.sys
    }

    /// Mutable system-managed properties.
    pub fn system_properties_mut(&mut self) -> &mut SystemProperties {
        &mut self.sys
    }

    /// User-managed properties.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Mutable user-managed properties.
    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    /// Get one user property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Set one user property, returning the previous value.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Option<Value> {
        self.properties.insert(name.into(), value.into())
    }

    /// Builder: set one user property.
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.set_property(name, value);
        self
    }

    /// Get a property family by name.
    ///
    /// For `sys` only the free-form system fields are exposed as a map; the
    /// key and version stamps are reached through their own accessors.
    pub fn property_family(&self, name: &str) -> Option<&PropertyMap> {
        match name {
            SYSTEM_FAMILY => Some(&self.sys.extra),
            PROPERTIES_FAMILY => Some(&self.properties),
            _ => self.families.get(name).and_then(Value::as_object),
        }
    }

    /// Get a property family by name, creating it if it does not exist.
    ///
    /// A plain field of the same name is replaced by the new family.
    pub fn property_family_mut(&mut self, name: &str) -> &mut PropertyMap {
        match name {
            SYSTEM_FAMILY => &mut self.sys.extra,
            PROPERTIES_FAMILY => &mut self.properties,
            _ => {
                let slot = self
                    .families
                    .entry(name.to_string())
                    .or_insert_with(|| Value::Object(PropertyMap::new()));
                if !slot.is_object() {
                    *slot = Value::Object(PropertyMap::new());
                }
                match slot {
                    Value::Object(family) => family,
                    _ => unreachable!("property family slot holds an object"),
                }
            }
        }
    }

    /// Set a free-form `sys` field; reserved names are refused.
    pub fn set_system_property(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> VersoResult<Option<Value>> {
        self.sys.set(name, value)
    }

    /// A top-level field outside `sys` and `properties`, of any JSON type.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.families.get(name)
    }

    /// Names of all property families, `sys` and `properties` first.
    pub fn property_families(&self) -> Vec<&str> {
        let mut names = vec![SYSTEM_FAMILY, PROPERTIES_FAMILY];
        names.extend(
            self.families
                .iter()
                .filter(|(_, value)| value.is_object())
                .map(|(name, _)| name.as_str()),
        );
        names
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
