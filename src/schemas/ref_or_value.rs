use std::fmt;

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::BuildContextError;

/// A `{{ expression }}` placeholder, resolved against a parameter tree later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    expression: String,
}

impl Reference {
    pub fn new<S: Into<String>>(expression: S) -> Self {
        Self {
            expression: expression.into().trim().to_string(),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns `None` unless the whole string is a single `{{ ... }}` placeholder.
    pub fn parse(raw: &str) -> Option<Self> {
        let re = regex::Regex::new(r"^\s*\{\{([^{}]*)\}\}\s*$").expect("valid regex");
        re.captures(raw).map(|cap| Self::new(&cap[1]))
    }

    /// Walks the dotted expression (`params.image`, `steps.0`) through `params`.
    pub fn lookup<'a>(&self, params: &'a Value) -> Option<&'a Value> {
        self.expression
            .split('.')
            .try_fold(params, |node, key| match node {
                Value::Object(map) => map.get(key),
                Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{{ {} }}}}", self.expression)
    }
}

/// Whether a literal counts as "given" for presence checks.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Presence for IndexMap<K, V> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RefOrValue — a literal or a deferred reference
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq)]
pub enum RefOrValue<T> {
    Value(T),
    Ref(Reference),
}

impl<T> RefOrValue<T> {
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Ref(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Value(_) => None,
            Self::Ref(reference) => Some(reference),
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Ref(_))
    }
}

impl<T: Presence> RefOrValue<T> {
    /// An unresolved reference always counts as present.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Value(value) => value.is_present(),
            Self::Ref(_) => true,
        }
    }
}

impl<T: Clone + DeserializeOwned> RefOrValue<T> {
    pub fn resolve(&self, params: &Value) -> Result<T, BuildContextError> {
        let reference = match self {
            Self::Value(value) => return Ok(value.clone()),
            Self::Ref(reference) => reference,
        };

        let found = reference
            .lookup(params)
            .ok_or_else(|| BuildContextError::UnresolvedReference {
                expression: reference.expression.clone(),
            })?;

        tracing::debug!("resolved {} to {}", reference, found);
        serde_json::from_value(found.clone())
            .or_else(|err| match found {
                // Numbers and booleans fill text fields as written, e.g. `3.10`.
                Value::Number(_) | Value::Bool(_) => {
                    serde_json::from_value(Value::String(found.to_string())).map_err(|_| err)
                }
                _ => Err(err),
            })
            .map_err(|err| BuildContextError::InvalidReferenceValue {
                expression: reference.expression.clone(),
                reason: err.to_string(),
            })
    }
}

impl<T> From<T> for RefOrValue<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for RefOrValue<String> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for RefOrValue<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;

        if let Some(reference) = raw.as_str().and_then(Reference::parse) {
            return Ok(Self::Ref(reference));
        }

        serde_json::from_value(raw)
            .map(Self::Value)
            .map_err(D::Error::custom)
    }
}

impl<T: Serialize> Serialize for RefOrValue<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Ref(reference) => serializer.collect_str(reference),
        }
    }
}
