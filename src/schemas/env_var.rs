use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One `[name, value]` entry of `env_vars`. Written as a two-element list;
/// only the length is checked, either element may hold any value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvVar {
    pub name: Value,
    pub value: Value,
}

impl EnvVar {
    pub fn new<K: Into<Value>, V: Into<Value>>(name: K, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<'de> Deserialize<'de> for EnvVar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<Value>::deserialize(deserializer)?;
        if items.len() != 2 {
            return Err(D::Error::custom(format!(
                "env var entries must have exactly 2 elements, got {}",
                items.len()
            )));
        }

        let mut items = items.into_iter();
        match (items.next(), items.next()) {
            (Some(name), Some(value)) => Ok(Self { name, value }),
            _ => Err(D::Error::custom("env var entries must have exactly 2 elements")),
        }
    }
}

impl Serialize for EnvVar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.name, &self.value).serialize(serializer)
    }
}
