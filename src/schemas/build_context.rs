//! Build context: the declared inputs for producing a container image.
//!
//! ```yaml
//! build_context:
//!   image: python:3.11-slim
//!   build_steps:
//!     - pip install -r requirements.txt
//!   env_vars:
//!     - [LANG, C.UTF-8]
//!   commit: 3e1f9a2
//! ```
//!
//! Any field except `context`, `dockerfile` and `commit` may instead hold a
//! `{{ expression }}` reference that is filled in by [`BuildContextConfig::resolve`].

use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BuildContextError;
use crate::helpers::docker_image::validate_image;
use crate::schemas::{EnvVar, Presence, RefOrValue};

pub type SecurityContext = IndexMap<String, Value>;

/// Presence rule first, then the image grammar for a literal image.
/// A reference-valued image is checked once it has been resolved.
pub fn validate_build_context_image(
    image: Option<&RefOrValue<String>>,
    dockerfile: Option<&str>,
) -> Result<(), BuildContextError> {
    let has_image = image.map_or(false, RefOrValue::is_present);
    let has_dockerfile = dockerfile.map_or(false, |path| !path.is_empty());

    if !has_image && !has_dockerfile {
        tracing::debug!("build context has neither image nor dockerfile");
        return Err(BuildContextError::MissingImageSource);
    }

    if let Some(RefOrValue::Value(image)) = image {
        validate_image(image)?;
    }

    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BuildContextBuilder — unvalidated fields, also the document schema
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildContextBuilder {
    #[serde(default)]
    context: Option<String>,

    #[serde(default)]
    dockerfile: Option<String>,

    #[serde(default)]
    image: Option<RefOrValue<String>>,

    #[serde(default)]
    build_steps: Option<RefOrValue<Vec<String>>>,

    #[serde(default)]
    lang_env: Option<RefOrValue<String>>,

    #[serde(default)]
    env_vars: Option<RefOrValue<Vec<EnvVar>>>,

    #[serde(default)]
    security_context: Option<RefOrValue<SecurityContext>>,

    #[serde(default)]
    commit: Option<String>,
}

impl BuildContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn dockerfile<S: Into<String>>(mut self, path: S) -> Self {
        self.dockerfile = Some(path.into());
        self
    }

    pub fn image<V: Into<RefOrValue<String>>>(mut self, image: V) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn build_steps<V: Into<RefOrValue<Vec<String>>>>(mut self, steps: V) -> Self {
        self.build_steps = Some(steps.into());
        self
    }

    /// Appends to the literal step list, replacing a reference if one was set.
    pub fn build_step<S: Into<String>>(mut self, step: S) -> Self {
        match &mut self.build_steps {
            Some(RefOrValue::Value(steps)) => steps.push(step.into()),
            _ => self.build_steps = Some(RefOrValue::Value(vec![step.into()])),
        }
        self
    }

    pub fn lang_env<V: Into<RefOrValue<String>>>(mut self, lang_env: V) -> Self {
        self.lang_env = Some(lang_env.into());
        self
    }

    pub fn env_vars<V: Into<RefOrValue<Vec<EnvVar>>>>(mut self, env_vars: V) -> Self {
        self.env_vars = Some(env_vars.into());
        self
    }

    /// Appends a pair; duplicates are kept in order.
    pub fn env_var<K: Into<Value>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        let var = EnvVar::new(name, value);
        match &mut self.env_vars {
            Some(RefOrValue::Value(vars)) => vars.push(var),
            _ => self.env_vars = Some(RefOrValue::Value(vec![var])),
        }
        self
    }

    pub fn security_context<V: Into<RefOrValue<SecurityContext>>>(mut self, settings: V) -> Self {
        self.security_context = Some(settings.into());
        self
    }

    pub fn commit<S: Into<String>>(mut self, commit: S) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn build(self) -> Result<BuildContextConfig, BuildContextError> {
        validate_build_context_image(self.image.as_ref(), self.dockerfile.as_deref())?;

        Ok(BuildContextConfig {
            context: self.context,
            dockerfile: self.dockerfile,
            image: self.image,
            build_steps: self.build_steps,
            lang_env: self.lang_env,
            env_vars: self.env_vars,
            security_context: self.security_context,
            commit: self.commit,
        })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BuildContextConfig — the validated, read-only record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BuildContextBuilder")]
pub struct BuildContextConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    dockerfile: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<RefOrValue<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    build_steps: Option<RefOrValue<Vec<String>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    lang_env: Option<RefOrValue<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    env_vars: Option<RefOrValue<Vec<EnvVar>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    security_context: Option<RefOrValue<SecurityContext>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<String>,
}

impl TryFrom<BuildContextBuilder> for BuildContextConfig {
    type Error = BuildContextError;

    fn try_from(builder: BuildContextBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

impl BuildContextConfig {
    /// Key under which a build context may be nested in a document.
    pub const IDENTIFIER: &'static str = "build_context";

    pub fn builder() -> BuildContextBuilder {
        BuildContextBuilder::new()
    }

    /// Load from a file path; `.json` files are read as JSON, anything else as YAML.
    #[tracing::instrument(name = "Load build context", skip_all, fields(path = %path.display()))]
    pub fn from_file(path: &Path) -> Result<Self, BuildContextError> {
        if !path.exists() {
            return Err(BuildContextError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let raw_content = std::fs::read_to_string(path)?;
        let parsed: Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw_content)?,
            _ => serde_yaml::from_str(&raw_content)?,
        };
        Self::from_value(parsed)
    }

    /// Load from a YAML (or JSON) string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BuildContextError> {
        let parsed: Value = serde_yaml::from_str(yaml)?;
        Self::from_value(parsed)
    }

    /// Build from an already-decoded mapping of field name to raw value.
    pub fn from_value(value: Value) -> Result<Self, BuildContextError> {
        let builder: BuildContextBuilder =
            serde_path_to_error::deserialize(Self::unwrap_identifier(value))?;
        builder.build()
    }

    fn unwrap_identifier(value: Value) -> Value {
        match value {
            Value::Object(mut map) if map.len() == 1 && map.contains_key(Self::IDENTIFIER) => {
                map.remove(Self::IDENTIFIER).unwrap_or_default()
            }
            other => other,
        }
    }

    pub fn to_yaml(&self) -> Result<String, BuildContextError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, BuildContextError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn dockerfile(&self) -> Option<&str> {
        self.dockerfile.as_deref()
    }

    pub fn image(&self) -> Option<&RefOrValue<String>> {
        self.image.as_ref()
    }

    pub fn build_steps(&self) -> Option<&RefOrValue<Vec<String>>> {
        self.build_steps.as_ref()
    }

    pub fn lang_env(&self) -> Option<&RefOrValue<String>> {
        self.lang_env.as_ref()
    }

    pub fn env_vars(&self) -> Option<&RefOrValue<Vec<EnvVar>>> {
        self.env_vars.as_ref()
    }

    pub fn security_context(&self) -> Option<&RefOrValue<SecurityContext>> {
        self.security_context.as_ref()
    }

    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }

    /// Tag of the base image: `latest` when none is given, `None` when there
    /// is no literal image or the reference has more than two colons.
    pub fn image_tag(&self) -> Option<&str> {
        let image = match self.image.as_ref()? {
            RefOrValue::Value(image) if image.is_present() => image,
            _ => return None,
        };

        let segments: Vec<&str> = image.split(':').collect();
        match segments.as_slice() {
            [_] => Some("latest"),
            // `registry:port/repo` has no tag
            [_, tag] if tag.contains('/') => Some("latest"),
            [_, tag] => Some(*tag),
            [_, _, tag] => Some(*tag),
            _ => None,
        }
    }

    pub fn has_references(&self) -> bool {
        self.image.as_ref().map_or(false, RefOrValue::is_reference)
            || self.build_steps.as_ref().map_or(false, RefOrValue::is_reference)
            || self.lang_env.as_ref().map_or(false, RefOrValue::is_reference)
            || self.env_vars.as_ref().map_or(false, RefOrValue::is_reference)
            || self
                .security_context
                .as_ref()
                .map_or(false, RefOrValue::is_reference)
    }

    /// Replace every reference with its value from `params` and validate again.
    #[tracing::instrument(name = "Resolve build context", skip_all)]
    pub fn resolve(&self, params: &Value) -> Result<Self, BuildContextError> {
        let builder = BuildContextBuilder {
            context: self.context.clone(),
            dockerfile: self.dockerfile.clone(),
            image: resolve_field(self.image.as_ref(), params)?,
            build_steps: resolve_field(self.build_steps.as_ref(), params)?,
            lang_env: resolve_field(self.lang_env.as_ref(), params)?,
            env_vars: resolve_field(self.env_vars.as_ref(), params)?,
            security_context: resolve_field(self.security_context.as_ref(), params)?,
            commit: self.commit.clone(),
        };
        builder.build()
    }
}

fn resolve_field<T: Clone + DeserializeOwned>(
    field: Option<&RefOrValue<T>>,
    params: &Value,
) -> Result<Option<RefOrValue<T>>, BuildContextError> {
    field
        .map(|value| value.resolve(params).map(RefOrValue::Value))
        .transpose()
}
