use std::path::Path;

use serde_json::{Map, Value};

use crate::console::commands::cli::{load, render};
use crate::console::commands::CallableTrait;

/// `buildctx resolve [--file build_context.yml] [--params-file F] [--param KEY=VALUE]...`
///
/// Fills `{{ ... }}` references from the given parameters and prints the
/// result after validating it again.
pub struct ResolveCommand {
    pub file: String,
    pub params_file: Option<String>,
    pub params: Vec<String>,
    pub json: bool,
}

impl ResolveCommand {
    pub fn new(file: String, params_file: Option<String>, params: Vec<String>, json: bool) -> Self {
        Self {
            file,
            params_file,
            params,
            json,
        }
    }

    fn collect_params(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let mut root = match &self.params_file {
            Some(path) => read_params_file(Path::new(path))?,
            None => Map::new(),
        };

        for raw in &self.params {
            let (key, value) = raw
                .split_once('=')
                .ok_or_else(|| format!("Invalid parameter `{raw}`, expected KEY=VALUE"))?;
            insert_param(&mut root, key.trim(), parse_param_value(value))?;
        }

        Ok(Value::Object(root))
    }
}

impl CallableTrait for ResolveCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config = load(&self.file)?;
        let params = self.collect_params()?;
        let resolved = config.resolve(&params)?;
        tracing::info!(file = %self.file, "Build context resolved");
        print!("{}", render(&resolved, self.json)?);
        Ok(())
    }
}

fn read_params_file(path: &Path) -> Result<Map<String, Value>, Box<dyn std::error::Error>> {
    let raw_content = std::fs::read_to_string(path)
        .map_err(|err| format!("Cannot read parameters file {}: {err}", path.display()))?;
    match serde_yaml::from_str::<Value>(&raw_content)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(format!("Parameters file {} must contain a mapping", path.display()).into()),
    }
}

/// Flow sequences and mappings (`[make, test]`, `{a: b}`) are read as YAML.
/// Scalars stay exactly as typed, so `3.10` is not shortened to `3.1`.
fn parse_param_value(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// `a.b.c=v` nests as `{"a": {"b": {"c": v}}}`.
fn insert_param(root: &mut Map<String, Value>, key: &str, value: Value) -> Result<(), String> {
    let mut parts = key.split('.').peekable();
    let mut node = root;

    while let Some(part) = parts.next() {
        if part.is_empty() {
            return Err(format!("Invalid parameter name `{key}`"));
        }
        if parts.peek().is_none() {
            node.insert(part.to_string(), value);
            return Ok(());
        }

        let entry = node
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        node = match entry {
            Value::Object(map) => map,
            _ => return Err(format!("Parameter `{key}` conflicts with the value at `{part}`")),
        };
    }

    Err(format!("Invalid parameter name `{key}`"))
}
