pub mod config;
pub mod resolve;
pub mod tag;

use std::path::Path;

use crate::schemas::BuildContextConfig;

pub(crate) fn load(file: &str) -> Result<BuildContextConfig, Box<dyn std::error::Error>> {
    Ok(BuildContextConfig::from_file(Path::new(file))?)
}

pub(crate) fn render(
    config: &BuildContextConfig,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let rendered = if json {
        config.to_json()? + "\n"
    } else {
        config.to_yaml()?
    };
    Ok(rendered)
}
