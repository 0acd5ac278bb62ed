#[derive(Debug, serde::Deserialize)]
pub struct Settings {
    pub log_level: String,
    pub default_file: String,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Defaults, then an optional `buildctx.{yaml,toml,json}` next to the
    // invocation, then BUILDCTX_* variables
    let settings = config::Config::builder()
        .set_default("log_level", "warn")?
        .set_default("default_file", "build_context.yml")?
        .add_source(config::File::with_name("buildctx").required(false))
        .add_source(config::Environment::with_prefix("BUILDCTX"))
        .build()?;

    settings.try_deserialize()
}
