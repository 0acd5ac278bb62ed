use crate::console::commands::cli::{load, render};
use crate::console::commands::CallableTrait;

/// `buildctx validate [--file build_context.yml]`
///
/// Loads a build context file and runs every construction check on it.
pub struct ConfigValidateCommand {
    pub file: String,
}

impl ConfigValidateCommand {
    pub fn new(file: String) -> Self {
        Self { file }
    }
}

impl CallableTrait for ConfigValidateCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config = load(&self.file)?;
        tracing::info!(
            file = %self.file,
            references = config.has_references(),
            "Build context validated"
        );

        println!("Build context is valid: {}", self.file);
        if config.has_references() {
            println!("Contains unresolved references; the image is checked once resolved.");
        }
        Ok(())
    }
}

/// `buildctx show [--file build_context.yml] [--json]`
///
/// Prints the validated build context with unset fields left out.
pub struct ConfigShowCommand {
    pub file: String,
    pub json: bool,
}

impl ConfigShowCommand {
    pub fn new(file: String, json: bool) -> Self {
        Self { file, json }
    }
}

impl CallableTrait for ConfigShowCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config = load(&self.file)?;
        print!("{}", render(&config, self.json)?);
        Ok(())
    }
}
