use crate::console::commands::cli::load;
use crate::console::commands::CallableTrait;

/// `buildctx tag [--file build_context.yml]`
///
/// Prints the base image tag. Prints nothing for dockerfile-only contexts
/// and unresolved image references.
pub struct TagCommand {
    pub file: String,
}

impl TagCommand {
    pub fn new(file: String) -> Self {
        Self { file }
    }
}

impl CallableTrait for TagCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config = load(&self.file)?;
        match config.image_tag() {
            Some(tag) => println!("{}", tag),
            None => tracing::info!(file = %self.file, "No image tag derivable"),
        }
        Ok(())
    }
}
