/// A parsed CLI invocation, ready to run.
pub trait CallableTrait {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>>;
}
