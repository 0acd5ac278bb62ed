pub mod configuration;
pub mod console;
pub mod error;
pub mod helpers;
pub mod schemas;
pub mod telemetry;

pub use error::BuildContextError;
pub use schemas::{BuildContextBuilder, BuildContextConfig};
