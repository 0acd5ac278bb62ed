mod build_context;
mod env_var;
mod ref_or_value;

pub use build_context::*;
pub use env_var::*;
pub use ref_or_value::*;
