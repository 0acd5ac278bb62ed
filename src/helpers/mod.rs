pub mod docker_image;

pub use docker_image::{validate_image, ImageError};
