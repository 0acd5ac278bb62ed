use serde_valid::Validate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("Invalid docker image `{0}`")]
    Malformed(String),
}

/// Image reference in `[registry-host[:port]/]repo(/repo)*[:tag]` form.
/// Digests are not accepted.
#[derive(Debug, Clone, PartialEq, Validate)]
struct ImageName {
    #[validate(max_length = 255)]
    #[validate(
        pattern = r"^(?:[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*(?::[0-9]+)?/)?[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*(?:/[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*)*(?::[A-Za-z0-9_][A-Za-z0-9_.-]{0,127})?$"
    )]
    name: String,
}

/// Checks an image reference such as `ubuntu`, `ubuntu:18.04` or
/// `localhost:5000/ubuntu:18.04`. An empty image has nothing to check.
#[tracing::instrument(name = "Validate docker image", level = "debug")]
pub fn validate_image(image: &str) -> Result<(), ImageError> {
    if image.is_empty() {
        return Ok(());
    }

    if image.chars().any(char::is_whitespace) {
        tracing::debug!("image contains whitespace");
        return Err(ImageError::Malformed(image.to_string()));
    }

    ImageName {
        name: image.to_string(),
    }
    .validate()
    .map_err(|errors| {
        tracing::debug!("image rejected: {}", errors);
        ImageError::Malformed(image.to_string())
    })
}
