use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColorGenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("unexpected format: {0}")]
    FormatError(String),
    #[error("Image error: {0}")]
    ImageError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ColorGenError {
    /// Message shown to the person using the form.
    pub fn user_message(&self) -> String {
        match self {
            ColorGenError::ConfigError(msg) => msg.clone(),
            ColorGenError::RequestError(msg) => {
                format!("An error occurred while calling the API: {}", msg)
            }
            ColorGenError::FormatError(_) => {
                "Unexpected response format from the API.".to_string()
            }
            ColorGenError::ImageError(msg) => format!("Could not read the generated image: {}", msg),
            ColorGenError::ValidationError(msg) => msg.clone(),
            ColorGenError::SerializationError(msg) | ColorGenError::InternalError(msg) => {
                format!("Something went wrong: {}", msg)
            }
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ColorGenError::ConfigError(_))
    }
}

impl From<reqwest::Error> for ColorGenError {
    fn from(e: reqwest::Error) -> Self {
        ColorGenError::RequestError(e.to_string())
    }
}

impl From<image::ImageError> for ColorGenError {
    fn from(e: image::ImageError) -> Self {
        ColorGenError::ImageError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ColorGenError>;
