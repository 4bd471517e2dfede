pub mod config;
pub mod error;
pub mod i18n;
pub mod logger;
pub mod models;
pub mod openai;
#[cfg(feature = "server")]
pub mod server;
pub mod session;

pub use config::{Config, Credential};
pub use error::{ColorGenError, Result};
pub use i18n::Language;
pub use models::{GeneratedImage, GenerationRequest, GenerationResult, DOWNLOAD_FILE_NAME};
pub use openai::{ImageClient, ImageGenerator};
pub use session::{SessionId, SessionStore};
