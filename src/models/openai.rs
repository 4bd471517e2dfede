use serde::{Deserialize, Serialize};

/// Body of `POST /images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImagesRequest<'a> {
    pub prompt: &'a str,
    pub n: u32,
    pub model: &'a str,
    pub size: &'a str,
    pub response_format: &'a str,
}

impl<'a> ImagesRequest<'a> {
    pub fn single_url(prompt: &'a str, model: &'a str, size: &'a str) -> Self {
        Self {
            prompt,
            n: 1,
            model,
            size,
            response_format: "url",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Option<Vec<ImageData>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

impl ImagesResponse {
    /// URL of the first image, if the body has the expected shape.
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .as_ref()?
            .first()?
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}
