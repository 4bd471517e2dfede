use crate::{
    config::Config,
    error::{ColorGenError, Result},
    i18n::Language,
    logger,
    models::{
        too_large, GeneratedImage, GenerationRequest, GenerationResult, ImagesRequest,
        ImagesResponse,
    },
};
use async_trait::async_trait;
use reqwest::{header, Client};

/// Longest slice of an error body carried into a `RequestError`.
const ERROR_BODY_EXCERPT: usize = 300;

/// Anything that can turn a request into an image. The web form only sees this.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_request(&self, request: &GenerationRequest) -> GenerationResult;
}

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    config: Config,
}

impl ImageClient {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ColorGenError::InternalError(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates a coloring page for `description` with the English template.
    pub async fn generate(&self, description: &str) -> GenerationResult {
        // A missing key is reported before input validation.
        self.config.credential()?;
        let request = GenerationRequest::new(description, Language::En)?;
        self.generate_request(&request).await
    }

    async fn request_image_url(&self, request: &GenerationRequest) -> Result<String> {
        let credential = self.config.credential()?;
        let url = self.config.generations_url();
        let body = ImagesRequest::single_url(
            request.rendered_prompt(),
            &self.config.model,
            &self.config.size,
        );

        log::info!("Generating image with model: {}", self.config.model);
        log::debug!("Image generation prompt: {}", request.rendered_prompt());

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image generation request failed: {}", e);
                ColorGenError::RequestError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(ERROR_BODY_EXCERPT).collect();
            log::error!("Image generation returned {}: {}", status, excerpt);
            return Err(ColorGenError::RequestError(format!(
                "{} from {}: {}",
                status, url, excerpt
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ColorGenError::RequestError(e.to_string()))?;
        let parsed: ImagesResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!("Unparseable image generation response: {}", e);
            ColorGenError::FormatError(e.to_string())
        })?;

        if let Some(revised) = parsed
            .data
            .as_ref()
            .and_then(|data| data.first())
            .and_then(|first| first.revised_prompt.as_deref())
        {
            log::debug!("Service revised prompt to: {}", revised);
        }

        parsed.first_url().map(str::to_string).ok_or_else(|| {
            log::error!("Image generation response has no data[0].url");
            ColorGenError::FormatError("response has no data[0].url".into())
        })
    }

    async fn fetch_image(&self, image_url: &str) -> GenerationResult {
        log::info!("Fetching generated image");
        log::debug!("Image URL: {}", image_url);

        let mut response = self
            .client
            .get(image_url)
            .send()
            .await
            .map_err(|e| ColorGenError::RequestError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Image fetch returned {}", status);
            return Err(ColorGenError::RequestError(format!(
                "{} while fetching the generated image",
                status
            )));
        }

        let max = self.config.max_image_bytes;
        if let Some(length) = response.content_length() {
            if length > max as u64 {
                log::error!("Refusing {} byte image (max {})", length, max);
                return Err(too_large(length as usize, max));
            }
        }

        // Content-Length may be absent or wrong; count as the body arrives.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ColorGenError::RequestError(e.to_string()))?
        {
            if bytes.len() + chunk.len() > max {
                log::error!("Image body exceeded {} bytes", max);
                return Err(too_large(bytes.len() + chunk.len(), max));
            }
            bytes.extend_from_slice(&chunk);
        }

        GeneratedImage::from_bytes(&bytes, image_url)
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate_request(&self, request: &GenerationRequest) -> GenerationResult {
        let _timer = logger::timer("image generation");

        let image_url = self.request_image_url(request).await?;
        let image = self.fetch_image(&image_url).await?;

        let (width, height) = image.dimensions();
        log::info!("Generated {}x{} {:?} image", width, height, image.format);
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{
        Method::{GET, POST},
        MockServer,
    };
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use serde_json::json;
    use std::io::Cursor;

    fn should_skip_httpmock() -> bool {
        match std::net::TcpListener::bind(("127.0.0.1", 0)) {
            Ok(_) => false,
            Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                eprintln!("skipping httpmock test: sandbox forbids binding to localhost");
                true
            }
            Err(err) => panic!("failed to bind localhost for httpmock tests: {err}"),
        }
    }

    fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, format)
            .unwrap();
        buffer.into_inner()
    }

    fn client_for(server: &MockServer) -> ImageClient {
        ImageClient::new(
            Config::new()
                .with_api_key("sk-test")
                .with_api_base(server.url("/v1")),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_posts_templated_prompt_and_fetches_image() -> Result<()> {
        if should_skip_httpmock() {
            return Ok(());
        }
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/images/generations")
                    .header("authorization", "Bearer sk-test")
                    .header("content-type", "application/json")
                    .body_includes("for kids to color: a happy whale. Never add texts")
                    .body_includes("\"n\":1")
                    .body_includes("\"model\":\"dall-e-3\"")
                    .body_includes("\"size\":\"1024x1024\"")
                    .body_includes("\"response_format\":\"url\"");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "created": 1700000000,
                        "data": [{ "url": server.url("/files/whale.png") }]
                    }));
            })
            .await;
        let get = server
            .mock_async(|when, then| {
                when.method(GET).path("/files/whale.png");
                then.status(200)
                    .header("content-type", "image/png")
                    .body(image_bytes(32, 24, ImageFormat::Png));
            })
            .await;

        let image = client_for(&server).generate("a happy whale").await?;

        post.assert_async().await;
        get.assert_async().await;
        assert_eq!(image.dimensions(), (32, 24));
        assert!(!image.to_png()?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_padded_description_is_sent_verbatim() -> Result<()> {
        if should_skip_httpmock() {
            return Ok(());
        }
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/images/generations")
                    .body_includes("for kids to color:   a whale  . Never add texts");
                then.status(200)
                    .json_body(json!({ "data": [{ "url": server.url("/files/whale.png") }] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/whale.png");
                then.status(200).body(image_bytes(2, 2, ImageFormat::Png));
            })
            .await;

        client_for(&server).generate("  a whale  ").await?;
        post.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_oversized_image_is_rejected() {
        if should_skip_httpmock() {
            return;
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(200)
                    .json_body(json!({ "data": [{ "url": server.url("/files/huge.png") }] }));
            })
            .await;
        let get = server
            .mock_async(|when, then| {
                when.method(GET).path("/files/huge.png");
                then.status(200).body(vec![0x89u8; 4096]);
            })
            .await;

        let client = ImageClient::new(
            Config::new()
                .with_api_key("sk-test")
                .with_api_base(server.url("/v1"))
                .with_max_image_bytes(1024),
        )
        .unwrap();
        let err = client.generate("a mountain").await.unwrap_err();

        match err {
            ColorGenError::ImageError(reason) => {
                assert!(reason.contains("too large"));
                assert!(reason.contains("max: 1024 bytes"));
            }
            other => panic!("expected ImageError, got {other:?}"),
        }
        get.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_jpeg_result_reencodes_to_png_with_same_dimensions() -> Result<()> {
        if should_skip_httpmock() {
            return Ok(());
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(200)
                    .json_body(json!({ "data": [{ "url": server.url("/files/a.jpg") }] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/a.jpg");
                then.status(200).body(image_bytes(20, 10, ImageFormat::Jpeg));
            })
            .await;

        let image = client_for(&server).generate("a tractor").await?;
        assert_eq!(image.format, ImageFormat::Jpeg);

        let png = image.to_png()?;
        let decoded = GeneratedImage::from_bytes(&png, "memory")?;
        assert_eq!(decoded.dimensions(), (20, 10));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_calls() {
        if should_skip_httpmock() {
            return;
        }
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;
        let get = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200);
            })
            .await;

        let client = ImageClient::new(Config::new().with_api_base(server.url("/v1"))).unwrap();
        let err = client.generate("a dinosaur").await.unwrap_err();

        assert!(err.is_config());
        post.assert_calls_async(0).await;
        get.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_empty_description_never_posts() {
        if should_skip_httpmock() {
            return;
        }
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200);
            })
            .await;

        let err = client_for(&server).generate("   ").await.unwrap_err();

        assert!(matches!(err, ColorGenError::ValidationError(_)));
        post.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_server_error_skips_image_fetch() {
        if should_skip_httpmock() {
            return;
        }
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(500).body("{\"error\":{\"message\":\"overloaded\"}}");
            })
            .await;
        let get = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200);
            })
            .await;

        let err = client_for(&server).generate("a castle").await.unwrap_err();

        match err {
            ColorGenError::RequestError(reason) => {
                assert!(reason.contains("500"));
                assert!(reason.contains("overloaded"));
            }
            other => panic!("expected RequestError, got {other:?}"),
        }
        post.assert_calls_async(1).await;
        get.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_missing_data_array_is_format_error() {
        if should_skip_httpmock() {
            return;
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(200).json_body(json!({ "created": 1 }));
            })
            .await;

        let err = client_for(&server).generate("a rocket").await.unwrap_err();

        assert!(matches!(err, ColorGenError::FormatError(_)));
        assert!(err.to_string().starts_with("unexpected format"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_format_error() {
        if should_skip_httpmock() {
            return;
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(200).body("<html>gateway</html>");
            })
            .await;

        let err = client_for(&server).generate("a rocket").await.unwrap_err();
        assert!(matches!(err, ColorGenError::FormatError(_)));
    }

    #[tokio::test]
    async fn test_failed_image_fetch_is_request_error() {
        if should_skip_httpmock() {
            return;
        }
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/images/generations");
                then.status(200)
                    .json_body(json!({ "data": [{ "url": server.url("/files/gone.png") }] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/gone.png");
                then.status(403);
            })
            .await;

        let err = client_for(&server).generate("a kite").await.unwrap_err();
        assert!(matches!(err, ColorGenError::RequestError(_)));
    }

    #[tokio::test]
    async fn test_french_request_uses_french_template() -> Result<()> {
        if should_skip_httpmock() {
            return Ok(());
        }
        let server = MockServer::start_async().await;
        let post = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/images/generations")
                    .body_includes("à colorier : un chat. N'ajoutez jamais de texte");
                then.status(200)
                    .json_body(json!({ "data": [{ "url": server.url("/files/chat.png") }] }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/files/chat.png");
                then.status(200).body(image_bytes(2, 2, ImageFormat::Png));
            })
            .await;

        let request = GenerationRequest::new("un chat", Language::Fr)?;
        client_for(&server).generate_request(&request).await?;
        post.assert_async().await;
        Ok(())
    }
}
