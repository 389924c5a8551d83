//! Mockup and try-on generation on top of a [`GenerativeModel`].
//!
//! Both flows share one pipeline: reject an empty prompt, decode the uploads,
//! send `[prompt, fabric, (person)]`, then take the first inline image of the
//! first candidate. Everything that is not a known outcome ends up as
//! `AppError::Transport` after being logged.
use std::io::Cursor;
use std::sync::Arc;

use image::ImageFormat;

use crate::error::{AppError, AppResult};
use crate::gemini::client::GenerativeModel;
use crate::gemini::types::{GenerateContentResponse, InlineImage, Part};

#[derive(Clone)]
pub struct MockupGenerator {
    model: Arc<dyn GenerativeModel>,
}

impl MockupGenerator {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        MockupGenerator { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Fabric swatch onto a mannequin outfit.
    pub async fn generate_mockup(&self, fabric: &[u8], prompt: &str) -> AppResult<Vec<u8>> {
        self.generate(prompt, &[fabric]).await
    }

    /// Fabric swatch onto the person in the customer photo.
    pub async fn generate_try_on(&self, fabric: &[u8], person: &[u8], prompt: &str) -> AppResult<Vec<u8>> {
        self.generate(prompt, &[fabric, person]).await
    }

    async fn generate(&self, prompt: &str, images: &[&[u8]]) -> AppResult<Vec<u8>> {
        if prompt.is_empty() {
            tracing::warn!("No prompt provided, skipping generation");
            return Err(AppError::NoPrompt);
        }

        match self.attempt(prompt, images).await {
            Ok(image) => {
                tracing::info!("Image data received from {} ({} bytes, {})", self.model_name(), image.data.len(), image.mime_type);
                Ok(image.data)
            }
            Err(e @ AppError::NoCandidates { .. }) | Err(e @ AppError::NoImageInResponse { .. }) => Err(e),
            Err(e) => {
                tracing::error!("Unexpected error during image generation: {}", e);
                Err(match e {
                    AppError::Transport(msg) => AppError::Transport(msg),
                    other => AppError::Transport(other.to_string()),
                })
            }
        }
    }

    async fn attempt(&self, prompt: &str, images: &[&[u8]]) -> AppResult<InlineImage> {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(Part::Text(prompt.to_string()));
        for bytes in images {
            parts.push(Part::Image(prepare_image(bytes)?));
        }
        let response = self.model.generate_content(parts).await?;
        extract_image(response)
    }
}

/// Decode an upload and pick the MIME type it is sent with. PNG, JPEG and WebP
/// pass through untouched; anything else decodable is re-encoded as PNG.
pub fn prepare_image(bytes: &[u8]) -> AppResult<InlineImage> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => Ok(InlineImage {
            mime_type: format.to_mime_type().to_string(),
            data: bytes.to_vec(),
        }),
        _ => {
            let mut png = Vec::new();
            decoded.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
            Ok(InlineImage { mime_type: "image/png".to_string(), data: png })
        }
    }
}

/// Pull the image out of a reply, logging whatever diagnostics it carries.
pub fn extract_image(response: GenerateContentResponse) -> AppResult<InlineImage> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let feedback = response.prompt_feedback.unwrap_or_default();
        tracing::warn!(
            block_reason = ?feedback.block_reason,
            safety_ratings = ?feedback.safety_ratings,
            "Gemini API returned no candidates"
        );
        return Err(AppError::NoCandidates { block_reason: feedback.block_reason });
    };

    if let Some(image) = candidate.first_image() {
        return Ok(image.clone());
    }

    let finish_reason = candidate.finish_reason.clone();
    tracing::warn!(
        finish_reason = ?finish_reason,
        safety_ratings = ?candidate.safety_ratings,
        text = ?candidate.text(),
        "Gemini API did not return an image"
    );
    Err(AppError::NoImageInResponse { finish_reason })
}
