//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use axum::Router;

use fabric_mockup_api::api::{create_app, AppState};
use fabric_mockup_api::gemini::types::{Candidate, GenerateContentResponse, InlineImage, Part, PromptFeedback};
use fabric_mockup_api::{AppResult, GenerativeModel, MockupGenerator, PromptCatalog, PromptConstructor};

pub const BOUNDARY: &str = "X-MOCKUP-TEST-BOUNDARY";

pub const PROMPTS_CSV: &str = "id,prompt,outfit,customerTryOn\n\
001,Drape the swatch over a mannequin in an A-line dress,A-line dress,red dress\n\
002,\"Tailor a blazer, notched lapels\",Blazer,a tailored blazer\n\
003,,Kurta,\n";

#[derive(Clone, Copy)]
pub enum StubMode {
    /// One candidate whose only image part holds the prompt text as bytes.
    EchoPrompt,
    NoCandidates,
    TextOnly,
}

pub struct StubModel {
    pub mode: StubMode,
    pub calls: AtomicUsize,
}

impl StubModel {
    pub fn new(mode: StubMode) -> Arc<Self> {
        Arc::new(StubModel { mode, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate_content(&self, parts: Vec<Part>) -> AppResult<GenerateContentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = match parts.first() {
            Some(Part::Text(t)) => t.clone(),
            _ => String::new(),
        };
        // Yield so concurrent requests interleave.
        tokio::task::yield_now().await;
        Ok(match self.mode {
            StubMode::EchoPrompt => GenerateContentResponse {
                candidates: vec![Candidate {
                    parts: vec![
                        Part::Text("Here you go".into()),
                        Part::Image(InlineImage { mime_type: "image/png".into(), data: prompt.into_bytes() }),
                    ],
                    finish_reason: Some("STOP".into()),
                    safety_ratings: vec![],
                }],
                prompt_feedback: None,
            },
            StubMode::NoCandidates => GenerateContentResponse {
                candidates: vec![],
                prompt_feedback: Some(PromptFeedback { block_reason: Some("SAFETY".into()), safety_ratings: vec![] }),
            },
            StubMode::TextOnly => GenerateContentResponse {
                candidates: vec![Candidate {
                    parts: vec![Part::Text("I cannot generate that image".into())],
                    finish_reason: Some("IMAGE_SAFETY".into()),
                    safety_ratings: vec![],
                }],
                prompt_feedback: None,
            },
        })
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

pub fn fixture_catalog() -> PromptCatalog {
    PromptCatalog::from_reader(PROMPTS_CSV.as_bytes()).expect("fixture catalog parses")
}

pub fn build_app(catalog: PromptCatalog, model: Arc<StubModel>, prompts_csv: PathBuf, strict: bool) -> Router {
    let state = Arc::new(AppState {
        catalog: Arc::new(catalog),
        generator: MockupGenerator::new(model),
        prompt_constructor: PromptConstructor::try_on(),
        prompts_csv,
        strict_status: strict,
    });
    create_app(state, 1024 * 1024)
}

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 40, 200]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode png");
    out
}

pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File(name, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(multipart_body(parts)))
        .expect("valid request")
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    hyper::body::to_bytes(response.into_body()).await.expect("read body").to_vec()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
