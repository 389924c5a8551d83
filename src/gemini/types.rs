//! Typed view of the `generateContent` API.
//!
//! The wire structs mirror the JSON the API speaks; [`GenerateContentResponse`]
//! and friends are the tagged variants the rest of the crate works with. The
//! wire-to-domain decoding happens once, in [`decode_response`].
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image(InlineImage),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub probability: String,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub parts: Vec<Part>,
    pub finish_reason: Option<String>,
    pub safety_ratings: Vec<SafetyRating>,
}

impl Candidate {
    /// First inline image among the parts, in order.
    pub fn first_image(&self) -> Option<&InlineImage> {
        self.parts.iter().find_map(|p| match p {
            Part::Image(img) => Some(img),
            Part::Text(_) => None,
        })
    }

    /// All text parts joined, if any.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::Image(_) => None,
            })
            .collect();
        if texts.is_empty() { None } else { Some(texts.join("\n")) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

// -- Wire types --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
    prompt_feedback: Option<WirePromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireContent>,
    finish_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    text: Option<String>,
    #[serde(alias = "inline_data")]
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePromptFeedback {
    block_reason: Option<String>,
    #[serde(default)]
    safety_ratings: Vec<SafetyRating>,
}

/// Decode a raw `generateContent` JSON reply.
pub fn decode_response(raw: Value) -> AppResult<GenerateContentResponse> {
    let wire: WireResponse = serde_json::from_value(raw)
        .map_err(|e| AppError::Transport(format!("unexpected response shape: {}", e)))?;

    let mut candidates = Vec::with_capacity(wire.candidates.len());
    for c in wire.candidates {
        let mut parts = Vec::new();
        for p in c.content.map(|c| c.parts).unwrap_or_default() {
            if let Some(inline) = p.inline_data {
                let data = general_purpose::STANDARD
                    .decode(inline.data.as_bytes())
                    .map_err(|e| AppError::Transport(format!("invalid base64 in inline data: {}", e)))?;
                parts.push(Part::Image(InlineImage { mime_type: inline.mime_type, data }));
            } else if let Some(text) = p.text {
                parts.push(Part::Text(text));
            }
        }
        candidates.push(Candidate {
            parts,
            finish_reason: c.finish_reason,
            safety_ratings: c.safety_ratings,
        });
    }

    Ok(GenerateContentResponse {
        candidates,
        prompt_feedback: wire.prompt_feedback.map(|f| PromptFeedback {
            block_reason: f.block_reason,
            safety_ratings: f.safety_ratings,
        }),
    })
}

/// Build the request body for an ordered list of parts.
pub fn build_request_body(parts: &[Part]) -> Value {
    let parts: Vec<Value> = parts
        .iter()
        .map(|p| match p {
            Part::Text(t) => json!({ "text": t }),
            Part::Image(img) => json!({
                "inlineData": WireInlineData {
                    mime_type: img.mime_type.clone(),
                    data: general_purpose::STANDARD.encode(&img.data),
                }
            }),
        })
        .collect();
    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_text_and_image_parts_in_order() {
        let raw = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your mockup" },
                    { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                ]},
                "finishReason": "STOP",
                "safetyRatings": [{ "category": "HARM_CATEGORY_HARASSMENT", "probability": "NEGLIGIBLE" }]
            }]
        });
        let resp = decode_response(raw).unwrap();
        let c = &resp.candidates[0];
        assert_eq!(c.parts[0], Part::Text("Here is your mockup".into()));
        let img = c.first_image().unwrap();
        assert_eq!(img.mime_type, "image/png");
        assert_eq!(img.data, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        assert_eq!(c.finish_reason.as_deref(), Some("STOP"));
        assert_eq!(c.safety_ratings[0].probability, "NEGLIGIBLE");
        assert!(resp.prompt_feedback.is_none());
    }

    #[test]
    fn blocked_prompt_has_feedback_and_no_candidates() {
        let raw = json!({
            "promptFeedback": {
                "blockReason": "SAFETY",
                "safetyRatings": [{ "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "probability": "HIGH", "blocked": true }]
            }
        });
        let resp = decode_response(raw).unwrap();
        assert!(resp.candidates.is_empty());
        let fb = resp.prompt_feedback.unwrap();
        assert_eq!(fb.block_reason.as_deref(), Some("SAFETY"));
        assert!(fb.safety_ratings[0].blocked);
    }

    #[test]
    fn candidate_without_content_decodes_to_no_parts() {
        let raw = json!({ "candidates": [{ "finishReason": "IMAGE_SAFETY" }] });
        let resp = decode_response(raw).unwrap();
        assert!(resp.candidates[0].parts.is_empty());
        assert!(resp.candidates[0].text().is_none());
    }

    #[test]
    fn unknown_parts_are_skipped() {
        let raw = json!({ "candidates": [{ "content": { "parts": [
            { "functionCall": { "name": "x" } },
            { "text": "only text" }
        ]}}]});
        let resp = decode_response(raw).unwrap();
        assert_eq!(resp.candidates[0].parts, vec![Part::Text("only text".into())]);
    }

    #[test]
    fn bad_base64_is_transport() {
        let raw = json!({ "candidates": [{ "content": { "parts": [
            { "inlineData": { "mimeType": "image/png", "data": "%%%not base64%%%" } }
        ]}}]});
        assert!(matches!(decode_response(raw), Err(AppError::Transport(_))));
    }

    #[test]
    fn request_body_keeps_part_order() {
        let body = build_request_body(&[
            Part::Text("make it".into()),
            Part::Image(InlineImage { mime_type: "image/jpeg".into(), data: vec![1, 2, 3] }),
        ]);
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "make it");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
        assert_eq!(body["generationConfig"]["responseModalities"][1], "IMAGE");
    }
}
