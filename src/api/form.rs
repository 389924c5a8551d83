//! Multipart form collection.
use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;

use crate::error::{AppError, AppResult};

/// All named fields of a multipart body, read fully into memory. When a name
/// repeats, the first occurrence is kept.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, Bytes>,
}

impl UploadForm {
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidForm(e.to_string()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let data = field.bytes().await.map_err(|e| AppError::InvalidForm(e.to_string()))?;
            fields.entry(name).or_insert(data);
        }
        Ok(UploadForm { fields })
    }

    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Bytes>,
    {
        UploadForm { fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn text(&self, name: &str) -> AppResult<String> {
        let raw = self.fields.get(name).ok_or_else(|| missing(name))?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| AppError::InvalidForm(format!("Form field '{}' is not valid UTF-8", name)))
    }

    pub fn file(&self, name: &str) -> AppResult<&Bytes> {
        self.fields.get(name).ok_or_else(|| missing(name))
    }

    /// Like [`UploadForm::file`], trying each name in turn. The error names the
    /// first one.
    pub fn file_any(&self, names: &[&str]) -> AppResult<&Bytes> {
        names
            .iter()
            .find_map(|n| self.fields.get(*n))
            .ok_or_else(|| missing(names.first().copied().unwrap_or_default()))
    }
}

fn missing(name: &str) -> AppError {
    AppError::InvalidForm(format!("Missing form field '{}'", name))
}
