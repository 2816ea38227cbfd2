//! Inbound multipart form collection.
//!
//! Streams the fields of a multipart request into memory: parts with a
//! filename become `ImageUpload`s, the rest become text fields. Reading a
//! file part stops as soon as it exceeds the configured limit, so an
//! oversized upload is rejected without buffering the whole payload.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};

use records::{ImageUpload, Result, ServiceError};

/// All fields of one multipart request, keyed by field name.
#[derive(Debug, Default)]
pub struct RawForm {
    files: HashMap<String, ImageUpload>,
    texts: HashMap<String, String>,
}

impl RawForm {
    /// Take a required file field; absence is a validation error.
    pub fn take_file(&mut self, name: &str) -> Result<ImageUpload> {
        self.files
            .remove(name)
            .ok_or_else(|| ServiceError::validation(format!("{name} is required")))
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }
}

/// Drain a multipart payload into a `RawForm`.
///
/// # Errors
///
/// Returns `ServiceError::Validation` for malformed multipart input or a
/// file part exceeding `max_file_bytes`.
pub async fn collect_form(mut payload: Multipart, max_file_bytes: usize) -> Result<RawForm> {
    let mut form = RawForm::default();

    while let Some(next) = payload.next().await {
        let mut field = next
            .map_err(|err| ServiceError::validation(format!("malformed multipart form: {err}")))?;

        let (name, filename) = {
            let disposition = field.content_disposition();
            (
                disposition.get_name().unwrap_or_default().to_string(),
                disposition.get_filename().map(str::to_string),
            )
        };

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(|err| {
            ServiceError::validation(format!("failed to read multipart field {name}: {err}"))
        })? {
            data.extend_from_slice(&chunk);
            if filename.is_some() && data.len() > max_file_bytes {
                return Err(ServiceError::file_too_large(max_file_bytes));
            }
        }

        match filename {
            Some(filename) => {
                form.files.insert(name, ImageUpload::new(filename, data));
            }
            None => {
                form.texts
                    .insert(name, String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    Ok(form)
}
