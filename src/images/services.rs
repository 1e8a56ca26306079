use anyhow::Context;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::AppError;
use crate::meals::repo_types::MealId;
use crate::storage::StorageClient;

/// An uploaded photo as received from the client.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub body: Bytes,
    pub content_type: String,
}

impl ImageUpload {
    pub fn new(body: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            body,
            content_type: content_type.into(),
        }
    }

    /// Only non-empty `image/*` payloads are analysed.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.body.is_empty() {
            return Err(AppError::InvalidInput("image is empty".into()));
        }
        if !is_image_mime(&self.content_type) {
            return Err(AppError::InvalidInput(format!(
                "unsupported content type {:?}, expected image/*",
                self.content_type
            )));
        }
        Ok(())
    }
}

pub(crate) fn is_image_mime(ct: &str) -> bool {
    lazy_static! {
        static ref IMAGE_RE: Regex = Regex::new(r"^image/[A-Za-z0-9.+-]+$").unwrap();
    }
    IMAGE_RE.is_match(mime_essence(ct))
}

// "image/jpeg; foo=bar" -> "image/jpeg"
fn mime_essence(ct: &str) -> &str {
    ct.split(';').next().unwrap_or_default().trim()
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

pub fn image_key(meal_id: MealId, content_type: &str) -> String {
    let ext = ext_from_mime(mime_essence(content_type)).unwrap_or("bin");
    format!("meals/{}.{}", meal_id, ext)
}

/// Stores the photo for `meal_id` and returns its key.
pub async fn store_meal_image(
    storage: &dyn StorageClient,
    meal_id: MealId,
    image: &ImageUpload,
) -> anyhow::Result<String> {
    let key = image_key(meal_id, &image.content_type);
    storage
        .put_object(&key, image.body.clone(), &image.content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}
