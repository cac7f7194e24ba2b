use serde::Deserialize;
use utoipa::ToSchema;

use crate::media::{ImageFile, decode_base64};

/// An image sent inline as base64, with or without a `data:` prefix.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageUploadRequest {
    pub file_name: String,
    pub mime_type: String,
    pub content_base64: String,
}

impl ImageUploadRequest {
    pub fn into_image(self) -> Result<ImageFile, String> {
        let bytes = decode_base64(&self.content_base64)
            .map_err(|e| format!("Invalid base64 content: {e}"))?;
        Ok(ImageFile::new(self.file_name, self.mime_type, bytes))
    }
}
