//! Image validation and base64 encoding for uploads embedded in GraphQL variables.

use std::path::Path;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

const MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageMimeType {
    #[serde(rename = "type")]
    pub mime: &'static str,
    pub extension: &'static str,
    pub max_size: u64,
}

const SUPPORTED_IMAGE_TYPES: &[(&str, ImageMimeType)] = &[
    (
        "image/jpeg",
        ImageMimeType { mime: "image/jpeg", extension: "jpg", max_size: 5 * MB },
    ),
    (
        "image/jpg",
        ImageMimeType { mime: "image/jpeg", extension: "jpg", max_size: 5 * MB },
    ),
    (
        "image/png",
        ImageMimeType { mime: "image/png", extension: "png", max_size: 10 * MB },
    ),
    (
        "image/webp",
        ImageMimeType { mime: "image/webp", extension: "webp", max_size: 3 * MB },
    ),
    (
        "image/gif",
        ImageMimeType { mime: "image/gif", extension: "gif", max_size: 2 * MB },
    ),
    (
        "image/svg+xml",
        ImageMimeType { mime: "image/svg+xml", extension: "svg", max_size: MB },
    ),
];

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "svg"];

pub fn lookup_mime(mime: &str) -> Option<&'static ImageMimeType> {
    let mime = mime.trim().to_ascii_lowercase();
    SUPPORTED_IMAGE_TYPES
        .iter()
        .find(|(key, _)| *key == mime)
        .map(|(_, info)| info)
}

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub async fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Text after the last dot, or the whole name when there is none.
    pub fn extension(&self) -> String {
        let ext = self.name.rsplit_once('.').map_or(self.name.as_str(), |(_, ext)| ext);
        ext.to_ascii_lowercase()
    }

    pub fn validate(&self) -> ImageValidation {
        validate_image(self)
    }

    /// Bare base64 content, as Odoo binary fields expect it.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageValidation {
    pub is_valid: bool,
    pub error: Option<String>,
    pub mime_type: Option<ImageMimeType>,
}

impl ImageValidation {
    fn ok(mime_type: ImageMimeType) -> Self {
        Self {
            is_valid: true,
            error: None,
            mime_type: Some(mime_type),
        }
    }

    fn rejected(error: String) -> Self {
        Self {
            is_valid: false,
            error: Some(error),
            mime_type: None,
        }
    }

    pub fn into_result(self) -> Result<ImageMimeType, String> {
        match (self.is_valid, self.mime_type, self.error) {
            (true, Some(mime), _) => Ok(mime),
            (_, _, Some(error)) => Err(error),
            _ => Err("Invalid image".to_string()),
        }
    }
}

/// Type, then size ceiling for that type, then file extension.
pub fn validate_image(file: &ImageFile) -> ImageValidation {
    if file.bytes.is_empty() {
        return ImageValidation::rejected("No file provided".to_string());
    }

    let Some(info) = lookup_mime(&file.mime_type) else {
        let supported: Vec<&str> = SUPPORTED_IMAGE_TYPES.iter().map(|(k, _)| *k).collect();
        return ImageValidation::rejected(format!(
            "Unsupported image format: {}. Supported formats: {}",
            file.mime_type,
            supported.join(", ")
        ));
    };

    if file.size() > info.max_size {
        return ImageValidation::rejected(format!(
            "File size {:.1}MB exceeds maximum allowed size of {:.1}MB for {}",
            file.size() as f64 / MB as f64,
            info.max_size as f64 / MB as f64,
            file.mime_type
        ));
    }

    let ext = file.extension();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return ImageValidation::rejected(format!("Invalid file extension: .{ext}"));
    }

    ImageValidation::ok(*info)
}

pub fn mime_from_data_url(value: &str) -> Option<&str> {
    let rest = value.strip_prefix("data:")?;
    let (mime, _) = rest.split_once(";base64,")?;
    let (kind, sub) = mime.split_once('/')?;
    if kind.is_empty() || sub.is_empty() {
        return None;
    }
    Some(mime)
}

pub fn strip_data_url_prefix(value: &str) -> &str {
    match value.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => value,
    }
}

pub fn decode_base64(value: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(strip_data_url_prefix(value).trim())
}

/// URLs and data URLs pass through; bare base64 is assumed to be JPEG.
pub fn image_source_url(source: &str) -> String {
    if source.starts_with("http") || source.starts_with("data:") {
        source.to_string()
    } else {
        format!("data:image/jpeg;base64,{source}")
    }
}

pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str, size: u64) -> ImageFile {
        ImageFile::new(name, mime, vec![0u8; size as usize])
    }

    #[test]
    fn oversized_jpeg_is_rejected_with_size_message() {
        let result = validate_image(&file("car.jpg", "image/jpeg", 6 * MB));
        assert!(!result.is_valid);
        let error = result.error.unwrap();
        assert!(error.contains("6.0MB"), "{error}");
        assert!(error.contains("5.0MB"), "{error}");
    }

    #[test]
    fn two_megabyte_png_is_accepted() {
        let result = validate_image(&file("logo.png", "image/png", 2 * MB));
        assert!(result.is_valid);
        assert_eq!(result.mime_type.unwrap().extension, "png");
    }

    #[test]
    fn unsupported_type_and_bad_extension_are_rejected() {
        let result = validate_image(&file("doc.pdf", "application/pdf", 10));
        assert!(result.error.unwrap().starts_with("Unsupported image format: application/pdf"));

        let result = validate_image(&file("logo.bmp", "image/png", 10));
        assert_eq!(result.error.as_deref(), Some("Invalid file extension: .bmp"));
    }

    #[test]
    fn name_without_dot_is_checked_as_an_extension() {
        let result = validate_image(&file("logo", "image/png", 10));
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Invalid file extension: .logo"));

        assert!(validate_image(&file("PNG", "image/png", 10)).is_valid);
    }

    #[test]
    fn svg_ceiling_is_one_megabyte() {
        assert!(!validate_image(&file("icon.svg", "image/svg+xml", MB + 1)).is_valid);
        assert!(validate_image(&file("icon.svg", "image/svg+xml", MB)).is_valid);
    }

    #[test]
    fn empty_content_is_rejected() {
        let result = validate_image(&file("a.png", "image/png", 0));
        assert_eq!(result.error.as_deref(), Some("No file provided"));
    }

    #[test]
    fn data_url_helpers() {
        let image = ImageFile::new("a.png", "image/png", b"abc".to_vec());
        let url = image.to_data_url();
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert_eq!(mime_from_data_url(&url), Some("image/png"));
        assert_eq!(strip_data_url_prefix(&url), "YWJj");
        assert_eq!(decode_base64(&url).unwrap(), b"abc");
        assert_eq!(image_source_url("YWJj"), "data:image/jpeg;base64,YWJj");
        assert_eq!(image_source_url("https://cdn/x.png"), "https://cdn/x.png");
    }

    #[test]
    fn file_sizes_are_human_readable() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * MB), "5 MB");
    }

    #[tokio::test]
    async fn load_guesses_mime_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge.png");
        tokio::fs::write(&path, b"png-bytes").await.unwrap();

        let image = ImageFile::load(&path).await.unwrap();
        assert_eq!(image.name, "badge.png");
        assert_eq!(image.mime_type, "image/png");
        assert!(image.validate().is_valid);
    }
}
