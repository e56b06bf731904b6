// utils/image_utils.rs
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const MAX_IMAGE_SIZE_MB: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Decode a base64 image, with or without a `data:image/...;base64,` prefix.
pub fn decode_image(base64_data: &str, file_name: &str) -> Result<DecodedImage, String> {
    let (content_type, clean_data) = match base64_data.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| "Malformed data URL".to_string())?;
            let mime = meta.split(';').next().unwrap_or_default();
            (mime.to_string(), payload)
        }
        None => (content_type_for(file_name).to_string(), base64_data),
    };

    if !content_type.starts_with("image/") {
        return Err(format!("Unsupported content type '{}'", content_type));
    }

    if !validate_image_size(clean_data, MAX_IMAGE_SIZE_MB) {
        return Err(format!("Image exceeds {} MB", MAX_IMAGE_SIZE_MB));
    }

    let bytes = STANDARD
        .decode(clean_data.trim())
        .map_err(|e| format!("Failed to decode base64: {}", e))?;

    Ok(DecodedImage {
        bytes,
        content_type,
    })
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "image/jpeg",
    }
}

/// Object name for an upload: `{unix_millis}-{name}` with whitespace
/// replaced by dashes.
pub fn storage_file_name(original: &str, unix_millis: i64) -> String {
    let name: String = original
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| *c != '/' && *c != '\\')
        .collect();
    format!("{}-{}", unix_millis, name)
}

pub fn validate_image_size(base64_data: &str, max_size_mb: usize) -> bool {
    let size_in_bytes = (base64_data.len() * 3) / 4; // Approximate base64 size
    let max_size_bytes = max_size_mb * 1024 * 1024;

    size_in_bytes <= max_size_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_data_url() {
        let image = decode_image("data:image/png;base64,aGVsbG8=", "ignored.jpg").unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.content_type, "image/png");
    }

    #[test]
    fn bare_base64_uses_file_extension() {
        let image = decode_image("aGVsbG8=", "front view.WEBP").unwrap();
        assert_eq!(image.content_type, "image/webp");
    }

    #[test]
    fn rejects_non_images_and_garbage() {
        assert!(decode_image("data:text/plain;base64,aGVsbG8=", "a.txt").is_err());
        assert!(decode_image("data:image/png;base64", "a.png").is_err());
        assert!(decode_image("%%%not-base64%%%", "a.jpg").is_err());
    }

    #[test]
    fn file_names_lose_whitespace() {
        assert_eq!(
            storage_file_name("front view of house.jpg", 1_700_000_000_000),
            "1700000000000-front-view-of-house.jpg"
        );
        assert_eq!(storage_file_name("../a.png", 1), "1-..a.png");
    }

    #[test]
    fn size_limit_is_approximate_bytes() {
        assert!(validate_image_size("aGVsbG8=", 1));
        assert!(!validate_image_size(&"A".repeat(2 * 1024 * 1024), 1));
    }
}
