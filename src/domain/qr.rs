//! QR rendering and `data:` URL handling.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

use crate::domain::errors::RegistryError;

pub const PNG_MIME: &str = "image/png";

/// Minimum edge length of the rendered QR image, in pixels.
const MIN_DIMENSION: u32 = 256;

/// A decoded `data:<mime>;base64,<data>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    /// Subtype of the MIME type (`png` for `image/png`).
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Renders `payload` as a PNG QR code.
pub fn render_png(payload: &str) -> Result<Vec<u8>, RegistryError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| RegistryError::Encode(e.to_string()))?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RegistryError::Encode(e.to_string()))?;
    Ok(png)
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Parses a base64 data URL, matching `^data:.+/(.+);base64,(.*)$`.
///
/// Returns `None` for anything that does not match or whose data is not valid, non-empty
/// base64.
pub fn parse_data_url(input: &str) -> Option<DataUrl> {
    let rest = input.strip_prefix("data:")?;
    if rest.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
        return None;
    }

    // Greedy: the MIME part extends to the last `;base64,` marker.
    let marker = rest.rfind(";base64,")?;
    let mime = &rest[..marker];
    let data = &rest[marker + ";base64,".len()..];

    // Last `/` with at least one character on each side.
    let slash = mime
        .char_indices()
        .rev()
        .find(|&(i, c)| c == '/' && i >= 1 && i + 1 < mime.len())
        .map(|(i, _)| i)?;

    let bytes = STANDARD.decode(data).ok()?;
    if bytes.is_empty() {
        return None;
    }

    Some(DataUrl {
        mime: mime.to_string(),
        extension: mime[slash + 1..].to_string(),
        bytes,
    })
}
