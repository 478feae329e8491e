//! Signature sniffing for uploaded license images.
//!
//! Payloads are base64, optionally wrapped in a data URL. The format
//! check runs on the encoded text: a PNG's signature always encodes to
//! a string starting with `iVBORw`, a BMP's to one starting with `Qk`,
//! so no decode is needed to accept or reject.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const PNG_BASE64_PREFIX: &str = "iVBORw";
const BMP_BASE64_PREFIX: &str = "Qk";
const MAX_BASE64_PADDING: usize = 2;

/// Accepts PNG and BMP payloads only. Anything that is not well-formed
/// base64, or whose signature encodes a different format, is rejected.
pub fn is_recognized_image_format(base64_image: &str) -> bool {
    if base64_image.is_empty() {
        return false;
    }
    let payload = strip_data_url_prefix(base64_image);
    if !is_well_formed_base64(payload) {
        return false;
    }
    payload.starts_with(PNG_BASE64_PREFIX) || payload.starts_with(BMP_BASE64_PREFIX)
}

/// Raw bytes of the payload, after any data-URL prefix is discarded.
pub fn decode_image(base64_image: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(strip_data_url_prefix(base64_image))
}

fn strip_data_url_prefix(payload: &str) -> &str {
    if payload.contains(',') {
        payload.split(',').nth(1).unwrap_or("")
    } else {
        payload
    }
}

/// Standard alphabet, length a multiple of four, padding only at the
/// end and at most two characters of it.
fn is_well_formed_base64(payload: &str) -> bool {
    if payload.len() % 4 != 0 {
        return false;
    }
    let trimmed = payload.trim_end_matches('=');
    payload.len() - trimmed.len() <= MAX_BASE64_PADDING
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')
}
