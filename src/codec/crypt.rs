//! Save-file transform
//!
//! The on-disk blob wraps a section document three times:
//!
//! ```text
//! document ──gzip──► bytes ──base64 (url-safe)──► text ──xor key──► file
//! ```
//!
//! Reading undoes the layers in reverse. Trailing padding bytes after the
//! base64 text (NULs, newlines) are tolerated, as is missing base64 padding
//! and a gzip stream with a damaged trailer.

use std::io::{Read, Write};

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurposeConfig;
use base64::engine::{DecodePaddingMode, GeneralPurpose};
use base64::Engine;
use flate2::read::{DeflateDecoder, GzDecoder};
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{Result, SaveError};

/// Xor key used by the game for both save files
pub const XOR_KEY: u8 = 11;

/// Size of the fixed gzip member header (no optional fields)
const GZIP_HEADER_SIZE: usize = 10;

pub(crate) const SAVE_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Xor every byte with `key` in place
pub fn xor_in_place(data: &mut [u8], key: u8) {
    for byte in data.iter_mut() {
        *byte ^= key;
    }
}

/// Undo the save transform, returning the inner document bytes
pub fn decrypt_save(data: &[u8], key: u8) -> Result<Vec<u8>> {
    let mut text = data.to_vec();
    xor_in_place(&mut text, key);

    let end = text
        .iter()
        .rposition(|b| is_base64_byte(*b))
        .map(|i| i + 1)
        .unwrap_or(0);
    text.truncate(end);

    if text.is_empty() {
        return Err(SaveError::Crypt("save blob is empty".to_string()));
    }

    let compressed = SAVE_BASE64
        .decode(&text)
        .map_err(|e| SaveError::Crypt(format!("base64: {}", e)))?;

    inflate(&compressed)
}

/// Decode a save file that may or may not carry the transform
///
/// Plain XML documents (as written with encryption disabled) are returned
/// unchanged; anything else goes through [`decrypt_save`].
pub fn open_save(data: &[u8], key: u8) -> Result<Vec<u8>> {
    if is_plain_document(data) {
        return Ok(data.to_vec());
    }
    decrypt_save(data, key)
}

/// Whether `data` is an untransformed XML document
pub fn is_plain_document(data: &[u8]) -> bool {
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    data[start..].starts_with(b"<?xml") || data[start..].starts_with(b"<plist")
}

/// Apply the save transform to a document
pub fn encrypt_save(document: &[u8], key: u8, level: u32) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(document)?;
    let compressed = encoder.finish()?;

    let mut text = SAVE_BASE64.encode(compressed).into_bytes();
    xor_in_place(&mut text, key);
    Ok(text)
}

fn is_base64_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'=')
}

/// Gunzip, retrying as a bare deflate stream if the gzip trailer is bad
fn inflate(compressed: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let gzip_error = match GzDecoder::new(compressed).read_to_end(&mut out) {
        Ok(_) => return Ok(out),
        Err(e) => e,
    };

    if compressed.len() <= GZIP_HEADER_SIZE {
        return Err(SaveError::Crypt(format!("gzip: {}", gzip_error)));
    }

    tracing::debug!(error = %gzip_error, "gzip decode failed, retrying as raw deflate");
    out.clear();
    DeflateDecoder::new(&compressed[GZIP_HEADER_SIZE..])
        .read_to_end(&mut out)
        .map_err(|e| SaveError::Crypt(format!("gzip: {}; deflate: {}", gzip_error, e)))?;
    Ok(out)
}
