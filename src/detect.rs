//! Input decoding.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
/// UTF-16 byte order marks (little and big endian)
const UTF16_LE_BOM: &[u8] = b"\xFF\xFE";
const UTF16_BE_BOM: &[u8] = b"\xFE\xFF";
/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Decode raw input bytes into text.
///
/// Accepts UTF-8 with or without a byte order mark. UTF-16 input, PDF
/// files, and invalid UTF-8 are rejected as [`Error::Encoding`]. NUL
/// characters pass through; the segmenter drops them.
///
/// # Example
/// ```
/// use pagemark::detect::decode_input;
///
/// assert_eq!(decode_input(b"\xEF\xBB\xBF# Title").unwrap(), "# Title");
/// assert!(decode_input(b"\xFF\xFEh\x00").is_err());
/// ```
pub fn decode_input(data: &[u8]) -> Result<String> {
    if data.starts_with(UTF16_LE_BOM) || data.starts_with(UTF16_BE_BOM) {
        return Err(Error::Encoding("UTF-16 input is not supported".into()));
    }
    if is_pdf_bytes(data) {
        return Err(Error::Encoding("input is already a PDF document".into()));
    }

    let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    std::str::from_utf8(body)
        .map(str::to_owned)
        .map_err(|e| Error::Encoding(format!("invalid UTF-8: {}", e)))
}

/// Read and decode an input file.
pub fn read_input<P: AsRef<Path>>(path: P) -> Result<String> {
    let data = fs::read(path.as_ref())?;
    decode_input(&data)
}

/// Check if bytes start with the PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}
