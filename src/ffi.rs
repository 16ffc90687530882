//! C-ABI FFI bindings for cross-language integration.
//!
//! This module provides a C-compatible API for using pagemark from other
//! languages such as C#, Python, and Node.js.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::emit::{EmitOptions, EmitterRegistry, JsonFormat, OutputFormat};
use crate::render::{RenderConfig, RenderOptions};
use crate::render_file;

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct PagemarkResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `pagemark_free_result`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `pagemark_free_result`.
    pub error: *mut c_char,
}

impl PagemarkResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }
}

/// Read a required UTF-8 string argument.
unsafe fn required_str<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} cannot be null", what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 {}", what))
}

/// Read an optional UTF-8 string argument.
unsafe fn optional_str<'a>(ptr: *const c_char, what: &str) -> Result<Option<&'a str>, String> {
    if ptr.is_null() {
        return Ok(None);
    }
    required_str(ptr, what).map(Some)
}

fn render_options(config: Option<&str>) -> crate::Result<RenderOptions> {
    let options = RenderOptions::default();
    Ok(match config {
        Some(path) => options.with_config(RenderConfig::from_file(path)?),
        None => options,
    })
}

/// Render a text file to PDF.
///
/// `config` may be null or the path of a JSON layout configuration. On
/// success `data` holds the path actually written, which differs from
/// `output` when the commit fell back to a timestamped name.
///
/// # Safety
///
/// `input` and `output` must be valid null-terminated UTF-8 strings; `config`
/// must be null or one. The returned result must be freed with
/// `pagemark_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pagemark_render_pdf(
    input: *const c_char,
    output: *const c_char,
    config: *const c_char,
) -> PagemarkResult {
    let args = required_str(input, "input path").and_then(|input| {
        let output = required_str(output, "output path")?;
        let config = optional_str(config, "config path")?;
        Ok((input, output, config))
    });
    let (input, output, config) = match args {
        Ok(args) => args,
        Err(message) => return PagemarkResult::error(message),
    };

    match render_pdf_internal(Path::new(input), Path::new(output), config) {
        Ok(written) => PagemarkResult::success(written),
        Err(e) => PagemarkResult::error(e.to_string()),
    }
}

fn render_pdf_internal(input: &Path, output: &Path, config: Option<&str>) -> crate::Result<String> {
    let options = render_options(config)?;
    let doc = render_file(input, &options)?;
    let emitter = OutputFormat::Pdf.emitter();
    let bytes = emitter.emit(&doc, &EmitOptions::new().with_styles(options.styles))?;
    let written = crate::output::commit(output, &bytes)?;
    Ok(written.to_string_lossy().into_owned())
}

/// Render a text file to its paginated JSON form.
///
/// # Safety
///
/// The `input` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `pagemark_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pagemark_to_json(input: *const c_char, pretty: bool) -> PagemarkResult {
    let input = match required_str(input, "input path") {
        Ok(s) => s,
        Err(message) => return PagemarkResult::error(message),
    };

    let format = if pretty {
        JsonFormat::Pretty
    } else {
        JsonFormat::Compact
    };

    match to_json_internal(Path::new(input), format) {
        Ok(json) => PagemarkResult::success(json),
        Err(e) => PagemarkResult::error(e.to_string()),
    }
}

fn to_json_internal(input: &Path, format: JsonFormat) -> crate::Result<String> {
    let options = RenderOptions::default();
    let doc = render_file(input, &options)?;
    let bytes = EmitterRegistry::with_defaults().emit(
        &doc,
        "json",
        &EmitOptions::new().with_json_format(format),
    )?;
    String::from_utf8(bytes).map_err(|e| crate::Error::Render(e.to_string()))
}

/// Get the page count of a rendered text file with default options.
///
/// # Safety
///
/// The `input` must be a valid null-terminated UTF-8 string.
/// Returns -1 on error.
#[no_mangle]
pub unsafe extern "C" fn pagemark_page_count(input: *const c_char) -> i32 {
    let Ok(input) = required_str(input, "input path") else {
        return -1;
    };

    match render_file(input, &RenderOptions::default()) {
        Ok(doc) => doc.page_count() as i32,
        Err(_) => -1,
    }
}

/// Free a result returned by any pagemark function.
///
/// # Safety
///
/// The `result` must have been returned by a pagemark function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn pagemark_free_result(result: PagemarkResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Get the version of the pagemark library.
///
/// The returned string is statically allocated and must not be freed.
#[no_mangle]
pub extern "C" fn pagemark_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
