//! gosem-ffi: C ABI for tokenizing Go source.
//!
//! ```c
//! char *json = NULL, *err = NULL;
//! if (gosem_tokenize("main.go", src, &json, &err) == 0) { ... }
//! gosem_free_string(json);
//! gosem_free_string(err);
//! ```
//!
//! The declarations live in `include/gosem.h`.

use gosem_core::GosemError;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

/// Return code for a produced table.
pub const GOSEM_OK: i64 = 0;
/// Return code when no table could be produced.
pub const GOSEM_FAILED: i64 = -1;

/// Errors raised at the C boundary.
#[derive(Debug, thiserror::Error)]
pub enum FfiError {
    #[error("Null pointer argument: {0}")]
    NullPointer(&'static str),

    #[error("Internal error: tokenizer panicked")]
    Panicked,

    #[error(transparent)]
    Tokenize(#[from] GosemError),
}

/// Successful tokenization as strings ready to cross the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub json: String,
    /// Non-fatal resolution error, if any.
    pub warning: Option<String>,
}

/// Tokenize and encode; the safe core of [`gosem_tokenize`].
///
/// `source` must be UTF-8; anything else is a syntax error.
pub fn tokenize_to_json(file_name: &str, source: &[u8]) -> Result<Tokenized, FfiError> {
    let source = gosem_index::decode_source(file_name, source)?;
    let output = gosem_index::tokenize(file_name, source)?;
    let json = output.table.to_json()?;
    Ok(Tokenized {
        json,
        warning: output.resolution_error().map(|e| e.to_string()),
    })
}

/// Borrow the bytes of a C string.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn read_c_bytes<'a>(ptr: *const c_char, what: &'static str) -> Result<&'a [u8], FfiError> {
    if ptr.is_null() {
        return Err(FfiError::NullPointer(what));
    }
    Ok(CStr::from_ptr(ptr).to_bytes())
}

/// Allocate a C copy of `s`. Interior NULs are replaced.
fn into_c_string(s: String) -> *mut c_char {
    let s = if s.contains('\0') {
        s.replace('\0', "\u{FFFD}")
    } else {
        s
    };
    CString::new(s).map_or(ptr::null_mut(), CString::into_raw)
}

/// Tokenize `source` under `file_name`.
///
/// Returns `0` with `*out_json` set to the category table, and `*out_error`
/// set only when names could not be resolved. Returns `-1` with only
/// `*out_error` set when an argument is null, the source is not UTF-8 or
/// does not parse, or encoding fails. Outputs that are not set are left
/// untouched. Every returned string must be released with
/// [`gosem_free_string`].
///
/// # Safety
/// `file_name` and `source` must be null or NUL-terminated strings.
/// `out_json` and `out_error` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn gosem_tokenize(
    file_name: *const c_char,
    source: *const c_char,
    out_json: *mut *mut c_char,
    out_error: *mut *mut c_char,
) -> i64 {
    let result = read_c_bytes(file_name, "file_name")
        .map(String::from_utf8_lossy)
        .and_then(|name| Ok((name, read_c_bytes(source, "source")?)))
        .and_then(|(name, source)| {
            if out_json.is_null() {
                return Err(FfiError::NullPointer("out_json"));
            }
            panic::catch_unwind(AssertUnwindSafe(|| tokenize_to_json(&name, source)))
                .unwrap_or(Err(FfiError::Panicked))
        });

    match result {
        Ok(tokenized) => {
            *out_json = into_c_string(tokenized.json);
            if let Some(warning) = tokenized.warning {
                if !out_error.is_null() {
                    *out_error = into_c_string(warning);
                }
            }
            GOSEM_OK
        }
        Err(err) => {
            tracing::debug!("gosem_tokenize failed: {err}");
            if !out_error.is_null() {
                *out_error = into_c_string(err.to_string());
            }
            GOSEM_FAILED
        }
    }
}

/// Release a string returned by [`gosem_tokenize`]. Null is ignored.
///
/// # Safety
/// `s` must be null or a pointer obtained from this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn gosem_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
