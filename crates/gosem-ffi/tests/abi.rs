//! Tests for the C entry points, called the way a C host would.

use gosem_ffi::{gosem_free_string, gosem_tokenize, GOSEM_FAILED, GOSEM_OK};
use serde_json::Value;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

struct Call {
    code: i64,
    json: Option<String>,
    error: Option<String>,
}

/// Take ownership of a returned string and free it.
fn take(ptr: *mut c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let s = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
    unsafe { gosem_free_string(ptr) };
    Some(s)
}

fn call(name: &str, source: &str) -> Call {
    let name = CString::new(name).unwrap();
    let source = CString::new(source).unwrap();
    let mut json: *mut c_char = ptr::null_mut();
    let mut error: *mut c_char = ptr::null_mut();
    let code = unsafe { gosem_tokenize(name.as_ptr(), source.as_ptr(), &mut json, &mut error) };
    Call {
        code,
        json: take(json),
        error: take(error),
    }
}

#[test]
fn success_sets_json_only() {
    let result = call("main.go", "package main\n\nfunc Add(a, b int) int { return a + b }\n");
    assert_eq!(result.code, GOSEM_OK);
    assert_eq!(result.json.as_deref(), Some(r#"{"FunctionDecl":[[3,6,3]]}"#));
    assert!(result.error.is_none());
}

#[test]
fn resolution_error_sets_both_outputs() {
    let result = call("main.go", "package main\n\nfunc main() { helper() }\n");
    assert_eq!(result.code, GOSEM_OK);
    let json: Value = serde_json::from_str(result.json.as_deref().unwrap()).unwrap();
    assert_eq!(json["FunctionDecl"][0], serde_json::json!([3, 6, 4]));
    let error = result.error.unwrap();
    assert!(error.contains("main.go:3:15: undefined: helper"), "{error}");
}

#[test]
fn syntax_error_leaves_json_untouched() {
    let name = CString::new("bad.go").unwrap();
    let source = CString::new("package main\n\nfunc {\n").unwrap();
    let sentinel = ptr::NonNull::<c_char>::dangling().as_ptr();
    let mut json = sentinel;
    let mut error: *mut c_char = ptr::null_mut();
    let code = unsafe { gosem_tokenize(name.as_ptr(), source.as_ptr(), &mut json, &mut error) };

    assert_eq!(code, GOSEM_FAILED);
    assert_eq!(json, sentinel);
    let error = take(error).unwrap();
    assert!(error.starts_with("Syntax error: bad.go:"), "{error}");
}

#[test]
fn null_arguments_fail() {
    let source = CString::new("package main\n").unwrap();
    let mut json: *mut c_char = ptr::null_mut();
    let mut error: *mut c_char = ptr::null_mut();
    let code = unsafe { gosem_tokenize(ptr::null(), source.as_ptr(), &mut json, &mut error) };

    assert_eq!(code, GOSEM_FAILED);
    assert!(json.is_null());
    assert_eq!(take(error).as_deref(), Some("Null pointer argument: file_name"));

    let code = unsafe {
        gosem_tokenize(source.as_ptr(), source.as_ptr(), ptr::null_mut(), ptr::null_mut())
    };
    assert_eq!(code, GOSEM_FAILED);
}

#[test]
fn invalid_utf8_is_rejected_with_its_position() {
    let name = CString::new("latin1.go").unwrap();
    let source = CString::new(b"package main\n\n// caf\xe9\nfunc Run() {}\n".to_vec()).unwrap();
    let mut json: *mut c_char = ptr::null_mut();
    let mut error: *mut c_char = ptr::null_mut();
    let code = unsafe { gosem_tokenize(name.as_ptr(), source.as_ptr(), &mut json, &mut error) };

    assert_eq!(code, GOSEM_FAILED);
    assert!(json.is_null());
    assert_eq!(
        take(error).as_deref(),
        Some("Syntax error: latin1.go:3:7: illegal UTF-8 encoding")
    );
}

#[test]
fn freeing_null_is_a_no_op() {
    unsafe { gosem_free_string(ptr::null_mut()) };
}
