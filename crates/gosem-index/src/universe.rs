//! Go's universe scope: predeclared types, constants, `nil`, and builtins.

use crate::resolver::{Declaration, ObjectKind};

const BASIC_TYPES: &[&str] = &[
    "bool",
    "byte",
    "complex64",
    "complex128",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Predeclared types that are not basic: `error` is a named interface,
/// `any` aliases `interface{}`, `comparable` is a constraint interface.
const NON_BASIC_TYPES: &[&str] = &["error", "any", "comparable"];

const CONSTANTS: &[&str] = &["true", "false", "iota"];

const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Whether `name` is a predeclared basic type.
pub fn is_basic_type(name: &str) -> bool {
    BASIC_TYPES.contains(&name)
}

/// Look up a name in the universe scope.
pub fn lookup(name: &str) -> Option<Declaration> {
    let (kind, basic) = if is_basic_type(name) {
        (ObjectKind::TypeName, true)
    } else if NON_BASIC_TYPES.contains(&name) {
        (ObjectKind::TypeName, false)
    } else if CONSTANTS.contains(&name) {
        (ObjectKind::Const, true)
    } else if name == "nil" {
        (ObjectKind::Nil, false)
    } else if BUILTINS.contains(&name) {
        (ObjectKind::Builtin, false)
    } else {
        return None;
    };
    Some(Declaration {
        name: name.to_string(),
        kind,
        basic,
    })
}
