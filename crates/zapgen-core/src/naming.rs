//! Naming convention utilities for Go code generation.
//!
//! Generated code must refer to the identifiers protoc-gen-go produces for
//! the same schema, so these functions follow its rules exactly.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `display_name` | [`go_camel_case`] | `DisplayName` |
//! | `["Outer", "inner"]` | [`go_type_name`] | `OuterInner` |
//! | `["Outer", "Inner"]` | [`go_type_name`] | `Outer_Inner` |
//! | `string` field | [`go_field_names`] | `String_` |
//! | `example.com/foo;foopb` | [`go_package_name`] | `foopb` |

use crate::schema::Field;
use std::collections::{HashMap, HashSet};

/// Method names protoc-gen-go generates on every message.
const RESERVED_METHODS: &[&str] = &[
    "Reset",
    "String",
    "ProtoMessage",
    "Marshal",
    "Unmarshal",
    "ExtensionRangeArray",
    "ExtensionMap",
    "Descriptor",
];

/// Convert a proto identifier to a Go identifier.
///
/// - `_` followed by a lowercase letter is dropped and the letter upcased
/// - a leading `_` (or one right after `.`) becomes `X`
/// - `.` followed by a lowercase letter is dropped, any other `.` becomes `_`
/// - digits are kept as-is
///
/// # Examples
///
/// ```
/// use zapgen_core::naming::go_camel_case;
///
/// assert_eq!(go_camel_case("display_name"), "DisplayName");
/// assert_eq!(go_camel_case("_private"), "XPrivate");
/// assert_eq!(go_camel_case("field_1"), "Field_1");
/// ```
pub fn go_camel_case(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let next_is_lower = bytes.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());

        if c == b'.' && next_is_lower {
            // skip
        } else if c == b'.' {
            out.push('_');
        } else if c == b'_' && (i == 0 || bytes[i - 1] == b'.') {
            out.push('X');
        } else if c == b'_' && next_is_lower {
            // skip
        } else if c.is_ascii_digit() {
            out.push(c as char);
        } else {
            out.push(c.to_ascii_uppercase() as char);
            while bytes.get(i + 1).is_some_and(|n| n.is_ascii_lowercase()) {
                i += 1;
                out.push(bytes[i] as char);
            }
        }
        i += 1;
    }

    out
}

/// Go type name for a (possibly nested) message, from its name path
/// relative to the package.
///
/// The dotted path goes through [`go_camel_case`], so a nested name starting
/// with a lowercase letter is fused (`Outer.inner` -> `OuterInner`).
pub fn go_type_name<S: AsRef<str>>(path: &[S]) -> String {
    let dotted = path
        .iter()
        .map(|segment| segment.as_ref())
        .collect::<Vec<&str>>()
        .join(".");
    go_camel_case(&dotted)
}

/// Struct field names of one message, in field order.
///
/// Names clashing with generated methods, earlier fields or their getters get
/// a trailing `_` until unique. Every field takes part, weak ones included,
/// and each non-synthetic oneof claims its own name at its first member.
pub fn go_field_names(fields: &[Field]) -> Vec<String> {
    let mut names = MessageNames::new();
    let mut oneofs = HashSet::new();

    fields
        .iter()
        .map(|field| {
            let name = names.make_unique(go_camel_case(&field.name), true);
            if let Some(oneof) = &field.oneof
                && oneofs.insert(oneof.as_str())
            {
                names.make_unique(go_camel_case(oneof), false);
            }
            name
        })
        .collect()
}

/// Identifiers already taken on one generated Go struct.
struct MessageNames {
    used: HashMap<String, bool>,
}

impl MessageNames {
    fn new() -> Self {
        Self {
            used: RESERVED_METHODS
                .iter()
                .map(|name| (name.to_string(), true))
                .collect(),
        }
    }

    fn is_used(&self, name: &str) -> bool {
        self.used.get(name).copied().unwrap_or(false)
    }

    fn make_unique(&mut self, mut name: String, has_getter: bool) -> String {
        while self.is_used(&name) || (has_getter && self.is_used(&format!("Get{name}"))) {
            name.push('_');
        }
        self.used.insert(name.clone(), true);
        self.used.insert(format!("Get{name}"), has_getter);
        name
    }
}

/// Go package name for a generated file.
///
/// Prefers the explicit `;name` suffix of `go_package`, then the last element
/// of its import path, then the last component of the proto package, and
/// finally the proto file's base name.
pub fn go_package_name(go_package: Option<&str>, proto_package: &str, file_name: &str) -> String {
    if let Some(go_package) = go_package.filter(|p| !p.is_empty()) {
        if let Some((_, name)) = go_package.split_once(';') {
            return sanitize_identifier(name);
        }
        if let Some(last) = go_package.rsplit('/').next() {
            return sanitize_identifier(last);
        }
    }

    if let Some(last) = proto_package.rsplit('.').next().filter(|p| !p.is_empty()) {
        return sanitize_identifier(last);
    }

    sanitize_identifier(&proto_base_name(file_name))
}

/// Go import path from a `go_package` option, without the `;name` suffix.
pub fn go_import_path(go_package: &str) -> &str {
    go_package
        .split_once(';')
        .map_or(go_package, |(path, _)| path)
}

/// Proto path without its `.proto` extension.
pub fn strip_proto_extension(file_name: &str) -> &str {
    file_name.strip_suffix(".proto").unwrap_or(file_name)
}

/// Last path element of a proto file, without extension.
pub fn proto_base_name(file_name: &str) -> String {
    let stem = strip_proto_extension(file_name);
    stem.rsplit('/').next().unwrap_or(stem).to_string()
}

/// Replace characters that cannot appear in a Go identifier with `_`.
fn sanitize_identifier(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}
