//! Names derived from a request's Rust type path, used to tag log events.

use std::any::type_name;

/// Path segment used as the module name when none is configured.
pub const DEFAULT_MODULE_SEGMENT: usize = 2;

/// Short name of the request type: the last path segment, generics stripped.
#[must_use]
pub fn request_name<R>() -> &'static str {
    short_name(type_name::<R>())
}

/// Module name of the request type: segment `segment` of its `::`-separated
/// path, e.g. `orders` for `recruitly_api::modules::orders::GetOrder` at 2.
///
/// Falls back to the innermost namespace segment when the path is shorter,
/// and to the request name for types without a namespace.
#[must_use]
pub fn module_name<R>(segment: usize) -> &'static str {
    module_of(type_name::<R>(), segment)
}

fn strip_generics(path: &str) -> &str {
    path.split('<').next().unwrap_or(path)
}

fn short_name(path: &str) -> &str {
    let path = strip_generics(path);
    path.rsplit("::").next().unwrap_or(path)
}

fn module_of(path: &str, segment: usize) -> &str {
    let path = strip_generics(path);
    let segments: Vec<&str> = path.split("::").collect();
    let namespace_len = segments.len().saturating_sub(1);

    if segment < namespace_len {
        segments[segment]
    } else if namespace_len > 0 {
        segments[namespace_len - 1]
    } else {
        path
    }
}
