//! Path segment joining and placeholder normalization.
//!
//! Prefixes are joined when nodes are created and again when a tree is flattened,
//! so every function here is idempotent: joining an already joined path returns it
//! unchanged.

/// Path separator used for every joined path.
pub const SEPARATOR: char = '/';

/// Join path segments into a single normalized path.
///
/// Every segment is split on `/`, empty pieces are dropped and the remainder is
/// joined with a single separator. The result is either `""` or starts with `/`
/// and never ends with one.
///
/// ```rust
/// use routetree::path::join_paths;
///
/// assert_eq!(join_paths(["/a/", "//b", "", "c/"]), "/a/b/c");
/// assert_eq!(join_paths(["", "/"]), "");
/// ```
pub fn join_paths<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for segment in segments {
        for piece in segment.as_ref().split(SEPARATOR).filter(|p| !p.is_empty()) {
            joined.push(SEPARATOR);
            joined.push_str(piece);
        }
    }
    joined
}

/// Rewrite colon-style placeholders (`/users/:id`) to brace style (`/users/{id}`).
///
/// Only whole segments starting with `:` are rewritten; brace placeholders and
/// literal colons elsewhere in a segment are left alone.
#[must_use]
pub fn normalize_params(path: &str) -> String {
    path.split(SEPARATOR)
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) if !name.is_empty() => format!("{{{name}}}"),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Join `segments` and normalize placeholders, producing a dispatcher-ready path.
///
/// An empty join yields `/` so every emitted route has an absolute path.
pub fn route_path<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = join_paths(segments);
    if joined.is_empty() {
        return SEPARATOR.to_string();
    }
    normalize_params(&joined)
}

/// Names of the `{param}` placeholders in `path`, in order.
#[must_use]
pub fn param_names(path: &str) -> Vec<&str> {
    path.split(SEPARATOR)
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_collapses_separators() {
        assert_eq!(join_paths(["/a/", "//b", "", "c/"]), "/a/b/c");
        assert_eq!(join_paths(["a//b///c"]), "/a/b/c");
    }

    #[test]
    fn test_join_empty_inputs() {
        assert_eq!(join_paths(Vec::<&str>::new()), "");
        assert_eq!(join_paths(["", "/", "//"]), "");
    }

    #[test]
    fn test_join_is_idempotent() {
        let once = join_paths(["/api/", "v1", "/users/"]);
        assert_eq!(join_paths([once.as_str()]), once);
    }

    #[test]
    fn test_normalize_colon_params() {
        assert_eq!(normalize_params("/users/:id/posts/:post_id"), "/users/{id}/posts/{post_id}");
        assert_eq!(normalize_params("/users/{id}"), "/users/{id}");
        assert_eq!(normalize_params("/time/12:30"), "/time/12:30");
    }

    #[test]
    fn test_route_path_never_empty() {
        assert_eq!(route_path(["", ""]), "/");
        assert_eq!(route_path(["/admin", ":id"]), "/admin/{id}");
    }

    #[test]
    fn test_param_names() {
        assert_eq!(param_names("/a/{b}/c/{d}"), vec!["b", "d"]);
        assert!(param_names("/").is_empty());
    }
}
