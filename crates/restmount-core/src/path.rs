//! Path templates.
//!
//! Paths are written in an abstract template language where a `{identifier}`
//! token marks a parameter. An identifier is one or more ASCII letters,
//! digits or underscores. The document always shows this form; the external
//! server's own syntax is only produced by [`translate`] at binding time.
//!
//! ```rust
//! use restmount_core::path::{join, translate};
//!
//! let full = join(["/users", "{id}"]);
//! assert_eq!(full, "/users/{id}");
//! assert_eq!(translate(&full, |name| format!(":{name}")), "/users/:id");
//! ```

/// A `{identifier}` token located inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamToken<'a> {
    /// The identifier between the braces.
    pub name: &'a str,
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte offset just past the closing brace.
    pub end: usize,
}

const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Finds the first `{identifier}` token in `s`.
///
/// Single left-to-right scan; a brace that does not open a valid token is
/// skipped and scanning resumes right after it.
#[must_use]
pub fn find_param(s: &str) -> Option<ParamToken<'_>> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' {
            let mut j = i + 1;
            while j < bytes.len() && is_ident_byte(bytes[j]) {
                j += 1;
            }
            if j > i + 1 && j < bytes.len() && bytes[j] == b'}' {
                return Some(ParamToken {
                    name: &s[i + 1..j],
                    start: i,
                    end: j + 1,
                });
            }
        }
        i += 1;
    }
    None
}

/// Returns true if `s` contains a `{identifier}` token.
#[must_use]
pub fn is_param(s: &str) -> bool {
    find_param(s).is_some()
}

/// Iterates the parameter names of a path, at most one per segment.
pub fn param_names(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter_map(|segment| find_param(segment).map(|t| t.name))
}

/// Joins path elements with `/` and normalizes the result.
///
/// Empty elements and `.` are dropped, `..` removes the previous element,
/// and the result always starts with `/`. Joining nothing yields `/`.
#[must_use]
pub fn join<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut segments: Vec<&str> = Vec::new();
    for part in parts {
        for segment in part.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
    }
    format!("/{}", segments.join("/"))
}

/// Rewrites every `{identifier}` segment token using `convert`.
///
/// Text around the token inside the segment is kept, so `v{n}.json`
/// becomes `v:n.json` with a `:name` converter.
pub fn translate<F>(path: &str, mut convert: F) -> String
where
    F: FnMut(&str) -> String,
{
    path.split('/')
        .map(|segment| match find_param(segment) {
            Some(token) => format!(
                "{}{}{}",
                &segment[..token.start],
                convert(token.name),
                &segment[token.end..]
            ),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
