//! Incoming request description and path normalization.

use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage; names are shared `Arc<str>`
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// How the process was invoked. Selects the controller namespace and whether
/// global middleware runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvocationMode {
    #[default]
    Http,
    Cli,
}

impl InvocationMode {
    /// Namespace segment controllers live under for this mode
    #[must_use]
    pub fn namespace_segment(self) -> &'static str {
        match self {
            InvocationMode::Http => "Controllers",
            InvocationMode::Cli => "Commands",
        }
    }
}

/// A request ready for resolution: mode, method and a normalized path.
#[derive(Debug, Clone)]
pub struct Request {
    pub mode: InvocationMode,
    pub method: String,
    pub path: String,
    pub headers: HeaderVec,
}

impl Request {
    /// Build from an HTTP request line target such as `/users/7?tab=posts`.
    #[must_use]
    pub fn http(method: &str, request_uri: &str) -> Self {
        Self {
            mode: InvocationMode::Http,
            method: method.to_string(),
            path: http_path(request_uri),
            headers: HeaderVec::new(),
        }
    }

    /// Build from the first positional command-line argument.
    ///
    /// Command invocations always use `GET`.
    #[must_use]
    pub fn cli(first_positional: Option<&str>) -> Self {
        Self {
            mode: InvocationMode::Cli,
            method: "GET".to_string(),
            path: normalize_path(first_positional.unwrap_or("/")),
            headers: HeaderVec::new(),
        }
    }

    /// Add a header (builder style)
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((Arc::from(name), value.into()));
        self
    }

    /// Get a header by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Leading slash enforced, trailing slashes removed: `users/7/` -> `/users/7`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push('/');
    out.push_str(trimmed);
    out
}

/// Extract and normalize the path component of an HTTP request target.
#[must_use]
pub fn http_path(request_uri: &str) -> String {
    let end = request_uri.find(&['?', '#'][..]).unwrap_or(request_uri.len());
    let path = &request_uri[..end];
    if path.is_empty() {
        return "/".to_string();
    }
    normalize_path(&filter_path(path))
}

/// Percent-encode characters outside the RFC 3986 path set.
///
/// Existing `%XX` escapes are kept as-is; a `%` not followed by two hex
/// digits is encoded as `%25`.
#[must_use]
pub fn filter_path(path: &str) -> Cow<'_, str> {
    let bytes = path.as_bytes();
    let needs_encoding = path
        .char_indices()
        .any(|(idx, ch)| !is_path_char(ch) || (ch == '%' && !is_escape(bytes, idx)));
    if !needs_encoding {
        return Cow::Borrowed(path);
    }

    let mut out = String::with_capacity(path.len() + 8);
    let mut pending = String::new();
    for (idx, ch) in path.char_indices() {
        if is_path_char(ch) && !(ch == '%' && !is_escape(bytes, idx)) {
            if !pending.is_empty() {
                out.push_str(&urlencoding::encode(&pending));
                pending.clear();
            }
            out.push(ch);
        } else {
            pending.push(ch);
        }
    }
    if !pending.is_empty() {
        out.push_str(&urlencoding::encode(&pending));
    }
    Cow::Owned(out)
}

fn is_path_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            '_' | '-' | '.' | '~' | ':' | '@' | '&' | '=' | '+' | '$' | ',' | '/' | ';' | '%'
        )
}

fn is_escape(bytes: &[u8], idx: usize) -> bool {
    bytes.len() > idx + 2 && bytes[idx + 1].is_ascii_hexdigit() && bytes[idx + 2].is_ascii_hexdigit()
}
