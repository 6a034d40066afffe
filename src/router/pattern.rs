//! Route pattern parsing.
//!
//! A pattern is made of literal text, placeholders and optional tails:
//!
//! - `{name}` matches one path segment (`[^/]+`)
//! - `{name:regex}` matches `regex`, which may span segments (`{paths:.+}`)
//! - `[...]` marks a tail that may be omitted entirely; tails may nest but only
//!   at the end of the pattern
//!
//! `/[{module}[/{controller}]]` therefore expands into the three concrete
//! variants `/`, `/{module}` and `/{module}/{controller}`.

use super::error::RouteDefinitionError;

/// Regex used for placeholders that do not declare their own.
pub const DEFAULT_PLACEHOLDER_REGEX: &str = "[^/]+";

/// One piece of a concrete (bracket-free) route variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched verbatim (slashes included)
    Static(String),
    /// Named placeholder with the regex it must match
    Variable { name: String, regex: String },
}

/// Expand `pattern` into its concrete variants, shortest first.
///
/// # Errors
///
/// Returns a [`RouteDefinitionError`] for an empty pattern, unbalanced or
/// misplaced brackets, empty optional parts and malformed placeholders.
pub fn parse(pattern: &str) -> Result<Vec<Vec<Segment>>, RouteDefinitionError> {
    if pattern.is_empty() {
        return Err(RouteDefinitionError::EmptyPattern);
    }
    let without_closing = pattern.trim_end_matches(']');
    let num_optionals = pattern.len() - without_closing.len();

    let parts = split_optionals(without_closing);
    if num_optionals != parts.len() - 1 {
        if contains_outside_braces(without_closing, ']') {
            return Err(RouteDefinitionError::OptionalNotAtEnd(pattern.to_string()));
        }
        return Err(RouteDefinitionError::UnbalancedBrackets(
            pattern.to_string(),
        ));
    }

    let mut current = String::with_capacity(without_closing.len());
    let mut variants = Vec::with_capacity(parts.len());
    for (n, part) in parts.iter().enumerate() {
        if part.is_empty() && n != 0 {
            return Err(RouteDefinitionError::EmptyOptional(pattern.to_string()));
        }
        current.push_str(part);
        variants.push(parse_placeholders(&current, pattern)?);
    }

    Ok(variants)
}

/// Whether a variant contains no placeholders
#[must_use]
pub fn is_static(variant: &[Segment]) -> bool {
    variant.iter().all(|s| matches!(s, Segment::Static(_)))
}

/// Render a variant back to its textual form, e.g. `/users/{id:\d+}`
#[must_use]
pub fn render(variant: &[Segment]) -> String {
    let mut out = String::new();
    for segment in variant {
        match segment {
            Segment::Static(text) => out.push_str(text),
            Segment::Variable { name, regex } if regex == DEFAULT_PLACEHOLDER_REGEX => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
            Segment::Variable { name, regex } => {
                out.push('{');
                out.push_str(name);
                out.push(':');
                out.push_str(regex);
                out.push('}');
            }
        }
    }
    out
}

// Split on '[' that are not inside a placeholder.
fn split_optionals(route: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in route.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '[' if depth == 0 => {
                parts.push(&route[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&route[start..]);
    parts
}

fn contains_outside_braces(route: &str, needle: char) -> bool {
    let mut depth = 0usize;
    for ch in route.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            c if c == needle && depth == 0 => return true,
            _ => {}
        }
    }
    false
}

fn parse_placeholders(route: &str, original: &str) -> Result<Vec<Segment>, RouteDefinitionError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = route.char_indices();

    while let Some((idx, ch)) = chars.next() {
        if ch != '{' {
            literal.push(ch);
            continue;
        }

        // Find the matching close brace; regexes may contain one nested level.
        let mut depth = 1usize;
        let mut end = None;
        for (j, c) in chars.by_ref() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(end) = end else {
            return Err(RouteDefinitionError::InvalidPlaceholder {
                route: original.to_string(),
                placeholder: route[idx..].to_string(),
            });
        };

        let body = &route[idx + 1..end];
        let (name, regex) = match body.split_once(':') {
            Some((name, regex)) => (name.trim(), regex.trim()),
            None => (body.trim(), DEFAULT_PLACEHOLDER_REGEX),
        };
        if !is_valid_name(name) || regex.is_empty() {
            return Err(RouteDefinitionError::InvalidPlaceholder {
                route: original.to_string(),
                placeholder: route[idx..=end].to_string(),
            });
        }

        if !literal.is_empty() {
            segments.push(Segment::Static(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Variable {
            name: name.to_string(),
            regex: regex.to_string(),
        });
    }

    if !literal.is_empty() {
        segments.push(Segment::Static(literal));
    }
    Ok(segments)
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
