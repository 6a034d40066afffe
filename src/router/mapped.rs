//! Mapped-route convention.
//!
//! A route registered with the [`MAP_ROUTE_HANDLER`] sentinel does not name a
//! controller. Instead its placeholders are read positionally:
//! `/{module}/{controller}/{action}/{paths}` where `paths` is a tail of
//! alternating `key/value` tokens. Missing positions fall back to
//! [`DefaultRoute`].
//!
//! The composed controller name is built from raw path input and relies on a
//! trusted route table; it is not sanitised here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Pattern implementing the full convention.
pub const MAP_ROUTE: &str = "/[{module}[/{controller}[/{action}[/{paths:.+}]]]]";

/// Handler sentinel selecting the convention.
pub const MAP_ROUTE_HANDLER: &str = "default";

// ASCII word characters, like the lenient pair rule has always used.
static PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"([0-9A-Za-z_]+)/([^/]+)").expect("pair regex is valid")
});

/// Default module/controller/action used when the path omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultRoute {
    pub module: String,
    pub controller: String,
    pub action: String,
}

impl Default for DefaultRoute {
    fn default() -> Self {
        Self {
            module: "home".to_string(),
            controller: "index".to_string(),
            action: "index".to_string(),
        }
    }
}

/// Controller/action/args triple produced by a mapped-route parser.
///
/// `controller` is relative to the namespace (e.g. `Users\Edit`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedTarget {
    pub controller: String,
    pub action: String,
    pub args: HashMap<String, String>,
}

/// Turns the variables of a mapped route into a target.
pub type MappedRouteParser = Arc<dyn Fn(&HashMap<String, String>) -> MappedTarget + Send + Sync>;

/// Build the default parser around a set of defaults.
#[must_use]
pub fn parser(defaults: DefaultRoute) -> MappedRouteParser {
    Arc::new(move |vars| parse_mapped_route(&defaults, vars))
}

/// Apply the convention to the variables of a matched route.
///
/// `vars` win over `defaults`. The `paths` tail is read pairwise; a trailing
/// token without a value is dropped.
#[must_use]
pub fn parse_mapped_route(defaults: &DefaultRoute, vars: &HashMap<String, String>) -> MappedTarget {
    let pick = |key: &str, fallback: &str| {
        vars.get(key)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };
    let module = pick("module", &defaults.module);
    let controller = pick("controller", &defaults.controller);
    let action = pick("action", &defaults.action);

    let args = vars
        .get("paths")
        .map(|paths| parse_pairs(paths))
        .unwrap_or_default();

    MappedTarget {
        controller: format!("{}\\{}", capitalize(&module), capitalize(&controller)),
        action,
        args,
    }
}

/// Read `key/value` pairs out of a slash-joined tail.
///
/// Later duplicates overwrite earlier ones.
#[must_use]
pub fn parse_pairs(paths: &str) -> HashMap<String, String> {
    PAIR_RE
        .captures_iter(paths)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Upper-case the first ASCII letter, leaving the rest untouched.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(word.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}
