//! Compact `Name:arg1,arg2` middleware descriptors.
//!
//! `"Name"` names a middleware with no arguments; `"Name:a,b"` passes `["a", "b"]`.
//! There is no escaping, so arguments cannot contain `,` and the name cannot
//! contain `:`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Arguments rarely exceed a handful; keep them inline.
pub type ArgVec = SmallVec<[String; 4]>;

/// A middleware name plus the arguments appended after the payload and `next`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MiddlewareSpec {
    pub name: String,
    pub args: ArgVec,
}

impl MiddlewareSpec {
    /// Parse `"Name:a,b"`. Never fails: everything before the first `:` is the
    /// name and the remainder is split on `,`.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        match spec.split_once(':') {
            None => Self {
                name: spec.to_string(),
                args: ArgVec::new(),
            },
            Some((name, args)) => Self {
                name: name.to_string(),
                args: args.split(',').map(str::to_string).collect(),
            },
        }
    }

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: ArgVec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl FromStr for MiddlewareSpec {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for MiddlewareSpec {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl TryFrom<String> for MiddlewareSpec {
    type Error = Infallible;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(Self::parse(&s))
    }
}

impl From<MiddlewareSpec> for String {
    fn from(spec: MiddlewareSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for MiddlewareSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            write!(f, ":{}", self.args.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let spec = MiddlewareSpec::parse("Auth");
        assert_eq!(spec.name, "Auth");
        assert!(spec.args.is_empty());
    }

    #[test]
    fn test_name_with_args() {
        let spec: MiddlewareSpec = "Log:info,trace".parse().unwrap();
        assert_eq!(spec.name, "Log");
        assert_eq!(spec.args.as_slice(), ["info", "trace"]);
        assert_eq!(spec.to_string(), "Log:info,trace");
    }

    #[test]
    fn test_only_first_colon_splits() {
        let spec = MiddlewareSpec::parse("Proxy:http://a,b");
        assert_eq!(spec.name, "Proxy");
        assert_eq!(spec.args.as_slice(), ["http://a", "b"]);
    }

    #[test]
    fn test_empty_argument_list_yields_one_empty_arg() {
        let spec = MiddlewareSpec::parse("Log:");
        assert_eq!(spec.args.as_slice(), [""]);
    }

    #[test]
    fn test_deserializes_from_plain_string() {
        let specs: Vec<MiddlewareSpec> = serde_json::from_str(r#"["Trace", "Auth:s3cret"]"#).unwrap();
        assert_eq!(specs[1], MiddlewareSpec::new("Auth").with_arg("s3cret"));
    }
}
