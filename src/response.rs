//! Response content wrapper.
//!
//! A [`Response`] only carries content. Middleware pass it around as a value
//! and the entry point renders it as text when the chain completes; there is
//! no content negotiation.

use serde_json::Value;
use std::fmt;
use std::io::Write;
use thiserror::Error;

/// Raised when an action returns content that has no textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("the response content must be a string, a number, null or a displayable value; {kind} given")]
pub struct ResponseContentError {
    pub kind: &'static str,
}

/// What a controller action returns before it becomes a [`Response`].
pub enum ActionOutput {
    Value(Value),
    Display(Box<dyn fmt::Display + Send>),
}

impl fmt::Debug for ActionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutput::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ActionOutput::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
        }
    }
}

impl ActionOutput {
    /// Wrap any displayable value
    pub fn display<D: fmt::Display + Send + 'static>(value: D) -> Self {
        ActionOutput::Display(Box::new(value))
    }
}

impl From<Value> for ActionOutput {
    fn from(v: Value) -> Self {
        ActionOutput::Value(v)
    }
}

impl From<String> for ActionOutput {
    fn from(s: String) -> Self {
        ActionOutput::Value(Value::String(s))
    }
}

impl From<&str> for ActionOutput {
    fn from(s: &str) -> Self {
        ActionOutput::Value(Value::String(s.to_string()))
    }
}

impl From<()> for ActionOutput {
    fn from((): ()) -> Self {
        ActionOutput::Value(Value::Null)
    }
}

macro_rules! number_output {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ActionOutput {
            fn from(n: $ty) -> Self {
                ActionOutput::Value(Value::from(n))
            }
        })*
    };
}

number_output!(i32, i64, u32, u64, usize, f64);

/// Validated response content
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Empty,
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Empty => Ok(()),
            Content::Text(text) => f.write_str(text),
            Content::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    content: Content,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            content: Content::Empty,
        }
    }
}

impl Response {
    /// Validate and wrap action output.
    ///
    /// # Errors
    ///
    /// [`ResponseContentError`] for booleans, arrays and objects.
    pub fn new(output: impl Into<ActionOutput>) -> Result<Self, ResponseContentError> {
        let content = match output.into() {
            ActionOutput::Value(Value::Null) => Content::Empty,
            ActionOutput::Value(Value::String(s)) => Content::Text(s),
            ActionOutput::Value(Value::Number(n)) => Content::Number(n),
            ActionOutput::Value(Value::Bool(_)) => return Err(ResponseContentError { kind: "boolean" }),
            ActionOutput::Value(Value::Array(_)) => return Err(ResponseContentError { kind: "array" }),
            ActionOutput::Value(Value::Object(_)) => return Err(ResponseContentError { kind: "object" }),
            ActionOutput::Display(d) => Content::Text(d.to_string()),
        };
        Ok(Self { content })
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Content::Text(text.into()),
        }
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Replace the content (middleware rewriting a response)
    ///
    /// # Errors
    ///
    /// Same rules as [`Response::new`].
    pub fn set_content(&mut self, output: impl Into<ActionOutput>) -> Result<&mut Self, ResponseContentError> {
        *self = Self::new(output)?;
        Ok(self)
    }

    /// Write the textual content to `out`.
    ///
    /// # Errors
    ///
    /// I/O failures from the writer.
    pub fn send<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{}", self.content)?;
        out.flush()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.content, f)
    }
}
