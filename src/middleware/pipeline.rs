//! Onion composition of middleware around a terminal handler.
//!
//! Specs are folded last to first into a linked list of [`Link`]s ending in
//! the terminal. Running the chain walks the list from the head, so the first
//! spec is the outermost layer. Middleware are instantiated lazily, one fresh
//! instance per layer per run.

use thiserror::Error;
use tracing::{debug, trace};

use super::core::{Next, Terminal};
use super::registry::MiddlewareRegistry;
use super::spec::MiddlewareSpec;

/// Failures raised by the pipeline itself (as opposed to its middleware)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("middleware `{0}` is not registered")]
    UnknownMiddleware(String),
}

/// One node of a built chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    Terminal,
    Layer {
        spec: MiddlewareSpec,
        next: Box<Link>,
    },
}

impl Link {
    /// Fold `specs` right to left around the terminal.
    #[must_use]
    pub fn fold(specs: Vec<MiddlewareSpec>) -> Self {
        specs
            .into_iter()
            .rev()
            .fold(Link::Terminal, |next, spec| Link::Layer {
                spec,
                next: Box::new(next),
            })
    }

    pub(super) fn run<P, T, E>(
        &self,
        payload: &mut P,
        registry: &MiddlewareRegistry<P, T, E>,
        terminal: &Terminal<'_, P, T, E>,
    ) -> Result<T, E>
    where
        P: 'static,
        T: 'static,
        E: From<PipelineError> + 'static,
    {
        match self {
            Link::Terminal => terminal(payload),
            Link::Layer { spec, next } => {
                trace!(middleware = %spec.name, args = ?spec.args, "Entering middleware");
                let middleware = registry.instantiate(&spec.name)?;
                let downstream = Next {
                    link: next,
                    registry,
                    terminal,
                };
                middleware.handle(payload, downstream, &spec.args)
            }
        }
    }

    /// Layers between this link and the terminal, this one included
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut link = self;
        while let Link::Layer { next, .. } = link {
            depth += 1;
            link = next;
        }
        depth
    }

    /// Specs in execution order
    pub fn specs(&self) -> impl Iterator<Item = &MiddlewareSpec> {
        let mut link = self;
        std::iter::from_fn(move || match link {
            Link::Terminal => None,
            Link::Layer { spec, next } => {
                link = next;
                Some(spec)
            }
        })
    }
}

/// Collects middleware specs before a chain is built.
///
/// ```rust
/// use switchyard::middleware::{MiddlewareRegistry, Pipeline, PipelineError};
///
/// let mut registry: MiddlewareRegistry<Vec<String>, String, PipelineError> =
///     MiddlewareRegistry::new();
/// registry.register_fn("Tag", |log, next, args| {
///     log.push(args.join("+"));
///     next.run(log)
/// });
///
/// let chain = Pipeline::new(&registry)
///     .through(["Tag:a,b", "Tag:c"])
///     .build(|log: &mut Vec<String>| Ok(log.join(" ")));
///
/// let mut log = Vec::new();
/// assert_eq!(chain.run(&mut log).unwrap(), "a+b c");
/// ```
pub struct Pipeline<'r, P, T, E> {
    registry: &'r MiddlewareRegistry<P, T, E>,
    specs: Vec<MiddlewareSpec>,
}

impl<'r, P, T, E> Pipeline<'r, P, T, E> {
    #[must_use]
    pub fn new(registry: &'r MiddlewareRegistry<P, T, E>) -> Self {
        Self {
            registry,
            specs: Vec::new(),
        }
    }

    /// Append specs given in the compact `"Name:a,b"` form.
    #[must_use]
    pub fn through<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.specs
            .extend(specs.into_iter().map(|s| MiddlewareSpec::parse(s.as_ref())));
        self
    }

    /// Append already-parsed specs.
    #[must_use]
    pub fn through_specs<I>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = MiddlewareSpec>,
    {
        self.specs.extend(specs);
        self
    }

    /// Compose the chain. Nothing is instantiated until [`Chain::run`].
    #[must_use]
    pub fn build<F>(self, terminal: F) -> Chain<'r, P, T, E>
    where
        F: Fn(&mut P) -> Result<T, E> + 'r,
    {
        let len = self.specs.len();
        debug!(middleware_count = len, "Middleware chain built");
        Chain {
            registry: self.registry,
            head: Link::fold(self.specs),
            len,
            terminal: Box::new(terminal),
        }
    }
}

/// A composed, runnable chain.
pub struct Chain<'r, P, T, E> {
    registry: &'r MiddlewareRegistry<P, T, E>,
    head: Link,
    len: usize,
    terminal: Box<Terminal<'r, P, T, E>>,
}

impl<'r, P, T, E> Chain<'r, P, T, E>
where
    P: 'static,
    T: 'static,
    E: From<PipelineError> + 'static,
{
    /// Run every layer in order, then the terminal.
    ///
    /// An empty chain calls the terminal directly.
    ///
    /// # Errors
    ///
    /// Whatever a middleware or the terminal returns, and
    /// [`PipelineError::UnknownMiddleware`] for unregistered names.
    pub fn run(&self, payload: &mut P) -> Result<T, E> {
        if self.len == 0 {
            return (self.terminal)(payload);
        }
        self.head.run(payload, self.registry, self.terminal.as_ref())
    }
}

impl<'r, P, T, E> Chain<'r, P, T, E> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Specs in execution order
    pub fn specs(&self) -> impl Iterator<Item = &MiddlewareSpec> {
        self.head.specs()
    }

    #[must_use]
    pub fn head(&self) -> &Link {
        &self.head
    }
}
