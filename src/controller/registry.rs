use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::core::Controller;
use crate::app::Application;
use crate::router::ControllerIndex;

type ControllerFactory = Arc<dyn Fn(&Application) -> Box<dyn Controller> + Send + Sync>;

#[derive(Clone)]
struct ControllerEntry {
    factory: ControllerFactory,
    middleware: fn(&str) -> &'static [&'static str],
}

/// Fully-qualified controller name -> factory and middleware declarations.
///
/// Immutable once the dispatcher is built; lookups never allocate.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    entries: HashMap<String, ControllerEntry>,
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}

impl ControllerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` under `name`, replacing any previous registration.
    pub fn register<C: Controller>(&mut self, name: impl Into<String>) -> &mut Self {
        self.entries.insert(
            name.into(),
            ControllerEntry {
                factory: Arc::new(|app: &Application| Box::new(C::create(app)) as Box<dyn Controller>),
                middleware: C::middleware,
            },
        );
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Middleware declared by `name` for `action`; empty for unknown controllers.
    #[must_use]
    pub fn middleware(&self, name: &str, action: &str) -> &'static [&'static str] {
        const NONE: &[&str] = &[];
        self.entries
            .get(name)
            .map_or(NONE, |entry| (entry.middleware)(action))
    }

    /// A fresh controller for this request
    #[must_use]
    pub fn instantiate(&self, name: &str, app: &Application) -> Option<Box<dyn Controller>> {
        self.entries.get(name).map(|entry| (entry.factory)(app))
    }
}

impl ControllerIndex for ControllerRegistry {
    fn has_controller(&self, name: &str) -> bool {
        self.contains(name)
    }
}
