#![allow(dead_code)]

pub mod fixtures {
    use anyhow::anyhow;
    use serde_json::json;
    use switchyard::config::AppConfig;
    use switchyard::controller::{ActionError, Controller, ControllerRegistry};
    use switchyard::dispatcher::{AppMiddlewareRegistry, Dispatcher};
    use switchyard::middleware;
    use switchyard::response::ActionOutput;
    use switchyard::router::{RouteDefinitionError, Routes, MAP_ROUTE, MAP_ROUTE_HANDLER};
    use switchyard::Application;

    pub const TOKEN: &str = "secret";

    /// Append `tag` to the `trail` attribute
    pub fn mark(app: &mut Application, tag: &str) {
        let trail = match app.attribute("trail") {
            Some(existing) => format!("{existing}>{tag}"),
            None => tag.to_string(),
        };
        app.set_attribute("trail", trail);
    }

    /// Records its traversal in the application's `trail` attribute.
    pub struct Articles;

    impl Controller for Articles {
        fn create(_app: &Application) -> Self {
            Articles
        }

        fn middleware(action: &str) -> &'static [&'static str] {
            match action {
                "update" => &["Auth:secret", "Mark:controller"],
                "trail" => &["Mark:controller"],
                "ghost" => &["Ghost"],
                _ => &[],
            }
        }

        fn invoke(&mut self, action: &str, app: &mut Application) -> Result<ActionOutput, ActionError> {
            match action {
                "index" => Ok("articles".into()),
                "show" => Ok(format!("article {}", app.attr("id").unwrap_or("?")).into()),
                "update" => Ok(format!(
                    "updated {} by {}",
                    app.attr("id").unwrap_or("?"),
                    app.attribute("auth.token").unwrap_or("-")
                )
                .into()),
                "trail" | "ghost" => {
                    mark(app, "action");
                    Ok(app.attribute("trail").unwrap_or_default().to_string().into())
                }
                "count" => Ok(42_i64.into()),
                "nothing" => Ok(().into()),
                "flags" => Ok(json!({ "draft": true }).into()),
                "teapot" => Err(ActionError::http(418, "I'm a teapot")),
                "broken" => Err(ActionError::from(anyhow!("storage offline"))),
                other => Err(ActionError::Undefined(other.to_string())),
            }
        }
    }

    pub struct Report;

    impl Controller for Report {
        fn create(_app: &Application) -> Self {
            Report
        }

        fn invoke(&mut self, action: &str, app: &mut Application) -> Result<ActionOutput, ActionError> {
            match action {
                "index" => Ok(format!("report trail={}", app.attribute("trail").unwrap_or("none")).into()),
                "mapped" => {
                    let mut vars: Vec<String> = app
                        .attrs()
                        .map(|attrs| attrs.iter().map(|(k, v)| format!("{k}={v}")).collect())
                        .unwrap_or_default();
                    vars.sort();
                    Ok(vars.join(",").into())
                }
                other => Err(ActionError::Undefined(other.to_string())),
            }
        }
    }

    pub fn routes(r: &mut Routes) -> Result<(), RouteDefinitionError> {
        r.add_group("/articles", |r| {
            r.get("", "Articles@index")?;
            r.get("/{id:\\d+}", "Articles@show")?;
            r.put("/{id:\\d+}", "Articles@update")?;
            Ok(())
        })?;
        for action in ["trail", "ghost", "count", "nothing", "flags", "teapot", "broken", "missing"] {
            r.get(&format!("/a/{action}"), &format!("Articles@{action}"))?;
        }
        r.get("/half", "Articles@")?;
        r.get("/orphan", "Orphan@index")?;
        r.get("/report", "Report@index")?;
        r.any(MAP_ROUTE, MAP_ROUTE_HANDLER)?;
        Ok(())
    }

    pub fn controllers() -> ControllerRegistry {
        let mut registry = ControllerRegistry::new();
        registry
            .register::<Articles>("App\\Controllers\\Articles")
            .register::<Report>("App\\Controllers\\Report")
            .register::<Report>("App\\Controllers\\Home\\Report")
            .register::<Report>("App\\Commands\\Report")
            .register::<Articles>("App\\Commands\\Articles");
        registry
    }

    /// Built-ins plus `Mark:<tag>`, which appends its tag on the way in.
    pub fn middleware() -> AppMiddlewareRegistry {
        let mut registry = middleware::builtin();
        registry.register_fn("Mark", |app: &mut Application, next, args: &[String]| {
            mark(app, args.first().map_or("mark", String::as_str));
            next.run(app)
        });
        registry
    }

    pub fn dispatcher_with(config: AppConfig) -> Dispatcher {
        Dispatcher::from_config(config, controllers(), middleware(), routes).unwrap()
    }

    pub fn dispatcher() -> Dispatcher {
        dispatcher_with(AppConfig::default())
    }
}

pub mod tracing_capture {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted events in memory for the lifetime of the guard.
    pub struct CapturedLogs {
        buffer: Arc<Mutex<Vec<u8>>>,
        _guard: tracing::subscriber::DefaultGuard,
    }

    #[derive(Clone)]
    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for BufferWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = BufferWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    impl CapturedLogs {
        pub fn init() -> Self {
            let buffer = Arc::new(Mutex::new(Vec::new()));
            let subscriber = tracing_subscriber::fmt()
                .json()
                .with_current_span(true)
                .with_max_level(tracing::Level::TRACE)
                .with_writer(BufferWriter(Arc::clone(&buffer)))
                .finish();
            let guard = tracing::subscriber::set_default(subscriber);
            Self {
                buffer,
                _guard: guard,
            }
        }

        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
        }

        pub fn contains(&self, needle: &str) -> bool {
            self.contents().contains(needle)
        }
    }
}
