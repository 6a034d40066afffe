//! # Router Module
//!
//! Maps a request method and path to a controller/action pair.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Collecting route definitions (`Routes`) into a [`RouteTable`]
//! - Matching normalized paths against static and regex-compiled routes
//! - Interpreting handler strings (`"Users@show"`) and the mapped-route
//!   convention for the `"default"` sentinel handler
//! - Qualifying controller names under the HTTP or CLI namespace
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashSet;
//! use switchyard::router::{InvocationMode, Router};
//!
//! let router = Router::builder()
//!     .build(|r| {
//!         r.get("/users/{id:\\d+}", "Users@show")?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let controllers: HashSet<String> = ["App\\Controllers\\Users".to_string()].into();
//! let m = router
//!     .resolve(InvocationMode::Http, "GET", "/users/7", &controllers)
//!     .unwrap();
//! assert_eq!(m.controller_name, "App\\Controllers\\Users");
//! assert_eq!(m.action_name, "show");
//! assert_eq!(m.get_path_var("id"), Some("7"));
//! ```

mod cache;
mod collector;
mod core;
mod error;
mod mapped;
mod pattern;
mod request;
mod table;

pub use collector::{Routes, ANY_METHODS};
pub use core::{ControllerIndex, RouteMatch, Router, RouterBuilder, DEFAULT_NAMESPACE};
pub use error::{RouteDefinitionError, RoutingError};
pub use mapped::{
    capitalize, parse_mapped_route, parse_pairs, DefaultRoute, MappedRouteParser, MappedTarget,
    MAP_ROUTE, MAP_ROUTE_HANDLER,
};
pub use request::{filter_path, http_path, normalize_path, HeaderVec, InvocationMode, Request};
pub use table::{Lookup, RouteSpec, RouteTable};
