use std::collections::HashSet;
use switchyard::router::{
    InvocationMode, RouteDefinitionError, RouteMatch, Router, Routes, RoutingError, MAP_ROUTE,
    MAP_ROUTE_HANDLER,
};

const ZOO_CONTROLLERS: &[&str] = &[
    "App\\Controllers\\Root",
    "App\\Controllers\\Animals",
    "App\\Controllers\\Toys",
    "App\\Controllers\\Habitats",
    "App\\Controllers\\Health",
    "App\\Controllers\\Inventory",
    "App\\Controllers\\Feed",
    "App\\Controllers\\Complex",
];

fn zoo_routes(r: &mut Routes) -> Result<(), RouteDefinitionError> {
    r.get("/", "Root@index")?;
    r.add_group("/zoo", |r| {
        r.get("/animals", "Animals@index")?;
        r.post("/animals", "Animals@create")?;
        r.get("/animals/{id}", "Animals@show")?;
        r.put("/animals/{id}", "Animals@update")?;
        r.patch("/animals/{id}", "Animals@patch")?;
        r.delete("/animals/{id}", "Animals@delete")?;
        r.get("/animals/{id}/toys/{toy_id}", "Toys@show")?;
        r.get(
            "/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}",
            "Habitats@section",
        )?;
        r.head("/health", "Health@check")?;
        r.options("/health", "Health@options")?;
        r.get("/feed[/{day:mon|tue|wed}[/{meal}]]", "Feed@schedule")?;
        Ok(())
    })?;
    r.post(
        "/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}",
        "Inventory@batch",
    )?;
    r.get("/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}", "Complex@many")?;
    Ok(())
}

fn zoo_router() -> Router {
    Router::builder().build(zoo_routes).unwrap()
}

fn zoo_controllers() -> HashSet<String> {
    ZOO_CONTROLLERS.iter().map(|c| c.to_string()).collect()
}

fn resolve(router: &Router, method: &str, path: &str) -> Result<RouteMatch, RoutingError> {
    router.resolve(InvocationMode::Http, method, path, &zoo_controllers())
}

fn assert_route_match(router: &Router, method: &str, path: &str, expected: &str) {
    match resolve(router, method, path) {
        Ok(m) => {
            let short = m
                .controller_name
                .strip_prefix("App\\Controllers\\")
                .unwrap_or(&m.controller_name);
            assert_eq!(
                format!("{short}@{}", m.action_name),
                expected,
                "Handler mismatch for {method} {path}"
            );
        }
        Err(err) => assert_eq!(expected, "<none>", "Expected {method} {path} to match, got {err}"),
    }
}

#[test]
fn test_router_verbs() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/", "Root@index");
    assert_route_match(&router, "GET", "/zoo/animals", "Animals@index");
    assert_route_match(&router, "POST", "/zoo/animals", "Animals@create");
    assert_route_match(&router, "GET", "/zoo/animals/123", "Animals@show");
    assert_route_match(&router, "PUT", "/zoo/animals/123", "Animals@update");
    assert_route_match(&router, "PATCH", "/zoo/animals/123", "Animals@patch");
    assert_route_match(&router, "DELETE", "/zoo/animals/123", "Animals@delete");
    assert_route_match(&router, "HEAD", "/zoo/health", "Health@check");
    assert_route_match(&router, "OPTIONS", "/zoo/health", "Health@options");
    assert_route_match(&router, "GET", "/unknown", "<none>");
}

#[test]
fn test_router_trailing_slash_is_normalized() {
    let router = zoo_router();
    assert_route_match(&router, "GET", "/zoo/animals/", "Animals@index");
    assert_route_match(&router, "GET", "zoo/animals/7", "Animals@show");
}

#[test]
fn test_router_head_falls_back_to_get() {
    let router = zoo_router();
    assert_route_match(&router, "HEAD", "/zoo/animals/9", "Animals@show");
}

#[test]
fn test_router_deep_params() {
    let router = zoo_router();

    let m = resolve(&router, "GET", "/zoo/animals/5/toys/ball").unwrap();
    assert_eq!(m.get_path_var("id"), Some("5"));
    assert_eq!(m.get_path_var("toy_id"), Some("ball"));

    let m = resolve(&router, "GET", "/zoo/cats/animals/123/habitats/88/sections/5").unwrap();
    assert_eq!(m.action_name, "section");
    assert_eq!(m.get_path_var("category"), Some("cats"));
    assert_eq!(m.get_path_var("habitat_id"), Some("88"));
    assert_eq!(m.get_path_var("section_id"), Some("5"));

    let m = resolve(&router, "POST", "/inventory/1/feeds/2/items/3/batches/4").unwrap();
    assert_eq!(m.path_vars.len(), 4);
    assert_eq!(m.get_path_var("batch_id"), Some("4"));

    let m = resolve(&router, "GET", "/complex/1/2/3/4/5/6/7/8/9").unwrap();
    assert_eq!(m.path_vars.len(), 9);
    assert_eq!(m.get_path_var("i"), Some("9"));
}

#[test]
fn test_router_optional_segments() {
    let router = zoo_router();

    let m = resolve(&router, "GET", "/zoo/feed").unwrap();
    assert!(m.path_vars.is_empty());

    let m = resolve(&router, "GET", "/zoo/feed/tue").unwrap();
    assert_eq!(m.get_path_var("day"), Some("tue"));
    assert_eq!(m.get_path_var("meal"), None);

    let m = resolve(&router, "GET", "/zoo/feed/wed/fish").unwrap();
    assert_eq!(m.get_path_var("meal"), Some("fish"));

    // `{day}` only accepts its alternation
    assert_eq!(resolve(&router, "GET", "/zoo/feed/sun"), Err(RoutingError::NotFound));
}

#[test]
fn test_router_method_not_allowed() {
    let router = zoo_router();

    let err = resolve(&router, "POST", "/zoo/animals/123").unwrap_err();
    assert_eq!(err.status_code(), 405);
    let allowed: Vec<&str> = err
        .allowed_methods()
        .unwrap()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(allowed, vec!["DELETE", "GET", "PATCH", "PUT"]);

    let err = resolve(&router, "GET", "/zoo/health").unwrap_err();
    assert_eq!(err.status_code(), 405);
    assert!(err.allowed_methods().unwrap().contains("HEAD"));
}

#[test]
fn test_router_unregistered_controller() {
    let router = zoo_router();
    let err = router
        .resolve(InvocationMode::Http, "GET", "/zoo/animals", &HashSet::<String>::new())
        .unwrap_err();
    assert_eq!(
        err,
        RoutingError::ControllerMissing("App\\Controllers\\Animals".to_string())
    );
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_router_custom_namespace() {
    let router = Router::builder().namespace("Zoo").build(zoo_routes).unwrap();
    let controllers: HashSet<String> = ["Zoo\\Controllers\\Animals".to_string()].into();
    let m = router
        .resolve(InvocationMode::Http, "GET", "/zoo/animals", &controllers)
        .unwrap();
    assert_eq!(m.controller_name, "Zoo\\Controllers\\Animals");

    let controllers: HashSet<String> = ["Zoo\\Commands\\Animals".to_string()].into();
    let m = router
        .resolve(InvocationMode::Cli, "GET", "/zoo/animals", &controllers)
        .unwrap();
    assert_eq!(m.controller_name, "Zoo\\Commands\\Animals");
}

#[test]
fn test_router_explicit_routes_win_over_mapped_fallback() {
    let router = Router::builder()
        .mapped_routes(Default::default())
        .build(|r| {
            // `/` belongs to the mapped route here
            r.get("/zoo/animals", "Animals@index")?;
            r.get("/zoo/animals/{id}", "Animals@show")?;
            r.any(MAP_ROUTE, MAP_ROUTE_HANDLER)?;
            Ok(())
        })
        .unwrap();
    let mut controllers = zoo_controllers();
    controllers.insert("App\\Controllers\\Gift\\Shop".to_string());

    assert_route_match(&router, "GET", "/zoo/animals", "Animals@index");
    assert_route_match(&router, "GET", "/zoo/animals/4", "Animals@show");

    let m = router
        .resolve(InvocationMode::Http, "GET", "/gift/shop/buy/item/42/qty/2", &controllers)
        .unwrap();
    assert_eq!(m.controller_name, "App\\Controllers\\Gift\\Shop");
    assert_eq!(m.action_name, "buy");
    assert_eq!(m.get_path_var("item"), Some("42"));
    assert_eq!(m.get_path_var("qty"), Some("2"));
}

#[test]
fn test_router_cache_survives_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zoo-routes.json");

    let fresh = Router::builder().cache_file(&path).build(zoo_routes).unwrap();
    let cached = Router::builder()
        .cache_file(&path)
        .build(|_| panic!("route definitions must not run when the cache is present"))
        .unwrap();

    assert_eq!(fresh.routes(), cached.routes());
    for (method, path) in [
        ("GET", "/zoo/feed/mon/hay"),
        ("PATCH", "/zoo/animals/3"),
        ("HEAD", "/zoo/health"),
    ] {
        assert_eq!(resolve(&fresh, method, path), resolve(&cached, method, path));
    }
}
