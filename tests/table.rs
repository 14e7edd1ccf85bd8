use handler_router::{Error, Method, Route, RouteTable};

use std::sync::Arc;
use std::thread;

fn table() -> RouteTable<usize> {
    let mut table = RouteTable::new();
    table
        .insert(Route::get("/echo", "get_echo"), 1)
        .unwrap()
        .insert(Route::post("/echo", "post_echo"), 2)
        .unwrap()
        .insert(Route::get("/data/{id:[0-9]+}", "get_data").name("data"), 3)
        .unwrap()
        .insert(Route::delete("/data/{id:[0-9]+}", "delete_data"), 4)
        .unwrap()
        .insert(Route::get("/users[/{id}[/{tab}]]", "get_user").name("user"), 5)
        .unwrap();
    table
}

#[test]
fn table_routes_for_url() {
    let table = table();

    let routes = table.routes_for_url("/echo").unwrap();
    let methods: Vec<&Method> = routes.methods().collect();
    assert_eq!(methods, [&Method::GET, &Method::POST]);
    assert_eq!(*table.data(routes.get(&Method::POST).unwrap()), 2);

    let routes = table.routes_for_url("/data/12?full=1").unwrap();
    assert_eq!(routes.len(), 2);
    assert!(routes.get(&Method::PUT).is_none());

    match table.routes_for_url("/data/abc") {
        Err(Error::RouteNotFound { url }) => assert_eq!(url, "/data/abc"),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn table_method_allowed() {
    let table = table();

    assert!(table.method_allowed("/echo", Some(&Method::GET)).is_ok());
    assert!(table.method_allowed("/echo", None).is_ok());

    let err = table
        .method_allowed("/echo", Some(&Method::PATCH))
        .unwrap_err();
    assert_eq!(err.allowed_methods(), &[Method::GET, Method::POST]);
    assert_eq!(err.status_code(), http::StatusCode::METHOD_NOT_ALLOWED);

    assert!(matches!(
        table.method_allowed("/nowhere", Some(&Method::GET)),
        Err(Error::RouteNotFound { .. })
    ));
}

#[test]
fn table_resolve() {
    let table = table();

    let index = table.resolve("/data/3", Some(&Method::DELETE)).unwrap();
    assert_eq!(table.route(index).target(), "delete_data");

    let index = table.resolve("/data/3", None).unwrap();
    assert_eq!(table.route(index).target(), "get_data");

    assert!(matches!(
        table.resolve("/data/3", Some(&Method::PUT)),
        Err(Error::HandlerNotCallable { .. })
    ));
}

#[test]
fn table_later_route_overwrites_method() {
    let mut table = RouteTable::new();
    table.insert(Route::get("/items/{id}", "by_id"), 1).unwrap();
    table.insert(Route::post("/items/{id}", "create"), 2).unwrap();
    table.insert(Route::get("/items/{name:[a-z]+}", "by_name"), 3).unwrap();

    let routes = table.routes_for_url("/items/abc").unwrap();
    let methods: Vec<&Method> = routes.methods().collect();
    assert_eq!(methods, [&Method::GET, &Method::POST]);

    let index = table.resolve("/items/abc", None).unwrap();
    assert_eq!(table.route(index).target(), "by_name");

    let index = table.resolve("/items/42", Some(&Method::GET)).unwrap();
    assert_eq!(table.route(index).target(), "by_id");
}

#[test]
fn table_bind() {
    let mut table = RouteTable::new();
    table
        .insert(
            Route::get("/fixed/{id}/{kind}", "fixed").argument("id", "static"),
            (),
        )
        .unwrap();
    table.insert(Route::get("/pair/{x}/{x}", "pair"), ()).unwrap();

    let args = table.bind(0, "/fixed/7/box?q=1").unwrap();
    assert_eq!(args.get_str("id"), Some("static"));
    assert_eq!(args.get_str("kind"), Some("box"));
    let names: Vec<&str> = args.names().collect();
    assert_eq!(names, ["id", "kind"]);

    let args = table.bind(1, "/pair/a/b").unwrap();
    assert_eq!(args.len(), 1);
    assert_eq!(args.get_str("x"), Some("b"));

    assert!(matches!(
        table.bind(0, "/elsewhere"),
        Err(Error::RouteNotFound { .. })
    ));
}

#[test]
fn table_url_cache() {
    let table = table();
    assert_eq!(table.match_scans(), 0);

    table.routes_for_url("/echo").unwrap();
    table.routes_for_url("/echo").unwrap();
    table.method_allowed("/echo", Some(&Method::GET)).unwrap();
    table.resolve("/echo", None).unwrap();
    assert_eq!(table.match_scans(), 1);

    assert!(table.routes_for_url("/nope").is_err());
    assert!(table.routes_for_url("/nope").is_err());
    assert_eq!(table.match_scans(), 2);
    assert_eq!(table.cached_urls(), 2);
}

#[test]
fn table_bounded_cache() {
    let mut table = RouteTable::new().with_cache_capacity(2);
    table.insert(Route::get("/a/{x}", "a"), ()).unwrap();

    table.routes_for_url("/a/1").unwrap();
    table.routes_for_url("/a/2").unwrap();
    assert_eq!(table.cached_urls(), 2);

    table.routes_for_url("/a/3").unwrap();
    assert_eq!(table.cached_urls(), 1);
    assert_eq!(table.match_scans(), 3);
}

#[test]
fn table_insert_errors() {
    let mut table = table();

    assert!(matches!(
        table.insert(Route::get("/other", "other").name("data"), 9),
        Err(Error::DuplicateRouteName { .. })
    ));
    assert!(matches!(
        table.insert(Route::new(Method::TRACE, "/trace", "trace"), 9),
        Err(Error::InvalidRoute { .. })
    ));
    assert!(matches!(
        table.insert(Route::get("/bad/{id", "bad"), 9),
        Err(Error::PatternSyntax { .. })
    ));
    assert_eq!(table.len(), 5);
}

#[test]
fn table_url_for() {
    let table = table();

    assert_eq!(table.url_for("data", &[("id", "5")]).unwrap(), "/data/5");
    assert_eq!(table.url_for("user", &[]).unwrap(), "/users");
    assert_eq!(table.url_for("user", &[("id", "3")]).unwrap(), "/users/3");
    assert_eq!(
        table
            .url_for("user", &[("id", "3"), ("tab", "posts")])
            .unwrap(),
        "/users/3/posts"
    );

    assert!(matches!(
        table.url_for("data", &[]),
        Err(Error::MissingRouteParameter { .. })
    ));
    assert!(matches!(
        table.url_for("nope", &[]),
        Err(Error::UnknownRouteName { .. })
    ));

    match table.url_for("data", &[("id", "abc")]) {
        Err(Error::InvalidRouteParameter { name, param, value }) => {
            assert_eq!((name.as_str(), param.as_str()), ("data", "id"));
            assert_eq!(value, "abc");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        table.url_for("user", &[("id", "3"), ("tab", "a/b")]),
        Err(Error::InvalidRouteParameter { .. })
    ));
}

#[test]
fn table_ignores_query_string() {
    let table = table();

    assert_eq!(
        *table.routes_for_url("/echo").unwrap(),
        *table.routes_for_url("/echo?anything").unwrap()
    );
    assert_eq!(
        *table.routes_for_url("/data/12").unwrap(),
        *table.routes_for_url("/data/12?full=1&x").unwrap()
    );
    assert_eq!(
        table.resolve("/users/1?tab=x", None).unwrap(),
        table.resolve("/users/1", None).unwrap()
    );
}

#[test]
fn table_shared_across_threads() {
    let table = Arc::new(table());
    let urls = ["/echo", "/data/7", "/users/3/posts", "/echo?x=1", "/data/7?y"];

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let mut seen = Vec::new();
                for _ in 0..50 {
                    for url in urls.iter() {
                        let index = table.resolve(url, None).unwrap();
                        let allowed = table.method_allowed(url, Some(&Method::POST)).is_ok();
                        seen.push((index, allowed));
                    }
                }
                seen
            })
        })
        .collect();

    let results: Vec<Vec<(usize, bool)>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for seen in &results {
        assert_eq!(seen, &results[0]);
    }

    assert_eq!(results[0][..5], [(0, true), (2, false), (4, false), (0, true), (2, false)]);
    assert_eq!(table.cached_urls(), urls.len());
    assert!(table.match_scans() >= urls.len());
}
