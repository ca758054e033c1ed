//! End-to-end host tests against a mock HTTP server.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use weft_host::{App, DiskCache, HttpFetcher, MemoryCache, SequentialSource, TemplateCache};
use weft_store::{callback, tree_path, Value};

const COMPONENTS: &str = r#"
    <template id="user-card" label>
        <p class="name"></p>
        <script>self.handleConnected = () => {}</script>
    </template>
    <template id="nav-bar"><nav></nav></template>
"#;

async fn serve_components(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

fn app_for(server: &MockServer, cache: Arc<dyn TemplateCache>, version: Option<&str>) -> App {
    App::with_capabilities(
        vec![format!("{}/components.html", server.uri())],
        Some(Value::from(serde_json::json!({"user": {"name": "Ann"}}))),
        version.map(str::to_string),
        Arc::new(HttpFetcher::with_default_timeout().unwrap()),
        cache,
        Arc::new(SequentialSource::default()),
    )
}

#[tokio::test]
async fn loads_components_over_http() {
    let server = MockServer::start().await;
    serve_components(&server, "/components.html", COMPONENTS).await;

    let mut app = app_for(&server, Arc::new(MemoryCache::new()), None);
    let count = app.load_components().await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(app.component_names(), vec!["nav-bar", "user-card"]);

    let card = app.create("user-card", weft_host::Hooks::default()).unwrap();
    assert_eq!(card.spec().observed_attributes, vec!["id", "label"]);
    assert!(card.spec().script.contains("handleConnected"));
}

#[tokio::test]
async fn concatenates_multiple_sources_in_order() {
    let server = MockServer::start().await;
    serve_components(
        &server,
        "/a.html",
        r#"<template id="first"><p>1</p></template>"#,
    )
    .await;
    serve_components(
        &server,
        "/b.html",
        r#"<template id="second"><p>2</p></template>"#,
    )
    .await;

    let mut app = App::with_capabilities(
        vec![
            format!("{}/a.html", server.uri()),
            format!("{}/b.html", server.uri()),
        ],
        None,
        None,
        Arc::new(HttpFetcher::with_default_timeout().unwrap()),
        Arc::new(MemoryCache::new()),
        Arc::new(SequentialSource::default()),
    );
    let count = app.load_components().await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(app.component_names(), vec!["first", "second"]);
}

#[tokio::test]
async fn non_success_source_contributes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/components.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut app = app_for(&server, Arc::new(MemoryCache::new()), None);
    let count = app.load_components().await.unwrap();
    assert_eq!(count, 0);
    assert!(app.component_names().is_empty());
}

#[tokio::test]
async fn versioned_reload_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/components.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COMPONENTS.to_string()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache: Arc<dyn TemplateCache> = Arc::new(DiskCache::new(dir.path()).unwrap());

    let mut first = app_for(&server, Arc::clone(&cache), Some("v1"));
    assert_eq!(first.load_components().await.unwrap(), 2);

    // Second load with the same version hits the disk cache; the mock's
    // expect(1) verifies no further request is made.
    let mut second = app_for(&server, Arc::clone(&cache), Some("v1"));
    assert_eq!(second.load_components().await.unwrap(), 2);
}

#[tokio::test]
async fn loaded_component_reacts_to_store_writes() {
    let server = MockServer::start().await;
    serve_components(&server, "/components.html", COMPONENTS).await;

    let mut app = app_for(&server, Arc::new(MemoryCache::new()), None);
    app.load_components().await.unwrap();

    let card = app.create("user-card", weft_host::Hooks::default()).unwrap();
    card.connected().await.unwrap();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    card.subscribe(
        &tree_path!("user"),
        callback(move |path, value| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((path, value));
                Ok(())
            }
        }),
    )
    .await;

    // Initial snapshot of the topic
    let (topic, snapshot) = rx.recv().await.unwrap();
    assert_eq!(topic, tree_path!("user"));
    assert_eq!(snapshot, Value::from(serde_json::json!({"name": "Ann"})));

    // A descendant write arrives with its full path
    let store = app.store();
    store
        .set(&tree_path!("user.name"), Value::from("Bob"))
        .await
        .unwrap();
    let (path, value) = rx.recv().await.unwrap();
    assert_eq!(path, tree_path!("user.name"));
    assert_eq!(value, Value::from("Bob"));

    card.unsubscribe(&tree_path!("user")).await;
    assert_eq!(store.subscriber_count(&tree_path!("user")).await, 0);
}
