//! End-to-end flows through the reqwest transport against a mock server.

mod support;

use std::net::TcpListener;

use corbel_core::{ResourceOptions, TokenParams};
use corbel_domain::constants::{IAM_DOMAIN, IAM_TOKEN};
use corbel_domain::{ClientSettings, RequestArgs, ResponseData};
use serde_json::json;
use support::{access_token_for, client, token_body, url_base};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/iam/v1.0/oauth/token";
const BOOKS_PATH: &str = "/resources/v1.0/acme/resource/books:Book";

#[tokio::test]
async fn issued_token_authenticates_domain_scoped_requests() {
    let server = MockServer::start().await;
    let access_token = access_token_for("acme");

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded; charset=UTF-8"))
        .and(body_string_contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"))
        .and(body_string_contains("assertion="))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(&access_token, "R1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(BOOKS_PATH))
        .and(header("authorization", format!("Bearer {access_token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "title": "Dune" }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.iam().token().create(TokenParams::default(), false).await.unwrap();
    assert_eq!(client.config().get_str(IAM_DOMAIN).as_deref(), Some("acme"));

    let books = client.resources().collection("books:Book").unwrap();
    let response = books.get(&ResourceOptions::default()).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.data, ResponseData::Json(json!([{ "title": "Dune" }])));
}

#[tokio::test]
async fn expired_token_is_refreshed_and_request_replayed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(BOOKS_PATH))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(BOOKS_PATH))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("A2", "R2")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.config().set(IAM_DOMAIN, "acme");
    client.config().set(IAM_TOKEN, json!({ "accessToken": "A1", "refreshToken": "R1" }));

    let url = format!("{}{BOOKS_PATH}", server.uri());
    let response = client.request(RequestArgs::get(url)).await.unwrap();

    assert_eq!(response.data.to_json(), json!({ "id": "1" }));
    assert_eq!(client.config().access_token().as_deref(), Some("A2"));
}

#[tokio::test]
async fn unsupported_version_body_is_a_forced_update() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(BOOKS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_raw("unsupported_version", "text/plain"))
        .mount(&server)
        .await;

    let client = client(&server);
    let url = format!("{}{BOOKS_PATH}", server.uri());
    let err = client.request(RequestArgs::get(url)).await.unwrap_err();

    assert!(err.is_forced_update());
    assert_eq!(err.response().and_then(|r| r.error.as_deref()), Some("Forbidden"));
}

#[tokio::test]
async fn empty_json_body_resolves_to_empty_object_and_headers_are_lowercased() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(BOOKS_PATH))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(body_string_contains("\"title\":\"Dune\""))
        .respond_with(ResponseTemplate::new(200).insert_header("X-Trace-Id", "abc"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let url = format!("{}{BOOKS_PATH}", server.uri());
    let response = client.request(RequestArgs::put(url).json(json!({ "title": "Dune" }))).await.unwrap();

    assert_eq!(response.data, ResponseData::Json(json!({})));
    assert_eq!(response.headers.get("x-trace-id").map(String::as_str), Some("abc"));
}

#[tokio::test]
async fn created_entity_id_comes_from_location() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOKS_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("Location", format!("{}{BOOKS_PATH}/42", server.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.config().set(IAM_DOMAIN, "acme");
    let books = client.resources().collection("books:Book").unwrap();

    let id = books.add(json!({ "title": "Dune" }), &ResourceOptions::default()).await.unwrap();

    assert_eq!(id.as_deref(), Some("42"));
}

#[tokio::test]
async fn long_get_is_tunnelled_through_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(BOOKS_PATH))
        .and(header("x-http-method-override", "GET"))
        .and(body_string_contains("api%3Aquery=xxxx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let url = format!("{}{BOOKS_PATH}", server.uri());
    let query = format!("api:query={}", "x".repeat(2_100));

    let response = client.request(RequestArgs::get(url).query(query)).await.unwrap();

    assert_eq!(response.data, ResponseData::Json(json!([])));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = corbel_infra::connect(ClientSettings::new(format!("http://{addr}/{{{{module}}}}/"))).unwrap();
    let err = client.request(RequestArgs::get(format!("http://{addr}/resources/x"))).await.unwrap_err();

    assert!(err.is_transport_failure());
    assert_eq!(err.status(), Some(0));
}

#[tokio::test]
async fn module_urls_follow_the_template() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/iam/v1.0/unauthenticated/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = corbel_infra::connect(ClientSettings::new(url_base(&server))).unwrap();
    client.iam().users().get(None).await.unwrap();
}
