//! Normalizer behavior over realistic documentation fixtures

use std::collections::HashSet;

use clientforge::core::{ApiKeyLocation, AuthMethod, HttpMethod, ParameterLocation};
use clientforge::{ApiDescription, InputFormat, parse};

const PETSTORE: &str = include_str!("fixtures/petstore.openapi.json");
const STORE: &str = include_str!("fixtures/store.postman.json");
const WIDGETS: &str = include_str!("fixtures/widgets.html");

fn assert_complete(api: &ApiDescription) {
    assert!(!api.title.is_empty());
    assert!(!api.version.is_empty());
    assert!(!api.base_url.ends_with('/'));

    let mut ids = HashSet::new();
    for endpoint in &api.endpoints {
        assert!(endpoint.path.starts_with('/'), "{}", endpoint.path);
        assert!(!endpoint.operation_id.is_empty());
        assert!(ids.insert(&endpoint.operation_id), "duplicate {}", endpoint.operation_id);
        for placeholder in endpoint.path_placeholders() {
            assert!(
                endpoint
                    .parameters
                    .iter()
                    .any(|p| p.location == ParameterLocation::Path && p.name == placeholder),
                "{} lacks path parameter {placeholder}",
                endpoint.path
            );
        }
    }
}

#[test]
fn test_openapi_fixture() {
    let api = parse(InputFormat::OpenApi, PETSTORE).unwrap();
    assert_complete(&api);

    assert_eq!(api.title, "Swagger Petstore");
    assert_eq!(api.version, "1.0.0");
    assert_eq!(api.base_url, "https://eu.petstore.test/v1");
    assert_eq!(
        api.auth_method,
        AuthMethod::ApiKey {
            header_name: "X-Pet-Key".to_string(),
            location: ApiKeyLocation::Header,
            description: None,
        }
    );

    let ids: Vec<&str> = api.endpoints.iter().map(|e| e.operation_id.as_str()).collect();
    assert_eq!(ids.len(), 5);
    for id in ["listPets", "createPet", "showPetById", "updatePet", "deletePet"] {
        assert!(ids.contains(&id), "missing {id}");
    }

    let show = api
        .endpoints
        .iter()
        .find(|e| e.operation_id == "showPetById")
        .unwrap();
    assert_eq!(show.method, HttpMethod::Get);
    assert_eq!(show.path, "/pets/{petId}");
    assert!(show.request_body.is_none());
    assert!(show.responses.contains_key("404"));

    let create = api
        .endpoints
        .iter()
        .find(|e| e.operation_id == "createPet")
        .unwrap();
    let body = create.request_body.as_ref().unwrap();
    assert_eq!(body.media_type, "application/json");
    assert!(body.required);

    let list = api
        .endpoints
        .iter()
        .find(|e| e.operation_id == "listPets")
        .unwrap();
    assert_eq!(list.parameters_in(ParameterLocation::Query).count(), 2);
    assert_eq!(list.parameters_in(ParameterLocation::Header).count(), 1);
}

#[test]
fn test_postman_fixture_keeps_duplicates_with_suffixed_ids() {
    let api = parse(InputFormat::Postman, STORE).unwrap();
    assert_complete(&api);

    assert_eq!(api.title, "Store API");
    assert_eq!(api.base_url, "https://store.test/api");
    assert_eq!(api.auth_method.kind(), "bearer");

    let ids: Vec<&str> = api.endpoints.iter().map(|e| e.operation_id.as_str()).collect();
    assert_eq!(ids, vec!["listOrders", "getOrder", "createOrder", "listOrders2"]);

    let list = &api.endpoints[0];
    let query: Vec<&str> = list
        .parameters_in(ParameterLocation::Query)
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(query, vec!["status", "page"]);
    assert_eq!(list.tags, vec!["Orders".to_string()]);

    let get = &api.endpoints[1];
    assert_eq!(get.path, "/orders/{orderId}");

    let create = &api.endpoints[2];
    assert_eq!(create.method, HttpMethod::Post);
    assert!(create.request_body.is_some());
    let headers: Vec<&str> = create
        .parameters_in(ParameterLocation::Header)
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(headers, vec!["X-Trace"]);
}

#[test]
fn test_html_fixture_dedupes_first_wins() {
    let api = parse(InputFormat::Html, WIDGETS).unwrap();
    assert_complete(&api);

    assert_eq!(api.title, "Widgets API Reference");
    assert_eq!(api.base_url, "https://widgets.test/v2");
    assert_eq!(api.auth_method.kind(), "apiKey");

    let routes: Vec<(HttpMethod, &str)> = api
        .endpoints
        .iter()
        .map(|e| (e.method, e.path.as_str()))
        .collect();
    assert_eq!(
        routes,
        vec![
            (HttpMethod::Get, "/widgets"),
            (HttpMethod::Get, "/widgets/{id}"),
            (HttpMethod::Post, "/widgets"),
        ]
    );
}

#[test]
fn test_malformed_structured_input_is_rejected() {
    assert!(parse(InputFormat::OpenApi, "openapi: [unterminated").is_err());
    assert!(parse(InputFormat::Postman, r#"{"item": 7}"#).is_err());
}

#[test]
fn test_format_tag_is_never_overridden_by_content() {
    // A Postman collection handed to the OpenAPI normalizer is not re-routed
    if let Ok(api) = parse(InputFormat::OpenApi, STORE) {
        assert!(api.endpoints.is_empty());
    }
    // The HTML normalizer finds nothing in JSON without verb/path text
    let api = parse(InputFormat::Html, r#"{"info": {"name": "x"}}"#).unwrap();
    assert!(api.endpoints.is_empty());
}
