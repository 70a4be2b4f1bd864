//! The request and auth modules every target emits share one runtime contract

use clientforge::generation::CLIENT_DEFAULTS;
use clientforge::{ArtifactMap, InputFormat, Target, generate, parse};

const PETS: &str = r#"{"openapi":"3.0.0","info":{"title":"Pets","version":"1.0"},"paths":{"/pets/{id}":{"get":{"operationId":"getPet","parameters":[{"name":"id","in":"path","required":true,"schema":{"type":"string"}}]}}}}"#;

/// Rendered sources of one target, with the markers its contract is written in
struct Emitted {
    target: Target,
    artifacts: ArtifactMap,
    request: &'static str,
    auth: &'static str,
    config: &'static str,
}

impl Emitted {
    fn file(&self, path: &str) -> &str {
        self.artifacts
            .get(path)
            .unwrap_or_else(|| panic!("{}: missing {path}", self.target))
    }

    fn request(&self) -> &str {
        self.file(self.request)
    }

    fn auth(&self) -> &str {
        self.file(self.auth)
    }

    fn config(&self) -> &str {
        self.file(self.config)
    }
}

fn emitted(raw: &str) -> Vec<Emitted> {
    let api = parse(InputFormat::OpenApi, raw).unwrap();
    let paths = [
        (
            Target::Python,
            "src/pets_client/request.py",
            "src/pets_client/auth.py",
            "src/pets_client/config.py",
        ),
        (Target::TypeScript, "src/request.ts", "src/auth.ts", "src/config.ts"),
        (Target::Go, "request.go", "auth.go", "config.go"),
        (Target::Rust, "src/request.rs", "src/auth.rs", "src/config.rs"),
    ];
    paths
        .into_iter()
        .map(|(target, request, auth, config)| Emitted {
            target,
            artifacts: generate(&api, target).unwrap(),
            request,
            auth,
            config,
        })
        .collect()
}

#[test]
fn test_backoff_constants_come_from_client_defaults() {
    let base = CLIENT_DEFAULTS.backoff_base_ms;
    let cap = CLIENT_DEFAULTS.backoff_cap_ms;
    assert_eq!((base, cap), (1000, 10000));

    for e in emitted(PETS) {
        let (base_decl, cap_decl) = match e.target {
            Target::Python => (
                format!("BACKOFF_BASE_MS = {base}"),
                format!("BACKOFF_CAP_MS = {cap}"),
            ),
            Target::TypeScript => (
                format!("export const BACKOFF_BASE_MS = {base};"),
                format!("export const BACKOFF_CAP_MS = {cap};"),
            ),
            Target::Go => (
                format!("backoffBaseMs = {base}"),
                format!("backoffCapMs  = {cap}"),
            ),
            Target::Rust => (
                format!("pub const BACKOFF_BASE_MS: u64 = {base};"),
                format!("pub const BACKOFF_CAP_MS: u64 = {cap};"),
            ),
        };
        assert!(e.request().contains(&base_decl), "{}: no `{base_decl}`", e.target);
        assert!(e.request().contains(&cap_decl), "{}: no `{cap_decl}`", e.target);
    }
}

#[test]
fn test_timeout_and_attempts_come_from_client_defaults() {
    let timeout = CLIENT_DEFAULTS.timeout_ms.to_string();
    let retries = CLIENT_DEFAULTS.max_retries.to_string();
    for e in emitted(PETS) {
        assert!(e.config().contains(&timeout), "{}: timeout missing", e.target);
        assert!(e.config().contains(&retries), "{}: max retries missing", e.target);
    }
}

#[test]
fn test_only_429_among_client_errors_is_retried() {
    for e in emitted(PETS) {
        let rule = match e.target {
            Target::Python => "return status == 429 or not 400 <= status < 500",
            Target::TypeScript => "return status === 429 || status < 400 || status >= 500;",
            Target::Go => "return status == http.StatusTooManyRequests || status < 400 || status >= 500",
            Target::Rust => "status == 429 || !(400..500).contains(&status)",
        };
        assert!(e.request().contains(rule), "{}: retry rule `{rule}` missing", e.target);
    }
}

#[test]
fn test_path_values_are_substituted_unescaped() {
    for e in emitted(PETS) {
        let request = e.request();
        for escape in ["encodeURIComponent", "url.PathEscape", "quote(", "encode_component(&value"] {
            assert!(!request.contains(escape), "{}: path values escaped with {escape}", e.target);
        }
        let plain = match e.target {
            Target::Python => "return str(value)",
            Target::TypeScript => "return String(value);",
            Target::Go => "strings.ReplaceAll(path, placeholder, fmt.Sprint(value))",
            Target::Rust => "pub fn path_value(value: impl std::fmt::Display) -> String {\n    value.to_string()\n}",
        };
        assert!(request.contains(plain), "{}: `{plain}` missing", e.target);
    }
}

#[test]
fn test_auth_modules_follow_the_header_table() {
    for e in emitted(PETS) {
        let auth = e.auth();
        for marker in ["\"bearer\"", "\"apiKey\"", "\"basic\"", "\"oauth2\"", "Bearer ", "Basic "] {
            assert!(auth.contains(marker), "{}: auth lacks {marker}", e.target);
        }
        assert!(auth.contains("API_KEY or API_BEARER_TOKEN"), "{}", e.target);
        assert!(
            e.config().contains(&format!("\"{}\"", CLIENT_DEFAULTS.api_key_header)),
            "{}: default API key header missing",
            e.target
        );
    }
}

#[test]
fn test_declared_api_key_header_becomes_the_default() {
    let raw = r#"{"openapi":"3.0.0","info":{"title":"Pets","version":"1.0"},
        "components":{"securitySchemes":{"k":{"type":"apiKey","in":"header","name":"X-Pet-Key"}}},
        "security":[{"k":[]}],
        "paths":{"/pets":{"get":{"operationId":"listPets"}}}}"#;
    for e in emitted(raw) {
        assert!(e.config().contains("\"X-Pet-Key\""), "{}", e.target);
        assert!(e.file(".env.example").contains("API_AUTH_TYPE=apiKey"), "{}", e.target);
    }
}

#[test]
fn test_query_api_key_is_sent_as_a_header_of_that_name() {
    let raw = r#"{"openapi":"3.0.0","info":{"title":"Pets","version":"1.0"},
        "components":{"securitySchemes":{"k":{"type":"apiKey","in":"query","name":"api_key"}}},
        "security":[{"k":[]}],
        "paths":{"/pets":{"get":{"operationId":"listPets"}}}}"#;
    for e in emitted(raw) {
        assert!(e.config().contains("\"api_key\""), "{}", e.target);
        assert!(e.file(".env.example").contains("API_AUTH_HEADER_NAME=api_key"), "{}", e.target);
    }
}
