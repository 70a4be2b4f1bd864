//! Heuristic normalizer for free-form HTML documentation
//!
//! Best effort only. Malformed markup or missing evidence degrades to empty
//! or default fields; this normalizer never returns an error.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::core::{
    ApiDescription, ApiKeyLocation, AuthMethod, Endpoint, HttpMethod, Parameter,
    ParameterLocation, normalize_path,
};
use crate::normalization::{InputFormat, Normalizer, ParseError};

const VERBS: &str = "GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS";
const PATH: &str = r#"(?:https?://[^\s/"'<>]+)?(/[^\s"'<>`]*)"#;

static CANDIDATES: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        r#"h1, h2, h3, h4, h5, h6, code, pre, [class*="endpoint"], [class*="api"], [class*="route"]"#,
    )
    .expect("valid candidate selector")
});
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).expect("valid selector"));
static CODE_BLOCKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("code, pre").expect("valid selector"));

/// `METHOD path`, `path METHOD`, `METHOD: path`, tried in that order
static SHAPES: Lazy<[(Regex, usize, usize); 3]> = Lazy::new(|| {
    [
        (
            Regex::new(&format!(r"\b({VERBS})\s+{PATH}")).expect("valid shape regex"),
            1,
            2,
        ),
        (
            Regex::new(&format!(r"{PATH}\s+({VERBS})\b")).expect("valid shape regex"),
            2,
            1,
        ),
        (
            Regex::new(&format!(r"\b({VERBS}):\s*{PATH}")).expect("valid shape regex"),
            1,
            2,
        ),
    ]
});
static ABSOLUTE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s"'<>`]+"#).expect("valid url regex"));
static BASE_URL_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)base[\s_-]*url\b.{0,20}?(https?://[^\s"'<>`]+)"#).expect("valid base url regex")
});
static METHOD_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"^({VERBS})\b")).expect("valid prefix regex"));
static PATH_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid path param regex"));
static QUERY_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]([A-Za-z_][A-Za-z0-9_\-]*)=").expect("valid query regex"));
static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*:\s*[^\s,;]+").expect("valid key value regex")
});

/// Verb inference keywords for bare URLs, checked in order
static VERB_KEYWORDS: Lazy<Vec<(Regex, HttpMethod)>> = Lazy::new(|| {
    [
        (r"\b(get|retrieve)\b", HttpMethod::Get),
        (r"\b(post|create)\b", HttpMethod::Post),
        (r"\b(put|update)\b", HttpMethod::Put),
        (r"\b(delete|remove)\b", HttpMethod::Delete),
        (r"\bpatch\b", HttpMethod::Patch),
    ]
    .into_iter()
    .map(|(pattern, method)| (Regex::new(pattern).expect("valid verb regex"), method))
    .collect()
});

/// Auth keyword table; first entry found in the text wins
const AUTH_KEYWORDS: &[(&[&str], &str)] = &[
    (&["bearer"], "bearer"),
    (&["api key", "api-key", "apikey", "x-api-key"], "apiKey"),
    (&["basic auth"], "basic"),
    (&["oauth"], "oauth2"),
];

const DESCRIPTION_LEN: std::ops::RangeInclusive<usize> = 10..=200;

#[derive(Debug, Default)]
pub struct HtmlNormalizer;

impl HtmlNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for HtmlNormalizer {
    fn format(&self) -> InputFormat {
        InputFormat::Html
    }

    fn normalize(&self, raw: &str) -> Result<ApiDescription, ParseError> {
        let document = Html::parse_document(raw);
        let full_text = element_text(document.root_element(), " ");

        let endpoints = discover_endpoints(&document);
        tracing::debug!(endpoints = endpoints.len(), "HTML heuristics finished");

        Ok(ApiDescription {
            base_url: infer_base_url(&document, &full_text),
            auth_method: infer_auth(&full_text),
            title: infer_title(&document),
            version: String::new(),
            description: document
                .select(&META_DESCRIPTION)
                .next()
                .and_then(|meta| meta.value().attr("content"))
                .map(|c| c.trim().to_string())
                .unwrap_or_default(),
            endpoints,
        }
        .finalize())
    }
}

fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    element.text().collect::<Vec<_>>().join(separator)
}

fn infer_title(document: &Html) -> String {
    document
        .select(&TITLE)
        .chain(document.select(&H1))
        .map(|el| collapse_whitespace(&element_text(el, "")))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// "base url" phrase first, then the origin of the first URL in a code block
fn infer_base_url(document: &Html, full_text: &str) -> String {
    if let Some(captures) = BASE_URL_PHRASE.captures(full_text) {
        return trim_trailing_punctuation(&captures[1]).to_string();
    }
    document
        .select(&CODE_BLOCKS)
        .find_map(|block| {
            let text = element_text(block, "");
            let found = ABSOLUTE_URL.find(&text)?;
            let url = Url::parse(trim_trailing_punctuation(found.as_str())).ok()?;
            Some(url.origin().ascii_serialization())
        })
        .unwrap_or_default()
}

fn infer_auth(full_text: &str) -> AuthMethod {
    let lowered = full_text.to_lowercase();
    let kind = AUTH_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, kind)| *kind);
    match kind {
        Some("bearer") => AuthMethod::Bearer { description: None },
        Some("apiKey") => AuthMethod::api_key(None, ApiKeyLocation::Header),
        Some("basic") => AuthMethod::Basic { description: None },
        Some("oauth2") => AuthMethod::OAuth2 { description: None },
        _ => AuthMethod::default(),
    }
}

fn discover_endpoints(document: &Html) -> Vec<Endpoint> {
    let mut seen: HashSet<(HttpMethod, String)> = HashSet::new();
    let mut endpoints = Vec::new();

    for candidate in document.select(&CANDIDATES) {
        let text = element_text(candidate, "");
        let Some((method, raw_path)) = match_endpoint(&text) else {
            continue;
        };

        let (path, query) = match raw_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw_path.as_str(), None),
        };
        let path = normalize_path(trim_trailing_punctuation(path));
        if !seen.insert((method, path.clone())) {
            tracing::debug!(%method, %path, "Skipping duplicate endpoint candidate");
            continue;
        }

        let mut endpoint = Endpoint::new(method, path);
        endpoint.description = infer_description(candidate).unwrap_or_default();
        endpoint.parameters = infer_parameters(&text, &endpoint.path, query);
        endpoints.push(endpoint);
    }
    endpoints
}

/// Tries the three explicit shapes, then a bare absolute URL with an inferred verb
fn match_endpoint(text: &str) -> Option<(HttpMethod, String)> {
    for (shape, method_group, path_group) in SHAPES.iter() {
        if let Some(captures) = shape.captures(text) {
            let method = captures[*method_group].parse::<HttpMethod>().ok()?;
            return Some((method, captures[*path_group].to_string()));
        }
    }

    // Path is cut by hand; `Url` would percent-encode `{name}` placeholders
    let found = trim_trailing_punctuation(ABSOLUTE_URL.find(text)?.as_str());
    let (_, after_scheme) = found.split_once("://")?;
    let path = &after_scheme[after_scheme.find('/')?..];
    if path == "/" {
        return None;
    }
    let lowered = text.to_lowercase();
    let method = VERB_KEYWORDS
        .iter()
        .find(|(keyword, _)| keyword.is_match(&lowered))
        .map(|(_, method)| *method)
        .unwrap_or(HttpMethod::Get);
    tracing::debug!(%method, url = %found, "Inferred verb for bare URL");
    Some((method, path.to_string()))
}

/// First 10-200 character line after the candidate, up to the next endpoint candidate
fn infer_description(candidate: ElementRef<'_>) -> Option<String> {
    let sibling_text = candidate
        .next_siblings()
        .map_while(|node| match ElementRef::wrap(node) {
            Some(element) if is_endpoint_candidate(element) => None,
            Some(element) => Some(element_text(element, "\n")),
            None => Some(node.value().as_text().map(|t| t.to_string()).unwrap_or_default()),
        })
        .collect::<Vec<_>>();
    let own = match_endpoint(&element_text(candidate, ""));
    let parent_text = candidate
        .parent()
        .and_then(ElementRef::wrap)
        .filter(|parent| {
            parent
                .select(&CANDIDATES)
                .filter_map(|inner| match_endpoint(&element_text(inner, "")))
                .all(|found| Some(found) == own)
        })
        .map(|parent| element_text(parent, "\n"));

    sibling_text
        .into_iter()
        .chain(parent_text)
        .flat_map(|block| {
            block
                .lines()
                .map(collapse_whitespace)
                .collect::<Vec<_>>()
        })
        .find(|line| DESCRIPTION_LEN.contains(&line.chars().count()) && !METHOD_PREFIX.is_match(line))
}

/// Matches the candidate selector and names an endpoint, or holds one that does
fn is_endpoint_candidate(element: ElementRef<'_>) -> bool {
    let matches_self = CANDIDATES.matches(&element) && match_endpoint(&element_text(element, "")).is_some();
    matches_self
        || element
            .select(&CANDIDATES)
            .any(|inner| match_endpoint(&element_text(inner, "")).is_some())
}

fn infer_parameters(text: &str, path: &str, query: Option<&str>) -> Vec<Parameter> {
    let mut params: Vec<Parameter> = Vec::new();
    let mut push = |name: &str, location: ParameterLocation| {
        if params.iter().any(|p| p.name == name) {
            return;
        }
        params.push(Parameter::new(name, location, false));
    };

    for captures in PATH_PARAM.captures_iter(path).chain(PATH_PARAM.captures_iter(text)) {
        push(&captures[1], ParameterLocation::Path);
    }
    if let Some(query) = query {
        for pair in query.split('&') {
            let key = pair.split('=').next().unwrap_or_default();
            if !key.is_empty() {
                push(key, ParameterLocation::Query);
            }
        }
    }
    for captures in QUERY_PARAM.captures_iter(text) {
        push(&captures[1], ParameterLocation::Query);
    }
    for captures in KEY_VALUE.captures_iter(text) {
        let key = &captures[1];
        let lowered = key.to_ascii_lowercase();
        if key.parse::<HttpMethod>().is_ok() || lowered == "http" || lowered == "https" {
            continue;
        }
        push(key, ParameterLocation::Query);
    }
    params
}

fn trim_trailing_punctuation(s: &str) -> &str {
    s.trim_end_matches(['.', ',', ';', ':', '!', ')', ']', '\'', '"'])
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(html: &str) -> ApiDescription {
        HtmlNormalizer::new().normalize(html).unwrap()
    }

    const DOCS: &str = r#"
<html>
<head>
  <title>Acme Users API</title>
  <meta name="description" content="Manage users and their posts">
</head>
<body>
  <h1>Acme</h1>
  <p>The base URL is https://api.acme.test/v1.</p>
  <p>Send your token as a Bearer token in the Authorization header.</p>
  <h3>GET /users</h3>
  <p>Returns every user in the account.</p>
  <h3>POST /users</h3>
  <p>Creates a new user record.</p>
  <pre><code>GET /users</code></pre>
  <div class="endpoint">DELETE: /users/{userId}</div>
  <h3>/users/{userId}/posts PATCH</h3>
</body>
</html>"#;

    #[test]
    fn test_full_document() {
        let api = normalize(DOCS);
        assert_eq!(api.title, "Acme Users API");
        assert_eq!(api.description, "Manage users and their posts");
        assert_eq!(api.base_url, "https://api.acme.test/v1");
        assert_eq!(api.auth_method.kind(), "bearer");

        let pairs: Vec<_> = api
            .endpoints
            .iter()
            .map(|e| (e.method, e.path.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (HttpMethod::Get, "/users"),
                (HttpMethod::Post, "/users"),
                (HttpMethod::Delete, "/users/{userId}"),
                (HttpMethod::Patch, "/users/{userId}/posts"),
            ]
        );
        assert_eq!(api.endpoints[0].description, "Returns every user in the account.");
        assert_eq!(api.endpoints[1].description, "Creates a new user record.");
        assert_eq!(api.endpoints[2].parameters[0].name, "userId");
        assert_eq!(api.endpoints[2].parameters[0].location, ParameterLocation::Path);
    }

    #[test]
    fn test_duplicates_collapse_first_wins() {
        let api = normalize(
            r#"<h2>GET /status</h2><p>First description of status.</p>
               <h2>GET /status</h2><p>Second description of status.</p>"#,
        );
        assert_eq!(api.endpoints.len(), 1);
        assert_eq!(api.endpoints[0].description, "First description of status.");
    }

    #[test]
    fn test_bare_url_verb_inference() {
        let api = normalize(
            r#"<code>Create an order: https://shop.test/api/orders</code>
               <code>Remove https://shop.test/api/orders/{id}</code>
               <code>https://shop.test/api/health</code>"#,
        );
        let pairs: Vec<_> = api
            .endpoints
            .iter()
            .map(|e| (e.method, e.path.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (HttpMethod::Post, "/api/orders"),
                (HttpMethod::Delete, "/api/orders/{id}"),
                (HttpMethod::Get, "/api/health"),
            ]
        );
        assert_eq!(api.base_url, "https://shop.test");
    }

    #[test]
    fn test_parameter_inference() {
        let api = normalize("<pre>GET /search?q=term&amp;page=2 limit: 10</pre>");
        let endpoint = &api.endpoints[0];
        assert_eq!(endpoint.path, "/search");
        let names: Vec<_> = endpoint.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["q", "page", "limit"]);
        assert!(endpoint.parameters.iter().all(|p| !p.required));
        assert!(endpoint.parameters.iter().all(|p| p.param_type == "string"));
    }

    #[test]
    fn test_auth_keywords() {
        assert_eq!(
            normalize("<p>Pass your API key in a header.</p>").auth_method,
            AuthMethod::api_key(None, ApiKeyLocation::Header)
        );
        assert_eq!(normalize("<p>Uses Basic Auth.</p>").auth_method.kind(), "basic");
        assert_eq!(normalize("<p>OAuth 2.0 flows.</p>").auth_method.kind(), "oauth2");
        assert_eq!(normalize("<p>Open data.</p>").auth_method.kind(), "none");
    }

    #[test]
    fn test_path_parameters_are_optional() {
        let api = normalize("<h3>GET /users/{userId}</h3>");
        let param = &api.endpoints[0].parameters[0];
        assert_eq!(param.location, ParameterLocation::Path);
        assert!(!param.required);
    }

    #[test]
    fn test_description_stops_at_next_endpoint() {
        let api = normalize(
            r#"<h3>GET /users</h3>
               <h3>POST /users</h3>
               <p>Creates a new user record.</p>"#,
        );
        assert_eq!(api.endpoints[0].description, "");
        assert_eq!(api.endpoints[1].description, "Creates a new user record.");
    }

    #[test]
    fn test_description_from_enclosing_item() {
        let api = normalize(
            r#"<ul><li><code>GET /health</code>
               Reports whether the service is up.</li>
               <li><code>GET /version</code></li></ul>"#,
        );
        assert_eq!(api.endpoints[0].description, "Reports whether the service is up.");
        assert_eq!(api.endpoints[1].description, "");
    }

    #[test]
    fn test_description_may_start_with_a_verb_word() {
        let api = normalize("<h3>GET /users</h3><p>Get all users in the account.</p>");
        assert_eq!(api.endpoints[0].description, "Get all users in the account.");
    }

    #[test]
    fn test_never_fails() {
        for input in ["", "<<<>>>", "<div><h2>GET", "\u{0}\u{1}binary", "<p>no endpoints</p>"] {
            let api = normalize(input);
            assert_eq!(api.title, "API");
            assert!(api.endpoints.is_empty());
        }
    }

    #[test]
    fn test_colon_placeholders_normalized() {
        let api = normalize("<h4>PUT /teams/:teamId/members.</h4>");
        assert_eq!(api.endpoints[0].path, "/teams/{teamId}/members");
        assert_eq!(api.endpoints[0].parameters[0].name, "teamId");
    }
}
