//! Postman collection (v2.x) normalizer
//!
//! Walks the item tree depth first. Folders contribute tags; every leaf request
//! becomes an endpoint, duplicates across folders included.

use serde_json::Value as JsonValue;

use crate::core::{
    ApiDescription, ApiKeyLocation, AuthMethod, DEFAULT_MEDIA_TYPE, Endpoint, HttpMethod,
    Parameter, ParameterLocation, RequestBody, ResponseSpec, SchemaSketch,
};
use crate::normalization::sketch::{sketch_from_example, sketch_from_fields};
use crate::normalization::{InputFormat, Normalizer, ParseError};

/// Collection variables recognised as the base URL, in lookup order
const BASE_URL_VARIABLES: &[&str] = &["baseUrl", "BASE_URL", "url"];

/// Headers that carry transport concerns rather than API parameters
const IGNORED_HEADERS: &[&str] = &["content-type", "authorization"];

#[derive(Debug, Default)]
pub struct PostmanNormalizer;

impl PostmanNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for PostmanNormalizer {
    fn format(&self) -> InputFormat {
        InputFormat::Postman
    }

    fn normalize(&self, raw: &str) -> Result<ApiDescription, ParseError> {
        let collection: JsonValue = serde_json::from_str(raw)?;
        if !collection.is_object() {
            return Err(ParseError::invalid("collection", "expected an object at the root"));
        }
        let items = collection
            .get("item")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| ParseError::missing("item"))?;

        let info = collection.get("info");
        let mut walker = CollectionWalker::default();
        walker.walk(items, &mut Vec::new());

        let auth_method = collection
            .get("auth")
            .and_then(auth_from_postman)
            .or(walker.first_request_auth)
            .unwrap_or_default();

        tracing::debug!(
            endpoints = walker.endpoints.len(),
            skipped = walker.skipped,
            "Postman collection walked"
        );

        Ok(ApiDescription {
            base_url: base_url_variable(&collection),
            auth_method,
            title: info
                .and_then(|i| i.get("name"))
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string(),
            version: info.and_then(|i| i.get("version")).map(version_text).unwrap_or_default(),
            description: info.and_then(|i| i.get("description")).map(text_of).unwrap_or_default(),
            endpoints: walker.endpoints,
        }
        .finalize())
    }
}

#[derive(Default)]
struct CollectionWalker {
    endpoints: Vec<Endpoint>,
    first_request_auth: Option<AuthMethod>,
    skipped: usize,
}

impl CollectionWalker {
    fn walk(&mut self, items: &[JsonValue], folders: &mut Vec<String>) {
        for item in items {
            let name = item
                .get("name")
                .and_then(JsonValue::as_str)
                .unwrap_or_default();

            if let Some(children) = item.get("item").and_then(JsonValue::as_array) {
                folders.push(name.to_string());
                self.walk(children, folders);
                folders.pop();
            } else if let Some(request) = item.get("request") {
                match self.build_endpoint(name, item, request, folders) {
                    Some(endpoint) => self.endpoints.push(endpoint),
                    None => self.skipped += 1,
                }
            }
        }
    }

    fn build_endpoint(
        &mut self,
        name: &str,
        item: &JsonValue,
        request: &JsonValue,
        folders: &[String],
    ) -> Option<Endpoint> {
        // A request may be given as a bare URL string
        let (method_text, url) = match request {
            JsonValue::String(url) => ("GET", Some(request).filter(|_| !url.is_empty())),
            _ => (
                request
                    .get("method")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("GET"),
                request.get("url"),
            ),
        };

        let method = match method_text.parse::<HttpMethod>() {
            Ok(method) => method,
            Err(_) => {
                tracing::warn!(request = %name, method = %method_text, "Skipping request with unsupported HTTP method");
                return None;
            }
        };

        let parsed_url = url.map(parse_url).unwrap_or_default();
        let mut endpoint = Endpoint::new(method, parsed_url.path);
        endpoint.operation_id = name.to_string();
        endpoint.summary = name.to_string();
        endpoint.description = request
            .get("description")
            .map(text_of)
            .unwrap_or_default();
        if !folders.is_empty() {
            endpoint.tags.push(folders.join("/"));
        }

        endpoint.parameters.extend(parsed_url.parameters);
        endpoint.parameters.extend(header_parameters(request.get("header")));
        endpoint.request_body = request.get("body").and_then(parse_body);

        for example in item
            .get("response")
            .and_then(JsonValue::as_array)
            .into_iter()
            .flatten()
        {
            if let Some((code, spec)) = parse_saved_response(example) {
                endpoint.responses.entry(code).or_insert(spec);
            }
        }

        if self.first_request_auth.is_none() {
            self.first_request_auth = request.get("auth").and_then(auth_from_postman);
        }
        Some(endpoint)
    }
}

#[derive(Default)]
struct ParsedUrl {
    path: String,
    parameters: Vec<Parameter>,
}

fn parse_url(url: &JsonValue) -> ParsedUrl {
    let mut parsed = ParsedUrl::default();
    let raw = match url {
        JsonValue::String(raw) => Some(raw.as_str()),
        _ => url.get("raw").and_then(JsonValue::as_str),
    };

    let segments: Vec<String> = url
        .get("path")
        .map(|path| match path {
            JsonValue::String(s) => s.split('/').map(str::to_string).collect(),
            JsonValue::Array(parts) => parts
                .iter()
                .filter_map(|p| {
                    p.as_str()
                        .or_else(|| p.get("value").and_then(JsonValue::as_str))
                        .map(str::to_string)
                })
                .collect(),
            _ => Vec::new(),
        })
        .unwrap_or_default();

    let (raw_path, raw_query) = raw.map(split_raw_url).unwrap_or_default();
    parsed.path = if segments.is_empty() {
        raw_path
    } else {
        segments
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("/")
    };

    // Path variables documented on the URL object
    for variable in url
        .get("variable")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
    {
        let Some(key) = variable.get("key").and_then(JsonValue::as_str) else {
            continue;
        };
        let mut param = Parameter::new(key, ParameterLocation::Path, true);
        param.description = variable.get("description").map(text_of).unwrap_or_default();
        param.example = example_value(variable.get("value"));
        parsed.parameters.push(param);
    }

    match url.get("query").and_then(JsonValue::as_array) {
        Some(query) => {
            for entry in query {
                if entry.get("disabled").and_then(JsonValue::as_bool) == Some(true) {
                    continue;
                }
                let Some(key) = entry.get("key").and_then(JsonValue::as_str) else {
                    continue;
                };
                if parsed.parameters.iter().any(|p| p.name == key) {
                    continue;
                }
                let mut param = Parameter::new(key, ParameterLocation::Query, false);
                param.description = entry.get("description").map(text_of).unwrap_or_default();
                param.example = example_value(entry.get("value"));
                parsed.parameters.push(param);
            }
        }
        None => {
            for (key, value) in raw_query {
                if parsed.parameters.iter().any(|p| p.name == key) {
                    continue;
                }
                let mut param = Parameter::new(key, ParameterLocation::Query, false);
                param.example = example_value(Some(&JsonValue::String(value)));
                parsed.parameters.push(param);
            }
        }
    }
    parsed
}

/// Splits a raw Postman URL into its path and query pairs, dropping scheme,
/// host and a leading `{{variable}}` host placeholder
fn split_raw_url(raw: &str) -> (String, Vec<(String, String)>) {
    let (before_query, query) = match raw.split_once('?') {
        Some((before, query)) => (before, query),
        None => (raw, ""),
    };
    let before_query = before_query.split('#').next().unwrap_or_default();

    let mut rest = before_query.trim();
    if let Some((_, after_scheme)) = rest.split_once("://") {
        rest = after_scheme.find('/').map_or("", |i| &after_scheme[i..]);
    } else if rest.starts_with("{{") {
        rest = rest
            .find("}}")
            .map_or("", |i| &rest[i + 2..]);
    } else if !rest.starts_with('/') {
        // host without scheme, e.g. `api.example.com/pets`
        rest = rest.find('/').map_or("", |i| &rest[i..]);
    }

    let pairs = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect();
    (rest.to_string(), pairs)
}

fn header_parameters(headers: Option<&JsonValue>) -> Vec<Parameter> {
    headers
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
        .filter(|h| h.get("disabled").and_then(JsonValue::as_bool) != Some(true))
        .filter_map(|h| {
            let key = h.get("key").and_then(JsonValue::as_str)?;
            if IGNORED_HEADERS.contains(&key.to_ascii_lowercase().as_str()) {
                return None;
            }
            let mut param = Parameter::new(key, ParameterLocation::Header, false);
            param.description = h.get("description").map(text_of).unwrap_or_default();
            param.example = example_value(h.get("value"));
            Some(param)
        })
        .collect()
}

fn parse_body(body: &JsonValue) -> Option<RequestBody> {
    let mode = body.get("mode").and_then(JsonValue::as_str)?;
    match mode {
        "raw" => {
            let raw = body.get("raw").and_then(JsonValue::as_str)?;
            if raw.trim().is_empty() {
                return None;
            }
            let parsed = serde_json::from_str::<JsonValue>(raw).ok();
            let language = body
                .get("options")
                .and_then(|o| o.get("raw"))
                .and_then(|r| r.get("language"))
                .and_then(JsonValue::as_str);
            let media_type = match language {
                Some("json") => DEFAULT_MEDIA_TYPE,
                Some("xml") => "application/xml",
                Some("text") => "text/plain",
                Some("html") => "text/html",
                Some("javascript") => "application/javascript",
                _ if parsed.is_some() => DEFAULT_MEDIA_TYPE,
                _ => "text/plain",
            };
            let schema = match parsed {
                Some(value) => sketch_from_example(&value),
                None => SchemaSketch {
                    schema_type: "string".to_string(),
                    example: Some(JsonValue::String(raw.to_string())),
                    ..Default::default()
                },
            };
            Some(RequestBody {
                required: true,
                media_type: media_type.to_string(),
                schema,
            })
        }
        "urlencoded" | "formdata" => {
            let fields: Vec<(String, String)> = body
                .get(mode)
                .and_then(JsonValue::as_array)
                .into_iter()
                .flatten()
                .filter(|f| f.get("disabled").and_then(JsonValue::as_bool) != Some(true))
                .filter_map(|f| {
                    let key = f.get("key").and_then(JsonValue::as_str)?;
                    let kind = match f.get("type").and_then(JsonValue::as_str) {
                        Some("file") => "file",
                        _ => "string",
                    };
                    Some((key.to_string(), kind.to_string()))
                })
                .collect();
            let media_type = if mode == "formdata" {
                "multipart/form-data"
            } else {
                "application/x-www-form-urlencoded"
            };
            Some(RequestBody {
                required: !fields.is_empty(),
                media_type: media_type.to_string(),
                schema: sketch_from_fields(fields.iter().map(|(k, t)| (k.as_str(), t.as_str()))),
            })
        }
        other => {
            tracing::debug!(mode = %other, "Ignoring unsupported Postman body mode");
            None
        }
    }
}

/// Saved example response keyed by its status code
fn parse_saved_response(example: &JsonValue) -> Option<(String, ResponseSpec)> {
    let code = example.get("code").and_then(JsonValue::as_u64)?;
    let description = example
        .get("name")
        .or_else(|| example.get("status"))
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();
    let media_type = example
        .get("header")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
        .find(|h| {
            h.get("key")
                .and_then(JsonValue::as_str)
                .is_some_and(|k| k.eq_ignore_ascii_case("content-type"))
        })
        .and_then(|h| h.get("value").and_then(JsonValue::as_str))
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string());
    let schema = example
        .get("body")
        .and_then(JsonValue::as_str)
        .and_then(|b| serde_json::from_str::<JsonValue>(b).ok())
        .map(|v| sketch_from_example(&v));

    Some((
        code.to_string(),
        ResponseSpec {
            description,
            media_type,
            schema,
        },
    ))
}

/// Maps a Postman `auth` block; `noauth` and unsupported schemes yield `None`
fn auth_from_postman(auth: &JsonValue) -> Option<AuthMethod> {
    let kind = auth.get("type").and_then(JsonValue::as_str)?;
    match kind {
        "bearer" => Some(AuthMethod::Bearer { description: None }),
        "basic" => Some(AuthMethod::Basic { description: None }),
        "oauth2" => Some(AuthMethod::OAuth2 { description: None }),
        "apikey" => {
            let setting = |name: &str| {
                auth.get("apikey")
                    .and_then(JsonValue::as_array)
                    .into_iter()
                    .flatten()
                    .find(|e| e.get("key").and_then(JsonValue::as_str) == Some(name))
                    .and_then(|e| e.get("value").and_then(JsonValue::as_str))
            };
            let location = match setting("in") {
                Some("query") => ApiKeyLocation::Query,
                _ => ApiKeyLocation::Header,
            };
            Some(AuthMethod::api_key(setting("key"), location))
        }
        other => {
            if other != "noauth" {
                tracing::debug!(auth = %other, "Unsupported Postman auth type treated as none");
            }
            None
        }
    }
}

fn base_url_variable(collection: &JsonValue) -> String {
    let variables = collection
        .get("variable")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    BASE_URL_VARIABLES
        .iter()
        .find_map(|wanted| {
            variables
                .iter()
                .find(|v| v.get("key").and_then(JsonValue::as_str) == Some(*wanted))
                .and_then(|v| v.get("value").and_then(JsonValue::as_str))
        })
        .unwrap_or_default()
        .to_string()
}

/// Postman descriptions are either a string or `{ "content": ... }`
fn text_of(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        _ => value
            .get("content")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

/// Version is a string or `{ major, minor, patch }`
fn version_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Object(_) => {
            let part = |k: &str| value.get(k).and_then(JsonValue::as_u64).unwrap_or(0);
            format!("{}.{}.{}", part("major"), part("minor"), part("patch"))
        }
        _ => String::new(),
    }
}

fn example_value(value: Option<&JsonValue>) -> Option<JsonValue> {
    match value {
        Some(JsonValue::String(s)) if s.is_empty() => None,
        Some(JsonValue::Null) | None => None,
        Some(v) => Some(v.clone()),
    }
}
