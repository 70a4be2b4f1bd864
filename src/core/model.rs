//! Canonical API model
//!
//! Every normalizer produces an [`ApiDescription`] and every emitter reads one.
//! The model is built once per parse call, then treated as immutable.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::utils::{is_bare_identifier, sanitize_identifier};

pub const DEFAULT_TITLE: &str = "API";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_.\-]+)\}").expect("valid placeholder regex"));
static COLON_PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/:([A-Za-z_][A-Za-z0-9_]*)").expect("valid colon param regex"));
static DOUBLE_BRACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid double brace regex"));

/// Root of the canonical model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDescription {
    pub base_url: String,
    pub auth_method: AuthMethod,
    pub title: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<Endpoint>,
}

impl Default for ApiDescription {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            auth_method: AuthMethod::default(),
            title: DEFAULT_TITLE.to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: String::new(),
            endpoints: Vec::new(),
        }
    }
}

/// Authentication scheme declared (or inferred) for the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AuthMethod {
    None {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Bearer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ApiKey {
        header_name: String,
        location: ApiKeyLocation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    Basic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "oauth2")]
    OAuth2 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl Default for AuthMethod {
    fn default() -> Self {
        AuthMethod::None { description: None }
    }
}

impl AuthMethod {
    /// API key auth in a header, using the default header name when `name` is blank
    pub fn api_key(name: Option<&str>, location: ApiKeyLocation) -> Self {
        let header_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_API_KEY_HEADER)
            .to_string();
        AuthMethod::ApiKey {
            header_name,
            location,
            description: None,
        }
    }

    /// Wire name of the variant, as used in generated config (`API_AUTH_TYPE`)
    pub fn kind(&self) -> &'static str {
        match self {
            AuthMethod::None { .. } => "none",
            AuthMethod::Bearer { .. } => "bearer",
            AuthMethod::ApiKey { .. } => "apiKey",
            AuthMethod::Basic { .. } => "basic",
            AuthMethod::OAuth2 { .. } => "oauth2",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            AuthMethod::None { description }
            | AuthMethod::Bearer { description }
            | AuthMethod::ApiKey { description, .. }
            | AuthMethod::Basic { description }
            | AuthMethod::OAuth2 { description } => description.as_deref(),
        }
    }

    pub fn with_description(mut self, text: Option<String>) -> Self {
        let text = text.filter(|t| !t.trim().is_empty());
        match &mut self {
            AuthMethod::None { description }
            | AuthMethod::Bearer { description }
            | AuthMethod::ApiKey { description, .. }
            | AuthMethod::Basic { description }
            | AuthMethod::OAuth2 { description } => *description = text,
        }
        self
    }
}

/// Where an API key travels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    #[default]
    Header,
    Query,
}

/// Canonical HTTP verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Patch,
            HttpMethod::Delete,
            HttpMethod::Head,
            HttpMethod::Options,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// GET and DELETE never carry a request body in the canonical model
    pub fn allows_body(&self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for strings that are not one of the canonical verbs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

/// One HTTP operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub operation_id: String,
    pub summary: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<String, ResponseSpec>,
    #[serde(default)]
    pub security: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Endpoint {
    /// A bare endpoint with no parameters, body or documentation
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            operation_id: String::new(),
            summary: String::new(),
            description: String::new(),
            parameters: Vec::new(),
            request_body: None,
            responses: BTreeMap::new(),
            security: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    /// Placeholder names appearing in the path template, in order
    pub fn path_placeholders(&self) -> Vec<String> {
        PLACEHOLDER_RE
            .captures_iter(&self.path)
            .map(|c| c[1].to_string())
            .collect()
    }
}

/// Parameter locations the canonical model keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    #[serde(rename = "type")]
    pub param_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<JsonValue>>,
}

impl Parameter {
    /// A string-typed parameter with no documentation
    pub fn new(name: impl Into<String>, location: ParameterLocation, required: bool) -> Self {
        Self {
            name: name.into(),
            location,
            required,
            param_type: "string".to_string(),
            description: String::new(),
            example: None,
            format: None,
            enum_values: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub required: bool,
    pub media_type: String,
    pub schema: SchemaSketch,
}

/// Shallow view of a schema: top-level type and properties only
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSketch {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySketch>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySketch {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSpec {
    pub description: String,
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaSketch>,
}

/// Normalizes a path template: leading slash, `:name` and `{{name}}` placeholders as `{name}`
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut path = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };
    path = DOUBLE_BRACE_RE
        .replace_all(&path, |c: &regex::Captures| format!("{{{}}}", c[1].trim()))
        .into_owned();
    path = COLON_PARAM_RE
        .replace_all(&path, |c: &regex::Captures| format!("/{{{}}}", &c[1]))
        .into_owned();
    path
}

/// Derives an operation id from verb and path: `GET /pets/{id}` becomes `getPetsId`
pub fn derive_operation_id(method: HttpMethod, path: &str) -> String {
    let verb = method.as_str().to_ascii_lowercase();
    match sanitize_identifier(path) {
        Some(rest) => {
            let mut chars = rest.chars();
            let head = chars
                .next()
                .map(|c| c.to_ascii_uppercase().to_string())
                .unwrap_or_default();
            format!("{verb}{head}{}", chars.as_str())
        }
        None => format!("{verb}Root"),
    }
}

impl ApiDescription {
    /// Enforces the model invariants; run by every normalizer as its last step
    pub fn finalize(mut self) -> Self {
        if self.title.trim().is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        if self.version.trim().is_empty() {
            self.version = DEFAULT_VERSION.to_string();
        }
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();

        for endpoint in &mut self.endpoints {
            endpoint.path = normalize_path(&endpoint.path);
            add_missing_path_parameters(endpoint);

            if !endpoint.method.allows_body() {
                endpoint.request_body = None;
            }

            let sanitized = sanitize_identifier(&endpoint.operation_id)
                .filter(|id| is_bare_identifier(id));
            endpoint.operation_id = sanitized
                .unwrap_or_else(|| derive_operation_id(endpoint.method, &endpoint.path));
        }

        disambiguate_operation_ids(&mut self.endpoints);
        self
    }
}

fn add_missing_path_parameters(endpoint: &mut Endpoint) {
    for name in endpoint.path_placeholders() {
        let declared = endpoint
            .parameters
            .iter()
            .any(|p| p.location == ParameterLocation::Path && p.name == name);
        if !declared {
            endpoint
                .parameters
                .push(Parameter::new(name, ParameterLocation::Path, true));
        }
    }
}

/// First occurrence keeps its id; later ones get the lowest free numeric suffix from 2
fn disambiguate_operation_ids(endpoints: &mut [Endpoint]) {
    let mut taken: HashSet<String> = HashSet::new();
    for endpoint in endpoints.iter_mut() {
        if taken.insert(endpoint.operation_id.clone()) {
            continue;
        }
        let base = endpoint.operation_id.clone();
        let mut suffix = 2usize;
        while taken.contains(&format!("{base}{suffix}")) {
            suffix += 1;
        }
        let unique = format!("{base}{suffix}");
        tracing::debug!(original = %base, renamed = %unique, "Disambiguated duplicate operation id");
        taken.insert(unique.clone());
        endpoint.operation_id = unique;
    }
}
