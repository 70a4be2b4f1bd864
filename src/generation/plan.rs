//! Language-neutral client plan
//!
//! Everything every emitter has to agree on is decided here once: method
//! order, which parameters land in a signature and in what order, primitive
//! types, URL templates, body presence, auth and defaults. Context builders
//! only translate a plan into target syntax.

use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::core::{
    ApiDescription, ApiKeyLocation, AuthMethod, DEFAULT_API_KEY_HEADER, Endpoint, HttpMethod,
    Parameter, ParameterLocation,
};
use crate::generation::defaults::{CLIENT_DEFAULTS, ClientDefaults};

/// Best-effort primitive behind a parameter's declared type name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl Primitive {
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "int32" | "int64" | "long" => Primitive::Integer,
            "number" | "float" | "double" | "decimal" => Primitive::Number,
            "boolean" | "bool" => Primitive::Boolean,
            "array" => Primitive::Array,
            "object" => Primitive::Object,
            _ => Primitive::String,
        }
    }

    /// Placeholder argument used by generated tests and examples
    pub fn sample(&self) -> JsonValue {
        match self {
            Primitive::String => json!("example"),
            Primitive::Integer => json!(1),
            Primitive::Number => json!(1.5),
            Primitive::Boolean => json!(true),
            Primitive::Array => json!(["example"]),
            Primitive::Object => json!({}),
        }
    }

    /// The sample as it appears once substituted into a URL
    pub fn sample_text(&self) -> String {
        match self.sample() {
            JsonValue::String(s) => s,
            JsonValue::Array(items) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }

    /// Path segments only carry scalars
    pub fn scalar(self) -> Self {
        match self {
            Primitive::Array | Primitive::Object => Primitive::String,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamPlan {
    /// Name on the wire
    pub name: String,
    pub primitive: Primitive,
    pub required: bool,
    pub description: String,
}

impl ParamPlan {
    fn from_parameter(param: &Parameter) -> Self {
        let primitive = Primitive::from_type_name(&param.param_type);
        Self {
            name: param.name.clone(),
            primitive: match param.location {
                ParameterLocation::Path => primitive.scalar(),
                _ => primitive,
            },
            required: param.required || param.location == ParameterLocation::Path,
            description: param.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPlan {
    pub media_type: String,
    pub required: bool,
}

impl BodyPlan {
    pub fn is_json(&self) -> bool {
        self.media_type.contains("json")
    }

    pub fn is_form(&self) -> bool {
        self.media_type.starts_with("application/x-www-form-urlencoded")
            || self.media_type.starts_with("multipart/form-data")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsePlan {
    pub status: String,
    pub description: String,
}

/// One generated method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointPlan {
    pub operation_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub path_params: Vec<ParamPlan>,
    pub query_params: Vec<ParamPlan>,
    /// Documented only; header values are not part of a signature
    pub header_params: Vec<ParamPlan>,
    pub body: Option<BodyPlan>,
    pub responses: Vec<ResponsePlan>,
    /// Status a generated test stub answers with
    pub success_status: u16,
}

impl EndpointPlan {
    pub fn from_endpoint(endpoint: &Endpoint) -> Self {
        let collect = |location| {
            endpoint
                .parameters_in(location)
                .map(ParamPlan::from_parameter)
                .collect::<Vec<_>>()
        };

        let body = endpoint
            .request_body
            .as_ref()
            .filter(|_| endpoint.method.allows_body())
            .map(|body| BodyPlan {
                media_type: body.media_type.clone(),
                required: body.required,
            });

        let success_status = endpoint
            .responses
            .keys()
            .filter_map(|code| code.parse::<u16>().ok())
            .find(|code| (200..300).contains(code))
            .unwrap_or(200);

        Self {
            operation_id: endpoint.operation_id.clone(),
            method: endpoint.method,
            path: endpoint.path.clone(),
            summary: endpoint.summary.clone(),
            description: endpoint.description.clone(),
            tags: endpoint.tags.clone(),
            path_params: collect(ParameterLocation::Path),
            query_params: collect(ParameterLocation::Query),
            header_params: collect(ParameterLocation::Header),
            body,
            responses: endpoint
                .responses
                .iter()
                .map(|(status, response)| ResponsePlan {
                    status: status.clone(),
                    description: response.description.clone(),
                })
                .collect(),
            success_status,
        }
    }

    /// Declared parameter count: path + query + body-if-any
    pub fn arity(&self) -> usize {
        self.path_params.len() + self.query_params.len() + usize::from(self.body.is_some())
    }

    /// One-line human summary: summary, else description, else `METHOD path`
    pub fn headline(&self) -> String {
        [&self.summary, &self.description]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} {}", self.method, self.path))
    }

    /// Path with every placeholder replaced by its parameter's sample text
    pub fn sample_path(&self) -> String {
        self.path_params
            .iter()
            .fold(self.path.clone(), |path, param| {
                path.replace(&format!("{{{}}}", param.name), &param.primitive.sample_text())
            })
    }
}

/// Auth as generated clients send it.
///
/// Generated clients carry API keys in a header only. A key the documentation
/// places in the query string is sent in a header of the same name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthPlan {
    /// `none`, `bearer`, `apiKey`, `basic` or `oauth2`
    pub kind: &'static str,
    pub header_name: String,
    pub description: Option<String>,
}

impl AuthPlan {
    fn from_method(method: &AuthMethod) -> Self {
        let header_name = match method {
            AuthMethod::ApiKey {
                header_name,
                location,
                ..
            } => {
                if *location == ApiKeyLocation::Query {
                    tracing::warn!(
                        name = %header_name,
                        "API key is documented as a query parameter; generated clients send it as a header"
                    );
                }
                header_name.clone()
            }
            _ => DEFAULT_API_KEY_HEADER.to_string(),
        };
        Self {
            kind: method.kind(),
            header_name,
            description: method.description().map(str::to_string),
        }
    }
}

/// Whole-client plan shared by every target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientPlan {
    pub title: String,
    pub version: String,
    pub description: String,
    pub base_url: String,
    pub auth: AuthPlan,
    pub defaults: ClientDefaults,
    pub endpoints: Vec<EndpointPlan>,
}

impl ClientPlan {
    pub fn from_api(api: &ApiDescription) -> Self {
        Self {
            title: api.title.clone(),
            version: api.version.clone(),
            description: api.description.clone(),
            base_url: api.base_url.clone(),
            auth: AuthPlan::from_method(&api.auth_method),
            defaults: CLIENT_DEFAULTS,
            endpoints: api.endpoints.iter().map(EndpointPlan::from_endpoint).collect(),
        }
    }

    /// Endpoints the usage example exercises
    pub fn example_endpoints(&self) -> &[EndpointPlan] {
        &self.endpoints[..self.endpoints.len().min(2)]
    }

    /// `.env.example` entries: `(name, value, comment)`; auth lines follow the selected method
    pub fn env_entries(&self) -> Vec<EnvEntry> {
        let mut entries = vec![
            EnvEntry::new("API_BASE_URL", &self.base_url, "Base URL prepended to every request path"),
            EnvEntry::new("API_AUTH_TYPE", self.auth.kind, "none | bearer | apiKey | basic | oauth2"),
        ];
        match self.auth.kind {
            "bearer" => {
                entries.push(EnvEntry::new("API_BEARER_TOKEN", "", "Bearer token"));
                entries.push(EnvEntry::new("API_KEY", "", "Used instead of API_BEARER_TOKEN when set"));
            }
            "apiKey" => {
                entries.push(EnvEntry::new("API_KEY", "", "API key"));
                entries.push(EnvEntry::new(
                    "API_AUTH_HEADER_NAME",
                    &self.auth.header_name,
                    "Header carrying the API key",
                ));
            }
            "basic" => {
                entries.push(EnvEntry::new("API_USERNAME", "", "Basic auth username"));
                entries.push(EnvEntry::new("API_PASSWORD", "", "Basic auth password"));
            }
            "oauth2" => {
                entries.push(EnvEntry::new("API_ACCESS_TOKEN", "", "OAuth2 access token"));
            }
            _ => {}
        }
        entries.push(EnvEntry::new(
            "API_TIMEOUT_MS",
            &self.defaults.timeout_ms.to_string(),
            "Per-request timeout in milliseconds",
        ));
        entries.push(EnvEntry::new(
            "API_MAX_RETRIES",
            &self.defaults.max_retries.to_string(),
            "Total attempts per request, including the first",
        ));
        entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvEntry {
    pub name: String,
    pub value: String,
    pub comment: String,
}

impl EnvEntry {
    fn new(name: &str, value: &str, comment: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            comment: comment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RequestBody, ResponseSpec, SchemaSketch};

    fn endpoint() -> Endpoint {
        let mut endpoint = Endpoint::new(HttpMethod::Post, "/pets/{petId}/toys");
        endpoint.operation_id = "addToy".to_string();
        let mut id = Parameter::new("petId", ParameterLocation::Path, true);
        id.param_type = "integer".to_string();
        let mut tags = Parameter::new("tags", ParameterLocation::Query, false);
        tags.param_type = "array".to_string();
        endpoint.parameters = vec![
            Parameter::new("X-Trace", ParameterLocation::Header, false),
            tags,
            id,
        ];
        endpoint.request_body = Some(RequestBody {
            required: true,
            media_type: "application/json".to_string(),
            schema: SchemaSketch::default(),
        });
        endpoint.responses.insert(
            "201".to_string(),
            ResponseSpec {
                description: "Created".to_string(),
                media_type: "application/json".to_string(),
                schema: None,
            },
        );
        endpoint
    }

    #[test]
    fn test_endpoint_plan_classifies_parameters() {
        let plan = EndpointPlan::from_endpoint(&endpoint());
        assert_eq!(plan.path_params.len(), 1);
        assert_eq!(plan.path_params[0].primitive, Primitive::Integer);
        assert_eq!(plan.query_params[0].primitive, Primitive::Array);
        assert_eq!(plan.header_params.len(), 1);
        assert_eq!(plan.arity(), 3);
        assert_eq!(plan.success_status, 201);
        assert_eq!(plan.sample_path(), "/pets/1/toys");
        assert_eq!(plan.headline(), "POST /pets/{petId}/toys");
    }

    #[test]
    fn test_body_ignored_for_get() {
        let mut e = endpoint();
        e.method = HttpMethod::Get;
        let plan = EndpointPlan::from_endpoint(&e);
        assert!(plan.body.is_none());
        assert_eq!(plan.arity(), 2);
    }

    #[test]
    fn test_primitive_mapping() {
        assert_eq!(Primitive::from_type_name("int64"), Primitive::Integer);
        assert_eq!(Primitive::from_type_name("Boolean"), Primitive::Boolean);
        assert_eq!(Primitive::from_type_name("file"), Primitive::String);
        assert_eq!(Primitive::Array.sample_text(), "example");
        assert_eq!(Primitive::Boolean.sample_text(), "true");
        assert_eq!(Primitive::Object.scalar(), Primitive::String);
    }

    #[test]
    fn test_env_entries_follow_auth() {
        let api = ApiDescription {
            auth_method: AuthMethod::api_key(Some("X-Token"), ApiKeyLocation::Header),
            base_url: "https://api.test".to_string(),
            ..Default::default()
        };
        let plan = ClientPlan::from_api(&api);
        let names: Vec<_> = plan.env_entries().into_iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![
                "API_BASE_URL",
                "API_AUTH_TYPE",
                "API_KEY",
                "API_AUTH_HEADER_NAME",
                "API_TIMEOUT_MS",
                "API_MAX_RETRIES"
            ]
        );
        assert_eq!(plan.env_entries()[3].value, "X-Token");
        assert!(plan.example_endpoints().is_empty());
    }

    #[test]
    fn test_query_api_key_is_planned_as_header() {
        let api = ApiDescription {
            auth_method: AuthMethod::api_key(Some("api_key"), ApiKeyLocation::Query),
            ..Default::default()
        };
        let plan = ClientPlan::from_api(&api);
        assert_eq!(plan.auth.kind, "apiKey");
        assert_eq!(plan.auth.header_name, "api_key");

        let entry = plan
            .env_entries()
            .into_iter()
            .find(|e| e.name == "API_AUTH_HEADER_NAME")
            .unwrap();
        assert_eq!(entry.value, "api_key");
    }
}
