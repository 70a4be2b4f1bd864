//! OpenAPI 3.x / Swagger 2.0 normalizer
//!
//! Maps a machine-readable specification onto the canonical model by direct
//! field mapping. Reference integrity is checked for the whole document before
//! any mapping happens, so a broken `$ref` fails the parse with a diagnostic
//! naming the reference.

use std::collections::BTreeMap;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::core::{
    ApiDescription, ApiKeyLocation, AuthMethod, DEFAULT_MEDIA_TYPE, Endpoint, HttpMethod,
    Parameter, ParameterLocation, PropertySketch, RequestBody, ResponseSpec, SchemaSketch,
};
use crate::normalization::sketch::sketch_from_fields;
use crate::normalization::{InputFormat, Normalizer, ParseError};

/// Deepest `$ref -> $ref` chain followed before giving up
const MAX_REF_DEPTH: usize = 32;

/// Which major dialect the document is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Swagger2,
    OpenApi3,
}

/// Normalizer for OpenAPI and Swagger documents
#[derive(Debug, Default)]
pub struct OpenApiNormalizer;

impl OpenApiNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl Normalizer for OpenApiNormalizer {
    fn format(&self) -> InputFormat {
        InputFormat::OpenApi
    }

    fn normalize(&self, raw: &str) -> Result<ApiDescription, ParseError> {
        let document = load_document(raw)?;
        OpenApiParser::new(document)?.parse()
    }
}

/// Parses JSON, falling back to YAML
pub fn load_document(raw: &str) -> Result<JsonValue, ParseError> {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(value) => Ok(value),
        Err(json_err) if raw.trim_start().starts_with('{') => Err(ParseError::InvalidJson(json_err)),
        Err(json_err) => serde_yaml::from_str::<JsonValue>(raw).map_err(|yaml_err| {
            ParseError::InvalidDocument(format!("JSON: {json_err}; YAML: {yaml_err}"))
        }),
    }
}

/// Intermediate parameter classification; Swagger 2 folds bodies into parameters
enum ParamEntry {
    Plain(Parameter),
    Body { required: bool, schema: SchemaSketch },
    FormField { name: String, kind: String },
    Skipped,
}

/// Stateless mapper over one parsed document
pub struct OpenApiParser {
    json: JsonValue,
    dialect: Dialect,
}

impl OpenApiParser {
    /// Detects the dialect; fails when neither `openapi` nor `swagger` is declared
    pub fn new(json: JsonValue) -> Result<Self, ParseError> {
        if !json.is_object() {
            return Err(ParseError::invalid("document", "expected an object at the root"));
        }
        let dialect = if let Some(version) = json.get("openapi") {
            let version = version
                .as_str()
                .ok_or_else(|| ParseError::invalid("openapi", "expected a version string"))?;
            if !version.starts_with('3') {
                return Err(ParseError::invalid(
                    "openapi",
                    format!("unsupported version {version}"),
                ));
            }
            Dialect::OpenApi3
        } else if let Some(version) = json.get("swagger") {
            let version = version
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| version.to_string());
            if !version.starts_with('2') {
                return Err(ParseError::invalid(
                    "swagger",
                    format!("unsupported version {version}"),
                ));
            }
            Dialect::Swagger2
        } else {
            return Err(ParseError::missing("openapi"));
        };
        Ok(Self { json, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Map the whole document onto the canonical model
    pub fn parse(&self) -> Result<ApiDescription, ParseError> {
        self.validate_references()?;

        let info = self.json.get("info");
        let text = |key: &str| {
            info.and_then(|i| i.get(key))
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };

        let paths = self
            .json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| ParseError::missing("paths"))?;

        let mut endpoints = Vec::new();
        for (path, path_item) in paths {
            let path_item = self.deref(path_item)?;
            let Some(item) = path_item.as_object() else {
                continue;
            };
            let shared_params = self.parse_parameter_list(item.get("parameters"), path)?;

            for (key, operation) in item {
                let Ok(method) = key.parse::<HttpMethod>() else {
                    continue;
                };
                let Some(operation) = operation.as_object() else {
                    continue;
                };
                endpoints.push(self.build_endpoint(path, method, &shared_params, operation)?);
            }
        }
        tracing::debug!(
            dialect = ?self.dialect,
            endpoints = endpoints.len(),
            "OpenAPI document mapped"
        );

        Ok(ApiDescription {
            base_url: self.base_url(),
            auth_method: self.auth_method()?,
            title: text("title"),
            version: text("version"),
            description: text("description"),
            endpoints,
        }
        .finalize())
    }

    /// Walks every `$ref` in the document; the first broken one fails the parse
    pub fn validate_references(&self) -> Result<(), ParseError> {
        let mut refs = Vec::new();
        collect_refs(&self.json, &mut refs);
        for reference in refs {
            self.resolve_ref(reference)?;
        }
        Ok(())
    }

    /// Resolve a local `$ref` pointer
    fn resolve_ref(&self, reference: &str) -> Result<&JsonValue, ParseError> {
        let Some(pointer) = reference.strip_prefix('#') else {
            return Err(ParseError::ExternalReference {
                reference: reference.to_string(),
            });
        };
        self.json
            .pointer(pointer)
            .ok_or_else(|| ParseError::UnresolvedReference {
                reference: reference.to_string(),
            })
    }

    /// Follows `$ref` chains until a concrete value is reached
    fn deref<'a>(&'a self, mut value: &'a JsonValue) -> Result<&'a JsonValue, ParseError> {
        for _ in 0..MAX_REF_DEPTH {
            match value.get("$ref").and_then(JsonValue::as_str) {
                Some(reference) => value = self.resolve_ref(reference)?,
                None => return Ok(value),
            }
        }
        let reference = value
            .get("$ref")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        Err(ParseError::invalid(reference, "circular reference"))
    }

    fn base_url(&self) -> String {
        match self.dialect {
            Dialect::OpenApi3 => self
                .json
                .get("servers")
                .and_then(JsonValue::as_array)
                .and_then(|servers| servers.first())
                .map(substitute_server_variables)
                .unwrap_or_default(),
            Dialect::Swagger2 => {
                let base_path = self
                    .json
                    .get("basePath")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default();
                match self.json.get("host").and_then(JsonValue::as_str) {
                    Some(host) if !host.is_empty() => {
                        let scheme = self
                            .json
                            .get("schemes")
                            .and_then(JsonValue::as_array)
                            .and_then(|s| s.first())
                            .and_then(JsonValue::as_str)
                            .unwrap_or("https");
                        format!("{scheme}://{host}{base_path}")
                    }
                    _ => base_path.to_string(),
                }
            }
        }
    }

    /// Scans security schemes in priority order: bearer, basic, apiKey, oauth2
    fn auth_method(&self) -> Result<AuthMethod, ParseError> {
        let schemes = match self.dialect {
            Dialect::OpenApi3 => self
                .json
                .get("components")
                .and_then(|c| c.get("securitySchemes")),
            Dialect::Swagger2 => self.json.get("securityDefinitions"),
        };
        let Some(schemes) = schemes.and_then(JsonValue::as_object) else {
            return Ok(AuthMethod::default());
        };

        let mut resolved = Vec::with_capacity(schemes.len());
        for scheme in schemes.values() {
            resolved.push(self.deref(scheme)?);
        }

        let field = |s: &JsonValue, key: &str| {
            s.get(key)
                .and_then(JsonValue::as_str)
                .map(str::to_ascii_lowercase)
                .unwrap_or_default()
        };
        let description = |s: &JsonValue| {
            s.get("description")
                .and_then(JsonValue::as_str)
                .map(str::to_string)
        };

        let is_bearer = |s: &JsonValue| field(s, "type") == "http" && field(s, "scheme") == "bearer";
        let is_basic = |s: &JsonValue| {
            let kind = field(s, "type");
            kind == "basic" || (kind == "http" && field(s, "scheme") == "basic")
        };
        let is_api_key = |s: &JsonValue| field(s, "type") == "apikey";
        let is_oauth2 = |s: &JsonValue| field(s, "type") == "oauth2";

        if let Some(s) = resolved.iter().find(|s| is_bearer(s)) {
            return Ok(AuthMethod::Bearer { description: None }.with_description(description(s)));
        }
        if let Some(s) = resolved.iter().find(|s| is_basic(s)) {
            return Ok(AuthMethod::Basic { description: None }.with_description(description(s)));
        }
        if let Some(s) = resolved.iter().find(|s| is_api_key(s)) {
            let location = match field(s, "in").as_str() {
                "query" => ApiKeyLocation::Query,
                _ => ApiKeyLocation::Header,
            };
            let name = s.get("name").and_then(JsonValue::as_str);
            return Ok(AuthMethod::api_key(name, location).with_description(description(s)));
        }
        if let Some(s) = resolved.iter().find(|s| is_oauth2(s)) {
            return Ok(AuthMethod::OAuth2 { description: None }.with_description(description(s)));
        }
        Ok(AuthMethod::default())
    }

    fn build_endpoint(
        &self,
        path: &str,
        method: HttpMethod,
        shared_params: &[ParamEntry],
        operation: &JsonMap<String, JsonValue>,
    ) -> Result<Endpoint, ParseError> {
        let text = |key: &str| {
            operation
                .get(key)
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };

        let mut endpoint = Endpoint::new(method, path);
        endpoint.operation_id = text("operationId");
        endpoint.summary = text("summary");
        endpoint.description = text("description");
        endpoint.tags = operation
            .get("tags")
            .and_then(JsonValue::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(JsonValue::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        endpoint.security = security_names(
            operation
                .get("security")
                .or_else(|| self.json.get("security")),
        );

        let context = format!("{method} {path}");
        let own_params = self.parse_parameter_list(operation.get("parameters"), &context)?;

        let mut body_schema: Option<(bool, SchemaSketch)> = None;
        let mut form_fields: Vec<(String, String)> = Vec::new();
        for entry in shared_params.iter().chain(own_params.iter()) {
            match entry {
                ParamEntry::Plain(param) => {
                    // Operation-level parameters override path-level ones
                    endpoint
                        .parameters
                        .retain(|p| !(p.name == param.name && p.location == param.location));
                    endpoint.parameters.push(param.clone());
                }
                ParamEntry::Body { required, schema } => {
                    body_schema = Some((*required, schema.clone()));
                }
                ParamEntry::FormField { name, kind } => {
                    form_fields.retain(|(n, _)| n != name);
                    form_fields.push((name.clone(), kind.clone()));
                }
                ParamEntry::Skipped => {}
            }
        }

        endpoint.request_body = match self.dialect {
            Dialect::OpenApi3 => operation
                .get("requestBody")
                .map(|body| self.parse_request_body(body))
                .transpose()?,
            Dialect::Swagger2 => {
                let consumes = self.media_list(operation, "consumes");
                if let Some((required, schema)) = body_schema {
                    Some(RequestBody {
                        required,
                        media_type: consumes
                            .first()
                            .cloned()
                            .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
                        schema,
                    })
                } else if !form_fields.is_empty() {
                    let multipart = form_fields.iter().any(|(_, kind)| kind == "file");
                    Some(RequestBody {
                        required: false,
                        media_type: if multipart {
                            "multipart/form-data".to_string()
                        } else {
                            "application/x-www-form-urlencoded".to_string()
                        },
                        schema: sketch_from_fields(
                            form_fields.iter().map(|(n, k)| (n.as_str(), k.as_str())),
                        ),
                    })
                } else {
                    None
                }
            }
        };

        endpoint.responses = self.parse_responses(operation)?;
        Ok(endpoint)
    }

    fn parse_parameter_list(
        &self,
        params: Option<&JsonValue>,
        context: &str,
    ) -> Result<Vec<ParamEntry>, ParseError> {
        let Some(params) = params.and_then(JsonValue::as_array) else {
            return Ok(Vec::new());
        };
        params
            .iter()
            .enumerate()
            .map(|(index, param)| {
                let param = self.deref(param)?;
                self.parse_parameter(param, &format!("{context}.parameters[{index}]"))
            })
            .collect()
    }

    fn parse_parameter(&self, param: &JsonValue, field: &str) -> Result<ParamEntry, ParseError> {
        let name = param
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| ParseError::missing(format!("{field}.name")))?
            .to_string();
        let location = param
            .get("in")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| ParseError::missing(format!("{field}.in")))?;
        let required = param
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);

        let location = match location {
            "path" => ParameterLocation::Path,
            "query" => ParameterLocation::Query,
            "header" => ParameterLocation::Header,
            "cookie" => {
                tracing::debug!(parameter = %name, "Skipping cookie parameter");
                return Ok(ParamEntry::Skipped);
            }
            "body" => {
                let schema = match param.get("schema") {
                    Some(schema) => self.sketch_schema(schema)?,
                    None => object_sketch(),
                };
                return Ok(ParamEntry::Body { required, schema });
            }
            "formData" => {
                let kind = param
                    .get("type")
                    .and_then(JsonValue::as_str)
                    .unwrap_or("string")
                    .to_string();
                return Ok(ParamEntry::FormField { name, kind });
            }
            other => {
                return Err(ParseError::invalid(
                    format!("{field}.in"),
                    format!("unknown parameter location '{other}'"),
                ));
            }
        };

        // OpenAPI 3 nests type info under `schema`; Swagger 2 keeps it inline
        let schema = match param.get("schema") {
            Some(schema) => self.deref(schema)?,
            None => param,
        };
        let description = param
            .get("description")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(ParamEntry::Plain(Parameter {
            name,
            location,
            required: required || location == ParameterLocation::Path,
            param_type: schema_type_name(schema),
            description,
            example: param
                .get("example")
                .or_else(|| schema.get("example"))
                .cloned(),
            format: schema
                .get("format")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            enum_values: schema.get("enum").and_then(JsonValue::as_array).cloned(),
        }))
    }

    fn parse_request_body(&self, body: &JsonValue) -> Result<RequestBody, ParseError> {
        let body = self.deref(body)?;
        let required = body
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        let (media_type, media) = pick_media(body.get("content"));

        let mut schema = match media.and_then(|m| m.get("schema")) {
            Some(schema) => self.sketch_schema(schema)?,
            None => object_sketch(),
        };
        if let Some(example) = media.and_then(|m| m.get("example")) {
            schema.example = Some(example.clone());
        }

        Ok(RequestBody {
            required,
            media_type,
            schema,
        })
    }

    fn parse_responses(
        &self,
        operation: &JsonMap<String, JsonValue>,
    ) -> Result<BTreeMap<String, ResponseSpec>, ParseError> {
        let Some(responses) = operation.get("responses").and_then(JsonValue::as_object) else {
            return Ok(BTreeMap::new());
        };
        let produces = self.media_list(operation, "produces");

        let mut result = BTreeMap::new();
        for (status, response) in responses {
            let response = self.deref(response)?;
            let description = response
                .get("description")
                .and_then(JsonValue::as_str)
                .unwrap_or_default()
                .to_string();

            let spec = match self.dialect {
                Dialect::OpenApi3 => {
                    let (media_type, media) = pick_media(response.get("content"));
                    ResponseSpec {
                        description,
                        media_type,
                        schema: media
                            .and_then(|m| m.get("schema"))
                            .map(|s| self.sketch_schema(s))
                            .transpose()?,
                    }
                }
                Dialect::Swagger2 => ResponseSpec {
                    description,
                    media_type: produces
                        .first()
                        .cloned()
                        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string()),
                    schema: response
                        .get("schema")
                        .map(|s| self.sketch_schema(s))
                        .transpose()?,
                },
            };
            result.insert(status.clone(), spec);
        }
        Ok(result)
    }

    /// Swagger 2 `consumes`/`produces`, operation-level first
    fn media_list(&self, operation: &JsonMap<String, JsonValue>, key: &str) -> Vec<String> {
        operation
            .get(key)
            .or_else(|| self.json.get(key))
            .and_then(JsonValue::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(JsonValue::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Shallow sketch: top-level type and direct properties, `allOf` merged
    fn sketch_schema(&self, schema: &JsonValue) -> Result<SchemaSketch, ParseError> {
        let schema = self.deref(schema)?;
        let mut sketch = SchemaSketch {
            schema_type: schema_type_name_or(schema, "object"),
            properties: BTreeMap::new(),
            required: string_list(schema.get("required")),
            example: schema.get("example").cloned(),
        };

        if let Some(parts) = schema.get("allOf").and_then(JsonValue::as_array) {
            for part in parts {
                let part = self.sketch_schema(part)?;
                sketch.properties.extend(part.properties);
                for name in part.required {
                    if !sketch.required.contains(&name) {
                        sketch.required.push(name);
                    }
                }
            }
        }

        if let Some(props) = schema.get("properties").and_then(JsonValue::as_object) {
            for (name, prop) in props {
                let prop = self.deref(prop)?;
                sketch.properties.insert(
                    name.clone(),
                    PropertySketch {
                        property_type: schema_type_name_or(prop, "object"),
                        format: prop
                            .get("format")
                            .and_then(JsonValue::as_str)
                            .map(str::to_string),
                        description: prop
                            .get("description")
                            .and_then(JsonValue::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    },
                );
            }
        }
        Ok(sketch)
    }
}

fn collect_refs<'a>(value: &'a JsonValue, out: &mut Vec<&'a str>) {
    match value {
        JsonValue::Object(obj) => {
            if let Some(reference) = obj.get("$ref").and_then(JsonValue::as_str) {
                out.push(reference);
            }
            for child in obj.values() {
                collect_refs(child, out);
            }
        }
        JsonValue::Array(items) => {
            for child in items {
                collect_refs(child, out);
            }
        }
        _ => {}
    }
}

/// Server URL with `{variable}` placeholders replaced by their defaults
fn substitute_server_variables(server: &JsonValue) -> String {
    let mut url = server
        .get("url")
        .and_then(JsonValue::as_str)
        .unwrap_or_default()
        .to_string();
    if let Some(vars) = server.get("variables").and_then(JsonValue::as_object) {
        for (name, var) in vars {
            if let Some(default) = var.get("default").and_then(JsonValue::as_str) {
                url = url.replace(&format!("{{{name}}}"), default);
            }
        }
    }
    url
}

/// Preferred media entry: JSON when offered, else the first declared
fn pick_media(content: Option<&JsonValue>) -> (String, Option<&JsonValue>) {
    let Some(content) = content.and_then(JsonValue::as_object) else {
        return (DEFAULT_MEDIA_TYPE.to_string(), None);
    };
    content
        .get_key_value(DEFAULT_MEDIA_TYPE)
        .or_else(|| content.iter().next())
        .map(|(media_type, media)| (media_type.clone(), Some(media)))
        .unwrap_or_else(|| (DEFAULT_MEDIA_TYPE.to_string(), None))
}

fn security_names(security: Option<&JsonValue>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for requirement in security.and_then(JsonValue::as_array).into_iter().flatten() {
        for name in requirement.as_object().into_iter().flat_map(|o| o.keys()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
    }
    names
}

fn string_list(value: Option<&JsonValue>) -> Vec<String> {
    value
        .and_then(JsonValue::as_array)
        .map(|list| {
            list.iter()
                .filter_map(JsonValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn object_sketch() -> SchemaSketch {
    SchemaSketch {
        schema_type: "object".to_string(),
        ..Default::default()
    }
}

/// Declared type, inferred from shape when absent, `string` as last resort
fn schema_type_name(schema: &JsonValue) -> String {
    schema_type_name_or(schema, "string")
}

fn schema_type_name_or(schema: &JsonValue, fallback: &str) -> String {
    match schema.get("type") {
        Some(JsonValue::String(kind)) => kind.clone(),
        // OpenAPI 3.1 allows `type: [string, "null"]`
        Some(JsonValue::Array(kinds)) => kinds
            .iter()
            .filter_map(JsonValue::as_str)
            .find(|k| *k != "null")
            .unwrap_or(fallback)
            .to_string(),
        _ if schema.get("properties").is_some() || schema.get("allOf").is_some() => {
            "object".to_string()
        }
        _ if schema.get("items").is_some() => "array".to_string(),
        _ => fallback.to_string(),
    }
}
