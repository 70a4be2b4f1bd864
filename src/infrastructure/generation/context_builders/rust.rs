//! Rust-specific context builder for code generation

use serde_json::{Value as JsonValue, json};

use super::common::{self, MethodParams, Syntax};
use crate::core::utils::to_snake_case;
use crate::generation::{
    ClientPlan, ContextBuilder, EndpointPlan, GenerationError, GenerationMetadata, Primitive,
    RenderContext, Target,
    sanitizers::{quoted, rust_quoted, sanitize_doc},
};

const SYNTAX: Syntax = Syntax {
    literal: rust_quoted,
    doc: sanitize_doc,
};

/// Strict and reserved keywords plus locals used in generated method bodies
const PARAM_RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "body",
    "path", "query",
];

/// Keywords plus the inherent methods every generated client has
const METHOD_RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield", "new",
    "from_env", "config", "check_connection", "send",
];

/// Rust-specific context builder
pub struct RustContextBuilder;

impl RustContextBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder for RustContextBuilder {
    fn build(
        &self,
        plan: &ClientPlan,
        metadata: &GenerationMetadata,
        target: Target,
    ) -> Result<RenderContext, GenerationError> {
        if target != Target::Rust {
            return Err(GenerationError::InvalidConfiguration(format!(
                "RustContextBuilder can only build contexts for Rust, got {target}"
            )));
        }

        let mut render_context = common::base_context(plan, metadata, target, SYNTAX)?;

        // Cargo manifests are TOML, so manifest strings use JSON-compatible quoting
        let crate_name = to_snake_case(&metadata.project_name);
        render_context.add_variable("crate_name", json!(crate_name.replace('_', "-")));
        render_context.add_variable("lib_name", json!(crate_name));
        render_context.add_variable(
            "manifest_description",
            json!(quoted(
                metadata
                    .description
                    .as_deref()
                    .unwrap_or("API client library")
            )),
        );

        let method_names = common::method_names(plan, METHOD_RESERVED, to_snake_case);
        let endpoints = plan
            .endpoints
            .iter()
            .zip(method_names)
            .map(|(endpoint, method_name)| build_rust_endpoint_context(endpoint, method_name))
            .collect();
        common::add_endpoints(&mut render_context, endpoints);

        Ok(render_context)
    }
}

fn build_rust_endpoint_context(endpoint: &EndpointPlan, method_name: String) -> JsonValue {
    let params = common::method_params(endpoint, PARAM_RESERVED, to_snake_case);

    let mut fields = common::endpoint_base(endpoint, SYNTAX);
    fields.insert("endpoint".into(), json!(method_name));
    fields.insert("method_name".into(), json!(method_name));
    fields.insert("path_params".into(), json!(common::path_param_fields(&params, SYNTAX)));
    fields.insert("params".into(), json!(rust_declarations(&params)));
    fields.insert("query_literal".into(), json!(query_literal(&params)));
    fields.insert("call_args".into(), json!(call_args(&params)));
    fields.insert("arity".into(), json!(params.len()));
    JsonValue::Object(fields)
}

fn rust_path_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Integer => "i64",
        Primitive::Number => "f64",
        Primitive::Boolean => "bool",
        _ => "&str",
    }
}

fn rust_query_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Integer => "Option<i64>",
        Primitive::Number => "Option<f64>",
        Primitive::Boolean => "Option<bool>",
        Primitive::Array => "Option<&[&str]>",
        Primitive::String | Primitive::Object => "Option<&str>",
    }
}

fn rust_declarations(params: &MethodParams<'_>) -> Vec<JsonValue> {
    let mut declarations = Vec::with_capacity(params.len());
    for p in &params.path {
        declarations.push(json!({
            "decl": format!("{}: {}", p.ident, rust_path_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_doc(&p.plan.description),
        }));
    }
    for p in &params.query {
        declarations.push(json!({
            "decl": format!("{}: {}", p.ident, rust_query_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_doc(&p.plan.description),
        }));
    }
    if params.body.is_some() {
        declarations.push(json!({
            "decl": "body: Option<&serde_json::Value>",
            "ident": "body",
            "doc": "Request payload",
        }));
    }
    declarations
}

/// `vec![("name", value.map(...))]`, one pair per query parameter
fn query_literal(params: &MethodParams<'_>) -> String {
    if params.query.is_empty() {
        return "Vec::new()".to_string();
    }
    let entries: Vec<String> = params
        .query
        .iter()
        .map(|p| {
            let encode = match p.plan.primitive {
                Primitive::Array => format!("{}.map(|v| v.join(\",\"))", p.ident),
                _ => format!("{}.map(|v| v.to_string())", p.ident),
            };
            format!("({}, {})", rust_quoted(&p.plan.name), encode)
        })
        .collect();
    format!("vec![{}]", entries.join(", "))
}

fn call_args(params: &MethodParams<'_>) -> String {
    let mut args: Vec<String> = params
        .path
        .iter()
        .map(|p| match p.plan.primitive {
            Primitive::Integer | Primitive::Number | Primitive::Boolean => {
                p.plan.primitive.sample_text()
            }
            other => rust_quoted(&other.sample_text()),
        })
        .collect();
    args.extend(params.query.iter().map(|_| "None".to_string()));
    if params.body.is_some() {
        args.push("Some(&serde_json::json!({}))".to_string());
    }
    args.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApiDescription, Endpoint, HttpMethod, Parameter, ParameterLocation};

    #[test]
    fn test_rust_context() {
        let mut endpoint = Endpoint::new(HttpMethod::Get, "/pets/{petId}");
        endpoint.operation_id = "getPet".to_string();
        let mut verbose = Parameter::new("verbose", ParameterLocation::Query, false);
        verbose.param_type = "boolean".to_string();
        endpoint.parameters = vec![
            Parameter::new("petId", ParameterLocation::Path, true),
            verbose,
            Parameter::new("type", ParameterLocation::Query, false),
        ];
        let api = ApiDescription {
            title: "Pet Store".to_string(),
            endpoints: vec![endpoint],
            ..Default::default()
        };
        let plan = ClientPlan::from_api(&api);
        let context = RustContextBuilder::new()
            .build(&plan, &GenerationMetadata::for_api(&api), Target::Rust)
            .unwrap();

        assert_eq!(context.get("crate_name"), Some(&json!("pet-store-client")));
        assert_eq!(context.get("lib_name"), Some(&json!("pet_store_client")));

        let endpoint = &context.get("endpoints").unwrap()[0];
        assert_eq!(endpoint["method_name"], "get_pet");
        assert_eq!(endpoint["params"][0]["decl"], "pet_id: &str");
        assert_eq!(endpoint["params"][1]["decl"], "verbose: Option<bool>");
        assert_eq!(endpoint["params"][2]["decl"], "type_: Option<&str>");
        assert_eq!(
            endpoint["query_literal"],
            "vec![(\"verbose\", verbose.map(|v| v.to_string())), (\"type\", type_.map(|v| v.to_string()))]"
        );
        assert_eq!(endpoint["call_args"], "\"example\", None, None");
        assert_eq!(endpoint["path_params"][0]["placeholder_literal"], "\"{petId}\"");
    }
}
