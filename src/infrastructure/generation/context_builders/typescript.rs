//! TypeScript-specific context builder for code generation

use serde_json::{Value as JsonValue, json};

use super::common::{self, MethodParams, Syntax};
use crate::core::utils::{to_camel_case, to_snake_case};
use crate::generation::{
    ClientPlan, ContextBuilder, EndpointPlan, GenerationError, GenerationMetadata, Primitive,
    RenderContext, Target,
    sanitizers::{quoted, sanitize_doc},
};

const SYNTAX: Syntax = Syntax {
    literal: quoted,
    doc: sanitize_doc,
};

/// Locals and helpers referenced inside a generated method
const PARAM_RESERVED: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with", "as", "implements", "interface",
    "let", "package", "private", "protected", "public", "static", "yield", "await", "async",
    "any", "boolean", "number", "string", "symbol", "type", "from", "of", "undefined",
    "arguments", "eval", "body", "path", "query", "pathValue",
];

/// Class members a generated method must not shadow
const METHOD_RESERVED: &[&str] = &[
    "constructor", "config", "send", "checkConnection", "delete", "new", "default", "class",
    "function", "import", "export", "return", "this",
];

/// TypeScript-specific context builder
pub struct TypeScriptContextBuilder;

impl TypeScriptContextBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TypeScriptContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder for TypeScriptContextBuilder {
    fn build(
        &self,
        plan: &ClientPlan,
        metadata: &GenerationMetadata,
        target: Target,
    ) -> Result<RenderContext, GenerationError> {
        if target != Target::TypeScript {
            return Err(GenerationError::InvalidConfiguration(format!(
                "TypeScriptContextBuilder can only build contexts for TypeScript, got {target}"
            )));
        }

        let mut render_context = common::base_context(plan, metadata, target, SYNTAX)?;

        // npm package names are lowercase
        let package_name = to_snake_case(&metadata.project_name).replace('_', "-");
        render_context.add_variable("package_name", json!(package_name));
        render_context.add_variable("package_literal", json!(quoted(&package_name)));

        let method_names = common::method_names(plan, METHOD_RESERVED, to_camel_case);
        let endpoints = plan
            .endpoints
            .iter()
            .zip(method_names)
            .map(|(endpoint, method_name)| build_typescript_endpoint_context(endpoint, method_name))
            .collect();
        common::add_endpoints(&mut render_context, endpoints);

        Ok(render_context)
    }
}

fn build_typescript_endpoint_context(endpoint: &EndpointPlan, method_name: String) -> JsonValue {
    let params = common::method_params(endpoint, PARAM_RESERVED, to_camel_case);

    let mut fields = common::endpoint_base(endpoint, SYNTAX);
    fields.insert("endpoint".into(), json!(method_name));
    fields.insert("method_name".into(), json!(method_name));
    fields.insert("path_params".into(), json!(common::path_param_fields(&params, SYNTAX)));
    fields.insert("params".into(), json!(typescript_declarations(&params)));
    fields.insert("query_literal".into(), json!(query_literal(&params)));
    fields.insert("call_args".into(), json!(call_args(&params)));
    fields.insert("arity".into(), json!(params.len()));
    JsonValue::Object(fields)
}

fn typescript_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "string",
        Primitive::Integer | Primitive::Number => "number",
        Primitive::Boolean => "boolean",
        Primitive::Array => "string[]",
        Primitive::Object => "Record<string, unknown>",
    }
}

fn typescript_sample(primitive: Primitive) -> String {
    match primitive {
        Primitive::String | Primitive::Array | Primitive::Object => quoted(&primitive.sample_text()),
        _ => primitive.sample_text(),
    }
}

fn typescript_declarations(params: &MethodParams<'_>) -> Vec<JsonValue> {
    let mut declarations = Vec::with_capacity(params.len());
    for p in &params.path {
        declarations.push(json!({
            "decl": format!("{}: {}", p.ident, typescript_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_doc(&p.plan.description),
        }));
    }
    for p in &params.query {
        declarations.push(json!({
            "decl": format!("{}?: {}", p.ident, typescript_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_doc(&p.plan.description),
        }));
    }
    if params.body.is_some() {
        declarations.push(json!({
            "decl": "body?: unknown",
            "ident": "body",
            "doc": "Request payload",
        }));
    }
    declarations
}

fn query_literal(params: &MethodParams<'_>) -> String {
    if params.query.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = params
        .query
        .iter()
        .map(|p| format!("{}: {}", quoted(&p.plan.name), p.ident))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

fn call_args(params: &MethodParams<'_>) -> String {
    let mut args: Vec<String> = params
        .path
        .iter()
        .map(|p| typescript_sample(p.plan.primitive))
        .collect();
    args.extend(params.query.iter().map(|_| "undefined".to_string()));
    if params.body.is_some() {
        args.push("{}".to_string());
    }
    args.join(", ")
}
