//! Python-specific context builder for code generation

use serde_json::{Value as JsonValue, json};

use super::common::{self, MethodParams, Syntax};
use crate::core::utils::to_snake_case;
use crate::generation::{
    ClientPlan, ContextBuilder, EndpointPlan, GenerationError, GenerationMetadata, Primitive,
    RenderContext, Target,
    sanitizers::{quoted, sanitize_python_doc},
};

const SYNTAX: Syntax = Syntax {
    literal: quoted,
    doc: sanitize_python_doc,
};

/// Keywords, soft keywords and names a generated method body refers to
const PARAM_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "match", "case", "self", "body", "path", "query", "path_value",
    "Any", "Dict", "List", "Optional",
];

/// Client attributes a generated method must not shadow
const METHOD_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield", "config", "check_connection",
];

/// Python-specific context builder
pub struct PythonContextBuilder;

impl PythonContextBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder for PythonContextBuilder {
    fn build(
        &self,
        plan: &ClientPlan,
        metadata: &GenerationMetadata,
        target: Target,
    ) -> Result<RenderContext, GenerationError> {
        if target != Target::Python {
            return Err(GenerationError::InvalidConfiguration(format!(
                "PythonContextBuilder can only build contexts for Python, got {target}"
            )));
        }

        let mut render_context = common::base_context(plan, metadata, target, SYNTAX)?;

        // Python-specific naming
        let package_name = to_snake_case(&metadata.project_name);
        render_context.add_variable("package_name", json!(package_name));

        let method_names = common::method_names(plan, METHOD_RESERVED, to_snake_case);
        let endpoints = plan
            .endpoints
            .iter()
            .zip(method_names)
            .map(|(endpoint, method_name)| build_python_endpoint_context(endpoint, method_name))
            .collect();
        common::add_endpoints(&mut render_context, endpoints);

        Ok(render_context)
    }
}

fn build_python_endpoint_context(endpoint: &EndpointPlan, method_name: String) -> JsonValue {
    let params = common::method_params(endpoint, PARAM_RESERVED, to_snake_case);

    let mut fields = common::endpoint_base(endpoint, SYNTAX);
    fields.insert("endpoint".into(), json!(method_name));
    fields.insert("method_name".into(), json!(method_name));
    fields.insert("path_params".into(), json!(common::path_param_fields(&params, SYNTAX)));
    fields.insert("params".into(), json!(python_declarations(&params)));
    fields.insert("query_literal".into(), json!(query_literal(&params)));
    fields.insert("call_args".into(), json!(call_args(&params)));
    fields.insert("arity".into(), json!(params.len()));
    JsonValue::Object(fields)
}

fn python_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::String => "str",
        Primitive::Integer => "int",
        Primitive::Number => "float",
        Primitive::Boolean => "bool",
        Primitive::Array => "List[str]",
        Primitive::Object => "Dict[str, Any]",
    }
}

fn python_sample(primitive: Primitive) -> String {
    match primitive {
        Primitive::String | Primitive::Array | Primitive::Object => quoted(&primitive.sample_text()),
        Primitive::Boolean => "True".to_string(),
        _ => primitive.sample_text(),
    }
}

/// Declarations after `self`, each with its docstring line
fn python_declarations(params: &MethodParams<'_>) -> Vec<JsonValue> {
    let mut declarations = Vec::with_capacity(params.len());
    for p in &params.path {
        declarations.push(json!({
            "decl": format!("{}: {}", p.ident, python_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_python_doc(&p.plan.description),
        }));
    }
    for p in &params.query {
        declarations.push(json!({
            "decl": format!("{}: Optional[{}] = None", p.ident, python_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_python_doc(&p.plan.description),
        }));
    }
    if params.body.is_some() {
        declarations.push(json!({
            "decl": "body: Any = None",
            "ident": "body",
            "doc": "Request payload",
        }));
    }
    declarations
}

fn query_literal(params: &MethodParams<'_>) -> String {
    let entries: Vec<String> = params
        .query
        .iter()
        .map(|p| format!("{}: {}", quoted(&p.plan.name), p.ident))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

fn call_args(params: &MethodParams<'_>) -> String {
    let mut args: Vec<String> = params
        .path
        .iter()
        .map(|p| python_sample(p.plan.primitive))
        .collect();
    args.extend(params.query.iter().map(|_| "None".to_string()));
    if params.body.is_some() {
        args.push("{}".to_string());
    }
    args.join(", ")
}
