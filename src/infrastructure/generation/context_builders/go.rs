//! Go-specific context builder for code generation

use serde_json::{Value as JsonValue, json};

use super::common::{self, MethodParams, Syntax};
use crate::core::utils::{to_camel_case, to_proper_case, to_snake_case};
use crate::generation::{
    ClientPlan, ContextBuilder, EndpointPlan, GenerationError, GenerationMetadata, Primitive,
    RenderContext, Target,
    sanitizers::{quoted, sanitize_doc},
};

const SYNTAX: Syntax = Syntax {
    literal: quoted,
    doc: sanitize_doc,
};

/// Keywords, predeclared identifiers and the helpers a generated method calls
const PARAM_RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var", "any", "bool", "byte", "error",
    "float64", "int", "int64", "nil", "rune", "string", "true", "false", "len", "make", "new",
    "append", "c", "body", "path", "query", "http", "time", "substitute", "newQuery",
    "addString", "addInt", "addFloat", "addBool", "addList",
];

/// Exported names already defined on `Client`
const METHOD_RESERVED: &[&str] = &["CheckConnection", "Config"];

/// File-name suffixes the Go toolchain reads as build constraints
const BUILD_SUFFIXES: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos", "386", "amd64",
    "arm", "arm64", "loong64", "mips", "mips64", "mips64le", "mipsle", "ppc64", "ppc64le",
    "riscv64", "s390x", "wasm",
];

/// Go-specific context builder
pub struct GoContextBuilder;

impl GoContextBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GoContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder for GoContextBuilder {
    fn build(
        &self,
        plan: &ClientPlan,
        metadata: &GenerationMetadata,
        target: Target,
    ) -> Result<RenderContext, GenerationError> {
        if target != Target::Go {
            return Err(GenerationError::InvalidConfiguration(format!(
                "GoContextBuilder can only build contexts for Go, got {target}"
            )));
        }

        let mut render_context = common::base_context(plan, metadata, target, SYNTAX)?;

        // Go package names are a single lowercase word
        let package_name = to_snake_case(&metadata.project_name).replace('_', "");
        render_context.add_variable("package_name", json!(package_name));
        render_context.add_variable(
            "module_path",
            json!(format!("example.com/{}", metadata.project_name)),
        );

        let method_names = common::method_names(plan, METHOD_RESERVED, to_proper_case);
        let endpoints = plan
            .endpoints
            .iter()
            .zip(method_names)
            .map(|(endpoint, method_name)| build_go_endpoint_context(endpoint, method_name))
            .collect();
        common::add_endpoints(&mut render_context, endpoints);

        Ok(render_context)
    }
}

fn build_go_endpoint_context(endpoint: &EndpointPlan, method_name: String) -> JsonValue {
    let params = common::method_params(endpoint, PARAM_RESERVED, to_camel_case);

    let mut fields = common::endpoint_base(endpoint, SYNTAX);
    fields.insert("endpoint".into(), json!(test_file_stem(&method_name)));
    fields.insert("method_name".into(), json!(method_name));
    fields.insert("path_params".into(), json!(common::path_param_fields(&params, SYNTAX)));
    fields.insert("params".into(), json!(go_declarations(&params)));
    fields.insert("query_setters".into(), json!(query_setters(&params)));
    fields.insert("call_args".into(), json!(call_args(&params)));
    fields.insert("arity".into(), json!(params.len()));
    JsonValue::Object(fields)
}

/// `GetPet` becomes `get_pet`; stems that would read as a GOOS/GOARCH constraint get `_op`
fn test_file_stem(method_name: &str) -> String {
    let stem = to_snake_case(method_name);
    let constrained = BUILD_SUFFIXES
        .iter()
        .any(|suffix| stem == *suffix || stem.ends_with(&format!("_{suffix}")));
    if constrained { format!("{stem}_op") } else { stem }
}

fn go_path_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Integer => "int64",
        Primitive::Number => "float64",
        Primitive::Boolean => "bool",
        _ => "string",
    }
}

/// Optional query values are pointers (lists use nil slices)
fn go_query_type(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Integer => "*int64",
        Primitive::Number => "*float64",
        Primitive::Boolean => "*bool",
        Primitive::Array => "[]string",
        Primitive::String | Primitive::Object => "*string",
    }
}

fn query_setter(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Integer => "addInt",
        Primitive::Number => "addFloat",
        Primitive::Boolean => "addBool",
        Primitive::Array => "addList",
        Primitive::String | Primitive::Object => "addString",
    }
}

fn go_declarations(params: &MethodParams<'_>) -> Vec<JsonValue> {
    let mut declarations = Vec::with_capacity(params.len());
    for p in &params.path {
        declarations.push(json!({
            "decl": format!("{} {}", p.ident, go_path_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_doc(&p.plan.description),
        }));
    }
    for p in &params.query {
        declarations.push(json!({
            "decl": format!("{} {}", p.ident, go_query_type(p.plan.primitive)),
            "ident": p.ident,
            "doc": sanitize_doc(&p.plan.description),
        }));
    }
    if params.body.is_some() {
        declarations.push(json!({
            "decl": "body interface{}",
            "ident": "body",
            "doc": "Request payload",
        }));
    }
    declarations
}

fn query_setters(params: &MethodParams<'_>) -> Vec<String> {
    params
        .query
        .iter()
        .map(|p| {
            format!(
                "{}(query, {}, {})",
                query_setter(p.plan.primitive),
                quoted(&p.plan.name),
                p.ident
            )
        })
        .collect()
}

fn call_args(params: &MethodParams<'_>) -> String {
    let mut args: Vec<String> = params
        .path
        .iter()
        .map(|p| match p.plan.primitive {
            Primitive::Integer | Primitive::Number | Primitive::Boolean => {
                p.plan.primitive.sample_text()
            }
            other => quoted(&other.sample_text()),
        })
        .collect();
    args.extend(params.query.iter().map(|_| "nil".to_string()));
    if params.body.is_some() {
        args.push("map[string]interface{}{}".to_string());
    }
    args.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApiDescription, Endpoint, HttpMethod, Parameter, ParameterLocation};

    #[test]
    fn test_go_context() {
        let mut endpoint = Endpoint::new(HttpMethod::Get, "/pets/{id}");
        endpoint.operation_id = "getPet".to_string();
        let mut id = Parameter::new("id", ParameterLocation::Path, true);
        id.param_type = "integer".to_string();
        let mut tags = Parameter::new("tags", ParameterLocation::Query, false);
        tags.param_type = "array".to_string();
        endpoint.parameters = vec![id, tags, Parameter::new("type", ParameterLocation::Query, false)];
        let api = ApiDescription {
            title: "Pets".to_string(),
            endpoints: vec![endpoint],
            ..Default::default()
        };
        let plan = ClientPlan::from_api(&api);
        let context = GoContextBuilder::new()
            .build(&plan, &GenerationMetadata::for_api(&api), Target::Go)
            .unwrap();

        assert_eq!(context.get("package_name"), Some(&json!("petsclient")));
        let endpoint = &context.get("endpoints").unwrap()[0];
        assert_eq!(endpoint["method_name"], "GetPet");
        assert_eq!(endpoint["endpoint"], "get_pet");
        assert_eq!(endpoint["params"][0]["decl"], "id int64");
        assert_eq!(endpoint["params"][1]["decl"], "tags []string");
        assert_eq!(endpoint["params"][2]["decl"], "type_ *string");
        assert_eq!(endpoint["query_setters"][0], "addList(query, \"tags\", tags)");
        assert_eq!(endpoint["call_args"], "1, nil, nil");
    }

    #[test]
    fn test_test_file_stem_avoids_build_constraints() {
        assert_eq!(test_file_stem("GetPet"), "get_pet");
        assert_eq!(test_file_stem("ListWindows"), "list_windows_op");
        assert_eq!(test_file_stem("Js"), "js_op");
    }
}
