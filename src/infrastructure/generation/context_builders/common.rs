//! Pieces every target context builder shares
//!
//! The base context carries everything that does not depend on target
//! syntax beyond quoting: project naming, API metadata, auth, defaults and
//! `.env.example` entries. Identifier allocation also lives here so every
//! target resolves clashes the same way.

use serde_json::{Map, Value as JsonValue, json};

use crate::core::utils::to_proper_case;
use crate::generation::sanitizers::NameScope;
use crate::generation::{
    BodyPlan, ClientPlan, EndpointPlan, GenerationMetadata, ParamPlan, RenderContext, Target,
};

/// Quoting and doc-flattening used by one target
#[derive(Clone, Copy)]
pub(crate) struct Syntax {
    pub literal: fn(&str) -> String,
    pub doc: fn(&str) -> String,
}

/// A parameter together with the identifier it received in a signature
pub(crate) struct NamedParam<'a> {
    pub plan: &'a ParamPlan,
    pub ident: String,
}

/// Signature parameters in declaration order: path, query, then body
pub(crate) struct MethodParams<'a> {
    pub path: Vec<NamedParam<'a>>,
    pub query: Vec<NamedParam<'a>>,
    pub body: Option<&'a BodyPlan>,
}

impl MethodParams<'_> {
    pub fn len(&self) -> usize {
        self.path.len() + self.query.len() + usize::from(self.body.is_some())
    }
}

/// Keeps only characters legal in an ASCII identifier
fn ascii_ident(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Allocates one method name per endpoint, in plan order
pub(crate) fn method_names(
    plan: &ClientPlan,
    reserved: &'static [&'static str],
    case: fn(&str) -> String,
) -> Vec<String> {
    let mut scope = NameScope::new(reserved);
    plan.endpoints
        .iter()
        .map(|endpoint| scope.claim(&ascii_ident(&case(&endpoint.operation_id)), "call"))
        .collect()
}

/// Allocates parameter identifiers for one method; `body` is always the body's name
pub(crate) fn method_params<'a>(
    endpoint: &'a EndpointPlan,
    reserved: &'static [&'static str],
    case: fn(&str) -> String,
) -> MethodParams<'a> {
    let mut scope = NameScope::new(reserved);
    scope.occupy("body");

    let mut name = |plan: &'a ParamPlan| NamedParam {
        plan,
        ident: scope.claim(&ascii_ident(&case(&plan.name)), "param"),
    };
    let path = endpoint.path_params.iter().map(&mut name).collect();
    let query = endpoint.query_params.iter().map(&mut name).collect();

    MethodParams {
        path,
        query,
        body: endpoint.body.as_ref(),
    }
}

/// `PetsClient` for `pets-client`, `AcmeClient` for `acme`
pub(crate) fn client_type_name(project_name: &str) -> String {
    let base = to_proper_case(project_name);
    let base = if base.starts_with(|c: char| c.is_ascii_alphabetic()) {
        base
    } else {
        format!("Api{base}")
    };
    if base.ends_with("Client") {
        base
    } else {
        format!("{base}Client")
    }
}

/// Variables every target template set reads
pub(crate) fn base_context(
    plan: &ClientPlan,
    metadata: &GenerationMetadata,
    target: Target,
    syntax: Syntax,
) -> Result<RenderContext, crate::generation::GenerationError> {
    let literal = syntax.literal;
    let doc = syntax.doc;

    let description = metadata
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("Client library for {}", plan.title));

    let mut context = RenderContext::new();
    context.add_variable("target", json!(target.to_string()));
    context.add_variable("project_name", json!(metadata.project_name));
    context.add_variable("project_literal", json!(literal(&metadata.project_name)));
    context.add_variable("client_version", json!(metadata.version));
    context.add_variable("client_name", json!(client_type_name(&metadata.project_name)));
    context.add_variable("description_doc", json!(doc(&description)));
    context.add_variable("description_literal", json!(literal(&description)));
    context.add_variable(
        "license",
        json!(metadata.license.clone().unwrap_or_else(|| "MIT".to_string())),
    );

    context.add_variable(
        "api",
        json!({
            "title": plan.title,
            "version": plan.version,
            "title_doc": doc(&plan.title),
            "title_literal": literal(&plan.title),
            "description_doc": doc(&plan.description),
        }),
    );
    context.add_variable("base_url", json!(plan.base_url));
    context.add_variable("base_url_literal", json!(literal(&plan.base_url)));
    context.add_variable(
        "auth",
        json!({
            "kind": plan.auth.kind,
            "header_name": plan.auth.header_name,
            "header_literal": literal(&plan.auth.header_name),
            "description_doc": plan.auth.description.as_deref().map(doc).unwrap_or_default(),
        }),
    );
    context.add_variable("defaults", serde_json::to_value(plan.defaults)?);
    context.add_variable("env", serde_json::to_value(plan.env_entries())?);
    context.add_variable("endpoint_count", json!(plan.endpoints.len()));

    Ok(context)
}

/// Endpoint fields whose only target dependency is quoting and doc flattening
pub(crate) fn endpoint_base(endpoint: &EndpointPlan, syntax: Syntax) -> Map<String, JsonValue> {
    let literal = syntax.literal;
    let doc = syntax.doc;
    let expected_path = endpoint.sample_path();
    let detail = endpoint.description.trim();

    let mut fields = Map::new();
    fields.insert("operation_id".into(), json!(endpoint.operation_id));
    fields.insert("http_method".into(), json!(endpoint.method.as_str()));
    fields.insert("path".into(), json!(endpoint.path));
    fields.insert("path_literal".into(), json!(literal(&endpoint.path)));
    fields.insert(
        "route_doc".into(),
        json!(doc(&format!("{} {}", endpoint.method, endpoint.path))),
    );
    fields.insert("doc".into(), json!(doc(&endpoint.headline())));
    fields.insert(
        "detail_doc".into(),
        json!(if detail.is_empty() || detail == endpoint.headline() {
            String::new()
        } else {
            doc(detail)
        }),
    );
    fields.insert("tags".into(), json!(endpoint.tags));
    fields.insert(
        "headers".into(),
        json!(
            endpoint
                .header_params
                .iter()
                .map(|h| json!({ "name": doc(&h.name), "doc": doc(&h.description) }))
                .collect::<Vec<_>>()
        ),
    );
    fields.insert(
        "responses".into(),
        json!(
            endpoint
                .responses
                .iter()
                .map(|r| json!({ "status": doc(&r.status), "doc": doc(&r.description) }))
                .collect::<Vec<_>>()
        ),
    );
    fields.insert("has_body".into(), json!(endpoint.body.is_some()));
    let media_type = endpoint
        .body
        .as_ref()
        .map(|b| b.media_type.clone())
        .unwrap_or_default();
    fields.insert("body_media_literal".into(), json!(literal(&media_type)));
    fields.insert("body_media_type".into(), json!(media_type));
    fields.insert("expected_path_literal".into(), json!(literal(&expected_path)));
    fields.insert("expected_path".into(), json!(expected_path));
    fields.insert("success_status".into(), json!(endpoint.success_status));
    fields.insert(
        "success_has_body".into(),
        json!(!matches!(endpoint.success_status, 204 | 205 | 304)),
    );
    fields.insert(
        "test_title_literal".into(),
        json!(literal(&format!("{} {}", endpoint.method, endpoint.path))),
    );
    fields
}

/// Path parameter entries shared by every target's templates
pub(crate) fn path_param_fields(params: &MethodParams<'_>, syntax: Syntax) -> Vec<JsonValue> {
    params
        .path
        .iter()
        .map(|p| {
            json!({
                "name": p.plan.name,
                "ident": p.ident,
                "name_literal": (syntax.literal)(&p.plan.name),
                "placeholder_literal": (syntax.literal)(&format!("{{{}}}", p.plan.name)),
            })
        })
        .collect()
}

/// Adds `endpoints` and `example_endpoints` to `context`
pub(crate) fn add_endpoints(context: &mut RenderContext, endpoints: Vec<JsonValue>) {
    let examples: Vec<JsonValue> = endpoints.iter().take(2).cloned().collect();
    context.add_variable("endpoints", JsonValue::Array(endpoints));
    context.add_variable("example_endpoints", JsonValue::Array(examples));
}
