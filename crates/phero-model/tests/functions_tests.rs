use super::*;
use crate::test_support::init_tracing;
use phero_common::DiagnosticCode;
use phero_types::{Property, SymbolId, TypeGraph};

struct Fixture {
    graph: TypeGraph,
    context: TypeId,
    user: SymbolId,
    query: SymbolId,
    user_ref: TypeId,
    query_ref: TypeId,
    s: TypeId,
}

fn fixture() -> Fixture {
    init_tracing();
    let mut g = TypeGraph::new();
    let s = g.string();
    let n = g.number();
    let ctx = g.interface("PheroContext", vec![Property::new("ip", s)], vec![]);
    let context = g.reference(ctx);
    let user = g.interface("User", vec![Property::new("name", s)], vec![]);
    let query = g.interface("Query", vec![Property::new("limit", n)], vec![]);
    let user_ref = g.reference(user);
    let query_ref = g.reference(query);
    Fixture {
        graph: g,
        context,
        user,
        query,
        user_ref,
        query_ref,
        s,
    }
}

fn function(name: &str, parameters: Vec<Parameter>, return_type: TypeId) -> FunctionSignature {
    FunctionSignature {
        name: FunctionName::Identifier(name.into()),
        parameters,
        return_type,
    }
}

// =============================================================================
// Names
// =============================================================================

#[test]
fn test_identifier_and_string_names_are_accepted() {
    assert_eq!(
        validate_function_name(&FunctionName::Identifier("getUser".into())).unwrap(),
        "getUser"
    );
    assert_eq!(
        validate_function_name(&FunctionName::StringLiteral("get-user".into())).unwrap(),
        "get-user"
    );
}

#[test]
fn test_other_names_are_unresolvable() {
    for name in [
        FunctionName::NumericLiteral("42".into()),
        FunctionName::Computed,
        FunctionName::PrivateIdentifier("secret".into()),
        FunctionName::BindingPattern,
    ] {
        let err = validate_function_name(&name).unwrap_err();
        assert_eq!(err.code, DiagnosticCode::UnresolvableName, "{name:?}");
        assert!(err.to_string().starts_with("S117:"));
    }
}

// =============================================================================
// Roots and closure
// =============================================================================

#[test]
fn test_leading_context_parameter_is_skipped() {
    let f = fixture();
    let options = ExtractOptions::default();
    let get_user = function(
        "getUser",
        vec![
            Parameter::new("ctx", f.context),
            Parameter::new("query", f.query_ref),
        ],
        f.user_ref,
    );

    let params = data_parameters(&f.graph, &get_user, &options);
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "query");
}

#[test]
fn test_context_type_is_only_skipped_in_first_position() {
    let f = fixture();
    let options = ExtractOptions::default();
    let odd = function(
        "odd",
        vec![
            Parameter::new("query", f.query_ref),
            Parameter::new("ctx", f.context),
        ],
        f.s,
    );
    assert_eq!(data_parameters(&f.graph, &odd, &options).len(), 2);
}

#[test]
fn test_configured_context_name() {
    let f = fixture();
    let options = ExtractOptions {
        context_type_name: "Query".into(),
        ..ExtractOptions::default()
    };
    let get_user = function(
        "getUser",
        vec![
            Parameter::new("query", f.query_ref),
            Parameter::new("id", f.s),
        ],
        f.user_ref,
    );
    let params = data_parameters(&f.graph, &get_user, &options);
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].name, "id");
}

#[test]
fn test_service_roots_are_parameters_then_returns() {
    let mut f = fixture();
    let options = ExtractOptions::default();
    let promised = f.graph.promise_of(f.user_ref);
    let functions = vec![
        function(
            "getUser",
            vec![
                Parameter::new("ctx", f.context),
                Parameter::new("query", f.query_ref),
            ],
            promised,
        ),
        function("ping", vec![Parameter::new("msg", f.s)], f.s),
    ];

    assert_eq!(
        service_roots(&f.graph, &functions, &options),
        vec![f.query_ref, f.s, promised, f.s]
    );

    let closure = extract_declarations(&f.graph, &functions, &options).unwrap();
    assert_eq!(closure.names(), vec!["Query", "User"]);
    assert!(closure.contains(f.query) && closure.contains(f.user));
}

#[test]
fn test_extract_declarations_checks_names_first() {
    let f = fixture();
    let functions = vec![FunctionSignature {
        name: FunctionName::Computed,
        parameters: vec![],
        return_type: f.user_ref,
    }];
    let err = extract_declarations(&f.graph, &functions, &ExtractOptions::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::UnresolvableName);
}

// =============================================================================
// Models
// =============================================================================

#[test]
fn test_return_promise_is_unwrapped() {
    let mut f = fixture();
    let promised = f.graph.promise_of(f.user_ref);
    let get_user = function("getUser", vec![], promised);

    let map = synthesize_return(&f.graph, &get_user, &ExtractOptions::default()).unwrap();
    assert_eq!(map.root, ParserModel::reference("User"));
    assert!(map.deps.contains_key("User"));
}

#[test]
fn test_promise_like_is_unwrapped() {
    let mut f = fixture();
    let promised = f.graph.builtin_reference("PromiseLike", vec![f.s]);
    let ping = function("ping", vec![], promised);
    assert_eq!(resolved_return_type(&f.graph, &ping).unwrap(), f.s);
}

#[test]
fn test_plain_return_type_is_used_directly() {
    let f = fixture();
    let ping = function("ping", vec![], f.s);
    let map = synthesize_return(&f.graph, &ping, &ExtractOptions::default()).unwrap();
    assert_eq!(map.root, ParserModel::String);
}

#[test]
fn test_promise_without_argument_is_an_error() {
    let mut f = fixture();
    let bare = f.graph.builtin_reference("Promise", vec![]);
    let broken = function("broken", vec![], bare);
    let err = synthesize_return(&f.graph, &broken, &ExtractOptions::default()).unwrap_err();
    assert_eq!(err.code, DiagnosticCode::MissingTypeArgument);
    assert!(err.to_string().contains("Promise has no type argument"));
}

#[test]
fn test_parameters_become_one_object() {
    let mut f = fixture();
    let undefined = f.graph.undefined();
    let maybe = f.graph.union(vec![f.s, undefined]);
    let search = function(
        "search",
        vec![
            Parameter::new("ctx", f.context),
            Parameter::new("query", f.query_ref),
            Parameter::optional("cursor", maybe),
        ],
        f.s,
    );

    let map = synthesize_parameters(&f.graph, &search, &ExtractOptions::default()).unwrap();
    assert_eq!(
        map.root,
        ParserModel::Object {
            members: vec![
                Member::new("query", false, ParserModel::reference("Query")),
                Member::new("cursor", true, ParserModel::String),
            ]
        }
    );
    assert_eq!(map.deps.keys().collect::<Vec<_>>(), vec!["Query"]);
    assert!(map.dangling_references().is_empty());
}
