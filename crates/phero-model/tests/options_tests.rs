use super::*;

#[test]
fn test_defaults() {
    let options = ExtractOptions::default();
    assert!(options.strict_null_checks);
    assert_eq!(options.name_policy, NamePolicy::Reject);
    assert_eq!(options.context_type_name, "PheroContext");
    assert!(options.extra_builtins.is_empty());
    assert_eq!(
        options.recursion_profile(RecursionProfile::Synthesis),
        RecursionProfile::Synthesis
    );
}

#[test]
fn test_from_json_reads_camel_case_fields() {
    let options = ExtractOptions::from_json(
        r#"{
            "strictNullChecks": false,
            "extraBuiltins": ["Buffer"],
            "namePolicy": "qualifyByModule",
            "contextTypeName": "Ctx"
        }"#,
    )
    .expect("valid options");
    assert!(!options.strict_null_checks);
    assert!(options.is_extra_builtin("Buffer"));
    assert!(!options.is_extra_builtin("Date"));
    assert_eq!(options.name_policy, NamePolicy::QualifyByModule);
    assert_eq!(options.context_type_name, "Ctx");
}

#[test]
fn test_bool_accepts_string_values() {
    let options = ExtractOptions::from_json(r#"{ "strictNullChecks": "false" }"#).unwrap();
    assert!(!options.strict_null_checks);
    let options = ExtractOptions::from_json(r#"{ "strictNullChecks": "yes" }"#).unwrap();
    assert!(options.strict_null_checks);
}

#[test]
fn test_invalid_bool_string_is_an_error_with_context() {
    let err = ExtractOptions::from_json(r#"{ "strictNullChecks": "maybe" }"#).unwrap_err();
    assert!(err.to_string().contains("failed to parse extraction options"));
    assert!(format!("{err:#}").contains("invalid boolean value"));
}

#[test]
fn test_empty_object_resolves_to_defaults() {
    assert_eq!(
        ExtractOptions::from_json("{}").unwrap(),
        ExtractOptions::default()
    );
}

#[test]
fn test_limit_overrides_keep_unset_defaults() {
    let options = ExtractOptions::from_json(r#"{ "maxDepth": 4 }"#).unwrap();
    assert_eq!(
        options.recursion_profile(RecursionProfile::Closure),
        RecursionProfile::Custom {
            max_depth: 4,
            max_iterations: RecursionProfile::Closure.max_iterations(),
        }
    );
}
