use super::*;
use serde_json::json;

#[test]
fn test_is_flag_or_object() {
    assert!(is_flag_or_object(&json!(true)));
    assert!(is_flag_or_object(&json!({})));
    assert!(!is_flag_or_object(&json!(null)));
    assert!(!is_flag_or_object(&json!([])));
    assert!(!is_flag_or_object(&json!("x")));
    assert!(!is_flag_or_object(&json!(1)));

    assert!(is_object(&json!({})));
    assert!(!is_object(&json!(false)));
}

#[test]
fn test_property_schemas_keep_only_schema_values() {
    let source = json!({
        "name": {"type": "string"},
        "flag": false,
        "title": "metadata",
        "list": [],
        "none": null,
    });
    let schemas = get_property_schemas(&source);
    assert_eq!(schemas.keys().copied().collect::<Vec<_>>(), vec!["flag", "name"]);
    assert_eq!(schemas["flag"], &json!(false));

    assert!(get_property_schemas(&json!("not an object")).is_empty());
}

#[test]
fn test_pattern_entries_precede_catch_all() {
    let schema = json!({
        "patternProperties": {"^x": {"type": "number"}},
        "additionalProperties": {"type": "string"},
    });
    let patterns = get_additional_property_schemas(&schema).unwrap();
    assert_eq!(patterns.len(), 2);
    assert!(patterns[1].expression.is_none());

    let xyz = find_patterned_schema_for(&patterns, "xyz").unwrap();
    assert_eq!(xyz.schema, &json!({"type": "number"}));
    let abc = find_patterned_schema_for(&patterns, "abc").unwrap();
    assert_eq!(abc.schema, &json!({"type": "string"}));

    let bare = json!({});
    let empty = get_additional_property_schemas(&bare).unwrap();
    assert!(find_patterned_schema_for(&empty, "abc").is_none());
}

#[test]
fn test_overlapping_patterns_follow_declaration_order() {
    let schema = json!({
        "patternProperties": {
            "z": {"title": "Z"},
            "a": {"title": "A"},
        },
    });
    let patterns = get_additional_property_schemas(&schema).unwrap();
    let sources: Vec<_> = patterns
        .iter()
        .map(|p| p.expression.as_ref().unwrap().as_str())
        .collect();
    assert_eq!(sources, vec!["z", "a"]);

    // 两个模式都匹配时取先声明的
    let za = find_patterned_schema_for(&patterns, "za").unwrap();
    assert_eq!(za.schema, &json!({"title": "Z"}));
    assert_eq!(
        resolve_property_schema(&schema, "az").unwrap(),
        Some(&json!({"title": "Z"}))
    );
    assert_eq!(
        resolve_property_schema(&schema, "apple").unwrap(),
        Some(&json!({"title": "A"}))
    );
}

#[test]
fn test_property_names_pattern_restricts_catch_all() {
    let schema = json!({
        "additionalProperties": true,
        "propertyNames": {"pattern": "[0-9]"},
    });
    let patterns = get_additional_property_schemas(&schema).unwrap();
    // 匹配任意位置，而非整串匹配
    assert!(find_patterned_schema_for(&patterns, "item2").is_some());
    assert!(find_patterned_schema_for(&patterns, "item").is_none());
}

#[test]
fn test_non_schema_fallbacks_ignored() {
    let schema = json!({
        "patternProperties": {"^a": "nope"},
        "additionalProperties": 3,
    });
    assert!(get_additional_property_schemas(&schema).unwrap().is_empty());
}

#[test]
fn test_invalid_pattern_is_error() {
    let schema = json!({"patternProperties": {"(": true}});
    let err = get_additional_property_schemas(&schema).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidPattern { ref pattern, .. } if pattern == "("));
}

#[test]
fn test_property_name_errors() {
    let schema = json!({});
    let id = vec!["id".to_string()];
    assert_eq!(
        get_property_name_error("", &[], Some(&schema)),
        Some(PropertyNameError::EmptyName)
    );
    assert_eq!(
        get_property_name_error("id", &id, Some(&schema)),
        Some(PropertyNameError::ReservedName)
    );
    assert_eq!(
        get_property_name_error("free", &[], None),
        Some(PropertyNameError::NoSchema)
    );
    assert_eq!(get_property_name_error("free", &[], Some(&schema)), None);

    // 空名优先于保留名
    let empty_reserved = vec![String::new()];
    assert_eq!(
        get_property_name_error("", &empty_reserved, None).map(|e| e.code()),
        Some("noEmptyPropertyName")
    );
}

#[test]
fn test_resolve_property_schema() {
    let schema = json!({
        "properties": {"name": {"type": "string"}, "note": "ignored"},
        "patternProperties": {"^x": {"type": "number"}},
        "additionalProperties": false,
    });
    assert_eq!(
        resolve_property_schema(&schema, "name").unwrap(),
        Some(&json!({"type": "string"}))
    );
    assert_eq!(
        resolve_property_schema(&schema, "xray").unwrap(),
        Some(&json!({"type": "number"}))
    );
    assert_eq!(resolve_property_schema(&schema, "other").unwrap(), Some(&json!(false)));
    assert_eq!(resolve_property_schema(&schema, "note").unwrap(), Some(&json!(false)));

    assert_eq!(resolve_property_schema(&json!({}), "any").unwrap(), None);
    assert_eq!(resolve_property_schema(&json!(true), "any").unwrap(), Some(&json!(true)));
}

#[test]
fn test_resolver_name_error() {
    let schema = json!({"properties": {"id": {}, "name": {}}});
    let resolver = ObjectSchemaResolver::new(&schema).unwrap();
    let reserved = vec!["id".to_string()];
    assert_eq!(resolver.named_properties().len(), 2);
    assert_eq!(resolver.name_error("name", &reserved), None);
    assert_eq!(resolver.name_error("id", &reserved), Some(PropertyNameError::ReservedName));
    assert_eq!(resolver.name_error("other", &reserved), Some(PropertyNameError::NoSchema));
}

#[test]
fn test_item_schema() {
    assert_eq!(item_schema(&json!({"items": {"type": "string"}})), Some(&json!({"type": "string"})));
    assert_eq!(item_schema(&json!({"items": 5})), None);
    assert_eq!(item_schema(&json!(true)), Some(&json!(true)));
    assert_eq!(item_schema(&json!({})), None);
}

#[test]
fn test_expanded_type() {
    assert_eq!(get_expanded_type_of(&json!(null)), "null");
    assert_eq!(get_expanded_type_of(&json!(true)), "boolean");
    assert_eq!(get_expanded_type_of(&json!(3)), "integer");
    assert_eq!(get_expanded_type_of(&json!(3.0)), "integer");
    assert_eq!(get_expanded_type_of(&json!(1.5)), "number");
    assert_eq!(get_expanded_type_of(&json!("s")), "string");
    assert_eq!(get_expanded_type_of(&json!([])), "array");
    assert_eq!(get_expanded_type_of(&json!({})), "object");
}
