//! Unit tests for the param and modifier parser.

use rstest::rstest;

use super::*;
use crate::document::{RawParam, Scalar};

fn raw(name: &str, kind: &str) -> RawParam {
    RawParam {
        name: Some(name.into()),
        kind: Some(kind.into()),
        ..RawParam::default()
    }
}

#[rstest]
#[case::str("str", ValueType::Primitive(PrimitiveType::String))]
#[case::string("string", ValueType::Primitive(PrimitiveType::String))]
#[case::bool("bool", ValueType::Primitive(PrimitiveType::Bool))]
#[case::int("int", ValueType::Primitive(PrimitiveType::Int))]
#[case::float("float", ValueType::Primitive(PrimitiveType::Float))]
#[case::json("json", ValueType::Primitive(PrimitiveType::Json))]
#[case::visualization("visualization", ValueType::Resource(ResourceKind::Visualization))]
#[case::dataset("dataset", ValueType::Resource(ResourceKind::Dataset))]
#[case::role_hint("hda_or_ldda", ValueType::Resource(ResourceKind::DatasetByRoleHint))]
#[case::build_key("dbkey", ValueType::Resource(ResourceKind::BuildKey))]
fn value_type_names(#[case] name: &str, #[case] expected: ValueType) {
    assert_eq!(ValueType::from_config(Some(name)), Ok(expected));
}

#[test]
fn absent_type_means_string() {
    assert_eq!(
        ValueType::from_config(None),
        Ok(ValueType::Primitive(PrimitiveType::String))
    );
}

#[test]
fn parse_param_reads_all_attributes() {
    let element = RawParam {
        default: Some(Scalar::Text("1,2".into())),
        csv: Some(Scalar::Text("true".into())),
        constrain_to: Some("1, 2,3".into()),
        var_name_in_template: Some("cols".into()),
        ..raw("columns", "int")
    };
    let (key, descriptor) = parse_param("scatter", &element).expect("valid param");
    assert_eq!(key, "columns");
    assert_eq!(descriptor.value_type(), ValueType::Primitive(PrimitiveType::Int));
    assert!(!descriptor.is_required());
    assert_eq!(descriptor.default_value(), Some("1,2"));
    assert!(descriptor.is_list());
    assert_eq!(
        descriptor.constrain_to(),
        Some(&["1".to_owned(), "2".to_owned(), "3".to_owned()][..])
    );
    assert_eq!(descriptor.output_key(&key), "cols");
}

#[test]
fn required_params_ignore_defaults() {
    let element = RawParam {
        required: Some(Scalar::Bool(true)),
        default: Some(Scalar::Text("fallback".into())),
        ..raw("dataset_id", "dataset")
    };
    let (_, descriptor) = parse_param("scatter", &element).expect("valid param");
    assert!(descriptor.is_required());
    assert_eq!(descriptor.default_value(), None);
}

#[rstest]
#[case::literal_false(Scalar::Text("false".into()))]
#[case::capitalised(Scalar::Text("True".into()))]
#[case::yes(Scalar::Text("yes".into()))]
fn only_literal_true_sets_flags(#[case] value: Scalar) {
    let element = RawParam {
        required: Some(value.clone()),
        csv: Some(value),
        ..raw("x", "str")
    };
    let (_, descriptor) = parse_param("p", &element).expect("valid param");
    assert!(!descriptor.is_required());
    assert!(!descriptor.is_list());
}

#[test]
fn unknown_type_is_a_validation_error() {
    let error = parse_param("scatter", &raw("x", "matrix")).expect_err("unknown type");
    assert!(matches!(error, PluginError::ConfigValidation { .. }));
    assert!(error.to_string().contains("matrix"));
}

#[test]
fn nameless_param_is_a_validation_error() {
    let element = RawParam::default();
    assert!(parse_param("scatter", &element).is_err());
}

#[test]
fn modifier_requires_target() {
    let error = parse_modifier("scatter", &raw("hda_ldda", "str")).expect_err("no target");
    assert!(error.to_string().contains("modifies"));
}

#[test]
fn modifiers_attach_to_declared_params_only() {
    let params = vec![raw("dataset_id", "hda_or_ldda")];
    let modifiers = vec![
        RawParam {
            modifies: Some("dataset_id".into()),
            default: Some(Scalar::Text("hda".into())),
            ..raw("hda_ldda", "str")
        },
        RawParam {
            modifies: Some("undeclared".into()),
            ..raw("orphan", "str")
        },
    ];
    let (schema, parsed) = parse_params("scatter", &params, &modifiers).expect("valid block");
    assert_eq!(schema.len(), 1);
    let set = parsed.for_param("dataset_id").expect("modifiers for dataset_id");
    assert_eq!(set.len(), 1);
    assert_eq!(
        set.get("hda_ldda").and_then(ParamDescriptor::default_value),
        Some("hda")
    );
    assert!(parsed.for_param("undeclared").is_none());
}

#[test]
fn role_hint_kind_names_its_modifier() {
    assert_eq!(
        ResourceKind::DatasetByRoleHint.required_modifier(),
        Some(ROLE_HINT_MODIFIER)
    );
    assert_eq!(ResourceKind::Dataset.required_modifier(), None);
}
