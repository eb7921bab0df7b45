//! Unit tests for data-source parsing and applicability.

use rstest::rstest;

use super::*;
use crate::document::Scalar;
use crate::object::{NoTypes, Record};

fn raw_source(model_class: &str) -> RawDataSource {
    RawDataSource {
        model_class: Some(model_class.into()),
        ..RawDataSource::default()
    }
}

fn eq_test(attr: &str, value: &str) -> RawTest {
    RawTest {
        kind: Some("eq".into()),
        test_attr: Some(attr.into()),
        result_type: None,
        value: Some(Scalar::Text(value.into())),
    }
}

#[test]
fn parses_model_class_tests_and_params() {
    let raw = RawDataSource {
        tests: vec![eq_test("state", "ok")],
        to_params: vec![
            RawToParam {
                param: Some("dataset_id".into()),
                param_attr: Some("id".into()),
                assign: None,
            },
            RawToParam {
                param: Some("mode".into()),
                assign: Some(Scalar::Text("simple".into())),
                param_attr: None,
            },
        ],
        ..raw_source("HistoryDatasetAssociation")
    };
    let source = parse_data_source("scatter", &raw).expect("valid data source");
    assert_eq!(source.model_type(), ModelType::HistoryDatasetAssociation);
    assert_eq!(source.tests().len(), 1);
    assert_eq!(
        source.to_params().get("dataset_id"),
        Some(&ToParamRule::ParamAttr("id".into()))
    );
    assert_eq!(
        source.to_params().get("mode"),
        Some(&ToParamRule::Assign("simple".into()))
    );
}

#[rstest]
#[case::missing(RawDataSource::default(), "model_class")]
#[case::unknown(raw_source("Workflow"), "Workflow")]
fn rejects_bad_model_class(#[case] raw: RawDataSource, #[case] fragment: &str) {
    let error = parse_data_source("scatter", &raw).expect_err("invalid model class");
    assert!(
        error.to_string().contains(fragment),
        "expected '{fragment}' in: {error}"
    );
}

#[rstest]
#[case::both(Some(Scalar::Text("x".into())), Some("id"))]
#[case::neither(None, None)]
fn to_param_needs_exactly_one_source(#[case] assign: Option<Scalar>, #[case] attr: Option<&str>) {
    let raw = RawDataSource {
        to_params: vec![RawToParam {
            param: Some("dataset_id".into()),
            assign,
            param_attr: attr.map(str::to_owned),
        }],
        ..raw_source("HistoryDatasetAssociation")
    };
    assert!(parse_data_source("scatter", &raw).is_err());
}

#[test]
fn applies_requires_matching_type() {
    let source = DataSource::new(ModelType::Visualization);
    let hda = Record::new("hda").with_model_type(ModelType::HistoryDatasetAssociation);
    let untyped = Record::new("plain");
    let visualization = Record::new("vis").with_model_type(ModelType::Visualization);
    assert!(!source.applies_to(&hda, &NoTypes));
    assert!(!source.applies_to(&untyped, &NoTypes));
    assert!(source.applies_to(&visualization, &NoTypes));
}

#[test]
fn applies_when_any_test_passes() {
    let raw = RawDataSource {
        tests: vec![eq_test("state", "error"), eq_test("state", "ok")],
        ..raw_source("HistoryDatasetAssociation")
    };
    let source = parse_data_source("scatter", &raw).expect("valid data source");
    let ok = Record::new("hda")
        .with_model_type(ModelType::HistoryDatasetAssociation)
        .with_value("state", "ok");
    let queued = Record::new("hda")
        .with_model_type(ModelType::HistoryDatasetAssociation)
        .with_value("state", "queued");
    assert!(source.applies_to(&ok, &NoTypes));
    assert!(!source.applies_to(&queued, &NoTypes));
}

#[test]
fn output_params_omit_absent_attributes() {
    let source = DataSource::new(ModelType::HistoryDatasetAssociation)
        .with_to_param("dataset_id", ToParamRule::ParamAttr("id".into()))
        .with_to_param("dbkey", ToParamRule::ParamAttr("dbkey".into()))
        .with_to_param("mode", ToParamRule::Assign("simple".into()));
    let hda = Record::new("hda").with_field("id", Attr::Id(9));
    let params = source.output_params(&hda);
    assert_eq!(params.len(), 2);
    assert!(matches!(params.get("dataset_id"), Some(Attr::Id(9))));
    assert_eq!(params.get("mode").map(Attr::text).as_deref(), Some("simple"));
    assert!(!params.contains_key("dbkey"));
}
