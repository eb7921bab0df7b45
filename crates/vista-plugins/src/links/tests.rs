//! Unit tests for link synthesis.

use std::collections::BTreeMap;

use rstest::{fixture, rstest};

use super::*;
use crate::data_source::{DataSource, ToParamRule};
use crate::object::{ModelType, NoTypes, Record, StaticTypes};
use crate::predicate::{AttributePath, ExpectedKind, Predicate, PredicateKind};

/// Encodes identifiers as prefixed hexadecimal.
struct HexCodec;

impl IdCodec for HexCodec {
    fn encode(&self, id: u64) -> String {
        format!("x{id:x}")
    }

    fn decode(&self, encoded: &str) -> Result<u64, CodecError> {
        encoded
            .strip_prefix('x')
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .ok_or_else(|| CodecError {
                encoded: encoded.to_owned(),
                message: "expected x-prefixed hex".to_owned(),
            })
    }
}

fn equals(path: &str, expected: &str) -> Predicate {
    Predicate::new(
        PredicateKind::Equals,
        AttributePath::parse(path),
        expected,
        ExpectedKind::String,
    )
}

fn dataset_source() -> DataSource {
    DataSource::new(ModelType::HistoryDatasetAssociation)
        .with_to_param("dataset_id", ToParamRule::ParamAttr("id".into()))
}

fn plugin(name: &str, sources: Vec<DataSource>) -> PluginDescriptor {
    PluginDescriptor::new(name, sources, format!("{name}.html")).expect("valid descriptor")
}

#[fixture]
fn hda() -> Record {
    Record::new("reads.tsv")
        .with_model_type(ModelType::HistoryDatasetAssociation)
        .with_field("id", Attr::Id(42))
        .with_value("extension", "tabular")
        .with_value("state", "ok")
}

fn registry(plugins: Vec<PluginDescriptor>) -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    for plugin in plugins {
        registry.register(plugin);
    }
    registry
}

// ---------------------------------------------------------------------------
// Applicability
// ---------------------------------------------------------------------------

#[rstest]
fn links_only_for_applicable_plugins(hda: Record) {
    let registry = registry(vec![
        plugin("table", vec![dataset_source().with_test(equals("extension", "tabular"))]),
        plugin("genome", vec![dataset_source().with_test(equals("extension", "bam"))]),
        plugin(
            "saved",
            vec![DataSource::new(ModelType::Visualization)],
        ),
    ]);
    let urls = PathUrlBuilder::default();
    let links = LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes).links_for(&hda);

    let names: Vec<&str> = links.iter().map(|link| link.plugin.as_str()).collect();
    assert_eq!(names, vec!["table"]);
}

#[rstest]
fn any_passing_test_is_enough(hda: Record) {
    let registry = registry(vec![plugin(
        "table",
        vec![
            dataset_source()
                .with_test(equals("extension", "bam"))
                .with_test(equals("state", "ok")),
        ],
    )]);
    let urls = PathUrlBuilder::default();
    assert_eq!(
        LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes)
            .links_for(&hda)
            .len(),
        1
    );
}

#[rstest]
fn first_applicable_source_supplies_params(hda: Record) {
    let target = plugin(
        "table",
        vec![
            DataSource::new(ModelType::HistoryDatasetAssociation)
                .with_test(equals("extension", "tabular"))
                .with_to_param("first", ToParamRule::Assign("yes".into())),
            DataSource::new(ModelType::HistoryDatasetAssociation)
                .with_to_param("second", ToParamRule::Assign("yes".into())),
        ],
    );
    let registry = PluginRegistry::new();
    let urls = PathUrlBuilder::default();
    let link = LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes)
        .link_for(&target, &hda)
        .expect("plugin applies");
    assert_eq!(link.url, "/visualizations/table/show?first=yes");
}

#[rstest]
fn instance_tests_consult_the_type_registry(hda: Record) {
    let typed = hda.with_type("tabular.Tabular");
    let target = plugin(
        "table",
        vec![dataset_source().with_test(Predicate::new(
            PredicateKind::IsInstance,
            AttributePath::parse(""),
            "tabular.Tabular",
            ExpectedKind::Datatype,
        ))],
    );
    let registry = PluginRegistry::new();
    let urls = PathUrlBuilder::default();
    let known = StaticTypes::new(["tabular.Tabular"]);

    assert!(
        LinkBuilder::new(&registry, &HexCodec, &urls, &known)
            .link_for(&target, &typed)
            .is_some()
    );
    assert!(
        LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes)
            .link_for(&target, &typed)
            .is_none()
    );
}

// ---------------------------------------------------------------------------
// Link contents
// ---------------------------------------------------------------------------

#[rstest]
fn identifiers_are_encoded(hda: Record) {
    let registry = registry(vec![plugin("table", vec![dataset_source()])]);
    let urls = PathUrlBuilder::new("/galaxy/");
    let links = LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes).links_for(&hda);

    let link = links.first().expect("one link");
    assert_eq!(link.url, "/galaxy/visualizations/table/show?dataset_id=x2a");
    assert!(!link.url.contains("42"));
}

#[rstest]
fn absent_attributes_are_omitted(hda: Record) {
    let target = plugin(
        "table",
        vec![dataset_source().with_to_param("hid", ToParamRule::ParamAttr("hid".into()))],
    );
    let registry = PluginRegistry::new();
    let urls = PathUrlBuilder::default();
    let link = LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes)
        .link_for(&target, &hda)
        .expect("plugin applies");
    assert!(!link.url.contains("hid="));
}

#[rstest]
fn legacy_plugins_use_their_builtin_route(hda: Record) {
    let target = plugin("trackster", vec![dataset_source()]).with_routing(RoutingStyle::LegacyBuiltin);
    let registry = PluginRegistry::new();
    let urls = PathUrlBuilder::default();
    let link = LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes)
        .link_for(&target, &hda)
        .expect("plugin applies");
    assert_eq!(link.url, "/visualization/trackster?dataset_id=x2a");
}

#[rstest]
#[case::link_text(Some("Scatterplot"), "Scatterplot")]
#[case::fallback(None, "scatterplot")]
fn display_name_prefers_link_text(hda: Record, #[case] link_text: Option<&str>, #[case] expected: &str) {
    let target = plugin("scatterplot", vec![dataset_source()])
        .with_link_text(link_text.map(str::to_owned))
        .with_render_target(RenderTarget::Top)
        .with_embeddable(true);
    let registry = PluginRegistry::new();
    let urls = PathUrlBuilder::default();
    let link = LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes)
        .link_for(&target, &hda)
        .expect("plugin applies");
    assert_eq!(link.display_name, expected);
    assert_eq!(link.render_target, RenderTarget::Top);
    assert!(link.embeddable);
}

#[rstest]
fn links_are_sorted_by_plugin_name(hda: Record) {
    let registry = registry(
        ["zeta", "alpha", "mid"]
            .into_iter()
            .map(|name| plugin(name, vec![dataset_source()]))
            .collect(),
    );
    let urls = PathUrlBuilder::default();
    let links = LinkBuilder::new(&registry, &HexCodec, &urls, &NoTypes).links_for(&hda);
    let names: Vec<&str> = links.iter().map(|link| link.plugin.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

#[rstest]
#[case::typed_id("anything", Attr::Id(255), "xff")]
#[case::numeric_under_id_key("history_id", Attr::Value(serde_json::json!(16)), "x10")]
#[case::numeric_text_under_id_key("id", Attr::Value(serde_json::json!("16")), "x10")]
#[case::plain_number("columns", Attr::Value(serde_json::json!(16)), "16")]
#[case::non_numeric_id("dbkey_id", Attr::Value(serde_json::json!("hg19")), "hg19")]
fn encode_ids_cases(#[case] key: &str, #[case] attr: Attr, #[case] expected: &str) {
    let encoded = encode_ids(&HexCodec, BTreeMap::from([(key.to_owned(), attr)]));
    assert_eq!(encoded.get(key).map(String::as_str), Some(expected));
}

#[test]
fn codec_round_trips() {
    assert_eq!(HexCodec.decode(&HexCodec.encode(1234)).ok(), Some(1234));
    assert!(HexCodec.decode("1234").is_err());
}

#[test]
fn url_builder_escapes_names_and_values() {
    let urls = PathUrlBuilder::new("");
    let params = BTreeMap::from([("title".to_owned(), "a b&c".to_owned())]);
    assert_eq!(
        urls.build(Route::Render { plugin: "my plot" }, &params),
        "/visualizations/my%20plot/show?title=a+b%26c"
    );
    assert_eq!(
        urls.build(Route::Legacy { plugin: "trackster" }, &BTreeMap::new()),
        "/visualization/trackster"
    );
}
