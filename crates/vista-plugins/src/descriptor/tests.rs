//! Unit tests for plugin descriptors.

use rstest::rstest;

use super::*;
use crate::object::ModelType;

fn sources() -> Vec<DataSource> {
    vec![DataSource::new(ModelType::HistoryDatasetAssociation)]
}

#[rstest]
#[case::primary(RenderTarget::Primary, "primary")]
#[case::top(RenderTarget::Top, "top")]
#[case::blank(RenderTarget::Blank, "blank")]
fn render_target_display(#[case] target: RenderTarget, #[case] expected: &str) {
    assert_eq!(target.to_string(), expected);
    assert_eq!(RenderTarget::from_config(Some(expected)), target);
}

#[rstest]
#[case::missing(None)]
#[case::invalid(Some("_parent"))]
fn render_target_falls_back_to_default(#[case] raw: Option<&str>) {
    assert_eq!(RenderTarget::from_config(raw), RenderTarget::Primary);
}

#[test]
fn new_descriptor_has_defaults() {
    let plugin = PluginDescriptor::new("table", sources(), "table.html").expect("valid");
    assert_eq!(plugin.name(), "table");
    assert_eq!(plugin.template(), "table.html");
    assert!(!plugin.embeddable());
    assert_eq!(plugin.render_target(), RenderTarget::Primary);
    assert_eq!(plugin.routing(), RoutingStyle::Generic);
    assert!(plugin.params().is_empty());
    assert!(plugin.param_modifiers().is_empty());
    assert!(plugin.link_text().is_none());
    assert!(plugin.path().is_none());
}

#[rstest]
#[case::empty_name("  ", sources(), "t.html", "name")]
#[case::no_sources("table", Vec::new(), "t.html", "data sources")]
#[case::empty_template("table", sources(), "", "template")]
fn new_rejects_invalid_descriptors(
    #[case] name: &str,
    #[case] data_sources: Vec<DataSource>,
    #[case] template: &str,
    #[case] fragment: &str,
) {
    let error = PluginDescriptor::new(name, data_sources, template).expect_err("invalid");
    assert!(matches!(error, PluginError::ConfigValidation { .. }));
    assert!(
        error.to_string().contains(fragment),
        "expected '{fragment}' in: {error}"
    );
}

#[test]
fn builder_methods_set_optional_fields() {
    let plugin = PluginDescriptor::new("table", sources(), "table.html")
        .expect("valid")
        .with_embeddable(true)
        .with_link_text(Some("Table".into()))
        .with_render_target(RenderTarget::Blank)
        .with_routing(RoutingStyle::LegacyBuiltin)
        .with_path(PathBuf::from("/plugins/table"));
    assert!(plugin.embeddable());
    assert_eq!(plugin.link_text(), Some("Table"));
    assert_eq!(plugin.render_target(), RenderTarget::Blank);
    assert_eq!(plugin.routing(), RoutingStyle::LegacyBuiltin);
    assert_eq!(plugin.path(), Some(Path::new("/plugins/table")));
}
