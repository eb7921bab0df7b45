//! Behaviour-driven tests for plugin discovery and request resolution.

use std::fs;
use std::sync::Arc;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tempfile::TempDir;

use crate::registry::CONFIG_DIR;
use crate::{
    Attr, CodecError, DiscoveryReport, DomainError, DomainObject, DomainResolver, IdCodec,
    LinkBuilder, LinkDescriptor, ModelType, NoTypes, PathUrlBuilder, PluginRegistry, Record,
    RequestQuery, ResolveError, ResolvedValue, ResourceKind, ResourceMap, ResourceResolver,
};

struct TestWorld {
    root: TempDir,
    registry: PluginRegistry,
    report: Option<DiscoveryReport>,
    links: Vec<LinkDescriptor>,
    resolution: Option<Result<ResourceMap, ResolveError>>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld {
        root: tempfile::tempdir().expect("plugin root should be created"),
        registry: PluginRegistry::new(),
        report: None,
        links: Vec::new(),
        resolution: None,
    }
}

/// Encodes identifiers as `enc-<hex>`, lowercase hexadecimal.
struct PrefixCodec;

impl IdCodec for PrefixCodec {
    fn encode(&self, id: u64) -> String {
        format!("enc-{id:x}")
    }

    fn decode(&self, encoded: &str) -> Result<u64, CodecError> {
        encoded
            .strip_prefix("enc-")
            .and_then(|hex| u64::from_str_radix(hex, 16).ok())
            .ok_or_else(|| CodecError {
                encoded: encoded.to_owned(),
                message: "missing prefix".to_owned(),
            })
    }
}

/// Returns a record named after the requested identifier.
struct EchoDatasets;

impl DomainResolver for EchoDatasets {
    fn resolve(
        &self,
        kind: ResourceKind,
        id: &str,
        _modifiers: &ResourceMap,
    ) -> Result<Arc<dyn DomainObject>, DomainError> {
        match kind {
            ResourceKind::Dataset => Ok(Arc::new(Record::new(id))),
            _ => Err(DomainError::NotFound {
                kind,
                id: id.to_owned(),
            }),
        }
    }
}

fn write_document(world: &TestWorld, directory: &str, document: &str) {
    let config = world.root.path().join(directory).join(CONFIG_DIR);
    fs::create_dir_all(&config).expect("plugin directory should be created");
    fs::write(config.join(format!("{directory}.json")), document)
        .expect("plugin document should be written");
}

fn plugin_document(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "data_sources": [{
            "model_class": "HistoryDatasetAssociation",
            "tests": [{"type": "eq", "test_attr": "extension", "value": "tabular"}],
            "to_params": [{"param": "dataset_id", "param_attr": "id"}]
        }],
        "params": {
            "param": [
                {"name": "dataset_id", "type": "dataset", "required": "true"},
                {"name": "title", "type": "str"},
                {"name": "rows", "type": "int", "default": "25"}
            ]
        },
        "template": format!("{name}.html")
    })
}

fn unquoted(text: &str) -> &str {
    text.trim_matches('"')
}

fn resolved<'a>(world: &'a TestWorld, key: &str) -> &'a ResolvedValue {
    let resources = world
        .resolution
        .as_ref()
        .expect("resolution should have run")
        .as_ref()
        .expect("resolution should succeed");
    resources
        .get(key)
        .unwrap_or_else(|| panic!("parameter '{key}' should be resolved"))
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("a plugin root containing the plugin {name}")]
fn given_plugin(world: &mut TestWorld, name: String) {
    let plugin = unquoted(&name);
    write_document(world, plugin, &plugin_document(plugin).to_string());
}

#[given("a malformed plugin named {name}")]
fn given_malformed_plugin(world: &mut TestWorld, name: String) {
    write_document(world, unquoted(&name), "{ \"name\": ");
}

#[given("a disabled plugin named {name}")]
fn given_disabled_plugin(world: &mut TestWorld, name: String) {
    let plugin = unquoted(&name);
    let mut document = plugin_document(plugin);
    document["disabled"] = json!("true");
    write_document(world, plugin, &document.to_string());
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the registry discovers plugins")]
fn when_discover(world: &mut TestWorld) {
    let report = world.registry.discover(&[world.root.path()]);
    world.report = Some(report);
}

#[when("links are built for a tabular dataset with id {id}")]
fn when_links_built(world: &mut TestWorld, id: u64) {
    let dataset = Record::new("reads.tsv")
        .with_model_type(ModelType::HistoryDatasetAssociation)
        .with_field("id", Attr::Id(id))
        .with_value("extension", "tabular");
    let urls = PathUrlBuilder::new("/galaxy");
    world.links = LinkBuilder::new(&world.registry, &PrefixCodec, &urls, &NoTypes).links_for(&dataset);
}

#[when("the plugin {name} resolves the request {query}")]
fn when_resolve(world: &mut TestWorld, name: String, query: String) {
    let plugin = world
        .registry
        .require(unquoted(&name))
        .expect("plugin should be registered");
    let request = RequestQuery::parse(unquoted(&query));
    let result =
        ResourceResolver::new(&EchoDatasets).resolve_all(plugin.params(), plugin.param_modifiers(), &request);
    world.resolution = Some(result);
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("{count} plugin(s) are loaded")]
fn then_loaded(world: &mut TestWorld, count: usize) {
    assert_eq!(world.registry.len(), count, "loaded: {:?}", world.registry.names());
}

#[then("{count} discovery failure(s) are reported")]
fn then_failures(world: &mut TestWorld, count: usize) {
    let report = world.report.as_ref().expect("discovery should have run");
    assert_eq!(report.failures.len(), count);
}

#[then("the plugin {name} is unknown")]
fn then_unknown(world: &mut TestWorld, name: String) {
    assert!(world.registry.get(unquoted(&name)).is_none());
}

#[then("a link to {name} is offered")]
fn then_link_offered(world: &mut TestWorld, name: String) {
    let expected = unquoted(&name);
    assert!(
        world.links.iter().any(|link| link.plugin == expected),
        "expected a link to '{expected}', got: {:?}",
        world.links
    );
}

#[then("no link exposes the raw identifier {id}")]
fn then_no_raw_id(world: &mut TestWorld, id: u64) {
    let raw = format!("={id}");
    assert!(world.links.iter().all(|link| !link.url.contains(&raw)));
}

#[then("every link carries the encoded identifier {encoded}")]
fn then_encoded_id(world: &mut TestWorld, encoded: String) {
    let expected = format!("dataset_id={}", unquoted(&encoded));
    assert!(
        !world.links.is_empty() && world.links.iter().all(|link| link.url.contains(&expected)),
        "expected '{expected}' in: {:?}",
        world.links
    );
}

#[then("the parameter {key} resolves to the dataset {id}")]
fn then_dataset(world: &mut TestWorld, key: String, id: String) {
    let object = resolved(world, unquoted(&key))
        .as_object()
        .expect("parameter should hold a dataset");
    assert_eq!(object.text(), unquoted(&id));
}

#[then("the parameter {key} resolves to the text {text}")]
fn then_text(world: &mut TestWorld, key: String, text: String) {
    assert_eq!(resolved(world, unquoted(&key)).as_text(), Some(unquoted(&text)));
}

#[then("the parameter {key} resolves to the integer {value}")]
fn then_integer(world: &mut TestWorld, key: String, value: i64) {
    assert_eq!(resolved(world, unquoted(&key)).as_int(), Some(value));
}

#[then("resolution fails for the missing parameter {key}")]
fn then_missing(world: &mut TestWorld, key: String) {
    let error = world
        .resolution
        .as_ref()
        .expect("resolution should have run")
        .as_ref()
        .expect_err("resolution should fail");
    assert!(
        matches!(error, ResolveError::MissingRequiredParameter { key: missing } if missing == unquoted(&key)),
        "unexpected error: {error}"
    );
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(path = "tests/features/plugin_resolution.feature")]
fn plugin_resolution(world: TestWorld) {
    let _ = world;
}
