use mdx_babel::error::{DocumentError, TranslateError};
use mdx_babel::paths::{PathOptions, Pathfinder};
use mdx_babel::source::DocumentSet;
use mdx_babel::{build, BuildSpec};
use insta::assert_snapshot;
use std::fs;
use tempfile::tempdir;

const BUNDLE: &str = r#"{
  "project": "Handbook",
  "root": "index",
  "documents": [
    {
      "id": "index",
      "source": "index.rst",
      "tree": {
        "kind": "document",
        "children": [{
          "kind": "section",
          "attributes": {"ids": ["handbook"]},
          "children": [
            {"kind": "title", "children": [{"kind": "text", "attributes": {"value": "Handbook"}}]},
            {"kind": "paragraph", "children": [
              {"kind": "text", "attributes": {"value": "Start with "}},
              {"kind": "reference", "attributes": {"refuri": "guide/Setup"}},
              {"kind": "text", "attributes": {"value": "."}}
            ]},
            {"kind": "compound", "attributes": {"classes": ["toctree-wrapper"]}, "children": [
              {"kind": "toctree", "attributes": {"caption": "Guides", "entries": [[null, "guide/Setup"], ["Upstream", "https://example.org/"]]}}
            ]}
          ]
        }]
      }
    },
    {
      "id": "guide/Setup",
      "source": "guide/Setup.rst",
      "tree": {
        "kind": "document",
        "children": [{
          "kind": "section",
          "attributes": {"ids": ["setup"]},
          "children": [
            {"kind": "title", "children": [{"kind": "text", "attributes": {"value": "Setup"}}]},
            {"kind": "paragraph", "children": [
              {"kind": "download_reference", "attributes": {"reftarget": "files/config.toml"}, "children": [
                {"kind": "literal", "attributes": {"classes": ["download"]}, "children": [{"kind": "text", "attributes": {"value": "config.toml"}}]}
              ]}
            ]},
            {"kind": "image", "attributes": {"uri": "/_static/logo.png", "alt": "Logo"}}
          ]
        }]
      }
    },
    {
      "id": "guide/Broken",
      "tree": {
        "kind": "document",
        "children": [{"kind": "image", "position": {"file": "guide/Broken.rst", "line": 12}}]
      }
    }
  ]
}"#;

fn source_tree() -> tempfile::TempDir {
    let src = tempdir().unwrap();
    fs::create_dir_all(src.path().join("guide/files")).unwrap();
    fs::create_dir_all(src.path().join("_static")).unwrap();
    fs::write(src.path().join("guide/files/config.toml"), "jobs = 2\n").unwrap();
    fs::write(src.path().join("_static/logo.png"), b"png").unwrap();
    src
}

#[test]
fn builds_a_bundle() {
    let src = source_tree();
    let out = tempdir().unwrap();
    let documents = DocumentSet::from_json(BUNDLE).unwrap();
    let pathfinder = Pathfinder::new(src.path(), out.path()).with_options(PathOptions {
        lowercase: true,
        ..PathOptions::default()
    });

    let report = build(BuildSpec::new(&documents, pathfinder).with_jobs(3)).unwrap();

    assert_eq!(report.written.len(), 2);
    assert_eq!(report.copied_assets, 2);
    assert!(report.copy_failures.is_empty());

    let index = fs::read_to_string(out.path().join("index.mdx")).unwrap();
    assert_snapshot!(index, @r###"
    # <Target id="handbook"></Target>Handbook

    Start with [Setup](guide/setup.mdx).

    <TableOfContents></TableOfContents>
    "###);

    let setup = fs::read_to_string(out.path().join("guide/setup.mdx")).unwrap();
    assert_snapshot!(setup, @r###"
    # <Target id="setup"></Target>Setup

    <a href="../_assets/config.toml" download>config.toml</a>

    ![Logo](../_assets/logo.png)
    "###);

    assert_eq!(
        fs::read_to_string(out.path().join("_assets/config.toml")).unwrap(),
        "jobs = 2\n"
    );

    let manifest = fs::read_to_string(out.path().join("manifest.yml")).unwrap();
    assert_snapshot!(manifest, @r###"
    version: '2'
    projectName: Handbook
    sidebar:
    - type: category
      key: index#toctree-0
      title: Guides
      children:
      - type: doc
        key: guide/setup.mdx
        title: Setup
      - type: link
        key: https://example.org/
        title: Upstream
    "###);
}

#[test]
fn broken_documents_are_reported_with_their_location() {
    let src = source_tree();
    let out = tempdir().unwrap();
    let documents = DocumentSet::from_json(BUNDLE).unwrap();

    let report = build(BuildSpec::new(&documents, Pathfinder::new(src.path(), out.path()))).unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    let failure = &report.failed[0];
    assert_eq!(failure.id, "guide/Broken");
    match &failure.error {
        DocumentError::Translate(error @ TranslateError::MissingAttribute { location, .. }) => {
            assert_eq!(location, "guide/Broken.rst:12");
            assert!(!error.is_fatal());
        }
        other => panic!("unexpected failure: {other:?}"),
    }
    assert!(out.path().join("index.mdx").exists());
    assert!(out.path().join("guide/Setup.mdx").exists());
}

#[test]
fn json_format_dumps_the_target_tree() {
    let src = source_tree();
    let out = tempdir().unwrap();
    let documents = DocumentSet::from_json(BUNDLE).unwrap();
    let pathfinder = Pathfinder::new(src.path(), out.path()).with_options(PathOptions {
        suffix: ".json".to_string(),
        ..PathOptions::default()
    });

    build(
        BuildSpec::new(&documents, pathfinder)
            .with_format("json")
            .with_manifest(None),
    )
    .unwrap();

    let dumped: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.path().join("index.json")).unwrap()).unwrap();
    assert_eq!(dumped["children"][0]["type"], "heading");
    assert!(!out.path().join("manifest.yml").exists());
}
