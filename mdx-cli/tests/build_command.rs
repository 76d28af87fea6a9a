use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const BUNDLE: &str = r#"{
  "project": "Demo",
  "root": "index",
  "documents": [
    {
      "id": "index",
      "source": "index.rst",
      "title": "Home",
      "tree": {
        "kind": "document",
        "children": [
          {"kind": "paragraph", "children": [{"kind": "text", "attributes": {"value": "Welcome."}}]},
          {"kind": "image", "attributes": {"uri": "logo.png", "alt": "Logo"}},
          {"kind": "toctree", "attributes": {"entries": [[null, "guide"]]}}
        ]
      }
    },
    {
      "id": "guide",
      "title": "Guide",
      "tree": {
        "kind": "document",
        "children": [
          {"kind": "paragraph", "children": [{"kind": "text", "attributes": {"value": "Read me."}}]}
        ]
      }
    }
  ]
}"#;

fn write_bundle(dir: &Path, bundle: &str) -> std::path::PathBuf {
    let path = dir.join("bundle.json");
    fs::write(&path, bundle).unwrap();
    fs::write(dir.join("logo.png"), b"png").unwrap();
    path
}

#[test]
fn build_writes_documents_assets_and_manifest() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let bundle = write_bundle(src.path(), BUNDLE);

    let mut cmd = cargo_bin_cmd!("mdx");
    cmd.arg("build")
        .arg(bundle.as_os_str())
        .arg("--out")
        .arg(out.path().as_os_str())
        .arg("--jobs")
        .arg("2");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 document(s) and 1 asset(s)"));

    let index = fs::read_to_string(out.path().join("index.mdx")).unwrap();
    assert!(index.starts_with("Welcome.\n\n![Logo](./_assets/logo.png)"), "{index}");
    assert_eq!(
        fs::read_to_string(out.path().join("guide.mdx")).unwrap(),
        "Read me.\n"
    );
    assert!(out.path().join("_assets/logo.png").exists());
    let manifest = fs::read_to_string(out.path().join("manifest.yml")).unwrap();
    assert!(manifest.contains("projectName: Demo"));
    assert!(manifest.contains("key: guide.mdx"));
}

#[test]
fn failing_documents_are_reported_after_the_rest_is_written() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let broken = BUNDLE.replace(
        r#"{"kind": "paragraph", "children": [{"kind": "text", "attributes": {"value": "Read me."}}]}"#,
        r#"{"kind": "download_reference", "position": {"file": "guide.rst", "line": 3}}"#,
    );
    let bundle = write_bundle(src.path(), &broken);

    let mut cmd = cargo_bin_cmd!("mdx");
    cmd.arg("build")
        .arg(bundle.as_os_str())
        .arg("--out")
        .arg(out.path().as_os_str());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error in 'guide'"))
        .stderr(predicate::str::contains("reftarget"));

    assert!(out.path().join("index.mdx").exists());
    assert!(!out.path().join("guide.mdx").exists());
}

#[test]
fn config_file_changes_the_output_suffix() {
    let src = tempdir().unwrap();
    let out = tempdir().unwrap();
    let bundle = write_bundle(src.path(), BUNDLE);
    let config = src.path().join("mdx.toml");
    fs::write(&config, "[output]\nsuffix = \".md\"\nmanifest = \"sidebar.yml\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("mdx");
    cmd.arg("build")
        .arg(bundle.as_os_str())
        .arg("--out")
        .arg(out.path().as_os_str())
        .arg("--config")
        .arg(config.as_os_str());
    cmd.assert().success();

    assert!(out.path().join("index.md").exists());
    let manifest = fs::read_to_string(out.path().join("sidebar.yml")).unwrap();
    assert!(manifest.contains("key: guide.md"));
}

#[test]
fn invalid_bundles_fail_cleanly() {
    let src = tempdir().unwrap();
    let bundle = src.path().join("bundle.json");
    fs::write(&bundle, "{\"documents\": 3}").unwrap();

    let mut cmd = cargo_bin_cmd!("mdx");
    cmd.arg("build")
        .arg(bundle.as_os_str())
        .arg("--out")
        .arg(src.path().join("out").as_os_str());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid document bundle"));
}

#[test]
fn sidebar_prints_the_manifest() {
    let src = tempdir().unwrap();
    let bundle = write_bundle(src.path(), BUNDLE);

    let mut cmd = cargo_bin_cmd!("mdx");
    cmd.arg("sidebar").arg(bundle.as_os_str());
    cmd.assert().success().stdout(predicate::eq(
        "version: '2'\nprojectName: Demo\nsidebar:\n- type: doc\n  key: guide.mdx\n  title: Guide\n",
    ));
}
