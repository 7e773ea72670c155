use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use markdown_wrapper::AttributeValue;
use markdown_wrapper_config::{Config, ConfigError, ConfigSourceKind, LoadOptions};
use tempfile::TempDir;

fn write_file(path: impl AsRef<Path>, contents: &str) {
    let mut file = fs::File::create(path).expect("create config");
    file.write_all(contents.as_bytes()).expect("write config");
}

fn canonical(path: impl AsRef<Path>) -> PathBuf {
    fs::canonicalize(path).expect("canonicalize path")
}

fn attribute_entries(config: &Config) -> Vec<(String, AttributeValue)> {
    config
        .wrapper
        .attributes
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[test]
fn loads_defaults_when_no_files_present() {
    let temp = TempDir::new().expect("tempdir");
    let working_dir = canonical(temp.path());

    let config = Config::load(LoadOptions::default().with_working_dir(working_dir.clone()))
        .expect("load defaults");

    assert_eq!(config.wrapper.tag_name, "div");
    assert_eq!(config.wrapper.class_name, "markdown-wrapper");
    assert!(config.wrapper.attributes.is_empty());

    assert_eq!(config.sources.working_directory, working_dir);
    assert_eq!(config.sources.layers.len(), 1);
    assert_eq!(config.sources.layers[0].kind, ConfigSourceKind::Default);
}

#[test]
fn applies_precedence_and_merges_attributes() {
    let temp = TempDir::new().expect("tempdir");
    let git_root = canonical(temp.path());
    fs::create_dir(git_root.join(".git")).expect("create .git");

    write_file(
        git_root.join(".markdown-wrapper.toml"),
        r#"
        [wrapper]
        tag_name = "section"
        class_name = "root-wrapper"

        [wrapper.attributes]
        id = "root"
        role = "document"
        "#,
    );

    let workspace = git_root.join("workspace");
    fs::create_dir(&workspace).expect("create workspace");

    write_file(
        workspace.join(".markdown-wrapper.toml"),
        r#"
        [wrapper]
        class_name = "local-wrapper"

        [wrapper.attributes]
        id = "local"
        data-depth = 2
        "#,
    );

    let override_path = workspace.join("override.toml");
    write_file(
        &override_path,
        r#"
        [wrapper]
        tag_name = "main"

        [wrapper.attributes]
        hidden = false
        "#,
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(workspace.clone())
            .with_override_path(&override_path),
    )
    .expect("load layered config");

    assert_eq!(config.wrapper.tag_name, "main");
    assert_eq!(config.wrapper.class_name, "local-wrapper");
    assert_eq!(
        attribute_entries(&config),
        vec![
            ("id".to_string(), AttributeValue::String("local".into())),
            ("role".to_string(), AttributeValue::String("document".into())),
            ("data-depth".to_string(), AttributeValue::Number(2.0)),
            ("hidden".to_string(), AttributeValue::Boolean(false)),
        ]
    );

    let kinds: Vec<ConfigSourceKind> = config
        .sources
        .layers
        .iter()
        .map(|layer| layer.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ConfigSourceKind::Default,
            ConfigSourceKind::GitRoot,
            ConfigSourceKind::Local,
            ConfigSourceKind::Override,
        ]
    );
    assert_eq!(
        config.sources.layers[3].path.as_deref(),
        Some(override_path.as_path())
    );
}

#[test]
fn local_config_at_git_root_loads_once() {
    let temp = TempDir::new().expect("tempdir");
    let root = canonical(temp.path());
    fs::create_dir(root.join(".git")).expect("create .git");
    write_file(
        root.join(".markdown-wrapper.toml"),
        "[wrapper]\nclass_name = \"prose\"\n",
    );

    let config = Config::load(LoadOptions::default().with_working_dir(root.clone()))
        .expect("load config");

    assert_eq!(config.wrapper.class_name, "prose");
    assert_eq!(config.sources.layers.len(), 2);
    assert_eq!(config.sources.layers[1].kind, ConfigSourceKind::Local);
    assert_eq!(config.sources.layers[1].base_dir, root);
}

#[test]
fn relative_override_resolves_against_working_dir() {
    let temp = TempDir::new().expect("tempdir");
    let root = canonical(temp.path());
    write_file(
        root.join("wrapper.toml"),
        "[wrapper.attributes]\nclass = \"overridden\"\n",
    );

    let config = Config::load(
        LoadOptions::default()
            .with_working_dir(root.clone())
            .with_override_path("wrapper.toml"),
    )
    .expect("load override");

    assert_eq!(config.wrapper.class_name, "markdown-wrapper");
    assert_eq!(
        config.wrapper.attributes.get("class"),
        Some(&AttributeValue::String("overridden".into()))
    );

    let options = config.wrapper_options();
    assert_eq!(options.tag_name.as_deref(), Some("div"));
    assert_eq!(options.class_name.as_deref(), Some("markdown-wrapper"));
}

#[test]
fn missing_override_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    let root = canonical(temp.path());

    let err = Config::load(
        LoadOptions::default()
            .with_working_dir(root.clone())
            .with_override_path("absent.toml"),
    )
    .expect_err("override should be required");

    match err {
        ConfigError::OverrideNotFound { path } => assert_eq!(path, root.join("absent.toml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_toml_reports_path() {
    let temp = TempDir::new().expect("tempdir");
    let root = canonical(temp.path());
    let config_path = root.join(".markdown-wrapper.toml");
    write_file(&config_path, "[wrapper\ntag_name = ");

    let err = Config::load(LoadOptions::default().with_working_dir(root))
        .expect_err("parse failure");

    match &err {
        ConfigError::Parse { path, .. } => assert_eq!(path, &config_path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains(".markdown-wrapper.toml"));
}

#[test]
fn missing_working_dir_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("nope");

    let err = Config::load(LoadOptions::default().with_working_dir(&missing))
        .expect_err("missing directory");

    assert!(matches!(err, ConfigError::WorkingDirectory { .. }));
}
