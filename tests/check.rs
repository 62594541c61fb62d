//! Tests for the `check` command.

use std::path::Path;

use cfn_ast::Severity;
use cfn_check::commands::check::CheckArgs;
use cfn_check::commands::check::check;
use cfn_check::commands::check::check_template;
use cfn_check::config::Config;
use clap::Parser;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// A YAML schema requiring a runtime for functions.
const SCHEMA: &str = r#"
definitions:
  "AWS::Serverless::Function":
    properties:
      Properties:
        required: [Handler, Runtime]
        properties:
          Timeout:
            type: integer
            maximum: 900
"#;

/// A SAM template supplying the runtime through `Globals`.
const TEMPLATE: &str = r#"{
    "Transform": "AWS::Serverless-2016-10-31",
    "Globals": { "Function": { "Runtime": "nodejs20.x" } },
    "Resources": {
        "Handler": {
            "Type": "AWS::Serverless::Function",
            "Properties": { "Handler": "index.handler" }
        }
    }
}"#;

/// Writes the given template and the test schema into a new directory.
fn workspace(template: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("should create a temporary directory");
    std::fs::write(dir.path().join("template.json"), template).unwrap();
    std::fs::write(dir.path().join("schema.yaml"), SCHEMA).unwrap();
    dir
}

/// Parses `check` arguments for the template and schema in a directory.
fn args(dir: &Path, extra: &[&str]) -> CheckArgs {
    let template = dir.join("template.json");
    let schema = dir.join("schema.yaml");
    let mut argv = vec![
        "check",
        template.to_str().unwrap(),
        "--schema",
        schema.to_str().unwrap(),
    ];
    argv.extend(extra);
    CheckArgs::try_parse_from(argv).expect("arguments should parse")
}

#[tokio::test]
async fn globals_satisfy_required_properties() {
    let dir = workspace(TEMPLATE);
    let result = check_template(&args(dir.path(), &[])).await.unwrap();
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {diagnostics:?}",
        diagnostics = result.diagnostics
    );

    check(args(dir.path(), &["--no-color"]))
        .await
        .expect("check should succeed");
}

#[tokio::test]
async fn no_globals_reports_missing_properties() {
    let dir = workspace(TEMPLATE);
    let result = check_template(&args(dir.path(), &["--no-globals"]))
        .await
        .unwrap();

    let messages: Vec<_> = result.diagnostics.iter().map(|d| d.message()).collect();
    assert_eq!(messages, ["Missing property \"Runtime\"."]);

    let error = check(args(dir.path(), &["--no-globals", "--no-color"]))
        .await
        .unwrap_err();
    assert_eq!(error.to_string(), "failing due to 1 error");
}

#[tokio::test]
async fn parse_diagnostics_precede_validation_problems() {
    let template = TEMPLATE.replace(
        r#""Properties": { "Handler": "index.handler" }"#,
        r#""Properties": { "Handler": "index.handler", "Timeout": 9e999 }"#,
    );
    let dir = workspace(&template);
    let result = check_template(&args(dir.path(), &["--no-globals"]))
        .await
        .unwrap();

    let severities: Vec<_> = result.diagnostics.iter().map(|d| d.severity()).collect();
    assert_eq!(severities, [Severity::Error, Severity::Error]);
    assert_eq!(
        result.diagnostics[1].message(),
        "Missing property \"Runtime\"."
    );
}

#[tokio::test]
async fn configuration_file_applies_to_arguments() {
    let dir = workspace(TEMPLATE);
    let path = dir.path().join("cfn-check.toml");
    std::fs::write(
        &path,
        "[check]\nno_color = true\n\n[analysis]\napply_globals = false\n",
    )
    .unwrap();

    let config = Config::read_config(&path).unwrap();
    let args = args(dir.path(), &[]).apply(config);
    assert!(args.no_color);
    assert!(!args.analysis_config().apply_globals());

    let result = check_template(&args).await.unwrap();
    assert_eq!(result.diagnostics.len(), 1);
}

#[tokio::test]
async fn document_type_flag_overrides_detection() {
    // Without a transform the template is plain CloudFormation
    let template = TEMPLATE.replace(r#""Transform": "AWS::Serverless-2016-10-31","#, "");
    let dir = workspace(&template);

    let result = check_template(&args(dir.path(), &[])).await.unwrap();
    assert!(result.diagnostics.is_empty());

    let result = check_template(&args(dir.path(), &["--document-type", "unknown"]))
        .await
        .unwrap();
    assert_eq!(result.diagnostics.len(), 1);
}

#[tokio::test]
async fn hints_can_be_hidden() {
    let template = TEMPLATE.replace(
        r#""Type": "AWS::Serverless::Function","#,
        r#""Type": "AWS::Serverless::LayerVersion","#,
    );
    let dir = workspace(&template);

    let result = check_template(&args(dir.path(), &[])).await.unwrap();
    let hints: Vec<_> = result
        .diagnostics
        .iter()
        .map(|d| (d.severity(), d.rule()))
        .collect();
    assert_eq!(hints, [(Severity::Hint, Some("unknown-resource-type"))]);

    let result = check_template(&args(dir.path(), &["--hide-hints"]))
        .await
        .unwrap();
    assert!(result.diagnostics.is_empty());

    // Hints never fail the check, even when warnings are denied
    check(args(dir.path(), &["--deny-warnings", "--no-color"]))
        .await
        .expect("check should succeed");
}

#[tokio::test]
async fn unreadable_schemas_are_reported() {
    let dir = workspace(TEMPLATE);
    std::fs::write(dir.path().join("schema.yaml"), "definitions: [").unwrap();

    let error = check_template(&args(dir.path(), &[])).await.unwrap_err();
    assert!(error.to_string().starts_with("failed to parse schema"));
}
