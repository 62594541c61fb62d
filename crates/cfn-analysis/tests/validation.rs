//! End-to-end validation of templates against a schema.

use std::sync::Arc;

use cfn_analysis::Config;
use cfn_analysis::ResolvedSchema;
use cfn_analysis::Validator;
use cfn_ast::Document;
use cfn_ast::DocumentType;
use cfn_ast::Severity;
use pretty_assertions::assert_eq;

/// A schema describing a handful of SAM resource types.
const SCHEMA: &str = r#"
definitions:
  "AWS::Serverless::Function":
    type: object
    required: [Type, Properties]
    properties:
      Type:
        enum: ["AWS::Serverless::Function"]
      Properties:
        type: object
        required: [Handler, Runtime]
        properties:
          Handler:
            type: string
          Runtime:
            type: string
          MemorySize:
            type: integer
            multipleOf: 64
            minimum: 128
            maximum: 10240
          Timeout:
            type: integer
            minimum: 0
            exclusiveMinimum: true
            maximum: 900
  "AWS::Serverless::Api":
    type: object
    properties:
      Properties:
        type: object
        required: [StageName]
type: object
required: [Resources]
properties:
  Resources:
    type: object
"#;

/// A SAM template whose function relies on `Globals` for its runtime.
const TEMPLATE: &str = r#"{
    "Transform": "AWS::Serverless-2016-10-31",
    "Globals": {
        "Function": {
            "Runtime": "python3.12",
            "Timeout": 30
        }
    },
    "Resources": {
        "First": {
            "Type": "AWS::Serverless::Function",
            "Properties": {
                "Handler": "index.handler",
                "MemorySize": 100
            }
        },
        "Second": {
            "Type": "AWS::Serverless::Function",
            "Properties": {
                "Handler": "index.handler",
                "Timeout": 0
            }
        },
        "Bucket": {
            "Type": "AWS::S3::Bucket"
        }
    }
}"#;

/// Loads the test schema.
fn schema() -> Arc<ResolvedSchema> {
    Arc::new(ResolvedSchema::from_yaml(SCHEMA).expect("schema should parse"))
}

/// Validates a template and returns the message and offset of each problem.
fn validate(source: &str, config: Config) -> Vec<(String, usize)> {
    let (mut document, diagnostics) = Document::parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");

    Validator::new(config)
        .validate(&mut document, Some(schema()))
        .problems()
        .iter()
        .map(|d| {
            (
                d.message().to_string(),
                d.location().expect("should have a location").start(),
            )
        })
        .collect()
}

/// Gets the offset of the `n`th (zero-based) occurrence of a pattern.
fn nth(source: &str, pattern: &str, n: usize) -> usize {
    source
        .match_indices(pattern)
        .nth(n)
        .map(|(i, _)| i)
        .expect("pattern should occur")
}

/// Gets the offset of the `Properties` object of the `n`th resource.
fn properties_of(n: usize) -> usize {
    nth(TEMPLATE, "\"Properties\": {", n) + "\"Properties\": ".len()
}

#[test]
fn globals_satisfy_required_properties() {
    let problems = validate(TEMPLATE, Config::default());
    assert_eq!(
        problems,
        [
            (
                "Value is not divisible by 64.".to_string(),
                TEMPLATE.find("100").unwrap()
            ),
            (
                "Value is below the minimum of 128.".to_string(),
                TEMPLATE.find("100").unwrap()
            ),
            (
                "Value is below the exclusive minimum of 0.".to_string(),
                nth(TEMPLATE, "\"Timeout\": 0", 0) + "\"Timeout\": ".len()
            ),
            (
                "No schema definition for resource type \"AWS::S3::Bucket\"; its properties \
                 are not checked."
                    .to_string(),
                TEMPLATE.find("\"AWS::S3::Bucket\"").unwrap()
            ),
        ]
    );
}

#[test]
fn problems_carry_rules_and_severities() {
    let (mut document, _) = Document::parse(TEMPLATE);
    let result = Validator::default().validate(&mut document, Some(schema()));
    let rules: Vec<_> = result
        .problems()
        .iter()
        .map(|d| (d.rule(), d.severity()))
        .collect();

    assert_eq!(
        rules,
        [
            (Some("multiple-of"), Severity::Error),
            (Some("minimum"), Severity::Error),
            (Some("exclusive-minimum"), Severity::Error),
            (Some("unknown-resource-type"), Severity::Hint),
        ]
    );
}

#[test]
fn schemas_without_definitions_do_not_report_resource_types() {
    let mut root = schema().schema().clone();
    root.definitions = None;

    let (mut document, _) = Document::parse(TEMPLATE);
    let result =
        Validator::default().validate(&mut document, Some(Arc::new(ResolvedSchema::new(root))));
    assert!(result.is_empty(), "unexpected problems: {result:?}");
}

#[test]
fn deeply_nested_templates_validate() {
    let source = format!(
        r#"{{"Resources": {{}}, "Metadata": {open}{close}}}"#,
        open = "[".repeat(20_000),
        close = "]".repeat(20_000)
    );
    let (mut document, diagnostics) = Document::parse(&source);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "maximum nesting depth exceeded");

    let result = Validator::default().validate(&mut document, Some(schema()));
    assert!(result.is_empty(), "unexpected problems: {result:?}");
}

#[test]
fn disabling_globals_reports_missing_properties() {
    let problems = validate(TEMPLATE, Config::default().with_apply_globals(false));
    let missing: Vec<_> = problems
        .iter()
        .filter(|(message, _)| message.starts_with("Missing property"))
        .cloned()
        .collect();

    assert_eq!(
        missing,
        [
            ("Missing property \"Runtime\".".to_string(), properties_of(0)),
            ("Missing property \"Runtime\".".to_string(), properties_of(1)),
        ]
    );
}

#[test]
fn only_unknown_documents_ignore_globals() {
    let source = TEMPLATE.replace(
        "\"Transform\": \"AWS::Serverless-2016-10-31\",",
        "\"AWSTemplateFormatVersion\": \"2010-09-09\",",
    );

    let (document, _) = Document::parse(&source);
    assert_eq!(document.document_type(), DocumentType::CloudFormation);

    let problems = validate(&source, Config::default());
    assert!(
        problems
            .iter()
            .all(|(message, _)| !message.starts_with("Missing property"))
    );

    // Forcing an unknown document type drops the globals
    let problems = validate(
        &source,
        Config::default().with_document_type(Some(DocumentType::Unknown)),
    );
    assert_eq!(
        problems
            .iter()
            .filter(|(message, _)| message == "Missing property \"Runtime\".")
            .count(),
        2
    );
}

#[test]
fn resources_can_be_skipped() {
    let problems = validate(TEMPLATE, Config::default().with_validate_resources(false));
    assert!(problems.is_empty(), "unexpected problems: {problems:?}");
}

#[test]
fn root_problems_precede_resource_problems() {
    let source = r#"{
        "Transform": "AWS::Serverless-2016-10-31",
        "Resources": {
            "Api": { "Type": "AWS::Serverless::Api", "Properties": {} }
        },
        "Extra": true
    }"#;

    let schema = ResolvedSchema::from_yaml(SCHEMA).expect("schema should parse");
    let mut root = schema.schema().clone();
    root.properties
        .as_mut()
        .expect("should have properties")
        .insert("Extra".to_string(), serde_json::from_str(r#"{"type": "string"}"#).unwrap());
    let schema = Arc::new(ResolvedSchema::new(root));

    let (mut document, _) = Document::parse(source);
    let result = Validator::default().validate(&mut document, Some(schema));
    let messages: Vec<_> = result.problems().iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        [
            "Incorrect type. Expected \"string\".",
            "Missing property \"StageName\".",
        ]
    );
}

#[test]
fn resolution_errors_are_reported_as_warnings() {
    let source = r#"{"Resources": {}}"#;
    let schema = ResolvedSchema::with_errors(
        ResolvedSchema::from_yaml(SCHEMA)
            .expect("schema should parse")
            .schema()
            .clone(),
        vec!["unable to resolve `#/definitions/Tag`".to_string()],
    );

    let (mut document, _) = Document::parse(source);
    let result = Validator::default().validate(&mut document, Some(Arc::new(schema)));
    assert_eq!(result.len(), 1);

    let problem = &result.problems()[0];
    assert_eq!(problem.severity(), Severity::Warning);
    assert_eq!(
        problem.message(),
        "Problems loading reference: unable to resolve `#/definitions/Tag`"
    );
    assert_eq!(problem.location().map(|s| (s.start(), s.len())), Some((0, 1)));
}

#[test]
fn documents_without_a_schema_have_no_problems() {
    let (mut document, _) = Document::parse(TEMPLATE);
    let result = Validator::default().validate(&mut document, None);
    assert!(result.is_empty());

    // The globals are still collected
    assert_eq!(
        document.globals_config().function.properties,
        ["Runtime", "Timeout"]
    );
}
