//! Implementation of the `check` subcommand.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cfn_analysis::ResolvedSchema;
use cfn_analysis::Validator;
use cfn_ast::Diagnostic;
use cfn_ast::Document;
use cfn_ast::DocumentType;
use clap::Parser;
use tokio::fs;
use tracing::info;

use crate::diagnostics::DiagnosticCounts;
use crate::diagnostics::Mode;
use crate::diagnostics::emit_diagnostics;

/// Arguments for the `check` subcommand.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CheckArgs {
    /// The template to check.
    #[clap(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// The schema (JSON or YAML) to check the template against.
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Forces the type of the template instead of detecting it.
    #[arg(long, value_name = "TYPE")]
    pub document_type: Option<DocumentType>,

    /// Ignores the template's `Globals` section.
    ///
    /// Properties supplied by `Globals` will be reported as missing from the
    /// resources that rely on them.
    #[arg(long)]
    pub no_globals: bool,

    /// Skips checking resources against the definition for their type.
    #[arg(long)]
    pub skip_resources: bool,

    /// Causes the command to fail if warnings were reported.
    #[clap(long)]
    pub deny_warnings: bool,

    /// Hide diagnostics with `hint` severity.
    #[arg(long)]
    pub hide_hints: bool,

    /// Disables color output.
    #[arg(long)]
    pub no_color: bool,

    /// The report mode.
    #[arg(short = 'm', long, value_name = "MODE")]
    pub report_mode: Option<Mode>,

    /// The analysis configuration from the configuration file.
    #[clap(skip)]
    pub analysis: cfn_analysis::Config,
}

impl CheckArgs {
    /// Applies the configuration from the given config file to the command line
    /// arguments.
    pub fn apply(mut self, config: crate::config::Config) -> Self {
        self.deny_warnings = self.deny_warnings || config.check.deny_warnings;
        self.hide_hints = self.hide_hints || config.check.hide_hints;
        self.no_color = self.no_color || config.check.no_color;
        if self.report_mode.is_none() {
            self.report_mode = config.check.report_mode;
        }

        self.analysis = config.analysis;
        self
    }

    /// Gets the analysis configuration with the command line overrides
    /// applied.
    pub fn analysis_config(&self) -> cfn_analysis::Config {
        let mut config = self.analysis.clone();
        if self.no_globals {
            config = config.with_apply_globals(false);
        }

        if self.document_type.is_some() {
            config = config.with_document_type(self.document_type);
        }

        if self.skip_resources {
            config = config.with_validate_resources(false);
        }

        config
    }
}

/// The outcome of checking a template.
#[derive(Debug)]
pub struct CheckResult {
    /// The source of the template.
    pub source: String,
    /// The parse and validation diagnostics, in the order they were found.
    pub diagnostics: Vec<Diagnostic>,
}

/// Loads a schema, choosing the format from the file extension.
pub async fn load_schema(path: &Path) -> anyhow::Result<ResolvedSchema> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read schema `{path}`", path = path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let schema = if is_yaml {
        ResolvedSchema::from_yaml(&text)
    } else {
        ResolvedSchema::from_json(&text)
    };

    schema.with_context(|| format!("failed to parse schema `{path}`", path = path.display()))
}

/// Parses and validates the template named by the arguments.
pub async fn check_template(args: &CheckArgs) -> anyhow::Result<CheckResult> {
    let source = fs::read_to_string(&args.template).await.with_context(|| {
        format!(
            "failed to read template `{path}`",
            path = args.template.display()
        )
    })?;
    let schema = load_schema(&args.schema).await?;

    let config = args.analysis_config();
    let (mut document, mut diagnostics) = Document::parse(&source);
    info!(
        "checking `{path}` as a {document_type} template",
        path = args.template.display(),
        document_type = config
            .document_type()
            .unwrap_or(document.document_type()),
    );

    let result = Validator::new(config).validate(&mut document, Some(Arc::new(schema)));
    diagnostics.extend(result.into_problems());

    if args.hide_hints {
        diagnostics.retain(|d| !d.severity().is_hint());
    }

    Ok(CheckResult {
        source,
        diagnostics,
    })
}

/// Performs the `check` subcommand.
pub async fn check(args: CheckArgs) -> anyhow::Result<()> {
    let result = check_template(&args).await?;

    emit_diagnostics(
        &args.template.display().to_string(),
        &result.source,
        &result.diagnostics,
        args.report_mode.unwrap_or_default(),
        args.no_color,
    )?;

    let counts = DiagnosticCounts::new(&result.diagnostics);
    if let Some(e) = counts.verify_no_errors() {
        return Err(e);
    }

    if args.deny_warnings
        && let Some(e) = counts.verify_no_warnings(true)
    {
        return Err(e);
    }

    Ok(())
}
