//! Subcommand implementations

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::Utc;
use compliance_engine::answers::{parse_answers, parse_submissions};
use compliance_engine::fingerprint::fingerprint;
use compliance_engine::template::unresolved_placeholders;
use compliance_engine::{BindingRegistry, EngineConfig, SynthesisEngine};
use serde::Serialize;
use shared_types::{GenerationOutput, QuestionAnswer};
use tracing::{info, warn};

use crate::{GenerateArgs, InputFormat};

/// JSON written by `generate`
#[derive(Serialize)]
struct GenerationReport<'a> {
    fingerprint: String,
    registry_version: Option<&'a str>,
    #[serde(flatten)]
    output: &'a GenerationOutput,
}

pub fn generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let custom_registry = args
        .registry
        .as_deref()
        .map(load_registry)
        .transpose()?;
    let registry = custom_registry
        .as_ref()
        .unwrap_or_else(|| BindingRegistry::builtin());

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let answers = load_answers(&args.answers, args.input_format)?;
    info!(
        answers = answers.len(),
        registry_questions = registry.len(),
        "loaded inputs"
    );

    let engine = SynthesisEngine::new(registry, config);
    let output = engine.generate(&answers, args.now.unwrap_or_else(Utc::now));

    let rendered = match (&args.template, &args.document) {
        (Some(template_path), Some(document_name)) => {
            render_template(&engine, &output, template_path, document_name)?
        }
        _ => {
            let report = GenerationReport {
                fingerprint: fingerprint(&output).context("Failed to fingerprint output")?,
                registry_version: registry.version(),
                output: &output,
            };
            info!(fingerprint = %report.fingerprint, "generation fingerprint");
            serde_json::to_string_pretty(&report).context("Failed to serialize output")?
        }
    };

    write_output(args.output.as_deref(), &rendered)
}

pub fn describe_registry(path: Option<&Path>) -> anyhow::Result<()> {
    let custom_registry = path.map(load_registry).transpose()?;
    let registry = custom_registry
        .as_ref()
        .unwrap_or_else(|| BindingRegistry::builtin());

    println!(
        "Registry version: {}",
        registry.version().unwrap_or("unversioned")
    );
    println!("Questions: {}", registry.len());
    for document in registry.document_names() {
        println!("\n{}", document);
        for field in registry.fields_for(document) {
            println!("  {{{{{}}}}}", field);
        }
    }

    Ok(())
}

fn load_registry(path: &Path) -> anyhow::Result<BindingRegistry> {
    BindingRegistry::from_file(path)
        .with_context(|| format!("Failed to load registry {}", path.display()))
}

fn load_answers(path: &Path, format: InputFormat) -> anyhow::Result<Vec<QuestionAnswer>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file {}", path.display()))?;
    let answers = match format {
        InputFormat::Answers => parse_answers(&content),
        InputFormat::Submissions => parse_submissions(&content),
    }
    .with_context(|| format!("Failed to parse answers file {}", path.display()))?;
    Ok(answers)
}

fn render_template(
    engine: &SynthesisEngine<'_>,
    output: &GenerationOutput,
    template_path: &Path,
    document_name: &str,
) -> anyhow::Result<String> {
    let template = fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;

    let Some(document) = output.document(document_name) else {
        bail!(
            "No answers contributed to document '{}'; nothing to inject",
            document_name
        );
    };

    let unresolved = unresolved_placeholders(&template, document);
    if !unresolved.is_empty() {
        warn!(
            document = document_name,
            placeholders = ?unresolved,
            "template placeholders left unfilled"
        );
    }

    Ok(engine.render(&template, document_name, output))
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{}", content),
    }
    Ok(())
}
