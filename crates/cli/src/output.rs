use crate::error::CliError;
use engine_core::{preview::PreviewSlice, report::ReconciliationReport, session::LoadSummary};
use model::schema::{
    field::CsvLayout,
    resource::{ImportSchema, Resource},
};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SchemaEntry {
    #[serde(flatten)]
    schema: ImportSchema,
    batch_endpoint: &'static str,
    body_key: &'static str,
    single_endpoint: &'static str,
    identifying_field: &'static str,
    default_strategy: String,
}

pub fn print_schemas(as_json: bool) -> Result<(), CliError> {
    if as_json {
        let entries = Resource::ALL
            .iter()
            .map(|r| SchemaEntry {
                schema: ImportSchema::for_resource(*r),
                batch_endpoint: r.batch_path(),
                body_key: r.body_key(),
                single_endpoint: r.single_path(),
                identifying_field: r.identifying_field(),
                default_strategy: r.default_strategy().to_string(),
            })
            .collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for resource in Resource::ALL {
        let schema = ImportSchema::for_resource(resource);
        let layout = match &schema.layout {
            CsvLayout::Headered => "csv with header, or json".to_string(),
            CsvLayout::Positional { columns, .. } => {
                format!("csv without header ({}), or json", columns.join(","))
            }
        };

        println!("{resource}");
        println!("  {:<16} {}", "Input", layout);
        println!(
            "  {:<16} POST {} {{ {}: [...] }}",
            "Batch",
            resource.batch_path(),
            resource.body_key()
        );
        println!("  {:<16} POST {}", "Single", resource.single_path());
        println!("  {:<16} {}", "Strategy", resource.default_strategy());
        println!("  {:<16} {}", "Keyed by", resource.identifying_field());
        for field in &schema.fields {
            let required = if field.required { "required" } else { "optional" };
            println!("    {:<14} {:<10} {required}", field.name, field.kind);
        }
        if let Some(split) = &schema.role_split {
            let targets = split
                .variants
                .iter()
                .map(|(code, target)| format!("{}={code} -> {target}", split.selector))
                .collect::<Vec<_>>()
                .join(", ");
            println!("    {:<14} {targets}", split.source);
        }
        println!();
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewJson {
    summary: LoadSummary,
    total: usize,
    remaining: usize,
    records: Vec<serde_json::Value>,
    rejected: Vec<String>,
}

pub fn print_preview(
    summary: LoadSummary,
    slice: &PreviewSlice<'_>,
    rejected: &[String],
    as_json: bool,
) -> Result<(), CliError> {
    if as_json {
        let out = PreviewJson {
            summary,
            total: slice.total,
            remaining: slice.remaining,
            records: slice.shown.iter().map(|r| r.to_json()).collect(),
            rejected: rejected.to_vec(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} row(s) parsed, {} valid, {} rejected",
        summary.parsed, summary.accepted, summary.rejected
    );
    for record in slice.shown {
        println!("{}", record.to_json());
    }
    if let Some(more) = slice.more_label() {
        println!("{more}");
    }
    Ok(())
}

pub fn print_report(report: &ReconciliationReport) {
    for line in report.render() {
        println!("{line}");
    }
}

pub async fn write_report(report: &ReconciliationReport, path: &Path) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
