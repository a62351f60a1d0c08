//! AtoL Annotation Report Tool
//!
//! Generates a JSON and PDF report of annotation metadata and metric values
//! from AGAT, BUSCO, OMArk and AnnoOddities evaluations for QA

use anyhow::{Context, Result};
use atol_report_tools::reporting::{AnnotationReporter, ReportInputs, ReportOutputs};
use atol_report_tools::render::{TypstRenderer, DEFAULT_EXECUTABLE};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::Level;
use std::path::PathBuf;

fn path_arg(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.get_one::<PathBuf>(id).cloned()
}

fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf> {
    path_arg(matches, id).with_context(|| format!("no value for --{id}"))
}

fn input_arg(id: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name(value_name)
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

fn main() -> Result<()> {
    let matches = Command::new("atol-annotation-report")
        .version("0.1.0")
        .about("JSON and PDF report of annotation metadata and BUSCO, OMArk, AGAT and AnnoOddities metrics for QA")
        .author("Megan Johnson")
        .arg(
            input_arg(
                "metadata_file",
                "JSON",
                "JSON file of metadata records following the Annotation Metadata Schema",
            )
            .short('m'),
        )
        .arg(
            input_arg(
                "agat_file",
                "YAML",
                "YAML statistics file written by AGAT for the annotation",
            )
            .short('a'),
        )
        .arg(
            input_arg(
                "busco_file",
                "JSON",
                "JSON summary written by BUSCO for the annotation",
            )
            .short('b'),
        )
        .arg(input_arg(
            "omark_file",
            "JSON",
            "JSON summary written by OMArk for the annotation",
        ))
        .arg(input_arg(
            "annooddities_file",
            "TSV",
            "TSV of gene model oddity counts written by AnnoOddities",
        ))
        .arg(
            Arg::new("output_file")
                .short('o')
                .long("output_file")
                .value_name("PDF")
                .value_parser(value_parser!(PathBuf))
                .help("Output PDF report")
                .default_value("test_out.pdf"),
        )
        .arg(
            Arg::new("json_atol")
                .long("json_atol")
                .value_name("JSON")
                .value_parser(value_parser!(PathBuf))
                .help("Output JSON of key statistics for the genome-note pipeline")
                .default_value("json_atol.json"),
        )
        .arg(
            Arg::new("json_full")
                .long("json_full")
                .value_name("JSON")
                .value_parser(value_parser!(PathBuf))
                .help("Output JSON of the full combined report")
                .default_value("json_full.json"),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("TYP")
                .value_parser(value_parser!(PathBuf))
                .help("Typst template used to render the PDF [default: bundled template]"),
        )
        .arg(
            Arg::new("typst")
                .long("typst")
                .value_name("EXECUTABLE")
                .value_parser(value_parser!(PathBuf))
                .help("Typst executable used to render the PDF")
                .default_value(DEFAULT_EXECUTABLE),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug diagnostics")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        Level::Debug
    } else {
        Level::Info
    };
    simple_logger::init_with_level(level)?;

    // Parse arguments
    let inputs = ReportInputs {
        metadata: path_arg(&matches, "metadata_file"),
        agat: path_arg(&matches, "agat_file"),
        busco: path_arg(&matches, "busco_file"),
        omark: path_arg(&matches, "omark_file"),
        oddities: path_arg(&matches, "annooddities_file"),
    };
    let outputs = ReportOutputs {
        pdf: required_path(&matches, "output_file")?,
        json_atol: required_path(&matches, "json_atol")?,
        json_full: required_path(&matches, "json_full")?,
    };
    let mut renderer = TypstRenderer::new(required_path(&matches, "typst")?);
    if let Some(template) = path_arg(&matches, "template") {
        renderer = renderer.with_template(template);
    }

    println!("🧬 AtoL Annotation Report Tool");
    println!("PDF report: {}", outputs.pdf.display());
    println!("AtoL JSON: {}", outputs.json_atol.display());
    println!("Full JSON: {}", outputs.json_full.display());

    let reporter = AnnotationReporter::new(renderer);

    println!("📊 Generating annotation report...");
    let summary = reporter
        .run(&inputs, &outputs)
        .context("annotation report generation failed")?;

    let provided: Vec<&str> = summary.provided.iter().map(|s| s.label()).collect();

    println!("✅ Script completed!");
    println!("📈 Summary Statistics:");
    println!("  Metadata fields: {}", summary.metadata_fields);
    println!(
        "  Sources provided: {}",
        if provided.is_empty() {
            "none".to_string()
        } else {
            provided.join(", ")
        }
    );
    println!("  Genome-note fields: {}", summary.genome_note_fields);
    println!(
        "💾 Report available as PDF ({}) and JSON ({})",
        summary.outputs.pdf.display(),
        summary.outputs.json_full.display()
    );

    Ok(())
}
