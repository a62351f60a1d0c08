//! Annotation report aggregation
//!
//! Merges metadata and every source section into the combined report, collects
//! the genome-note subset, and drives a full run from inputs to PDF.

use crate::error::{ReportError, Result};
use crate::mapping::key_subset;
use crate::render::TypstRenderer;
use crate::{agat, busco, metadata, oddities, omark, Section, Source};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Key wrapping the genome-note subset in the AtoL JSON output
pub const GENOME_NOTE_KEY: &str = "annotation";

/// Input files; any of them may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportInputs {
    pub metadata: Option<PathBuf>,
    pub agat: Option<PathBuf>,
    pub busco: Option<PathBuf>,
    pub omark: Option<PathBuf>,
    pub oddities: Option<PathBuf>,
}

impl ReportInputs {
    pub fn source(&self, source: Source) -> Option<&Path> {
        match source {
            Source::Agat => self.agat.as_deref(),
            Source::Busco => self.busco.as_deref(),
            Source::Omark => self.omark.as_deref(),
            Source::Oddities => self.oddities.as_deref(),
        }
    }
}

/// Where the PDF and the two JSON documents are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutputs {
    pub pdf: PathBuf,
    pub json_atol: PathBuf,
    pub json_full: PathBuf,
}

impl Default for ReportOutputs {
    fn default() -> Self {
        Self {
            pdf: PathBuf::from("test_out.pdf"),
            json_atol: PathBuf::from("json_atol.json"),
            json_full: PathBuf::from("json_full.json"),
        }
    }
}

/// One source's normalized section, or `None` when no file was supplied
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSection {
    pub source: Source,
    pub fields: Option<Section>,
}

impl SourceSection {
    pub fn provided(&self) -> bool {
        self.fields.is_some()
    }

    /// The section as it appears in the combined report.
    pub fn to_value(&self) -> Value {
        let mut object = Section::new();
        object.insert(self.source.provided_flag(), Value::Bool(self.provided()));
        if let Some(fields) = &self.fields {
            object.extend(fields.iter().map(|(key, value)| (key.clone(), value.clone())));
        }
        Value::Object(object)
    }

    /// The genome-note fields of this section; empty when not provided.
    pub fn key_stats(&self) -> Section {
        self.fields
            .as_ref()
            .map(|fields| key_subset(fields, self.source.key_fields()))
            .unwrap_or_default()
    }
}

/// Metadata plus the normalized section of each source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationReport {
    pub metadata: Section,
    pub sections: Vec<SourceSection>,
}

impl AnnotationReport {
    pub fn new(metadata: Section) -> Self {
        Self {
            metadata,
            sections: Vec::new(),
        }
    }

    /// Record the section for `source`, replacing any earlier one.
    pub fn with_section(mut self, source: Source, fields: Option<Section>) -> Self {
        let section = SourceSection { source, fields };
        match self.sections.iter_mut().find(|s| s.source == source) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
        self
    }

    pub fn section(&self, source: Source) -> Option<&SourceSection> {
        self.sections.iter().find(|s| s.source == source)
    }

    /// Sources whose file was supplied, in report order
    pub fn provided_sources(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|source| self.section(*source).is_some_and(SourceSection::provided))
            .collect()
    }

    /// Metadata fields followed by one object per source.
    ///
    /// A source without a recorded section is reported as not provided.
    pub fn combined(&self) -> Section {
        let mut combined = self.metadata.clone();

        for source in Source::ALL {
            let value = match self.section(source) {
                Some(section) => section.to_value(),
                None => SourceSection { source, fields: None }.to_value(),
            };
            // drop a clashing metadata key so the section keeps its place after the metadata
            if combined.shift_remove(source.name()).is_some() {
                log::warn!(
                    "metadata key '{}' is replaced by the {} section",
                    source.name(),
                    source
                );
            }
            combined.insert(source.name().to_string(), value);
        }
        combined
    }

    /// Key statistics of every provided source, merged into one mapping.
    pub fn genome_note(&self) -> Section {
        let mut note = Section::new();
        for source in Source::ALL {
            let Some(section) = self.section(source) else {
                continue;
            };
            for (key, value) in section.key_stats() {
                if note.insert(key.clone(), value).is_some() {
                    log::warn!("genome-note field '{}' set by more than one source", key);
                }
            }
        }
        note
    }

    /// The genome-note subset wrapped for the AtoL pipeline.
    pub fn atol_document(&self) -> Value {
        let mut document = Section::new();
        document.insert(GENOME_NOTE_KEY.to_string(), Value::Object(self.genome_note()));
        Value::Object(document)
    }
}

/// Load one source file into its normalized section.
pub fn load_source(source: Source, path: &Path) -> Result<Section> {
    match source {
        Source::Agat => agat::load(path),
        Source::Busco => busco::load(path),
        Source::Omark => omark::load(path),
        Source::Oddities => oddities::load(path),
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub provided: Vec<Source>,
    pub metadata_fields: usize,
    pub genome_note_fields: usize,
    pub outputs: ReportOutputs,
}

/// Annotation reporter: loads inputs, writes both JSON documents, renders the PDF
#[derive(Debug, Clone, Default)]
pub struct AnnotationReporter {
    pub renderer: TypstRenderer,
}

impl AnnotationReporter {
    pub fn new(renderer: TypstRenderer) -> Self {
        Self { renderer }
    }

    /// Load and normalize every supplied input.
    ///
    /// All inputs are parsed before anything is written, so a malformed file
    /// aborts the run with no output.
    pub fn generate_report(&self, inputs: &ReportInputs) -> Result<AnnotationReport> {
        let metadata = match &inputs.metadata {
            Some(path) => {
                log::info!("Parsing metadata");
                metadata::load(path)?
            }
            None => {
                log::info!("No metadata file specified");
                Section::new()
            }
        };

        let mut report = AnnotationReport::new(metadata);
        for source in Source::ALL {
            let fields = match inputs.source(source) {
                Some(path) => {
                    log::info!("Parsing {} file {}", source, path.display());
                    Some(load_source(source, path)?)
                }
                None => {
                    log::info!("No {} file specified", source);
                    None
                }
            };
            report = report.with_section(source, fields);
        }
        Ok(report)
    }

    /// Export a JSON document, pretty-printed
    pub fn export_json<P: AsRef<Path>>(&self, document: &Value, path: P) -> Result<()> {
        let path = path.as_ref();
        let json_content = serde_json::to_string_pretty(document)?;
        std::fs::write(path, json_content).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Generate the report, write the AtoL and full JSON, then render the PDF.
    ///
    /// A renderer failure is returned after both JSON files are written.
    pub fn run(&self, inputs: &ReportInputs, outputs: &ReportOutputs) -> Result<RunSummary> {
        let report = self.generate_report(inputs)?;

        let genome_note_fields = report.genome_note().len();
        self.export_json(&report.atol_document(), &outputs.json_atol)?;

        log::info!("Combining statistics and writing to JSON");
        let combined = Value::Object(report.combined());
        self.export_json(&combined, &outputs.json_full)?;

        log::info!("Rendering typst template");
        let report_json = serde_json::to_string(&combined)?;
        self.renderer.render(&report_json, &outputs.pdf)?;

        Ok(RunSummary {
            provided: report.provided_sources(),
            metadata_fields: report.metadata.len(),
            genome_note_fields,
            outputs: outputs.clone(),
        })
    }
}
