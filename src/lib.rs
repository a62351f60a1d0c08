//! AtoL Annotation Report Tools
//!
//! Converts the outputs of annotation QA tools into one unified report.
//!
//! This library provides shared functionality for:
//! - Remapping AGAT, BUSCO, OMArk and oddities outputs into the annotation schema
//! - Collecting key statistics for the genome-note pipeline
//! - Writing the combined JSON report and rendering it to PDF

pub mod error;
pub mod mapping;
pub mod input;
pub mod metadata;
pub mod agat;
pub mod busco;
pub mod omark;
pub mod oddities;
pub mod reporting;
pub mod render;

pub use error::{ReportError, Result};

use serde_json::{Map, Value};
use std::fmt;

/// Placeholder written for any schema field the source did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// A flat mapping of annotation-schema field name to value.
pub type Section = Map<String, Value>;

/// QA tools whose output feeds a section of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Agat,
    Busco,
    Omark,
    Oddities,
}

impl Source {
    /// All sources, in the order their sections appear in the combined report.
    pub const ALL: [Source; 4] = [Source::Agat, Source::Busco, Source::Omark, Source::Oddities];

    /// Key of this source's section in the combined report.
    pub fn name(self) -> &'static str {
        match self {
            Source::Agat => "agat",
            Source::Busco => "busco",
            Source::Omark => "omark",
            Source::Oddities => "annooddities",
        }
    }

    /// Human-readable tool name for console output.
    pub fn label(self) -> &'static str {
        match self {
            Source::Agat => "AGAT",
            Source::Busco => "BUSCO",
            Source::Omark => "OMArk",
            Source::Oddities => "AnnoOddities",
        }
    }

    /// Name of the flag recording whether this source's file was supplied.
    pub fn provided_flag(self) -> String {
        format!("{}_input_provided", self.name())
    }

    /// Fields of this source's section that are copied into the genome-note subset.
    pub fn key_fields(self) -> &'static [&'static str] {
        match self {
            Source::Agat => agat::KEY_FIELDS,
            Source::Busco => busco::KEY_FIELDS,
            Source::Omark => omark::KEY_FIELDS,
            Source::Oddities => oddities::KEY_FIELDS,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sentinel value for a missing field.
pub fn not_available() -> Value {
    Value::String(NOT_AVAILABLE.to_string())
}
