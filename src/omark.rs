//! OMArk summary module
//!
//! Maps OMArk's JSON summary onto the `omark` section: proteome consistency
//! percentages, conserved HOG completeness, and the species detected in the
//! proteome split into the expected lineage and potential contaminants.

use crate::error::Result;
use crate::input::{expect_mapping, read_json};
use crate::mapping::{self, subsection, FieldMapping, FieldTable};
use crate::{not_available, Section};
use serde_json::Value;
use std::path::Path;

pub const DETECTED_SPECIES_FIELD: &str = "detected_sp";
pub const CONTAMINANT_SPECIES_FIELD: &str = "contaminant_sp";

const CONSISTENCY_SECTION: &str = "results_pcts";
const CONSERVED_HOG_SECTION: &str = "conserv_pcts";
const SPECIES_LIST: &str = "detected_species";

const CLADE_MARKER: &str = "Clade";
const CONTAMINANT_MARKER: &str = "Potential_contaminants";

pub const INFO_FIELDS: FieldTable = FieldTable::new(
    "OMArk info",
    &[
        FieldMapping::new("omark_lineage", &["selected_clade"]),
        FieldMapping::new("conserved_hogs", &["conserved_hogs"]),
        FieldMapping::new("omark_protein_count", &["proteins_in_proteome"]),
        FieldMapping::new("omamer_version", &["omamer_version"]),
        FieldMapping::new("omamer_db_version", &["db_version"]),
        FieldMapping::new("omark_completeness_summary", &["conserv_pcts_raw"]),
        FieldMapping::new("omark_consistency_summary", &["results_pcts_raw"]),
    ],
);

pub const CONSISTENCY_KEY_FIELDS: FieldTable = FieldTable::new(
    "OMArk consistency",
    &[
        FieldMapping::new("omark_percent_consistent", &["consistent"]),
        FieldMapping::new("omark_percent_inconsistent", &["inconsistent"]),
        FieldMapping::new("omark_percent_contaminant", &["likely_contamination"]),
        FieldMapping::new("omark_percent_unknown", &["unknown"]),
    ],
);

pub const CONSISTENCY_DETAIL_FIELDS: FieldTable = FieldTable::new(
    "OMArk consistency detail",
    &[
        FieldMapping::new("percent_consistent_partial", &["consistent_partial_hits"]),
        FieldMapping::new("percent_consistent_fragments", &["consistent_fragmented"]),
        FieldMapping::new("percent_inconsistent_partial", &["inconsistent_partial_hits"]),
        FieldMapping::new("percent_inconsistent_fragments", &["inconsistent_fragmented"]),
        FieldMapping::new(
            "percent_contaminant_partial",
            &["likely_contamination_partial_hits"],
        ),
        FieldMapping::new(
            "percent_contaminant_fragments",
            &["likely_contamination_fragmented"],
        ),
    ],
);

pub const CONSERVED_HOG_FIELDS: FieldTable = FieldTable::new(
    "OMArk conserved HOGs",
    &[
        FieldMapping::new("single_hog_percent", &["single"]),
        FieldMapping::new("duplicated_hog_percent", &["duplicated"]),
        FieldMapping::new("unexpected_dup_hog_percent", &["duplicated_unexpected"]),
        FieldMapping::new("expected_dup_hog_percent", &["duplicated_expected"]),
        FieldMapping::new("missing_hog_percent", &["missing"]),
    ],
);

/// Applied to each entry of `detected_species`
pub const SPECIES_FIELDS: FieldTable = FieldTable::new(
    "OMArk species",
    &[
        FieldMapping::new("taxon", &[CLADE_MARKER, CONTAMINANT_MARKER]),
        FieldMapping::new("NCBI_taxid", &["NCBI_taxid"]),
        FieldMapping::new("associated_protein_count", &["Number_of_associated_proteins"]),
        FieldMapping::new("associated_protein_pc", &["Percentage_of_proteomes_total"]),
    ],
);

/// Fields copied into the genome-note subset
pub const KEY_FIELDS: &[&str] = &[
    "omark_lineage",
    "conserved_hogs",
    "omark_protein_count",
    "omamer_version",
    "omamer_db_version",
    "omark_completeness_summary",
    "omark_consistency_summary",
    "omark_percent_consistent",
    "omark_percent_inconsistent",
    "omark_percent_contaminant",
    "omark_percent_unknown",
];

/// Which bucket a detected species entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesKind {
    Detected,
    Contaminant,
}

impl SpeciesKind {
    /// Classify an entry by its marker key; `Clade` takes precedence.
    pub fn of(entry: &Section) -> Option<Self> {
        if entry.contains_key(CLADE_MARKER) {
            Some(SpeciesKind::Detected)
        } else if entry.contains_key(CONTAMINANT_MARKER) {
            Some(SpeciesKind::Contaminant)
        } else {
            None
        }
    }
}

/// Detected species split by kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesBuckets {
    pub detected: Vec<Value>,
    pub contaminants: Vec<Value>,
}

impl SpeciesBuckets {
    /// Project and sort each species entry into its bucket.
    pub fn partition(entries: &[Value]) -> Self {
        let mut buckets = SpeciesBuckets::default();

        for (index, entry) in entries.iter().enumerate() {
            let Some(entry) = entry.as_object() else {
                log::warn!("OMArk species entry {} is not a mapping, skipping", index);
                continue;
            };
            let Some(kind) = SpeciesKind::of(entry) else {
                log::warn!(
                    "OMArk species entry {} has neither '{}' nor '{}', skipping",
                    index,
                    CLADE_MARKER,
                    CONTAMINANT_MARKER
                );
                continue;
            };

            let projected = Value::Object(mapping::normalize(&[(SPECIES_FIELDS, Some(entry))]));
            match kind {
                SpeciesKind::Detected => buckets.detected.push(projected),
                SpeciesKind::Contaminant => buckets.contaminants.push(projected),
            }
        }
        buckets
    }

    /// Write both buckets into `section`, with `["N/A"]` standing in for an empty one.
    pub fn write_into(self, section: &mut Section) {
        section.insert(DETECTED_SPECIES_FIELD.to_string(), or_placeholder(self.detected));
        section.insert(CONTAMINANT_SPECIES_FIELD.to_string(), or_placeholder(self.contaminants));
    }
}

fn or_placeholder(entries: Vec<Value>) -> Value {
    if entries.is_empty() {
        Value::Array(vec![not_available()])
    } else {
        Value::Array(entries)
    }
}

/// Load an OMArk JSON summary into its normalized section.
pub fn load(path: &Path) -> Result<Section> {
    let doc = expect_mapping(read_json(path)?, path, "JSON")?;
    Ok(normalize(&doc))
}

/// Map a parsed OMArk summary onto the annotation schema.
pub fn normalize(doc: &Section) -> Section {
    let consistency = subsection(doc, CONSISTENCY_SECTION);
    if consistency.is_none() {
        log::warn!("OMArk input has no '{}' section", CONSISTENCY_SECTION);
    }
    let conserved = subsection(doc, CONSERVED_HOG_SECTION);
    if conserved.is_none() {
        log::warn!("OMArk input has no '{}' section", CONSERVED_HOG_SECTION);
    }

    let mut section = mapping::normalize(&[
        (INFO_FIELDS, Some(doc)),
        (CONSISTENCY_KEY_FIELDS, consistency),
        (CONSISTENCY_DETAIL_FIELDS, consistency),
        (CONSERVED_HOG_FIELDS, conserved),
    ]);

    let species = match doc.get(SPECIES_LIST).and_then(Value::as_array) {
        Some(entries) => SpeciesBuckets::partition(entries),
        None => {
            log::warn!("OMArk input has no '{}' list", SPECIES_LIST);
            SpeciesBuckets::default()
        }
    };
    species.write_into(&mut section);

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOT_AVAILABLE;
    use serde_json::json;

    fn doc(value: Value) -> Section {
        value.as_object().cloned().unwrap()
    }

    fn summary(species: Value) -> Section {
        doc(json!({
            "selected_clade": "Myrtaceae",
            "conserved_hogs": 9120,
            "proteins_in_proteome": 36349,
            "omamer_version": "2.0.2",
            "db_version": "LUCA.h5",
            "conserv_pcts_raw": "S:8012,D:701,M:407",
            "results_pcts_raw": "A:31012,P:1203,F:508",
            "conserv_pcts": {"single": 87.85, "duplicated": 7.69, "missing": 4.46},
            "results_pcts": {"consistent": 85.3, "inconsistent": 3.1, "likely_contamination": 0.0, "unknown": 11.6},
            "detected_species": species,
        }))
    }

    #[test]
    fn test_summary_fields() {
        let section = normalize(&summary(json!([])));

        assert_eq!(section["omark_lineage"], json!("Myrtaceae"));
        assert_eq!(section["omark_protein_count"], json!(36349));
        assert_eq!(section["omark_percent_consistent"], json!(85.3));
        assert_eq!(section["single_hog_percent"], json!(87.85));
        assert_eq!(section["expected_dup_hog_percent"], json!(NOT_AVAILABLE));
        assert_eq!(section["percent_consistent_partial"], json!(NOT_AVAILABLE));
    }

    #[test]
    fn test_species_partition() {
        let section = normalize(&summary(json!([
            {"Clade": "Eucalyptus grandis", "NCBI_taxid": 71139, "Number_of_associated_proteins": 30512, "Percentage_of_proteomes_total": 83.94},
            {"Potential_contaminants": "Escherichia coli", "NCBI_taxid": 562, "Number_of_associated_proteins": 14},
        ])));

        assert_eq!(
            section[DETECTED_SPECIES_FIELD],
            json!([{
                "taxon": "Eucalyptus grandis",
                "NCBI_taxid": 71139,
                "associated_protein_count": 30512,
                "associated_protein_pc": 83.94,
            }])
        );
        assert_eq!(section[CONTAMINANT_SPECIES_FIELD][0]["taxon"], json!("Escherichia coli"));
        assert_eq!(
            section[CONTAMINANT_SPECIES_FIELD][0]["associated_protein_pc"],
            json!(NOT_AVAILABLE)
        );
    }

    #[test]
    fn test_no_contaminants_gives_placeholder() {
        let section = normalize(&summary(json!([
            {"Clade": "Eucalyptus grandis", "NCBI_taxid": 71139},
        ])));

        assert_eq!(section[CONTAMINANT_SPECIES_FIELD], json!([NOT_AVAILABLE]));
        assert_eq!(section[DETECTED_SPECIES_FIELD].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_unmarked_entries_skipped() {
        let buckets = SpeciesBuckets::partition(&[json!({"NCBI_taxid": 1}), json!("Homo sapiens")]);
        assert_eq!(buckets, SpeciesBuckets::default());
    }

    #[test]
    fn test_clade_marker_wins() {
        let entry = doc(json!({"Clade": "a", "Potential_contaminants": "b"}));
        assert_eq!(SpeciesKind::of(&entry), Some(SpeciesKind::Detected));
    }

    #[test]
    fn test_missing_sections() {
        let section = normalize(&doc(json!({"selected_clade": "Myrtaceae"})));

        assert_eq!(section["omark_lineage"], json!("Myrtaceae"));
        assert_eq!(section["omark_percent_unknown"], json!(NOT_AVAILABLE));
        assert_eq!(section[DETECTED_SPECIES_FIELD], json!([NOT_AVAILABLE]));
        assert_eq!(section[CONTAMINANT_SPECIES_FIELD], json!([NOT_AVAILABLE]));
    }
}
