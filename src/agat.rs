//! AGAT statistics module
//!
//! Maps the YAML written by AGAT's statistics scripts into the `agat` section.
//! Statistics are taken for transcripts without isoforms, falling back to
//! mRNAs when the transcript block is missing or incomplete.

use crate::error::Result;
use crate::input::{expect_mapping, read_yaml};
use crate::mapping::{self, subsection, FieldMapping, FieldTable};
use crate::{not_available, Section};
use serde_json::Value;
use std::path::Path;

/// Records which feature type the statistics were calculated for.
pub const FEATURE_LABEL_FIELD: &str = "feature_stats_calculated_for";

/// Feature blocks to search, with the label reported for each
const FEATURES: [(&str, &str); 2] = [
    ("transcript", "transcripts (without isoforms)"),
    ("mrna", "mRNAs (without isoforms)"),
];

/// AGAT has written both spellings across releases.
const VARIANTS: [&str; 2] = ["without_isoforms", "without_isoform"];

pub const KEY_STATS: FieldTable = FieldTable::new(
    "AGAT key stats",
    &[
        FieldMapping::new("gene_count", &["Number of gene"]),
        FieldMapping::new("cds_count", &["Number of cds"]),
        FieldMapping::new("transcript_count", &["Number of transcript"]),
        FieldMapping::new("mean_transcript_length", &["mean transcript length (bp)"]),
        FieldMapping::new("mean_transcripts_per_gene", &["mean transcripts per gene"]),
        FieldMapping::new("mean_exons_per_transcript", &["mean exons per transcript"]),
    ],
);

pub const ADDITIONAL_STATS: FieldTable = FieldTable::new(
    "AGAT additional stats",
    &[
        FieldMapping::new("exon_count", &["Number of exon"]),
        FieldMapping::new("mean_exon_length", &["mean exon length (bp)"]),
        FieldMapping::new("mean_gene_length", &["mean gene length (bp)"]),
        FieldMapping::new("total_gene_length", &["Total gene length (bp)"]),
        FieldMapping::new("total_transcript_length", &["Total transcript length (bp)"]),
    ],
);

pub const FULL_STATS: FieldTable = FieldTable::new(
    "AGAT full stats",
    &[
        FieldMapping::new("intron_count", &["Number of intron"]),
        FieldMapping::new("single_exon_gene_count", &["Number of single exon gene"]),
        FieldMapping::new(
            "single_exon_transcript_count",
            &["Number of single exon transcript"],
        ),
    ],
);

pub const MEAN_STATS: FieldTable = FieldTable::new(
    "AGAT mean stats",
    &[
        FieldMapping::new("mean_cds_length", &["mean cds length (bp)"]),
        FieldMapping::new("mean_intron_length", &["mean intron length (bp)"]),
        FieldMapping::new("mean_cdss_per_transcript", &["mean cdss per transcript"]),
        FieldMapping::new("mean_exons_per_cds", &["mean exons per cds"]),
        FieldMapping::new("mean_introns_per_transcript", &["mean introns per transcript"]),
    ],
);

pub const MEDIAN_STATS: FieldTable = FieldTable::new(
    "AGAT median stats",
    &[
        FieldMapping::new("median_gene_length", &["median gene length (bp)"]),
        FieldMapping::new("median_transcript_length", &["median transcript length (bp)"]),
        FieldMapping::new("median_exon_length", &["median exon length (bp)"]),
        FieldMapping::new("median_cds_length", &["median cds length (bp)"]),
        FieldMapping::new("median_intron_length", &["median intron length (bp)"]),
    ],
);

pub const LONGEST_SHORTEST_STATS: FieldTable = FieldTable::new(
    "AGAT longest/shortest stats",
    &[
        FieldMapping::new("longest_gene", &["Longest gene (bp)"]),
        FieldMapping::new("longest_transcript", &["Longest transcript (bp)"]),
        FieldMapping::new("longest_exon", &["Longest exon (bp)"]),
        FieldMapping::new("longest_cds", &["Longest cds (bp)"]),
        FieldMapping::new("longest_intron", &["Longest intron (bp)"]),
        FieldMapping::new("shortest_gene", &["Shortest gene (bp)"]),
        FieldMapping::new("shortest_transcript", &["Shortest transcript (bp)"]),
    ],
);

pub const LENGTH_STATS: FieldTable = FieldTable::new(
    "AGAT length stats",
    &[
        FieldMapping::new("total_cds_length", &["Total cds length (bp)"]),
        FieldMapping::new("total_exon_length", &["Total exon length (bp)"]),
        FieldMapping::new("total_intron_length", &["Total intron length (bp)"]),
    ],
);

pub const TABLES: [FieldTable; 7] = [
    KEY_STATS,
    ADDITIONAL_STATS,
    FULL_STATS,
    MEAN_STATS,
    MEDIAN_STATS,
    LONGEST_SHORTEST_STATS,
    LENGTH_STATS,
];

/// Fields copied into the genome-note subset
pub const KEY_FIELDS: &[&str] = &[
    FEATURE_LABEL_FIELD,
    "gene_count",
    "cds_count",
    "transcript_count",
    "mean_transcript_length",
    "mean_transcripts_per_gene",
    "mean_exons_per_transcript",
];

/// The statistics map located in an AGAT document
#[derive(Debug, Clone, Copy)]
pub struct FeatureStats<'a> {
    pub label: &'static str,
    pub values: &'a Section,
}

/// Find the without-isoform statistics, trying transcripts before mRNAs.
pub fn locate(doc: &Section) -> Option<FeatureStats<'_>> {
    for (feature, label) in FEATURES {
        let Some(block) = subsection(doc, feature) else {
            continue;
        };

        let values = VARIANTS
            .iter()
            .filter_map(|variant| subsection(block, variant))
            .find_map(|stats| subsection(stats, "value"));

        match values {
            Some(values) => return Some(FeatureStats { label, values }),
            None => log::warn!(
                "AGAT '{}' block has no without-isoform statistics, looking further",
                feature
            ),
        }
    }
    None
}

/// Load an AGAT YAML file into its normalized section.
pub fn load(path: &Path) -> Result<Section> {
    let doc = expect_mapping(read_yaml(path)?, path, "YAML")?;
    Ok(normalize(&doc))
}

/// Map a parsed AGAT document onto the annotation schema.
pub fn normalize(doc: &Section) -> Section {
    let stats = locate(doc);
    if stats.is_none() {
        log::warn!("no transcript or mRNA statistics found in AGAT input, AGAT fields set to N/A");
    }

    let values = stats.map(|stats| stats.values);
    let bindings: Vec<(FieldTable, Option<&Section>)> =
        TABLES.iter().map(|table| (*table, values)).collect();

    let mut section = Section::new();
    section.insert(
        FEATURE_LABEL_FIELD.to_string(),
        stats.map_or_else(not_available, |stats| Value::from(stats.label)),
    );
    section.extend(mapping::normalize(&bindings));
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

    #[test]
    fn test_transcript_without_isoforms() {
        let input = doc(json!({
            "transcript": {"without_isoforms": {"value": {
                "Number of gene": 4200,
                "Number of transcript": 4310,
                "mean transcript length (bp)": 1874.2,
            }}}
        }));

        let section = normalize(&input);

        assert_eq!(section[FEATURE_LABEL_FIELD], json!("transcripts (without isoforms)"));
        assert_eq!(section["gene_count"], json!(4200));
        assert_eq!(section["transcript_count"], json!(4310));
        assert_eq!(section["mean_transcript_length"], json!(1874.2));
        assert_eq!(section["longest_intron"], json!(NOT_AVAILABLE));
    }

    #[test]
    fn test_misspelled_variant_accepted() {
        let input = doc(json!({
            "mrna": {"without_isoform": {"value": {"Number of gene": 12}}}
        }));

        let section = normalize(&input);

        assert_eq!(section[FEATURE_LABEL_FIELD], json!("mRNAs (without isoforms)"));
        assert_eq!(section["gene_count"], json!(12));
    }

    #[test]
    fn test_correct_spelling_preferred() {
        let input = doc(json!({
            "transcript": {
                "without_isoform": {"value": {"Number of gene": 1}},
                "without_isoforms": {"value": {"Number of gene": 2}},
            }
        }));
        assert_eq!(normalize(&input)["gene_count"], json!(2));
    }

    #[test]
    fn test_falls_back_to_mrna() {
        let input = doc(json!({
            "transcript": {"with_isoforms": {"value": {"Number of gene": 1}}},
            "mrna": {"without_isoforms": {"value": {"Number of gene": 99}}},
        }));

        let section = normalize(&input);

        assert_eq!(section[FEATURE_LABEL_FIELD], json!("mRNAs (without isoforms)"));
        assert_eq!(section["gene_count"], json!(99));
    }

    #[test]
    fn test_no_feature_block() {
        let section = normalize(&doc(json!({"gene": {}})));

        assert_eq!(section[FEATURE_LABEL_FIELD], json!(NOT_AVAILABLE));
        for field in TABLES.iter().flat_map(|table| table.field_names()) {
            assert_eq!(section[field], json!(NOT_AVAILABLE), "{field}");
        }
    }

    #[test]
    fn test_key_fields_are_section_fields() {
        let section = normalize(&doc(json!({})));
        for key in KEY_FIELDS {
            assert!(section.contains_key(*key), "{key}");
        }
    }
}
