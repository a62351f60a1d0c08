//! BUSCO summary module
//!
//! Maps BUSCO's `short_summary.json` onto the `busco` section. BUSCO has
//! labelled its result percentages two ways across releases (`"Complete"`
//! and `"Complete percentage"`); both land in the same schema field.

use crate::error::Result;
use crate::input::{expect_mapping, read_json};
use crate::mapping::{self, subsection, FieldMapping, FieldTable};
use crate::Section;
use std::path::Path;

pub const PARAMETER_FIELDS: FieldTable = FieldTable::new(
    "BUSCO parameters",
    &[
        FieldMapping::new("mode", &["mode"]),
        FieldMapping::new("gene_predictor", &["gene_predictor"]),
    ],
);

pub const LINEAGE_FIELDS: FieldTable = FieldTable::new(
    "BUSCO lineage dataset",
    &[FieldMapping::new("lineage_name", &["name"])],
);

pub const VERSION_FIELDS: FieldTable = FieldTable::new(
    "BUSCO versions",
    &[
        FieldMapping::new("version_busco", &["busco"]),
        FieldMapping::new("version_hmmsearch", &["hmmsearch"]),
        FieldMapping::new("version_metaeuk", &["metaeuk"]),
        FieldMapping::new("version_augustus", &["augustus"]),
        FieldMapping::new("version_miniprot", &["miniprot"]),
    ],
);

pub const RESULT_FIELDS: FieldTable = FieldTable::new(
    "BUSCO results",
    &[
        FieldMapping::new("one_line_summary", &["one_line_summary"]),
        FieldMapping::new("complete_percent", &["Complete percentage", "Complete"]),
        FieldMapping::new("single_copy_percent", &["Single copy percentage", "Single copy"]),
        FieldMapping::new("duplicated_percent", &["Multi copy percentage", "Multi copy"]),
        FieldMapping::new("fragmented_percent", &["Fragmented percentage", "Fragmented"]),
        FieldMapping::new("missing_percent", &["Missing percentage", "Missing"]),
        FieldMapping::new("complete_count", &["Complete BUSCOs"]),
        FieldMapping::new("single_copy_count", &["Single copy BUSCOs"]),
        FieldMapping::new("duplicated_count", &["Multi copy BUSCOs"]),
        FieldMapping::new("fragmented_count", &["Fragmented BUSCOs"]),
        FieldMapping::new("missing_count", &["Missing BUSCOs"]),
        FieldMapping::new("n_markers", &["n_markers"]),
        FieldMapping::new("domain", &["domain"]),
    ],
);

/// Document sections and the table applied to each
pub const SECTIONS: [(&str, FieldTable); 4] = [
    ("parameters", PARAMETER_FIELDS),
    ("lineage_dataset", LINEAGE_FIELDS),
    ("versions", VERSION_FIELDS),
    ("results", RESULT_FIELDS),
];

/// Fields copied into the genome-note subset
pub const KEY_FIELDS: &[&str] = &["mode", "lineage_name", "one_line_summary", "version_busco"];

/// Load a BUSCO JSON summary into its normalized section.
pub fn load(path: &Path) -> Result<Section> {
    let doc = expect_mapping(read_json(path)?, path, "JSON")?;
    Ok(normalize(&doc))
}

/// Map a parsed BUSCO summary onto the annotation schema.
pub fn normalize(doc: &Section) -> Section {
    let bindings: Vec<(FieldTable, Option<&Section>)> = SECTIONS
        .iter()
        .map(|(key, table)| {
            let source = subsection(doc, key);
            if source.is_none() {
                log::warn!("BUSCO input has no '{}' section, its fields set to N/A", key);
            }
            (*table, source)
        })
        .collect();

    mapping::normalize(&bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NOT_AVAILABLE;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Section {
        value.as_object().cloned().unwrap()
    }

    fn summary(results: Value) -> Section {
        doc(json!({
            "parameters": {"mode": "proteins", "gene_predictor": "metaeuk"},
            "lineage_dataset": {"name": "eudicots_odb10"},
            "versions": {"busco": "5.7.1", "hmmsearch": 3.4},
            "results": results,
        }))
    }

    #[test]
    fn test_current_labels() {
        let section = normalize(&summary(json!({
            "one_line_summary": "C:98.1%[S:80.0%,D:18.1%],F:0.5%,M:1.4%,n:2326",
            "Complete percentage": 98.1,
            "Single copy percentage": 80.0,
            "Multi copy percentage": 18.1,
            "Fragmented percentage": 0.5,
            "Missing percentage": 1.4,
            "Complete BUSCOs": 2282,
            "n_markers": 2326,
            "domain": "eukaryota",
        })));

        assert_eq!(section["mode"], json!("proteins"));
        assert_eq!(section["lineage_name"], json!("eudicots_odb10"));
        assert_eq!(section["version_busco"], json!("5.7.1"));
        assert_eq!(section["complete_percent"], json!(98.1));
        assert_eq!(section["duplicated_percent"], json!(18.1));
        assert_eq!(section["complete_count"], json!(2282));
        assert_eq!(section["version_augustus"], json!(NOT_AVAILABLE));
    }

    #[test]
    fn test_legacy_and_current_labels_agree() {
        let legacy = normalize(&summary(json!({"Complete": 97.3, "Missing": 2.0})));
        let current = normalize(&summary(json!({
            "Complete percentage": 97.3,
            "Missing percentage": 2.0,
        })));

        assert_eq!(legacy["complete_percent"], json!(97.3));
        assert_eq!(legacy["complete_percent"], current["complete_percent"]);
        assert_eq!(legacy["missing_percent"], current["missing_percent"]);
    }

    #[test]
    fn test_current_label_wins_when_both_present() {
        let section = normalize(&summary(json!({
            "Complete": 91.0,
            "Complete percentage": 97.3,
            "Single copy percentage": 85.2,
            "Single copy": 80.0,
        })));

        assert_eq!(section["complete_percent"], json!(97.3));
        assert_eq!(section["single_copy_percent"], json!(85.2));
    }

    #[test]
    fn test_missing_sections_default() {
        let section = normalize(&doc(json!({"results": {"Complete": 50.0}})));

        assert_eq!(section["complete_percent"], json!(50.0));
        for field in ["mode", "gene_predictor", "lineage_name", "version_busco"] {
            assert_eq!(section[field], json!(NOT_AVAILABLE), "{field}");
        }
    }

    #[test]
    fn test_every_declared_field_present() {
        let section = normalize(&doc(json!({})));
        for field in SECTIONS.iter().flat_map(|(_, table)| table.field_names()) {
            assert!(section.contains_key(field), "{field}");
        }
    }
}
