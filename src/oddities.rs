//! AnnoOddities module
//!
//! Maps the per-category counts of suspicious gene models (a headered
//! `key<TAB>count` table) onto the `annooddities` section.

use crate::error::Result;
use crate::input::read_count_table;
use crate::mapping::{self, FieldMapping, FieldTable};
use crate::Section;
use std::path::Path;

pub const ODDITY_FIELDS: FieldTable = FieldTable::new(
    "AnnoOddities counts",
    &[
        FieldMapping::new("oddities_models_checked", &["models_checked"]),
        FieldMapping::new("oddities_single_exon", &["single_exon"]),
        FieldMapping::new("oddities_short_cds", &["short_cds"]),
        FieldMapping::new("oddities_short_intron", &["short_intron"]),
        FieldMapping::new("oddities_long_intron", &["long_intron"]),
        FieldMapping::new("oddities_non_canonical_splice", &["non_canonical_splice"]),
        FieldMapping::new("oddities_internal_stop", &["internal_stop"]),
        FieldMapping::new("oddities_missing_start", &["missing_start"]),
        FieldMapping::new("oddities_missing_stop", &["missing_stop"]),
        FieldMapping::new("oddities_overlapping_cds", &["overlapping_cds"]),
    ],
);

/// Fields copied into the genome-note subset
pub const KEY_FIELDS: &[&str] = &[
    "oddities_models_checked",
    "oddities_internal_stop",
    "oddities_missing_start",
    "oddities_missing_stop",
];

/// Load an oddities table into its normalized section.
pub fn load(path: &Path) -> Result<Section> {
    let counts = read_count_table(path)?;
    Ok(normalize(&counts))
}

/// Map oddity counts onto the annotation schema.
pub fn normalize(counts: &Section) -> Section {
    for key in counts.keys() {
        let known = ODDITY_FIELDS
            .fields
            .iter()
            .flat_map(|mapping| mapping.aliases)
            .any(|alias| *alias == key.as_str());
        if !known {
            log::debug!("ignoring unrecognised oddity '{}'", key);
        }
    }

    mapping::normalize(&[(ODDITY_FIELDS, Some(counts))])
}
