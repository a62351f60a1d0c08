//! Field mapping tables and the projection routine shared by every source
//!
//! Each source declares static tables of annotation-schema fields and the
//! source keys they are read from. Projection copies whatever the source has,
//! then a fill pass writes a default for every declared field still unset, so
//! a normalized section always carries every field its tables declare.

use crate::{not_available, Section};
use serde_json::Value;

/// One annotation-schema field and the source keys it may be read from
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub field: &'static str,
    /// Source keys, checked in priority order
    pub aliases: &'static [&'static str],
}

impl FieldMapping {
    pub const fn new(field: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { field, aliases }
    }
}

/// A named group of mappings applied to one section of a source document
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    pub name: &'static str,
    pub fields: &'static [FieldMapping],
}

impl FieldTable {
    pub const fn new(name: &'static str, fields: &'static [FieldMapping]) -> Self {
        Self { name, fields }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|mapping| mapping.field)
    }
}

/// Borrow `key` of `doc` as a nested section, if it is a mapping.
pub fn subsection<'a>(doc: &'a Section, key: &str) -> Option<&'a Section> {
    doc.get(key).and_then(Value::as_object)
}

/// Copy every field of `table` found in `source` into `target`.
///
/// Fields the source lacks are left unset for [`fill_missing`]. Returns the
/// number of fields copied.
pub fn project(table: &FieldTable, source: Option<&Section>, target: &mut Section) -> usize {
    let Some(source) = source else {
        log::debug!("{}: section absent, 0/{} fields", table.name, table.fields.len());
        return 0;
    };

    let mut found = 0;
    for mapping in table.fields {
        let mut hits = mapping
            .aliases
            .iter()
            .filter_map(|alias| source.get(*alias).map(|value| (*alias, value)));

        if let Some((alias, value)) = hits.next() {
            if let Some((shadowed, _)) = hits.next() {
                log::debug!(
                    "{}: '{}' and '{}' both present for {}, using '{}'",
                    table.name,
                    alias,
                    shadowed,
                    mapping.field,
                    alias
                );
            }
            target.insert(mapping.field.to_string(), value.clone());
            found += 1;
        }
    }

    log::debug!("{}: {}/{} fields found", table.name, found, table.fields.len());
    found
}

/// Give every field declared by `tables` a value, using `default` for unset ones.
///
/// Declared fields are reordered to table order; any other keys already in
/// `target` follow them. Returns the number of fields defaulted.
pub fn fill_missing(tables: &[FieldTable], target: &mut Section, default: &Value) -> usize {
    let mut filled = 0;
    let mut ordered = Section::new();

    for field in tables.iter().flat_map(|table| table.field_names()) {
        let value = match target.get(field) {
            Some(value) => value.clone(),
            None => {
                filled += 1;
                default.clone()
            }
        };
        ordered.insert(field.to_string(), value);
    }

    for (key, value) in target.iter() {
        if !ordered.contains_key(key) {
            ordered.insert(key.clone(), value.clone());
        }
    }

    *target = ordered;
    filled
}

/// Project each `(table, source section)` pair and fill the gaps with `"N/A"`.
pub fn normalize(bindings: &[(FieldTable, Option<&Section>)]) -> Section {
    let mut section = Section::new();
    for (table, source) in bindings {
        project(table, *source, &mut section);
    }

    let tables: Vec<FieldTable> = bindings.iter().map(|(table, _)| *table).collect();
    let filled = fill_missing(&tables, &mut section, &not_available());
    if filled > 0 {
        log::debug!("{} fields defaulted to N/A", filled);
    }
    section
}

/// Copy the listed keys of `section`, skipping any it does not carry.
pub fn key_subset(section: &Section, keys: &[&str]) -> Section {
    keys.iter()
        .filter_map(|key| section.get(*key).map(|value| (key.to_string(), value.clone())))
        .collect()
}
