//! Loadout parsing: resolves a free-text equipment report into one display
//! cell per slot using the item catalog.

use serde::{Deserialize, Serialize};

use crate::equipment::catalog::{Catalog, CatalogEntry, Slot};

/// Text shown for a slot with no recognised item.
pub const BLANK_SLOT: &str = "-";

/// One rendered equipment cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotDisplay {
    pub slot: Slot,
    pub text: String,
    pub color: Option<String>,
}

impl SlotDisplay {
    pub fn blank(slot: Slot) -> Self {
        Self {
            slot,
            text: BLANK_SLOT.to_string(),
            color: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.color.is_none() && self.text == BLANK_SLOT
    }
}

/// Resolves `loadout` against `catalog`, returning exactly one cell per slot in
/// `Slot::ALL` order. A missing loadout yields all blanks.
///
/// For each slot, entries are tried in catalog order and, for each entry, lines
/// in report order; the first line containing the entry name wins. The text in
/// front of the name (enchantment or owner marks) is kept and the entry's alias,
/// if any, replaces the name.
pub fn parse_loadout(loadout: Option<&str>, catalog: &Catalog) -> Vec<SlotDisplay> {
    let lines: Vec<&str> = loadout.map(|text| text.lines().collect()).unwrap_or_default();

    Slot::ALL
        .into_iter()
        .map(|slot| resolve_slot(slot, &lines, catalog))
        .collect()
}

fn resolve_slot(slot: Slot, lines: &[&str], catalog: &Catalog) -> SlotDisplay {
    catalog
        .entries(slot)
        .iter()
        .find_map(|entry| match_entry(entry, lines))
        .map(|(entry, prefix)| SlotDisplay {
            slot,
            text: format!("{prefix}{}", entry.display_name()),
            color: catalog.color_for(entry.grade).map(str::to_string),
        })
        .unwrap_or_else(|| SlotDisplay::blank(slot))
}

fn match_entry<'a, 'l>(
    entry: &'a CatalogEntry,
    lines: &[&'l str],
) -> Option<(&'a CatalogEntry, &'l str)> {
    lines
        .iter()
        .copied()
        .find_map(|line| line.find(entry.name.as_str()).map(|pos| (entry, &line[..pos])))
}
