//! Static item catalog: named items per equipment slot, each tagged with a
//! rarity grade. Loaded once at startup and shared read-only.
//!
//! Within a slot, entries are kept in declared order. That order is the match
//! priority, so more specific names must come before names they contain
//! ("Эльфийский меч" before "Меч").

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown equipment slot '{0}'")]
    UnknownSlot(String),

    #[error("catalog entry in slot '{0}' has an empty name")]
    EmptyName(Slot),
}

/// Equipment slot. `Slot::ALL` is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Pri,
    Sec,
    Head,
    Hands,
    Body,
    Feet,
    Misc,
}

impl Slot {
    pub const ALL: [Slot; 7] = [
        Slot::Pri,
        Slot::Sec,
        Slot::Head,
        Slot::Hands,
        Slot::Body,
        Slot::Feet,
        Slot::Misc,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Slot::Pri => "pri",
            Slot::Sec => "sec",
            Slot::Head => "head",
            Slot::Hands => "hands",
            Slot::Body => "body",
            Slot::Feet => "feet",
            Slot::Misc => "misc",
        }
    }

    pub fn from_key(key: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|s| s.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Rarity tier; indexes into the catalog's color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grade(pub u8);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub grade: Grade,
    /// Shown instead of `name` when the entry matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl CatalogEntry {
    pub fn new(name: &str, grade: u8) -> Self {
        Self {
            name: name.to_string(),
            grade: Grade(grade),
            alias: None,
        }
    }

    pub fn aliased(name: &str, grade: u8, alias: &str) -> Self {
        Self {
            alias: Some(alias.to_string()),
            ..Self::new(name, grade)
        }
    }

    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    grades: Vec<Option<String>>,
    #[serde(default)]
    slots: BTreeMap<String, Vec<CatalogEntry>>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    colors: Vec<Option<String>>,
    entries: [Vec<CatalogEntry>; 7],
}

impl Catalog {
    /// Builds a catalog from per-slot entry lists. Slots not mentioned get no entries.
    pub fn new(
        colors: Vec<Option<String>>,
        slots: impl IntoIterator<Item = (Slot, Vec<CatalogEntry>)>,
    ) -> Result<Self, CatalogError> {
        let slots: Vec<_> = slots.into_iter().collect();
        if let Some((slot, _)) = slots
            .iter()
            .find(|(_, list)| list.iter().any(|e| e.name.trim().is_empty()))
        {
            return Err(CatalogError::EmptyName(*slot));
        }
        Ok(Self::from_parts(colors, slots))
    }

    fn from_parts(colors: Vec<Option<String>>, slots: Vec<(Slot, Vec<CatalogEntry>)>) -> Self {
        let mut entries: [Vec<CatalogEntry>; 7] = Default::default();
        for (slot, list) in slots {
            entries[slot.index()] = list;
        }
        Self { colors, entries }
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let mut slots = Vec::with_capacity(file.slots.len());
        for (key, list) in file.slots {
            let slot = Slot::from_key(&key).ok_or(CatalogError::UnknownSlot(key))?;
            slots.push((slot, list));
        }
        Self::new(file.grades, slots)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&content)?;
        info!(
            "Loaded catalog from {} ({} entries)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Entries for `slot` in priority order.
    pub fn entries(&self, slot: Slot) -> &[CatalogEntry] {
        &self.entries[slot.index()]
    }

    /// Display color for a grade; `None` for uncolored or unknown grades.
    pub fn color_for(&self, grade: Grade) -> Option<&str> {
        self.colors
            .get(usize::from(grade.0))
            .and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Catalog compiled into the binary, used when no catalog file is configured.
    pub fn builtin() -> Self {
        use CatalogEntry as E;

        let colors = vec![
            None,
            Some("green".to_string()),
            Some("blue".to_string()),
            Some("purple".to_string()),
            Some("orange".to_string()),
        ];
        let slots = vec![
            (
                Slot::Pri,
                vec![
                    E::new("Экскалибур", 4),
                    E::new("Клеймор", 3),
                    E::new("Рапира", 2),
                    E::new("Эльфийский меч", 1),
                    E::new("Эльфийское копьё", 1),
                    E::new("Копьё", 0),
                    E::new("Меч", 0),
                    E::new("Палка", 0),
                ],
            ),
            (
                Slot::Sec,
                vec![
                    E::aliased("Кинжал триумфа", 3, "Триумф"),
                    E::new("Кинжал охотника", 2),
                    E::new("Кинжал", 0),
                    E::new("Щит хранителя", 3),
                    E::new("Мифриловый щит", 2),
                    E::new("Щит", 0),
                ],
            ),
            (
                Slot::Head,
                vec![
                    E::new("Шлем хранителя", 3),
                    E::new("Мифриловый шлем", 2),
                    E::new("Стальной шлем", 1),
                    E::new("Шлем", 0),
                    E::new("Шапка", 0),
                ],
            ),
            (
                Slot::Hands,
                vec![
                    E::new("Перчатки хранителя", 3),
                    E::new("Мифриловые перчатки", 2),
                    E::new("Стальные перчатки", 1),
                    E::new("Перчатки", 0),
                ],
            ),
            (
                Slot::Body,
                vec![
                    E::new("Броня хранителя", 3),
                    E::new("Мифриловая броня", 2),
                    E::new("Стальная броня", 1),
                    E::new("Кожаный доспех", 0),
                    E::new("Броня", 0),
                ],
            ),
            (
                Slot::Feet,
                vec![
                    E::new("Сапоги хранителя", 3),
                    E::new("Мифриловые сапоги", 2),
                    E::new("Стальные сапоги", 1),
                    E::new("Сапоги", 0),
                    E::new("Ботинки", 0),
                ],
            ),
            (
                Slot::Misc,
                vec![
                    E::aliased("Кольцо восхождения", 4, "Восхождение"),
                    E::new("Амулет", 1),
                    E::new("Кольцо", 1),
                ],
            ),
        ];

        Self::from_parts(colors, slots)
    }
}
