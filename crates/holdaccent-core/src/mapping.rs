// Holdaccent Mapping Table
// Accent key -> substitute string pairs built from configuration slots

use indexmap::IndexMap;

/// Maximum number of mapping slots the configuration surface exposes
pub const MAX_MAPPING_SLOTS: usize = 20;

/// One persisted `MappingNInput` / `MappingNOutput` pair.
///
/// Either side may be empty; empty slots are ignored when the table is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingSlot {
    pub input: String,
    pub output: String,
}

impl MappingSlot {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// A slot only contributes to the table when both sides are set
    pub fn is_active(&self) -> bool {
        !self.input.is_empty() && !self.output.is_empty()
    }
}

/// The German umlaut set that pre-populates the first slots
pub fn default_slots() -> Vec<MappingSlot> {
    [
        ("a", "ä"),
        ("o", "ö"),
        ("u", "ü"),
        ("s", "ß"),
        ("A", "Ä"),
        ("O", "Ö"),
        ("U", "Ü"),
    ]
    .into_iter()
    .map(|(input, output)| MappingSlot::new(input, output))
    .collect()
}

/// Ordered accent-key table.
///
/// Keys are unique by input string and keep slot order, so the first slot
/// naming an input wins over any later duplicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    mappings: IndexMap<String, String>,
}

impl MappingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from configuration slots.
    ///
    /// Only the first [`MAX_MAPPING_SLOTS`] slots are considered, and slots
    /// with an empty input or output are skipped.
    pub fn from_slots(slots: &[MappingSlot]) -> Self {
        let mut mappings = IndexMap::new();

        if slots.len() > MAX_MAPPING_SLOTS {
            log::warn!(
                "{} mapping slots configured, only the first {} are used",
                slots.len(),
                MAX_MAPPING_SLOTS
            );
        }

        for (index, slot) in slots.iter().take(MAX_MAPPING_SLOTS).enumerate() {
            if !slot.is_active() {
                continue;
            }
            if mappings.contains_key(&slot.input) {
                log::warn!(
                    "Mapping{}Input '{}' duplicates an earlier slot and is ignored",
                    index + 1,
                    slot.input
                );
                continue;
            }
            mappings.insert(slot.input.clone(), slot.output.clone());
        }

        log::debug!("Mapping table built with {} entries", mappings.len());
        Self { mappings }
    }

    /// Look up the substitute for an accent key
    pub fn get(&self, input: &str) -> Option<&str> {
        self.mappings.get(input).map(String::as_str)
    }

    /// Check if `input` is an accent key
    pub fn contains(&self, input: &str) -> bool {
        self.mappings.contains_key(input)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Iterate over (input, output) pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mappings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
