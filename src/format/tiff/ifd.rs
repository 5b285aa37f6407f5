//! Image File Directory decoding.
//!
//! An IFD is a 16-bit entry count followed by `count` 12-byte entries and a
//! 32-bit offset to the next IFD. All offsets inside a TIFF block are
//! relative to the block start, which inside a JPEG is not offset 0 of the
//! buffer, so every read goes through [`TiffBlock`].

use std::collections::HashMap;
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::TiffError;
use crate::format::buffer::ByteView;

use super::parser::{ByteOrder, IfdEntry, IFD_COUNT_SIZE, IFD_ENTRY_SIZE, VALUE_OFFSET_SIZE};
use super::tags::TagNamespace;
use super::values::{decode_value, Value};

// =============================================================================
// TagKey
// =============================================================================

/// Key of a decoded tag: its name when the namespace knows it, else its ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    Name(&'static str),
    Id(u16),
}

impl TagKey {
    /// Resolve `tag_id` in `namespace`, falling back to the numeric ID.
    pub fn resolve(namespace: TagNamespace, tag_id: u16) -> Self {
        namespace
            .name(tag_id)
            .map(TagKey::Name)
            .unwrap_or(TagKey::Id(tag_id))
    }

    pub fn name(&self) -> Option<&'static str> {
        match self {
            TagKey::Name(name) => Some(name),
            TagKey::Id(_) => None,
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKey::Name(name) => f.write_str(name),
            TagKey::Id(id) => write!(f, "{}", id),
        }
    }
}

impl Serialize for TagKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// TagMap
// =============================================================================

/// Insertion-ordered mapping from tag key to value.
///
/// Inserting an existing key replaces its value in place, so the first
/// position of a key is kept. `positions` indexes `entries` by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagMap {
    entries: Vec<(TagKey, Value)>,
    positions: HashMap<TagKey, usize>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert(&mut self, key: TagKey, value: Value) -> Option<Value> {
        if let Some(slot) = self.get_key_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.positions.insert(key, self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Look up a value by key.
    pub fn get_key(&self, key: &TagKey) -> Option<&Value> {
        let pos = *self.positions.get(key)?;
        self.entries.get(pos).map(|(_, v)| v)
    }

    pub fn get_key_mut(&mut self, key: &TagKey) -> Option<&mut Value> {
        let pos = *self.positions.get(key)?;
        self.entries.get_mut(pos).map(|(_, v)| v)
    }

    /// Look up a value by tag name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.name() == Some(name))
            .map(|(_, v)| v)
    }

    /// Look up a value stored under its numeric ID.
    pub fn get_by_id(&self, tag_id: u16) -> Option<&Value> {
        self.get_key(&TagKey::Id(tag_id))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.name() == Some(name))
            .map(|(_, v)| v)
    }

    /// Remove a value by tag name.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k.name() == Some(name))?;
        let (key, value) = self.entries.remove(pos);
        self.positions.remove(&key);
        for p in self.positions.values_mut() {
            if *p > pos {
                *p -= 1;
            }
        }
        Some(value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TagKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&TagKey, &mut Value)> {
        self.entries.iter_mut().map(|(k, v)| (&*k, v))
    }

    /// Merge `other` into this map; on collision `other` wins.
    pub fn extend(&mut self, other: TagMap) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for TagMap {
    type Item = (TagKey, Value);
    type IntoIter = std::vec::IntoIter<(TagKey, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for TagMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// TiffBlock
// =============================================================================

/// A TIFF block located inside a buffer.
#[derive(Debug, Clone, Copy)]
pub struct TiffBlock<'a> {
    view: ByteView<'a>,

    /// Absolute offset of the TIFF header in the buffer
    start: usize,

    byte_order: ByteOrder,
}

impl<'a> TiffBlock<'a> {
    pub fn new(view: ByteView<'a>, start: usize, byte_order: ByteOrder) -> Self {
        Self {
            view,
            start,
            byte_order,
        }
    }

    /// Convert an offset relative to the TIFF start into a buffer offset.
    #[inline]
    fn absolute(&self, offset: u32) -> usize {
        self.start.saturating_add(offset as usize)
    }

    /// Number of entries in the IFD at `ifd_offset`.
    pub fn entry_count(&self, ifd_offset: u32) -> Result<usize, TiffError> {
        Ok(self.view.u16(self.absolute(ifd_offset), self.byte_order)? as usize)
    }

    /// Read the next-IFD pointer stored right after the entries of the IFD
    /// at `ifd_offset`. Zero means there is no next IFD.
    pub fn next_ifd_offset(&self, ifd_offset: u32) -> Result<u32, TiffError> {
        let count = self.entry_count(ifd_offset)?;
        let pointer = self
            .absolute(ifd_offset)
            .saturating_add(IFD_COUNT_SIZE + count * IFD_ENTRY_SIZE);
        self.view.u32(pointer, self.byte_order)
    }

    /// Decode the IFD at `ifd_offset` into a tag map.
    ///
    /// Entries with an unknown field type are skipped. Any entry or value
    /// outside the buffer fails the whole directory.
    pub fn decode_ifd(&self, ifd_offset: u32, namespace: TagNamespace) -> Result<TagMap, TiffError> {
        let base = self.absolute(ifd_offset);
        let count = self.entry_count(ifd_offset)?;

        let entries_start = base + IFD_COUNT_SIZE;
        let entries = self.view.slice(entries_start, count * IFD_ENTRY_SIZE)?;

        let mut tags = TagMap::with_capacity(count);
        for (i, raw) in entries.chunks_exact(IFD_ENTRY_SIZE).enumerate() {
            let entry = IfdEntry::parse(raw, self.byte_order);

            let Some(field_type) = entry.field_type else {
                debug!(
                    tag_id = entry.tag_id,
                    field_type = entry.field_type_raw,
                    "Skipping entry with unknown field type"
                );
                continue;
            };

            let value_offset = if entry.is_inline() {
                // Value lives in the last 4 bytes of the entry itself
                entries_start + (i + 1) * IFD_ENTRY_SIZE - VALUE_OFFSET_SIZE
            } else {
                self.absolute(entry.value_offset(self.byte_order))
            };

            let value = decode_value(
                &self.view,
                value_offset,
                field_type,
                entry.count as usize,
                self.byte_order,
            )?;
            tags.insert(TagKey::resolve(namespace, entry.tag_id), value);
        }

        debug!(
            ifd_offset,
            entries = count,
            decoded = tags.len(),
            "Decoded IFD"
        );
        Ok(tags)
    }
}

// =============================================================================
// Tests
// =============================================================================
