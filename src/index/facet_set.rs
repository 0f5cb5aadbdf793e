//! Canonical binary encoding of a set of facet term ids.
//!
//! Ids are sorted ascending, deduplicated and written as fixed-width
//! little-endian `u16`s. The encoding is a bijection on sorted id sets, so the
//! bytes double as a unique storage key, and `len()` of the bytes is the
//! number of terms times [`WIDTH`], which lets the store bucket facet sets by
//! size without decoding them.

use crate::error::{FacetdexError, Result};
use crate::types::TermId;

/// Bytes per encoded term id.
pub const WIDTH: usize = 2;

/// Largest facet term id the encoding can hold.
pub const MAX_TERM_ID: TermId = u16::MAX as TermId;

/// Encoded byte length of a facet set with `terms` members.
pub fn byte_length(terms: usize) -> usize {
    terms * WIDTH
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FacetSet {
    bytes: Vec<u8>,
}

impl FacetSet {
    /// The unfiltered facet set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode term ids. Order and duplicates in `ids` do not matter.
    ///
    /// An id outside `1..=MAX_TERM_ID` means the registry outgrew the
    /// encoding; that is a configuration fault, not a caller mistake.
    pub fn from_ids(ids: &[TermId]) -> Result<Self> {
        let mut narrow = Vec::with_capacity(ids.len());
        for &id in ids {
            narrow.push(narrow_id(id)?);
        }
        Ok(Self::from_sorted(&canonicalize(narrow)))
    }

    /// Encode ids already sorted ascending and deduplicated.
    pub(crate) fn from_sorted(ids: &[u16]) -> Self {
        debug_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        let mut bytes = Vec::with_capacity(byte_length(ids.len()));
        for id in ids {
            bytes.extend_from_slice(&id.to_le_bytes());
        }
        FacetSet { bytes }
    }

    /// Wrap bytes read back from storage.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() % WIDTH != 0 {
            return Err(FacetdexError::Storage(format!(
                "malformed facet set: {} bytes is not a multiple of {}",
                bytes.len(),
                WIDTH
            )));
        }
        Ok(FacetSet { bytes })
    }

    pub fn ids(&self) -> Vec<TermId> {
        self.bytes
            .chunks_exact(WIDTH)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]) as TermId)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / WIDTH
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn contains(&self, id: TermId) -> bool {
        self.ids().contains(&id)
    }
}

/// Encode `ids` into canonical bytes.
pub fn encode(ids: &[TermId]) -> Result<Vec<u8>> {
    FacetSet::from_ids(ids).map(|set| set.bytes)
}

/// Decode canonical bytes back into ascending term ids.
pub fn decode(bytes: &[u8]) -> Result<Vec<TermId>> {
    FacetSet::from_bytes(bytes.to_vec()).map(|set| set.ids())
}

pub(crate) fn narrow_id(id: TermId) -> Result<u16> {
    u16::try_from(id)
        .ok()
        .filter(|&narrow| narrow != 0)
        .ok_or_else(|| {
            FacetdexError::Config(format!(
                "facet term id {} does not fit the {}-byte facet set encoding (max {})",
                id, WIDTH, MAX_TERM_ID
            ))
        })
}

pub(crate) fn canonicalize(mut ids: Vec<u16>) -> Vec<u16> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
