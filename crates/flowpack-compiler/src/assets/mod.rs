//! Asset Indexer.
//!
//! Collects the assets of every project reachable from the root through
//! imports and assigns them integer identities. Assets with a persisted id
//! land at `id - 1`, the rest are appended. Holes are warned about and
//! back-filled so that every writer sees a dense array.
//!
//! References resolve to an [`AssetRef`]. Lists grow on demand while the
//! project is resolved, so they are append-only for the rest of the build.

mod colors;
mod indexer;
mod styles;

#[cfg(test)]
mod colors_tests;
#[cfg(test)]
mod indexer_tests;

use flowpack_core::project::AssetKind;

use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceRef};

pub use colors::{ColorTable, rgb565, rgb888};
pub use indexer::AssetIndex;
pub use styles::ResolvedStyle;

/// Largest id an asset can persist: references are 16-bit signed fields.
pub const MAX_ASSET_ID: u32 = i16::MAX as u32;

/// Resolved reference to an asset.
///
/// The wire format folds this into one signed integer: positive for the
/// local table, negative for the local table of a layered build (resolved
/// against the master at runtime), 0 for nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssetRef {
    /// 1-based position in this build's table.
    Local(u32),
    /// Persisted id in the master project's table.
    Master(u32),
    #[default]
    Unresolved,
}

impl AssetRef {
    /// Signed wire value.
    pub fn encode(self, layered: bool) -> i32 {
        match self {
            Self::Local(n) if layered => -(n as i32),
            Self::Local(n) => n as i32,
            Self::Master(id) => id as i32,
            Self::Unresolved => 0,
        }
    }

    /// Wire value of a 16-bit reference field. A reference that does not
    /// fit is written as unresolved.
    pub fn encode_i16(self, layered: bool) -> i16 {
        i16::try_from(self.encode(layered)).unwrap_or_else(|_| {
            log::warn!("asset reference {self:?} does not fit a 16-bit field");
            0
        })
    }

    pub fn is_resolved(self) -> bool {
        self != Self::Unresolved
    }
}

/// One entry of a resolved asset array.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot<E> {
    pub item: E,
    /// Copy of another entry standing in for a missing persisted id.
    pub filler: bool,
}

/// Dense, append-only asset array.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetList<E> {
    slots: Vec<Slot<E>>,
}

impl<E> Default for AssetList<E> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<E> AssetList<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.slots.get(index).map(|s| &s.item)
    }

    pub fn slots(&self) -> &[Slot<E>] {
        &self.slots
    }

    /// Every entry including fillers, in index order.
    pub fn items(&self) -> impl Iterator<Item = &E> {
        self.slots.iter().map(|s| &s.item)
    }

    /// Entries that are not fillers, with their 0-based index.
    pub fn real(&self) -> impl Iterator<Item = (usize, &E)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.filler)
            .map(|(i, s)| (i, &s.item))
    }

    pub fn position(&self, pred: impl FnMut(&E) -> bool) -> Option<usize> {
        self.items().position(pred)
    }

    /// Append an entry and return its 1-based position.
    pub fn push(&mut self, item: E) -> u32 {
        self.slots.push(Slot {
            item,
            filler: false,
        });
        self.slots.len() as u32
    }

    pub fn append(&mut self, other: AssetList<E>) {
        self.slots.extend(other.slots);
    }

    /// Convert every entry, keeping filler marks.
    pub fn map<F>(self, mut f: impl FnMut(E) -> F) -> AssetList<F> {
        AssetList {
            slots: self
                .slots
                .into_iter()
                .map(|s| Slot {
                    item: f(s.item),
                    filler: s.filler,
                })
                .collect(),
        }
    }
}

impl<E: Clone> AssetList<E> {
    /// Place ided entries at `id - 1` and append the rest.
    ///
    /// Every hole yields a `Missing <kind> with ID = n` warning on the
    /// kind's collection and is filled with a copy of the first entry.
    /// Ids beyond [`MAX_ASSET_ID`] are errors; those entries are appended
    /// last as if they had no id.
    pub fn place(
        kind: AssetKind,
        ided: Vec<(u32, E)>,
        mut unided: Vec<E>,
        diag: &mut Diagnostics,
    ) -> Self {
        let mut placed: Vec<Option<E>> = Vec::new();
        let mut out_of_range = Vec::new();
        for (id, item) in ided {
            if !(1..=MAX_ASSET_ID).contains(&id) {
                diag.report(DiagnosticKind::AssetIdOutOfRange, SourceRef::new(kind.collection()))
                    .message(format!("{} with ID = {id}", kind.label()))
                    .emit();
                out_of_range.push(item);
                continue;
            }
            let index = id as usize - 1;
            if placed.len() <= index {
                placed.resize_with(index + 1, || None);
            }
            placed[index] = Some(item);
        }

        let first = placed.iter().flatten().next().cloned();
        let mut slots = Vec::with_capacity(placed.len() + unided.len());
        for (i, item) in placed.into_iter().enumerate() {
            match item {
                Some(item) => slots.push(Slot {
                    item,
                    filler: false,
                }),
                None => {
                    diag.report(DiagnosticKind::MissingId, SourceRef::new(kind.collection()))
                        .message(format!("{} with ID = {}", kind.label(), i + 1))
                        .emit();
                    if let Some(item) = first.clone() {
                        slots.push(Slot { item, filler: true });
                    }
                }
            }
        }
        unided.append(&mut out_of_range);
        slots.extend(unided.into_iter().map(|item| Slot {
            item,
            filler: false,
        }));
        Self { slots }
    }
}
