use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{DeckRecord, SessionFile};

/// Latest unplayed snapshot per deck, keyed by deck index.
///
/// Always built from scratch for one scan; there is no incremental update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeckTable {
    pub by_deck: BTreeMap<u32, DeckRecord>,
}

impl DeckTable {
    /// `files` must be ordered oldest mtime first, as the scanner returns them.
    pub fn build(files: &[SessionFile], skip: &BTreeSet<u32>) -> Self {
        let mut table = Self::default();
        for file in files.iter().rev() {
            for rec in &file.records {
                table.offer(rec, skip);
            }
        }
        table
    }

    fn offer(&mut self, rec: &DeckRecord, skip: &BTreeSet<u32>) {
        if skip.contains(&rec.deck) || rec.has_aired() {
            return;
        }
        match self.by_deck.get(&rec.deck) {
            Some(cur) if rec.updated_at <= cur.updated_at => {}
            _ => {
                self.by_deck.insert(rec.deck, rec.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_deck.is_empty()
    }

    pub fn get(&self, deck: u32) -> Option<&DeckRecord> {
        self.by_deck.get(&deck)
    }

    /// Ascending deck index.
    pub fn iter(&self) -> impl Iterator<Item = &DeckRecord> + '_ {
        self.by_deck.values()
    }
}
