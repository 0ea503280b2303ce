use time::OffsetDateTime;

use crate::domain::DeckRecord;
use crate::index::deck_table::DeckTable;
use crate::policy::MixMode;

/// Pick the on-air record.
///
/// Decks are visited in ascending index and only a strictly better start
/// time replaces the candidate, so the lowest deck wins a tie. Records
/// without a start time never qualify.
pub fn now_playing(table: &DeckTable, mode: MixMode, now: OffsetDateTime) -> Option<&DeckRecord> {
    let better = |t: OffsetDateTime, best: OffsetDateTime| match mode {
        MixMode::Newest => t > best,
        MixMode::Oldest => t < best,
    };
    let mut best = match mode {
        MixMode::Newest => OffsetDateTime::UNIX_EPOCH,
        MixMode::Oldest => now,
    };
    let mut pick = None;
    for rec in table.iter() {
        let Some(start) = rec.start_time else {
            continue;
        };
        if better(start, best) {
            best = start;
            pick = Some(rec);
        }
    }
    pick
}
