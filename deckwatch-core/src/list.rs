use std::io::Write;
use std::path::Path;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::container::session::read_session;
use crate::domain::SessionFile;
use crate::error::Result;
use crate::util::retry::{CancelToken, RetryPolicy};

fn stamp(t: Option<OffsetDateTime>) -> String {
    t.and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "-".to_string())
}

pub fn write_session(out: &mut impl Write, sf: &SessionFile) -> std::io::Result<()> {
    writeln!(
        out,
        "# {}  version={}  records={}{}",
        sf.path.display(),
        sf.version.as_deref().unwrap_or("-"),
        sf.records.len(),
        if sf.truncated { "  (truncated)" } else { "" }
    )?;
    for r in &sf.records {
        writeln!(
            out,
            "row={:<4} deck={:<2} start={} updated={} played={} playtime={} {} - {}",
            r.row,
            r.deck,
            stamp(r.start_time),
            stamp(r.updated_at),
            r.played,
            r.playtime.map(|d| d.as_secs().to_string()).unwrap_or_else(|| "-".into()),
            r.artist.as_deref().unwrap_or("?"),
            r.title.as_deref().unwrap_or("?"),
        )?;
    }
    Ok(())
}

/// Decode one session file and print its records to stdout.
pub fn dump_session(path: &Path) -> Result<()> {
    let sf = read_session(path, &RetryPolicy::default(), &CancelToken::new())?;
    let mut out = std::io::stdout().lock();
    write_session(&mut out, &sf)?;
    Ok(())
}
