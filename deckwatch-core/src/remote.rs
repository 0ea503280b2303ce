//! Live-playlist page scraping, the alternative to reading session files.

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, warn};

use crate::domain::PlayingTrack;
use crate::error::{DeckError, Result};

/// CSS class of the element holding `Artist - Title` on the live page.
pub const TRACKNAME_CLASS: &str = "playlist-trackname";

const USER_AGENT: &str = concat!("deckwatch/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

/// Leftovers of list stringification that the page sometimes carries.
const ARTIFACTS: &[&str] = &["['", "']", "[]", "[\"", "\"]", "\\n", "\\t"];

pub fn build_client(timeout: Duration) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| DeckError::Http(e.to_string()))
}

pub fn fetch_page(client: &reqwest::blocking::Client, url: &str) -> Result<String> {
    debug!(url, "fetching live playlist");
    let resp = client
        .get(url)
        .send()
        .map_err(|e| DeckError::Http(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(DeckError::Http(format!("{url}: HTTP {}", status.as_u16())));
    }
    resp.text().map_err(|e| DeckError::Http(e.to_string()))
}

/// Fetch and parse; every failure is "no track".
pub fn fetch_playing(client: &reqwest::blocking::Client, url: &str) -> PlayingTrack {
    match fetch_page(client, url) {
        Ok(html) => parse_page(&html),
        Err(e) => {
            warn!(url, error = %e, "live playlist fetch failed");
            PlayingTrack::default()
        }
    }
}

pub fn parse_page(html: &str) -> PlayingTrack {
    match last_trackname(html) {
        Some(raw) => split_track(&clean_track_text(&raw)),
        None => {
            debug!("no {TRACKNAME_CLASS} element on page");
            PlayingTrack::default()
        }
    }
}

fn has_class(e: &BytesStart<'_>, class: &str) -> bool {
    e.attributes().with_checks(false).flatten().any(|a| {
        a.key.into_inner().eq_ignore_ascii_case(b"class")
            && String::from_utf8_lossy(&a.value)
                .split_ascii_whitespace()
                .any(|c| c == class)
    })
}

/// Last non-blank text node sitting directly inside a `TRACKNAME_CLASS`
/// element. The markup is HTML, so end tags are not checked and void
/// elements never open a scope.
pub fn last_trackname(html: &str) -> Option<String> {
    let mut reader = Reader::from_str(html);
    reader.trim_text(true);
    reader.check_end_names(false);

    // one entry per open element: does it carry the class?
    let mut open: Vec<bool> = Vec::new();
    let mut last = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name().into_inner().to_ascii_lowercase();
                if VOID_ELEMENTS.contains(&name.as_slice()) {
                    continue;
                }
                open.push(has_class(&e, TRACKNAME_CLASS));
            }
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Text(t)) if open.last() == Some(&true) => {
                let text = t
                    .unescape()
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                if !text.trim().is_empty() {
                    last = Some(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!(position = reader.buffer_position(), error = %e, "html parse stopped");
                break;
            }
            _ => {}
        }
    }
    last
}

pub fn clean_track_text(raw: &str) -> String {
    let mut s = raw.to_string();
    for a in ARTIFACTS {
        s = s.replace(a, "");
    }
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn present(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty() && s != ".").then(|| s.to_string())
}

/// `Artist - Title` on the first separator; no separator means title only.
pub fn split_track(text: &str) -> PlayingTrack {
    let (artist, title) = match text.split_once(" - ") {
        Some((a, t)) => (present(a), present(t)),
        None => (None, present(text)),
    };
    PlayingTrack { artist, title }
}
