use crate::config::{Source, SourceConfig};
use crate::error::Result;
use crate::repo::TrackSource;
use crate::repo_fs::SessionDirSource;
use crate::repo_remote::RemoteSource;
use crate::scan::ScanOptions;
use crate::util::retry::CancelToken;

/// Open the backend `cfg` names. Fails only when the configuration does
/// not name exactly one source.
pub fn open_source(cfg: &SourceConfig, cancel: CancelToken) -> Result<Box<dyn TrackSource>> {
    match cfg.source()? {
        Source::Library(lib) => {
            let opts = ScanOptions {
                retry: cfg.retry.clone(),
                ..Default::default()
            };
            Ok(Box::new(
                SessionDirSource::new(&lib, cfg.mixmode, cfg.skip_decks.clone())
                    .with_scan_options(opts)
                    .with_cancel(cancel),
            ))
        }
        Source::Remote(url) => Ok(Box::new(RemoteSource::new(url, cfg.timeout())?)),
    }
}
