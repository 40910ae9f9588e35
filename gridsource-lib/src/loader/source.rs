//! Where a dataset or column definitions come from.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

use super::OLYMPIC_WINNERS_URL;
use crate::error::LoadError;

/// A remote URL or a local file holding JSON.
///
/// Parsing treats `http://` and `https://` strings as URLs and anything
/// else as a file path.
///
/// # Example
///
/// ```
/// use gridsource_lib::loader::Source;
///
/// let remote: Source = "https://example.com/rows.json".parse().unwrap();
/// let local: Source = "data/rows.json".parse().unwrap();
///
/// assert!(matches!(remote, Source::Url(_)));
/// assert!(matches!(local, Source::File(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Fetched with an HTTP GET.
    Url(Url),
    /// Read from the local filesystem.
    File(PathBuf),
}

impl Source {
    /// The sample Olympic winners dataset.
    pub fn olympic_winners() -> Result<Self, LoadError> {
        OLYMPIC_WINNERS_URL.parse()
    }
}

impl FromStr for Source {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s)
                .map(Source::Url)
                .map_err(|e| LoadError::InvalidUrl(format!("{}: {}", s, e)))
        } else {
            Ok(Source::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}
