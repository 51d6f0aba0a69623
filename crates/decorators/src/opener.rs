use std::io;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum OpenError {
    #[error("refusing to open `{url}`: only http and https links are opened")]
    UnsupportedScheme { url: String },
    #[error("failed to launch handler for `{url}`: {source}")]
    Launch {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Hands a URL to whatever the environment uses to open links.
pub trait UrlOpener {
    fn open(&self, url: &Url) -> Result<(), OpenError>;
}

/// Closures work as openers, which keeps hosts and tests free of wrapper types.
impl<F> UrlOpener for F
where
    F: Fn(&Url) -> Result<(), OpenError>,
{
    fn open(&self, url: &Url) -> Result<(), OpenError> {
        self(url)
    }
}

/// Opens links with the platform default handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &Url) -> Result<(), OpenError> {
        ensure_web_scheme(url)?;
        open::that(url.as_str()).map_err(|source| OpenError::Launch {
            url: url.to_string(),
            source,
        })
    }
}

/// Rejects `file:`, `javascript:` and other schemes a hotspot must never launch.
pub fn ensure_web_scheme(url: &Url) -> Result<(), OpenError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(OpenError::UnsupportedScheme {
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_web_schemes_pass() {
        let web = Url::parse("https://example.com/a").unwrap();
        assert!(ensure_web_scheme(&web).is_ok());

        let local = Url::parse("file:///etc/passwd").unwrap();
        assert!(matches!(
            ensure_web_scheme(&local),
            Err(OpenError::UnsupportedScheme { .. })
        ));
    }
}
