//! Fetching the company logo for the document header.
//!
//! A logo is decoration: every failure is logged and the export continues
//! without it.

use std::{path::Path, sync::LazyLock, time::Duration};

use anyhow::{Context, anyhow};
use printpdf::image_crate::{self, DynamicImage};
use tracing::{debug, warn};
use url::Url;

static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

/// One connection pool for every logo fetch.
fn client() -> &'static reqwest::Client {
    &CLIENT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPolicy {
    /// Limit for a single attempt, connect to last byte.
    pub timeout: Duration,
    pub attempts: u32,
    pub backoff: Duration,
}

pub async fn fetch_logo(source: &str, policy: &LogoPolicy) -> Option<DynamicImage> {
    match load(source, policy).await {
        Ok(image) => {
            debug!(source, width = image.width(), height = image.height(), "loaded logo");
            Some(image)
        }
        Err(error) => {
            warn!(source, "omitting logo: {error:#}");
            None
        }
    }
}

async fn load(source: &str, policy: &LogoPolicy) -> anyhow::Result<DynamicImage> {
    let bytes = match Url::parse(source) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => fetch_http(url, policy).await?,
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| anyhow!("'{url}' is not a local path"))?;
            read_file(&path).await?
        }
        Ok(url) => return Err(anyhow!("unsupported logo scheme '{}'", url.scheme())),
        Err(_) => read_file(Path::new(source)).await?,
    };

    image_crate::load_from_memory(&bytes).context("logo is not a supported image")
}

async fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

async fn fetch_http(url: Url, policy: &LogoPolicy) -> anyhow::Result<Vec<u8>> {
    let client = client();
    let attempts = policy.attempts.max(1);
    let mut last = anyhow!("no attempt made");

    for attempt in 1..=attempts {
        match tokio::time::timeout(policy.timeout, get(client, url.clone())).await {
            Ok(Ok(bytes)) => return Ok(bytes),
            Ok(Err(error)) => last = error,
            Err(_) => last = anyhow!("timed out after {:?}", policy.timeout),
        }
        debug!(%url, attempt, "logo fetch failed: {last:#}");

        if attempt < attempts {
            tokio::time::sleep(policy.backoff).await;
        }
    }

    Err(last.context(format!("gave up on {url} after {attempts} attempts")))
}

async fn get(client: &reqwest::Client, url: Url) -> anyhow::Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resvg::tiny_skia::Pixmap;
    use std::time::Instant;

    fn policy() -> LogoPolicy {
        LogoPolicy {
            timeout: Duration::from_millis(200),
            attempts: 2,
            backoff: Duration::from_millis(10),
        }
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        Pixmap::new(width, height).unwrap().encode_png().unwrap()
    }

    #[test]
    fn fetches_share_one_client() {
        assert!(std::ptr::eq(client(), client()));
    }

    #[tokio::test]
    async fn reads_plain_paths_and_file_urls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, png(8, 4)).unwrap();

        let image = fetch_logo(path.to_str().unwrap(), &policy()).await.unwrap();
        assert_eq!((image.width(), image.height()), (8, 4));

        let url = Url::from_file_path(&path).unwrap();
        assert!(fetch_logo(url.as_str(), &policy()).await.is_some());
    }

    #[tokio::test]
    async fn failures_fall_back_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let garbage = dir.path().join("logo.png");
        std::fs::write(&garbage, b"definitely not an image").unwrap();

        assert!(fetch_logo(garbage.to_str().unwrap(), &policy()).await.is_none());
        assert!(
            fetch_logo(dir.path().join("missing.png").to_str().unwrap(), &policy())
                .await
                .is_none()
        );
        assert!(fetch_logo("ftp://example.com/logo.png", &policy()).await.is_none());
    }

    #[tokio::test]
    async fn unresponsive_server_is_bounded() {
        // Accepts connections but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let started = Instant::now();
        let logo = fetch_logo(&format!("http://{address}/logo.png"), &policy()).await;
        assert!(logo.is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
