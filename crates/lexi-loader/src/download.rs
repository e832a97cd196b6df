use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use lexi_types::ChunkManifest;
use tokio::time::timeout;

use crate::error::DownloadError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Fetches dictionary chunks over HTTP with retry, per-attempt timeout,
/// and gzip handling.
pub struct ChunkDownloader {
    client: reqwest::Client,
    timeout: Duration,
    max_retries: u32,
}

impl ChunkDownloader {
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            max_retries: max_retries.max(1),
        }
    }

    pub async fn fetch_manifest(&self, url: &str) -> Result<ChunkManifest, DownloadError> {
        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| DownloadError::Timeout(self.timeout.as_secs()))??;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }
        let manifest = timeout(self.timeout, response.json::<ChunkManifest>())
            .await
            .map_err(|_| DownloadError::Timeout(self.timeout.as_secs()))??;
        Ok(manifest)
    }

    /// Download one chunk and return its decompressed bytes.
    ///
    /// Retries with exponential backoff (1s, 2s, 4s); the terminal
    /// error carries the last underlying failure. A decompression
    /// failure counts as a failed attempt like any network error.
    pub async fn download_chunk(
        &self,
        url: &str,
        declared_size: u64,
    ) -> Result<Vec<u8>, DownloadError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url, declared_size).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_retries {
                        return Err(DownloadError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(e),
                        });
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(
                        "Chunk download attempt {}/{} failed, retrying in {:?}: {}",
                        attempt,
                        self.max_retries,
                        backoff,
                        e
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str, declared_size: u64) -> Result<Vec<u8>, DownloadError> {
        let response = timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| DownloadError::Timeout(self.timeout.as_secs()))??;
        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status()));
        }

        let transport_decoded = response
            .headers()
            .get(reqwest::header::CONTENT_ENCODING)
            .is_some();
        let payload = timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| DownloadError::Timeout(self.timeout.as_secs()))??;

        maybe_decompress(&payload, declared_size, transport_decoded)
    }
}

/// Decide whether a chunk payload still needs gunzipping.
///
/// Transparent proxies sometimes decompress responses in flight, so a
/// payload is passed through untouched when the transport already
/// signalled a content encoding, when it is more than 1.5x the chunk's
/// declared compressed size, or when the gzip magic is absent.
pub fn maybe_decompress(
    payload: &[u8],
    declared_size: u64,
    transport_decoded: bool,
) -> Result<Vec<u8>, DownloadError> {
    let oversized = declared_size > 0 && payload.len() as f64 > declared_size as f64 * 1.5;
    let has_magic = payload.len() >= 2 && payload[..2] == GZIP_MAGIC;

    if transport_decoded || oversized || !has_magic {
        return Ok(payload.to_vec());
    }

    let mut out = Vec::new();
    GzDecoder::new(payload)
        .read_to_end(&mut out)
        .map_err(DownloadError::Decompress)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn gunzips_a_normal_payload() {
        let compressed = gzip(b"the\t...\nhello\t...\n");
        let declared = compressed.len() as u64;

        let out = maybe_decompress(&compressed, declared, false).unwrap();
        assert_eq!(out, b"the\t...\nhello\t...\n");
    }

    #[test]
    fn transport_decoded_payload_passes_through() {
        let compressed = gzip(b"data");
        let out = maybe_decompress(&compressed, compressed.len() as u64, true).unwrap();
        assert_eq!(out, compressed);
    }

    #[test]
    fn oversized_payload_is_treated_as_already_decompressed() {
        // Looks like gzip but is way past 1.5x the declared size:
        // assume an intermediary already inflated it.
        let mut payload = vec![0x1f, 0x8b];
        payload.extend_from_slice(&[0u8; 200]);

        let out = maybe_decompress(&payload, 64, false).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn payload_without_magic_passes_through() {
        let out = maybe_decompress(b"word\tplain\n", 1024, false).unwrap();
        assert_eq!(out, b"word\tplain\n");
    }

    #[test]
    fn truncated_gzip_is_a_decompress_error() {
        let mut compressed = gzip(b"some reasonable amount of text to compress");
        compressed.truncate(compressed.len() / 2);
        let declared = compressed.len() as u64;

        let err = maybe_decompress(&compressed, declared, false).unwrap_err();
        assert!(matches!(err, DownloadError::Decompress(_)));
    }
}
