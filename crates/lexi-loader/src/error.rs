#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("gzip decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("download failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<DownloadError>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("loader is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Store(#[from] lexi_store::StoreError),
}
