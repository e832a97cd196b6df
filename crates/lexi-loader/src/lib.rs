pub mod decode;
pub mod download;
pub mod error;
pub mod progressive;

pub use download::ChunkDownloader;
pub use error::{DownloadError, LoaderError};
pub use progressive::{LoaderState, ProgressiveLoader};
