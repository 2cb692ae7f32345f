mod error;
mod path;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use path::StoragePath;
pub use traits::{BlobStore, BoxReader, StoredBlob};
