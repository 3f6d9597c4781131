//! Async filesystem primitives re-exported from the underlying runtime.
//!
//! Only the operations the desktop bridge needs are exposed. Anything that
//! touches the cache directory should go through
//! `bridge_traits::storage::FileSystemAccess` rather than this module.

pub use tokio::fs::{
    create_dir_all, metadata, read, read_dir, remove_dir_all, remove_file, rename, try_exists,
    write, DirEntry, File, OpenOptions,
};
