//! File System Infrastructure
//!
//! - `local`: blocking helpers that map I/O failures onto fatal `TbError`s
//! - `dedup`: the shadow pool and its zero-byte markers
//! - `markers`: `.rev` state markers in staging and publish roots

pub mod dedup;
pub mod local;
pub mod markers;

pub use dedup::Deduplicator;
pub use local::{
    atomic_write, copy_dir_all, copy_file, create_dir_all, entry_names, file_names,
    is_non_empty_dir, recreate_dir, remove_file_if_exists, touch,
};
pub use markers::{clear_markers, marker_file_names, read_markers, replace_marker};
