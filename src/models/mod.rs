//! Whisper model catalog, paths, and downloads.

pub mod catalog;
pub mod download;
