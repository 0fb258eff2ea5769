//! Test utilities and fixtures for tagsort tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{mock_track_metadata, source_at};
//!
//! let file = source_at("/in/song.mp3", mock_track_metadata());
//! ```

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, TagExt};
use std::path::{Path, PathBuf};

use crate::metadata::{Tag, TrackMetadata};
use crate::organizer::{PlannedDestination, PlannedFile, SourceFile};

/// Creates a mock TrackMetadata with sensible defaults.
///
/// Customize with [`TrackMetadata::with`]:
///
/// ```ignore
/// let meta = mock_track_metadata().with(Tag::Title, "Custom Title");
/// ```
pub fn mock_track_metadata() -> TrackMetadata {
    TrackMetadata::new()
        .with(Tag::Title, "Test Track")
        .with(Tag::Artist, "Test Artist")
        .with(Tag::Album, "Test Album")
        .with(Tag::Track, "1")
}

/// A source file at `path` (which need not exist).
pub fn source_at(path: &str, metadata: TrackMetadata) -> SourceFile {
    SourceFile {
        path: PathBuf::from(path),
        metadata,
    }
}

/// A planned file with an explicit destination, bypassing the path planner.
pub fn planned(source: &str, artist: &str, album: Option<&str>, file_name: &str) -> PlannedFile {
    PlannedFile {
        source: source_at(source, TrackMetadata::new()),
        destination: PlannedDestination {
            artist: artist.to_string(),
            album: album.map(str::to_string),
            file_name: file_name.to_string(),
        },
    }
}

/// Writes `contents` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Writes a short silent PCM WAV file and tags it with `tags`.
pub fn write_tagged_wav(path: &Path, tags: &[(Tag, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, silent_wav(800)).expect("Failed to write test wav");

    if tags.is_empty() {
        return;
    }

    let mut tagged_file = Probe::open(path)
        .expect("Failed to open test wav")
        .read()
        .expect("Failed to read test wav");
    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag_mut(tag_type).is_none() {
        tagged_file.insert_tag(lofty::tag::Tag::new(tag_type));
    }
    let tag = tagged_file.tag_mut(tag_type).expect("Just inserted tag");

    for (field, value) in tags {
        let value = value.to_string();
        match field {
            Tag::Title => tag.set_title(value),
            Tag::Artist => tag.set_artist(value),
            Tag::Album => tag.set_album(value),
            Tag::Genre => tag.set_genre(value),
            Tag::Year => tag.set_year(value.parse().expect("numeric year")),
            Tag::Track => tag.set_track(value.parse().expect("numeric track")),
        }
    }

    tag.save_to_path(path, WriteOptions::default())
        .expect("Failed to write test tags");
}

/// 16-bit mono 8 kHz PCM, all zero samples.
fn silent_wav(samples: u32) -> Vec<u8> {
    let data_len = samples * 2;
    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // channels
    bytes.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
    bytes.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mock_track_metadata_defaults() {
        let meta = mock_track_metadata();
        assert_eq!(meta.get(Tag::Title), Some("Test Track"));
        assert_eq!(meta.get(Tag::Artist), Some("Test Artist"));
        assert_eq!(meta.get(Tag::Album), Some("Test Album"));
        assert_eq!(meta.get(Tag::Track), Some("1"));
    }

    #[test]
    fn test_silent_wav_header() {
        let wav = silent_wav(10);
        assert_eq!(wav.len(), 64);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(wav[4..8].try_into().unwrap()), 56);
    }

    #[test]
    fn test_tagged_wav_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.wav");
        write_tagged_wav(&path, &[(Tag::Artist, "Air"), (Tag::Title, "Venus")]);

        let meta = crate::metadata::read(&path, false, " - ").unwrap();
        assert_eq!(meta.get(Tag::Artist), Some("Air"));
        assert_eq!(meta.get(Tag::Title), Some("Venus"));
    }
}
