//! Audio file metadata reading.
//!
//! Uses the lofty crate for format-independent metadata access, so MP3
//! (ID3v2), FLAC, OGG, Opus, M4A, WAV and friends all go through the same
//! code path. Only the six fields of the [`Tag`] vocabulary are read.

pub mod guess;

use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::Accessor;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

/// The metadata fields the organizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tag {
    Title,
    Artist,
    Album,
    Year,
    Track,
    Genre,
}

impl Tag {
    /// Every tag, in display order.
    pub const ALL: [Tag; 6] = [
        Tag::Title,
        Tag::Artist,
        Tag::Album,
        Tag::Year,
        Tag::Track,
        Tag::Genre,
    ];

    /// Field name used by Vorbis-style tag containers.
    pub fn field_name(self) -> &'static str {
        match self {
            Tag::Title => "title",
            Tag::Artist => "artist",
            Tag::Album => "album",
            Tag::Year => "date",
            Tag::Track => "tracknumber",
            Tag::Genre => "genre",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Title => "Title",
            Tag::Artist => "Artist",
            Tag::Album => "Album",
            Tag::Year => "Year",
            Tag::Track => "Track",
            Tag::Genre => "Genre",
        };
        f.write_str(name)
    }
}

/// Tag values of one file. Blank values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    fields: BTreeMap<Tag, String>,
}

impl TrackMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and guessing.
    pub fn with(mut self, tag: Tag, value: impl Into<String>) -> Self {
        self.set(tag, value);
        self
    }

    pub fn get(&self, tag: Tag) -> Option<&str> {
        self.fields.get(&tag).map(String::as_str)
    }

    pub fn has(&self, tag: Tag) -> bool {
        self.fields.contains_key(&tag)
    }

    /// Store a value; whitespace and NUL padding is trimmed and blank values
    /// clear the tag.
    pub fn set(&mut self, tag: Tag, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim_matches(|c: char| c.is_whitespace() || c == '\0');
        if trimmed.is_empty() {
            self.fields.remove(&tag);
        } else {
            self.fields.insert(tag, trimmed.to_string());
        }
    }

    /// Fill every tag that is absent here from `other`. Present values win.
    pub fn fill_missing(&mut self, other: TrackMetadata) {
        for (tag, value) in other.fields {
            self.fields.entry(tag).or_insert(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tag, &str)> {
        self.fields.iter().map(|(tag, value)| (*tag, value.as_str()))
    }
}

impl fmt::Display for TrackMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(no tags)");
        }
        let mut first = true;
        for (tag, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={:?}", tag.field_name(), value)?;
            first = false;
        }
        Ok(())
    }
}

/// Read the tag vocabulary from an audio file.
///
/// With `guess` enabled, a file that has neither title nor artist gets them
/// from its filename (see [`guess::from_filename`]); tags present in the file
/// are never replaced.
pub fn read(path: &Path, guess: bool, separator: &str) -> Result<TrackMetadata> {
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::unreadable(path, format!("cannot open: {e}")))?
        .read()
        .map_err(|e| Error::unreadable(path, e.to_string()))?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let mut metadata = TrackMetadata::new();
    if let Some(tag) = tag {
        for field in Tag::ALL {
            if let Some(value) = read_field(tag, field) {
                metadata.set(field, value);
            }
        }
    }

    if guess {
        apply_guess(&mut metadata, path, separator);
    }

    Ok(metadata)
}

/// Fill title/artist (and track) from the filename when both title and
/// artist are missing.
pub fn apply_guess(metadata: &mut TrackMetadata, path: &Path, separator: &str) {
    if metadata.has(Tag::Title) || metadata.has(Tag::Artist) {
        return;
    }
    let guessed = guess::from_filename(path, separator);
    if !guessed.is_empty() {
        tracing::debug!(path = %path.display(), guessed = %guessed, "Guessed tags from filename");
    }
    metadata.fill_missing(guessed);
}

fn read_field(tag: &lofty::tag::Tag, field: Tag) -> Option<String> {
    match field {
        Tag::Title => tag.title().map(|s| s.to_string()),
        Tag::Artist => tag.artist().map(|s| s.to_string()),
        Tag::Album => tag.album().map(|s| s.to_string()),
        Tag::Year => tag.year().map(|y| y.to_string()),
        Tag::Track => tag.track().map(|n| n.to_string()),
        Tag::Genre => tag.genre().map(|s| s.to_string()),
    }
}
