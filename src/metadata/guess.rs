//! Filename-based tag guessing.
//!
//! Supported patterns (with the default `" - "` separator):
//! - "Artist - Title.mp3"
//! - "01 Artist - Title.mp3", "01. Artist - Title.mp3", "01 - Artist - Title.mp3"
//! - "01. Title.mp3"
//! - "Title.mp3" (fallback)
//!
//! A leading track number also fills [`Tag::Track`].

use std::path::Path;

use super::{Tag, TrackMetadata};

/// Derive artist, title and track number from a file name.
///
/// Returns empty metadata when the stem is blank or not valid UTF-8.
pub fn from_filename(path: &Path, separator: &str) -> TrackMetadata {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return TrackMetadata::new();
    };
    let stem = stem.trim();

    let mut guessed = TrackMetadata::new();
    let rest = match strip_track_number(stem, separator) {
        Some((number, rest)) => {
            guessed.set(Tag::Track, number);
            rest
        }
        None => stem,
    };

    if let Some((artist, title)) = split_artist_title(rest, separator) {
        guessed.set(Tag::Artist, artist);
        guessed.set(Tag::Title, title);
    } else {
        guessed.set(Tag::Title, rest);
    }

    guessed
}

fn split_artist_title<'a>(stem: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let (artist, title) = stem.split_once(separator)?;
    let (artist, title) = (artist.trim(), title.trim());
    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some((artist, title))
}

/// Split "01. rest" / "01 rest" / "01 - rest" into ("01", "rest").
///
/// Digits glued to text ("2Pac") are not a track number.
fn strip_track_number<'a>(stem: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let digits = stem.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let (number, rest) = stem.split_at(digits);

    let rest = if let Some(after_dot) = rest.strip_prefix('.') {
        after_dot
    } else if rest.starts_with(char::is_whitespace) {
        rest
    } else {
        return None;
    };

    let rest = rest.trim_start();
    let rest = rest
        .strip_prefix(separator.trim_start())
        .map(str::trim_start)
        .unwrap_or(rest);

    if rest.is_empty() {
        return None;
    }
    Some((number, rest))
}
