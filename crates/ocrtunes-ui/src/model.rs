//! Plain data shapes the widgets display: songs, playlists and row contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Track duration as stored in the catalogue (`"M:SS"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SongLength {
    pub minutes: u32,
    pub seconds: u32,
}

impl SongLength {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    /// Duration in fractional minutes.
    pub fn as_minutes(self) -> f32 {
        self.minutes as f32 + self.seconds as f32 / 60.0
    }
}

impl FromStr for SongLength {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BuildError::BadSongLength(s.to_owned());
        let (m, sec) = s.split_once(':').ok_or_else(bad)?;
        let minutes = m.trim().parse().map_err(|_| bad())?;
        let seconds: u32 = sec.trim().parse().map_err(|_| bad())?;
        if seconds >= 60 {
            return Err(bad());
        }
        Ok(Self { minutes, seconds })
    }
}

impl TryFrom<String> for SongLength {
    type Error = BuildError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SongLength> for String {
    fn from(l: SongLength) -> Self {
        l.to_string()
    }
}

impl fmt::Display for SongLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub artist: String,
    pub genre: String,
    pub length: SongLength,
}

/// A saved playlist: its songs and the image shown on its card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub songs: Vec<Song>,
    pub img: String,
}

impl PlaylistRecord {
    /// Total duration rounded to whole minutes.
    ///
    /// Minutes and seconds are summed separately before rounding. Exact
    /// halves round to even, so 2:30 shows as 2 and 3:30 as 4.
    pub fn total_minutes(&self) -> u32 {
        let minutes: u32 = self.songs.iter().map(|s| s.length.minutes).sum();
        let seconds: u32 = self.songs.iter().map(|s| s.length.seconds).sum();
        (f64::from(minutes) + f64::from(seconds) / 60.0).round_ties_even() as u32
    }
}

// ── row contents ──────────────────────────────────────────────────────────

/// Something a [`crate::widgets::ScrollableList`] can show as one row.
///
/// Cells are laid out left to right in equal-width columns.
pub trait ListEntry: Clone + 'static {
    fn cells(&self) -> Vec<String>;
}

impl ListEntry for String {
    fn cells(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl ListEntry for Song {
    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.artist.clone(), self.genre.clone(), self.length.to_string()]
    }
}

/// Something a [`crate::widgets::SearchOverlay`] can match against.
pub trait Searchable: Clone + 'static {
    /// Every field a query may match, first field is the result label.
    fn fields(&self) -> Vec<String>;

    /// Case-insensitive substring match on any field.
    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.fields().iter().any(|f| f.to_lowercase().contains(&query))
    }
}

impl Searchable for Song {
    fn fields(&self) -> Vec<String> {
        self.cells()
    }
}

impl Searchable for String {
    fn fields(&self) -> Vec<String> {
        vec![self.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(name: &str, artist: &str, length: &str) -> Song {
        Song {
            name: name.into(),
            artist: artist.into(),
            genre: "Rock".into(),
            length: length.parse().unwrap(),
        }
    }

    // ── SongLength ────────────────────────────────────────────────────────

    #[test]
    fn parses_minutes_and_seconds() {
        let l: SongLength = "3:07".parse().unwrap();
        assert_eq!(l, SongLength::new(3, 7));
        assert_eq!(l.to_string(), "3:07");
    }

    #[test]
    fn rejects_malformed_lengths() {
        for bad in ["", "3", "3:", "a:10", "3:75", "-1:00"] {
            assert!(bad.parse::<SongLength>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn song_serializes_length_as_string() {
        let s = song("Creep", "Radiohead", "3:56");
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains(r#""length":"3:56""#));
        let back: Song = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn malformed_length_fails_deserialization() {
        let res: Result<Song, _> = serde_json::from_str(
            r#"{"name":"x","artist":"y","genre":"Pop","length":"three"}"#,
        );
        assert!(res.is_err());
    }

    // ── PlaylistRecord ────────────────────────────────────────────────────

    #[test]
    fn total_minutes_rounds_after_summing() {
        let rec = PlaylistRecord {
            songs: vec![song("a", "x", "1:40"), song("b", "x", "2:35")],
            img: String::new(),
        };
        // 3 minutes + 75 seconds = 4.25
        assert_eq!(rec.total_minutes(), 4);
        assert_eq!(PlaylistRecord::default().total_minutes(), 0);
    }

    #[test]
    fn total_minutes_halves_round_to_even() {
        let two_thirty = PlaylistRecord { songs: vec![song("a", "x", "2:30")], img: String::new() };
        assert_eq!(two_thirty.total_minutes(), 2);
        let three_thirty = PlaylistRecord { songs: vec![song("a", "x", "3:30")], img: String::new() };
        assert_eq!(three_thirty.total_minutes(), 4);
        let split = PlaylistRecord {
            songs: vec![song("a", "x", "0:45"), song("b", "x", "0:45")],
            img: String::new(),
        };
        // 90 seconds = 1.5
        assert_eq!(split.total_minutes(), 2);
    }

    // ── search ────────────────────────────────────────────────────────────

    #[test]
    fn search_matches_any_field_case_insensitively() {
        let s = song("Yellow", "Coldplay", "4:29");
        assert!(s.matches("cold"));
        assert!(s.matches("YELL"));
        assert!(s.matches("4:2"));
        assert!(!s.matches("radiohead"));
    }
}
