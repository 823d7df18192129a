//! The fixed song catalogue and the queries screens run over it.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use ocrtunes_ui::model::Song;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::validate::ValidationError;

pub const GENRES: [&str; 4] = ["Rock", "Pop", "RNB", "Rap"];

/// Generated playlist duration bounds, in minutes.
pub const MIN_MINUTES: u32 = 5;
pub const MAX_MINUTES: u32 = 20;

/// Reads `song_list.json`, sorted by song name.
pub fn load(path: &Path) -> Result<Vec<Song>> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read catalogue {}", path.display()))?;
    let mut songs: Vec<Song> =
        serde_json::from_str(&text).with_context(|| format!("malformed catalogue {}", path.display()))?;
    songs.sort_by(|a, b| a.name.cmp(&b.name));
    log::info!("loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Songs in any of `genres` (all when empty) by `artist` (any when `None`),
/// minus those in `exclude`.
pub fn filter(songs: &[Song], genres: &[&str], artist: Option<&str>, exclude: &[Song]) -> Vec<Song> {
    songs
        .iter()
        .filter(|s| genres.is_empty() || genres.contains(&s.genre.as_str()))
        .filter(|s| artist.is_none_or(|a| s.artist == a))
        .filter(|s| !exclude.contains(s))
        .cloned()
        .collect()
}

/// Random playlist constraints. At least one of `artist`, `max_minutes`,
/// `max_songs` must be set; `genre` only narrows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub max_minutes: Option<u32>,
    pub max_songs: Option<usize>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.artist.is_none() && self.max_minutes.is_none() && self.max_songs.is_none()
    }
}

/// Builds a random playlist: shuffles the catalogue and takes matching songs
/// while the song count and total duration stay within bounds.
///
/// `max_minutes` is clamped to [`MIN_MINUTES`]`..=`[`MAX_MINUTES`]. Artist
/// matching ignores case.
pub fn generate<R: Rng + ?Sized>(songs: &[Song], criteria: &Criteria, rng: &mut R) -> Result<Vec<Song>, ValidationError> {
    if criteria.is_empty() {
        return Err(ValidationError::NoCriteria);
    }
    let limit = criteria.max_minutes.map(|m| m.clamp(MIN_MINUTES, MAX_MINUTES) as f32);
    let artist = criteria.artist.as_deref().map(str::to_lowercase);

    let mut pool: Vec<&Song> = songs.iter().collect();
    pool.shuffle(rng);

    let mut playlist = Vec::new();
    let mut total = 0.0;
    for song in pool {
        if criteria.max_songs.is_some_and(|n| playlist.len() >= n) {
            break;
        }
        if artist.as_ref().is_some_and(|a| song.artist.to_lowercase() != *a) {
            continue;
        }
        if criteria.genre.as_ref().is_some_and(|g| song.genre != *g) {
            continue;
        }
        let minutes = song.length.as_minutes();
        if limit.is_some_and(|l| total + minutes > l) {
            continue;
        }
        total += minutes;
        playlist.push(song.clone());
    }

    match (playlist.is_empty(), artist.is_some()) {
        (true, true) => Err(ValidationError::UnknownArtist),
        (true, false) => Err(ValidationError::EmptyPlaylist),
        (false, _) => Ok(playlist),
    }
}
