//! JSON-backed users and playlists.
//!
//! Both files live in the data directory and are rewritten in full after
//! every successful mutation. A missing file reads as empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ocrtunes_ui::model::PlaylistRecord;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const USERS_FILE: &str = "users.json";
const PLAYLISTS_FILE: &str = "playlists.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("playlist {0:?} already exists")]
    DuplicateName(String),

    #[error("no playlist named {0:?}")]
    UnknownPlaylist(String),

    #[error("no user named {0:?}")]
    UnknownUser(String),

    #[error("user {0:?} already exists")]
    UserExists(String),

    #[error("failed to access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed JSON in {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}

/// One account. Profile fields are filled in by the tutorial screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favourite_artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favourite_genre: Option<String>,
}

/// Validated profile details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub full_name: String,
    pub dob: String,
    pub favourite_artist: String,
    pub favourite_genre: String,
}

type Playlists = BTreeMap<String, BTreeMap<String, PlaylistRecord>>;

pub struct Store {
    dir: PathBuf,
    users: BTreeMap<String, UserRecord>,
    playlists: Playlists,
}

impl Store {
    /// Loads `users.json` and `playlists.json` from `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let users = read_or_default(&dir.join(USERS_FILE))?;
        let playlists = read_or_default(&dir.join(PLAYLISTS_FILE))?;
        Ok(Self { dir, users, playlists })
    }

    // ── users ─────────────────────────────────────────────────────────────

    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn user_exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn sign_up(&mut self, username: &str, password: &str) -> Result<(), StoreError> {
        if self.user_exists(username) {
            return Err(StoreError::UserExists(username.to_owned()));
        }
        let record = UserRecord {
            username: username.to_owned(),
            password: password.to_owned(),
            full_name: None,
            dob: None,
            favourite_artist: None,
            favourite_genre: None,
        };
        let mut users = self.users.clone();
        users.insert(username.to_owned(), record);
        self.commit_users(users)
    }

    pub fn login(&self, username: &str, password: &str) -> bool {
        self.users.get(username).is_some_and(|u| u.password == password)
    }

    /// Removes the account and any playlists it owned.
    pub fn delete_user(&mut self, username: &str) -> Result<(), StoreError> {
        let mut users = self.users.clone();
        if users.remove(username).is_none() {
            return Err(StoreError::UnknownUser(username.to_owned()));
        }
        self.commit_users(users)?;
        if self.playlists.contains_key(username) {
            let mut playlists = self.playlists.clone();
            playlists.remove(username);
            self.commit_playlists(playlists)?;
        }
        Ok(())
    }

    pub fn set_profile(&mut self, username: &str, profile: Profile) -> Result<(), StoreError> {
        let mut users = self.users.clone();
        let user = users.get_mut(username).ok_or_else(|| StoreError::UnknownUser(username.to_owned()))?;
        user.full_name = Some(profile.full_name);
        user.dob = Some(profile.dob);
        user.favourite_artist = Some(profile.favourite_artist);
        user.favourite_genre = Some(profile.favourite_genre);
        self.commit_users(users)
    }

    // ── playlists ─────────────────────────────────────────────────────────

    /// The user's playlists in name order.
    pub fn playlists(&self, username: &str) -> impl Iterator<Item = (&str, &PlaylistRecord)> {
        self.playlists.get(username).into_iter().flatten().map(|(name, p)| (name.as_str(), p))
    }

    pub fn playlist(&self, username: &str, name: &str) -> Option<&PlaylistRecord> {
        self.playlists.get(username)?.get(name)
    }

    /// Distinct cover image paths across every user's playlists.
    pub fn cover_paths(&self) -> BTreeSet<&str> {
        self.playlists.values().flat_map(BTreeMap::values).map(|p| p.img.as_str()).collect()
    }

    /// `"My Playlist #N"` with N one past the playlist count, bumped until free.
    pub fn next_default_name(&self, username: &str) -> String {
        let owned = self.playlists.get(username);
        let taken = |name: &str| owned.is_some_and(|p| p.contains_key(name));
        let mut n = owned.map_or(0, BTreeMap::len) + 1;
        loop {
            let name = format!("My Playlist #{n}");
            if !taken(&name) {
                return name;
            }
            n += 1;
        }
    }

    pub fn create(&mut self, username: &str, name: &str, record: PlaylistRecord) -> Result<(), StoreError> {
        if self.playlist(username, name).is_some() {
            return Err(StoreError::DuplicateName(name.to_owned()));
        }
        let mut playlists = self.playlists.clone();
        playlists.entry(username.to_owned()).or_default().insert(name.to_owned(), record);
        self.commit_playlists(playlists)
    }

    pub fn rename(&mut self, username: &str, old: &str, new: &str) -> Result<(), StoreError> {
        if self.playlist(username, old).is_none() {
            return Err(StoreError::UnknownPlaylist(old.to_owned()));
        }
        if old == new {
            return Ok(());
        }
        if self.playlist(username, new).is_some() {
            return Err(StoreError::DuplicateName(new.to_owned()));
        }
        let mut playlists = self.playlists.clone();
        if let Some(owned) = playlists.get_mut(username)
            && let Some(record) = owned.remove(old)
        {
            owned.insert(new.to_owned(), record);
        }
        self.commit_playlists(playlists)
    }

    pub fn delete(&mut self, username: &str, name: &str) -> Result<PlaylistRecord, StoreError> {
        let mut playlists = self.playlists.clone();
        let record = playlists
            .get_mut(username)
            .and_then(|p| p.remove(name))
            .ok_or_else(|| StoreError::UnknownPlaylist(name.to_owned()))?;
        self.commit_playlists(playlists)?;
        Ok(record)
    }

    // ── persistence ───────────────────────────────────────────────────────
    //
    // Mutations edit a copy; memory only changes once the file write lands.

    fn commit_users(&mut self, users: BTreeMap<String, UserRecord>) -> Result<(), StoreError> {
        write_json(&self.dir.join(USERS_FILE), &users)?;
        self.users = users;
        Ok(())
    }

    fn commit_playlists(&mut self, playlists: Playlists) -> Result<(), StoreError> {
        write_json(&self.dir.join(PLAYLISTS_FILE), &playlists)?;
        self.playlists = playlists;
        Ok(())
    }
}

fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("{} not found; starting empty", path.display());
            return Ok(T::default());
        }
        Err(source) => return Err(StoreError::Io { path: path.to_owned(), source }),
    };
    serde_json::from_str(&text).map_err(|source| StoreError::Json { path: path.to_owned(), source })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let text =
        serde_json::to_string_pretty(value).map_err(|source| StoreError::Json { path: path.to_owned(), source })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io { path: parent.to_owned(), source })?;
    }
    fs::write(path, text).map_err(|source| StoreError::Io { path: path.to_owned(), source })?;
    log::debug!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocrtunes_ui::model::{Song, SongLength};

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    fn record(n: usize) -> PlaylistRecord {
        let song = Song {
            name: "Breathe".into(),
            artist: "Yeat".into(),
            genre: "Rap".into(),
            length: SongLength::new(2, 51),
        };
        PlaylistRecord { songs: vec![song; n], img: "images/default.png".into() }
    }

    // ── users ─────────────────────────────────────────────────────────────

    #[test]
    fn missing_files_start_empty() {
        let (_dir, s) = store();
        assert!(!s.user_exists("sparky"));
        assert_eq!(s.playlists("sparky").count(), 0);
    }

    #[test]
    fn sign_up_then_login() {
        let (_dir, mut s) = store();
        s.sign_up("sparky", "pw").unwrap();
        assert!(s.login("sparky", "pw"));
        assert!(!s.login("sparky", "nope"));
        assert!(!s.login("ghost", "pw"));
        assert!(matches!(s.sign_up("sparky", "x"), Err(StoreError::UserExists(_))));
    }

    #[test]
    fn users_survive_reopen() {
        let (dir, mut s) = store();
        s.sign_up("sparky", "pw").unwrap();
        s.set_profile(
            "sparky",
            Profile {
                full_name: "Spark Plug".into(),
                dob: "01/02/2003".into(),
                favourite_artist: "Yeat".into(),
                favourite_genre: "Rap".into(),
            },
        )
        .unwrap();
        let reopened = Store::open(dir.path()).unwrap();
        let user = reopened.user("sparky").unwrap();
        assert_eq!(user.dob.as_deref(), Some("01/02/2003"));
        assert_eq!(user.favourite_genre.as_deref(), Some("Rap"));
    }

    #[test]
    fn delete_user_drops_playlists() {
        let (_dir, mut s) = store();
        s.sign_up("sparky", "pw").unwrap();
        s.create("sparky", "Gym", record(1)).unwrap();
        s.delete_user("sparky").unwrap();
        assert!(!s.user_exists("sparky"));
        assert_eq!(s.playlists("sparky").count(), 0);
        assert!(matches!(s.delete_user("sparky"), Err(StoreError::UnknownUser(_))));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(USERS_FILE), "{ not json").unwrap();
        assert!(matches!(Store::open(dir.path()), Err(StoreError::Json { .. })));
    }

    // ── playlists ─────────────────────────────────────────────────────────

    #[test]
    fn default_names_skip_taken_ones() {
        let (_dir, mut s) = store();
        assert_eq!(s.next_default_name("sparky"), "My Playlist #1");
        s.create("sparky", "My Playlist #2", record(1)).unwrap();
        // one playlist, so N starts at 2, which is taken
        assert_eq!(s.next_default_name("sparky"), "My Playlist #3");
    }

    #[test]
    fn create_collision_leaves_store_unchanged() {
        let (_dir, mut s) = store();
        s.create("sparky", "Gym", record(1)).unwrap();
        let err = s.create("sparky", "Gym", record(3)).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(n) if n == "Gym"));
        assert_eq!(s.playlist("sparky", "Gym").unwrap().songs.len(), 1);
    }

    #[test]
    fn rename_moves_the_record() {
        let (dir, mut s) = store();
        s.create("sparky", "Gym", record(2)).unwrap();
        s.rename("sparky", "Gym", "Run").unwrap();
        assert!(s.playlist("sparky", "Gym").is_none());
        let reopened = Store::open(dir.path()).unwrap();
        assert_eq!(reopened.playlist("sparky", "Run").unwrap().songs.len(), 2);
    }

    #[test]
    fn rename_collision_and_unknown() {
        let (_dir, mut s) = store();
        s.create("sparky", "Gym", record(1)).unwrap();
        s.create("sparky", "Run", record(2)).unwrap();
        assert!(matches!(s.rename("sparky", "Gym", "Run"), Err(StoreError::DuplicateName(_))));
        assert_eq!(s.playlist("sparky", "Gym").unwrap().songs.len(), 1);
        assert!(matches!(s.rename("sparky", "Nope", "X"), Err(StoreError::UnknownPlaylist(_))));
        s.rename("sparky", "Gym", "Gym").unwrap();
    }

    #[test]
    fn delete_returns_the_record() {
        let (_dir, mut s) = store();
        s.create("sparky", "Gym", record(2)).unwrap();
        assert_eq!(s.delete("sparky", "Gym").unwrap().songs.len(), 2);
        assert!(matches!(s.delete("sparky", "Gym"), Err(StoreError::UnknownPlaylist(_))));
    }

    #[test]
    fn playlists_iterate_in_name_order() {
        let (_dir, mut s) = store();
        s.create("sparky", "b", record(1)).unwrap();
        s.create("sparky", "a", record(1)).unwrap();
        let names: Vec<_> = s.playlists("sparky").map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }

    // ── write failures ────────────────────────────────────────────────────

    /// Turns `file` into a directory so the next save fails.
    fn block(dir: &tempfile::TempDir, file: &str) {
        let path = dir.path().join(file);
        let _ = fs::remove_file(&path);
        fs::create_dir(&path).unwrap();
    }

    #[test]
    fn failed_rename_keeps_the_old_name() {
        let (dir, mut s) = store();
        s.create("u", "A", record(2)).unwrap();
        block(&dir, PLAYLISTS_FILE);
        assert!(matches!(s.rename("u", "A", "B"), Err(StoreError::Io { .. })));
        assert_eq!(s.playlist("u", "A").unwrap().songs.len(), 2);
        assert!(s.playlist("u", "B").is_none());
    }

    #[test]
    fn failed_playlist_writes_leave_memory_untouched() {
        let (dir, mut s) = store();
        s.create("u", "A", record(1)).unwrap();
        block(&dir, PLAYLISTS_FILE);
        assert!(matches!(s.create("u", "B", record(1)), Err(StoreError::Io { .. })));
        assert!(s.playlist("u", "B").is_none());
        assert!(matches!(s.delete("u", "A"), Err(StoreError::Io { .. })));
        assert!(s.playlist("u", "A").is_some());
    }

    #[test]
    fn failed_user_writes_leave_memory_untouched() {
        let (dir, mut s) = store();
        s.sign_up("u", "pw").unwrap();
        block(&dir, USERS_FILE);
        assert!(matches!(s.sign_up("v", "pw"), Err(StoreError::Io { .. })));
        assert!(!s.user_exists("v"));
        let profile = Profile {
            full_name: "U".into(),
            dob: "01/01/2000".into(),
            favourite_artist: "Yeat".into(),
            favourite_genre: "Rap".into(),
        };
        assert!(matches!(s.set_profile("u", profile), Err(StoreError::Io { .. })));
        assert_eq!(s.user("u").unwrap().full_name, None);
        assert!(matches!(s.delete_user("u"), Err(StoreError::Io { .. })));
        assert!(s.login("u", "pw"));
    }

    #[test]
    fn cover_paths_are_distinct() {
        let (_dir, mut s) = store();
        s.create("sparky", "a", record(1)).unwrap();
        s.create("ada", "b", record(1)).unwrap();
        let mut custom = record(1);
        custom.img = "covers/gym.png".into();
        s.create("ada", "c", custom).unwrap();
        assert_eq!(s.cover_paths().into_iter().collect::<Vec<_>>(), ["covers/gym.png", "images/default.png"]);
    }
}
