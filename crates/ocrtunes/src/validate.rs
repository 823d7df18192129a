//! Form checks. Each error's `Display` is the message shown to the user.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::Profile;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid username or password")]
    BadCredentials,
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Invalid Date of Birth (DD/MM/YYYY)")]
    BadDateOfBirth,
    #[error("Please enter a valid full name")]
    BadFullName,
    #[error("Please enter your favourite artist")]
    MissingArtist,
    #[error("Please select your favourite genre")]
    MissingGenre,
    #[error("Playlist name already exists")]
    PlaylistNameTaken,
    #[error("Playlist is empty")]
    EmptyPlaylist,
    #[error("Select either a maximum duration, a maximum number of songs, or an artist")]
    NoCriteria,
    #[error("Artist not in song library")]
    UnknownArtist,
    #[error("Length must be a number")]
    BadLength,
}

/// Field values are `None` while the field still shows its placeholder.
pub struct SignUpForm<'a> {
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub confirm: Option<&'a str>,
}

/// Checks a sign-up form. `taken` reports whether a username is in use.
///
/// Returns the credentials to register.
pub fn sign_up<'a>(form: &SignUpForm<'a>, taken: impl Fn(&str) -> bool) -> Result<(&'a str, &'a str), ValidationError> {
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Err(ValidationError::MissingFields);
    };
    if taken(username) {
        return Err(ValidationError::UsernameTaken);
    }
    if form.confirm != Some(password) {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok((username, password))
}

/// Parses a `DD/MM/YYYY` birth date that is not after `today`.
pub fn date_of_birth(text: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let date = text
        .and_then(|t| NaiveDate::parse_from_str(t.trim(), DATE_FORMAT).ok())
        .ok_or(ValidationError::BadDateOfBirth)?;
    if date > today {
        return Err(ValidationError::BadDateOfBirth);
    }
    Ok(date)
}

/// Two or three alphabetic words, returned single-spaced.
pub fn full_name(text: Option<&str>) -> Result<String, ValidationError> {
    let words: Vec<&str> = text.unwrap_or_default().split_whitespace().collect();
    let alphabetic = words.iter().all(|w| w.chars().all(char::is_alphabetic));
    if !(2..=3).contains(&words.len()) || !alphabetic {
        return Err(ValidationError::BadFullName);
    }
    Ok(words.join(" "))
}

pub struct ProfileForm<'a> {
    pub full_name: Option<&'a str>,
    pub dob: Option<&'a str>,
    pub favourite_artist: Option<&'a str>,
    pub favourite_genre: Option<&'a str>,
}

/// Checks the tutorial form in on-screen order of precedence: date, name,
/// artist, genre.
pub fn profile(form: &ProfileForm<'_>, today: NaiveDate) -> Result<Profile, ValidationError> {
    let dob = date_of_birth(form.dob, today)?;
    let full_name = full_name(form.full_name)?;
    let favourite_artist = form.favourite_artist.map(str::trim).filter(|a| !a.is_empty());
    let favourite_artist = favourite_artist.ok_or(ValidationError::MissingArtist)?;
    let favourite_genre = form.favourite_genre.ok_or(ValidationError::MissingGenre)?;
    Ok(Profile {
        full_name,
        dob: dob.format(DATE_FORMAT).to_string(),
        favourite_artist: favourite_artist.to_owned(),
        favourite_genre: favourite_genre.to_owned(),
    })
}

/// Parses a whole number of minutes.
pub fn minutes(text: &str) -> Result<u32, ValidationError> {
    text.trim().parse().map_err(|_| ValidationError::BadLength)
}
