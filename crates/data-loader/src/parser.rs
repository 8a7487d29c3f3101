//! Parser for catalog CSV files.
//!
//! Expected header (Netflix-style export, any column order):
//! `show_id,type,title,director,cast,country,date_added,release_year,rating,duration,listed_in,description`
//!
//! Only `title` is required. Optional columns that are missing, and cells
//! that are empty or malformed, fall back to an absent value instead of
//! failing the load:
//! - unparseable `release_year` -> no year
//! - `duration` without digits -> 0 minutes
//! - missing `description` -> empty text (a zero similarity row later on)

use crate::error::{DataLoadError, Result};
use crate::types::Film;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::fs::File;
use tracing::{debug, warn};

/// Raw CSV row. Every field is optional so that schema drift degrades
/// instead of aborting.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FilmRecord {
    show_id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    director: Option<String>,
    cast: Option<String>,
    country: Option<String>,
    date_added: Option<String>,
    release_year: Option<String>,
    rating: Option<String>,
    duration: Option<String>,
    #[serde(alias = "genres")]
    listed_in: Option<String>,
    description: Option<String>,
    #[serde(alias = "sinopsis")]
    synopsis: Option<String>,
    #[serde(alias = "poster", alias = "image_url", alias = "poster_url")]
    image: Option<String>,
}

/// Parse a catalog CSV file into films, in file order.
pub fn parse_films(path: &Path) -> Result<Vec<Film>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_films_from_reader(file, &name)
}

/// Parse catalog CSV from any reader. `source` names the input in errors.
pub fn parse_films_from_reader<R: Read>(reader: R, source: &str) -> Result<Vec<Film>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(source, 1, e))?
        .clone();
    if !headers.iter().any(|h| h == "title") {
        return Err(DataLoadError::MissingColumn {
            column: "title".to_string(),
            file: source.to_string(),
        });
    }
    for column in ["description", "listed_in", "release_year", "rating", "duration"] {
        let present = headers.iter().any(|h| h == column)
            || (column == "listed_in" && headers.iter().any(|h| h == "genres"));
        if !present {
            warn!("{} has no '{}' column, field will be empty", source, column);
        }
    }

    let mut films = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            csv_error(source, line, e)
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: FilmRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(source, line, e))?;

        let title = non_empty(raw.title).ok_or_else(|| DataLoadError::EmptyTitle {
            file: source.to_string(),
            line,
        })?;

        let year = match non_empty(raw.release_year) {
            Some(text) => {
                let parsed = parse_release_year(&text);
                if parsed.is_none() {
                    warn!(
                        "{}:{} unparseable release_year '{}' for '{}'",
                        source, line, text, title
                    );
                }
                parsed
            }
            None => None,
        };

        let duration_text = non_empty(raw.duration);
        let duration_minutes = duration_minutes(duration_text.as_deref());
        if duration_minutes == 0 {
            debug!("{}:{} no duration number for '{}'", source, line, title);
        }

        films.push(Film {
            id: films.len(),
            show_id: non_empty(raw.show_id),
            kind: non_empty(raw.kind),
            title,
            director: non_empty(raw.director),
            cast: non_empty(raw.cast),
            country: non_empty(raw.country),
            date_added: non_empty(raw.date_added),
            year,
            rating: non_empty(raw.rating),
            duration_text,
            duration_minutes,
            genres: raw.listed_in.as_deref().map(parse_genres).unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            synopsis: non_empty(raw.synopsis),
            image: non_empty(raw.image),
        });
    }
    Ok(films)
}

fn csv_error(source: &str, line: u64, err: csv::Error) -> DataLoadError {
    DataLoadError::ParseError {
        file: source.to_string(),
        line,
        reason: err.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extract the first run of ASCII digits as an integer
///
/// Example: "90 min" -> Some(90)
///          "2 Seasons" -> Some(2)
///          "unknown" -> None
///
/// A run too long for `u32` saturates to `u32::MAX`.
pub fn extract_first_integer(text: &str) -> Option<u32> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Integer '{}' in '{}' overflows, using {}", digits, text, u32::MAX);
            Some(u32::MAX)
        }
    }
}

/// Duration in minutes derived from the raw duration text, 0 when absent
pub fn duration_minutes(text: Option<&str>) -> u32 {
    text.and_then(extract_first_integer).unwrap_or(0)
}

/// Parse a release year, accepting float renderings such as "2019.0"
pub fn parse_release_year(text: &str) -> Option<u16> {
    let text = text.trim();
    if let Ok(year) = text.parse::<u16>() {
        return Some(year);
    }
    let value = text.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && (0.0..=u16::MAX as f64).contains(&value) {
        Some(value as u16)
    } else {
        None
    }
}

/// Parse comma-separated genres
///
/// Example: "Dramas, International Movies" -> ["Dramas", "International Movies"]
pub fn parse_genres(s: &str) -> Vec<String> {
    normalize_genres(s.split(','))
}

/// Trim genre tags, dropping blanks and repeats (first occurrence kept)
pub fn normalize_genres<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut genres: Vec<String> = Vec::new();
    for tag in tags {
        let genre = tag.as_ref().trim();
        if !genre.is_empty() && !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_string());
        }
    }
    genres
}
