//! TMDB movie genre labels, used for browse titles and genre chips.

const GENRES: &[(u32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

pub fn all() -> &'static [(u32, &'static str)] {
    GENRES
}

pub fn name(id: u32) -> Option<&'static str> {
    GENRES.iter().find(|(g, _)| *g == id).map(|(_, n)| *n)
}

/// Label for a raw genre selector; unknown or non-numeric ids get a generic label.
pub fn label(raw: &str) -> String {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Genre {}", raw.trim()))
}
