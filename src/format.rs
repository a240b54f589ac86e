use chrono::{Datelike, NaiveDate};

use crate::models::Movie;

/// Full image URL for an optional TMDB path; empty paths count as absent.
pub fn image_url(image_base: &str, path: Option<&str>, size: &str) -> Option<String> {
    let path = path.filter(|p| !p.trim().is_empty())?;
    Some(format!("{image_base}/{size}{path}"))
}

pub fn runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// `1999-10-15` -> `October 15, 1999`. Unparseable input is returned as-is.
pub fn long_date(date: &str) -> String {
    match parse_date(date) {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

pub fn year_from_date(date: Option<&str>) -> Option<String> {
    date.and_then(parse_date).map(|d| d.year().to_string())
}

pub fn rating(vote_average: f64) -> String {
    format!("{:.1}", vote_average)
}

pub fn number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole US dollars, no cents.
pub fn currency(amount: u64) -> String {
    format!("${}", number(amount))
}

/// Cuts after `max_chars` characters and appends `...`.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

pub fn youtube_embed_url(key: &str, origin: Option<&str>) -> String {
    format!(
        "https://www.youtube.com/embed/{}?autoplay=1&origin={}",
        urlencoding::encode(key),
        urlencoding::encode(origin.unwrap_or(""))
    )
}

pub fn filter_adult(movies: Vec<Movie>, show_adult: bool) -> Vec<Movie> {
    if show_adult {
        return movies;
    }
    movies.into_iter().filter(|m| !m.adult).collect()
}
