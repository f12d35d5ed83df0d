use colored::Colorize;
use tabled::Table;

use crate::{
    management::{self, TrackDataset},
    openai::PromptKind,
    types::{GenreTableRow, TimelineTableRow, TrackTableRow},
    utils, warning,
};

const NAME_WIDTH: usize = 40;

pub fn show_tracks(dataset: &TrackDataset) {
    if dataset.is_empty() {
        warning!("No recently played tracks.");
        return;
    }

    let rows: Vec<TrackTableRow> = dataset
        .tracks()
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            name: utils::truncate(&t.name, NAME_WIDTH),
            artists: utils::truncate(&t.artists, NAME_WIDTH),
            album: utils::truncate(&t.album, NAME_WIDTH),
            year: utils::format_year(t.release_year),
            popularity: t.raw_popularity,
            genres: t.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
        })
        .collect();

    println!("{}", Table::new(rows));
}

/// Prints the release-year timeline with a popularity bar per track.
pub fn show_timeline(dataset: &TrackDataset) {
    if dataset.is_empty() {
        warning!("No tracks to place on the timeline.");
        return;
    }

    let mut points = management::timeline_view(dataset);
    // stable: plays of the same year keep their listening order
    points.sort_by_key(|p| p.release_year);

    let rows: Vec<TimelineTableRow> = points
        .into_iter()
        .map(|p| TimelineTableRow {
            year: utils::format_year(p.release_year),
            popularity: p.popularity,
            track: utils::truncate(&p.name, NAME_WIDTH),
        })
        .collect();

    println!("{}", "Your musical timeline".bold());
    match management::year_axis(dataset) {
        Some((from, to)) => println!("Release years {} to {}", from, to),
        None => println!("Release years unknown"),
    }
    println!("{}", Table::new(rows));
}

pub fn show_genres(dataset: &TrackDataset, top: usize) {
    let total: usize = management::genre_frequency(dataset).values().sum();
    if total == 0 {
        warning!("No genres to show.");
        return;
    }

    let rows: Vec<GenreTableRow> = management::top_genres(dataset, top)
        .into_iter()
        .map(|(genre, count)| GenreTableRow {
            share: format!("{:.1}%", count as f64 * 100.0 / total as f64),
            genre,
            count,
        })
        .collect();

    println!("{}", "Your favourite genres".bold());
    println!("{}", Table::new(rows));
}

pub fn show_reflection(kind: PromptKind, text: &str) {
    println!("\n{}\n", kind.to_string().bold().underline());
    println!("{}\n", text.trim().italic());
}
