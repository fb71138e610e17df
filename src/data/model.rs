use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Column – the headers the pipeline knows about
// ---------------------------------------------------------------------------

/// A column of the source table, identified by its exact header string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    TrackName,
    ArtistNames,
    ReleasedYear,
    ReleasedMonth,
    Streams,
    Danceability,
    Energy,
    Bpm,
    SpotifyPlaylists,
    ApplePlaylists,
    DeezerPlaylists,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::TrackName,
        Column::ArtistNames,
        Column::ReleasedYear,
        Column::ReleasedMonth,
        Column::Streams,
        Column::Danceability,
        Column::Energy,
        Column::Bpm,
        Column::SpotifyPlaylists,
        Column::ApplePlaylists,
        Column::DeezerPlaylists,
    ];

    /// Header string as it appears in the dataset.
    pub fn header(self) -> &'static str {
        match self {
            Column::TrackName => "track_name",
            Column::ArtistNames => "artist(s)_name",
            Column::ReleasedYear => "released_year",
            Column::ReleasedMonth => "released_month",
            Column::Streams => "streams",
            Column::Danceability => "danceability_%",
            Column::Energy => "energy_%",
            Column::Bpm => "bpm",
            Column::SpotifyPlaylists => "in_spotify_playlists",
            Column::ApplePlaylists => "in_apple_playlists",
            Column::DeezerPlaylists => "in_deezer_playlists",
        }
    }

    /// Only `track_name` may be absent; it is shown in the preview but
    /// feeds none of the derived views.
    pub fn is_required(self) -> bool {
        !matches!(self, Column::TrackName)
    }

    pub fn required() -> impl Iterator<Item = Column> {
        Column::ALL.into_iter().filter(|c| c.is_required())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// Cell access – one row of any supported file format
// ---------------------------------------------------------------------------

/// Read access to the cells of one source row.
///
/// Each loader adapts its native row type (CSV record, JSON object, Arrow
/// batch row) so that all formats share the same coercion rules.
pub trait CellSource {
    /// Text of the cell, or an empty string when the cell is null/absent.
    fn cell(&self, column: Column) -> Cow<'_, str>;
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Strip `,` thousands separators (`"2,445"` → `"2445"`).
///
/// Returns `None` when commas are present but not in well-formed groups of
/// three digits, so `"1,2"` stays malformed.
fn strip_grouping(s: &str) -> Option<Cow<'_, str>> {
    if !s.contains(',') {
        return Some(Cow::Borrowed(s));
    }
    let mut groups = s.split(',');
    let head = groups.next()?;
    let head_digits = head.trim_start_matches(['-', '+']);
    if head_digits.is_empty()
        || head_digits.len() > 3
        || !head_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let mut out = String::with_capacity(s.len());
    out.push_str(head);
    for group in groups {
        // The last group may carry a fractional part: "1,234.5".
        let int_part = group.split('.').next().unwrap_or("");
        if int_part.len() != 3 || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        out.push_str(group);
    }
    Some(Cow::Owned(out))
}

/// Coerce a cell to an integer. Integral floats (`"120.0"`) are accepted.
pub fn coerce_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let s = strip_grouping(s)?;
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Coerce a cell to a finite float.
pub fn coerce_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let s = strip_grouping(s)?;
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// CoercionReport – tally of malformed cells
// ---------------------------------------------------------------------------

/// Per-column count of cells that failed numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoercionReport {
    pub by_column: BTreeMap<Column, usize>,
}

impl CoercionReport {
    pub fn record(&mut self, column: Column) {
        *self.by_column.entry(column).or_default() += 1;
    }

    pub fn total(&self) -> usize {
        self.by_column.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_column.is_empty()
    }
}

impl fmt::Display for CoercionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (col, n) in &self.by_column {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{col}: {n}")?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Track – one row of the dataset
// ---------------------------------------------------------------------------

/// A single song (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub track_name: String,
    /// Raw `artist(s)_name` cell, e.g. `"Bad Bunny, Chencho Corleone"`.
    pub artist_field: String,
    /// Individual credits split out of `artist_field`.
    pub artist_names: Vec<String>,
    pub released_year: Option<i32>,
    pub released_month: Option<u32>,
    pub streams: i64,
    pub danceability_pct: Option<f64>,
    pub energy_pct: Option<f64>,
    pub bpm: Option<u32>,
    pub in_spotify_playlists: i64,
    pub in_apple_playlists: i64,
    pub in_deezer_playlists: i64,
}

impl Track {
    /// Build a track from a source row, coercing numeric cells.
    ///
    /// Malformed cells become `None` (or `0` for summed counts) and are
    /// recorded in `report`.
    pub fn from_cells(row: &impl CellSource, report: &mut CoercionReport) -> Self {
        let released_year = int_cell::<i32>(row, Column::ReleasedYear, report);
        let released_month = int_cell::<u32>(row, Column::ReleasedMonth, report);
        let streams = int_cell::<i64>(row, Column::Streams, report).unwrap_or(0);
        let bpm = int_cell::<u32>(row, Column::Bpm, report);
        let in_spotify_playlists = int_cell::<i64>(row, Column::SpotifyPlaylists, report).unwrap_or(0);
        let in_apple_playlists = int_cell::<i64>(row, Column::ApplePlaylists, report).unwrap_or(0);
        let in_deezer_playlists = int_cell::<i64>(row, Column::DeezerPlaylists, report).unwrap_or(0);

        let mut float = |col: Column| -> Option<f64> {
            let v = coerce_float(&row.cell(col));
            if v.is_none() {
                report.record(col);
            }
            v
        };
        let danceability_pct = float(Column::Danceability);
        let energy_pct = float(Column::Energy);

        let artist_field = row.cell(Column::ArtistNames).into_owned();
        let artist_names = split_artists(&artist_field);

        Track {
            track_name: row.cell(Column::TrackName).into_owned(),
            artist_field,
            artist_names,
            released_year,
            released_month,
            streams,
            danceability_pct,
            energy_pct,
            bpm,
            in_spotify_playlists,
            in_apple_playlists,
            in_deezer_playlists,
        }
    }

    /// First day of the release month, or `None` when year or month is
    /// missing or the month lies outside 1–12.
    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.released_year?, self.released_month?, 1)
    }
}

/// Coerce a cell to an integer that fits `T`.  Unparseable cells and
/// values out of range for `T` (a month of `-3`) are both recorded.
fn int_cell<T: TryFrom<i64>>(
    row: &impl CellSource,
    column: Column,
    report: &mut CoercionReport,
) -> Option<T> {
    let v = coerce_int(&row.cell(column)).and_then(|v| T::try_from(v).ok());
    if v.is_none() {
        report.record(column);
    }
    v
}

/// Split a credited-artists cell into trimmed, non-empty names.
pub fn split_artists(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// SongTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter options.
///
/// Immutable once built; shared between pipeline runs through `Arc`.
#[derive(Debug, Clone)]
pub struct SongTable {
    /// All tracks in file order.
    pub tracks: Vec<Track>,
    /// Unique raw `artist(s)_name` values in first-appearance order.
    pub artist_options: Vec<String>,
    /// Observed `(min, max)` of `released_year`; `None` when no row has one.
    pub year_bounds: Option<(i32, i32)>,
    pub coercion: CoercionReport,
}

impl SongTable {
    pub fn from_tracks(tracks: Vec<Track>, coercion: CoercionReport) -> Self {
        let mut seen = HashSet::new();
        let artist_options = tracks
            .iter()
            .filter(|t| seen.insert(t.artist_field.as_str()))
            .map(|t| t.artist_field.clone())
            .collect();

        let year_bounds = tracks
            .iter()
            .filter_map(|t| t.released_year)
            .fold(None, |acc: Option<(i32, i32)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            });

        SongTable {
            tracks,
            artist_options,
            year_bounds,
            coercion,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
