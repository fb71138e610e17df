use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::FilteredView;
use super::model::SongTable;

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistTotal {
    pub artist: String,
    pub streams: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReleaseCount {
    /// First day of the release month.
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DanceEnergyPoint {
    pub danceability: f64,
    pub energy: f64,
    pub artist: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Platform {
    Spotify,
    Apple,
    Deezer,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Spotify, Platform::Apple, Platform::Deezer];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Spotify => "Spotify",
            Platform::Apple => "Apple",
            Platform::Deezer => "Deezer",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Playlist-count totals per platform.  Always holds all three platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformTotals(BTreeMap<Platform, i64>);

impl PlatformTotals {
    pub fn get(&self, platform: Platform) -> i64 {
        self.0.get(&platform).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Platform, i64)> + '_ {
        self.0.iter().map(|(&p, &v)| (p, v))
    }

    /// Saturates at `i64::MAX` instead of overflowing.
    pub fn sum(&self) -> i64 {
        self.0.values().fold(0, |acc, &v| acc.saturating_add(v))
    }
}

impl FromIterator<(Platform, i64)> for PlatformTotals {
    /// Platforms missing from `iter` total 0.
    fn from_iter<I: IntoIterator<Item = (Platform, i64)>>(iter: I) -> Self {
        let mut totals: BTreeMap<Platform, i64> = Platform::ALL.iter().map(|&p| (p, 0)).collect();
        for (platform, value) in iter {
            let total = totals.entry(platform).or_default();
            *total = total.saturating_add(value);
        }
        PlatformTotals(totals)
    }
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Sum `streams` per raw `artist(s)_name` value over the whole table and
/// keep the `n` largest.  Ties keep first-appearance order; sums saturate
/// at `i64::MAX`.
///
/// A co-credited track counts under its exact artist string, so
/// `"A, B"` is its own group and does not add to `"A"` or `"B"`.
pub fn top_artists_by_streams(table: &SongTable, n: usize) -> Vec<ArtistTotal> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ArtistTotal> = Vec::new();

    for track in &table.tracks {
        match slot.get(track.artist_field.as_str()) {
            Some(&i) => totals[i].streams = totals[i].streams.saturating_add(track.streams),
            None => {
                slot.insert(&track.artist_field, totals.len());
                totals.push(ArtistTotal {
                    artist: track.artist_field.clone(),
                    streams: track.streams,
                });
            }
        }
    }

    // Stable sort keeps first appearance among equal totals.
    totals.sort_by(|a, b| b.streams.cmp(&a.streams));
    totals.truncate(n);
    totals
}

/// Track count per release month, oldest first.  Rows without a valid
/// year/month are left out.
pub fn release_trend(view: &FilteredView<'_>) -> Vec<ReleaseCount> {
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut skipped = 0usize;

    for track in view.iter() {
        match track.release_date() {
            Some(date) => *counts.entry(date).or_default() += 1,
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("release trend: {skipped} rows without a valid release date");
    }

    counts
        .into_iter()
        .map(|(date, count)| ReleaseCount { date, count })
        .collect()
}

/// `(danceability, energy, artist)` per row, in row order.
pub fn danceability_energy_pairs(view: &FilteredView<'_>) -> Vec<DanceEnergyPoint> {
    view.iter()
        .filter_map(|t| {
            Some(DanceEnergyPoint {
                danceability: t.danceability_pct?,
                energy: t.energy_pct?,
                artist: t.artist_field.clone(),
            })
        })
        .collect()
}

/// Sum of each playlist-count column.  Malformed cells were coerced to 0
/// at load time, so they add nothing here.
pub fn platform_totals(view: &FilteredView<'_>) -> PlatformTotals {
    view.iter()
        .flat_map(|t| {
            [
                (Platform::Spotify, t.in_spotify_playlists),
                (Platform::Apple, t.in_apple_playlists),
                (Platform::Deezer, t.in_deezer_playlists),
            ]
        })
        .collect()
}

/// BPM per row, in row order.
pub fn bpm_values(view: &FilteredView<'_>) -> Vec<u32> {
    view.iter().filter_map(|t| t.bpm).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::filter::{filter, FilterParams, YearRange};
    use crate::data::model::tests::{table, track, MapRow};
    use crate::data::model::{Column, CoercionReport, Track};

    #[test]
    fn top_artists_sorted_descending_and_truncated() {
        let t = table(vec![
            track("A", 2020, 1, 100),
            track("B", 2020, 1, 300),
            track("C", 2020, 1, 50),
            track("A", 2021, 1, 150),
        ]);
        let top = top_artists_by_streams(&t, 2);
        assert_eq!(
            top,
            vec![
                ArtistTotal { artist: "B".into(), streams: 300 },
                ArtistTotal { artist: "A".into(), streams: 250 },
            ]
        );
        assert_eq!(top_artists_by_streams(&t, 10).len(), 3);
    }

    #[test]
    fn top_artists_ties_keep_first_appearance() {
        let t = table(vec![
            track("Z", 2020, 1, 10),
            track("Y", 2020, 1, 10),
            track("X", 2020, 1, 20),
        ]);
        let names: Vec<_> = top_artists_by_streams(&t, 10)
            .into_iter()
            .map(|a| a.artist)
            .collect();
        assert_eq!(names, vec!["X", "Z", "Y"]);
    }

    #[test]
    fn huge_totals_saturate() {
        let mut big = track("A", 2020, 1, i64::MAX);
        big.in_spotify_playlists = i64::MAX;
        let t = table(vec![big, track("A", 2020, 1, 1)]);

        let top = top_artists_by_streams(&t, 10);
        assert_eq!(top[0], ArtistTotal { artist: "A".into(), streams: i64::MAX });

        let totals = platform_totals(&FilteredView::all(&t));
        assert_eq!(totals.get(Platform::Spotify), i64::MAX);
        assert_eq!(totals.sum(), i64::MAX);
    }

    #[test]
    fn top_artists_group_by_raw_artist_field() {
        let t = table(vec![
            track("A", 2020, 1, 10),
            track("A, B", 2020, 1, 5),
            track("B", 2020, 1, 1),
        ]);
        let top = top_artists_by_streams(&t, 10);
        assert_eq!(top[0], ArtistTotal { artist: "A".into(), streams: 10 });
        assert_eq!(top[1], ArtistTotal { artist: "A, B".into(), streams: 5 });
        assert_eq!(top[2], ArtistTotal { artist: "B".into(), streams: 1 });
    }

    #[test]
    fn release_trend_is_chronological_and_skips_bad_months() {
        let bad = track("A", 2020, 13, 1);
        let t = table(vec![
            track("A", 2021, 2, 1),
            track("B", 2020, 11, 1),
            bad,
            track("C", 2021, 2, 1),
        ]);
        let view = FilteredView::all(&t);
        let trend = release_trend(&view);

        let date = |y, m| NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        assert_eq!(
            trend,
            vec![
                ReleaseCount { date: date(2020, 11), count: 1 },
                ReleaseCount { date: date(2021, 2), count: 2 },
            ]
        );
        assert!(trend.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(trend.iter().map(|r| r.count).sum::<usize>(), view.len() - 1);
    }

    #[test]
    fn dance_energy_pairs_follow_row_order() {
        let mut second = track("B", 2020, 1, 1);
        second.danceability_pct = Some(90.0);
        let mut missing = track("C", 2020, 1, 1);
        missing.energy_pct = None;
        let t = table(vec![track("A", 2020, 1, 1), second, missing]);

        let pairs = danceability_energy_pairs(&FilteredView::all(&t));

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].artist, "A");
        assert_eq!(pairs[1].danceability, 90.0);
    }

    #[test]
    fn platform_totals_ignore_junk_cells() {
        let mut report = CoercionReport::default();
        let rows: Vec<Track> = ["5", "bad", "3"]
            .iter()
            .map(|spotify| {
                let mut cells = BTreeMap::new();
                cells.insert(Column::ArtistNames, "A".to_string());
                cells.insert(Column::ReleasedYear, "2020".to_string());
                cells.insert(Column::SpotifyPlaylists, spotify.to_string());
                Track::from_cells(&MapRow(cells), &mut report)
            })
            .collect();
        let t = SongTable::from_tracks(rows, report);

        let totals = platform_totals(&FilteredView::all(&t));

        assert_eq!(totals.get(Platform::Spotify), 8);
        assert_eq!(totals.get(Platform::Apple), 0);
        assert_eq!(totals.iter().count(), 3);
    }

    #[test]
    fn aggregations_respect_the_filter() {
        let mut slow = track("B", 2021, 1, 1);
        slow.bpm = Some(80);
        let t = table(vec![track("A", 2020, 1, 1), slow]);
        let params = FilterParams {
            year_range: YearRange::new(2021, 2021),
            artists: Default::default(),
        };
        let view = filter(&t, &params);

        assert_eq!(bpm_values(&view), vec![80]);
        assert_eq!(platform_totals(&view).sum(), 3);
        assert_eq!(release_trend(&view).len(), 1);
    }
}
