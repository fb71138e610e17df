use std::collections::BTreeSet;

use super::model::{SongTable, Track};

// ---------------------------------------------------------------------------
// Filter parameters: the two sidebar controls
// ---------------------------------------------------------------------------

/// Closed interval of release years.  Bounds are kept ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    lo: i32,
    hi: i32,
}

impl YearRange {
    pub fn new(a: i32, b: i32) -> Self {
        YearRange {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    pub fn contains(&self, year: i32) -> bool {
        self.lo <= year && year <= self.hi
    }
}

/// Sidebar selection.  An empty `artists` set means "no artist restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParams {
    pub year_range: YearRange,
    pub artists: BTreeSet<String>,
}

impl FilterParams {
    /// Full year range of the table, no artists selected.
    pub fn for_table(table: &SongTable) -> Self {
        let (lo, hi) = table.year_bounds.unwrap_or((0, 0));
        FilterParams {
            year_range: YearRange::new(lo, hi),
            artists: BTreeSet::new(),
        }
    }

    fn matches(&self, track: &Track) -> bool {
        let in_range = track
            .released_year
            .is_some_and(|y| self.year_range.contains(y));
        if !in_range {
            return false;
        }
        // Nothing selected → no restriction (not "hide everything")
        if self.artists.is_empty() {
            return true;
        }
        self.artists.contains(&track.artist_field)
            || track.artist_names.iter().any(|a| self.artists.contains(a))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – rows of the table that pass the sidebar filters
// ---------------------------------------------------------------------------

/// A borrowed view over the retained rows, in input order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a SongTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every row of `table`.
    pub fn all(table: &'a SongTable) -> Self {
        FilteredView {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Track> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.tracks[i])
    }
}

/// Return the rows of `table` that pass `params`, keeping their order.
///
/// A row passes when its release year lies in the closed year range and,
/// if any artists are selected, its raw artist field or one of its
/// individual credits is among them.
pub fn filter<'a>(table: &'a SongTable, params: &FilterParams) -> FilteredView<'a> {
    let indices = table
        .tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| params.matches(t))
        .map(|(i, _)| i)
        .collect();
    FilteredView { table, indices }
}
