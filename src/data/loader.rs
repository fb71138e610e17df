use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use arrow::array::{Array, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::LoadError;
use super::model::{CellSource, CoercionReport, Column, SongTable, Track};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a song table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row plus delimited rows (the usual export)
/// * `.json`         – `[{ "artist(s)_name": "...", "streams": 123, ... }, ...]`
/// * `.parquet`      – one column per header, any scalar type
pub fn load_file(path: &Path) -> Result<SongTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    log::info!("Loaded {} tracks from {}", table.len(), path.display());
    if !table.coercion.is_empty() {
        log::warn!(
            "{} malformed cells coerced in {} ({})",
            table.coercion.total(),
            path.display(),
            table.coercion
        );
    }
    Ok(table)
}

/// Map every known column to its position, failing on the first required
/// header that is absent.
fn resolve_positions<'a>(
    headers: impl IntoIterator<Item = Cow<'a, str>>,
) -> Result<BTreeMap<Column, usize>, LoadError> {
    let headers: Vec<Cow<'a, str>> = headers.into_iter().collect();
    let mut positions = BTreeMap::new();
    for col in Column::ALL {
        match headers.iter().position(|h| h.trim() == col.header()) {
            Some(idx) => {
                positions.insert(col, idx);
            }
            None if col.is_required() => return Err(LoadError::schema(col.header())),
            None => {}
        }
    }
    Ok(positions)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// A CSV record addressed by column.  Bytes are decoded lossily because
/// the common exports of this dataset are not valid UTF-8 throughout.
struct CsvRow<'a> {
    record: &'a csv::ByteRecord,
    positions: &'a BTreeMap<Column, usize>,
}

impl CellSource for CsvRow<'_> {
    fn cell(&self, column: Column) -> Cow<'_, str> {
        self.positions
            .get(&column)
            .and_then(|&idx| self.record.get(idx))
            .map(String::from_utf8_lossy)
            .unwrap_or(Cow::Borrowed(""))
    }
}

fn load_delimited(path: &Path, delimiter: u8) -> Result<SongTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| LoadError::data_load(path, e))?;

    let headers = reader
        .byte_headers()
        .map_err(|e| LoadError::data_load(path, e))?
        .clone();
    let positions = resolve_positions(headers.iter().map(String::from_utf8_lossy))?;

    let mut report = CoercionReport::default();
    let mut tracks = Vec::new();
    let mut record = csv::ByteRecord::new();

    while reader
        .read_byte_record(&mut record)
        .map_err(|e| LoadError::data_load(path, e))?
    {
        let row = CsvRow {
            record: &record,
            positions: &positions,
        };
        tracks.push(Track::from_cells(&row, &mut report));
    }

    Ok(SongTable::from_tracks(tracks, report))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

struct JsonRow<'a>(&'a Map<String, JsonValue>);

impl CellSource for JsonRow<'_> {
    fn cell(&self, column: Column) -> Cow<'_, str> {
        match self.0.get(column.header()) {
            Some(JsonValue::String(s)) => Cow::Borrowed(s.as_str()),
            Some(JsonValue::Null) | None => Cow::Borrowed(""),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`).
/// Every record must carry all required keys (a `null` value is fine and
/// is coerced like an empty CSV cell).  An empty array has no keys to
/// check and loads as an empty table.
fn load_json(path: &Path) -> Result<SongTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::data_load(path, e))?;
    let records: Vec<Map<String, JsonValue>> =
        serde_json::from_str(&text).map_err(|e| LoadError::data_load(path, e))?;

    for rec in &records {
        if let Some(col) = Column::required().find(|c| !rec.contains_key(c.header())) {
            return Err(LoadError::schema(col.header()));
        }
    }

    let mut report = CoercionReport::default();
    let tracks = records
        .iter()
        .map(|rec| Track::from_cells(&JsonRow(rec), &mut report))
        .collect();

    Ok(SongTable::from_tracks(tracks, report))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// One row of a record batch whose columns were cast to text.
struct ParquetRow<'a> {
    columns: &'a BTreeMap<Column, StringArray>,
    row: usize,
}

impl CellSource for ParquetRow<'_> {
    fn cell(&self, column: Column) -> Cow<'_, str> {
        match self.columns.get(&column) {
            Some(arr) if !arr.is_null(self.row) => Cow::Borrowed(arr.value(self.row)),
            _ => Cow::Borrowed(""),
        }
    }
}

/// Load a Parquet file written by Pandas or Polars.  Every known column is
/// cast to text first so cells go through the same coercion as CSV.
fn load_parquet(path: &Path) -> Result<SongTable, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::data_load(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| LoadError::data_load(path, e))?;

    let schema = builder.schema().clone();
    let names = schema.fields().iter().map(|f| Cow::Borrowed(f.name().as_str()));
    let positions = resolve_positions(names)?;

    let reader = builder.build().map_err(|e| LoadError::data_load(path, e))?;

    let mut report = CoercionReport::default();
    let mut tracks = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| LoadError::data_load(path, e))?;

        let mut columns = BTreeMap::new();
        for (&col, &idx) in &positions {
            let as_text =
                cast(batch.column(idx), &DataType::Utf8).map_err(|e| LoadError::data_load(path, e))?;
            columns.insert(col, as_text.as_string::<i32>().clone());
        }

        for row in 0..batch.num_rows() {
            let source = ParquetRow {
                columns: &columns,
                row,
            };
            tracks.push(Track::from_cells(&source, &mut report));
        }
    }

    Ok(SongTable::from_tracks(tracks, report))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    const HEADER: &str = "track_name,artist(s)_name,released_year,released_month,streams,\
danceability_%,energy_%,bpm,in_spotify_playlists,in_apple_playlists,in_deezer_playlists";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_and_coerces_junk_cells() {
        let dir = TempDir::new().unwrap();
        let csv = format!(
            "{HEADER}\n\
             Seven,\"Latto, Jung Kook\",2023,7,141381703,80,83,125,553,43,263\n\
             Flowers,Miley Cyrus,2023,1,bad,71,68,118,12211,115,\"2,445\"\n"
        );
        let path = write_file(&dir, "songs.csv", &csv);

        let table = load_file(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.tracks[0].artist_names, vec!["Latto", "Jung Kook"]);
        assert_eq!(table.tracks[1].streams, 0);
        assert_eq!(table.tracks[1].in_deezer_playlists, 2445);
        assert_eq!(table.coercion.total(), 1);
        assert_eq!(table.year_bounds, Some((2023, 2023)));
    }

    #[test]
    fn loads_tsv_without_optional_track_name() {
        let dir = TempDir::new().unwrap();
        let header = HEADER.replacen("track_name,", "", 1).replace(',', "\t");
        let tsv = format!("{header}\nA\t2020\t1\t100\t50\t60\t120\t1\t2\t3\n");
        let path = write_file(&dir, "songs.tsv", &tsv);

        let table = load_file(&path).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.tracks[0].track_name, "");
        assert_eq!(table.tracks[0].in_apple_playlists, 2);
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let dir = TempDir::new().unwrap();
        let header = HEADER.replace(",bpm", "");
        let path = write_file(&dir, "songs.csv", &format!("{header}\n"));

        match load_file(&path) {
            Err(LoadError::Schema { column }) => assert_eq!(column, "bpm"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_data_load_error() {
        let dir = TempDir::new().unwrap();
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::DataLoad { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("songs.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn loads_json_records_with_mixed_cell_types() {
        let dir = TempDir::new().unwrap();
        let json = r#"[
            {"artist(s)_name": "A", "released_year": 2020, "released_month": 1,
             "streams": "100", "danceability_%": 50, "energy_%": 60.5, "bpm": 120,
             "in_spotify_playlists": 5, "in_apple_playlists": null,
             "in_deezer_playlists": "7"}
        ]"#;
        let path = write_file(&dir, "songs.json", json);

        let table = load_file(&path).unwrap();

        let t = &table.tracks[0];
        assert_eq!(t.streams, 100);
        assert_eq!(t.energy_pct, Some(60.5));
        assert_eq!(t.in_apple_playlists, 0);
        assert_eq!(t.in_deezer_playlists, 7);
        assert_eq!(table.coercion.by_column.get(&Column::ApplePlaylists), Some(&1));
    }

    #[test]
    fn json_missing_column_is_a_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "songs.json", r#"[{"artist(s)_name": "A"}]"#);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Schema { column } if column == "released_year"));
    }

    #[test]
    fn json_record_missing_a_key_later_is_a_schema_error() {
        let dir = TempDir::new().unwrap();
        let json = r#"[
            {"artist(s)_name": "A", "released_year": 2020, "released_month": 1,
             "streams": 1, "danceability_%": 50, "energy_%": 60, "bpm": 120,
             "in_spotify_playlists": 1, "in_apple_playlists": 1, "in_deezer_playlists": 1},
            {"artist(s)_name": "B", "released_year": 2021, "released_month": 2,
             "streams": 2, "danceability_%": 50, "energy_%": 60,
             "in_spotify_playlists": 1, "in_apple_playlists": 1, "in_deezer_playlists": 1}
        ]"#;
        let path = write_file(&dir, "songs.json", json);
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Schema { column } if column == "bpm"));
    }

    #[test]
    fn empty_json_array_loads_as_empty_table() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "songs.json", "[]");
        let table = load_file(&path).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.year_bounds, None);
    }

    #[test]
    fn loads_parquet_with_typed_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("songs.parquet");

        let int_field = |name: &str| Field::new(name, DataType::Int64, true);
        let schema = Arc::new(Schema::new(vec![
            Field::new("artist(s)_name", DataType::Utf8, false),
            int_field("released_year"),
            int_field("released_month"),
            int_field("streams"),
            Field::new("danceability_%", DataType::Float64, true),
            Field::new("energy_%", DataType::Float64, true),
            Field::new("bpm", DataType::Float64, true),
            int_field("in_spotify_playlists"),
            int_field("in_apple_playlists"),
            Field::new("in_deezer_playlists", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Int64Array::from(vec![2020, 2021])),
                Arc::new(Int64Array::from(vec![1, 2])),
                Arc::new(Int64Array::from(vec![100, 200])),
                Arc::new(Float64Array::from(vec![50.0, 70.0])),
                Arc::new(Float64Array::from(vec![60.0, 80.0])),
                Arc::new(Float64Array::from(vec![Some(120.0), None])),
                Arc::new(Int64Array::from(vec![5, 3])),
                Arc::new(Int64Array::from(vec![1, 1])),
                Arc::new(StringArray::from(vec![Some("2,445"), Some("junk")])),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.tracks[0].bpm, Some(120));
        assert_eq!(table.tracks[1].bpm, None);
        assert_eq!(table.tracks[0].in_deezer_playlists, 2445);
        assert_eq!(table.tracks[1].in_deezer_playlists, 0);
        assert_eq!(table.coercion.total(), 2);
    }
}
