use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const HEADERS: [&str; 11] = [
    "track_name",
    "artist(s)_name",
    "released_year",
    "released_month",
    "streams",
    "danceability_%",
    "energy_%",
    "bpm",
    "in_spotify_playlists",
    "in_apple_playlists",
    "in_deezer_playlists",
];

const ARTISTS: &[&str] = &[
    "The Weeknd",
    "Taylor Swift",
    "Bad Bunny",
    "Ed Sheeran",
    "Harry Styles",
    "SZA",
    "Olivia Rodrigo",
    "Dua Lipa",
    "Drake, 21 Savage",
    "Bad Bunny, Chencho Corleone",
    "Latto, Jung Kook",
    "Miley Cyrus",
];

const WORDS: &[&str] = &[
    "Night", "Summer", "Heart", "Blinding", "Flowers", "Dance", "Lights", "Golden", "Echo",
    "Midnight", "Cruel", "Kill", "Bill", "Anti", "Hero", "Levitating", "Ghost", "Vampire",
];

const N_TRACKS: usize = 400;

/// Every cell as text, exactly as it will appear in the CSV.
type Row = [String; 11];

fn generate_row(rng: &mut StdRng) -> Row {
    let title = format!(
        "{} {}",
        WORDS.choose(rng).unwrap_or(&"Song"),
        WORDS.choose(rng).unwrap_or(&"Song")
    );
    let artist = ARTISTS.choose(rng).unwrap_or(&"Unknown").to_string();
    let year: i64 = if rng.gen_bool(0.1) {
        rng.gen_range(1970..2010)
    } else {
        rng.gen_range(2010..=2023)
    };
    let month: i64 = rng.gen_range(1..=12);
    let streams: i64 = rng.gen_range(2_000_000..3_700_000_000);
    let danceability: i64 = rng.gen_range(25..=96);
    let energy: i64 = rng.gen_range(15..=97);
    let bpm: i64 = rng.gen_range(65..=206);

    let spotify = rng.gen_range(30..52_000i64).to_string();
    let apple = rng.gen_range(0..670i64).to_string();
    // Real exports carry thousands separators and the odd junk cell here.
    let deezer = match rng.gen_range(0..20) {
        0 => "n/a".to_string(),
        1 => format!("{},{:03}", rng.gen_range(1..13), rng.gen_range(0..1000)),
        _ => rng.gen_range(0..900i64).to_string(),
    };

    [
        title,
        artist,
        year.to_string(),
        month.to_string(),
        streams.to_string(),
        danceability.to_string(),
        energy.to_string(),
        bpm.to_string(),
        spotify,
        apple,
        deezer,
    ]
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS).context("writing CSV header")?;
    for row in rows {
        writer.write_record(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

/// Numeric columns are typed where every cell parses, text otherwise, the
/// way Pandas infers a dtype per column.
fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let mut fields = Vec::with_capacity(HEADERS.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(HEADERS.len());

    for (idx, name) in HEADERS.iter().enumerate() {
        let cells: Vec<&str> = rows.iter().map(|r| r[idx].as_str()).collect();
        let ints: Option<Vec<i64>> = cells.iter().map(|c| c.parse().ok()).collect();
        match ints {
            Some(values) => {
                fields.push(Field::new(*name, DataType::Int64, false));
                columns.push(Arc::new(Int64Array::from(values)));
            }
            None => {
                fields.push(Field::new(*name, DataType::Utf8, false));
                columns.push(Arc::new(StringArray::from(cells)));
            }
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(42);
    let rows: Vec<Row> = (0..N_TRACKS).map(|_| generate_row(&mut rng)).collect();

    let csv_path = Path::new("Spotify Most Streamed Songs.csv");
    write_csv(csv_path, &rows)?;
    log::info!("Wrote {} tracks to {}", rows.len(), csv_path.display());

    let parquet_path = Path::new("Spotify Most Streamed Songs.parquet");
    write_parquet(parquet_path, &rows)?;
    log::info!("Wrote {} tracks to {}", rows.len(), parquet_path.display());

    println!(
        "Generated {} tracks → {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
