//! Shuffled CSV output of composed texts.

use std::io::Write;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use street_heat_segment_models::ComposedText;

use crate::ComposeError;

/// Output columns, written even when there are no rows.
pub const OUTPUT_HEADER: [&str; 2] = ["segment_id", "tweet"];

/// Shuffles `texts` in place.
///
/// With a seed the order is reproducible across runs; without one the
/// thread-local generator is used.
pub fn shuffle(texts: &mut [ComposedText], seed: Option<u64>) {
    match seed {
        Some(seed) => texts.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => texts.shuffle(&mut rand::rng()),
    }
}

/// Writes `texts` as `segment_id,tweet` CSV rows with a header.
///
/// # Errors
///
/// Returns [`ComposeError`] if serialization or the underlying writer
/// fails.
pub fn write_csv<W: Write>(writer: W, texts: &[ComposedText]) -> Result<(), ComposeError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(OUTPUT_HEADER)?;
    for text in texts {
        csv_writer.serialize(text)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Shuffles `texts` and writes them to `path`.
///
/// # Errors
///
/// Returns [`ComposeError`] if the file cannot be created or written.
pub fn write_shuffled(
    path: &Path,
    mut texts: Vec<ComposedText>,
    seed: Option<u64>,
) -> Result<(), ComposeError> {
    shuffle(&mut texts, seed);

    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), &texts)?;

    log::info!("Wrote {} texts to {}", texts.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use street_heat_segment_models::SegmentId;

    fn texts(n: i64) -> Vec<ComposedText> {
        (0..n)
            .map(|id| ComposedText {
                segment_id: SegmentId(id),
                text: format!("text {id}"),
            })
            .collect()
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut a = texts(50);
        let mut b = texts(50);
        shuffle(&mut a, Some(7));
        shuffle(&mut b, Some(7));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_keeps_every_row() {
        let mut shuffled = texts(50);
        shuffle(&mut shuffled, None);

        let mut ids: Vec<i64> = shuffled.iter().map(|t| t.segment_id.value()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn writes_header_and_quoted_text() {
        let rows = vec![ComposedText {
            segment_id: SegmentId(85_000_123),
            text: "10-12 Main St is a street in Boston, mostly residential.".to_string(),
        }];

        let mut buf = Vec::new();
        write_csv(&mut buf, &rows).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "segment_id,tweet\n\
             85000123,\"10-12 Main St is a street in Boston, mostly residential.\"\n"
        );
    }

    #[test]
    fn empty_batch_still_writes_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "segment_id,tweet\n");
    }
}
