// Parquet slicing pipeline
//
// Reads a Parquet file batch by batch, applies one splitting strategy, and
// writes the surviving rows to a new Parquet file. Output uses Zstd
// compression and dictionary encoding to keep slices small.

use std::fs::File;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use tablesplit_core::{BatchIdentifiers, SplitStrategy};
use tracing::{debug, info};

/// Row counts observed while slicing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceOutcome {
    pub rows_in: usize,
    pub rows_out: usize,
}

pub fn writer_properties() -> &'static WriterProperties {
    static PROPERTIES: OnceLock<WriterProperties> = OnceLock::new();
    PROPERTIES.get_or_init(|| {
        WriterProperties::builder()
            .set_dictionary_enabled(true)
            .set_statistics_enabled(EnabledStatistics::Page)
            .set_compression(Compression::ZSTD(ZstdLevel::try_new(2).unwrap()))
            .set_data_page_size_limit(256 * 1024)
            .set_write_batch_size(32 * 1024)
            .set_max_row_group_size(32 * 1024)
            .set_dictionary_page_size_limit(128 * 1024)
            .build()
    })
}

/// Slice one Parquet file down to the rows selected by a strategy.
///
/// Every record batch in the input flows through the same strategy and
/// identifiers; survivors are appended to the output in input order. A
/// strategy that matches nothing still produces a valid, schema-only
/// Parquet file, while a slice that fails removes its partial output.
pub fn slice_parquet_file(
    input: &Path,
    output: &Path,
    strategy: &SplitStrategy,
    identifiers: &BatchIdentifiers,
) -> Result<SliceOutcome> {
    let file = File::open(input)
        .with_context(|| format!("failed to open input file: {}", input.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("failed to read Parquet metadata from {}", input.display()))?;
    // Capture the schema before consuming the builder so an all-filtered
    // input still yields a well-formed output file.
    let schema = builder.schema().clone();
    let reader = builder
        .build()
        .with_context(|| format!("failed to open Parquet reader for {}", input.display()))?;

    let out_file = File::create(output)
        .with_context(|| format!("failed to create output file: {}", output.display()))?;
    let writer = ArrowWriter::try_new(out_file, schema, Some(writer_properties().clone()))
        .context("failed to create Parquet writer")?;

    let sliced = write_batches(reader, writer, strategy, identifiers);
    if sliced.is_err() {
        // Do not leave a truncated output file behind.
        let _ = std::fs::remove_file(output);
    }
    let outcome = sliced?;

    info!(
        rows_in = outcome.rows_in,
        rows_out = outcome.rows_out,
        output = %output.display(),
        "slice complete"
    );
    Ok(outcome)
}

fn write_batches(
    reader: ParquetRecordBatchReader,
    mut writer: ArrowWriter<File>,
    strategy: &SplitStrategy,
    identifiers: &BatchIdentifiers,
) -> Result<SliceOutcome> {
    let mut rows_in = 0;
    let mut rows_out = 0;
    for batch in reader {
        let batch = batch.context("failed to decode record batch")?;
        rows_in += batch.num_rows();

        let selected = strategy.split(&batch, identifiers)?;
        if selected.num_rows() > 0 {
            writer
                .write(&selected)
                .context("failed to write record batch")?;
        }
        rows_out += selected.num_rows();
        debug!(
            batch_rows = batch.num_rows(),
            kept_rows = selected.num_rows(),
            "sliced record batch"
        );
    }

    writer.close().context("failed to finalize Parquet file")?;
    Ok(SliceOutcome { rows_in, rows_out })
}
