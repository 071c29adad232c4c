// tablesplit - Split Parquet tables into deterministic validation batches
//
// Facade crate: re-exports the splitting engine and the declarative
// configuration layer, and adds the Parquet slicing pipeline the CLI runs.
// Simple blocking I/O, no async runtime; splitting is pure computation.

mod init;
mod pipeline;

pub use init::init_tracing;
pub use pipeline::{slice_parquet_file, writer_properties, SliceOutcome};

// Re-export commonly used types
pub use tablesplit_config::{
    BatchDefinition, ConnectionDetails, DatasourceConfig, Partitioner, SplitConfig,
    WarehouseConnection,
};
pub use tablesplit_core::{
    split_batch, BatchIdentifiers, DatePart, HashFunction, SplitError, SplitMethod,
    SplitStrategy, DEFAULT_DATE_FORMAT, HASH_VALUE_KEY,
};
