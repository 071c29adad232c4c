// Configuration validation
//
// Validates that batch definitions and datasource entries are usable
// before any data is read. Everything that can be caught from the config
// alone is caught here; value-level mismatches stay a runtime concern of
// the splitting engine.

use crate::{Partitioner, SplitConfig, WarehouseConnection};
use anyhow::{bail, Result};
use std::collections::HashSet;
use tablesplit_core::validate_date_format;
use tracing::warn;

pub fn validate_config(config: &SplitConfig) -> Result<()> {
    if config.batches.is_empty() {
        warn!("configuration defines no batches");
    }

    let mut seen = HashSet::new();
    for batch in &config.batches {
        if batch.name.is_empty() {
            bail!("batches: name must not be empty");
        }
        if !seen.insert(batch.name.as_str()) {
            bail!("batches: duplicate batch name '{}'", batch.name);
        }
        if batch.table.is_empty() {
            bail!("batches.{}: table must not be empty", batch.name);
        }
        validate_partitioner(&batch.name, &batch.partitioner)?;
    }

    if let Some(ref datasource) = config.datasource {
        validate_datasource(datasource)?;
    }

    Ok(())
}

fn validate_partitioner(batch_name: &str, partitioner: &Partitioner) -> Result<()> {
    match partitioner {
        Partitioner::WholeTable => {}
        Partitioner::ColumnValue { column_name }
        | Partitioner::Year { column_name }
        | Partitioner::YearAndMonth { column_name }
        | Partitioner::YearAndMonthAndDay { column_name } => {
            require_column(batch_name, column_name)?;
        }
        Partitioner::DateParts {
            column_name,
            date_parts,
        } => {
            require_column(batch_name, column_name)?;
            if date_parts.is_empty() {
                bail!(
                    "batches.{}: date_parts must name at least one date part",
                    batch_name
                );
            }
        }
        Partitioner::ConvertedDatetime {
            column_name,
            date_format_string,
        } => {
            require_column(batch_name, column_name)?;
            if let Err(e) = validate_date_format(date_format_string) {
                bail!("batches.{}: {}", batch_name, e);
            }
        }
        Partitioner::DividedInteger {
            column_name,
            divisor,
        } => {
            require_column(batch_name, column_name)?;
            if *divisor == 0 {
                bail!("batches.{}: divisor must be non-zero", batch_name);
            }
        }
        Partitioner::ModInteger {
            column_name,
            modulus,
        } => {
            require_column(batch_name, column_name)?;
            if *modulus == 0 {
                bail!("batches.{}: mod must be non-zero", batch_name);
            }
        }
        Partitioner::MultiColumnValues { column_names } => {
            if column_names.is_empty() {
                bail!(
                    "batches.{}: column_names must name at least one column",
                    batch_name
                );
            }
            for column_name in column_names {
                require_column(batch_name, column_name)?;
            }
        }
        Partitioner::HashedColumn {
            column_name,
            hash_digits,
            ..
        } => {
            require_column(batch_name, column_name)?;
            // The longest supported digest is 64 hex characters
            if *hash_digits > 64 {
                warn!(
                    batch = batch_name,
                    hash_digits, "hash_digits exceeds the longest digest; full digest will be compared"
                );
            }
        }
    }
    Ok(())
}

fn require_column(batch_name: &str, column_name: &str) -> Result<()> {
    if column_name.is_empty() {
        bail!("batches.{}: column name must not be empty", batch_name);
    }
    Ok(())
}

fn validate_datasource(datasource: &crate::DatasourceConfig) -> Result<()> {
    let connection = datasource.connection()?;
    if let WarehouseConnection::Details(ref details) = connection {
        let fields = [
            ("account", &details.account),
            ("user", &details.user),
            ("password", &details.password),
            ("database", &details.database),
            ("schema", &details.schema),
            ("warehouse", &details.warehouse),
            ("role", &details.role),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                bail!(
                    "datasource '{}': details.{} must not be empty",
                    datasource.name,
                    name
                );
            }
        }
    }
    Ok(())
}
