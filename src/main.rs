// tablesplit CLI - slice a Parquet file into one named batch
//
// Simple blocking I/O, no async runtime: read batches, filter, write.
// The strategy comes either from a TOML config file (--config/--batch) or
// from flags (--method plus the method's parameters).

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tablesplit::{
    init_tracing, slice_parquet_file, BatchIdentifiers, DatePart, HashFunction, SplitConfig,
    SplitMethod, SplitStrategy, DEFAULT_DATE_FORMAT,
};

/// Split Parquet tables into deterministic validation batches
#[derive(Parser)]
#[command(name = "tablesplit")]
#[command(version)]
#[command(about = "Split Parquet tables into deterministic validation batches", long_about = None)]
struct Cli {
    /// Input Parquet file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output Parquet file for the selected batch
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Path to a TOML config file with batch definitions
    #[arg(short, long, value_name = "FILE", conflicts_with = "method")]
    config: Option<PathBuf>,

    /// Batch name to select from the config file
    #[arg(short, long, value_name = "NAME", requires = "config")]
    batch: Option<String>,

    /// Splitting method, e.g. split_on_year_and_month
    #[arg(short, long, value_name = "METHOD")]
    method: Option<String>,

    /// Column the method operates on
    #[arg(long, value_name = "COLUMN")]
    column: Option<String>,

    /// Columns for split_on_multi_column_values (comma separated)
    #[arg(long, value_name = "COLUMNS", value_delimiter = ',')]
    columns: Vec<String>,

    /// Date parts for split_on_date_parts (comma separated)
    #[arg(long, value_name = "PARTS", value_delimiter = ',')]
    date_parts: Vec<String>,

    /// strftime format for split_on_converted_datetime
    #[arg(long, value_name = "FORMAT")]
    date_format: Option<String>,

    /// Divisor for split_on_divided_integer
    #[arg(long, value_name = "N")]
    divisor: Option<i64>,

    /// Modulus for split_on_mod_integer
    #[arg(long = "mod", value_name = "N")]
    modulus: Option<i64>,

    /// Digest suffix length for split_on_hashed_column (0 = full digest)
    #[arg(long, value_name = "N")]
    hash_digits: Option<usize>,

    /// Hash algorithm for split_on_hashed_column: md5, sha1, sha256, blake3
    #[arg(long, value_name = "NAME")]
    hash_function: Option<String>,

    /// Batch identifiers as a JSON object
    #[arg(short, long, value_name = "JSON", default_value = "{}")]
    identifiers: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_deref());

    // Step 1: Resolve the splitting strategy (config file or flags)
    let strategy = resolve_strategy(&cli)?;

    // Step 2: Parse batch identifiers
    let identifiers = BatchIdentifiers::from_json_str(&cli.identifiers)
        .context("failed to parse --identifiers as a JSON object")?;

    // Step 3: Slice the file
    let outcome = slice_parquet_file(&cli.input, &cli.output, &strategy, &identifiers)?;

    println!(
        "{} rows in, {} rows kept -> {}",
        outcome.rows_in,
        outcome.rows_out,
        cli.output.display()
    );
    Ok(())
}

fn resolve_strategy(cli: &Cli) -> Result<SplitStrategy> {
    if let Some(config_path) = &cli.config {
        let config = SplitConfig::load(config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?;
        let name = cli
            .batch
            .as_deref()
            .context("--batch is required when --config is given")?;
        let batch = config
            .batch(name)
            .with_context(|| format!("config file defines no batch named '{}'", name))?;
        return Ok(batch.partitioner.to_strategy());
    }
    build_strategy(cli)
}

fn build_strategy(cli: &Cli) -> Result<SplitStrategy> {
    let raw_method = cli
        .method
        .as_deref()
        .context("either --config or --method must be given")?;
    let method: SplitMethod = raw_method.parse()?;

    let strategy = match method {
        SplitMethod::WholeTable => SplitStrategy::WholeTable,
        SplitMethod::ColumnValue => SplitStrategy::ColumnValue {
            column: required_column(cli, method)?,
        },
        SplitMethod::Year => SplitStrategy::Year {
            column: required_column(cli, method)?,
        },
        SplitMethod::YearAndMonth => SplitStrategy::YearAndMonth {
            column: required_column(cli, method)?,
        },
        SplitMethod::YearAndMonthAndDay => SplitStrategy::YearAndMonthAndDay {
            column: required_column(cli, method)?,
        },
        SplitMethod::DateParts => {
            if cli.date_parts.is_empty() {
                bail!("--date-parts is required for {}", method);
            }
            let parts = cli
                .date_parts
                .iter()
                .map(|raw| raw.parse::<DatePart>())
                .collect::<Result<Vec<_>, _>>()?;
            SplitStrategy::DateParts {
                column: required_column(cli, method)?,
                parts,
            }
        }
        SplitMethod::ConvertedDatetime => SplitStrategy::ConvertedDatetime {
            column: required_column(cli, method)?,
            date_format: cli
                .date_format
                .clone()
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
        },
        SplitMethod::DividedInteger => SplitStrategy::DividedInteger {
            column: required_column(cli, method)?,
            divisor: cli
                .divisor
                .with_context(|| format!("--divisor is required for {}", method))?,
        },
        SplitMethod::ModInteger => SplitStrategy::ModInteger {
            column: required_column(cli, method)?,
            modulus: cli
                .modulus
                .with_context(|| format!("--mod is required for {}", method))?,
        },
        SplitMethod::MultiColumnValues => {
            if cli.columns.is_empty() {
                bail!("--columns is required for {}", method);
            }
            SplitStrategy::MultiColumnValues {
                columns: cli.columns.clone(),
            }
        }
        SplitMethod::HashedColumn => SplitStrategy::HashedColumn {
            column: required_column(cli, method)?,
            hash_digits: cli
                .hash_digits
                .with_context(|| format!("--hash-digits is required for {}", method))?,
            hash_function: match &cli.hash_function {
                Some(name) => name.parse()?,
                None => HashFunction::Md5,
            },
        },
    };
    Ok(strategy)
}

fn required_column(cli: &Cli, method: SplitMethod) -> Result<String> {
    cli.column
        .clone()
        .with_context(|| format!("--column is required for {}", method))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_build_strategy_from_flags() {
        let cli = parse(&[
            "tablesplit",
            "in.parquet",
            "-o",
            "out.parquet",
            "--method",
            "split_on_mod_integer",
            "--column",
            "id",
            "--mod",
            "10",
        ]);
        let strategy = build_strategy(&cli).unwrap();
        assert_eq!(
            strategy,
            SplitStrategy::ModInteger {
                column: "id".to_string(),
                modulus: 10
            }
        );
    }

    #[test]
    fn test_build_date_parts_strategy() {
        let cli = parse(&[
            "tablesplit",
            "in.parquet",
            "-o",
            "out.parquet",
            "--method",
            "split_on_date_parts",
            "--column",
            "ts",
            "--date-parts",
            "year,month",
        ]);
        let strategy = build_strategy(&cli).unwrap();
        assert_eq!(
            strategy,
            SplitStrategy::DateParts {
                column: "ts".to_string(),
                parts: vec![DatePart::Year, DatePart::Month],
            }
        );
    }

    #[test]
    fn test_missing_parameter_is_reported() {
        let cli = parse(&[
            "tablesplit",
            "in.parquet",
            "-o",
            "out.parquet",
            "--method",
            "split_on_divided_integer",
            "--column",
            "id",
        ]);
        let err = build_strategy(&cli).unwrap_err().to_string();
        assert!(err.contains("--divisor"));
    }

    #[test]
    fn test_unknown_method_lists_supported() {
        let cli = parse(&[
            "tablesplit",
            "in.parquet",
            "-o",
            "out.parquet",
            "--method",
            "split_on_nothing",
        ]);
        let err = format!("{:#}", build_strategy(&cli).unwrap_err());
        assert!(err.contains("split_on_nothing"));
        assert!(err.contains("split_on_whole_table"));
    }

    #[test]
    fn test_config_conflicts_with_method() {
        let result = Cli::try_parse_from([
            "tablesplit",
            "in.parquet",
            "-o",
            "out.parquet",
            "--config",
            "batches.toml",
            "--method",
            "split_on_whole_table",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_function_defaults_to_md5() {
        let cli = parse(&[
            "tablesplit",
            "in.parquet",
            "-o",
            "out.parquet",
            "--method",
            "split_on_hashed_column",
            "--column",
            "user",
            "--hash-digits",
            "2",
        ]);
        let strategy = build_strategy(&cli).unwrap();
        assert_eq!(
            strategy,
            SplitStrategy::HashedColumn {
                column: "user".to_string(),
                hash_digits: 2,
                hash_function: HashFunction::Md5,
            }
        );
    }
}
