use anyhow::{Context, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::RowGroupMetaData;
use std::{env, fs::File, path::Path, process::exit};

fn main() {
    // Expect exactly one CLI argument: an exported report in Parquet form.
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <REPORT.parquet>", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_report(Path::new(&args[1])) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print the Arrow schema of a report plus per-row-group sizes and null counts.
fn inspect_report(path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading Parquet metadata of {}", path.display()))?;
    let meta = builder.metadata();
    let file_meta = meta.file_metadata();

    let report = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("<unknown>");
    println!("=== Report: {} ===", report);
    println!("Rows:        {}", file_meta.num_rows());
    println!("Row groups:  {}", meta.num_row_groups());
    println!("Size:        {} bytes", std::fs::metadata(path)?.len());
    println!();

    println!("=== Columns ===");
    for field in builder.schema().fields() {
        println!(
            "- {:<30} | {:?}{}",
            field.name(),
            field.data_type(),
            if field.is_nullable() { " (nullable)" } else { "" }
        );
    }
    println!();

    for (idx, rg) in meta.row_groups().iter().enumerate() {
        print_row_group(idx, rg);
    }
    Ok(())
}

fn print_row_group(idx: usize, rg: &RowGroupMetaData) {
    println!("--- Row Group {} ---", idx);
    println!("  Rows:              {}", rg.num_rows());
    println!("  Compressed size:   {} bytes", rg.compressed_size());
    for col in rg.columns() {
        let nulls = col
            .statistics()
            .and_then(|s| s.null_count_opt())
            .map_or_else(|| "?".to_string(), |n| n.to_string());
        println!(
            "  > {:<28} {:?}, nulls: {}",
            col.column_descr().name(),
            col.compression(),
            nulls
        );
    }
    println!();
}
