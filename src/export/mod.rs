// src/export/mod.rs
pub mod arrow;

use anyhow::{Context, Result};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::engine::ReportRow;
use crate::report::Report;

pub use self::arrow::{build_arrow_schema, column_names, to_record_batch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
            ExportFormat::Json => "json",
        }
    }
}

/// Delimited text: one header row, empty field for null, ISO dates.
pub fn write_csv(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let names = column_names(rows);
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file `{}`", path.display()))?;
    wtr.write_record(&names)
        .with_context(|| format!("writing header to `{}`", path.display()))?;
    for row in rows {
        let record: Vec<String> = names
            .iter()
            .map(|n| row.get(n).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        wtr.write_record(&record)
            .with_context(|| format!("writing row to `{}`", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing `{}`", path.display()))?;
    Ok(())
}

/// Snappy-compressed Parquet. Written to `<path>.tmp` and renamed once
/// complete so readers never see a partial file.
pub fn write_parquet(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let batch = to_record_batch(rows)?;
    if batch.num_columns() == 0 {
        anyhow::bail!("cannot write `{}`: report has no columns", path.display());
    }

    let tmp_path = path.with_extension("parquet.tmp");
    let tmp_file = File::create(&tmp_path)
        .with_context(|| format!("could not create temporary file `{}`", tmp_path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(BufWriter::new(tmp_file), batch.schema(), Some(props))
        .context("creating ArrowWriter for report")?;
    writer.write(&batch).context("writing report batch")?;
    writer.close().context("closing report writer")?;

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to rename `{}` to `{}`",
            tmp_path.display(),
            path.display()
        )
    })?;
    Ok(())
}

/// A JSON array with one object per row.
pub fn write_json(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating JSON file `{}`", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), rows)
        .with_context(|| format!("writing JSON to `{}`", path.display()))?;
    Ok(())
}

/// Write `report` to `<out_dir>/<report name>.<ext>` and return the path.
#[tracing::instrument(level = "info", skip(report, out_dir), fields(report = %report.kind, dir = %out_dir.display()))]
pub fn write_report(report: &Report, out_dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory `{}`", out_dir.display()))?;
    let path = out_dir.join(format!("{}.{}", report.kind.name(), format.extension()));

    debug!(rows = report.rows.len(), path = %path.display(), "exporting");
    match format {
        ExportFormat::Csv => write_csv(&path, &report.rows)?,
        ExportFormat::Parquet => write_parquet(&path, &report.rows)?,
        ExportFormat::Json => write_json(&path, &report.rows)?,
    }
    info!(path = %path.display(), rows = report.rows.len(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Value;
    use crate::report::ReportKind;
    use crate::test_support::{day, init_test_logging};
    use ::arrow::array::{Array, Float64Array};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    fn sample_report() -> Report {
        Report {
            kind: ReportKind::MortalityRate,
            rows: vec![
                ReportRow::new()
                    .with("location", "Andorra")
                    .with("date", day(2021, 1, 1))
                    .with("DeathPercentage", Value::Null),
                ReportRow::new()
                    .with("location", "Andorra")
                    .with("date", day(2021, 1, 2))
                    .with("DeathPercentage", 20.0),
            ],
        }
    }

    #[test]
    fn csv_export_has_header_and_blank_nulls() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = write_report(&sample_report(), dir.path(), ExportFormat::Csv)?;

        assert_eq!(path, dir.path().join("mortality_rate.csv"));
        let text = fs::read_to_string(&path)?;
        assert_eq!(
            text,
            "location,date,DeathPercentage\nAndorra,2021-01-01,\nAndorra,2021-01-02,20\n"
        );
        Ok(())
    }

    #[test]
    fn parquet_export_round_trips() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = write_report(&sample_report(), dir.path(), ExportFormat::Parquet)?;
        assert!(!dir.path().join("mortality_rate.parquet.tmp").exists());

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path)?)?.build()?;
        let batches: Vec<_> = reader.collect::<std::result::Result<Vec<_>, _>>()?;
        let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(rows, 2);

        let schema = batches[0].schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["location", "date", "DeathPercentage"]);

        let pct = batches[0]
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .expect("float column");
        assert!(pct.is_null(0));
        assert_eq!(pct.value(1), 20.0);
        Ok(())
    }

    #[test]
    fn json_export_is_an_array_of_objects() -> Result<()> {
        let dir = tempdir()?;
        let path = write_report(&sample_report(), dir.path(), ExportFormat::Json)?;
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;

        let rows = parsed.as_array().expect("array");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["DeathPercentage"], serde_json::Value::Null);
        assert_eq!(rows[1]["date"], "2021-01-02");
        Ok(())
    }

    #[test]
    fn parquet_refuses_reports_without_columns() -> Result<()> {
        let dir = tempdir()?;
        let empty = Report {
            kind: ReportKind::GlobalSummary,
            rows: Vec::new(),
        };
        assert!(write_report(&empty, dir.path(), ExportFormat::Parquet).is_err());
        Ok(())
    }
}
