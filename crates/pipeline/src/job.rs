//! End-to-end read -> generate -> write orchestration.
//!
//! This is the composition the request layer performs: derive the header
//! range, read headers and data, build records, generate the batch,
//! derive the output range sized to the result count, then write once.
//! All range validation happens before the first read so malformed user
//! input never triggers I/O, and the single write happens only after the
//! full batch completes so a partial output range cannot exist.

use log::info;

use adsmith_range::{column_index, header_range, output_range, RangeAddress, RangeError};

use crate::pipeline::{AdCopy, GenerationOptions, GenerationPipeline, TextGenerator};
use crate::record::build_records;
use crate::sheet_io::{SheetError, SheetReader, SheetWriter};

/// One add-on invocation's worth of work.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub spreadsheet_id: String,
    /// Data rows range, excluding the header row (e.g. `Sheet1!A2:D100`)
    pub data_range: String,
    /// 1-based row number holding the column labels
    pub header_row: u32,
    /// Column letter the ad texts are written into
    pub output_column: String,
    pub options: GenerationOptions,
}

/// What happened: the ranges actually used and the per-row results.
/// Rationales are surfaced here for the caller; only ad text is written
/// to the sheet (single output column).
#[derive(Debug, Clone)]
pub struct JobReport {
    pub header_range: String,
    pub output_range: String,
    pub results: Vec<AdCopy>,
}

/// Failure of the job as a whole. Generation failures never appear here;
/// they degrade per row inside the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// Malformed range input; nothing was read or written
    Range(RangeError),
    /// The sheet read or write failed
    Sheet(SheetError),
    /// The header or data range held no values
    EmptyRange(String),
}

impl std::fmt::Display for JobError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobError::Range(e) => write!(f, "{}", e),
            JobError::Sheet(e) => write!(f, "{}", e),
            JobError::EmptyRange(range) => write!(f, "Range '{}' contains no data", range),
        }
    }
}

impl std::error::Error for JobError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            JobError::Range(e) => Some(e),
            JobError::Sheet(e) => Some(e),
            JobError::EmptyRange(_) => None,
        }
    }
}

impl From<RangeError> for JobError {
    fn from(e: RangeError) -> Self {
        JobError::Range(e)
    }
}

impl From<SheetError> for JobError {
    fn from(e: SheetError) -> Self {
        JobError::Sheet(e)
    }
}

/// Run one job to completion.
pub fn run_sheet_generation<G: TextGenerator>(
    reader: &dyn SheetReader,
    writer: &dyn SheetWriter,
    pipeline: &GenerationPipeline<G>,
    job: &GenerationJob,
) -> Result<JobReport, JobError> {
    // Validate all range inputs up front, before any I/O. The output
    // range needs a start row to anchor on, so a column-only data range
    // must be rejected here, not after the batch has run.
    let header_rng = header_range(&job.data_range, job.header_row)?;
    column_index(&job.output_column)?;
    let data_addr: RangeAddress = job.data_range.parse()?;
    if data_addr.start_row.is_none() {
        return Err(JobError::Range(RangeError::MissingStartRow(
            job.data_range.clone(),
        )));
    }

    let header_rows = reader.read(&job.spreadsheet_id, &header_rng)?;
    let headers = header_rows
        .into_iter()
        .next()
        .filter(|row| !row.is_empty())
        .ok_or_else(|| JobError::EmptyRange(header_rng.clone()))?;

    let data_rows = reader.read(&job.spreadsheet_id, &job.data_range)?;
    if data_rows.is_empty() {
        return Err(JobError::EmptyRange(job.data_range.clone()));
    }

    let records = build_records(&headers, &data_rows);
    info!(
        "Generating ads for {} rows from {} ({} columns)",
        records.len(),
        job.data_range,
        headers.len()
    );

    let results = pipeline.generate_batch(&records, &job.options);
    debug_assert_eq!(results.len(), records.len());

    let output_rng = output_range(&job.data_range, &job.output_column, results.len())?;
    let values: Vec<Vec<String>> = results
        .iter()
        .map(|copy| vec![copy.ad_text.clone()])
        .collect();

    writer.write(&job.spreadsheet_id, &output_rng, &values)?;
    info!("Wrote {} ads to {}", values.len(), output_rng);

    Ok(JobReport {
        header_range: header_rng,
        output_range: output_rng,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::GenerateError;
    use crate::retry::RetryPolicy;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory sheet: canned reads keyed by range, recorded writes.
    #[derive(Default)]
    struct FakeSheet {
        ranges: HashMap<String, Vec<Vec<String>>>,
        reads: RefCell<Vec<String>>,
        writes: RefCell<Vec<(String, Vec<Vec<String>>)>>,
    }

    impl FakeSheet {
        fn with_range(mut self, range: &str, rows: &[&[&str]]) -> Self {
            let rows = rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect();
            self.ranges.insert(range.to_string(), rows);
            self
        }

        fn io_count(&self) -> usize {
            self.reads.borrow().len() + self.writes.borrow().len()
        }
    }

    impl SheetReader for FakeSheet {
        fn read(&self, _id: &str, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
            self.reads.borrow_mut().push(range.to_string());
            Ok(self.ranges.get(range).cloned().unwrap_or_default())
        }
    }

    impl SheetWriter for FakeSheet {
        fn write(
            &self,
            _id: &str,
            range: &str,
            rows: &[Vec<String>],
        ) -> Result<(), SheetError> {
            self.writes
                .borrow_mut()
                .push((range.to_string(), rows.to_vec()));
            Ok(())
        }
    }

    /// Echoes the product name back so row alignment is visible in the
    /// written output.
    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
            // The name appears in the prompt's product JSON.
            for known in ["Shoe", "Hat", "Mug"] {
                if prompt.contains(known) {
                    return Ok(format!("Ad for {}", known));
                }
            }
            Err(GenerateError::Failed("unknown product".into()))
        }
    }

    fn job(data_range: &str) -> GenerationJob {
        GenerationJob {
            spreadsheet_id: "sheet-1".into(),
            data_range: data_range.into(),
            header_row: 1,
            output_column: "E".into(),
            options: GenerationOptions::default(),
        }
    }

    fn pipeline() -> GenerationPipeline<EchoGenerator> {
        GenerationPipeline::new(EchoGenerator).with_retry(RetryPolicy::immediate())
    }

    #[test]
    fn test_happy_path_write_aligns_with_rows() {
        let sheet = FakeSheet::default()
            .with_range("Sheet1!A1:B1", &[&["Name", "Desc"]])
            .with_range("Sheet1!A2:B4", &[&["Shoe", "Comfy"], &["Hat"], &["Mug", "Blue"]]);

        let report =
            run_sheet_generation(&sheet, &sheet, &pipeline(), &job("Sheet1!A2:B4")).unwrap();

        assert_eq!(report.header_range, "Sheet1!A1:B1");
        assert_eq!(report.output_range, "Sheet1!E2:E4");
        assert_eq!(report.results.len(), 3);

        let writes = sheet.writes.borrow();
        assert_eq!(writes.len(), 1, "exactly one write after the full batch");
        let (range, rows) = &writes[0];
        assert_eq!(range, "Sheet1!E2:E4");
        assert_eq!(
            rows,
            &vec![
                vec!["Ad for Shoe".to_string()],
                vec!["Ad for Hat".to_string()],
                vec!["Ad for Mug".to_string()],
            ]
        );
    }

    #[test]
    fn test_invalid_data_range_performs_no_io() {
        let sheet = FakeSheet::default();
        let err = run_sheet_generation(&sheet, &sheet, &pipeline(), &job("A2D100")).unwrap_err();
        assert!(matches!(err, JobError::Range(RangeError::InvalidRangeFormat(_))));
        assert_eq!(sheet.io_count(), 0);
    }

    #[test]
    fn test_invalid_header_row_performs_no_io() {
        let sheet = FakeSheet::default();
        let mut j = job("Sheet1!A2:B4");
        j.header_row = 0;
        let err = run_sheet_generation(&sheet, &sheet, &pipeline(), &j).unwrap_err();
        assert_eq!(err, JobError::Range(RangeError::InvalidHeaderRow(0)));
        assert_eq!(sheet.io_count(), 0);
    }

    #[test]
    fn test_invalid_output_column_performs_no_io() {
        let sheet = FakeSheet::default();
        let mut j = job("Sheet1!A2:B4");
        j.output_column = "E2".into();
        let err = run_sheet_generation(&sheet, &sheet, &pipeline(), &j).unwrap_err();
        assert!(matches!(err, JobError::Range(RangeError::InvalidColumnFormat(_))));
        assert_eq!(sheet.io_count(), 0);
    }

    #[test]
    fn test_column_only_data_range_performs_no_io() {
        // A:B parses and yields a valid header range, but without a start
        // row there is nowhere to anchor the output range. That must
        // surface before any read, not after the batch has run.
        let sheet = FakeSheet::default()
            .with_range("Sheet1!A1:B1", &[&["Name", "Desc"]])
            .with_range("Sheet1!A:B", &[&["Shoe", "Comfy"]]);

        let err =
            run_sheet_generation(&sheet, &sheet, &pipeline(), &job("Sheet1!A:B")).unwrap_err();
        assert!(matches!(err, JobError::Range(RangeError::MissingStartRow(_))));
        assert_eq!(sheet.io_count(), 0);
    }

    #[test]
    fn test_empty_header_range_fails() {
        let sheet = FakeSheet::default()
            .with_range("Sheet1!A2:B4", &[&["Shoe", "Comfy"]]);
        let err =
            run_sheet_generation(&sheet, &sheet, &pipeline(), &job("Sheet1!A2:B4")).unwrap_err();
        assert_eq!(err, JobError::EmptyRange("Sheet1!A1:B1".into()));
        assert!(sheet.writes.borrow().is_empty());
    }

    #[test]
    fn test_empty_data_range_fails_without_write() {
        let sheet = FakeSheet::default().with_range("Sheet1!A1:B1", &[&["Name", "Desc"]]);
        let err =
            run_sheet_generation(&sheet, &sheet, &pipeline(), &job("Sheet1!A2:B4")).unwrap_err();
        assert_eq!(err, JobError::EmptyRange("Sheet1!A2:B4".into()));
        assert!(sheet.writes.borrow().is_empty());
    }

    #[test]
    fn test_failed_rows_still_written_as_fallback_in_place() {
        // Second row is unknown to the generator and degrades to the
        // fallback ad, in position, without aborting the batch.
        let sheet = FakeSheet::default()
            .with_range("Sheet1!A1:B1", &[&["Name", "Desc"]])
            .with_range("Sheet1!A2:B4", &[&["Shoe"], &["Teapot"], &["Mug"]]);

        let report =
            run_sheet_generation(&sheet, &sheet, &pipeline(), &job("Sheet1!A2:B4")).unwrap();

        let writes = sheet.writes.borrow();
        let (_, rows) = &writes[0];
        assert_eq!(rows[0][0], "Ad for Shoe");
        assert_eq!(rows[1][0], crate::pipeline::AD_TEXT_FALLBACK);
        assert_eq!(rows[2][0], "Ad for Mug");
        assert!(report.results[1]
            .rationale
            .contains("unknown product"));
    }
}
