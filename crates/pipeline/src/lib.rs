//! Batch ad-copy generation for spreadsheet rows.
//!
//! The pipeline turns header and data rows read from a sheet into ordered
//! [`RowRecord`]s, invokes a [`TextGenerator`] per record with bounded
//! retry, and yields exactly one [`AdCopy`] per input row, in input order.
//! Positional correspondence is the only correctness guarantee available
//! at this stage (there is no durable per-row identifier), so nothing in
//! here may reorder, drop, or abort a batch: every failure degrades to a
//! per-row fallback pair instead.
//!
//! External collaborators are trait seams: [`TextGenerator`] for the model
//! call, [`SheetReader`]/[`SheetWriter`] for the spreadsheet. Substituting
//! fakes makes the whole read-generate-write flow testable offline.

pub mod job;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod retry;
pub mod sheet_io;

pub use job::{run_sheet_generation, GenerationJob, JobError, JobReport};
pub use pipeline::{
    AdCopy, GenerateError, GenerationOptions, GenerationPipeline, TextGenerator,
    AD_TEXT_FALLBACK, RATIONALE_FALLBACK,
};
pub use prompt::{PromptTemplate, RESPONSE_SEPARATOR};
pub use record::{build_records, RowRecord};
pub use retry::RetryPolicy;
pub use sheet_io::{SheetError, SheetReader, SheetWriter};
