//! The per-record generation call and its batch driver.
//!
//! `generate_one` never returns an error: every failure mode collapses to
//! a well-formed [`AdCopy`] so that one bad row can neither abort nor
//! reorder the batch. `generate_batch` therefore upholds its postcondition
//! unconditionally: output length equals input length, in input order.

use std::path::Path;
use std::thread;

use log::{error, info, warn};

use crate::prompt::{PromptTemplate, RESPONSE_SEPARATOR};
use crate::record::RowRecord;
use crate::retry::RetryPolicy;

/// Ad text substituted when generation cannot succeed for a row.
pub const AD_TEXT_FALLBACK: &str =
    "Could not generate ad text. Please check product details or try again later.";

/// Rationale substituted when the model supplies none.
pub const RATIONALE_FALLBACK: &str = "No reference strategy available.";

/// Failure classification for a single model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// Network error, timeout, 429 or 5xx. Worth retrying.
    Transient(String),
    /// The prompt or response tripped a content-safety block. Terminal.
    Blocked(String),
    /// The model finished for a reason other than a normal stop. Terminal.
    Abnormal(String),
    /// Anything else. Terminal.
    Failed(String),
}

impl std::fmt::Display for GenerateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateError::Transient(msg) => write!(f, "transient error: {}", msg),
            GenerateError::Blocked(reason) => write!(f, "safety block: {}", reason),
            GenerateError::Abnormal(reason) => write!(f, "abnormal completion: {}", reason),
            GenerateError::Failed(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GenerateError {}

/// The opaque model call. Implementations classify their own failures;
/// the pipeline decides retry behavior from the variant alone.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// One generation result. Always present for every input record; on
/// unrecoverable error the pair is the fallback pair, never absent.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct AdCopy {
    pub ad_text: String,
    pub rationale: String,
}

impl AdCopy {
    fn fallback() -> Self {
        Self {
            ad_text: AD_TEXT_FALLBACK.to_string(),
            rationale: RATIONALE_FALLBACK.to_string(),
        }
    }
}

/// Knobs forwarded into the prompt, one set per batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub tone: String,
    pub max_length: u32,
    pub platform: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            tone: "Professional".to_string(),
            max_length: 150,
            platform: "Facebook".to_string(),
        }
    }
}

/// Drives one [`TextGenerator`] over a batch of records.
///
/// The generator and template are injected, not reached through globals,
/// so tests substitute fakes freely.
pub struct GenerationPipeline<G> {
    generator: G,
    template: Option<PromptTemplate>,
    retry: RetryPolicy,
}

impl<G: TextGenerator> GenerationPipeline<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            template: Some(PromptTemplate::builtin()),
            retry: RetryPolicy::default(),
        }
    }

    /// Use a template override from disk. A failed load is remembered and
    /// surfaces per row as the fallback pair, not as a pipeline error.
    pub fn with_template_file(mut self, path: &Path) -> Self {
        match PromptTemplate::from_file(path) {
            Ok(template) => self.template = Some(template),
            Err(e) => {
                error!("Failed to load prompt template {}: {}", path.display(), e);
                self.template = None;
            }
        }
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Generate one ad for one record. Never fails; see the error ladder
    /// in the match below.
    pub fn generate_one(&self, record: &RowRecord, opts: &GenerationOptions) -> AdCopy {
        let name = record.display_name();

        let Some(template) = &self.template else {
            error!("Ad generation failed for {}: prompt template not available", name);
            return AdCopy::fallback();
        };

        let prompt = template.render(opts, &record.to_prompt_json());
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.generator.generate(&prompt) {
                Ok(raw) => {
                    let copy = split_response(&raw, name);
                    info!("Generated ad for {}: {}", name, copy.ad_text);
                    return copy;
                }
                Err(GenerateError::Transient(msg)) if attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay(attempt - 1);
                    warn!(
                        "Transient failure for {} (attempt {}/{}): {}; retrying in {:?}",
                        name, attempt, self.retry.max_attempts, msg, delay
                    );
                    thread::sleep(delay);
                }
                Err(GenerateError::Blocked(reason)) => {
                    error!("Prompt blocked for {}: {}", name, reason);
                    return AdCopy {
                        ad_text: format!("Ad generation blocked: {}", reason),
                        rationale: RATIONALE_FALLBACK.to_string(),
                    };
                }
                Err(GenerateError::Abnormal(reason)) => {
                    error!("Generation for {} finished abnormally: {}", name, reason);
                    return AdCopy {
                        ad_text: format!("Ad generation failed: {}", reason),
                        rationale: RATIONALE_FALLBACK.to_string(),
                    };
                }
                Err(e) => {
                    // Transient exhaustion or an unclassified failure.
                    error!("Ad generation failed for {}: {}", name, e);
                    return AdCopy {
                        ad_text: AD_TEXT_FALLBACK.to_string(),
                        rationale: format!("Error during generation: {}", e),
                    };
                }
            }
        }
    }

    /// Generate one result per record, strictly in input order.
    /// Postcondition: `out.len() == records.len()`, always.
    pub fn generate_batch(&self, records: &[RowRecord], opts: &GenerationOptions) -> Vec<AdCopy> {
        records
            .iter()
            .map(|record| self.generate_one(record, opts))
            .collect()
    }
}

/// Split a raw model response on the separator token. An absent separator
/// means the whole response is ad text; an empty response degrades to the
/// fallback pair.
fn split_response(raw: &str, name: &str) -> AdCopy {
    let text = raw.trim();
    if text.is_empty() {
        warn!("Empty response for {}; using fallback pair", name);
        return AdCopy::fallback();
    }

    match text.split_once(RESPONSE_SEPARATOR) {
        Some((ad, rationale)) => AdCopy {
            ad_text: ad.trim().to_string(),
            rationale: rationale.trim().to_string(),
        },
        None => {
            warn!("Response for {} did not contain separator; whole text used as ad", name);
            AdCopy {
                ad_text: text.to_string(),
                rationale: RATIONALE_FALLBACK.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::build_records;
    use std::cell::RefCell;

    /// Scripted generator: pops the next response per call and counts
    /// invocations.
    struct FakeGenerator {
        script: RefCell<Vec<Result<String, GenerateError>>>,
        calls: RefCell<u32>,
    }

    impl FakeGenerator {
        fn new(script: Vec<Result<String, GenerateError>>) -> Self {
            Self {
                script: RefCell::new(script),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.borrow()
        }
    }

    impl TextGenerator for FakeGenerator {
        fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
            *self.calls.borrow_mut() += 1;
            let mut script = self.script.borrow_mut();
            if script.is_empty() {
                Err(GenerateError::Failed("script exhausted".into()))
            } else {
                script.remove(0)
            }
        }
    }

    impl TextGenerator for &FakeGenerator {
        fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
            (*self).generate(prompt)
        }
    }

    fn record(name: &str) -> RowRecord {
        RowRecord::build(&["Name".to_string()], &[name.to_string()])
    }

    fn pipeline(gen: &FakeGenerator) -> GenerationPipeline<&FakeGenerator> {
        GenerationPipeline::new(gen).with_retry(RetryPolicy::immediate())
    }

    #[test]
    fn test_separator_splits_ad_and_rationale() {
        let gen = FakeGenerator::new(vec![Ok(format!(
            "Buy the hat.\n{}\nScarcity angle for commuters.",
            RESPONSE_SEPARATOR
        ))]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(copy.ad_text, "Buy the hat.");
        assert_eq!(copy.rationale, "Scarcity angle for commuters.");
    }

    #[test]
    fn test_missing_separator_uses_whole_text() {
        let gen = FakeGenerator::new(vec![Ok("Just the ad.".to_string())]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(copy.ad_text, "Just the ad.");
        assert_eq!(copy.rationale, RATIONALE_FALLBACK);
    }

    #[test]
    fn test_empty_response_falls_back() {
        let gen = FakeGenerator::new(vec![Ok("   \n".to_string())]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(copy.ad_text, AD_TEXT_FALLBACK);
        assert_eq!(copy.rationale, RATIONALE_FALLBACK);
    }

    #[test]
    fn test_transient_retried_then_succeeds() {
        let gen = FakeGenerator::new(vec![
            Err(GenerateError::Transient("503".into())),
            Ok("Recovered ad.".to_string()),
        ]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(copy.ad_text, "Recovered ad.");
        assert_eq!(gen.calls(), 2);
    }

    #[test]
    fn test_transient_exhaustion_falls_back_after_three_attempts() {
        let gen = FakeGenerator::new(vec![
            Err(GenerateError::Transient("timeout".into())),
            Err(GenerateError::Transient("timeout".into())),
            Err(GenerateError::Transient("timeout".into())),
        ]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(gen.calls(), 3);
        assert_eq!(copy.ad_text, AD_TEXT_FALLBACK);
        assert!(copy.rationale.starts_with("Error during generation:"), "{}", copy.rationale);
        assert!(copy.rationale.contains("timeout"));
    }

    #[test]
    fn test_blocked_is_not_retried() {
        let gen = FakeGenerator::new(vec![Err(GenerateError::Blocked("HARASSMENT".into()))]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(gen.calls(), 1);
        assert_eq!(copy.ad_text, "Ad generation blocked: HARASSMENT");
        assert_eq!(copy.rationale, RATIONALE_FALLBACK);
    }

    #[test]
    fn test_abnormal_finish_is_not_retried() {
        let gen = FakeGenerator::new(vec![Err(GenerateError::Abnormal("MAX_TOKENS".into()))]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(gen.calls(), 1);
        assert_eq!(copy.ad_text, "Ad generation failed: MAX_TOKENS");
    }

    #[test]
    fn test_unclassified_failure_folds_detail_into_rationale() {
        let gen = FakeGenerator::new(vec![Err(GenerateError::Failed("boom".into()))]);
        let copy = pipeline(&gen).generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(copy.ad_text, AD_TEXT_FALLBACK);
        assert_eq!(copy.rationale, "Error during generation: boom");
    }

    #[test]
    fn test_missing_template_falls_back_without_calling_model() {
        let gen = FakeGenerator::new(vec![Ok("never used".to_string())]);
        let p = pipeline(&gen).with_template_file(std::path::Path::new("/nonexistent/t.txt"));
        let copy = p.generate_one(&record("Hat"), &GenerationOptions::default());
        assert_eq!(copy.ad_text, AD_TEXT_FALLBACK);
        assert_eq!(gen.calls(), 0);
    }

    #[test]
    fn test_batch_preserves_order_and_length() {
        let gen = FakeGenerator::new(vec![
            Ok("ad one".to_string()),
            Err(GenerateError::Blocked("SAFETY".into())),
            Ok("ad three".to_string()),
        ]);
        let headers = vec!["Name".to_string()];
        let rows = vec![
            vec!["one".to_string()],
            vec!["two".to_string()],
            vec!["three".to_string()],
        ];
        let records = build_records(&headers, &rows);

        let results = pipeline(&gen).generate_batch(&records, &GenerationOptions::default());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].ad_text, "ad one");
        assert_eq!(results[1].ad_text, "Ad generation blocked: SAFETY");
        assert_eq!(results[2].ad_text, "ad three");
    }

    #[test]
    fn test_batch_all_failures_still_full_length() {
        let gen = FakeGenerator::new(vec![]); // every call fails unclassified
        let headers = vec!["Name".to_string()];
        let rows: Vec<Vec<String>> = (0..5).map(|i| vec![format!("p{}", i)]).collect();
        let records = build_records(&headers, &rows);

        let results = pipeline(&gen).generate_batch(&records, &GenerationOptions::default());

        assert_eq!(results.len(), 5);
        for copy in &results {
            assert_eq!(copy.ad_text, AD_TEXT_FALLBACK);
        }
    }

    #[test]
    fn test_batch_empty_input() {
        let gen = FakeGenerator::new(vec![]);
        let results = pipeline(&gen).generate_batch(&[], &GenerationOptions::default());
        assert!(results.is_empty());
        assert_eq!(gen.calls(), 0);
    }
}
