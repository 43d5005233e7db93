//! Purpose: Drive tokenize -> tag -> parse against a `LanguageModel` and convert the result.
//! Exports: `PipelineOptions`, `analyze`, `analyze_with`, `process`, `process_with`.
//! Role: The single place stage failures become `Error` values.
//! Invariants: Stages run strictly in order, once each; the first failure aborts the call.
//! Invariants: No stage is retried; a failed call leaves no record behind.
//! Invariants: Panics raised inside a model are caught and reported as `UnknownFailure`.
//! Notes: Only the first sentence of the input is analyzed; the record keeps the full input text.
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::core::error::{Error, ErrorKind};
use crate::core::model::{DEFAULT_MODE, LanguageModel, Sentence, TokenizerMode};
use crate::core::record::SentenceRecord;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineOptions {
    pub tokenizer: TokenizerMode,
    pub tagger_mode: String,
    pub parser_mode: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerMode::NormalizedSpaces,
            tagger_mode: DEFAULT_MODE.to_string(),
            parser_mode: DEFAULT_MODE.to_string(),
        }
    }
}

pub fn analyze(model: &dyn LanguageModel, text: &str) -> Result<Sentence, Error> {
    analyze_with(model, text, &PipelineOptions::default())
}

/// Runs the three stages and returns the internal sentence without converting it.
pub fn analyze_with(
    model: &dyn LanguageModel,
    text: &str,
    options: &PipelineOptions,
) -> Result<Sentence, Error> {
    if text.is_empty() {
        return Err(Error::new(ErrorKind::InvalidArgument).with_message("text is empty"));
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_stages(model, text, options)))
        .unwrap_or_else(|payload| {
            Err(Error::new(ErrorKind::UnknownFailure).with_message(panic_message(payload.as_ref())))
        });
    if let Err(err) = &outcome {
        tracing::warn!(kind = ?err.kind(), "pipeline failed: {err}");
    }
    outcome
}

pub fn process(model: &dyn LanguageModel, text: &str) -> Result<SentenceRecord, Error> {
    process_with(model, text, &PipelineOptions::default())
}

/// Analyzes `text` and deep-copies the result into a caller-owned record.
pub fn process_with(
    model: &dyn LanguageModel,
    text: &str,
    options: &PipelineOptions,
) -> Result<SentenceRecord, Error> {
    let sentence = analyze_with(model, text, options)?;
    let record = SentenceRecord::from_sentence(&sentence, text)?;
    tracing::debug!(words = record.word_count(), "sentence record populated");
    Ok(record)
}

fn run_stages(
    model: &dyn LanguageModel,
    text: &str,
    options: &PipelineOptions,
) -> Result<Sentence, Error> {
    let mut tokenizer = model
        .new_tokenizer(options.tokenizer)
        .ok_or_else(|| Error::new(ErrorKind::TokenizerCreationFailed))?;
    tokenizer.set_text(text);

    let mut sentence = Sentence::new();
    match tokenizer.next_sentence(&mut sentence) {
        Ok(true) => {}
        Ok(false) => return Err(Error::new(ErrorKind::NoSentenceFound)),
        Err(detail) => return Err(Error::new(ErrorKind::NoSentenceFound).with_detail(&detail)),
    }
    tracing::debug!(words = sentence.word_count(), mode = ?options.tokenizer, "tokenized");

    model
        .tag(&mut sentence, &options.tagger_mode)
        .map_err(|detail| Error::new(ErrorKind::TaggingFailed).with_detail(&detail))?;
    tracing::debug!(mode = %options.tagger_mode, "tagged");

    model
        .parse(&mut sentence, &options.parser_mode)
        .map_err(|detail| Error::new(ErrorKind::ParsingFailed).with_detail(&detail))?;
    tracing::debug!(mode = %options.parser_mode, "parsed");

    Ok(sentence)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("model panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("model panicked: {message}")
    } else {
        "model panicked".to_string()
    }
}
