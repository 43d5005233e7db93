//! Purpose: C ABI bridge for foreign callers (libudbridge).
//! Exports: C-callable model/record/sentence functions and error-message helpers.
//! Role: Stable ABI surface mirrored by `include/udbridge.h`.
//! Invariants: Opaque model/sentence handles; flat `#[repr(C)]` records; explicit free functions.
//! Invariants: Return 1 on success, 0 on failure; `*out_err` is written only on failure.
//! Invariants: Every pointer written to an out-parameter is exclusively caller-owned.
//! Notes: One model handle may serve several threads only if the wrapped model allows it.
#![allow(non_camel_case_types)]

use libc::{c_char, c_int};
use std::ptr;

use crate::api::ModelHandle;
use crate::core::error::{Error, ErrorKind};
use crate::core::model::Sentence;
use crate::core::pipeline;
use crate::core::record::{self, SentenceRecord, WordRecord};
use crate::core::transfer;

const UDB_OK: c_int = 1;
const UDB_FAILED: c_int = 0;

#[repr(C)]
pub struct udb_model {
    pub(crate) handle: ModelHandle,
}

#[repr(C)]
pub struct udb_sentence {
    sentence: Sentence,
}

pub type udb_word = WordRecord;
pub type udb_sentence_record = SentenceRecord;

#[unsafe(no_mangle)]
pub extern "C" fn udb_model_new_rule_based() -> *mut udb_model {
    ModelHandle::rule_based().into_raw()
}

#[unsafe(no_mangle)]
pub extern "C" fn udb_model_free(model: *mut udb_model) {
    if model.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(model));
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn udb_sentence_record_create() -> *mut udb_sentence_record {
    Box::into_raw(Box::new(SentenceRecord::empty()))
}

/// Releases every word, every text buffer, then the record itself.
#[unsafe(no_mangle)]
pub extern "C" fn udb_sentence_record_destroy(record: *mut udb_sentence_record) {
    if record.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(record));
    }
}

/// Tokenizes, tags and parses `text`, then stores the result in `result`.
///
/// On success any previous contents of `result` are released first.
#[unsafe(no_mangle)]
pub extern "C" fn udb_process(
    model: *const udb_model,
    text: *const c_char,
    result: *mut udb_sentence_record,
    out_err: *mut *mut c_char,
) -> c_int {
    let model = match borrow_model(model, out_err) {
        Ok(model) => model,
        Err(code) => return code,
    };
    if result.is_null() {
        return fail(
            out_err,
            Error::new(ErrorKind::InvalidArgument).with_message("result is null"),
        );
    }
    let text = match parse_text(text, out_err) {
        Ok(text) => text,
        Err(code) => return code,
    };
    let record = match pipeline::process(model.handle.model(), text) {
        Ok(record) => record,
        Err(err) => return fail(out_err, err),
    };
    unsafe {
        *result = record;
    }
    UDB_OK
}

/// Runs the pipeline but keeps the internal sentence behind an opaque handle.
#[unsafe(no_mangle)]
pub extern "C" fn udb_analyze(
    model: *const udb_model,
    text: *const c_char,
    out_sentence: *mut *mut udb_sentence,
    out_err: *mut *mut c_char,
) -> c_int {
    let model = match borrow_model(model, out_err) {
        Ok(model) => model,
        Err(code) => return code,
    };
    if out_sentence.is_null() {
        return fail(
            out_err,
            Error::new(ErrorKind::InvalidArgument).with_message("out_sentence is null"),
        );
    }
    let text = match parse_text(text, out_err) {
        Ok(text) => text,
        Err(code) => return code,
    };
    let sentence = match pipeline::analyze(model.handle.model(), text) {
        Ok(sentence) => sentence,
        Err(err) => return fail(out_err, err),
    };
    let handle = Box::new(udb_sentence { sentence });
    unsafe {
        *out_sentence = Box::into_raw(handle);
    }
    UDB_OK
}

#[unsafe(no_mangle)]
pub extern "C" fn udb_sentence_free(sentence: *mut udb_sentence) {
    if sentence.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(sentence));
    }
}

/// Number of words in an analyzed sentence; 0 for a null handle.
#[unsafe(no_mangle)]
pub extern "C" fn udb_sentence_word_count(sentence: *const udb_sentence) -> usize {
    if sentence.is_null() {
        return 0;
    }
    let sentence = unsafe { &*sentence };
    record::word_count(&sentence.sentence)
}

/// Copies word `index` into `out_word` with freshly owned text fields.
///
/// `out_word` is overwritten without being released; pair each success with `udb_word_clear`.
/// On failure `out_word` is left untouched.
#[unsafe(no_mangle)]
pub extern "C" fn udb_sentence_copy_word(
    sentence: *const udb_sentence,
    index: usize,
    out_word: *mut udb_word,
) -> c_int {
    if sentence.is_null() || out_word.is_null() {
        return UDB_FAILED;
    }
    let sentence = unsafe { &*sentence };
    match record::copy_word_at(&sentence.sentence, index) {
        Ok(word) => {
            unsafe {
                ptr::write(out_word, word);
            }
            UDB_OK
        }
        Err(err) => {
            tracing::debug!(kind = ?err.kind(), "copy word failed: {err}");
            UDB_FAILED
        }
    }
}

/// Releases the text fields of a word filled by `udb_sentence_copy_word`. Safe on zeroed words.
#[unsafe(no_mangle)]
pub extern "C" fn udb_word_clear(word: *mut udb_word) {
    if word.is_null() {
        return;
    }
    unsafe {
        (*word).clear();
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn udb_error_message_free(message: *mut c_char) {
    unsafe {
        transfer::release(message);
    }
}

fn borrow_model<'a>(
    model: *const udb_model,
    out_err: *mut *mut c_char,
) -> Result<&'a udb_model, c_int> {
    if model.is_null() {
        return Err(fail(
            out_err,
            Error::new(ErrorKind::InvalidArgument).with_message("model is null"),
        ));
    }
    unsafe { Ok(&*model) }
}

fn parse_text<'a>(input: *const c_char, out_err: *mut *mut c_char) -> Result<&'a str, c_int> {
    let text = unsafe { transfer::borrow_str(input) };
    match text {
        Some(text) if !text.is_empty() => Ok(text),
        Some(_) => Err(fail(
            out_err,
            Error::new(ErrorKind::InvalidArgument).with_message("text is empty"),
        )),
        None if input.is_null() => Err(fail(
            out_err,
            Error::new(ErrorKind::InvalidArgument).with_message("text is null"),
        )),
        None => Err(fail(
            out_err,
            Error::new(ErrorKind::InvalidArgument).with_message("text is not valid UTF-8"),
        )),
    }
}

/// Writes an owned message for `err`; NUL bytes from model-supplied text become U+FFFD.
fn fail(out_err: *mut *mut c_char, err: Error) -> c_int {
    if out_err.is_null() {
        return UDB_FAILED;
    }
    let text = err.to_string().replace('\0', "\u{FFFD}");
    let message = transfer::transfer(&text).unwrap_or(ptr::null_mut());
    unsafe {
        *out_err = message;
    }
    UDB_FAILED
}
