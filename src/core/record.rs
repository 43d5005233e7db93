//! Purpose: Flat, caller-owned sentence/word records and their lifecycle.
//! Exports: `WordRecord`, `SentenceRecord`, `word_count`, `copy_word_at`.
//! Role: Deep-copy target for the internal `Sentence` graph; the unit handed across the C ABI.
//! Invariants: Layout is `#[repr(C)]` and mirrors `include/udbridge.h`.
//! Invariants: Every text field is null or a buffer owned by the record (see `transfer`).
//! Invariants: `word_count == 0` implies `words` is null; a zeroed record drops as a no-op.
//! Invariants: `words[0]` is the first token; no synthetic root record is stored.
//! Notes: `Drop` releases owned buffers, so partially built records clean up on `?`.
use std::os::raw::c_char;
use std::ptr;

use crate::core::error::{Error, ErrorKind};
use crate::core::model::{Sentence, Word};
use crate::core::transfer::{borrow_str, release, transfer};

#[repr(C)]
#[derive(Debug)]
pub struct WordRecord {
    id: i32,
    form: *mut c_char,
    lemma: *mut c_char,
    upostag: *mut c_char,
    xpostag: *mut c_char,
    feats: *mut c_char,
    head: i32,
    deprel: *mut c_char,
    deps: *mut c_char,
    misc: *mut c_char,
}

// Records exclusively own their buffers.
unsafe impl Send for WordRecord {}

impl WordRecord {
    pub const fn empty() -> Self {
        Self {
            id: 0,
            form: ptr::null_mut(),
            lemma: ptr::null_mut(),
            upostag: ptr::null_mut(),
            xpostag: ptr::null_mut(),
            feats: ptr::null_mut(),
            head: 0,
            deprel: ptr::null_mut(),
            deps: ptr::null_mut(),
            misc: ptr::null_mut(),
        }
    }

    pub fn from_word(word: &Word) -> Result<Self, Error> {
        let mut record = Self::empty();
        record.id = word.id;
        record.head = word.head;
        record.form = transfer(&word.form)?;
        record.lemma = transfer(&word.lemma)?;
        record.upostag = transfer(&word.upostag)?;
        record.xpostag = transfer(&word.xpostag)?;
        record.feats = transfer(&word.feats)?;
        record.deprel = transfer(&word.deprel)?;
        record.deps = transfer(&word.deps)?;
        record.misc = transfer(&word.misc)?;
        Ok(record)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn head(&self) -> i32 {
        self.head
    }

    pub fn form(&self) -> Option<&str> {
        unsafe { borrow_str(self.form) }
    }

    pub fn lemma(&self) -> Option<&str> {
        unsafe { borrow_str(self.lemma) }
    }

    pub fn upostag(&self) -> Option<&str> {
        unsafe { borrow_str(self.upostag) }
    }

    pub fn xpostag(&self) -> Option<&str> {
        unsafe { borrow_str(self.xpostag) }
    }

    pub fn feats(&self) -> Option<&str> {
        unsafe { borrow_str(self.feats) }
    }

    pub fn deprel(&self) -> Option<&str> {
        unsafe { borrow_str(self.deprel) }
    }

    pub fn deps(&self) -> Option<&str> {
        unsafe { borrow_str(self.deps) }
    }

    pub fn misc(&self) -> Option<&str> {
        unsafe { borrow_str(self.misc) }
    }

    /// Releases every text field and nulls it; scalar fields are reset to 0.
    pub fn clear(&mut self) {
        for field in self.text_fields_mut() {
            unsafe { release(*field) };
            *field = ptr::null_mut();
        }
        self.id = 0;
        self.head = 0;
    }

    fn text_fields(&self) -> [Option<&str>; 8] {
        [
            self.form(),
            self.lemma(),
            self.upostag(),
            self.xpostag(),
            self.feats(),
            self.deprel(),
            self.deps(),
            self.misc(),
        ]
    }

    fn text_fields_mut(&mut self) -> [&mut *mut c_char; 8] {
        [
            &mut self.form,
            &mut self.lemma,
            &mut self.upostag,
            &mut self.xpostag,
            &mut self.feats,
            &mut self.deprel,
            &mut self.deps,
            &mut self.misc,
        ]
    }
}

impl Default for WordRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for WordRecord {
    fn drop(&mut self) {
        self.clear();
    }
}

// Compares field contents, never buffer addresses.
impl PartialEq for WordRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.head == other.head
            && self.text_fields() == other.text_fields()
    }
}

impl Eq for WordRecord {}

#[repr(C)]
#[derive(Debug)]
pub struct SentenceRecord {
    words: *mut WordRecord,
    word_count: usize,
    text: *mut c_char,
}

unsafe impl Send for SentenceRecord {}

impl SentenceRecord {
    pub const fn empty() -> Self {
        Self {
            words: ptr::null_mut(),
            word_count: 0,
            text: ptr::null_mut(),
        }
    }

    /// Deep-copies `sentence` and the original input `text` into one owned record.
    ///
    /// On failure everything allocated so far is released before the error is returned.
    pub fn from_sentence(sentence: &Sentence, text: &str) -> Result<Self, Error> {
        let mut words = Vec::new();
        words.try_reserve_exact(sentence.word_count()).map_err(|err| {
            Error::new(ErrorKind::OutOfMemory)
                .with_message("failed to allocate word array")
                .with_source(err)
        })?;
        for word in &sentence.words {
            words.push(WordRecord::from_word(word)?);
        }
        let text = transfer(text)?;
        Ok(Self::from_parts(words, text))
    }

    fn from_parts(words: Vec<WordRecord>, text: *mut c_char) -> Self {
        if words.is_empty() {
            return Self {
                words: ptr::null_mut(),
                word_count: 0,
                text,
            };
        }
        let mut words = words.into_boxed_slice();
        let word_count = words.len();
        let data = words.as_mut_ptr();
        std::mem::forget(words);
        Self {
            words: data,
            word_count,
            text,
        }
    }

    pub fn words(&self) -> &[WordRecord] {
        if self.words.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.words, self.word_count) }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn text(&self) -> Option<&str> {
        unsafe { borrow_str(self.text) }
    }

    fn release_fields(&mut self) {
        if !self.words.is_null() {
            unsafe {
                drop(Vec::from_raw_parts(
                    self.words,
                    self.word_count,
                    self.word_count,
                ));
            }
        }
        unsafe { release(self.text) };
        self.words = ptr::null_mut();
        self.word_count = 0;
        self.text = ptr::null_mut();
    }
}

impl Default for SentenceRecord {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for SentenceRecord {
    fn drop(&mut self) {
        self.release_fields();
    }
}

impl PartialEq for SentenceRecord {
    fn eq(&self, other: &Self) -> bool {
        self.text() == other.text() && self.words() == other.words()
    }
}

impl Eq for SentenceRecord {}

pub fn word_count(sentence: &Sentence) -> usize {
    sentence.word_count()
}

/// Copies the word at `index` into a fresh record; each call owns new buffers.
pub fn copy_word_at(sentence: &Sentence, index: usize) -> Result<WordRecord, Error> {
    let word = sentence.words.get(index).ok_or_else(|| {
        Error::new(ErrorKind::InvalidArgument).with_message(format!(
            "word index {index} out of range for sentence of {} words",
            sentence.word_count()
        ))
    })?;
    WordRecord::from_word(word)
}

#[cfg(test)]
mod tests {
    use super::{SentenceRecord, WordRecord, copy_word_at, word_count};
    use crate::core::error::ErrorKind;
    use crate::core::model::Sentence;

    fn sample() -> Sentence {
        let mut sentence = Sentence::new();
        let word = sentence.add_word("Cats");
        word.lemma = "cat".to_string();
        word.upostag = "NOUN".to_string();
        word.feats = "Number=Plur".to_string();
        word.head = 2;
        word.deprel = "nsubj".to_string();
        let word = sentence.add_word("purr");
        word.lemma = "purr".to_string();
        word.upostag = "VERB".to_string();
        word.deprel = "root".to_string();
        sentence
    }

    #[test]
    fn zeroed_record_drops_cleanly() {
        let record = SentenceRecord::empty();
        assert!(record.is_empty());
        assert!(record.words().is_empty());
        assert_eq!(record.text(), None);
        drop(record);
    }

    #[test]
    fn conversion_copies_every_field() {
        let sentence = sample();
        let record = SentenceRecord::from_sentence(&sentence, "Cats purr").expect("record");

        assert_eq!(record.word_count(), 2);
        assert_eq!(record.words().len(), 2);
        assert_eq!(record.text(), Some("Cats purr"));

        let first = &record.words()[0];
        assert_eq!(first.id(), 1);
        assert_eq!(first.form(), Some("Cats"));
        assert_eq!(first.lemma(), Some("cat"));
        assert_eq!(first.upostag(), Some("NOUN"));
        assert_eq!(first.xpostag(), None);
        assert_eq!(first.feats(), Some("Number=Plur"));
        assert_eq!(first.head(), 2);
        assert_eq!(first.deprel(), Some("nsubj"));
        assert_eq!(first.deps(), None);
        assert_eq!(first.misc(), None);
    }

    #[test]
    fn empty_sentence_has_no_word_array() {
        let record = SentenceRecord::from_sentence(&Sentence::new(), "x").expect("record");
        assert_eq!(record.word_count(), 0);
        assert!(record.words().is_empty());
        assert_eq!(record.text(), Some("x"));
    }

    #[test]
    fn failed_conversion_reports_error() {
        let mut sentence = sample();
        sentence.words[1].misc = "bad\0misc".to_string();
        let err = SentenceRecord::from_sentence(&sentence, "Cats purr").expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::UnknownFailure);
    }

    #[test]
    fn copied_words_never_alias() {
        let sentence = sample();
        let first = copy_word_at(&sentence, 0).expect("copy");
        let second = copy_word_at(&sentence, 0).expect("copy");
        assert_eq!(first, second);
        assert_ne!(
            first.form().map(str::as_ptr),
            second.form().map(str::as_ptr)
        );
    }

    #[test]
    fn out_of_range_copy_fails() {
        let sentence = sample();
        assert_eq!(word_count(&sentence), 2);
        let err = copy_word_at(&sentence, 2).expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn clear_resets_word() {
        let sentence = sample();
        let mut word = copy_word_at(&sentence, 0).expect("copy");
        word.clear();
        assert_eq!(word, WordRecord::empty());
        word.clear();
    }
}
