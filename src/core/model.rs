//! Purpose: The seam an external language model plugs into, plus the internal sentence graph.
//! Exports: `LanguageModel`, `Tokenizer`, `TokenizerMode`, `Sentence`, `Word`, `DEFAULT_MODE`.
//! Role: Everything the pipeline needs from a model; nothing about how the model works.
//! Invariants: Word ids are 1-based; head 0 denotes the dependency root.
//! Invariants: No synthetic root word is stored; `words[0]` is the first token.
//! Invariants: Empty text fields mean "absent" (CoNLL-U `_`).
//! Notes: Models report failures as plain text; an empty string means "no detail".

/// Mode string selecting a model's default tagger/parser configuration.
pub const DEFAULT_MODE: &str = "DEFAULT";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TokenizerMode {
    /// Segment on the model's own rules; record spacing as normalized `SpaceAfter=No`.
    #[default]
    NormalizedSpaces,
    /// Like `NormalizedSpaces`, plus `TokenRange=start:end` byte offsets in `misc`.
    Ranges,
    /// Every input line is one sentence.
    Presegmented,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Word {
    pub id: i32,
    pub form: String,
    pub lemma: String,
    pub upostag: String,
    pub xpostag: String,
    pub feats: String,
    pub head: i32,
    pub deprel: String,
    pub deps: String,
    pub misc: String,
}

impl Word {
    pub fn new(id: i32, form: impl Into<String>) -> Self {
        Self {
            id,
            form: form.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Sentence {
    pub words: Vec<Word>,
}

impl Sentence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Appends a word with the next 1-based id and returns it for further annotation.
    pub fn add_word(&mut self, form: impl Into<String>) -> &mut Word {
        let id = self.words.len() as i32 + 1;
        self.words.push(Word::new(id, form));
        let last = self.words.len() - 1;
        &mut self.words[last]
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}

/// Splits text into sentences of tokens. Created per call by [`LanguageModel::new_tokenizer`].
pub trait Tokenizer {
    fn set_text(&mut self, text: &str);

    /// Fills `sentence` with the next sentence. `Ok(false)` means the input is exhausted.
    fn next_sentence(&mut self, sentence: &mut Sentence) -> Result<bool, String>;
}

/// An external tokenize/tag/parse model.
///
/// Implementations take `&self`; sharing one model across threads is only as
/// safe as the implementation makes it; the pipeline adds no locking.
pub trait LanguageModel {
    fn new_tokenizer(&self, mode: TokenizerMode) -> Option<Box<dyn Tokenizer + '_>>;

    fn tag(&self, sentence: &mut Sentence, mode: &str) -> Result<(), String>;

    fn parse(&self, sentence: &mut Sentence, mode: &str) -> Result<(), String>;
}

#[cfg(test)]
mod tests {
    use super::Sentence;

    #[test]
    fn add_word_assigns_one_based_ids() {
        let mut sentence = Sentence::new();
        sentence.add_word("The").lemma = "the".to_string();
        sentence.add_word("cat");

        assert_eq!(sentence.word_count(), 2);
        assert_eq!(sentence.words[0].id, 1);
        assert_eq!(sentence.words[0].lemma, "the");
        assert_eq!(sentence.words[1].id, 2);
        assert_eq!(sentence.words[1].head, 0);

        sentence.clear();
        assert!(sentence.is_empty());
    }
}
