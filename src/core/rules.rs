//! Purpose: Deterministic rule-based `LanguageModel`.
//! Role: Drives the boundary without a trained model.
//! Exports: `RuleModel`.
//! Role: Reference model for tests, the CLI, and C callers smoke-testing the ABI.
//! Invariants: Output is a pure function of input text and tokenizer mode.
//! Invariants: Tags follow UPOS with Penn-style XPOS; heads always form a tree rooted at 0.
//! Notes: Small closed-class lexicon plus suffix heuristics; not a linguistic model of record.
use crate::core::model::{DEFAULT_MODE, LanguageModel, Sentence, Tokenizer, TokenizerMode, Word};

#[derive(Clone, Copy, Debug, Default)]
pub struct RuleModel;

impl RuleModel {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageModel for RuleModel {
    fn new_tokenizer(&self, mode: TokenizerMode) -> Option<Box<dyn Tokenizer + '_>> {
        Some(Box::new(RuleTokenizer {
            mode,
            text: String::new(),
            pos: 0,
        }))
    }

    fn tag(&self, sentence: &mut Sentence, mode: &str) -> Result<(), String> {
        check_mode("tagger", mode)?;
        if sentence.is_empty() {
            return Err("cannot tag an empty sentence".to_string());
        }
        let mut previous = "";
        for (index, word) in sentence.words.iter_mut().enumerate() {
            tag_word(word, previous, index == 0);
            previous = upos_label(&word.upostag);
        }
        Ok(())
    }

    fn parse(&self, sentence: &mut Sentence, mode: &str) -> Result<(), String> {
        check_mode("parser", mode)?;
        if sentence.is_empty() {
            return Err("cannot parse an empty sentence".to_string());
        }
        if sentence.words.iter().any(|word| word.upostag.is_empty()) {
            return Err("sentence must be tagged before parsing".to_string());
        }
        attach(&mut sentence.words);
        Ok(())
    }
}

fn check_mode(stage: &str, mode: &str) -> Result<(), String> {
    if mode.is_empty() || mode == DEFAULT_MODE {
        Ok(())
    } else {
        Err(format!("unknown {stage} mode '{mode}'"))
    }
}

struct RuleTokenizer {
    mode: TokenizerMode,
    text: String,
    pos: usize,
}

impl Tokenizer for RuleTokenizer {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.pos = 0;
    }

    fn next_sentence(&mut self, sentence: &mut Sentence) -> Result<bool, String> {
        sentence.clear();
        let text = self.text.as_str();
        let presegmented = self.mode == TokenizerMode::Presegmented;

        loop {
            let rest = &text[self.pos..];
            let Some((skip, ch)) = rest.char_indices().find(|(_, ch)| !ch.is_whitespace()) else {
                self.pos = text.len();
                break;
            };
            if presegmented && !sentence.is_empty() && rest[..skip].contains('\n') {
                break;
            }

            let start = self.pos + skip;
            let end = start + token_len(&text[start..], ch);
            let form = &text[start..end];
            let next = text[end..].chars().next();

            let mut misc = Vec::new();
            if next.is_some_and(|next| !next.is_whitespace()) {
                misc.push("SpaceAfter=No".to_string());
            }
            if self.mode == TokenizerMode::Ranges {
                misc.push(format!("TokenRange={start}:{end}"));
            }
            sentence.add_word(form).misc = misc.join("|");
            self.pos = end;

            if !presegmented && is_terminal(form) {
                break;
            }
        }

        Ok(!sentence.is_empty())
    }
}

fn token_len(rest: &str, first: char) -> usize {
    if !first.is_alphanumeric() {
        if is_terminal_char(first) {
            return rest
                .char_indices()
                .find(|(_, ch)| *ch != first)
                .map_or(rest.len(), |(idx, _)| idx);
        }
        return first.len_utf8();
    }

    let mut end = 0;
    let mut chars = rest.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        let joins = (ch == '\'' || ch == '-')
            && idx > 0
            && chars.peek().is_some_and(|(_, next)| next.is_alphanumeric());
        if ch.is_alphanumeric() || joins {
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn is_terminal_char(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

fn is_terminal(form: &str) -> bool {
    form.chars().next().is_some_and(is_terminal_char)
}

fn upos_label(upostag: &str) -> &'static str {
    match upostag {
        "DET" => "DET",
        "ADJ" => "ADJ",
        "NOUN" => "NOUN",
        "PROPN" => "PROPN",
        "PRON" => "PRON",
        "NUM" => "NUM",
        "AUX" => "AUX",
        "VERB" => "VERB",
        _ => "",
    }
}

fn tag_word(word: &mut Word, previous: &str, sentence_initial: bool) {
    let lower = word.form.to_lowercase();
    let (upos, xpos, lemma, feats) = classify(&word.form, &lower, previous, sentence_initial);
    word.upostag = upos.to_string();
    word.xpostag = xpos.to_string();
    word.lemma = lemma;
    word.feats = feats.to_string();
}

fn classify(
    form: &str,
    lower: &str,
    previous: &str,
    sentence_initial: bool,
) -> (&'static str, &'static str, String, &'static str) {
    let first = form.chars().next().unwrap_or(' ');
    if !first.is_alphanumeric() {
        let xpos = match form {
            "," => ",",
            ":" | ";" => ":",
            "(" | "[" | "{" => "-LRB-",
            ")" | "]" | "}" => "-RRB-",
            "\"" | "'" => "''",
            _ if is_terminal(form) => ".",
            _ => "SYM",
        };
        return ("PUNCT", xpos, form.to_string(), "");
    }
    if form.chars().all(|ch| ch.is_ascii_digit()) {
        return ("NUM", "CD", form.to_string(), "NumType=Card");
    }

    match lower {
        "the" => return ("DET", "DT", lower.to_string(), "Definite=Def|PronType=Art"),
        "a" | "an" => return ("DET", "DT", "a".to_string(), "Definite=Ind|PronType=Art"),
        "this" | "that" | "these" | "those" => {
            return ("DET", "DT", lower.to_string(), "PronType=Dem");
        }
        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "me" | "him" | "her" | "us"
        | "them" => return ("PRON", "PRP", lower.to_string(), "PronType=Prs"),
        "is" | "are" | "was" | "were" | "am" => {
            return ("AUX", "VBZ", "be".to_string(), "Mood=Ind|VerbForm=Fin");
        }
        "be" | "been" | "has" | "have" | "had" | "do" | "does" | "did" | "will" | "would"
        | "can" | "could" | "should" | "may" | "might" | "must" => {
            return ("AUX", "MD", lower.to_string(), "VerbForm=Fin");
        }
        "in" | "on" | "at" | "of" | "to" | "with" | "from" | "by" | "for" | "over" | "under"
        | "into" => return ("ADP", "IN", lower.to_string(), ""),
        "and" | "or" | "but" => return ("CCONJ", "CC", lower.to_string(), ""),
        "not" | "very" | "too" => return ("ADV", "RB", lower.to_string(), ""),
        _ => {}
    }

    if lower.ends_with("ly") && lower.len() > 3 {
        return ("ADV", "RB", lower.to_string(), "");
    }
    if first.is_uppercase() && !sentence_initial {
        return ("PROPN", "NNP", form.to_string(), "Number=Sing");
    }
    if matches!(previous, "NOUN" | "PROPN" | "PRON") {
        if let Some(stem) = lower.strip_suffix('s').filter(|stem| stem.len() > 1) {
            return (
                "VERB",
                "VBZ",
                stem.to_string(),
                "Mood=Ind|Number=Sing|Person=3|Tense=Pres|VerbForm=Fin",
            );
        }
        if let Some(stem) = lower.strip_suffix("ed").filter(|stem| stem.len() > 1) {
            return ("VERB", "VBD", stem.to_string(), "Mood=Ind|Tense=Past|VerbForm=Fin");
        }
        return ("VERB", "VBP", lower.to_string(), "Mood=Ind|Tense=Pres|VerbForm=Fin");
    }
    if let Some(stem) = lower.strip_suffix("ing").filter(|stem| stem.len() > 1) {
        if !matches!(previous, "DET" | "ADJ") {
            return ("VERB", "VBG", stem.to_string(), "VerbForm=Ger");
        }
    }
    if let Some(stem) = lower
        .strip_suffix('s')
        .filter(|stem| stem.len() > 2 && !stem.ends_with('s'))
    {
        return ("NOUN", "NNS", stem.to_string(), "Number=Plur");
    }
    ("NOUN", "NN", lower.to_string(), "Number=Sing")
}

fn attach(words: &mut [Word]) {
    let root = find_root(words);
    let root_id = words[root].id;

    for index in 0..words.len() {
        if index == root {
            words[index].head = 0;
            words[index].deprel = "root".to_string();
            continue;
        }
        let (head, deprel) = governor(words, index, root, root_id);
        words[index].head = head;
        words[index].deprel = deprel.to_string();
    }
}

fn find_root(words: &[Word]) -> usize {
    ["VERB", "AUX", "NOUN", "PROPN", "PRON"]
        .iter()
        .find_map(|upos| words.iter().position(|word| word.upostag == *upos))
        .or_else(|| words.iter().position(|word| word.upostag != "PUNCT"))
        .unwrap_or(0)
}

fn next_nominal(words: &[Word], index: usize) -> Option<i32> {
    words[index + 1..]
        .iter()
        .take_while(|word| {
            matches!(word.upostag.as_str(), "DET" | "ADJ" | "NUM" | "NOUN" | "PROPN")
        })
        .filter(|word| matches!(word.upostag.as_str(), "NOUN" | "PROPN"))
        .map(|word| word.id)
        .next()
}

fn follows_adposition(words: &[Word], index: usize) -> bool {
    words[..index]
        .iter()
        .rev()
        .find(|word| !matches!(word.upostag.as_str(), "DET" | "ADJ" | "NUM"))
        .is_some_and(|word| word.upostag == "ADP")
}

fn governor(words: &[Word], index: usize, root: usize, root_id: i32) -> (i32, &'static str) {
    let word = &words[index];
    let before_root = index < root;
    match word.upostag.as_str() {
        "PUNCT" => (root_id, "punct"),
        "DET" => next_nominal(words, index).map_or((root_id, "dep"), |head| (head, "det")),
        "ADJ" => next_nominal(words, index).map_or((root_id, "amod"), |head| (head, "amod")),
        "NUM" => next_nominal(words, index).map_or((root_id, "nummod"), |head| (head, "nummod")),
        "ADP" => next_nominal(words, index).map_or((root_id, "case"), |head| (head, "case")),
        "AUX" => (root_id, "aux"),
        "ADV" => (root_id, "advmod"),
        "CCONJ" => (root_id, "cc"),
        "NOUN" | "PROPN" | "PRON" => {
            if follows_adposition(words, index) {
                (root_id, "obl")
            } else if before_root {
                (root_id, "nsubj")
            } else {
                (root_id, "obj")
            }
        }
        _ => (root_id, "dep"),
    }
}

#[cfg(test)]
mod tests {
    use super::RuleModel;
    use crate::core::model::{LanguageModel, Sentence, TokenizerMode};

    fn tokenize(text: &str, mode: TokenizerMode) -> Vec<Sentence> {
        let model = RuleModel::new();
        let mut tokenizer = model.new_tokenizer(mode).expect("tokenizer");
        tokenizer.set_text(text);
        let mut sentences = Vec::new();
        let mut sentence = Sentence::new();
        while tokenizer.next_sentence(&mut sentence).expect("tokenize") {
            sentences.push(sentence.clone());
        }
        sentences
    }

    fn forms(sentence: &Sentence) -> Vec<&str> {
        sentence.words.iter().map(|word| word.form.as_str()).collect()
    }

    #[test]
    fn splits_trailing_punctuation_and_sentences() {
        let sentences = tokenize(
            "The cat sleeps. It isn't   awake!",
            TokenizerMode::NormalizedSpaces,
        );
        assert_eq!(sentences.len(), 2);
        assert_eq!(forms(&sentences[0]), vec!["The", "cat", "sleeps", "."]);
        assert_eq!(forms(&sentences[1]), vec!["It", "isn't", "awake", "!"]);
        assert_eq!(sentences[0].words[2].misc, "SpaceAfter=No");
        assert_eq!(sentences[0].words[3].misc, "");
    }

    #[test]
    fn ranges_mode_records_byte_offsets() {
        let sentences = tokenize("Hi there.", TokenizerMode::Ranges);
        let misc: Vec<&str> = sentences[0].words.iter().map(|w| w.misc.as_str()).collect();
        assert_eq!(
            misc,
            vec!["TokenRange=0:2", "SpaceAfter=No|TokenRange=3:8", "TokenRange=8:9"]
        );
    }

    #[test]
    fn presegmented_mode_splits_on_lines_only() {
        let sentences = tokenize("Dr. Smith left.\nHe returned", TokenizerMode::Presegmented);
        assert_eq!(sentences.len(), 2);
        assert_eq!(forms(&sentences[0]), vec!["Dr", ".", "Smith", "left", "."]);
        assert_eq!(forms(&sentences[1]), vec!["He", "returned"]);
    }

    #[test]
    fn whitespace_only_yields_no_sentence() {
        assert!(tokenize("  \n\t ", TokenizerMode::NormalizedSpaces).is_empty());
    }

    #[test]
    fn tags_and_parses_simple_clause() {
        let model = RuleModel::new();
        let mut sentence = tokenize("The cat sleeps.", TokenizerMode::NormalizedSpaces).remove(0);
        model.tag(&mut sentence, "DEFAULT").expect("tag");
        model.parse(&mut sentence, "DEFAULT").expect("parse");

        let summary: Vec<(&str, &str, i32, &str)> = sentence
            .words
            .iter()
            .map(|w| (w.lemma.as_str(), w.upostag.as_str(), w.head, w.deprel.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("the", "DET", 2, "det"),
                ("cat", "NOUN", 3, "nsubj"),
                ("sleep", "VERB", 0, "root"),
                (".", "PUNCT", 3, "punct"),
            ]
        );
        assert_eq!(sentence.words[1].feats, "Number=Sing");
    }

    #[test]
    fn prepositional_objects_attach_as_obl() {
        let model = RuleModel::new();
        let mut sentence =
            tokenize("Birds sing in the garden", TokenizerMode::NormalizedSpaces).remove(0);
        model.tag(&mut sentence, "DEFAULT").expect("tag");
        model.parse(&mut sentence, "DEFAULT").expect("parse");

        let deprels: Vec<&str> = sentence.words.iter().map(|w| w.deprel.as_str()).collect();
        assert_eq!(deprels, vec!["nsubj", "root", "case", "det", "obl"]);
        assert_eq!(sentence.words[2].head, 5);
    }

    #[test]
    fn every_head_points_inside_the_sentence() {
        let model = RuleModel::new();
        let mut sentence = tokenize(
            "Yesterday 3 very old dogs quickly ran over 2 bridges, and slept.",
            TokenizerMode::NormalizedSpaces,
        )
        .remove(0);
        model.tag(&mut sentence, "DEFAULT").expect("tag");
        model.parse(&mut sentence, "DEFAULT").expect("parse");

        let count = sentence.word_count() as i32;
        assert_eq!(sentence.words.iter().filter(|w| w.head == 0).count(), 1);
        for word in &sentence.words {
            assert!((0..=count).contains(&word.head), "{word:?}");
            assert_ne!(word.head, word.id);
        }
    }

    #[test]
    fn unknown_modes_are_rejected() {
        let model = RuleModel::new();
        let mut sentence = tokenize("Fish swim.", TokenizerMode::NormalizedSpaces).remove(0);
        let err = model.tag(&mut sentence, "turbo").expect_err("should fail");
        assert!(err.contains("unknown tagger mode"));
        let err = model.parse(&mut sentence, "DEFAULT").expect_err("should fail");
        assert!(err.contains("tagged before parsing"));
    }
}
