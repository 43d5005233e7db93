// Owned, serializable snapshots of records for JSON and CoNLL-U output.
use serde::Serialize;

use crate::core::record::{SentenceRecord, WordRecord};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct WordView {
    pub id: i32,
    pub form: Option<String>,
    pub lemma: Option<String>,
    pub upostag: Option<String>,
    pub xpostag: Option<String>,
    pub feats: Option<String>,
    pub head: i32,
    pub deprel: Option<String>,
    pub deps: Option<String>,
    pub misc: Option<String>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SentenceView {
    pub text: Option<String>,
    pub words: Vec<WordView>,
}

impl From<&WordRecord> for WordView {
    fn from(record: &WordRecord) -> Self {
        let owned = |value: Option<&str>| value.map(str::to_string);
        Self {
            id: record.id(),
            form: owned(record.form()),
            lemma: owned(record.lemma()),
            upostag: owned(record.upostag()),
            xpostag: owned(record.xpostag()),
            feats: owned(record.feats()),
            head: record.head(),
            deprel: owned(record.deprel()),
            deps: owned(record.deps()),
            misc: owned(record.misc()),
        }
    }
}

impl From<&SentenceRecord> for SentenceView {
    fn from(record: &SentenceRecord) -> Self {
        Self {
            text: record.text().map(str::to_string),
            words: record.words().iter().map(WordView::from).collect(),
        }
    }
}

impl SentenceView {
    /// Renders one CoNLL-U block: `# text` comment, ten tab-separated columns, blank line.
    pub fn to_conllu(&self) -> String {
        let mut out = String::new();
        if let Some(text) = &self.text {
            out.push_str("# text = ");
            out.push_str(&text.replace('\n', " "));
            out.push('\n');
        }
        for word in &self.words {
            let columns = [
                word.id.to_string(),
                column(&word.form),
                column(&word.lemma),
                column(&word.upostag),
                column(&word.xpostag),
                column(&word.feats),
                word.head.to_string(),
                column(&word.deprel),
                column(&word.deps),
                column(&word.misc),
            ];
            out.push_str(&columns.join("\t"));
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

fn column(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "_".to_string())
}
