//! Purpose: Define the stable public Rust API boundary for udbridge.
//! Exports: Model seam, records, pipeline entry points, errors, and the reference model.
//! Role: Public, additive-only surface; hides the layout of internal modules.
//! Invariants: Rust callers never need `core::*` paths directly.
//! Invariants: Records returned here own their buffers and release them on drop.

mod handle;

pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::model::{DEFAULT_MODE, LanguageModel, Sentence, Tokenizer, TokenizerMode, Word};
pub use crate::core::pipeline::{PipelineOptions, analyze, analyze_with, process, process_with};
pub use crate::core::record::{SentenceRecord, WordRecord, copy_word_at, word_count};
pub use crate::core::rules::RuleModel;
pub use crate::core::view::{SentenceView, WordView};
pub use handle::ModelHandle;
