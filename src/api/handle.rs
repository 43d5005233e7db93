//! Purpose: Owned wrapper that turns any `LanguageModel` into a C-ABI model handle.
//! Exports: `ModelHandle`.
//! Role: Bridge between Rust-side model construction and `udb_model` pointers.
//! Invariants: A raw handle from `into_raw` is released exactly once via `udb_model_free`.

use crate::abi::udb_model;
use crate::core::model::LanguageModel;
use crate::core::rules::RuleModel;

pub struct ModelHandle {
    model: Box<dyn LanguageModel>,
}

impl ModelHandle {
    pub fn new(model: impl LanguageModel + 'static) -> Self {
        Self::from_boxed(Box::new(model))
    }

    pub fn from_boxed(model: Box<dyn LanguageModel>) -> Self {
        Self { model }
    }

    pub fn rule_based() -> Self {
        Self::new(RuleModel::new())
    }

    pub fn model(&self) -> &dyn LanguageModel {
        self.model.as_ref()
    }

    /// Hands the handle to a foreign caller.
    pub fn into_raw(self) -> *mut udb_model {
        Box::into_raw(Box::new(udb_model { handle: self }))
    }
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle").finish_non_exhaustive()
    }
}
