//! Display labels for classifier outputs

use crate::config::RouterConfig;
use sentimento_core::ClassLabel;
use std::collections::BTreeMap;

/// Maps raw classifier labels to the strings returned to callers.
///
/// Text labels pass through unchanged. Integer codes go through the code
/// table; a code missing from it resolves to the indeterminate label.
#[derive(Debug, Clone)]
pub struct LabelTable {
    codes: BTreeMap<i64, String>,
    indeterminate: String,
}

impl LabelTable {
    pub fn new(codes: BTreeMap<i64, String>, indeterminate: impl Into<String>) -> Self {
        Self {
            codes,
            indeterminate: indeterminate.into(),
        }
    }

    pub fn from_config(config: &RouterConfig) -> Self {
        Self::new(config.label_codes.clone(), config.indeterminate_label.clone())
    }

    pub fn resolve(&self, label: &ClassLabel) -> String {
        match label {
            ClassLabel::Text(text) => text.clone(),
            ClassLabel::Code(code) => self
                .codes
                .get(code)
                .unwrap_or(&self.indeterminate)
                .clone(),
        }
    }

    pub fn indeterminate(&self) -> &str {
        &self.indeterminate
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::from_config(&RouterConfig::default())
    }
}
