use crate::{Category, CgbSupport, Extension, RomError};
use serde::Serialize;

/// Result of checking one ROM's declared extension against its header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerdictRecord {
    pub filename: String,
    pub category: Category,
    pub support: Option<CgbSupport>,
    pub declared: Extension,
    pub matches: bool,
}

impl VerdictRecord {
    /// Extension the header implies.
    pub fn expected_extension(&self) -> Extension {
        self.category.extension()
    }

    /// `None` when the name is already right.
    pub fn suggestion(&self) -> Option<Extension> {
        (!self.matches).then(|| self.expected_extension())
    }

    /// Attaches the finer-grained capability the category came from.
    pub fn with_support(mut self, support: CgbSupport) -> Self {
        debug_assert_eq!(support.category(), self.category);
        self.support = Some(support);
        self
    }
}

/// Compares a classified category with the extension of `filename`.
pub fn verify(filename: &str, category: Category) -> Result<VerdictRecord, RomError> {
    let declared = Extension::from_name(filename).ok_or_else(|| {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, e)| e.to_string())
            .unwrap_or_default();
        RomError::UnsupportedExtension(ext)
    })?;

    let matches = matches!(
        (category, declared),
        (Category::Gb, Extension::Gb) | (Category::Gbc, Extension::Gbc)
    );

    Ok(VerdictRecord {
        filename: filename.to_string(),
        category,
        support: None,
        declared,
        matches,
    })
}

/// Classifies `rom` and verifies it against `filename` in one step.
pub fn check(filename: &str, rom: &[u8]) -> Result<VerdictRecord, RomError> {
    let support = crate::cgb_support(rom)?;
    Ok(verify(filename, support.category())?.with_support(support))
}
