use serde::Serialize;
use std::fmt;

/// How a cartridge uses Color hardware, decoded from the CGB flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CgbSupport {
    None,      // monochrome only
    Enhanced,  // 0x80, runs on both
    Exclusive, // 0xC0, Color only
}

impl CgbSupport {
    pub const ENHANCED_FLAG: u8 = 0x80;
    pub const EXCLUSIVE_FLAG: u8 = 0xC0;

    /// Total mapping: every byte that is not one of the two CGB values is GB.
    pub fn from_flag(flag: u8) -> Self {
        match flag {
            Self::EXCLUSIVE_FLAG => CgbSupport::Exclusive,
            Self::ENHANCED_FLAG => CgbSupport::Enhanced,
            _ => CgbSupport::None,
        }
    }

    pub fn category(self) -> Category {
        match self {
            CgbSupport::None => Category::Gb,
            CgbSupport::Enhanced | CgbSupport::Exclusive => Category::Gbc,
        }
    }
}

impl fmt::Display for CgbSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CgbSupport::None => "GB only",
            CgbSupport::Enhanced => "GBC enhanced",
            CgbSupport::Exclusive => "GBC only",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    #[serde(rename = "GB")]
    Gb,
    #[serde(rename = "GBC")]
    Gbc,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::Gb => "GB",
            Category::Gbc => "GBC",
        }
    }

    /// The file extension a ROM of this category should carry.
    pub fn extension(self) -> Extension {
        match self {
            Category::Gb => Extension::Gb,
            Category::Gbc => Extension::Gbc,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared ROM extension, parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    Gb,
    Gbc,
}

impl Extension {
    /// Extension of the final component of `name`, if it is a ROM extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
        let (_, ext) = base.rsplit_once('.')?;
        ext.parse().ok()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Extension::Gb => "gb",
            Extension::Gbc => "gbc",
        }
    }
}

impl std::str::FromStr for Extension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches('.') {
            "gb" => Ok(Extension::Gb),
            "gbc" => Ok(Extension::Gbc),
            _ => Err(format!("Unknown ROM extension: {}", s)),
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_mapping_is_total() {
        for b in 0..=u8::MAX {
            let expected = match b {
                0x80 => CgbSupport::Enhanced,
                0xC0 => CgbSupport::Exclusive,
                _ => CgbSupport::None,
            };
            assert_eq!(CgbSupport::from_flag(b), expected, "flag {b:#04x}");
        }
    }

    #[test]
    fn extension_from_name() {
        assert_eq!(Extension::from_name("Tetris.gb"), Some(Extension::Gb));
        assert_eq!(Extension::from_name("Zelda.GBC"), Some(Extension::Gbc));
        assert_eq!(Extension::from_name("dir.gb/readme"), None);
        assert_eq!(Extension::from_name("a\\b.Gb"), Some(Extension::Gb));
        assert_eq!(Extension::from_name("game.zip"), None);
        assert_eq!(Extension::from_name("gb"), None);
    }

    #[test]
    fn category_maps_to_matching_extension() {
        assert_eq!(Category::Gb.extension(), Extension::Gb);
        assert_eq!(Category::Gbc.extension().to_string(), ".gbc");
    }
}
