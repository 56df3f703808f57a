//! Source and target language descriptions.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{ConvertError, Result};

/// Built-in language presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LanguagePreset {
    Scala,
    Java,
    Kotlin,
    Python,
    Rust,
    TypeScript,
    JavaScript,
    #[strum(to_string = "csharp", serialize = "c#")]
    CSharp,
    Go,
    #[strum(to_string = "cpp", serialize = "c++")]
    Cpp,
}

impl LanguagePreset {
    pub fn language(self) -> Language {
        let (display, extension, fence) = match self {
            Self::Scala => ("Scala", "scala", "scala"),
            Self::Java => ("Java", "java", "java"),
            Self::Kotlin => ("Kotlin", "kt", "kotlin"),
            Self::Python => ("Python", "py", "python"),
            Self::Rust => ("Rust", "rs", "rust"),
            Self::TypeScript => ("TypeScript", "ts", "typescript"),
            Self::JavaScript => ("JavaScript", "js", "javascript"),
            Self::CSharp => ("C#", "cs", "csharp"),
            Self::Go => ("Go", "go", "go"),
            Self::Cpp => ("C++", "cpp", "cpp"),
        };
        Language {
            name: self.to_string(),
            display_name: display.to_string(),
            extension: extension.to_string(),
            fence: fence.to_string(),
        }
    }

    /// All presets in declaration order.
    pub fn all() -> Vec<Language> {
        Self::iter().map(Self::language).collect()
    }
}

/// User-declared language from the config file (`[languages.<name>]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSpec {
    pub extension: String,
    #[serde(default)]
    pub fence: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A language as far as conversion cares: how its files are named and how
/// its code is fenced in markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Lookup key, lowercase (e.g. `scala`).
    pub name: String,
    /// Human-readable name used in prompts (e.g. `Scala`).
    pub display_name: String,
    /// File extension without the leading dot.
    pub extension: String,
    /// Info string used after the opening fence.
    pub fence: String,
}

impl Language {
    /// Resolve a language by name, checking custom declarations before presets.
    pub fn resolve(name: &str, custom: &HashMap<String, LanguageSpec>) -> Result<Self> {
        let key = name.trim().to_ascii_lowercase();
        if key.is_empty() {
            return Err(ConvertError::Configuration(
                "Language name must not be empty".into(),
            ));
        }

        if let Some(spec) = custom.get(&key) {
            let extension = spec.extension.trim_start_matches('.').to_string();
            if extension.is_empty() {
                return Err(ConvertError::Configuration(format!(
                    "Language '{key}' declares an empty extension"
                )));
            }
            return Ok(Self {
                display_name: spec.display_name.clone().unwrap_or_else(|| name.trim().to_string()),
                fence: spec.fence.clone().unwrap_or_else(|| key.clone()),
                name: key,
                extension,
            });
        }

        key.parse::<LanguagePreset>()
            .map(LanguagePreset::language)
            .map_err(|_| ConvertError::Configuration(format!("Unknown language: '{name}'")))
    }

    /// Whether `path` carries this language's extension.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}
