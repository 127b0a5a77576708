use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContentError {
    #[error("question '{id}' has no option matching correct_option_id '{correct_option_id}'")]
    DanglingCorrectOption { id: String, correct_option_id: String },

    #[error("question '{id}' repeats option id '{option_id}'")]
    DuplicateOptionId { id: String, option_id: String },

    #[error("question '{id}' has no options")]
    NoOptions { id: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ar,
    Fr,
}

/// One string per supported locale, filled from the backend's
/// `_en`/`_ar`/`_fr` field suffixes.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LocalizedText {
    pub en: String,
    pub ar: String,
    pub fr: String,
}

impl LocalizedText {
    pub fn new(en: String, ar: String, fr: String) -> Self {
        Self { en, ar, fr }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => &self.ar,
            Locale::Fr => &self.fr,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

/// Immutable once loaded; owned by its containing block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Paragraph { text: LocalizedText },
    Media { item: MediaItem },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct McqOption {
    pub id: String,
    pub text: LocalizedText,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct McqQuestion {
    pub id: String,
    pub prompt: LocalizedText,
    pub options: Vec<McqOption>,
    pub correct_option_id: String,
    pub explanation: Option<LocalizedText>,
}

impl McqQuestion {
    /// Single-select invariant: option ids are unique and exactly one of
    /// them is named by `correct_option_id`. Run on every question built
    /// from a network response.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.options.is_empty() {
            return Err(ContentError::NoOptions {
                id: self.id.clone(),
            });
        }

        for (index, option) in self.options.iter().enumerate() {
            if self.options[..index].iter().any(|o| o.id == option.id) {
                return Err(ContentError::DuplicateOptionId {
                    id: self.id.clone(),
                    option_id: option.id.clone(),
                });
            }
        }

        if !self.options.iter().any(|o| o.id == self.correct_option_id) {
            return Err(ContentError::DanglingCorrectOption {
                id: self.id.clone(),
                correct_option_id: self.correct_option_id.clone(),
            });
        }

        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Flashcard {
    pub id: String,
    pub front: LocalizedText,
    pub back: LocalizedText,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub title: LocalizedText,

    /// display order within the module
    pub order: usize,

    pub blocks: Vec<ContentBlock>,

    /// conventionally 3 per section
    pub questions: Vec<McqQuestion>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Module {
    pub id: String,
    pub title: LocalizedText,
    pub order: usize,
    pub sections: Vec<Section>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub modules: Vec<Module>,
    pub final_exam: Option<Vec<McqQuestion>>,
}
