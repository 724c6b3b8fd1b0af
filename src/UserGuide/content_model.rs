//! # Content Document Model
//!
//! ## Purpose
//! In-memory representation of one guide section: localized metadata plus, for
//! every language code, an ordered sequence of content blocks.
//!
//! ## Document Format
//! ```json
//! {
//!   "section_id": "installation",
//!   "version": "1.0",
//!   "metadata": {
//!     "title": {"ru": "Установка", "en": "Installation"},
//!     "description": {"ru": "...", "en": "..."},
//!     "difficulty": "beginner",
//!     "estimated_time": "10 min",
//!     "tags": ["setup"]
//!   },
//!   "content": {
//!     "en": [
//!       {"type": "heading", "level": 1, "text": "Installation"},
//!       {"type": "note", "note_type": "tip", "text": "..."}
//!     ]
//!   },
//!   "related_sections": ["introduction"]
//! }
//! ```
//!
//! ## Validation
//! - `section_id`, `metadata` and `content` are required
//! - `content` must hold a non-empty block list for the default language
//! - every language in `content` needs a localized title and description
//! - heading levels lie in 1..=6, unknown block types are rejected
//!
//! Any violation yields `GuideError::Schema`; a section is never partially loaded.

use crate::UserGuide::guide_errors::{GuideError, GuideResult};
use crate::UserGuide::theme_model::{
    COLOR_CODE_TEXT, COLOR_HEADING, COLOR_TEXT, FONT_BODY, FONT_CODE, FONT_HEADING,
};
use crate::Utils::load_from_file::{parse_document, read_document_text};
use enum_dispatch::enum_dispatch;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

pub const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Localized section metadata. Maps are keyed by language code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMetadata {
    pub title: HashMap<String, String>,
    pub description: HashMap<String, String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Paragraph,
    List,
    Code,
    Note,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockKind::Heading => "heading",
            BlockKind::Paragraph => "paragraph",
            BlockKind::List => "list",
            BlockKind::Code => "code",
            BlockKind::Note => "note",
        };
        write!(f, "{}", s)
    }
}

/// Behaviour shared by every block kind. Renderers and search dispatch over the
/// block tag through this trait instead of probing fields.
#[enum_dispatch]
pub trait BlockView {
    fn kind(&self) -> BlockKind;
    /// Text of the block without any markup (used by search and plain rendering)
    fn plain_text(&self) -> String;
    /// Theme font role the renderer needs for this block
    fn font_role(&self) -> &'static str;
    /// Theme color role the renderer needs for this block
    fn color_role(&self) -> &'static str;
    /// Block-level invariants; the error is a human readable reason
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl BlockView for Heading {
    fn kind(&self) -> BlockKind {
        BlockKind::Heading
    }
    fn plain_text(&self) -> String {
        self.text.clone()
    }
    fn font_role(&self) -> &'static str {
        FONT_HEADING
    }
    fn color_role(&self) -> &'static str {
        COLOR_HEADING
    }
    fn check(&self) -> Result<(), String> {
        if self.level == 0 || self.level > MAX_HEADING_LEVEL {
            return Err(format!(
                "heading level must be in 1..={}, got {}",
                MAX_HEADING_LEVEL, self.level
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
}

impl BlockView for Paragraph {
    fn kind(&self) -> BlockKind {
        BlockKind::Paragraph
    }
    fn plain_text(&self) -> String {
        self.text.clone()
    }
    fn font_role(&self) -> &'static str {
        FONT_BODY
    }
    fn color_role(&self) -> &'static str {
        COLOR_TEXT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Ordered,
    Unordered,
}

/// Ordered or bulleted list. An empty `items` list is legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBlock {
    pub list_type: ListType,
    pub items: Vec<String>,
}

impl BlockView for ListBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::List
    }
    fn plain_text(&self) -> String {
        self.items.join("\n")
    }
    fn font_role(&self) -> &'static str {
        FONT_BODY
    }
    fn color_role(&self) -> &'static str {
        COLOR_TEXT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

impl BlockView for CodeBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Code
    }
    fn plain_text(&self) -> String {
        self.code.clone()
    }
    fn font_role(&self) -> &'static str {
        FONT_CODE
    }
    fn color_role(&self) -> &'static str {
        COLOR_CODE_TEXT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Tip,
    Warning,
    Info,
    Success,
}

impl NoteType {
    pub const ALL: [NoteType; 4] = [
        NoteType::Tip,
        NoteType::Warning,
        NoteType::Info,
        NoteType::Success,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Tip => "tip",
            NoteType::Warning => "warning",
            NoteType::Info => "info",
            NoteType::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteBlock {
    pub note_type: NoteType,
    pub text: String,
}

impl BlockView for NoteBlock {
    fn kind(&self) -> BlockKind {
        BlockKind::Note
    }
    fn plain_text(&self) -> String {
        self.text.clone()
    }
    fn font_role(&self) -> &'static str {
        FONT_BODY
    }
    fn color_role(&self) -> &'static str {
        COLOR_TEXT
    }
}

/// One structural unit of a section, tagged by the JSON `type` field.
#[enum_dispatch(BlockView)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading(Heading),
    Paragraph(Paragraph),
    List(ListBlock),
    Code(CodeBlock),
    Note(NoteBlock),
}

/// One navigable section of the guide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub section_id: String,
    #[serde(default)]
    pub version: String,
    pub metadata: SectionMetadata,
    pub content: HashMap<String, Vec<ContentBlock>>,
    #[serde(default)]
    pub related_sections: Vec<String>,
}

impl ContentSection {
    /// Parses and validates a section document held in memory.
    ///
    /// # Arguments
    /// * `text` - JSON text of the document
    /// * `origin` - where the text came from, used in error messages
    /// * `default_language` - language that must be populated in `content`
    pub fn from_json_str(text: &str, origin: &str, default_language: &str) -> GuideResult<Self> {
        let section: ContentSection = parse_document(text, origin)?;
        section.validate(origin, default_language)?;
        Ok(section)
    }

    /// Serializes the section back into the document format.
    pub fn to_json_string(&self) -> GuideResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GuideError::schema(self.section_id.as_str(), e.to_string()))
    }

    /// Checks every structural invariant of a loaded section.
    pub fn validate(&self, origin: &str, default_language: &str) -> GuideResult<()> {
        if self.section_id.trim().is_empty() {
            return Err(GuideError::schema(origin, "section_id must not be empty"));
        }
        match self.content.get(default_language) {
            Some(blocks) if !blocks.is_empty() => {}
            Some(_) => {
                return Err(GuideError::schema(
                    origin,
                    format!("content for default language '{}' is empty", default_language),
                ));
            }
            None => {
                return Err(GuideError::schema(
                    origin,
                    format!("content for default language '{}' is missing", default_language),
                ));
            }
        }
        for (language, blocks) in &self.content {
            for (i, block) in blocks.iter().enumerate() {
                block.check().map_err(|reason| {
                    GuideError::schema(
                        origin,
                        format!(
                            "block {} ({}) of language '{}': {}",
                            i,
                            block.kind(),
                            language,
                            reason
                        ),
                    )
                })?;
            }
        }
        self.check_languages(origin, self.content.keys().map(String::as_str))
    }

    /// Every given language must have a localized title and description.
    pub fn check_languages<'a>(
        &self,
        origin: &str,
        languages: impl IntoIterator<Item = &'a str>,
    ) -> GuideResult<()> {
        for language in languages {
            if !self.metadata.title.contains_key(language) {
                return Err(GuideError::schema(
                    origin,
                    format!("metadata.title has no '{}' entry", language),
                ));
            }
            if !self.metadata.description.contains_key(language) {
                return Err(GuideError::schema(
                    origin,
                    format!("metadata.description has no '{}' entry", language),
                ));
            }
        }
        Ok(())
    }

    /// Language codes present in `content`, sorted
    pub fn languages(&self) -> BTreeSet<&str> {
        self.content.keys().map(String::as_str).collect()
    }

    pub fn title(&self, language: &str, default_language: &str) -> Option<&str> {
        localized(&self.metadata.title, language, default_language)
    }

    pub fn description(&self, language: &str, default_language: &str) -> Option<&str> {
        localized(&self.metadata.description, language, default_language)
    }
}

/// Looks a localized string up with fallback to the default language.
pub fn localized<'a>(
    map: &'a HashMap<String, String>,
    language: &str,
    default_language: &str,
) -> Option<&'a str> {
    map.get(language)
        .or_else(|| map.get(default_language))
        .map(String::as_str)
}

/// Reads a section document from disk and validates it.
///
/// # Arguments
/// * `path` - path of the content document
/// * `default_language` - language that must be populated in `content`
///
/// # Returns
/// * `Ok(ContentSection)` - a fully validated section
/// * `Err(GuideError::Schema)` - missing field, unknown block type or broken invariant
/// * `Err(GuideError::Io)` - the file could not be read
pub fn load_section(path: &Path, default_language: &str) -> GuideResult<ContentSection> {
    let text = read_document_text(path)?;
    let origin = path.display().to_string();
    let section = ContentSection::from_json_str(&text, &origin, default_language)?;
    info!(
        "Loaded section '{}' ({} languages) from '{}'",
        section.section_id,
        section.content.len(),
        origin
    );
    Ok(section)
}

/// Returns the blocks for `language`, falling back to `default_language`.
///
/// # Returns
/// * `Ok(&[ContentBlock])` - blocks of the requested or the default language
/// * `Err(GuideError::LanguageNotFound)` - neither language is present
pub fn get_blocks<'a>(
    section: &'a ContentSection,
    language: &str,
    default_language: &str,
) -> GuideResult<&'a [ContentBlock]> {
    section
        .content
        .get(language)
        .or_else(|| section.content.get(default_language))
        .map(Vec::as_slice)
        .ok_or_else(|| GuideError::LanguageNotFound {
            section_id: section.section_id.clone(),
            requested: language.to_string(),
            default: default_language.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_section() -> Value {
        json!({
            "section_id": "model_fitting",
            "version": "1.0",
            "metadata": {
                "title": {"ru": "Подбор моделей", "en": "Model fitting"},
                "description": {"ru": "Описание", "en": "Description"},
                "difficulty": "advanced",
                "estimated_time": "20 min",
                "tags": ["kinetics", "fitting"]
            },
            "content": {
                "ru": [
                    {"type": "heading", "level": 1, "text": "Подбор моделей"},
                    {"type": "paragraph", "text": "Текст"}
                ],
                "en": [
                    {"type": "heading", "level": 1, "text": "Model fitting"},
                    {"type": "list", "list_type": "ordered", "items": ["Load", "Fit"]},
                    {"type": "code", "language": "python", "code": "fit(model)"},
                    {"type": "note", "note_type": "warning", "text": "Check units"}
                ]
            },
            "related_sections": ["deconvolution"]
        })
    }

    fn parse(value: &Value) -> GuideResult<ContentSection> {
        ContentSection::from_json_str(&value.to_string(), "test.json", "ru")
    }

    fn assert_schema_error(result: GuideResult<ContentSection>, needle: &str) {
        match result {
            Err(GuideError::Schema { message, .. }) => {
                assert!(message.contains(needle), "message '{}' lacks '{}'", message, needle)
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_all_block_kinds() {
        let section = parse(&sample_section()).unwrap();
        assert_eq!(section.section_id, "model_fitting");
        assert_eq!(section.metadata.difficulty, Difficulty::Advanced);
        let kinds: Vec<BlockKind> = section.content["en"].iter().map(|b| b.kind()).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Heading, BlockKind::List, BlockKind::Code, BlockKind::Note]
        );
        assert_eq!(section.content["en"][1].plain_text(), "Load\nFit");
        assert_eq!(section.related_sections, vec!["deconvolution".to_string()]);
    }

    #[test]
    fn test_optional_fields_default() {
        let mut doc = sample_section();
        let obj = doc.as_object_mut().unwrap();
        obj.remove("version");
        obj.remove("related_sections");
        obj["metadata"].as_object_mut().unwrap().remove("difficulty");
        let section = parse(&doc).unwrap();
        assert_eq!(section.version, "");
        assert!(section.related_sections.is_empty());
        assert_eq!(section.metadata.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["section_id", "metadata", "content"] {
            let mut doc = sample_section();
            doc.as_object_mut().unwrap().remove(field);
            assert_schema_error(parse(&doc), field);
        }
    }

    #[test]
    fn test_unknown_block_kind_rejected() {
        let mut doc = sample_section();
        doc["content"]["en"]
            .as_array_mut()
            .unwrap()
            .push(json!({"type": "image", "src": "plot.png"}));
        assert_schema_error(parse(&doc), "image");
    }

    #[test]
    fn test_heading_level_bounds() {
        for level in [0, 7] {
            let mut doc = sample_section();
            doc["content"]["ru"][0]["level"] = json!(level);
            assert_schema_error(parse(&doc), "heading level");
        }
        let mut doc = sample_section();
        doc["content"]["ru"][0]["level"] = json!(6);
        assert!(parse(&doc).is_ok());
    }

    #[test]
    fn test_list_items_must_be_strings() {
        let mut doc = sample_section();
        doc["content"]["en"][1]["items"] = json!(["one", 2]);
        assert!(matches!(parse(&doc), Err(GuideError::Schema { .. })));

        let mut doc = sample_section();
        doc["content"]["en"][1]["items"] = json!([]);
        let section = parse(&doc).unwrap();
        match &section.content["en"][1] {
            ContentBlock::List(list) => assert!(list.items.is_empty()),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_list_type_rejected() {
        let mut doc = sample_section();
        doc["content"]["en"][1]["list_type"] = json!("numbered");
        assert!(matches!(parse(&doc), Err(GuideError::Schema { .. })));
    }

    #[test]
    fn test_every_content_language_needs_metadata() {
        let mut doc = sample_section();
        doc["metadata"]["title"].as_object_mut().unwrap().remove("en");
        assert_schema_error(parse(&doc), "metadata.title");

        let mut doc = sample_section();
        doc["metadata"]["description"]
            .as_object_mut()
            .unwrap()
            .remove("en");
        assert_schema_error(parse(&doc), "metadata.description");
    }

    #[test]
    fn test_default_language_required() {
        let mut doc = sample_section();
        doc["content"].as_object_mut().unwrap().remove("ru");
        assert_schema_error(parse(&doc), "default language 'ru'");

        let mut doc = sample_section();
        doc["content"]["ru"] = json!([]);
        assert_schema_error(parse(&doc), "is empty");
    }

    #[test]
    fn test_get_blocks_fallback() {
        let section = parse(&sample_section()).unwrap();
        let en = get_blocks(&section, "en", "ru").unwrap();
        assert_eq!(en.len(), 4);
        let fr = get_blocks(&section, "fr", "ru").unwrap();
        assert_eq!(fr, section.content["ru"].as_slice());
        match get_blocks(&section, "fr", "de") {
            Err(GuideError::LanguageNotFound { requested, default, .. }) => {
                assert_eq!(requested, "fr");
                assert_eq!(default, "de");
            }
            other => panic!("expected LanguageNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip() {
        let section = parse(&sample_section()).unwrap();
        let text = section.to_json_string().unwrap();
        let reloaded = ContentSection::from_json_str(&text, "round_trip.json", "ru").unwrap();
        assert_eq!(section, reloaded);
    }

    #[test]
    fn test_localized_metadata() {
        let section = parse(&sample_section()).unwrap();
        assert_eq!(section.title("en", "ru"), Some("Model fitting"));
        assert_eq!(section.title("fr", "ru"), Some("Подбор моделей"));
        assert_eq!(section.description("de", "fr"), None);
        assert!(section.check_languages("test.json", ["ru", "en"]).is_ok());
        assert!(section.check_languages("test.json", ["kk"]).is_err());
    }

    #[test]
    fn test_load_section_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(sample_section().to_string().as_bytes())
            .unwrap();
        let section = load_section(temp_file.path(), "ru").unwrap();
        assert_eq!(section.languages().into_iter().collect::<Vec<_>>(), vec!["en", "ru"]);
    }
}
