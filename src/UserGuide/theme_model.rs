//! # Theme Model
//!
//! ## Purpose
//! Typed representation of a visual theme of the guide: semantic colors, font
//! roles, spacing and per-widget component overrides.
//!
//! ## Theme Format
//! ```json
//! {
//!   "name": "default",
//!   "version": "1.0",
//!   "description": "Light theme",
//!   "colors": {"primary": "#1976D2", "text_primary": "#212121"},
//!   "fonts": {"heading": {"family": "Arial", "size": 14, "weight": "bold"}},
//!   "spacing": {"small": 5, "medium": 10},
//!   "components": {
//!     "navigation": {"background": "#F5F5F5", "width": 250},
//!     "note": {"tip": {"background": "#E8F5E8", "border": "#4CAF50"}}
//!   }
//! }
//! ```
//!
//! ## Fallback
//! A built-in default theme is constructed once per process and never changes.
//! When the active theme lacks a role the renderer asks for, the role is looked
//! up in the default theme instead (`resolve_color_or_default`,
//! `resolve_font_or_default`, `note_style_or_default`).

use crate::UserGuide::content_model::NoteType;
use crate::UserGuide::guide_errors::{GuideError, GuideResult, RoleKind};
use crate::Utils::load_from_file::load_document;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

pub const FONT_HEADING: &str = "heading";
pub const FONT_BODY: &str = "body";
pub const FONT_CODE: &str = "code";

pub const COLOR_HEADING: &str = "primary";
pub const COLOR_TEXT: &str = "text_primary";
pub const COLOR_SECONDARY_TEXT: &str = "text_secondary";
pub const COLOR_CODE_TEXT: &str = "code_text";
pub const COLOR_CODE_BACKGROUND: &str = "code_background";
pub const COLOR_BACKGROUND: &str = "background";
pub const COLOR_BORDER: &str = "border";

/// Font roles every theme must define
pub const RENDERER_FONT_ROLES: [&str; 3] = [FONT_HEADING, FONT_BODY, FONT_CODE];
/// Color roles used by the block renderer (missing ones fall back to the default theme)
pub const RENDERER_COLOR_ROLES: [&str; 7] = [
    COLOR_HEADING,
    COLOR_TEXT,
    COLOR_SECONDARY_TEXT,
    COLOR_CODE_TEXT,
    COLOR_CODE_BACKGROUND,
    COLOR_BACKGROUND,
    COLOR_BORDER,
];

pub const DEFAULT_THEME_NAME: &str = "default";

/// RGBA color parsed from `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorValue {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorValue {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn parse_hex(s: &str) -> Result<Self, String> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color '{}' must start with '#'", s))?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color '{}' is not #RRGGBB or #RRGGBBAA", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for ColorValue {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        ColorValue::parse_hex(&value)
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// point size
    pub size: u32,
    #[serde(default)]
    pub weight: FontWeight,
}

impl FontSpec {
    pub fn new(family: &str, size: u32, weight: FontWeight) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight,
        }
    }
}

/// Value of a component override: a scalar (`"#F5F5F5"`, `250`, `true`, `"solid"`)
/// or a nested group of overrides for a sub-widget (`{"item": {"padding": 5}}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Flag(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    Group(HashMap<String, StyleValue>),
}

impl StyleValue {
    /// Interprets a text value as a color, if it is one
    pub fn as_color(&self) -> Option<ColorValue> {
        match self {
            StyleValue::Text(s) => ColorValue::parse_hex(s).ok(),
            _ => None,
        }
    }

    /// Walks nested groups along a dot-separated path, e.g. `"item.hover.background"`.
    /// An empty path returns the value itself.
    pub fn lookup(&self, path: &str) -> Option<&StyleValue> {
        if path.is_empty() {
            return Some(self);
        }
        let mut current = self;
        for key in path.split('.') {
            match current {
                StyleValue::Group(group) => current = group.get(key)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

/// Looks up a possibly nested override of a component group by dot-separated path.
pub fn component_style<'a>(
    group: &'a HashMap<String, StyleValue>,
    path: &str,
) -> Option<&'a StyleValue> {
    let (head, rest) = path.split_once('.').unwrap_or((path, ""));
    group.get(head)?.lookup(rest)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteStyle {
    pub background: ColorValue,
    pub border: ColorValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ColorValue>,
}

/// Per-widget style overrides
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeComponents {
    #[serde(default)]
    pub navigation: HashMap<String, StyleValue>,
    #[serde(default)]
    pub content: HashMap<String, StyleValue>,
    #[serde(default)]
    pub code_block: HashMap<String, StyleValue>,
    /// note_type -> style
    #[serde(default)]
    pub note: HashMap<String, NoteStyle>,
    /// component groups not interpreted by this crate, kept verbatim
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    pub colors: HashMap<String, ColorValue>,
    pub fonts: HashMap<String, FontSpec>,
    #[serde(default)]
    pub spacing: HashMap<String, u32>,
    #[serde(default)]
    pub components: ThemeComponents,
}

impl Theme {
    /// Checks the minimal set of keys every renderer relies on:
    /// all renderer font roles and a background/border pair for every note type.
    pub fn validate(&self, origin: &str) -> GuideResult<()> {
        for role in RENDERER_FONT_ROLES {
            match self.fonts.get(role) {
                Some(font) if font.size == 0 => {
                    return Err(GuideError::schema(
                        origin,
                        format!("font '{}' has zero size", role),
                    ));
                }
                Some(_) => {}
                None => {
                    return Err(GuideError::schema(
                        origin,
                        format!("font role '{}' is missing", role),
                    ));
                }
            }
        }
        for note_type in NoteType::ALL {
            if !self.components.note.contains_key(note_type.as_str()) {
                return Err(GuideError::schema(
                    origin,
                    format!(
                        "components.note.{} (background + border) is missing",
                        note_type.as_str()
                    ),
                ));
            }
        }
        for role in RENDERER_COLOR_ROLES {
            if !self.colors.contains_key(role) {
                debug!(
                    "Theme '{}' has no color '{}', the default theme will supply it",
                    self.name, role
                );
            }
        }
        Ok(())
    }

    pub fn resolve_color(&self, role: &str) -> GuideResult<ColorValue> {
        self.colors
            .get(role)
            .copied()
            .ok_or_else(|| self.unknown(RoleKind::Color, role))
    }

    pub fn resolve_font(&self, role: &str) -> GuideResult<&FontSpec> {
        self.fonts
            .get(role)
            .ok_or_else(|| self.unknown(RoleKind::Font, role))
    }

    pub fn note_style(&self, note_type: NoteType) -> GuideResult<&NoteStyle> {
        self.components
            .note
            .get(note_type.as_str())
            .ok_or_else(|| self.unknown(RoleKind::Note, note_type.as_str()))
    }

    pub fn spacing(&self, name: &str) -> Option<u32> {
        self.spacing.get(name).copied()
    }

    fn unknown(&self, kind: RoleKind, role: &str) -> GuideError {
        GuideError::UnknownRole {
            kind,
            role: role.to_string(),
            theme: self.name.clone(),
        }
    }

    /// The built-in light theme; it defines every renderer role.
    pub fn built_in() -> Self {
        let colors: HashMap<String, ColorValue> = [
            ("primary", ColorValue::rgb(0x19, 0x76, 0xD2)),
            ("secondary", ColorValue::rgb(0x42, 0x42, 0x42)),
            ("background", ColorValue::rgb(0xFF, 0xFF, 0xFF)),
            ("surface", ColorValue::rgb(0xF5, 0xF5, 0xF5)),
            ("text_primary", ColorValue::rgb(0x21, 0x21, 0x21)),
            ("text_secondary", ColorValue::rgb(0x75, 0x75, 0x75)),
            ("border", ColorValue::rgb(0xE0, 0xE0, 0xE0)),
            ("code_background", ColorValue::rgb(0xF8, 0xF8, 0xF8)),
            ("code_text", ColorValue::rgb(0x37, 0x47, 0x4F)),
            ("success", ColorValue::rgb(0x4C, 0xAF, 0x50)),
            ("warning", ColorValue::rgb(0xFF, 0x98, 0x00)),
            ("error", ColorValue::rgb(0xF4, 0x43, 0x36)),
            ("info", ColorValue::rgb(0x21, 0x96, 0xF3)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let fonts: HashMap<String, FontSpec> = [
            (FONT_HEADING, FontSpec::new("Arial", 14, FontWeight::Bold)),
            (FONT_BODY, FontSpec::new("Arial", 10, FontWeight::Normal)),
            (FONT_CODE, FontSpec::new("Consolas", 9, FontWeight::Normal)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let spacing: HashMap<String, u32> = [
            ("small", 5),
            ("medium", 10),
            ("large", 20),
            ("section", 30),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let note_pair = |bg: ColorValue, border: ColorValue| NoteStyle {
            background: bg,
            border,
            text: None,
        };
        let note: HashMap<String, NoteStyle> = [
            (
                NoteType::Tip,
                note_pair(ColorValue::rgb(0xE8, 0xF5, 0xE8), ColorValue::rgb(0x4C, 0xAF, 0x50)),
            ),
            (
                NoteType::Warning,
                note_pair(ColorValue::rgb(0xFF, 0xF3, 0xE0), ColorValue::rgb(0xFF, 0x98, 0x00)),
            ),
            (
                NoteType::Info,
                note_pair(ColorValue::rgb(0xE3, 0xF2, 0xFD), ColorValue::rgb(0x21, 0x96, 0xF3)),
            ),
            (
                NoteType::Success,
                note_pair(ColorValue::rgb(0xE8, 0xF5, 0xE8), ColorValue::rgb(0x2E, 0x7D, 0x32)),
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.as_str().to_string(), v))
        .collect();

        let mut code_block = HashMap::new();
        code_block.insert("border_radius".to_string(), StyleValue::Integer(4));
        code_block.insert("padding".to_string(), StyleValue::Integer(10));

        Self {
            name: DEFAULT_THEME_NAME.to_string(),
            version: "1.0".to_string(),
            description: "Built-in light theme".to_string(),
            colors,
            fonts,
            spacing,
            components: ThemeComponents {
                code_block,
                note,
                ..Default::default()
            },
        }
    }
}

static DEFAULT_THEME: OnceLock<Theme> = OnceLock::new();

/// Process-wide default theme, built on first use and immutable afterwards.
pub fn default_theme() -> &'static Theme {
    DEFAULT_THEME.get_or_init(Theme::built_in)
}

/// Loads `<themes_dir>/<name>.json` and validates it.
///
/// # Arguments
/// * `themes_dir` - directory holding theme documents
/// * `name` - theme name (file stem), e.g. "default" or "dark"
///
/// # Returns
/// * `Ok(Theme)` - validated theme
/// * `Err(GuideError::Schema)` - bad name, malformed document or missing renderer keys
/// * `Err(GuideError::Io)` - theme file could not be read
pub fn load_theme(themes_dir: &Path, name: &str) -> GuideResult<Theme> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(GuideError::schema(
            themes_dir.display().to_string(),
            format!("invalid theme name '{}'", name),
        ));
    }
    let path = themes_dir.join(format!("{}.json", name));
    let theme: Theme = load_document(&path)?;
    let origin = path.display().to_string();
    theme.validate(&origin)?;
    if theme.name != name {
        warn!("Theme file '{}' declares name '{}'", origin, theme.name);
    }
    info!("Loaded theme '{}' from '{}'", theme.name, origin);
    Ok(theme)
}

/// Color lookup with fallback to the default theme.
pub fn resolve_color_or_default(theme: &Theme, role: &str) -> GuideResult<ColorValue> {
    theme.resolve_color(role).or_else(|e| {
        debug!("{}; falling back to the default theme", e);
        default_theme().resolve_color(role)
    })
}

/// Font lookup with fallback to the default theme.
pub fn resolve_font_or_default<'a>(theme: &'a Theme, role: &str) -> GuideResult<&'a FontSpec> {
    match theme.resolve_font(role) {
        Ok(font) => Ok(font),
        Err(e) => {
            debug!("{}; falling back to the default theme", e);
            default_theme().resolve_font(role)
        }
    }
}

/// Note style lookup with fallback to the default theme.
pub fn note_style_or_default(theme: &Theme, note_type: NoteType) -> GuideResult<&NoteStyle> {
    match theme.note_style(note_type) {
        Ok(style) => Ok(style),
        Err(e) => {
            debug!("{}; falling back to the default theme", e);
            default_theme().note_style(note_type)
        }
    }
}
