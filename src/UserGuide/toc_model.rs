//! # Table-of-Contents Model
//!
//! ## Purpose
//! Hierarchical navigation tree of the guide. Each node carries a localized
//! title and an icon and is either a leaf pointing at a content document or a
//! branch owning an ordered list of child nodes.
//!
//! ## TOC Format
//! ```json
//! {
//!   "metadata": {"version": "1.0", "languages": ["ru", "en"], "default_language": "ru",
//!                "title": {"ru": "Руководство", "en": "User guide"}},
//!   "settings": {"theme": "default", "auto_save": true, "search_enabled": true},
//!   "structure": {
//!     "introduction": {"title": {...}, "icon": "info", "content_file": "content/introduction.json"},
//!     "getting_started": {"title": {...}, "icon": "rocket", "children": {
//!         "installation": {"title": {...}, "icon": "download", "content_file": "content/installation.json"}
//!     }}
//!   }
//! }
//! ```
//!
//! Children keep the order of the document (display order) and duplicate keys
//! are rejected instead of silently overwritten. The tree owns its nodes, so a
//! cycle cannot be expressed.

use crate::UserGuide::content_model::{ContentSection, localized};
use crate::UserGuide::guide_errors::{GuideError, GuideResult};
use crate::Utils::load_from_file::{parse_document, read_document_text};
use log::info;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocMetadata {
    #[serde(default)]
    pub version: String,
    pub languages: Vec<String>,
    pub default_language: String,
    #[serde(default)]
    pub title: HashMap<String, String>,
}

fn default_theme_name() -> String {
    crate::UserGuide::theme_model::DEFAULT_THEME_NAME.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocSettings {
    #[serde(default = "default_theme_name")]
    pub theme: String,
    #[serde(default)]
    pub auto_save: bool,
    #[serde(default = "default_true")]
    pub search_enabled: bool,
}

impl Default for TocSettings {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            auto_save: false,
            search_enabled: true,
        }
    }
}

/// What a node points at
#[derive(Debug, Clone, PartialEq)]
pub enum TocTarget {
    /// path of the content document, relative to the guide root
    ContentFile(String),
    Children(Vec<TocNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTocNode", into = "RawTocNode")]
pub struct TocNode {
    /// mapping key of the node in its parent; equals the section id for leaves
    pub key: String,
    pub title: HashMap<String, String>,
    pub icon: String,
    pub target: TocTarget,
}

impl TocNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.target, TocTarget::ContentFile(_))
    }

    pub fn content_file(&self) -> Option<&str> {
        match &self.target {
            TocTarget::ContentFile(path) => Some(path),
            TocTarget::Children(_) => None,
        }
    }

    pub fn children(&self) -> &[TocNode] {
        match &self.target {
            TocTarget::Children(children) => children,
            TocTarget::ContentFile(_) => &[],
        }
    }

    /// Localized title with fallback to the default language, then to the key.
    pub fn title_for(&self, language: &str, default_language: &str) -> &str {
        localized(&self.title, language, default_language).unwrap_or(&self.key)
    }
}

/// Node as it appears in the document, before the leaf/branch check.
#[derive(Serialize, Deserialize)]
pub struct RawTocNode {
    title: HashMap<String, String>,
    icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<OrderedNodes>,
}

impl TryFrom<RawTocNode> for TocNode {
    type Error = String;
    fn try_from(raw: RawTocNode) -> Result<Self, Self::Error> {
        if raw.title.is_empty() {
            return Err("node title must have at least one language".to_string());
        }
        let target = match (raw.content_file, raw.children) {
            (Some(path), None) => {
                if path.trim().is_empty() {
                    return Err("content_file must not be empty".to_string());
                }
                TocTarget::ContentFile(path)
            }
            (None, Some(children)) => TocTarget::Children(children.0),
            (Some(_), Some(_)) => {
                return Err("node has both 'content_file' and 'children'".to_string());
            }
            (None, None) => {
                return Err("node has neither 'content_file' nor 'children'".to_string());
            }
        };
        // the key is filled in by the enclosing map
        Ok(TocNode {
            key: String::new(),
            title: raw.title,
            icon: raw.icon,
            target,
        })
    }
}

impl From<TocNode> for RawTocNode {
    fn from(node: TocNode) -> Self {
        let (content_file, children) = match node.target {
            TocTarget::ContentFile(path) => (Some(path), None),
            TocTarget::Children(children) => (None, Some(OrderedNodes(children))),
        };
        RawTocNode {
            title: node.title,
            icon: node.icon,
            content_file,
            children,
        }
    }
}

/// JSON object of nodes read in document order, keys copied into the nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderedNodes(pub Vec<TocNode>);

impl<'de> Deserialize<'de> for OrderedNodes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodesVisitor;

        impl<'de> Visitor<'de> for NodesVisitor {
            type Value = OrderedNodes;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of table-of-contents nodes")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut seen = HashSet::new();
                let mut nodes = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(key) = access.next_key::<String>()? {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format!(
                            "duplicate table-of-contents key '{}'",
                            key
                        )));
                    }
                    let mut node: TocNode = access.next_value()?;
                    node.key = key;
                    nodes.push(node);
                }
                Ok(OrderedNodes(nodes))
            }
        }

        deserializer.deserialize_map(NodesVisitor)
    }
}

impl Serialize for OrderedNodes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for node in &self.0 {
            map.serialize_entry(&node.key, node)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocTree {
    pub metadata: TocMetadata,
    #[serde(default)]
    pub settings: TocSettings,
    pub structure: OrderedNodes,
}

impl TocTree {
    pub fn from_json_str(text: &str, origin: &str) -> GuideResult<Self> {
        let tree: TocTree = parse_document(text, origin)?;
        tree.validate(origin)?;
        Ok(tree)
    }

    pub fn validate(&self, origin: &str) -> GuideResult<()> {
        if self.metadata.languages.is_empty() {
            return Err(GuideError::schema(origin, "metadata.languages is empty"));
        }
        if !self
            .metadata
            .languages
            .contains(&self.metadata.default_language)
        {
            return Err(GuideError::schema(
                origin,
                format!(
                    "default_language '{}' is not listed in metadata.languages",
                    self.metadata.default_language
                ),
            ));
        }
        Ok(())
    }

    pub fn roots(&self) -> &[TocNode] {
        &self.structure.0
    }

    pub fn default_language(&self) -> &str {
        &self.metadata.default_language
    }

    pub fn list_languages(&self) -> BTreeSet<String> {
        self.metadata.languages.iter().cloned().collect()
    }

    /// Localized title of the whole guide
    pub fn title(&self, language: &str) -> Option<&str> {
        localized(&self.metadata.title, language, &self.metadata.default_language)
    }

    /// Depth-first pre-order search for a node by key, first match wins.
    pub fn find_node(&self, key: &str) -> Option<&TocNode> {
        fn walk<'a>(nodes: &'a [TocNode], key: &str) -> Option<&'a TocNode> {
            for node in nodes {
                if node.key == key {
                    return Some(node);
                }
                if let Some(found) = walk(node.children(), key) {
                    return Some(found);
                }
            }
            None
        }
        walk(self.roots(), key)
    }

    /// Content file of the section, relative to the guide root.
    ///
    /// # Returns
    /// * `Ok(&str)` - `content_file` of the matching leaf
    /// * `Err(GuideError::SectionNotFound)` - no node has this key, or it is a branch
    pub fn resolve_path(&self, section_id: &str) -> GuideResult<&str> {
        self.find_node(section_id)
            .and_then(TocNode::content_file)
            .ok_or_else(|| GuideError::SectionNotFound(section_id.to_string()))
    }

    /// Nodes from the root down to the node with `key` (inclusive).
    pub fn breadcrumb(&self, key: &str) -> Option<Vec<&TocNode>> {
        fn walk<'a>(nodes: &'a [TocNode], key: &str, path: &mut Vec<&'a TocNode>) -> bool {
            for node in nodes {
                path.push(node);
                if node.key == key || walk(node.children(), key, path) {
                    return true;
                }
                path.pop();
            }
            false
        }
        let mut path = Vec::new();
        if walk(self.roots(), key, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// Leaf nodes in display order.
    pub fn leaves(&self) -> Vec<&TocNode> {
        fn walk<'a>(nodes: &'a [TocNode], out: &mut Vec<&'a TocNode>) {
            for node in nodes {
                if node.is_leaf() {
                    out.push(node);
                } else {
                    walk(node.children(), out);
                }
            }
        }
        let mut out = Vec::new();
        walk(self.roots(), &mut out);
        out
    }

    /// Section ids in display order.
    pub fn section_ids(&self) -> Vec<&str> {
        self.leaves().into_iter().map(|n| n.key.as_str()).collect()
    }

    pub fn next_section(&self, section_id: &str) -> Option<&str> {
        let ids = self.section_ids();
        let pos = ids.iter().position(|id| *id == section_id)?;
        ids.get(pos + 1).copied()
    }

    pub fn previous_section(&self, section_id: &str) -> Option<&str> {
        let ids = self.section_ids();
        let pos = ids.iter().position(|id| *id == section_id)?;
        pos.checked_sub(1).and_then(|p| ids.get(p).copied())
    }

    /// Every node with its depth, pre-order. Used for indented listings.
    pub fn flatten(&self) -> Vec<(usize, &TocNode)> {
        fn walk<'a>(nodes: &'a [TocNode], depth: usize, out: &mut Vec<(usize, &'a TocNode)>) {
            for node in nodes {
                out.push((depth, node));
                walk(node.children(), depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(self.roots(), 0, &mut out);
        out
    }
}

/// Reads and validates the table of contents.
pub fn load_toc(path: &Path) -> GuideResult<TocTree> {
    let text = read_document_text(path)?;
    let origin = path.display().to_string();
    let tree = TocTree::from_json_str(&text, &origin)?;
    info!(
        "Loaded table of contents '{}': {} sections, languages {:?}",
        origin,
        tree.leaves().len(),
        tree.metadata.languages
    );
    Ok(tree)
}

/// Related section ids exactly as listed by the section.
pub fn list_related(section: &ContentSection) -> &[String] {
    &section.related_sections
}
