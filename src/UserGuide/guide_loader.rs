//! # Guide Loader
//!
//! ## Purpose
//! Single entry point of the GUI host. Composes the TOC, content and theme
//! models: resolves a section id through the TOC, loads and validates the
//! section, loads the active theme and hands back the localized block
//! sequence ready for rendering.
//!
//! ## Caching
//! The TOC is loaded eagerly by `GuideLoader::new`. Sections and themes are
//! loaded lazily and cached by id/name, so each is read from disk at most once
//! per loader. Failed loads are not cached and are reported every time.
//!
//! ## Language and Theme Selection
//! - default language: `GuideConfig.default_language`, else TOC `default_language`
//! - theme: caller override, else `GuideConfig.theme`, else TOC `settings.theme`

use crate::UserGuide::content_model::{ContentBlock, ContentSection, get_blocks, load_section};
use crate::UserGuide::guide_errors::{GuideError, GuideResult};
use crate::UserGuide::theme_model::{Theme, load_theme};
use crate::UserGuide::toc_model::{TocTree, list_related, load_toc};
use crate::guide_config::GuideConfig;
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything the host needs to draw one section.
#[derive(Debug, Clone)]
pub struct RenderableSection {
    pub section: Arc<ContentSection>,
    pub theme: Arc<Theme>,
    pub blocks: Vec<ContentBlock>,
    /// language the blocks are actually in (requested or default)
    pub language: String,
}

impl RenderableSection {
    pub fn title(&self) -> Option<&str> {
        self.section.metadata.title.get(&self.language).map(String::as_str)
    }
}

/// One finding of `GuideLoader::verify`
#[derive(Debug, Clone, PartialEq)]
pub struct GuideIssue {
    /// section id or `theme:<name>`
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideReport {
    pub checked_sections: usize,
    pub errors: Vec<GuideIssue>,
    pub warnings: Vec<GuideIssue>,
}

impl GuideReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug)]
pub struct GuideLoader {
    config: GuideConfig,
    toc: TocTree,
    sections: HashMap<String, Arc<ContentSection>>,
    themes: HashMap<String, Arc<Theme>>,
}

impl GuideLoader {
    /// Loads `<guide_root>/toc.json` and prepares empty caches.
    pub fn new(config: GuideConfig) -> GuideResult<Self> {
        let toc = load_toc(&config.toc_path())?;
        Ok(Self::from_parts(config, toc))
    }

    pub fn from_parts(config: GuideConfig, toc: TocTree) -> Self {
        Self {
            config,
            toc,
            sections: HashMap::new(),
            themes: HashMap::new(),
        }
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    pub fn toc(&self) -> &TocTree {
        &self.toc
    }

    pub fn effective_default_language(&self) -> &str {
        self.config
            .default_language
            .as_deref()
            .unwrap_or(self.toc.default_language())
    }

    pub fn active_theme_name(&self) -> &str {
        self.config
            .theme
            .as_deref()
            .unwrap_or(&self.toc.settings.theme)
    }

    /// Number of sections currently held in the cache
    pub fn cached_sections(&self) -> usize {
        self.sections.len()
    }

    /// Loads (or returns the cached) section with this id.
    ///
    /// Besides the document's own validation, the section must carry the id of
    /// its TOC node and localize its metadata for every TOC language.
    pub fn section(&mut self, section_id: &str) -> GuideResult<Arc<ContentSection>> {
        if let Some(section) = self.sections.get(section_id) {
            debug!("Section '{}' served from cache", section_id);
            return Ok(Arc::clone(section));
        }
        let path = self.config.guide_root.join(self.toc.resolve_path(section_id)?);
        let origin = path.display().to_string();
        let section = load_section(&path, self.effective_default_language())?;
        if section.section_id != section_id {
            return Err(GuideError::schema(
                origin,
                format!(
                    "section_id '{}' does not match table-of-contents key '{}'",
                    section.section_id, section_id
                ),
            ));
        }
        section.check_languages(&origin, self.toc.metadata.languages.iter().map(String::as_str))?;

        let section = Arc::new(section);
        self.sections
            .insert(section_id.to_string(), Arc::clone(&section));
        Ok(section)
    }

    /// Loads (or returns the cached) theme by name.
    pub fn theme(&mut self, name: &str) -> GuideResult<Arc<Theme>> {
        if let Some(theme) = self.themes.get(name) {
            return Ok(Arc::clone(theme));
        }
        let theme = Arc::new(load_theme(&self.config.themes_dir(), name)?);
        self.themes.insert(name.to_string(), Arc::clone(&theme));
        Ok(theme)
    }

    pub fn active_theme(&mut self) -> GuideResult<Arc<Theme>> {
        let name = self.active_theme_name().to_string();
        self.theme(&name)
    }

    /// Resolves, loads and localizes a section for rendering.
    ///
    /// # Arguments
    /// * `section_id` - TOC key of the section
    /// * `language` - requested language; the default language is used when absent
    ///
    /// # Returns
    /// * `Ok(RenderableSection)` - section, active theme and localized blocks
    /// * `Err(GuideError)` - `SectionNotFound`, `Schema`, `Io` or `LanguageNotFound`
    pub fn get_renderable_section(
        &mut self,
        section_id: &str,
        language: &str,
    ) -> GuideResult<RenderableSection> {
        self.get_renderable_section_with_theme(section_id, language, None)
    }

    /// Same as `get_renderable_section` with an explicit theme name.
    pub fn get_renderable_section_with_theme(
        &mut self,
        section_id: &str,
        language: &str,
        theme_name: Option<&str>,
    ) -> GuideResult<RenderableSection> {
        let section = self.section(section_id)?;
        let theme = match theme_name {
            Some(name) => self.theme(name)?,
            None => self.active_theme()?,
        };
        let default_language = self.effective_default_language();
        let blocks = get_blocks(&section, language, default_language)?.to_vec();
        let used_language = if section.content.contains_key(language) {
            language.to_string()
        } else {
            info!(
                "Section '{}' has no '{}' content, showing '{}'",
                section_id, language, default_language
            );
            default_language.to_string()
        };
        Ok(RenderableSection {
            section,
            theme,
            blocks,
            language: used_language,
        })
    }

    /// Related sections of `section_id` exactly as the section lists them.
    pub fn related_sections(&mut self, section_id: &str) -> GuideResult<Vec<String>> {
        let section = self.section(section_id)?;
        Ok(list_related(&section).to_vec())
    }

    /// Loads every section of the TOC and the active theme, collecting problems.
    /// Broken documents are errors, dangling `related_sections` are warnings.
    pub fn verify(&mut self) -> GuideReport {
        let mut report = GuideReport::default();
        let ids: Vec<String> = self
            .toc
            .section_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        for id in ids {
            report.checked_sections += 1;
            match self.section(&id) {
                Ok(section) => {
                    for related in list_related(&section) {
                        let known = self
                            .toc
                            .find_node(related)
                            .map(|n| n.is_leaf())
                            .unwrap_or(false);
                        if !known {
                            warn!(
                                "Section '{}' refers to unknown related section '{}'",
                                id, related
                            );
                            report.warnings.push(GuideIssue {
                                subject: id.clone(),
                                message: format!(
                                    "related section '{}' is not in the table of contents",
                                    related
                                ),
                            });
                        }
                    }
                }
                Err(e) => {
                    error!("Section '{}' failed to load: {}", id, e);
                    report.errors.push(GuideIssue {
                        subject: id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        let theme_name = self.active_theme_name().to_string();
        if let Err(e) = self.active_theme() {
            error!("Theme '{}' failed to load: {}", theme_name, e);
            report.errors.push(GuideIssue {
                subject: format!("theme:{}", theme_name),
                message: e.to_string(),
            });
        }
        info!(
            "Guide verified: {} sections, {} errors, {} warnings",
            report.checked_sections,
            report.errors.len(),
            report.warnings.len()
        );
        report
    }
}
