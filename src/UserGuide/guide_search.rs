//! Case-insensitive text search over the guide.
//!
//! Sections are visited in table-of-contents order; a section matches when
//! its localized title or the text of any block in the chosen language
//! contains the query. Search is disabled by `settings.search_enabled: false`.

use crate::UserGuide::content_model::{BlockView, get_blocks};
use crate::UserGuide::guide_errors::{GuideError, GuideResult};
use crate::UserGuide::guide_loader::GuideLoader;
use log::info;
use regex::{Regex, RegexBuilder};

/// characters of context kept on each side of a match
const SNIPPET_CONTEXT: usize = 40;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub section_id: String,
    pub title: String,
    pub snippet: String,
}

fn build_matcher(query: &str) -> GuideResult<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .map_err(|e| GuideError::schema("search query", e.to_string()))
}

fn snippet(text: &str, start: usize, end: usize) -> String {
    let before: Vec<usize> = text[..start].char_indices().map(|(i, _)| i).collect();
    let from = if before.len() > SNIPPET_CONTEXT {
        before[before.len() - SNIPPET_CONTEXT]
    } else {
        0
    };
    let to = text[end..]
        .char_indices()
        .nth(SNIPPET_CONTEXT)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    let mut out = String::new();
    if from > 0 {
        out.push('…');
    }
    out.push_str(&text[from..to].replace('\n', " "));
    if to < text.len() {
        out.push('…');
    }
    out
}

/// Searches every section of the guide.
///
/// # Arguments
/// * `loader` - loader whose TOC and caches are used
/// * `query` - literal text, matched case-insensitively
/// * `language` - language to search in (default language when a section lacks it)
///
/// # Returns
/// Hits in display order, empty for a blank query or when search is disabled.
/// Errors of loading a section are returned as is.
pub fn search(
    loader: &mut GuideLoader,
    query: &str,
    language: &str,
) -> GuideResult<Vec<SearchHit>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    if !loader.toc().settings.search_enabled {
        info!("Search is disabled by the table of contents settings");
        return Ok(Vec::new());
    }
    let matcher = build_matcher(query)?;
    let default_language = loader.effective_default_language().to_string();
    let ids: Vec<String> = loader
        .toc()
        .section_ids()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut hits = Vec::new();
    for id in ids {
        let section = loader.section(&id)?;
        let title = section
            .title(language, &default_language)
            .unwrap_or(&id)
            .to_string();
        let mut found = matcher
            .find(&title)
            .map(|m| snippet(&title, m.start(), m.end()));
        if found.is_none() {
            for block in get_blocks(&section, language, &default_language)? {
                let text = block.plain_text();
                if let Some(m) = matcher.find(&text) {
                    found = Some(snippet(&text, m.start(), m.end()));
                    break;
                }
            }
        }
        if let Some(snippet) = found {
            hits.push(SearchHit {
                section_id: id,
                title,
                snippet,
            });
        }
    }
    info!("Search for '{}' found {} sections", query, hits.len());
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_short_text() {
        assert_eq!(snippet("find me", 0, 4), "find me");
    }

    #[test]
    fn test_snippet_long_text_is_cut() {
        let text = format!("{}needle{}", "a".repeat(60), "b\n".repeat(40));
        let start = 60;
        let s = snippet(&text, start, start + 6);
        assert!(s.starts_with('…'));
        assert!(s.ends_with('…'));
        assert!(s.contains("needle"));
        assert!(!s.contains('\n'));
    }

    #[test]
    fn test_snippet_multibyte() {
        let text = "Деконволюция пиков выполняется методом наименьших квадратов для каждой кривой";
        let m = build_matcher("МЕТОДОМ").unwrap().find(text).unwrap();
        let s = snippet(text, m.start(), m.end());
        assert!(s.contains("методом"));
    }

    #[test]
    fn test_query_is_literal() {
        let matcher = build_matcher("a.c (x)").unwrap();
        assert!(matcher.is_match("A.C (X)"));
        assert!(!matcher.is_match("abc (x)"));
    }
}
