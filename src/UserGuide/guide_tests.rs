/////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS over the sample guide shipped in src/assets/guide
//////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::UserGuide::content_model::{
        BlockKind, BlockView, ContentBlock, ContentSection, load_section,
    };
    use crate::UserGuide::guide_errors::GuideError;
    use crate::UserGuide::guide_loader::GuideLoader;
    use crate::UserGuide::guide_render::{TextMode, render_text};
    use crate::UserGuide::guide_search::search;
    use crate::UserGuide::theme_model::{RENDERER_COLOR_ROLES, load_theme};
    use crate::guide_config::GuideConfig;
    use std::fs;
    use std::path::PathBuf;

    fn guide_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/assets/guide")
    }

    fn sample_loader() -> GuideLoader {
        GuideLoader::new(GuideConfig::with_root(guide_root())).unwrap()
    }

    #[test]
    fn test_installation_first_block() {
        let mut loader = sample_loader();
        let renderable = loader.get_renderable_section("installation", "en").unwrap();
        match &renderable.blocks[0] {
            ContentBlock::Heading(heading) => {
                assert_eq!(heading.text, "Open ThermoKinetics Installation & Setup");
                assert_eq!(heading.level, 1);
            }
            other => panic!("expected heading, got {:?}", other),
        }
        assert_eq!(renderable.theme.name, "default");
        assert_eq!(renderable.language, "en");
    }

    #[test]
    fn test_unknown_language_falls_back_to_ru() {
        let mut loader = sample_loader();
        let renderable = loader.get_renderable_section("installation", "fr").unwrap();
        assert_eq!(renderable.language, "ru");
        assert_eq!(
            renderable.blocks.as_slice(),
            renderable.section.content["ru"].as_slice()
        );
    }

    #[test]
    fn test_nonexistent_section() {
        let mut loader = sample_loader();
        assert!(matches!(
            loader.get_renderable_section("nonexistent_section", "en"),
            Err(GuideError::SectionNotFound(_))
        ));
    }

    #[test]
    fn test_sample_guide_verifies_cleanly() {
        let mut loader = sample_loader();
        let report = loader.verify();
        assert!(report.is_ok(), "{:?}", report.errors);
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.checked_sections, 5);
        assert_eq!(loader.cached_sections(), 5);
    }

    #[test]
    fn test_every_sample_section_round_trips() {
        let loader = sample_loader();
        for id in loader.toc().section_ids() {
            let path = guide_root().join(loader.toc().resolve_path(id).unwrap());
            let section = load_section(&path, "ru").unwrap();
            let text = section.to_json_string().unwrap();
            let reloaded = ContentSection::from_json_str(&text, id, "ru").unwrap();
            assert_eq!(section, reloaded, "section {}", id);
        }
    }

    #[test]
    fn test_sample_themes() {
        let themes = guide_root().join("themes");
        let default = load_theme(&themes, "default").unwrap();
        for role in RENDERER_COLOR_ROLES {
            assert!(default.resolve_color(role).is_ok(), "default lacks {}", role);
        }
        let dark = load_theme(&themes, "dark").unwrap();
        assert_eq!(dark.name, "dark");
    }

    #[test]
    fn test_dark_theme_override_renders() {
        let mut config = GuideConfig::with_root(guide_root());
        config.theme = Some("dark".to_string());
        let mut loader = GuideLoader::new(config).unwrap();
        let renderable = loader.get_renderable_section("deconvolution", "en").unwrap();
        assert_eq!(renderable.theme.name, "dark");
        let text = render_text(&renderable, TextMode::Ansi).unwrap();
        // primary color of the dark theme
        assert!(text.contains("\x1b[38;2;144;202;249m"));
        let plain = render_text(&renderable, TextMode::Plain).unwrap();
        assert!(plain.starts_with("# Peak deconvolution"));
        assert!(plain.contains("[SUCCESS]"));
    }

    #[test]
    fn test_search_in_both_languages() {
        let mut loader = sample_loader();
        let hits = search(&mut loader, "poetry", "en").unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.section_id.as_str()).collect();
        assert_eq!(ids, vec!["installation"]);

        let hits = search(&mut loader, "вязовкин", "ru").unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.section_id.as_str()).collect();
        assert_eq!(ids, vec!["introduction", "model_fitting"]);

        let hits = search(&mut loader, "вязовкин", "en").unwrap();
        assert!(hits.is_empty());

        assert!(search(&mut loader, "   ", "en").unwrap().is_empty());
    }

    #[test]
    fn test_search_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let toc = fs::read_to_string(guide_root().join("toc.json"))
            .unwrap()
            .replace("\"search_enabled\": true", "\"search_enabled\": false");
        fs::write(dir.path().join("toc.json"), toc).unwrap();
        let mut loader = GuideLoader::new(GuideConfig::with_root(dir.path())).unwrap();
        assert!(search(&mut loader, "poetry", "en").unwrap().is_empty());
    }

    #[test]
    fn test_navigation_order() {
        let loader = sample_loader();
        assert_eq!(
            loader.toc().section_ids(),
            vec![
                "introduction",
                "installation",
                "file_loading",
                "deconvolution",
                "model_fitting"
            ]
        );
        assert_eq!(loader.toc().next_section("installation"), Some("file_loading"));
        let kinds: Vec<BlockKind> = {
            let mut loader = sample_loader();
            let renderable = loader.get_renderable_section("file_loading", "ru").unwrap();
            renderable.blocks.iter().map(|b| b.kind()).collect()
        };
        assert_eq!(kinds[0], BlockKind::Heading);
        assert!(kinds.contains(&BlockKind::Code));
    }
}
