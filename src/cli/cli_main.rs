use crate::UserGuide::guide_errors::GuideError;
use crate::UserGuide::guide_loader::GuideLoader;
use crate::UserGuide::guide_render::{TextMode, render_text};
use crate::UserGuide::guide_search::search;
use crate::UserGuide::toc_model::TocTree;
use crate::guide_config::GuideConfigManager;
use prettytable::{Table, row};
use std::io::{self, Write};

/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - prompts

Red (\x1b[31m) - "content unavailable" messages

Reset (\x1b[0m) - Returns to normal color after each colored section
*/

/// Table of contents as a table: indented titles, ids and content files.
pub fn toc_table(toc: &TocTree, language: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Title", "Id", "Content file"]);
    for (depth, node) in toc.flatten() {
        let title = format!(
            "{}{}",
            "  ".repeat(depth),
            node.title_for(language, toc.default_language())
        );
        table.add_row(row![title, node.key, node.content_file().unwrap_or("")]);
    }
    table
}

pub fn run_interactive_menu(
    mut manager: GuideConfigManager,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut loader = GuideLoader::new(manager.get_config().clone())?;
    let mut language = manager.get_config().language.clone();
    loop {
        show_main_menu(&loader, &language)?;
        let choice = get_user_input()?;

        match choice.trim() {
            "1" => {
                toc_table(loader.toc(), &language).printstd();
            }
            "2" => {
                let id = prompt("Section id: ")?;
                show_section(&mut loader, id.trim(), &language);
            }
            "3" => {
                let query = prompt("Search for: ")?;
                match search(&mut loader, &query, &language) {
                    Ok(hits) if hits.is_empty() => println!("Nothing found."),
                    Ok(hits) => {
                        let mut table = Table::new();
                        table.add_row(row!["Id", "Title", "Match"]);
                        for hit in hits {
                            table.add_row(row![hit.section_id, hit.title, hit.snippet]);
                        }
                        table.printstd();
                    }
                    Err(e) => println!("\x1b[31mSearch failed: {}\x1b[0m", e),
                }
            }
            "4" => {
                let languages: Vec<String> = loader.toc().list_languages().into_iter().collect();
                let new_language = prompt(&format!("Language {:?}: ", languages))?;
                match manager.set_language(&new_language) {
                    Ok(()) => language = manager.get_config().language.clone(),
                    Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                }
            }
            "5" => {
                let name = prompt("Theme name (empty for the guide default): ")?;
                let name = name.trim();
                let theme = if name.is_empty() { None } else { Some(name) };
                match manager.set_theme(theme) {
                    Ok(()) => loader = GuideLoader::new(manager.get_config().clone())?,
                    Err(e) => println!("\x1b[31m{}\x1b[0m", e),
                }
            }
            "6" => {
                let report = loader.verify();
                println!(
                    "Checked {} sections: {} errors, {} warnings",
                    report.checked_sections,
                    report.errors.len(),
                    report.warnings.len()
                );
                for issue in report.errors.iter() {
                    println!("\x1b[31m  error   {}: {}\x1b[0m", issue.subject, issue.message);
                }
                for issue in report.warnings.iter() {
                    println!("\x1b[33m  warning {}: {}\x1b[0m", issue.subject, issue.message);
                }
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}

fn show_section(loader: &mut GuideLoader, section_id: &str, language: &str) {
    match loader.get_renderable_section(section_id, language) {
        Ok(renderable) => {
            if let Some(path) = loader.toc().breadcrumb(section_id) {
                let crumbs: Vec<&str> = path
                    .iter()
                    .map(|n| n.title_for(&renderable.language, loader.toc().default_language()))
                    .collect();
                println!("\x1b[36m{}\x1b[0m\n", crumbs.join(" / "));
            }
            match render_text(&renderable, TextMode::Ansi) {
                Ok(text) => println!("{}\n", text),
                Err(e) => println!("\x1b[31mContent unavailable: {}\x1b[0m", e),
            }
            let related = &renderable.section.related_sections;
            if !related.is_empty() {
                println!("See also: {}", related.join(", "));
            }
            if let Some(next) = loader.toc().next_section(section_id) {
                println!("Next: {}", next);
            }
        }
        Err(GuideError::SectionNotFound(id)) => {
            println!("\x1b[31mContent unavailable: there is no section '{}'\x1b[0m", id)
        }
        Err(e) => println!("\x1b[31mContent unavailable: {}\x1b[0m", e),
    }
}

fn show_main_menu(loader: &GuideLoader, language: &str) -> io::Result<()> {
    let title = loader.toc().title(language).unwrap_or("User guide");
    println!(
        "\x1b[34m\n {} \n language: {}, theme: {} \n \x1b[0m",
        title,
        language,
        loader.active_theme_name()
    );
    println!("\x1b[33m1. Table of contents\x1b[0m");
    println!("\x1b[33m2. Open section\x1b[0m");
    println!("\x1b[33m3. Search\x1b[0m");
    println!("\x1b[33m4. Change language\x1b[0m");
    println!("\x1b[33m5. Change theme\x1b[0m");
    println!("\x1b[33m6. Verify guide\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush()
}

fn prompt(text: &str) -> io::Result<String> {
    print!("\x1b[36m{}\x1b[0m", text);
    io::stdout().flush()?;
    get_user_input()
}

fn get_user_input() -> io::Result<String> {
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}
