//! # Block Renderer
//!
//! Resolves the theme roles each block needs (falling back to the built-in
//! default theme for roles the active theme lacks) and renders a block
//! sequence as terminal text. Drawing in a real GUI is the host's business;
//! the host can reuse `block_style` for that.

use crate::UserGuide::content_model::{BlockView, ContentBlock, ListType};
use crate::UserGuide::guide_errors::GuideResult;
use crate::UserGuide::guide_loader::RenderableSection;
use crate::UserGuide::theme_model::{
    COLOR_BORDER, COLOR_CODE_BACKGROUND, ColorValue, FontSpec, FontWeight, Theme, component_style,
    note_style_or_default, resolve_color_or_default, resolve_font_or_default,
};

/// Fully resolved style of one block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStyle {
    pub font: FontSpec,
    pub color: ColorValue,
    pub background: Option<ColorValue>,
    pub border: Option<ColorValue>,
}

pub fn block_style(block: &ContentBlock, theme: &Theme) -> GuideResult<BlockStyle> {
    let font = resolve_font_or_default(theme, block.font_role())?.clone();
    let color = resolve_color_or_default(theme, block.color_role())?;
    let style = match block {
        ContentBlock::Code(_) => {
            let overrides = &theme.components.code_block;
            let background = component_style(overrides, "background").and_then(|v| v.as_color());
            let background = match background {
                Some(c) => c,
                None => resolve_color_or_default(theme, COLOR_CODE_BACKGROUND)?,
            };
            let border = component_style(overrides, "border").and_then(|v| v.as_color());
            let border = match border {
                Some(c) => c,
                None => resolve_color_or_default(theme, COLOR_BORDER)?,
            };
            BlockStyle {
                font,
                color,
                background: Some(background),
                border: Some(border),
            }
        }
        ContentBlock::Note(note) => {
            let note_style = note_style_or_default(theme, note.note_type)?;
            BlockStyle {
                font,
                color: note_style.text.unwrap_or(color),
                background: Some(note_style.background),
                border: Some(note_style.border),
            }
        }
        _ => BlockStyle {
            font,
            color,
            background: None,
            border: None,
        },
    };
    Ok(style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Plain,
    /// 24-bit ANSI colors taken from the theme
    Ansi,
}

const RESET: &str = "\x1b[0m";

fn fg(c: ColorValue) -> String {
    format!("\x1b[38;2;{};{};{}m", c.r, c.g, c.b)
}

fn bg(c: ColorValue) -> String {
    format!("\x1b[48;2;{};{};{}m", c.r, c.g, c.b)
}

fn paint(text: &str, style: &BlockStyle, mode: TextMode, with_background: bool) -> String {
    match mode {
        TextMode::Plain => text.to_string(),
        TextMode::Ansi => {
            let mut out = String::new();
            if style.font.weight == FontWeight::Bold {
                out.push_str("\x1b[1m");
            }
            out.push_str(&fg(style.color));
            if with_background {
                if let Some(background) = style.background {
                    out.push_str(&bg(background));
                }
            }
            out.push_str(text);
            out.push_str(RESET);
            out
        }
    }
}

fn render_block(block: &ContentBlock, theme: &Theme, mode: TextMode) -> GuideResult<String> {
    let style = block_style(block, theme)?;
    let text = match block {
        ContentBlock::Heading(h) => {
            let marker = "#".repeat(h.level as usize);
            paint(&format!("{} {}", marker, h.text), &style, mode, false)
        }
        ContentBlock::Paragraph(p) => paint(&p.text, &style, mode, false),
        ContentBlock::List(list) => list
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let line = match list.list_type {
                    ListType::Ordered => format!("  {}. {}", i + 1, item),
                    ListType::Unordered => format!("  • {}", item),
                };
                paint(&line, &style, mode, false)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        ContentBlock::Code(code) => {
            let mut lines = Vec::new();
            if !code.language.is_empty() {
                lines.push(format!("    [{}]", code.language));
            }
            for line in code.code.lines() {
                lines.push(paint(&format!("    {}", line), &style, mode, true));
            }
            lines.join("\n")
        }
        ContentBlock::Note(note) => {
            let label = format!("[{}]", note.note_type.as_str().to_uppercase());
            match mode {
                TextMode::Plain => format!("{} {}", label, note.text),
                TextMode::Ansi => {
                    let border = style.border.unwrap_or(style.color);
                    format!(
                        "\x1b[1m{}{}{} {}",
                        fg(border),
                        label,
                        RESET,
                        paint(&note.text, &style, mode, false)
                    )
                }
            }
        }
    };
    Ok(text)
}

/// Renders blocks separated by blank lines.
pub fn render_blocks(
    blocks: &[ContentBlock],
    theme: &Theme,
    mode: TextMode,
) -> GuideResult<String> {
    let rendered = blocks
        .iter()
        .map(|block| render_block(block, theme, mode))
        .collect::<GuideResult<Vec<String>>>()?;
    Ok(rendered.join("\n\n"))
}

pub fn render_text(renderable: &RenderableSection, mode: TextMode) -> GuideResult<String> {
    render_blocks(&renderable.blocks, &renderable.theme, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserGuide::content_model::{
        CodeBlock, Heading, ListBlock, NoteBlock, NoteType, Paragraph,
    };
    use crate::UserGuide::theme_model::{FONT_HEADING, NoteStyle, StyleValue, default_theme};

    fn blocks() -> Vec<ContentBlock> {
        vec![
            Heading {
                level: 2,
                text: "Peaks".to_string(),
            }
            .into(),
            Paragraph {
                text: "Fit the curve.".to_string(),
            }
            .into(),
            ListBlock {
                list_type: ListType::Ordered,
                items: vec!["Load".to_string(), "Fit".to_string()],
            }
            .into(),
            CodeBlock {
                language: "bash".to_string(),
                code: "poetry install\npoetry run ssk-gui".to_string(),
            }
            .into(),
            NoteBlock {
                note_type: NoteType::Tip,
                text: "Save often.".to_string(),
            }
            .into(),
        ]
    }

    #[test]
    fn test_plain_rendering() {
        let text = render_blocks(&blocks(), default_theme(), TextMode::Plain).unwrap();
        let expected = "## Peaks\n\nFit the curve.\n\n  1. Load\n  2. Fit\n\n    [bash]\n    poetry install\n    poetry run ssk-gui\n\n[TIP] Save often.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_unordered_list() {
        let list: ContentBlock = ListBlock {
            list_type: ListType::Unordered,
            items: vec!["a".to_string()],
        }
        .into();
        let text = render_blocks(&[list], default_theme(), TextMode::Plain).unwrap();
        assert_eq!(text, "  • a");
    }

    #[test]
    fn test_ansi_uses_theme_colors() {
        let mut theme = Theme::built_in();
        theme
            .colors
            .insert("primary".to_string(), ColorValue::rgb(10, 20, 30));
        let blocks = blocks();
        let text = render_blocks(&blocks[..1], &theme, TextMode::Ansi).unwrap();
        assert!(text.contains("\x1b[38;2;10;20;30m"));
        assert!(text.starts_with("\x1b[1m"));
        assert!(text.ends_with(RESET));
    }

    #[test]
    fn test_missing_roles_fall_back_to_default() {
        let mut theme = Theme::built_in();
        theme.name = "sparse".to_string();
        theme.colors.clear();
        theme.fonts.remove(FONT_HEADING);
        theme.components.note.clear();

        let blocks = blocks();
        let style = block_style(&blocks[0], &theme).unwrap();
        assert_eq!(style.color, default_theme().resolve_color("primary").unwrap());
        assert_eq!(&style.font, default_theme().resolve_font("heading").unwrap());

        let style = block_style(&blocks[4], &theme).unwrap();
        assert_eq!(
            style.border,
            Some(default_theme().note_style(NoteType::Tip).unwrap().border)
        );
    }

    #[test]
    fn test_component_overrides() {
        let mut theme = Theme::built_in();
        theme.components.code_block.insert(
            "background".to_string(),
            StyleValue::Text("#263238".to_string()),
        );
        theme.components.note.insert(
            "tip".to_string(),
            NoteStyle {
                background: ColorValue::rgb(1, 1, 1),
                border: ColorValue::rgb(2, 2, 2),
                text: Some(ColorValue::rgb(3, 3, 3)),
            },
        );
        let blocks = blocks();
        let code = block_style(&blocks[3], &theme).unwrap();
        assert_eq!(code.background, Some(ColorValue::rgb(0x26, 0x32, 0x38)));
        let note = block_style(&blocks[4], &theme).unwrap();
        assert_eq!(note.color, ColorValue::rgb(3, 3, 3));
        assert_eq!(note.background, Some(ColorValue::rgb(1, 1, 1)));
    }
}
