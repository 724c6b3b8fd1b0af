/// eng
/// Error taxonomy of the guide: schema errors, missing languages, unknown theme roles,
/// missing sections and I/O failures
/// ru
/// Классификация ошибок руководства: ошибки схемы, отсутствующие языки, неизвестные роли темы,
/// отсутствующие разделы и ошибки ввода-вывода
pub mod guide_errors;
/// eng
/// One section of the guide: localized metadata and, for every language, an ordered sequence of
/// blocks (heading, paragraph, list, code, note). Loading validates the document completely.
/// ru
/// Раздел руководства: локализованные метаданные и, для каждого языка, упорядоченная
/// последовательность блоков (заголовок, абзац, список, код, примечание).
pub mod content_model;
/// eng
/// Visual theme: colors, fonts, spacing and component overrides, plus the built-in default theme
/// used when the active theme lacks a role
/// ru
/// Тема оформления: цвета, шрифты, отступы и настройки компонентов, а также встроенная тема
/// по умолчанию
pub mod theme_model;
/// eng
/// Table of contents: ordered navigation tree mapping section ids to content files
/// ru
/// Оглавление: упорядоченное дерево навигации, связывающее идентификаторы разделов с файлами
pub mod toc_model;
/// eng
/// Loader/resolver: the entry point of the GUI host. Section id + language -> section, theme and
/// localized blocks, with per-section caching
/// ru
/// Загрузчик: точка входа для графического интерфейса. Идентификатор раздела + язык -> раздел,
/// тема и локализованные блоки
pub mod guide_loader;
/// terminal rendering of blocks with theme colors
pub mod guide_render;
/// text search over sections
pub mod guide_search;
#[cfg(test)]
mod guide_tests;
