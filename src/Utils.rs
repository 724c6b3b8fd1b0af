/// eng
/// Reading and parsing of JSON guide documents with positioned diagnostics
/// ru
/// Чтение и разбор JSON документов руководства с указанием места ошибки
pub mod load_from_file;
/// terminal logger initialisation
pub mod logging;
