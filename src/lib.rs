#[allow(non_snake_case)]
pub mod UserGuide;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
pub mod guide_config;

pub use UserGuide::guide_errors::{GuideError, GuideResult};
pub use UserGuide::guide_loader::{GuideLoader, RenderableSection};
pub use guide_config::GuideConfig;
