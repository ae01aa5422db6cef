//! 模板契约：锚点注册表和显示属性

pub mod anchors;
pub mod style;

pub use anchors::{AnchorRegistry, AnchorSet, ElementAnchor, SectionKind};
pub use style::{RgbColor, RunStyle, TextStyle};
