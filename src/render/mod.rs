// Presentation layer: turns an AnalysisReport into text, JSON and SVG.

pub mod chart;
pub mod reference;
pub mod report;

pub use chart::render_svg;
pub use reference::reference_sections;
pub use report::{render_json, render_text};
