//! Topic to report pipeline.

pub mod prompts;
mod report;
mod runner;

pub use prompts::{Prompt, SectionKey};
pub use report::{Report, Section, SectionBody};
pub use runner::ReportBuilder;
