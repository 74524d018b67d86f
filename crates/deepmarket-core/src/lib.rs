pub mod citation;
pub mod config;
pub mod llm;
pub mod research;

pub use citation::{extract_citations, Citation};
pub use config::{ApiConfig, Config, ConfigError, RetryConfig};
pub use llm::{QueryClient, QueryError, QueryResult, ResearchClient};
pub use research::{Prompt, Report, ReportBuilder, Section, SectionBody, SectionKey};
