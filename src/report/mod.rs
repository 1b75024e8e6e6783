pub mod json;
pub mod md;

use crate::error::SlopscanError;
use crate::types::report::RepoAnalysis;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(analysis: &RepoAnalysis, format: OutputFormat) -> Result<String, SlopscanError> {
    match format {
        OutputFormat::Json => json::to_json(analysis).map_err(SlopscanError::Json),
        OutputFormat::Md => Ok(md::to_markdown(analysis)),
    }
}
