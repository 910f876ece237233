// JSON export of the full analysis result

use crate::analysis::AnalysisResult;
use crate::error::Result;

/// Serialize the result as pretty-printed JSON
pub fn to_json(analysis: &AnalysisResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

/// Read a previously exported result. The dependency graph is not part of
/// the export and comes back empty.
pub fn from_json(json: &str) -> Result<AnalysisResult> {
    Ok(serde_json::from_str(json)?)
}
