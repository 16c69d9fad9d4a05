use anyhow::{Context, Result};

use crate::client::OdooApi;
use crate::models::Stage;

const MODEL: &str = "project.task.type";
const FIELDS: &[&str] = &["name", "id", "fold"];

/// Stages are fetched system-wide, not per project; the model does not
/// reliably carry a project_id. Acknowledged coarseness.
pub const STAGE_FETCH_LIMIT: i64 = 20;

/// Remote repository for project.task.type
pub struct StageRepo;

impl StageRepo {
    /// Fetch up to [`STAGE_FETCH_LIMIT`] stages across the whole instance
    pub fn list(api: &dyn OdooApi) -> Result<Vec<Stage>> {
        let records = api
            .search_read(MODEL, &[], FIELDS, Some(STAGE_FETCH_LIMIT))
            .context("Failed to list task stages")?;
        records.iter().map(Stage::from_record).collect()
    }

    /// Pick the stage that represents completion.
    ///
    /// First stage that is folded or has "done" in its name wins; with no
    /// such stage the last fetched one is assumed to be completion. Returns
    /// None only when no stages exist at all, in which case completion
    /// marking is skipped by the caller.
    pub fn resolve_done(stages: &[Stage]) -> Option<i64> {
        stages
            .iter()
            .find(|stage| stage.is_done_stage())
            .or_else(|| stages.last())
            .map(|stage| stage.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: i64, name: &str, fold: bool) -> Stage {
        Stage {
            id,
            name: name.to_string(),
            fold,
        }
    }

    #[test]
    fn test_resolve_done_prefers_folded() {
        let stages = vec![
            stage(10, "To Do", false),
            stage(11, "Finished", true),
            stage(12, "Later", false),
        ];
        assert_eq!(StageRepo::resolve_done(&stages), Some(11));
    }

    #[test]
    fn test_resolve_done_matches_name() {
        let stages = vec![stage(10, "To Do", false), stage(11, "Done", false)];
        assert_eq!(StageRepo::resolve_done(&stages), Some(11));
    }

    #[test]
    fn test_resolve_done_falls_back_to_last() {
        let stages = vec![stage(10, "Backlog", false), stage(11, "Review", false)];
        assert_eq!(StageRepo::resolve_done(&stages), Some(11));
    }

    #[test]
    fn test_resolve_done_empty_is_none() {
        assert_eq!(StageRepo::resolve_done(&[]), None);
    }

    #[test]
    fn test_resolve_done_first_match_wins() {
        let stages = vec![
            stage(10, "Done", false),
            stage(11, "Also Done", true),
        ];
        assert_eq!(StageRepo::resolve_done(&stages), Some(10));
    }
}
