use anyhow::{Context, Result};

use crate::client::OdooApi;
use crate::models::Project;
use crate::rpc::Value;

const MODEL: &str = "project.project";
const FIELDS: &[&str] = &["name", "id"];

/// Remote repository for project.project
pub struct ProjectRepo;

impl ProjectRepo {
    /// Search project ids whose name contains `fragment` (case-insensitive,
    /// via the service's `ilike` operator)
    pub fn search_by_name(api: &dyn OdooApi, fragment: &str) -> Result<Vec<i64>> {
        api.search(MODEL, &[("name", "ilike", Value::from(fragment))], &[])
            .with_context(|| format!("Failed to search projects matching '{}'", fragment))
    }

    /// Read name/id for the given project ids
    pub fn read(api: &dyn OdooApi, ids: &[i64]) -> Result<Vec<Project>> {
        let records = api
            .read(MODEL, ids, FIELDS)
            .context("Failed to read matched projects")?;
        records.iter().map(Project::from_record).collect()
    }

    /// Fetch up to `limit` projects of any name, for diagnostic listings
    pub fn sample(api: &dyn OdooApi, limit: i64) -> Result<Vec<Project>> {
        let records = api
            .search_read(MODEL, &[], FIELDS, Some(limit))
            .context("Failed to list projects")?;
        records.iter().map(Project::from_record).collect()
    }
}
