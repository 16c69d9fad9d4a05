use anyhow::{Context, Result};

use crate::client::OdooApi;
use crate::models::Task;
use crate::rpc::Value;

const MODEL: &str = "project.task";
const FIELDS: &[&str] = &["name", "id", "stage_id", "description", "create_date"];

/// Remote repository for project.task
pub struct TaskRepo;

impl TaskRepo {
    /// All tasks in a project, newest id first. An empty project
    /// short-circuits the read call.
    pub fn list_for_project(api: &dyn OdooApi, project_id: i64) -> Result<Vec<Task>> {
        let ids = api
            .search(
                MODEL,
                &[("project_id", "=", Value::Int(project_id))],
                &[("order", Value::from("id desc"))],
            )
            .context("Failed to search project tasks")?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let records = api
            .read(MODEL, &ids, FIELDS)
            .context("Failed to read project tasks")?;
        records.iter().map(Task::from_record).collect()
    }

    /// Move one task to the given stage
    pub fn set_stage(api: &dyn OdooApi, task_id: i64, stage_id: i64) -> Result<()> {
        api.write(MODEL, &[task_id], &[("stage_id", Value::Int(stage_id))])
            .with_context(|| format!("Failed to move task {} to stage {}", task_id, stage_id))?;
        Ok(())
    }

    /// Ids of tasks in the project with exactly this name
    pub fn find_exact(api: &dyn OdooApi, project_id: i64, name: &str) -> Result<Vec<i64>> {
        api.search(
            MODEL,
            &[
                ("project_id", "=", Value::Int(project_id)),
                ("name", "=", Value::from(name)),
            ],
            &[],
        )
        .with_context(|| format!("Failed to search for existing task '{}'", name))
    }

    /// Create a task in the project, returning its new id
    pub fn create(api: &dyn OdooApi, project_id: i64, name: &str) -> Result<i64> {
        api.create(
            MODEL,
            &[
                ("name", Value::from(name)),
                ("project_id", Value::Int(project_id)),
            ],
        )
        .with_context(|| format!("Failed to create task '{}'", name))
    }
}
