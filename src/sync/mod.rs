//! The sequential sync run: locate project, resolve done stage, list
//! tasks, complete keyword matches, create missing follow-ups.
//!
//! Control flows top to bottom with no retries. Per-task write/create
//! failures are printed and skipped; missing config, failed auth, and no
//! project match abort the whole run.

use anyhow::{anyhow, Result};
use log::debug;

use crate::client::OdooApi;
use crate::models::Task;
use crate::repo::{ProjectRepo, StageRepo, TaskRepo};

/// Name fragments tried in order when locating the target project
pub const PROJECT_SEARCH_TERMS: [&str; 2] = ["loyalty", "brand"];

/// How many projects to show in the no-match diagnostic listing
pub const PROJECT_SAMPLE_LIMIT: i64 = 30;

/// How many tasks to print for operator visibility
pub const TASK_PRINT_LIMIT: usize = 25;

/// Tasks whose names contain any of these (case-insensitive) are moved to
/// the done stage
pub const COMPLETED_KEYWORDS: [&str; 12] = [
    "brand dashboard",
    "brand portal",
    "engagement metrics",
    "loyalty dashboard",
    "fork asda",
    "bright.blue brand",
    "MVP-1",
    "MVP-3",
    "MVP-4",
    "Core Metrics Data",
    "Data Export for Brands",
    "Admin Panel with Brand Impersonation",
];

/// Follow-up tasks created (once) in the target project
pub const FOLLOW_UP_TASKS: [&str; 6] = [
    "Fix full db:seed (RBAC seeder validation errors)",
    "bbcloud API integration (stub exists, needs real credentials)",
    "Monthly report template (branded PDF with executive summary)",
    "Scheduled monthly report emails",
    "Brand landing page (report archive, report-first UX)",
    "Live dashboard Phase 2 (real-time bbcloud sync)",
];

/// What one run did (or, under dry-run, would have done)
#[derive(Debug, Default)]
pub struct SyncReport {
    pub project_id: i64,
    pub project_name: String,
    pub done_stage: Option<i64>,
    pub tasks_listed: usize,
    /// Task ids moved to the done stage
    pub completed: Vec<i64>,
    pub complete_failures: usize,
    /// Follow-up names newly created
    pub created: Vec<String>,
    pub already_existed: Vec<String>,
    pub create_failures: usize,
}

/// Drives the whole run against any `OdooApi` implementation
pub struct SyncRunner;

impl SyncRunner {
    /// Execute the full sequence. With `dry_run` set, reads happen as
    /// normal but stage writes and task creates are only announced.
    pub fn run(api: &dyn OdooApi, dry_run: bool) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        let (project_id, project_name) = Self::locate_project(api)?;
        report.project_id = project_id;
        report.project_name = project_name;

        let stages = StageRepo::list(api)?;
        report.done_stage = StageRepo::resolve_done(&stages);
        debug!("resolved done stage: {:?}", report.done_stage);

        let tasks = TaskRepo::list_for_project(api, project_id)?;
        report.tasks_listed = tasks.len();
        println!("\nCurrent tasks in project:");
        for task in tasks.iter().take(TASK_PRINT_LIMIT) {
            let stage = task
                .stage
                .as_ref()
                .map(|(id, _)| id.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            println!("  [{}] {} (stage: {})", task.id, task.name, stage);
        }

        Self::complete_matched(api, &tasks, dry_run, &mut report);
        Self::create_follow_ups(api, project_id, dry_run, &mut report);

        println!("\nDone.");
        Ok(report)
    }

    /// Find the target project: "loyalty" first, then "brand". No match
    /// prints a diagnostic sample and aborts; the first matched id wins.
    fn locate_project(api: &dyn OdooApi) -> Result<(i64, String)> {
        let mut ids = Vec::new();
        for term in PROJECT_SEARCH_TERMS {
            ids = ProjectRepo::search_by_name(api, term)?;
            if !ids.is_empty() {
                break;
            }
        }
        if ids.is_empty() {
            println!(
                "No project named with '{}' or '{}'. Available projects (sample):",
                PROJECT_SEARCH_TERMS[0], PROJECT_SEARCH_TERMS[1]
            );
            for project in ProjectRepo::sample(api, PROJECT_SAMPLE_LIMIT)? {
                println!("  [{}] {}", project.id, project.name);
            }
            return Err(anyhow!(
                "no project matching '{}' or '{}' found",
                PROJECT_SEARCH_TERMS[0],
                PROJECT_SEARCH_TERMS[1]
            ));
        }

        let projects = ProjectRepo::read(api, &ids)?;
        println!("Projects found:");
        for project in &projects {
            println!("  [{}] {}", project.id, project.name);
        }
        let selected = projects
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        Ok((ids[0], selected))
    }

    /// Move keyword-matched tasks to the done stage. Skipped entirely when
    /// no stage was resolved; a single failed write does not stop the rest.
    fn complete_matched(
        api: &dyn OdooApi,
        tasks: &[Task],
        dry_run: bool,
        report: &mut SyncReport,
    ) {
        let Some(done_stage) = report.done_stage else {
            println!("No stages found; skipping completion marking");
            return;
        };
        for task in tasks {
            if !task.name_matches_any(&COMPLETED_KEYWORDS) {
                continue;
            }
            if dry_run {
                println!("  -> [dry-run] Would mark done: {}", task.name);
                report.completed.push(task.id);
                continue;
            }
            match TaskRepo::set_stage(api, task.id, done_stage) {
                Ok(()) => {
                    println!("  -> Marked done: {}", task.name);
                    report.completed.push(task.id);
                }
                Err(e) => {
                    println!("  -> Skip {}: {:#}", task.name, e);
                    report.complete_failures += 1;
                }
            }
        }
    }

    /// Create each follow-up task unless one with the same name already
    /// exists in the project. Per-name failures are logged and skipped.
    fn create_follow_ups(
        api: &dyn OdooApi,
        project_id: i64,
        dry_run: bool,
        report: &mut SyncReport,
    ) {
        for name in FOLLOW_UP_TASKS {
            let existing = match TaskRepo::find_exact(api, project_id, name) {
                Ok(ids) => ids,
                Err(e) => {
                    println!("  -> Failed to create '{}': {:#}", name, e);
                    report.create_failures += 1;
                    continue;
                }
            };
            if !existing.is_empty() {
                println!("  -> Task already exists: {}", name);
                report.already_existed.push(name.to_string());
                continue;
            }
            if dry_run {
                println!("  -> [dry-run] Would create: {}", name);
                report.created.push(name.to_string());
                continue;
            }
            match TaskRepo::create(api, project_id, name) {
                Ok(_) => {
                    println!("  -> Created: {}", name);
                    report.created.push(name.to_string());
                }
                Err(e) => {
                    println!("  -> Failed to create '{}': {:#}", name, e);
                    report.create_failures += 1;
                }
            }
        }
    }
}
