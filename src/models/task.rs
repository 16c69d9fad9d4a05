use anyhow::Result;
use chrono::NaiveDateTime;

use crate::client::Record;

/// Task model (project.task)
///
/// Only the fields this tool reads; `stage` is the many2one pair Odoo
/// returns, `create_date` is parsed when the server sends a well-formed
/// timestamp and left unset otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub stage: Option<(i64, String)>,
    pub description: Option<String>,
    pub create_date: Option<NaiveDateTime>,
}

/// Odoo's wire format for datetime fields
const ODOO_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Task {
    pub fn from_record(record: &Record) -> Result<Self> {
        let create_date = record
            .str_field("create_date")
            .and_then(|raw| NaiveDateTime::parse_from_str(raw, ODOO_DATETIME_FORMAT).ok());
        Ok(Self {
            id: record.id()?,
            name: record.str_field("name").unwrap_or_default().to_string(),
            stage: record.many2one("stage_id"),
            description: record.str_field("description").map(str::to_string),
            create_date,
        })
    }

    /// Case-insensitive substring match against a keyword list
    pub fn name_matches_any(&self, keywords: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        keywords
            .iter()
            .any(|keyword| name.contains(&keyword.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::Value;

    fn task(name: &str) -> Task {
        Task {
            id: 1,
            name: name.to_string(),
            stage: None,
            description: None,
            create_date: None,
        }
    }

    #[test]
    fn test_from_record_full() {
        let record = Record::new(vec![
            ("id".to_string(), Value::Int(12)),
            ("name".to_string(), Value::Str("Core Metrics Data".to_string())),
            (
                "stage_id".to_string(),
                Value::Array(vec![Value::Int(10), Value::Str("To Do".to_string())]),
            ),
            ("description".to_string(), Value::Bool(false)),
            (
                "create_date".to_string(),
                Value::Str("2024-01-15 10:30:00".to_string()),
            ),
        ]);
        let parsed = Task::from_record(&record).unwrap();
        assert_eq!(parsed.id, 12);
        assert_eq!(parsed.stage, Some((10, "To Do".to_string())));
        assert!(parsed.description.is_none());
        assert!(parsed.create_date.is_some());
    }

    #[test]
    fn test_from_record_unparseable_date() {
        let record = Record::new(vec![
            ("id".to_string(), Value::Int(1)),
            ("name".to_string(), Value::Str("x".to_string())),
            ("create_date".to_string(), Value::Str("soon".to_string())),
        ]);
        assert!(Task::from_record(&record).unwrap().create_date.is_none());
    }

    #[test]
    fn test_name_matches_any_is_case_insensitive_both_ways() {
        // Mixed-case keywords must still match lowercase or mixed-case names
        let keywords = ["MVP-1", "loyalty dashboard"];
        assert!(task("Brand Dashboard MVP-1 release").name_matches_any(&keywords));
        assert!(task("brand dashboard mvp-1 release").name_matches_any(&keywords));
        assert!(task("LOYALTY DASHBOARD polish").name_matches_any(&keywords));
        assert!(!task("Unrelated task").name_matches_any(&keywords));
    }
}
