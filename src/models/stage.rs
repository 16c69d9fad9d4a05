use anyhow::Result;

use crate::client::Record;

/// Task stage (project.task.type)
///
/// A folded stage conventionally denotes completed/closed work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub id: i64,
    pub name: String,
    pub fold: bool,
}

impl Stage {
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id()?,
            name: record.str_field("name").unwrap_or_default().to_string(),
            fold: record.bool_field("fold"),
        })
    }

    /// True if this stage represents completion: folded, or named "done"
    pub fn is_done_stage(&self) -> bool {
        self.fold || self.name.to_lowercase().contains("done")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::Value;

    fn stage(name: &str, fold: bool) -> Stage {
        Stage {
            id: 1,
            name: name.to_string(),
            fold,
        }
    }

    #[test]
    fn test_from_record_missing_fold_defaults_false() {
        let record = Record::new(vec![
            ("id".to_string(), Value::Int(10)),
            ("name".to_string(), Value::Str("To Do".to_string())),
        ]);
        let parsed = Stage::from_record(&record).unwrap();
        assert!(!parsed.fold);
    }

    #[test]
    fn test_is_done_stage() {
        assert!(stage("Archive", true).is_done_stage());
        assert!(stage("Done", false).is_done_stage());
        assert!(stage("done!", false).is_done_stage());
        assert!(stage("DONE", false).is_done_stage());
        assert!(!stage("In Progress", false).is_done_stage());
    }
}
