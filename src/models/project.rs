use anyhow::Result;

use crate::client::Record;

/// Project model
///
/// Selected, never created, by this tool; exactly one project is acted on
/// per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i64,
    pub name: String,
}

impl Project {
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            id: record.id()?,
            name: record.str_field("name").unwrap_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::Value;

    #[test]
    fn test_from_record() {
        let record = Record::new(vec![
            ("id".to_string(), Value::Int(4)),
            ("name".to_string(), Value::Str("Loyalty Rewards".to_string())),
        ]);
        let project = Project::from_record(&record).unwrap();
        assert_eq!(project.id, 4);
        assert_eq!(project.name, "Loyalty Rewards");
    }
}
