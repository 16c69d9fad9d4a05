use std::fmt;

/// XML-RPC value
///
/// Covers the subset of the XML-RPC type system that Odoo's external API
/// actually uses: int, boolean, string, double, array, struct, and nil.
/// Odoo encodes absent/null fields as boolean `false`, so callers reading
/// optional fields should treat `Bool(false)` as "no value".
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    Double(f64),
    Array(Vec<Value>),
    Struct(Vec<(String, Value)>),
    Nil,
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Look up a struct member by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_struct()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// True if this value is Odoo's "no value" marker (`false`) or nil
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Bool(false) | Value::Nil)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Double(d) => write!(f, "{}", d),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Struct(members) => {
                write!(f, "{{")?;
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Nil => write!(f, "null"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_get() {
        let value = Value::Struct(vec![
            ("id".to_string(), Value::Int(7)),
            ("name".to_string(), Value::Str("Done".to_string())),
        ]);
        assert_eq!(value.get("id").and_then(Value::as_i64), Some(7));
        assert_eq!(value.get("name").and_then(Value::as_str), Some("Done"));
        assert!(value.get("missing").is_none());
    }

    #[test]
    fn test_is_null() {
        assert!(Value::Bool(false).is_null());
        assert!(Value::Nil.is_null());
        assert!(!Value::Bool(true).is_null());
        assert!(!Value::Str(String::new()).is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn test_display() {
        let value = Value::Array(vec![Value::Int(11), Value::Str("Done".to_string())]);
        assert_eq!(format!("{}", value), "[11, Done]");
    }
}
