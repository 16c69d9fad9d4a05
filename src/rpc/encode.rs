// XML-RPC methodCall serialization

use crate::rpc::Value;

/// Escape text for inclusion in XML character data
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a complete methodCall document
pub fn encode_method_call(method: &str, params: &[Value]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>\n");
    out.push_str("<methodCall><methodName>");
    out.push_str(&escape_xml(method));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        encode_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

fn encode_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(n) => {
            out.push_str("<int>");
            out.push_str(&n.to_string());
            out.push_str("</int>");
        }
        Value::Bool(b) => {
            out.push_str("<boolean>");
            out.push_str(if *b { "1" } else { "0" });
            out.push_str("</boolean>");
        }
        Value::Str(s) => {
            out.push_str("<string>");
            out.push_str(&escape_xml(s));
            out.push_str("</string>");
        }
        Value::Double(d) => {
            out.push_str("<double>");
            out.push_str(&d.to_string());
            out.push_str("</double>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape_xml(name));
                out.push_str("</name>");
                encode_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_xml("\"it's\""), "&quot;it&apos;s&quot;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_encode_scalars() {
        let doc = encode_method_call("authenticate", &[Value::Int(42), Value::Bool(true)]);
        assert!(doc.contains("<methodName>authenticate</methodName>"));
        assert!(doc.contains("<value><int>42</int></value>"));
        assert!(doc.contains("<value><boolean>1</boolean></value>"));
    }

    #[test]
    fn test_encode_string_is_escaped() {
        let doc = encode_method_call("execute_kw", &[Value::Str("a&b".to_string())]);
        assert!(doc.contains("<value><string>a&amp;b</string></value>"));
    }

    #[test]
    fn test_encode_nested_domain() {
        // [[["name", "ilike", "loyalty"]]]
        let domain = Value::Array(vec![Value::Array(vec![Value::Array(vec![
            Value::from("name"),
            Value::from("ilike"),
            Value::from("loyalty"),
        ])])]);
        let doc = encode_method_call("execute_kw", &[domain]);
        let expected = "<value><array><data><value><array><data><value><array><data>\
                        <value><string>name</string></value>\
                        <value><string>ilike</string></value>\
                        <value><string>loyalty</string></value>\
                        </data></array></value></data></array></value></data></array></value>";
        assert!(doc.contains(expected));
    }

    #[test]
    fn test_encode_struct() {
        let values = Value::Struct(vec![
            ("name".to_string(), Value::from("New task")),
            ("project_id".to_string(), Value::Int(5)),
        ]);
        let doc = encode_method_call("execute_kw", &[values]);
        assert!(doc.contains("<member><name>name</name><value><string>New task</string></value></member>"));
        assert!(doc.contains("<member><name>project_id</name><value><int>5</int></value></member>"));
    }
}
