// XML-RPC methodResponse parsing
//
// Hand-rolled recursive descent over the small tag vocabulary Odoo's
// external API emits (int/i4, boolean, string, double, dateTime.iso8601,
// array, struct, nil). Attributes are not produced by Odoo and are not
// supported.

use crate::rpc::{RpcError, Value};

/// Parse a methodResponse body into its single result value.
///
/// A `<fault>` response becomes `RpcError::Fault` carrying the server's
/// faultCode/faultString.
pub fn decode_response(body: &str) -> Result<Value, RpcError> {
    let mut cur = Cursor::new(body);
    cur.skip_declaration();
    cur.expect("<methodResponse>")?;
    cur.skip_ws();
    if cur.eat("<fault>") {
        let fault = parse_value(&mut cur)?;
        let code = fault
            .get("faultCode")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let message = fault
            .get("faultString")
            .and_then(Value::as_str)
            .unwrap_or("unknown fault")
            .to_string();
        return Err(RpcError::Fault { code, message });
    }
    cur.expect("<params>")?;
    cur.expect("<param>")?;
    let value = parse_value(&mut cur)?;
    cur.expect("</param>")?;
    cur.expect("</params>")?;
    cur.expect("</methodResponse>")?;
    Ok(value)
}

fn parse_value(cur: &mut Cursor) -> Result<Value, RpcError> {
    cur.expect("<value>")?;
    cur.skip_ws();
    let value = if cur.peek("</value>") {
        // <value></value> is an empty string
        Value::Str(String::new())
    } else if cur.eat("<int>") {
        let text = cur.take_until("</int>")?;
        Value::Int(parse_int(text)?)
    } else if cur.eat("<i4>") {
        let text = cur.take_until("</i4>")?;
        Value::Int(parse_int(text)?)
    } else if cur.eat("<boolean>") {
        let text = cur.take_until("</boolean>")?;
        Value::Bool(text.trim() == "1" || text.trim() == "true")
    } else if cur.eat("<string/>") {
        Value::Str(String::new())
    } else if cur.eat("<string>") {
        let text = cur.take_until("</string>")?;
        Value::Str(unescape_xml(text))
    } else if cur.eat("<double>") {
        let text = cur.take_until("</double>")?;
        let parsed = text
            .trim()
            .parse::<f64>()
            .map_err(|e| RpcError::Parse(format!("bad double '{}': {}", text, e)))?;
        Value::Double(parsed)
    } else if cur.eat("<dateTime.iso8601>") {
        // Kept as a string; callers parse with chrono where they need to
        let text = cur.take_until("</dateTime.iso8601>")?;
        Value::Str(unescape_xml(text))
    } else if cur.eat("<nil/>") {
        Value::Nil
    } else if cur.eat("<array>") {
        cur.expect("<data>")?;
        let mut items = Vec::new();
        loop {
            cur.skip_ws();
            if !cur.peek("<value>") {
                break;
            }
            items.push(parse_value(cur)?);
        }
        cur.expect("</data>")?;
        cur.expect("</array>")?;
        Value::Array(items)
    } else if cur.eat("<struct>") {
        let mut members = Vec::new();
        loop {
            cur.skip_ws();
            if !cur.eat("<member>") {
                break;
            }
            cur.expect("<name>")?;
            let name = unescape_xml(cur.take_until("</name>")?);
            let member = parse_value(cur)?;
            cur.expect("</member>")?;
            members.push((name, member));
        }
        cur.expect("</struct>")?;
        Value::Struct(members)
    } else {
        // Untyped <value>text</value> defaults to string
        let text = cur.take_until("</value>")?;
        return Ok(Value::Str(unescape_xml(text)));
    };
    cur.expect("</value>")?;
    Ok(value)
}

fn parse_int(text: &str) -> Result<i64, RpcError> {
    text.trim()
        .parse::<i64>()
        .map_err(|e| RpcError::Parse(format!("bad int '{}': {}", text, e)))
}

/// Resolve XML character entities back to text
pub fn unescape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let rest = &text[i..];
        let entity_end = rest.find(';');
        let entity = entity_end.map(|end| &rest[1..end]);
        let replacement = match entity {
            Some("amp") => Some('&'),
            Some("lt") => Some('<'),
            Some("gt") => Some('>'),
            Some("quot") => Some('"'),
            Some("apos") => Some('\''),
            Some(num) if num.starts_with("#x") || num.starts_with("#X") => {
                u32::from_str_radix(&num[2..], 16).ok().and_then(char::from_u32)
            }
            Some(num) if num.starts_with('#') => {
                num[1..].parse::<u32>().ok().and_then(char::from_u32)
            }
            _ => None,
        };
        match (replacement, entity_end) {
            (Some(rc), Some(end)) => {
                out.push(rc);
                // Skip past the entity body and the ';'
                for _ in 0..end {
                    chars.next();
                }
            }
            _ => out.push('&'),
        }
    }
    out
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    /// Skip an optional leading `<?xml ...?>` declaration
    fn skip_declaration(&mut self) {
        self.skip_ws();
        if self.rest().starts_with("<?") {
            if let Some(end) = self.rest().find("?>") {
                self.pos += end + 2;
            }
        }
    }

    fn peek(&mut self, literal: &str) -> bool {
        self.skip_ws();
        self.rest().starts_with(literal)
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.peek(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, literal: &str) -> Result<(), RpcError> {
        if self.eat(literal) {
            Ok(())
        } else {
            let context: String = self.rest().chars().take(40).collect();
            Err(RpcError::Parse(format!(
                "expected '{}' at position {}, found '{}'",
                literal, self.pos, context
            )))
        }
    }

    /// Consume raw text up to (and including) `literal`, returning the text
    fn take_until(&mut self, literal: &str) -> Result<&'a str, RpcError> {
        match self.rest().find(literal) {
            Some(offset) => {
                let text = &self.rest()[..offset];
                self.pos += offset + literal.len();
                Ok(text)
            }
            None => Err(RpcError::Parse(format!(
                "unterminated element: '{}' not found after position {}",
                literal, self.pos
            ))),
        }
    }
}
