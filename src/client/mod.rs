//! Thin client interface over the Odoo external API.
//!
//! `OdooApi` exposes exactly the operations the sync run needs
//! (search / search_read / read / write / create); the live
//! `XmlRpcClient` speaks `execute_kw` over XML-RPC, and tests drive the
//! same trait with an in-memory fake.

use anyhow::{bail, Context, Result};
use log::debug;

use crate::config::Credentials;
use crate::rpc::{self, RpcError, Value};

/// A domain clause: (field, operator, operand), e.g. ("name", "ilike", "loyalty")
pub type DomainClause<'a> = (&'a str, &'a str, Value);

/// One record returned by `read`/`search_read`: a bag of named values
#[derive(Debug, Clone)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(fields: Vec<(String, Value)>) -> Self {
        Self { fields }
    }

    /// Build from a decoded XML-RPC struct value
    pub fn from_value(value: &Value) -> Result<Self> {
        let members = value
            .as_struct()
            .context("expected a struct record in response")?;
        Ok(Self::new(members.to_vec()))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// The record's integer `id` field
    pub fn id(&self) -> Result<i64> {
        self.get("id")
            .and_then(Value::as_i64)
            .context("record has no integer 'id' field")
    }

    /// String field; Odoo encodes nulls as boolean false, mapped to None
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn bool_field(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Many2one field, returned by Odoo as `[id, display_name]` (or false)
    pub fn many2one(&self, name: &str) -> Option<(i64, String)> {
        let pair = self.get(name)?.as_array()?;
        let id = pair.first()?.as_i64()?;
        let display = pair.get(1)?.as_str()?.to_string();
        Some((id, display))
    }
}

/// The Odoo model operations this tool invokes.
///
/// Mirrors the `execute_kw` signature conventions: `search` returns ids,
/// `search_read`/`read` return records, `write` updates, `create` returns
/// the new id.
pub trait OdooApi {
    fn search(
        &self,
        model: &str,
        domain: &[DomainClause],
        options: &[(&str, Value)],
    ) -> Result<Vec<i64>>;

    fn search_read(
        &self,
        model: &str,
        domain: &[DomainClause],
        fields: &[&str],
        limit: Option<i64>,
    ) -> Result<Vec<Record>>;

    fn read(&self, model: &str, ids: &[i64], fields: &[&str]) -> Result<Vec<Record>>;

    fn write(&self, model: &str, ids: &[i64], values: &[(&str, Value)]) -> Result<bool>;

    fn create(&self, model: &str, values: &[(&str, Value)]) -> Result<i64>;
}

/// Live XML-RPC client bound to an authenticated Odoo session
pub struct XmlRpcClient {
    object_url: String,
    db: String,
    uid: i64,
    password: String,
}

impl XmlRpcClient {
    /// Exchange credentials for a uid via `/xmlrpc/2/common`, then bind the
    /// object endpoint. A falsy uid (Odoo answers `false` on bad
    /// credentials) is a fatal error.
    pub fn authenticate(creds: &Credentials) -> Result<Self> {
        let common_url = format!("{}/xmlrpc/2/common", creds.url);
        let result = call(
            &common_url,
            "authenticate",
            &[
                Value::from(creds.db.as_str()),
                Value::from(creds.username.as_str()),
                Value::from(creds.password.as_str()),
                Value::Struct(Vec::new()),
            ],
        )
        .context("Odoo authentication request failed")?;

        let uid = match result.as_i64() {
            Some(uid) if uid > 0 => uid,
            _ => bail!("Odoo authentication failed"),
        };
        debug!("authenticated as uid {}", uid);

        Ok(Self {
            object_url: format!("{}/xmlrpc/2/object", creds.url),
            db: creds.db.clone(),
            uid,
            password: creds.password.clone(),
        })
    }

    pub fn uid(&self) -> i64 {
        self.uid
    }

    /// `execute_kw(db, uid, password, model, method, args, kwargs)`
    fn execute_kw(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Vec<(String, Value)>,
    ) -> Result<Value> {
        let params = [
            Value::from(self.db.as_str()),
            Value::Int(self.uid),
            Value::from(self.password.as_str()),
            Value::from(model),
            Value::from(method),
            Value::Array(args),
            Value::Struct(kwargs),
        ];
        call(&self.object_url, "execute_kw", &params)
            .with_context(|| format!("Odoo call failed: {}.{}", model, method))
    }
}

fn call(url: &str, method: &str, params: &[Value]) -> Result<Value, RpcError> {
    let body = rpc::encode_method_call(method, params);
    debug!("POST {} method={} ({} bytes)", url, method, body.len());
    let response = ureq::post(url)
        .set("Content-Type", "text/xml")
        .send_string(&body)
        .map_err(|e| RpcError::Http(e.to_string()))?;
    let text = response
        .into_string()
        .map_err(|e| RpcError::Http(e.to_string()))?;
    debug!("response: {} bytes", text.len());
    rpc::decode_response(&text)
}

fn encode_domain(domain: &[DomainClause]) -> Value {
    let clauses = domain
        .iter()
        .map(|(field, op, operand)| {
            Value::Array(vec![
                Value::from(*field),
                Value::from(*op),
                operand.clone(),
            ])
        })
        .collect();
    Value::Array(clauses)
}

fn encode_values(values: &[(&str, Value)]) -> Vec<(String, Value)> {
    values
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

impl OdooApi for XmlRpcClient {
    fn search(
        &self,
        model: &str,
        domain: &[DomainClause],
        options: &[(&str, Value)],
    ) -> Result<Vec<i64>> {
        let result = self.execute_kw(
            model,
            "search",
            vec![encode_domain(domain)],
            encode_values(options),
        )?;
        let ids = result
            .as_array()
            .context("search did not return an array of ids")?;
        ids.iter()
            .map(|id| id.as_i64().context("search returned a non-integer id"))
            .collect()
    }

    fn search_read(
        &self,
        model: &str,
        domain: &[DomainClause],
        fields: &[&str],
        limit: Option<i64>,
    ) -> Result<Vec<Record>> {
        let mut kwargs = vec![(
            "fields".to_string(),
            Value::Array(fields.iter().map(|f| Value::from(*f)).collect()),
        )];
        if let Some(limit) = limit {
            kwargs.push(("limit".to_string(), Value::Int(limit)));
        }
        let result = self.execute_kw(model, "search_read", vec![encode_domain(domain)], kwargs)?;
        records_from(result)
    }

    fn read(&self, model: &str, ids: &[i64], fields: &[&str]) -> Result<Vec<Record>> {
        let kwargs = vec![(
            "fields".to_string(),
            Value::Array(fields.iter().map(|f| Value::from(*f)).collect()),
        )];
        let id_args = Value::Array(ids.iter().map(|id| Value::Int(*id)).collect());
        let result = self.execute_kw(model, "read", vec![id_args], kwargs)?;
        records_from(result)
    }

    fn write(&self, model: &str, ids: &[i64], values: &[(&str, Value)]) -> Result<bool> {
        let id_args = Value::Array(ids.iter().map(|id| Value::Int(*id)).collect());
        let result = self.execute_kw(
            model,
            "write",
            vec![id_args, Value::Struct(encode_values(values))],
            Vec::new(),
        )?;
        Ok(result.as_bool().unwrap_or(false))
    }

    fn create(&self, model: &str, values: &[(&str, Value)]) -> Result<i64> {
        let result = self.execute_kw(
            model,
            "create",
            vec![Value::Struct(encode_values(values))],
            Vec::new(),
        )?;
        result.as_i64().context("create did not return a new id")
    }
}

fn records_from(result: Value) -> Result<Vec<Record>> {
    let rows = result
        .as_array()
        .context("expected an array of records in response")?;
    rows.iter().map(Record::from_value).collect()
}
