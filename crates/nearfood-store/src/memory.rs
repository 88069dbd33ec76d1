//! In-process backend implementing both store traits.
//!
//! Used by the test suite and when the server runs without BaaS
//! credentials. Single-node only; every table is a vector of JSON rows.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use serde_json::Value;

use crate::auth::{AuthApi, AuthSession, SessionUser};
use crate::query::{Filter, OrderBy, Row, Select};
use crate::store::TableStore;
use crate::StoreError;

#[derive(Debug, Clone)]
struct MemoryUser {
    id: String,
    // Plaintext is fine here: this backend never leaves the process and
    // exists only for tests and keyless local runs.
    password: String,
}

/// In-memory tables plus a toy auth registry.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    users: Mutex<HashMap<String, MemoryUser>>,
    sessions: Mutex<HashMap<String, SessionUser>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(row: &Row, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|f| row.get(&f.column).unwrap_or(&Value::Null) == &f.value)
}

fn compare_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        // Nulls sort last, everything else keeps insertion order.
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn sort_rows(rows: &mut [Row], order: &[OrderBy]) {
    rows.sort_by(|a, b| {
        for key in order {
            let av = a.get(&key.column).unwrap_or(&Value::Null);
            let bv = b.get(&key.column).unwrap_or(&Value::Null);
            let ord = compare_values(av, bv);
            let ord = if key.descending { ord.reverse() } else { ord };
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    });
}

/// Random url-safe identifier with a readable prefix.
fn generate_id(prefix: &str) -> String {
    let mut bytes = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{prefix}_{}", URL_SAFE_NO_PAD.encode(bytes))
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, StoreError> {
        let tables = self.tables.lock().expect("memory store poisoned");
        let mut rows: Vec<Row> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| matches(r, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        sort_rows(&mut rows, &query.order);

        let offset = query.offset.unwrap_or(0);
        let rows: Vec<Row> = rows
            .into_iter()
            .skip(offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(rows)
    }

    async fn select_one(&self, query: &Select) -> Result<Row, StoreError> {
        self.select(query)
            .await?
            .into_iter()
            .next()
            .ok_or(StoreError::NotFound)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        // Fill in an id the way the real backend's column default would.
        let needs_id = !matches!(row.get("id"), Some(Value::String(s)) if !s.is_empty());
        if needs_id {
            row.insert("id".into(), Value::String(generate_id("row")));
        }

        let mut tables = self.tables.lock().expect("memory store poisoned");
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Row,
    ) -> Result<Vec<Row>, StoreError> {
        let mut tables = self.tables.lock().expect("memory store poisoned");
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|r| matches(r, filters)) {
                for (k, v) in &patch {
                    row.insert(k.clone(), v.clone());
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().expect("memory store poisoned");
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !matches(r, filters));
        Ok((before - rows.len()) as u64)
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let tables = self.tables.lock().expect("memory store poisoned");
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| matches(r, filters)).count() as u64)
            .unwrap_or(0))
    }
}

#[async_trait]
impl AuthApi for MemoryStore {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let user = {
            let mut users = self.users.lock().expect("memory store poisoned");
            if users.contains_key(email) {
                return Err(StoreError::Conflict(format!("email taken: {email}")));
            }
            let user = MemoryUser {
                id: generate_id("user"),
                password: password.to_string(),
            };
            users.insert(email.to_string(), user.clone());
            user
        };

        Ok(self.issue_session(&user.id, email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let user = {
            let users = self.users.lock().expect("memory store poisoned");
            match users.get(email) {
                Some(u) if u.password == password => u.clone(),
                _ => return Err(StoreError::Unauthorized),
            }
        };

        Ok(self.issue_session(&user.id, email))
    }

    async fn session_user(&self, token: &str) -> Result<SessionUser, StoreError> {
        let sessions = self.sessions.lock().expect("memory store poisoned");
        sessions.get(token).cloned().ok_or(StoreError::Unauthorized)
    }
}

impl MemoryStore {
    fn issue_session(&self, user_id: &str, email: &str) -> AuthSession {
        let user = SessionUser {
            id: user_id.to_string(),
            email: email.to_string(),
        };
        let token = generate_id("tok");
        self.sessions
            .lock()
            .expect("memory store poisoned")
            .insert(token.clone(), user.clone());
        AuthSession {
            access_token: token,
            user,
        }
    }
}
