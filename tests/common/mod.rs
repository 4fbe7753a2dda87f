//! Recording connection shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use deltastream_sdk::{Connection, Rows};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum Reply {
    Rows(Vec<String>, Vec<Vec<Value>>),
    Fail(String),
}

/// Records every statement and answers queries from a queue
///
/// Queries with nothing queued get an empty result.
#[derive(Default)]
pub struct MockConnection {
    statements: Mutex<Vec<String>>,
    replies: Mutex<VecDeque<Reply>>,
    /// Fail the exec call with this index (0-based) and message
    exec_failure: Mutex<Option<(usize, String)>>,
    exec_count: Mutex<usize>,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every statement sent, exec and query alike, in order
    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.statements.lock().unwrap().last().cloned()
    }

    pub fn push_rows(&self, columns: &[&str], rows: Vec<Vec<Value>>) {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Rows(columns, rows));
    }

    /// Queue a property/value describe result, one row per field
    pub fn push_describe(&self, fields: &[(&str, &str)]) {
        let rows = fields
            .iter()
            .map(|(property, value)| vec![Value::from(*property), Value::from(*value)])
            .collect();
        self.push_rows(&["property", "value"], rows);
    }

    /// Queue a LIST result with only a `Name` column
    pub fn push_names(&self, names: &[&str]) {
        let rows = names.iter().map(|n| vec![Value::from(*n)]).collect();
        self.push_rows(&["Name"], rows);
    }

    pub fn push_empty(&self) {
        self.push_rows(&[], Vec::new());
    }

    pub fn push_query_error(&self, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(message.to_string()));
    }

    pub fn fail_exec_at(&self, index: usize, message: &str) {
        *self.exec_failure.lock().unwrap() = Some((index, message.to_string()));
    }

    fn record(&self, statement: &str) {
        self.statements.lock().unwrap().push(statement.to_string());
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn exec(&self, statement: &str) -> anyhow::Result<()> {
        self.record(statement);

        let index = {
            let mut count = self.exec_count.lock().unwrap();
            let index = *count;
            *count += 1;
            index
        };

        match &*self.exec_failure.lock().unwrap() {
            Some((at, message)) if *at == index => Err(anyhow::anyhow!(message.clone())),
            _ => Ok(()),
        }
    }

    async fn query(&self, statement: &str) -> anyhow::Result<Rows> {
        self.record(statement);

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Rows(columns, rows)) => Ok(Rows::from_values(columns, rows)),
            Some(Reply::Fail(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(Rows::empty()),
        }
    }
}
