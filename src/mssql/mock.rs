// ABOUTME: Scripted in-memory handle used by unit tests
// ABOUTME: Records every call and answers queries from canned responses

use super::handle::{Connect, SqlHandle};
use crate::migration::Row;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Connect(Option<String>),
    Query(String),
    Execute(String),
}

/// Answers a query with the first response whose needle the SQL contains
#[derive(Clone, Default)]
pub(crate) struct MockHandle {
    responses: Vec<(String, std::result::Result<Vec<Row>, String>)>,
    fail_execute_at: Option<(usize, String)>,
    executions: usize,
    log: Arc<Mutex<Vec<Call>>>,
}

impl MockHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_rows(mut self, needle: &str, rows: Vec<Row>) -> Self {
        self.responses.push((needle.to_string(), Ok(rows)));
        self
    }

    pub(crate) fn with_query_error(mut self, needle: &str, message: &str) -> Self {
        self.responses
            .push((needle.to_string(), Err(message.to_string())));
        self
    }

    /// Fail the zero-based `index`-th execute call on this handle
    pub(crate) fn failing_execute_at(mut self, index: usize, message: &str) -> Self {
        self.fail_execute_at = Some((index, message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Query(sql) => Some(sql),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SqlHandle for MockHandle {
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        self.record(Call::Query(sql.to_string()));
        match self
            .responses
            .iter()
            .find(|(needle, _)| sql.contains(needle.as_str()))
        {
            Some((_, Ok(rows))) => Ok(rows.clone()),
            Some((_, Err(message))) => bail!("{}", message),
            None => Ok(Vec::new()),
        }
    }

    async fn execute(&mut self, sql: &str) -> Result<()> {
        let index = self.executions;
        self.executions += 1;
        if let Some((fail_at, message)) = &self.fail_execute_at {
            if *fail_at == index {
                bail!("{}", message);
            }
        }
        self.record(Call::Execute(sql.to_string()));
        Ok(())
    }
}

/// Hands out clones of one template handle that share its call log
pub(crate) struct MockConnector {
    template: MockHandle,
    fail_connect: Option<String>,
}

impl MockConnector {
    pub(crate) fn new(template: MockHandle) -> Self {
        Self {
            template,
            fail_connect: None,
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            template: MockHandle::new(),
            fail_connect: Some(message.to_string()),
        }
    }

    pub(crate) fn handle(&self) -> &MockHandle {
        &self.template
    }
}

#[async_trait]
impl Connect for MockConnector {
    type Handle = MockHandle;

    async fn connect(&self, database: Option<&str>) -> Result<MockHandle> {
        if let Some(message) = &self.fail_connect {
            bail!("{}", message);
        }
        self.template
            .record(Call::Connect(database.map(str::to_string)));
        Ok(self.template.clone())
    }
}
