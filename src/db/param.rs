//! Statement parameters and requests.

use clap::ValueEnum;
use serde::Serialize;

use super::value::Value;

/// Placeholder prefixes SQLite accepts for named parameters.
pub const PLACEHOLDER_PREFIXES: [char; 3] = [':', '@', '$'];

/// How the SQL text of a command is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    /// Plain SQL text
    #[default]
    Text,
    /// Invocation of a stored routine (rejected by SQLite)
    StoredProcedure,
}

/// A named, typed value bound into a statement.
///
/// The name is matched against the statement's placeholders with or without
/// its prefix, so `userid` binds to `@userid`. An empty name binds to the next
/// free positional slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    name: String,
    value: Value,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn positional(value: impl Into<Value>) -> Self {
        Self::new(String::new(), value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_positional(&self) -> bool {
        self.name.is_empty()
    }

    /// Candidate placeholder spellings for this parameter's name.
    ///
    /// The literal name comes first, so numbered tokens like `?1` match as
    /// written. Names without a prefix also try each prefixed spelling.
    pub fn placeholder_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        if !self.name.starts_with(PLACEHOLDER_PREFIXES) && !self.name.starts_with('?') {
            names.extend(
                PLACEHOLDER_PREFIXES
                    .iter()
                    .map(|prefix| format!("{}{}", prefix, self.name)),
            );
        }
        names
    }
}

/// One statement to execute: SQL text, its kind, and ordered parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementRequest {
    pub sql: String,
    pub kind: StatementKind,
    pub params: Vec<Param>,
}

impl StatementRequest {
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            kind: StatementKind::Text,
            params: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: StatementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.push(Param::new(name, value));
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        self.params.extend(params);
        self
    }
}
