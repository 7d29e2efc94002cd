//! Loosely-typed tabular data as it exists in storage.
//!
//! Raw cells arrive from storage as text; boolean columns are resolved to
//! `Value::Bool` only inside the normalizer, and nothing upstream assumes
//! a cell is anything but text.

use crate::schema::Column;

/// A single cell of the session table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Bool(bool),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Value {
        Value::Text(s.into())
    }

    pub fn empty() -> Value {
        Value::Text(String::new())
    }

    /// The textual form written to storage.
    pub fn to_field(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Bool(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }

    /// Exact match against a text token. A boolean cell matches nothing.
    pub fn eq_text(&self, token: &str) -> bool {
        matches!(self, Value::Text(s) if s == token)
    }

    /// Boolean reading under the permissive coercion rule: a cell is true
    /// iff it is already `Bool(true)` or its text case-insensitively
    /// matches one of the truthy tokens. Everything else is false.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Text(s) => is_truthy(s),
        }
    }
}

/// Case-insensitive membership in the fixed truthy token set. No trimming:
/// `"true "` is not a token.
pub fn is_truthy(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "1" | "si" | "sí")
}

/// An ordered set of named columns and their rows.
///
/// Invariant: every row holds exactly one cell per column. `push_row` pads
/// or truncates to keep it, and all column operations rewrite rows in step.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Table {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Mutable row access. Callers may replace cells but must not change
    /// row lengths.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Vec<Value>> {
        self.rows.iter_mut()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Replace one cell. Does nothing if the column or row is absent.
    pub fn set(&mut self, row: usize, column: &str, value: Value) {
        if let Some(idx) = self.column_index(column) {
            if let Some(cells) = self.rows.get_mut(row) {
                cells[idx] = value;
            }
        }
    }

    /// Append a row, padding with empty cells or truncating so it matches
    /// the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::empty());
        self.rows.push(row);
    }

    pub fn remove_row(&mut self, row: usize) {
        if row < self.rows.len() {
            self.rows.remove(row);
        }
    }

    /// Drop duplicate-named columns, keeping the first occurrence of each.
    pub fn dedup_columns(&mut self) {
        let mut keep: Vec<usize> = Vec::with_capacity(self.columns.len());
        for (i, name) in self.columns.iter().enumerate() {
            if !keep.iter().any(|&k| self.columns[k] == *name) {
                keep.push(i);
            }
        }
        if keep.len() == self.columns.len() {
            return;
        }
        self.columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = keep.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Rename the first column called `from` to `to`.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if let Some(idx) = self.column_index(from) {
            self.columns[idx] = to.to_string();
        }
    }

    /// Remove the first column with this name and its cells.
    pub fn drop_column(&mut self, name: &str) {
        if let Some(idx) = self.column_index(name) {
            self.columns.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
    }

    /// Add the column with a default cell in every row, unless it already
    /// exists.
    pub fn ensure_column(&mut self, name: &str, default: Value) {
        if self.column_index(name).is_some() {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(default.clone());
        }
    }

    /// Rewrite every cell of the first column with this name.
    pub fn map_column(&mut self, name: &str, mut f: impl FnMut(Value) -> Value) {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        for row in &mut self.rows {
            let old = std::mem::replace(&mut row[idx], Value::empty());
            row[idx] = f(old);
        }
    }

    /// Rewrite every cell of the table.
    pub fn map_cells(&mut self, mut f: impl FnMut(Value) -> Value) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                let old = std::mem::replace(cell, Value::empty());
                *cell = f(old);
            }
        }
    }

    /// Project the table onto `names`, in that order. Names without a
    /// matching column come out as empty cells; columns not named are
    /// dropped.
    pub fn select(&self, names: &[String]) -> Table {
        let indices: Vec<Option<usize>> = names.iter().map(|n| self.column_index(n)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| match idx {
                        Some(i) => row[*i].clone(),
                        None => Value::empty(),
                    })
                    .collect()
            })
            .collect();
        Table {
            columns: names.to_vec(),
            rows,
        }
    }
}

/// Sorted, deduplicated, non-empty advisor names seen in the table.
pub fn distinct_advisors(table: &Table) -> Vec<String> {
    let Some(idx) = table.column_index(Column::Advisor.as_str()) else {
        return Vec::new();
    };
    let mut names: Vec<String> = table
        .rows()
        .iter()
        .filter_map(|row| row.get(idx))
        .map(Value::to_field)
        .filter(|name| !name.trim().is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}
