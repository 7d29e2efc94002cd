//! In-memory backend; holds the table in process memory instead of a file.
//! The production path never uses it, tests do.

use anyhow::Result;

use crate::schema;
use crate::table::Table;

#[derive(Default)]
pub struct MemoryStore {
    table: Option<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_raw(&mut self) -> Result<Table> {
        let table = self
            .table
            .get_or_insert_with(|| Table::new(schema::canonical_headers()));
        Ok(table.clone())
    }

    pub fn store(&mut self, table: &Table) -> Result<()> {
        self.table = Some(table.clone());
        Ok(())
    }
}
