//! Persisted shape of every record, declared as data.
//!
//! # Responsibility
//! - Name each table with its mapped columns, primary key and foreign keys.
//! - Describe the `book_tag` many-to-many join table.
//! - Generate the positional SQL used by repositories.
//! - Verify that a connection carries the declared shape.
//!
//! # Invariants
//! - The primary key is always the first column, so `insert_sql` and
//!   `update_sql` bind the same positional parameters.
//! - Declarations must agree with the migration scripts; the
//!   `schema_matches_migrations` tests enforce this.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Restrict,
    SetNull,
    Cascade,
}

impl OnDelete {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::Cascade => "CASCADE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyDef {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_delete: OnDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    /// Mapped columns; the first one is the primary key.
    pub columns: &'static [ColumnDef],
    pub foreign_keys: &'static [ForeignKeyDef],
    /// Epoch-millisecond column refreshed by every update.
    pub touch_column: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinTableDef {
    pub name: &'static str,
    /// Side owned by the record that manages the association.
    pub owner: ForeignKeyDef,
    pub inverse: ForeignKeyDef,
}

const fn text(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        column_type: ColumnType::Text,
        nullable: true,
    }
}

const fn required_text(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        column_type: ColumnType::Text,
        nullable: false,
    }
}

const fn integer(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        column_type: ColumnType::Integer,
        nullable: true,
    }
}

const fn references(
    column: &'static str,
    references_table: &'static str,
    on_delete: OnDelete,
) -> ForeignKeyDef {
    ForeignKeyDef {
        column,
        references_table,
        references_column: "id",
        on_delete,
    }
}

pub const AUTHORS: TableDef = TableDef {
    name: "authors",
    columns: &[
        required_text("id"),
        required_text("first_name"),
        required_text("last_name"),
    ],
    foreign_keys: &[],
    touch_column: None,
};

pub const PREDEFINED_SHELVES: TableDef = TableDef {
    name: "predefined_shelves",
    columns: &[required_text("id"), required_text("shelf_name")],
    foreign_keys: &[],
    touch_column: None,
};

pub const CUSTOM_SHELVES: TableDef = TableDef {
    name: "custom_shelves",
    columns: &[required_text("id"), required_text("shelf_name")],
    foreign_keys: &[],
    touch_column: None,
};

pub const TAGS: TableDef = TableDef {
    name: "tags",
    columns: &[required_text("id"), required_text("name")],
    foreign_keys: &[],
    touch_column: None,
};

pub const BOOKS: TableDef = TableDef {
    name: "books",
    columns: &[
        required_text("id"),
        required_text("title"),
        integer("number_of_pages"),
        integer("pages_read"),
        text("genre"),
        integer("series_position"),
        text("edition"),
        text("book_recommended_by"),
        required_text("author_id"),
        text("predefined_shelf_id"),
        text("custom_shelf_id"),
        text("rating"),
        text("date_started_reading"),
        text("date_finished_reading"),
        text("book_review"),
    ],
    foreign_keys: &[
        references("author_id", "authors", OnDelete::Restrict),
        references("predefined_shelf_id", "predefined_shelves", OnDelete::SetNull),
        references("custom_shelf_id", "custom_shelves", OnDelete::SetNull),
    ],
    touch_column: Some("updated_at"),
};

pub const BOOK_TAG: JoinTableDef = JoinTableDef {
    name: "book_tag",
    owner: references("book_id", "books", OnDelete::Cascade),
    inverse: references("tag_id", "tags", OnDelete::Cascade),
};

/// Every entity table, parents before children.
pub const ALL_TABLES: [TableDef; 5] = [AUTHORS, PREDEFINED_SHELVES, CUSTOM_SHELVES, TAGS, BOOKS];

impl TableDef {
    pub fn primary_key(&self) -> &'static str {
        self.columns.first().map_or("id", |column| column.name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.name)
    }

    /// Comma-separated column list in declaration order.
    pub fn select_list(&self) -> String {
        self.column_names().collect::<Vec<_>>().join(", ")
    }

    /// `SELECT <columns> FROM <table>` without a trailing clause.
    pub fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", self.select_list(), self.name)
    }

    /// Positional insert over all mapped columns.
    pub fn insert_sql(&self) -> String {
        let placeholders = (1..=self.columns.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            self.name,
            self.select_list()
        )
    }

    /// Positional update keyed by `?1`, using the same binding order as
    /// `insert_sql`.
    pub fn update_sql(&self) -> String {
        let mut assignments = self
            .columns
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, column)| format!("{} = ?{}", column.name, index + 1))
            .collect::<Vec<_>>();
        if let Some(touch) = self.touch_column {
            assignments.push(format!("{touch} = (strftime('%s', 'now') * 1000)"));
        }
        format!(
            "UPDATE {} SET {} WHERE {} = ?1;",
            self.name,
            assignments.join(", "),
            self.primary_key()
        )
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?1;", self.name, self.primary_key())
    }
}

impl JoinTableDef {
    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?1, ?2);",
            self.name, self.owner.column, self.inverse.column
        )
    }

    pub fn delete_for_owner_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?1;", self.name, self.owner.column)
    }
}

/// Checks that every declared table and column exists on `conn`.
///
/// # Errors
/// - `DbError::MissingRequiredTable` / `DbError::MissingRequiredColumn` on the
///   first mismatch.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    for table in ALL_TABLES {
        ensure_columns(conn, table.name, table.column_names())?;
    }
    ensure_columns(
        conn,
        BOOK_TAG.name,
        [BOOK_TAG.owner.column, BOOK_TAG.inverse.column].into_iter(),
    )
}

fn ensure_columns(
    conn: &Connection,
    table: &'static str,
    columns: impl Iterator<Item = &'static str>,
) -> DbResult<()> {
    let existing = table_columns(conn, table)?;
    if existing.is_empty() {
        return Err(DbError::MissingRequiredTable(table));
    }
    for column in columns {
        if !existing.iter().any(|name| name == column) {
            return Err(DbError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

/// Lists column names reported by `PRAGMA table_info`; empty when the table
/// does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::{BOOKS, BOOK_TAG, TAGS};

    #[test]
    fn insert_and_update_share_parameter_positions() {
        assert_eq!(
            TAGS.insert_sql(),
            "INSERT INTO tags (id, name) VALUES (?1, ?2);"
        );
        assert_eq!(TAGS.update_sql(), "UPDATE tags SET name = ?2 WHERE id = ?1;");
    }

    #[test]
    fn update_refreshes_touch_column() {
        let sql = BOOKS.update_sql();
        assert!(sql.starts_with("UPDATE books SET title = ?2, "));
        assert!(sql.contains("book_review = ?15"));
        assert!(sql.contains("updated_at = (strftime('%s', 'now') * 1000)"));
        assert!(sql.ends_with("WHERE id = ?1;"));
    }

    #[test]
    fn join_table_sql_uses_owner_column() {
        assert_eq!(
            BOOK_TAG.delete_for_owner_sql(),
            "DELETE FROM book_tag WHERE book_id = ?1;"
        );
        assert_eq!(
            BOOK_TAG.insert_sql(),
            "INSERT OR IGNORE INTO book_tag (book_id, tag_id) VALUES (?1, ?2);"
        );
    }
}
