use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Construction-time defects in a table or column descriptor.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("table name must not be blank")]
    BlankTableName,

    #[error("column name must not be blank")]
    BlankColumnName,

    #[error("column \"{column}\" must carry a non-blank SQL type")]
    BlankColumnType { column: String },

    #[error("table \"{table}\" must declare at least one column")]
    NoColumns { table: String },

    #[error("table \"{table}\" declares column \"{column}\" twice")]
    DuplicateColumn { table: String, column: String },
}

///
/// Column
///
/// Passive descriptor of one column: name, SQL type, optional description.
/// Structural equality, validation on construction, nothing else.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Column {
    name: String,
    sql_type: String,
    description: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Result<Self, SchemaError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SchemaError::BlankColumnName);
        }

        let sql_type = sql_type.into();
        if sql_type.trim().is_empty() {
            return Err(SchemaError::BlankColumnType { column: name });
        }

        Ok(Self {
            name,
            sql_type,
            description: None,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

///
/// Table
///
/// Immutable table descriptor. Assembly goes through [`TableBuilder`], so
/// a partially built table is never observable.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    name: String,
    description: Option<String>,
    columns: Vec<Column>,
}

impl Table {
    #[must_use]
    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by exact name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

///
/// TableBuilder
///
/// Accumulates raw column parts and validates everything once on `build`.
///

#[derive(Debug, Default)]
pub struct TableBuilder {
    name: String,
    description: Option<String>,
    columns: Vec<(String, String, Option<String>)>,
}

impl TableBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        self.columns.push((name.into(), sql_type.into(), None));
        self
    }

    #[must_use]
    pub fn described_column(
        mut self,
        name: impl Into<String>,
        sql_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.columns
            .push((name.into(), sql_type.into(), Some(description.into())));
        self
    }

    pub fn build(self) -> Result<Table, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::BlankTableName);
        }
        if self.columns.is_empty() {
            return Err(SchemaError::NoColumns { table: self.name });
        }

        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for (name, sql_type, description) in self.columns {
            let mut column = Column::new(name, sql_type)?;
            if let Some(text) = description {
                column = column.with_description(text);
            }
            if columns.iter().any(|seen| seen.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name,
                    column: column.name,
                });
            }
            columns.push(column);
        }

        Ok(Table {
            name: self.name,
            description: self.description,
            columns,
        })
    }
}

///
/// TESTS
///
