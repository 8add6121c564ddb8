//! Column layout of a ticking table.
//!
//! A [`TableSchema`] is fixed for the life of a subscription. It is built from
//! the Arrow schema the server advertises and caches name lookups so
//! snapshot readers can resolve columns without scanning.
//!
//! ```
//! use arrow::datatypes::{DataType, Field, Schema};
//! use ticktab_column_map::ColumnType;
//! use ticktab_table::TableSchema;
//!
//! let arrow_schema = Schema::new(vec![
//!     Field::new("Id", DataType::Int64, false),
//!     Field::new("Sym", DataType::LargeUtf8, true),
//! ]);
//! let schema = TableSchema::from_arrow(&arrow_schema).unwrap();
//!
//! assert_eq!(schema.num_columns(), 2);
//! assert_eq!(schema.index_of("Sym"), Some(1));
//! assert_eq!(schema.column(1).unwrap().column_type(), &ColumnType::Utf8);
//! ```

use std::sync::Arc;

use arrow::datatypes::{Field, Schema, SchemaRef};
use rustc_hash::FxHashMap;
use ticktab_column_map::ColumnType;
use ticktab_result::{Error, Result};

/// Name and element type of one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    name: String,
    column_type: ColumnType,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    columns: Vec<ColumnDefinition>,
    by_name: FxHashMap<String, usize>,
}

impl TableSchema {
    /// Build a schema. Column names must be unique.
    pub fn new(columns: Vec<ColumnDefinition>) -> Result<Self> {
        let mut by_name = FxHashMap::default();
        by_name.reserve(columns.len());
        for (index, column) in columns.iter().enumerate() {
            if by_name.insert(column.name.clone(), index).is_some() {
                return Err(Error::InvalidArgumentError(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }
        Ok(Self { columns, by_name })
    }

    pub fn from_arrow(schema: &Schema) -> Result<Self> {
        let columns = schema
            .fields()
            .iter()
            .map(|field| {
                Ok(ColumnDefinition::new(
                    field.name().clone(),
                    ColumnType::from_arrow(field.data_type())?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(columns)
    }

    /// The Arrow schema of exported snapshots: canonical types, every column
    /// nullable.
    pub fn to_arrow(&self) -> SchemaRef {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|c| Field::new(c.name.clone(), c.column_type.to_arrow(), true))
            .collect();
        Arc::new(Schema::new(fields))
    }

    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Result<&ColumnDefinition> {
        self.columns.get(index).ok_or_else(|| {
            Error::InvalidArgumentError(format!(
                "column index {index} out of range for {} columns",
                self.columns.len()
            ))
        })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }
}

impl PartialEq for TableSchema {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
    }
}

impl Eq for TableSchema {}
