//! Data-quality test declarations
//!
//! Each compiled table becomes one dbt source table whose columns carry
//! set-membership and not-null expectations, plus one composite uniqueness
//! test over the primary key.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use contractforge_core::{Column, TableSchema};

/// Set-membership expectation
pub const IN_SET_TEST: &str = "dbt_expectations.expect_column_values_to_be_in_set";

/// Not-null expectation
pub const NOT_NULL_TEST: &str = "dbt_expectations.expect_column_values_to_not_be_null";

const PRIMARY_KEY_DESCRIPTION: &str = "This test check the primary key unicity";
const PRIMARY_KEY_TAGS: [&str; 2] = ["data_quality", "primary_key"];

/// A test attached to one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTest {
    /// Values must belong to `values`; `condition` restricts the rows checked
    InSet {
        values: Vec<String>,
        condition: Option<String>,
    },

    /// Values must never be null
    NotNull,
}

#[derive(Serialize)]
struct InSetArgs<'a> {
    value_set: &'a [String],

    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<TestConfig<'a>>,
}

#[derive(Serialize)]
struct TestConfig<'a> {
    #[serde(rename = "where")]
    condition: &'a str,
}

// dbt reads a test as a single-key map `{test_name: {args}}`.
impl Serialize for ColumnTest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::InSet { values, condition } => {
                let args = InSetArgs {
                    value_set: values,
                    config: condition.as_deref().map(|condition| TestConfig { condition }),
                };
                map.serialize_entry(IN_SET_TEST, &args)?;
            }
            Self::NotNull => {
                map.serialize_entry(NOT_NULL_TEST, &BTreeMap::<String, String>::new())?;
            }
        }
        map.end()
    }
}

/// Composite uniqueness over the primary key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniqueCombination {
    /// Key columns that are always populated
    pub columns: Vec<String>,

    /// Key columns that may be null
    pub nullable_columns: Vec<String>,

    pub meta: TestMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestMeta {
    pub description: String,
    pub tags: Vec<String>,
}

/// A test attached to the table as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableTest {
    pub unique_combination: UniqueCombination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceColumn {
    pub name: String,
    pub description: String,
    pub tests: Vec<ColumnTest>,
}

/// One table of a dbt source, with its tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTable {
    pub name: String,
    pub description: String,
    pub columns: Vec<SourceColumn>,
    pub tests: Vec<TableTest>,
}

impl SourceTable {
    /// The uniqueness test, if the table has a primary key
    pub fn unique_combination(&self) -> Option<&UniqueCombination> {
        self.tests.first().map(|t| &t.unique_combination)
    }

    pub fn column(&self, name: &str) -> Option<&SourceColumn> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Derives test declarations from extracted schemas
pub struct TestSpecGenerator;

impl TestSpecGenerator {
    /// Declarations for one compiled table
    ///
    /// Columns without allowed values or mandatory flag keep an empty test
    /// list. The uniqueness test is emitted whenever the table declares a
    /// primary key.
    pub fn generate(table_name: &str, schema: &TableSchema) -> SourceTable {
        let columns: Vec<SourceColumn> = schema.columns.iter().map(Self::column).collect();

        let (strict, nullable): (Vec<&Column>, Vec<&Column>) = schema.primary_key().partition(|c| c.mandatory);

        let mut tests = Vec::new();
        if !strict.is_empty() || !nullable.is_empty() {
            tests.push(TableTest {
                unique_combination: UniqueCombination {
                    columns: strict.iter().map(|c| c.name.clone()).collect(),
                    nullable_columns: nullable.iter().map(|c| c.name.clone()).collect(),
                    meta: TestMeta {
                        description: PRIMARY_KEY_DESCRIPTION.to_string(),
                        tags: PRIMARY_KEY_TAGS.iter().map(|t| t.to_string()).collect(),
                    },
                },
            });
        }

        tracing::debug!(table = table_name, tests = tests.len(), "Generated table tests");

        SourceTable {
            name: table_name.to_string(),
            description: format!("This table contains data for {}.", table_name),
            columns,
            tests,
        }
    }

    fn column(column: &Column) -> SourceColumn {
        let mut tests = Vec::new();

        let values: Vec<String> = column
            .allowed_values
            .iter()
            .filter(|v| !v.eq_ignore_ascii_case("null"))
            .cloned()
            .collect();

        if !values.is_empty() {
            let condition = (!column.mandatory)
                .then(|| format!("{name} is not null and {name} <> ''", name = column.name));
            tests.push(ColumnTest::InSet { values, condition });
        }

        if column.mandatory {
            tests.push(ColumnTest::NotNull);
        }

        SourceColumn {
            name: column.name.clone(),
            description: String::new(),
            tests,
        }
    }
}
