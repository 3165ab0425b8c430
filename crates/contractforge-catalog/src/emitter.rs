//! Catalog definitions from canonical tables

use serde_json::Value;
use std::collections::BTreeMap;

use contractforge_core::{CanonicalTable, Column, Direction, FieldValue, Naming, Periodicity};

use crate::definition::*;
use crate::manifest::ManifestEntry;

const ENCODING: &str = "UTF-8";
const TYPE_OF_DATA: &str = "file";

/// A definition together with its manifest entry
#[derive(Debug, Clone, PartialEq)]
pub struct EmittedDefinition {
    pub entry: ManifestEntry,
    pub definition: CatalogTableDefinition,
}

/// Fans canonical tables out into catalog definitions
pub struct CatalogEmitter {
    naming: Naming,
}

impl CatalogEmitter {
    pub fn new(naming: Naming) -> Self {
        Self { naming }
    }

    /// One definition per periodicity of the table, in canonical order
    pub fn emit(&self, table: &CanonicalTable) -> Vec<EmittedDefinition> {
        let base = table.base_table_name();
        let columns: Vec<CatalogColumn> = table.schema.columns.iter().map(catalog_column).collect();

        table
            .file
            .periodicity
            .iter()
            .map(|&period| {
                let definition = match table.direction() {
                    Direction::Out => self.out_definition(base, period, columns.clone()),
                    Direction::In => self.in_definition(table, base, period, columns.clone()),
                };

                let entry = ManifestEntry {
                    artifact: self.naming.catalog_artifact_id(base, table.direction(), period),
                    table: base.to_string(),
                    direction: table.direction(),
                    periodicity: period,
                    file_id: table.file.file_id.clone(),
                };

                tracing::debug!(artifact = %entry.artifact, name = %definition.name, "Emitted catalog definition");
                EmittedDefinition { entry, definition }
            })
            .collect()
    }

    fn out_definition(&self, base: &str, period: Periodicity, columns: Vec<CatalogColumn>) -> CatalogTableDefinition {
        let name = self.naming.catalog_table_name(base, Direction::Out, period);

        CatalogTableDefinition {
            description: name.clone(),
            name,
            storage_descriptor: StorageDescriptor {
                columns,
                location: self.naming.standard_location(base, period),
                input_format: PARQUET_INPUT_FORMAT.to_string(),
                output_format: PARQUET_OUTPUT_FORMAT.to_string(),
                serde_info: SerdeInfo {
                    serialization_library: PARQUET_SERDE.to_string(),
                    parameters: BTreeMap::from([("serialization.format".to_string(), "1".to_string())]),
                },
            },
            partition_keys: None,
            parameters: BTreeMap::from([
                ("classification".to_string(), Value::from("parquet")),
                ("encoding".to_string(), Value::from(ENCODING)),
                ("typeOfData".to_string(), Value::from(TYPE_OF_DATA)),
            ]),
        }
    }

    fn in_definition(
        &self,
        table: &CanonicalTable,
        base: &str,
        period: Periodicity,
        columns: Vec<CatalogColumn>,
    ) -> CatalogTableDefinition {
        let file = &table.file;
        let separator = file.separator_or_default().to_string();

        CatalogTableDefinition {
            name: self.naming.catalog_table_name(base, Direction::In, period),
            description: file.file_code.clone(),
            storage_descriptor: StorageDescriptor {
                columns,
                location: self.naming.landing_location(),
                input_format: TEXT_INPUT_FORMAT.to_string(),
                output_format: TEXT_OUTPUT_FORMAT.to_string(),
                serde_info: SerdeInfo {
                    serialization_library: TEXT_SERDE.to_string(),
                    parameters: BTreeMap::from([
                        ("field.delim".to_string(), separator.clone()),
                        ("serialization.format".to_string(), separator),
                    ]),
                },
            },
            partition_keys: Some(Vec::new()),
            parameters: BTreeMap::from([
                ("classification".to_string(), file.data_type.clone().map_or(Value::Null, Value::from)),
                ("encoding".to_string(), Value::from(ENCODING)),
                ("typeOfData".to_string(), Value::from(TYPE_OF_DATA)),
                ("header".to_string(), field_value(&file.header)),
                ("footer".to_string(), field_value(&file.footer)),
                ("quote".to_string(), field_value(&file.quote)),
            ]),
        }
    }
}

fn catalog_column(column: &Column) -> CatalogColumn {
    CatalogColumn {
        name: column.name.to_lowercase(),
        data_type: column.data_type.clone(),
        parameters: ColumnParameters {
            protected: column.protected.to_string(),
            anonymization_rule: column.anonymization_rule.clone().unwrap_or_else(|| "None".to_string()),
            primary_key: flag(column.primary_key, "PK", "None"),
            mandatory: flag(column.mandatory, "mandatory", "non"),
        },
    }
}

fn flag(set: bool, yes: &str, no: &str) -> String {
    let value = if set { yes } else { no };
    value.to_string()
}

fn field_value(value: &Option<FieldValue>) -> Value {
    match value {
        None => Value::Null,
        Some(FieldValue::Bool(b)) => Value::Bool(*b),
        Some(FieldValue::Number(n)) => serde_json::json!(n),
        Some(FieldValue::Text(s)) => Value::String(s.clone()),
    }
}
