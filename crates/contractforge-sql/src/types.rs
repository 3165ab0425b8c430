//! Catalog type to warehouse type mapping

use std::fmt;

/// Warehouse column type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseType {
    Int,

    /// Fixed-point number with the declared precision, e.g. `(18,2)`
    Number(Option<String>),

    Varchar,
    Date,
    TimestampNtz,

    /// Any other type, upper-cased verbatim
    Other(String),
}

impl WarehouseType {
    /// Whether values are parsed with the date format
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::TimestampNtz)
    }
}

impl fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "INT"),
            Self::Number(Some(precision)) => write!(f, "NUMBER{}", precision),
            Self::Number(None) => write!(f, "NUMBER"),
            Self::Varchar => write!(f, "VARCHAR"),
            Self::Date => write!(f, "DATE"),
            Self::TimestampNtz => write!(f, "TIMESTAMP_NTZ"),
            Self::Other(other) => write!(f, "{}", other),
        }
    }
}

/// Map a catalog type string to a warehouse type
///
/// Keywords are searched case-insensitively in a fixed order: integer,
/// decimal, varchar, date, timestamp. Decimal precision is kept; varchar
/// length is not.
pub fn warehouse_type(data_type: &str) -> WarehouseType {
    let upper = data_type.trim().to_uppercase();

    if upper.contains("INTEGER") {
        WarehouseType::Int
    } else if upper.contains("DECIMAL") {
        WarehouseType::Number(precision_suffix(&upper))
    } else if upper.contains("VARCHAR") {
        WarehouseType::Varchar
    } else if upper.contains("DATE") {
        WarehouseType::Date
    } else if upper.contains("TIMESTAMP") {
        WarehouseType::TimestampNtz
    } else {
        WarehouseType::Other(upper)
    }
}

fn precision_suffix(data_type: &str) -> Option<String> {
    let start = data_type.find('(')?;
    let end = data_type.rfind(')')?;
    (end > start + 1).then(|| data_type[start..=end].replace(' ', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_order() {
        assert_eq!(warehouse_type("integer"), WarehouseType::Int);
        assert_eq!(warehouse_type("decimal(18,2)"), WarehouseType::Number(Some("(18,2)".into())));
        assert_eq!(warehouse_type("decimal"), WarehouseType::Number(None));
        assert_eq!(warehouse_type("varchar(50)"), WarehouseType::Varchar);
        assert_eq!(warehouse_type("date"), WarehouseType::Date);
        assert_eq!(warehouse_type("timestamp"), WarehouseType::TimestampNtz);
        assert_eq!(warehouse_type("boolean"), WarehouseType::Other("BOOLEAN".into()));
    }

    #[test]
    fn rendering() {
        assert_eq!(warehouse_type("decimal(18,2)").to_string(), "NUMBER(18,2)");
        assert_eq!(warehouse_type("varchar(50)").to_string(), "VARCHAR");
        assert_eq!(warehouse_type("timestamp").to_string(), "TIMESTAMP_NTZ");
        assert!(warehouse_type("date").is_temporal());
        assert!(!warehouse_type("decimal(4)").is_temporal());
    }
}
