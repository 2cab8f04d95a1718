//! Declared database types and transaction isolation levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownDbType;

/// Declared type of a bound parameter or a column.
///
/// The vocabulary is the SQL Server one; other dialects map onto it
/// (`INTEGER` is `BigInt`, `BLOB` is `VarBinary`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    BigInt,
    Binary,
    Bit,
    Char,
    Date,
    DateTime,
    DateTime2,
    DateTimeOffset,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    Text,
    Time,
    TinyInt,
    UniqueIdentifier,
    VarBinary,
    VarChar,
    Xml,
}

impl DbType {
    /// Wide (UTF-16 on SQL Server) character types.
    ///
    /// String constants spliced next to parameters of these types need the
    /// dialect's unicode literal prefix.
    pub fn is_wide_string(&self) -> bool {
        matches!(self, DbType::NChar | DbType::NVarChar | DbType::NText)
    }

    /// Any character type, wide or not.
    pub fn is_string(&self) -> bool {
        self.is_wide_string() || matches!(self, DbType::Char | DbType::VarChar | DbType::Text)
    }

    /// Canonical lower-case SQL name.
    pub fn sql_name(&self) -> &'static str {
        match self {
            DbType::BigInt => "bigint",
            DbType::Binary => "binary",
            DbType::Bit => "bit",
            DbType::Char => "char",
            DbType::Date => "date",
            DbType::DateTime => "datetime",
            DbType::DateTime2 => "datetime2",
            DbType::DateTimeOffset => "datetimeoffset",
            DbType::Decimal => "decimal",
            DbType::Float => "float",
            DbType::Image => "image",
            DbType::Int => "int",
            DbType::Money => "money",
            DbType::NChar => "nchar",
            DbType::NText => "ntext",
            DbType::NVarChar => "nvarchar",
            DbType::Real => "real",
            DbType::SmallDateTime => "smalldatetime",
            DbType::SmallInt => "smallint",
            DbType::SmallMoney => "smallmoney",
            DbType::Text => "text",
            DbType::Time => "time",
            DbType::TinyInt => "tinyint",
            DbType::UniqueIdentifier => "uniqueidentifier",
            DbType::VarBinary => "varbinary",
            DbType::VarChar => "varchar",
            DbType::Xml => "xml",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

impl FromStr for DbType {
    type Err = UnknownDbType;

    /// Parse a declared type name, ignoring case, surrounding whitespace,
    /// brackets and any size suffix (`NVARCHAR(50)`, `[decimal](18, 2)`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base = s.split('(').next().unwrap_or("").trim();
        let base = base.trim_start_matches('[').trim_end_matches(']');
        let ty = match base.to_ascii_lowercase().as_str() {
            "bigint" | "integer" => DbType::BigInt,
            "binary" => DbType::Binary,
            "bit" | "bool" | "boolean" => DbType::Bit,
            "char" => DbType::Char,
            "date" => DbType::Date,
            "datetime" => DbType::DateTime,
            "datetime2" => DbType::DateTime2,
            "datetimeoffset" => DbType::DateTimeOffset,
            "decimal" | "numeric" => DbType::Decimal,
            "float" | "double" => DbType::Float,
            "image" => DbType::Image,
            "int" => DbType::Int,
            "money" => DbType::Money,
            "nchar" => DbType::NChar,
            "ntext" => DbType::NText,
            "nvarchar" => DbType::NVarChar,
            "real" => DbType::Real,
            "smalldatetime" => DbType::SmallDateTime,
            "smallint" => DbType::SmallInt,
            "smallmoney" => DbType::SmallMoney,
            "text" => DbType::Text,
            "time" => DbType::Time,
            "tinyint" => DbType::TinyInt,
            "uniqueidentifier" => DbType::UniqueIdentifier,
            "varbinary" | "blob" => DbType::VarBinary,
            "varchar" => DbType::VarChar,
            "xml" => DbType::Xml,
            _ => {
                return Err(UnknownDbType {
                    name: s.to_string(),
                })
            }
        };
        Ok(ty)
    }
}

/// Transaction isolation level requested at `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
            IsolationLevel::Snapshot => "SNAPSHOT",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_ignores_case_and_size() {
        assert_eq!("NVARCHAR(50)".parse::<DbType>().unwrap(), DbType::NVarChar);
        assert_eq!("nvarchar(max)".parse::<DbType>().unwrap(), DbType::NVarChar);
        assert_eq!(" [decimal](18, 2)".parse::<DbType>().unwrap(), DbType::Decimal);
        assert_eq!("Int".parse::<DbType>().unwrap(), DbType::Int);
    }

    #[test]
    fn parse_sqlite_affinities() {
        assert_eq!("INTEGER".parse::<DbType>().unwrap(), DbType::BigInt);
        assert_eq!("BLOB".parse::<DbType>().unwrap(), DbType::VarBinary);
    }

    #[test]
    fn parse_unknown_reports_name() {
        let err = "geography".parse::<DbType>().unwrap_err();
        assert_eq!(err.name, "geography");
    }

    #[test]
    fn wide_string_classification() {
        assert!(DbType::NVarChar.is_wide_string());
        assert!(DbType::NChar.is_wide_string());
        assert!(DbType::NText.is_wide_string());
        assert!(!DbType::VarChar.is_wide_string());
        assert!(DbType::VarChar.is_string());
        assert!(!DbType::Int.is_string());
    }

    #[test]
    fn sql_name_round_trips() {
        for ty in [DbType::BigInt, DbType::DateTimeOffset, DbType::UniqueIdentifier] {
            assert_eq!(ty.sql_name().parse::<DbType>().unwrap(), ty);
        }
    }

    proptest! {
        #[test]
        fn parse_is_case_and_size_insensitive(upper in any::<bool>(), size in 1u32..8000) {
            for ty in [DbType::NVarChar, DbType::VarChar, DbType::VarBinary, DbType::NChar] {
                let name = if upper {
                    ty.sql_name().to_ascii_uppercase()
                } else {
                    ty.sql_name().to_ascii_lowercase()
                };
                let text = format!("{}({})", name, size);
                prop_assert_eq!(text.parse::<DbType>().unwrap(), ty);
            }
        }
    }
}
