//! Bound parameters and comparison clauses.

use serde::{Deserialize, Serialize};

use crate::types::DbType;
use crate::value::Value;

/// Prefix characters a caller may put in front of a parameter name.
const NAME_PREFIXES: &[char] = &['@', ':', '$'];

/// A parameter bound to a command.
///
/// Names are kept without the dialect prefix: `Parameter::new("@Id", ..)`
/// and `Parameter::new("Id", ..)` describe the same parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    /// Declared type
    pub db_type: DbType,
    /// Optional size (characters for strings, bytes for binaries)
    pub size: Option<u32>,
    /// Bound value, `Value::Null` when absent
    pub value: Value,
}

impl Parameter {
    /// Create a parameter with no declared size.
    pub fn new(name: impl AsRef<str>, db_type: DbType, value: impl Into<Value>) -> Self {
        Self {
            name: strip_prefix(name.as_ref()).to_string(),
            db_type,
            size: None,
            value: value.into(),
        }
    }

    /// Set the declared size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Parameter name without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive, prefix-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(strip_prefix(name))
    }
}

/// Strip a leading `@`, `:` or `$` from a parameter name.
pub fn strip_prefix(name: &str) -> &str {
    name.trim_start_matches(NAME_PREFIXES)
}

/// Comparison operator used when lowering a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    StartsWith,
    EndsWith,
    Contains,
    Equal,
    NotEqual,
    IsNull,
    IsNotNull,
    LessThan,
    LessThanOrEqual,
    MoreThan,
    MoreThanOrEqual,
    In,
    NotIn,
    /// Operator the compiler has no lowering for; produces an empty fragment.
    Unknown,
}

impl CompareOperator {
    /// Whether the lowered fragment references a bound parameter.
    pub fn takes_parameter(&self) -> bool {
        !matches!(
            self,
            CompareOperator::IsNull | CompareOperator::IsNotNull | CompareOperator::Unknown
        )
    }
}

/// A comparison clause as handed over by a query builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareClause {
    pub operator: CompareOperator,
}

impl CompareClause {
    pub fn new(operator: CompareOperator) -> Self {
        Self { operator }
    }
}

impl From<CompareOperator> for CompareClause {
    fn from(operator: CompareOperator) -> Self {
        Self::new(operator)
    }
}
