//! Declared database type → Rust type, for generated parameter declarations.

use sqlforge_core::DbType;

/// Rust type used when a declared type name is unknown.
pub const FALLBACK_RUST_TYPE: &str = "String";

/// Rust type for a [`DbType`].
pub fn rust_type_for(db_type: DbType) -> &'static str {
    match db_type {
        DbType::BigInt => "i64",
        DbType::Int => "i32",
        DbType::SmallInt => "i16",
        DbType::TinyInt => "u8",
        DbType::Bit => "bool",
        DbType::Decimal | DbType::Money | DbType::SmallMoney | DbType::Float => "f64",
        DbType::Real => "f32",
        DbType::Char
        | DbType::VarChar
        | DbType::Text
        | DbType::NChar
        | DbType::NVarChar
        | DbType::NText
        | DbType::Xml => "String",
        DbType::Date => "chrono::NaiveDate",
        DbType::Time => "chrono::NaiveTime",
        DbType::DateTime | DbType::DateTime2 | DbType::SmallDateTime => "chrono::NaiveDateTime",
        DbType::DateTimeOffset => "chrono::DateTime<chrono::FixedOffset>",
        DbType::UniqueIdentifier => "uuid::Uuid",
        DbType::Binary | DbType::VarBinary | DbType::Image => "Vec<u8>",
    }
}

/// Rust type for a declared type name such as `"nvarchar(50)"`.
///
/// Unknown names map to [`FALLBACK_RUST_TYPE`].
pub fn rust_type(db_type_name: &str) -> &'static str {
    db_type_name
        .parse::<DbType>()
        .map(rust_type_for)
        .unwrap_or(FALLBACK_RUST_TYPE)
}

/// A Rust parameter declaration, e.g. `user_id: Option<i32>`.
pub fn param_declaration(name: &str, db_type_name: &str, nullable: bool) -> String {
    let ty = rust_type(db_type_name);
    if nullable {
        format!("{}: Option<{}>", name, ty)
    } else {
        format!("{}: {}", name, ty)
    }
}
