//! The dialect strategy interface.
//!
//! A dialect is data: a template table keyed by [`QueryShape`], a handful of
//! auxiliary clause constants, and the few lexical facts the where-clause
//! compiler and the parameter inference engine need. Adding a backend means
//! adding one more implementation of [`Dialect`], never new control flow in
//! the compilers.

use std::fmt;

use sqlforge_core::QueryShape;

use crate::error::DialectResult;

/// One row of a dialect's template table.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    pub shape: QueryShape,
    /// Template used when the shape is issued on its own
    pub top_level: &'static str,
    /// Template used when the shape is nested inside a parent operation.
    /// `None` means the top-level template is used for both.
    pub sub_query: Option<&'static str>,
}

impl TemplateEntry {
    pub const fn new(shape: QueryShape, top_level: &'static str) -> Self {
        Self {
            shape,
            top_level,
            sub_query: None,
        }
    }

    pub const fn with_sub_query(
        shape: QueryShape,
        top_level: &'static str,
        sub_query: &'static str,
    ) -> Self {
        Self {
            shape,
            top_level,
            sub_query: Some(sub_query),
        }
    }
}

/// Clause templates that are not tied to a query shape.
#[derive(Debug, Clone, Copy)]
pub struct AuxiliaryTemplates {
    pub pagination: &'static str,
    pub group_by: &'static str,
    pub order_by: &'static str,
    pub left_join: &'static str,
    pub transaction_block: &'static str,
}

/// A backend SQL dialect.
pub trait Dialect: Send + Sync + fmt::Debug {
    /// Human readable dialect name.
    fn name(&self) -> &'static str;

    /// Character introducing a named parameter in SQL text.
    fn parameter_prefix(&self) -> char {
        '@'
    }

    /// Prefix marking a unicode string literal (`N` on SQL Server).
    fn unicode_prefix(&self) -> &'static str;

    /// String concatenation operator.
    fn concat_operator(&self) -> &'static str;

    /// Shape → template table.
    fn templates(&self) -> &'static [TemplateEntry];

    /// Auxiliary clause templates.
    fn auxiliary(&self) -> &'static AuxiliaryTemplates;

    /// Select the template for `shape`.
    fn compile(&self, shape: QueryShape, is_sub_query: bool) -> DialectResult<&'static str> {
        crate::template::compile_template(self, shape, is_sub_query)
    }
}
