//! Declarative query-string filter schemas.
//!
//! Each resource declares the query keys it accepts as a static schema.
//! `page` and `page_size` are implicit fields on every schema; unknown
//! keys are ignored. A value that fails coercion discards the whole
//! filter set (logged) and falls back to defaults rather than failing
//! the request.

use std::collections::HashMap;

use crate::types::PageParams;

/// Coercion applied to a raw query-string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Int,
    Text,
    Bool,
}

/// One allowed query-string key.
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub name: &'static str,
    pub kind: FilterKind,
}

impl FilterField {
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: FilterKind::Int,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FilterKind::Text,
        }
    }

    pub const fn bool(name: &'static str) -> Self {
        Self {
            name,
            kind: FilterKind::Bool,
        }
    }
}

/// A coerced filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
    Bool(bool),
}

/// Equality filters as `(column, value)` pairs.
pub type FilterSet = Vec<(&'static str, FilterValue)>;

/// Cleaned query arguments: coerced filters plus pagination parameters.
#[derive(Debug, Default)]
pub struct CleanedArgs {
    pub filters: FilterSet,
    pub page: PageParams,
}

/// Static filter schema for one resource.
#[derive(Debug, Clone, Copy)]
pub struct FilterSchema {
    fields: &'static [FilterField],
}

impl FilterSchema {
    pub const EMPTY: FilterSchema = FilterSchema { fields: &[] };

    pub const fn new(fields: &'static [FilterField]) -> Self {
        Self { fields }
    }

    /// Validate and coerce request query parameters.
    ///
    /// On any coercion failure the filters are dropped wholesale and
    /// default paging is used; the request itself still succeeds.
    pub fn clean(&self, query: &HashMap<String, String>) -> CleanedArgs {
        match self.try_clean(query) {
            Ok(args) => args,
            Err(detail) => {
                tracing::info!("Error in filters: {}", detail);
                CleanedArgs::default()
            }
        }
    }

    fn try_clean(&self, query: &HashMap<String, String>) -> Result<CleanedArgs, String> {
        let mut page = PageParams::default();

        if let Some(raw) = query.get("page") {
            page.page = parse_positive(raw).ok_or_else(|| format!("page: {raw}"))?;
        }
        if let Some(raw) = query.get("page_size") {
            page.page_size = parse_positive(raw).ok_or_else(|| format!("page_size: {raw}"))?;
        }

        let mut filters = FilterSet::new();
        for field in self.fields {
            let Some(raw) = query.get(field.name) else {
                continue;
            };
            let value = match field.kind {
                FilterKind::Int => raw
                    .parse::<i64>()
                    .map(FilterValue::Int)
                    .map_err(|_| format!("{}: {raw}", field.name))?,
                FilterKind::Text => FilterValue::Text(raw.clone()),
                FilterKind::Bool => match raw.as_str() {
                    "true" | "1" => FilterValue::Bool(true),
                    "false" | "0" => FilterValue::Bool(false),
                    _ => return Err(format!("{}: {raw}", field.name)),
                },
            };
            filters.push((field.name, value));
        }

        Ok(CleanedArgs { filters, page })
    }
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|n| *n > 0)
}
