//! # Response Normalizer
//!
//! The listing endpoint answers in several shapes. [`normalize`] turns any of them into the
//! canonical [`Page`] record.
//!
//! Shapes are detected by [`ResponseShape::detect`], tried in this fixed order:
//!
//! 1. **Nested**: `{ data: { data: [..], totalElements, totalPages, pageNumber } }`,
//!    `pageNumber` zero-based.
//! 2. **Flat**: `{ data: [..], totalElements?, totalCount?, totalPages?, pageNumber? }`,
//!    `pageNumber` zero-based.
//! 3. **Bare**: `[..]`. One page holding everything; the requested page is kept.
//! 4. **Items**: `{ items: [..], totalCount?, totalPages?, pageNumber? }`, `pageNumber`
//!    one-based.
//!
//! Numeric fields that are absent, zero or not a non-negative integer fall back to the
//! defaults: `total_count` is the number of items, `total_pages` is 1, and the page is the
//! requested one.

use crate::model::Page;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Why a payload could not be normalized.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum NormalizeError {
    /// No known shape matched.
    #[error("Unexpected response format from server")]
    MalformedResponse,

    /// The shape matched but an element could not be decoded.
    #[error("Invalid record at position {index}: {reason}")]
    InvalidItem { index: usize, reason: String },
}

/// A recognised listing payload, borrowed from the decoded JSON.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    Nested {
        items: &'a [Value],
        meta: &'a Map<String, Value>,
    },
    Flat {
        items: &'a [Value],
        meta: &'a Map<String, Value>,
    },
    Bare {
        items: &'a [Value],
    },
    Items {
        items: &'a [Value],
        meta: &'a Map<String, Value>,
    },
}

impl<'a> ResponseShape<'a> {
    /// Classify a payload. The order of the checks is part of the contract.
    pub fn detect(payload: &'a Value) -> Option<Self> {
        if let Some((items, meta)) = nested(payload) {
            return Some(ResponseShape::Nested { items, meta });
        }
        if let Some((items, meta)) = array_field(payload, "data") {
            return Some(ResponseShape::Flat { items, meta });
        }
        if let Value::Array(items) = payload {
            return Some(ResponseShape::Bare { items });
        }
        if let Some((items, meta)) = array_field(payload, "items") {
            return Some(ResponseShape::Items { items, meta });
        }
        None
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseShape::Nested { .. } => "nested",
            ResponseShape::Flat { .. } => "flat",
            ResponseShape::Bare { .. } => "bare",
            ResponseShape::Items { .. } => "items",
        }
    }

    pub fn items(&self) -> &'a [Value] {
        match *self {
            ResponseShape::Nested { items, .. }
            | ResponseShape::Flat { items, .. }
            | ResponseShape::Bare { items }
            | ResponseShape::Items { items, .. } => items,
        }
    }

    /// Compute `(total_count, total_pages, current_page)`.
    fn counts(&self, requested_page: u32) -> (u64, u32, u32) {
        let len = self.items().len() as u64;
        match *self {
            ResponseShape::Nested { meta, .. } => (
                count(meta, &["totalElements"]).unwrap_or(len),
                pages(meta).unwrap_or(1),
                zero_based_page(meta).unwrap_or(requested_page),
            ),
            ResponseShape::Flat { meta, .. } => (
                count(meta, &["totalElements", "totalCount"]).unwrap_or(len),
                pages(meta).unwrap_or(1),
                zero_based_page(meta).unwrap_or(requested_page),
            ),
            ResponseShape::Bare { .. } => (len, 1, requested_page),
            ResponseShape::Items { meta, .. } => (
                count(meta, &["totalCount", "totalElements"]).unwrap_or(len),
                pages(meta).unwrap_or(1),
                count(meta, &["pageNumber"])
                    .and_then(|p| u32::try_from(p).ok())
                    .unwrap_or(requested_page),
            ),
        }
    }
}

/// Normalize a raw listing payload into a canonical page.
///
/// `requested_page` is the one-based page that was asked for. It is used when the payload
/// carries no page number of its own.
pub fn normalize<T: DeserializeOwned>(
    payload: &Value,
    requested_page: u32,
) -> Result<Page<T>, NormalizeError> {
    let shape = ResponseShape::detect(payload).ok_or(NormalizeError::MalformedResponse)?;
    let (total_count, total_pages, current_page) = shape.counts(requested_page.max(1));

    let items = shape
        .items()
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            T::deserialize(raw).map_err(|e| NormalizeError::InvalidItem {
                index,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<T>, _>>()?;

    Ok(Page {
        items,
        total_count,
        total_pages,
        current_page,
    })
}

fn nested(payload: &Value) -> Option<(&[Value], &Map<String, Value>)> {
    let meta = payload.get("data")?.as_object()?;
    let items = meta.get("data")?.as_array()?;
    Some((items.as_slice(), meta))
}

fn array_field<'a>(payload: &'a Value, field: &str) -> Option<(&'a [Value], &'a Map<String, Value>)> {
    let meta = payload.as_object()?;
    let items = meta.get(field)?.as_array()?;
    Some((items.as_slice(), meta))
}

/// First of `fields` holding a positive integer.
fn count(meta: &Map<String, Value>, fields: &[&str]) -> Option<u64> {
    fields
        .iter()
        .filter_map(|f| meta.get(*f).and_then(Value::as_u64))
        .find(|n| *n > 0)
}

fn pages(meta: &Map<String, Value>) -> Option<u32> {
    count(meta, &["totalPages"]).and_then(|p| u32::try_from(p).ok())
}

/// Zero-based `pageNumber` converted to one-based. An explicit 0 is the first page.
fn zero_based_page(meta: &Map<String, Value>) -> Option<u32> {
    meta.get("pageNumber")
        .and_then(Value::as_u64)
        .and_then(|p| u32::try_from(p).ok())
        .and_then(|p| p.checked_add(1))
}
