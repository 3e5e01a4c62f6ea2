//! Temporal rules.
//!
//! Values span years 1 through 9999. No validator is translated; range
//! checks on temporal types fall through to filtering.

use crate::error::ConversionError;
use crate::registry::Registry;
use crate::ValueStrategy;
use chrono::{DateTime, NaiveDate, NaiveTime};
use proptest::prelude::*;
use schema_core::{Context, SchemaType, Value};

/// 0001-01-01T00:00:00Z
const MIN_TIMESTAMP: i64 = -62_135_596_800;
/// 9999-12-31T23:59:59Z
const MAX_TIMESTAMP: i64 = 253_402_300_799;

/// Days from the common era of 0001-01-01 and 9999-12-31.
const MIN_CE_DAY: i32 = 1;
const MAX_CE_DAY: i32 = 3_652_059;

const SECONDS_PER_DAY: u32 = 86_400;
const NANOS_PER_SECOND: u32 = 1_000_000_000;

pub fn datetime_strategy(
    _registry: &Registry,
    _ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    Ok((MIN_TIMESTAMP..=MAX_TIMESTAMP, 0..NANOS_PER_SECOND)
        .prop_filter_map("timestamp out of range", |(secs, nanos)| {
            DateTime::from_timestamp(secs, nanos).map(Value::DateTime)
        })
        .boxed())
}

pub fn date_strategy(
    _registry: &Registry,
    _ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    Ok((MIN_CE_DAY..=MAX_CE_DAY)
        .prop_filter_map("day out of range", |day| {
            NaiveDate::from_num_days_from_ce_opt(day).map(Value::Date)
        })
        .boxed())
}

pub fn time_strategy(
    _registry: &Registry,
    _ty: &SchemaType,
    _context: &Context,
) -> Result<ValueStrategy, ConversionError> {
    Ok((0..SECONDS_PER_DAY, 0..NANOS_PER_SECOND)
        .prop_filter_map("time out of range", |(secs, nanos)| {
            NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos).map(Value::Time)
        })
        .boxed())
}
