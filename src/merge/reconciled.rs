//! Merge strategy for sources whose daily precipitation and wind fields are
//! reconciled against the hourly aggregate before joining.
//!
//! The daily gaps are not filled by date. A daily row is matched to an hourly
//! aggregate row through the `(precipitation, wind_direction, wind_speed)`
//! triple: the components the daily row does have form the key, and the first
//! aggregate row (in date order) carrying the same values supplies the missing
//! ones. Identical triples on unrelated days match each other, so this is an
//! approximate backfill and is kept as such.

use crate::merge::columns::{
    drop_if_present, left_join_on_date, prepare_table, select_present, sort_by_date, tag_seasons,
};
use crate::merge::composite::HOURLY_SUFFIX;
use crate::merge::error::MergeError;
use crate::merge::hourly::aggregate_hourly;
use crate::merge::{interpolate_for_source, report_duplicate_dates, MergedWeather};
use crate::types::source::SourceConfig;
use crate::utils::has_column;
use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use polars::prelude::*;
use std::collections::HashMap;

/// Columns forming the reconciliation key, in key order.
pub const RECONCILIATION_COLUMNS: [&str; 3] = ["precipitation", "wind_direction", "wind_speed"];

const DAILY_DROPS: [&str; 2] = ["total_sunshine_duration", "wind_gust"];

type Triple = [Option<f64>; 3];
/// Bit `i` of the mask is set when component `i` is part of the key.
type TripleKey = (u8, [Option<OrderedFloat<f64>>; 3]);

const FULL_MASK: u8 = 0b111;

pub(crate) fn merge_reconciled(
    daily: DataFrame,
    hourly: DataFrame,
    config: &SourceConfig,
) -> Result<MergedWeather, MergeError> {
    let daily = prepare_table(daily, "daily")?;
    let daily = select_present(daily, &config.daily_columns, "daily")?;

    let hourly = aggregate_hourly(hourly)?;
    let hourly = select_present(hourly, &config.hourly_columns, "hourly")?;

    let (daily, filled) = backfill_from_hourly(daily, &hourly)?;
    if filled > 0 {
        info!(
            "Source '{}': backfilled {} daily precipitation/wind values from hourly means",
            config.id, filled
        );
    }
    let daily = drop_if_present(daily, &DAILY_DROPS)?;
    let daily = sort_by_date(daily)?;

    let duplicate_dates = report_duplicate_dates(&daily, config)?;
    let (daily, interpolation) = interpolate_for_source(daily, config)?;

    let remaining = drop_if_present(hourly, &RECONCILIATION_COLUMNS)?;
    let merged = sort_by_date(left_join_on_date(daily, remaining, HOURLY_SUFFIX)?)?;

    Ok(MergedWeather {
        frame: tag_seasons(merged)?,
        interpolation,
        duplicate_dates,
    })
}

/// Fills null reconciliation components of `daily` from `hourly`, returning
/// the updated table and the number of values filled. The three key columns
/// come back as `Float64`.
///
/// When either table lacks one of the key columns, `daily` is returned as is.
pub(crate) fn backfill_from_hourly(
    mut daily: DataFrame,
    hourly: &DataFrame,
) -> Result<(DataFrame, usize), MergeError> {
    let missing = RECONCILIATION_COLUMNS.iter().find_map(|name| {
        if !has_column(&daily, name) {
            Some((*name, "daily"))
        } else if !has_column(hourly, name) {
            Some((*name, "hourly"))
        } else {
            None
        }
    });
    if let Some((column, table)) = missing {
        warn!(
            "Skipping precipitation/wind reconciliation: '{}' is missing from the {} table",
            column, table
        );
        return Ok((daily, 0));
    }

    let index = index_hourly_triples(&read_triples(hourly)?);
    let mut triples = read_triples(&daily)?;

    let mut filled = 0;
    for triple in triples.iter_mut() {
        let mask = known_mask(triple);
        if mask == 0 || mask == FULL_MASK {
            continue;
        }
        if let Some(source) = index.get(&key_of(triple, mask)) {
            for (slot, value) in triple.iter_mut().zip(source) {
                if slot.is_none() {
                    *slot = Some(*value);
                    filled += 1;
                }
            }
        }
    }
    debug!("Reconciliation matched {} daily values", filled);

    for (i, name) in RECONCILIATION_COLUMNS.iter().enumerate() {
        let values: Float64Chunked = triples.iter().map(|triple| triple[i]).collect();
        daily.with_column(values.with_name((*name).into()).into_series())?;
    }
    Ok((daily, filled))
}

fn read_triples(df: &DataFrame) -> PolarsResult<Vec<Triple>> {
    let mut columns = Vec::with_capacity(RECONCILIATION_COLUMNS.len());
    for name in RECONCILIATION_COLUMNS {
        let values = df.column(name)?.cast(&DataType::Float64)?;
        columns.push(values.f64()?.into_iter().collect::<Vec<Option<f64>>>());
    }
    Ok((0..df.height())
        .map(|row| [columns[0][row], columns[1][row], columns[2][row]])
        .collect())
}

/// Maps every partial key of each complete hourly triple to that triple.
/// Earlier rows win.
fn index_hourly_triples(triples: &[Triple]) -> HashMap<TripleKey, [f64; 3]> {
    let mut index = HashMap::new();
    for triple in triples {
        let [Some(a), Some(b), Some(c)] = *triple else {
            continue;
        };
        for mask in 1..FULL_MASK {
            index.entry(key_of(triple, mask)).or_insert([a, b, c]);
        }
    }
    index
}

fn known_mask(triple: &Triple) -> u8 {
    triple
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_some())
        .fold(0, |mask, (i, _)| mask | (1 << i))
}

fn key_of(triple: &Triple, mask: u8) -> TripleKey {
    let mut key = [None; 3];
    for (i, slot) in key.iter_mut().enumerate() {
        if mask & (1 << i) != 0 {
            *slot = triple[i].map(OrderedFloat);
        }
    }
    (mask, key)
}
