//! Derived metrics over the raw vendor summary. Pure; no I/O.

use crate::error::{IngestError, Result};
use crate::ingestion::batch::Value;
use crate::summary::query::VendorSummaryRow;
use serde::{Deserialize, Serialize};

/// A summary row after zero-filling and metric derivation.
///
/// Ratios whose denominator is zero are `None` and persist as NULL.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSummaryRow {
    pub vendor_number: Value,
    pub vendor_name: String,
    pub brand: Value,
    pub description: String,
    pub purchase_price: f64,
    pub actual_price: f64,
    pub volume: f64,
    pub total_purchase_quantity: f64,
    pub total_purchase_dollars: f64,
    pub total_sales_quantity: f64,
    pub total_sales_dollars: f64,
    pub total_sales_price: f64,
    pub total_excise_tax: f64,
    pub freight_cost: f64,
    pub gross_profit: f64,
    pub profit_margin: Option<f64>,
    pub stock_turnover: Option<f64>,
    pub sales_to_purchase_ratio: Option<f64>,
}

/// `numerator / denominator`, or None when the quotient is undefined
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let q = numerator / denominator;
    q.is_finite().then_some(q)
}

fn volume_as_f64(volume: &Value, row: &VendorSummaryRow) -> Result<f64> {
    match volume {
        Value::Null => Ok(0.0),
        v => v.as_f64().ok_or_else(|| {
            IngestError::Conversion(format!(
                "Volume {:?} for vendor {:?} brand {:?} is not numeric",
                v, row.vendor_number, row.brand
            ))
        }),
    }
}

/// A null key becomes 0; any other key passes through unchanged
fn key_or_zero(key: Value) -> Value {
    match key {
        Value::Null => Value::Integer(0),
        k => k,
    }
}

pub fn enrich_row(row: VendorSummaryRow) -> Result<EnrichedSummaryRow> {
    let volume = volume_as_f64(&row.volume, &row)?;

    let total_purchase_quantity = row.total_purchase_quantity.unwrap_or(0.0);
    let total_purchase_dollars = row.total_purchase_dollars.unwrap_or(0.0);
    let total_sales_quantity = row.total_sales_quantity.unwrap_or(0.0);
    let total_sales_dollars = row.total_sales_dollars.unwrap_or(0.0);

    let gross_profit = total_sales_dollars - total_purchase_dollars;

    Ok(EnrichedSummaryRow {
        vendor_number: key_or_zero(row.vendor_number),
        vendor_name: row.vendor_name.trim().to_string(),
        brand: key_or_zero(row.brand),
        description: row.description,
        purchase_price: row.purchase_price.unwrap_or(0.0),
        actual_price: row.actual_price.unwrap_or(0.0),
        volume,
        total_purchase_quantity,
        total_purchase_dollars,
        total_sales_quantity,
        total_sales_dollars,
        total_sales_price: row.total_sales_price.unwrap_or(0.0),
        total_excise_tax: row.total_excise_tax.unwrap_or(0.0),
        freight_cost: row.freight_cost.unwrap_or(0.0),
        gross_profit,
        profit_margin: ratio(gross_profit, total_sales_dollars).map(|r| r * 100.0),
        stock_turnover: ratio(total_sales_quantity, total_purchase_quantity),
        sales_to_purchase_ratio: ratio(total_sales_dollars, total_purchase_dollars),
    })
}

/// Zero-fill, trim vendor names, and derive profit metrics. Row order is preserved.
pub fn enrich(rows: Vec<VendorSummaryRow>) -> Result<Vec<EnrichedSummaryRow>> {
    rows.into_iter().map(enrich_row).collect()
}
