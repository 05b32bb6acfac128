//! Vendor summary aggregation - one fixed query over the loaded fact tables

use crate::db::Store;
use crate::error::{IngestError, Result};
use crate::ingestion::batch::{RecordBatch, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Freight per vendor, purchases per (vendor, brand) priced against the price
/// list, and sales per (vendor, brand). Purchases drive the join; sales and
/// freight are optional. Highest purchase spend first.
pub const VENDOR_SUMMARY_SQL: &str = r#"
WITH FreightSummary AS (
    SELECT
        VendorNumber,
        SUM(Freight) AS FreightCost
    FROM vendor_invoice
    GROUP BY VendorNumber
),
PurchaseSummary AS (
    SELECT
        p.VendorNumber,
        p.VendorName,
        p.Brand,
        p.Description,
        p.PurchasePrice,
        pp.Price AS ActualPrice,
        pp.Volume,
        SUM(p.Quantity) AS TotalPurchaseQuantity,
        SUM(p.Dollars) AS TotalPurchaseDollars
    FROM purchases p
    JOIN purchase_prices pp
        ON p.Brand = pp.Brand
    WHERE p.PurchasePrice > 0
    GROUP BY p.VendorNumber, p.VendorName, p.Brand, p.Description,
             p.PurchasePrice, pp.Price, pp.Volume
),
SalesSummary AS (
    SELECT
        VendorNo,
        Brand,
        SUM(SalesQuantity) AS TotalSalesQuantity,
        SUM(SalesDollars) AS TotalSalesDollars,
        SUM(SalesPrice) AS TotalSalesPrice,
        SUM(ExciseTax) AS TotalExciseTax
    FROM sales
    GROUP BY VendorNo, Brand
)
SELECT
    ps.VendorNumber,
    ps.VendorName,
    ps.Brand,
    ps.Description,
    ps.PurchasePrice,
    ps.ActualPrice,
    ps.Volume,
    ps.TotalPurchaseQuantity,
    ps.TotalPurchaseDollars,
    ss.TotalSalesQuantity,
    ss.TotalSalesDollars,
    ss.TotalSalesPrice,
    ss.TotalExciseTax,
    fs.FreightCost
FROM PurchaseSummary ps
LEFT JOIN SalesSummary ss
    ON ps.VendorNumber = ss.VendorNo
    AND ps.Brand = ss.Brand
LEFT JOIN FreightSummary fs
    ON ps.VendorNumber = fs.VendorNumber
ORDER BY ps.TotalPurchaseDollars DESC
"#;

/// Columns the query reads from each input table
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("vendor_invoice", &["VendorNumber", "Freight"]),
    (
        "purchases",
        &[
            "VendorNumber",
            "VendorName",
            "Brand",
            "Description",
            "PurchasePrice",
            "Quantity",
            "Dollars",
        ],
    ),
    ("purchase_prices", &["Brand", "Price", "Volume"]),
    (
        "sales",
        &[
            "VendorNo",
            "Brand",
            "SalesQuantity",
            "SalesDollars",
            "SalesPrice",
            "ExciseTax",
        ],
    ),
];

/// One (vendor, brand) pair as returned by the aggregation query.
///
/// Sales and freight fields are `None` when the left join found no match.
/// Keys are kept as stored: integer, real, text, or null for an empty cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VendorSummaryRow {
    pub vendor_number: Value,
    pub vendor_name: String,
    pub brand: Value,
    pub description: String,
    pub purchase_price: Option<f64>,
    pub actual_price: Option<f64>,
    /// Raw volume cell; price lists sometimes carry it as text
    pub volume: Value,
    pub total_purchase_quantity: Option<f64>,
    pub total_purchase_dollars: Option<f64>,
    pub total_sales_quantity: Option<f64>,
    pub total_sales_dollars: Option<f64>,
    pub total_sales_price: Option<f64>,
    pub total_excise_tax: Option<f64>,
    pub freight_cost: Option<f64>,
}

/// Fail with a precise error when an input table or column is missing.
/// Names match case-insensitively, as SQLite resolves them.
pub fn check_inputs(store: &Store) -> Result<()> {
    for (table, required) in REQUIRED_COLUMNS {
        if !store.exists(table)? {
            return Err(IngestError::TableNotFound(table.to_string()));
        }
        let present = store.table_columns(table)?;
        for column in required.iter() {
            if !present.iter().any(|c| c.name.eq_ignore_ascii_case(column)) {
                return Err(IngestError::MissingColumn {
                    source_id: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Run the aggregation and return rows ordered by total purchase dollars, descending
pub fn build_summary(store: &Store) -> Result<Vec<VendorSummaryRow>> {
    check_inputs(store)?;
    let batch = store.query_rows(VENDOR_SUMMARY_SQL)?;
    debug!("Vendor summary query returned {} rows", batch.len());

    let cols = SummaryColumns::locate(&batch)?;
    batch.rows.iter().map(|row| cols.read(row)).collect()
}

/// Ordinal positions of the query's output columns
struct SummaryColumns {
    vendor_number: usize,
    vendor_name: usize,
    brand: usize,
    description: usize,
    purchase_price: usize,
    actual_price: usize,
    volume: usize,
    total_purchase_quantity: usize,
    total_purchase_dollars: usize,
    total_sales_quantity: usize,
    total_sales_dollars: usize,
    total_sales_price: usize,
    total_excise_tax: usize,
    freight_cost: usize,
}

impl SummaryColumns {
    fn locate(batch: &RecordBatch) -> Result<Self> {
        // Unaliased output columns carry the input table's spelling.
        let idx = |name: &str| {
            batch
                .column_index(name)
                .ok_or_else(|| IngestError::MissingColumn {
                    source_id: "vendor summary query".to_string(),
                    column: name.to_string(),
                })
        };

        Ok(Self {
            vendor_number: idx("VendorNumber")?,
            vendor_name: idx("VendorName")?,
            brand: idx("Brand")?,
            description: idx("Description")?,
            purchase_price: idx("PurchasePrice")?,
            actual_price: idx("ActualPrice")?,
            volume: idx("Volume")?,
            total_purchase_quantity: idx("TotalPurchaseQuantity")?,
            total_purchase_dollars: idx("TotalPurchaseDollars")?,
            total_sales_quantity: idx("TotalSalesQuantity")?,
            total_sales_dollars: idx("TotalSalesDollars")?,
            total_sales_price: idx("TotalSalesPrice")?,
            total_excise_tax: idx("TotalExciseTax")?,
            freight_cost: idx("FreightCost")?,
        })
    }

    fn read(&self, row: &[Value]) -> Result<VendorSummaryRow> {
        Ok(VendorSummaryRow {
            vendor_number: cell(row, self.vendor_number),
            vendor_name: text(row, self.vendor_name),
            brand: cell(row, self.brand),
            description: text(row, self.description),
            purchase_price: number(row, self.purchase_price, "PurchasePrice")?,
            actual_price: number(row, self.actual_price, "ActualPrice")?,
            volume: cell(row, self.volume),
            total_purchase_quantity: number(row, self.total_purchase_quantity, "TotalPurchaseQuantity")?,
            total_purchase_dollars: number(row, self.total_purchase_dollars, "TotalPurchaseDollars")?,
            total_sales_quantity: number(row, self.total_sales_quantity, "TotalSalesQuantity")?,
            total_sales_dollars: number(row, self.total_sales_dollars, "TotalSalesDollars")?,
            total_sales_price: number(row, self.total_sales_price, "TotalSalesPrice")?,
            total_excise_tax: number(row, self.total_excise_tax, "TotalExciseTax")?,
            freight_cost: number(row, self.freight_cost, "FreightCost")?,
        })
    }
}

fn cell(row: &[Value], idx: usize) -> Value {
    row.get(idx).cloned().unwrap_or(Value::Null)
}

fn number(row: &[Value], idx: usize, name: &str) -> Result<Option<f64>> {
    match row.get(idx).unwrap_or(&Value::Null) {
        Value::Null => Ok(None),
        cell => cell
            .as_f64()
            .map(Some)
            .ok_or_else(|| IngestError::Conversion(format!("{} is not numeric: {:?}", name, cell))),
    }
}

fn text(row: &[Value], idx: usize) -> String {
    match row.get(idx) {
        Some(Value::Text(s)) => s.clone(),
        Some(Value::Integer(i)) => i.to_string(),
        Some(Value::Real(f)) => f.to_string(),
        Some(Value::Null) | None => String::new(),
    }
}
