//! In-memory batch source over enriched summary rows

use crate::error::Result;
use crate::ingestion::batch::{BatchSource, Column, ColumnType, RecordBatch, Value};
use crate::summary::metrics::EnrichedSummaryRow;

/// Output columns of the summary table, in order.
///
/// The key columns' types here apply to an empty summary; otherwise they are
/// narrowed from the keys actually present (see [`key_type`]).
pub const SUMMARY_COLUMNS: &[(&str, ColumnType)] = &[
    ("VendorNumber", ColumnType::Integer),
    ("VendorName", ColumnType::Text),
    ("Brand", ColumnType::Integer),
    ("Description", ColumnType::Text),
    ("PurchasePrice", ColumnType::Real),
    ("ActualPrice", ColumnType::Real),
    ("Volume", ColumnType::Real),
    ("TotalPurchaseQuantity", ColumnType::Real),
    ("TotalPurchaseDollars", ColumnType::Real),
    ("TotalSalesQuantity", ColumnType::Real),
    ("TotalSalesDollars", ColumnType::Real),
    ("TotalSalesPrice", ColumnType::Real),
    ("TotalExciseTax", ColumnType::Real),
    ("FreightCost", ColumnType::Real),
    ("GrossProfit", ColumnType::Real),
    ("ProfitMargin", ColumnType::Real),
    ("StockTurnover", ColumnType::Real),
    ("SalesToPurchaseRatio", ColumnType::Real),
];

/// Narrowest column type holding every key: INTEGER, then REAL, then TEXT
pub fn key_type<'a>(keys: impl IntoIterator<Item = &'a Value>) -> ColumnType {
    keys.into_iter().fold(ColumnType::Integer, |acc, key| match (acc, key) {
        (ColumnType::Text, _) | (_, Value::Text(_)) => ColumnType::Text,
        (ColumnType::Real, _) | (_, Value::Real(_)) => ColumnType::Real,
        (acc, _) => acc,
    })
}

pub struct SummarySource {
    columns: Vec<String>,
    schema: Vec<Column>,
    rows: Vec<EnrichedSummaryRow>,
    batch_size: usize,
    cursor: usize,
}

impl SummarySource {
    pub fn new(rows: Vec<EnrichedSummaryRow>, batch_size: usize) -> Self {
        let vendor_type = key_type(rows.iter().map(|r| &r.vendor_number));
        let brand_type = key_type(rows.iter().map(|r| &r.brand));
        let schema = SUMMARY_COLUMNS
            .iter()
            .map(|(name, ty)| match *name {
                "VendorNumber" => Column::new(*name, vendor_type),
                "Brand" => Column::new(*name, brand_type),
                _ => Column::new(*name, *ty),
            })
            .collect();

        Self {
            columns: SUMMARY_COLUMNS.iter().map(|(n, _)| n.to_string()).collect(),
            schema,
            rows,
            batch_size: batch_size.max(1),
            cursor: 0,
        }
    }

    fn to_cells(row: &EnrichedSummaryRow) -> Vec<Value> {
        vec![
            row.vendor_number.clone(),
            Value::Text(row.vendor_name.clone()),
            row.brand.clone(),
            Value::Text(row.description.clone()),
            Value::Real(row.purchase_price),
            Value::Real(row.actual_price),
            Value::Real(row.volume),
            Value::Real(row.total_purchase_quantity),
            Value::Real(row.total_purchase_dollars),
            Value::Real(row.total_sales_quantity),
            Value::Real(row.total_sales_dollars),
            Value::Real(row.total_sales_price),
            Value::Real(row.total_excise_tax),
            Value::Real(row.freight_cost),
            Value::Real(row.gross_profit),
            Value::from(row.profit_margin),
            Value::from(row.stock_turnover),
            Value::from(row.sales_to_purchase_ratio),
        ]
    }
}

impl BatchSource for SummarySource {
    fn column_names(&self) -> &[String] {
        &self.columns
    }

    fn declared_schema(&self) -> Option<Vec<Column>> {
        Some(self.schema.clone())
    }

    fn next_batch(&mut self) -> Result<Option<RecordBatch>> {
        if self.cursor >= self.rows.len() {
            return Ok(None);
        }
        let end = (self.cursor + self.batch_size).min(self.rows.len());
        let rows = self.rows[self.cursor..end].iter().map(Self::to_cells).collect();
        self.cursor = end;
        Ok(Some(RecordBatch::with_rows(self.columns.clone(), rows)))
    }

    fn rewind(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn source_id(&self) -> &str {
        "vendor_summary"
    }

    fn source_type(&self) -> &str {
        "memory"
    }
}
