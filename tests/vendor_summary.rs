mod common;

use inventory_ingest::ingestion::ColumnType;
use inventory_ingest::summary::{build_summary, enrich, SUMMARY_COLUMNS};
use inventory_ingest::{
    create_vendor_summary, load_directory, IngestError, IngestionOptions, IngestionOrchestrator,
    Store, TableAction, Value, VENDOR_SUMMARY_TABLE,
};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

fn loaded_store(dir: &TempDir) -> (Store, IngestionOrchestrator) {
    common::write_inventory_fixtures(dir.path());
    let mut store = Store::open(dir.path().join("inventory.db")).unwrap();
    let orchestrator = IngestionOrchestrator::with_options(IngestionOptions { batch_size: 2 });
    load_directory(&mut store, &orchestrator, dir.path()).unwrap();
    (store, orchestrator)
}

fn int_key(key: &Value) -> i64 {
    match key {
        Value::Integer(i) => *i,
        other => panic!("expected an integer key, got {other:?}"),
    }
}

/// Rewrite one fixture file in place
fn edit_fixture(dir: &TempDir, name: &str, edit: impl Fn(String) -> String) {
    let path = dir.path().join(name);
    let body = fs::read_to_string(&path).unwrap();
    fs::write(&path, edit(body)).unwrap();
}

#[test]
fn test_summary_ordered_by_purchase_dollars() {
    let dir = TempDir::new().unwrap();
    let (store, _) = loaded_store(&dir);

    let rows = build_summary(&store).unwrap();
    let dollars: Vec<f64> = rows
        .iter()
        .map(|r| r.total_purchase_dollars.unwrap())
        .collect();
    assert_eq!(dollars, vec![300.0, 100.0, 60.0]);
    assert!(dollars.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_every_purchase_pair_appears_once() {
    let dir = TempDir::new().unwrap();
    let (store, _) = loaded_store(&dir);

    let rows = build_summary(&store).unwrap();
    let pairs: Vec<(i64, i64)> = rows
        .iter()
        .map(|r| (int_key(&r.vendor_number), int_key(&r.brand)))
        .collect();
    let unique: HashSet<(i64, i64)> = pairs.iter().copied().collect();

    assert_eq!(pairs.len(), unique.len());
    assert_eq!(
        unique,
        HashSet::from([(105, 58), (105, 62), (4466, 8412)])
    );
    // Zero purchase price never reaches the summary.
    assert!(!unique.contains(&(9000, 77)));
}

#[test]
fn test_left_join_leaves_sales_absent_then_enrich_zero_fills() {
    let dir = TempDir::new().unwrap();
    let (store, _) = loaded_store(&dir);

    let rows = build_summary(&store).unwrap();
    let no_sales = rows.iter().find(|r| r.brand == Value::Integer(62)).unwrap();
    assert_eq!(no_sales.total_sales_dollars, None);
    assert_eq!(no_sales.freight_cost, Some(5.0));

    let no_freight = rows.iter().find(|r| r.brand == Value::Integer(8412)).unwrap();
    assert_eq!(no_freight.freight_cost, None);

    let enriched = enrich(rows).unwrap();
    let brand_62 = enriched.iter().find(|r| r.brand == Value::Integer(62)).unwrap();
    assert_eq!(brand_62.total_sales_quantity, 0.0);
    assert_eq!(brand_62.total_sales_dollars, 0.0);
    assert_eq!(brand_62.total_excise_tax, 0.0);
    assert_eq!(brand_62.gross_profit, -60.0);
    assert_eq!(brand_62.profit_margin, None);

    let brand_8412 = enriched.iter().find(|r| r.brand == Value::Integer(8412)).unwrap();
    assert_eq!(brand_8412.freight_cost, 0.0);
    assert_eq!(brand_8412.volume, 0.0);
    assert_eq!(brand_8412.stock_turnover, Some(0.5));
}

#[test]
fn test_derived_metrics_from_aggregates() {
    let dir = TempDir::new().unwrap();
    let (store, _) = loaded_store(&dir);

    let enriched = enrich(build_summary(&store).unwrap()).unwrap();
    let row = enriched.iter().find(|r| r.brand == Value::Integer(58)).unwrap();

    assert_eq!(row.vendor_name, "ALTAMAR BRANDS LLC");
    assert_eq!(row.total_purchase_quantity, 10.0);
    assert_eq!(row.total_sales_quantity, 20.0);
    assert!((row.total_sales_dollars - 259.80).abs() < 1e-9);
    assert!((row.gross_profit - 159.80).abs() < 1e-9);
    assert!((row.profit_margin.unwrap() - 61.508_852_963_818_32).abs() < 1e-6);
    assert_eq!(row.stock_turnover, Some(2.0));
    assert!((row.sales_to_purchase_ratio.unwrap() - 2.598).abs() < 1e-9);
    assert_eq!(row.freight_cost, 5.0);
    assert_eq!(row.volume, 750.0);
}

#[test]
fn test_summary_table_is_replaced_on_rerun() {
    let dir = TempDir::new().unwrap();
    let (mut store, orchestrator) = loaded_store(&dir);

    let first = create_vendor_summary(&mut store, &orchestrator).unwrap();
    assert_eq!(first.rows, 3);
    assert_eq!(first.ingestion.action, TableAction::Created);

    let second = create_vendor_summary(&mut store, &orchestrator).unwrap();
    assert_eq!(second.ingestion.action, TableAction::Replaced);
    assert_eq!(store.row_count(VENDOR_SUMMARY_TABLE).unwrap(), 3);

    let columns: Vec<String> = store
        .table_columns(VENDOR_SUMMARY_TABLE)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    let expected: Vec<String> = SUMMARY_COLUMNS.iter().map(|(n, _)| n.to_string()).collect();
    assert_eq!(columns, expected);
}

#[test]
fn test_persisted_summary_keeps_order_and_nulls_undefined_ratios() {
    let dir = TempDir::new().unwrap();
    let (mut store, orchestrator) = loaded_store(&dir);
    create_vendor_summary(&mut store, &orchestrator).unwrap();

    let persisted = store
        .query_rows(
            "SELECT Brand, TotalPurchaseDollars, ProfitMargin FROM vendor_sales_summary ORDER BY rowid",
        )
        .unwrap();
    let brands: Vec<Value> = persisted.rows.iter().map(|r| r[0].clone()).collect();
    assert_eq!(
        brands,
        vec![Value::Integer(8412), Value::Integer(58), Value::Integer(62)]
    );
    assert_eq!(persisted.rows[2][2], Value::Null);
}

#[test]
fn test_missing_input_table_is_reported() {
    let store = Store::open_in_memory().unwrap();
    let err = build_summary(&store).unwrap_err();
    assert!(matches!(err, IngestError::TableNotFound(ref t) if t == "vendor_invoice"));
}

#[test]
fn test_missing_input_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let (mut store, orchestrator) = loaded_store(&dir);

    std::fs::write(dir.path().join("sales.csv"), "VendorNo,Brand,SalesQuantity\n105,58,1\n").unwrap();
    store.connection().execute("DROP TABLE sales", []).unwrap();
    let mut source =
        inventory_ingest::CsvBatchSource::open(dir.path().join("sales.csv"), 10).unwrap();
    orchestrator.ingest(&mut store, &mut source, "sales").unwrap();

    let err = build_summary(&store).unwrap_err();
    match err {
        IngestError::MissingColumn { source_id, column } => {
            assert_eq!(source_id, "sales");
            assert_eq!(column, "SalesDollars");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_null_vendor_key_is_kept_and_zero_filled() {
    let dir = TempDir::new().unwrap();
    common::write_inventory_fixtures(dir.path());
    edit_fixture(&dir, "purchases.csv", |body| {
        body + "5_HARDERSFIELD_58,5,58,Gekkeikan Black & Gold Sake,750mL,,ALTAMAR BRANDS LLC,10.0,2,20.0\n"
    });

    let mut store = Store::open(dir.path().join("inventory.db")).unwrap();
    let orchestrator = IngestionOrchestrator::with_options(IngestionOptions { batch_size: 2 });
    load_directory(&mut store, &orchestrator, dir.path()).unwrap();

    let rows = build_summary(&store).unwrap();
    assert_eq!(rows.len(), 4);
    let orphan = rows
        .iter()
        .find(|r| r.vendor_number == Value::Null)
        .unwrap();
    assert_eq!(orphan.total_purchase_dollars, Some(20.0));
    assert_eq!(orphan.total_sales_dollars, None);
    assert_eq!(orphan.freight_cost, None);

    let report = create_vendor_summary(&mut store, &orchestrator).unwrap();
    assert_eq!(report.rows, 4);
    let zero_keyed = store
        .query_rows("SELECT TotalPurchaseDollars FROM vendor_sales_summary WHERE VendorNumber = 0")
        .unwrap();
    assert_eq!(zero_keyed.rows, vec![vec![Value::Real(20.0)]]);
}

#[test]
fn test_text_vendor_codes_join_and_persist() {
    let dir = TempDir::new().unwrap();
    common::write_inventory_fixtures(dir.path());
    for name in ["purchases.csv", "sales.csv", "vendor_invoice.csv"] {
        edit_fixture(&dir, name, |body| {
            body.replace(",105,", ",V105,").replace("\n105,", "\nV105,")
        });
    }

    let mut store = Store::open(dir.path().join("inventory.db")).unwrap();
    let orchestrator = IngestionOrchestrator::with_options(IngestionOptions { batch_size: 2 });
    load_directory(&mut store, &orchestrator, dir.path()).unwrap();

    let rows = build_summary(&store).unwrap();
    assert_eq!(rows.len(), 3);
    let row = rows.iter().find(|r| r.brand == Value::Integer(58)).unwrap();
    assert_eq!(row.vendor_number, Value::Text("V105".to_string()));
    assert!((row.total_sales_dollars.unwrap() - 259.80).abs() < 1e-9);
    assert_eq!(row.freight_cost, Some(5.0));

    create_vendor_summary(&mut store, &orchestrator).unwrap();
    let columns = store.table_columns(VENDOR_SUMMARY_TABLE).unwrap();
    assert_eq!(columns[0].data_type, ColumnType::Text);
    assert_eq!(columns[2].data_type, ColumnType::Integer);
}

#[test]
fn test_input_names_match_case_insensitively() {
    let dir = TempDir::new().unwrap();
    common::write_inventory_fixtures(dir.path());
    edit_fixture(&dir, "vendor_invoice.csv", |body| body.replacen("Freight", "freight", 1));
    edit_fixture(&dir, "purchases.csv", |body| body.replacen("Description", "description", 1));
    fs::rename(dir.path().join("sales.csv"), dir.path().join("Sales.csv")).unwrap();

    let mut store = Store::open(dir.path().join("inventory.db")).unwrap();
    let orchestrator = IngestionOrchestrator::with_options(IngestionOptions { batch_size: 2 });
    load_directory(&mut store, &orchestrator, dir.path()).unwrap();
    assert!(store.exists("sales").unwrap());

    let rows = build_summary(&store).unwrap();
    assert_eq!(rows.len(), 3);
    let row = rows.iter().find(|r| r.brand == Value::Integer(58)).unwrap();
    assert_eq!(row.description, "Gekkeikan Black & Gold Sake");
    assert_eq!(row.freight_cost, Some(5.0));
    assert_eq!(row.total_sales_quantity, Some(20.0));
}
