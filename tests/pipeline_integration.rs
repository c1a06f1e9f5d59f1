//! Integration tests against a local-filesystem object store
//!
//! Tests the full end-to-end flow: raw JSON extracts → processed partitions
//! and golden tables as Parquet

use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use order_lakehouse::config::{PipelineConfig, RetryConfig, StoreConfig};
use order_lakehouse::{ErrorKind, Pipeline};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch workspace: a raw bucket plus processed and golden roots
struct Lake {
    dir: TempDir,
}

impl Lake {
    fn new() -> Self {
        let lake = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        fs::create_dir_all(lake.raw().join("full")).unwrap();
        lake
    }

    fn raw(&self) -> PathBuf {
        self.dir.path().join("store").join("raw")
    }

    fn processed(&self) -> PathBuf {
        self.dir.path().join("processed")
    }

    fn golden(&self) -> PathBuf {
        self.dir.path().join("golden")
    }

    fn put(&self, key: &str, body: &Value) {
        let path = self.raw().join(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body.to_string()).unwrap();
    }

    fn config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.source.store = StoreConfig::Local {
            root: self.dir.path().join("store"),
        };
        config.source.retry = RetryConfig::disabled();
        config.output.processed_path = self.processed().to_string_lossy().into_owned();
        config.output.golden_path = self.golden().to_string_lossy().into_owned();
        config
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::from_config(self.config()).unwrap()
    }
}

fn order(order_id: &str, customer_id: &str, product_id: &str, updated_at: &str) -> Value {
    json!({
        "order_id": order_id,
        "customer_id": customer_id,
        "product_id": product_id,
        "product_name": "Wireless Mouse",
        "category": "Electronics",
        "qty": 2,
        "price": 19.99,
        "status": "DELIVERED",
        "created_at": "2025-11-15T09:30:00",
        "updated_at": updated_at,
    })
}

fn extract(records: Vec<Value>) -> Value {
    json!({"status": "ok", "mode": "full", "count": records.len(), "data": records})
}

fn read_table(path: &Path) -> RecordBatch {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
    arrow::compute::concat_batches(&batches[0].schema(), &batches).unwrap()
}

fn strings(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let column = batch
        .column_by_name(name)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    (0..column.len())
        .map(|i| (!column.is_null(i)).then(|| column.value(i).to_string()))
        .collect()
}

/// Relative path → contents of every file under `root`
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
                out.insert(rel, fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_distinct_orders_produce_three_rows_each() {
    let lake = Lake::new();
    lake.put(
        "full/orders.json",
        &extract(vec![
            order("O-1001", "C-001", "P-100", "2025-11-15T10:00:00"),
            order("O-1002", "C-002", "P-200", "2025-11-15T11:00:00"),
            order("O-1003", "C-003", "P-300", "2025-11-15T12:00:00"),
        ]),
    );

    let summary = lake.pipeline().run().await.unwrap();
    assert_eq!(summary.fact_orders, 3);

    let facts = read_table(&lake.golden().join("fact_orders.parquet"));
    assert_eq!(facts.num_rows(), 3);
    let customers = read_table(&lake.golden().join("dim_customers.parquet"));
    assert_eq!(
        strings(&customers, "customer_id"),
        vec![
            Some("C-001".to_string()),
            Some("C-002".to_string()),
            Some("C-003".to_string())
        ]
    );
    let products = read_table(&lake.golden().join("dim_products.parquet"));
    assert_eq!(products.num_rows(), 3);

    let partition = lake
        .processed()
        .join("order_date=2025-11-15")
        .join("part-00000.parquet");
    let processed = read_table(&partition);
    assert_eq!(processed.num_rows(), 3);

    let qty = processed
        .column_by_name("qty")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    let price = processed
        .column_by_name("price")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    let total = processed
        .column_by_name("total_price")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    for i in 0..processed.num_rows() {
        assert_eq!(total.value(i), qty.value(i) as f64 * price.value(i));
    }
}

#[tokio::test]
async fn test_later_update_wins_across_objects() {
    let lake = Lake::new();
    let mut early = order("O-1001", "C-001", "P-100", "2025-11-15T12:00:00");
    early["status"] = json!("PLACED");
    let mut late = order("O-1001", "C-001", "P-100", "2025-11-16T08:00:00");
    late["status"] = json!("SHIPPED");

    // Later update sorts first so arrival order alone would pick the wrong one
    lake.put("full/a-late.json", &extract(vec![late]));
    lake.put("full/b-early.json", &extract(vec![early]));

    lake.pipeline().run().await.unwrap();

    let facts = read_table(&lake.golden().join("fact_orders.parquet"));
    assert_eq!(facts.num_rows(), 1);
    assert_eq!(strings(&facts, "status"), vec![Some("SHIPPED".to_string())]);

    // The processed layer keeps both versions
    let processed = read_table(
        &lake
            .processed()
            .join("order_date=2025-11-15")
            .join("part-00000.parquet"),
    );
    assert_eq!(processed.num_rows(), 2);
}

#[tokio::test]
async fn test_empty_listing_fails_without_output() {
    let lake = Lake::new();

    let err = lake.pipeline().run().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
    assert!(!lake.processed().exists());
    assert!(!lake.golden().exists());
}

#[tokio::test]
async fn test_non_numeric_price_fails_without_output() {
    let lake = Lake::new();
    let mut bad = order("O-1002", "C-002", "P-200", "2025-11-15T11:00:00");
    bad["price"] = json!("nineteen");
    lake.put(
        "full/orders.json",
        &extract(vec![
            order("O-1001", "C-001", "P-100", "2025-11-15T10:00:00"),
            bad,
        ]),
    );

    let err = lake.pipeline().run().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cast);
    assert!(err.to_string().contains("O-1002"));
    assert!(!lake.processed().exists());
    assert!(!lake.golden().exists());
}

#[tokio::test]
async fn test_malformed_object_poisons_run() {
    let lake = Lake::new();
    lake.put(
        "full/good.json",
        &extract(vec![order("O-1001", "C-001", "P-100", "2025-11-15T10:00:00")]),
    );
    fs::write(lake.raw().join("full/bad.json"), b"{not json").unwrap();

    let err = lake.pipeline().run().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(err.to_string().contains("full/bad.json"));
    assert!(!lake.golden().exists());
}

#[tokio::test]
async fn test_missing_bucket_is_connectivity_error() {
    let lake = Lake::new();
    let mut config = lake.config();
    config.source.bucket = "no-such-bucket".to_string();

    let err = Pipeline::from_config(config)
        .unwrap()
        .run()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connectivity);
}

// ============================================================================
// Processed Layer
// ============================================================================

#[tokio::test]
async fn test_unparsable_timestamps_share_sentinel_partition() {
    let lake = Lake::new();
    let mut a = order("O-1", "C-1", "P-1", "2025-11-15T10:00:00");
    a["created_at"] = json!("15/11/2025");
    let mut b = order("O-2", "C-1", "P-1", "2025-11-15T10:00:00");
    b["created_at"] = json!(null);
    let c = order("O-3", "C-1", "P-1", "2025-11-15T10:00:00");
    lake.put("full/orders.json", &extract(vec![a, b, c]));

    let summary = lake.pipeline().run().await.unwrap();
    assert_eq!(summary.unparsed_timestamps, 2);
    assert_eq!(summary.partitions, 2);

    let sentinel = read_table(
        &lake
            .processed()
            .join("order_date=__HIVE_DEFAULT_PARTITION__")
            .join("part-00000.parquet"),
    );
    assert_eq!(
        strings(&sentinel, "order_id"),
        vec![Some("O-1".to_string()), Some("O-2".to_string())]
    );
    assert_eq!(strings(&sentinel, "order_date"), vec![None, None]);
    assert_eq!(sentinel.column_by_name("order_ts").unwrap().null_count(), 2);

    // Records without a date still reach the golden layer
    let facts = read_table(&lake.golden().join("fact_orders.parquet"));
    assert_eq!(facts.num_rows(), 3);
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let lake = Lake::new();
    lake.put(
        "full/day1.json",
        &extract(vec![
            order("O-1", "C-1", "P-1", "2025-11-15T10:00:00"),
            order("O-2", "C-2", "P-1", "2025-11-15T10:00:00"),
        ]),
    );
    let mut next_day = order("O-3", "C-1", "P-2", "2025-11-16T10:00:00");
    next_day["created_at"] = json!("2025-11-16T07:45:00");
    lake.put("full/day2.json", &extract(vec![next_day]));

    lake.pipeline().run().await.unwrap();
    let processed = snapshot(&lake.processed());
    let golden = snapshot(&lake.golden());

    lake.pipeline().run().await.unwrap();
    assert_eq!(snapshot(&lake.processed()), processed);
    assert_eq!(snapshot(&lake.golden()), golden);

    let files: Vec<&str> = processed.keys().map(String::as_str).collect();
    assert_eq!(
        files,
        vec![
            "order_date=2025-11-15/part-00000.parquet",
            "order_date=2025-11-16/part-00000.parquet"
        ]
    );
}

#[tokio::test]
async fn test_rerun_drops_stale_partitions() {
    let lake = Lake::new();
    let mut old = order("O-1", "C-1", "P-1", "2025-11-15T10:00:00");
    old["created_at"] = json!("2025-11-01T00:00:00");
    lake.put("full/orders.json", &extract(vec![old]));
    lake.pipeline().run().await.unwrap();
    assert!(lake.processed().join("order_date=2025-11-01").exists());

    lake.put(
        "full/orders.json",
        &extract(vec![order("O-1", "C-1", "P-1", "2025-11-15T10:00:00")]),
    );
    lake.pipeline().run().await.unwrap();

    assert!(!lake.processed().join("order_date=2025-11-01").exists());
    assert!(lake.processed().join("order_date=2025-11-15").exists());
}

// ============================================================================
// Golden Layer
// ============================================================================

#[tokio::test]
async fn test_golden_failure_fails_run() {
    let lake = Lake::new();
    lake.put(
        "full/orders.json",
        &extract(vec![order("O-1", "C-1", "P-1", "2025-11-15T10:00:00")]),
    );

    let blocker = lake.golden().join("fact_orders.parquet");
    fs::create_dir_all(&blocker).unwrap();
    fs::write(blocker.join("occupied"), b"x").unwrap();

    let err = lake.pipeline().run().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Write);
    assert!(err.to_string().contains("fact_orders"));

    // Sibling writes are not rolled back, but the run still reports failure
    assert!(lake.golden().join("dim_customers.parquet").is_file());
    assert!(lake.golden().join("dim_products.parquet").is_file());
}

#[tokio::test]
async fn test_overlapping_output_roots_are_rejected() {
    let lake = Lake::new();
    lake.put(
        "full/orders.json",
        &extract(vec![order("O-1", "C-1", "P-1", "2025-11-15T10:00:00")]),
    );

    let out = lake.dir.path().join("out");
    let out = out.to_string_lossy();
    for (processed, golden) in [
        (out.to_string(), format!("{out}/")),
        (out.to_string(), format!("{out}/golden")),
        (format!("{out}/processed"), out.to_string()),
    ] {
        let mut config = lake.config();
        config.output.processed_path = processed;
        config.output.golden_path = golden;

        let err = Pipeline::from_config(config).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
    assert!(!lake.dir.path().join("out").exists());
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_partial_name_prefix_selects_matching_objects() {
    let lake = Lake::new();
    lake.put(
        "full/orders_2025.json",
        &extract(vec![order("O-1", "C-1", "P-1", "2025-11-15T10:00:00")]),
    );
    lake.put(
        "full/returns_2025.json",
        &extract(vec![order("R-1", "C-2", "P-2", "2025-11-15T10:00:00")]),
    );

    let mut config = lake.config();
    config.source.prefix = "full/orders_".to_string();
    let pipeline = Pipeline::from_config(config).unwrap();

    assert_eq!(pipeline.list_keys().await.unwrap(), vec!["full/orders_2025.json"]);
    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.objects, 1);

    let facts = read_table(&lake.golden().join("fact_orders.parquet"));
    assert_eq!(strings(&facts, "order_id"), vec![Some("O-1".to_string())]);
}
