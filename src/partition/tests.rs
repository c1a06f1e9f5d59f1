//! Tests for partition module

use super::*;
use crate::error::ErrorKind;
use crate::ingest::OrderRecord;
use crate::normalize::{NormalizedOrderRecord, RecordNormalizer};
use crate::output::{OutputDestination, ParquetWriterConfig};
use arrow::array::{Array, StringArray};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::json;
use std::fs::File;
use std::path::Path;
use tempfile::tempdir;

fn normalized(order_id: &str, created_at: Option<&str>) -> NormalizedOrderRecord {
    RecordNormalizer::default()
        .normalize(OrderRecord {
            order_id: order_id.to_string(),
            customer_id: "C-1".to_string(),
            product_id: "P-1".to_string(),
            product_name: None,
            category: None,
            qty: json!(1),
            price: json!(2.0),
            status: None,
            created_at: created_at.map(String::from),
            updated_at: None,
        })
        .unwrap()
}

fn sample() -> Vec<NormalizedOrderRecord> {
    vec![
        normalized("O-1", Some("2025-11-16T08:00:00")),
        normalized("O-2", Some("2025-11-15T10:00:00")),
        normalized("O-3", Some("not a timestamp")),
        normalized("O-4", Some("2025-11-15T23:59:59")),
        normalized("O-5", None),
    ]
}

fn writer(root: &Path) -> PartitionedWriter {
    let destination = OutputDestination::parse(root.to_str().unwrap()).unwrap();
    PartitionedWriter::new(destination, ParquetWriterConfig::default()).with_write_concurrency(2)
}

fn read_order_ids(path: &Path) -> Vec<String> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let mut ids = Vec::new();
    for batch in reader {
        let batch = batch.unwrap();
        let column = batch
            .column_by_name("order_id")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        ids.extend((0..column.len()).map(|i| column.value(i).to_string()));
    }
    ids
}

// ============================================================================
// Partition Key Tests
// ============================================================================

#[test]
fn test_partition_key_dir_name() {
    let key = PartitionKey::from_order_date(Some("2025-11-15"));
    assert_eq!(key.dir_name(), "order_date=2025-11-15");
    assert_eq!(key.file_path(), "order_date=2025-11-15/part-00000.parquet");
    assert_eq!(key.to_string(), "2025-11-15");

    let unknown = PartitionKey::from_order_date(None);
    assert_eq!(unknown, PartitionKey::Unknown);
    assert_eq!(unknown.dir_name(), "order_date=__HIVE_DEFAULT_PARTITION__");
}

#[test]
fn test_partition_key_ordering() {
    let mut keys = vec![
        PartitionKey::Unknown,
        PartitionKey::Date("2025-11-16".to_string()),
        PartitionKey::Date("2025-11-15".to_string()),
    ];
    keys.sort();
    assert_eq!(
        keys,
        vec![
            PartitionKey::Date("2025-11-15".to_string()),
            PartitionKey::Date("2025-11-16".to_string()),
            PartitionKey::Unknown,
        ]
    );
}

#[test]
fn test_partition_records_groups_by_date() {
    let records = sample();
    let partitions = partition_records(&records);

    assert_eq!(partitions.len(), 3);
    let day = &partitions[&PartitionKey::Date("2025-11-15".to_string())];
    let ids: Vec<&str> = day.iter().map(|r| r.order_id.as_str()).collect();
    assert_eq!(ids, vec!["O-2", "O-4"]);

    let unknown = &partitions[&PartitionKey::Unknown];
    assert_eq!(unknown.len(), 2);
    assert!(unknown.iter().all(|r| r.order_date.is_none()));
}

#[test]
fn test_partition_records_empty() {
    assert!(partition_records(&[]).is_empty());
}

// ============================================================================
// Writer Tests
// ============================================================================

#[tokio::test]
async fn test_write_one_file_per_partition() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("processed");

    let written = writer(&root).write(&sample()).await.unwrap();
    let keys: Vec<String> = written.iter().map(|w| w.key.to_string()).collect();
    assert_eq!(keys, vec!["2025-11-15", "2025-11-16", DEFAULT_PARTITION]);
    assert_eq!(written.iter().map(|w| w.rows).sum::<usize>(), 5);

    for partition in &written {
        let dir = root.join(partition.key.dir_name());
        let files: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
        assert_eq!(files.len(), 1);
        assert!(dir.join(PARTITION_FILE).is_file());
    }

    let sentinel = root
        .join(PartitionKey::Unknown.dir_name())
        .join(PARTITION_FILE);
    assert_eq!(read_order_ids(&sentinel), vec!["O-3", "O-5"]);
}

#[tokio::test]
async fn test_sentinel_partition_keeps_null_order_date() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("processed");
    writer(&root).write(&sample()).await.unwrap();

    let path = root
        .join(PartitionKey::Unknown.dir_name())
        .join(PARTITION_FILE);
    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    for batch in reader {
        let batch = batch.unwrap();
        let dates = batch.column_by_name(PARTITION_COLUMN).unwrap();
        assert_eq!(dates.null_count(), batch.num_rows());
        let ts = batch.column_by_name("order_ts").unwrap();
        assert_eq!(ts.null_count(), batch.num_rows());
    }
}

#[tokio::test]
async fn test_write_replaces_previous_layer() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("processed");
    let writer = writer(&root);

    writer.write(&sample()).await.unwrap();
    std::fs::write(root.join("stray.txt"), b"old").unwrap();

    let later = vec![normalized("O-9", Some("2025-12-01T00:00:00"))];
    writer.write(&later).await.unwrap();

    let entries: Vec<String> = std::fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["order_date=2025-12-01"]);
}

#[tokio::test]
async fn test_write_is_byte_identical_across_runs() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("processed");
    let writer = writer(&root);
    let path = root.join("order_date=2025-11-15").join(PARTITION_FILE);

    writer.write(&sample()).await.unwrap();
    let first = std::fs::read(&path).unwrap();
    writer.write(&sample()).await.unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_write_failure_is_write_error() {
    let temp_dir = tempdir().unwrap();
    let root = temp_dir.path().join("processed");
    let writer = writer(&root);

    // Replace the root with a file so the clear step cannot recreate it
    std::fs::remove_dir_all(&root).unwrap();
    std::fs::write(&root, b"not a directory").unwrap();

    let err = writer.write(&sample()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Write);
}
