//! Pipeline orchestrator

use super::types::{PipelineStage, RunSummary};
use crate::config::PipelineConfig;
use crate::dedup::{Deduplicator, GoldenTables};
use crate::error::{Error, Result, ResultExt};
use crate::ingest::RawIngestor;
use crate::normalize::{NormalizedOrderRecord, RecordNormalizer};
use crate::output::{GoldenWriter, OutputDestination, ParquetWriterConfig};
use crate::partition::{PartitionedWriter, WrittenPartition};
use crate::store::{ObjectStoreClient, RetryingClient, StoreClient};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{error, info};

/// Outcome of one concurrent write branch; a failure carries the stage it
/// happened in
pub(crate) type BranchResult<T> = std::result::Result<T, (PipelineStage, Error)>;

/// One batch run from raw objects to processed and golden tables
pub struct Pipeline {
    config: PipelineConfig,
    client: Arc<dyn ObjectStoreClient>,
    normalizer: RecordNormalizer,
    stage: Mutex<PipelineStage>,
}

impl Pipeline {
    /// Create a pipeline reading through `client`
    pub fn new(config: PipelineConfig, client: Arc<dyn ObjectStoreClient>) -> Self {
        let normalizer = RecordNormalizer::from_config(&config.normalize);
        Self {
            config,
            client,
            normalizer,
            stage: Mutex::new(PipelineStage::Idle),
        }
    }

    /// Create a pipeline with the configured store and retry policy
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let store = StoreClient::new(config.source.store.clone());
        let client = RetryingClient::new(store, config.source.retry.clone());
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Effective configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stage most recently entered, or the stage a failed run stopped in
    pub fn stage(&self) -> PipelineStage {
        *self.stage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, stage: PipelineStage) {
        *self.stage.lock().unwrap_or_else(PoisonError::into_inner) = stage;
        info!("Pipeline stage: {stage}");
    }

    fn fail_in(&self, stage: PipelineStage, err: Error) -> Error {
        *self.stage.lock().unwrap_or_else(PoisonError::into_inner) = stage;
        err
    }

    fn ingestor(&self) -> RawIngestor<Arc<dyn ObjectStoreClient>> {
        RawIngestor::new(
            Arc::clone(&self.client),
            &self.config.source.bucket,
            &self.config.source.prefix,
        )
        .with_fetch_concurrency(self.config.source.fetch_concurrency)
    }

    /// Keys a run would ingest, in ingestion order
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        self.ingestor().list_keys().await
    }

    /// Execute the run
    pub async fn run(&self) -> Result<RunSummary> {
        let started = Instant::now();
        match self.execute().await {
            Ok(mut summary) => {
                summary.elapsed_ms = started.elapsed().as_millis() as u64;
                self.enter(PipelineStage::Done);
                info!(
                    "Run complete in {}ms: {} records, {} partitions, {} fact rows",
                    summary.elapsed_ms, summary.records, summary.partitions, summary.fact_orders
                );
                Ok(summary)
            }
            Err(e) => {
                error!("Run failed during {}: {e}", self.stage());
                Err(e)
            }
        }
    }

    async fn execute(&self) -> Result<RunSummary> {
        let ingestor = self.ingestor();

        self.enter(PipelineStage::Listing);
        let keys = ingestor.list_keys().await?;

        self.enter(PipelineStage::Fetching);
        let objects = ingestor.fetch_all(keys).await?;
        let object_count = objects.len();

        self.enter(PipelineStage::Parsing);
        let records = ingestor.parse_all(objects)?;

        self.enter(PipelineStage::Normalizing);
        let batch = self.normalizer.normalize_all(records)?;

        self.enter(PipelineStage::Ready);
        let output = &self.config.output;
        let parquet = ParquetWriterConfig::from_output(output);
        let processed_root = OutputDestination::parse(&output.processed_path)
            .context("opening processed layer")?;
        let golden_root =
            OutputDestination::parse(&output.golden_path).context("opening golden layer")?;
        let partitioned = PartitionedWriter::new(processed_root, parquet.clone())
            .with_write_concurrency(output.write_concurrency);
        let golden_writer = GoldenWriter::new(golden_root, parquet);

        let (processed, golden) = tokio::join!(
            self.write_processed(&partitioned, &batch.records),
            self.write_golden(&golden_writer, &batch.records),
        );

        let (partitions, (tables, golden_files)) =
            settle(processed, golden).map_err(|(stage, e)| self.fail_in(stage, e))?;

        let mut files: Vec<String> = partitions.iter().map(|p| p.path.clone()).collect();
        files.extend(golden_files);

        Ok(RunSummary {
            objects: object_count,
            records: batch.records.len(),
            unparsed_timestamps: batch.unparsed_timestamps,
            partitions: partitions.len(),
            fact_orders: tables.fact_orders.len(),
            dim_customers: tables.dim_customers.len(),
            dim_products: tables.dim_products.len(),
            files,
            elapsed_ms: 0,
        })
    }

    async fn write_processed(
        &self,
        writer: &PartitionedWriter,
        records: &[NormalizedOrderRecord],
    ) -> BranchResult<Vec<WrittenPartition>> {
        self.enter(PipelineStage::WritingProcessed);
        writer
            .write(records)
            .await
            .map_err(|e| (PipelineStage::WritingProcessed, e))
    }

    async fn write_golden(
        &self,
        writer: &GoldenWriter,
        records: &[NormalizedOrderRecord],
    ) -> BranchResult<(GoldenTables, Vec<String>)> {
        self.enter(PipelineStage::Deduplicating);
        let tables = Deduplicator::new(self.normalizer.timestamps().clone()).build(records);
        info!(
            "Built golden tables: {} orders, {} customers, {} products",
            tables.fact_orders.len(),
            tables.dim_customers.len(),
            tables.dim_products.len()
        );

        self.enter(PipelineStage::WritingGolden);
        let files = writer
            .write(&tables)
            .await
            .map_err(|e| (PipelineStage::WritingGolden, e))?;
        Ok((tables, files))
    }
}

/// Combine both write branches; when both fail the processed failure is
/// returned and the golden one is logged
pub(crate) fn settle<P, G>(
    processed: BranchResult<P>,
    golden: BranchResult<G>,
) -> BranchResult<(P, G)> {
    match (processed, golden) {
        (Ok(processed), Ok(golden)) => Ok((processed, golden)),
        (Err(failure), Ok(_)) | (Ok(_), Err(failure)) => Err(failure),
        (Err(failure), Err((stage, golden))) => {
            error!("Golden layer also failed during {stage}: {golden}");
            Err(failure)
        }
    }
}
