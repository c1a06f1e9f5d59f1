//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, RunArgs};
use crate::config::{PipelineConfig, StoreConfig};
use crate::error::Result;
use crate::pipeline::{Pipeline, RunSummary};
use serde::Serialize;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.effective_config()?;
        match &self.cli.command {
            Commands::Run => self.run_pipeline(config).await,
            Commands::List => self.list(config).await,
            Commands::Config => self.show_config(&config),
        }
    }

    /// Configuration file (or defaults) with command-line overrides applied
    pub fn effective_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                PipelineConfig::from_file(path)?
            }
            None => PipelineConfig::default(),
        };

        apply_overrides(&mut config, &self.cli.source);
        config.validate()?;
        Ok(config)
    }

    async fn run_pipeline(&self, config: PipelineConfig) -> Result<()> {
        let pipeline = Pipeline::from_config(config)?;
        let summary = pipeline.run().await?;

        match self.cli.format {
            OutputFormat::Json => self.emit(&summary),
            OutputFormat::Pretty => {
                print_summary(&summary);
                Ok(())
            }
        }
    }

    async fn list(&self, config: PipelineConfig) -> Result<()> {
        let pipeline = Pipeline::from_config(config)?;
        let keys = pipeline.list_keys().await?;

        match self.cli.format {
            OutputFormat::Json => self.emit(&keys),
            OutputFormat::Pretty => {
                for key in keys {
                    println!("{key}");
                }
                Ok(())
            }
        }
    }

    fn show_config(&self, config: &PipelineConfig) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => self.emit(config),
            OutputFormat::Pretty => {
                print!("{}", config.to_yaml()?);
                Ok(())
            }
        }
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

/// Apply command-line overrides on top of a loaded configuration
pub(crate) fn apply_overrides(config: &mut PipelineConfig, args: &RunArgs) {
    if let Some(bucket) = &args.bucket {
        config.source.bucket.clone_from(bucket);
    }
    if let Some(prefix) = &args.prefix {
        config.source.prefix.clone_from(prefix);
    }
    if let Some(root) = &args.local_source {
        config.source.store = StoreConfig::Local { root: root.clone() };
    }
    if let Some(url) = &args.endpoint {
        if matches!(config.source.store, StoreConfig::Local { .. }) {
            config.source.store = StoreConfig::default();
        }
        if let StoreConfig::S3 { endpoint, .. } = &mut config.source.store {
            *endpoint = Some(url.clone());
        }
    }
    if let Some(path) = &args.processed {
        config.output.processed_path.clone_from(path);
    }
    if let Some(path) = &args.golden {
        config.output.golden_path.clone_from(path);
    }
    if let Some(n) = args.fetch_concurrency {
        config.source.fetch_concurrency = n;
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Run complete in {}ms", summary.elapsed_ms);
    println!("  raw objects:         {}", summary.objects);
    println!("  records:             {}", summary.records);
    println!("  unparsed timestamps: {}", summary.unparsed_timestamps);
    println!("  partitions:          {}", summary.partitions);
    println!("  fact_orders:         {}", summary.fact_orders);
    println!("  dim_customers:       {}", summary.dim_customers);
    println!("  dim_products:        {}", summary.dim_products);
    for file in &summary.files {
        println!("  wrote {file}");
    }
}
