//! sortsim Driver Binary
//!
//! Builds a simulated node and reports the simulated time of sort steps.

use clap::{Args, Parser, Subcommand};
use sortsim::datagen::DuplicateGenerator;
use sortsim::{verify_file, Config, LinearScanSort, Node};
use tracing_subscriber::{fmt, EnvFilter};

/// sortsim
#[derive(Parser, Debug)]
#[command(name = "sortsim")]
#[command(about = "Simulated storage node for sort benchmarks")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    node: NodeArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct NodeArgs {
    /// Disk block size in bytes
    #[arg(long, default_value = "4096", global = true)]
    block_size: u64,

    /// Simulated disk operations per second
    #[arg(long, default_value = "100", global = true)]
    iops: u32,

    /// Record key size in bytes
    #[arg(long, default_value = "10", global = true)]
    key_size: usize,

    /// Record value size in bytes
    #[arg(long, default_value = "90", global = true)]
    value_size: usize,

    /// Buffer cache capacity in blocks
    #[arg(short, long, default_value = "16", global = true)]
    cache_blocks: usize,

    /// Number of records in the data file
    #[arg(short, long, default_value = "1000", global = true)]
    records: u64,

    /// Number of distinct keys, cycling through the file (0 = all distinct)
    #[arg(short, long, default_value = "0", global = true)]
    duplicates: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run sort steps and print their simulated cost
    Run {
        /// Number of records to produce (0 = all)
        #[arg(short, long, default_value = "1")]
        steps: u64,
    },

    /// Check that chunked and whole-file reads agree in bytes and disk misses
    Verify,
}

impl NodeArgs {
    fn config(&self) -> Config {
        Config::builder()
            .block_size(self.block_size)
            .iops(self.iops)
            .key_size(self.key_size)
            .value_size(self.value_size)
            .cache_capacity(self.cache_blocks)
            .records(self.records)
            .build()
    }

    fn open_node(&self) -> sortsim::Result<Node> {
        let config = self.config();
        if self.duplicates == 0 {
            return Node::new(config);
        }
        let generator = DuplicateGenerator::new(config.record_size(), self.duplicates);
        Node::with_generator(config, Box::new(generator))
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sortsim=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    tracing::info!("sortsim v{}", sortsim::VERSION);

    let node = match cli.node.open_node() {
        Ok(node) => node,
        Err(e) => {
            tracing::error!("Failed to create node: {}", e);
            std::process::exit(1);
        }
    };

    let ok = match cli.command {
        Commands::Run { steps } => run(node, steps),
        Commands::Verify => verify(node),
    };

    if !ok {
        std::process::exit(1);
    }
}

fn run(node: Node, steps: u64) -> bool {
    let mut sort = LinearScanSort::startup(node);
    let limit = (steps > 0).then_some(steps);

    let metrics = match sort.run(limit) {
        Ok(metrics) => metrics,
        Err(e) => {
            tracing::error!("Sort step failed: {}", e);
            return false;
        }
    };

    println!("Startup Cost:\t\t{:?}", metrics.startup);
    if let Some(first) = metrics.first_record {
        println!("NextRecord Cost:\t{:?}", first);
    }
    for i in 1..metrics.steps.len() {
        if let Some(cost) = metrics.step_cost(i) {
            println!("Step {:>6}:\t\t{:?} (+{:?})", i + 1, metrics.steps[i], cost);
        }
    }
    if let Some(all) = metrics.all_records {
        println!("AllRecords Cost:\t{:?}", all);
    }

    let stats = sort.node().cache().stats();
    println!(
        "Cache:\t\t\t{} hits, {} misses, {} evictions",
        stats.hits, stats.misses, stats.evictions
    );
    true
}

fn verify(node: Node) -> bool {
    let file = node.open_file();
    let report = verify_file(&node, &file);

    println!(
        "Whole read:\t\tcrc32={:08x} len={} misses={}",
        report.whole.crc32, report.whole.len, report.whole_misses
    );
    println!(
        "Chunked read:\t\tcrc32={:08x} len={} misses={} (expected {})",
        report.chunked.crc32, report.chunked.len, report.chunked_misses, report.expected_misses
    );
    println!("Simulated time:\t\t{:?}", node.get_time());

    if !report.streams_match() {
        tracing::error!("File streams differ");
        return false;
    }
    if !report.misses_match() {
        tracing::error!(
            "Re-read took {} disk misses, expected {}",
            report.chunked_misses,
            report.expected_misses
        );
        return false;
    }

    println!("OK");
    true
}
