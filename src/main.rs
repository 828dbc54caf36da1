mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use feed_sim::classifier::{parse_targets, HttpClassifier, ImageClassifier};
use feed_sim::{
    format_float, format_percent, AnalysisRequest, EngagementCounts, FeedPipeline, ImageAnalysis,
    PostAnalyzer, PostCandidate, SimConfig, SimError,
};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feed-sim", about = "Feed ranking pipeline simulator and post analyzer")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a post through sourcing, filtering, scoring and visibility.
    Simulate(SimulateArgs),
    /// Score a post with text heuristics and optional image checks.
    Analyze(AnalyzeArgs),
    Serve(ServeArgs),
    /// Write the default configuration as TOML.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    media: bool,
    #[arg(long)]
    premium: bool,
    #[arg(long, default_value_t = 500)]
    followers: u64,
    #[arg(long, default_value_t = 10)]
    likes: u64,
    #[arg(long, default_value_t = 0)]
    replies: u64,
    #[arg(long, default_value_t = 0)]
    reposts: u64,
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    image: Option<PathBuf>,
    /// Comma-separated keywords the image should show.
    #[arg(long)]
    targets: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long)]
    web_root: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/feed-sim.toml")]
    path: PathBuf,
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), SimError> {
    let cli = Cli::parse();

    if let Command::InitConfig(args) = &cli.command {
        return init_config(args);
    }

    let (config, _) = SimConfig::load(cli.config)?;

    match cli.command {
        Command::Simulate(args) => run_simulate(args, &config),
        Command::Analyze(args) => run_analyze(args, &config).await,
        Command::Serve(args) => {
            let pipeline = FeedPipeline::new(&config);
            let analyzer = PostAnalyzer::new(&config, build_classifier(&config));
            server::serve(args, pipeline, analyzer).await
        }
        Command::InitConfig(_) => Ok(()),
    }
}

fn run_simulate(args: SimulateArgs, config: &SimConfig) -> Result<(), SimError> {
    let text = read_text(args.text)?;
    let post = PostCandidate::new(text, args.media, args.premium, args.followers);
    let engagement = EngagementCounts::new(args.likes, args.replies, args.reposts);

    let pipeline = FeedPipeline::new(config);
    let report = pipeline.run(&post, &engagement)?;

    let source = report.sourcing.payload;
    println!(
        "Step 1: Candidate sources [{}]",
        if source.is_global() { "GLOBAL CANDIDATE" } else { "LOCAL CANDIDATE" }
    );
    println!("  {}", source.label());
    print_log(&report.sourcing.log);

    println!("Step 2: Filtering [{}]", report.filtering.status.label());
    print_log(&report.filtering.log);

    if report.is_dropped() {
        println!("\nThe post was discarded at the filtering stage. Revise it and try again.");
        return Ok(());
    }

    if let Some(scoring) = &report.scoring {
        println!(
            "Step 3: Scoring [total {}]",
            format_float(scoring.payload.final_score, 1)
        );
        print_log(&scoring.log);
    }

    if let Some(visibility) = &report.visibility {
        println!("Step 4: Visibility [{}]", visibility.status.label());
        print_log(&visibility.log);
    }

    Ok(())
}

async fn run_analyze(args: AnalyzeArgs, config: &SimConfig) -> Result<(), SimError> {
    let image = match args.image.as_ref() {
        Some(path) => Some(std::fs::read(path).map_err(|err| {
            SimError::InvalidInput(format!("failed reading image {}: {}", path.display(), err))
        })?),
        None => None,
    };

    let request = AnalysisRequest {
        text: args.text.unwrap_or_default(),
        image,
        targets: args.targets.as_deref().map(parse_targets).unwrap_or_default(),
    };

    let analyzer = PostAnalyzer::new(config, build_classifier(config));
    let report = analyzer.analyze(&request).await?;

    println!(
        "Virality score: {} ({})",
        format_float(report.score, 1),
        report.tier.label()
    );
    for adjustment in &report.adjustments {
        let sign = if adjustment.points >= 0.0 { "+" } else { "" };
        println!(
            "  {}{} {}",
            sign,
            format_float(adjustment.points, 0),
            adjustment.label
        );
    }

    match &report.image {
        ImageAnalysis::NotProvided => {}
        ImageAnalysis::Skipped { reason } => println!("Image analysis skipped: {}", reason),
        ImageAnalysis::Analyzed { safety, target } => {
            println!(
                "Image safety: {} (unsafe {} vs safe {})",
                if safety.is_unsafe { "UNSAFE" } else { "ok" },
                format_percent(safety.unsafe_probability),
                format_percent(safety.safe_probability)
            );
            if let Some(found) = target {
                println!(
                    "Best target: {} ({})",
                    found.target,
                    format_percent(found.probability)
                );
            }
        }
    }

    Ok(())
}

fn build_classifier(config: &SimConfig) -> Option<Arc<dyn ImageClassifier>> {
    match HttpClassifier::from_config(&config.classifier) {
        Ok(Some(client)) => Some(Arc::new(client) as Arc<dyn ImageClassifier>),
        Ok(None) => None,
        Err(err) => {
            warn!(error = %err, "image classifier disabled");
            None
        }
    }
}

fn init_config(args: &InitConfigArgs) -> Result<(), SimError> {
    if args.path.exists() && !args.force {
        return Err(SimError::Config(format!(
            "{} already exists; pass --force to overwrite",
            args.path.display()
        )));
    }
    SimConfig::default().write(&args.path)?;
    println!("Wrote {}", args.path.display());
    Ok(())
}

fn print_log(lines: &[String]) {
    for line in lines {
        println!("  - {}", line);
    }
}

fn read_text(arg: Option<String>) -> Result<String, SimError> {
    if let Some(text) = arg {
        if !text.trim().is_empty() {
            return Ok(text);
        }
        return Err(SimError::MissingText);
    }

    if io::stdin().is_terminal() {
        return Err(SimError::MissingText);
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| SimError::InvalidInput(format!("failed reading stdin: {}", err)))?;
    if buffer.trim().is_empty() {
        return Err(SimError::MissingText);
    }
    Ok(buffer)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feed_sim=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
