use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use spreadpress::{
    ComposeOptions, PaperTexture, PolicyValidator, PostProcessor, QualityChecker, ResolvedConfig,
    SpreadOrchestrator, ValidationReport,
};

const DEFAULT_CONFIG: &str = "config/master_config.yaml";

#[derive(Parser, Debug)]
#[command(name = "spreadpress", version, about = "Compose 1996-style print spreads")]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a layout into a finished spread image.
    Compose(ComposeArgs),
    /// Check a prompt, image asset or layout against the style policy.
    Validate(ValidateArgs),
    /// Apply the print-artifact passes to existing images.
    Postprocess(PostprocessArgs),
    /// Score a finished spread.
    Qa(QaArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Layout YAML (or JSON).
    layout: PathBuf,

    /// Output image path (`.png`, `.jpg`).
    output: PathBuf,

    /// Master configuration YAML.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Skip misregistration, dot gain and vignette.
    #[arg(long, default_value_t = false)]
    no_artifacts: bool,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("subject").required(true).args(["prompt", "image", "layout"])))]
struct ValidateArgs {
    /// Prompt text file.
    #[arg(long)]
    prompt: Option<PathBuf>,

    /// Image asset.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Layout YAML.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Master configuration YAML.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct PostprocessArgs {
    /// Single input image.
    #[arg(long, requires = "output", conflicts_with = "input_dir")]
    input: Option<PathBuf>,

    /// Single output image.
    #[arg(long, requires = "input")]
    output: Option<PathBuf>,

    /// Directory of input images (png/jpg/jpeg).
    #[arg(long, requires = "output_dir")]
    input_dir: Option<PathBuf>,

    /// Directory for processed images.
    #[arg(long, requires = "input_dir")]
    output_dir: Option<PathBuf>,

    /// Paper texture image blended before the print passes (default: generated grain).
    #[arg(long, conflicts_with = "no_texture")]
    texture: Option<PathBuf>,

    /// Skip the paper-texture pass.
    #[arg(long, default_value_t = false)]
    no_texture: bool,

    /// Override rayon worker threads (directory mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Master configuration YAML.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
}

#[derive(Parser, Debug)]
struct QaArgs {
    /// Spread image to score.
    image: PathBuf,

    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Master configuration YAML.
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Postprocess(args) => cmd_postprocess(args),
        Command::Qa(args) => cmd_qa(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> anyhow::Result<ResolvedConfig> {
    ResolvedConfig::load(path).with_context(|| format!("load config '{}'", path.display()))
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(&args.config)?;
    let opts = ComposeOptions {
        apply_artifacts: !args.no_artifacts,
        ..ComposeOptions::default()
    };
    let mut orchestrator = SpreadOrchestrator::new(config);
    let spread = orchestrator
        .compose_to_file(&args.layout, &args.output, opts)
        .with_context(|| format!("compose '{}'", args.layout.display()))?;

    let moved = spread
        .placements
        .iter()
        .filter(|p| p.placement.adjusted)
        .count();
    println!(
        "wrote {} ({} elements, {} moved off the spine)",
        args.output.display(),
        spread.placements.len(),
        moved
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(&args.config)?;
    let validator = PolicyValidator::new(&config);

    let report = if let Some(path) = args.prompt {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read prompt '{}'", path.display()))?;
        ValidationReport {
            subject: path.display().to_string(),
            violations: validator.validate_prompt(&text),
        }
    } else if let Some(path) = args.image {
        ValidationReport {
            subject: path.display().to_string(),
            violations: validator.validate_image(&path),
        }
    } else if let Some(path) = args.layout {
        ValidationReport {
            subject: path.display().to_string(),
            violations: validator.validate_layout_file(&path),
        }
    } else {
        anyhow::bail!("one of --prompt, --image or --layout is required");
    };

    if report.passed() {
        println!("PASSED: {}", report.subject);
        return Ok(ExitCode::SUCCESS);
    }
    println!(
        "FAILED: {} ({} violations)",
        report.subject,
        report.violations.len()
    );
    for v in &report.violations {
        println!("  - {v}");
    }
    Ok(ExitCode::FAILURE)
}

fn cmd_postprocess(args: PostprocessArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(&args.config)?;
    let texture = if args.no_texture {
        None
    } else {
        let texture = PaperTexture::from_config(&config);
        Some(match args.texture {
            Some(path) => texture.with_texture(path),
            None => texture,
        })
    };
    let processor = PostProcessor::from_config(&config).with_paper_texture(texture);

    match (args.input, args.output, args.input_dir, args.output_dir) {
        (Some(input), Some(output), None, None) => {
            spreadpress::postprocess_file(&processor, &input, &output)
                .with_context(|| format!("post-process '{}'", input.display()))?;
            println!("wrote {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        (None, None, Some(input_dir), Some(output_dir)) => {
            let report = spreadpress::postprocess_batch(
                &processor,
                &input_dir,
                &output_dir,
                args.threads,
            )?;
            println!(
                "processed {}/{} images into {}",
                report.succeeded(),
                report.items.len(),
                output_dir.display()
            );
            for item in report.failures() {
                if let Err(e) = &item.result {
                    eprintln!("  failed: {}: {e}", item.input.display());
                }
            }
            if report.failures().next().is_some() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => anyhow::bail!("use either --input/--output or --input-dir/--output-dir"),
    }
}

fn cmd_qa(args: QaArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(&args.config)?;
    let report = QualityChecker::new(&config)
        .report_file(&args.image)
        .with_context(|| format!("qa '{}'", args.image.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("QA report: {}", report.image);
        println!("score: {:.2}/1.00", report.score);
        println!(
            "status: {}",
            if report.overall_passed { "PASSED" } else { "FAILED" }
        );
        for check in &report.checks {
            let mark = if check.passed { "ok" } else { "FAIL" };
            println!("  [{mark}] {}: {}", check.name, check.message);
        }
    }

    Ok(if report.overall_passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
