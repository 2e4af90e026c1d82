use crate::config::{Config, load_config};
use crate::ir::ExpansionState;
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_process_description;
use crate::randomizer::{Assignment, BlockRandomizer};
use crate::render::{write_output_png, write_output_svg};
use crate::session::RenderSession;
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use rand::Rng;
use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pflow", version, about = "Process-flow diagram renderer and block randomizer")]
pub struct Args {
    /// Config JSON file (theme, themeVariables, layout, render, randomizer)
    #[arg(short = 'c', long = "configFile", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a process description to SVG or PNG
    Render(RenderArgs),
    /// Assign the next participant to a treatment arm
    Assign(AssignArgs),
}

#[derive(ClapArgs, Debug)]
pub struct RenderArgs {
    /// Input file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Step id to render expanded (repeatable)
    #[arg(short = 'x', long = "expand")]
    pub expand: Vec<String>,

    /// JSON file mapping estimation block ids to minimum zone heights
    #[arg(long = "zone-heights")]
    pub zone_heights_file: Option<PathBuf>,

    /// Minimum zone height as BLOCK=PX (repeatable, overrides --zone-heights)
    #[arg(short = 'z', long = "zone-height", value_parser = parse_zone_height)]
    pub zone_heights: Vec<(String, f32)>,

    /// Write the computed layout as JSON to this path
    #[arg(long = "dump")]
    pub dump_layout: Option<PathBuf>,

    /// PNG width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// PNG height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ClapArgs, Debug)]
pub struct AssignArgs {
    /// Assignment log, one JSON record per line
    #[arg(short = 'l', long = "log")]
    pub log: PathBuf,

    /// Treatment arm labels, overriding the config file
    #[arg(long = "arms", value_delimiter = ',')]
    pub arms: Option<Vec<String>>,

    /// Append the new assignment to the log
    #[arg(short = 'a', long = "append")]
    pub append: bool,

    /// Seed the shuffle for reproducible runs
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Number of participants to assign in this run
    #[arg(short = 'n', long = "count", default_value_t = 1)]
    pub count: usize,

    /// Keep running and assign one participant per line read from stdin
    #[arg(long = "serve", conflicts_with = "count")]
    pub serve: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    let config = load_config(args.config.as_deref())?;
    match args.command {
        Command::Render(render) => run_render(render, config),
        Command::Assign(assign) => run_assign(assign, config),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run_render(args: RenderArgs, mut config: Config) -> Result<()> {
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let description = parse_process_description(&input)?;
    let mut session = RenderSession::new(description, config.theme.clone(), config.layout.clone());
    session.set_expansion(args.expand.iter().collect::<ExpansionState>());
    let mut heights = match args.zone_heights_file.as_deref() {
        Some(path) => read_zone_heights(path)?,
        None => BTreeMap::new(),
    };
    heights.extend(args.zone_heights);
    session.set_card_heights(heights);

    if let Some(path) = args.dump_layout.as_deref() {
        let layout = session.layout();
        write_layout_dump(path, &layout, session.zones())?;
    }

    let svg = session.svg();
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref()),
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_output_png(&svg, &output, &config.render, &config.theme)
        }
    }
}

fn run_assign(args: AssignArgs, config: Config) -> Result<()> {
    let arms = match args.arms {
        Some(arms) => <[String; 2]>::try_from(arms)
            .map_err(|arms| anyhow::anyhow!("Expected exactly two arms, got {}", arms.len()))?,
        None => config.randomizer.arms,
    };
    let mut log = read_assignment_log(&args.log)?;
    let mut randomizer = match args.seed {
        Some(seed) => BlockRandomizer::seeded(arms, seed),
        None => BlockRandomizer::new(arms),
    };
    let append = args.append.then_some(args.log.as_path());

    if args.serve {
        let stdin = io::stdin();
        return serve_assignments(&mut randomizer, &mut log, stdin.lock(), io::stdout(), append);
    }

    let records = assign_many(&mut randomizer, &mut log, args.count);
    if let Some(path) = append {
        append_records(path, &records)?;
    }
    for record in &records {
        println!("{}", record.label);
    }
    Ok(())
}

/// Assigns `count` participants with one randomizer. Blocks started here are
/// handed out from the cached shuffle; only a block left open by an earlier
/// process goes through the count-balancing fallback.
fn assign_many<R: Rng>(
    randomizer: &mut BlockRandomizer<R>,
    log: &mut Vec<Assignment>,
    count: usize,
) -> Vec<Assignment> {
    let start = log.len();
    for _ in 0..count {
        let label = randomizer.assign(log);
        log.push(Assignment::new(label));
    }
    log[start..].to_vec()
}

/// One assignment per non-empty request line, answered on `out` and
/// optionally appended to the log file as it happens.
fn serve_assignments<R: Rng>(
    randomizer: &mut BlockRandomizer<R>,
    log: &mut Vec<Assignment>,
    requests: impl BufRead,
    mut out: impl Write,
    append: Option<&Path>,
) -> Result<()> {
    for line in requests.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let records = assign_many(randomizer, log, 1);
        if let Some(path) = append {
            append_records(path, &records)?;
        }
        for record in &records {
            tracing::debug!(request = line.trim(), label = %record.label, "assigned");
            writeln!(out, "{}", record.label)?;
        }
        out.flush()?;
    }
    Ok(())
}

fn append_records(path: &Path, records: &[Assignment]) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    for record in records {
        writeln!(file, "{}", serde_json::to_string(record)?)?;
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// A missing log is an empty study.
fn read_assignment_log(path: &Path) -> Result<Vec<Assignment>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(std::fs::File::open(path)?);
    parse_assignment_lines(reader)
}

fn parse_assignment_lines(reader: impl BufRead) -> Result<Vec<Assignment>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Assignment = serde_json::from_str(&line)
            .with_context(|| format!("Invalid assignment record on line {}", idx + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn read_zone_heights(path: &Path) -> Result<BTreeMap<String, f32>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid zone heights in {}", path.display()))
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn parse_zone_height(raw: &str) -> std::result::Result<(String, f32), String> {
    let (block, height) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected BLOCK=PX, got `{raw}`"))?;
    let height = height
        .trim()
        .trim_end_matches("px")
        .parse::<f32>()
        .map_err(|err| format!("invalid height in `{raw}`: {err}"))?;
    Ok((block.trim().to_string(), height))
}
