use impactmap::render::raster::{RasterError, RasterOptions, svg_to_png};
use impactmap::render::{HeadlessError, HeadlessRenderer, render_outline};
use impactmap::{ImpactMapConfig, Snapshot};
use impactmap_render::dedup::dedupe_outputs;
use serde::Serialize;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "IMPACTMAP_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Snapshot(impactmap::Error),
    Render(impactmap_render::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Snapshot(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<impactmap::Error> for CliError {
    fn from(value: impactmap::Error) -> Self {
        Self::Snapshot(value)
    }
}

impl From<impactmap_render::Error> for CliError {
    fn from(value: impactmap_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        match value {
            HeadlessError::Snapshot(err) => Self::Snapshot(err),
            HeadlessError::Render(err) => Self::Render(err),
        }
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Validate,
    Outline,
    Markdown,
    #[default]
    Scene,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    config: Option<String>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateOut<'a> {
    impact: &'a str,
    outcomes: usize,
    outputs: usize,
    unique_outputs: usize,
    shared_outputs: usize,
}

fn usage() -> &'static str {
    "impactmap-cli\n\
\n\
USAGE:\n\
  impactmap-cli validate [<path>|-]\n\
  impactmap-cli outline [<path>|-]\n\
  impactmap-cli markdown [--out <path>] [<path>|-]\n\
  impactmap-cli [scene] [--pretty] [--config <path>] [<path>|-]\n\
  impactmap-cli render [--format svg|png] [--scale <n>] [--background <css-color>] [--id <diagram-id>] [--config <path>] [--out <path>] [<path>|-]\n\
\n\
GLOBAL OPTIONS:\n\
  --verbose    log pipeline details to stderr (same as IMPACTMAP_LOG=debug)\n\
  --help, -h   print this message\n\
\n\
NOTES:\n\
  - Input is a snapshot JSON document: {\"impact\": {...}, \"outcomes\": [...]}.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --config takes a JSON document that is deep-merged over the default layout config.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to writing next to the input file (or ./out.png for stdin).\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "validate" => args.command = Command::Validate,
            "outline" => args.command = Command::Outline,
            "markdown" => args.command = Command::Markdown,
            "scene" => args.command = Command::Scene,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_config(path: Option<&str>) -> Result<ImpactMapConfig, CliError> {
    match path {
        None => Ok(ImpactMapConfig::defaults()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let cfg = ImpactMapConfig::from_json_overrides(&text)?;
            tracing::debug!(path, "loaded config overrides");
            Ok(cfg)
        }
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> std::path::PathBuf {
    match input {
        Some(path) if path != "-" => std::path::PathBuf::from(path).with_extension(ext),
        _ => std::path::PathBuf::from(format!("out.{ext}")),
    }
}

fn validate_summary(snapshot: &Snapshot) -> ValidateOut<'_> {
    let unique = dedupe_outputs(&snapshot.outcomes);
    ValidateOut {
        impact: &snapshot.impact.statement,
        outcomes: snapshot.outcomes.len(),
        outputs: snapshot.total_output_count(),
        unique_outputs: unique.len(),
        shared_outputs: unique.iter().filter(|u| u.is_shared()).count(),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let snapshot = Snapshot::from_json_str(&text)?;
    tracing::debug!(
        outcomes = snapshot.outcomes.len(),
        outputs = snapshot.total_output_count(),
        "loaded snapshot"
    );

    match args.command {
        Command::Validate => {
            write_json(&validate_summary(&snapshot), args.pretty)?;
            Ok(())
        }
        Command::Outline => write_text(&render_outline(&snapshot), None),
        Command::Markdown => {
            write_text(&impactmap::export::to_markdown(&snapshot), args.out.as_deref())
        }
        Command::Scene => {
            let config = load_config(args.config.as_deref())?;
            let renderer = HeadlessRenderer::new().with_config(&config)?;
            write_json(&renderer.scene(&snapshot), args.pretty)
        }
        Command::Render => {
            let config = load_config(args.config.as_deref())?;
            let mut renderer = HeadlessRenderer::new().with_config(&config)?;
            if let Some(id) = args.diagram_id.as_deref() {
                renderer = renderer.with_diagram_id(id);
            }
            if let Some(bg) = args.background.as_deref() {
                renderer = renderer.with_background(bg);
            }
            let svg = renderer.render_svg(&snapshot);

            match args.render_format {
                RenderFormat::Svg => write_text(&svg, args.out.as_deref()),
                RenderFormat::Png => {
                    let bytes = svg_to_png(
                        &svg,
                        &RasterOptions {
                            scale: args.render_scale,
                            background: args.background.clone(),
                        },
                    )?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    if out == "-" {
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(&out, bytes)?;
                        tracing::debug!(out = %out, "wrote png");
                    }
                    Ok(())
                }
            }
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing(args.verbose);

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
