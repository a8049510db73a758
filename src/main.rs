use clap::Parser;
use rmpdf::{convert_file, parse_layer_colors, ConvertError, ConvertOptions, FormatErrorPolicy};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert an annotated tablet bundle to a layered PDF.
#[derive(Parser, Debug)]
#[command(name = "rmpdf", version, about, long_about = None)]
struct Args {
    /// Log per-page progress
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Fail on unreadable stroke files instead of skipping their strokes
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Single-page PDF drawn behind pages without a background page
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Pen settings file, YAML (`.yaml`, `.yml`) or JSON
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Colour for the next layer; repeat per layer, "empty" to skip one
    #[arg(short = 'c', long = "colours")]
    colours: Vec<String>,

    /// Bundle path, `<dir>/<uuid>` (an extension is ignored) or a `.zip` archive
    input: PathBuf,

    /// Output PDF path
    output: PathBuf,
}

fn run(args: &Args) -> Result<(), ConvertError> {
    let mut options = ConvertOptions::new()
        .with_layer_colors(parse_layer_colors(&args.colours)?)
        .with_format_policy(if args.strict {
            FormatErrorPolicy::Abort
        } else {
            FormatErrorPolicy::SkipPage
        });
    options = match &args.template {
        Some(path) => options.with_template_file(path)?,
        None => options.with_builtin_template()?,
    };
    if let Some(path) = &args.settings {
        options = options.with_settings_file(path)?;
    }

    let report = convert_file(&args.input, &args.output, &options)?;
    if report.pages_skipped > 0 {
        log::warn!("{} page(s) drawn without strokes", report.pages_skipped);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let default_filter = if args.verbose { "rmpdf=debug" } else { "rmpdf=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("rmpdf: {}", e);
            ExitCode::FAILURE
        }
    }
}
