use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use flowdoc_pdf::{FontRegistry, LayoutConfig, MM};

#[derive(Parser)]
#[command(name = "flowdoc-pdf")]
#[command(version)]
#[command(about = "Lay out markup text into a paginated PDF with running header and footer", long_about = None)]
struct Cli {
    /// Markup source file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output PDF (defaults to INPUT with a .pdf extension)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Running title, overrides a `= title` line in the source
    #[arg(long)]
    title: Option<String>,

    /// TrueType font for regular text
    #[arg(long, value_name = "TTF")]
    font_regular: Option<PathBuf>,

    /// TrueType font for bold text
    #[arg(long, value_name = "TTF")]
    font_bold: Option<PathBuf>,

    /// TrueType font for italic text
    #[arg(long, value_name = "TTF")]
    font_italic: Option<PathBuf>,

    /// Family name the custom fonts are registered under
    #[arg(long, default_value = "Custom")]
    family: String,

    /// Side and top margin in millimetres
    #[arg(long, value_name = "MM")]
    margin: Option<f32>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: Cli) -> flowdoc_pdf::Result<()> {
    let mut fonts = FontRegistry::new();
    let mut config = LayoutConfig::default();

    let custom = [
        (&cli.font_regular, false, false),
        (&cli.font_bold, true, false),
        (&cli.font_italic, false, true),
    ];
    let mut any_custom = false;
    for (path, bold, italic) in custom {
        if let Some(path) = path {
            fonts.register_ttf_file(&cli.family, bold, italic, path)?;
            any_custom = true;
        }
    }
    if any_custom {
        config.theme = config.theme.with_family(&cli.family);
    }

    if let Some(margin) = cli.margin {
        let bottom = config.geometry.break_margin;
        config = config.with_margins(margin * MM, margin * MM, bottom);
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("pdf"));

    if let Some(title) = cli.title {
        config = config.with_title(title);
    }

    flowdoc_pdf::convert_markup_to_pdf(&cli.input, &output, config, &fonts)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
