//! tokensheet CLI - export creature tokens ready to print

mod remote;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use tokensheet::layout::{mm_to_px, DEFAULT_MARGIN_MM, DEFAULT_TOKEN_SIZE_MM};
use tokensheet::render::{self, JsonFormat, RenderOptions};
use tokensheet::{
    build_sheet, GridGeometry, LayoutOptions, PageFormat, ResolveOptions, TokenResolver,
    DEFAULT_BOOK,
};

use crate::remote::BestiaryFetcher;

/// Resolution token images are downsampled to before embedding.
const PRINT_DPI: u32 = 300;

#[derive(Parser)]
#[command(name = "tokensheet")]
#[command(version)]
#[command(about = "Export creature tokens ready to print", long_about = None)]
struct Cli {
    /// Tokens to export: <book>/<creature>[:<times>] or <local-path>[:<times>].
    /// Example: MM/Goblin:6 local-token.png:2
    #[arg(long, required = true, num_args = 1.., value_name = "TOKENS")]
    tokens: Vec<String>,

    /// Paper format
    #[arg(long, value_enum, ignore_case = true, default_value = "A4")]
    format: FormatArg,

    /// The name of the generated tokens file
    #[arg(short, long, value_name = "OUTPUT", default_value = "tokens.pdf")]
    output: PathBuf,

    /// Print each creature's name under its token
    #[arg(long)]
    show_names: bool,

    /// Token library root, laid out as <DIR>/<BOOK>/<Creature>.webp
    #[arg(long, env = "TOKENSHEET_LIBRARY", value_name = "DIR")]
    library: Option<PathBuf>,

    /// Book used for creatures given without one
    #[arg(long, value_name = "BOOK", default_value = DEFAULT_BOOK)]
    default_book: String,

    /// Printed token size in millimeters
    #[arg(long, value_name = "MM", default_value_t = DEFAULT_TOKEN_SIZE_MM)]
    token_size: f32,

    /// Page margin in millimeters
    #[arg(long, value_name = "MM", default_value_t = DEFAULT_MARGIN_MM)]
    margin: f32,

    /// Never download tokens missing from the library
    #[arg(long)]
    offline: bool,

    /// Print the page layout as JSON instead of writing a PDF
    #[arg(long)]
    dry_run: bool,

    /// Output compact JSON with --dry-run
    #[arg(long, requires = "dry_run")]
    compact: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// 210 x 297 mm
    #[value(name = "A4")]
    A4,
    /// 297 x 420 mm
    #[value(name = "A3")]
    A3,
}

impl From<FormatArg> for PageFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::A4 => PageFormat::A4,
            FormatArg::A3 => PageFormat::A3,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let layout = LayoutOptions::new()
        .with_format(cli.format.into())
        .with_token_size(cli.token_size)
        .with_margin(cli.margin)
        .with_names(cli.show_names);

    // Fail on impossible geometry before touching any token.
    let geometry = GridGeometry::from_options(&layout)?;
    log::info!(
        "{} page holds {} x {} tokens",
        layout.format,
        geometry.columns,
        geometry.rows
    );

    let mut resolve_options = ResolveOptions::new()
        .with_default_book(cli.default_book)
        .with_max_image_px(mm_to_px(cli.token_size, PRINT_DPI));
    if let Some(dir) = cli.library {
        resolve_options = resolve_options.with_library(dir);
    }

    let mut resolver = TokenResolver::new(resolve_options);
    if !cli.offline {
        resolver = resolver.with_remote(Box::new(BestiaryFetcher::new()?));
    }

    let specs = cli
        .tokens
        .iter()
        .map(|entry| resolver.parse(entry))
        .collect::<Result<Vec<_>, _>>()?;

    let pb = ProgressBar::new(specs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut tokens = Vec::with_capacity(specs.len());
    for spec in &specs {
        pb.set_message(spec.source.to_string());
        match resolver.resolve(spec) {
            Ok(token) => tokens.push(token),
            Err(e) => {
                pb.abandon();
                return Err(e.into());
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let sheet = build_sheet(&tokens, &layout)?;

    if cli.dry_run {
        let format = if cli.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", render::to_json(&sheet, format)?);
        return Ok(());
    }

    println!("{} {}", "Generating".cyan(), cli.output.display());
    render::write_pdf(&sheet, &cli.output, &RenderOptions::default())?;

    println!(
        "{} {} token(s) on {} {} page(s), {} distinct image(s)",
        "Done!".green().bold(),
        sheet.token_count(),
        sheet.page_count(),
        sheet.format,
        resolver.cached_images()
    );

    Ok(())
}
