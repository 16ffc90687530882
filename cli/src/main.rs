//! pagemark CLI - paginated document layout tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;

use pagemark::detect::read_input;
use pagemark::output::commit;
use pagemark::parser::segment_with_options;
use pagemark::{
    render_batch, EmitOptions, FontFileMeasurer, JsonFormat, OutputFormat, PageSelection,
    PaginatedDocument, RenderConfig, RenderOptions, Renderer,
};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pagemark")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Lay out markdown-style text as paginated PDF, JSON, and text", long_about = None)]
struct Cli {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF (defaults to the input name with a .pdf extension)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Layout flags shared by every rendering command.
#[derive(Args, Clone, Default)]
struct LayoutArgs {
    /// JSON layout configuration (geometry and styles)
    #[arg(long, value_name = "FILE", env = "PAGEMARK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Vertical advance per line, in points
    #[arg(long, global = true)]
    leading: Option<f32>,

    /// Left, top, and bottom margin, in points
    #[arg(long, global = true)]
    margin: Option<f32>,

    /// Measure a family with a font file (e.g., "Helvetica=./Arial.ttf")
    #[arg(long, value_name = "FAMILY=PATH", global = true)]
    font: Vec<String>,

    /// Fail on unterminated code fences
    #[arg(long, global = true)]
    strict: bool,

    /// Apply Unicode NFC normalization to the input
    #[arg(long, global = true)]
    normalize: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render to PDF
    Pdf {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to the input name with a .pdf extension)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Document title stored in the PDF metadata
        #[arg(long)]
        title: Option<String>,
    },

    /// Render to paginated JSON
    Json {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Render to plain text, pages separated by form feeds
    Text {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Dump segmented blocks as JSON
    Blocks {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show layout statistics and warnings
    Info {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Render many files in parallel
    Batch {
        /// Input text files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (next to each input if not specified)
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "pdf")]
        format: FormatArg,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// PDF document
    Pdf,
    /// Paginated JSON
    Json,
    /// Plain text
    Text,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Text => OutputFormat::Text,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let layout = cli.layout;

    let result = match cli.command {
        Some(Commands::Pdf {
            input,
            output,
            pages,
            title,
        }) => cmd_pdf(&input, output.as_deref(), pages.as_deref(), title, &layout),
        Some(Commands::Json {
            input,
            output,
            pages,
            compact,
        }) => cmd_json(&input, output.as_deref(), pages.as_deref(), compact, &layout),
        Some(Commands::Text {
            input,
            output,
            pages,
        }) => cmd_text(&input, output.as_deref(), pages.as_deref(), &layout),
        Some(Commands::Blocks { input, compact }) => cmd_blocks(&input, compact, &layout),
        Some(Commands::Info { input }) => cmd_info(&input, &layout),
        Some(Commands::Batch {
            inputs,
            out_dir,
            format,
        }) => cmd_batch(&inputs, out_dir.as_deref(), format.into(), &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: render to PDF if input is provided
            if let Some(input) = cli.input {
                cmd_pdf(&input, cli.output.as_deref(), None, None, &layout)
            } else {
                println!("{}", "Usage: pagemark <FILE> [OUTPUT]".yellow());
                println!("       pagemark --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Build render options from the config file and flag overrides.
fn build_options(layout: &LayoutArgs) -> CliResult<RenderOptions> {
    let mut options = RenderOptions::new();

    if let Some(path) = &layout.config {
        debug!("loading config {}", path.display());
        options = options.with_config(RenderConfig::from_file(path)?);
    }

    let mut geometry = options.geometry;
    if let Some(margin) = layout.margin {
        geometry = geometry.with_margins(margin);
    }
    if let Some(leading) = layout.leading {
        geometry = geometry.with_leading(leading);
    }
    options = options.with_geometry(geometry);

    if !layout.font.is_empty() {
        let mut measurer = FontFileMeasurer::new();
        for spec in &layout.font {
            let (family, path) = parse_font_arg(spec)?;
            measurer.load(family, path)?;
        }
        options = options.with_measurer(measurer);
    }

    if layout.strict {
        options = options.strict();
    }
    if layout.normalize {
        let parse = options.parse.clone().with_normalization(true);
        options = options.with_parse_options(parse);
    }

    Ok(options)
}

fn parse_font_arg(spec: &str) -> CliResult<(&str, &Path)> {
    match spec.split_once('=') {
        Some((family, path)) if !family.trim().is_empty() && !path.trim().is_empty() => {
            Ok((family.trim(), Path::new(path.trim())))
        }
        _ => Err(format!("Invalid --font '{}': expected FAMILY=PATH", spec).into()),
    }
}

fn parse_pages(pages: Option<&str>) -> CliResult<PageSelection> {
    Ok(match pages {
        Some(p) => PageSelection::parse(p)?,
        None => PageSelection::All,
    })
}

fn render_input(input: &Path, options: &RenderOptions) -> CliResult<PaginatedDocument> {
    let raw = read_input(input)?;
    let doc = Renderer::new(options.clone()).render(&raw)?;
    print_warnings(input, &doc);
    Ok(doc)
}

fn print_warnings(input: &Path, doc: &PaginatedDocument) {
    for warning in &doc.warnings {
        eprintln!("{} {}: {}", "warning:".yellow().bold(), input.display(), warning);
    }
}

fn emit(
    format: OutputFormat,
    doc: &PaginatedDocument,
    options: &EmitOptions,
) -> CliResult<Vec<u8>> {
    Ok(format.emitter().emit(doc, options)?)
}

fn write_or_print(output: Option<&Path>, bytes: &[u8]) -> CliResult {
    if let Some(path) = output {
        let written = commit(path, bytes)?;
        println!("{} {}", "Saved to".green(), written.display());
    } else {
        println!("{}", String::from_utf8_lossy(bytes));
    }
    Ok(())
}

fn cmd_pdf(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    title: Option<String>,
    layout: &LayoutArgs,
) -> CliResult {
    let options = build_options(layout)?;
    let doc = render_input(input, &options)?;

    let mut emit_options = EmitOptions::new()
        .with_pages(parse_pages(pages)?)
        .with_styles(options.styles.clone());
    if let Some(title) = title {
        emit_options = emit_options.with_title(title);
    }

    let bytes = emit(OutputFormat::Pdf, &doc, &emit_options)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.with_extension("pdf"));
    let written = commit(&output, &bytes)?;

    println!(
        "{} {} ({} pages)",
        "Saved to".green(),
        written.display(),
        doc.page_count()
    );
    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    compact: bool,
    layout: &LayoutArgs,
) -> CliResult {
    let options = build_options(layout)?;
    let doc = render_input(input, &options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let emit_options = EmitOptions::new()
        .with_pages(parse_pages(pages)?)
        .with_json_format(format);

    let bytes = emit(OutputFormat::Json, &doc, &emit_options)?;
    write_or_print(output, &bytes)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    layout: &LayoutArgs,
) -> CliResult {
    let options = build_options(layout)?;
    let doc = render_input(input, &options)?;

    let emit_options = EmitOptions::new().with_pages(parse_pages(pages)?);
    let bytes = emit(OutputFormat::Text, &doc, &emit_options)?;
    write_or_print(output, &bytes)
}

fn cmd_blocks(input: &Path, compact: bool, layout: &LayoutArgs) -> CliResult {
    let options = build_options(layout)?;
    let raw = read_input(input)?;
    let segmentation = segment_with_options(&raw, &options.parse)?;

    let json = if compact {
        serde_json::to_string(&segmentation)?
    } else {
        serde_json::to_string_pretty(&segmentation)?
    };
    println!("{}", json);
    Ok(())
}

fn cmd_info(input: &Path, layout: &LayoutArgs) -> CliResult {
    let options = build_options(layout)?;
    let doc = render_input(input, &options)?;
    let geometry = &doc.geometry;
    let stats = &doc.stats;

    println!("{}", "Layout".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!(
        "{}: {} x {} pt",
        "Page size".bold(),
        geometry.width,
        geometry.height
    );
    println!(
        "{}: left {}, top {}, bottom {}",
        "Margins".bold(),
        geometry.left_margin,
        geometry.top_margin,
        geometry.bottom_margin
    );
    println!(
        "{}: {} pt ({} lines per page)",
        "Leading".bold(),
        geometry.leading,
        geometry.lines_per_page()
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pages".bold(), stats.page_count);
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_block_count);
    println!("{}: {}", "Spacers".bold(), stats.spacer_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    if stats.overflow_token_count > 0 {
        println!(
            "{}: {}",
            "Overflowing words".bold(),
            stats.overflow_token_count.to_string().yellow()
        );
    }
    println!(
        "{}: {}",
        "Warnings".bold(),
        if doc.warnings.is_empty() {
            "none".green()
        } else {
            doc.warnings.len().to_string().yellow()
        }
    );

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    out_dir: Option<&Path>,
    format: OutputFormat,
    layout: &LayoutArgs,
) -> CliResult {
    let options = build_options(layout)?;
    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading...");
    let mut sources = Vec::with_capacity(inputs.len());
    for input in inputs {
        sources.push(read_input(input)?);
    }

    pb.set_message("Rendering...");
    let results = render_batch(&sources, &options);

    let emit_options = EmitOptions::new().with_styles(options.styles.clone());
    let mut failures = 0;
    for (input, result) in inputs.iter().zip(results) {
        pb.set_message(input.display().to_string());
        let outcome = result
            .map_err(Into::into)
            .and_then(|doc| {
                print_warnings(input, &doc);
                emit(format, &doc, &emit_options)
            })
            .and_then(|bytes| {
                let target = batch_target(input, out_dir, format);
                Ok(commit(&target, &bytes)?)
            });

        match outcome {
            Ok(written) => pb.println(format!("{} {}", "Saved".green(), written.display())),
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, inputs.len()).into());
    }
    Ok(())
}

fn batch_target(input: &Path, out_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let target = input.with_extension(format.extension());
    match (out_dir, target.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => target,
    }
}

fn cmd_version() {
    println!("{} {}", "pagemark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Paginated document layout tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pagemark".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_font_arg() {
        let (family, path) = parse_font_arg("Helvetica = fonts/Arial.ttf").unwrap();
        assert_eq!(family, "Helvetica");
        assert_eq!(path, Path::new("fonts/Arial.ttf"));
        assert!(parse_font_arg("Helvetica").is_err());
        assert!(parse_font_arg("=x.ttf").is_err());
    }

    #[test]
    fn test_build_options_overrides() {
        let layout = LayoutArgs {
            leading: Some(12.0),
            margin: Some(36.0),
            strict: true,
            ..Default::default()
        };
        let options = build_options(&layout).unwrap();
        assert_eq!(options.geometry.leading, 12.0);
        assert_eq!(options.geometry.left_margin, 36.0);
        assert_eq!(options.geometry.bottom_margin, 36.0);
        assert_eq!(options.parse.error_mode, pagemark::ErrorMode::Strict);
    }

    #[test]
    fn test_build_options_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(
            &path,
            r#"{"geometry": {"width": 400, "height": 600, "left_margin": 20,
                "top_margin": 20, "bottom_margin": 20, "leading": 10}}"#,
        )
        .unwrap();

        let layout = LayoutArgs {
            config: Some(path),
            leading: Some(16.0),
            ..Default::default()
        };
        let options = build_options(&layout).unwrap();
        assert_eq!(options.geometry.width, 400.0);
        assert_eq!(options.geometry.leading, 16.0);
    }

    #[test]
    fn test_batch_target() {
        assert_eq!(
            batch_target(Path::new("docs/a.md"), None, OutputFormat::Pdf),
            PathBuf::from("docs/a.pdf")
        );
        assert_eq!(
            batch_target(Path::new("docs/a.md"), Some(Path::new("out")), OutputFormat::Text),
            PathBuf::from("out/a.txt")
        );
    }

    #[test]
    fn test_cli_parses_default_form() {
        let cli = Cli::try_parse_from(["pagemark", "notes.md", "out.pdf", "--leading", "12"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("notes.md")));
        assert_eq!(cli.output, Some(PathBuf::from("out.pdf")));
        assert_eq!(cli.layout.leading, Some(12.0));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parses_subcommand_flags() {
        let cli = Cli::try_parse_from([
            "pagemark", "json", "notes.md", "--compact", "--pages", "1-2", "--strict",
        ])
        .unwrap();
        assert!(cli.layout.strict);
        assert!(matches!(
            cli.command,
            Some(Commands::Json { compact: true, .. })
        ));
    }
}
