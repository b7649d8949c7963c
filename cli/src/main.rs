//! rezume CLI - resume markup conversion tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use rezume::convert::{convert, ConvertOptions, ConvertResult, OutputFormat};
use rezume::{JsonFormat, PageSize, RenderOptions, TranspileOptions};

#[derive(Parser)]
#[command(name = "rezume")]
#[command(author = "rezume contributors")]
#[command(version)]
#[command(about = "Convert resume markup to print-ready HTML, Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input markup file ("-" for standard input)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output HTML file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    layout: LayoutArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every conversion command.
#[derive(Args, Clone)]
struct LayoutArgs {
    /// Paper size of the HTML output
    #[arg(long, value_enum, env = "REZUME_PAGE_SIZE", default_value = "letter")]
    page_size: Paper,

    /// Drop malformed subheading entries instead of padding them
    #[arg(long)]
    strict: bool,

    /// Emit an HTML body fragment instead of a full document
    #[arg(long)]
    fragment: bool,

    /// Leave a section out of the output (repeatable, case-insensitive)
    #[arg(long, value_name = "TITLE")]
    skip_section: Vec<String>,
}

impl LayoutArgs {
    fn options(&self, format: OutputFormat) -> ConvertOptions {
        let mut transpile = TranspileOptions::new();
        if self.strict {
            transpile = transpile.strict();
        }

        let render = RenderOptions::new()
            .with_page_size(self.page_size.into())
            .with_standalone(!self.fragment);

        let mut options = ConvertOptions::new()
            .with_transpile_options(transpile)
            .with_render_options(render)
            .with_format(format);
        for title in &self.skip_section {
            options = options.skip_section(title.clone());
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markup to all formats (HTML, Markdown, text, JSON)
    Convert {
        /// Input markup file ("-" for standard input)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert markup to HTML
    Html {
        /// Input markup file ("-" for standard input)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert markup to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input markup file ("-" for standard input)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert markup to plain text
    Text {
        /// Input markup file ("-" for standard input)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert markup to the JSON content tree
    Json {
        /// Input markup file ("-" for standard input)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Report transpile warnings and content statistics
    Check {
        /// Input markup file ("-" for standard input)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Exit with an error when any warning is reported
        #[arg(long)]
        deny_warnings: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Drop malformed subheading entries instead of padding them
        #[arg(long)]
        strict: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Paper {
    /// US Letter (8.5in x 11in)
    Letter,
    /// ISO A4 (210mm x 297mm)
    A4,
}

impl From<Paper> for PageSize {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::Letter => PageSize::Letter,
            Paper::A4 => PageSize::A4,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            layout,
        }) => cmd_convert(&input, output.as_deref(), &layout),
        Some(Commands::Html {
            input,
            output,
            layout,
        }) => cmd_render(&input, output.as_deref(), layout.options(OutputFormat::Html)),
        Some(Commands::Markdown {
            input,
            output,
            layout,
        }) => cmd_render(
            &input,
            output.as_deref(),
            layout.options(OutputFormat::Markdown),
        ),
        Some(Commands::Text {
            input,
            output,
            layout,
        }) => cmd_render(&input, output.as_deref(), layout.options(OutputFormat::Text)),
        Some(Commands::Json {
            input,
            output,
            compact,
            layout,
        }) => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let options = layout.options(OutputFormat::Json).with_json_format(format);
            cmd_render(&input, output.as_deref(), options)
        }
        Some(Commands::Check {
            input,
            deny_warnings,
            json,
            strict,
        }) => cmd_check(&input, deny_warnings, json, strict),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: HTML to OUTPUT or stdout
            if let Some(input) = cli.input {
                cmd_render(
                    &input,
                    cli.output.as_deref(),
                    cli.layout.options(OutputFormat::Html),
                )
            } else {
                println!("{}", "Usage: rezume <FILE> [OUTPUT]".yellow());
                println!("       rezume --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read the whole input, from standard input when the path is `-`.
fn read_input(input: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let markup = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };
    log::debug!("read {} bytes from {}", markup.len(), input.display());
    Ok(markup)
}

/// Default output directory for `convert`: `<stem>_output`.
fn default_output_dir(input: &Path) -> PathBuf {
    if input == Path::new("-") {
        return PathBuf::from("resume_output");
    }
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}_output", stem))
}

fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{}: {}", "warning".yellow().bold(), warning);
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output_dir(input));

    fs::create_dir_all(&output_dir)?;

    let markup = read_input(input)?;

    let pb = ProgressBar::new(OutputFormat::ALL.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = Vec::with_capacity(OutputFormat::ALL.len());
    let mut warnings = Vec::new();
    for format in OutputFormat::ALL {
        pb.set_message(format!("Generating {}...", format.extension()));
        let result = convert(&markup, &layout.options(format))?;
        let filename = format!("resume.{}", format.extension());
        fs::write(output_dir.join(&filename), &result.content)?;
        written.push(filename);
        warnings = result.warnings;
        pb.inc(1);
    }

    pb.finish_with_message("Done!");
    print_warnings(&warnings);

    println!("\n{}", "Output files:".green().bold());
    for (i, filename) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), filename);
    }

    Ok(())
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    options: ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let markup = read_input(input)?;
    let result = convert(&markup, &options)?;
    print_warnings(&result.warnings);
    write_output(&result, output)
}

fn write_output(result: &ConvertResult, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, &result.content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", result.content);
    }
    Ok(())
}

fn cmd_check(
    input: &Path,
    deny_warnings: bool,
    json: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut transpile = TranspileOptions::new();
    if strict {
        transpile = transpile.strict();
    }
    let options = ConvertOptions::new()
        .with_transpile_options(transpile)
        .with_format(OutputFormat::Text)
        .with_stats(true);

    let markup = read_input(input)?;
    let result = convert(&markup, &options)?;
    let stats = result.stats.clone().unwrap_or_default();

    if json {
        let report = serde_json::json!({
            "file": input.display().to_string(),
            "warnings": result.warnings,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", "Resume Check".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());

        println!("{}: {}", "File".bold(), input.display());
        println!("{}: {}", "Sections".bold(), stats.section_count);
        println!("{}: {}", "Entries".bold(), stats.entry_count);
        println!(
            "{}: {} ({} items)",
            "Lists".bold(),
            stats.list_count,
            stats.list_item_count
        );
        println!("{}: {}", "Links".bold(), stats.link_count);
        println!("{}: {}", "Words".bold(), stats.word_count);

        println!();
        if !result.has_warnings() {
            println!("{}", "No warnings".green());
        } else {
            println!(
                "{} ({})",
                "Warnings".yellow().bold(),
                result.warnings.len()
            );
            for warning in &result.warnings {
                println!("  {} {}", "-".dimmed(), warning);
            }
        }
    }

    if deny_warnings && result.has_warnings() {
        return Err(format!("{} warning(s) reported", result.warnings.len()).into());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "rezume".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume markup conversion tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("cv/jane.tex")),
            PathBuf::from("jane_output")
        );
        assert_eq!(
            default_output_dir(Path::new("-")),
            PathBuf::from("resume_output")
        );
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.tex");
        fs::write(&path, r"\section{Skills}").unwrap();
        assert_eq!(read_input(&path).unwrap(), r"\section{Skills}");
    }

    #[test]
    fn test_layout_options() {
        let layout = LayoutArgs {
            page_size: Paper::A4,
            strict: true,
            fragment: true,
            skip_section: vec!["Hobbies".to_string()],
        };
        let options = layout.options(OutputFormat::Markdown);
        assert_eq!(options.output_format, OutputFormat::Markdown);
        assert_eq!(options.render.stylesheet.page_size, PageSize::A4);
        assert!(!options.render.standalone);
        assert_eq!(options.skip_sections, vec!["Hobbies".to_string()]);
        assert_eq!(
            options.transpile.malformed_entries,
            rezume::EntryPolicy::Drop
        );
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let result = convert(
            r"\section{Skills} Rust",
            &ConvertOptions::new().with_format(OutputFormat::Html),
        )
        .unwrap();
        write_output(&result, Some(&path)).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<h2 class=\"section-title\">Skills</h2>"));
    }
}
