//! sempdf CLI - convert PDFs to semantic, SEO-annotated HTML.

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sempdf::convert::single_output_path;
use sempdf::{collect_inputs, convert_batch, convert_file, ConvertOptions, DocMeta};

#[derive(Parser)]
#[command(name = "sempdf")]
#[command(version)]
#[command(about = "Convert PDFs to semantic HTML with SEO-friendly markup", long_about = None)]
struct Cli {
    /// PDF file or directory containing PDFs
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory or HTML file
    #[arg(long, default_value = "out", value_name = "PATH")]
    out: PathBuf,

    /// Force batch mode for directories
    #[arg(long)]
    batch: bool,

    /// Search PDF files recursively
    #[arg(long)]
    recursive: bool,

    /// Skip image extraction
    #[arg(long)]
    no_images: bool,

    /// Skip generating a table of contents
    #[arg(long)]
    no_toc: bool,

    /// Keep original PDF TOC pages in the body
    #[arg(long)]
    keep_toc_pages: bool,

    /// Schema.org type (e.g., ScholarlyArticle, Report)
    #[arg(long, default_value = "ScholarlyArticle", value_name = "TYPE")]
    schema_type: String,

    /// Override document title
    #[arg(long)]
    title: Option<String>,

    /// Override author
    #[arg(long)]
    author: Option<String>,

    /// Override publication date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,

    /// Language code (e.g., en, sk)
    #[arg(long)]
    lang: Option<String>,

    /// Publisher / organization
    #[arg(long)]
    publisher: Option<String>,

    /// Short description / abstract
    #[arg(long)]
    description: Option<String>,

    /// Comma-separated keywords
    #[arg(long)]
    keywords: Option<String>,

    /// Path to JSON metadata overrides
    #[arg(long, value_name = "FILE")]
    metadata: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> DocMeta {
        DocMeta {
            title: self.title.clone(),
            author: self.author.clone(),
            date: self.date.clone(),
            lang: self.lang.clone(),
            publisher: self.publisher.clone(),
            description: self.description.clone(),
            keywords: self
                .keywords
                .as_deref()
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            source: None,
        }
    }

    fn options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new()
            .with_images(!self.no_images)
            .with_toc(!self.no_toc)
            .with_kept_toc_pages(self.keep_toc_pages)
            .with_schema_type(&self.schema_type)
            .with_overrides(self.overrides());
        if let Some(path) = &self.metadata {
            options = options.with_metadata_file(path);
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.options();
    let inputs = collect_inputs(&cli.input, cli.recursive);
    log::debug!("found {} input document(s)", inputs.len());
    if inputs.is_empty() {
        return Err(sempdf::Error::NoInputs.into());
    }

    let batch_mode = cli.batch || cli.input.is_dir();
    if !batch_mode {
        let input = &inputs[0];
        let output = single_output_path(input, &cli.out);
        let result = convert_file(input, &output, &options)?;
        println!(
            "{} {} -> {} ({} pages, {} figures)",
            "Converted:".green().bold(),
            input.display(),
            result.output.display(),
            result.pages,
            result.figures.len(),
        );
        return Ok(());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let outcomes = convert_batch(&inputs, &cli.out, &options, |outcome| {
        pb.inc(1);
        if let Some(name) = outcome.input.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
    })?;
    pb.finish_and_clear();

    let mut failures = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => println!(
                "{} {} -> {}",
                "Converted:".green().bold(),
                outcome.input.display(),
                result.output.display(),
            ),
            Err(e) => {
                failures += 1;
                eprintln!(
                    "{} {}: {}",
                    "Failed:".red().bold(),
                    outcome.input.display(),
                    e,
                );
            }
        }
    }

    println!(
        "{} {} converted, {} failed (output: {})",
        "Done:".bold(),
        outcomes.len() - failures,
        failures,
        cli.out.display(),
    );
    if failures == outcomes.len() {
        return Err(format!("all {} documents failed", failures).into());
    }
    Ok(())
}
