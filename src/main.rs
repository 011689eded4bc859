/*!
 * Interactive entry point for RepoDump
 */

use std::env;
use std::io::{self, BufRead, Write};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use repodump::config::{Config, OutputFormat};
use repodump::document::{render_dump, DocumentSink};
use repodump::docx::DocxWriter;
use repodump::error::Result;
use repodump::pdf::PdfWriter;
use repodump::report::{ReportFormat, Reporter, ScanReport};
use repodump::scanner::Scanner;
use repodump::utils::count_candidate_files;

fn main() -> Result<()> {
    println!("Select output format:");
    println!("1. Word Document (.docx)");
    println!("2. PDF Document (.pdf)");
    println!("3. Both");
    print!("\nEnter your choice (1/2/3): ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().lock().read_line(&mut choice)?;

    let Some(format) = OutputFormat::from_choice(&choice) else {
        println!("Invalid choice. Please run again and select 1, 2, or 3.");
        return Ok(());
    };

    // The scan root is always the working directory
    let config = Config::new(env::current_dir()?);
    config.validate()?;

    run(&config, format)
}

fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%)")
            .unwrap(),
    );
    progress.enable_steady_tick(std::time::Duration::from_millis(100));
    progress.set_prefix("📊 Scanning");
    progress.set_message(format!("📂 Scanning directory: {}", config.root_dir.display()));
    progress.set_length(count_candidate_files(&config.root_dir));

    let start_time = Instant::now();
    let scanner = Scanner::new(config.clone(), progress.clone());

    let tree_lines = scanner.generate_tree();
    let files = scanner.collect_contents();

    progress.set_prefix("📊 Rendering");
    let mut output_files = Vec::new();

    if format.wants_docx() {
        progress.set_message(format!("📄 Writing {}", config.docx_output.display()));
        let mut sink = DocxWriter::new()?;
        render_dump(&mut sink, config, &tree_lines, &files)?;
        sink.save(&config.docx_output)?;
        output_files.push(config.docx_output.display().to_string());
    }

    if format.wants_pdf() {
        progress.set_message(format!("📄 Writing {}", config.pdf_output.display()));
        let mut sink = PdfWriter::new();
        render_dump(&mut sink, config, &tree_lines, &files)?;
        sink.save(&config.pdf_output)?;
        output_files.push(config.pdf_output.display().to_string());
    }

    let duration = start_time.elapsed();
    progress.finish_and_clear();

    let report = ScanReport::from_entries(&files, output_files, duration);
    Reporter::new(ReportFormat::ConsoleTable).print_report(&report);

    Ok(())
}
