use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

use envelope_extractor::{logging, run, write_document, AverageMode, EnvelopeConfig, TimeFormat};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Fichier WAV ; demandé sur l'entrée standard s'il est absent
    #[arg()]
    file_path: Option<PathBuf>,
    #[arg(long, default_value = "foo.png")]
    image: PathBuf,
    #[arg(long, default_value = "data.json")]
    output: PathBuf,
    #[arg(long, default_value_t = 30.0)]
    time_scale: f64,
    #[arg(long, value_enum, default_value_t = AverageMode::ColumnBudget)]
    average_mode: AverageMode,
    #[arg(long, value_enum, default_value_t = TimeFormat::Text)]
    time_format: TimeFormat,
    #[arg(short, long)]
    verbose: bool,
}

fn prompt_file_path() -> Result<PathBuf> {
    print!("Name of file (or path if not in same dir): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("Lecture du chemin sur l'entrée standard")?;
    let path = line.trim();
    if path.is_empty() {
        bail!("Aucun fichier indiqué");
    }
    Ok(PathBuf::from(path))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    let file_path = match args.file_path {
        Some(path) => path,
        None => prompt_file_path()?,
    };

    // 1. Créer la configuration à partir des arguments
    let mut config = EnvelopeConfig::new(file_path);
    config.image_path = args.image;
    config.output_path = args.output;
    config.time_scale = args.time_scale;
    config.average_mode = args.average_mode;
    config.time_format = args.time_format;

    // 2. Appeler la bibliothèque
    let analysis = run(&config).context("Extraction de l'enveloppe")?;
    println!("{}", analysis.metadata.duration_seconds);

    // 3. Écrire le document JSON
    write_document(&analysis.document, &config.output_path)
        .with_context(|| format!("Écriture de {:?}", config.output_path))?;
    info!("{} timecodes écrits dans {:?}", analysis.document.timecodes.len(), config.output_path);

    Ok(())
}
