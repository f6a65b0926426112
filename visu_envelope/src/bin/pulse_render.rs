use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use envelope_extractor::logging;
use envelope_extractor::pulse::{load_timings, FrameSequencer, PulseConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Rend les timecodes d'amplitude en une séquence d'images", long_about = None)]
struct Args {
    #[arg(long, default_value = "properties.json")]
    config: PathBuf,
    /// Remplace `data_path` du fichier de propriétés
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long, default_value = "renders")]
    out_dir: PathBuf,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    let config = PulseConfig::load(&args.config)
        .with_context(|| format!("Chargement des propriétés {:?}", args.config))?;
    let data_path = args.data.unwrap_or_else(|| config.data_path.clone());

    let timings = load_timings(&data_path).with_context(|| format!("Lecture de {:?}", data_path))?;

    let written = FrameSequencer::new(&config, &args.out_dir).run(&timings)?;
    println!("{} frames écrites dans {:?}", written, args.out_dir);
    Ok(())
}
