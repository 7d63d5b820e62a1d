use std::{fs::File, io::Read, path::PathBuf};

use clap::Parser as _;
use gps_mtk3339::{Parser, ParserConfig, RecoveryMode, hex_dump};
use log::LevelFilter;

/// Decodes a raw NMEA capture the way it would arrive from a serial port.
#[derive(Debug, clap::Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Raw capture of the receiver output
    file: PathBuf,
    /// Bytes handed to the parser per call
    #[arg(short, long, default_value = "80")]
    chunk_size: usize,
    /// Skip broken sentences instead of stopping at the first one
    #[arg(short, long)]
    resync: bool,
    /// Two-digit RMC years are added to this
    #[arg(long, default_value = "2000")]
    century: i32,
    #[arg(short, long, default_value = "info", value_parser = level_parser)]
    log_level: LevelFilter,
    /// Print the parser state after the last chunk
    #[arg(long)]
    dump: bool,
}

fn level_parser(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level {s:?}"))
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let _ = env_logger::builder()
        .filter_level(args.log_level)
        .try_init();

    let mut config = ParserConfig::default()
        .with_log_level(args.log_level)
        .with_century(args.century);
    if args.resync {
        config = config.with_recovery(RecoveryMode::Resync);
    }
    let mut parser = Parser::with_config(config);

    let mut file = File::open(&args.file)?;
    let mut buffer = vec![0; args.chunk_size.max(1)];
    let mut records = Vec::new();

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }

        let chunk = &buffer[..read];
        let result = parser.parse(chunk, &mut records);
        for record in records.drain(..) {
            println!("{record}");
        }

        if let Err(e) = result {
            eprintln!("Parsing error occurred: {e}");
            eprint!("{}", hex_dump(chunk));
            break;
        }
    }

    println!(
        "{} bytes consumed, {} sentences discarded",
        parser.consumed(),
        parser.discarded()
    );
    if args.dump {
        parser.dump_state(&mut std::io::stdout())?;
    }

    Ok(())
}
