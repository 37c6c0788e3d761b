use std::fs::File;
use std::io::BufReader;
use std::process::ExitCode;

use clap::Parser;
use ddreader::{report, DiskImage};

#[derive(Parser, Debug)]
#[command(version, about = "Inspect the MBR and FAT boot records of a raw disk image", long_about = None)]
struct Args {
    /// raw disk image (dd) to inspect
    image: String,
    /// Print every decoded field, CHS values and hex dumps of boot code
    #[arg(short, long)]
    detailed: bool,
    #[arg(short, long)]
    quiet: bool,
    #[arg(short, action = clap::ArgAction::Count)]
    verbosity: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = match (args.quiet, args.verbosity) {
        (true, _) => log::LevelFilter::Off,
        (_, 0) => log::LevelFilter::Warn,
        (_, 1) => log::LevelFilter::Info,
        (_, 2) => log::LevelFilter::Debug,
        (_, _) => log::LevelFilter::Trace,
    };
    env_logger::builder().filter(None, level).init();

    let file = match File::open(&args.image) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("could not open disk image {}: {}", args.image, e);
            return ExitCode::FAILURE;
        }
    };

    match DiskImage::decode(BufReader::new(file)) {
        Ok(disk) => {
            print!("{}", report::render(&disk, args.detailed));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", args.image, e);
            ExitCode::FAILURE
        }
    }
}
