use std::path::PathBuf;

use biotable::{io::OutputFile, prelude::*};
use clap::{Args, Parser, Subcommand};

const INFO: &str = "\
biotable: load SAM, VCF, BED and samtools flagstat files into typed tables
usage: biotable [--help] <subcommand>

Subcommands:

  sam:      load a SAM/BAM/CRAM file (BAM/CRAM via samtools view)
  vcf:      load a VCF/BCF file (BCF and .vcf.gz via bcftools view)
  bed:      load a BED file
  flagstat: load a samtools flagstat report

Header lines are written first, followed by the table as CSV.
";

#[derive(Parser)]
#[clap(name = "biotable")]
#[clap(about = INFO)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct CommonArgs {
    /// the input file
    #[arg(required = true)]
    input: PathBuf,

    /// an optional output file (standard output will be used if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// fail if the file has more than this many optional columns
    #[arg(long)]
    max_optional_columns: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    Sam {
        #[command(flatten)]
        common: CommonArgs,

        /// threads passed to samtools for BAM/CRAM input
        #[arg(long, default_value_t = 1)]
        threads: usize,

        /// the samtools executable
        #[arg(long, default_value = "samtools")]
        samtools: String,
    },
    Vcf {
        #[command(flatten)]
        common: CommonArgs,

        /// threads passed to bcftools for BCF/.vcf.gz input
        #[arg(long, default_value_t = 1)]
        threads: usize,

        /// the bcftools executable
        #[arg(long, default_value = "bcftools")]
        bcftools: String,
    },
    Bed {
        #[command(flatten)]
        common: CommonArgs,

        /// comma-separated names for the columns after chromEnd
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },
    Flagstat {
        #[command(flatten)]
        common: CommonArgs,
    },
}

fn load_and_write(loader: BioTable, common: &CommonArgs) -> Result<(), BioTableError> {
    let mut loader = match common.max_optional_columns {
        Some(max) => loader.with_max_optional_columns(max),
        None => loader,
    };
    let report = loader.load()?;
    for issue in report.issues() {
        log::warn!("{}", issue);
    }

    let output = common.output.as_ref().map_or(OutputFile::new_stdout(None), |file| {
        OutputFile::new(file, None)
    });
    let writer = output.writer()?;
    loader.write_csv(writer)
}

fn run() -> Result<(), BioTableError> {
    let cli = Cli::parse();

    let level = match cli.debug {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Some(Commands::Sam {
            common,
            threads,
            samtools,
        }) => {
            let converter = ConverterConfig {
                samtools: samtools.clone(),
                n_thread: *threads,
                ..Default::default()
            };
            let loader = BioTable::sam(&common.input)?.with_converter(converter);
            load_and_write(loader, common)
        }
        Some(Commands::Vcf {
            common,
            threads,
            bcftools,
        }) => {
            let converter = ConverterConfig {
                bcftools: bcftools.clone(),
                n_thread: *threads,
                ..Default::default()
            };
            let loader = BioTable::vcf(&common.input)?.with_converter(converter);
            load_and_write(loader, common)
        }
        Some(Commands::Bed { common, columns }) => {
            let loader = match columns {
                Some(names) => BioTable::bed_with_optional_columns(&common.input, names)?,
                None => BioTable::bed(&common.input)?,
            };
            load_and_write(loader, common)
        }
        Some(Commands::Flagstat { common }) => {
            load_and_write(BioTable::flagstat(&common.input)?, common)
        }
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    }
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
