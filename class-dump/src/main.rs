mod decompile;
mod report;
mod style;

#[cfg(test)]
mod fixture;

use anyhow::{Context, Result};
use classfile::{Class, DecodeOptions};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use structopt::StructOpt;
use style::Painter;
use tracing::{error, info, Level};
use tracing_subscriber::fmt;

#[derive(Debug, StructOpt)]
#[structopt(name = "class-dump", about = "Decode and list compiled class files")]
struct Opt {
    /// Log more; repeat for more detail
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Colour the output; ignored when writing to an output file
    #[structopt(long)]
    color: bool,

    /// Reject access flag combinations a compiler would never emit
    #[structopt(long)]
    strict: bool,

    /// Reject classes with a greater major version
    #[structopt(long)]
    max_version: Option<u16>,

    /// Check every constant pool reference, used or not
    #[structopt(long)]
    verify_pool: bool,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Print a listing of the class structure
    Dump {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        #[structopt(parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Print a source outline of the class
    Decompile {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        #[structopt(parse(from_os_str))]
        output: Option<PathBuf>,
    },
}

impl Opt {
    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::default()
            .strict_access_flags(self.strict)
            .max_major_version(self.max_version)
            .verify_pool_references(self.verify_pool)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let format = fmt::format()
        .without_time()
        .with_level(true)
        .with_target(false)
        .compact();

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .event_format(format)
        .init();
}

fn load(input: &Path, options: &DecodeOptions) -> Result<Class> {
    let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    info!(path = %input.display(), len = bytes.len(), "read class file");
    Class::parse_with(bytes, options).with_context(|| format!("decoding {}", input.display()))
}

fn emit(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes())
                .and_then(|_| lock.flush())
                .context("writing to stdout")
        }
    }
}

/// Escape codes are never written to files.
fn painter_for(color: bool, output: Option<&Path>) -> Painter {
    Painter::new(color && output.is_none())
}

fn run(opt: &Opt) -> Result<()> {
    let options = opt.decode_options();
    let (input, output) = match &opt.command {
        Command::Dump { input, output } | Command::Decompile { input, output } => {
            (input, output.as_deref())
        }
    };

    let class = load(input, &options)?;
    let painter = painter_for(opt.color, output);

    let text = match opt.command {
        Command::Dump { .. } => report::render(&class, &painter),
        Command::Decompile { .. } => decompile::skeleton(&class, &painter),
    };
    emit(output, &text)
}

fn main() {
    let opt = Opt::from_args();
    init_logging(opt.verbose);

    if let Err(err) = run(&opt) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_only_reaches_stdout() {
        let file = Path::new("out.txt");
        assert_eq!(painter_for(true, Some(file)).paint("heading", "Fields:"), "Fields:");
        assert_ne!(painter_for(true, None).paint("heading", "Fields:"), "Fields:");
        assert_eq!(painter_for(false, None).paint("heading", "Fields:"), "Fields:");
    }

    #[test]
    fn test_switches_map_onto_decode_options() {
        let opt = Opt::from_iter(&[
            "class-dump",
            "--strict",
            "--max-version",
            "52",
            "dump",
            "A.class",
        ]);
        assert_eq!(
            opt.decode_options(),
            DecodeOptions::default()
                .strict_access_flags(true)
                .max_major_version(52)
        );
        assert!(matches!(opt.command, Command::Dump { output: None, .. }));
    }
}
