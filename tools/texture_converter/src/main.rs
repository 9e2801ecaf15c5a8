use std::{
    io::Write,
    path::{Path, PathBuf},
};

use clap::Parser;
use log::LevelFilter;
use psp_file_formats::texture::TextureFile;
use psp_texture::{Destination, HostVram, LoadOptions, TextureLoader, VramArena};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("texture error: {0}")]
    Texture(#[from] psp_texture::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("postcard error: {0}")]
    Postcard(#[from] postcard::Error),
    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("corrupt texture file: expected {expected:?} bytes of data, got {actual:?}")]
    CorruptTextureFile { expected: usize, actual: usize },
}

type Result<T, E = Error> = core::result::Result<T, E>;

/// Converts an image into a swizzled texture file.
#[derive(Parser)]
struct Args {
    file: PathBuf,
    /// Defaults to the input path with a `.ptex` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Keep the top row first instead of flipping for the GE.
    #[arg(long)]
    no_flip: bool,
    /// Print a summary of an existing texture file instead of converting.
    #[arg(long)]
    inspect: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    simple_logger::SimpleLogger::new()
        .with_level(log_level(args.verbose))
        .init()?;

    if args.inspect {
        let file = read_texture_file(&args.file)?;
        println!(
            "{:?} {}x{} stored at {}x{}, swizzled: {}, {} bytes",
            file.format,
            file.width,
            file.height,
            file.padded_width,
            file.padded_height,
            file.swizzled,
            file.data.len()
        );
        return Ok(());
    }

    convert(&args)?;
    Ok(())
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn convert(args: &Args) -> Result<PathBuf> {
    let mut arena = VramArena::new(HostVram::new());
    let options = LoadOptions {
        destination: Destination::Host,
        flip_vertically: !args.no_flip,
    };
    let texture = TextureLoader::new().load_with(&args.file, options, &mut arena)?;
    let texture_file = texture.to_file(&arena)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.file.with_extension(TextureFile::EXTENSION));
    let mut file = std::fs::File::create(&output)?;
    file.write_all(&postcard::to_allocvec(&texture_file)?)?;

    log::info!(
        "wrote {output:?}: {}x{} padded to {}x{}",
        texture.width(),
        texture.height(),
        texture.padded_width(),
        texture.padded_height()
    );
    Ok(output)
}

fn read_texture_file(path: &Path) -> Result<TextureFile> {
    let bytes = std::fs::read(path)?;
    let file: TextureFile = postcard::from_bytes(&bytes)?;
    if file.data.len() != file.expected_len() {
        return Err(Error::CorruptTextureFile {
            expected: file.expected_len(),
            actual: file.data.len(),
        });
    }
    Ok(file)
}
