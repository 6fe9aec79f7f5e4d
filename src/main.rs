//! nen command-line tool
//!
//! ```bash
//! # compress raw bytes under a key (defaults to the file name)
//! nen compress band1.raw --width 7711 --height 7861
//!
//! # restore them
//! nen decompress band1.raw restored.raw
//!
//! # codebook and ratio of a stored artifact
//! nen inspect band1.raw
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use nen::{Artifact, ArtifactStore, CodecConfig, DirStore, HuffmanCodec, HuffmanError, RasterShape};

#[derive(Parser, Debug)]
#[command(name = "nen")]
#[command(version)]
#[command(about = "Huffman compression with a keyed artifact store", long_about = None)]
struct Args {
    /// Directory holding stored artifacts
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a file and store the artifact
    Compress {
        input: PathBuf,

        /// Key to store under; defaults to the input's file name
        #[arg(long)]
        name: Option<String>,

        #[arg(long, requires = "height")]
        width: Option<u32>,

        #[arg(long, requires = "width")]
        height: Option<u32>,
    },
    /// Restore a stored artifact into a file
    Decompress {
        name: String,
        output: PathBuf,
    },
    /// Print statistics and the codebook of a stored artifact
    Inspect {
        name: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args, nen::config::ENV_PREFIX) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("nen: {}", e);
            return ExitCode::from(1);
        }
    };

    let level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("nen: failed to install log subscriber");
    }

    match run(args.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Defaults, then the config file, then `{env_prefix}*` variables, then flags.
fn load_config(args: &Args, env_prefix: &str) -> nen::Result<CodecConfig> {
    let base = match &args.config {
        Some(path) => CodecConfig::load_from_file(path)?,
        None => CodecConfig::default(),
    };
    let mut config = base.with_env_overrides(env_prefix)?;
    if let Some(store) = &args.store {
        config.store_dir = store.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn exit_code(e: &HuffmanError) -> u8 {
    match e {
        HuffmanError::NotFound { .. } => 2,
        HuffmanError::CorruptArtifact { .. } => 3,
        HuffmanError::EmptyInput => 4,
        _ => 1,
    }
}

fn run(command: Command, config: CodecConfig) -> nen::Result<()> {
    let mut store = DirStore::open(&config.store_dir)?;
    let codec = HuffmanCodec::new(config);

    match command {
        Command::Compress { input, name, width, height } => {
            let key = match name {
                Some(name) => name,
                None => default_key(&input)?,
            };
            let shape = width.zip(height).map(|(w, h)| RasterShape::new(w, h));
            compress(&codec, &mut store, &input, &key, shape)
        }
        Command::Decompress { name, output } => decompress(&codec, &store, &name, &output),
        Command::Inspect { name } => inspect(&store, &name),
    }
}

fn default_key(input: &Path) -> nen::Result<String> {
    input.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| HuffmanError::InvalidKey { key: input.display().to_string() })
}

fn compress(
    codec: &HuffmanCodec,
    store: &mut DirStore,
    input: &Path,
    key: &str,
    shape: Option<RasterShape>,
) -> nen::Result<()> {
    let start = Instant::now();
    let data = std::fs::read(input)?;

    if let Some(shape) = shape {
        if !shape.matches_len(data.len()) {
            warn!(
                "{} bytes is not a whole number of {}x{} pixels",
                data.len(), shape.width, shape.height
            );
        }
    }

    let artifact = codec.compress_into_store(store, key, &data, shape)?;
    let stats = artifact.stats();
    info!(
        "'{}' compressed and saved in {:.2} seconds ({} -> {} bytes, {:.1}% of original)",
        key,
        start.elapsed().as_secs_f64(),
        stats.original_bytes,
        stats.packed_bytes,
        stats.ratio() * 100.0
    );
    Ok(())
}

fn decompress(codec: &HuffmanCodec, store: &DirStore, key: &str, output: &Path) -> nen::Result<()> {
    let start = Instant::now();
    let (data, shape) = codec.decompress_from_store(store, key)?;
    std::fs::write(output, &data)?;

    if let Some(shape) = shape {
        info!("stored shape: {}x{}", shape.width, shape.height);
    }
    info!(
        "'{}' decompressed and saved to '{}' in {:.2} seconds",
        key,
        output.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn inspect(store: &DirStore, key: &str) -> nen::Result<()> {
    let record = store.get(key)?;
    let artifact = Artifact::from_bytes(&record.blob)?;
    let stats = artifact.stats();

    println!("key:              {}", key);
    println!("original bytes:   {}", stats.original_bytes);
    println!("packed bits:      {}", stats.packed_bits);
    println!("packed bytes:     {}", stats.packed_bytes);
    println!("ratio:            {:.3}", stats.ratio());
    println!("distinct symbols: {}", stats.distinct_symbols);
    if let Some(shape) = record.shape {
        println!("shape:            {}x{}", shape.width, shape.height);
    }
    println!("codebook:");
    for (byte, code) in artifact.codebook.iter() {
        println!("  {:>3}  {}", byte, code);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn write_config(dir: &Path) -> PathBuf {
        let path = dir.join("nen.json");
        let file = CodecConfig {
            store_dir: PathBuf::from("a"),
            max_input_bytes: 100,
            log_level: "debug".to_string(),
        };
        file.save_to_file(&path).unwrap();
        path
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&HuffmanError::not_found("k")), 2);
        assert_eq!(exit_code(&HuffmanError::corrupt("bad magic")), 3);
        assert_eq!(exit_code(&HuffmanError::EmptyInput), 4);

        let others = [
            HuffmanError::InvalidKey { key: ".k".to_string() },
            HuffmanError::MissingCode { byte: 7 },
            HuffmanError::WeightOverflow,
            HuffmanError::configuration("bad"),
            HuffmanError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk")),
        ];
        for e in &others {
            assert_eq!(exit_code(e), 1, "{e}");
        }
    }

    #[test]
    fn test_config_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path());
        let path = path.to_str().unwrap();

        let args = Args::try_parse_from(["nen", "--config", path, "inspect", "k"]).unwrap();
        let config = load_config(&args, "NEN_CLITEST_UNSET_").unwrap();
        assert_eq!(config.store_dir, PathBuf::from("a"));
        assert_eq!(config.max_input_bytes, 100);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_config_layering() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path());
        let path = path.to_str().unwrap();
        std::env::set_var("NEN_CLITEST_MAX_INPUT_BYTES", "200");
        std::env::set_var("NEN_CLITEST_LOG_LEVEL", "error");

        let args = Args::try_parse_from([
            "nen", "--config", path, "--log-level", "warn", "--store", "b", "inspect", "k",
        ])
        .unwrap();
        let config = load_config(&args, "NEN_CLITEST_").unwrap();

        // file < env < flags
        assert_eq!(config.store_dir, PathBuf::from("b"));
        assert_eq!(config.max_input_bytes, 200);
        assert_eq!(config.log_level, "warn");

        std::env::remove_var("NEN_CLITEST_MAX_INPUT_BYTES");
        std::env::remove_var("NEN_CLITEST_LOG_LEVEL");
    }

    #[test]
    fn test_invalid_flag_is_rejected() {
        let args = Args::try_parse_from(["nen", "--log-level", "loud", "inspect", "k"]).unwrap();
        let err = load_config(&args, "NEN_CLITEST_UNSET_").unwrap_err();
        assert!(matches!(err, HuffmanError::Configuration { .. }));
    }
}
