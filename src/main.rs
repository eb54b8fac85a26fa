//! Command-line entry point: loads a config and builds one simulation context.

use std::path::{Path, PathBuf};
use std::process;

use tracing::{Level, error};

use prosumer_synth::config::BuildConfig;
use prosumer_synth::context::ContextBuilder;

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    data_dir: Option<PathBuf>,
    seed_override: Option<u64>,
    verbose: bool,
}

fn print_help() {
    eprintln!("prosumer-synth: household population and network synthesis");
    eprintln!();
    eprintln!("Usage: prosumer-synth [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load run parameters from a TOML file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, electrified, large_feeder)");
    eprintln!("  --data-dir <path>        Override the data file folder");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --verbose                Print population diagnostics while building");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline preset is used.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        data_dir: None,
        seed_override: None,
        verbose: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
            }
            "--data-dir" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --data-dir requires a path argument");
                    process::exit(1);
                }
                cli.data_dir = Some(PathBuf::from(&args[i]));
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--verbose" | "-v" => {
                cli.verbose = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.config_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --config and --preset are mutually exclusive; choose one source");
        process::exit(1);
    }

    cli
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::INFO } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then baseline default
    let mut config = if let Some(ref path) = cli.config_path {
        match BuildConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match BuildConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        BuildConfig::baseline()
    };

    if let Some(dir) = cli.data_dir {
        config.run.data_file_folder = dir;
    }
    if let Some(seed) = cli.seed_override {
        config.run.seed = Some(seed);
    }
    if cli.verbose {
        config.run.verbose_output = true;
    }

    init_logging(config.run.verbose_output);

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build
    let builder = ContextBuilder::new(&config);
    let mut rng = builder.rng();
    let context = match builder.build(&mut rng) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("{e}");
            error!("the run cannot proceed and will now terminate");
            process::exit(1);
        }
    };

    println!("{}", context.summary());
}
