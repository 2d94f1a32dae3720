use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ringlog::*;

mod build;
mod config;
mod dashboard;

use config::Config;
use dashboard::{DashboardDef, DASHBOARDS};

fn command() -> Command {
    Command::new("vic-dashboards")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("CONFIG")
                .help("Optional TOML configuration file")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("DASHBOARD")
                .long("dashboard")
                .short('d')
                .help("Only build the named dashboard")
                .value_parser(PossibleValuesParser::new(
                    DASHBOARDS.iter().map(|def| def.name),
                )),
        )
        .arg(
            Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase verbosity")
                .action(ArgAction::Count),
        )
}

/// The dashboard named by `--dashboard`, or every registered one
fn selected_defs(args: &ArgMatches) -> &'static [DashboardDef] {
    let Some(name) = args.get_one::<String>("DASHBOARD") else {
        return DASHBOARDS;
    };

    match dashboard::get_dashboard(name) {
        Some(def) => std::slice::from_ref(def),
        None => DASHBOARDS,
    }
}

fn main() -> ExitCode {
    let args = command().get_matches();

    let config = match args.get_one::<PathBuf>("CONFIG") {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    // validated during load, defaults are always valid
    let level = match args.get_count("VERBOSE") {
        0 => config.log().level().unwrap_or(Level::Info),
        1 => Level::Debug,
        _ => Level::Trace,
    };

    // configure debug log
    let debug_output: Box<dyn Output> = Box::new(Stderr::new());

    let debug_log = if level <= Level::Info {
        LogBuilder::new().format(ringlog::default_format)
    } else {
        LogBuilder::new()
    }
    .output(debug_output)
    .build()
    .expect("failed to initialize debug log");

    let mut log = MultiLogBuilder::new()
        .level_filter(level.to_level_filter())
        .default(debug_log)
        .build()
        .start();

    let output_dir = config.general().output_dir();
    debug!("writing dashboards to {}", output_dir.display());

    let result = build::run(output_dir, selected_defs(&args));

    let code = match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("build failed: {e}");
            for failure in e.failures() {
                error!("  {failure}");
            }
            ExitCode::FAILURE
        }
    };

    let _ = log.flush();
    code
}
