mod debug_report;

use chatemojis::{Catalog, ConfigSection, Settings, Subject};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let root = match ConfigSection::from_file(&config.config) {
        Ok(root) => root,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let settings = match Settings::from_root(&root) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("error: invalid settings: {err}");
            std::process::exit(1);
        }
    };

    let catalog = Catalog::load(&root);
    let tree = catalog.snapshot();
    let reset = config.reset.unwrap_or(settings.reset_marker);

    let mut requester = Subject::new("cli").operator(config.operator);
    for permission in config.grants {
        requester = requester.grant(permission);
    }
    for permission in config.denials {
        requester = requester.deny(permission);
    }

    let report = debug_report::Report { tree: &tree, requester: &requester, color: config.color };
    report.print_summary();
    if config.show_tree {
        report.print_tree();
    }
    if config.show_list {
        report.print_list();
    }
    if let Some(input) = config.input {
        let output = tree.parse(&requester, &reset, &input, config.forced);
        report.print_parse(&input, &output);
    }
}

struct CliConfig {
    config: PathBuf,
    input: Option<String>,
    grants: Vec<String>,
    denials: Vec<String>,
    operator: bool,
    forced: bool,
    reset: Option<String>,
    show_tree: bool,
    show_list: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut config: Option<PathBuf> = None;
    let mut input: Option<String> = None;
    let mut grants = Vec::new();
    let mut denials = Vec::new();
    let mut operator = false;
    let mut forced = false;
    let mut reset: Option<String> = None;
    let mut show_tree = false;
    let mut show_list = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("chatemojis {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--op" => operator = true,
            "--force" => forced = true,
            "--tree" => show_tree = true,
            "--list" => show_list = true,
            "--config" | "-c" => {
                let value = args.next().ok_or_else(|| "error: --config expects a value".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "--grant" | "-g" => {
                grants.push(args.next().ok_or_else(|| "error: --grant expects a value".to_string())?);
            }
            "--deny" | "-d" => {
                denials.push(args.next().ok_or_else(|| "error: --deny expects a value".to_string())?);
            }
            "--reset" => {
                reset = Some(args.next().ok_or_else(|| "error: --reset expects a value".to_string())?);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--config=") => {
                config = Some(PathBuf::from(arg.trim_start_matches("--config=")));
            }
            _ if arg.starts_with("--grant=") => grants.push(arg.trim_start_matches("--grant=").to_string()),
            _ if arg.starts_with("--deny=") => denials.push(arg.trim_start_matches("--deny=").to_string()),
            _ if arg.starts_with("--reset=") => reset = Some(arg.trim_start_matches("--reset=").to_string()),
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                input = Some(rest);
                break;
            }
        }
    }

    let config = config.ok_or_else(|| format!("error: --config is required\n\n{}", help_text()))?;

    // Listing-only runs do not need any text.
    if input.is_none() && !show_tree && !show_list {
        let text = read_stdin_input()?;
        if text.trim().is_empty() {
            return Err(format!("error: no input provided\n\n{}", help_text()));
        }
        input = Some(text.trim_end_matches(['\r', '\n']).to_string());
    }

    Ok(CliConfig { config, input, grants, denials, operator, forced, reset, show_tree, show_list, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "chatemojis {version}

Replace emoticons with emojis using a YAML emoji catalog.

Usage:
  chatemojis --config <file> [OPTIONS] [--] <text...>
  chatemojis --config <file> --tree --list

Options:
  -c, --config <file>        YAML catalog to load (required).
  -g, --grant <permission>   Grant a permission to the requester. Repeatable.
  -d, --deny <permission>    Deny a permission to the requester. Repeatable.
  --op                       Treat the requester as an operator.
  --force                    Ignore permissions when substituting.
  --reset <marker>           Text inserted after every emoji.
                             Default: settings.reset-marker, or §r.
  --tree                     Print the group tree with its permissions.
  --list                     Print every emoticon the catalog knows.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Text is read from the remaining arguments, or from stdin when none are given.
Set RUST_LOG=debug to trace how the catalog is built.

Exit codes:
  0  Success.
  1  The configuration could not be read.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
    )
}
