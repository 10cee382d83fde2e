// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use runtime::{Command, ListOptions, Runtime};
use std::env;
use std::io;
use std::path::PathBuf;
use stockroom_app::ViewKind;
use stockroom_app::validation::parse_month;
use stockroom_client::RestClient;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "STOCKROOM_LOG";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    init_tracing();

    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `stockroom --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let client = RestClient::new(config.base_url(), config.timeout()?, config.token())
        .with_context(|| {
            format!(
                "invalid [server] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
    debug!(
        base_url = client.base_url(),
        timeout = ?client.timeout(),
        "client ready"
    );
    if options.check_only {
        return Ok(());
    }

    let Some(command) = options.command else {
        bail!("no command given; run with --help to see supported commands");
    };

    let mut runtime = Runtime::new(client, config.page_size());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    runtime.execute(&command, &mut out)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    command: Option<Command>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        command: None,
    };

    let mut positional = Vec::new();
    let mut list_options = ListOptions::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            flag @ ("--filter" | "--query" | "--page" | "--page-size" | "--month" | "--out") => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("{flag} requires a value"))?;
                apply_list_flag(&mut list_options, flag, value.as_ref())?;
            }
            unknown if unknown.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
            word => positional.push(word.to_owned()),
        }
    }

    if !positional.is_empty() {
        options.command = Some(parse_command(&positional, list_options)?);
    } else if list_options != ListOptions::default() {
        bail!("list options need a `list` or `export` command");
    }

    Ok(options)
}

fn apply_list_flag(options: &mut ListOptions, flag: &str, value: &str) -> Result<()> {
    match flag {
        "--filter" => options.filter = Some(value.to_owned()),
        "--query" => options.query = Some(value.to_owned()),
        "--page" => {
            let page = value
                .parse::<usize>()
                .ok()
                .filter(|page| *page > 0)
                .ok_or_else(|| anyhow!("--page must be a positive number, got {value:?}"))?;
            options.page = Some(page);
        }
        "--page-size" => {
            let size = value
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or_else(|| anyhow!("--page-size must be a positive number, got {value:?}"))?;
            options.page_size = Some(size);
        }
        "--month" => options.month = parse_month(value)?,
        "--out" => options.out = Some(PathBuf::from(value)),
        _ => bail!("unknown list option {flag:?}"),
    }
    Ok(())
}

fn parse_command(words: &[String], list_options: ListOptions) -> Result<Command> {
    let (name, rest) = words
        .split_first()
        .ok_or_else(|| anyhow!("no command given"))?;
    let is_listing = matches!(name.as_str(), "list" | "export");
    if !is_listing && list_options != ListOptions::default() {
        bail!("list options only apply to `list` and `export`, not `{name}`");
    }

    let command = match (name.as_str(), rest) {
        ("list", [view]) => Command::List {
            view: parse_view(view)?,
            options: list_options,
        },
        ("export", [view]) => Command::Export {
            view: parse_view(view)?,
            options: list_options,
        },
        ("create", [view, fields @ ..]) => Command::Create {
            view: parse_view(view)?,
            fields: parse_fields(fields)?,
        },
        ("update", [view, id, fields @ ..]) => {
            if fields.is_empty() {
                bail!("update needs at least one field=value pair");
            }
            Command::Update {
                view: parse_view(view)?,
                id: id.clone(),
                fields: parse_fields(fields)?,
            }
        }
        ("delete", [view, id]) => Command::Delete {
            view: parse_view(view)?,
            id: id.clone(),
        },
        ("review", [driver_id, rate]) => Command::Review {
            driver_id: driver_id.clone(),
            rate: rate
                .parse()
                .map_err(|_| anyhow!("rate must be a number from 1 to 5, got {rate:?}"))?,
        },
        ("list" | "export" | "create" | "update" | "delete" | "review", _) => {
            bail!("wrong arguments for `{name}`; run with --help to see usage")
        }
        _ => bail!("unknown command {name:?}; run with --help to see supported commands"),
    };
    Ok(command)
}

fn parse_view(value: &str) -> Result<ViewKind> {
    ViewKind::parse(value).ok_or_else(|| {
        let known = ViewKind::ALL
            .iter()
            .map(|view| view.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("unknown view {value:?}; expected one of {known}")
    })
}

fn parse_fields(words: &[String]) -> Result<Vec<(String, String)>> {
    words
        .iter()
        .map(|word| {
            word.split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.to_owned(), value.to_owned()))
                .ok_or_else(|| anyhow!("expected field=value, got {word:?}"))
        })
        .collect()
}

fn print_help() {
    println!("stockroom");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config and exit");
    println!("  --help                   Show this help");
    println!();
    println!("Commands:");
    println!("  list <view>                          Show one page of a view");
    println!("  export <view>                        Print or write a paginated report");
    println!("  create <view> field=value...         Create a record");
    println!("  update <view> <id> field=value...    Edit a record");
    println!("  delete <view> <id>                   Remove a record");
    println!("  review <driver-id> <rate>            Rate a driver from 1 to 5");
    println!();
    println!("List options: --filter <value> --query <text> --page <n> --page-size <n>");
    println!("              --month <1-12> --out <path>");
    println!("Views: inventory, staff, suppliers, customers, orders");
    println!("Logging: set {LOG_ENV} (for example {LOG_ENV}=debug)");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use crate::runtime::{Command, ListOptions};
    use anyhow::Result;
    use std::path::PathBuf;
    use stockroom_app::ViewKind;
    use time::Month;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/stockroom-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
                command: None,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn list_command_collects_options_in_any_order() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--query", "wid", "list", "inventory", "--page", "2", "--page-size", "25",
            ],
            default_options_path(),
        )?;
        assert_eq!(
            options.command,
            Some(Command::List {
                view: ViewKind::Inventory,
                options: ListOptions {
                    query: Some("wid".to_owned()),
                    page: Some(2),
                    page_size: Some(25),
                    ..ListOptions::default()
                },
            })
        );
        Ok(())
    }

    #[test]
    fn export_accepts_month_and_out() -> Result<()> {
        let options = parse_cli_args(
            vec!["export", "orders", "--month", "4", "--out", "/tmp/orders.txt"],
            default_options_path(),
        )?;
        let Some(Command::Export { view, options }) = options.command else {
            panic!("expected export command");
        };
        assert_eq!(view, ViewKind::Orders);
        assert_eq!(options.month, Some(Month::April));
        assert_eq!(options.out, Some(PathBuf::from("/tmp/orders.txt")));
        Ok(())
    }

    #[test]
    fn update_parses_field_pairs() -> Result<()> {
        let options = parse_cli_args(
            vec!["update", "staff", "u1", "contactNo=0712345678", "role=driver"],
            default_options_path(),
        )?;
        assert_eq!(
            options.command,
            Some(Command::Update {
                view: ViewKind::Staff,
                id: "u1".to_owned(),
                fields: vec![
                    ("contactNo".to_owned(), "0712345678".to_owned()),
                    ("role".to_owned(), "driver".to_owned()),
                ],
            })
        );
        Ok(())
    }

    #[test]
    fn malformed_commands_are_rejected() {
        let cases = [
            (vec!["list"], "wrong arguments"),
            (vec!["list", "warehouse"], "unknown view"),
            (vec!["frobnicate"], "unknown command"),
            (vec!["create", "inventory", "itemName"], "field=value"),
            (vec!["update", "inventory", "a1"], "at least one field"),
            (vec!["delete", "inventory", "a1", "--page", "2"], "only apply"),
            (vec!["review", "d1", "five"], "rate must be a number"),
            (vec!["list", "orders", "--month", "13"], "month"),
            (vec!["list", "orders", "--page", "0"], "--page must be a positive number"),
        ];
        for (args, expected) in cases {
            let error = parse_cli_args(args.clone(), default_options_path())
                .expect_err("malformed command should fail");
            assert!(
                error.to_string().contains(expected),
                "args {args:?}: unexpected message {error}"
            );
        }
    }
}
