//! Command-line front end for the department resolver.
//!
//! Resolves department names, lists the categories in use, enriches record
//! streams with a category field, and checks table files. Configuration comes
//! from `DEPTCAT_*` variables; `--table PATH` before the subcommand overrides
//! `DEPTCAT_TABLE` for a single run.

use anyhow::{Context, Result, anyhow, bail};
use deptcat::enrich::{DEFAULT_CATEGORY_FIELD, DEFAULT_DEPARTMENT_POINTER};
use deptcat::logging::init_logging;
use deptcat::{
    CategoryResolver, EnrichOptions, ResolverConfig, TABLE_SCHEMA_VERSION, enrich_records,
    parse_record_stream, publish_to_host,
};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

fn main() {
    init_logging("warn");
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse(env::args_os().skip(1))?;
    if matches!(cli.command, Command::Help) {
        print!("{}", usage());
        return Ok(0);
    }

    let mut config = ResolverConfig::from_env()?;
    if let Some(path) = cli.table {
        config.table_path = Some(path);
    }

    let resolver = Arc::new(config.load_resolver()?);
    let publication = publish_to_host(&resolver, &config.host_environment());
    tracing::debug!(?publication, host_mode = ?config.host_mode, "host publication");

    match cli.command {
        Command::Help => Ok(0),
        Command::Resolve { fallback, names } => resolve(&resolver, fallback.as_deref(), &names),
        Command::Categories => {
            let mut stdout = io::stdout().lock();
            for label in resolver.categories() {
                writeln!(stdout, "{label}")?;
            }
            Ok(0)
        }
        Command::Enrich {
            source,
            pointer,
            field,
            fallback,
        } => {
            let input = source.read()?;
            let mut records = parse_record_stream(&input)?;
            let options = EnrichOptions {
                department_pointer: pointer,
                category_field: field,
                fallback_label: fallback.unwrap_or_else(|| config.fallback_label.clone()),
            };
            let summary = enrich_records(&resolver, &mut records, &options)?;
            let mut stdout = io::stdout().lock();
            for record in &records {
                writeln!(stdout, "{}", serde_json::to_string(record)?)?;
            }
            tracing::info!(
                total = summary.total,
                matched = summary.matched,
                fallback = summary.fallback,
                unknown = summary.unknown_departments.len(),
                "enrichment complete"
            );
            Ok(0)
        }
        Command::Check => {
            println!(
                "{} departments across {} categories ({})",
                resolver.len(),
                resolver.categories().len(),
                TABLE_SCHEMA_VERSION
            );
            Ok(0)
        }
    }
}

fn resolve(resolver: &CategoryResolver, fallback: Option<&str>, names: &[String]) -> Result<i32> {
    let mut stdout = io::stdout().lock();
    let mut missing = 0usize;
    for name in names {
        match (resolver.resolve(name), fallback) {
            (Some(label), _) => writeln!(stdout, "{label}")?,
            (None, Some(fallback)) => writeln!(stdout, "{fallback}")?,
            (None, None) => {
                eprintln!("dept-category: no category for '{name}'");
                missing += 1;
            }
        }
    }
    Ok(if missing == 0 { 0 } else { 1 })
}

#[derive(Debug)]
struct Cli {
    table: Option<PathBuf>,
    command: Command,
}

#[derive(Debug)]
enum Command {
    Resolve {
        fallback: Option<String>,
        names: Vec<String>,
    },
    Categories,
    Enrich {
        source: InputSource,
        pointer: String,
        field: String,
        fallback: Option<String>,
    },
    Check,
    Help,
}

#[derive(Debug, PartialEq)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    fn read(&self) -> Result<String> {
        match self {
            InputSource::File(path) => {
                if !path.is_file() {
                    bail!("input file not found: {}", path.display());
                }
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
            }
            InputSource::Stdin => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("reading stdin")?;
                Ok(buf)
            }
        }
    }
}

impl Cli {
    fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut args = args
            .into_iter()
            .map(|os| {
                os.into_string()
                    .map_err(|_| anyhow!("argument is not valid UTF-8"))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter();

        let mut table: Option<PathBuf> = None;
        let subcommand = loop {
            match args.next() {
                Some(arg) if arg == "--table" => {
                    table = Some(PathBuf::from(next_value(&mut args, "--table")?));
                }
                Some(arg) if arg == "--help" || arg == "-h" => break "help".to_string(),
                Some(arg) => break arg,
                None => bail!("missing subcommand\n{}", usage()),
            }
        };

        let command = match subcommand.as_str() {
            "resolve" => parse_resolve(args)?,
            "categories" => {
                reject_extra(args, "categories")?;
                Command::Categories
            }
            "enrich" => parse_enrich(args)?,
            "check" => {
                reject_extra(args, "check")?;
                Command::Check
            }
            "help" => Command::Help,
            other => bail!("unknown subcommand: {other}\n{}", usage()),
        };

        Ok(Cli { table, command })
    }
}

fn parse_resolve(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut fallback = None;
    let mut names = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--fallback" => fallback = Some(next_value(&mut args, "--fallback")?),
            "--" => {
                names.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => bail!("unknown flag for resolve: {flag}"),
            _ => names.push(arg),
        }
    }
    if names.is_empty() {
        bail!("resolve requires at least one department name");
    }
    Ok(Command::Resolve { fallback, names })
}

fn parse_enrich(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let mut source: Option<InputSource> = None;
    let mut pointer = DEFAULT_DEPARTMENT_POINTER.to_string();
    let mut field = DEFAULT_CATEGORY_FIELD.to_string();
    let mut fallback = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" => {
                let path = next_value(&mut args, "--file")?;
                if source.is_some() {
                    bail!("--file/--stdin may only be provided once");
                }
                source = Some(InputSource::File(PathBuf::from(path)));
            }
            "--stdin" => {
                if source.is_some() {
                    bail!("--file/--stdin may only be provided once");
                }
                source = Some(InputSource::Stdin);
            }
            "--pointer" => pointer = next_value(&mut args, "--pointer")?,
            "--field" => field = next_value(&mut args, "--field")?,
            "--fallback" => fallback = Some(next_value(&mut args, "--fallback")?),
            other => bail!("unknown flag for enrich: {other}"),
        }
    }
    Ok(Command::Enrich {
        source: source.unwrap_or(InputSource::Stdin),
        pointer,
        field,
        fallback,
    })
}

fn reject_extra(mut args: impl Iterator<Item = String>, subcommand: &str) -> Result<()> {
    if let Some(extra) = args.next() {
        bail!("{subcommand} takes no arguments, got '{extra}'");
    }
    Ok(())
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: dept-category [--table PATH] <command>\n\
Commands:\n  \
resolve [--fallback LABEL] [--] NAME...   print the category for each department\n  \
categories                              list category labels in use\n  \
enrich [--file PATH|--stdin] [--pointer /department] [--field category] [--fallback LABEL]\n  \
                                          add a category field to each JSON record (NDJSON out)\n  \
check                                   validate the active table and summarize it\n\
Environment: DEPTCAT_TABLE, DEPTCAT_FALLBACK, DEPTCAT_HOST=shared|detached, RUST_LOG\n"
}
