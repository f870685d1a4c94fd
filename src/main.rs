// ============================================================
//  main.rs - Punctul de intrare: subcomenzile `grep` și `uniq`
// ============================================================
//
//  Driver-ul este subțire: construiește filtrul, citește liniile
//  (fișiere sau stdin), le dă bibliotecii și afișează verdictul.
//
//  Codul de ieșire (ca la grep): 0 = s-a găsit ceva, 1 = nimic,
//  2 = cel puțin o intrare nu a putut fi citită.
//
//  Concepte Rust demonstrate aici:
//  - `clap` derive: subcomenzi ca variante de enum
//  - `#[tokio::main]` și I/O asincron pentru fișiere și stdin
//  - `anyhow::Context` pentru erori fatale cu mesaj clar
//  - `Arc<dyn Trait>` pentru parser-ul partajat
// ============================================================

mod display;

use aclgrep::containment::find_redundant_parallel;
use aclgrep::network::address_to_bits;
use aclgrep::{create_parser, matches, scan_rules, AclParser, Config, PatternSet, Query, Scanner};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "aclgrep", version)]
#[command(about = "Caută rețele, porturi și reguli redundante în dump-uri ACL")]
struct Cli {
    /// Fișier de configurare TOML
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Afișează regulile care se potrivesc cu filtrul
    Grep(GrepArgs),
    /// Afișează regulile umbrite de o regulă anterioară mai largă
    Uniq(UniqArgs),
}

#[derive(Args, Debug)]
struct GrepArgs {
    /// Include și regulile cu "any"
    #[arg(short = 'a', long = "any")]
    match_any: bool,

    /// IP sursă căutat
    #[arg(short = 'i', long = "sip")]
    source_ip: Option<String>,

    /// Port sursă căutat (număr sau nume de serviciu)
    #[arg(short = 'p', long = "sport")]
    source_port: Option<String>,

    /// IP destinație căutat
    #[arg(short = 'I', long = "dip")]
    dest_ip: Option<String>,

    /// Port destinație căutat (număr sau nume de serviciu)
    #[arg(short = 'P', long = "dport")]
    dest_port: Option<String>,

    /// Protocolul căutat (tcp, udp, icmp, ip)
    #[arg(short = 'o', long = "proto")]
    protocol: Option<String>,

    /// Fișierele ACL; fără fișiere se citește stdin
    files: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct UniqArgs {
    /// Fișierele ACL; fără fișiere se citește stdin
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("aclgrep=warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();

    let cli = Cli::parse();

    let config = Config::load_or_default(cli.config.as_deref())
        .context("Eroare fatală: nu s-a putut încărca configurația")?;
    let patterns = config.pattern_set()?;
    let parser: Arc<dyn AclParser> = Arc::from(create_parser(&config.matching.dialect, patterns));
    tracing::debug!(parser = parser.name(), "parser inițializat");

    match cli.command {
        Command::Grep(args) => {
            let query = build_query(&args, &config, parser.patterns())?;
            run_grep(&args.files, &query, parser.as_ref()).await
        }
        Command::Uniq(args) => run_uniq(&args.files, parser).await,
    }
}

fn build_query(args: &GrepArgs, config: &Config, patterns: &PatternSet) -> Result<Query> {
    let ip = |value: &Option<String>| -> Result<Option<u32>> {
        value
            .as_deref()
            .map(|v| address_to_bits(v).with_context(|| format!("IP invalid: '{v}'")))
            .transpose()
    };
    let port = |value: &Option<String>| -> Result<Option<u16>> {
        value
            .as_deref()
            .map(|v| patterns.resolve_port(v).ok_or_else(|| anyhow!("Port invalid: '{v}'")))
            .transpose()
    };

    Ok(Query {
        source_ip: ip(&args.source_ip)?,
        source_port: port(&args.source_port)?,
        dest_ip: ip(&args.dest_ip)?,
        dest_port: port(&args.dest_port)?,
        protocol: args.protocol.as_ref().map(|p| p.to_lowercase()),
        match_any: args.match_any || config.matching.match_any,
    })
}

async fn run_grep(files: &[PathBuf], query: &Query, parser: &dyn AclParser) -> Result<ExitCode> {
    let mut matched = 0usize;
    let mut failed = false;

    for (label, lines) in read_inputs(files, &mut failed).await {
        let mut scanner = Scanner::new(parser);
        for line in &lines {
            let outcome = scanner.feed(line);
            if let Ok(rule) = &outcome.result {
                if matches(rule, query) {
                    display::print_match(&label, &outcome.acl_name, line);
                    matched += 1;
                }
            }
        }
    }

    tracing::info!(matched, "grep terminat");
    Ok(exit_code(matched > 0, failed))
}

async fn run_uniq(files: &[PathBuf], parser: Arc<dyn AclParser>) -> Result<ExitCode> {
    let mut found = 0usize;
    let mut failed = false;

    for (label, lines) in read_inputs(files, &mut failed).await {
        // Faza 1: parcurgere secvențială (contextul numelui de ACL depinde de ordine)
        let rules = Arc::new(scan_rules(parser.as_ref(), lines.iter().map(String::as_str)));

        // Faza 2: comparare read-only, pe bucăți de rânduri, în paralel
        let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
        for pair in find_redundant_parallel(Arc::clone(&rules), workers).await? {
            display::print_redundant(&label, &rules[pair.earlier], &rules[pair.later]);
            found += 1;
        }
    }

    if found > 0 {
        display::log_info(&format!("{found} reguli umbrite găsite"));
    }
    Ok(exit_code(found > 0, failed))
}

/// Toate intrările citite; o intrare ilizibilă este raportată și sărită
async fn read_inputs(files: &[PathBuf], failed: &mut bool) -> Vec<(String, Vec<String>)> {
    if files.is_empty() {
        return match read_lines(tokio::io::stdin()).await {
            Ok(lines) => vec![("(stdin)".to_string(), lines)],
            Err(err) => {
                display::log_error(&format!("stdin: {err:#}"));
                *failed = true;
                Vec::new()
            }
        };
    }

    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        match read_file(path).await {
            Ok(lines) => inputs.push((path.display().to_string(), lines)),
            Err(err) => {
                display::log_warn(&format!("{err:#}"));
                *failed = true;
            }
        }
    }
    inputs
}

async fn read_file(path: &Path) -> Result<Vec<String>> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Nu s-a putut deschide '{}'", path.display()))?;
    read_lines(file)
        .await
        .with_context(|| format!("Eroare la citirea '{}'", path.display()))
}

// Dump-urile de router nu sunt mereu UTF-8 curat; octeții invalizi sunt înlocuiți
async fn read_lines<R: AsyncRead + Unpin>(reader: R) -> Result<Vec<String>> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        lines.push(String::from_utf8_lossy(&buf).trim_end_matches(['\r', '\n']).to_string());
    }
    Ok(lines)
}

fn exit_code(found: bool, failed: bool) -> ExitCode {
    match (failed, found) {
        (true, _) => ExitCode::from(2),
        (false, true) => ExitCode::SUCCESS,
        (false, false) => ExitCode::from(1),
    }
}
