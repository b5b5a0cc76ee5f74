//! richmark CLI - Convert inline markdown into rich-text JSON
//!
//! Usage:
//!   rmcli [OPTIONS] [COMMAND] [FILE]
//!
//! Commands:
//!   convert   Print the rich-text JSON array (default)
//!   check     Report markup the converter kept as literal text
//!   stats     Show item and annotation counts

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use richmark_core::normalize::normalize_line_endings;
use richmark_core::{Annotation, ConvertOptions, ConvertResult, Converter, RichTextItem, DEFAULT_MAX_DEPTH};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = parse_args(args)?;
    init_logging(config.verbose);

    let input = read_input(config.file.as_deref())?;
    let converter = Converter::new(config.options);
    tracing::debug!(
        bytes = input.len(),
        allow_blank = config.options.allow_blank,
        max_depth = config.options.max_depth,
        "converting"
    );

    match config.command {
        Command::Convert => cmd_convert(&converter, &input, &config),
        Command::Check => cmd_check(&converter, &input, &config),
        Command::Stats => cmd_stats(&converter, &input),
    }
}

/// Log to stderr so stdout carries only the converted output.
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(file: Option<&str>) -> Result<String, String> {
    match file {
        None | Some("-") => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(input)
        }
        Some(path) => fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {}", path, e)),
    }
}

#[derive(Debug)]
struct Config {
    command: Command,
    file: Option<String>,
    format: OutputFormat,
    options: ConvertOptions,
    pretty: bool,
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Convert,
    Check,
    Stats,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Json,
    Text,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut command = Command::Convert;
    let mut format = OutputFormat::Json;
    let mut options = ConvertOptions::new();
    let mut pretty = false;
    let mut verbose = false;
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("rmcli {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-p" | "--pretty" => pretty = true,
            "-t" | "--text" => format = OutputFormat::Text,
            "-b" | "--allow-blank" => options = options.with_allow_blank(true),
            "-d" | "--max-depth" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| format!("{} requires a value", arg))?;
                let depth = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid max depth: {}", value))?;
                options = options.with_max_depth(depth);
            }
            "convert" => command = Command::Convert,
            "check" => command = Command::Check,
            "stats" => command = Command::Stats,
            "-" => file = set_file(file, arg)?,
            _ if arg.starts_with('-') => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => file = set_file(file, arg)?,
        }
        i += 1;
    }

    Ok(Config {
        command,
        file,
        format,
        options,
        pretty,
        verbose,
    })
}

fn set_file(current: Option<String>, arg: &str) -> Result<Option<String>, String> {
    if current.is_some() {
        return Err("multiple files specified".to_string());
    }
    Ok(Some(arg.to_string()))
}

fn print_help() {
    eprintln!(
        r#"rmcli - inline markdown to rich-text converter

USAGE:
    rmcli [OPTIONS] [COMMAND] [FILE]

    Reads standard input when FILE is omitted or '-'.

COMMANDS:
    convert     Print the rich-text JSON array (default)
    check       Report markup kept as literal text; fails if any is found
    stats       Show item and annotation counts

OPTIONS:
    -b, --allow-blank      Return an empty array for blank input instead of null
    -d, --max-depth <N>    Nesting cap for recursive spans (default {depth})
    -p, --pretty           Pretty-print JSON; for check, print a JSON report
    -t, --text             Print one item per line instead of JSON
    -v, --verbose          Log conversion details to stderr
    -h, --help             Print help information
    -V, --version          Print version information

EXAMPLES:
    rmcli note.md                   Convert a file
    echo '**hi**' | rmcli -p        Convert stdin, pretty JSON
    rmcli -t note.md                List items as text
    rmcli check note.md             Find markup that stayed literal
    rmcli stats note.md             Show counts
"#,
        depth = DEFAULT_MAX_DEPTH
    );
}

// =============================================================================
// Convert Command
// =============================================================================

fn cmd_convert(converter: &Converter, input: &str, config: &Config) -> Result<(), String> {
    let result = converter.convert_with_diagnostics(Some(input));

    for diagnostic in result.diagnostics.iter() {
        eprintln!("warning: {}", diagnostic);
    }

    match config.format {
        OutputFormat::Json => print_json(&result.items, config.pretty),
        OutputFormat::Text => {
            match result.items {
                Some(items) => print_items(&items),
                None => println!("(blank input)"),
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    let json = json.map_err(|e| format!("failed to serialize output: {}", e))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Check Command
// =============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    clean: bool,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    kind: &'static str,
    message: &'a str,
    span: Option<JsonSpan>,
    source: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSpan {
    start: u32,
    end: u32,
}

fn cmd_check(converter: &Converter, input: &str, config: &Config) -> Result<(), String> {
    let result = converter.convert_with_diagnostics(Some(input));
    // Spans point into the normalized text.
    let text = normalize_line_endings(input);

    if config.pretty {
        print_json(&json_report(&result, &text), true)?;
    } else if result.is_clean() {
        println!("Clean: all markup converted");
    } else {
        eprintln!("Found {} diagnostic(s)", result.diagnostics.len());
        for diagnostic in result.diagnostics.iter() {
            eprintln!("  - [{}] {}", diagnostic.kind, diagnostic);
            if let Some(source) = diagnostic.span.and_then(|s| s.slice(&text)) {
                eprintln!("      {:?}", source);
            }
        }
    }

    if result.is_clean() {
        Ok(())
    } else {
        Err(format!("{} diagnostic(s) found", result.diagnostics.len()))
    }
}

fn json_report<'a>(result: &'a ConvertResult, text: &'a str) -> JsonReport<'a> {
    JsonReport {
        clean: result.is_clean(),
        diagnostics: result
            .diagnostics
            .iter()
            .map(|d| JsonDiagnostic {
                kind: d.kind.as_str(),
                message: &d.message,
                span: d.span.map(|s| JsonSpan {
                    start: s.start,
                    end: s.end,
                }),
                source: d.span.and_then(|s| s.slice(text)),
            })
            .collect(),
    }
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(converter: &Converter, input: &str) -> Result<(), String> {
    let result = converter.convert_with_diagnostics(Some(input));
    let items = result.items.as_deref().unwrap_or(&[]);
    let stats = ItemStats::from_items(items, input);

    println!("Conversion Statistics");
    println!("---------------------");
    println!("Blank input:    {}", result.items.is_none());
    println!("Items:          {}", stats.items);
    println!("Links:          {}", stats.links);
    println!();
    println!("Annotations:");
    for (flag, count) in Annotation::ALL.iter().zip(stats.annotations.iter()) {
        println!("  {:<14}{}", format!("{}:", flag.as_str()), count);
    }
    println!();
    println!("Size:");
    println!("  Input chars:  {}", stats.input_chars);
    println!("  Output chars: {}", stats.output_chars);
    println!();
    println!("Diagnostics:    {}", result.diagnostics.len());

    Ok(())
}

struct ItemStats {
    items: usize,
    links: usize,
    annotations: [usize; Annotation::ALL.len()],
    input_chars: usize,
    output_chars: usize,
}

impl ItemStats {
    fn from_items(items: &[RichTextItem], input: &str) -> Self {
        let mut stats = Self {
            items: items.len(),
            links: 0,
            annotations: [0; Annotation::ALL.len()],
            input_chars: input.chars().count(),
            output_chars: 0,
        };

        for item in items {
            if item.link().is_some() {
                stats.links += 1;
            }
            let flags = item.flags();
            for (slot, flag) in stats.annotations.iter_mut().zip(Annotation::ALL) {
                if flags.contains(flag) {
                    *slot += 1;
                }
            }
            stats.output_chars += item.content().chars().count();
        }

        stats
    }
}

// =============================================================================
// Text Output
// =============================================================================

fn print_items(items: &[RichTextItem]) {
    for (i, item) in items.iter().enumerate() {
        let flags: Vec<&str> = item.flags().iter().map(|f| f.as_str()).collect();
        let mut line = format!("[{}] {:?}", i + 1, item.content());
        if !flags.is_empty() {
            line.push_str(&format!(" ({})", flags.join(", ")));
        }
        if let Some(url) = item.link() {
            line.push_str(&format!(" -> {}", url));
        }
        println!("{}", line);
    }
}
