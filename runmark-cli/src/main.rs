// Command-line interface for runmark
//
// This binary provides commands for inspecting, checking and converting Markdown through the run
// model.
//
// The inspect command shows every stage of the pipeline (runs, blocks, display runs) and is mostly
// useful when a document does not come back the way it went in.
//
// Converting:
//
// The conversion needs a to and from pair. The from can be auto-detected from the file extension,
// while being overwrittable by an explicit --from flag.
// Usage:
//  runmark <input> --to <format> [--from <format>] [--output <file>]  - Convert between formats (default)
//  runmark convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  runmark format <input>                   - Print the canonical Markdown for a file
//  runmark check <input>                    - Exit 1 when a file is not in canonical form
//  runmark inspect <path> [<transform>]     - Execute a transform (defaults to "blocks-tree")
//  runmark --list-transforms                - List available transforms
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the format/transform.
// Example:
//  runmark inspect doc.md blocks-tree --extra-include-runs
//
// Logging goes to stderr and is controlled by RUNMARK_LOG (default "warn").

use runmark_cli::transforms;

use clap::{Arg, ArgAction, Command, ValueHint};
use runmark::transforms::format_markdown_source_with;
use runmark::{FormatRegistry, ParseOptions, RenderOptions};
use runmark_config::{Loader, RunmarkConfig};
use std::collections::HashMap;
use std::fs;
use tracing_subscriber::prelude::*;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            // Check if the next arg is a value or another flag/end
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                // No value, treat as boolean flag
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("runmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting Markdown to and from rich-text runs")
        .long_about(
            "runmark is a command-line tool for the Markdown <-> run bridge.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (markdown, runs-json, ...)\n  \
            - format:  Print the canonical Markdown for a file\n  \
            - check:   Verify that a file survives the round trip unchanged\n  \
            - inspect: View internal representations (runs, blocks, display runs)\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            runmark inspect doc.md                    # View block tree\n  \
            runmark inspect doc.md runs-table         # View runs, one per line\n  \
            runmark doc.md --to runs-json             # Convert to runs (stdout)\n  \
            runmark check doc.md                      # Exit 1 unless canonical",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a runmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of a Markdown file")
                .long_about(
                    "View the run model of a Markdown file at different processing stages.\n\n\
                    Transforms (stage-format):\n  \
                    - runs-json:      Runs after quote-depth repair\n  \
                    - runs-raw-json:  Runs straight from the parser\n  \
                    - runs-table:     One run per line\n  \
                    - blocks-json:    Collected blocks as JSON\n  \
                    - blocks-tree:    Collected blocks as a tree (default)\n  \
                    - display-json:   Display runs with restored blank lines\n  \
                    - markdown:       Round-trip output\n\n\
                    Examples:\n  \
                    runmark inspect doc.md                              # Block tree\n  \
                    runmark inspect doc.md blocks-tree --extra-include-runs\n  \
                    runmark inspect doc.md runs-raw-json                # Before repair",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format). Defaults to 'blocks-tree'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown:     Markdown (.md)\n  \
                    - runs-json:    Run sequence as JSON (.json)\n  \
                    - display-json: Display runs (output only)\n  \
                    - treeviz:      Block tree (output only)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    runmark convert doc.md --to runs-json -o runs.json\n  \
                    runmark convert runs.json --to markdown\n  \
                    runmark doc.md --to treeviz                  # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Format a Markdown file")
                .long_about(
                    "Parse a Markdown file into runs and render it back, which yields\n\
                    its canonical form.\n\n\
                    Output is always written to stdout.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a Markdown file survives the round trip")
                .long_about(
                    "Exit with status 1 when rendering the parsed runs does not\n\
                    reproduce the file byte for byte, and report the first line\n\
                    that differs.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("RUNMARK_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file path means "convert"
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && !["inspect", "convert", "format", "check", "help"]
                    .contains(&cleaned_args[1].as_str())
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                fail("path is required");
            };
            let transform = sub_matches
                .get_one::<String>("transform")
                .cloned()
                .unwrap_or_else(|| config.inspect.default_transform.clone());
            handle_inspect_command(path, &transform, &extra_params, &config);
        }
        Some(("convert", sub_matches)) => {
            let (Some(input), Some(to)) = (
                sub_matches.get_one::<String>("input"),
                sub_matches.get_one::<String>("to"),
            ) else {
                fail("input and --to are required");
            };

            // Auto-detect --from if not provided
            let from = match sub_matches.get_one::<String>("from") {
                Some(from) => from.to_string(),
                None => {
                    let registry = FormatRegistry::default();
                    registry.detect_format_from_filename(input).unwrap_or_else(|| {
                        eprintln!("Error: Could not detect format from filename '{input}'");
                        fail("Please specify --from explicitly");
                    })
                }
            };

            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            handle_convert_command(input, &from, to, output, &extra_params, &config);
        }
        Some(("format", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("input is required");
            };
            handle_convert_command(input, "markdown", "markdown", None, &extra_params, &config);
        }
        Some(("check", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("input is required");
            };
            handle_check_command(input, &config);
        }
        _ => fail("Unknown subcommand. Use --help for usage information."),
    }
}

/// Print `message` on stderr and exit with status 1.
fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Error reading file '{path}': {e}")))
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &RunmarkConfig,
) {
    let source = read_source(path);
    let params = build_inspect_params(config, extra_params);

    let output = transforms::execute_transform(&source, transform, &params)
        .unwrap_or_else(|e| fail(&format!("Execution error: {e}")));

    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    from: &str,
    to: &str,
    output: Option<&str>,
    extra_params: &HashMap<String, String>,
    config: &RunmarkConfig,
) {
    let registry = FormatRegistry::default();

    // Validate formats exist
    for name in [from, to] {
        if let Err(e) = registry.get(name) {
            fail(&format!("Error: {e}"));
        }
    }

    let source = read_source(input);

    let parse_options = if from == "markdown" {
        markdown_parse_params(config)
    } else {
        HashMap::new()
    };
    let runs = registry
        .parse_with_options(&source, from, &parse_options)
        .unwrap_or_else(|e| fail(&format!("Parse error: {e}")));

    // Serialize (format-specific parameters allowed via --extra-*)
    let mut format_options = match to {
        "markdown" => markdown_render_params(config),
        "treeviz" => treeviz_params(config),
        _ => HashMap::new(),
    };
    for (key, value) in extra_params {
        format_options.insert(key.clone(), value.clone());
    }
    let result = registry
        .serialize_with_options(&runs, to, &format_options)
        .unwrap_or_else(|e| fail(&format!("Serialization error: {e}")));

    match output {
        Some(path) => fs::write(path, result)
            .unwrap_or_else(|e| fail(&format!("Error writing file '{path}': {e}"))),
        None => print!("{result}"),
    }
}

/// Handle the check command
fn handle_check_command(input: &str, config: &RunmarkConfig) {
    let source = read_source(input);
    let rendered = format_markdown_source_with(
        &source,
        &ParseOptions::from(&config.parse),
        &RenderOptions::from(&config.render),
    );

    match first_difference(&source, &rendered) {
        None => println!("{input}: stable"),
        Some(line) => {
            tracing::debug!(input, line, "round trip differs");
            fail(&format!("{input}: round trip differs at line {line}"));
        }
    }
}

/// 1-based number of the first line where `a` and `b` differ.
fn first_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let mut left = a.split_inclusive('\n');
    let mut right = b.split_inclusive('\n');
    let mut line = 1;
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) if x == y => line += 1,
            _ => return Some(line),
        }
    }
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  runs     - Run sequence produced by the parser");
    println!("  blocks   - Blocks collected from the runs");
    println!("  display  - Runs with restored blank lines");
    println!("  markdown - Round-trip output\n");

    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }

    println!("\nConversion formats:");
    let registry = FormatRegistry::default();
    for format_name in registry.list_formats() {
        println!("  {format_name}");
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> RunmarkConfig {
    let loader = Loader::new().with_optional_file("runmark.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| fail(&format!("Failed to load configuration: {err}")))
}

fn apply_config_overrides(config: &mut RunmarkConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["repair-quote-depth", "repair"]) {
        config.parse.repair_quote_depth = parse_bool_arg("repair-quote-depth", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["max-consecutive-newlines", "max-newlines"]) {
        config.render.max_consecutive_newlines = parse_usize_arg("max-consecutive-newlines", &raw);
    }
    if let Some(raw) = extra_params.remove("escape-line-starts") {
        config.render.escape_line_starts = parse_bool_arg("escape-line-starts", &raw);
    }
    if let Some(raw) = extra_params.remove("include-runs") {
        config.inspect.include_runs = parse_bool_arg("include-runs", &raw);
    }
}

fn markdown_parse_params(config: &RunmarkConfig) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert(
        "repair-quote-depth".to_string(),
        config.parse.repair_quote_depth.to_string(),
    );
    params
}

fn markdown_render_params(config: &RunmarkConfig) -> HashMap<String, String> {
    let mut params = HashMap::new();
    params.insert(
        "max-consecutive-newlines".to_string(),
        config.render.max_consecutive_newlines.to_string(),
    );
    params.insert(
        "escape-line-starts".to_string(),
        config.render.escape_line_starts.to_string(),
    );
    params
}

fn treeviz_params(config: &RunmarkConfig) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if config.inspect.include_runs {
        params.insert("include-runs".to_string(), "true".to_string());
    }
    params
}

fn build_inspect_params(
    config: &RunmarkConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = markdown_parse_params(config);
    params.extend(markdown_render_params(config));
    params.extend(treeviz_params(config));

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => fail(&format!("Invalid boolean value '{other}' for --extra-{flag}")),
    }
}

fn parse_usize_arg(flag: &str, raw: &str) -> usize {
    raw.parse()
        .unwrap_or_else(|_| fail(&format!("Invalid number '{raw}' for --extra-{flag}")))
}
