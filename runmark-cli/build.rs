use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &[
    "runs-json",
    "runs-raw-json",
    "runs-table",
    "blocks-json",
    "blocks-tree",
    "display-json",
    "markdown",
];

fn file_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("runmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting Markdown to and from rich-text runs")
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Path to a runmark.toml configuration file")
                .value_hint(ValueHint::FilePath),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect internal representations of a Markdown file")
                .arg(file_arg("path", "Path to the Markdown file"))
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply (stage-format)")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats")
                .arg(file_arg("input", "Input file path"))
                .arg(Arg::new("from").long("from").help("Source format"))
                .arg(Arg::new("to").long("to").help("Target format"))
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Format a Markdown file")
                .arg(file_arg("input", "Input file path")),
        )
        .subcommand(
            Command::new("check")
                .about("Check that a Markdown file survives the round trip")
                .arg(file_arg("input", "Input file path")),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "runmark", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "runmark", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "runmark", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
