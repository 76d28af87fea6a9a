// Command tree shared by the binary and build.rs (which generates shell completions
// from it through `include!`), so it can only depend on clap.

use clap::{Arg, ArgAction, Command, ValueHint};

pub fn build_cli() -> Command {
    Command::new("mdx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate structured document trees into MDX")
        .long_about(
            "mdx turns document trees exported by a structured-text compiler into MDX files.\n\n\
            Commands:\n  \
            - build:   Translate every document of a bundle, copy assets, write the manifest\n  \
            - convert: Translate a single tree (outputs to stdout by default)\n  \
            - sidebar: Print the navigation manifest of a bundle\n\n\
            Examples:\n  \
            mdx build docs.json --out site/docs        # Full build\n  \
            mdx convert page.json                      # One tree to stdout\n  \
            mdx convert page.json --to json -o ir.json # Dump the target tree\n  \
            mdx sidebar docs.json                      # Preview the sidebar",
        )
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an mdx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log progress (-v) or everything (-vv) to stderr")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Translate a document bundle into an output directory")
                .long_about(
                    "Translate every document of a JSON bundle.\n\n\
                    One file is written per document, assets referenced by images and\n\
                    downloads are copied under the assets directory, and the sidebar\n\
                    manifest is written under the output root.\n\n\
                    A document that fails to translate is reported and skipped; the\n\
                    command then exits with status 1 after writing everything else.",
                )
                .arg(bundle_arg())
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_name("DIR")
                        .help("Output root")
                        .required(true)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("source-dir")
                        .long("source-dir")
                        .value_name("DIR")
                        .help("Root the document sources and assets live in (defaults to the bundle's directory)")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("jobs")
                        .long("jobs")
                        .short('j')
                        .value_name("N")
                        .help("Worker threads (0 uses every core)")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .help("Output format (see --list-formats)")
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Translate a single source tree")
                .arg(
                    Arg::new("input")
                        .help("JSON source tree")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (detected from --output, else mdx)")
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
            Command::new("sidebar")
                .about("Print the navigation manifest of a bundle")
                .arg(bundle_arg()),
        )
}

fn bundle_arg() -> Arg {
    Arg::new("bundle")
        .help("JSON document bundle")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}
