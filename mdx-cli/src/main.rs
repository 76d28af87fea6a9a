// Command-line interface for mdx-babel
//
// The mdx program takes the document trees an upstream compiler exported as JSON and turns
// them into MDX. All the work happens in the mdx-babel crate; this binary only wires
// configuration, logging and file access around it.
//
// Usage:
//  mdx build <bundle.json> --out <dir> [--source-dir <dir>] [--jobs N]  - Translate a whole bundle
//  mdx convert <tree.json> [--to <format>] [--output <file>]            - Translate a single tree
//  mdx sidebar <bundle.json>                                            - Print the navigation manifest
//  mdx --list-formats                                                   - List output formats
//
// Configuration comes from the embedded defaults, an `mdx.toml` in the working directory
// and `--config <path>`, in that order. Command-line flags win over all of them.
//
// Logging goes to stderr. `-v` shows progress, `-vv` everything; RUST_LOG overrides both.

mod cli;

use clap::ArgMatches;
use cli::build_cli;
use mdx_babel::paths::Pathfinder;
use mdx_babel::sidebar::{self, Manifest};
use mdx_babel::source::{DocumentSet, SourceNode};
use mdx_babel::translate::Environment;
use mdx_babel::{build, BuildSpec, FormatRegistry};
use mdx_config::{Loader, MdxConfig, LOCAL_CONFIG};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    init_logging(matches.get_count("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("build", sub_matches)) => {
            let config = load_cli_config(config_path, sub_matches);
            handle_build_command(sub_matches, config);
        }
        Some(("convert", sub_matches)) => {
            let config = load_cli_config(config_path, sub_matches);
            handle_convert_command(sub_matches, config);
        }
        Some(("sidebar", sub_matches)) => {
            let config = load_cli_config(config_path, sub_matches);
            handle_sidebar_command(sub_matches, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the build command
fn handle_build_command(matches: &ArgMatches, config: MdxConfig) {
    let bundle_path = required(matches, "bundle");
    let documents = read_bundle(bundle_path);
    let out = PathBuf::from(required(matches, "out"));
    let source_dir = matches
        .get_one::<String>("source-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| bundle_dir(bundle_path));

    let pathfinder = Pathfinder::new(source_dir, &out).with_options((&config.output).into());
    let spec = BuildSpec::new(&documents, pathfinder)
        .with_options(config.translate.into())
        .with_format(config.output.format)
        .with_jobs(config.build.jobs)
        .with_manifest(Some(config.output.manifest))
        .with_project(config.build.project_name)
        .with_root_doc(config.build.root_doc);

    let report = build(spec).unwrap_or_else(|e| {
        eprintln!("Build failed: {e}");
        std::process::exit(1);
    });

    println!(
        "Wrote {} document(s) and {} asset(s) to {}",
        report.written.len(),
        report.copied_assets,
        out.display()
    );
    for failure in &report.failed {
        eprintln!("Error in '{}': {}", failure.id, failure.error);
    }
    for failure in &report.copy_failures {
        eprintln!(
            "Could not copy '{}': {}",
            failure.source.display(),
            failure.error
        );
    }
    if !report.is_success() {
        std::process::exit(1);
    }
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: MdxConfig) {
    let input = required(matches, "input");
    let output = matches.get_one::<String>("output").map(|s| s.as_str());
    let registry = FormatRegistry::default();

    let to = match (matches.get_one::<String>("to"), output) {
        (Some(to), _) => to.clone(),
        (None, Some(path)) => registry
            .detect_format_from_filename(path)
            .unwrap_or_else(|| "mdx".to_string()),
        (None, None) => "mdx".to_string(),
    };
    if let Err(e) = registry.get(&to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = read_file(input);
    let tree: SourceNode = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Invalid source tree in '{input}': {e}");
        std::process::exit(1);
    });

    let input_path = Path::new(input);
    let doc_id = input_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index".to_string());
    let output_root = output
        .and_then(|path| Path::new(path).parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let pathfinder =
        Pathfinder::new(bundle_dir(input), output_root).with_options((&config.output).into());
    let env = Environment::new(pathfinder).with_options(config.translate.into());

    let doc = env.translate(&doc_id, None, &tree).unwrap_or_else(|e| {
        eprintln!("Translation error: {e}");
        std::process::exit(1);
    });
    let text = registry.serialize(&doc, &to).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match output {
        Some(path) => {
            fs::write(path, text).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{text}"),
    }
}

/// Handle the sidebar command
fn handle_sidebar_command(matches: &ArgMatches, config: &MdxConfig) {
    let bundle_path = required(matches, "bundle");
    let documents = read_bundle(bundle_path);
    let pathfinder =
        Pathfinder::new(bundle_dir(bundle_path), ".").with_options((&config.output).into());

    let root = config
        .build
        .root_doc
        .as_deref()
        .unwrap_or(documents.root());
    let items = sidebar::project(root, &documents, &pathfinder);
    let project = config
        .build
        .project_name
        .clone()
        .or_else(|| documents.project().map(str::to_string));
    let yaml = Manifest::new(project, items).to_yaml().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
    print!("{yaml}");
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Output formats:\n");
    let registry = FormatRegistry::default();
    for name in registry.list_formats() {
        let description = registry.get(&name).map(|f| f.description()).unwrap_or("");
        println!("  {name:<8}{description}");
    }
}

fn load_cli_config(explicit_path: Option<&str>, matches: &ArgMatches) -> MdxConfig {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = explicit_path {
        loader = loader.with_file(path);
    }
    apply_cli_overrides(loader, matches)
        .and_then(Loader::build)
        .unwrap_or_else(|err| {
            eprintln!("Failed to load configuration: {err}");
            std::process::exit(1);
        })
}

/// Flags of the build command take precedence over every configuration file.
fn apply_cli_overrides(
    mut loader: Loader,
    matches: &ArgMatches,
) -> Result<Loader, mdx_config::ConfigError> {
    let has = |id: &str| matches.try_contains_id(id).unwrap_or(false);
    if has("jobs") {
        if let Some(jobs) = matches.get_one::<u32>("jobs") {
            loader = loader.set_override("build.jobs", u64::from(*jobs))?;
        }
    }
    if has("format") {
        if let Some(format) = matches.get_one::<String>("format") {
            loader = loader.set_override("output.format", format.as_str())?;
        }
    }
    Ok(loader)
}

fn required<'m>(matches: &'m ArgMatches, id: &str) -> &'m str {
    matches
        .get_one::<String>(id)
        .map(|s| s.as_str())
        .unwrap_or_else(|| {
            eprintln!("Missing required argument '{id}'");
            std::process::exit(1);
        })
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn read_bundle(path: &str) -> DocumentSet {
    DocumentSet::from_json(&read_file(path)).unwrap_or_else(|e| {
        eprintln!("Invalid document bundle '{path}': {e}");
        std::process::exit(1);
    })
}

fn bundle_dir(path: &str) -> PathBuf {
    Path::new(path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}
