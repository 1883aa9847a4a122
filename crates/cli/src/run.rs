//! `swapmatch run` and `swapmatch validate`: the file boundary around the engine.

use std::path::{Path, PathBuf};

use tracing::info;

use swapmatch_recon::export::write_matches_csv;
use swapmatch_recon::{concat_sources, parse_source, MatchConfig, SwapBatch};

use crate::exit_codes::{EXIT_MATCH_INVALID_CONFIG, EXIT_MATCH_NO_INPUT, EXIT_MATCH_RUNTIME};
use crate::CliError;

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub json: bool,
}

fn runtime_err(msg: impl Into<String>) -> CliError {
    CliError::new(EXIT_MATCH_RUNTIME, msg)
}

/// Read and validate a config file. Returns the config and the directory
/// relative paths in it resolve against.
fn load_config(config_path: Option<&Path>) -> Result<(MatchConfig, PathBuf), CliError> {
    let Some(path) = config_path else {
        return Ok((MatchConfig::default(), PathBuf::from(".")));
    };

    let config_str = std::fs::read_to_string(path)
        .map_err(|e| runtime_err(format!("cannot read config {}: {e}", path.display())))?;
    let config = MatchConfig::from_toml(&config_str).map_err(CliError::engine)?;

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((config, base_dir))
}

/// Input files in `dir` whose names match `pattern`, sorted by name so the
/// concatenation order does not depend on directory iteration order.
pub fn discover_inputs(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, CliError> {
    let pattern = glob::Pattern::new(pattern).map_err(|e| {
        CliError::new(
            EXIT_MATCH_INVALID_CONFIG,
            format!("invalid input pattern {pattern:?}: {e}"),
        )
    })?;

    let entries = std::fs::read_dir(dir)
        .map_err(|e| runtime_err(format!("cannot read input directory {}: {e}", dir.display())))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| runtime_err(e.to_string()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| pattern.matches(n));
        if matches {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn load_batch(paths: &[PathBuf]) -> Result<SwapBatch, CliError> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let data = std::fs::read_to_string(path)
            .map_err(|e| runtime_err(format!("cannot read {}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let table = parse_source(&name, &data).map_err(CliError::engine)?;
        sources.push(table);
    }
    Ok(concat_sources(sources))
}

fn write_file(path: &Path, contents: impl FnOnce(std::fs::File) -> Result<(), CliError>) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            runtime_err(format!("cannot create output directory {}: {e}", parent.display()))
        })?;
    }
    let file = std::fs::File::create(path)
        .map_err(|e| runtime_err(format!("cannot write {}: {e}", path.display())))?;
    contents(file)
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let (config, base_dir) = load_config(args.config.as_deref())?;

    let input_dir = args
        .input_dir
        .unwrap_or_else(|| base_dir.join(&config.input.dir));
    let output_dir = base_dir.join(&config.output.dir);
    let output_path = args
        .output
        .unwrap_or_else(|| output_dir.join(&config.output.file));
    let summary_path = args.summary.or_else(|| {
        config
            .output
            .summary_json
            .as_ref()
            .map(|name| output_dir.join(name))
    });

    let paths = discover_inputs(&input_dir, &config.input.pattern)?;
    if paths.is_empty() {
        return Err(CliError::new(
            EXIT_MATCH_NO_INPUT,
            format!(
                "no files matching {:?} in {}",
                config.input.pattern,
                input_dir.display()
            ),
        )
        .with_hint("pass --input-dir or set input.dir in the config"));
    }
    info!(files = paths.len(), dir = %input_dir.display(), "loading candidate sources");

    let batch = load_batch(&paths)?;
    let result = swapmatch_recon::run(&config, &batch);

    write_file(&output_path, |file| {
        write_matches_csv(&batch.columns, &result.matches, file).map_err(CliError::engine)
    })?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| runtime_err(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = summary_path {
        write_file(path, |mut file| {
            use std::io::Write;
            file.write_all(json_str.as_bytes())
                .map_err(|e| runtime_err(format!("cannot write {}: {e}", path.display())))
        })?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "{} candidates from {} file(s): {} admitted, {} rejected; {} uncontended, {} contended → {} resolved",
        s.input_rows,
        paths.len(),
        s.admitted,
        s.rejected,
        s.uncontended,
        s.contended,
        s.resolved_accepted,
    );
    eprintln!(
        "saved {} matches to {}",
        s.final_matches,
        output_path.display()
    );

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, _) = load_config(Some(config_path.as_path()))?;
    let t = &config.thresholds;
    eprintln!(
        "valid: '{}' margin={} max_time={}s tight_margin={} fast_time={}s input={}/{}",
        config.name,
        t.margin,
        t.max_time_secs,
        t.tight_margin,
        t.fast_time_secs,
        config.input.dir,
        config.input.pattern,
    );
    Ok(())
}
