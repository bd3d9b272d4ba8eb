//! CLI entrypoint for the printkit conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use printkit_core::config::SafetyLevel;
use printkit_core::stdio::{Arg, str_pad, vasprintf_with_level, vsnprintf_with_level};
use printkit_harness::capture::{builtin_vectors, capture_fixture_set};
use printkit_harness::fixtures::{load_fixture_sets, parse_cli_arg};
use printkit_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, now_utc,
};
use printkit_harness::{ConformanceReport, TestRunner};

/// Conformance tooling for printkit.
#[derive(Debug, Parser)]
#[command(name = "harness")]
#[command(about = "Conformance testing harness for printkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the formatter against fixture files.
    Verify {
        /// Fixture JSON file or directory of fixture files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown); JSON is written alongside.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Mode to run (`strict`, `hardened`, or `both`).
        #[arg(long, default_value = "both")]
        mode: String,
        /// Run identifier used in trace ids.
        #[arg(long, default_value = "local")]
        run_id: String,
    },
    /// Capture host snprintf behavior for the built-in vectors.
    Capture {
        /// Output fixture path.
        #[arg(long)]
        output: PathBuf,
        /// Optional fixed timestamp for deterministic output.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Render one template and print the result.
    Render {
        /// printf template.
        #[arg(long)]
        format: String,
        /// Argument as `int:N`, `uint:N`, `char:C`, `str:TEXT`, `null` or `ptr:N`.
        #[arg(long = "arg", allow_hyphen_values = true)]
        args: Vec<String>,
        /// Buffer size; omit for an unbounded rendering.
        #[arg(long)]
        capacity: Option<usize>,
        /// Runtime mode (`strict` or `hardened`).
        #[arg(long, default_value = "strict")]
        mode: String,
    },
    /// Print a padded copy of a string and its length.
    Pad {
        /// Text to pad; omitted means empty.
        #[arg(long)]
        text: Option<String>,
        /// Fill byte.
        #[arg(long, default_value_t = 'a')]
        fill: char,
        /// Pad amount; negative pads on the left.
        #[arg(long, default_value_t = 100, allow_hyphen_values = true)]
        count: isize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            log,
            mode,
            run_id,
        } => {
            let modes: Vec<&str> = match mode.as_str() {
                "both" => vec!["strict", "hardened"],
                "strict" | "hardened" => vec![mode.as_str()],
                other => {
                    return Err(
                        format!("Unsupported mode '{other}', expected strict|hardened|both").into(),
                    );
                }
            };
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let fixture_sets = load_fixture_sets(&fixture)?;

            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "verify", &run_id)?),
                None => None,
            };
            if let Some(emitter) = emitter.as_mut() {
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Info, "run_start")
                        .with_details(serde_json::json!({ "fixture_sets": fixture_sets.len() })),
                )?;
            }

            let mut results = Vec::new();
            for active in &modes {
                let runner = TestRunner::new("fixture-verify", *active);
                for (path, set) in &fixture_sets {
                    eprintln!("  {} [{active}]: {} cases", path.display(), set.cases.len());
                    results.extend(runner.run(set));
                }
            }

            if let Some(emitter) = emitter.as_mut() {
                for r in &results {
                    let outcome = if r.passed { Outcome::Pass } else { Outcome::Fail };
                    let level = if r.passed { LogLevel::Info } else { LogLevel::Error };
                    let mut entry = LogEntry::new("", level, "case_result")
                        .with_mode(r.mode.clone())
                        .with_symbol("vsnprintf")
                        .with_case(r.case_name.clone())
                        .with_outcome(outcome)
                        .with_latency_ns(r.latency_ns);
                    if let Some(diff) = &r.diff {
                        entry = entry.with_details(serde_json::json!({ "diff": diff }));
                    }
                    emitter.emit_entry(entry)?;
                }
            }

            let report_doc = ConformanceReport::new("printkit Conformance Report", mode.clone(), results);
            eprintln!(
                "Verification complete: total={}, passed={}, failed={}, host_mismatches={}",
                report_doc.summary.total,
                report_doc.summary.passed,
                report_doc.summary.failed,
                report_doc.summary.host_mismatches
            );

            let mut artifacts = Vec::new();
            if let Some(report_path) = &report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(report_path, report_doc.to_markdown())?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json()?)?;
                artifacts.push((report_path.clone(), "report_md"));
                artifacts.push((json_path, "report_json"));
            }

            if let (Some(mut emitter), Some(log_path)) = (emitter, log) {
                let outcome = if report_doc.is_clean() { Outcome::Pass } else { Outcome::Fail };
                emitter.emit_entry(
                    LogEntry::new("", LogLevel::Info, "run_end")
                        .with_outcome(outcome)
                        .with_artifacts(
                            artifacts
                                .iter()
                                .map(|(p, _)| p.display().to_string())
                                .collect::<Vec<_>>(),
                        )
                        .with_details(serde_json::to_value(report_doc.summary)?),
                )?;
                emitter.flush()?;
                drop(emitter);

                let mut index = ArtifactIndex::new(run_id);
                index.add_file(&log_path, "log")?;
                for (path, kind) in &artifacts {
                    index.add_file(path, *kind)?;
                }
                let index_path = log_path.with_extension("index.json");
                std::fs::write(&index_path, index.to_json()?)?;
                eprintln!("Wrote artifact index to {}", index_path.display());
            }

            if !report_doc.is_clean() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Capture { output, timestamp } => {
            eprintln!("Capturing host snprintf fixtures to {}", output.display());
            let captured_at = timestamp.unwrap_or_else(now_utc);
            let (set, skipped) = capture_fixture_set(&builtin_vectors(), captured_at);
            for (name, reason) in &skipped {
                eprintln!("Skipping {name}: {reason}");
            }
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, set.to_json()?)?;
            eprintln!("Captured {} cases", set.cases.len());
        }
        Command::Render {
            format,
            args,
            capacity,
            mode,
        } => {
            let level = printkit_conformance::parse_mode(&mode)?;
            let fixture_args = args
                .iter()
                .map(String::as_str)
                .map(parse_cli_arg)
                .collect::<Result<Vec<_>, _>>()?;
            let core_args: Vec<Arg<'_>> = fixture_args.iter().map(|a| a.to_arg()).collect();
            render(format.as_bytes(), &core_args, capacity, level)?;
        }
        Command::Pad { text, fill, count } => {
            let fill = u8::try_from(fill).map_err(|_| format!("fill '{fill}' is not a single byte"))?;
            let padded = str_pad(text.as_deref().map(str::as_bytes), fill, count);
            printkit_core::printf!("len = %d;\n%s\n", padded.len(), padded.as_bytes())?;
        }
    }

    Ok(())
}

fn render(
    fmt: &[u8],
    args: &[Arg<'_>],
    capacity: Option<usize>,
    level: SafetyLevel,
) -> Result<(), Box<dyn std::error::Error>> {
    match capacity {
        Some(cap) => {
            let mut buf = vec![0u8; cap];
            let total = vsnprintf_with_level(&mut buf, fmt, args, level)?;
            let stored = total.min(cap.saturating_sub(1));
            println!("{}", String::from_utf8_lossy(&buf[..stored]).escape_debug());
            eprintln!("returned {total} (capacity {cap}, truncated: {})", total >= cap);
        }
        None => {
            let out = vasprintf_with_level(fmt, args, level)?;
            println!("{}", String::from_utf8_lossy(&out).escape_debug());
            eprintln!("returned {}", out.len());
        }
    }
    Ok(())
}
