/// Interactive flux processing console

use fluxprep::map::draw_quality_map;
use fluxprep::*;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

/// Command completer for the REPL
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new() -> Self {
        Self {
            commands: vec![
                "clear",
                "config",
                "exit",
                "export",
                "help",
                "info",
                "load",
                "map",
                "open",
                "protection",
                "quit",
                "read",
                "read-disk",
                "track",
                "tracks",
            ],
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Only complete the first word (command name)
        let line_to_cursor = &line[..pos];
        if line_to_cursor.contains(' ') {
            return Ok((pos, vec![]));
        }

        let prefix = line_to_cursor.to_lowercase();
        let matches: Vec<Pair> = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(&prefix))
            .map(|cmd| Pair {
                display: cmd.to_string(),
                replacement: cmd.to_string(),
            })
            .collect();

        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}
impl Validator for CommandCompleter {}
impl Helper for CommandCompleter {}

/// Get the path to the history file
fn history_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|mut p| {
        p.push(".fluxprep_history");
        p
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fluxprep=info")),
        )
        .init();

    println!("=== fluxprep ===");
    println!("Interactive console for processing floppy flux captures.");
    println!("Type 'help' for available commands\n");

    let mut rl = Editor::new().expect("Failed to create editor");
    rl.set_helper(Some(CommandCompleter::new()));

    if let Some(history_path) = history_path() {
        let _ = rl.load_history(&history_path);
    }

    let mut config = match ProcessorConfig::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {} (using defaults)", e);
            ProcessorConfig::default()
        }
    };
    let mut reader: Option<DiskReader<CaptureFileSource>> = None;
    let mut buffer = DiskBuffer::with_sides(config.sides);

    loop {
        let input = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        };

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let _ = rl.add_history_entry(input);

        let parts = parse_command_line(input);
        if parts.is_empty() {
            continue;
        }
        let command = parts[0].to_lowercase();

        match command.as_str() {
            "help" => {
                print_help();
            }
            "quit" | "exit" => {
                if let Some(history_path) = history_path() {
                    let _ = rl.save_history(&history_path);
                }
                println!("Goodbye!");
                break;
            }
            "open" | "load" => {
                if parts.len() < 2 {
                    println!("Usage: open <capture>");
                    continue;
                }
                match CaptureFileSource::open(&parts[1]) {
                    Ok(source) => {
                        println!(
                            "Opened: {} ({} positions captured)",
                            parts[1],
                            source.positions().len()
                        );
                        reader = Some(DiskReader::new(source, config.clone()));
                        // A new capture is a new disk session
                        buffer = DiskBuffer::with_sides(config.sides);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "config" => {
                if parts.len() > 1 {
                    match ProcessorConfig::load(&parts[1]) {
                        Ok(loaded) => {
                            config = loaded;
                            println!("Configuration loaded. Re-open the capture to apply it.");
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                } else {
                    match config.to_toml_string() {
                        Ok(text) => print!("{}", text),
                        Err(e) => println!("Error: {}", e),
                    }
                }
            }
            "read" => {
                let Some(ref mut rdr) = reader else {
                    println!("No capture loaded. Use 'open <path>' first.");
                    continue;
                };
                if parts.len() < 3 {
                    println!("Usage: read <track> <side>");
                    continue;
                }
                let (Some(track), Some(side)) = (parse_u8(&parts[1]), parse_u8(&parts[2])) else {
                    println!("Track and side must be numbers.");
                    continue;
                };
                match rdr.read_track(track, side, &mut buffer) {
                    Ok((quality, retried)) => {
                        let retry_note = if retried { " after retry" } else { "" };
                        println!("Track {}/{}: {:.1}%{}", track, side, quality, retry_note);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "read-disk" => {
                let Some(ref mut rdr) = reader else {
                    println!("No capture loaded. Use 'open <path>' first.");
                    continue;
                };
                match rdr.read_disk(&mut buffer) {
                    Ok(report) => {
                        println!(
                            "Read {} tracks ({} retried, {} missing)",
                            report.tracks_read,
                            report.retries,
                            report.missing.len()
                        );
                        print_info(&buffer);
                    }
                    Err(e) => println!("Error: {}", e),
                }
            }
            "info" => {
                print_info(&buffer);
            }
            "tracks" => {
                list_tracks(&buffer);
            }
            "track" => {
                if parts.len() < 3 {
                    println!("Usage: track <track> <side>");
                    continue;
                }
                match (parse_u8(&parts[1]), parse_u8(&parts[2])) {
                    (Some(track), Some(side)) => print_track(&buffer, track, side),
                    _ => println!("Track and side must be numbers."),
                }
            }
            "protection" => {
                list_protection(&buffer);
            }
            "map" => {
                draw_quality_map(&buffer, config.retry_quality_threshold);
            }
            "export" => match buffer.to_json() {
                Ok(json) => {
                    if parts.len() > 1 {
                        match std::fs::write(&parts[1], json) {
                            Ok(()) => println!("Exported {} tracks to {}", buffer.len(), parts[1]),
                            Err(e) => println!("Error: {}", e),
                        }
                    } else {
                        println!("{}", json);
                    }
                }
                Err(e) => println!("Error: {}", e),
            },
            "clear" => {
                buffer.clear();
                println!("Buffer cleared.");
            }
            _ => {
                println!("Unknown command: {}. Type 'help' for available commands.", command);
            }
        }
    }
}

fn parse_command_line(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
            }
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => {
                current.push(ch);
            }
        }
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

fn parse_u8(s: &str) -> Option<u8> {
    s.parse().ok()
}

fn print_help() {
    println!("Available commands:");
    println!("  open <path>                    - Open a capture file (use quotes for paths with spaces)");
    println!("  config [path]                  - Show the configuration or load one from a TOML file");
    println!("  read <track> <side>            - Process one track (retried if quality is low)");
    println!("  read-disk                      - Process every configured track and side");
    println!("  info                           - Show disk summary");
    println!("  tracks                         - List buffered tracks");
    println!("  track <track> <side>           - Show details of a buffered track");
    println!("  protection                     - List tracks with copy protection findings");
    println!("  map                            - Visual quality map (white=good, red=poor)");
    println!("  export [path]                  - Export buffer as JSON (prints if no path)");
    println!("  clear                          - Discard all buffered tracks");
    println!("  help                           - Show this help");
    println!("  quit, exit                     - Exit");
}

fn print_info(buffer: &DiskBuffer) {
    let info = buffer.disk_info();
    println!("Format: {}", info.format);
    println!("Sides: {}", info.sides);
    println!("Total tracks: {}", info.total_tracks);
    println!("Buffered: {}", buffer.len());
    println!("Average quality: {:.1}%", info.quality_avg);
}

fn sorted_results(buffer: &DiskBuffer) -> Vec<&ProcessingResult> {
    let mut results: Vec<_> = buffer.results().collect();
    results.sort_by_key(|r| (r.side, r.track));
    results
}

fn list_tracks(buffer: &DiskBuffer) {
    if buffer.is_empty() {
        println!("No tracks buffered.");
        return;
    }
    println!(
        "{:<6} {:<5} {:<14} {:<8} {:<5} {:<9} {:<18}",
        "Track", "Side", "Format", "Quality", "Revs", "Warnings", "Protection"
    );
    println!("{}", "-".repeat(69));

    for result in sorted_results(buffer) {
        println!(
            "{:<6} {:<5} {:<14} {:<8.1} {:<5} {:<9} {:<18}",
            result.track,
            result.side,
            result.format.name(),
            result.quality_score,
            result.raw_flux.revolution_count(),
            result.warnings.len(),
            result.protection.kind.name()
        );
    }
}

fn print_track(buffer: &DiskBuffer, track: u8, side: u8) {
    let Some(result) = buffer.get(track, side) else {
        println!("Track {}/{} not in buffer.", track, side);
        return;
    };

    println!("Track {}/{}", result.track, result.side);
    println!("Format: {}", result.format);
    println!("Quality: {:.1}%", result.quality_score);
    println!("Protection: {}", result.protection);
    println!(
        "{:<6} {:<10} {:<10} {:<8}",
        "Rev", "Samples", "RPM", "Index"
    );
    println!("{}", "-".repeat(37));
    for rev in result.raw_flux.revolutions() {
        println!(
            "{:<6} {:<10} {:<10.2} {:<8}",
            rev.ordinal,
            rev.sample_count(),
            rev.rpm,
            rev.index_ticks
        );
    }
    println!(
        "{:<6} {:<10} {:<10.2} {:<8}",
        "cons",
        result.consensus.sample_count(),
        result.consensus.rpm,
        result.consensus.index_ticks
    );

    if result.warnings.is_empty() {
        println!("No warnings.");
    } else {
        println!("Warnings ({}):", result.warnings.len());
        for warning in result.warnings.iter().take(20) {
            println!("  {}", warning);
        }
        if result.warnings.len() > 20 {
            println!("  ... {} more", result.warnings.len() - 20);
        }
    }
}

fn list_protection(buffer: &DiskBuffer) {
    let protected: Vec<_> = sorted_results(buffer)
        .into_iter()
        .filter(|r| r.protection.is_protected())
        .collect();

    if protected.is_empty() {
        println!("No protection detected.");
        return;
    }
    for result in protected {
        println!("T{}/S{}: {}", result.track, result.side, result.protection);
    }
}
