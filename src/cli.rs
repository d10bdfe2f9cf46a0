use anyhow::{Result, anyhow};
use pico_args::Arguments;
use std::env;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::analyzer::{self, StrokeAnalyzer};
use crate::config::AlphabetStore;
use crate::input;
use crate::recorder;
use crate::report;
use crate::session::PracticeState;
use crate::stroke::{Mode, PracticeSession};

pub fn run() -> Result<()> {
    let mut pargs = Arguments::from_env();

    // No args -> general help
    if env::args().len() == 1 {
        print_help();
        return Ok(());
    }

    // Flags-based help (-h/--help)
    if pargs.contains("-h") || pargs.contains("--help") {
        print_help();
        return Ok(());
    }

    // First free arg is the subcommand
    let subcmd: Option<String> = pargs.free_from_str().ok();

    match subcmd.as_deref() {
        Some("help") => {
            let topic: Option<String> = pargs.free_from_str().ok();
            if let Some(t) = topic {
                print_subcmd_help(&t);
            } else {
                print_help();
            }
            Ok(())
        }

        Some("analyze") => cmd_analyze(pargs),
        Some("practice") => cmd_practice(pargs),
        Some("record") => cmd_record(pargs),
        Some("letters") => cmd_letters(),
        Some("list") => cmd_list(),
        Some("use") => cmd_use(pargs),
        Some("doctor") => cmd_doctor(),

        Some(other) => {
            eprintln!("unknown subcommand: {other}\n");
            print_help();
            Ok(())
        }

        None => {
            print_help();
            Ok(())
        }
    }
}

fn cmd_analyze(mut pargs: Arguments) -> Result<()> {
    let json = pargs.contains("--json");
    let stroke_ix: Option<usize> = pargs.opt_value_from_str("--stroke")?;
    let path: String = pargs
        .free_from_str()
        .map_err(|_| anyhow!("usage: inkcoach analyze <session.json> [--stroke N] [--json]"))?;

    let session = PracticeSession::load(&path)?;
    let word = normalized_word(&session.word)?;
    let ix = stroke_ix.unwrap_or_else(|| session.strokes.len().saturating_sub(1));
    let stroke = session.strokes.get(ix).ok_or_else(|| {
        anyhow!(
            "session has {} stroke(s); stroke {ix} does not exist",
            session.strokes.len()
        )
    })?;

    let store = AlphabetStore::load_or_install_default()?;
    let mut analyzer = StrokeAnalyzer::new(store.alphabet.clone());
    let result = analyzer.analyze(stroke, &word, session.mode)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{word} ({} mode), stroke {ix}", session.mode.as_str());
        print!("{}", report::render(&result, None));
    }
    Ok(())
}

fn cmd_practice(mut pargs: Arguments) -> Result<()> {
    let json = pargs.contains("--json");
    let path: String = pargs
        .free_from_str()
        .map_err(|_| anyhow!("usage: inkcoach practice <session.json> [--json]"))?;

    let session = PracticeSession::load(&path)?;
    let word = normalized_word(&session.word)?;
    if session.strokes.is_empty() {
        return Err(anyhow!("session contains no strokes"));
    }

    let store = AlphabetStore::load_or_install_default()?;
    let mut analyzer = StrokeAnalyzer::new(store.alphabet.clone());
    let mut state = PracticeState::new(&word, session.mode)?;

    for (i, stroke) in session.strokes.iter().enumerate() {
        let result = state.on_stroke(&mut analyzer, stroke)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("stroke {}/{}", i + 1, session.strokes.len());
            print!("{}", report::render(&result, Some(state.current_letter())));
            println!();
        }
    }

    if !json {
        println!(
            "finished on letter {} of {} ({} in {} mode)",
            state.current_letter() + 1,
            state.word().len(),
            state.word(),
            state.mode().as_str()
        );
        if let Some(last) = state.latest() {
            println!("final overall: {:.0}%", last.overall_score);
        }
    }
    Ok(())
}

fn cmd_record(mut pargs: Arguments) -> Result<()> {
    let usage = "usage: inkcoach record <out.json> --word WORD [--mode trace|write] [--device PATH]";
    let word_raw: String = pargs.value_from_str("--word").map_err(|_| anyhow!(usage))?;
    let mode: Mode = pargs.opt_value_from_str("--mode")?.unwrap_or(Mode::Trace);
    let device: Option<String> = pargs.opt_value_from_str("--device")?;
    let out: String = pargs.free_from_str().map_err(|_| anyhow!(usage))?;
    let word = normalized_word(&word_raw)?;

    let stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;

    let strokes = recorder::capture_strokes(device.as_deref(), &stop)?;
    if strokes.is_empty() {
        return Err(anyhow!("no strokes captured; nothing written"));
    }

    let session = PracticeSession { word, mode, strokes };
    session.save(&out)?;
    println!(
        "wrote {} stroke(s) for '{}' to {out}",
        session.strokes.len(),
        session.word
    );
    Ok(())
}

fn cmd_letters() -> Result<()> {
    let store = AlphabetStore::load_or_install_default()?;
    println!(
        "alphabet '{}' ({})",
        store.active_name, store.alphabet.name
    );
    for c in store.alphabet.covered() {
        if let Some(p) = store.alphabet.profile(c) {
            println!("  {c}  {}", p.directions);
        }
    }
    let missing = store.alphabet.missing_letters();
    if !missing.is_empty() {
        let missing: String = missing.into_iter().collect();
        println!("no profile (direction score falls back to 70): {missing}");
    }
    Ok(())
}

fn cmd_list() -> Result<()> {
    let store = AlphabetStore::load_or_install_default()?;
    for name in store.list_alphabets() {
        let marker = if name == store.active_name { "*" } else { " " };
        println!("{marker} {name}");
    }
    Ok(())
}

fn cmd_use(mut pargs: Arguments) -> Result<()> {
    let name: String = pargs
        .free_from_str()
        .map_err(|_| anyhow!("usage: inkcoach use <alphabet_name>"))?;
    let mut store = AlphabetStore::load_or_install_default()?;
    store.set_active(&name)?;
    println!("active alphabet: {}", store.active_name);
    Ok(())
}

fn cmd_doctor() -> Result<()> {
    let store = AlphabetStore::load_or_install_default()?;
    let devices = input::discover_pointer_devices();
    print_response(&store.doctor_report(&devices));
    Ok(())
}

// The core requires a non-empty uppercase word; normalize and check here,
// before any analysis runs.
fn normalized_word(raw: &str) -> Result<String> {
    let word = raw.trim().to_ascii_uppercase();
    analyzer::validate_word(&word)?;
    Ok(word)
}

fn print_help() {
    println!(
        r#"inkcoach — handwriting practice scorer

USAGE:
  inkcoach help [command]                     Show general or command-specific help
  inkcoach analyze <session.json>             Score one stroke from a recorded session
  inkcoach practice <session.json>            Replay a session with letter progression
  inkcoach record <out.json> --word WORD      Capture strokes from a pointer device
  inkcoach letters                            Show the active alphabet's letter profiles
  inkcoach list                               List alphabet tables
  inkcoach use <name>                         Switch the active alphabet table
  inkcoach doctor                             Diagnose config, coverage, and devices

TIPS:
  - Alphabet tables: ~/.config/inkcoach/alphabets
  - Active table pointer: ~/.config/inkcoach/active
  - The shipped table covers A-E; other letters score a neutral 70 for direction
"#
    );
}

fn print_subcmd_help(cmd: &str) {
    match cmd {
        "analyze" => println!(
            "usage: inkcoach analyze <session.json> [--stroke N] [--json]\nScores one stroke (default: the last) against the session's word and mode."
        ),
        "practice" => println!(
            "usage: inkcoach practice <session.json> [--json]\nReplays every stroke through the practice progression and prints feedback."
        ),
        "record" => println!(
            "usage: inkcoach record <out.json> --word WORD [--mode trace|write] [--device PATH]\nCaptures strokes from an absolute pointer device until Ctrl-C, then writes the session."
        ),
        "letters" => println!(
            "usage: inkcoach letters\nLists the active alphabet's direction profiles and its coverage gaps."
        ),
        "list" => println!("usage: inkcoach list\nLists available alphabet tables; marks active with '*'."),
        "use" => println!(
            "usage: inkcoach use <name>\nSwitches the active alphabet table to <name> and reloads it."
        ),
        "doctor" => println!(
            "usage: inkcoach doctor\nReports config paths, letter coverage, detected pointer devices, and permissions."
        ),
        _ => {
            eprintln!("unknown command: {cmd}\n");
            print_help();
        }
    }
}

fn print_response(v: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(v).unwrap_or_default());
}
