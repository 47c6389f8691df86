use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use serde::Serialize;
use tracing::{info, warn, Level};

use fretkeys::playback::{plan, Scheduler, Step, ThreadSleeper};
use fretkeys::{arrange, parse, resolve_tempo, select_track, Profile, ScriptSink, Song};

const USAGE: &str = "Usage: fretkeys <tab.yaml> [options]

Options:
  --track N               Track number (prompted when omitted)
  --bpm N                 Override the song tempo (prompted when omitted)
  --profile FILE          Target profile YAML (tuning and key layout)
  --follow-source-tuning  Use the track's own six-string tuning as the target
  --lead-in SECS          Countdown before playback (default 3)
  --list                  List tracks and exit
  --dump                  Print the grouped note plan as YAML instead of playing
  --verbose               Log every triggered group";

const DEFAULT_LEAD_IN: u32 = 3;

#[derive(Debug, Default)]
struct Args {
    input: String,
    track: Option<usize>,
    bpm: Option<u32>,
    profile: Option<String>,
    follow_source_tuning: bool,
    lead_in: Option<u32>,
    list: bool,
    dump: bool,
    verbose: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut input = None;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--track" => parsed.track = Some(parse_number(&value("--track")?, "--track")?),
            "--bpm" => parsed.bpm = Some(parse_number(&value("--bpm")?, "--bpm")?),
            "--profile" => parsed.profile = Some(value("--profile")?),
            "--lead-in" => parsed.lead_in = Some(parse_number(&value("--lead-in")?, "--lead-in")?),
            "--follow-source-tuning" => parsed.follow_source_tuning = true,
            "--list" => parsed.list = true,
            "--dump" => parsed.dump = true,
            "--verbose" => parsed.verbose = true,
            flag if flag.starts_with("--") => return Err(format!("unknown option {}", flag)),
            path => {
                if input.replace(path.to_string()).is_some() {
                    return Err("only one tab file can be given".to_string());
                }
            }
        }
    }

    parsed.input = input.ok_or_else(|| "no tab file given".to_string())?;
    Ok(parsed)
}

fn parse_number<T: std::str::FromStr>(text: &str, flag: &str) -> Result<T, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("{} expects a number, got '{}'", flag, text))
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Read one trimmed line from stdin, or `None` at end of input.
fn prompt(question: &str) -> Option<String> {
    eprint!("{}", question);
    let _ = io::stderr().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn list_tracks(song: &Song) {
    for (i, track) in song.tracks.iter().enumerate() {
        eprintln!(
            "{}: {} ({} strings)",
            i + 1,
            track.name,
            track.tuning.string_count()
        );
    }
}

fn choose_track(song: &Song) -> usize {
    if song.tracks.len() == 1 {
        return 1;
    }
    eprintln!("Available tracks:");
    list_tracks(song);
    loop {
        let answer = prompt("Select a track number: ").unwrap_or_else(|| fail("no track selected"));
        match answer.parse::<usize>() {
            Ok(n) if (1..=song.tracks.len()).contains(&n) => return n,
            Ok(_) => eprintln!("Invalid track number."),
            Err(_) => eprintln!("Please enter a valid number."),
        }
    }
}

fn choose_bpm(default_bpm: u32) -> u32 {
    loop {
        let answer = prompt(&format!("BPM [{} from file]: ", default_bpm))
            .unwrap_or_else(|| fail("no BPM given"));
        if answer.is_empty() {
            return default_bpm;
        }
        match answer.parse::<u32>() {
            Ok(bpm) if bpm > 0 => return bpm,
            _ => eprintln!("Invalid number, try again."),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct Dump<'a> {
    track: &'a str,
    bpm: u32,
    skipped: usize,
    steps: Vec<Step>,
}

fn main() {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", USAGE);
            process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let source = fs::read_to_string(&args.input)
        .unwrap_or_else(|e| fail(format!("reading '{}': {}", args.input, e)));
    let song = parse(&source).unwrap_or_else(|e| fail(e));

    if args.list {
        list_tracks(&song);
        return;
    }
    if song.tracks.is_empty() {
        fail("the tab has no tracks");
    }

    let mut profile = match &args.profile {
        Some(path) => {
            let text = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("reading '{}': {}", path, e)));
            Profile::from_yaml(&text).unwrap_or_else(|e| fail(e))
        }
        None => Profile::default(),
    };

    let number = args.track.unwrap_or_else(|| choose_track(&song));
    let track = select_track(&song, number).unwrap_or_else(|e| fail(e));
    if args.follow_source_tuning {
        profile = profile
            .follow_source_tuning(&track.tuning)
            .unwrap_or_else(|e| fail(e));
    }

    let arrangement = arrange(track, &profile).unwrap_or_else(|e| fail(e));
    if !arrangement.skipped.is_empty() {
        warn!(
            count = arrangement.skipped.len(),
            "some notes have no position on the target surface"
        );
    }
    eprintln!(
        "Found {} playable notes. Default BPM from file: {}",
        arrangement.note_count(),
        song.tempo
    );

    let bpm = match args.bpm {
        Some(bpm) => bpm,
        None if args.dump => song.tempo,
        None => choose_bpm(song.tempo),
    };
    let tempo = resolve_tempo(&song, Some(bpm)).unwrap_or_else(|e| fail(e));

    if args.dump {
        let dump = Dump {
            track: &arrangement.track,
            bpm: tempo.bpm(),
            skipped: arrangement.skipped.len(),
            steps: plan(&arrangement.groups, tempo),
        };
        let yaml = serde_yaml::to_string(&dump).unwrap_or_else(|e| fail(e));
        print!("{}", yaml);
        return;
    }

    let stdout = io::stdout();
    let mut scheduler = Scheduler::new(&profile.layout, ScriptSink::new(stdout.lock()), ThreadSleeper);
    eprintln!("Switch to the target window now.");
    scheduler.count_in(args.lead_in.unwrap_or(DEFAULT_LEAD_IN));
    let report = scheduler.play(&arrangement.groups, tempo);

    let (sink, _) = scheduler.into_parts();
    if let Err(e) = sink.finish() {
        fail(format!("writing key actions: {}", e));
    }
    info!(
        groups = report.groups,
        keys = report.keys,
        seconds = report.scheduled.as_secs_f64(),
        "done"
    );
}
