use anyhow::{anyhow, bail, Context};
use jokerscore_core::registry;
use jokerscore_core::{
    parse_cards, Card, Counters, Edition, GameConfig, HandOutcome, JokerId, Pacer, PopupAnchor,
    ScoreEvent, ScoreTraceStep, ScoringPipeline, Table, TextColor,
};
use jokerscore_data::load_game_config;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_ASSETS: &str = "assets";
const USAGE: &str = "usage: jokerscore-cli [--assets DIR] [--joker NAME|ID]... [--held CARDS] \
[--random-jokers N] [--money N] [--hands N] [--discards N] [--deck N] [--seed N] [--paced] [--json] \
CARD...";

#[derive(Debug, Clone)]
struct CliOptions {
    assets: Option<PathBuf>,
    jokers: Vec<String>,
    random_jokers: usize,
    held: String,
    money: i64,
    hands: u32,
    discards: u32,
    deck: usize,
    seed: u64,
    paced: bool,
    json: bool,
    help: bool,
    played: Vec<String>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            assets: None,
            jokers: Vec::new(),
            random_jokers: 0,
            held: String::new(),
            money: 4,
            hands: 4,
            discards: 3,
            deck: 44,
            seed: 0,
            paced: false,
            json: false,
            help: false,
            played: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    outcome: &'a HandOutcome,
    trace: &'a [ScoreTraceStep],
    events: &'a [ScoreEvent],
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args)?;
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = load_config(options.assets.as_deref())?;
    let mut table = Table::new(&config.scoring, options.seed);
    table.counters = Counters {
        hands_remaining: options.hands,
        discards_remaining: options.discards,
        money: options.money,
        deck_remaining: options.deck,
    };
    for name in &options.jokers {
        let id = resolve_joker(name)?;
        table
            .roster
            .acquire(id, Edition::Base)
            .with_context(|| format!("add joker {name}"))?;
    }
    for _ in 0..options.random_jokers {
        let rarity = registry::roll_rarity(&mut table.rng);
        let Some(id) = registry::random_of_rarity(rarity, &mut table.rng) else {
            continue;
        };
        table
            .roster
            .acquire(id, Edition::Base)
            .with_context(|| format!("add random joker {}", joker_name(id)))?;
    }

    let played = parse_cards(&options.played.join(" ")).context("parse played cards")?;
    let held = parse_cards(&options.held).context("parse held cards")?;
    table.play(played, held);

    let mut pipeline = ScoringPipeline::begin(&config, &mut table).context("start scoring")?;
    let mut events = Vec::new();
    if options.paced {
        let mut pacer = Pacer::new(config.scoring.pacing);
        let mut frame = 0u64;
        while !pipeline.is_finished() {
            frame += 1;
            if pacer.tick(&mut pipeline, &mut table)? && !options.json {
                for event in pipeline.drain_events() {
                    print_event(frame, &event, &table, &config);
                    events.push(event);
                }
            }
        }
        events.extend(pipeline.drain_events());
    } else {
        pipeline.resolve_all(&mut table)?;
        events.extend(pipeline.drain_events());
        if !options.json {
            for event in &events {
                print_event(0, event, &table, &config);
            }
        }
    }

    let outcome = pipeline.outcome();
    info!(event = "cli_done", score = outcome.score, money = table.counters.money);
    if options.json {
        let report = Report {
            outcome: &outcome,
            trace: pipeline.trace(),
            events: &events,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} x {} = {}  (money {:+}, now ${})",
            outcome.chips,
            format_mult(outcome.mult),
            outcome.score,
            outcome.money_delta,
            table.counters.money
        );
    }
    Ok(())
}

fn parse_cli_options(args: &[String]) -> anyhow::Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        let arg = args[idx].as_str();
        match arg {
            "--help" | "-h" => options.help = true,
            "--paced" => options.paced = true,
            "--json" => options.json = true,
            "--assets" => options.assets = Some(PathBuf::from(value_after(args, &mut idx)?)),
            "--joker" | "-j" => options.jokers.push(value_after(args, &mut idx)?.to_string()),
            "--random-jokers" => {
                options.random_jokers = parse_number(arg, value_after(args, &mut idx)?)?
            }
            "--held" => options.held = value_after(args, &mut idx)?.to_string(),
            "--money" => options.money = parse_number(arg, value_after(args, &mut idx)?)?,
            "--hands" => options.hands = parse_number(arg, value_after(args, &mut idx)?)?,
            "--discards" => options.discards = parse_number(arg, value_after(args, &mut idx)?)?,
            "--deck" => options.deck = parse_number(arg, value_after(args, &mut idx)?)?,
            "--seed" => options.seed = parse_number(arg, value_after(args, &mut idx)?)?,
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            card => options.played.push(card.to_string()),
        }
        idx += 1;
    }
    Ok(options)
}

fn value_after<'a>(args: &'a [String], idx: &mut usize) -> anyhow::Result<&'a str> {
    let flag = &args[*idx];
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{flag} needs a value"))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("{flag} expects a number, got `{value}`"))
}

fn load_config(assets: Option<&Path>) -> anyhow::Result<GameConfig> {
    match assets {
        Some(dir) => load_game_config(dir),
        None => {
            let dir = Path::new(DEFAULT_ASSETS);
            if dir.join("hands.json").exists() {
                load_game_config(dir)
            } else {
                Ok(GameConfig::default())
            }
        }
    }
}

fn resolve_joker(name: &str) -> anyhow::Result<JokerId> {
    if let Ok(number) = name.parse::<u8>() {
        let id = JokerId(number);
        return registry::entry_for(id)
            .map(|info| info.id)
            .ok_or_else(|| anyhow!("no joker with id {number}"));
    }
    registry::find_by_name(name)
        .map(|info| info.id)
        .ok_or_else(|| anyhow!("unknown joker `{name}`"))
}

fn print_event(frame: u64, event: &ScoreEvent, table: &Table, config: &GameConfig) {
    let prefix = if frame > 0 {
        format!("[{frame:>5}] ")
    } else {
        String::new()
    };
    match event {
        ScoreEvent::HandClassified {
            kind,
            chips,
            mult,
            contributing,
        } => {
            println!(
                "{prefix}{} ({} x {})  {}",
                config.display_name(*kind),
                chips,
                format_mult(*mult),
                format_mask(&table.played, contributing)
            );
        }
        ScoreEvent::PhaseChanged { to, .. } => println!("{prefix}-- {to:?}"),
        ScoreEvent::CardScored { card, .. } => println!("{prefix}{card} scores"),
        ScoreEvent::Popup { anchor, popup } => {
            println!(
                "{prefix}  {:<16} {} {}",
                anchor_label(anchor, table),
                popup.text,
                color_label(popup.color)
            );
        }
        ScoreEvent::Retrigger { anchor } => {
            println!("{prefix}  {} again", anchor_label(anchor, table));
        }
        ScoreEvent::JokerExpired { id } => println!("{prefix}{} expired", joker_name(*id)),
        ScoreEvent::HandScored { total, .. } => println!("{prefix}total {total}"),
    }
}

fn format_mask(played: &[Card], mask: &[bool]) -> String {
    played
        .iter()
        .zip(mask)
        .map(|(card, &scores)| {
            if scores {
                format!("[{card}]")
            } else {
                card.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn anchor_label(anchor: &PopupAnchor, table: &Table) -> String {
    match anchor {
        PopupAnchor::PlayedCard(idx) => table
            .played
            .get(*idx)
            .map_or_else(|| format!("played #{idx}"), Card::to_string),
        PopupAnchor::HeldCard(idx) => table
            .hand
            .get(*idx)
            .map_or_else(|| format!("held #{idx}"), |card| format!("held {card}")),
        PopupAnchor::Joker(id) => joker_name(*id).to_string(),
    }
}

fn joker_name(id: JokerId) -> &'static str {
    registry::entry_for(id).map_or("?", |info| info.name)
}

fn color_label(color: TextColor) -> &'static str {
    match color {
        TextColor::Blue => "(chips)",
        TextColor::Red => "(mult)",
        TextColor::Yellow => "(money)",
        TextColor::White => "",
    }
}

fn format_mult(mult: f64) -> String {
    if mult.fract() == 0.0 {
        format!("{}", mult as i64)
    } else {
        format!("{mult:.2}")
    }
}
