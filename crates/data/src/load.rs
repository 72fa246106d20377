use anyhow::{bail, Context};
use jokerscore_core::arena::MAX_ARENA_CAPACITY;
use jokerscore_core::{GameConfig, HandKind, HandRule, ScoringRule};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const HANDS_FILE: &str = "hands.json";
const SCORING_FILE: &str = "scoring.json";

/// Longest hand name that fits the score panel.
pub const MAX_DISPLAY_NAME_LEN: usize = 7;

/// Reads `hands.json` and, when present, `scoring.json` from `dir`.
/// Categories missing from `hands.json` fall back to the built-in table.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let hands: Vec<HandRule> = load_json(dir.join(HANDS_FILE))?;
    let scoring_path = dir.join(SCORING_FILE);
    let scoring: ScoringRule = if scoring_path.exists() {
        load_json(scoring_path)?
    } else {
        ScoringRule::default()
    };

    let config = merge_with_defaults(hands, scoring);
    validate_config(&config).with_context(|| format!("validate {}", dir.display()))?;
    Ok(config)
}

fn merge_with_defaults(hands: Vec<HandRule>, scoring: ScoringRule) -> GameConfig {
    let mut config = GameConfig {
        hands,
        scoring,
    };
    let defaults = GameConfig::default();
    for kind in HandKind::ALL {
        if config.hand_rule(kind).is_none() {
            if let Some(rule) = defaults.hand_rule(kind) {
                config.hands.push(rule.clone());
            }
        }
    }
    config
}

pub fn validate_config(config: &GameConfig) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for rule in &config.hands {
        if !seen.insert(rule.kind) {
            bail!("hand {} is defined more than once", rule.kind.id());
        }
        if rule.display_name.chars().count() > MAX_DISPLAY_NAME_LEN {
            bail!(
                "hand {} display name `{}` is longer than {} characters",
                rule.kind.id(),
                rule.display_name,
                MAX_DISPLAY_NAME_LEN
            );
        }
        if rule.base_chips < 0 || rule.base_mult < 0.0 {
            bail!("hand {} has a negative base", rule.kind.id());
        }
    }

    let slots = config.scoring.joker_slots;
    if slots == 0 || slots > MAX_ARENA_CAPACITY {
        bail!("joker_slots must be within 1..={MAX_ARENA_CAPACITY}, got {slots}");
    }
    if config.scoring.max_retriggers_per_card == 0 {
        bail!("max_retriggers_per_card must be at least 1");
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
