use jokerscore_core::registry::{
    ACROBAT, BLUEPRINT, BOOTSTRAPS, BRAINSTORM, BUSINESS_CARD, GREEDY_JOKER, HACK, HANGING_CHAD,
    JOKER, JOKER_STENCIL, MIME, MISPRINT, PAREIDOLIA, RAISED_FIST, SCARY_FACE, SELTZER,
    SHOOT_THE_MOON,
};
use jokerscore_core::{
    parse_cards, Card, Counters, Edition, GameConfig, HandKind, JokerId, PipelineError, PlayPhase,
    Popup, PopupAnchor, Score, ScoreEvent, ScoringPipeline, Table,
};

fn cards(text: &str) -> Vec<Card> {
    parse_cards(text).expect("valid cards")
}

fn new_table(played: &str, held: &str, jokers: &[JokerId]) -> Table {
    let config = GameConfig::default();
    let mut table = Table::new(&config.scoring, 7);
    table.counters = Counters {
        hands_remaining: 4,
        discards_remaining: 3,
        money: 0,
        deck_remaining: 40,
    };
    for &id in jokers {
        table
            .roster
            .acquire(id, Edition::Base)
            .expect("free joker slot");
    }
    table.play(cards(played), cards(held));
    table
}

fn score_all(table: &mut Table) -> (ScoringPipeline, Vec<ScoreEvent>) {
    let config = GameConfig::default();
    let mut pipeline = ScoringPipeline::begin(&config, table).expect("begin");
    pipeline.resolve_all(table).expect("resolve");
    let events = pipeline.drain_events().collect();
    (pipeline, events)
}

fn final_score(played: &str, held: &str, jokers: &[JokerId]) -> i64 {
    let mut table = new_table(played, held, jokers);
    let (pipeline, _) = score_all(&mut table);
    pipeline.outcome().score
}

fn cards_scored(events: &[ScoreEvent]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|event| match event {
            ScoreEvent::CardScored { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}

#[test]
fn two_pair_without_jokers() {
    let mut table = new_table("10H 10S 4D 4C 2C", "", &[]);
    let (pipeline, events) = score_all(&mut table);
    let outcome = pipeline.outcome();
    assert_eq!(outcome.kind, HandKind::TwoPair);
    assert_eq!(outcome.chips, 20 + 10 + 10 + 4 + 4);
    assert_eq!(outcome.mult, 2.0);
    assert_eq!(outcome.score, 96);
    assert_eq!(cards_scored(&events), vec![0, 1, 2, 3]);
}

#[test]
fn committing_a_hand_spends_it() {
    let mut table = new_table("AS", "", &[]);
    score_all(&mut table);
    assert_eq!(table.counters.hands_remaining, 3);
}

#[test]
fn plain_joker_adds_mult() {
    assert_eq!(final_score("AS", "", &[JOKER]), (5 + 11) * (1 + 4));
}

#[test]
fn effect_free_joker_changes_nothing() {
    let mut bare = new_table("AS", "", &[]);
    let mut with_jokers = new_table("AS", "", &[GREEDY_JOKER, PAREIDOLIA]);
    let (bare, bare_events) = score_all(&mut bare);
    let (joker, joker_events) = score_all(&mut with_jokers);

    assert_eq!(joker.outcome(), bare.outcome());
    assert_eq!(joker.trace(), bare.trace());
    assert_eq!(joker_events, bare_events);
}

#[test]
fn retrigger_presents_card_twice() {
    let mut table = new_table("2D", "", &[HACK, GREEDY_JOKER]);
    let (pipeline, events) = score_all(&mut table);

    assert_eq!(cards_scored(&events), vec![0, 0]);
    let retriggers = events
        .iter()
        .filter(|event| matches!(event, ScoreEvent::Retrigger { .. }))
        .count();
    assert_eq!(retriggers, 1);
    assert!(events.contains(&ScoreEvent::Popup {
        anchor: PopupAnchor::PlayedCard(0),
        popup: Popup::message("Again!"),
    }));
    // Greedy reacts to both presentations.
    assert_eq!(pipeline.score(), Score::new(5 + 2 + 2, 1.0 + 3.0 + 3.0));
}

#[test]
fn hanging_chad_retriggers_first_scored_card_twice() {
    let mut table = new_table("2D 3C", "", &[HANGING_CHAD]);
    let (pipeline, events) = score_all(&mut table);
    // High card: only the three scores.
    assert_eq!(cards_scored(&events), vec![1, 1, 1]);
    assert_eq!(pipeline.outcome().score, 5 + 3 * 3);
}

#[test]
fn hanging_chad_rearms_for_next_hand() {
    let config = GameConfig::default();
    let mut table = new_table("2D", "", &[HANGING_CHAD]);
    let (_, first) = score_all(&mut table);
    table.play(cards("9S"), Vec::new());
    let mut pipeline = ScoringPipeline::begin(&config, &mut table).expect("begin");
    pipeline.resolve_all(&mut table).expect("resolve");
    let second: Vec<_> = pipeline.drain_events().collect();
    assert_eq!(cards_scored(&first).len(), 3);
    assert_eq!(cards_scored(&second).len(), 3);
}

#[test]
fn expiry_waits_for_the_sweep_to_finish() {
    let mut table = new_table("AS", "", &[SELTZER, SELTZER]);
    let handles: Vec<_> = table.roster.handles().collect();
    for handle in handles {
        table
            .roster
            .get_mut(handle)
            .expect("live joker")
            .scratch
            .set_pair(-1, 1);
    }

    let (pipeline, events) = score_all(&mut table);
    let outcome = pipeline.outcome();
    assert_eq!(outcome.expired, vec![SELTZER, SELTZER]);
    assert!(table.roster.is_empty());
    assert_eq!(outcome.score, 5 + 11 + 11);

    let last_message = events
        .iter()
        .rposition(|event| {
            matches!(event, ScoreEvent::Popup { popup, .. } if popup.text == "Expire!")
        })
        .expect("expire popup");
    let first_removal = events
        .iter()
        .position(|event| matches!(event, ScoreEvent::JokerExpired { .. }))
        .expect("expiry event");
    assert!(first_removal > last_message);
}

#[test]
fn seltzer_counts_down_without_expiring() {
    let mut table = new_table("AS", "", &[SELTZER]);
    let (pipeline, events) = score_all(&mut table);
    assert!(pipeline.outcome().expired.is_empty());
    assert_eq!(table.roster.len(), 1);
    assert!(events.iter().any(
        |event| matches!(event, ScoreEvent::Popup { popup, .. } if popup.text == "-1")
    ));
    let handle = table.roster.first().expect("seltzer");
    assert_eq!(table.roster.get(handle).expect("live").scratch.pair(), (-1, 9));
}

#[test]
fn acrobat_fires_on_the_last_hand() {
    let mut table = new_table("AS", "", &[ACROBAT]);
    table.counters.hands_remaining = 1;
    let (pipeline, _) = score_all(&mut table);
    assert_eq!(pipeline.outcome().score, 16 * 3);

    assert_eq!(final_score("AS", "", &[ACROBAT]), 16);
}

#[test]
fn raised_fist_credits_only_the_first_lowest_held_card() {
    let mut table = new_table("AS", "9C 3H 3D", &[RAISED_FIST]);
    let (pipeline, events) = score_all(&mut table);
    assert_eq!(pipeline.outcome().score, 16 * (1 + 6));
    let fist_popups = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                ScoreEvent::Popup {
                    anchor: PopupAnchor::Joker(id),
                    ..
                } if *id == RAISED_FIST
            )
        })
        .count();
    assert_eq!(fist_popups, 1);
}

#[test]
fn mime_retriggers_held_cards() {
    assert_eq!(final_score("AS", "QH", &[SHOOT_THE_MOON]), 16 * 14);
    assert_eq!(final_score("AS", "QH", &[MIME, SHOOT_THE_MOON]), 16 * 27);
}

#[test]
fn blueprint_copies_its_right_neighbour() {
    assert_eq!(final_score("AS", "", &[BLUEPRINT, JOKER]), 16 * 9);
    assert_eq!(final_score("AS", "", &[JOKER, BLUEPRINT]), 16 * 5);
}

#[test]
fn brainstorm_copies_the_leftmost_joker() {
    assert_eq!(final_score("AS", "", &[JOKER, BRAINSTORM]), 16 * 9);
    assert_eq!(final_score("AS", "", &[BRAINSTORM, JOKER]), 16 * 5);
}

#[test]
fn copy_cycles_resolve_to_nothing() {
    assert_eq!(final_score("AS", "", &[BLUEPRINT, BRAINSTORM]), 16);
    assert_eq!(final_score("AS", "", &[BLUEPRINT, BLUEPRINT]), 16);
    assert_eq!(final_score("AS", "", &[BRAINSTORM, BRAINSTORM]), 16);
}

#[test]
fn blueprint_leaves_seltzer_countdown_alone() {
    let config = GameConfig::default();
    let mut table = new_table("AS", "", &[BLUEPRINT, SELTZER]);
    table.counters.hands_remaining = 20;

    let mut expired_on = None;
    for hand in 1..=12 {
        table.play(cards("AS"), Vec::new());
        let mut pipeline = ScoringPipeline::begin(&config, &mut table).expect("begin");
        let outcome = pipeline.resolve_all(&mut table).expect("resolve");
        if !outcome.expired.is_empty() {
            assert_eq!(outcome.expired, vec![SELTZER]);
            expired_on = Some(hand);
            break;
        }
    }

    assert_eq!(expired_on, Some(10));
    let survivor = table.roster.first().expect("blueprint stays");
    assert_eq!(table.roster.get(survivor).expect("live").id, BLUEPRINT);
    assert_eq!(table.roster.len(), 1);
}

#[test]
fn blueprint_copy_does_not_spend_hanging_chad() {
    let mut table = new_table("2D 3C", "", &[BLUEPRINT, HANGING_CHAD]);
    let (_, events) = score_all(&mut table);
    assert_eq!(cards_scored(&events), vec![1, 1, 1]);
    let chad = table.roster.handle_at(1).expect("hanging chad");
    // Rearmed at hand end after its own two retriggers.
    assert_eq!(table.roster.get(chad).expect("live").scratch.single(), 2);
}

#[test]
fn retriggers_stop_at_the_configured_cap() {
    let mut config = GameConfig::default();
    config.scoring.max_retriggers_per_card = 1;
    let mut table = new_table("3C", "", &[HANGING_CHAD]);
    let mut pipeline = ScoringPipeline::begin(&config, &mut table).expect("begin");
    let outcome = pipeline.resolve_all(&mut table).expect("resolve");
    let events: Vec<_> = pipeline.drain_events().collect();

    assert_eq!(cards_scored(&events), vec![0, 0]);
    assert_eq!(outcome.score, 5 + 3 + 3);
}

#[test]
fn stencil_counts_empty_slots() {
    assert_eq!(final_score("AS", "", &[JOKER_STENCIL]), 16 * 5);
    assert_eq!(final_score("AS", "", &[JOKER_STENCIL, JOKER_STENCIL]), 16 * 5 * 5);
}

#[test]
fn pareidolia_makes_every_card_a_face() {
    assert_eq!(final_score("5H", "", &[SCARY_FACE]), 10);
    assert_eq!(final_score("5H", "", &[PAREIDOLIA, SCARY_FACE]), 40);
}

#[test]
fn money_is_committed_when_the_hand_ends() {
    for seed in 0..16 {
        let config = GameConfig::default();
        let mut table = new_table("KH KS", "", &[BUSINESS_CARD]);
        table.rng = jokerscore_core::RngState::from_seed(seed);
        table.counters.money = 10;

        let mut pipeline = ScoringPipeline::begin(&config, &mut table).expect("begin");
        pipeline.run_phase(&mut table).expect("playing");
        pipeline.run_phase(&mut table).expect("cards");
        assert_eq!(table.counters.money, 10, "money moved mid-hand");

        let outcome = pipeline.resolve_all(&mut table).expect("resolve");
        assert!(matches!(outcome.money_delta, 0 | 2 | 4));
        assert_eq!(table.counters.money, 10 + outcome.money_delta);
    }
}

#[test]
fn effects_see_money_earned_earlier_in_the_hand() {
    let mut table = new_table("AS", "", &[BOOTSTRAPS]);
    table.counters.money = 10;
    let (pipeline, _) = score_all(&mut table);
    assert_eq!(pipeline.outcome().score, 16 * (1 + 4));
}

#[test]
fn random_effects_follow_the_seed() {
    let first = final_score("AS", "", &[MISPRINT]);
    let second = final_score("AS", "", &[MISPRINT]);
    assert_eq!(first, second);
}

#[test]
fn phases_advance_in_order() {
    let config = GameConfig::default();
    let mut table = new_table("KH KS 2C", "4D", &[JOKER]);
    let mut pipeline = ScoringPipeline::begin(&config, &mut table).expect("begin");
    let mut visited = vec![pipeline.phase()];
    while !pipeline.is_finished() {
        visited.push(pipeline.run_phase(&mut table).expect("phase"));
    }
    assert_eq!(
        visited,
        vec![
            PlayPhase::PlayingAnimation,
            PlayPhase::ScoringCards,
            PlayPhase::ScoringHeld,
            PlayPhase::ScoringIndependent,
            PlayPhase::ScoringHandEnd,
            PlayPhase::EndingAnimation,
            PlayPhase::Ended,
        ]
    );
}

#[test]
fn playing_animation_takes_one_beat_per_card() {
    let config = GameConfig::default();
    let mut table = new_table("2H 3H 4H", "", &[]);
    let mut pipeline = ScoringPipeline::begin(&config, &mut table).expect("begin");
    assert_eq!(pipeline.step(&mut table), Ok(PlayPhase::PlayingAnimation));
    assert_eq!(pipeline.step(&mut table), Ok(PlayPhase::PlayingAnimation));
    assert_eq!(pipeline.step(&mut table), Ok(PlayPhase::ScoringCards));
}

#[test]
fn trace_replays_to_final_score() {
    let mut table = new_table("10H 10S 4D 4C 2C", "QS", &[JOKER, SHOOT_THE_MOON, BLUEPRINT]);
    let (pipeline, _) = score_all(&mut table);
    let trace = pipeline.trace();
    assert_eq!(trace[0].before, Score::new(20, 2.0));
    for pair in trace.windows(2) {
        assert_eq!(pair[0].after, pair[1].before);
    }
    for step in trace {
        let mut replay = step.before;
        replay.apply(&step.effect);
        assert_eq!(replay, step.after);
    }
    assert_eq!(trace.last().expect("steps").after, pipeline.score());
}

#[test]
fn joker_popups_are_anchored_on_the_joker() {
    let mut table = new_table("AS", "", &[JOKER]);
    let (_, events) = score_all(&mut table);
    assert!(events.contains(&ScoreEvent::Popup {
        anchor: PopupAnchor::Joker(JOKER),
        popup: Popup::mult(4.0),
    }));
}

#[test]
fn stepping_an_ended_pipeline_is_rejected() {
    let mut table = new_table("AS", "", &[]);
    let (mut pipeline, _) = score_all(&mut table);
    assert_eq!(pipeline.step(&mut table), Err(PipelineError::Terminal));
    assert_eq!(pipeline.run_phase(&mut table), Err(PipelineError::Terminal));
    assert_eq!(
        pipeline.resolve_all(&mut table),
        Err(PipelineError::Terminal)
    );
}

#[test]
fn empty_play_is_rejected_without_spending_a_hand() {
    let config = GameConfig::default();
    let mut table = new_table("", "AS", &[JOKER]);
    let err = ScoringPipeline::begin(&config, &mut table).expect_err("no cards");
    assert_eq!(err, PipelineError::NoCards);
    assert_eq!(table.counters.hands_remaining, 4);
}

#[test]
fn reset_starts_the_next_hand() {
    let mut table = new_table("AS", "", &[JOKER]);
    let (mut pipeline, _) = score_all(&mut table);
    table.play(cards("KH KS"), Vec::new());
    pipeline.reset(&mut table).expect("reset");
    assert_eq!(pipeline.phase(), PlayPhase::PlayingAnimation);
    assert_eq!(pipeline.kind(), HandKind::Pair);
    assert!(pipeline.trace().is_empty());
    let outcome = pipeline.resolve_all(&mut table).expect("resolve");
    assert_eq!(outcome.score, (10 + 10 + 10) * (2 + 4));
    assert_eq!(table.counters.hands_remaining, 2);
}
