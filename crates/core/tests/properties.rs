use jokerscore_core::registry::{HACK, JOKER, PAREIDOLIA, SELTZER};
use jokerscore_core::{
    classify, locate_contributing_cards, Card, Distribution, Edition, GameConfig, HandEvalRules,
    HandKind, Rank, ScoringPipeline, Suit, Table,
};
use proptest::prelude::*;

fn card_strategy() -> impl Strategy<Value = Card> {
    (0..4usize, 0..13usize).prop_map(|(suit, rank)| {
        Card::new(
            Suit::ALL[suit],
            Rank::from_index(rank).unwrap_or(Rank::Two),
        )
    })
}

fn rules_strategy() -> impl Strategy<Value = HandEvalRules> {
    (any::<bool>(), any::<bool>()).prop_map(|(four_fingers, shortcut)| HandEvalRules {
        four_fingers,
        shortcut,
    })
}

proptest! {
    #[test]
    fn gap_tolerant_straights_include_standard_ones(
        played in prop::collection::vec(card_strategy(), 0..8),
        min_len in 4usize..=5,
    ) {
        let dist = Distribution::from_cards(&played);
        if dist.has_standard_straight(min_len) {
            prop_assert!(dist.has_gap_tolerant_straight(min_len));
        }
    }

    #[test]
    fn contributing_mask_fits_the_play(
        played in prop::collection::vec(card_strategy(), 0..8),
        rules in rules_strategy(),
    ) {
        let kind = classify(&played, rules);
        let mask = locate_contributing_cards(kind, &played, rules);
        prop_assert_eq!(mask.len(), played.len());
        if !played.is_empty() {
            prop_assert!(mask.iter().any(|&flag| flag), "{:?} credited no card", kind);
        }
    }

    #[test]
    fn five_card_runs_and_flushes_credit_exactly_five(
        played in prop::collection::vec(card_strategy(), 5),
        shortcut in any::<bool>(),
    ) {
        let rules = HandEvalRules { four_fingers: false, shortcut };
        let kind = classify(&played, rules);
        if kind.is_straight() || kind.is_flush() {
            let mask = locate_contributing_cards(kind, &played, rules);
            let credited = mask.iter().filter(|&&flag| flag).count();
            prop_assert_eq!(credited, rules.min_len(), "{:?} on {:?}", kind, played);
        }
    }

    #[test]
    fn flush_and_straight_outrank_groups(
        played in prop::collection::vec(card_strategy(), 1..8),
        rules in rules_strategy(),
    ) {
        let dist = Distribution::from_cards(&played);
        let flush = dist.has_flush(rules);
        let straight = dist.has_straight(rules);
        let kind = classify(&played, rules);
        match (flush, straight) {
            (true, true) => prop_assert!(
                matches!(kind, HandKind::StraightFlush | HandKind::RoyalFlush),
                "{:?}", kind
            ),
            (true, false) => prop_assert!(
                matches!(kind, HandKind::Flush | HandKind::FlushHouse | HandKind::FlushFive),
                "{:?}", kind
            ),
            (false, true) => prop_assert!(
                matches!(kind, HandKind::Straight | HandKind::FiveOfAKind),
                "{:?}", kind
            ),
            (false, false) => prop_assert!(
                !kind.is_straight() && !kind.is_flush(),
                "{:?}", kind
            ),
        }
    }

    #[test]
    fn scoring_always_reaches_the_end(
        played in prop::collection::vec(card_strategy(), 1..6),
        held in prop::collection::vec(card_strategy(), 0..4),
        seed in any::<u64>(),
    ) {
        let config = GameConfig::default();
        let mut table = Table::new(&config.scoring, seed);
        table.counters.hands_remaining = 1;
        for id in [HACK, SELTZER, PAREIDOLIA, JOKER] {
            table.roster.acquire(id, Edition::Base).expect("free slot");
        }
        table.play(played, held);

        let mut pipeline = ScoringPipeline::begin(&config, &mut table).expect("begin");
        let outcome = pipeline.resolve_all(&mut table).expect("resolve");
        prop_assert!(pipeline.is_finished());
        prop_assert!(outcome.score >= 0);
        prop_assert_eq!(outcome.score, pipeline.score().total());
    }
}
