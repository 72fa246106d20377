use crate::{Card, Rank, NUM_RANKS, NUM_SUITS};
use serde::{Deserialize, Serialize};

const ACE: usize = Rank::Ace as usize;
const KING: usize = Rank::King as usize;
const QUEEN: usize = Rank::Queen as usize;
const TWO: usize = Rank::Two as usize;
const THREE: usize = Rank::Three as usize;
const FIVE: usize = Rank::Five as usize;

pub const DEFAULT_STRAIGHT_AND_FLUSH_SIZE: usize = 5;
pub const FOUR_FINGERS_STRAIGHT_AND_FLUSH_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandKind {
    None,
    HighCard,
    Pair,
    TwoPair,
    Trips,
    Straight,
    Flush,
    FullHouse,
    Quads,
    StraightFlush,
    RoyalFlush,
    FiveOfAKind,
    FlushHouse,
    FlushFive,
}

impl HandKind {
    pub const ALL: [HandKind; 14] = [
        HandKind::None,
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::Trips,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::Quads,
        HandKind::StraightFlush,
        HandKind::RoyalFlush,
        HandKind::FiveOfAKind,
        HandKind::FlushHouse,
        HandKind::FlushFive,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandKind::None => "none",
            HandKind::HighCard => "high_card",
            HandKind::Pair => "pair",
            HandKind::TwoPair => "two_pair",
            HandKind::Trips => "trips",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "full_house",
            HandKind::Quads => "quads",
            HandKind::StraightFlush => "straight_flush",
            HandKind::RoyalFlush => "royal_flush",
            HandKind::FiveOfAKind => "five_kind",
            HandKind::FlushHouse => "flush_house",
            HandKind::FlushFive => "flush_five",
        }
    }

    pub fn from_id(id: &str) -> Option<HandKind> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Built-in base chips and mult, used when the config has no entry.
    pub fn default_base(self) -> (i64, f64) {
        match self {
            HandKind::None => (0, 0.0),
            HandKind::HighCard => (5, 1.0),
            HandKind::Pair => (10, 2.0),
            HandKind::TwoPair => (20, 2.0),
            HandKind::Trips => (30, 3.0),
            HandKind::Straight => (30, 4.0),
            HandKind::Flush => (35, 4.0),
            HandKind::FullHouse => (40, 4.0),
            HandKind::Quads => (60, 7.0),
            HandKind::StraightFlush | HandKind::RoyalFlush => (100, 8.0),
            HandKind::FiveOfAKind => (120, 12.0),
            HandKind::FlushHouse => (140, 14.0),
            HandKind::FlushFive => (160, 16.0),
        }
    }

    pub fn is_straight(self) -> bool {
        matches!(
            self,
            HandKind::Straight | HandKind::StraightFlush | HandKind::RoyalFlush
        )
    }

    pub fn is_flush(self) -> bool {
        matches!(
            self,
            HandKind::Flush | HandKind::StraightFlush | HandKind::RoyalFlush
        )
    }
}

/// Classifier switches granted by owned jokers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandEvalRules {
    pub four_fingers: bool,
    pub shortcut: bool,
}

impl HandEvalRules {
    pub fn min_len(self) -> usize {
        if self.four_fingers {
            FOUR_FINGERS_STRAIGHT_AND_FLUSH_SIZE
        } else {
            DEFAULT_STRAIGHT_AND_FLUSH_SIZE
        }
    }
}

/// Per-rank and per-suit occupancy counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distribution {
    pub ranks: [u8; NUM_RANKS],
    pub suits: [u8; NUM_SUITS],
}

impl Distribution {
    pub fn from_cards(cards: &[Card]) -> Self {
        let mut dist = Self::default();
        for card in cards {
            dist.ranks[card.rank.index()] += 1;
            dist.suits[card.suit.index()] += 1;
        }
        dist
    }

    pub fn card_count(&self) -> usize {
        self.ranks.iter().map(|&n| n as usize).sum()
    }

    /// Size of the largest same-rank group; a full house reports 3.
    pub fn n_of_a_kind(&self) -> u8 {
        self.ranks.iter().copied().max().unwrap_or(0)
    }

    pub fn has_two_pair(&self) -> bool {
        self.ranks.iter().filter(|&&n| n >= 2).count() >= 2
    }

    /// Two three-of-a-kind groups, or one plus a separate pair.
    pub fn has_full_house(&self) -> bool {
        let threes = self.ranks.iter().filter(|&&n| n >= 3).count();
        let pairs = self.ranks.iter().filter(|&&n| n == 2).count();
        threes >= 2 || (threes >= 1 && pairs >= 1)
    }

    pub fn has_flush(&self, rules: HandEvalRules) -> bool {
        let min_len = rules.min_len();
        self.suits.iter().any(|&n| n as usize >= min_len)
    }

    pub fn has_straight(&self, rules: HandEvalRules) -> bool {
        if rules.shortcut {
            self.has_gap_tolerant_straight(rules.min_len())
        } else {
            self.has_standard_straight(rules.min_len())
        }
    }

    pub fn has_standard_straight(&self, min_len: usize) -> bool {
        let mut run = 0;
        for &count in &self.ranks {
            if count > 0 {
                run += 1;
                if run >= min_len {
                    return true;
                }
            } else {
                run = 0;
            }
        }

        // Ace low: A counts as the rank below two, so the run must close by five.
        if min_len >= 2 && self.ranks[ACE] > 0 {
            let last_needed = TWO + (min_len - 2);
            if last_needed <= FIVE && (TWO..=last_needed).all(|r| self.ranks[r] > 0) {
                return true;
            }
        }
        false
    }

    /// Longest run ending at rank r is `1 + max(run at r-1, run at r-2)`.
    pub fn has_gap_tolerant_straight(&self, min_len: usize) -> bool {
        let mut longest = [0usize; NUM_RANKS];
        let ace_low = usize::from(self.ranks[ACE] > 0);
        for rank in 0..NUM_RANKS {
            if self.ranks[rank] == 0 {
                continue;
            }
            let (prev1, prev2) = match rank {
                TWO => (ace_low, 0),
                THREE => (longest[TWO], ace_low),
                ACE => (longest[KING], longest[QUEEN]),
                _ => (longest[rank - 1], longest[rank - 2]),
            };
            longest[rank] = 1 + prev1.max(prev2);
            if longest[rank] >= min_len {
                return true;
            }
        }
        false
    }

    fn has_royal_ranks(&self) -> bool {
        [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King, Rank::Ace]
            .iter()
            .all(|rank| self.ranks[rank.index()] > 0)
    }
}

pub fn classify(cards: &[Card], rules: HandEvalRules) -> HandKind {
    classify_distribution(&Distribution::from_cards(cards), rules)
}

pub fn classify_distribution(dist: &Distribution, rules: HandEvalRules) -> HandKind {
    if dist.card_count() == 0 {
        return HandKind::None;
    }

    let flush = dist.has_flush(rules);
    let straight = dist.has_straight(rules);
    let n_of_a_kind = dist.n_of_a_kind();

    if flush && straight {
        return if dist.has_royal_ranks() {
            HandKind::RoyalFlush
        } else {
            HandKind::StraightFlush
        };
    }
    if n_of_a_kind >= 5 {
        return if flush {
            HandKind::FlushFive
        } else {
            HandKind::FiveOfAKind
        };
    }
    if flush && dist.has_full_house() {
        return HandKind::FlushHouse;
    }
    if flush {
        return HandKind::Flush;
    }
    if straight {
        return HandKind::Straight;
    }
    if n_of_a_kind == 4 {
        return HandKind::Quads;
    }
    if dist.has_full_house() {
        return HandKind::FullHouse;
    }
    if n_of_a_kind == 3 {
        return HandKind::Trips;
    }
    if dist.has_two_pair() {
        return HandKind::TwoPair;
    }
    if n_of_a_kind == 2 {
        return HandKind::Pair;
    }
    HandKind::HighCard
}

/// Marks the cards of the most common suit when it reaches `min_len`.
/// Ties go to the first suit in suit order.
pub fn find_flush(cards: &[Card], min_len: usize) -> Vec<bool> {
    let mut mask = vec![false; cards.len()];
    let dist = Distribution::from_cards(cards);
    let mut best: Option<(usize, u8)> = None;
    for (suit, &count) in dist.suits.iter().enumerate() {
        if best.map_or(count > 0, |(_, n)| count > n) {
            best = Some((suit, count));
        }
    }
    let Some((best_suit, count)) = best else {
        return mask;
    };
    if (count as usize) < min_len {
        return mask;
    }
    for (flag, card) in mask.iter_mut().zip(cards) {
        *flag = card.suit.index() == best_suit;
    }
    mask
}

/// Marks exactly one card per rank of the longest straight, found by a DP
/// with backpointers and a backtrace from the highest best-ending rank.
pub fn find_straight(cards: &[Card], shortcut: bool, min_len: usize) -> Vec<bool> {
    let mut mask = vec![false; cards.len()];
    let dist = Distribution::from_cards(cards);
    let mut longest = [0usize; NUM_RANKS];
    let mut parent: [Option<usize>; NUM_RANKS] = [None; NUM_RANKS];
    let ace_low = usize::from(dist.ranks[ACE] > 0);

    for rank in 0..NUM_RANKS {
        if dist.ranks[rank] == 0 {
            continue;
        }
        let (prev1, parent1, prev2, parent2) = match (shortcut, rank) {
            (_, TWO) => (ace_low, Some(ACE), 0, None),
            (true, THREE) => (longest[TWO], Some(TWO), ace_low, Some(ACE)),
            (true, ACE) => (longest[KING], Some(KING), longest[QUEEN], Some(QUEEN)),
            (true, _) => (
                longest[rank - 1],
                Some(rank - 1),
                longest[rank - 2],
                Some(rank - 2),
            ),
            (false, ACE) => (longest[KING], Some(KING), 0, None),
            (false, _) => (longest[rank - 1], Some(rank - 1), 0, None),
        };
        if prev1 >= prev2 {
            longest[rank] = 1 + prev1;
            parent[rank] = parent1;
        } else {
            longest[rank] = 1 + prev2;
            parent[rank] = parent2;
        }
    }

    let mut best_len = 0;
    let mut end_rank = None;
    for (rank, &len) in longest.iter().enumerate() {
        if len >= best_len {
            best_len = len;
            end_rank = Some(rank);
        }
    }
    if best_len < min_len {
        return mask;
    }

    let mut needed = [0u8; NUM_RANKS];
    let mut current = end_rank;
    let mut remaining = best_len;
    while let Some(rank) = current {
        if remaining == 0 {
            break;
        }
        needed[rank] += 1;
        current = parent[rank];
        remaining -= 1;
    }

    for (flag, card) in mask.iter_mut().zip(cards) {
        let slot = &mut needed[card.rank.index()];
        if *slot > 0 {
            *flag = true;
            *slot -= 1;
        }
    }
    mask
}

/// Folds every unmarked card that shares a rank with a marked card into
/// the mask, so a pair inside a four-card straight is credited.
pub fn merge_paired_cards(cards: &[Card], mask: &mut [bool]) {
    let mut rank_marked = [false; NUM_RANKS];
    for (card, &flag) in cards.iter().zip(mask.iter()) {
        if flag {
            rank_marked[card.rank.index()] = true;
        }
    }
    for (card, flag) in cards.iter().zip(mask.iter_mut()) {
        if rank_marked[card.rank.index()] {
            *flag = true;
        }
    }
}

/// Per-card mask of the played cards that justify `kind`.
pub fn locate_contributing_cards(
    kind: HandKind,
    cards: &[Card],
    rules: HandEvalRules,
) -> Vec<bool> {
    match kind {
        HandKind::None => vec![false; cards.len()],
        HandKind::HighCard => {
            let mut mask = vec![false; cards.len()];
            if let Some(idx) = highest_card_index(cards) {
                mask[idx] = true;
            }
            mask
        }
        HandKind::Pair => pick_by_count(cards, 2, 1),
        HandKind::TwoPair => pick_by_count(cards, 2, 2),
        HandKind::Trips => pick_by_count(cards, 3, 1),
        HandKind::Quads => pick_by_count(cards, 4, 1),
        HandKind::FullHouse
        | HandKind::FiveOfAKind
        | HandKind::FlushHouse
        | HandKind::FlushFive => vec![true; cards.len()],
        HandKind::Straight | HandKind::Flush | HandKind::StraightFlush | HandKind::RoyalFlush => {
            let min_len = rules.min_len();
            let mut mask = if kind.is_flush() {
                find_flush(cards, min_len)
            } else {
                vec![false; cards.len()]
            };
            if kind.is_straight() {
                let straight = find_straight(cards, rules.shortcut, min_len);
                for (flag, hit) in mask.iter_mut().zip(straight) {
                    *flag |= hit;
                }
                // Four fingers with shortcut is an unsettled combination; the
                // merge also runs over a gapped run.
                if rules.four_fingers {
                    merge_paired_cards(cards, &mut mask);
                }
            }
            mask
        }
    }
}

fn highest_card_index(cards: &[Card]) -> Option<usize> {
    let mut best: Option<(usize, Rank)> = None;
    for (idx, card) in cards.iter().enumerate() {
        if best.map_or(true, |(_, rank)| card.rank > rank) {
            best = Some((idx, card.rank));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Marks up to `count` cards from each of the `max_groups` highest ranks
/// holding at least `count` cards.
fn pick_by_count(cards: &[Card], count: u8, max_groups: usize) -> Vec<bool> {
    let dist = Distribution::from_cards(cards);
    let mut taken = [0u8; NUM_RANKS];
    let mut wanted = [false; NUM_RANKS];
    for rank in (0..NUM_RANKS)
        .rev()
        .filter(|&rank| dist.ranks[rank] >= count)
        .take(max_groups)
    {
        wanted[rank] = true;
    }

    let mut mask = vec![false; cards.len()];
    for (flag, card) in mask.iter_mut().zip(cards) {
        let rank = card.rank.index();
        if wanted[rank] && taken[rank] < count {
            taken[rank] += 1;
            *flag = true;
        }
    }
    mask
}
