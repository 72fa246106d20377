//! Static joker registry and effect dispatch.
//!
//! An identity indexes the table directly. The table is append-only: new
//! jokers go at the end and existing identities keep their numbers.

use crate::arena::ArenaError;
use crate::{
    Card, GameContext, Joker, JokerEffect, JokerEvent, JokerHandle, JokerId, JokerRarity,
    JokerRoster, Rank, RngState, Suit,
};

pub type EffectFn = fn(&mut Joker, &mut EffectCall<'_>) -> JokerEffect;

#[derive(Debug, Clone, Copy)]
pub struct JokerInfo {
    pub id: JokerId,
    pub name: &'static str,
    pub rarity: JokerRarity,
    pub base_price: i64,
    /// `None` marks a passive joker. That is a legal "no effect", not an error.
    pub effect: Option<EffectFn>,
    pub on_created: Option<fn(&mut Joker)>,
}

pub const JOKER: JokerId = JokerId(0);
pub const GREEDY_JOKER: JokerId = JokerId(1);
pub const LUSTY_JOKER: JokerId = JokerId(2);
pub const WRATHFUL_JOKER: JokerId = JokerId(3);
pub const GLUTTONOUS_JOKER: JokerId = JokerId(4);
pub const JOLLY_JOKER: JokerId = JokerId(5);
pub const ZANY_JOKER: JokerId = JokerId(6);
pub const MAD_JOKER: JokerId = JokerId(7);
pub const CRAZY_JOKER: JokerId = JokerId(8);
pub const DROLL_JOKER: JokerId = JokerId(9);
pub const SLY_JOKER: JokerId = JokerId(10);
pub const WILY_JOKER: JokerId = JokerId(11);
pub const CLEVER_JOKER: JokerId = JokerId(12);
pub const DEVIOUS_JOKER: JokerId = JokerId(13);
pub const CRAFTY_JOKER: JokerId = JokerId(14);
pub const HALF_JOKER: JokerId = JokerId(15);
pub const JOKER_STENCIL: JokerId = JokerId(16);
pub const BANNER: JokerId = JokerId(17);
pub const WALKIE_TALKIE: JokerId = JokerId(18);
pub const FIBONACCI: JokerId = JokerId(19);
pub const BLACKBOARD: JokerId = JokerId(20);
pub const MYSTIC_SUMMIT: JokerId = JokerId(21);
pub const MISPRINT: JokerId = JokerId(22);
pub const EVEN_STEVEN: JokerId = JokerId(23);
pub const BLUE_JOKER: JokerId = JokerId(24);
pub const ODD_TODD: JokerId = JokerId(25);
pub const SCHOLAR: JokerId = JokerId(26);
pub const BUSINESS_CARD: JokerId = JokerId(27);
pub const SCARY_FACE: JokerId = JokerId(28);
pub const SMILEY_FACE: JokerId = JokerId(29);
pub const RAISED_FIST: JokerId = JokerId(30);
pub const RESERVED_PARKING: JokerId = JokerId(31);
pub const ABSTRACT_JOKER: JokerId = JokerId(32);
pub const BULL: JokerId = JokerId(33);
pub const THE_DUO: JokerId = JokerId(34);
pub const THE_TRIO: JokerId = JokerId(35);
pub const THE_FAMILY: JokerId = JokerId(36);
pub const THE_ORDER: JokerId = JokerId(37);
pub const THE_TRIBE: JokerId = JokerId(38);
pub const BLUEPRINT: JokerId = JokerId(39);
pub const BRAINSTORM: JokerId = JokerId(40);
pub const PAREIDOLIA: JokerId = JokerId(41);
pub const HANGING_CHAD: JokerId = JokerId(42);
pub const DUSK: JokerId = JokerId(43);
pub const HACK: JokerId = JokerId(44);
pub const PHOTOGRAPH: JokerId = JokerId(45);
pub const MIME: JokerId = JokerId(46);
pub const SELTZER: JokerId = JokerId(47);
pub const SOCK_AND_BUSKIN: JokerId = JokerId(48);
pub const ACROBAT: JokerId = JokerId(49);
pub const BOOTSTRAPS: JokerId = JokerId(50);
pub const SHOOT_THE_MOON: JokerId = JokerId(51);
pub const FOUR_FINGERS: JokerId = JokerId(52);
pub const SHORTCUT: JokerId = JokerId(53);
pub const TRIBOULET: JokerId = JokerId(54);

/// Longest copy chain followed before a copy resolves to nothing.
pub const MAX_COPY_DEPTH: usize = 8;

const MISPRINT_MAX_MULT: u32 = 23;
const HANGING_CHAD_RETRIGGERS: i32 = 2;
const SELTZER_HANDS: i16 = 10;

macro_rules! joker {
    ($id:expr, $name:expr, $rarity:ident, $price:expr, $effect:expr) => {
        joker!($id, $name, $rarity, $price, $effect, None)
    };
    ($id:expr, $name:expr, $rarity:ident, $price:expr, $effect:expr, $on_created:expr) => {
        JokerInfo {
            id: $id,
            name: $name,
            rarity: JokerRarity::$rarity,
            base_price: $price,
            effect: $effect,
            on_created: $on_created,
        }
    };
}

static REGISTRY: [JokerInfo; 55] = [
    joker!(JOKER, "Joker", Common, 2, Some(joker_effect)),
    joker!(GREEDY_JOKER, "Greedy Joker", Common, 5, Some(greedy_effect)),
    joker!(LUSTY_JOKER, "Lusty Joker", Common, 5, Some(lusty_effect)),
    joker!(WRATHFUL_JOKER, "Wrathful Joker", Common, 5, Some(wrathful_effect)),
    joker!(GLUTTONOUS_JOKER, "Gluttonous Joker", Common, 5, Some(gluttonous_effect)),
    joker!(JOLLY_JOKER, "Jolly Joker", Common, 3, Some(jolly_effect)),
    joker!(ZANY_JOKER, "Zany Joker", Common, 4, Some(zany_effect)),
    joker!(MAD_JOKER, "Mad Joker", Common, 4, Some(mad_effect)),
    joker!(CRAZY_JOKER, "Crazy Joker", Common, 4, Some(crazy_effect)),
    joker!(DROLL_JOKER, "Droll Joker", Common, 4, Some(droll_effect)),
    joker!(SLY_JOKER, "Sly Joker", Common, 3, Some(sly_effect)),
    joker!(WILY_JOKER, "Wily Joker", Common, 4, Some(wily_effect)),
    joker!(CLEVER_JOKER, "Clever Joker", Common, 4, Some(clever_effect)),
    joker!(DEVIOUS_JOKER, "Devious Joker", Common, 4, Some(devious_effect)),
    joker!(CRAFTY_JOKER, "Crafty Joker", Common, 4, Some(crafty_effect)),
    joker!(HALF_JOKER, "Half Joker", Common, 5, Some(half_effect)),
    joker!(JOKER_STENCIL, "Joker Stencil", Uncommon, 8, Some(stencil_effect)),
    joker!(BANNER, "Banner", Common, 5, Some(banner_effect)),
    joker!(WALKIE_TALKIE, "Walkie Talkie", Common, 4, Some(walkie_talkie_effect)),
    joker!(FIBONACCI, "Fibonacci", Uncommon, 8, Some(fibonacci_effect)),
    joker!(BLACKBOARD, "Blackboard", Uncommon, 6, Some(blackboard_effect)),
    joker!(MYSTIC_SUMMIT, "Mystic Summit", Common, 5, Some(mystic_summit_effect)),
    joker!(MISPRINT, "Misprint", Common, 4, Some(misprint_effect)),
    joker!(EVEN_STEVEN, "Even Steven", Common, 4, Some(even_steven_effect)),
    joker!(BLUE_JOKER, "Blue Joker", Common, 5, Some(blue_effect)),
    joker!(ODD_TODD, "Odd Todd", Common, 4, Some(odd_todd_effect)),
    joker!(SCHOLAR, "Scholar", Common, 4, Some(scholar_effect)),
    joker!(BUSINESS_CARD, "Business Card", Common, 4, Some(business_card_effect)),
    joker!(SCARY_FACE, "Scary Face", Common, 4, Some(scary_face_effect)),
    joker!(SMILEY_FACE, "Smiley Face", Common, 4, Some(smiley_face_effect)),
    joker!(RAISED_FIST, "Raised Fist", Common, 5, Some(raised_fist_effect)),
    joker!(RESERVED_PARKING, "Reserved Parking", Common, 6, Some(reserved_parking_effect)),
    joker!(ABSTRACT_JOKER, "Abstract Joker", Common, 4, Some(abstract_effect)),
    joker!(BULL, "Bull", Uncommon, 6, Some(bull_effect)),
    joker!(THE_DUO, "The Duo", Rare, 8, Some(duo_effect)),
    joker!(THE_TRIO, "The Trio", Rare, 8, Some(trio_effect)),
    joker!(THE_FAMILY, "The Family", Rare, 8, Some(family_effect)),
    joker!(THE_ORDER, "The Order", Rare, 8, Some(order_effect)),
    joker!(THE_TRIBE, "The Tribe", Rare, 8, Some(tribe_effect)),
    joker!(BLUEPRINT, "Blueprint", Rare, 10, Some(blueprint_effect)),
    joker!(BRAINSTORM, "Brainstorm", Rare, 10, Some(brainstorm_effect)),
    joker!(PAREIDOLIA, "Pareidolia", Uncommon, 5, None),
    joker!(
        HANGING_CHAD,
        "Hanging Chad",
        Common,
        4,
        Some(hanging_chad_effect),
        Some(reset_hanging_chad)
    ),
    joker!(DUSK, "Dusk", Uncommon, 5, Some(dusk_effect), Some(reset_cursor)),
    joker!(HACK, "Hack", Uncommon, 6, Some(hack_effect), Some(reset_cursor)),
    joker!(
        PHOTOGRAPH,
        "Photograph",
        Common,
        5,
        Some(photograph_effect),
        Some(reset_cursor)
    ),
    joker!(MIME, "Mime", Uncommon, 5, Some(mime_effect), Some(reset_cursor)),
    joker!(
        SELTZER,
        "Seltzer",
        Uncommon,
        6,
        Some(seltzer_effect),
        Some(fill_seltzer)
    ),
    joker!(
        SOCK_AND_BUSKIN,
        "Sock and Buskin",
        Uncommon,
        6,
        Some(sock_and_buskin_effect),
        Some(reset_cursor)
    ),
    joker!(ACROBAT, "Acrobat", Uncommon, 6, Some(acrobat_effect)),
    joker!(BOOTSTRAPS, "Bootstraps", Uncommon, 7, Some(bootstraps_effect)),
    joker!(SHOOT_THE_MOON, "Shoot the Moon", Common, 5, Some(shoot_the_moon_effect)),
    joker!(FOUR_FINGERS, "Four Fingers", Uncommon, 7, None),
    joker!(SHORTCUT, "Shortcut", Uncommon, 7, None),
    joker!(TRIBOULET, "Triboulet", Legendary, 20, Some(triboulet_effect)),
];

pub fn entry_for(id: JokerId) -> Option<&'static JokerInfo> {
    REGISTRY.get(id.0 as usize)
}

pub fn entries() -> &'static [JokerInfo] {
    &REGISTRY
}

/// Case-insensitive lookup that ignores spaces, dashes and underscores.
pub fn find_by_name(name: &str) -> Option<&'static JokerInfo> {
    let wanted = normalize_name(name);
    REGISTRY
        .iter()
        .find(|info| normalize_name(info.name) == wanted)
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn roll_rarity(rng: &mut RngState) -> JokerRarity {
    let roll = rng.percent();
    let mut threshold = 0;
    for rarity in [
        JokerRarity::Common,
        JokerRarity::Uncommon,
        JokerRarity::Rare,
        JokerRarity::Legendary,
    ] {
        threshold += rarity.chance();
        if roll < threshold {
            return rarity;
        }
    }
    JokerRarity::Common
}

/// Uniform pick among the registry entries of `rarity`.
pub fn random_of_rarity(rarity: JokerRarity, rng: &mut RngState) -> Option<JokerId> {
    let pool: Vec<JokerId> = REGISTRY
        .iter()
        .filter(|info| info.rarity == rarity)
        .map(|info| info.id)
        .collect();
    if pool.is_empty() {
        return None;
    }
    let pick = (rng.next_u64() % pool.len() as u64) as usize;
    Some(pool[pick])
}

/// Handles already on the current copy path, bounded by [`MAX_COPY_DEPTH`].
#[derive(Debug, Clone, Default)]
pub struct CopyChain {
    visited: [Option<JokerHandle>; MAX_COPY_DEPTH],
    depth: usize,
}

impl CopyChain {
    pub fn new(origin: JokerHandle) -> Self {
        let mut chain = Self::default();
        chain.push(origin);
        chain
    }

    pub fn contains(&self, handle: JokerHandle) -> bool {
        self.visited[..self.depth].contains(&Some(handle))
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    fn push(&mut self, handle: JokerHandle) -> bool {
        if self.depth >= MAX_COPY_DEPTH {
            return false;
        }
        self.visited[self.depth] = Some(handle);
        self.depth += 1;
        true
    }

    fn pop(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
            self.visited[self.depth] = None;
        }
    }
}

/// Arguments of one effect call. The roster is read-only; only the
/// joker passed to the effect function carries state back.
pub struct EffectCall<'a> {
    pub event: JokerEvent,
    pub card: Option<Card>,
    pub ctx: &'a GameContext<'a>,
    pub this: JokerHandle,
    roster: &'a JokerRoster,
    rng: &'a mut RngState,
    chain: &'a mut CopyChain,
}

impl<'a> EffectCall<'a> {
    pub fn roster(&self) -> &JokerRoster {
        self.roster
    }

    pub fn rng(&mut self) -> &mut RngState {
        &mut *self.rng
    }

    pub fn chain(&self) -> &CopyChain {
        &*self.chain
    }

    /// Runs `target`'s effect as if it were this joker's. The target runs
    /// on a scratch copy that is dropped afterwards, so copying never
    /// advances the target's counters, and a copy never expires the copier.
    /// Resolves to no effect when `target` is already on the copy path or
    /// the path is at its depth limit.
    pub fn copy_effect_of(&mut self, target: JokerHandle) -> JokerEffect {
        if self.chain.contains(target) || !self.chain.push(target) {
            return JokerEffect::none();
        }
        let effect = match self.roster.get(target) {
            Ok(joker) => {
                let mut copied = *joker;
                run_effect(
                    self.roster,
                    target,
                    &mut copied,
                    self.card,
                    self.event,
                    self.ctx,
                    &mut *self.rng,
                    &mut *self.chain,
                )
            }
            Err(_) => JokerEffect::none(),
        };
        self.chain.pop();
        JokerEffect {
            expire: false,
            ..effect
        }
    }
}

/// Registry dispatch: runs the effect of the joker at `handle` for one
/// event and stores the joker's updated scratch. Jokers without an effect
/// function yield the empty effect.
pub fn resolve_effect(
    roster: &mut JokerRoster,
    handle: JokerHandle,
    card: Option<Card>,
    event: JokerEvent,
    ctx: &GameContext<'_>,
    rng: &mut RngState,
) -> Result<JokerEffect, ArenaError> {
    let mut joker = *roster.get(handle)?;
    let mut chain = CopyChain::new(handle);
    let effect = run_effect(roster, handle, &mut joker, card, event, ctx, rng, &mut chain);
    roster.get_mut(handle)?.scratch = joker.scratch;
    Ok(effect)
}

#[allow(clippy::too_many_arguments)]
fn run_effect(
    roster: &JokerRoster,
    handle: JokerHandle,
    joker: &mut Joker,
    card: Option<Card>,
    event: JokerEvent,
    ctx: &GameContext<'_>,
    rng: &mut RngState,
    chain: &mut CopyChain,
) -> JokerEffect {
    let Some(effect_fn) = entry_for(joker.id).and_then(|info| info.effect) else {
        return JokerEffect::none();
    };
    let mut call = EffectCall {
        event,
        card,
        ctx,
        this: handle,
        roster,
        rng,
        chain,
    };
    effect_fn(joker, &mut call)
}

fn scored_card(call: &EffectCall<'_>) -> Option<Card> {
    match call.event {
        JokerEvent::OnCardScored => call.card,
        _ => None,
    }
}

fn held_card(call: &EffectCall<'_>) -> Option<Card> {
    match call.event {
        JokerEvent::OnCardHeld => call.card,
        _ => None,
    }
}

fn is_independent(call: &EffectCall<'_>) -> bool {
    call.event == JokerEvent::Independent
}

fn joker_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    if !is_independent(call) {
        return JokerEffect::none();
    }
    JokerEffect::mult(4.0)
}

fn sinful_effect(call: &EffectCall<'_>, suit: Suit) -> JokerEffect {
    match scored_card(call) {
        Some(card) if card.suit == suit => JokerEffect::mult(3.0),
        _ => JokerEffect::none(),
    }
}

fn greedy_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    sinful_effect(call, Suit::Diamonds)
}

fn lusty_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    sinful_effect(call, Suit::Hearts)
}

fn wrathful_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    sinful_effect(call, Suit::Spades)
}

fn gluttonous_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    sinful_effect(call, Suit::Clubs)
}

/// Independent bonus granted when the played cards satisfy `holds`.
fn when_played(
    call: &EffectCall<'_>,
    holds: impl FnOnce(&GameContext<'_>) -> bool,
    effect: JokerEffect,
) -> JokerEffect {
    if is_independent(call) && holds(call.ctx) {
        effect
    } else {
        JokerEffect::none()
    }
}

fn has_kind(ctx: &GameContext<'_>, n: u8) -> bool {
    ctx.played_distribution().n_of_a_kind() >= n
}

fn has_two_pair(ctx: &GameContext<'_>) -> bool {
    ctx.played_distribution().has_two_pair()
}

fn jolly_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| has_kind(ctx, 2), JokerEffect::mult(8.0))
}

fn zany_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| has_kind(ctx, 3), JokerEffect::mult(12.0))
}

fn mad_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, has_two_pair, JokerEffect::mult(10.0))
}

fn crazy_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.played_contains_straight(),
        JokerEffect::mult(12.0),
    )
}

fn droll_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.played_contains_flush(),
        JokerEffect::mult(10.0),
    )
}

fn sly_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| has_kind(ctx, 2), JokerEffect::chips(50))
}

fn wily_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| has_kind(ctx, 3), JokerEffect::chips(100))
}

fn clever_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, has_two_pair, JokerEffect::chips(80))
}

fn devious_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.played_contains_straight(),
        JokerEffect::chips(100),
    )
}

fn crafty_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.played_contains_flush(),
        JokerEffect::chips(80),
    )
}

fn half_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| ctx.played.len() <= 3, JokerEffect::mult(20.0))
}

/// X1 per empty slot, plus X1 per stencil owned (itself included).
fn stencil_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    if !is_independent(call) {
        return JokerEffect::none();
    }
    let roster = call.roster();
    let empty = call.ctx.joker_slots.saturating_sub(roster.len());
    let stencils = roster.count_of(JOKER_STENCIL);
    JokerEffect::xmult((empty + stencils) as f64)
}

fn banner_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let discards = call.ctx.counters.discards_remaining as i64;
    when_played(call, |_| true, JokerEffect::chips(30 * discards))
}

fn walkie_talkie_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card) if matches!(card.rank, Rank::Ten | Rank::Four) => JokerEffect {
            chips: 10,
            mult: 4.0,
            ..JokerEffect::default()
        },
        _ => JokerEffect::none(),
    }
}

fn fibonacci_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card)
            if matches!(
                card.rank,
                Rank::Ace | Rank::Two | Rank::Three | Rank::Five | Rank::Eight
            ) =>
        {
            JokerEffect::mult(8.0)
        }
        _ => JokerEffect::none(),
    }
}

fn blackboard_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.hand.iter().all(|card| !card.suit.is_red()),
        JokerEffect::xmult(3.0),
    )
}

fn mystic_summit_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.counters.discards_remaining == 0,
        JokerEffect::mult(15.0),
    )
}

fn misprint_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    if !is_independent(call) {
        return JokerEffect::none();
    }
    JokerEffect::mult(call.rng().roll(MISPRINT_MAX_MULT) as f64)
}

fn even_steven_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card) if !card.is_face() && card.value() % 2 == 0 => JokerEffect::mult(4.0),
        _ => JokerEffect::none(),
    }
}

fn blue_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let deck = call.ctx.counters.deck_remaining as i64;
    when_played(call, |_| true, JokerEffect::chips(2 * deck))
}

fn odd_todd_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card) if card.value() % 2 == 1 => JokerEffect::chips(31),
        _ => JokerEffect::none(),
    }
}

fn scholar_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card) if card.rank == Rank::Ace => JokerEffect {
            chips: 20,
            mult: 4.0,
            ..JokerEffect::default()
        },
        _ => JokerEffect::none(),
    }
}

fn business_card_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let Some(card) = scored_card(call) else {
        return JokerEffect::none();
    };
    if call.ctx.is_face(&card) && call.rng().one_in(2) {
        JokerEffect::money(2)
    } else {
        JokerEffect::none()
    }
}

fn scary_face_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card) if call.ctx.is_face(&card) => JokerEffect::chips(30),
        _ => JokerEffect::none(),
    }
}

fn smiley_face_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card) if call.ctx.is_face(&card) => JokerEffect::mult(5.0),
        _ => JokerEffect::none(),
    }
}

/// Twice the value of the lowest held card, credited on that card only.
/// Aces count high.
fn raised_fist_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let Some(card) = held_card(call) else {
        return JokerEffect::none();
    };
    let lowest = call
        .ctx
        .hand
        .iter()
        .enumerate()
        .min_by_key(|(_, held)| held.value())
        .map(|(idx, _)| idx as i32);
    if lowest == Some(call.ctx.scored_index) {
        JokerEffect::mult(2.0 * card.value() as f64)
    } else {
        JokerEffect::none()
    }
}

fn reserved_parking_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let Some(card) = held_card(call) else {
        return JokerEffect::none();
    };
    if call.ctx.is_face(&card) && call.rng().one_in(2) {
        JokerEffect::money(1)
    } else {
        JokerEffect::none()
    }
}

fn abstract_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let owned = call.roster().len() as f64;
    when_played(call, |_| true, JokerEffect::mult(3.0 * owned))
}

fn bull_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let money = call.ctx.counters.money.max(0);
    when_played(call, |_| true, JokerEffect::chips(2 * money))
}

fn duo_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| has_kind(ctx, 2), JokerEffect::xmult(2.0))
}

fn trio_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| has_kind(ctx, 3), JokerEffect::xmult(3.0))
}

fn family_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(call, |ctx| has_kind(ctx, 4), JokerEffect::xmult(4.0))
}

fn order_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.played_contains_straight(),
        JokerEffect::xmult(3.0),
    )
}

fn tribe_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.played_contains_flush(),
        JokerEffect::xmult(2.0),
    )
}

/// Copies the joker to its right; the rightmost blueprint does nothing.
fn blueprint_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match call.roster().next_after(call.this) {
        Some(next) => call.copy_effect_of(next),
        None => JokerEffect::none(),
    }
}

/// Copies the leftmost joker unless it is itself a brainstorm.
fn brainstorm_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let roster = call.roster();
    let Some(first) = roster.first() else {
        return JokerEffect::none();
    };
    let copies_itself = roster.get(first).map_or(true, |joker| joker.id == BRAINSTORM);
    if copies_itself {
        return JokerEffect::none();
    }
    call.copy_effect_of(first)
}

fn reset_cursor(joker: &mut Joker) {
    joker.scratch.set_single(-1);
}

fn reset_hanging_chad(joker: &mut Joker) {
    joker.scratch.set_single(HANGING_CHAD_RETRIGGERS);
}

fn fill_seltzer(joker: &mut Joker) {
    joker.scratch.set_pair(-1, SELTZER_HANDS);
}

/// One retrigger per card: fires only when the card sits past the last
/// card this joker retriggered.
fn retrigger_past(cursor: &mut i32, index: i32) -> bool {
    let fire = *cursor < index;
    *cursor = index;
    fire
}

fn retrigger_effect(fire: bool) -> JokerEffect {
    if fire {
        JokerEffect::retrigger()
    } else {
        JokerEffect::none()
    }
}

fn hanging_chad_effect(joker: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match call.event {
        JokerEvent::OnHandScoredEnd => {
            reset_hanging_chad(joker);
            JokerEffect::none()
        }
        JokerEvent::OnCardScored => {
            let remaining = joker.scratch.single();
            joker.scratch.set_single(remaining - 1);
            retrigger_effect(remaining > 0)
        }
        _ => JokerEffect::none(),
    }
}

fn dusk_effect(joker: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match call.event {
        JokerEvent::OnHandScoredEnd => {
            reset_cursor(joker);
            JokerEffect::none()
        }
        JokerEvent::OnCardScored if call.ctx.counters.hands_remaining == 0 => {
            let mut cursor = joker.scratch.single();
            let fire = retrigger_past(&mut cursor, call.ctx.scored_index);
            joker.scratch.set_single(cursor);
            retrigger_effect(fire)
        }
        _ => JokerEffect::none(),
    }
}

fn hack_effect(joker: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match call.event {
        JokerEvent::OnHandScoredEnd => {
            reset_cursor(joker);
            JokerEffect::none()
        }
        JokerEvent::OnCardScored => match call.card {
            Some(card) if card.rank <= Rank::Five => {
                let mut cursor = joker.scratch.single();
                let fire = retrigger_past(&mut cursor, call.ctx.scored_index);
                joker.scratch.set_single(cursor);
                retrigger_effect(fire)
            }
            _ => JokerEffect::none(),
        },
        _ => JokerEffect::none(),
    }
}

/// X2 on the first scored face card, repeated on its retriggers.
fn photograph_effect(joker: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match call.event {
        JokerEvent::OnHandScoredEnd => {
            reset_cursor(joker);
            JokerEffect::none()
        }
        JokerEvent::OnCardScored => {
            let Some(card) = call.card else {
                return JokerEffect::none();
            };
            let index = call.ctx.scored_index;
            if joker.scratch.single() < 0 && call.ctx.is_face(&card) {
                joker.scratch.set_single(index);
            }
            if joker.scratch.single() == index {
                JokerEffect::xmult(2.0)
            } else {
                JokerEffect::none()
            }
        }
        _ => JokerEffect::none(),
    }
}

fn mime_effect(joker: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match call.event {
        JokerEvent::OnHandScoredEnd => {
            reset_cursor(joker);
            JokerEffect::none()
        }
        JokerEvent::OnCardHeld => {
            let mut cursor = joker.scratch.single();
            let fire = retrigger_past(&mut cursor, call.ctx.scored_index);
            joker.scratch.set_single(cursor);
            retrigger_effect(fire)
        }
        _ => JokerEffect::none(),
    }
}

/// Retriggers every scored card for ten hands, then expires. The first
/// half of the scratch is the retrigger cursor, the second the hands left.
fn seltzer_effect(joker: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let (cursor, hands) = joker.scratch.pair();
    match call.event {
        JokerEvent::OnHandScoredEnd => {
            let hands = hands - 1;
            joker.scratch.set_pair(-1, hands);
            if hands <= 0 {
                JokerEffect {
                    expire: true,
                    ..JokerEffect::default()
                }
                .with_message("Expire!")
            } else {
                JokerEffect::none().with_message("-1")
            }
        }
        JokerEvent::OnCardScored if hands > 0 => {
            let index = call.ctx.scored_index;
            joker.scratch.set_pair(index as i16, hands);
            retrigger_effect((cursor as i32) < index)
        }
        _ => JokerEffect::none(),
    }
}

fn sock_and_buskin_effect(joker: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match call.event {
        JokerEvent::OnHandScoredEnd => {
            reset_cursor(joker);
            JokerEffect::none()
        }
        JokerEvent::OnCardScored => match call.card {
            Some(card) if call.ctx.is_face(&card) => {
                let mut cursor = joker.scratch.single();
                let fire = retrigger_past(&mut cursor, call.ctx.scored_index);
                joker.scratch.set_single(cursor);
                retrigger_effect(fire)
            }
            _ => JokerEffect::none(),
        },
        _ => JokerEffect::none(),
    }
}

/// X3 on the final hand of the round.
fn acrobat_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    when_played(
        call,
        |ctx| ctx.counters.hands_remaining == 0,
        JokerEffect::xmult(3.0),
    )
}

fn bootstraps_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    let fives = call.ctx.counters.money.max(0) / 5;
    when_played(call, |_| true, JokerEffect::mult(2.0 * fives as f64))
}

fn shoot_the_moon_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match held_card(call) {
        Some(card) if card.rank == Rank::Queen => JokerEffect::mult(13.0),
        _ => JokerEffect::none(),
    }
}

fn triboulet_effect(_: &mut Joker, call: &mut EffectCall<'_>) -> JokerEffect {
    match scored_card(call) {
        Some(card) if matches!(card.rank, Rank::King | Rank::Queen) => JokerEffect::xmult(2.0),
        _ => JokerEffect::none(),
    }
}
