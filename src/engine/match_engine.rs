//! The match engine: click queue plus pair resolution cycle.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cards::{Card, DisplayState};
use crate::core::{CardId, CardPair, MatchId, Scheduler, TimingConfig};
use crate::events::{EventChannel, Listener, ListenerId, MatchEvent};

use super::queue::ClickQueue;

/// A suspended point of the resolution cycle.
///
/// Exactly one step is scheduled while a cycle runs, and none otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleStep {
    /// Reveal hold elapsed: compare the pair's faces.
    Compare(CardPair),
    /// Display hold elapsed: play the matched animation.
    FinishMatch(CardPair),
    /// Flip-back delay elapsed: hide both faces.
    FlipBack(CardPair),
    /// Inter-pair delay elapsed: take the next pair or go idle.
    NextPair,
}

/// Sole authority on which clicks form a pair and what happens to them.
///
/// Clicks are accepted at any time and queued in order. Whenever two or
/// more cards are waiting and no cycle is running, the engine takes the
/// two oldest and resolves them over several timed steps. Time only moves
/// when [`MatchEngine::tick`] is called.
///
/// ```
/// use std::time::Duration;
/// use rust_pairs::cards::{Card, SimCard};
/// use rust_pairs::core::{CardId, MatchId};
/// use rust_pairs::engine::MatchEngine;
///
/// let mut engine = MatchEngine::default();
/// engine.register_all((0..4).map(|i| {
///     Box::new(SimCard::new(CardId::new(i), MatchId::new(i / 2))) as Box<dyn Card>
/// }));
///
/// engine.handle_click(CardId::new(0));
/// engine.handle_click(CardId::new(1));
/// engine.tick(Duration::from_secs(2));
///
/// assert_eq!(engine.total_matches(), 1);
/// assert_eq!(engine.matched_count(), 2);
/// ```
#[derive(Debug)]
pub struct MatchEngine {
    timing: TimingConfig,

    /// Every card in play.
    cards: FxHashMap<CardId, Box<dyn Card>>,

    /// Clicked cards not yet paired.
    queue: ClickQueue,

    /// Registered cards confirmed matched. Only grows within a game, except
    /// that an unregistered card leaves it along with `cards`.
    matched: FxHashSet<CardId>,

    /// Pair under comparison. Cleared once its cards leave engine custody
    /// (moved to `matched`, or flipped back).
    current_pair: Option<CardPair>,

    /// True from the moment a cycle takes its first pair until the queue
    /// runs dry.
    is_processing: bool,

    total_matches: u32,

    /// Guards the once-per-game `AllMatched`.
    completion_sent: bool,

    scheduler: Scheduler<CycleStep>,
    events: EventChannel<MatchEvent>,
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}

impl MatchEngine {
    /// Create an empty engine with the given delays.
    #[must_use]
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            cards: FxHashMap::default(),
            queue: ClickQueue::new(),
            matched: FxHashSet::default(),
            current_pair: None,
            is_processing: false,
            total_matches: 0,
            completion_sent: false,
            scheduler: Scheduler::new(),
            events: EventChannel::new(),
        }
    }

    /// The configured delays.
    #[must_use]
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Subscribe a listener to `Matched`, `Mismatched` and `AllMatched`.
    pub fn subscribe<L>(&mut self, listener: &Rc<RefCell<L>>) -> ListenerId
    where
        L: Listener<MatchEvent> + 'static,
    {
        self.events.subscribe(listener)
    }

    /// Remove a listener.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Direct access to the notification channel.
    pub fn events_mut(&mut self) -> &mut EventChannel<MatchEvent> {
        &mut self.events
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Put a card in play. Returns `false` if its id is already registered,
    /// in which case `card` is dropped and the registered one kept.
    pub fn register(&mut self, card: Box<dyn Card>) -> bool {
        let id = card.id();
        if self.cards.contains_key(&id) {
            return false;
        }
        self.cards.insert(id, card);
        true
    }

    /// Register several cards. Returns how many were new.
    pub fn register_all<I>(&mut self, cards: I) -> usize
    where
        I: IntoIterator<Item = Box<dyn Card>>,
    {
        let mut added = 0;
        for card in cards {
            if self.register(card) {
                added += 1;
            }
        }
        log::debug!("registered {} cards ({} in play)", added, self.cards.len());
        added
    }

    /// Take a card out of play. No-op if absent.
    ///
    /// A queued card leaves the queue too. A card already in the current
    /// pair stays there; the comparison drops a pair that lost a card.
    ///
    /// A matched card also leaves the matched set, so completion is always
    /// judged over the cards still in play. If removing the last unmatched
    /// card completes the game, `AllMatched` is sent here when idle, or by
    /// the running cycle once it settles.
    pub fn unregister(&mut self, id: CardId) -> Option<Box<dyn Card>> {
        let card = self.cards.remove(&id)?;
        self.queue.remove(id);
        self.matched.remove(&id);
        if !self.is_processing {
            self.check_completion();
        }
        Some(card)
    }

    /// Drop every card and all game state. Used before dealing a new grid.
    ///
    /// Listeners stay subscribed.
    pub fn clear_all(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.cards.clear();
        self.clear_game_state();
        log::debug!("engine cleared ({} pending steps cancelled)", cancelled);
    }

    /// Restart the current grid: cancel the running cycle, forget every
    /// click and match, and turn every card face down.
    ///
    /// No step scheduled before the reset runs afterwards.
    pub fn reset_game(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.clear_game_state();

        for card in self.cards.values_mut() {
            if card.display_state() != DisplayState::FaceDown {
                card.flip_to_back(None);
            }
        }
        log::debug!("game reset ({} pending steps cancelled)", cancelled);
    }

    fn clear_game_state(&mut self) {
        self.queue.clear();
        self.matched.clear();
        self.current_pair = None;
        self.is_processing = false;
        self.total_matches = 0;
        self.completion_sent = false;
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// A card was clicked. Returns `true` if the click was queued.
    ///
    /// Clicks on unknown cards and on cards that are not face down are
    /// ignored, as are clicks on cards already queued, matched, or in the
    /// pair under comparison. Ignored clicks change nothing.
    pub fn handle_click(&mut self, id: CardId) -> bool {
        let Some(card) = self.cards.get(&id) else {
            log::trace!("click on unregistered {}", id);
            return false;
        };
        if !card.accepts_click() {
            log::trace!("{} is {:?}; click ignored", id, card.display_state());
            return false;
        }
        self.on_card_clicked(id)
    }

    fn on_card_clicked(&mut self, id: CardId) -> bool {
        if self.matched.contains(&id)
            || self.queue.contains(id)
            || self.current_pair.is_some_and(|pair| pair.contains(id))
        {
            log::trace!("{} already in play; click ignored", id);
            return false;
        }

        self.queue.push(id);
        if let Some(card) = self.cards.get_mut(&id) {
            card.flip_to_front(None);
        }

        if !self.is_processing && self.queue.len() >= 2 {
            self.is_processing = true;
            self.take_next_pair();
        }
        true
    }

    // =========================================================================
    // Resolution cycle
    // =========================================================================

    /// Advance time by `dt`.
    ///
    /// Runs every cycle step that falls due, in order, each at its own due
    /// time. Card animations advance up to each step before it runs, so an
    /// animation a step starts only sees the time left after that step.
    pub fn tick(&mut self, dt: Duration) {
        let target = self.scheduler.now() + dt;
        let mut animated_to = self.scheduler.now();
        while let Some((_, step)) = self.scheduler.pop_due(target) {
            let due = self.scheduler.now();
            self.update_cards(due.saturating_sub(animated_to));
            animated_to = due;
            self.run_step(step);
        }
        self.scheduler.advance_to(target);
        self.update_cards(target.saturating_sub(animated_to));
    }

    fn update_cards(&mut self, dt: Duration) {
        if dt.is_zero() {
            return;
        }
        for card in self.cards.values_mut() {
            card.update(dt);
        }
    }

    fn run_step(&mut self, step: CycleStep) {
        log::debug!("t={:?} {:?}", self.scheduler.now(), step);
        match step {
            CycleStep::Compare(pair) => self.compare(pair),
            CycleStep::FinishMatch(pair) => self.finish_match(pair),
            CycleStep::FlipBack(pair) => {
                self.flip_back(pair);
                self.current_pair = None;
                self.schedule(self.timing.inter_pair_delay, CycleStep::NextPair);
            }
            CycleStep::NextPair => self.take_next_pair(),
        }
    }

    fn take_next_pair(&mut self) {
        match self.queue.pop_pair() {
            Some(pair) => {
                self.current_pair = Some(pair);
                self.schedule(self.timing.reveal_hold, CycleStep::Compare(pair));
            }
            None => {
                self.current_pair = None;
                self.is_processing = false;
                self.check_completion();
            }
        }
    }

    fn compare(&mut self, pair: CardPair) {
        let (Some(first), Some(second)) = (self.identity(pair.first), self.identity(pair.second))
        else {
            log::debug!("{} lost a card before comparison; dropped", pair);
            self.flip_back(pair);
            self.current_pair = None;
            self.schedule(self.timing.inter_pair_delay, CycleStep::NextPair);
            return;
        };

        if first == second {
            self.matched.insert(pair.first);
            self.matched.insert(pair.second);
            self.current_pair = None;
            self.events.emit(&MatchEvent::Matched(pair));
            self.schedule(self.timing.display_hold, CycleStep::FinishMatch(pair));
        } else {
            self.events.emit(&MatchEvent::Mismatched(pair));
            self.schedule(self.timing.flip_back_delay, CycleStep::FlipBack(pair));
        }
    }

    fn finish_match(&mut self, pair: CardPair) {
        for id in pair.members() {
            if let Some(card) = self.cards.get_mut(&id) {
                card.play_matched_animation(None);
            }
        }
        self.total_matches += 1;
        self.check_completion();
        self.schedule(self.timing.inter_pair_delay, CycleStep::NextPair);
    }

    /// Send `AllMatched` the first time every card in play is matched.
    fn check_completion(&mut self) {
        if !self.completion_sent && self.is_game_complete() {
            self.completion_sent = true;
            log::info!("all {} cards matched", self.cards.len());
            self.events.emit(&MatchEvent::AllMatched);
        }
    }

    fn flip_back(&mut self, pair: CardPair) {
        for id in pair.members() {
            if let Some(card) = self.cards.get_mut(&id) {
                card.flip_to_back(None);
            }
        }
    }

    fn schedule(&mut self, delay: Duration, step: CycleStep) {
        self.scheduler.schedule_after(delay, step);
    }

    fn identity(&self, id: CardId) -> Option<MatchId> {
        self.cards.get(&id).map(|card| card.identity())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Successful pair resolutions since the last reset.
    #[must_use]
    pub fn total_matches(&self) -> u32 {
        self.total_matches
    }

    /// Cards confirmed matched.
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// Cards in play.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    /// Cards clicked and waiting for a partner.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Check if every card in play is matched. Always `false` with no cards.
    #[must_use]
    pub fn is_game_complete(&self) -> bool {
        !self.cards.is_empty() && self.matched.len() == self.cards.len()
    }

    /// Check if a resolution cycle is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// The pair under comparison.
    #[must_use]
    pub fn current_pair(&self) -> Option<CardPair> {
        self.current_pair
    }

    /// Check if a card is confirmed matched.
    #[must_use]
    pub fn is_matched(&self, id: CardId) -> bool {
        self.matched.contains(&id)
    }

    /// Check if a card is waiting in the queue.
    #[must_use]
    pub fn is_queued(&self, id: CardId) -> bool {
        self.queue.contains(id)
    }

    /// Check if a card is in play.
    #[must_use]
    pub fn is_registered(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Waiting cards, oldest first.
    pub fn queued(&self) -> impl Iterator<Item = CardId> + '_ {
        self.queue.iter()
    }

    /// Look up a card.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&dyn Card> {
        self.cards.get(&id).map(|card| card.as_ref())
    }

    /// Ids of every card in play, ascending.
    #[must_use]
    pub fn card_ids(&self) -> Vec<CardId> {
        let mut ids: Vec<_> = self.cards.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Engine time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// When the suspended cycle resumes, if one is running.
    #[must_use]
    pub fn next_step_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }
}
