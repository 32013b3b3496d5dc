//! Match state management.
//!
//! [`GameEngine`] owns the single running match and applies intents and timed
//! events to it one at a time. Collaborators only ever see [`MatchSnapshot`]s.
//!
//! # Phases
//!
//! ```text
//!   start_game
//!       │
//!       ▼
//! ┌────────────┐  winning swap   ┌───────────┐  advance_level
//! │ InProgress │────────────────▶│ LevelWon  │───────────────┐
//! └────────────┘                 └───────────┘               │
//!       ▲  │ winning swap on                                 │
//!       │  │ the last level      ┌───────────┐               │
//!       │  └────────────────────▶│ GameOver  │               │
//!       │                        └───────────┘               │
//!       └────────────────────────────────────────────────────┘
//! ```
//!
//! `restart` drops the match from any phase.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::clock::{ClockTick, Scheduler, TimedEvent, TimerHandle, TurnClock};
use super::config::{GameConfig, Timings};
use super::error::{GameError, IllegalMove};
use super::player::{PlayerState, Roster};
use super::scoring;
use super::sequence::{correct_positions, LevelGenerator, LevelLayout, ShuffledLevels, Symbol};
use super::snapshot::{MatchSnapshot, PointChange, TurnChange};
use super::summary::{standings, Standings};

/// Match state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Players are arranging the current level.
    InProgress,
    /// Level solved, waiting for `advance_level`.
    LevelWon,
    /// Last level solved.
    GameOver,
}

impl MatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::LevelWon => "level_won",
            Self::GameOver => "game_over",
        }
    }

    /// Check if moves can be made.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Check if the match cannot change any more.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GameOver)
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a swap led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The sequence is solved.
    LevelWon {
        winner: usize,
        bonus: i32,
        game_over: bool,
    },
    /// No improvement in a multiplayer match; the turn passes shortly.
    TurnForfeited,
    /// Progress, or any unsolved move in a solo match. Turn clock refilled.
    Progress,
}

/// Result of an applied swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub delta: i32,
    pub correct_count: usize,
    pub result: MoveResult,
}

/// Authoritative state of one match.
#[derive(Debug, Clone)]
pub struct MatchState {
    pool: Vec<Symbol>,
    timings: Timings,

    /// Current level (0-indexed)
    pub level: u32,

    /// Levels in the match
    pub max_levels: u32,

    /// The answer key, never shown to players
    secret_order: Vec<Symbol>,

    /// Arrangement on the board
    player_order: Vec<Symbol>,

    roster: Roster,
    active_player: usize,
    correct_count: usize,
    board_locked: bool,
    winner: Option<usize>,
    phase: MatchPhase,
    clock: TurnClock,

    /// Player being announced during a turn change
    pending_turn_change: Option<usize>,

    selected_index: Option<usize>,
    swapped_indices: Option<(usize, usize)>,
    point_change: Option<PointChange>,
    point_serial: u64,

    absorb_timer: Option<TimerHandle>,
    rotation_timer: Option<TimerHandle>,
    point_change_timer: Option<TimerHandle>,
    swap_highlight_timer: Option<TimerHandle>,

    /// When the match started
    pub started_at: DateTime<Utc>,

    /// When the current level started
    pub level_started_at: DateTime<Utc>,
}

impl MatchState {
    fn new(config: &GameConfig, layout: LevelLayout, scheduler: &mut Scheduler) -> Self {
        let roster = Roster::from_names(&config.resolved_names());
        let clock = TurnClock::new(
            config.timings.turn_seconds,
            config.timings.tick(),
            roster.is_multiplayer(),
        );
        let now = Utc::now();

        let mut state = Self {
            pool: config.pool.clone(),
            timings: config.timings,
            level: 0,
            max_levels: config.max_levels,
            secret_order: Vec::new(),
            player_order: Vec::new(),
            roster,
            active_player: 0,
            correct_count: 0,
            board_locked: false,
            winner: None,
            phase: MatchPhase::InProgress,
            clock,
            pending_turn_change: None,
            selected_index: None,
            swapped_indices: None,
            point_change: None,
            point_serial: 0,
            absorb_timer: None,
            rotation_timer: None,
            point_change_timer: None,
            swap_highlight_timer: None,
            started_at: now,
            level_started_at: now,
        };
        state.load_level(layout, 0, scheduler);
        state
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn sequence_length(&self) -> usize {
        self.secret_order.len()
    }

    pub fn player_order(&self) -> &[Symbol] {
        &self.player_order
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    pub fn players(&self) -> &[PlayerState] {
        self.roster.players()
    }

    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    pub fn active_player(&self) -> usize {
        self.active_player
    }

    pub fn is_board_locked(&self) -> bool {
        self.board_locked
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn turn_time_remaining(&self) -> u32 {
        self.clock.remaining()
    }

    pub fn pending_turn_change(&self) -> Option<usize> {
        self.pending_turn_change
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            level: self.level,
            max_levels: self.max_levels,
            sequence_length: self.secret_order.len(),
            player_order: self.player_order.clone(),
            correct_count: self.correct_count,
            players: self.roster.players().to_vec(),
            active_player: self.active_player,
            board_locked: self.board_locked,
            turn_time_remaining: self.clock.remaining(),
            phase: self.phase,
            winner: self.winner,
            pending_turn_change: self
                .pending_turn_change
                .map(|next_player| TurnChange { next_player }),
            selected_index: self.selected_index,
            swapped_indices: self.swapped_indices,
            point_change: self.point_change,
            started_at: self.started_at,
            level_started_at: self.level_started_at,
        }
    }

    /// Install a fresh level and hand the board to `starting_player`.
    fn load_level(&mut self, layout: LevelLayout, starting_player: usize, scheduler: &mut Scheduler) {
        self.cancel_timers(scheduler);

        self.correct_count = correct_positions(&layout.start, &layout.secret);
        self.secret_order = layout.secret;
        self.player_order = layout.start;
        self.active_player = starting_player;
        self.winner = None;
        self.phase = MatchPhase::InProgress;
        self.board_locked = false;
        self.pending_turn_change = None;
        self.selected_index = None;
        self.swapped_indices = None;
        self.point_change = None;
        self.level_started_at = Utc::now();
        self.clock.reset(scheduler);
    }

    fn cancel_timers(&mut self, scheduler: &mut Scheduler) {
        self.clock.stop(scheduler);
        scheduler.cancel_slot(&mut self.absorb_timer);
        scheduler.cancel_slot(&mut self.rotation_timer);
        scheduler.cancel_slot(&mut self.point_change_timer);
        scheduler.cancel_slot(&mut self.swap_highlight_timer);
    }

    fn check_move(&self, indices: &[usize]) -> Result<(), IllegalMove> {
        if !self.phase.is_active() {
            return Err(IllegalMove::NotInProgress);
        }
        if self.board_locked {
            return Err(IllegalMove::BoardLocked);
        }
        let len = self.player_order.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(IllegalMove::OutOfRange { index, len });
        }
        Ok(())
    }

    fn apply_swap(&mut self, i: usize, j: usize, scheduler: &mut Scheduler) -> SwapOutcome {
        let old_correct = self.correct_count;
        self.player_order.swap(i, j);
        self.correct_count = correct_positions(&self.player_order, &self.secret_order);
        let new_correct = self.correct_count;

        let delta = scoring::evaluate_move(old_correct, new_correct);
        let player = self.active_player;
        if delta != 0 {
            self.roster.add_points(player, delta);
            self.show_point_change(player, delta, scheduler);
        }
        self.selected_index = None;
        self.highlight_swap(i, j, scheduler);

        debug!(player, i, j, old_correct, new_correct, delta, "Swap applied");

        let result = if new_correct == self.secret_order.len() {
            self.win(scheduler)
        } else if new_correct <= old_correct && self.roster.is_multiplayer() {
            self.forfeit_turn(scheduler);
            MoveResult::TurnForfeited
        } else {
            self.clock.reset(scheduler);
            MoveResult::Progress
        };

        SwapOutcome {
            delta,
            correct_count: new_correct,
            result,
        }
    }

    fn win(&mut self, scheduler: &mut Scheduler) -> MoveResult {
        let winner = self.active_player;
        let bonus = scoring::evaluate_level_bonus(self.level);
        self.roster.add_points(winner, bonus);
        self.winner = Some(winner);

        self.clock.stop(scheduler);
        scheduler.cancel_slot(&mut self.absorb_timer);
        scheduler.cancel_slot(&mut self.rotation_timer);
        self.pending_turn_change = None;
        self.board_locked = true;
        self.show_point_change(winner, bonus, scheduler);

        let game_over = self.level + 1 >= self.max_levels;
        self.phase = if game_over {
            MatchPhase::GameOver
        } else {
            MatchPhase::LevelWon
        };

        info!(level = self.level, winner, bonus, game_over, "Level solved");
        MoveResult::LevelWon {
            winner,
            bonus,
            game_over,
        }
    }

    /// Lock the board and let the move sink in before the turn passes.
    fn forfeit_turn(&mut self, scheduler: &mut Scheduler) {
        self.board_locked = true;
        self.clock.stop(scheduler);
        scheduler.cancel_slot(&mut self.absorb_timer);
        self.absorb_timer = Some(scheduler.schedule(self.timings.move_absorb(), TimedEvent::MoveAbsorbed));
    }

    /// Announce the next player; control moves when the announcement ends.
    fn begin_rotation(&mut self, scheduler: &mut Scheduler) {
        let next_player = self.roster.next_after(self.active_player);
        self.board_locked = true;
        self.clock.stop(scheduler);
        self.pending_turn_change = Some(next_player);

        scheduler.cancel_slot(&mut self.rotation_timer);
        self.rotation_timer = Some(scheduler.schedule(
            self.timings.turn_announce(),
            TimedEvent::TurnRotation { next_player },
        ));
        debug!(from = self.active_player, to = next_player, "Turn change announced");
    }

    fn complete_rotation(&mut self, next_player: usize, scheduler: &mut Scheduler) {
        self.pending_turn_change = None;
        self.active_player = next_player;
        self.selected_index = None;
        self.board_locked = false;
        self.clock.reset(scheduler);
        debug!(player = next_player, "Turn started");
    }

    fn show_point_change(&mut self, player: usize, value: i32, scheduler: &mut Scheduler) {
        self.point_serial += 1;
        self.point_change = Some(PointChange {
            player,
            value,
            serial: self.point_serial,
        });
        scheduler.cancel_slot(&mut self.point_change_timer);
        self.point_change_timer =
            Some(scheduler.schedule(self.timings.point_change(), TimedEvent::ClearPointChange));
    }

    fn highlight_swap(&mut self, i: usize, j: usize, scheduler: &mut Scheduler) {
        self.swapped_indices = Some((i, j));
        scheduler.cancel_slot(&mut self.swap_highlight_timer);
        self.swap_highlight_timer =
            Some(scheduler.schedule(self.timings.swap_highlight(), TimedEvent::ClearSwapHighlight));
    }

    /// Apply a fired event. Returns whether anything changed.
    fn handle_timer(&mut self, handle: TimerHandle, event: TimedEvent, scheduler: &mut Scheduler) -> bool {
        match event {
            TimedEvent::TurnTick => {
                if !self.phase.is_active() {
                    return false;
                }
                match self.clock.on_tick(handle, scheduler) {
                    ClockTick::Stale => false,
                    ClockTick::Running(_) => true,
                    ClockTick::Expired => {
                        debug!(player = self.active_player, "Turn clock expired");
                        self.begin_rotation(scheduler);
                        true
                    }
                }
            }
            TimedEvent::MoveAbsorbed => {
                if self.absorb_timer != Some(handle) {
                    return false;
                }
                self.absorb_timer = None;
                if !self.phase.is_active() {
                    return false;
                }
                self.begin_rotation(scheduler);
                true
            }
            TimedEvent::TurnRotation { next_player } => {
                if self.rotation_timer != Some(handle) {
                    return false;
                }
                self.rotation_timer = None;
                if !self.phase.is_active() {
                    return false;
                }
                self.complete_rotation(next_player, scheduler);
                true
            }
            TimedEvent::ClearPointChange => {
                if self.point_change_timer != Some(handle) {
                    return false;
                }
                self.point_change_timer = None;
                self.point_change.take().is_some()
            }
            TimedEvent::ClearSwapHighlight => {
                if self.swap_highlight_timer != Some(handle) {
                    return false;
                }
                self.swap_highlight_timer = None;
                self.swapped_indices.take().is_some()
            }
        }
    }
}

/// Handle returned by [`GameEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Option<&MatchSnapshot>)>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, snapshot: Option<&MatchSnapshot>) {
        for (_, listener) in &mut self.listeners {
            listener(snapshot);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}

/// The puzzle engine.
///
/// Owns the match, the level generator and the timeline of scheduled events.
/// Time only moves through [`GameEngine::advance`].
#[derive(Debug)]
pub struct GameEngine<G = ShuffledLevels> {
    generator: G,
    scheduler: Scheduler,
    current: Option<MatchState>,
    subscribers: Subscribers,
}

impl GameEngine<ShuffledLevels> {
    /// Engine with randomly seeded levels.
    pub fn new() -> Self {
        Self::with_generator(ShuffledLevels::from_entropy())
    }

    /// Engine whose levels are reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_generator(ShuffledLevels::seeded(seed))
    }
}

impl Default for GameEngine<ShuffledLevels> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: LevelGenerator> GameEngine<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator,
            scheduler: Scheduler::new(),
            current: None,
            subscribers: Subscribers::default(),
        }
    }

    /// The running match, if any.
    pub fn current(&self) -> Option<&MatchState> {
        self.current.as_ref()
    }

    pub fn snapshot(&self) -> Option<MatchSnapshot> {
        self.current.as_ref().map(MatchState::snapshot)
    }

    /// Position on the engine's timeline.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Number of timed events still queued.
    pub fn pending_events(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Start a match at level 0. A running match is replaced.
    #[instrument(skip(self, config), fields(players = config.num_players, max_levels = config.max_levels))]
    pub fn start_game(&mut self, config: GameConfig) -> Result<MatchSnapshot, GameError> {
        config.validate()?;
        let layout = self.generator.generate(&config.pool, 0)?;

        if self.current.take().is_some() {
            warn!("Replacing a running match");
        }
        self.scheduler.cancel_all();

        let state = MatchState::new(&config, layout, &mut self.scheduler);
        info!(
            sequence_length = state.sequence_length(),
            "Match started"
        );
        let snapshot = state.snapshot();
        self.current = Some(state);
        self.notify();
        Ok(snapshot)
    }

    /// Exchange two positions for the active player.
    #[instrument(skip(self))]
    pub fn swap(&mut self, i: usize, j: usize) -> Result<SwapOutcome, GameError> {
        let state = self.current.as_mut().ok_or(GameError::NoActiveMatch)?;

        let checked = state.check_move(&[i, j]).and_then(|()| {
            if i == j {
                Err(IllegalMove::SameIndex)
            } else {
                Ok(())
            }
        });
        if let Err(err) = checked {
            debug!(%err, "Swap rejected");
            return Err(err.into());
        }

        let outcome = state.apply_swap(i, j, &mut self.scheduler);
        self.notify();
        Ok(outcome)
    }

    /// Click-style selection.
    ///
    /// The first pick selects, picking it again deselects, and picking another
    /// position swaps the two.
    #[instrument(skip(self))]
    pub fn select(&mut self, index: usize) -> Result<Option<SwapOutcome>, GameError> {
        let state = self.current.as_mut().ok_or(GameError::NoActiveMatch)?;
        if let Err(err) = state.check_move(&[index]) {
            debug!(%err, "Selection rejected");
            return Err(err.into());
        }

        let outcome = match state.selected_index {
            None => {
                state.selected_index = Some(index);
                None
            }
            Some(selected) if selected == index => {
                state.selected_index = None;
                None
            }
            Some(selected) => Some(state.apply_swap(selected, index, &mut self.scheduler)),
        };
        self.notify();
        Ok(outcome)
    }

    pub fn clear_selection(&mut self) {
        let cleared = self
            .current
            .as_mut()
            .and_then(|state| state.selected_index.take())
            .is_some();
        if cleared {
            self.notify();
        }
    }

    /// Move on from a solved level. The level's winner starts the next one.
    #[instrument(skip(self))]
    pub fn advance_level(&mut self) -> Result<MatchSnapshot, GameError> {
        let state = self.current.as_mut().ok_or(GameError::NoActiveMatch)?;
        if state.phase != MatchPhase::LevelWon {
            return Err(GameError::InvalidStatus {
                action: "advance level",
                phase: state.phase,
            });
        }

        let next_level = state.level + 1;
        let layout = self.generator.generate(&state.pool, next_level)?;
        let starting_player = state.winner.unwrap_or(0);

        state.level = next_level;
        state.load_level(layout, starting_player, &mut self.scheduler);
        info!(
            level = next_level,
            starting_player,
            sequence_length = state.sequence_length(),
            "Level started"
        );

        let snapshot = state.snapshot();
        self.notify();
        Ok(snapshot)
    }

    /// Drop the match from any phase.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        let dropped = self.scheduler.cancel_all();
        if let Some(state) = self.current.take() {
            info!(
                level = state.level,
                phase = state.phase.as_str(),
                dropped_events = dropped,
                "Match reset"
            );
        }
        self.notify();
    }

    /// Move time forward, firing due events in order.
    ///
    /// Returns how many events changed the match.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let until = self.scheduler.now() + elapsed;
        let mut applied = 0;

        while let Some((handle, event)) = self.scheduler.pop_due(until) {
            let changed = match self.current.as_mut() {
                Some(state) => state.handle_timer(handle, event, &mut self.scheduler),
                None => false,
            };
            if changed {
                applied += 1;
                self.notify();
            }
        }

        self.scheduler.settle(until);
        applied
    }

    /// Final scoreboard once the last level is solved.
    pub fn final_standings(&self) -> Option<Standings> {
        self.current
            .as_ref()
            .filter(|state| state.is_game_over())
            .map(|state| standings(state.players()))
    }

    /// Call `listener` with a fresh snapshot after every change.
    ///
    /// `None` means no match is running.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(Option<&MatchSnapshot>) + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    fn notify(&mut self) {
        if self.subscribers.listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.subscribers.emit(snapshot.as_ref());
    }
}
