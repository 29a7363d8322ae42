//! Turn arbitration between two agents.
//!
//! The arbiter owns the game state and both agents for the whole game:
//!
//! ```text
//! send(previous move) → receive(deadline) → parse → check_legal → apply → termination?
//!        ▲                                                                  │ no
//!        └────────────────────────── other agent ◄──────────────────────────┘
//! ```
//!
//! Every way out of the loop produces a [`Verdict`] and tears both agents
//! down.

use crate::agent::{Agent, AgentOptions};
use crate::game::{
    EndReason, GameState, IllegalMove, Move, MoveOutcome, ParseMoveError, Player, Scores, apply,
    assert_invariants, check_invariants, check_legal, termination,
};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// First message sent to the agent that opens the game.
pub const START: &str = "START";

/// Default time an agent has to answer.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(3);

/// Configuration for a single game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbiterConfig {
    /// Deadline for each agent response.
    pub turn_timeout: Duration,
    /// Send `RESULT <s1> <s2>` to both agents after a natural end.
    pub notify_result: bool,
    /// How agent processes are launched.
    pub agent: AgentOptions,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            notify_result: true,
            agent: AgentOptions::default(),
        }
    }
}

/// Why an agent's answer was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The text is not a move.
    #[error("malformed move: {0}")]
    Malformed(#[from] ParseMoveError),
    /// The move breaks a rule.
    #[error("illegal move: {0}")]
    Illegal(#[from] IllegalMove),
}

impl Serialize for Rejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One applied move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    /// Side that moved.
    pub player: Player,
    /// Name of the agent that moved.
    pub agent: String,
    /// Raw text the agent sent.
    pub text: String,
    /// The parsed move.
    pub mv: Move,
    /// What the move did.
    pub outcome: MoveOutcome,
    /// State after the move.
    pub state: GameState,
}

impl Round {
    /// Moves applied so far, this one included.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.state.moves_count
    }

    /// Scores after the move.
    #[must_use]
    pub const fn scores(&self) -> Scores {
        self.state.scores
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scores = self.scores();
        write!(f, "RESULT {} {} {}", self.text, scores.p1, scores.p2)
    }
}

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// An agent did not deliver a line in time (slow, crashed or unreachable).
    Timeout {
        /// Scores when the game stopped.
        scores: Scores,
        /// Side of the offending agent.
        player: Player,
        /// Name of the offending agent.
        agent: String,
    },
    /// An agent sent something that is not a legal move.
    InvalidMove {
        /// Scores when the game stopped.
        scores: Scores,
        /// Side of the offending agent.
        player: Player,
        /// Name of the offending agent.
        agent: String,
        /// The raw text it sent.
        text: String,
        /// Why the text was refused.
        reason: Rejection,
    },
    /// The move limit was reached.
    Limit {
        /// Final scores.
        scores: Scores,
    },
    /// The game ended by score or by running out of seeds.
    Finished {
        /// Final scores.
        scores: Scores,
        /// Which end condition held.
        reason: EndReason,
    },
}

impl Verdict {
    /// Scores at the end of the game.
    #[must_use]
    pub const fn scores(&self) -> Scores {
        match self {
            Verdict::Timeout { scores, .. }
            | Verdict::InvalidMove { scores, .. }
            | Verdict::Limit { scores }
            | Verdict::Finished { scores, .. } => *scores,
        }
    }

    /// Side that forfeited, if the game ended on a fault.
    #[must_use]
    pub const fn offender(&self) -> Option<Player> {
        match self {
            Verdict::Timeout { player, .. } | Verdict::InvalidMove { player, .. } => Some(*player),
            Verdict::Limit { .. } | Verdict::Finished { .. } => None,
        }
    }

    /// Winning side: the opponent of a faulting agent, otherwise the higher
    /// score. `None` for a draw.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        if let Some(offender) = self.offender() {
            return Some(offender.opponent());
        }
        let scores = self.scores();
        match scores.p1.cmp(&scores.p2) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Timeout { scores, agent, .. } => {
                write!(f, "RESULT TIMEOUT {} {} (Joueur {agent})", scores.p1, scores.p2)
            }
            Verdict::InvalidMove {
                scores, agent, text, ..
            } => write!(
                f,
                "RESULT INVALID_MOVE {} {} ({agent} a joué {text})",
                scores.p1, scores.p2
            ),
            Verdict::Limit { scores } => write!(f, "RESULT LIMIT {} {}", scores.p1, scores.p2),
            Verdict::Finished { scores, .. } => write!(f, "RESULT {} {}", scores.p1, scores.p2),
        }
    }
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReport {
    /// How the game ended.
    pub verdict: Verdict,
    /// State when the game ended.
    pub state: GameState,
    /// Moves applied during this game.
    pub rounds: u32,
}

/// Runs one game between two agents.
///
/// Agents are destroyed when [`run`](Arbiter::run) returns, and also when the
/// arbiter is dropped (for example while unwinding from a panic in the round
/// observer).
#[derive(Debug)]
pub struct Arbiter<A: Agent> {
    /// Agents indexed by `Player::index`.
    agents: [A; 2],
    state: GameState,
    to_move: Player,
    config: ArbiterConfig,
    /// Assert invariants after every move (only when the start state is consistent).
    check_invariants: bool,
}

impl<A: Agent> Arbiter<A> {
    /// Game from the initial position with `first` moving first.
    #[must_use]
    pub fn new(first: A, second: A, config: ArbiterConfig) -> Self {
        Self::with_state(first, second, config, GameState::new(), Player::One)
    }

    /// Game from an arbitrary position.
    ///
    /// `first` plays [`Player::One`], `second` plays [`Player::Two`]; `to_move`
    /// receives [`START`].
    #[must_use]
    pub fn with_state(
        first: A,
        second: A,
        config: ArbiterConfig,
        state: GameState,
        to_move: Player,
    ) -> Self {
        Self {
            agents: [first, second],
            check_invariants: check_invariants(&state).is_empty(),
            state,
            to_move,
            config,
        }
    }

    /// Current game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Play the game to its verdict, calling `on_round` after every applied move.
    #[must_use]
    pub fn run(mut self, mut on_round: impl FnMut(&Round)) -> GameReport {
        info!(
            first = self.agents[0].name(),
            second = self.agents[1].name(),
            to_move = %self.to_move,
            "game started"
        );

        let report = self.play(&mut on_round);
        self.shutdown();

        info!(verdict = %report.verdict, rounds = report.rounds, "game over");
        report
    }

    fn play(&mut self, on_round: &mut impl FnMut(&Round)) -> GameReport {
        let mut message = START.to_string();
        let mut rounds = 0;

        loop {
            let player = self.to_move;
            let timeout = self.config.turn_timeout;
            let agent = &mut self.agents[player.index()];

            let reply = agent.send(&message).and_then(|()| agent.receive(timeout));
            let text = match reply {
                Ok(text) => text,
                Err(e) => {
                    warn!(agent = agent.name(), error = %e, "no valid response");
                    let verdict = Verdict::Timeout {
                        scores: self.state.scores,
                        player,
                        agent: agent.name().to_string(),
                    };
                    return self.report(verdict, rounds);
                }
            };

            let mv = match validate(&self.state, &text, player) {
                Ok(mv) => mv,
                Err(reason) => {
                    warn!(agent = agent.name(), text = %text, %reason, "move rejected");
                    let verdict = Verdict::InvalidMove {
                        scores: self.state.scores,
                        player,
                        agent: agent.name().to_string(),
                        text,
                        reason,
                    };
                    return self.report(verdict, rounds);
                }
            };

            let outcome = apply(&mut self.state, mv, player);
            if self.check_invariants {
                assert_invariants(&self.state);
            }
            rounds += 1;

            let round = Round {
                player,
                agent: agent.name().to_string(),
                text,
                mv,
                outcome,
                state: self.state,
            };
            debug!(
                agent = %round.agent,
                mv = %round.mv,
                captured = outcome.captured,
                p1 = self.state.score_p1(),
                p2 = self.state.score_p2(),
                "move applied"
            );
            on_round(&round);

            if let Some(reason) = termination(&self.state) {
                let scores = self.state.scores;
                let verdict = match reason {
                    EndReason::MoveLimit => Verdict::Limit { scores },
                    reason => Verdict::Finished { scores, reason },
                };
                if self.config.notify_result {
                    self.notify_result();
                }
                return self.report(verdict, rounds);
            }

            message = round.text;
            self.to_move = player.opponent();
        }
    }

    /// Best-effort final scores for both agents; the verdict is already decided.
    fn notify_result(&mut self) {
        let line = format!("RESULT {} {}", self.state.score_p1(), self.state.score_p2());
        let current = self.to_move.index();
        for index in [current, 1 - current] {
            let agent = &mut self.agents[index];
            if let Err(e) = agent.send(&line) {
                debug!(agent = agent.name(), error = %e, "result notification not delivered");
            }
        }
    }

    fn report(&self, verdict: Verdict, rounds: u32) -> GameReport {
        GameReport {
            verdict,
            state: self.state,
            rounds,
        }
    }

    fn shutdown(&mut self) {
        for agent in &mut self.agents {
            agent.destroy();
        }
    }
}

impl<A: Agent> Drop for Arbiter<A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Parse an agent's answer and check it against the rules.
fn validate(state: &GameState, text: &str, player: Player) -> Result<Move, Rejection> {
    let mv: Move = text.parse()?;
    check_legal(state, mv, player)?;
    Ok(mv)
}
