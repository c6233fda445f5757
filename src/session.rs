//! Session orchestrator: the action → observe → learn turn loop.
//!
//! One orchestrator drives one question/answer session. It asks the active
//! agent for a difficulty, pulls tagged content from the host, scores the
//! outcome, applies the mode-appropriate learning step (immediate TD update
//! for SARSA, episode buffering for Monte Carlo) and persists the agent
//! when the question budget is exhausted. Content rendering and gameplay
//! effects stay on the host side of the collaborator ports; the returned
//! [`TurnReport`] is all the host needs to apply them.

use std::sync::Arc;

use crate::{
    Result,
    agents::{Episode, EpisodeStep, SessionAgent},
    error::Error,
    metrics::SessionMetrics,
    ports::{AnswerEvaluator, ContentSource, DifficultyAgent, SessionClock, SnapshotRepository},
    reward::RewardModel,
    snapshot::AgentKind,
    state::{StateEncoder, StateKey},
    types::{DifficultyLevel, Observation, Question},
};

/// Session-level knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Total question budget for the session.
    pub total_questions: usize,
    /// Episode length for the episodic agent; ignored by SARSA.
    pub questions_per_episode: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_questions: 15,
            questions_per_episode: 5,
        }
    }
}

impl SessionConfig {
    fn validate(&self, kind: AgentKind) -> Result<()> {
        if self.total_questions == 0 {
            return Err(Error::InvalidConfiguration {
                message: "total_questions must be positive".to_string(),
            });
        }
        if kind == AgentKind::MonteCarlo {
            if self.questions_per_episode == 0 {
                return Err(Error::InvalidConfiguration {
                    message: "questions_per_episode must be positive".to_string(),
                });
            }
            // A trailing partial episode would either be silently dropped
            // or bias the table; forbid the layout instead.
            if !self.total_questions.is_multiple_of(self.questions_per_episode) {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "total_questions ({}) must be a multiple of questions_per_episode ({})",
                        self.total_questions, self.questions_per_episode
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Where the turn loop currently stands.
///
/// Scoring and the episode boundary run synchronously inside
/// [`SessionOrchestrator::submit_answers`], so only the wait states are
/// observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to pick a difficulty and present a question.
    AwaitingAction,
    /// A question is presented; waiting for the player's answers.
    AwaitingOutcome,
    /// Question budget exhausted or session aborted; no more actions.
    SessionTerminal,
}

/// Outcome of one answered question, for gameplay-effect code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnReport {
    pub difficulty: DifficultyLevel,
    pub correct: bool,
    pub reward: f64,
    pub response_seconds: f64,
    /// An episode boundary was crossed and the policy updated (episodic
    /// mode only; always false for SARSA).
    pub episode_completed: bool,
    /// The session budget is exhausted and the agent has been persisted.
    pub session_finished: bool,
}

struct PendingTurn {
    state: StateKey,
    action: DifficultyLevel,
    question: Question,
}

/// Drives one session's turn loop for either agent kind.
pub struct SessionOrchestrator<C, E, K>
where
    C: ContentSource,
    E: AnswerEvaluator,
    K: SessionClock,
{
    agent: SessionAgent,
    encoder: StateEncoder,
    reward: RewardModel,
    content: C,
    evaluator: E,
    clock: K,
    repository: Arc<dyn SnapshotRepository + Send + Sync>,
    config: SessionConfig,
    phase: Phase,
    metrics: SessionMetrics,
    episode: Episode,
    answered: usize,
    pending: Option<PendingTurn>,
    /// SARSA only: the (s', a') pair already chosen during the last update,
    /// reused for the next question so the policy stays on-policy.
    next_pick: Option<(StateKey, DifficultyLevel)>,
}

impl<C, E, K> SessionOrchestrator<C, E, K>
where
    C: ContentSource,
    E: AnswerEvaluator,
    K: SessionClock,
{
    pub fn new(
        agent: SessionAgent,
        encoder: StateEncoder,
        reward: RewardModel,
        content: C,
        evaluator: E,
        clock: K,
        repository: Arc<dyn SnapshotRepository + Send + Sync>,
        config: SessionConfig,
    ) -> Result<Self> {
        config.validate(agent.kind())?;
        Ok(Self {
            agent,
            encoder,
            reward,
            content,
            evaluator,
            clock,
            repository,
            config,
            phase: Phase::AwaitingAction,
            metrics: SessionMetrics::new(),
            episode: Episode::new(),
            answered: 0,
            pending: None,
            next_pick: None,
        })
    }

    /// Pick a difficulty, fetch a question at it and start the timer.
    ///
    /// The state is recomputed from the latest observation on every call
    /// (stepwise-state), so the episodic agent reacts to each answer when
    /// choosing, even though it only learns at episode boundaries.
    pub fn next_question(&mut self) -> Result<&Question> {
        match self.phase {
            Phase::AwaitingAction => {}
            Phase::AwaitingOutcome => {
                return Err(Error::TurnOrder {
                    expected: "submit_answers must be called before the next question",
                });
            }
            Phase::SessionTerminal => return Err(Error::SessionFinished),
        }

        let (state, action) = match self.next_pick.take() {
            Some(pick) => pick,
            None => {
                let state = self.current_state();
                let action = self.agent.choose_action(&state);
                (state, action)
            }
        };

        let question = self.content.next_question(action)?;
        // Content sources may substitute difficulty (e.g. a depleted pool);
        // the learning step must credit what was actually served.
        let action_taken = question.difficulty;

        self.clock.start_question();
        self.phase = Phase::AwaitingOutcome;
        let pending = self.pending.insert(PendingTurn {
            state,
            action: action_taken,
            question,
        });

        Ok(&pending.question)
    }

    /// Score the submitted answers and run the learning step.
    pub fn submit_answers(&mut self, submitted: &[String]) -> Result<TurnReport> {
        if self.phase == Phase::SessionTerminal {
            return Err(Error::SessionFinished);
        }
        let pending = self.pending.take().ok_or(Error::TurnOrder {
            expected: "next_question must be called before submitting answers",
        })?;

        let response_seconds = self.clock.elapsed_since_question_start();
        let correct = self.evaluator.check(&pending.question, submitted);
        let reward = self.reward.reward(pending.action, correct, response_seconds);

        let observation = Observation {
            difficulty: pending.action,
            correct,
            response_seconds,
        };
        self.metrics.record(observation);
        self.answered += 1;
        let session_finished = self.answered >= self.config.total_questions;

        let next_state = if session_finished {
            StateKey::terminal()
        } else {
            self.current_state()
        };

        let mut episode_completed = false;
        match &mut self.agent {
            SessionAgent::Sarsa(sarsa) => {
                // On-policy: the action used in the update is the action the
                // next question will actually be asked at.
                let next_action = if session_finished {
                    DifficultyLevel::Easy // unused, Q(TERMINAL, ·) is zero
                } else {
                    let action = sarsa.choose_action(&next_state);
                    self.next_pick = Some((next_state.clone(), action));
                    action
                };
                sarsa.update_q_value(
                    &pending.state,
                    pending.action,
                    reward,
                    &next_state,
                    next_action,
                );
                sarsa.decay_epsilon();
            }
            SessionAgent::MonteCarlo(mcc) => {
                self.episode
                    .push(EpisodeStep::new(pending.state, pending.action, reward));
                if self.episode.len() >= self.config.questions_per_episode {
                    mcc.update_policy(&self.episode);
                    mcc.decay_epsilon();
                    self.episode.clear();
                    episode_completed = true;
                }
            }
        }

        if session_finished {
            self.phase = Phase::SessionTerminal;
            if let Err(err) = self.save() {
                tracing::warn!(%err, "failed to persist agent at session end");
            }
        } else {
            self.phase = Phase::AwaitingAction;
        }

        Ok(TurnReport {
            difficulty: observation.difficulty,
            correct,
            reward,
            response_seconds,
            episode_completed,
            session_finished,
        })
    }

    /// Tear the session down mid-flight.
    ///
    /// A partially filled episode buffer is discarded without a policy
    /// update - partial episodes must never bias the table. Learning that
    /// already happened stays; call [`SessionOrchestrator::save`] first if
    /// it should survive.
    pub fn abort(&mut self) {
        if !self.episode.is_empty() {
            tracing::debug!(
                steps = self.episode.len(),
                "session aborted mid-episode, discarding partial episode"
            );
            self.episode.clear();
        }
        self.pending = None;
        self.next_pick = None;
        self.phase = Phase::SessionTerminal;
    }

    /// Persist the agent's current learned state immediately.
    pub fn save(&self) -> Result<()> {
        self.repository.save(self.agent.kind(), &self.agent.snapshot())
    }

    /// Stage transition: bump exploration (table kept) and persist.
    pub fn on_new_stage(&mut self) -> Result<()> {
        self.agent.on_new_stage();
        self.save()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn agent(&self) -> &SessionAgent {
        &self.agent
    }

    pub fn metrics(&self) -> &SessionMetrics {
        &self.metrics
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.pending.as_ref().map(|p| &p.question)
    }

    pub fn questions_remaining(&self) -> usize {
        self.config.total_questions.saturating_sub(self.answered)
    }

    /// Steps buffered toward the current episode (episodic mode).
    pub fn buffered_episode_len(&self) -> usize {
        self.episode.len()
    }

    /// Consume the orchestrator, returning the agent for reuse.
    pub fn into_agent(self) -> SessionAgent {
        self.agent
    }

    fn current_state(&self) -> StateKey {
        let accuracy = self
            .metrics
            .rolling_accuracy(self.encoder.accuracy_window());
        self.encoder.encode(self.metrics.last(), accuracy)
    }
}
