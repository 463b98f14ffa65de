//! Hangout session context
//!
//! One `HangoutSession` owns everything the client knows about the
//! hangout being viewed: its schedule, the current stage, suggestions,
//! availability, leadership, pending requests and the section on screen.
//! Signals from the server are applied through [`HangoutSession::apply_event`].

use crate::availability::AvailabilityBook;
use crate::config::Limits;
use crate::conclusion::{resolve, ConclusionResult};
use crate::error::{Error, Result};
use crate::in_flight::{InFlightGuard, InFlightTracker, RequestKind};
use crate::invariants::assert_config_invariants;
use crate::models::{HangoutConfig, HangoutSection, MemberId, Stage, Suggestion, SuggestionId};
use crate::permissions::{StageAction, StagePolicy};
use crate::registry::{SuggestionRegistry, SuggestionsSnapshot};
use crate::stage::{StageController, StageTransition};

/// Out-of-band change pushed by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HangoutEvent {
    StageChanged(Stage),
    MemberLeft(MemberId),
    LeaderChanged(Option<MemberId>),
    SuggestionDeleted(SuggestionId),
    HangoutDeleted,
    Concluded,
}

/// What applying an event did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventEffect {
    Stage(StageTransition),
    MemberRemoved {
        member_id: MemberId,
        orphaned_suggestions: usize,
        removed_slots: usize,
        /// The viewer was the one removed
        was_viewer: bool,
    },
    LeaderChanged {
        previous: Option<MemberId>,
        current: Option<MemberId>,
    },
    SuggestionRemoved(Option<Suggestion>),
    /// The hangout no longer exists; the page must reload
    ReloadRequired,
}

/// Proof that a section was on screen when a request started
///
/// A ticket dies when its section is left. Results arriving for a dead
/// ticket still update state but are not shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTicket {
    section: HangoutSection,
    generation: u64,
}

impl SectionTicket {
    pub fn section(&self) -> HangoutSection {
        self.section
    }
}

pub struct HangoutSession {
    config: HangoutConfig,
    viewer: MemberId,
    leader: Option<MemberId>,
    stages: StageController,
    registry: SuggestionRegistry,
    availability: AvailabilityBook,
    in_flight: InFlightTracker,
    section: Option<HangoutSection>,
    section_generation: u64,
    outcome: Option<ConclusionResult>,
    /// Concluded, but no snapshot fetched since then has been loaded
    tally_pending: bool,
    deleted: bool,
}

impl HangoutSession {
    pub fn new(
        config: HangoutConfig,
        viewer: MemberId,
        stage: Stage,
        leader: Option<MemberId>,
        limits: Limits,
    ) -> Self {
        assert_config_invariants(&config);
        let conclusion = config.conclusion_timestamp();

        let mut session = Self {
            registry: SuggestionRegistry::new(viewer, conclusion, limits.clone()),
            availability: AvailabilityBook::new(conclusion, limits),
            config,
            viewer,
            leader,
            stages: StageController::new(stage),
            in_flight: InFlightTracker::new(),
            section: None,
            section_generation: 0,
            outcome: None,
            tally_pending: stage == Stage::Conclusion,
            deleted: false,
        };
        session.refresh_outcome();
        session
    }

    pub fn config(&self) -> &HangoutConfig {
        &self.config
    }

    pub fn viewer(&self) -> MemberId {
        self.viewer
    }

    pub fn stage(&self) -> Stage {
        self.stages.current()
    }

    pub fn stages(&self) -> &StageController {
        &self.stages
    }

    pub fn leader(&self) -> Option<MemberId> {
        self.leader
    }

    pub fn is_leader(&self) -> bool {
        self.leader == Some(self.viewer)
    }

    pub fn set_leader(&mut self, leader: Option<MemberId>) -> Option<MemberId> {
        let previous = std::mem::replace(&mut self.leader, leader);
        if previous != leader {
            tracing::info!(?previous, current = ?leader, "Hangout leader changed");
        }
        previous
    }

    pub fn registry(&self) -> &SuggestionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SuggestionRegistry {
        &mut self.registry
    }

    pub fn availability(&self) -> &AvailabilityBook {
        &self.availability
    }

    pub fn availability_mut(&mut self) -> &mut AvailabilityBook {
        &mut self.availability
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Stage and leadership check for an action by the viewer
    pub fn authorize(&self, action: StageAction) -> Result<()> {
        self.stages.check(action)?;

        if StagePolicy::requires_leader(action) && !self.is_leader() {
            return Err(Error::PermissionDenied(format!(
                "{} is reserved for the hangout leader",
                action
            )));
        }
        Ok(())
    }

    // Requests

    /// Claim the in-flight flag for a request kind
    pub fn begin_request(&mut self, kind: RequestKind) -> Option<InFlightGuard> {
        self.in_flight.try_begin(kind)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.any_in_flight()
    }

    // Stage

    /// Apply a stage announced by the server's signal feed
    pub fn advance_stage(&mut self, stage: Stage) -> StageTransition {
        let transition = self.stages.advance_to(stage);
        if transition.reached_conclusion() {
            self.await_final_tally();
        }
        transition
    }

    /// Adopt the stage the server reported when it rejected an action
    pub fn correct_stage(&mut self, stage: Stage) -> StageTransition {
        let transition = self.stages.correct_to(stage);
        if transition.changed() {
            if transition.reached_conclusion() {
                self.await_final_tally();
            } else {
                self.tally_pending = false;
                self.outcome = None;
            }
        }
        transition
    }

    /// Replace suggestions with the server's snapshot
    pub fn load_suggestions(&mut self, snapshot: SuggestionsSnapshot) {
        self.registry.load(snapshot);
        self.refresh_outcome();
    }

    /// Replace suggestions with a snapshot requested after conclusion
    ///
    /// Its counts include every member's final votes, so the result can
    /// be resolved from it.
    pub fn load_final_suggestions(&mut self, snapshot: SuggestionsSnapshot) {
        self.registry.load(snapshot);
        if self.stages.is_concluded() {
            self.tally_pending = false;
        }
        self.refresh_outcome();
    }

    /// Concluded, waiting for a snapshot with the final vote counts
    pub fn is_tally_pending(&self) -> bool {
        self.tally_pending
    }

    fn await_final_tally(&mut self) {
        tracing::debug!(hangout_id = %self.config.hangout_id, "Concluded, waiting for final vote counts");
        self.tally_pending = true;
        self.outcome = None;
    }

    fn refresh_outcome(&mut self) {
        if !self.stages.is_concluded() || self.tally_pending {
            return;
        }

        let outcome = resolve(self.registry.suggestions());
        match &outcome {
            ConclusionResult::Failed => tracing::info!("Hangout concluded without suggestions"),
            ConclusionResult::SingleWinner(winner) => {
                tracing::info!(suggestion_id = %winner.id, votes = winner.votes_count, "Hangout concluded with a winner")
            }
            ConclusionResult::Tie(tied) => {
                tracing::info!(tied = tied.len(), "Hangout concluded in a tie")
            }
        }
        self.outcome = Some(outcome);
    }

    /// Result of the vote, available once the hangout has concluded and
    /// the final counts have been loaded
    pub fn outcome(&self) -> Option<&ConclusionResult> {
        self.outcome.as_ref()
    }

    // Signals

    pub fn apply_event(&mut self, event: HangoutEvent) -> EventEffect {
        tracing::debug!(?event, "Applying hangout event");

        match event {
            HangoutEvent::StageChanged(stage) => EventEffect::Stage(self.advance_stage(stage)),
            HangoutEvent::Concluded => EventEffect::Stage(self.advance_stage(Stage::Conclusion)),
            HangoutEvent::MemberLeft(member_id) => {
                let orphaned_suggestions = self.registry.orphan_member(member_id);
                let removed_slots = self.availability.remove_member(member_id);
                if self.leader == Some(member_id) {
                    self.set_leader(None);
                }
                EventEffect::MemberRemoved {
                    member_id,
                    orphaned_suggestions,
                    removed_slots,
                    was_viewer: member_id == self.viewer,
                }
            }
            HangoutEvent::LeaderChanged(current) => {
                let previous = self.set_leader(current);
                EventEffect::LeaderChanged { previous, current }
            }
            HangoutEvent::SuggestionDeleted(id) if self.stages.is_concluded() => {
                tracing::debug!(suggestion_id = %id, "Ignoring deletion, suggestions are frozen");
                EventEffect::SuggestionRemoved(None)
            }
            HangoutEvent::SuggestionDeleted(id) => {
                EventEffect::SuggestionRemoved(self.registry.forget(id))
            }
            HangoutEvent::HangoutDeleted => {
                self.deleted = true;
                tracing::warn!(hangout_id = %self.config.hangout_id, "Hangout was deleted");
                EventEffect::ReloadRequired
            }
        }
    }

    // Sections

    /// Show a section. Any ticket for the previous section dies.
    pub fn enter_section(&mut self, section: HangoutSection) -> SectionTicket {
        self.section_generation += 1;
        self.section = Some(section);
        SectionTicket {
            section,
            generation: self.section_generation,
        }
    }

    pub fn leave_section(&mut self) {
        self.section_generation += 1;
        self.section = None;
    }

    pub fn current_section(&self) -> Option<HangoutSection> {
        self.section
    }

    /// Ticket for the section on screen, if any
    pub fn current_ticket(&self) -> Option<SectionTicket> {
        self.section.map(|section| SectionTicket {
            section,
            generation: self.section_generation,
        })
    }

    /// Should results for this ticket still be shown?
    pub fn is_ticket_live(&self, ticket: &SectionTicket) -> bool {
        self.section == Some(ticket.section) && self.section_generation == ticket.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HangoutId, SuggestionFields};
    use chrono::{Duration, TimeZone, Utc};

    const ME: MemberId = MemberId(1);
    const OTHER: MemberId = MemberId(2);

    fn config() -> HangoutConfig {
        HangoutConfig::new(
            HangoutId::new("h1"),
            Duration::days(1),
            Duration::days(1),
            Duration::days(1),
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    fn session(stage: Stage, leader: Option<MemberId>) -> HangoutSession {
        HangoutSession::new(config(), ME, stage, leader, Limits::default())
    }

    fn suggestion(id: i64, member: MemberId, votes: u32) -> Suggestion {
        let start = config().conclusion_timestamp() + Duration::days(2);
        let mut suggestion = Suggestion::new(
            SuggestionId(id),
            member,
            SuggestionFields {
                title: format!("Option {}", id),
                description: String::new(),
                start,
                end: start + Duration::hours(3),
            },
        );
        suggestion.votes_count = votes;
        suggestion
    }

    #[test]
    fn test_leader_only_actions() {
        let session = session(Stage::Suggestions, Some(OTHER));
        assert!(matches!(
            session.authorize(StageAction::ProgressStage),
            Err(Error::PermissionDenied(_))
        ));
        assert!(session.authorize(StageAction::CreateSuggestion).is_ok());

        let session = self::session(Stage::Suggestions, Some(ME));
        assert!(session.authorize(StageAction::ProgressStage).is_ok());
    }

    #[test]
    fn test_conclusion_resolves_outcome() {
        let mut session = session(Stage::Voting, None);
        session.load_suggestions(SuggestionsSnapshot {
            suggestions: vec![suggestion(1, ME, 3), suggestion(2, OTHER, 5), suggestion(3, OTHER, 5)],
            ..Default::default()
        });
        assert!(session.outcome().is_none());

        let effect = session.apply_event(HangoutEvent::Concluded);
        assert!(matches!(effect, EventEffect::Stage(t) if t.reached_conclusion()));
        assert!(session.is_tally_pending());
        assert!(session.outcome().is_none());

        session.load_final_suggestions(SuggestionsSnapshot {
            suggestions: vec![suggestion(1, ME, 3), suggestion(2, OTHER, 5), suggestion(3, OTHER, 5)],
            ..Default::default()
        });
        let outcome = session.outcome().unwrap();
        assert!(outcome.is_tie());
        let ids: Vec<i64> = outcome.winners().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_outcome_uses_final_counts() {
        let mut session = session(Stage::Voting, None);
        session.load_suggestions(SuggestionsSnapshot {
            suggestions: vec![suggestion(1, ME, 1), suggestion(2, OTHER, 0)],
            ..Default::default()
        });
        session.advance_stage(Stage::Conclusion);

        // A snapshot requested before conclusion does not settle the result
        session.load_suggestions(SuggestionsSnapshot {
            suggestions: vec![suggestion(1, ME, 1), suggestion(2, OTHER, 0)],
            ..Default::default()
        });
        assert!(session.outcome().is_none());

        session.load_final_suggestions(SuggestionsSnapshot {
            suggestions: vec![suggestion(1, ME, 1), suggestion(2, OTHER, 4)],
            ..Default::default()
        });
        assert!(!session.is_tally_pending());
        match session.outcome() {
            Some(ConclusionResult::SingleWinner(winner)) => assert_eq!(winner.id, SuggestionId(2)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_concluded_without_suggestions_fails() {
        let mut session = session(Stage::Conclusion, None);
        assert!(session.outcome().is_none());

        session.load_final_suggestions(SuggestionsSnapshot::default());
        assert_eq!(session.outcome(), Some(&ConclusionResult::Failed));
    }

    #[test]
    fn test_deletions_ignored_once_concluded() {
        let mut session = session(Stage::Conclusion, None);
        session.load_final_suggestions(SuggestionsSnapshot {
            suggestions: vec![suggestion(1, ME, 2), suggestion(2, OTHER, 1)],
            ..Default::default()
        });

        let effect = session.apply_event(HangoutEvent::SuggestionDeleted(SuggestionId(1)));
        assert_eq!(effect, EventEffect::SuggestionRemoved(None));
        assert!(session.registry().get(SuggestionId(1)).is_some());
        match session.outcome() {
            Some(ConclusionResult::SingleWinner(winner)) => assert_eq!(winner.id, SuggestionId(1)),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_member_left() {
        let mut session = session(Stage::Suggestions, Some(OTHER));
        session
            .registry_mut()
            .insert_confirmed(suggestion(1, OTHER, 0))
            .unwrap();

        let effect = session.apply_event(HangoutEvent::MemberLeft(OTHER));
        assert_eq!(
            effect,
            EventEffect::MemberRemoved {
                member_id: OTHER,
                orphaned_suggestions: 1,
                removed_slots: 0,
                was_viewer: false,
            }
        );
        assert!(session.registry().get(SuggestionId(1)).unwrap().is_orphaned());
        assert_eq!(session.leader(), None);
    }

    #[test]
    fn test_stale_stage_signal_ignored() {
        let mut session = session(Stage::Voting, None);
        let effect = session.apply_event(HangoutEvent::StageChanged(Stage::Suggestions));
        assert!(matches!(effect, EventEffect::Stage(StageTransition::IgnoredRegression { .. })));
        assert_eq!(session.stage(), Stage::Voting);
    }

    #[test]
    fn test_hangout_deleted() {
        let mut session = session(Stage::Availability, None);
        assert_eq!(session.apply_event(HangoutEvent::HangoutDeleted), EventEffect::ReloadRequired);
        assert!(session.is_deleted());
    }

    #[test]
    fn test_section_tickets() {
        let mut session = session(Stage::Suggestions, None);

        let ticket = session.enter_section(HangoutSection::Suggestions);
        assert!(session.is_ticket_live(&ticket));

        session.leave_section();
        assert!(!session.is_ticket_live(&ticket));

        // Re-entering the same section does not revive old tickets
        let fresh = session.enter_section(HangoutSection::Suggestions);
        assert!(!session.is_ticket_live(&ticket));
        assert!(session.is_ticket_live(&fresh));
    }

    #[test]
    fn test_in_flight_requests() {
        let mut session = session(Stage::Voting, None);
        let guard = session.begin_request(RequestKind::ToggleVote);
        assert!(guard.is_some());
        assert!(session.is_loading());
        assert!(session.begin_request(RequestKind::ToggleVote).is_none());
        drop(guard);
        assert!(!session.is_loading());
    }
}
