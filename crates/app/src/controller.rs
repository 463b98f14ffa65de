//! Hangout controller
//!
//! Drives a [`HangoutSession`] against the hangouts API. Every action
//! follows the same shape: check locally, claim the in-flight flag, call
//! the server, then apply the confirmed result or reconcile with the
//! failure. The session lock is never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use hangout_core::{
    ConclusionResult, EditClass, Error as CoreError, EventEffect, HangoutEvent, HangoutSection,
    HangoutSession, InFlightGuard, Limits, MemberId, RemovalPath, RequestKind, SectionTicket,
    SlotId, Stage, StageAction, StageTransition, Suggestion, SuggestionFields, SuggestionId,
    Toggle,
};
use hangout_net::dto::{
    KickRequest, LeadershipTransfer, MemberRef, SlotDraft, SlotTarget, SlotUpdate,
    SuggestionDraft, SuggestionTarget, SuggestionUpdate,
};
use hangout_net::{Error as NetError, FailureKind, HangoutApi, MarkAction, Signal};
use tracing::{debug, info, warn};

use crate::convert;
use crate::error::Result;
use crate::notice::Notice;

/// Result of a controller action
#[derive(Debug)]
pub enum Outcome<T> {
    /// The server confirmed the action and the session reflects it
    Completed(T),
    /// A request of the same kind was already pending
    Dropped,
    /// Refused locally, nothing was sent
    Rejected(CoreError),
    /// The server refused or could not be reached
    Failed(Notice),
}

impl<T> Outcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            _ => None,
        }
    }
}

/// What a failed request was about, for 404 cleanup
#[derive(Debug, Clone, Copy)]
enum Target {
    Hangout,
    Suggestion(SuggestionId),
    Slot(SlotId),
}

/// A request that has passed local checks and holds its in-flight flag
struct Pending {
    _guard: InFlightGuard,
    ticket: Option<SectionTicket>,
}

pub struct HangoutController<A> {
    api: A,
    hangout_id: String,
    viewer: MemberId,
    session: Mutex<HangoutSession>,
    notices: Mutex<Vec<Notice>>,
}

impl<A: HangoutApi> HangoutController<A> {
    /// Fetch the hangout's details and build a session for `viewer`
    pub async fn bootstrap(api: A, hangout_id: &str, viewer: MemberId, limits: Limits) -> Result<Self> {
        let details = api.hangout_details(hangout_id).await?;
        let state = convert::hangout_state(&details)?;

        info!(
            hangout_id,
            viewer = %viewer,
            stage = %state.stage,
            conclusion = %state.config.conclusion_timestamp(),
            "Hangout session ready"
        );

        let session = HangoutSession::new(state.config, viewer, state.stage, state.leader, limits);
        Ok(Self {
            api,
            hangout_id: hangout_id.to_string(),
            viewer,
            session: Mutex::new(session),
            notices: Mutex::new(Vec::new()),
        })
    }

    pub fn hangout_id(&self) -> &str {
        &self.hangout_id
    }

    pub fn viewer(&self) -> MemberId {
        self.viewer
    }

    fn session(&self) -> MutexGuard<'_, HangoutSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read access to the session
    pub fn with_session<R>(&self, f: impl FnOnce(&HangoutSession) -> R) -> R {
        let session = self.session();
        f(&*session)
    }

    pub fn stage(&self) -> Stage {
        self.session().stage()
    }

    pub fn outcome(&self) -> Option<ConclusionResult> {
        self.session().outcome().cloned()
    }

    /// Drain notices raised since the last call
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn push_notice(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }

    fn member_ref(&self) -> MemberRef {
        MemberRef {
            hangout_id: self.hangout_id.clone(),
            hangout_member_id: self.viewer.0,
        }
    }

    fn suggestion_target(&self, id: SuggestionId) -> SuggestionTarget {
        SuggestionTarget {
            hangout_id: self.hangout_id.clone(),
            hangout_member_id: self.viewer.0,
            suggestion_id: id.0,
        }
    }

    fn suggestion_draft(&self, fields: &SuggestionFields) -> SuggestionDraft {
        SuggestionDraft {
            hangout_id: self.hangout_id.clone(),
            hangout_member_id: self.viewer.0,
            title: fields.title.clone(),
            description: fields.description.clone(),
            start_timestamp: fields.start,
            end_timestamp: fields.end,
        }
    }

    fn slot_draft(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> SlotDraft {
        SlotDraft {
            hangout_id: self.hangout_id.clone(),
            hangout_member_id: self.viewer.0,
            slot_start_timestamp: start,
            slot_end_timestamp: end,
        }
    }

    /// Run the local check, then claim the flag for `kind`
    fn begin<T, U>(
        &self,
        kind: RequestKind,
        check: impl FnOnce(&HangoutSession) -> hangout_core::Result<T>,
    ) -> std::result::Result<(Pending, T), Outcome<U>> {
        let mut session = self.session();

        let checked = match check(&*session) {
            Ok(value) => value,
            Err(e) => {
                debug!(?kind, error = %e, "Action refused locally");
                self.push_notice(Notice::from_core(&e));
                return Err(Outcome::Rejected(e));
            }
        };

        let guard = session.begin_request(kind).ok_or(Outcome::Dropped)?;
        let ticket = session.current_ticket();
        Ok((
            Pending {
                _guard: guard,
                ticket,
            },
            checked,
        ))
    }

    /// Reconcile the session with a failed request
    fn reconcile<T>(&self, error: NetError, pending: &Pending, target: Target) -> Outcome<T> {
        let notice = Notice::from_net(&error);
        let mut session = self.session();

        match error.failure_kind() {
            Some(FailureKind::StageConflict(stage)) => {
                let transition = session.correct_stage(convert::conflict_stage(stage));
                info!(?transition, "Stage corrected after server conflict");
            }
            Some(FailureKind::NotFound { hangout_gone: true }) => {
                session.apply_event(HangoutEvent::HangoutDeleted);
            }
            Some(FailureKind::NotFound { hangout_gone: false }) => match target {
                Target::Suggestion(id) => {
                    if session.registry_mut().forget(id).is_some() {
                        info!(suggestion_id = %id, "Dropped suggestion the server no longer has");
                    }
                }
                Target::Slot(id) => {
                    if session.availability_mut().forget(id).is_some() {
                        info!(slot_id = %id, "Dropped availability slot the server no longer has");
                    }
                }
                Target::Hangout => {}
            },
            Some(FailureKind::LeadershipConflict(Some(leader))) => {
                session.set_leader(Some(MemberId(leader)));
            }
            _ => warn!(error = %error, "Request failed"),
        }

        let live = pending
            .ticket
            .map_or(true, |ticket| session.is_ticket_live(&ticket));
        drop(session);

        if live {
            self.push_notice(notice.clone());
        } else {
            debug!(message = %notice, "Suppressing notice for a section no longer shown");
        }
        Outcome::Failed(notice)
    }

    fn notify(&self, pending: &Pending, notice: Notice) {
        let live = pending
            .ticket
            .map_or(true, |ticket| self.session().is_ticket_live(&ticket));
        if live {
            self.push_notice(notice);
        }
    }

    // Loading

    /// Replace suggestions with the server's copy
    pub async fn refresh_suggestions(&self) -> Outcome<usize> {
        let (pending, requested_concluded) =
            match self.begin(RequestKind::FetchSuggestions, |s| Ok(s.stages().is_concluded())) {
                Ok(started) => started,
                Err(outcome) => return outcome,
            };

        match self.api.fetch_suggestions(&self.member_ref()).await {
            Ok(payload) => {
                let snapshot = convert::suggestions_snapshot(payload);
                let mut session = self.session();
                if requested_concluded {
                    session.load_final_suggestions(snapshot);
                } else {
                    session.load_suggestions(snapshot);
                }
                let count = session.registry().len();
                debug!(count, "Suggestions loaded");
                Outcome::Completed(count)
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    /// Fetch the final vote counts if the hangout concluded since the
    /// last snapshot, and return the result once it is known
    pub async fn settle_conclusion(&self) -> Option<ConclusionResult> {
        if self.session().is_tally_pending() {
            match self.refresh_suggestions().await {
                Outcome::Completed(count) => info!(count, "Loaded final vote counts"),
                Outcome::Dropped => debug!("Final vote counts wait for the pending fetch"),
                _ => warn!("Could not load final vote counts"),
            }
        }
        self.outcome()
    }

    pub async fn refresh_availability(&self) -> Outcome<usize> {
        let (pending, ()) = match self.begin(RequestKind::FetchAvailability, |_| Ok(())) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.fetch_availability(&self.member_ref()).await {
            Ok(payload) => {
                let slots = payload
                    .availability_slots
                    .into_iter()
                    .map(convert::slot)
                    .collect();
                let mut session = self.session();
                session.availability_mut().load(slots);
                Outcome::Completed(session.availability().len())
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    // Suggestions

    pub async fn create_suggestion(&self, fields: SuggestionFields) -> Outcome<SuggestionId> {
        let viewer = self.viewer;
        let (pending, ()) = match self.begin(RequestKind::CreateSuggestion, |s| {
            s.registry().check_add(s.stage(), viewer, &fields)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.create_suggestion(&self.suggestion_draft(&fields)).await {
            Ok(created) => {
                let suggestion = Suggestion::new(SuggestionId(created.suggestion_id), viewer, fields);
                let inserted = self.session().registry_mut().insert_confirmed(suggestion);
                match inserted {
                    Ok(id) => {
                        info!(suggestion_id = %id, "Suggestion added");
                        self.notify(&pending, Notice::info("Suggestion added."));
                        Outcome::Completed(id)
                    }
                    Err(e) => Outcome::Rejected(e),
                }
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    /// Edit a suggestion. The server decides whether the edit is major.
    pub async fn edit_suggestion(&self, id: SuggestionId, fields: SuggestionFields) -> Outcome<EditClass> {
        let viewer = self.viewer;
        let (pending, local_class) = match self.begin(RequestKind::EditSuggestion, |s| {
            s.registry().check_edit(s.stage(), id, viewer, &fields)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let update = SuggestionUpdate {
            suggestion_id: id.0,
            draft: self.suggestion_draft(&fields),
        };

        match self.api.update_suggestion(&update).await {
            Ok(updated) => {
                let major = updated.is_major_change;
                if major != local_class.is_major() {
                    debug!(suggestion_id = %id, major, "Server edit verdict differs from local");
                }

                if let Err(e) = self.session().registry_mut().apply_edit(id, fields, major) {
                    return Outcome::Rejected(e);
                }

                let class = if major { EditClass::Major } else { EditClass::Minor };
                info!(suggestion_id = %id, ?class, "Suggestion edited");
                if major {
                    self.notify(&pending, Notice::info("Suggestion updated. Its likes and votes were reset."));
                }
                Outcome::Completed(class)
            }
            Err(e) => self.reconcile(e, &pending, Target::Suggestion(id)),
        }
    }

    pub async fn delete_suggestion(&self, id: SuggestionId) -> Outcome<()> {
        let viewer = self.viewer;
        let (pending, path) = match self.begin(RequestKind::DeleteSuggestion, |s| {
            s.registry().check_remove(s.stage(), id, viewer, s.is_leader())
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let as_leader = path == RemovalPath::Leader;
        match self.api.delete_suggestion(&self.suggestion_target(id), as_leader).await {
            Ok(()) => {
                self.session().registry_mut().forget(id);
                info!(suggestion_id = %id, as_leader, "Suggestion deleted");
                Outcome::Completed(())
            }
            Err(e) => self.reconcile(e, &pending, Target::Suggestion(id)),
        }
    }

    pub async fn toggle_like(&self, id: SuggestionId) -> Outcome<Toggle> {
        let (pending, toggle) = match self.begin(RequestKind::ToggleLike, |s| {
            s.registry().check_like(s.stage(), id)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.set_like(&self.suggestion_target(id), mark_action(toggle)).await {
            Ok(()) => match self.session().registry_mut().apply_like(id, toggle) {
                Ok(()) => Outcome::Completed(toggle),
                Err(e) => Outcome::Rejected(e),
            },
            Err(e) => self.reconcile(e, &pending, Target::Suggestion(id)),
        }
    }

    pub async fn toggle_vote(&self, id: SuggestionId) -> Outcome<Toggle> {
        let (pending, toggle) = match self.begin(RequestKind::ToggleVote, |s| {
            s.registry().check_vote(s.stage(), id)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.set_vote(&self.suggestion_target(id), mark_action(toggle)).await {
            Ok(()) => match self.session().registry_mut().apply_vote(id, toggle) {
                Ok(()) => Outcome::Completed(toggle),
                Err(e) => Outcome::Rejected(e),
            },
            Err(e) => self.reconcile(e, &pending, Target::Suggestion(id)),
        }
    }

    // Availability

    pub async fn add_slot(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Outcome<SlotId> {
        let viewer = self.viewer;
        let (pending, ()) = match self.begin(RequestKind::AvailabilitySlot, |s| {
            s.availability().check_add(s.stage(), viewer, start, end)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.create_slot(&self.slot_draft(start, end)).await {
            Ok(created) => {
                let slot = hangout_core::AvailabilitySlot::new(
                    SlotId(created.availability_slot_id),
                    viewer,
                    start,
                    end,
                );
                match self.session().availability_mut().insert_confirmed(slot) {
                    Ok(id) => Outcome::Completed(id),
                    Err(e) => Outcome::Rejected(e),
                }
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    pub async fn edit_slot(&self, id: SlotId, start: DateTime<Utc>, end: DateTime<Utc>) -> Outcome<()> {
        let viewer = self.viewer;
        let (pending, ()) = match self.begin(RequestKind::AvailabilitySlot, |s| {
            s.availability().check_edit(s.stage(), id, viewer, start, end)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let update = SlotUpdate {
            availability_slot_id: id.0,
            draft: self.slot_draft(start, end),
        };

        match self.api.update_slot(&update).await {
            Ok(()) => match self.session().availability_mut().apply_edit(id, start, end) {
                Ok(()) => Outcome::Completed(()),
                Err(e) => Outcome::Rejected(e),
            },
            Err(e) => self.reconcile(e, &pending, Target::Slot(id)),
        }
    }

    pub async fn delete_slot(&self, id: SlotId) -> Outcome<()> {
        let viewer = self.viewer;
        let (pending, ()) = match self.begin(RequestKind::AvailabilitySlot, |s| {
            s.availability().check_remove(s.stage(), id, viewer)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let target = SlotTarget {
            hangout_id: self.hangout_id.clone(),
            hangout_member_id: viewer.0,
            availability_slot_id: id.0,
        };

        match self.api.delete_slot(&target).await {
            Ok(()) => {
                self.session().availability_mut().forget(id);
                Outcome::Completed(())
            }
            Err(e) => self.reconcile(e, &pending, Target::Slot(id)),
        }
    }

    // Leader controls

    /// Ask the server to move the hangout to its next stage
    pub async fn progress_stage(&self) -> Outcome<StageTransition> {
        let (pending, ()) = match self.begin(RequestKind::ProgressStage, |s| {
            s.authorize(StageAction::ProgressStage)
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.progress_stage(&self.member_ref()).await {
            Ok(progressed) => match convert::stage_from_wire(progressed.current_stage) {
                Ok(stage) => {
                    let transition = self.session().advance_stage(stage);
                    drop(pending);
                    if transition.reached_conclusion() {
                        self.settle_conclusion().await;
                    }
                    Outcome::Completed(transition)
                }
                Err(e) => Outcome::Rejected(e),
            },
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    pub async fn claim_leadership(&self) -> Outcome<()> {
        let (pending, ()) = match self.begin(RequestKind::Leadership, |s| {
            s.authorize(StageAction::ManageLeadership)?;
            match s.leader() {
                Some(leader) => Err(CoreError::InvalidOperation(format!(
                    "member {} already leads this hangout",
                    leader
                ))),
                None => Ok(()),
            }
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.claim_leadership(&self.member_ref()).await {
            Ok(()) => {
                self.session().set_leader(Some(self.viewer));
                self.notify(&pending, Notice::info("You are now the hangout leader."));
                Outcome::Completed(())
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    pub async fn transfer_leadership(&self, new_leader: MemberId) -> Outcome<()> {
        let (pending, ()) = match self.begin(RequestKind::Leadership, |s| {
            require_leader(s)?;
            if new_leader == s.viewer() {
                return Err(CoreError::NoChanges);
            }
            Ok(())
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let transfer = LeadershipTransfer {
            hangout_id: self.hangout_id.clone(),
            hangout_member_id: self.viewer.0,
            new_leader_member_id: new_leader.0,
        };

        match self.api.transfer_leadership(&transfer).await {
            Ok(()) => {
                self.session().set_leader(Some(new_leader));
                Outcome::Completed(())
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    pub async fn relinquish_leadership(&self) -> Outcome<()> {
        let (pending, ()) = match self.begin(RequestKind::Leadership, require_leader) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        match self.api.relinquish_leadership(&self.member_ref()).await {
            Ok(()) => {
                self.session().set_leader(None);
                Outcome::Completed(())
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    pub async fn kick_member(&self, member: MemberId) -> Outcome<EventEffect> {
        let (pending, ()) = match self.begin(RequestKind::KickMember, |s| {
            s.authorize(StageAction::KickMember)?;
            if member == s.viewer() {
                return Err(CoreError::InvalidOperation("the leader cannot kick themselves".into()));
            }
            Ok(())
        }) {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };

        let kick = KickRequest {
            hangout_id: self.hangout_id.clone(),
            hangout_member_id: self.viewer.0,
            member_to_kick_id: member.0,
        };

        match self.api.kick_member(&kick).await {
            Ok(()) => {
                let effect = self.session().apply_event(HangoutEvent::MemberLeft(member));
                info!(member_id = %member, "Member removed from hangout");
                Outcome::Completed(effect)
            }
            Err(e) => self.reconcile(e, &pending, Target::Hangout),
        }
    }

    // Signals and sections

    /// Apply a signal from the feed
    ///
    /// Reaching the conclusion fetches the final vote counts before
    /// returning.
    pub async fn apply_signal(&self, signal: Signal) -> Option<EventEffect> {
        let event = convert::hangout_event(signal)?;
        let effect = self.session().apply_event(event);

        if let EventEffect::Stage(transition) = &effect {
            if transition.reached_conclusion() {
                self.settle_conclusion().await;
            }
        }

        match &effect {
            EventEffect::Stage(StageTransition::Advanced { to, .. }) => {
                self.push_notice(Notice::info(format!("The hangout moved to the {} stage.", to)));
            }
            EventEffect::MemberRemoved { was_viewer: true, .. } => {
                self.push_notice(Notice::warning("You were removed from this hangout."));
            }
            EventEffect::LeaderChanged { current, previous } if current != previous => {
                if *current == Some(self.viewer) {
                    self.push_notice(Notice::info("You are now the hangout leader."));
                }
            }
            EventEffect::ReloadRequired => {
                self.push_notice(Notice::error("This hangout has been deleted."));
            }
            _ => {}
        }

        Some(effect)
    }

    pub fn enter_section(&self, section: HangoutSection) -> SectionTicket {
        self.session().enter_section(section)
    }

    pub fn leave_section(&self) {
        self.session().leave_section();
    }

    pub fn current_section(&self) -> Option<HangoutSection> {
        self.session().current_section()
    }
}

fn require_leader(session: &HangoutSession) -> hangout_core::Result<()> {
    session.authorize(StageAction::ManageLeadership)?;
    if !session.is_leader() {
        return Err(CoreError::PermissionDenied(
            "only the hangout leader can do that".into(),
        ));
    }
    Ok(())
}

fn mark_action(toggle: Toggle) -> MarkAction {
    match toggle {
        Toggle::Added => MarkAction::Add,
        Toggle::Removed => MarkAction::Remove,
    }
}
