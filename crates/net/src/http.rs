//! HTTP implementation of [`HangoutApi`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{HangoutApi, MarkAction};
use crate::dto::{
    AvailabilityPayload, CreatedSlot, CreatedSuggestion, HangoutDetails, KickRequest,
    LeadershipTransfer, MemberRef, SlotDraft, SlotTarget, SlotUpdate, StageProgressed,
    SuggestionDraft, SuggestionTarget, SuggestionUpdate, SuggestionsPayload, UpdatedSuggestion,
};
use crate::error::{Error, Result};
use crate::failure::ApiFailure;

const USER_AGENT: &str = concat!("hangouts/", env!("CARGO_PKG_VERSION"));

/// REST client for the hangouts service
///
/// Session cookies set by the auth endpoints are kept in the client's
/// cookie store and sent with every call.
#[derive(Clone)]
pub struct HttpApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "API request");
        self.http_client.request(method, url)
    }

    /// Turn non-success statuses into [`Error::Api`]
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let failure = ApiFailure::from_response(status.as_u16(), &body);
        tracing::warn!(
            status = failure.status,
            reason = failure.reason.as_deref().unwrap_or("none"),
            message = %failure.message,
            "API request failed"
        );
        Err(Error::Api(failure))
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(method, path).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn send_unit<B>(&self, method: Method, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let response = self.request(method, path).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_json<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

fn mark_method(action: MarkAction) -> Method {
    match action {
        MarkAction::Add => Method::POST,
        MarkAction::Remove => Method::DELETE,
    }
}

#[async_trait]
impl HangoutApi for HttpApi {
    async fn hangout_details(&self, hangout_id: &str) -> Result<HangoutDetails> {
        self.get_json("hangouts/details", &[("hangoutId", hangout_id)])
            .await
    }

    async fn fetch_suggestions(&self, member: &MemberRef) -> Result<SuggestionsPayload> {
        self.get_json("suggestions", member).await
    }

    async fn create_suggestion(&self, draft: &SuggestionDraft) -> Result<CreatedSuggestion> {
        self.send_json(Method::POST, "suggestions", draft).await
    }

    async fn update_suggestion(&self, update: &SuggestionUpdate) -> Result<UpdatedSuggestion> {
        self.send_json(Method::PATCH, "suggestions", update).await
    }

    async fn delete_suggestion(&self, target: &SuggestionTarget, as_leader: bool) -> Result<()> {
        let path = if as_leader {
            "suggestions/leader"
        } else {
            "suggestions"
        };
        self.send_unit(Method::DELETE, path, target).await
    }

    async fn set_like(&self, target: &SuggestionTarget, action: MarkAction) -> Result<()> {
        self.send_unit(mark_method(action), "suggestions/likes", target)
            .await
    }

    async fn set_vote(&self, target: &SuggestionTarget, action: MarkAction) -> Result<()> {
        self.send_unit(mark_method(action), "votes", target).await
    }

    async fn fetch_availability(&self, member: &MemberRef) -> Result<AvailabilityPayload> {
        self.get_json("availabilitySlots", member).await
    }

    async fn create_slot(&self, draft: &SlotDraft) -> Result<CreatedSlot> {
        self.send_json(Method::POST, "availabilitySlots", draft).await
    }

    async fn update_slot(&self, update: &SlotUpdate) -> Result<()> {
        self.send_unit(Method::PATCH, "availabilitySlots", update).await
    }

    async fn delete_slot(&self, target: &SlotTarget) -> Result<()> {
        self.send_unit(Method::DELETE, "availabilitySlots", target).await
    }

    async fn progress_stage(&self, member: &MemberRef) -> Result<StageProgressed> {
        self.send_json(Method::PATCH, "hangouts/details/stages/progress", member)
            .await
    }

    async fn claim_leadership(&self, member: &MemberRef) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            "hangoutMembers/details/leadership/claim",
            member,
        )
        .await
    }

    async fn transfer_leadership(&self, transfer: &LeadershipTransfer) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            "hangoutMembers/details/leadership/transfer",
            transfer,
        )
        .await
    }

    async fn relinquish_leadership(&self, member: &MemberRef) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            "hangoutMembers/details/leadership/relinquish",
            member,
        )
        .await
    }

    async fn kick_member(&self, kick: &KickRequest) -> Result<()> {
        self.send_unit(Method::DELETE, "hangoutMembers/kick", kick)
            .await
    }
}
