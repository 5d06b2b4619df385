//! Event lifecycle service.
//!
//! Transitions load the row, authorize, apply the domain transition to a copy,
//! and write the copy back. Reschedule is two writes (freeze, then insert the
//! successor) with no rollback between them.

use chrono::Utc;

use unshift_auth::{OwnerFilter, Principal, Scope, ensure_owner_or_manager};
use unshift_core::{DomainError, DomainResult, EventId};
use unshift_scheduling::{
    CreateEventInput, CustomerRef, DateRange, Event, EventView, Notification, ResolvedEvent, Transition,
    parse_plan_date,
};

use super::{CustomerDirectory, Publisher, Stores};
use crate::store::{EventQuery, EventSort};

#[derive(Clone)]
pub struct EventService {
    stores: Stores,
    publisher: Publisher,
    customers: CustomerDirectory,
}

impl EventService {
    pub(crate) fn new(stores: Stores, publisher: Publisher, customers: CustomerDirectory) -> Self {
        Self {
            stores,
            publisher,
            customers,
        }
    }

    /// Book a new event.
    ///
    /// Without a resolvable customer id a placeholder customer is provisioned
    /// for the caller first, and the event embeds its snapshot.
    pub async fn create(&self, principal: &Principal, input: CreateEventInput) -> DomainResult<ResolvedEvent> {
        let (draft, customer) = input.validate()?;

        let existing = match customer {
            CustomerRef::Existing(snapshot) => self.customers.find(snapshot.cus_id).await?.map(|_| snapshot),
            CustomerRef::Missing => None,
        };
        let snapshot = match existing {
            Some(snapshot) => snapshot,
            None => self.customers.provision_placeholder(principal).await?.snapshot(),
        };

        let event = Event::create(principal.id, snapshot, draft, Utc::now());
        let event = self.stores.events.insert(event).await?;
        tracing::info!(event_id = %event.id, owner = %event.owner, plan_date = %event.plan_date, "event created");

        let resolved = self.stores.resolve_event(event).await?;
        self.publisher.publish(Notification::EventCreated(resolved.clone()))?;
        Ok(resolved)
    }

    /// Mark completed and re-embed the live customer snapshot.
    pub async fn complete(&self, principal: &Principal, id: EventId) -> DomainResult<ResolvedEvent> {
        let event = self.load_for(principal, id).await?;
        let resynced = self.customers.find(event.customer.cus_id).await?.map(|c| c.snapshot());
        self.transition(principal, event, Transition::Complete { resynced }).await
    }

    /// Forecast: reopen a completed event.
    pub async fn reopen(&self, principal: &Principal, id: EventId) -> DomainResult<ResolvedEvent> {
        let event = self.load_for(principal, id).await?;
        self.transition(principal, event, Transition::Reopen).await
    }

    pub async fn cancel(&self, principal: &Principal, id: EventId, remark: String) -> DomainResult<ResolvedEvent> {
        let event = self.load_for(principal, id).await?;
        self.transition(principal, event, Transition::Cancel { remark }).await
    }

    /// Freeze the original and book a successor on `plan_date`.
    ///
    /// Publishes the frozen original as updated, then the successor as
    /// created, and returns the successor. If the insert fails the original
    /// stays frozen without a successor and the error surfaces as internal.
    pub async fn reschedule(&self, principal: &Principal, id: EventId, plan_date: &str) -> DomainResult<ResolvedEvent> {
        let plan_date = parse_plan_date(plan_date)?;
        let event = self.load_for(principal, id).await?;
        let (_, successor) = self.apply(principal, event, Transition::Reschedule { plan_date }).await?;
        let successor = successor.ok_or_else(|| DomainError::internal("reschedule produced no successor"))?;

        let successor = match self.stores.events.insert(successor).await {
            Ok(inserted) => inserted,
            Err(e) => {
                tracing::error!(event_id = %id, error = %e, "reschedule left original frozen without successor");
                return Err(e.into());
            }
        };
        tracing::info!(event_id = %id, successor_id = %successor.id, plan_date = %successor.plan_date, "event rescheduled");

        let resolved = self.stores.resolve_event(successor).await?;
        self.publisher.publish(Notification::EventCreated(resolved.clone()))?;
        Ok(resolved)
    }

    pub async fn delete(&self, principal: &Principal, id: EventId) -> DomainResult<String> {
        let event = self.load_for(principal, id).await?;
        let resolved = self.stores.resolve_event(event).await?;

        self.stores
            .events
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Event"))?;
        tracing::info!(event_id = %id, by = %principal.id, "event deleted");

        self.publisher.publish(Notification::EventDeleted(resolved))?;
        Ok("Event is deleted".to_string())
    }

    /// Events in `scope` with live owner and live customer detail.
    pub async fn list_resolved(
        &self,
        principal: &Principal,
        scope: Scope,
        range: DateRange,
    ) -> DomainResult<Vec<ResolvedEvent>> {
        let events = self.find(principal, scope, range).await?;
        let mut resolved = Vec::with_capacity(events.len());
        for event in events {
            resolved.push(self.stores.resolve_event(event).await?);
        }
        Ok(resolved)
    }

    /// Events in `scope` with live owner and the cached customer snapshot.
    pub async fn list_snapshots(
        &self,
        principal: &Principal,
        scope: Scope,
        range: DateRange,
    ) -> DomainResult<Vec<EventView>> {
        let events = self.find(principal, scope, range).await?;
        let mut views = Vec::with_capacity(events.len());
        for event in events {
            views.push(self.stores.event_view(event).await?);
        }
        Ok(views)
    }

    async fn find(&self, principal: &Principal, scope: Scope, range: DateRange) -> DomainResult<Vec<Event>> {
        let query = EventQuery {
            owner: Some(OwnerFilter::for_scope(principal, scope)?),
            plan_dates: range,
        };
        Ok(self.stores.events.find(query, EventSort::PlanDateDesc).await?)
    }

    async fn load_for(&self, principal: &Principal, id: EventId) -> DomainResult<Event> {
        let event = self
            .stores
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Event"))?;
        ensure_owner_or_manager(principal, event.owner)?;
        Ok(event)
    }

    async fn transition(&self, principal: &Principal, event: Event, transition: Transition) -> DomainResult<ResolvedEvent> {
        let (resolved, _) = self.apply(principal, event, transition).await?;
        Ok(resolved)
    }

    /// Apply, write back, publish `EventUpdated`. Also returns the successor
    /// row still to be inserted, if any.
    async fn apply(
        &self,
        principal: &Principal,
        mut event: Event,
        transition: Transition,
    ) -> DomainResult<(ResolvedEvent, Option<Event>)> {
        let name = transition.name();
        let outcome = event.apply(transition, Utc::now())?;

        let updated = event.clone();
        let event = self
            .stores
            .events
            .update(event.id, Box::new(move |stored: &mut Event| *stored = updated))
            .await?
            .ok_or_else(|| DomainError::not_found("Event"))?;
        tracing::info!(event_id = %event.id, transition = name, by = %principal.id, "event transitioned");

        let resolved = self.stores.resolve_event(event).await?;
        self.publisher.publish(Notification::EventUpdated(resolved.clone()))?;
        Ok((resolved, outcome.successor))
    }
}
