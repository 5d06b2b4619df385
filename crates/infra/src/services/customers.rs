use chrono::Utc;

use unshift_auth::{OwnerFilter, Principal, Scope, ensure_owner, ensure_owner_or_manager};
use unshift_core::{CustomerId, DomainError, DomainResult};
use unshift_scheduling::{CreateCustomerInput, Customer, CustomerView, Notification, UpdateCustomerInput};

use super::{Publisher, Stores};
use crate::store::{CustomerQuery, Recency};

/// Ownership-scoped customer CRUD.
#[derive(Clone)]
pub struct CustomerDirectory {
    stores: Stores,
    publisher: Publisher,
}

impl CustomerDirectory {
    pub(crate) fn new(stores: Stores, publisher: Publisher) -> Self {
        Self { stores, publisher }
    }

    pub async fn list_own(&self, principal: &Principal) -> DomainResult<Vec<CustomerView>> {
        self.list(principal, Scope::Own).await
    }

    /// Manager-only: every customer not owned by the caller.
    pub async fn list_others(&self, principal: &Principal) -> DomainResult<Vec<CustomerView>> {
        self.list(principal, Scope::Peers).await
    }

    async fn list(&self, principal: &Principal, scope: Scope) -> DomainResult<Vec<CustomerView>> {
        let query = CustomerQuery {
            owner: Some(OwnerFilter::for_scope(principal, scope)?),
        };
        let customers = self.stores.customers.find(query, Recency::NewestFirst).await?;

        let mut views = Vec::with_capacity(customers.len());
        for customer in customers {
            views.push(self.stores.customer_view(customer).await?);
        }
        Ok(views)
    }

    pub async fn create(&self, principal: &Principal, input: CreateCustomerInput) -> DomainResult<CustomerView> {
        let customer = Customer::create(principal.id, &input, Utc::now())?;
        self.insert_and_announce(customer).await
    }

    /// Book a placeholder customer for `principal`.
    pub(crate) async fn provision_placeholder(&self, principal: &Principal) -> DomainResult<Customer> {
        let view = self.insert_and_announce(Customer::placeholder(principal.id, Utc::now())).await?;
        Ok(view.customer)
    }

    async fn insert_and_announce(&self, customer: Customer) -> DomainResult<CustomerView> {
        let customer = self.stores.customers.insert(customer).await?;
        tracing::info!(customer_id = %customer.id, owner = %customer.owner, "customer created");

        let view = self.stores.customer_view(customer).await?;
        self.publisher.publish(Notification::CustomerCreated(view.clone()))?;
        Ok(view)
    }

    /// Field-wise merge. Allowed for the owner, a manager, or anyone on a
    /// shared customer.
    pub async fn update(
        &self,
        principal: &Principal,
        id: CustomerId,
        input: UpdateCustomerInput,
    ) -> DomainResult<CustomerView> {
        let current = self.load(id).await?;
        if !current.is_shared {
            ensure_owner_or_manager(principal, current.owner)?;
        }

        let customer = self
            .stores
            .customers
            .update(id, Box::new(move |c: &mut Customer| c.merge(&input)))
            .await?
            .ok_or_else(|| DomainError::not_found("Customer"))?;
        tracing::info!(customer_id = %id, by = %principal.id, "customer updated");

        self.stores.customer_view(customer).await
    }

    /// Owner-only hard delete. Returns the removed record.
    pub async fn delete(&self, principal: &Principal, id: CustomerId) -> DomainResult<Customer> {
        let current = self.load(id).await?;
        ensure_owner(principal, current.owner)?;

        let customer = self
            .stores
            .customers
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer"))?;
        tracing::info!(customer_id = %id, "customer deleted");
        Ok(customer)
    }

    pub(crate) async fn find(&self, id: CustomerId) -> DomainResult<Option<Customer>> {
        Ok(self.stores.customers.find_by_id(id).await?)
    }

    async fn load(&self, id: CustomerId) -> DomainResult<Customer> {
        self.find(id).await?.ok_or_else(|| DomainError::not_found("Customer"))
    }
}
