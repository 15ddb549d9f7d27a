//! Thread-safe in-memory tenant store with namespace partitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::acceptance::domain::{AcceptanceRequest, AcceptanceRequestId, RequestToken};
use crate::events::domain::DomainEvent;
use crate::persistence::ports::{StagedWrite, StoreError, StoreResult, TenantStore, UnitOfWork};
use crate::practice::domain::{
    Customer, CustomerId, DocumentId, GeneratedDocument, Invoice, PortalContact,
    Project, ProjectId, ProjectTemplate, ProjectTemplateId,
};
use crate::proposal::domain::{Proposal, ProposalId, ProposalNumber, ProposalStatus};
use crate::tenant::{PortalContactId, TenantContext, TenantNamespace};

const UNIQUE_TOKEN: &str = "acceptance_requests_token_key";
const UNIQUE_ACTIVE_PAIR: &str = "acceptance_requests_active_document_contact_key";

/// Thread-safe in-memory store. Each tenant namespace is an isolated
/// partition; commits clone the partition, apply the unit of work, check
/// constraints and swap the result in, so a failed commit leaves no trace.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantStore {
    state: Arc<RwLock<HashMap<TenantNamespace, Partition>>>,
}

#[derive(Debug, Clone, Default)]
struct Partition {
    proposal_sequence: u32,
    proposals: HashMap<ProposalId, Proposal>,
    acceptance_requests: HashMap<AcceptanceRequestId, AcceptanceRequest>,
    customers: HashMap<CustomerId, Customer>,
    portal_contacts: HashMap<PortalContactId, PortalContact>,
    documents: HashMap<DocumentId, GeneratedDocument>,
    templates: HashMap<ProjectTemplateId, ProjectTemplate>,
    projects: HashMap<ProjectId, Project>,
    invoices: Vec<Invoice>,
    outbox: Vec<DomainEvent>,
}

impl InMemoryTenantStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a customer into a namespace. Replacing a stored customer
    /// advances its revision, so writes based on the old record fail.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the lock is poisoned.
    pub fn insert_customer(
        &self,
        namespace: &TenantNamespace,
        mut customer: Customer,
    ) -> StoreResult<()> {
        self.seed(namespace, |partition| {
            if let Some(previous) = partition.customers.get(&customer.id()) {
                customer.supersede(previous);
            }
            partition.customers.insert(customer.id(), customer);
        })
    }

    /// Seeds a portal contact into a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the lock is poisoned.
    pub fn insert_portal_contact(
        &self,
        namespace: &TenantNamespace,
        contact: PortalContact,
    ) -> StoreResult<()> {
        self.seed(namespace, |partition| {
            partition.portal_contacts.insert(contact.id(), contact);
        })
    }

    /// Seeds a generated document into a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the lock is poisoned.
    pub fn insert_document(
        &self,
        namespace: &TenantNamespace,
        document: GeneratedDocument,
    ) -> StoreResult<()> {
        self.seed(namespace, |partition| {
            partition.documents.insert(document.id(), document);
        })
    }

    /// Seeds a project template into a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the lock is poisoned.
    pub fn insert_project_template(
        &self,
        namespace: &TenantNamespace,
        template: ProjectTemplate,
    ) -> StoreResult<()> {
        self.seed(namespace, |partition| {
            partition.templates.insert(template.id(), template);
        })
    }

    /// Returns the events committed to a namespace's outbox, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the lock is poisoned.
    pub fn outbox(&self, namespace: &TenantNamespace) -> StoreResult<Vec<DomainEvent>> {
        let state = self.read()?;
        Ok(state
            .get(namespace)
            .map(|partition| partition.outbox.clone())
            .unwrap_or_default())
    }

    /// Returns every project in a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the lock is poisoned.
    pub fn projects(&self, namespace: &TenantNamespace) -> StoreResult<Vec<Project>> {
        let state = self.read()?;
        Ok(state
            .get(namespace)
            .map(|partition| partition.projects.values().cloned().collect())
            .unwrap_or_default())
    }

    fn seed(
        &self,
        namespace: &TenantNamespace,
        apply: impl FnOnce(&mut Partition),
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        apply(state.entry(namespace.clone()).or_default());
        Ok(())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<TenantNamespace, Partition>>> {
        self.state
            .read()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<TenantNamespace, Partition>>> {
        self.state
            .write()
            .map_err(|err| StoreError::persistence(std::io::Error::other(err.to_string())))
    }

    fn find<T>(
        &self,
        ctx: &TenantContext,
        lookup: impl FnOnce(&Partition) -> Option<T>,
    ) -> StoreResult<Option<T>> {
        let state = self.read()?;
        Ok(state.get(ctx.namespace()).and_then(lookup))
    }

    fn collect<T>(
        &self,
        ctx: &TenantContext,
        lookup: impl FnOnce(&Partition) -> Vec<T>,
    ) -> StoreResult<Vec<T>> {
        let state = self.read()?;
        Ok(state.get(ctx.namespace()).map(lookup).unwrap_or_default())
    }
}

fn check_revision(
    entity: &'static str,
    id: uuid::Uuid,
    expected: u64,
    actual: u64,
) -> StoreResult<()> {
    if expected == actual {
        return Ok(());
    }
    Err(StoreError::StaleRevision {
        entity,
        id,
        expected,
        actual,
    })
}

fn insert_new<K, V>(
    map: &mut HashMap<K, V>,
    key: K,
    value: V,
    entity: &'static str,
    id: uuid::Uuid,
) -> StoreResult<()>
where
    K: std::hash::Hash + Eq,
{
    if map.contains_key(&key) {
        return Err(StoreError::DuplicateEntity { entity, id });
    }
    map.insert(key, value);
    Ok(())
}

fn apply_write(partition: &mut Partition, write: StagedWrite) -> StoreResult<()> {
    match write {
        StagedWrite::InsertProposal(proposal) => {
            let id = proposal.id();
            insert_new(
                &mut partition.proposals,
                id,
                *proposal,
                "proposal",
                id.into_inner(),
            )
        }
        StagedWrite::UpdateProposal {
            proposal,
            expected_revision,
        } => {
            let id = proposal.id();
            let stored = partition
                .proposals
                .get_mut(&id)
                .ok_or(StoreError::NotFound {
                    entity: "proposal",
                    id: id.into_inner(),
                })?;
            check_revision(
                "proposal",
                id.into_inner(),
                expected_revision,
                stored.revision(),
            )?;
            *stored = *proposal;
            Ok(())
        }
        StagedWrite::DeleteProposal {
            id,
            expected_revision,
        } => {
            let stored = partition.proposals.get(&id).ok_or(StoreError::NotFound {
                entity: "proposal",
                id: id.into_inner(),
            })?;
            check_revision(
                "proposal",
                id.into_inner(),
                expected_revision,
                stored.revision(),
            )?;
            partition.proposals.remove(&id);
            Ok(())
        }
        StagedWrite::InsertAcceptanceRequest(request) => {
            let id = request.id();
            insert_new(
                &mut partition.acceptance_requests,
                id,
                *request,
                "acceptance_request",
                id.into_inner(),
            )
        }
        StagedWrite::UpdateAcceptanceRequest {
            request,
            expected_revision,
        } => {
            let id = request.id();
            let stored =
                partition
                    .acceptance_requests
                    .get_mut(&id)
                    .ok_or(StoreError::NotFound {
                        entity: "acceptance_request",
                        id: id.into_inner(),
                    })?;
            check_revision(
                "acceptance_request",
                id.into_inner(),
                expected_revision,
                stored.revision(),
            )?;
            *stored = *request;
            Ok(())
        }
        StagedWrite::InsertProject(project) => {
            let id = project.id();
            insert_new(
                &mut partition.projects,
                id,
                *project,
                "project",
                id.into_inner(),
            )
        }
        StagedWrite::InsertInvoice(invoice) => {
            let id = invoice.id();
            if partition.invoices.iter().any(|stored| stored.id() == id) {
                return Err(StoreError::DuplicateEntity {
                    entity: "invoice",
                    id: id.into_inner(),
                });
            }
            partition.invoices.push(*invoice);
            Ok(())
        }
        StagedWrite::UpdateCustomer {
            customer,
            expected_revision,
        } => {
            let id = customer.id();
            let stored = partition
                .customers
                .get_mut(&id)
                .ok_or(StoreError::NotFound {
                    entity: "customer",
                    id: id.into_inner(),
                })?;
            check_revision(
                "customer",
                id.into_inner(),
                expected_revision,
                stored.revision(),
            )?;
            *stored = *customer;
            Ok(())
        }
    }
}

/// Enforces the token and active-pair uniqueness constraints.
fn check_acceptance_constraints(partition: &Partition) -> StoreResult<()> {
    let mut tokens = HashSet::with_capacity(partition.acceptance_requests.len());
    let mut active_pairs = HashSet::new();
    for request in partition.acceptance_requests.values() {
        if !tokens.insert(request.token().as_str()) {
            return Err(StoreError::UniqueViolation {
                constraint: UNIQUE_TOKEN,
            });
        }
        if request.is_active()
            && !active_pairs.insert((request.document_id(), request.portal_contact_id()))
        {
            return Err(StoreError::UniqueViolation {
                constraint: UNIQUE_ACTIVE_PAIR,
            });
        }
    }
    Ok(())
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn next_proposal_number(&self, ctx: &TenantContext) -> StoreResult<ProposalNumber> {
        let mut state = self.write()?;
        let partition = state.entry(ctx.namespace().clone()).or_default();
        let next = partition.proposal_sequence.checked_add(1).ok_or_else(|| {
            StoreError::persistence(std::io::Error::other("proposal number sequence exhausted"))
        })?;
        partition.proposal_sequence = next;
        Ok(ProposalNumber::new(next))
    }

    async fn proposal(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
    ) -> StoreResult<Option<Proposal>> {
        self.find(ctx, |partition| partition.proposals.get(&id).cloned())
    }

    async fn proposals_expired_before(
        &self,
        ctx: &TenantContext,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Proposal>> {
        self.collect(ctx, |partition| {
            partition
                .proposals
                .values()
                .filter(|proposal| {
                    proposal.status() == ProposalStatus::Sent && proposal.is_past_deadline(now)
                })
                .cloned()
                .collect()
        })
    }

    async fn acceptance_request(
        &self,
        ctx: &TenantContext,
        id: AcceptanceRequestId,
    ) -> StoreResult<Option<AcceptanceRequest>> {
        self.find(ctx, |partition| {
            partition.acceptance_requests.get(&id).cloned()
        })
    }

    async fn acceptance_request_by_token(
        &self,
        ctx: &TenantContext,
        token: &RequestToken,
    ) -> StoreResult<Option<AcceptanceRequest>> {
        self.find(ctx, |partition| {
            partition
                .acceptance_requests
                .values()
                .find(|request| request.token() == token)
                .cloned()
        })
    }

    async fn active_acceptance_request(
        &self,
        ctx: &TenantContext,
        document_id: DocumentId,
        portal_contact_id: PortalContactId,
    ) -> StoreResult<Option<AcceptanceRequest>> {
        self.find(ctx, |partition| {
            partition
                .acceptance_requests
                .values()
                .find(|request| {
                    request.is_active()
                        && request.document_id() == document_id
                        && request.portal_contact_id() == portal_contact_id
                })
                .cloned()
        })
    }

    async fn acceptance_requests_expired_before(
        &self,
        ctx: &TenantContext,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<AcceptanceRequest>> {
        self.collect(ctx, |partition| {
            partition
                .acceptance_requests
                .values()
                .filter(|request| request.is_active() && request.is_past_deadline(now))
                .cloned()
                .collect()
        })
    }

    async fn customer(
        &self,
        ctx: &TenantContext,
        id: CustomerId,
    ) -> StoreResult<Option<Customer>> {
        self.find(ctx, |partition| partition.customers.get(&id).cloned())
    }

    async fn portal_contact(
        &self,
        ctx: &TenantContext,
        id: PortalContactId,
    ) -> StoreResult<Option<PortalContact>> {
        self.find(ctx, |partition| partition.portal_contacts.get(&id).cloned())
    }

    async fn generated_document(
        &self,
        ctx: &TenantContext,
        id: DocumentId,
    ) -> StoreResult<Option<GeneratedDocument>> {
        self.find(ctx, |partition| partition.documents.get(&id).cloned())
    }

    async fn project_template(
        &self,
        ctx: &TenantContext,
        id: ProjectTemplateId,
    ) -> StoreResult<Option<ProjectTemplate>> {
        self.find(ctx, |partition| partition.templates.get(&id).cloned())
    }

    async fn project(&self, ctx: &TenantContext, id: ProjectId) -> StoreResult<Option<Project>> {
        self.find(ctx, |partition| partition.projects.get(&id).cloned())
    }

    async fn invoices_for_project(
        &self,
        ctx: &TenantContext,
        project_id: ProjectId,
    ) -> StoreResult<Vec<Invoice>> {
        self.collect(ctx, |partition| {
            partition
                .invoices
                .iter()
                .filter(|invoice| invoice.project_id() == project_id)
                .cloned()
                .collect()
        })
    }

    async fn commit(&self, ctx: &TenantContext, unit: UnitOfWork) -> StoreResult<()> {
        let (writes, events) = unit.into_parts();
        let mut state = self.write()?;
        let partition = state.entry(ctx.namespace().clone()).or_default();

        let mut staged = partition.clone();
        for write in writes {
            apply_write(&mut staged, write)?;
        }
        check_acceptance_constraints(&staged)?;
        staged.outbox.extend(events);

        *partition = staged;
        Ok(())
    }
}
