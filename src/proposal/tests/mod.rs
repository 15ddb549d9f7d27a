//! Unit tests for the proposal context.


use crate::events::services::EventFanout;
use crate::persistence::adapters::memory::InMemoryTenantStore;
use crate::practice::domain::LifecycleStatus;
use crate::proposal::domain::FeeModel;
use crate::proposal::services::{
    CreateProposalRequest, ProposalExpiryProcessor, ProposalOrchestrator, ProposalService,
};
use crate::tenant::{MemberId, TenantContext};
use crate::test_support::{ManualClock, SeededCustomer, member_context, seed_customer, usd};
use rstest::fixture;
use serde_json::json;
use std::sync::Arc;

type TestService = ProposalService<InMemoryTenantStore, EventFanout, ManualClock>;
type TestOrchestrator = ProposalOrchestrator<InMemoryTenantStore, EventFanout, ManualClock>;
type TestExpiry = ProposalExpiryProcessor<InMemoryTenantStore, EventFanout, ManualClock>;

struct Harness {
    store: Arc<InMemoryTenantStore>,
    clock: Arc<ManualClock>,
    service: TestService,
    orchestrator: TestOrchestrator,
    expiry: TestExpiry,
    ctx: TenantContext,
    member_id: MemberId,
    seeded: SeededCustomer,
}

impl Harness {
    fn with_customer_status(status: LifecycleStatus) -> Self {
        let store = Arc::new(InMemoryTenantStore::new());
        let publisher = Arc::new(EventFanout::new());
        let clock = Arc::new(ManualClock::default());
        let member_id = MemberId::new();
        let seeded = seed_customer(&store, status, &*clock);
        Self {
            service: ProposalService::new(store.clone(), publisher.clone(), clock.clone()),
            orchestrator: ProposalOrchestrator::new(
                store.clone(),
                publisher.clone(),
                clock.clone(),
            ),
            expiry: ProposalExpiryProcessor::new(store.clone(), publisher, clock.clone()),
            store,
            clock,
            ctx: member_context(member_id),
            member_id,
            seeded,
        }
    }

    fn fixed_fee_request(&self) -> CreateProposalRequest {
        CreateProposalRequest::new("Brand refresh", self.seeded.customer.id(), FeeModel::Fixed)
            .with_fixed_fee(usd("15000.00"))
            .with_content(json!({ "scope": "Identity, guidelines and launch assets" }))
    }

    fn hourly_request(&self) -> CreateProposalRequest {
        CreateProposalRequest::new("Ongoing support", self.seeded.customer.id(), FeeModel::Hourly)
            .with_content(json!({ "scope": "Ad hoc design support" }))
    }

    fn event_types(&self) -> Vec<&'static str> {
        self.store
            .outbox(self.ctx.namespace())
            .expect("outbox readable")
            .iter()
            .map(|event| event.event_type().as_str())
            .collect()
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::with_customer_status(LifecycleStatus::Prospect)
}
