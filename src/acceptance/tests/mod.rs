//! Unit tests for the acceptance context.


use crate::acceptance::adapters::MiniJinjaTemplateRenderer;
use crate::acceptance::adapters::memory::InMemoryDocumentStorage;
use crate::acceptance::domain::AcceptanceRequest;
use crate::acceptance::services::{
    AcceptanceExpiryProcessor, AcceptanceService, CertificateService, CreateAcceptanceRequest,
};
use crate::events::services::EventFanout;
use crate::persistence::adapters::memory::InMemoryTenantStore;
use crate::practice::domain::LifecycleStatus;
use crate::tenant::{MemberId, TenantContext};
use crate::test_support::{
    LETTER_BYTES, ManualClock, SeededCustomer, StubPdfConverter, member_context, portal_context,
    seed_customer,
};
use rstest::fixture;
use std::sync::Arc;

type TestCertificates = CertificateService<
    InMemoryTenantStore,
    EventFanout,
    ManualClock,
    InMemoryDocumentStorage,
    MiniJinjaTemplateRenderer,
    StubPdfConverter,
>;
type TestService =
    AcceptanceService<InMemoryTenantStore, EventFanout, ManualClock, TestCertificates>;
type TestExpiry = AcceptanceExpiryProcessor<InMemoryTenantStore, EventFanout, ManualClock>;

struct Harness {
    store: Arc<InMemoryTenantStore>,
    storage: Arc<InMemoryDocumentStorage>,
    publisher: Arc<EventFanout>,
    clock: Arc<ManualClock>,
    certificates: Arc<TestCertificates>,
    service: TestService,
    expiry: TestExpiry,
    ctx: TenantContext,
    member_id: MemberId,
    seeded: SeededCustomer,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(InMemoryTenantStore::new());
        let storage = Arc::new(InMemoryDocumentStorage::new());
        let publisher = Arc::new(EventFanout::new());
        let clock = Arc::new(ManualClock::default());
        let member_id = MemberId::new();
        let seeded = seed_customer(&store, LifecycleStatus::Active, &*clock);
        storage
            .put(seeded.document.storage_key(), LETTER_BYTES, "application/pdf")
            .expect("seed document bytes");
        let certificates = Arc::new(CertificateService::new(
            store.clone(),
            publisher.clone(),
            clock.clone(),
            storage.clone(),
            Arc::new(MiniJinjaTemplateRenderer::new()),
            Arc::new(StubPdfConverter),
        ));
        Self {
            service: AcceptanceService::new(
                store.clone(),
                publisher.clone(),
                clock.clone(),
                certificates.clone(),
            ),
            expiry: AcceptanceExpiryProcessor::new(store.clone(), publisher.clone(), clock.clone()),
            store,
            storage,
            publisher,
            clock,
            certificates,
            ctx: member_context(member_id),
            member_id,
            seeded,
        }
    }

    fn portal_ctx(&self) -> TenantContext {
        portal_context(self.seeded.contact.id())
    }

    fn letter_request(&self) -> CreateAcceptanceRequest {
        CreateAcceptanceRequest::new(self.seeded.document.id(), self.seeded.contact.id())
    }

    async fn send_letter(&self) -> AcceptanceRequest {
        self.service
            .create_and_send(&self.ctx, self.letter_request())
            .await
            .expect("letter sent")
    }

    async fn stored(&self, request: &AcceptanceRequest) -> AcceptanceRequest {
        self.service
            .find(&self.ctx, request.id())
            .await
            .expect("request stored")
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
    Harness::new()
}
