//! Shared fixtures for integration tests: a controllable clock, a stub PDF
//! converter and a fully wired in-memory studio tenant.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use covenant::acceptance::{
    adapters::{MiniJinjaTemplateRenderer, memory::InMemoryDocumentStorage},
    ports::{PdfConverter, RenderError},
    services::{AcceptanceExpiryProcessor, AcceptanceService, CertificateService},
};
use covenant::events::{
    adapters::memory::{InMemoryAuditLog, InMemoryNotificationInbox, InMemoryPortalReadModel},
    services::{AuditSubscriber, EventFanout, NotificationSubscriber, PortalSyncSubscriber},
};
use covenant::persistence::adapters::memory::InMemoryTenantStore;
use covenant::practice::domain::{
    CurrencyCode, Customer, GeneratedDocument, LifecycleStatus, Money, PortalContact,
};
use covenant::proposal::services::{
    ProposalExpiryProcessor, ProposalOrchestrator, ProposalService,
};
use covenant::tenant::{MemberId, OrgId, TenantContext, TenantNamespace};
use eyre::{Result, WrapErr, eyre};
use mockable::Clock;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Bytes stored for the studio's engagement letter.
pub const LETTER_BYTES: &[u8] = b"%PDF-1.7 engagement letter";

/// Clock that stands still until a test moves it.
#[derive(Debug)]
pub struct SteppingClock {
    now: RwLock<DateTime<Utc>>,
}

impl SteppingClock {
    /// Starts the clock at the given instant.
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.write() {
            *now += by;
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now.read().map(|now| *now).unwrap_or_default()
    }
}

/// Converter that wraps rendered HTML in a fake PDF envelope.
#[derive(Debug, Default)]
pub struct StubPdfConverter;

#[async_trait]
impl PdfConverter for StubPdfConverter {
    async fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        Ok(format!("%PDF-stub\n{html}").into_bytes())
    }
}

/// Certificate service wired to in-memory adapters.
pub type Certificates = CertificateService<
    InMemoryTenantStore,
    EventFanout,
    SteppingClock,
    InMemoryDocumentStorage,
    MiniJinjaTemplateRenderer,
    StubPdfConverter,
>;

/// Builds a US dollar amount from a decimal literal.
///
/// # Errors
///
/// Returns an error when the literal is not a decimal.
pub fn usd(amount: &str) -> Result<Money> {
    Ok(Money::new(
        Decimal::from_str(amount).wrap_err("parse amount")?,
        CurrencyCode::new("USD").wrap_err("currency code")?,
    ))
}

/// One tenant with a customer, portal contact and stored document, plus
/// every service wired to a shared store and event fan-out.
pub struct Studio {
    pub store: Arc<InMemoryTenantStore>,
    pub storage: Arc<InMemoryDocumentStorage>,
    pub publisher: Arc<EventFanout>,
    pub clock: Arc<SteppingClock>,
    pub audit: Arc<InMemoryAuditLog>,
    pub inbox: Arc<InMemoryNotificationInbox>,
    pub portal: Arc<InMemoryPortalReadModel>,
    pub proposals: ProposalService<InMemoryTenantStore, EventFanout, SteppingClock>,
    pub orchestrator: ProposalOrchestrator<InMemoryTenantStore, EventFanout, SteppingClock>,
    pub proposal_expiry: ProposalExpiryProcessor<InMemoryTenantStore, EventFanout, SteppingClock>,
    pub acceptances:
        AcceptanceService<InMemoryTenantStore, EventFanout, SteppingClock, Certificates>,
    pub acceptance_expiry:
        AcceptanceExpiryProcessor<InMemoryTenantStore, EventFanout, SteppingClock>,
    pub namespace: TenantNamespace,
    pub org_id: OrgId,
    pub member_id: MemberId,
    pub customer: Customer,
    pub contact: PortalContact,
    pub document: GeneratedDocument,
}

impl Studio {
    /// Seeds the `tenant_studio` tenant with a customer in `status`.
    ///
    /// # Errors
    ///
    /// Returns an error when seeding fails.
    pub fn new(status: LifecycleStatus) -> Result<Self> {
        let store = Arc::new(InMemoryTenantStore::new());
        let storage = Arc::new(InMemoryDocumentStorage::new());
        let clock = Arc::new(SteppingClock::default());
        let audit = Arc::new(InMemoryAuditLog::new());
        let inbox = Arc::new(InMemoryNotificationInbox::new());
        let portal = Arc::new(InMemoryPortalReadModel::new());
        let publisher = Arc::new(
            EventFanout::new()
                .with_subscriber(Arc::new(AuditSubscriber::new(audit.clone())))
                .with_subscriber(Arc::new(NotificationSubscriber::new(inbox.clone())))
                .with_subscriber(Arc::new(PortalSyncSubscriber::new(
                    portal.clone(),
                    clock.clone(),
                ))),
        );

        let namespace = TenantNamespace::new("tenant_studio").wrap_err("namespace")?;
        let org_id = OrgId::new("org-studio").wrap_err("org id")?;
        let customer = Customer::new("Acme Ltd", status, &*clock).wrap_err("customer")?;
        let contact = PortalContact::new(customer.id(), "Ada Client", "ada@acme.test")
            .wrap_err("portal contact")?;
        let document =
            GeneratedDocument::new(customer.id(), "engagement-letter.pdf", "docs/letter.pdf")
                .wrap_err("document")?;
        store
            .insert_customer(&namespace, customer.clone())
            .wrap_err("seed customer")?;
        store
            .insert_portal_contact(&namespace, contact.clone())
            .wrap_err("seed contact")?;
        store
            .insert_document(&namespace, document.clone())
            .wrap_err("seed document")?;
        storage
            .put(document.storage_key(), LETTER_BYTES, "application/pdf")
            .wrap_err("seed document bytes")?;

        let certificates = Arc::new(CertificateService::new(
            store.clone(),
            publisher.clone(),
            clock.clone(),
            storage.clone(),
            Arc::new(MiniJinjaTemplateRenderer::new()),
            Arc::new(StubPdfConverter),
        ));

        Ok(Self {
            proposals: ProposalService::new(store.clone(), publisher.clone(), clock.clone()),
            orchestrator: ProposalOrchestrator::new(
                store.clone(),
                publisher.clone(),
                clock.clone(),
            ),
            proposal_expiry: ProposalExpiryProcessor::new(
                store.clone(),
                publisher.clone(),
                clock.clone(),
            ),
            acceptances: AcceptanceService::new(
                store.clone(),
                publisher.clone(),
                clock.clone(),
                certificates,
            ),
            acceptance_expiry: AcceptanceExpiryProcessor::new(
                store.clone(),
                publisher.clone(),
                clock.clone(),
            ),
            store,
            storage,
            publisher,
            clock,
            audit,
            inbox,
            portal,
            namespace,
            org_id,
            member_id: MemberId::new(),
            customer,
            contact,
            document,
        })
    }

    /// Context of the studio member driving the tests.
    pub fn member(&self) -> TenantContext {
        TenantContext::member(self.namespace.clone(), self.org_id.clone(), self.member_id)
    }

    /// Context of the customer's portal contact.
    pub fn client(&self) -> TenantContext {
        TenantContext::portal(
            self.namespace.clone(),
            self.org_id.clone(),
            self.contact.id(),
        )
    }

    /// Context used by background sweeps.
    pub fn system(&self) -> TenantContext {
        TenantContext::system(self.namespace.clone(), self.org_id.clone())
    }

    /// Event type names committed so far, in order.
    ///
    /// # Errors
    ///
    /// Returns an error when the outbox cannot be read.
    pub fn committed_event_types(&self) -> Result<Vec<&'static str>> {
        Ok(self
            .store
            .outbox(&self.namespace)
            .map_err(|err| eyre!("outbox: {err}"))?
            .iter()
            .map(|event| event.event_type().as_str())
            .collect())
    }
}
