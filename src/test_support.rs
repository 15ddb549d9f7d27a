//! Fixtures shared by unit tests across contexts.

use crate::acceptance::ports::{PdfConverter, RenderError};
use crate::persistence::adapters::memory::InMemoryTenantStore;
use crate::practice::domain::{
    CurrencyCode, Customer, GeneratedDocument, LifecycleStatus, Money, PortalContact,
};
use crate::tenant::{MemberId, OrgId, PortalContactId, TenantContext, TenantNamespace};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::RwLock;

/// Clock frozen at a chosen instant until advanced.
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.write().expect("clock lock");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
                .single()
                .expect("valid instant"),
        )
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock")
    }
}

pub(crate) fn namespace(value: &str) -> TenantNamespace {
    TenantNamespace::new(value).expect("valid namespace")
}

pub(crate) fn member_context(member_id: MemberId) -> TenantContext {
    TenantContext::member(
        namespace("tenant_studio"),
        OrgId::new("org-studio").expect("valid org"),
        member_id,
    )
}

pub(crate) fn portal_context(contact_id: PortalContactId) -> TenantContext {
    TenantContext::portal(
        namespace("tenant_studio"),
        OrgId::new("org-studio").expect("valid org"),
        contact_id,
    )
}

pub(crate) fn system_context() -> TenantContext {
    TenantContext::system(
        namespace("tenant_studio"),
        OrgId::new("org-studio").expect("valid org"),
    )
}

pub(crate) fn usd(amount: &str) -> Money {
    Money::new(
        Decimal::from_str(amount).expect("valid decimal"),
        CurrencyCode::new("USD").expect("valid currency"),
    )
}

/// Customer, portal contact and document seeded into the test tenant.
pub(crate) struct SeededCustomer {
    pub(crate) customer: Customer,
    pub(crate) contact: PortalContact,
    pub(crate) document: GeneratedDocument,
}

pub(crate) fn seed_customer(
    store: &InMemoryTenantStore,
    status: LifecycleStatus,
    clock: &impl Clock,
) -> SeededCustomer {
    let ns = namespace("tenant_studio");
    let customer = Customer::new("Acme Ltd", status, clock).expect("valid customer");
    let contact = PortalContact::new(customer.id(), "Ada Client", "ada@acme.test")
        .expect("valid contact");
    let document = GeneratedDocument::new(customer.id(), "engagement-letter.pdf", "docs/letter.pdf")
        .expect("valid document");
    store
        .insert_customer(&ns, customer.clone())
        .expect("seed customer");
    store
        .insert_portal_contact(&ns, contact.clone())
        .expect("seed contact");
    store
        .insert_document(&ns, document.clone())
        .expect("seed document");
    SeededCustomer {
        customer,
        contact,
        document,
    }
}

/// Bytes stored for the seeded document.
pub(crate) const LETTER_BYTES: &[u8] = b"%PDF-1.7 engagement letter";

/// Converter that wraps the HTML in a fake PDF envelope.
#[derive(Debug, Default)]
pub(crate) struct StubPdfConverter;

#[async_trait]
impl PdfConverter for StubPdfConverter {
    async fn html_to_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        Ok(format!("%PDF-stub\n{html}").into_bytes())
    }
}
