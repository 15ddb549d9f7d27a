//! Certificate of acceptance generation.

use super::events;
use crate::acceptance::adapters::CERTIFICATE_TEMPLATE;
use crate::acceptance::domain::{
    AcceptanceRequest, AcceptanceRequestId, AcceptanceStatus, CertificateRecord,
};
use crate::acceptance::ports::{
    CertificateError, CertificateIssuer, DocumentStorage, PdfConverter, TemplateRenderer,
};
use crate::events::ports::EventPublisher;
use crate::persistence::{
    commit_and_publish,
    ports::{TenantStore, UnitOfWork},
};
use crate::practice::domain::{GeneratedDocument, PortalContact};
use crate::tenant::{TenantContext, TenantNamespace};
use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::sync::Arc;

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Returns the storage key of a request's certificate.
#[must_use]
pub fn certificate_storage_key(
    namespace: &TenantNamespace,
    request_id: AcceptanceRequestId,
) -> String {
    format!("{namespace}/acceptance-certificates/{request_id}/certificate.pdf")
}

/// Returns the display file name of the certificate for a document.
#[must_use]
pub fn certificate_file_name(document: &GeneratedDocument) -> String {
    format!("{}-certificate-of-acceptance.pdf", document.file_stem())
}

fn sha256_hex(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn template_context(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    document: &GeneratedDocument,
    contact: &PortalContact,
    document_hash: &str,
) -> Value {
    let acceptor = request.acceptor();
    json!({
        "document_file_name": document.file_name(),
        "contact_name": contact.display_name(),
        "contact_email": contact.email(),
        "acceptor_name": acceptor.map(|a| a.acceptor_name.as_str()),
        "accepted_at": request.accepted_at().map(|at| at.to_rfc3339()),
        "acceptor_ip": acceptor.and_then(|a| a.acceptor_ip.as_deref()),
        "acceptor_user_agent": acceptor.and_then(|a| a.acceptor_user_agent.as_deref()),
        "document_hash": document_hash,
        "request_id": request.id().to_string(),
        "org_id": ctx.org_id().as_str(),
    })
}

/// Renders, stores and records the certificate of acceptance.
#[derive(Clone)]
pub struct CertificateService<S, P, C, D, R, V>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
    D: DocumentStorage,
    R: TemplateRenderer,
    V: PdfConverter,
{
    store: Arc<S>,
    publisher: Arc<P>,
    clock: Arc<C>,
    storage: Arc<D>,
    renderer: Arc<R>,
    converter: Arc<V>,
    template: String,
}

impl<S, P, C, D, R, V> CertificateService<S, P, C, D, R, V>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
    D: DocumentStorage,
    R: TemplateRenderer,
    V: PdfConverter,
{
    /// Creates a certificate service using the built-in template.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        publisher: Arc<P>,
        clock: Arc<C>,
        storage: Arc<D>,
        renderer: Arc<R>,
        converter: Arc<V>,
    ) -> Self {
        Self {
            store,
            publisher,
            clock,
            storage,
            renderer,
            converter,
            template: CERTIFICATE_TEMPLATE.to_owned(),
        }
    }

    /// Renders certificates with a different template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Generates the certificate for an accepted request.
    ///
    /// The original document is hashed with SHA-256 so the certificate
    /// pins the exact bytes accepted. The PDF is stored under the tenant's
    /// certificate prefix and recorded on the request in the same commit as
    /// its `acceptance.certificate_generated` event.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::NotAccepted`] unless the request is
    /// `ACCEPTED`, a not-found error for a missing document or contact, or
    /// the storage, rendering or store failure that stopped generation.
    pub async fn generate_certificate(
        &self,
        ctx: &TenantContext,
        request: &AcceptanceRequest,
    ) -> Result<AcceptanceRequest, CertificateError> {
        if request.status() != AcceptanceStatus::Accepted {
            return Err(CertificateError::NotAccepted {
                request_id: request.id(),
                status: request.status(),
            });
        }
        let document = self
            .store
            .generated_document(ctx, request.document_id())
            .await?
            .ok_or(CertificateError::DocumentNotFound(request.document_id()))?;
        let contact = self
            .store
            .portal_contact(ctx, request.portal_contact_id())
            .await?
            .ok_or(CertificateError::ContactNotFound(request.portal_contact_id()))?;

        let original = self.storage.download(document.storage_key()).await?;
        let document_hash = sha256_hex(&original);
        let context = template_context(ctx, request, &document, &contact, &document_hash);
        let html = self.renderer.render(&self.template, &context)?;
        let pdf = self.converter.html_to_pdf(&html).await?;

        let storage_key = certificate_storage_key(ctx.namespace(), request.id());
        let file_name = certificate_file_name(&document);
        self.storage
            .upload(&storage_key, pdf, PDF_CONTENT_TYPE)
            .await?;

        let clock = &*self.clock;
        let mut certified = request.clone();
        certified.record_certificate(
            CertificateRecord {
                storage_key,
                file_name: file_name.clone(),
            },
            clock,
        );
        let mut unit = UnitOfWork::new();
        unit.update_acceptance_request(&mut certified);
        unit.record_event(events::certificate_generated(
            ctx,
            &certified,
            &file_name,
            &document_hash,
            clock,
        ));
        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;
        Ok(certified)
    }
}

#[async_trait]
impl<S, P, C, D, R, V> CertificateIssuer for CertificateService<S, P, C, D, R, V>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
    D: DocumentStorage,
    R: TemplateRenderer,
    V: PdfConverter,
{
    async fn issue(
        &self,
        ctx: &TenantContext,
        request: &AcceptanceRequest,
    ) -> Result<AcceptanceRequest, CertificateError> {
        self.generate_certificate(ctx, request).await
    }
}
