//! Recording mock for `EnvelopeGateway`

use std::sync::Mutex;

use async_trait::async_trait;
use truesign_core::EnvelopeGateway;
use truesign_domain::{
    Document, DocumentDto, Envelope, EnvelopeDto, EnvelopeHistory, EnvelopeUser,
    Result as DomainResult, Signer, TrueSignError,
};
use uuid::Uuid;

/// A gateway call as observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(EnvelopeDto),
    AddFiles(Uuid, Vec<DocumentDto>),
    AddExternal(Uuid, Signer),
    AddInternal(Uuid, Signer, bool),
    SetDesigners(Uuid, Vec<String>),
    SetCreator(Uuid, String),
    Send(Uuid),
    Get(Uuid),
    Delete(Uuid),
    ListUsers,
    ListEnvelopes,
    History(Uuid),
}

/// Records every call and answers with canned envelopes.
///
/// `create_envelope` always returns `envelope_id`; `get_envelope` returns
/// the envelope set with [`MockGateway::with_envelope`].
pub struct MockGateway {
    pub envelope_id: Uuid,
    calls: Mutex<Vec<Call>>,
    stored: Mutex<Option<Envelope>>,
    fail_create: Mutex<Option<TrueSignError>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            envelope_id: Uuid::new_v4(),
            calls: Mutex::new(Vec::new()),
            stored: Mutex::new(None),
            fail_create: Mutex::new(None),
        }
    }

    pub fn with_envelope(self, envelope: Envelope) -> Self {
        *self.stored.lock().unwrap() = Some(envelope);
        self
    }

    pub fn failing_create(self, error: TrueSignError) -> Self {
        *self.fail_create.lock().unwrap() = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl EnvelopeGateway for MockGateway {
    async fn create_envelope(&self, envelope: &EnvelopeDto) -> DomainResult<Envelope> {
        self.record(Call::Create(envelope.clone()));
        if let Some(err) = self.fail_create.lock().unwrap().take() {
            return Err(err);
        }
        let mut created = Envelope { id: self.envelope_id, ..Envelope::default() };
        created.content.title = envelope.title.clone();
        Ok(created)
    }

    async fn add_files(
        &self,
        envelope_id: Uuid,
        documents: &[DocumentDto],
    ) -> DomainResult<Vec<Document>> {
        self.record(Call::AddFiles(envelope_id, documents.to_vec()));
        Ok(documents
            .iter()
            .map(|dto| Document {
                id: Uuid::new_v4(),
                title: dto.title.clone(),
                client_id: dto.client_id.clone(),
                upload_url: Some(format!("https://blob.test/upload/{}", dto.title)),
                ..Document::default()
            })
            .collect())
    }

    async fn add_external_signer(&self, envelope_id: Uuid, signer: &Signer) -> DomainResult<()> {
        self.record(Call::AddExternal(envelope_id, signer.clone()));
        Ok(())
    }

    async fn add_internal_signer(
        &self,
        envelope_id: Uuid,
        signer: &Signer,
        notify: bool,
    ) -> DomainResult<()> {
        self.record(Call::AddInternal(envelope_id, signer.clone(), notify));
        Ok(())
    }

    async fn set_designers(&self, envelope_id: Uuid, emails: &[String]) -> DomainResult<()> {
        self.record(Call::SetDesigners(envelope_id, emails.to_vec()));
        Ok(())
    }

    async fn set_creator(&self, envelope_id: Uuid, email: &str) -> DomainResult<()> {
        self.record(Call::SetCreator(envelope_id, email.to_string()));
        Ok(())
    }

    async fn send_envelope(&self, envelope_id: Uuid) -> DomainResult<Envelope> {
        self.record(Call::Send(envelope_id));
        Ok(Envelope { id: envelope_id, ..Envelope::default() })
    }

    async fn get_envelope(&self, envelope_id: Uuid) -> DomainResult<Envelope> {
        self.record(Call::Get(envelope_id));
        self.stored
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| TrueSignError::Api { status: 404, body: "Not found".into() })
    }

    async fn delete_envelope(&self, envelope_id: Uuid) -> DomainResult<()> {
        self.record(Call::Delete(envelope_id));
        Ok(())
    }

    async fn list_users(&self) -> DomainResult<Vec<EnvelopeUser>> {
        self.record(Call::ListUsers);
        Ok(Vec::new())
    }

    async fn list_envelopes(&self) -> DomainResult<Vec<Envelope>> {
        self.record(Call::ListEnvelopes);
        Ok(Vec::new())
    }

    async fn envelope_history(&self, envelope_id: Uuid) -> DomainResult<Vec<EnvelopeHistory>> {
        self.record(Call::History(envelope_id));
        Ok(Vec::new())
    }
}
