//! # In-Process Channel Transport
//!
//! [`ChannelSession`] carries JSON-encoded [`SessionMessage`]s over a
//! bounded `mpsc` channel. Every request travels with its own `oneshot`
//! reply channel, so answers can never be matched to the wrong request.
//!
//! [`serve`] spawns the receiving side: a task that decodes each request,
//! hands it to a [`Responder`] and sends back the encoded reply.
//!
//! The session does not time out by itself. The initiator wraps each
//! round-trip in `tokio::time::timeout`.

use std::sync::Arc;

use async_trait::async_trait;
use pactum_state::{Party, StateAndRef};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::responder::Responder;
use crate::session::{
    CounterpartySession, FinalityNotice, Proposal, ProposalResponse, ReferenceResponse,
    SessionMessage, SessionReply,
};

/// One encoded request and the channel its answer goes back on.
#[derive(Debug)]
pub struct Envelope {
    pub payload: Vec<u8>,
    pub reply: oneshot::Sender<Vec<u8>>,
}

/// Sending half of a session with one counterparty.
#[derive(Debug, Clone)]
pub struct ChannelSession {
    counterparty: Party,
    requests: mpsc::Sender<Envelope>,
}

impl ChannelSession {
    /// A session to `counterparty` plus the receiver its node must serve.
    pub fn new(counterparty: Party, capacity: usize) -> (Self, mpsc::Receiver<Envelope>) {
        let (requests, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                counterparty,
                requests,
            },
            rx,
        )
    }

    async fn round_trip(&self, message: &SessionMessage) -> Result<SessionReply, SessionError> {
        let payload = serde_json::to_vec(message)?;
        let (reply, answer) = oneshot::channel();
        self.requests
            .send(Envelope { payload, reply })
            .await
            .map_err(|_| SessionError::Closed(self.counterparty.name.clone()))?;
        let bytes = answer
            .await
            .map_err(|_| SessionError::Closed(self.counterparty.name.clone()))?;
        match serde_json::from_slice::<SessionReply>(&bytes)? {
            SessionReply::Malformed { error } => Err(SessionError::Codec(error)),
            reply => Ok(reply),
        }
    }
}

#[async_trait]
impl CounterpartySession for ChannelSession {
    fn counterparty(&self) -> &Party {
        &self.counterparty
    }

    async fn sync_references(
        &self,
        references: Vec<StateAndRef>,
    ) -> Result<ReferenceResponse, SessionError> {
        match self
            .round_trip(&SessionMessage::SyncReferences { references })
            .await?
        {
            SessionReply::References(response) => Ok(response),
            other => Err(unexpected("references", &other)),
        }
    }

    async fn propose(&self, proposal: Proposal) -> Result<ProposalResponse, SessionError> {
        match self.round_trip(&SessionMessage::Propose(proposal)).await? {
            SessionReply::Proposal(response) => Ok(response),
            other => Err(unexpected("proposal", &other)),
        }
    }

    async fn notify_committed(&self, notice: FinalityNotice) -> Result<(), SessionError> {
        match self.round_trip(&SessionMessage::Committed(notice)).await? {
            SessionReply::Acknowledged => Ok(()),
            other => Err(unexpected("acknowledged", &other)),
        }
    }
}

fn unexpected(wanted: &str, got: &SessionReply) -> SessionError {
    SessionError::UnexpectedReply(format!("expected {wanted}, got {got:?}"))
}

/// Answer requests arriving on `requests` until every sender is dropped.
pub fn serve(mut requests: mpsc::Receiver<Envelope>, responder: Arc<Responder>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(Envelope { payload, reply }) = requests.recv().await {
            let answer = match serde_json::from_slice::<SessionMessage>(&payload) {
                Ok(message) => responder.handle(message),
                Err(e) => {
                    tracing::warn!(error = %e, "undecodable session request");
                    SessionReply::Malformed {
                        error: e.to_string(),
                    }
                }
            };
            let bytes = match serde_json::to_vec(&answer) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode session reply");
                    continue;
                }
            };
            if reply.send(bytes).is_err() {
                tracing::debug!(node = %responder.identity().name, "requester gone before reply");
            }
        }
        tracing::debug!(node = %responder.identity().name, "session closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{party, signer};
    use pactum_ledger::{IdentityDirectory, InMemoryLedger};

    fn served_bob() -> (ChannelSession, JoinHandle<()>) {
        let identities = Arc::new(IdentityDirectory::new());
        identities.register(party("Bob Ltd", 2)).unwrap();
        let responder = Responder::new(
            party("Bob Ltd", 2),
            signer(2),
            Arc::new(InMemoryLedger::new()),
            identities,
        );
        let (session, requests) = ChannelSession::new(party("Bob Ltd", 2), 4);
        (session, serve(requests, Arc::new(responder)))
    }

    #[tokio::test]
    async fn test_round_trip_through_server() {
        let (session, _server) = served_bob();
        assert_eq!(
            session.sync_references(vec![]).await.unwrap(),
            ReferenceResponse::Confirmed
        );
    }

    #[tokio::test]
    async fn test_garbage_request_gets_malformed_reply() {
        let (session, _server) = served_bob();
        let (reply, answer) = oneshot::channel();
        session
            .requests
            .send(Envelope {
                payload: b"{not json".to_vec(),
                reply,
            })
            .await
            .unwrap();
        let reply: SessionReply = serde_json::from_slice(&answer.await.unwrap()).unwrap();
        assert!(matches!(reply, SessionReply::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_dropped_peer_reports_closed() {
        let (session, requests) = ChannelSession::new(party("Bob Ltd", 2), 1);
        drop(requests);
        assert_eq!(
            session.sync_references(vec![]).await,
            Err(SessionError::Closed(party("Bob Ltd", 2).name))
        );
    }

    #[tokio::test]
    async fn test_unserved_peer_never_answers() {
        let (session, _requests) = ChannelSession::new(party("Bob Ltd", 2), 1);
        let waited = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            session.sync_references(vec![]),
        )
        .await;
        assert!(waited.is_err());
    }
}
