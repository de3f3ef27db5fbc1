//! In-process network: several nodes sharing one store, one identity
//! directory and one funds service, each pair joined by channel sessions.
//!
//! Must be started inside a tokio runtime; every node's responder runs as
//! a spawned task until the network is dropped.

use std::sync::Arc;

use pactum_core::PartyName;
use pactum_crypto::{Ed25519KeyPair, LocalSigner, SignatureService};
use pactum_ledger::{IdentityDirectory, InMemoryFunds, InMemoryLedger};
use pactum_state::Party;
use tokio::task::JoinHandle;

use crate::config::FlowConfig;
use crate::error::FlowError;
use crate::node::{Node, NodeServices};
use crate::transport::{serve, ChannelSession};

const SESSION_CAPACITY: usize = 64;

/// One node to start.
#[derive(Debug)]
pub struct NodeSpec {
    pub name: PartyName,
    pub key: Ed25519KeyPair,
    pub opening_balance: u64,
}

pub struct LocalNetwork {
    store: Arc<InMemoryLedger>,
    identities: Arc<IdentityDirectory>,
    funds: Arc<InMemoryFunds>,
    nodes: Vec<Arc<Node>>,
    servers: Vec<JoinHandle<()>>,
}

impl LocalNetwork {
    pub fn start(specs: Vec<NodeSpec>, config: FlowConfig) -> Result<Self, FlowError> {
        let store = Arc::new(InMemoryLedger::new());
        let identities = Arc::new(IdentityDirectory::new());
        let funds = Arc::new(InMemoryFunds::new());
        let services = NodeServices {
            store: store.clone(),
            identities: identities.clone(),
            funds: funds.clone(),
        };

        let mut nodes = Vec::with_capacity(specs.len());
        for spec in specs {
            let signer: Arc<dyn SignatureService> = Arc::new(LocalSigner::new(spec.key));
            let party = Party::new(spec.name, signer.public_key());
            identities.register(party.clone())?;
            funds.set_balance(&party.name, spec.opening_balance);
            nodes.push(Arc::new(Node::new(party, signer, services.clone(), config)?));
        }

        let mut servers = Vec::new();
        for server in &nodes {
            let responder = Arc::new(server.responder());
            for client in nodes.iter().filter(|n| n.identity() != server.identity()) {
                let (session, requests) =
                    ChannelSession::new(server.identity().clone(), SESSION_CAPACITY);
                client.connect(Arc::new(session));
                servers.push(serve(requests, Arc::clone(&responder)));
            }
        }

        tracing::info!(nodes = nodes.len(), "local network started");
        Ok(Self {
            store,
            identities,
            funds,
            nodes,
            servers,
        })
    }

    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// The node whose organisation matches, case-insensitively.
    pub fn node(&self, organisation: &str) -> Option<Arc<Node>> {
        self.nodes
            .iter()
            .find(|n| n.identity().name.matches_organisation(organisation))
            .cloned()
    }

    pub fn store(&self) -> &Arc<InMemoryLedger> {
        &self.store
    }

    pub fn identities(&self) -> &Arc<IdentityDirectory> {
        &self.identities
    }

    pub fn funds(&self) -> &Arc<InMemoryFunds> {
        &self.funds
    }
}

impl Drop for LocalNetwork {
    fn drop(&mut self) {
        for server in &self.servers {
            server.abort();
        }
    }
}
