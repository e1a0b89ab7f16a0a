//! Shared handle on the transport and endpoint catalog.

use crate::catalog::{ApiCatalog, StaticCatalog};
use crate::compose::{Operation, RequestComposer};
use crate::credential::Credential;
use crate::error::Result;
use crate::requester::{Requester, RequesterConfig, ReqwestRequester};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Pairs a [`Requester`] with an [`ApiCatalog`].
///
/// Cloning is cheap, and all clones share the same transport.
#[derive(Clone)]
pub struct Client {
    requester: Arc<dyn Requester>,
    catalog: Arc<dyn ApiCatalog>,
}

impl Client {
    /// A client over `requester` using the bundled endpoint catalog.
    pub fn new(requester: impl Requester + 'static) -> Self {
        Self::with_catalog(requester, StaticCatalog::builtin())
    }

    pub fn with_catalog(
        requester: impl Requester + 'static,
        catalog: impl ApiCatalog + 'static,
    ) -> Self {
        Self {
            requester: Arc::new(requester),
            catalog: Arc::new(catalog),
        }
    }

    /// A client that talks to the real upstream through `reqwest`.
    pub fn reqwest(config: RequesterConfig) -> Result<Self> {
        Ok(Self::new(ReqwestRequester::new(config)?))
    }

    pub fn catalog(&self) -> &dyn ApiCatalog {
        &*self.catalog
    }

    /// Composes `operation` for `credential` and sends it.
    ///
    /// Nothing is sent if the credential lacks a claim the operation requires.
    pub async fn call(&self, operation: Operation, credential: &Credential) -> Result<Value> {
        let request = RequestComposer::new(&*self.catalog).compose(&operation, credential)?;
        if operation.sends_credential() {
            self.requester.send(request, credential).await
        } else {
            self.requester.send(request, &Credential::anonymous()).await
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
