//! Write-time checks for identifiers owned by another table or service.
//!
//! A [`ForeignKey`] pairs a field name with a [`ReferenceLookup`] strategy:
//! [`RemoteLookup`] asks the owning service over HTTP, [`LocalLookup`] reads
//! the local store. Both answer with a three-way [`Lookup`] so that "the
//! owner says no" and "the owner could not be asked" stay distinct all the
//! way to the response status.
//!
//! Nothing here is cached or retried: every write that carries a reference
//! pays for one fresh lookup.

use log::{debug, info, warn};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::model::Id;
use crate::store::traits::{EntityStore, SharedStore};

/// Outcome of a single existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The owner reported the identifier as existing
    Confirmed,
    /// The owner answered, and the answer was not a success
    Rejected,
    /// The owner could not be asked; carries the transport failure
    Unreachable(String),
}

#[async_trait::async_trait]
pub trait ReferenceLookup: Send + Sync {
    async fn lookup(&self, id: Id) -> Lookup;
}

/// HTTP client for the management service, built once at startup.
///
/// The base URL is fixed at construction; there is no per-request override.
#[derive(Debug, Clone)]
pub struct RemoteService {
    client: Client,
    base_url: String,
}

impl RemoteService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lookup against `{base_url}/{resource}/{id}`
    pub fn resource(&self, resource: &str) -> RemoteLookup {
        RemoteLookup {
            client: self.client.clone(),
            collection_url: format!("{}/{}", self.base_url, resource.trim_matches('/')),
        }
    }

    /// Lookup against `{base_url}/{id}`, for a base URL that already names
    /// the collection
    pub fn collection(&self) -> RemoteLookup {
        RemoteLookup {
            client: self.client.clone(),
            collection_url: self.base_url.clone(),
        }
    }
}

/// One GET per check; any success status confirms the reference
#[derive(Debug, Clone)]
pub struct RemoteLookup {
    client: Client,
    collection_url: String,
}

impl RemoteLookup {
    pub fn url_for(&self, id: Id) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

#[async_trait::async_trait]
impl ReferenceLookup for RemoteLookup {
    async fn lookup(&self, id: Id) -> Lookup {
        let url = self.url_for(id);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("GET {} -> {}", url, response.status());
                Lookup::Confirmed
            }
            Ok(response) => {
                debug!("GET {} -> {}", url, response.status());
                Lookup::Rejected
            }
            Err(e) => {
                warn!("GET {} failed: {}", url, e);
                Lookup::Unreachable(e.to_string())
            }
        }
    }
}

/// Existence check against a table owned by this same service
pub struct LocalLookup<T> {
    store: SharedStore<T>,
}

impl<T> LocalLookup<T> {
    pub fn new(store: SharedStore<T>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl<T: Send + Sync + 'static> ReferenceLookup for LocalLookup<T> {
    async fn lookup(&self, id: Id) -> Lookup {
        match self.store.get(id).await {
            Ok(Some(_)) => Lookup::Confirmed,
            Ok(None) => Lookup::Rejected,
            Err(e) => Lookup::Unreachable(format!("{e:#}")),
        }
    }
}

/// A failed reference check, ready to be reported to the client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("{message}")]
    Rejected {
        field: &'static str,
        id: Id,
        message: String,
    },
    #[error("{message}")]
    Unreachable {
        dependency: &'static str,
        reason: String,
        message: String,
    },
}

/// A field whose value must name an existing record somewhere else
#[derive(Clone)]
pub struct ForeignKey {
    field: &'static str,
    dependency: &'static str,
    lookup: Arc<dyn ReferenceLookup>,
    rejected: fn(Id) -> String,
    unreachable: &'static str,
}

impl ForeignKey {
    /// `rejected` renders the message for an identifier the owner does not
    /// know; `unreachable` is reported when the owner cannot be asked.
    pub fn new(
        field: &'static str,
        dependency: &'static str,
        lookup: Arc<dyn ReferenceLookup>,
        rejected: fn(Id) -> String,
        unreachable: &'static str,
    ) -> Self {
        Self {
            field,
            dependency,
            lookup,
            rejected,
            unreachable,
        }
    }

    pub async fn check(&self, id: Id) -> Result<(), ReferenceError> {
        match self.lookup.lookup(id).await {
            Lookup::Confirmed => Ok(()),
            Lookup::Rejected => {
                info!("Rejected {}={}: not found in {}", self.field, id, self.dependency);
                Err(ReferenceError::Rejected {
                    field: self.field,
                    id,
                    message: (self.rejected)(id),
                })
            }
            Lookup::Unreachable(reason) => Err(ReferenceError::Unreachable {
                dependency: self.dependency,
                reason,
                message: self.unreachable.to_string(),
            }),
        }
    }
}

/// Run the checks one after another, in the given order, stopping at the
/// first one that does not confirm.
pub async fn check_references(checks: &[(&ForeignKey, Id)]) -> Result<(), ReferenceError> {
    for (key, id) in checks {
        key.check(*id).await?;
    }
    Ok(())
}
