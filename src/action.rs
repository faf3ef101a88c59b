//! Asynchronous actions.
//!
//! Long-running mutations (attaching a volume, resizing, transferring an image)
//! are accepted by the API with an [`Action`] record instead of the mutated
//! resource. The action starts `in-progress` and moves once, to `completed` or
//! `errored`. Each fetch returns a fresh snapshot; nothing here mutates one.
//!
//! [`Actions`] covers the account-wide and per-resource action endpoints:
//! fetching one action, listing them, submitting new ones, and waiting for one
//! to settle.

use crate::client::Client;
use crate::pagination::{Meta, Page};
use crate::poll::{poll_until_terminal, PollStrategy, Terminal};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The lifecycle state of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    /// The action was accepted and has not finished yet.
    InProgress,
    /// The mutation took effect.
    Completed,
    /// The mutation did not take effect.
    Errored,
}

impl ActionStatus {
    /// Returns the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::InProgress => "in-progress",
            ActionStatus::Completed => "completed",
            ActionStatus::Errored => "errored",
        }
    }
}

impl Terminal for ActionStatus {
    fn is_terminal(&self) -> bool {
        !matches!(self, ActionStatus::InProgress)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The region an action ran in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Short identifier, e.g. `nyc1`.
    pub slug: Option<String>,
    /// Display name, e.g. `New York 1`.
    pub name: Option<String>,
}

/// A snapshot of an asynchronous operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Identifier used to poll for updates.
    pub id: u64,
    /// Current lifecycle state.
    pub status: ActionStatus,
    /// The kind of operation, e.g. `attach`, `resize` or `transfer`.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub resource_id: Option<u64>,
    pub resource_type: Option<String>,
    pub region: Option<Region>,
    pub region_slug: Option<String>,
}

impl Terminal for Action {
    fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// One page of actions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionList {
    pub actions: Vec<Action>,
    /// Pagination links, passed through untouched.
    #[serde(default)]
    pub links: Option<Value>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// The body of a request that starts an action.
///
/// Which fields are required depends on the action type; [`ActionRequest::validate`]
/// checks them locally so an incomplete request never reaches the network.
///
/// # Examples
///
/// ```
/// use ocean_client::ActionRequest;
///
/// let request = ActionRequest::attach(42).with_region("nyc1");
/// assert!(request.validate().is_ok());
///
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json, serde_json::json!({"type": "attach", "droplet_id": 42, "region": "nyc1"}));
///
/// // Attaching by name also needs the volume name.
/// assert!(request.validate_by_name().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub droplet_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_gigabytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ActionRequest {
    /// Creates a request of an arbitrary type, e.g. `"reboot"` or `"snapshot"`.
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    /// Attaches a volume to a droplet.
    pub fn attach(droplet_id: u64) -> Self {
        Self::of_type("attach").with_droplet_id(droplet_id)
    }

    /// Detaches a volume from a droplet.
    pub fn detach(droplet_id: u64) -> Self {
        Self::of_type("detach").with_droplet_id(droplet_id)
    }

    /// Resizes a volume.
    pub fn resize(size_gigabytes: u64) -> Self {
        Self {
            size_gigabytes: Some(size_gigabytes),
            ..Self::of_type("resize")
        }
    }

    pub fn with_droplet_id(mut self, droplet_id: u64) -> Self {
        self.droplet_id = Some(droplet_id);
        self
    }

    pub fn with_volume_name(mut self, volume_name: impl Into<String>) -> Self {
        self.volume_name = Some(volume_name.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Checks that the fields the action type needs are present.
    ///
    /// Every request needs a `type`; `attach` and `detach` need a `droplet_id`;
    /// `resize` needs `size_gigabytes`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        let kind = self.action_type()?;
        match kind {
            "attach" | "detach" => require(kind, "droplet_id", self.droplet_id.is_some()),
            "resize" => require(kind, "size_gigabytes", self.size_gigabytes.is_some()),
            _ => Ok(()),
        }
    }

    /// Like [`validate`](Self::validate), for requests that address the volume by
    /// name rather than by id.
    ///
    /// Only `attach` and `detach` can be addressed by name, and both additionally
    /// need `volume_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a missing field and
    /// [`Error::InvalidRequest`] for an action type that cannot target a name.
    pub fn validate_by_name(&self) -> Result<()> {
        self.validate()?;

        let kind = self.action_type()?;
        if kind != "attach" && kind != "detach" {
            return Err(Error::InvalidRequest(format!(
                "{} actions cannot address a volume by name",
                kind
            )));
        }

        let has_name = self
            .volume_name
            .as_deref()
            .is_some_and(|name| !name.is_empty());
        require(kind, "volume_name", has_name)
    }

    fn action_type(&self) -> Result<&str> {
        self.kind
            .as_deref()
            .filter(|kind| !kind.is_empty())
            .ok_or_else(|| Error::Validation {
                action: "unknown".to_string(),
                field: "type",
            })
    }
}

fn require(action: &str, field: &'static str, present: bool) -> Result<()> {
    if present {
        Ok(())
    } else {
        Err(Error::Validation {
            action: action.to_string(),
            field,
        })
    }
}

/// Where an action lives.
///
/// Actions can be fetched account-wide or through the resource they act on; each
/// scope maps to its own collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionScope {
    /// `/actions`
    Account,
    /// `/droplets/{id}/actions`
    Droplet(u64),
    /// `/volumes/{id}/actions`
    Volume(String),
    /// `/images/{id}/actions`
    Image(u64),
    /// `/floating_ips/{ip}/actions`
    FloatingIp(String),
}

impl ActionScope {
    /// Returns the collection path for this scope.
    pub fn collection_path(&self) -> String {
        match self {
            ActionScope::Account => "/actions".to_string(),
            ActionScope::Droplet(id) => format!("/droplets/{}/actions", id),
            ActionScope::Volume(id) => format!("/volumes/{}/actions", id),
            ActionScope::Image(id) => format!("/images/{}/actions", id),
            ActionScope::FloatingIp(ip) => format!("/floating_ips/{}/actions", ip),
        }
    }

    /// Returns the path of a single action in this scope.
    pub fn action_path(&self, action_id: u64) -> String {
        format!("{}/{}", self.collection_path(), action_id)
    }
}

const VOLUME_ACTIONS_BY_NAME: &str = "/volumes/actions";

/// Action endpoints, borrowed from a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use ocean_client::{ActionRequest, ActionScope, Client, PollStrategy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), ocean_client::Error> {
/// let client = Client::new("my-token")?;
/// let volume = ActionScope::Volume("7724db7c-e098-11e5-b522-000f53304e51".to_string());
///
/// let action = client
///     .actions()
///     .submit(&volume, &ActionRequest::attach(3164494).with_region("nyc1"))
///     .await?;
///
/// let settled = client
///     .actions()
///     .wait(&volume, action.id, &PollStrategy::Fixed {
///         interval: Duration::from_secs(3),
///         max_attempts: 40,
///     })
///     .await?;
/// println!("attach finished as {}", settled.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy)]
pub struct Actions<'a> {
    client: &'a Client,
}

impl<'a> Actions<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetches a fresh snapshot of one action.
    pub async fn get(self, scope: &ActionScope, action_id: u64) -> Result<Action> {
        self.client
            .get(scope.action_path(action_id))
            .await?
            .field("action")
    }

    /// Lists actions in a scope, one page at a time.
    pub async fn list(self, scope: &ActionScope, page: Page) -> Result<ActionList> {
        self.client
            .get(page.apply(&scope.collection_path()))
            .await?
            .json()
    }

    /// Starts an action on a resource.
    ///
    /// # Errors
    ///
    /// Fails locally, without a network call, if the request is incomplete or the
    /// scope is [`ActionScope::Account`].
    pub async fn submit(self, scope: &ActionScope, request: &ActionRequest) -> Result<Action> {
        if *scope == ActionScope::Account {
            return Err(Error::InvalidRequest(
                "actions must be submitted against a resource".to_string(),
            ));
        }
        request.validate()?;

        self.client
            .post(scope.collection_path(), request)
            .await?
            .field("action")
    }

    /// Attaches or detaches a volume identified by name.
    ///
    /// # Errors
    ///
    /// Fails locally, without a network call, if the request is incomplete.
    pub async fn submit_by_volume_name(self, request: &ActionRequest) -> Result<Action> {
        request.validate_by_name()?;

        self.client
            .post(VOLUME_ACTIONS_BY_NAME, request)
            .await?
            .field("action")
    }

    /// Polls an action until it is `completed` or `errored`.
    ///
    /// An `errored` action is returned as `Ok`; inspect [`Action::status`].
    pub async fn wait(
        self,
        scope: &ActionScope,
        action_id: u64,
        strategy: &PollStrategy,
    ) -> Result<Action> {
        poll_until_terminal(strategy, move || self.get(scope, action_id)).await
    }
}
