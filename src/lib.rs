//! # ocean-client - a typed DigitalOcean API client
//!
//! ocean-client maps the DigitalOcean REST API onto a small JSON transport built on
//! top of `reqwest`, plus a polling contract for the asynchronous actions that
//! long-running mutations return.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ocean_client::{ActionRequest, ActionScope, ActionStatus, Client, PollStrategy};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ocean_client::Error> {
//!     let client = Client::new("my-token")?;
//!
//!     // Plain resource calls return the decoded envelope
//!     let account = client.get("/account").await?;
//!     let email: String = account.field::<serde_json::Value>("account")?["email"]
//!         .as_str()
//!         .unwrap_or_default()
//!         .to_string();
//!     println!("Signed in as {}", email);
//!
//!     // Long-running mutations return an action to poll
//!     let volume = ActionScope::Volume("7724db7c-e098-11e5-b522-000f53304e51".to_string());
//!     let action = client
//!         .actions()
//!         .submit(&volume, &ActionRequest::attach(3164494).with_region("nyc1"))
//!         .await?;
//!
//!     let settled = client
//!         .actions()
//!         .wait(&volume, action.id, &PollStrategy::Fixed {
//!             interval: Duration::from_secs(2),
//!             max_attempts: 60,
//!         })
//!         .await?;
//!
//!     if settled.status == ActionStatus::Errored {
//!         eprintln!("attach {} failed", settled.id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **One transport** - `head`, `get`, `put`, `post`, `patch` and `delete` share a single request path
//! - **Raw and decoded bodies** - every response keeps its raw text next to the decoded JSON
//! - **Coarse error classification** - statuses in `(400, 500]` are client errors, above 500 server errors
//! - **Local validation** - incomplete action requests fail before touching the network
//! - **Action polling** - one reusable loop that waits for `completed` or `errored`
//! - **Structured logging** - `tracing` events for requests, responses and poll attempts
//!
//! ## Error Handling
//!
//! Classified errors carry the full response for diagnosis:
//!
//! ```no_run
//! use ocean_client::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new("my-token")?;
//! match client.get("/droplets/999").await {
//!     Ok(response) => println!("Droplet: {:?}", response.data),
//!     Err(Error::ClientError(response)) => {
//!         eprintln!("Rejected ({}): {:?}", response.status, response.data);
//!     }
//!     Err(Error::ServerError(response)) => {
//!         eprintln!("Service failure ({}): {:?}", response.status, response.text);
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

mod action;
mod client;
mod config;
mod error;
pub mod pagination;
pub mod poll;
mod request;
mod response;

pub use action::{Action, ActionList, ActionRequest, ActionScope, ActionStatus, Actions, Region};
pub use client::{Client, ClientBuilder};
pub use config::{Config, ACCEPT_HEADER, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use error::{Error, ErrorKind, Result};
pub use pagination::{Meta, Page};
pub use poll::{poll_until_terminal, PollStrategy, Terminal};
pub use request::Request;
pub use response::{Response, StatusClass};
