//! Attaches a block storage volume to a droplet and waits for the action.
//!
//! This example shows how to:
//! - Create a client from a bearer token
//! - Submit an action and inspect the returned snapshot
//! - Poll the action until it completes or errors
//! - Branch on classified errors
//!
//! Run with: `DIGITALOCEAN_TOKEN=... cargo run --example attach_volume -- <volume-id> <droplet-id> <region>`

use ocean_client::{ActionRequest, ActionScope, ActionStatus, Client, Error, ErrorKind, PollStrategy};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("ocean_client=debug,attach_volume=info")
        .init();

    let token = std::env::var("DIGITALOCEAN_TOKEN")
        .map_err(|_| Error::ConfigurationError("DIGITALOCEAN_TOKEN is not set".to_string()))?;

    let mut args = std::env::args().skip(1);
    let (Some(volume_id), Some(droplet_id), Some(region)) = (args.next(), args.next(), args.next())
    else {
        eprintln!("usage: attach_volume <volume-id> <droplet-id> <region>");
        std::process::exit(2);
    };
    let droplet_id: u64 = droplet_id
        .parse()
        .map_err(|_| Error::InvalidRequest(format!("not a droplet id: {}", droplet_id)))?;

    let client = Client::new(token)?;
    let volume = ActionScope::Volume(volume_id);

    println!("=== Submitting attach ===");
    let request = ActionRequest::attach(droplet_id).with_region(region);
    let action = match client.actions().submit(&volume, &request).await {
        Ok(action) => action,
        Err(err) if err.kind() == ErrorKind::ClientError => {
            eprintln!("Rejected ({:?}): {:?}", err.status(), err.data());
            return Err(err);
        }
        Err(err) => return Err(err),
    };
    println!("Action {} accepted as {}", action.id, action.status);

    println!("=== Waiting for completion ===");
    let strategy = PollStrategy::Backoff {
        initial_interval: Duration::from_secs(1),
        max_interval: Duration::from_secs(10),
        max_attempts: 30,
    };
    let settled = client.actions().wait(&volume, action.id, &strategy).await?;

    match settled.status {
        ActionStatus::Completed => println!(
            "Attached after {:?}",
            settled
                .completed_at
                .zip(settled.started_at)
                .map(|(done, started)| done - started)
        ),
        ActionStatus::Errored => println!("Attach failed; see the control panel for details"),
        ActionStatus::InProgress => unreachable!("wait only returns terminal actions"),
    }

    Ok(())
}
