//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the diagnostics listener
//! - Launch one health machine per configured checker
//! - Start the diagnostics server on the bound listener
//!
//! # Design Decisions
//! - Fail fast: a listener that cannot be bound is fatal
//! - Listeners bind before any machine starts, so a bind failure never
//!   interrupts a running cycle or its action

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::GuardConfig;
use crate::lifecycle::{Shutdown, Supervisor};

/// Everything started by [`start`].
#[derive(Debug)]
pub struct Running {
    pub supervisor: Supervisor,
    pub admin: Option<JoinHandle<()>>,
    pub admin_address: Option<SocketAddr>,
}

impl Running {
    /// Wait for the machines, then the diagnostics server.
    pub async fn wait(self) {
        self.supervisor.wait().await;
        if let Some(admin) = self.admin {
            if let Err(e) = admin.await {
                tracing::error!(error = %e, "Diagnostics endpoint task failed");
            }
        }
    }
}

/// Bind listeners, then launch the machines and the diagnostics server.
pub async fn start(config: &GuardConfig, shutdown: &Shutdown) -> std::io::Result<Running> {
    let listener = if config.admin.enabled {
        let listener = TcpListener::bind(&config.admin.bind_address)
            .await
            .map_err(|e| {
                tracing::error!(
                    bind_address = %config.admin.bind_address,
                    error = %e,
                    "Failed to bind diagnostics endpoint"
                );
                e
            })?;
        Some(listener)
    } else {
        None
    };
    let admin_address = listener
        .as_ref()
        .map(TcpListener::local_addr)
        .transpose()?;

    let supervisor = Supervisor::launch(config.target_groups(), shutdown);

    let admin = listener.map(|listener| {
        let registry = supervisor.statuses();
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            if let Err(e) = crate::admin::serve(listener, registry, rx).await {
                tracing::error!(error = %e, "Diagnostics endpoint failed");
            }
        })
    });

    Ok(Running {
        supervisor,
        admin,
        admin_address,
    })
}
