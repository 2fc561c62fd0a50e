//! Backend worker: owns the async runtime and the solve endpoint client.
//!
//! Every `Solve` command becomes its own task, so overlapping submissions run
//! side by side and each reports back exactly once.

use std::{sync::Arc, thread};

use client_core::{
    ClientSettings, HttpSolveClient, MissingSolveService, SettingsError, SolveResult, SolveService,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    settings: Result<ClientSettings, SettingsError>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let service = resolve_service(settings, &ui_tx);

        while let Ok(cmd) = cmd_rx.recv() {
            tracing::debug!(command = cmd.name(), "backend received command");
            match cmd {
                BackendCommand::Solve { ticket, request } => {
                    let service = Arc::clone(&service);
                    let ui_tx = ui_tx.clone();
                    runtime.spawn(async move {
                        let result = SolveResult::from_exchange(service.solve(&request).await);
                        if ui_tx
                            .send(UiEvent::SolveSettled { ticket, result })
                            .is_err()
                        {
                            tracing::warn!(%ticket, "ui closed before solve result arrived");
                        }
                    });
                }
            }
        }
        tracing::debug!("ui command queue closed; backend worker exiting");
    });
}

fn resolve_service(
    settings: Result<ClientSettings, SettingsError>,
    ui_tx: &Sender<UiEvent>,
) -> Arc<dyn SolveService> {
    let client = settings.and_then(|settings| HttpSolveClient::from_settings(&settings));
    match client {
        Ok(client) => {
            let _ = ui_tx.try_send(UiEvent::Info(format!("Solver: {}", client.endpoint())));
            Arc::new(client)
        }
        Err(err) => {
            tracing::error!("solver settings unusable: {err}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                UiErrorContext::BackendStartup,
                err.to_string(),
            )));
            Arc::new(MissingSolveService)
        }
    }
}
