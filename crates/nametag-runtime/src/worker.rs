use crate::{NametagCommand, NametagUpdate, load_roster_csv, load_template};
use nametag_engine::{
    BatchListener, CancelToken, FontBook, GenerationRequest, NametagError, ProjectSettings,
    calculate_statistics, generate_pdf,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Async worker task that processes commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<NametagCommand>,
    update_tx: mpsc::UnboundedSender<NametagUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: NametagCommand,
    command_rx: &mut mpsc::UnboundedReceiver<NametagCommand>,
    update_tx: &mpsc::UnboundedSender<NametagUpdate>,
) {
    match cmd {
        NametagCommand::LoadRoster { path } => match load_roster_csv(&path).await {
            Ok(roster) => {
                let _ = update_tx.send(NametagUpdate::RosterLoaded { roster });
            }
            Err(e) => send_error(update_tx, format!("Failed to load roster: {e}")),
        },
        NametagCommand::LoadTemplate { path, id } => match load_template(&path, id).await {
            Ok(template) => {
                let _ = update_tx.send(NametagUpdate::TemplateLoaded { template });
            }
            Err(e) => send_error(
                update_tx,
                format!("Failed to load template {}: {e}", path.display()),
            ),
        },
        NametagCommand::LoadSettings { path } => match ProjectSettings::load(&path).await {
            Ok(settings) => {
                let _ = update_tx.send(NametagUpdate::SettingsLoaded { settings });
            }
            Err(e) => send_error(update_tx, format!("Failed to load project: {e}")),
        },
        NametagCommand::SaveSettings { settings, path } => match settings.save(&path).await {
            Ok(()) => {
                let _ = update_tx.send(NametagUpdate::SettingsSaved { path });
            }
            Err(e) => send_error(update_tx, format!("Failed to save project: {e}")),
        },
        NametagCommand::CalculateStats { mut request } => {
            // Editors fire these on every change; only the newest matters
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let NametagCommand::CalculateStats {
                    request: new_request,
                } = next_cmd
                {
                    log::debug!("Discarding queued statistics request, using newer request");
                    request = new_request;
                } else {
                    Box::pin(process_command(next_cmd, command_rx, update_tx)).await;
                }
            }

            match calculate_statistics(&request) {
                Ok(stats) => {
                    let _ = update_tx.send(NametagUpdate::StatsCalculated { stats });
                }
                Err(e) => send_error(update_tx, e.to_string()),
            }
        }
        NametagCommand::Generate {
            request,
            fonts,
            output_path,
            cancel,
        } => {
            handle_generate(request, fonts, output_path, cancel, update_tx).await;
        }
    }
}

/// Forwards per-badge progress to the UI
struct ProgressForwarder {
    update_tx: mpsc::UnboundedSender<NametagUpdate>,
}

impl BatchListener for ProgressForwarder {
    fn on_progress(&mut self, current: usize, total: usize) {
        let _ = self
            .update_tx
            .send(NametagUpdate::Progress { current, total });
    }
}

async fn handle_generate(
    request: GenerationRequest,
    fonts: FontBook,
    output_path: PathBuf,
    cancel: CancelToken,
    update_tx: &mpsc::UnboundedSender<NametagUpdate>,
) {
    let listener = ProgressForwarder {
        update_tx: update_tx.clone(),
    };

    match generate_pdf(request, fonts, listener, cancel, &output_path).await {
        Ok(report) => {
            let _ = update_tx.send(NametagUpdate::GenerationComplete {
                path: output_path,
                page_count: report.page_count,
                entry_count: report.entry_count,
                blank_count: report.blank_count,
                degraded_entries: report.degraded_entries,
            });
        }
        Err(NametagError::Cancelled { completed }) => {
            let _ = update_tx.send(NametagUpdate::GenerationCancelled { completed });
        }
        Err(e) if e.is_startup_error() => {
            send_error(update_tx, format!("Could not start generation: {e}"));
        }
        Err(e) => send_error(update_tx, format!("Could not finish generation: {e}")),
    }
}

fn send_error(update_tx: &mpsc::UnboundedSender<NametagUpdate>, message: String) {
    log::error!("{}", message);
    let _ = update_tx.send(NametagUpdate::Error { message });
}
