use std::{sync::Arc, time::Duration};

use client_core::{
    FormError, FormState, Settlement, SolveResult, SolveState, SolveWorkflow, StalePolicy,
    Typesetter,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};
use crate::ui::theme::{ThemePreference, THEME_STORAGE_KEY};

const FIELD_WIDTH: f32 = 56.0;

/// egui re-lays out text on the next frame; a repaint is the typeset pass.
struct RepaintTypesetter {
    ctx: egui::Context,
}

impl Typesetter for RepaintTypesetter {
    fn typeset(&self) {
        self.ctx.request_repaint();
    }
}

pub struct SolverApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    form: FormState,
    degree_draft: String,
    workflow: SolveWorkflow,

    status: String,
    theme: ThemePreference,
    applied_theme: Option<ThemePreference>,
}

impl SolverApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        egui_ctx: egui::Context,
        theme: ThemePreference,
        stale_policy: StalePolicy,
    ) -> Self {
        let form = FormState::new();
        Self {
            cmd_tx,
            ui_rx,
            degree_draft: form.degree_input().to_string(),
            form,
            workflow: SolveWorkflow::new(stale_policy)
                .with_typesetter(Arc::new(RepaintTypesetter { ctx: egui_ctx })),
            status: "Ready".to_string(),
            theme,
            applied_theme: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    self.status = err.status_line();
                }
                UiEvent::SolveSettled { ticket, result } => {
                    if let Settlement::DiscardedStale { latest } =
                        self.workflow.settle(ticket, result)
                    {
                        tracing::debug!(%ticket, %latest, "ignored answer for superseded solve");
                    }
                }
            }
        }
    }

    /// The degree control's change event.
    fn commit_degree(&mut self) {
        if self.degree_draft != self.form.degree_input() {
            self.form.set_degree_input(self.degree_draft.clone());
        }
        self.degree_draft = self.form.degree_input().to_string();
    }

    fn submit(&mut self) {
        self.commit_degree();
        let request = match self.form.submission() {
            Ok(request) => request,
            Err(FormError::MissingRequiredField { label, .. }) => {
                self.status = format!("Please fill in {label}");
                return;
            }
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };

        let ticket = self.workflow.begin();
        if let Err(err) =
            dispatch_backend_command(&self.cmd_tx, BackendCommand::Solve { ticket, request })
        {
            self.status = err.status_line();
            self.workflow.settle(ticket, SolveResult::TransportFailure);
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.theme) {
            return;
        }
        ctx.set_visuals(self.theme.visuals());
        self.applied_theme = Some(self.theme);
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Differential Equation Solver");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(self.theme.toggle_label()).clicked() {
                        self.theme = self.theme.toggled();
                    }
                });
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.small(&self.status);
        });
    }

    fn field_input(&mut self, ui: &mut egui::Ui, name: &str) {
        if let Some(value) = self.form.value_mut(name) {
            ui.add(
                egui::TextEdit::singleline(value)
                    .desired_width(FIELD_WIDTH)
                    .id_salt(name),
            );
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Degree:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.degree_draft)
                    .desired_width(FIELD_WIDTH)
                    .id_salt("degree"),
            );
            if response.lost_focus() {
                self.commit_degree();
            }
        });

        ui.add_space(8.0);
        ui.label("Equation:");
        let terms: Vec<(String, String)> = self
            .form
            .fields()
            .equation()
            .iter()
            .map(|field| (field.wire_name(), field.label.clone()))
            .collect();
        let last = terms.len().saturating_sub(1);
        ui.horizontal_wrapped(|ui| {
            for (index, (name, label)) in terms.iter().enumerate() {
                self.field_input(ui, name);
                ui.label(label);
                if index < last {
                    ui.label("+");
                }
            }
            ui.label("= 0");
        });

        ui.add_space(8.0);
        ui.label("Initial conditions:");
        let conditions: Vec<(String, String)> = self
            .form
            .fields()
            .initial_conditions()
            .iter()
            .map(|field| (field.wire_name(), field.label.clone()))
            .collect();
        for (name, label) in &conditions {
            ui.horizontal(|ui| {
                ui.label(format!("{label}:"));
                self.field_input(ui, name);
            });
        }

        ui.add_space(12.0);
        if ui.button("Solve").clicked() {
            self.submit();
        }
    }

    fn show_results(&self, ui: &mut egui::Ui) {
        let view = self.workflow.view();
        match self.workflow.state() {
            SolveState::Idle => {}
            SolveState::Solving { .. } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(&view.display);
                });
            }
            SolveState::Settled { result, .. } => {
                match result {
                    SolveResult::Success { .. } => {
                        ui.label(egui::RichText::new(&view.display).monospace());
                    }
                    SolveResult::ServiceFailure { .. } | SolveResult::TransportFailure => {
                        ui.colored_label(ui.visuals().error_fg_color, &view.display);
                    }
                }
                if !view.plain.is_empty() {
                    ui.label(egui::RichText::new(&view.plain).strong());
                }
            }
        }
    }
}

impl eframe::App for SolverApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_theme_if_needed(ctx);

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_form(ui);
            ui.separator();
            ui.label("Solution:");
            self.show_results(ui);
        });

        if self.workflow.is_solving() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(serialized) = self.theme.serialized() {
            storage.set_string(THEME_STORAGE_KEY, serialized);
        }
    }
}
