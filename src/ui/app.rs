use eframe::egui::{self, Context};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::task::Task;
use crate::physics::interaction::GestureEvent;
use crate::repository::Repository;
use crate::services::TaskService;
use crate::ui::theme;
use crate::ui::views::bubble_view::BubbleView;

pub struct BurbujaApp {
    pub(crate) task_service: Arc<TaskService>,

    // UI state
    pub(crate) bubble_view: BubbleView,
    pub(crate) open_task_id: Option<Uuid>,

    // Cache of the simulated task list; mutated optimistically, persisted
    // in the background.
    pub(crate) tasks: Vec<Task>,
    pub(crate) tasks_dirty: bool,

    // Runtime for fire-and-forget persistence
    pub(crate) runtime: tokio::runtime::Runtime,
}

impl BurbujaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, repository: Repository) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let repository = Arc::new(repository);
        let task_service = Arc::new(TaskService::new(repository));
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to create tokio runtime");

        let tasks = runtime.block_on(async {
            if let Err(e) = task_service.ensure_seeds().await {
                error!("failed to seed demo tasks: {e:#}");
            }
            match task_service.list_simulated().await {
                Ok(tasks) => tasks,
                Err(e) => {
                    error!("failed to load tasks: {e:#}");
                    Vec::new()
                }
            }
        });

        let mut bubble_view = BubbleView::new();
        bubble_view.synchronize(&tasks);

        Self {
            task_service,
            bubble_view,
            open_task_id: None,
            tasks,
            tasks_dirty: false,
            runtime,
        }
    }

    fn apply_event(&mut self, event: GestureEvent) {
        match event {
            GestureEvent::DragStarted(id) => {
                debug!(task = %id, "drag started");
            }

            GestureEvent::TaskOpened(id) => {
                self.open_task_id = Some(id);
            }

            GestureEvent::TaskMoved { id, position } => {
                // Optimistic local update; persistence catches up on its own.
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    task.set_position(position.x, position.y);
                }
                let service = self.task_service.clone();
                self.runtime.spawn(async move {
                    if let Err(e) = service.move_task(id, position.x, position.y).await {
                        error!(task = %id, "failed to persist position: {e:#}");
                    }
                });
            }

            GestureEvent::StatusDropped { id, status } => {
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                    task.update_status(status);
                }
                // Archived tasks leave the simulation; resync drops the body.
                self.tasks.retain(|t| t.in_simulation());
                self.tasks_dirty = true;

                let service = self.task_service.clone();
                self.runtime.spawn(async move {
                    if let Err(e) = service.change_status(id, status).await {
                        error!(task = %id, "failed to persist status: {e:#}");
                    }
                });
            }
        }
    }

    fn show_task_window(&mut self, ctx: &Context) {
        let Some(id) = self.open_task_id else {
            return;
        };
        let Some(task) = self.tasks.iter().find(|t| t.id == id).cloned() else {
            self.open_task_id = None;
            return;
        };

        let mut open = true;
        egui::Window::new(&task.title)
            .id(egui::Id::new(task.id))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                if !task.description.is_empty() {
                    ui.label(&task.description);
                    ui.separator();
                }
                ui.horizontal(|ui| {
                    ui.label("Status:");
                    ui.colored_label(theme::status_color(task.status), task.status.label());
                });
                ui.horizontal(|ui| {
                    ui.label("Priority:");
                    ui.label(task.priority.label());
                });
                if let Some(category) = &task.category {
                    ui.horizontal(|ui| {
                        ui.label("Category:");
                        ui.colored_label(theme::category_color(Some(category)), category);
                    });
                }
                if let Some(due) = task.due_at {
                    ui.horizontal(|ui| {
                        ui.label("Due:");
                        ui.label(due.format("%Y-%m-%d %H:%M").to_string());
                    });
                }
            });

        if !open {
            self.open_task_id = None;
        }
    }
}

impl eframe::App for BurbujaApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(theme::BACKGROUND))
            .show(ctx, |ui| {
                if self.tasks_dirty {
                    self.bubble_view.synchronize(&self.tasks);
                    self.tasks_dirty = false;
                }

                let events = self.bubble_view.show(ui);
                for event in events {
                    self.apply_event(event);
                }
            });

        self.show_task_window(ctx);
    }
}
