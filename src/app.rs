//! Main application UI and state management.
//! Handles the dashboard, study-area screens, review actions and dialogs.

use crate::database::db;
use crate::export::json::{export_json_to_path, import_json};
use crate::models::scheduler::{complete_review, due_topics, interval_days, is_review_due};
use crate::models::{quiz, stats};
use crate::models::{ActivityLog, AreaSet, Resource, ResourceType, StudyArea, StudyStatus, Topic};
use chrono::{DateTime, Local, Utc};
use eframe::egui;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// Application screen states
#[derive(Default)]
enum AppScreen {
    #[default]
    Dashboard,
    Area,
}

/// Main application state
#[derive(Default)]
pub struct StudyApp {
    show_confirmation_dialog: bool,
    allowed_to_close: bool,

    area_set: AreaSet,
    activity: ActivityLog,
    selected_area_index: Option<usize>,
    selected_topic_index: Option<usize>,
    conn: Option<Arc<Mutex<Connection>>>,

    current_screen: AppScreen,

    new_area_name: String,
    new_topic_title: String,
    new_topic_description: String,
    new_resource_title: String,
    new_resource_url: String,

    /// Wall-clock instant the topic timer was started, if running.
    timer_started_at: Option<Instant>,

    show_quiz_dialog: bool,
    quiz_score: u32,
    quiz_total: u32,

    /// Non-fatal notices (e.g. a failed save). Never blocks the UI.
    status_notice: String,

    show_export_dialog: bool,
    show_import_result_dialog: bool,
    import_result_message: String,
}

/// Formats an optional timestamp as a local YYYY-MM-DD string.
fn format_date(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => "—".to_string(),
    }
}

impl eframe::App for StudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.current_screen {
            AppScreen::Dashboard => self.render_dashboard(ctx),
            AppScreen::Area => self.render_area_screen(ctx),
        }

        // Handle window close requests with confirmation dialog
        if ctx.input(|i| i.viewport().close_requested()) {
            if self.allowed_to_close {
                // Allow close
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
                self.show_confirmation_dialog = true;
            }
        }

        if self.show_confirmation_dialog {
            egui::Window::new("Do you want to quit?")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("No").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = false;
                        }

                        if ui.button("Yes").clicked() {
                            self.show_confirmation_dialog = false;
                            self.allowed_to_close = true;
                            self.flush_timer();
                            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
        }

        // Exporting an area
        if self.show_export_dialog {
            let mut export_area_index: Option<usize> = None;
            let mut should_cancel = false;

            egui::Window::new("Export Area")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Select an area to export:");
                    ui.separator();

                    for (i, area) in self.area_set.areas.iter().enumerate() {
                        if ui
                            .button(format!(
                                "{} {} ({} topics)",
                                area.icon,
                                area.name,
                                area.topics.len()
                            ))
                            .clicked()
                        {
                            export_area_index = Some(i);
                        }
                    }

                    ui.separator();

                    if ui.button("Cancel").clicked() {
                        should_cancel = true;
                    }
                });

            if let Some(i) = export_area_index {
                self.handle_export(i);
            }
            if should_cancel {
                self.show_export_dialog = false;
            }
        }

        if self.show_import_result_dialog {
            egui::Window::new("Import/Export Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.import_result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_import_result_dialog = false;
                    }
                });
        }

        // Quiz result entry: score maps through the 70% rule to a review outcome
        if self.show_quiz_dialog {
            let mut action_apply = false;
            let mut action_cancel = false;

            egui::Window::new("Record Quiz Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Enter the quiz score for the selected topic:");
                    ui.horizontal(|ui| {
                        ui.label("Correct:");
                        ui.add(egui::DragValue::new(&mut self.quiz_score).range(0..=200));
                        ui.label("out of:");
                        ui.add(egui::DragValue::new(&mut self.quiz_total).range(1..=200));
                    });
                    if self.quiz_score > self.quiz_total {
                        self.quiz_score = self.quiz_total;
                    }

                    let passes = quiz::quiz_passed(self.quiz_score as u64, self.quiz_total as u64);
                    ui.label(if passes {
                        "Counts as a successful review."
                    } else {
                        "Below the pass mark; counts as a failed review."
                    });

                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Apply").clicked() {
                            action_apply = true;
                        }
                        if ui.button("Cancel").clicked() {
                            action_cancel = true;
                        }
                    });
                });

            if action_apply {
                let success = quiz::quiz_passed(self.quiz_score as u64, self.quiz_total as u64);
                self.apply_review(success);
                self.show_quiz_dialog = false;
            }
            if action_cancel {
                self.show_quiz_dialog = false;
            }
        }
    }
}

impl StudyApp {
    /// Creates a new application instance with state loaded from the database.
    pub fn new_with_areas(area_set: AreaSet, activity: ActivityLog, conn: Connection) -> Self {
        let has_areas = !area_set.areas.is_empty();
        Self {
            area_set,
            activity,
            selected_area_index: if has_areas { Some(0) } else { None },
            conn: Some(Arc::new(Mutex::new(conn))),
            quiz_total: 5,
            ..Default::default()
        }
    }

    /// Renders the dashboard: aggregates, due reviews, and the area list.
    fn render_dashboard(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let now = Utc::now();
            let today = Local::now().date_naive();

            ui.heading("Study Dashboard");
            ui.separator();

            let total_topics = self.area_set.all_topics().count();
            let total_time = stats::total_time_spent(self.area_set.all_topics());
            let avg_level = stats::average_review_level(self.area_set.all_topics());
            let streak = self.activity.streak(today);

            ui.horizontal(|ui| {
                ui.label(format!("Areas: {}", self.area_set.areas.len()));
                ui.separator();
                ui.label(format!("Topics: {}", total_topics));
                ui.separator();
                ui.label(format!("Avg level: {:.1}", avg_level));
                ui.separator();
                ui.label(format!("Time: {}", stats::format_duration(total_time)));
                ui.separator();
                ui.label(format!("Rank: {}", stats::rank_for_seconds(total_time)));
                ui.separator();
                ui.label(format!("Streak: {} days", streak));
            });

            if !self.status_notice.is_empty() {
                ui.colored_label(egui::Color32::YELLOW, &self.status_notice);
            }

            ui.separator();

            // Urgent review list across every area
            let due: Vec<(String, String)> = self
                .area_set
                .areas
                .iter()
                .flat_map(|area| {
                    due_topics(&area.topics, now)
                        .into_iter()
                        .map(|t| (area.name.clone(), t.title.clone()))
                })
                .collect();

            ui.heading(format!("Due for review ({})", due.len()));
            if due.is_empty() {
                ui.label("Nothing due. Keep going!");
            } else {
                egui::ScrollArea::vertical()
                    .id_source("due_list")
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for (area_name, title) in &due {
                            ui.label(format!("⚠ {} — {}", area_name, title));
                        }
                    });
            }

            ui.separator();

            // Import/Export buttons
            ui.horizontal(|ui| {
                if ui.button("Export Area").clicked() {
                    self.show_export_dialog = true;
                }
                if ui.button("Import Area").clicked() {
                    self.handle_import();
                }
            });

            ui.separator();

            ui.heading("Create New Area");
            ui.horizontal(|ui| {
                ui.label("Area name:");
                ui.text_edit_singleline(&mut self.new_area_name);
                if ui.button("Create Area").clicked() && !self.new_area_name.is_empty() {
                    let area = StudyArea::new(self.new_area_name.clone(), self.area_set.areas.len());
                    self.area_set.areas.push(area);
                    let index = self.area_set.areas.len() - 1;
                    self.persist_area(index);
                    self.new_area_name.clear();
                }
            });

            ui.separator();

            ui.heading(format!("Areas ({})", self.area_set.areas.len()));

            // We store actions to execute after UI rendering to avoid borrowing conflicts
            let mut action_open: Option<usize> = None;
            let mut action_delete: Option<usize> = None;

            egui::ScrollArea::vertical()
                .id_source("areas_list")
                .max_height(200.0)
                .show(ui, |ui| {
                    for (i, area) in self.area_set.areas.iter().enumerate() {
                        let due_count = due_topics(&area.topics, now).len();
                        ui.horizontal(|ui| {
                            let label = if due_count > 0 {
                                format!(
                                    "{} {} ({} topics, {} due)",
                                    area.icon,
                                    area.name,
                                    area.topics.len(),
                                    due_count
                                )
                            } else {
                                format!("{} {} ({} topics)", area.icon, area.name, area.topics.len())
                            };
                            if ui.button(label).clicked() {
                                action_open = Some(i);
                            }
                            if ui.small_button("Delete").clicked() {
                                action_delete = Some(i);
                            }
                        });
                    }
                });

            // Execute deferred actions
            if let Some(i) = action_open {
                self.selected_area_index = Some(i);
                self.selected_topic_index = None;
                self.current_screen = AppScreen::Area;
            }
            if let Some(i) = action_delete {
                self.delete_area(i);
            }
        });
    }

    /// Renders one study area: topic list plus the selected topic's detail.
    fn render_area_screen(&mut self, ctx: &egui::Context) {
        let Some(area_index) = self.selected_area_index else {
            self.current_screen = AppScreen::Dashboard;
            return;
        };
        if area_index >= self.area_set.areas.len() {
            self.current_screen = AppScreen::Dashboard;
            return;
        }

        let now = Utc::now();

        let mut action_back = false;
        let mut action_select: Option<usize> = None;
        let mut action_delete_topic: Option<usize> = None;
        let mut action_add_topic = false;
        let mut action_status: Option<StudyStatus> = None;
        let mut action_review: Option<bool> = None;
        let mut action_quiz = false;
        let mut action_toggle_timer = false;
        let mut action_add_resource = false;
        let mut area_dirty = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let area = &mut self.area_set.areas[area_index];

            ui.horizontal(|ui| {
                if ui.button("← Dashboard").clicked() {
                    action_back = true;
                }
                ui.heading(format!("{} {}", area.icon, area.name));
            });

            if !self.status_notice.is_empty() {
                ui.colored_label(egui::Color32::YELLOW, &self.status_notice);
            }

            ui.separator();

            ui.heading("Add Topic");
            ui.horizontal(|ui| {
                ui.label("Title:");
                ui.text_edit_singleline(&mut self.new_topic_title);
            });
            ui.horizontal(|ui| {
                ui.label("Description:");
                ui.text_edit_singleline(&mut self.new_topic_description);
            });
            if ui.button("Add Topic").clicked() && !self.new_topic_title.is_empty() {
                action_add_topic = true;
            }

            ui.separator();

            ui.heading(format!("Topics ({})", area.topics.len()));

            egui::ScrollArea::vertical()
                .id_source("topics_list")
                .max_height(180.0)
                .show(ui, |ui| {
                    for (i, topic) in area.topics.iter().enumerate() {
                        let is_selected = self.selected_topic_index == Some(i);
                        let due_marker = if is_review_due(topic, now) { " ⚠ DUE" } else { "" };

                        ui.horizontal(|ui| {
                            if ui
                                .selectable_label(
                                    is_selected,
                                    format!(
                                        "{} [{}] (level {}){}",
                                        topic.title,
                                        topic.status.label(),
                                        topic.review_level,
                                        due_marker
                                    ),
                                )
                                .clicked()
                            {
                                action_select = Some(i);
                            }
                            if ui.small_button("Delete").clicked() {
                                action_delete_topic = Some(i);
                            }
                        });
                    }
                });

            ui.separator();

            // Selected topic detail
            if let Some(topic_index) = self.selected_topic_index {
                if let Some(topic) = area.topics.get_mut(topic_index) {
                    ui.heading(format!("Topic: {}", topic.title));
                    if !topic.description.is_empty() {
                        ui.label(&topic.description);
                    }

                    ui.horizontal(|ui| {
                        ui.label(format!("Level: {}/6", topic.review_level));
                        ui.separator();
                        ui.label(format!("Next review: {}", format_date(topic.next_review_at)));
                        ui.separator();
                        ui.label(format!("Last studied: {}", format_date(topic.last_studied)));
                        ui.separator();
                        ui.label(format!(
                            "Time: {}",
                            stats::format_duration(topic.time_spent)
                        ));
                    });

                    // Kanban status. Never touches the scheduling fields.
                    ui.horizontal(|ui| {
                        ui.label("Status:");
                        for status in StudyStatus::ALL {
                            if ui
                                .selectable_label(topic.status == status, status.label())
                                .clicked()
                            {
                                action_status = Some(status);
                            }
                        }
                    });

                    ui.horizontal(|ui| {
                        let timer_label = if self.timer_started_at.is_some() {
                            "Stop Timer"
                        } else {
                            "Start Timer"
                        };
                        if ui.button(timer_label).clicked() {
                            action_toggle_timer = true;
                        }

                        ui.separator();

                        if is_review_due(topic, now) || topic.next_review_at.is_none() {
                            if ui.button("Review: Remembered").clicked() {
                                action_review = Some(true);
                            }
                            if ui.button("Review: Forgot").clicked() {
                                action_review = Some(false);
                            }
                        } else {
                            ui.label(format!(
                                "Scheduled, not due yet (level {} interval: {} days)",
                                topic.review_level,
                                interval_days(topic.review_level)
                            ));
                        }

                        if ui.button("Record Quiz Result").clicked() {
                            action_quiz = true;
                        }
                    });

                    ui.separator();

                    ui.label("Notes:");
                    if ui
                        .add(egui::TextEdit::multiline(&mut topic.notes).desired_rows(4))
                        .changed()
                    {
                        area_dirty = true;
                    }

                    ui.separator();

                    ui.heading(format!("Resources ({})", topic.resources.len()));
                    for res in &mut topic.resources {
                        ui.horizontal(|ui| {
                            if ui.checkbox(&mut res.watched, "").changed() {
                                area_dirty = true;
                            }
                            ui.label(format!("[{}] {}", res.resource_type.as_str(), res.title));
                            ui.hyperlink(&res.url);
                        });
                    }
                    ui.horizontal(|ui| {
                        ui.label("Title:");
                        ui.text_edit_singleline(&mut self.new_resource_title);
                        ui.label("URL:");
                        ui.text_edit_singleline(&mut self.new_resource_url);
                        if ui.button("Add Resource").clicked()
                            && !self.new_resource_title.is_empty()
                        {
                            action_add_resource = true;
                        }
                    });
                }
            } else {
                ui.label("Select a topic to see details, run reviews, and track time.");
            }
        });

        // Execute deferred actions
        if let Some(i) = action_select {
            // Switching topics flushes any running timer onto the old one.
            self.flush_timer();
            self.selected_topic_index = Some(i);
        }
        if action_add_topic {
            let topic = Topic::new(
                self.new_topic_title.clone(),
                self.new_topic_description.clone(),
            );
            self.area_set.areas[area_index].topics.push(topic);
            self.new_topic_title.clear();
            self.new_topic_description.clear();
            self.persist_area(area_index);
        }
        if let Some(i) = action_delete_topic {
            self.delete_topic(area_index, i);
        }
        if let Some(status) = action_status {
            if let Some(i) = self.selected_topic_index {
                if let Some(topic) = self.area_set.areas[area_index].topics.get_mut(i) {
                    topic.status = status;
                }
                self.persist_area(area_index);
            }
        }
        if action_add_resource {
            if let Some(i) = self.selected_topic_index {
                if let Some(topic) = self.area_set.areas[area_index].topics.get_mut(i) {
                    topic.resources.push(Resource::new(
                        ResourceType::Link,
                        self.new_resource_title.clone(),
                        self.new_resource_url.clone(),
                    ));
                    self.new_resource_title.clear();
                    self.new_resource_url.clear();
                }
                self.persist_area(area_index);
            }
        }
        if action_toggle_timer {
            self.toggle_timer();
        }
        if let Some(success) = action_review {
            self.apply_review(success);
        }
        if action_quiz {
            self.show_quiz_dialog = true;
        }
        if area_dirty {
            self.persist_area(area_index);
        }
        if action_back {
            self.flush_timer();
            self.current_screen = AppScreen::Dashboard;
        }
    }

    /// Completes a review for the selected topic.
    ///
    /// The in-memory state is updated first via the pure scheduler; the
    /// database write happens afterwards and a failure only produces a
    /// notice, never a rollback.
    fn apply_review(&mut self, success: bool) {
        let (Some(area_index), Some(topic_index)) =
            (self.selected_area_index, self.selected_topic_index)
        else {
            return;
        };
        let Some(topic) = self
            .area_set
            .areas
            .get(area_index)
            .and_then(|a| a.topics.get(topic_index))
        else {
            return;
        };

        let now = Utc::now();
        let updated = complete_review(topic, success, now);
        self.area_set.areas[area_index].topics[topic_index] = updated.clone();

        let today = Local::now().date_naive();
        self.activity.record(today);
        self.status_notice.clear();

        if let Some(conn) = &self.conn {
            let conn = conn.lock().unwrap();
            if let Err(e) = db::update_topic_schedule(&updated, &conn) {
                log::warn!("failed to persist review for '{}': {}", updated.title, e);
                self.status_notice = "Could not save the review; it is kept locally.".to_string();
            }
            if let Err(e) = db::record_activity(today, &conn) {
                log::warn!("failed to record study activity: {}", e);
            }
        }
    }

    /// Starts the topic timer, or stops it and books the elapsed seconds.
    fn toggle_timer(&mut self) {
        if self.timer_started_at.is_some() {
            self.flush_timer();
        } else if self.selected_topic_index.is_some() {
            self.timer_started_at = Some(Instant::now());
        }
    }

    /// Books a running timer onto the selected topic and persists the total.
    fn flush_timer(&mut self) {
        let Some(started) = self.timer_started_at.take() else {
            return;
        };
        let (Some(area_index), Some(topic_index)) =
            (self.selected_area_index, self.selected_topic_index)
        else {
            return;
        };

        let elapsed = started.elapsed().as_secs();
        if elapsed == 0 {
            return;
        }

        if let Some(topic) = self
            .area_set
            .areas
            .get_mut(area_index)
            .and_then(|a| a.topics.get_mut(topic_index))
        {
            topic.time_spent += elapsed;
            let (id, total) = (topic.id, topic.time_spent);
            if let Some(conn) = &self.conn {
                let conn = conn.lock().unwrap();
                if let Err(e) = db::update_topic_time(id, total, &conn) {
                    log::warn!("failed to persist study time: {}", e);
                    self.status_notice = "Could not save study time.".to_string();
                }
            }
        }
    }

    /// Persists one area (and its topics) without blocking the UI on errors.
    fn persist_area(&mut self, area_index: usize) {
        let Some(area) = self.area_set.areas.get(area_index) else {
            return;
        };
        if let Some(conn) = &self.conn {
            let conn = conn.lock().unwrap();
            if let Err(e) = db::upsert_area(area, area_index, &conn) {
                log::warn!("failed to persist area '{}': {}", area.name, e);
                self.status_notice = "Could not save changes; they are kept locally.".to_string();
            }
        }
    }

    fn delete_area(&mut self, area_index: usize) {
        if area_index >= self.area_set.areas.len() {
            return;
        }
        let area = self.area_set.areas.remove(area_index);

        if self.selected_area_index == Some(area_index) {
            self.selected_area_index = None;
            self.selected_topic_index = None;
        }

        if let Some(conn) = &self.conn {
            let conn = conn.lock().unwrap();
            if let Err(e) = db::delete_area(area.id, &conn) {
                log::warn!("failed to delete area '{}': {}", area.name, e);
            }
        }
    }

    fn delete_topic(&mut self, area_index: usize, topic_index: usize) {
        let Some(area) = self.area_set.areas.get_mut(area_index) else {
            return;
        };
        if topic_index >= area.topics.len() {
            return;
        }
        let topic = area.topics.remove(topic_index);

        match self.selected_topic_index {
            Some(i) if i == topic_index => {
                self.selected_topic_index = None;
                self.timer_started_at = None;
            }
            Some(i) if i > topic_index => {
                self.selected_topic_index = Some(i - 1);
            }
            _ => {}
        }

        if let Some(conn) = &self.conn {
            let conn = conn.lock().unwrap();
            if let Err(e) = db::delete_topic(topic.id, &conn) {
                log::warn!("failed to delete topic '{}': {}", topic.title, e);
            }
        }
    }

    /// Handles area export to a JSON file.
    fn handle_export(&mut self, area_index: usize) {
        if let Some(area) = self.area_set.areas.get(area_index) {
            // Open file save dialog
            if let Some(path) = rfd::FileDialog::new()
                .set_file_name(format!("{}.json", area.name))
                .add_filter("JSON files", &["json"])
                .save_file()
            {
                match export_json_to_path(area, &path.to_string_lossy()) {
                    Ok(_) => {
                        self.import_result_message =
                            format!("Area '{}' exported successfully!", area.name);
                        self.show_import_result_dialog = true;
                    }
                    Err(e) => {
                        self.import_result_message = format!("Export failed: {}", e);
                        self.show_import_result_dialog = true;
                    }
                }
            }
        }
        self.show_export_dialog = false;
    }

    /// Handles area import from a JSON file.
    fn handle_import(&mut self) {
        // Open file selection dialog
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        {
            match import_json(&path.to_string_lossy()) {
                Ok(area) => {
                    if self.area_set.areas.iter().any(|a| a.name == area.name) {
                        self.import_result_message = format!(
                            "Area '{}' already exists! Please rename it in the JSON file.",
                            area.name
                        );
                        self.show_import_result_dialog = true;
                        return;
                    }

                    let topic_count = area.topics.len();
                    let name = area.name.clone();

                    self.area_set.areas.push(area);
                    let index = self.area_set.areas.len() - 1;
                    self.persist_area(index);

                    self.import_result_message = format!(
                        "Area '{}' imported successfully with {} topics!",
                        name, topic_count
                    );
                    self.show_import_result_dialog = true;
                }
                Err(e) => {
                    self.import_result_message = format!(
                        "Import failed: {}\n\nPlease check if the file has correct structure:\n{{\n  \"id\": \"...\",\n  \"name\": \"Area Name\",\n  \"topics\": [...]\n}}",
                        e
                    );
                    self.show_import_result_dialog = true;
                }
            }
        }
    }
}
