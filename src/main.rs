mod app;
use study_tracker_app::*;

use app::StudyApp;
use database::db::{init_database, load_activity, load_all_areas, upsert_area};

fn main() -> eframe::Result<()> {
    env_logger::init();

    let conn = init_database().expect("Failed to initialize database");

    let mut area_set = load_all_areas(&conn).expect("Failed to load study areas from database");

    if area_set.areas.is_empty() {
        let mut area = StudyArea::new("Rust", 0);
        area.topics.push(Topic::new(
            "Ownership & Borrowing",
            "Moves, borrows and lifetimes",
        ));
        area.topics
            .push(Topic::new("Error Handling", "Result, ? and error types"));
        area.topics
            .push(Topic::new("Traits", "Generics and dynamic dispatch"));
        upsert_area(&area, 0, &conn).expect("Failed to seed sample data");
        area_set.areas.push(area);

        println!("Sample data created!");
    }

    let activity = load_activity(&conn).unwrap_or_default();

    println!("Loaded {} study areas from database", area_set.areas.len());
    for area in &area_set.areas {
        println!("  - {} {} ({} topics)", area.icon, area.name, area.topics.len());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Study Tracker",
        options,
        Box::new(|_cc| Ok(Box::new(StudyApp::new_with_areas(area_set, activity, conn)))),
    )
}
