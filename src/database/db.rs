//! Database operations for the study tracker
//!
//! Handles SQLite initialization, CRUD for study areas, topics and
//! resources, the scheduling-field update contract, due-topic lookup,
//! and the daily study-activity log.

use crate::models::scheduler::is_review_due;
use crate::models::{
    ActivityLog, AreaSet, Resource, ResourceType, StudyArea, StudyLog, StudyStatus, Topic,
};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Result, params};
use uuid::Uuid;

const DB_PATH: &str = "study_tracker.sqlite3";

/// Opens the application database and creates missing tables.
pub fn init_database() -> Result<Connection> {
    let conn = Connection::open(DB_PATH)?;
    create_tables(&conn)?;
    Ok(conn)
}

/// Creates the schema on an open connection. Safe to call repeatedly.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS areas (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            icon TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            position INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS topics (
            id TEXT PRIMARY KEY,
            area_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'PENDING',
            notes TEXT NOT NULL DEFAULT '',
            time_spent INTEGER NOT NULL DEFAULT 0,
            last_studied TEXT,
            review_level INTEGER NOT NULL DEFAULT 0,
            next_review_at TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (area_id) REFERENCES areas(id)
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS resources (
            id TEXT PRIMARY KEY,
            topic_id TEXT NOT NULL,
            resource_type TEXT NOT NULL,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            description TEXT,
            watched INTEGER NOT NULL DEFAULT 0,
            video_notes TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (topic_id) REFERENCES topics(id)
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS study_logs (
            date TEXT PRIMARY KEY,
            count INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

fn datetime_to_sql(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

/// Stored timestamps that fail to parse load as absent rather than failing.
fn datetime_from_sql(value: Option<String>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn uuid_from_sql(value: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Persists an area row and all of its topics (idempotent upsert keyed by id).
pub fn upsert_area(area: &StudyArea, position: usize, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO areas (id, name, description, icon, created_at, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            icon = excluded.icon,
            position = excluded.position",
        params![
            area.id.to_string(),
            area.name,
            area.description,
            area.icon,
            area.created_at.to_rfc3339(),
            position as i64
        ],
    )?;

    for (i, topic) in area.topics.iter().enumerate() {
        upsert_topic(area.id, topic, i, conn)?;
    }

    Ok(())
}

/// Persists one topic row (idempotent upsert keyed by id) and replaces its
/// resource rows.
pub fn upsert_topic(area_id: Uuid, topic: &Topic, position: usize, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO topics (id, area_id, title, description, status, notes,
                             time_spent, last_studied, review_level, next_review_at, position)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(id) DO UPDATE SET
            area_id = excluded.area_id,
            title = excluded.title,
            description = excluded.description,
            status = excluded.status,
            notes = excluded.notes,
            time_spent = excluded.time_spent,
            last_studied = excluded.last_studied,
            review_level = excluded.review_level,
            next_review_at = excluded.next_review_at,
            position = excluded.position",
        params![
            topic.id.to_string(),
            area_id.to_string(),
            topic.title,
            topic.description,
            topic.status.as_str(),
            topic.notes,
            topic.time_spent as i64,
            datetime_to_sql(topic.last_studied),
            topic.review_level as i64,
            datetime_to_sql(topic.next_review_at),
            position as i64
        ],
    )?;

    sync_resources(topic.id, &topic.resources, conn)
}

/// Writes only the scheduling fields of a topic after a review completion.
///
/// All other columns are left untouched: the scheduler owns
/// `review_level`, `next_review_at` and `last_studied` and nothing else.
pub fn update_topic_schedule(topic: &Topic, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE topics
         SET review_level = ?1, next_review_at = ?2, last_studied = ?3
         WHERE id = ?4",
        params![
            topic.review_level as i64,
            datetime_to_sql(topic.next_review_at),
            datetime_to_sql(topic.last_studied),
            topic.id.to_string()
        ],
    )?;
    Ok(())
}

/// Writes the accumulated study seconds for a topic (timer collaborator).
pub fn update_topic_time(topic_id: Uuid, time_spent: u64, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE topics SET time_spent = ?1 WHERE id = ?2",
        params![time_spent as i64, topic_id.to_string()],
    )?;
    Ok(())
}

/// Replaces the stored resource rows of a topic.
pub fn sync_resources(topic_id: Uuid, resources: &[Resource], conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM resources WHERE topic_id = ?1",
        params![topic_id.to_string()],
    )?;

    for (i, res) in resources.iter().enumerate() {
        conn.execute(
            "INSERT INTO resources (id, topic_id, resource_type, title, url,
                                    description, watched, video_notes, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                res.id.to_string(),
                topic_id.to_string(),
                res.resource_type.as_str(),
                res.title,
                res.url,
                res.description,
                res.watched as i64,
                res.video_notes,
                i as i64
            ],
        )?;
    }

    Ok(())
}

/// Deletes a topic together with its resources.
pub fn delete_topic(topic_id: Uuid, conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM resources WHERE topic_id = ?1",
        params![topic_id.to_string()],
    )?;
    conn.execute(
        "DELETE FROM topics WHERE id = ?1",
        params![topic_id.to_string()],
    )?;
    Ok(())
}

/// Deletes an area together with its topics and their resources.
pub fn delete_area(area_id: Uuid, conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM resources WHERE topic_id IN (SELECT id FROM topics WHERE area_id = ?1)",
        params![area_id.to_string()],
    )?;
    conn.execute(
        "DELETE FROM topics WHERE area_id = ?1",
        params![area_id.to_string()],
    )?;
    conn.execute(
        "DELETE FROM areas WHERE id = ?1",
        params![area_id.to_string()],
    )?;
    Ok(())
}

fn get_resources_for_topic(topic_id: Uuid, conn: &Connection) -> Result<Vec<Resource>> {
    let mut stmt = conn.prepare(
        "SELECT id, resource_type, title, url, description, watched, video_notes
         FROM resources WHERE topic_id = ?1 ORDER BY position",
    )?;

    let resources = stmt
        .query_map(params![topic_id.to_string()], |row| {
            Ok(Resource {
                id: uuid_from_sql(row.get(0)?)?,
                resource_type: ResourceType::from_str(&row.get::<_, String>(1)?),
                title: row.get(2)?,
                url: row.get(3)?,
                description: row.get(4)?,
                watched: row.get::<_, i64>(5)? != 0,
                video_notes: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<Resource>>>()?;

    Ok(resources)
}

fn get_topics_for_area(area_id: Uuid, conn: &Connection) -> Result<Vec<Topic>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, status, notes, time_spent,
                last_studied, review_level, next_review_at
         FROM topics WHERE area_id = ?1 ORDER BY position",
    )?;

    let mut topics = stmt
        .query_map(params![area_id.to_string()], |row| {
            Ok(Topic {
                id: uuid_from_sql(row.get(0)?)?,
                title: row.get(1)?,
                description: row.get(2)?,
                status: StudyStatus::from_str(&row.get::<_, String>(3)?),
                notes: row.get(4)?,
                resources: Vec::new(),
                time_spent: row.get::<_, i64>(5)?.max(0) as u64,
                last_studied: datetime_from_sql(row.get(6)?),
                review_level: row.get::<_, i64>(7)?.clamp(0, 6) as u8,
                next_review_at: datetime_from_sql(row.get(8)?),
            })
        })?
        .collect::<Result<Vec<Topic>>>()?;

    for topic in &mut topics {
        topic.resources = get_resources_for_topic(topic.id, conn)?;
    }

    Ok(topics)
}

/// Loads every study area with its topics and resources into memory.
pub fn load_all_areas(conn: &Connection) -> Result<AreaSet> {
    let mut stmt = conn
        .prepare("SELECT id, name, description, icon, created_at FROM areas ORDER BY position")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                uuid_from_sql(row.get(0)?)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>>>()?;

    let mut areas = Vec::new();
    for (id, name, description, icon, created_at) in rows {
        let topics = get_topics_for_area(id, conn)?;
        areas.push(StudyArea {
            id,
            name,
            description,
            icon,
            topics,
            created_at: datetime_from_sql(created_at).unwrap_or_else(Utc::now),
        });
    }

    Ok(AreaSet { areas })
}

/// Retrieves topics due for review at `now`, oldest first, paired with
/// the name of the area they belong to.
pub fn get_topics_due_for_review(
    now: DateTime<Utc>,
    conn: &Connection,
) -> Result<Vec<(String, Topic)>> {
    let mut stmt = conn.prepare(
        "SELECT a.name, t.id, t.title, t.description, t.status, t.notes, t.time_spent,
                t.last_studied, t.review_level, t.next_review_at
         FROM topics t
         JOIN areas a ON a.id = t.area_id
         WHERE t.next_review_at IS NOT NULL",
    )?;

    let mut due = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Topic {
                    id: uuid_from_sql(row.get(1)?)?,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    status: StudyStatus::from_str(&row.get::<_, String>(4)?),
                    notes: row.get(5)?,
                    resources: Vec::new(),
                    time_spent: row.get::<_, i64>(6)?.max(0) as u64,
                    last_studied: datetime_from_sql(row.get(7)?),
                    review_level: row.get::<_, i64>(8)?.clamp(0, 6) as u8,
                    next_review_at: datetime_from_sql(row.get(9)?),
                },
            ))
        })?
        .collect::<Result<Vec<_>>>()?;

    // Dueness is decided by the same predicate the UI uses, after parsing.
    due.retain(|(_, t)| is_review_due(t, now));
    due.sort_by_key(|(_, t)| t.next_review_at);

    Ok(due)
}

/// Bumps the study-log counter for `date`.
pub fn record_activity(date: NaiveDate, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO study_logs (date, count) VALUES (?1, 1)
         ON CONFLICT(date) DO UPDATE SET count = count + 1",
        params![date.format("%Y-%m-%d").to_string()],
    )?;
    Ok(())
}

/// Loads the full study-activity log. Rows with unparseable dates are skipped.
pub fn load_activity(conn: &Connection) -> Result<ActivityLog> {
    let mut stmt = conn.prepare("SELECT date, count FROM study_logs ORDER BY date")?;

    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<Vec<_>>>()?;

    let entries = rows
        .into_iter()
        .filter_map(|(date, count)| {
            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()?;
            Some(StudyLog {
                date,
                count: count.max(0) as u32,
            })
        })
        .collect();

    Ok(ActivityLog { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scheduler::complete_review;
    use chrono::{Duration, TimeZone};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn
    }

    fn sample_area() -> StudyArea {
        let mut area = StudyArea::new("Rust", 0);
        let mut topic = Topic::new("Lifetimes", "Borrow scopes");
        topic.notes = "read the nomicon".to_string();
        topic.resources.push(Resource::new(
            ResourceType::Link,
            "Nomicon",
            "https://doc.rust-lang.org/nomicon/",
        ));
        area.topics.push(topic);
        area.topics.push(Topic::new("Traits", "Dispatch"));
        area
    }

    #[test]
    fn test_area_round_trip() {
        let conn = test_conn();
        let area = sample_area();

        upsert_area(&area, 0, &conn).unwrap();
        let loaded = load_all_areas(&conn).unwrap();

        assert_eq!(loaded.areas.len(), 1);
        let loaded_area = &loaded.areas[0];
        assert_eq!(loaded_area.id, area.id);
        assert_eq!(loaded_area.topics.len(), 2);
        assert_eq!(loaded_area.topics[0].title, "Lifetimes");
        assert_eq!(loaded_area.topics[0].notes, "read the nomicon");
        assert_eq!(loaded_area.topics[0].resources.len(), 1);
        assert_eq!(loaded_area.topics[1].review_level, 0);
        assert!(loaded_area.topics[1].next_review_at.is_none());
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let conn = test_conn();
        let mut area = sample_area();

        upsert_area(&area, 0, &conn).unwrap();
        area.name = "Rust (advanced)".to_string();
        upsert_area(&area, 0, &conn).unwrap();

        let loaded = load_all_areas(&conn).unwrap();
        assert_eq!(loaded.areas.len(), 1);
        assert_eq!(loaded.areas[0].name, "Rust (advanced)");
        assert_eq!(loaded.areas[0].topics.len(), 2);
    }

    #[test]
    fn test_schedule_update_leaves_other_columns_alone() {
        let conn = test_conn();
        let area = sample_area();
        upsert_area(&area, 0, &conn).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let reviewed = complete_review(&area.topics[0], true, now);
        update_topic_schedule(&reviewed, &conn).unwrap();

        let loaded = load_all_areas(&conn).unwrap();
        let topic = &loaded.areas[0].topics[0];
        assert_eq!(topic.review_level, 1);
        assert_eq!(topic.next_review_at, Some(now + Duration::days(3)));
        assert_eq!(topic.last_studied, Some(now));
        // Columns outside the scheduling contract keep their values.
        assert_eq!(topic.notes, "read the nomicon");
        assert_eq!(topic.status, StudyStatus::Pending);
        assert_eq!(topic.time_spent, 0);
    }

    #[test]
    fn test_due_query_filters_and_orders() {
        let conn = test_conn();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();

        let mut area = StudyArea::new("Rust", 0);
        let mut oldest = Topic::new("Oldest", "");
        oldest.next_review_at = Some(now - Duration::days(5));
        let mut recent = Topic::new("Recent", "");
        recent.next_review_at = Some(now - Duration::days(1));
        let mut future = Topic::new("Future", "");
        future.next_review_at = Some(now + Duration::days(1));
        let unscheduled = Topic::new("Unscheduled", "");
        area.topics = vec![recent, future, oldest, unscheduled];
        upsert_area(&area, 0, &conn).unwrap();

        let due = get_topics_due_for_review(now, &conn).unwrap();

        assert_eq!(due.len(), 2);
        assert_eq!(due[0].1.title, "Oldest");
        assert_eq!(due[1].1.title, "Recent");
        assert_eq!(due[0].0, "Rust");
    }

    #[test]
    fn test_due_boundary_is_inclusive() {
        let conn = test_conn();
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();

        let mut area = StudyArea::new("Rust", 0);
        let mut topic = Topic::new("Boundary", "");
        topic.next_review_at = Some(now);
        area.topics.push(topic);
        upsert_area(&area, 0, &conn).unwrap();

        let due = get_topics_due_for_review(now, &conn).unwrap();
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn test_activity_log_round_trip() {
        let conn = test_conn();
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        record_activity(day, &conn).unwrap();
        record_activity(day, &conn).unwrap();
        record_activity(day.succ_opt().unwrap(), &conn).unwrap();

        let log = load_activity(&conn).unwrap();
        assert_eq!(log.entries.len(), 2);
        assert_eq!(log.entries[0].count, 2);
        assert_eq!(log.entries[1].count, 1);
    }

    #[test]
    fn test_delete_area_removes_topics_and_resources() {
        let conn = test_conn();
        let area = sample_area();
        upsert_area(&area, 0, &conn).unwrap();

        delete_area(area.id, &conn).unwrap();

        let loaded = load_all_areas(&conn).unwrap();
        assert!(loaded.areas.is_empty());
        let topic_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM topics", [], |row| row.get(0))
            .unwrap();
        assert_eq!(topic_count, 0);
        let resource_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM resources", [], |row| row.get(0))
            .unwrap();
        assert_eq!(resource_count, 0);
    }
}
