/// File-backed report repository
use crate::domain::{NewReport, Report, ReportFilter, ReportPatch};
use crate::errors::{ApiError, ApiResult};
use crate::query;
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::warn;

/// Durable collection of reports, persisted as a single JSON snapshot
/// file rewritten in full on every mutation. One lock serializes all
/// writers; readers see a consistent snapshot.
pub struct ReportStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

struct StoreState {
    reports: Vec<Report>,
    /// Highest id ever assigned in this process. Seeded from the loaded
    /// snapshot and never lowered by deletes, so ids are not reused.
    max_seen: i64,
}

impl ReportStore {
    /// Open the snapshot file, creating the data directory and an empty
    /// snapshot on first use. An unreadable or corrupt snapshot degrades
    /// to an empty collection.
    pub async fn open(path: impl AsRef<Path>) -> ApiResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let reports = match load_snapshot(&path).await {
            Ok(reports) => reports,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    "unreadable report snapshot, starting empty: {}", err
                );
                Vec::new()
            }
        };

        let max_seen = reports.iter().map(|r| r.id).max().unwrap_or(0);
        let store = Self {
            path,
            state: RwLock::new(StoreState { reports, max_seen }),
        };

        // Make sure the snapshot exists before the first mutation.
        if !store.path.exists() {
            let state = store.state.read().await;
            store.persist(&state.reports).await?;
        }

        Ok(store)
    }

    /// Validate, coerce and append a new report. The collection is written
    /// to disk before the in-memory state is touched, so a failed write
    /// leaves no trace.
    pub async fn create(&self, payload: NewReport) -> ApiResult<Report> {
        if payload.airport.is_empty()
            || payload.report_date.is_empty()
            || payload.report_time.is_empty()
        {
            return Err(ApiError::Validation(
                "airport, report_date and report_time are required".to_string(),
            ));
        }

        let flight_status = payload.flight_status.coerce().map_err(ApiError::Coercion)?;

        let mut state = self.state.write().await;
        let report = Report {
            id: state.max_seen + 1,
            airport: payload.airport,
            report_date: payload.report_date,
            report_time: payload.report_time,
            weather: payload.weather,
            flight_status,
            actions: payload.actions,
            damage_recovery: payload.damage_recovery,
            submitted_at: now_stamp(),
            updated_at: None,
        };

        let mut updated = state.reports.clone();
        updated.push(report.clone());
        self.persist(&updated).await?;

        state.max_seen = report.id;
        state.reports = updated;
        Ok(report)
    }

    /// All reports matching the filter, in stored order.
    pub async fn list(&self, filter: &ReportFilter) -> Vec<Report> {
        let state = self.state.read().await;
        query::filter_reports(&state.reports, filter)
    }

    pub async fn get(&self, id: i64) -> ApiResult<Report> {
        let state = self.state.read().await;
        state
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("report {id}")))
    }

    /// Replace each supplied top-level field, keep the rest, and stamp
    /// `updated_at`. Sub-records replace wholesale.
    pub async fn update(&self, id: i64, patch: ReportPatch) -> ApiResult<Report> {
        let mut state = self.state.write().await;
        let index = state
            .reports
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("report {id}")))?;

        let mut report = state.reports[index].clone();
        if let Some(airport) = patch.airport {
            report.airport = airport;
        }
        if let Some(report_date) = patch.report_date {
            report.report_date = report_date;
        }
        if let Some(report_time) = patch.report_time {
            report.report_time = report_time;
        }
        if let Some(weather) = patch.weather {
            report.weather = weather;
        }
        if let Some(flight_status) = patch.flight_status {
            report.flight_status = flight_status;
        }
        if let Some(actions) = patch.actions {
            report.actions = actions;
        }
        if let Some(damage_recovery) = patch.damage_recovery {
            report.damage_recovery = damage_recovery;
        }
        report.updated_at = Some(now_stamp());

        let mut updated = state.reports.clone();
        updated[index] = report.clone();
        self.persist(&updated).await?;

        state.reports = updated;
        Ok(report)
    }

    /// Remove the report with the given id. Absence is a no-op success.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        let mut state = self.state.write().await;
        let updated: Vec<Report> = state
            .reports
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.persist(&updated).await?;

        state.reports = updated;
        Ok(())
    }

    /// Consistent copy of the whole collection.
    pub async fn snapshot(&self) -> Vec<Report> {
        self.state.read().await.reports.clone()
    }

    async fn persist(&self, reports: &[Report]) -> ApiResult<()> {
        let bytes = serde_json::to_vec_pretty(reports)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

async fn load_snapshot(path: &Path) -> ApiResult<Vec<Report>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn now_stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewReport;
    use tempfile::tempdir;

    fn new_report(airport: &str) -> NewReport {
        serde_json::from_value(serde_json::json!({
            "airport": airport,
            "report_date": "2024-01-10",
            "report_time": "05:10"
        }))
        .unwrap()
    }

    async fn open_store(dir: &tempfile::TempDir) -> ReportStore {
        ReportStore::open(dir.path().join("reports.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        for expected in 1..=3 {
            let report = store.create(new_report("김포")).await.unwrap();
            assert_eq!(report.id, expected);
        }
    }

    #[tokio::test]
    async fn delete_of_max_id_does_not_recycle_it() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store.create(new_report("김포")).await.unwrap();
        store.create(new_report("제주")).await.unwrap();
        let last = store.create(new_report("인천")).await.unwrap();

        store.delete(last.id).await.unwrap();
        let next = store.create(new_report("부산")).await.unwrap();
        assert_eq!(next.id, last.id + 1);
    }

    #[tokio::test]
    async fn partial_update_keeps_untouched_fields() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let created = store
            .create(
                serde_json::from_value(serde_json::json!({
                    "airport": "김해",
                    "report_date": "2024-01-10",
                    "report_time": "11:10",
                    "weather": { "snowfall_amount": "3cm", "advisory": true },
                    "flight_status": { "domestic": { "cancelled_total": 2 } }
                }))
                .unwrap(),
            )
            .await
            .unwrap();
        assert!(created.updated_at.is_none());

        let patch: ReportPatch =
            serde_json::from_value(serde_json::json!({ "damage_recovery": "제설차 1대 수리" }))
                .unwrap();
        let updated = store.update(created.id, patch).await.unwrap();

        assert_eq!(updated.airport, "김해");
        assert_eq!(updated.report_date, "2024-01-10");
        assert_eq!(updated.weather.snowfall_amount, "3cm");
        assert!(updated.weather.advisory);
        assert_eq!(updated.flight_status.domestic.cancelled_total, 2);
        assert_eq!(updated.damage_recovery, "제설차 1대 수리");
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn update_replaces_subrecords_wholesale() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let created = store
            .create(
                serde_json::from_value(serde_json::json!({
                    "airport": "대구",
                    "report_date": "2024-01-10",
                    "report_time": "17:10",
                    "weather": { "snowfall_amount": "5cm", "warning": true }
                }))
                .unwrap(),
            )
            .await
            .unwrap();

        // A patch carrying only one weather field resets the others.
        let patch: ReportPatch =
            serde_json::from_value(serde_json::json!({ "weather": { "advisory": true } })).unwrap();
        let updated = store.update(created.id, patch).await.unwrap();

        assert!(updated.weather.advisory);
        assert!(!updated.weather.warning);
        assert_eq!(updated.weather.snowfall_amount, "");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let patch = ReportPatch::default();
        assert!(matches!(
            store.update(9999, patch).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_of_unknown_id_is_a_noop_success() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store.create(new_report("광주")).await.unwrap();

        store.delete(9999).await.unwrap();
        assert_eq!(store.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn get_of_unknown_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(matches!(store.get(1).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn validation_failure_leaves_collection_unchanged() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let result = store.create(new_report("")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn coercion_failure_leaves_collection_unchanged() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let payload: NewReport = serde_json::from_value(serde_json::json!({
            "airport": "여수",
            "report_date": "2024-01-10",
            "report_time": "22:10",
            "flight_status": { "international": { "cancelled_total": "둘" } }
        }))
        .unwrap();

        let result = store.create(payload).await;
        assert!(matches!(result, Err(ApiError::Coercion(_))));
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_snapshot_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = ReportStore::open(&path).await.unwrap();
        assert!(store.snapshot().await.is_empty());

        // And the store is usable afterwards.
        let report = store.create(new_report("울산")).await.unwrap();
        assert_eq!(report.id, 1);
    }

    #[tokio::test]
    async fn reports_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reports.json");
        {
            let store = ReportStore::open(&path).await.unwrap();
            store.create(new_report("원주")).await.unwrap();
            store.create(new_report("양양")).await.unwrap();
        }

        let store = ReportStore::open(&path).await.unwrap();
        assert_eq!(store.snapshot().await.len(), 2);
        assert_eq!(store.get(2).await.unwrap().airport, "양양");

        // The id watermark re-seeds from the surviving records.
        let next = store.create(new_report("청주")).await.unwrap();
        assert_eq!(next.id, 3);
    }
}
