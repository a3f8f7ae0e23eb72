// src/controller_tests.rs

#[cfg(test)]
mod tests {
    use crate::api::{ApiError, ErrorReporter, TimeEntrySource};
    use crate::controller::{ControllerState, WorkTimeController};
    use crate::model::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn d(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .unwrap_or_else(|_| panic!("Invalid date string format: {}", date_str))
    }

    fn raw(date_str: &str, logged: i64) -> RawEntry {
        RawEntry {
            date: d(date_str),
            expected_minutes: 480,
            logged_minutes: logged,
            project_minutes: logged,
            internal_minutes: 0,
            total_minutes: logged,
            vacation: false,
        }
    }

    fn week_total(year: i32, week: Option<u32>, logged: i64) -> AggregateEntry {
        AggregateEntry {
            id: PeriodKey {
                year,
                week,
                month: None,
            },
            expected_minutes: 2400,
            logged_minutes: logged,
            project_minutes: logged,
            internal_minutes: 0,
            total_minutes: logged,
        }
    }

    fn backend_down() -> ApiError {
        ApiError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            message: "backend unavailable".to_string(),
        }
    }

    // One scripted response; `delay_ms` simulates a slow backend.
    struct Step<T> {
        delay_ms: u64,
        response: Result<Vec<T>, ()>,
    }

    fn ok<T>(items: Vec<T>) -> Step<T> {
        Step {
            delay_ms: 0,
            response: Ok(items),
        }
    }

    fn slow<T>(delay_ms: u64, items: Vec<T>) -> Step<T> {
        Step {
            delay_ms,
            response: Ok(items),
        }
    }

    fn fail<T>() -> Step<T> {
        Step {
            delay_ms: 0,
            response: Err(()),
        }
    }

    // Scripted backend: pops one response per call and records call
    // arguments for assertions.
    #[derive(Default)]
    struct ScriptedSource {
        daily: Mutex<VecDeque<Step<RawEntry>>>,
        totals: Mutex<VecDeque<Step<AggregateEntry>>>,
        daily_calls: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
        totals_calls: Mutex<Vec<(String, Granularity)>>,
    }

    impl ScriptedSource {
        fn with_daily(steps: Vec<Step<RawEntry>>) -> Self {
            Self {
                daily: Mutex::new(steps.into()),
                ..Default::default()
            }
        }

        fn with_totals(steps: Vec<Step<AggregateEntry>>) -> Self {
            Self {
                totals: Mutex::new(steps.into()),
                ..Default::default()
            }
        }

        fn daily_call_count(&self) -> usize {
            self.daily_calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TimeEntrySource for ScriptedSource {
        async fn list_daily_entries(
            &self,
            person_id: &str,
            after: NaiveDate,
            before: NaiveDate,
        ) -> Result<Vec<RawEntry>, ApiError> {
            self.daily_calls
                .lock()
                .unwrap()
                .push((person_id.to_string(), after, before));
            let step = self
                .daily
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected daily fetch");
            if step.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
            }
            step.response.map_err(|_| backend_down())
        }

        async fn list_person_total_time(
            &self,
            person_id: &str,
            granularity: Granularity,
        ) -> Result<Vec<AggregateEntry>, ApiError> {
            self.totals_calls
                .lock()
                .unwrap()
                .push((person_id.to_string(), granularity));
            let step = self
                .totals
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected totals fetch");
            if step.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
            }
            step.response.map_err(|_| backend_down())
        }

        async fn list_employees(&self) -> Result<Vec<Employee>, ApiError> {
            unimplemented!("not used by the controller")
        }

        async fn vacation_allocation(
            &self,
            _person_id: &str,
            _year: i32,
        ) -> Result<VacationAllocation, ApiError> {
            unimplemented!("not used by the controller")
        }

        async fn list_vacation_requests(
            &self,
            _person_id: &str,
        ) -> Result<Vec<VacationRequest>, ApiError> {
            unimplemented!("not used by the controller")
        }

        async fn submit_vacation_request(
            &self,
            _person_id: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<VacationRequest, ApiError> {
            unimplemented!("not used by the controller")
        }

        async fn resolve_vacation_request(
            &self,
            _request_id: &str,
            _approve: bool,
        ) -> Result<VacationRequest, ApiError> {
            unimplemented!("not used by the controller")
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        messages: Mutex<Vec<(String, Option<String>)>>,
    }

    impl RecordingReporter {
        fn messages(&self) -> Vec<(String, Option<String>)> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ErrorReporter for RecordingReporter {
        async fn report_error(&self, user_message: &str, cause: Option<String>) {
            self.messages
                .lock()
                .unwrap()
                .push((user_message.to_string(), cause));
        }
    }

    fn controller(
        source: Arc<ScriptedSource>,
        reporter: Arc<RecordingReporter>,
    ) -> WorkTimeController {
        WorkTimeController::new(source, reporter, Some("token".to_string()))
    }

    #[tokio::test]
    async fn validation_gap_short_circuits_until_inputs_complete() {
        let source = Arc::new(ScriptedSource::with_daily(vec![ok(vec![raw(
            "2024-01-02",
            480,
        )])]));
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = controller(source.clone(), reporter.clone());

        ctrl.set_start_date(d("2024-01-01")).await;
        assert_eq!(ctrl.state().await, ControllerState::Idle, "no person yet");
        assert_eq!(source.daily_call_count(), 0, "no fetch without a person");

        ctrl.set_person("p1").await;
        assert_eq!(ctrl.state().await, ControllerState::Ready);
        assert_eq!(source.daily_call_count(), 1);
        let payload = ctrl.payload().await.expect("payload after READY");
        assert_eq!(payload.points.len(), 1);
        assert!(reporter.messages().is_empty());
    }

    #[tokio::test]
    async fn absent_credential_skips_fetch_entirely() {
        let source = Arc::new(ScriptedSource::default());
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = WorkTimeController::new(source.clone(), reporter, None);

        ctrl.set_start_date(d("2024-01-01")).await;
        ctrl.set_person("p1").await;

        assert_eq!(ctrl.state().await, ControllerState::Idle);
        assert_eq!(source.daily_call_count(), 0);
    }

    #[tokio::test]
    async fn week_scope_requires_week_bounds_then_loads() {
        let source = Arc::new(ScriptedSource::with_totals(vec![ok(vec![
            week_total(2024, Some(11), 200),
            week_total(2024, Some(12), 300),
        ])]));
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = controller(source.clone(), reporter.clone());

        ctrl.set_scope(Scope::Week).await;
        ctrl.set_person("p1").await;
        assert_eq!(
            ctrl.state().await,
            ControllerState::Idle,
            "no week bounds selected yet"
        );

        ctrl.set_week_range(2024, 10, 13).await;
        assert_eq!(ctrl.state().await, ControllerState::Ready);
        let payload = ctrl.payload().await.unwrap();
        let labels: Vec<&str> = payload.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["2024 week 11", "2024 week 12"]);
        assert_eq!(
            source.totals_calls.lock().unwrap()[0],
            ("p1".to_string(), Granularity::Week)
        );
    }

    #[tokio::test]
    async fn fetch_failure_reports_and_preserves_prior_payload() {
        let source = Arc::new(ScriptedSource::with_daily(vec![
            ok(vec![raw("2024-01-02", 480)]),
            fail(),
        ]));
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = controller(source.clone(), reporter.clone());

        ctrl.set_start_date(d("2024-01-01")).await;
        ctrl.set_person("p1").await;
        assert_eq!(ctrl.state().await, ControllerState::Ready);

        ctrl.set_end_date(d("2024-01-10")).await;
        assert_eq!(ctrl.state().await, ControllerState::Error);
        let payload = ctrl
            .payload()
            .await
            .expect("prior payload remains for display fallback");
        assert_eq!(payload.points.len(), 1);

        let messages = reporter.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "Could not load daily working times.");
        assert!(messages[0].1.as_deref().unwrap().contains("backend"));
    }

    #[tokio::test]
    async fn malformed_week_totals_surface_as_error() {
        // A totals row without a week number must fail the aggregation, not
        // be skipped silently.
        let source = Arc::new(ScriptedSource::with_totals(vec![ok(vec![week_total(
            2024, None, 100,
        )])]));
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = controller(source.clone(), reporter.clone());

        ctrl.set_scope(Scope::Week).await;
        ctrl.set_week_range(2024, 9, 13).await;
        ctrl.set_person("p1").await;

        assert_eq!(ctrl.state().await, ControllerState::Error);
        assert!(ctrl.payload().await.is_none(), "first load failed: no payload");
        let messages = reporter.messages();
        assert_eq!(messages[0].0, "Could not load weekly working times.");
        assert!(messages[0].1.as_deref().unwrap().contains("week"));
    }

    #[tokio::test]
    async fn stale_reload_result_is_discarded() {
        let source = Arc::new(ScriptedSource::with_daily(vec![
            ok(vec![raw("2024-01-02", 480)]), // consumed by set_person
            slow(80, vec![raw("2024-01-02", 480), raw("2024-01-03", 480)]),
            ok(vec![raw("2024-01-04", 240)]),
        ]));
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = Arc::new(controller(source.clone(), reporter.clone()));

        ctrl.set_start_date(d("2024-01-01")).await;
        ctrl.set_person("p1").await;

        // Older slow cycle races a newer fast one.
        let slow_cycle = {
            let ctrl = ctrl.clone();
            tokio::spawn(async move { ctrl.reload().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        ctrl.reload().await;
        slow_cycle.await.unwrap();

        let payload = ctrl.payload().await.unwrap();
        let labels: Vec<&str> = payload.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2024-01-04"],
            "newer fetch stays authoritative over the late slow result"
        );
        assert_eq!(ctrl.state().await, ControllerState::Ready);
    }

    #[tokio::test]
    async fn entering_week_scope_converts_date_bounds() {
        let source = Arc::new(ScriptedSource::default());
        {
            *source.daily.lock().unwrap() = vec![ok(vec![])].into();
            *source.totals.lock().unwrap() = vec![ok(vec![
                week_total(2024, Some(10), 100),
                week_total(2024, Some(11), 200),
                week_total(2024, Some(12), 250),
                week_total(2024, Some(13), 300),
            ])]
            .into();
        }
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = controller(source.clone(), reporter.clone());

        ctrl.set_start_date(d("2024-03-04")).await; // ISO week 10
        ctrl.set_end_date(d("2024-03-25")).await; // ISO week 13
        ctrl.set_person("p1").await;
        assert_eq!(ctrl.state().await, ControllerState::Ready);

        ctrl.set_scope(Scope::Week).await;
        let payload = ctrl.payload().await.unwrap();
        let labels: Vec<&str> = payload.points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2024 week 11", "2024 week 12"],
            "derived week bounds 10..13 keep only the interior weeks"
        );
    }

    #[tokio::test]
    async fn leaving_week_scope_rebuilds_date_bounds() {
        let source = Arc::new(ScriptedSource::default());
        {
            *source.totals.lock().unwrap() = vec![ok(vec![])].into();
            *source.daily.lock().unwrap() = vec![ok(vec![])].into();
        }
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = controller(source.clone(), reporter.clone());

        ctrl.set_scope(Scope::Week).await;
        ctrl.set_week_range(2024, 10, 14).await;
        ctrl.set_person("p1").await;
        assert_eq!(ctrl.state().await, ControllerState::Ready);

        ctrl.set_scope(Scope::Date).await;
        let calls = source.daily_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, d("2024-03-04"), "Monday of week 10");
        assert_eq!(calls[0].2, d("2024-04-01"), "Monday of week 14");
    }

    #[tokio::test]
    async fn start_only_toggle_clears_end_and_means_up_to_now() {
        let source = Arc::new(ScriptedSource::with_daily(vec![
            ok(vec![raw("2024-01-02", 480)]), // out of the closed range
            ok(vec![raw("2024-01-02", 480)]),
        ]));
        let reporter = Arc::new(RecordingReporter::default());
        let ctrl = controller(source.clone(), reporter.clone());

        ctrl.set_start_date(d("2020-01-01")).await;
        ctrl.set_end_date(d("2020-02-01")).await;
        ctrl.set_person("p1").await;
        assert_eq!(
            ctrl.payload().await.unwrap().points.len(),
            0,
            "entry after the selected end bound is filtered out"
        );

        ctrl.set_start_only(true).await;
        assert_eq!(
            ctrl.payload().await.unwrap().points.len(),
            1,
            "open-ended range reaches up to now"
        );
        let calls = source.daily_calls.lock().unwrap().clone();
        assert!(
            calls[1].2 > d("2024-12-31"),
            "open-ended fetch bound lies in the present"
        );
    }
}
