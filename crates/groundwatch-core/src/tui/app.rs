//! Dashboard application state and logic

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::widgets::TableState;
use tokio::sync::watch;

use crate::error::Result;
use crate::models::AlertView;
use crate::service::AlertService;

use super::event::{Event, EventHandler};
use super::view::{apply_filter, sort_for_display, SeverityFilter};

/// Dashboard application state
///
/// Holds the display-sorted copy of the published collection plus the derived
/// filtered view. All user intents route back through the alert service; the
/// app never mutates the published collection itself.
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Display-sorted copy of the published alert collection
    pub current_alerts: Vec<AlertView>,
    /// Active severity filter
    pub filter: SeverityFilter,
    /// Filtered view of `current_alerts`
    pub filtered: Vec<AlertView>,
    /// Alerts table state
    pub table_state: TableState,
    /// Currently inspected alert, if the detail dialog is open
    pub inspected: Option<AlertView>,
    /// Show help overlay
    pub show_help: bool,
    /// Load in progress
    pub loading: bool,
    /// Loading progress, 0..=100
    pub progress: u8,
    /// User-facing load error, if any
    pub error: Option<String>,
    /// Status message
    pub status_message: Option<(String, Instant)>,
    /// Refresh rate
    pub refresh_rate: Duration,

    service: Arc<AlertService>,
    alerts_rx: watch::Receiver<Vec<AlertView>>,
    loading_rx: watch::Receiver<bool>,
    error_rx: watch::Receiver<Option<String>>,
    progress_rx: watch::Receiver<u8>,
}

impl App {
    /// Create the dashboard over an alert service
    pub fn new(service: Arc<AlertService>, refresh_rate_ms: u64) -> Self {
        let alerts_rx = service.alerts();
        let loading_rx = service.loading();
        let error_rx = service.error();
        let progress_rx = service.progress();
        let loading = *loading_rx.borrow();

        let mut app = Self {
            should_quit: false,
            current_alerts: Vec::new(),
            filter: SeverityFilter::default(),
            filtered: Vec::new(),
            table_state: TableState::default(),
            inspected: None,
            show_help: false,
            loading,
            progress: 0,
            error: None,
            status_message: None,
            refresh_rate: Duration::from_millis(refresh_rate_ms),
            service,
            alerts_rx,
            loading_rx,
            error_rx,
            progress_rx,
        };
        // A receiver marks the value present at subscription as seen, so pull
        // whatever is already published.
        app.refresh_alerts();
        app
    }

    /// Drain the service channels into display state
    pub fn sync(&mut self) {
        self.loading = *self.loading_rx.borrow_and_update();
        self.progress = *self.progress_rx.borrow_and_update();
        self.error = self.error_rx.borrow_and_update().clone();

        if self.alerts_rx.has_changed().unwrap_or(false) {
            self.refresh_alerts();
        }
    }

    /// Re-derive display state from the published collection
    fn refresh_alerts(&mut self) {
        let mut alerts = self.alerts_rx.borrow_and_update().clone();
        sort_for_display(&mut alerts);
        self.current_alerts = alerts;
        self.recompute_filtered();

        if let Some(inspected) = &self.inspected {
            if let Some(updated) = self
                .current_alerts
                .iter()
                .find(|a| a.error_id == inspected.error_id)
            {
                self.inspected = Some(updated.clone());
            }
        }
    }

    /// Recompute the filtered view and clamp the selection
    fn recompute_filtered(&mut self) {
        self.filtered = apply_filter(&self.current_alerts, self.filter);

        if self.filtered.is_empty() {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0);
            self.table_state
                .select(Some(selected.min(self.filtered.len() - 1)));
        }
    }

    /// Set the severity filter
    pub fn set_filter(&mut self, filter: SeverityFilter) {
        self.filter = filter;
        self.recompute_filtered();
    }

    /// The alert under the cursor, if any
    pub fn selected_alert(&self) -> Option<&AlertView> {
        self.table_state
            .selected()
            .and_then(|index| self.filtered.get(index))
    }

    /// Handle key events
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match (code, modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => {
                self.should_quit = true;
            }
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            (KeyCode::Char('?'), KeyModifiers::NONE) => {
                self.show_help = !self.show_help;
            }
            (KeyCode::Esc, KeyModifiers::NONE) => {
                if self.show_help {
                    self.show_help = false;
                } else if self.inspected.is_some() {
                    self.inspected = None;
                }
            }
            (KeyCode::Tab, KeyModifiers::NONE) | (KeyCode::Char('f'), KeyModifiers::NONE) => {
                self.set_filter(self.filter.next());
            }
            (KeyCode::BackTab, KeyModifiers::SHIFT) | (KeyCode::Char('F'), KeyModifiers::SHIFT) => {
                self.set_filter(self.filter.prev());
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => {
                self.retry();
            }
            (KeyCode::Char('a'), KeyModifiers::NONE) => {
                self.acknowledge_selected();
            }
            (KeyCode::Enter, KeyModifiers::NONE) => {
                self.inspected = self.selected_alert().cloned();
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
                self.select_previous();
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
                self.select_next();
            }
            (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => {
                if !self.filtered.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            (KeyCode::End, _) | (KeyCode::Char('G'), KeyModifiers::SHIFT) => {
                if !self.filtered.is_empty() {
                    self.table_state.select(Some(self.filtered.len() - 1));
                }
            }
            _ => {}
        }
    }

    fn select_previous(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let index = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(index.saturating_sub(1)));
    }

    fn select_next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        let index = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some((index + 1).min(self.filtered.len() - 1)));
    }

    /// Acknowledge the alert under the cursor
    fn acknowledge_selected(&mut self) {
        let Some(alert) = self.selected_alert() else {
            return;
        };
        let id = alert.error_id.clone();
        self.service.acknowledge(&id);
        self.set_status(format!("Acknowledged {id}"));
    }

    /// Trigger a manual reload
    fn retry(&mut self) {
        let service = self.service.clone();
        tokio::spawn(async move { service.retry_load().await });
        self.set_status("Reloading alerts".to_string());
    }

    /// Set a status message that expires after 3 seconds
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get current status message if not expired
    pub fn get_status(&self) -> Option<&str> {
        self.status_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < Duration::from_secs(3) {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    /// Run the dashboard
    pub async fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        };
        use ratatui::{backend::CrosstermBackend, Terminal};
        use std::io;

        use crate::error::Error;

        enable_raw_mode().map_err(|e| Error::terminal(e.to_string()))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| Error::terminal(e.to_string()))?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|e| Error::terminal(e.to_string()))?;

        // Kick off the initial load in the background; the tick loop picks
        // up its publications.
        let service = self.service.clone();
        tokio::spawn(async move { service.load().await });

        let mut events = EventHandler::new(self.refresh_rate.as_millis() as u64);
        events.start();

        while !self.should_quit {
            terminal
                .draw(|frame| super::ui::draw(frame, self))
                .map_err(|e| Error::terminal(e.to_string()))?;

            if let Some(event) = events.next().await {
                match event {
                    Event::Key(key) => self.handle_key(key.code, key.modifiers),
                    Event::Tick => self.sync(),
                    Event::Resize(_, _) => {}
                }
            }
        }

        disable_raw_mode().map_err(|e| Error::terminal(e.to_string()))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| Error::terminal(e.to_string()))?;
        terminal
            .show_cursor()
            .map_err(|e| Error::terminal(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::{RawAlert, RawContact, Severity};
    use crate::source::ContactSource;
    use crate::store::{AckStore, MemoryStore};
    use async_trait::async_trait;

    fn alert(id: &str, severity: Severity, time: i64) -> RawAlert {
        RawAlert {
            error_id: id.to_string(),
            error_severity: severity,
            error_category: "telemetry".to_string(),
            error_message: format!("short {id}"),
            long_message: format!("long {id}"),
            error_time: time,
            selected: false,
            is_new: false,
            expanded: false,
        }
    }

    fn contact(name: i64, alerts: Vec<RawAlert>) -> RawContact {
        RawContact {
            id: format!("doc-{name}"),
            contact_id: format!("c-{name}"),
            contact_status: "active".to_string(),
            contact_name: name,
            contact_ground: "WALLOPS".to_string(),
            contact_satellite: format!("SAT-{name}"),
            contact_equipment: "ANT-1".to_string(),
            contact_state: "executing".to_string(),
            contact_step: "AOS".to_string(),
            contact_detail: format!("detail {name}"),
            contact_begin_timestamp: 1_000,
            contact_end_timestamp: 2_000,
            contact_latitude: 0.0,
            contact_longitude: 0.0,
            contact_azimuth: 0.0,
            contact_elevation: 0.0,
            contact_resolution: String::new(),
            contact_resolution_status: "open".to_string(),
            alerts,
        }
    }

    struct StaticSource(Vec<RawContact>);

    #[async_trait]
    impl ContactSource for StaticSource {
        async fn fetch(&self) -> Result<Vec<RawContact>> {
            Ok(self.0.clone())
        }
    }

    async fn loaded_app() -> App {
        let contacts = vec![
            contact(101, vec![alert("E1", Severity::Critical, 2_000)]),
            contact(
                102,
                vec![
                    alert("E2", Severity::Warning, 1_000),
                    alert("E3", Severity::Critical, 3_000),
                ],
            ),
        ];
        let service = Arc::new(AlertService::new(
            Arc::new(StaticSource(contacts)),
            Arc::new(AckStore::new(Arc::new(MemoryStore::new()), "acknowledgedAlerts")),
            Duration::ZERO,
        ));
        service.load().await;

        let mut app = App::new(service, 250);
        app.sync();
        app
    }

    #[tokio::test]
    async fn sync_sorts_for_display() {
        let app = loaded_app().await;
        let ids: Vec<&str> = app.current_alerts.iter().map(|a| a.error_id.as_str()).collect();
        assert_eq!(ids, vec!["E3", "E1", "E2"]);
        assert!(!app.loading);
        assert_eq!(app.error, None);
    }

    #[tokio::test]
    async fn filter_cycle_narrows_the_table() {
        let mut app = loaded_app().await;

        app.handle_key(KeyCode::Char('f'), KeyModifiers::NONE);
        assert_eq!(app.filter, SeverityFilter::Only(Severity::Critical));
        let ids: Vec<&str> = app.filtered.iter().map(|a| a.error_id.as_str()).collect();
        assert_eq!(ids, vec!["E3", "E1"]);

        // The underlying collection is untouched.
        assert_eq!(app.current_alerts.len(), 3);
    }

    #[tokio::test]
    async fn navigation_clamps_to_the_filtered_list() {
        let mut app = loaded_app().await;
        assert_eq!(app.table_state.selected(), Some(0));

        for _ in 0..10 {
            app.handle_key(KeyCode::Char('j'), KeyModifiers::NONE);
        }
        assert_eq!(app.table_state.selected(), Some(2));

        app.handle_key(KeyCode::Char('g'), KeyModifiers::NONE);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn enter_inspects_and_esc_closes() {
        let mut app = loaded_app().await;

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.inspected.as_ref().unwrap().error_id, "E3");

        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.inspected.is_none());
    }

    #[tokio::test]
    async fn acknowledge_routes_through_the_service() {
        let mut app = loaded_app().await;

        // Cursor starts on E3.
        app.handle_key(KeyCode::Char('a'), KeyModifiers::NONE);
        app.sync();

        let e3 = app
            .current_alerts
            .iter()
            .find(|a| a.error_id == "E3")
            .unwrap();
        assert!(e3.acknowledged);
        assert!(app.get_status().unwrap().contains("E3"));
    }

    #[tokio::test]
    async fn inspected_alert_tracks_republication() {
        let mut app = loaded_app().await;

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('a'), KeyModifiers::NONE);
        app.sync();

        assert!(app.inspected.as_ref().unwrap().acknowledged);
    }
}
