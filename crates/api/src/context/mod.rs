//! Application context
//!
//! Owns the wired object graph: stores and provider clients behind their
//! port traits, plus the orchestration services built on top. Production
//! wiring comes from [`AppContext::new`]; tests inject their own ports
//! through [`AppContext::from_ports`].

use std::sync::Arc;

use concord_core::assist::AssistService;
use concord_core::backend_ports::{
    AssistStore, AttendeeStore, CalendarStore, CategoryStore, ConferenceStore, EventStore,
    IntegrationStore, PreferencesStore, ReminderStore,
};
use concord_core::provider_ports::{AssistLauncher, CalendarProvider, ZoomClient};
use concord_core::{BackendStores, CalendarResolver, ConferenceService, EventOrchestrator};
use concord_domain::{Config, Result};
use concord_infra::backend::{
    GraphAssistStore, GraphAttendeeStore, GraphCalendarStore, GraphCategoryStore,
    GraphConferenceStore, GraphEventStore, GraphIntegrationStore, GraphPreferencesStore,
    GraphReminderStore, GraphqlClient,
};
use concord_infra::integrations::{GoogleCalendarClient, HttpAssistLauncher, ZoomApiClient};
use concord_infra::HttpClient;

/// Every port the context is built from.
pub struct Ports {
    pub calendars: Arc<dyn CalendarStore>,
    pub events: Arc<dyn EventStore>,
    pub attendees: Arc<dyn AttendeeStore>,
    pub reminders: Arc<dyn ReminderStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub conferences: Arc<dyn ConferenceStore>,
    pub integrations: Arc<dyn IntegrationStore>,
    pub preferences: Arc<dyn PreferencesStore>,
    pub assists: Arc<dyn AssistStore>,
    pub provider: Arc<dyn CalendarProvider>,
    pub zoom: Arc<dyn ZoomClient>,
    pub launcher: Arc<dyn AssistLauncher>,
}

/// The wired application.
pub struct AppContext {
    pub config: Config,
    pub calendars: Arc<dyn CalendarStore>,
    pub events: Arc<dyn EventStore>,
    pub attendees: Arc<dyn AttendeeStore>,
    pub reminders: Arc<dyn ReminderStore>,
    pub assists: Arc<dyn AssistStore>,
    orchestrator: EventOrchestrator,
    assist_service: AssistService,
    launcher: Arc<dyn AssistLauncher>,
}

impl AppContext {
    /// Wire the production adapters from the environment: `.env` file,
    /// environment variables, then probed config files.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config = concord_infra::config::load()?;
        Self::new(config)
    }

    /// Wire the production adapters from configuration.
    pub fn new(config: Config) -> Result<Self> {
        let http = HttpClient::from_config(&config.http)?;
        let graphql = Arc::new(GraphqlClient::new(&config.backend, http.clone()));

        let ports = Ports {
            calendars: Arc::new(GraphCalendarStore::new(graphql.clone())),
            events: Arc::new(GraphEventStore::new(graphql.clone())),
            attendees: Arc::new(GraphAttendeeStore::new(graphql.clone())),
            reminders: Arc::new(GraphReminderStore::new(graphql.clone())),
            categories: Arc::new(GraphCategoryStore::new(graphql.clone())),
            conferences: Arc::new(GraphConferenceStore::new(graphql.clone())),
            integrations: Arc::new(GraphIntegrationStore::new(graphql.clone())),
            preferences: Arc::new(GraphPreferencesStore::new(graphql.clone())),
            assists: Arc::new(GraphAssistStore::new(graphql)),
            provider: Arc::new(GoogleCalendarClient::new(http.clone(), config.google.clone())),
            zoom: Arc::new(ZoomApiClient::new(http.clone(), config.zoom.clone())),
            launcher: Arc::new(HttpAssistLauncher::new(http, config.scheduler.clone())),
        };

        Ok(Self::from_ports(config, ports))
    }

    /// Wire from explicit ports (tests, alternative providers).
    pub fn from_ports(config: Config, ports: Ports) -> Self {
        let resolver = CalendarResolver::new(ports.calendars.clone());
        let conference_service = ConferenceService::new(
            ports.conferences.clone(),
            ports.integrations.clone(),
            ports.zoom.clone(),
        );
        let orchestrator = EventOrchestrator::new(
            resolver,
            conference_service,
            BackendStores {
                events: ports.events.clone(),
                attendees: ports.attendees.clone(),
                reminders: ports.reminders.clone(),
                categories: ports.categories.clone(),
                conferences: ports.conferences.clone(),
                assists: ports.assists.clone(),
            },
            ports.provider.clone(),
            ports.zoom.clone(),
        );
        let assist_service = AssistService::new(
            ports.assists.clone(),
            ports.events.clone(),
            ports.preferences.clone(),
            ports.launcher.clone(),
        );

        Self {
            config,
            calendars: ports.calendars,
            events: ports.events,
            attendees: ports.attendees,
            reminders: ports.reminders,
            assists: ports.assists,
            orchestrator,
            assist_service,
            launcher: ports.launcher,
        }
    }

    pub fn orchestrator(&self) -> &EventOrchestrator {
        &self.orchestrator
    }

    pub fn assist(&self) -> &AssistService {
        &self.assist_service
    }

    pub fn launcher(&self) -> &Arc<dyn AssistLauncher> {
        &self.launcher
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` controls the filter; defaults to `info` for our crates.
pub fn init_telemetry() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,concord_core=info,concord_infra=info,concord_api=info")
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
