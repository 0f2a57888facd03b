//! Application context - dependency injection container
//!
//! Every service is constructed here, once, at startup, and injected where
//! it is needed. Nothing in the application reaches for a module-level
//! singleton; the realtime hub is an explicit registry owned by this
//! context.

use std::sync::Arc;

use openhouse_core::booking::ports::{
    AgentRepository, BookingStore, LeadRepository, MeetingRepository, PropertyRepository,
};
use openhouse_core::{
    AgentService, AvailabilityService, BookingService, CalendarPort, EmailPort, LeadService,
    MeetingService, NotificationFanout, PropertyService, RealtimePort, SmsPort,
};
use openhouse_domain::{Config, Result};
use openhouse_infra::{
    BroadcastHub, DbManager, DisabledCalendar, GoogleCalendarClient, HttpEmailSender,
    HttpSmsSender, NoopEmailSender, NoopSmsSender, SqliteAgentRepository, SqliteBookingStore,
    SqliteLeadRepository, SqliteMeetingRepository, SqlitePropertyRepository,
};
use tracing::{info, warn};

use crate::error::ApiError;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub leads: Arc<LeadService>,
    pub properties: Arc<PropertyService>,
    pub meetings: Arc<MeetingService>,
    pub agents: Arc<AgentService>,
    pub booking: Arc<BookingService>,
    pub realtime: Arc<BroadcastHub>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let lead_repo: Arc<dyn LeadRepository> = Arc::new(SqliteLeadRepository::new(db.clone()));
        let agent_repo: Arc<dyn AgentRepository> =
            Arc::new(SqliteAgentRepository::new(db.clone()));
        let meeting_repo: Arc<dyn MeetingRepository> =
            Arc::new(SqliteMeetingRepository::new(db.clone()));
        let property_repo: Arc<dyn PropertyRepository> =
            Arc::new(SqlitePropertyRepository::new(db.clone()));
        let booking_store: Arc<dyn BookingStore> = Arc::new(SqliteBookingStore::new(db.clone()));

        let calendar = build_calendar(&config)?;
        let email = build_email(&config)?;
        let sms = build_sms(&config)?;

        let realtime = Arc::new(BroadcastHub::new());
        let realtime_port: Arc<dyn RealtimePort> = realtime.clone();
        let notifications = Arc::new(NotificationFanout::new(email, sms, realtime_port));

        let availability =
            Arc::new(AvailabilityService::new(calendar.clone(), config.calendar.fail_open));
        let booking = Arc::new(BookingService::new(
            lead_repo.clone(),
            agent_repo.clone(),
            property_repo.clone(),
            booking_store,
            calendar.clone(),
            availability,
            notifications.clone(),
            config.booking.lookahead_days,
            config.booking.max_slots_per_day,
        ));

        let leads = Arc::new(LeadService::new(lead_repo, notifications));
        let properties = Arc::new(PropertyService::new(property_repo));
        let meetings = Arc::new(MeetingService::new(meeting_repo, agent_repo.clone()));
        let agents = Arc::new(AgentService::new(agent_repo, calendar));

        Ok(Self { config, db, leads, properties, meetings, agents, booking, realtime })
    }

    /// Wrap a domain error for the HTTP layer, deciding whether internal
    /// detail may be exposed.
    pub fn fail(&self, error: openhouse_domain::OpenHouseError) -> ApiError {
        ApiError::new(error, !self.config.server.is_production())
    }
}

fn build_calendar(config: &Config) -> Result<Arc<dyn CalendarPort>> {
    if !config.calendar.enabled {
        info!("calendar integration disabled by configuration");
        return Ok(Arc::new(DisabledCalendar));
    }
    let credentials_present = config.calendar.client_id.is_some()
        && config.calendar.client_secret.is_some()
        && config.calendar.refresh_token.is_some();
    if !credentials_present {
        warn!("calendar integration enabled but credentials are missing, running degraded");
        return Ok(Arc::new(DisabledCalendar));
    }
    Ok(Arc::new(GoogleCalendarClient::from_config(&config.calendar)?))
}

fn build_email(config: &Config) -> Result<Arc<dyn EmailPort>> {
    if !config.email.enabled {
        return Ok(Arc::new(NoopEmailSender));
    }
    Ok(Arc::new(HttpEmailSender::from_config(&config.email)?))
}

fn build_sms(config: &Config) -> Result<Arc<dyn SmsPort>> {
    if !config.sms.enabled {
        return Ok(Arc::new(NoopSmsSender));
    }
    Ok(Arc::new(HttpSmsSender::from_config(&config.sms)?))
}
