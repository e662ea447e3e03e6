#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};

use portal_api::auth::sessions::{self, Role, SessionData};
use portal_api::config::Config;
use portal_api::db::kv::MemoryStore;
use portal_api::db::memory::MemoryPortalStore;
use portal_api::db::store::PortalStore;
use portal_api::error::ApiError;
use portal_api::models::check_in::CheckIn;
use portal_api::models::event::Event;
use portal_api::models::hotel::{Hotel, HotelPoc};
use portal_api::models::member::Member;
use portal_api::models::room_assignment::{RoomAssignment, RoomType, UpsertRoomAssignment};
use portal_api::AppState;
use portal_common::id::{prefix, prefixed_ulid, PrefixedId};

/// Build an AppState over the in-memory stores.
pub fn test_state(store: Arc<dyn PortalStore>) -> AppState {
    AppState {
        store,
        kv: Arc::new(MemoryStore::new()),
        config: Arc::new(Config::default()),
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn test_app() -> (Router, AppState, Arc<MemoryPortalStore>) {
    let store = Arc::new(MemoryPortalStore::new());
    let state = test_state(store.clone());
    let app = portal_api::routes::router().with_state(state.clone());
    (app, state, store)
}

/// Router over `inner` whose room upserts fail for the given member IDs.
pub fn flaky_app(inner: Arc<MemoryPortalStore>, failing: &[&str]) -> (Router, AppState) {
    let store = Arc::new(FlakyStore::new(inner, failing));
    let state = test_state(store);
    let app = portal_api::routes::router().with_state(state.clone());
    (app, state)
}

pub fn with_config(state: &AppState, config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
        ..state.clone()
    };
    portal_api::routes::router().with_state(state)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Store a session and return its bearer token.
pub async fn login(state: &AppState, role: Role, event_ids: &[&str]) -> String {
    let token = prefixed_ulid(prefix::SESSION);
    let data = SessionData {
        user_id: prefixed_ulid(prefix::USER),
        role,
        event_ids: event_ids.iter().map(|e| e.to_string()).collect(),
    };
    sessions::store_session(state.kv.as_ref(), &token, &data, sessions::SESSION_TTL_SECS)
        .await
        .expect("store session");
    token
}

pub async fn staff_token(state: &AppState, event_id: &str) -> String {
    login(state, Role::Collaborator, &[event_id]).await
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub fn seed_event(store: &MemoryPortalStore) -> Event {
    let event = Event {
        id: Event::generate(),
        partner_id: prefixed_ulid(prefix::PARTNER),
        name: "Annual Offsite".to_string(),
        location: Some("Goa".to_string()),
        start_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 13).unwrap(),
        created_at: Utc::now(),
    };
    store.insert_event(event.clone());
    event
}

/// A member record that is not yet stored.
pub fn new_member(event_id: &str, employee_id: &str, name: &str) -> Member {
    Member {
        id: Member::generate(),
        event_id: event_id.to_string(),
        employee_id: employee_id.to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        country_code: "+91".to_string(),
        phone: "9000000000".to_string(),
        kyc_document_type: None,
        kyc_document_number: None,
        kyc_document_url: None,
        created_at: Utc::now(),
    }
}

pub fn seed_member(
    store: &MemoryPortalStore,
    event_id: &str,
    employee_id: &str,
    name: &str,
) -> Member {
    let member = new_member(event_id, employee_id, name);
    store.insert_member(member.clone());
    member
}

pub fn complete_kyc(member: &mut Member) {
    member.kyc_document_type = Some("Passport".to_string());
    member.kyc_document_number = Some("P1234567".to_string());
    member.kyc_document_url = Some(format!("https://blob.example.com/{}.pdf", member.id));
}

pub async fn assign(
    store: &MemoryPortalStore,
    member: &Member,
    room_number: &str,
    room_type: RoomType,
) -> RoomAssignment {
    store
        .upsert_room_assignment(&UpsertRoomAssignment {
            event_id: member.event_id.clone(),
            member_id: member.id.clone(),
            room_number: Some(room_number.to_string()),
            room_type,
            check_in_date: None,
            check_out_date: None,
            special_requests: None,
        })
        .await
        .expect("seed assignment")
}

pub fn seed_hotel(store: &MemoryPortalStore, event_id: &str) -> Hotel {
    let hotel = Hotel {
        id: Hotel::generate(),
        event_id: event_id.to_string(),
        name: "Seaside Resort".to_string(),
        address: "1 Beach Road".to_string(),
        star_rating: Some(4),
        amenities: vec!["Pool".to_string(), "Wi-Fi".to_string()],
        pocs: vec![
            HotelPoc {
                name: "Front Desk".to_string(),
                phone: Some("+91 80000 00000".to_string()),
                email: None,
                display_for_members: true,
            },
            HotelPoc {
                name: "Sales Manager".to_string(),
                phone: None,
                email: Some("sales@seaside.example.com".to_string()),
                display_for_members: false,
            },
        ],
        updated_at: Utc::now(),
    };
    store.insert_hotel(hotel.clone());
    hotel
}

/// Alice and Bob share room 205; Carol has no room.
pub async fn alice_bob_carol(store: &MemoryPortalStore) -> (Event, Member, Member, Member) {
    let event = seed_event(store);
    let alice = seed_member(store, &event.id, "EMP001", "Alice");
    let bob = seed_member(store, &event.id, "EMP002", "Bob");
    let carol = seed_member(store, &event.id, "EMP003", "Carol");
    assign(store, &alice, "205", RoomType::Double).await;
    assign(store, &bob, "205", RoomType::Double).await;
    (event, alice, bob, carol)
}

// ---------------------------------------------------------------------------
// Failure injection
// ---------------------------------------------------------------------------

/// Delegates to an in-memory store, failing room upserts for chosen members.
pub struct FlakyStore {
    inner: Arc<MemoryPortalStore>,
    failing: HashSet<String>,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryPortalStore>, failing: &[&str]) -> Self {
        Self {
            inner,
            failing: failing.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl PortalStore for FlakyStore {
    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, ApiError> {
        self.inner.get_event(event_id).await
    }

    async fn list_members(&self, event_id: &str) -> Result<Vec<Member>, ApiError> {
        self.inner.list_members(event_id).await
    }

    async fn list_room_assignments(
        &self,
        event_id: &str,
    ) -> Result<Vec<RoomAssignment>, ApiError> {
        self.inner.list_room_assignments(event_id).await
    }

    async fn upsert_room_assignment(
        &self,
        upsert: &UpsertRoomAssignment,
    ) -> Result<RoomAssignment, ApiError> {
        if self.failing.contains(&upsert.member_id) {
            return Err(ApiError::internal("connection reset"));
        }
        self.inner.upsert_room_assignment(upsert).await
    }

    async fn get_hotel(&self, event_id: &str) -> Result<Option<Hotel>, ApiError> {
        self.inner.get_hotel(event_id).await
    }

    async fn list_check_ins(&self, event_id: &str) -> Result<Vec<CheckIn>, ApiError> {
        self.inner.list_check_ins(event_id).await
    }

    async fn check_in(
        &self,
        event_id: &str,
        member_id: &str,
        at: DateTime<Utc>,
    ) -> Result<CheckIn, ApiError> {
        self.inner.check_in(event_id, member_id, at).await
    }

    async fn clear_check_in(&self, event_id: &str, member_id: &str) -> Result<bool, ApiError> {
        self.inner.clear_check_in(event_id, member_id).await
    }
}
