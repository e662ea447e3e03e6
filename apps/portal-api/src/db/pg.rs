//! Postgres-backed [`PortalStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use diesel_async::AsyncConnection;
use scoped_futures::ScopedFutureExt;

use crate::db::pool::DbPool;
use crate::db::schema::{check_ins, events, hotels, members, room_assignments};
use crate::db::store::PortalStore;
use crate::error::ApiError;
use crate::models::check_in::{CheckIn, NewCheckIn};
use crate::models::event::Event;
use crate::models::hotel::{Hotel, HotelRow};
use crate::models::member::Member;
use crate::models::room_assignment::{NewRoomAssignment, RoomAssignment, UpsertRoomAssignment};

#[derive(Clone)]
pub struct PgPortalStore {
    pool: DbPool,
}

impl PgPortalStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortalStore for PgPortalStore {
    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, ApiError> {
        let mut conn = self.pool.get().await?;

        let event = diesel_async::RunQueryDsl::get_result(
            events::table.find(event_id).select(Event::as_select()),
            &mut conn,
        )
        .await
        .optional()?;

        Ok(event)
    }

    async fn list_members(&self, event_id: &str) -> Result<Vec<Member>, ApiError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<Member> = diesel_async::RunQueryDsl::load(
            members::table
                .filter(members::event_id.eq(event_id))
                .order((members::created_at.asc(), members::id.asc()))
                .select(Member::as_select()),
            &mut conn,
        )
        .await?;

        Ok(rows)
    }

    async fn list_room_assignments(
        &self,
        event_id: &str,
    ) -> Result<Vec<RoomAssignment>, ApiError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<RoomAssignment> = diesel_async::RunQueryDsl::load(
            room_assignments::table
                .filter(room_assignments::event_id.eq(event_id))
                .order(room_assignments::member_id.asc())
                .select(RoomAssignment::as_select()),
            &mut conn,
        )
        .await?;

        Ok(rows)
    }

    async fn upsert_room_assignment(
        &self,
        upsert: &UpsertRoomAssignment,
    ) -> Result<RoomAssignment, ApiError> {
        let now = Utc::now();
        let mut conn = self.pool.get().await?;

        conn.transaction::<_, ApiError, _>(|conn| {
            async move {
                // The member must belong to the event the assignment is for.
                diesel_async::RunQueryDsl::get_result::<String>(
                    members::table
                        .filter(members::id.eq(&upsert.member_id))
                        .filter(members::event_id.eq(&upsert.event_id))
                        .select(members::id),
                    conn,
                )
                .await
                .optional()?
                .ok_or_else(|| ApiError::not_found("Member not found"))?;

                let assignment: RoomAssignment = diesel_async::RunQueryDsl::get_result(
                    diesel::insert_into(room_assignments::table)
                        .values(NewRoomAssignment::from_upsert(upsert, now))
                        .on_conflict((room_assignments::event_id, room_assignments::member_id))
                        .do_update()
                        .set((
                            room_assignments::room_number.eq(upsert.room_number.as_deref()),
                            room_assignments::room_type.eq(upsert.room_type),
                            room_assignments::check_in_date.eq(upsert.check_in_date),
                            room_assignments::check_out_date.eq(upsert.check_out_date),
                            room_assignments::special_requests
                                .eq(upsert.special_requests.as_deref()),
                            room_assignments::updated_at.eq(now),
                        ))
                        .returning(RoomAssignment::as_returning()),
                    conn,
                )
                .await?;

                Ok(assignment)
            }
            .scope_boxed()
        })
        .await
    }

    async fn get_hotel(&self, event_id: &str) -> Result<Option<Hotel>, ApiError> {
        let mut conn = self.pool.get().await?;

        let row: Option<HotelRow> = diesel_async::RunQueryDsl::get_result(
            hotels::table
                .filter(hotels::event_id.eq(event_id))
                .select(HotelRow::as_select()),
            &mut conn,
        )
        .await
        .optional()?;

        row.map(Hotel::try_from).transpose()
    }

    async fn list_check_ins(&self, event_id: &str) -> Result<Vec<CheckIn>, ApiError> {
        let mut conn = self.pool.get().await?;

        let rows: Vec<CheckIn> = diesel_async::RunQueryDsl::load(
            check_ins::table
                .filter(check_ins::event_id.eq(event_id))
                .select(CheckIn::as_select()),
            &mut conn,
        )
        .await?;

        Ok(rows)
    }

    async fn check_in(
        &self,
        event_id: &str,
        member_id: &str,
        at: DateTime<Utc>,
    ) -> Result<CheckIn, ApiError> {
        let mut conn = self.pool.get().await?;

        diesel_async::RunQueryDsl::get_result::<String>(
            members::table
                .filter(members::id.eq(member_id))
                .filter(members::event_id.eq(event_id))
                .select(members::id),
            &mut conn,
        )
        .await
        .optional()?
        .ok_or_else(|| ApiError::not_found("Member not found"))?;

        let check_in: CheckIn = diesel_async::RunQueryDsl::get_result(
            diesel::insert_into(check_ins::table)
                .values(NewCheckIn {
                    event_id,
                    member_id,
                    checked_in_at: at,
                })
                .on_conflict((check_ins::event_id, check_ins::member_id))
                .do_update()
                .set(check_ins::checked_in_at.eq(at))
                .returning(CheckIn::as_returning()),
            &mut conn,
        )
        .await?;

        Ok(check_in)
    }

    async fn clear_check_in(&self, event_id: &str, member_id: &str) -> Result<bool, ApiError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel_async::RunQueryDsl::execute(
            diesel::delete(check_ins::table.find((event_id, member_id))),
            &mut conn,
        )
        .await?;

        Ok(deleted > 0)
    }
}
