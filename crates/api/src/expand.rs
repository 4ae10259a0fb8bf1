//! Nested user-profile expansion for response payloads.
//!
//! Track, comment, like and report rows carry only a `user_id`. Before they
//! are serialized, the owning user's [`UserProfile`] is loaded and embedded
//! as `user`. Profiles for a whole page are fetched in one query to avoid
//! N+1 lookups.

use std::collections::HashMap;

use musicrev_core::error::CoreError;
use musicrev_core::types::DbId;
use musicrev_db::models::comment::{Comment, CommentResponse};
use musicrev_db::models::like::{Like, LikeResponse};
use musicrev_db::models::report::{Report, ReportResponse};
use musicrev_db::models::track::{TrackResponse, TrackRow};
use musicrev_db::models::user::UserProfile;
use musicrev_db::repositories::UserRepo;
use musicrev_db::DbPool;

use crate::error::{AppError, AppResult};

/// A row that embeds its owner's profile when rendered.
pub trait Expandable {
    type Response;

    fn owner_id(&self) -> DbId;

    fn with_owner(self, owner: UserProfile) -> Self::Response;
}

impl Expandable for TrackRow {
    type Response = TrackResponse;

    fn owner_id(&self) -> DbId {
        self.user_id
    }

    fn with_owner(self, owner: UserProfile) -> TrackResponse {
        self.into_response(owner)
    }
}

impl Expandable for Comment {
    type Response = CommentResponse;

    fn owner_id(&self) -> DbId {
        self.user_id
    }

    fn with_owner(self, owner: UserProfile) -> CommentResponse {
        self.into_response(owner)
    }
}

impl Expandable for Like {
    type Response = LikeResponse;

    fn owner_id(&self) -> DbId {
        self.user_id
    }

    fn with_owner(self, owner: UserProfile) -> LikeResponse {
        self.into_response(owner)
    }
}

impl Expandable for Report {
    type Response = ReportResponse;

    fn owner_id(&self) -> DbId {
        self.user_id
    }

    fn with_owner(self, owner: UserProfile) -> ReportResponse {
        self.into_response(owner)
    }
}

/// Expand a single row.
pub async fn expand_one<T: Expandable>(pool: &DbPool, row: T) -> AppResult<T::Response> {
    let owner_id = row.owner_id();
    let profile = UserRepo::find_profile(pool, owner_id)
        .await?
        .ok_or_else(|| missing_owner(owner_id))?;
    Ok(row.with_owner(profile))
}

/// Expand a page of rows, preserving their order.
pub async fn expand_all<T: Expandable>(pool: &DbPool, rows: Vec<T>) -> AppResult<Vec<T::Response>> {
    let mut ids: Vec<DbId> = rows.iter().map(Expandable::owner_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let profiles: HashMap<DbId, UserProfile> = UserRepo::find_profiles(pool, &ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    rows.into_iter()
        .map(|row| {
            let owner_id = row.owner_id();
            let profile = profiles
                .get(&owner_id)
                .cloned()
                .ok_or_else(|| missing_owner(owner_id))?;
            Ok(row.with_owner(profile))
        })
        .collect()
}

fn missing_owner(user_id: DbId) -> AppError {
    AppError::Core(CoreError::Internal(format!("owner profile {user_id} missing")))
}
