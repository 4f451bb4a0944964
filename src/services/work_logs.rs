//! Work log use cases: role checks on top of the store, each mutation
//! returning the events it raised.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::User;
use crate::models::work_log::{NewWorkLog, ReviewPatch, WorkLog, WorkLogPatch};
use crate::services::events::{DomainEvent, Outcome};
use crate::services::query::{self, LogQuery};
use crate::store::{UserDirectory, WorkLogStore};

pub async fn submit(
    store: &dyn WorkLogStore,
    actor: &User,
    new_log: NewWorkLog,
) -> AppResult<Outcome<WorkLog>> {
    if actor.is_manager() || new_log.user_id != actor.id {
        return Err(AppError::Forbidden);
    }

    let log = store.create(new_log).await?;
    tracing::info!(
        log_id = %log.id,
        user_id = %log.user_id,
        date = %log.date,
        "Work log submitted"
    );

    let event = DomainEvent::LogSubmitted {
        log_id: log.id,
        owner_id: log.user_id,
        date: log.date,
    };
    Ok(Outcome::new(log, vec![event]))
}

/// Not-found and not-visible are indistinguishable to the caller.
pub async fn fetch_visible(
    store: &dyn WorkLogStore,
    actor: &User,
    id: Uuid,
) -> AppResult<WorkLog> {
    let log = store.get(id).await?;
    if !actor.can_view(log.user_id) {
        return Err(AppError::NotFound("Work log not found".into()));
    }
    Ok(log)
}

/// Developers are scoped to their own logs; asking for someone else's is
/// forbidden. Managers see everything the query admits.
pub async fn list_visible(
    store: &dyn WorkLogStore,
    actor: &User,
    mut query: LogQuery,
) -> AppResult<Vec<WorkLog>> {
    if !actor.is_manager() {
        match query.user_id {
            Some(id) if id != actor.id => return Err(AppError::Forbidden),
            _ => query.user_id = Some(actor.id),
        }
    }
    let logs = store.list(&query.filter()).await?;
    Ok(query::apply(logs, &query))
}

pub async fn edit(
    store: &dyn WorkLogStore,
    actor: &User,
    id: Uuid,
    patch: WorkLogPatch,
) -> AppResult<Outcome<WorkLog>> {
    let existing = fetch_visible(store, actor, id).await?;
    if existing.user_id != actor.id {
        return Err(AppError::Forbidden);
    }

    let log = store.update(id, patch).await?;
    tracing::info!(log_id = %log.id, "Work log updated");

    let event = DomainEvent::LogUpdated {
        log_id: log.id,
        owner_id: log.user_id,
    };
    Ok(Outcome::new(log, vec![event]))
}

/// Only a manager of the owner's team may review.
pub async fn review(
    store: &dyn WorkLogStore,
    users: &dyn UserDirectory,
    actor: &User,
    id: Uuid,
    reviewed: bool,
    notes: Option<String>,
) -> AppResult<Outcome<WorkLog>> {
    if !actor.is_manager() {
        return Err(AppError::Forbidden);
    }
    let existing = store.get(id).await?;
    let owner_team = users
        .get_user(existing.user_id)
        .await
        .and_then(|owner| owner.team_id);
    if owner_team.is_none() || owner_team != actor.team_id {
        tracing::warn!(
            log_id = %id,
            reviewer_id = %actor.id,
            "Review outside reviewer's team"
        );
        return Err(AppError::Forbidden);
    }

    let review = if reviewed {
        ReviewPatch::Reviewed {
            reviewer: actor.id,
            notes,
        }
    } else {
        ReviewPatch::Unreviewed
    };
    let log = store.update(id, WorkLogPatch::review(review)).await?;
    tracing::info!(log_id = %log.id, reviewed, "Work log review changed");

    let event = DomainEvent::LogReviewed {
        log_id: log.id,
        owner_id: log.user_id,
        reviewer_id: actor.id,
        reviewed,
    };
    Ok(Outcome::new(log, vec![event]))
}

pub async fn remove(
    store: &dyn WorkLogStore,
    actor: &User,
    id: Uuid,
) -> AppResult<Outcome<Uuid>> {
    let existing = fetch_visible(store, actor, id).await?;
    if existing.user_id != actor.id {
        return Err(AppError::Forbidden);
    }

    store.delete(id).await?;
    tracing::info!(log_id = %id, "Work log deleted");

    let event = DomainEvent::LogDeleted {
        log_id: id,
        owner_id: existing.user_id,
    };
    Ok(Outcome::new(id, vec![event]))
}
