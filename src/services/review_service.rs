use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    db::is_unique_violation,
    dto::reviews::{ReviewList, ReviewQuery, ReviewRequest, ReviewSubject, ValidReview},
    entity::{
        Orders,
        mitras::{self, Entity as Mitras},
        orders,
        reviews::{self, ActiveModel as ReviewActive, Entity as Reviews},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Review,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average: f64,
    pub count: i64,
}

/// Arithmetic mean and count; an empty set averages to 0.
pub fn summarize(ratings: &[i32]) -> RatingSummary {
    let count = ratings.len() as i64;
    let average = if count == 0 {
        0.0
    } else {
        ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / count as f64
    };
    RatingSummary { average, count }
}

/// Re-reads every review of the mitra and writes the aggregate back.
pub async fn recompute_mitra_rating<C: ConnectionTrait>(
    db: &C,
    mitra_id: Uuid,
) -> AppResult<RatingSummary> {
    let ratings: Vec<i32> = Reviews::find()
        .select_only()
        .column(reviews::Column::Rating)
        .filter(reviews::Column::MitraId.eq(mitra_id))
        .into_tuple()
        .all(db)
        .await?;
    let summary = summarize(&ratings);

    let mitra = Mitras::find_by_id(mitra_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound("Mitra"))?;
    let mut active: mitras::ActiveModel = mitra.into();
    active.rating = Set(summary.average);
    active.total_review = Set(summary.count as i32);
    active.updated_at = Set(Utc::now().into());
    active.update(db).await?;

    Ok(summary)
}

async fn check_subject(state: &AppState, user: &AuthUser, subject: ReviewSubject) -> AppResult<()> {
    match subject {
        ReviewSubject::Order(order_id) => {
            let order = Orders::find_by_id(order_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound("Order"))?;
            if order.user_id != user.user_id {
                return Err(AppError::Forbidden("You can only review your own orders".into()));
            }
        }
        ReviewSubject::Mitra(mitra_id) => {
            let mitra = Mitras::find_by_id(mitra_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound("Mitra"))?;
            if mitra.user_id == user.user_id {
                return Err(AppError::Forbidden("You cannot review your own business".into()));
            }
        }
    }
    Ok(())
}

fn subject_condition(subject: ReviewSubject) -> Condition {
    match subject {
        ReviewSubject::Order(id) => Condition::all().add(reviews::Column::OrderId.eq(id)),
        ReviewSubject::Mitra(id) => Condition::all().add(reviews::Column::MitraId.eq(id)),
    }
}

/// Inserts or replaces the caller's review of the subject. Returns whether a row was created.
async fn upsert_review(
    state: &AppState,
    user: &AuthUser,
    review: &ValidReview,
) -> AppResult<(reviews::Model, bool)> {
    let txn = state.orm.begin().await?;

    let existing = Reviews::find()
        .filter(subject_condition(review.subject))
        .filter(reviews::Column::UserId.eq(user.user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let now = Utc::now();
    let (saved, created) = match existing {
        Some(existing) => {
            let mut active: ReviewActive = existing.into();
            active.rating = Set(review.rating);
            active.comment = Set(review.comment.clone());
            active.updated_at = Set(now.into());
            (active.update(&txn).await?, false)
        }
        None => {
            let (order_id, mitra_id) = match review.subject {
                ReviewSubject::Order(id) => (Some(id), None),
                ReviewSubject::Mitra(id) => (None, Some(id)),
            };
            let active = ReviewActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                order_id: Set(order_id),
                mitra_id: Set(mitra_id),
                rating: Set(review.rating),
                comment: Set(review.comment.clone()),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            (active.insert(&txn).await?, true)
        }
    };

    if let ReviewSubject::Mitra(mitra_id) = review.subject {
        recompute_mitra_rating(&txn, mitra_id).await?;
    }

    txn.commit().await?;
    Ok((saved, created))
}

pub async fn submit_review(
    state: &AppState,
    user: &AuthUser,
    payload: ReviewRequest,
) -> AppResult<(bool, ApiResponse<Review>)> {
    let review = payload.validate()?;
    check_subject(state, user, review.subject).await?;

    // A concurrent first submission from the same user loses the insert race
    // on the unique index; the second pass finds the row and updates it.
    let (saved, created) = match upsert_review(state, user, &review).await {
        Err(AppError::OrmError(err)) if is_unique_violation(&err, "reviews_user") => {
            upsert_review(state, user, &review).await?
        }
        other => other?,
    };

    audit::record(
        state,
        user.user_id,
        if created { "review_create" } else { "review_update" },
        "reviews",
        serde_json::json!({ "review_id": saved.id, "rating": saved.rating }),
    )
    .await;

    let message = if created { "Review created" } else { "Review updated" };
    Ok((created, ApiResponse::success(message, Review::from(saved), Some(Meta::empty()))))
}

pub async fn delete_review(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let txn = state.orm.begin().await?;
    let review = Reviews::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Review"))?;
    if review.user_id != user.user_id {
        return Err(AppError::Forbidden("You can only delete your own reviews".into()));
    }

    Reviews::delete_by_id(review.id).exec(&txn).await?;
    if let Some(mitra_id) = review.mitra_id {
        recompute_mitra_rating(&txn, mitra_id).await?;
    }
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "review_delete",
        "reviews",
        serde_json::json!({ "review_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_reviews(
    state: &AppState,
    query: ReviewQuery,
) -> AppResult<ApiResponse<ReviewList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(mitra_id) = query.mitra_id {
        condition = condition.add(reviews::Column::MitraId.eq(mitra_id));
    }
    if let Some(order_id) = query.order_id {
        condition = condition.add(reviews::Column::OrderId.eq(order_id));
    }
    let mut finder = Reviews::find();
    if let Some(technician_id) = query.technician_id {
        finder = finder.inner_join(Orders);
        condition = condition.add(orders::Column::TechnicianId.eq(technician_id));
    }
    let finder = finder.filter(condition);

    let ratings: Vec<i32> = finder
        .clone()
        .select_only()
        .column(reviews::Column::Rating)
        .into_tuple()
        .all(&state.orm)
        .await?;
    let summary = summarize(&ratings);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .order_by_desc(reviews::Column::CreatedAt)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Review::from)
        .collect();

    Ok(ApiResponse::success(
        "Reviews",
        ReviewList {
            items,
            average_rating: summary.average,
            total_review: summary.count,
        },
        Some(Meta::new(page, limit, total)),
    ))
}
