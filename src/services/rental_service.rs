use crate::entities::{
    car_entity as cars, payment_entity as payments, payment_status_entity as payment_statuses,
    rental_entity as rentals, user_entity as users, PaymentStatusName,
};
use crate::error::{AppError, AppResult};
use crate::external::TelegramService;
use crate::models::{CreateRentalRequest, PaginatedResponse, RentalQuery, RentalResponse};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct RentalService {
    pool: DatabaseConnection,
    telegram_service: TelegramService,
}

impl RentalService {
    pub fn new(pool: DatabaseConnection, telegram_service: TelegramService) -> Self {
        Self {
            pool,
            telegram_service,
        }
    }

    /// Books a car for [rental_date, return_date). The car row is locked for
    /// the duration of the availability check so two requests cannot both
    /// claim the last unit.
    pub async fn create_rental(
        &self,
        user_id: i64,
        req: CreateRentalRequest,
    ) -> AppResult<RentalResponse> {
        if req.rental_date >= req.return_date {
            return Err(AppError::ValidationError(
                "Return date must be after rental date".into(),
            ));
        }

        let txn = self.pool.begin().await?;
        let user = super::require_user(&txn, user_id).await?;

        let pending = pending_payment_count(&txn, user_id).await?;
        if pending > 0 {
            txn.rollback().await?;
            return Err(AppError::RentalError(
                "User already has an unpaid pending payment".into(),
            ));
        }

        let car = cars::Entity::find_by_id(req.car_id)
            .filter(cars::Column::IsDeleted.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car {} not found", req.car_id)))?;

        let active_rentals = rentals::Entity::find()
            .filter(rentals::Column::CarId.eq(car.id))
            .filter(rentals::Column::IsDeleted.eq(false))
            .filter(rentals::Column::ActualReturnDate.is_null())
            .all(&txn)
            .await?;
        let overlapping = active_rentals
            .iter()
            .filter(|r| {
                intervals_overlap(r.rental_date, r.return_date, req.rental_date, req.return_date)
            })
            .count() as i64;

        if units_available(car.available_units, overlapping) <= 0 {
            txn.rollback().await?;
            return Err(AppError::RentalError(
                "No cars available for the requested period".into(),
            ));
        }

        let rental = rentals::ActiveModel {
            rental_date: Set(req.rental_date),
            return_date: Set(req.return_date),
            car_id: Set(car.id),
            user_id: Set(user.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        // notification failures must not fail the booking
        let message = format!(
            "New rental #{}: {} {} for {} from {} to {}",
            rental.id,
            car.brand,
            car.model,
            user.email,
            rental.rental_date.format("%Y-%m-%d %H:%M"),
            rental.return_date.format("%Y-%m-%d %H:%M"),
        );
        if let Err(e) = self.telegram_service.send_message(&message).await {
            log::error!("Failed to send rental notification: {e:?}");
        }

        Ok(RentalResponse::from_parts(rental, &car, &user))
    }

    pub async fn get_rentals(
        &self,
        caller_id: i64,
        query: &RentalQuery,
    ) -> AppResult<PaginatedResponse<RentalResponse>> {
        let caller_is_manager = super::is_manager(&self.pool, caller_id).await?;
        let target_user_id = match query.user_id {
            Some(user_id) => {
                if !caller_is_manager {
                    return Err(AppError::PermissionDenied(
                        "Only managers can view other users' rentals".into(),
                    ));
                }
                user_id
            }
            None => caller_id,
        };

        let mut find = rentals::Entity::find()
            .filter(rentals::Column::UserId.eq(target_user_id))
            .filter(rentals::Column::IsDeleted.eq(false))
            .order_by_asc(rentals::Column::Id);
        if let Some(is_active) = query.is_active {
            find = if is_active {
                find.filter(rentals::Column::ActualReturnDate.is_null())
            } else {
                find.filter(rentals::Column::ActualReturnDate.is_not_null())
            };
        }

        let params = query.pagination();
        let total = find.clone().count(&self.pool).await? as i64;
        let rows = find
            .find_also_related(cars::Entity)
            .offset(params.offset() as u64)
            .limit(params.limit() as u64)
            .all(&self.pool)
            .await?;

        let user = super::require_user(&self.pool, target_user_id).await?;
        let mut data = Vec::with_capacity(rows.len());
        for (rental, car) in rows {
            let car = car.ok_or_else(|| AppError::InternalError("Rental has no car row".into()))?;
            data.push(RentalResponse::from_parts(rental, &car, &user));
        }
        Ok(PaginatedResponse::new(data, &params, total))
    }

    pub async fn get_rental(&self, caller_id: i64, rental_id: i64) -> AppResult<RentalResponse> {
        let (rental, car, user) = self.load_rental(rental_id).await?;
        if rental.user_id != caller_id && !super::is_manager(&self.pool, caller_id).await? {
            return Err(AppError::PermissionDenied(
                "Only the renter or a manager can view this rental".into(),
            ));
        }
        Ok(RentalResponse::from_parts(rental, &car, &user))
    }

    /// Ends an active rental. Availability is overlap-counted, so stamping
    /// `actual_return_date` is what frees the unit; `available_units` itself
    /// stays untouched.
    pub async fn return_rental(&self, caller_id: i64, rental_id: i64) -> AppResult<RentalResponse> {
        let txn = self.pool.begin().await?;

        let rental = rentals::Entity::find_by_id(rental_id)
            .filter(rentals::Column::IsDeleted.eq(false))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental {rental_id} not found")))?;

        if rental.user_id != caller_id && !super::is_manager(&txn, caller_id).await? {
            txn.rollback().await?;
            return Err(AppError::PermissionDenied(
                "Only the renter or a manager can return this rental".into(),
            ));
        }
        if let Err(e) = ensure_not_returned(&rental) {
            txn.rollback().await?;
            return Err(e);
        }

        let car = cars::Entity::find_by_id(rental.car_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::InternalError("Rental has no car row".into()))?;
        let user = super::require_user(&txn, rental.user_id).await?;

        let mut rental_am = rental.into_active_model();
        rental_am.actual_return_date = Set(Some(Utc::now()));
        let rental = rental_am.update(&txn).await?;
        txn.commit().await?;

        log::info!("Rental {rental_id} returned by user {caller_id}");
        Ok(RentalResponse::from_parts(rental, &car, &user))
    }

    /// Sends one message per overdue rental, or a single all-clear message.
    pub async fn notify_overdue_rentals(&self) -> AppResult<usize> {
        let now = Utc::now();
        let overdue = self.find_overdue_rentals(now).await?;

        if overdue.is_empty() {
            self.telegram_service
                .send_message("No rentals overdue today!")
                .await?;
            return Ok(0);
        }

        let count = overdue.len();
        for (rental, car, user) in overdue {
            let message = format!(
                "Overdue rental #{}: {} {} rented by {} was due back on {}",
                rental.id,
                car.brand,
                car.model,
                user.email,
                rental.return_date.format("%Y-%m-%d %H:%M"),
            );
            if let Err(e) = self.telegram_service.send_message(&message).await {
                log::error!("Failed to send overdue notification for rental {}: {e:?}", rental.id);
            }
        }
        Ok(count)
    }

    async fn find_overdue_rentals(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<(rentals::Model, cars::Model, users::Model)>> {
        let rows = rentals::Entity::find()
            .filter(rentals::Column::IsDeleted.eq(false))
            .filter(rentals::Column::ActualReturnDate.is_null())
            .filter(rentals::Column::ReturnDate.lte(now))
            .order_by_asc(rentals::Column::ReturnDate)
            .find_also_related(cars::Entity)
            .all(&self.pool)
            .await?;

        let mut overdue = Vec::with_capacity(rows.len());
        for (rental, car) in rows {
            let car = car.ok_or_else(|| AppError::InternalError("Rental has no car row".into()))?;
            let user = super::require_user(&self.pool, rental.user_id).await?;
            overdue.push((rental, car, user));
        }
        Ok(overdue)
    }

    async fn load_rental(
        &self,
        rental_id: i64,
    ) -> AppResult<(rentals::Model, cars::Model, users::Model)> {
        let (rental, car) = rentals::Entity::find_by_id(rental_id)
            .filter(rentals::Column::IsDeleted.eq(false))
            .find_also_related(cars::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental {rental_id} not found")))?;
        let car = car.ok_or_else(|| AppError::InternalError("Rental has no car row".into()))?;
        let user = super::require_user(&self.pool, rental.user_id).await?;
        Ok((rental, car, user))
    }
}

/// Counts PENDING payments attached to any of the user's rentals.
pub(crate) async fn pending_payment_count(
    db: &impl sea_orm::ConnectionTrait,
    user_id: i64,
) -> AppResult<u64> {
    let count = payments::Entity::find()
        .join(JoinType::InnerJoin, payments::Relation::Rental.def())
        .join(JoinType::InnerJoin, payments::Relation::Status.def())
        .filter(rentals::Column::UserId.eq(user_id))
        .filter(payments::Column::IsDeleted.eq(false))
        .filter(payment_statuses::Column::Name.eq(PaymentStatusName::Pending))
        .count(db)
        .await?;
    Ok(count)
}

/// Strict overlap between half-open periods [a_start, a_end) and
/// [b_start, b_end): touching intervals do not conflict, so back-to-back
/// bookings of the same unit are allowed.
pub(crate) fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Units free for a requested period: fleet size minus active rentals that
/// overlap it. A returned rental leaves the overlap count the moment its
/// `actual_return_date` is set, which is why returning never writes to
/// `available_units`.
pub(crate) fn units_available(available_units: i32, overlapping: i64) -> i64 {
    i64::from(available_units) - overlapping
}

fn ensure_not_returned(rental: &rentals::Model) -> AppResult<()> {
    if rental.actual_return_date.is_some() {
        return Err(AppError::RentalError(
            "Rental has already been returned".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, d, 10, 0, 0).unwrap()
    }

    fn rental_model(actual_return_date: Option<DateTime<Utc>>) -> rentals::Model {
        rentals::Model {
            id: 1,
            user_id: 1,
            car_id: 1,
            rental_date: day(1),
            return_date: day(5),
            actual_return_date,
            is_deleted: false,
            created_at: None,
        }
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        assert!(!intervals_overlap(day(1), day(5), day(5), day(9)));
        assert!(!intervals_overlap(day(5), day(9), day(1), day(5)));
    }

    #[test]
    fn overlapping_intervals_are_detected() {
        assert!(intervals_overlap(day(1), day(5), day(4), day(9)));
        assert!(intervals_overlap(day(1), day(9), day(3), day(4)));
        assert!(intervals_overlap(day(3), day(4), day(1), day(9)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!intervals_overlap(day(1), day(3), day(6), day(9)));
    }

    #[test]
    fn last_unit_blocks_until_the_active_rental_ends() {
        // one-unit car, one active rental covering the requested period
        assert!(units_available(1, 1) <= 0);
        // after the return that rental stops counting; the fleet size itself
        // is unchanged, so exactly one unit is free again, not two
        assert!(units_available(1, 0) > 0);
        assert_eq!(units_available(1, 0), 1);
    }

    #[test]
    fn second_return_is_rejected() {
        let active = rental_model(None);
        assert!(ensure_not_returned(&active).is_ok());

        let returned = rental_model(Some(day(5)));
        assert!(ensure_not_returned(&returned).is_err());
    }
}
