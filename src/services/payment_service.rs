use crate::entities::{
    car_entity as cars, payment_entity as payments, payment_status_entity as payment_statuses,
    payment_type_entity as payment_types, rental_entity as rentals, PaymentStatusName,
    PaymentTypeName,
};
use crate::error::{AppError, AppResult};
use crate::external::StripeService;
use crate::models::{PaginatedResponse, PaymentQuery, PaymentResponse, PaymentUrlResponse};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

/// Fraction of the daily rate charged per overdue day (0.50).
const FINE_DAILY_MULTIPLIER: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    stripe_service: StripeService,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection, stripe_service: StripeService) -> Self {
        Self {
            pool,
            stripe_service,
        }
    }

    /// Opens a checkout session for a returned rental and records the
    /// payment as PENDING.
    pub async fn create_session(
        &self,
        caller_id: i64,
        rental_id: i64,
    ) -> AppResult<PaymentUrlResponse> {
        let (rental, car) = rentals::Entity::find_by_id(rental_id)
            .filter(rentals::Column::IsDeleted.eq(false))
            .find_also_related(cars::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental {rental_id} not found")))?;
        let car = car.ok_or_else(|| AppError::InternalError("Rental has no car row".into()))?;

        let actual_return_date = rental.actual_return_date.ok_or_else(|| {
            AppError::PaymentError("Car must be returned before payment".into())
        })?;
        if rental.user_id != caller_id && !super::is_manager(&self.pool, caller_id).await? {
            return Err(AppError::PermissionDenied(
                "Only the renter or a manager can pay for this rental".into(),
            ));
        }

        let (amount, payment_type) = compute_amount(
            car.daily_price,
            rental.rental_date,
            rental.return_date,
            actual_return_date,
        );
        let amount_in_cents = to_minor_units(amount)?;

        let session = self
            .stripe_service
            .create_checkout_session(rental.id, amount_in_cents)
            .await?;

        let status_id = self.status_id(PaymentStatusName::Pending).await?;
        let type_id = self.type_id(payment_type).await?;
        let payment = payments::ActiveModel {
            status_id: Set(status_id),
            type_id: Set(type_id),
            rental_id: Set(rental.id),
            session_url: Set(Some(session.url.clone())),
            session_id: Set(Some(session.id)),
            amount_to_pay: Set(amount),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Opened {payment_type} session for rental {} (payment {})",
            rental.id,
            payment.id
        );
        Ok(PaymentUrlResponse {
            payment_id: payment.id,
            session_url: session.url,
        })
    }

    /// Managers may list anyone's payments. Everyone else sees only their
    /// own regardless of the filter they send.
    pub async fn get_payments(
        &self,
        caller_id: i64,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let caller_is_manager = super::is_manager(&self.pool, caller_id).await?;
        let target_user_id = if caller_is_manager {
            query.user_id
        } else {
            Some(caller_id)
        };

        let mut find = payments::Entity::find()
            .filter(payments::Column::IsDeleted.eq(false))
            .order_by_asc(payments::Column::Id);
        if let Some(user_id) = target_user_id {
            find = find
                .join(JoinType::InnerJoin, payments::Relation::Rental.def())
                .filter(rentals::Column::UserId.eq(user_id));
        }

        let params = query.pagination();
        let total = find.clone().count(&self.pool).await? as i64;
        let rows = find
            .offset(params.offset() as u64)
            .limit(params.limit() as u64)
            .all(&self.pool)
            .await?;

        let mut data = Vec::with_capacity(rows.len());
        for payment in rows {
            data.push(self.to_response(payment).await?);
        }
        Ok(PaginatedResponse::new(data, &params, total))
    }

    /// Stripe success redirect. Marks the payment PAID.
    pub async fn handle_success(&self, payment_id: i64) -> AppResult<PaymentResponse> {
        let payment = payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::IsDeleted.eq(false))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment {payment_id} not found")))?;

        let paid_id = self.status_id(PaymentStatusName::Paid).await?;
        let payment = if payment.status_id == paid_id {
            payment
        } else {
            let mut am = payment.into_active_model();
            am.status_id = Set(paid_id);
            am.update(&self.pool).await?
        };
        log::info!("Payment {payment_id} marked as paid");
        self.to_response(payment).await
    }

    async fn to_response(&self, payment: payments::Model) -> AppResult<PaymentResponse> {
        let status = payment_statuses::Entity::find_by_id(payment.status_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("Payment has no status row".into()))?;
        let payment_type = payment_types::Entity::find_by_id(payment.type_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("Payment has no type row".into()))?;
        let (rental, car) = rentals::Entity::find_by_id(payment.rental_id)
            .find_also_related(cars::Entity)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError("Payment has no rental row".into()))?;
        let car = car.ok_or_else(|| AppError::InternalError("Rental has no car row".into()))?;
        Ok(PaymentResponse::from_parts(
            payment,
            status.name,
            payment_type.name,
            &rental,
            &car,
        ))
    }

    async fn status_id(&self, name: PaymentStatusName) -> AppResult<i64> {
        let row = payment_statuses::Entity::find()
            .filter(payment_statuses::Column::Name.eq(name))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Payment status {name} is not seeded")))?;
        Ok(row.id)
    }

    async fn type_id(&self, name: PaymentTypeName) -> AppResult<i64> {
        let row = payment_types::Entity::find()
            .filter(payment_types::Column::Name.eq(name))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Payment type {name} is not seeded")))?;
        Ok(row.id)
    }
}

/// Calendar-day difference on date components only; time of day is ignored.
fn whole_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to.date_naive() - from.date_naive()).num_days()
}

/// Amount owed for a finished rental. Late returns pay the base price plus
/// half the daily rate for every overdue day, and the payment becomes a FINE.
pub fn compute_amount(
    daily_price: Decimal,
    rental_date: DateTime<Utc>,
    return_date: DateTime<Utc>,
    actual_return_date: DateTime<Utc>,
) -> (Decimal, PaymentTypeName) {
    let rental_days = Decimal::from(whole_days(rental_date, return_date));
    let base_amount = daily_price * rental_days;

    // overdue is judged on date components, like the day arithmetic itself
    let overdue_days = whole_days(return_date, actual_return_date);
    if overdue_days > 0 {
        let fine = daily_price * Decimal::from(overdue_days) * FINE_DAILY_MULTIPLIER;
        (base_amount + fine, PaymentTypeName::Fine)
    } else {
        (base_amount, PaymentTypeName::Payment)
    }
}

/// Exact conversion to the gateway's minor units (cents). Amounts that do
/// not land on a whole cent are refused rather than rounded.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    let cents = amount * Decimal::from(100);
    if !cents.fract().is_zero() {
        return Err(AppError::PaymentError(format!(
            "Amount {amount} cannot be represented exactly in cents"
        )));
    }
    cents.trunc().to_i64().ok_or_else(|| {
        AppError::PaymentError(format!("Amount {amount} is out of range for the gateway"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn on_time_return_pays_daily_price_times_days() {
        let (amount, payment_type) = compute_amount(
            dec!(10),
            at(2025, 9, 1, 10),
            at(2025, 9, 5, 10),
            at(2025, 9, 5, 9),
        );
        assert_eq!(amount, dec!(40));
        assert_eq!(payment_type, PaymentTypeName::Payment);
    }

    #[test]
    fn late_return_adds_half_rate_per_overdue_day() {
        // 4 days at 10 plus 2 overdue days at 5 = 50
        let (amount, payment_type) = compute_amount(
            dec!(10),
            at(2025, 9, 1, 10),
            at(2025, 9, 5, 10),
            at(2025, 9, 7, 10),
        );
        assert_eq!(amount, dec!(50));
        assert_eq!(payment_type, PaymentTypeName::Fine);
    }

    #[test]
    fn day_difference_ignores_time_of_day() {
        // returned late in the evening of the scheduled day: not overdue
        let (amount, payment_type) = compute_amount(
            dec!(25.50),
            at(2025, 9, 1, 8),
            at(2025, 9, 3, 8),
            at(2025, 9, 3, 23),
        );
        assert_eq!(amount, dec!(51.00));
        assert_eq!(payment_type, PaymentTypeName::Payment);
    }

    #[test]
    fn fractional_daily_prices_produce_exact_totals() {
        let (amount, payment_type) = compute_amount(
            dec!(19.99),
            at(2025, 9, 1, 10),
            at(2025, 9, 4, 10),
            at(2025, 9, 6, 10),
        );
        assert_eq!(amount, dec!(59.97) + dec!(19.99));
        assert_eq!(payment_type, PaymentTypeName::Fine);
    }

    #[test]
    fn converts_whole_cent_amounts_exactly() {
        assert_eq!(to_minor_units(dec!(50)).unwrap(), 5000);
        assert_eq!(to_minor_units(dec!(49.90)).unwrap(), 4990);
        assert_eq!(to_minor_units(dec!(0.01)).unwrap(), 1);
    }

    #[test]
    fn rejects_sub_cent_amounts() {
        assert!(to_minor_units(dec!(10.005)).is_err());
        assert!(to_minor_units(dec!(0.001)).is_err());
    }
}
