//! Client-side ride booking: quote a pickup/dropoff pair, price it, create a
//! payment intent and confirm it through the payment sheet.

mod history;
mod presenter;

pub use history::HistoryView;
pub use presenter::{present_payment, PaymentOutcome, PaymentSheet, SheetOutcome};

#[cfg(test)]
pub use presenter::MockPaymentSheet;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    api::DynBookingAPI,
    entities::{compute_fare, default_extras, Extra, Quote},
    error::{invalid_state_error, missing_input_error, unknown_extra_error, Error},
};

#[derive(Clone, Debug, PartialEq)]
pub enum BookingState {
    Idle,
    AddressEntered,
    Quoting,
    Quoted,
    AmountConfirmed,
    PaymentPending,
    PaymentSucceeded,
    PaymentFailed(String),
    PaymentCanceled,
}

impl BookingState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::PaymentSucceeded | Self::PaymentFailed(_) | Self::PaymentCanceled
        )
    }
}

/// One booking attempt at a time. Every failure is kept in `last_error` for
/// display and leaves the flow in a state from which the user can continue.
pub struct RideBookingFlow {
    api: DynBookingAPI,
    sheet: Arc<dyn PaymentSheet>,
    merchant_display_name: String,
    currency: String,
    attempt: Uuid,
    state: BookingState,
    pickup: String,
    dropoff: String,
    quote: Option<Quote>,
    extras: Vec<Extra>,
    amount: Option<i64>,
    intent_id: Option<String>,
    last_error: Option<Error>,
}

impl RideBookingFlow {
    pub fn new(
        api: DynBookingAPI,
        sheet: Arc<dyn PaymentSheet>,
        merchant_display_name: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            api,
            sheet,
            merchant_display_name: merchant_display_name.into(),
            currency: currency.into(),
            attempt: Uuid::new_v4(),
            state: BookingState::Idle,
            pickup: String::new(),
            dropoff: String::new(),
            quote: None,
            extras: default_extras(),
            amount: None,
            intent_id: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn extras(&self) -> &[Extra] {
        &self.extras
    }

    pub fn amount(&self) -> Option<i64> {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Id of the payment intent created by this attempt, if any.
    pub fn intent_id(&self) -> Option<&str> {
        self.intent_id.as_deref()
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    fn fail(&mut self, state: BookingState, err: Error) -> Error {
        tracing::warn!(attempt = %self.attempt, code = err.code, message = %err.message, "booking step failed");
        self.state = state;
        self.last_error = Some(err.clone());
        err
    }

    /// Sets pickup and dropoff, dropping any quote for the previous pair.
    #[tracing::instrument(skip(self), fields(attempt = %self.attempt))]
    pub fn enter_addresses(&mut self, pickup: &str, dropoff: &str) -> Result<(), Error> {
        if self.state.is_terminal() || self.state == BookingState::PaymentPending {
            return Err(invalid_state_error());
        }

        self.pickup = pickup.trim().into();
        self.dropoff = dropoff.trim().into();
        self.quote = None;
        self.amount = None;
        self.last_error = None;

        if self.pickup.is_empty() || self.dropoff.is_empty() {
            return Err(self.fail(
                BookingState::Idle,
                missing_input_error("pickup and dropoff addresses"),
            ));
        }

        self.state = BookingState::AddressEntered;
        Ok(())
    }

    /// Quotes the entered addresses. Any failure returns the flow to `Idle`;
    /// nothing is retried.
    #[tracing::instrument(skip(self), fields(attempt = %self.attempt))]
    pub async fn request_quote(&mut self) -> Result<&Quote, Error> {
        if !matches!(self.state, BookingState::Idle | BookingState::AddressEntered) {
            return Err(invalid_state_error());
        }

        if self.pickup.is_empty() || self.dropoff.is_empty() {
            return Err(self.fail(
                BookingState::Idle,
                missing_input_error("pickup and dropoff addresses"),
            ));
        }

        self.state = BookingState::Quoting;
        self.last_error = None;

        let result = self.api.create_quote(&self.pickup, &self.dropoff).await;

        match result {
            Ok(quote) => {
                self.state = BookingState::Quoted;
                let quote = self.quote.insert(quote);
                Ok(&*quote)
            }
            Err(err) => Err(self.fail(BookingState::Idle, err)),
        }
    }

    /// Flips an optional extra on or off while the quote is displayed.
    pub fn toggle_extra(&mut self, index: usize) -> Result<(), Error> {
        if self.state != BookingState::Quoted {
            return Err(invalid_state_error());
        }

        let extra = self
            .extras
            .get_mut(index)
            .ok_or_else(|| unknown_extra_error(index))?;
        extra.selected = !extra.selected;

        Ok(())
    }

    /// Prices the quote with the selected extras, in minor currency units.
    #[tracing::instrument(skip(self), fields(attempt = %self.attempt))]
    pub fn confirm_amount(&mut self) -> Result<i64, Error> {
        let quote = match (&self.state, &self.quote) {
            (BookingState::Quoted, Some(quote)) => quote,
            _ => return Err(invalid_state_error()),
        };

        let amount = compute_fare(quote.distance_km, &self.extras);

        tracing::info!(amount, currency = %self.currency, "amount confirmed");

        self.amount = Some(amount);
        self.state = BookingState::AmountConfirmed;

        Ok(amount)
    }

    /// Creates the payment intent and runs the payment sheet.
    ///
    /// If the intent cannot be created the flow stays at `AmountConfirmed`.
    /// Once it exists the outcome is terminal; a failed or canceled payment
    /// leaves its history record as the processor last reported it.
    #[tracing::instrument(skip(self), fields(attempt = %self.attempt))]
    pub async fn pay(&mut self) -> Result<PaymentOutcome, Error> {
        let amount = match (&self.state, self.amount) {
            (BookingState::AmountConfirmed, Some(amount)) => amount,
            _ => return Err(invalid_state_error()),
        };

        self.state = BookingState::PaymentPending;
        self.last_error = None;

        let result = self.api.create_payment_intent(amount, &self.currency).await;

        let intent = match result {
            Ok(intent) => intent,
            Err(err) => return Err(self.fail(BookingState::AmountConfirmed, err)),
        };

        self.intent_id = Some(intent.intent_id.clone());

        let outcome = present_payment(
            self.sheet.as_ref(),
            &intent.client_secret,
            &self.merchant_display_name,
        )
        .await;

        self.state = match &outcome {
            PaymentOutcome::Confirmed => BookingState::PaymentSucceeded,
            PaymentOutcome::UserCanceled => BookingState::PaymentCanceled,
            PaymentOutcome::Failed(reason) => BookingState::PaymentFailed(reason.clone()),
        };

        tracing::info!(intent_id = %intent.intent_id, state = ?self.state, "payment finished");

        Ok(outcome)
    }

    /// Starts over from `Idle`, from any state.
    ///
    /// `Quoting` and `PaymentPending` are only observable here when the
    /// future of `request_quote` or `pay` was dropped before it finished.
    /// An intent created by an abandoned `pay` stays in the history.
    pub fn restart(&mut self) {
        if matches!(self.state, BookingState::Quoting | BookingState::PaymentPending) {
            tracing::warn!(attempt = %self.attempt, state = ?self.state, "abandoning interrupted attempt");
        }

        self.attempt = Uuid::new_v4();
        self.state = BookingState::Idle;
        self.pickup.clear();
        self.dropoff.clear();
        self.quote = None;
        self.extras = default_extras();
        self.amount = None;
        self.intent_id = None;
        self.last_error = None;
    }
}
