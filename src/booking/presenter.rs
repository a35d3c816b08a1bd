use async_trait::async_trait;

/// Result of showing the sheet to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SheetOutcome {
    Confirmed,
    Canceled,
    Failed(String),
}

/// Terminal outcome of a payment attempt as seen by the booking flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Confirmed,
    UserCanceled,
    Failed(String),
}

/// The payment processor's on-device confirmation UI.
///
/// Two steps: `initialize` binds a session to a client secret, `present`
/// shows it. `present` must not be called after a failed `initialize`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentSheet: Send + Sync {
    async fn initialize(&self, client_secret: &str, merchant_display_name: &str)
        -> Result<(), String>;

    async fn present(&self) -> SheetOutcome;
}

/// Runs both steps of the sheet protocol for one client secret.
#[tracing::instrument(skip(sheet, client_secret))]
pub async fn present_payment(
    sheet: &dyn PaymentSheet,
    client_secret: &str,
    merchant_display_name: &str,
) -> PaymentOutcome {
    if let Err(reason) = sheet.initialize(client_secret, merchant_display_name).await {
        tracing::warn!(%reason, "payment sheet initialization failed");
        return PaymentOutcome::Failed(reason);
    }

    match sheet.present().await {
        SheetOutcome::Confirmed => PaymentOutcome::Confirmed,
        SheetOutcome::Canceled => {
            tracing::info!("payment sheet dismissed by user");
            PaymentOutcome::UserCanceled
        }
        SheetOutcome::Failed(reason) => {
            tracing::warn!(%reason, "payment failed");
            PaymentOutcome::Failed(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_initialization_never_presents() {
        let mut sheet = MockPaymentSheet::new();
        sheet
            .expect_initialize()
            .times(1)
            .returning(|_, _| Err("No such payment_intent".into()));
        sheet.expect_present().never();

        let outcome = present_payment(&sheet, "pi_1_secret_2", "TaxiLuxe").await;

        assert_eq!(outcome, PaymentOutcome::Failed("No such payment_intent".into()));
    }

    #[tokio::test]
    async fn maps_each_sheet_outcome() {
        let cases = [
            (SheetOutcome::Confirmed, PaymentOutcome::Confirmed),
            (SheetOutcome::Canceled, PaymentOutcome::UserCanceled),
            (
                SheetOutcome::Failed("Your card was declined.".into()),
                PaymentOutcome::Failed("Your card was declined.".into()),
            ),
        ];

        for (sheet_outcome, expected) in cases {
            let mut sheet = MockPaymentSheet::new();
            sheet
                .expect_initialize()
                .withf(|secret, merchant| secret == "pi_1_secret_2" && merchant == "TaxiLuxe")
                .returning(|_, _| Ok(()));
            sheet
                .expect_present()
                .return_const(sheet_outcome);

            let outcome = present_payment(&sheet, "pi_1_secret_2", "TaxiLuxe").await;

            assert_eq!(outcome, expected);
        }
    }
}
