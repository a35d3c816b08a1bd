use std::env;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_MERCHANT_DISPLAY_NAME: &str = "TaxiLuxe";
pub const DEFAULT_CURRENCY: &str = "eur";

#[derive(Clone, Debug)]
pub struct GoogleMapsConfig {
    pub api_base: String,
    pub api_key: String,
}

#[derive(Clone, Debug)]
pub struct StripeConfig {
    pub api_base: String,
    pub secret_key: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub google_maps: GoogleMapsConfig,
    pub stripe: StripeConfig,
}

/// Settings for the booking client, which never sees server-side secrets.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub stripe_api_base: String,
    pub stripe_publishable_key: String,
    pub test_payment_method: String,
    pub merchant_display_name: String,
    pub currency: String,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(port) => port.parse().unwrap_or(DEFAULT_PORT),
            Err(_) => DEFAULT_PORT,
        };

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(5);

        Ok(Self {
            port,
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections,
            google_maps: GoogleMapsConfig {
                api_base: var_or("GOOGLE_MAPS_API_BASE", "https://maps.googleapis.com"),
                api_key: env::var("GOOGLE_MAPS_API_KEY")?,
            },
            stripe: StripeConfig {
                api_base: var_or("STRIPE_API_BASE", "https://api.stripe.com"),
                secret_key: env::var("STRIPE_SECRET_KEY")?,
            },
        })
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Ok(Self {
            api_url: var_or("TAXILUXE_API_URL", "http://localhost:4000"),
            stripe_api_base: var_or("STRIPE_API_BASE", "https://api.stripe.com"),
            stripe_publishable_key: env::var("STRIPE_PUBLISHABLE_KEY")?,
            test_payment_method: var_or("STRIPE_TEST_PAYMENT_METHOD", "pm_card_visa"),
            merchant_display_name: var_or("MERCHANT_DISPLAY_NAME", DEFAULT_MERCHANT_DISPLAY_NAME),
            currency: var_or("CURRENCY", DEFAULT_CURRENCY),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.into())
}
