mod fare;
mod location;
mod payment;
mod payment_method;
mod quote;
mod route;

pub use fare::{compute_fare, default_extras, Extra, RATE_PER_KM};
pub use location::Coordinates;
pub use payment::{PaymentIntent, PaymentIntentRecord, ProcessorIntent};
pub use payment_method::{PaymentMethod, PaymentSheetSetup};
pub use quote::{parse_distance_km, Quote};
pub use route::{Leg, RouteSummary};
