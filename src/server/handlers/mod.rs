pub mod payment_methods;
pub mod payments;
pub mod routes;
