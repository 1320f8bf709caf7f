//! InsightDeck HTTP service: router and shared state.

pub mod routes;
pub mod state;
