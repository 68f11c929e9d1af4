mod controller;
mod dto;
pub mod handlers;

pub use controller::{Session, View};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
