//! HTTP surface.
//!
//! | Method | Path                      | Handler                 |
//! |--------|---------------------------|-------------------------|
//! | POST   | `/api/satellite`          | orchestrated imagery    |
//! | GET    | `/api/layers`             | layer registry          |
//! | GET    | `/api/cache/stats`        | imagery and cache stats |
//! | GET    | `/api/weather`            | weather passthrough     |
//! | GET    | `/api/geocode`            | geocoding passthrough   |
//! | GET    | `/api/preferences/:id`    | read preferences        |
//! | POST   | `/api/preferences/:id`    | merge preferences       |
//!
//! Every failure answers `500 {"error", "details"}`.

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::{build_router, ImageryResponse, LayerSummary, StatsResponse};
pub use state::AppState;
