pub mod analytics_routes;
pub mod auth_routes;
pub mod lot_routes;
pub mod reservation_routes;
pub mod spot_routes;
