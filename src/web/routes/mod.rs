pub mod check_routes;
pub mod settings_routes;
pub mod site_routes;
