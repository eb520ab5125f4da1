//! Reusable UI components.

pub mod private_route;
pub mod user_admin_panel;
