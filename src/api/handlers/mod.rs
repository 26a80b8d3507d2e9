//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod contact;
pub mod health;
pub mod login;
pub mod user;

pub use contact::{
    create_contact_handler, delete_contacts_handler, list_contacts_handler,
    update_contact_handler,
};
pub use health::health_handler;
pub use login::login_handler;
pub use user::{confirm_handler, details_handler, register_handler, update_details_handler};
