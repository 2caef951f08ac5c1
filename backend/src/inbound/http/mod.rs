//! HTTP inbound adapter exposing the forum's JSON API.

pub mod categories;
pub mod error;
pub mod favorites;
pub mod health;
pub mod ratings;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod topics;
pub mod topics_dto;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Fixed segments such as `/categories/manage` are registered ahead of the
/// `{category_id}` routes they would otherwise be captured by.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::my_favorites)
        .service(topics::list_topics)
        .service(topics::create_topic)
        .service(topics::edit_topic_form)
        .service(topics::confirm_topic_deletion)
        .service(topics::get_topic)
        .service(topics::update_topic)
        .service(topics::delete_topic)
        .service(topics::move_topic)
        .service(topics::post_comment)
        .service(ratings::rate_topic)
        .service(favorites::toggle_favorite)
        .service(categories::list_categories)
        .service(categories::create_category)
        .service(categories::manage_categories)
        .service(categories::get_category)
        .service(categories::update_category)
        .service(categories::delete_category);
}
