use axum::{
    Router,
    routing::{get, post},
};

pub mod customers;
pub mod events;
pub mod subscriptions;
pub mod system;
pub mod users;

/// Endpoints reachable without a bearer token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/mutation/register", post(users::register))
        .route("/mutation/login", post(users::login))
}

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .merge(queries())
        .merge(mutations())
        .route("/subscription/:topic", get(subscriptions::subscribe))
}

fn queries() -> Router {
    Router::new()
        .route("/query/getUsers", post(users::get_users))
        .route("/query/getUser", post(users::get_user))
        .route("/query/getSelfCustomers", post(customers::get_self_customers))
        .route("/query/getOtherCustomers", post(customers::get_other_customers))
        .route("/query/getSelfEvent", post(events::get_self_events))
        .route("/query/getAllEvent", post(events::get_all_events))
        .route("/query/getSelfSelectedEvent", post(events::get_self_selected_events))
        .route("/query/getAllSelectedEvent", post(events::get_all_selected_events))
}

fn mutations() -> Router {
    Router::new()
        .route("/mutation/updateProfile", post(users::update_profile))
        .route("/mutation/changeUserLevel", post(users::change_user_level))
        .route("/mutation/deleteUser", post(users::delete_user))
        .route("/mutation/createNewCustomer", post(customers::create_customer))
        .route("/mutation/updateExistCustomer", post(customers::update_customer))
        .route("/mutation/deleteExistCustomer", post(customers::delete_customer))
        .route("/mutation/createNewEvent", post(events::create_event))
        .route("/mutation/updateCompEvent", post(events::complete_event))
        .route("/mutation/updateForeEvent", post(events::reopen_event))
        .route("/mutation/updateRescEvent", post(events::reschedule_event))
        .route("/mutation/updateCancelEvent", post(events::cancel_event))
        .route("/mutation/deleteEvent", post(events::delete_event))
}
