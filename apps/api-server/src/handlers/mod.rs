//! HTTP handlers and route configuration.

mod auth;
mod health;
mod root;
mod todos;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root::read_root))
        .route("/hello", web::get().to(root::hello))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/token", web::post().to(auth::login_for_access_token))
                .route("/refresh/token", web::post().to(auth::refresh_access_token)),
        )
        .service(
            web::scope("/users")
                .route("/", web::post().to(users::create_user))
                .route("/", web::get().to(users::read_users))
                .route("/{user_id}", web::get().to(users::read_user))
                .route("/{user_id}", web::put().to(users::update_user))
                .route("/{user_id}", web::delete().to(users::delete_user)),
        )
        .service(
            web::scope("/todos")
                .route("/", web::post().to(todos::create_todo))
                .route("/", web::get().to(todos::list_todos))
                .route("/{todo_id}", web::patch().to(todos::patch_todo))
                .route("/{todo_id}", web::delete().to(todos::delete_todo)),
        );
}
