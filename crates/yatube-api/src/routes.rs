use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::{optional_auth, require_auth};
use crate::{comments, directs, follows, groups, likes, media, posts, profiles};

/// Every HTTP route. Pages readable without a login sit behind
/// `optional_auth`; everything that writes or is per-user behind
/// `require_auth`. CORS and request tracing are left to the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/", get(posts::index))
        .route("/group/{slug}/", get(posts::group_posts))
        .route("/groups/", get(groups::list_groups))
        .route("/profile/{username}/", get(profiles::author_page))
        .route("/posts/{post_id}/", get(posts::post_detail))
        .layer(middleware::from_fn_with_state(state.clone(), optional_auth));

    let protected_routes = Router::new()
        // posts
        .route("/create/", post(posts::create_post))
        .route("/posts/{post_id}/edit/", post(posts::edit_post))
        .route("/posts/{post_id}/delete/", post(posts::delete_post))
        .route("/posts/{post_id}/comment/", post(comments::create_comment))
        .route("/comments/{comment_id}/delete/", post(comments::delete_comment))
        .route("/{post_id}/like/", post(likes::toggle_like))
        .route("/{post_id}/dislike/", post(likes::toggle_dislike))
        .route("/follow/", get(posts::follow_index))
        // people
        .route("/edit/", get(profiles::my_profile).post(profiles::edit_profile))
        .route("/profile/{username}/follow/", post(follows::follow))
        .route("/profile/{username}/unfollow/", post(follows::unfollow))
        .route("/groups/", post(groups::create_group))
        .route("/media/{kind}", post(media::upload))
        // directs
        .route("/directs/", get(directs::inbox))
        .route("/directs/{username}", get(directs::thread))
        .route("/directs-unread/", get(directs::unread))
        .route("/new/", get(directs::user_search))
        .route("/new/{username}", get(directs::new_conversation))
        .route("/send/", post(directs::send_direct))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // `/groups/` is registered on both sides; merge folds the GET and POST
    // method routers together, each keeping its own auth layer.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
