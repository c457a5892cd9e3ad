use crate::{
    dal::DB,
    logic,
    router::util::FutureExt,
    schema::{Page, UserCreate},
};
use futures::Future;
use warp::{path, Filter};

/// The route for registering a user.
pub fn create() -> Resp!() {
    warp::path::end()
        .and(warp::body::content_length_limit(2 * 1024))
        .and(warp::ext::get::<DB>())
        .and(warp::body::json())
        .and_then(|db: DB, user: UserCreate| {
            logic::users::register(db, user)
                .map(|user| warp::reply::json(&user))
                .err_to_rejection()
        })
        .boxed()
}

/// The route for listing users, peaks included.
pub fn list() -> Resp!() {
    warp::path::end()
        .and(warp::ext::get::<DB>())
        .and(warp::query().or(warp::any().map(Page::default)).unify())
        .and_then(|db: DB, page: Page| {
            logic::users::list(db, page)
                .map(|users| warp::reply::json(&users))
                .err_to_rejection()
        })
        .boxed()
}

/// The route for reading one user by id.
pub fn detail() -> Resp!() {
    path!(i32)
        .and(warp::path::end())
        .and(warp::ext::get::<DB>())
        .and_then(|user_id: i32, db: DB| {
            logic::users::detail(db, user_id)
                .map(|user| warp::reply::json(&user))
                .err_to_rejection()
        })
        .boxed()
}
