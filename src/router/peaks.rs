use crate::{
    dal::DB,
    logic,
    router::util::FutureExt,
    schema::{Page, PeakCreate},
};
use futures::Future;
use warp::{path, Filter};

/// The route for recording a peak under a user. Whether the user exists is the database's
/// problem, not ours.
pub fn create() -> Resp!() {
    path!(i32 / "peaks")
        .and(warp::path::end())
        .and(warp::body::content_length_limit(2 * 1024))
        .and(warp::ext::get::<DB>())
        .and(warp::body::json())
        .and_then(|owner_id: i32, db: DB, peak: PeakCreate| {
            logic::peaks::record(db, owner_id, peak)
                .map(|peak| warp::reply::json(&peak))
                .err_to_rejection()
        })
        .boxed()
}

/// The route for listing peaks.
pub fn list() -> Resp!() {
    warp::path::end()
        .and(warp::ext::get::<DB>())
        .and(warp::query().or(warp::any().map(Page::default)).unify())
        .and_then(|db: DB, page: Page| {
            logic::peaks::list(db, page)
                .map(|peaks| warp::reply::json(&peaks))
                .err_to_rejection()
        })
        .boxed()
}
