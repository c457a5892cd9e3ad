use crate::{dal::DB, logic, router::util::FutureExt, view};
use failure::Error;
use futures::Future;
use warp::{
    http::{header::LOCATION, Response, StatusCode},
    Filter,
};

/// The index: a map of every recorded peak.
pub fn index() -> Resp!() {
    warp::path::end()
        .and(warp::ext::get::<DB>())
        .and_then(|db: DB| {
            db.list_peaks_with_owner()
                .err_to_rejection()
                .and_then(|peaks| view::peak_map(&peaks))
        })
        .boxed()
}

/// A utility route that populates the database with some fixed data, then bounces back to the
/// index. It is not RESTful, I know.
pub fn generate_data() -> Resp!() {
    warp::path::end()
        .and(warp::ext::get::<DB>())
        .and_then(|db: DB| {
            logic::demo::seed(db)
                .and_then(|()| {
                    Response::builder()
                        .header(LOCATION, "/")
                        .status(StatusCode::FOUND)
                        .body(String::new())
                        .map_err(Error::from)
                })
                .err_to_rejection()
        })
        .boxed()
}
