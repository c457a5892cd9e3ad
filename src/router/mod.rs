//! The HTTP server.
//!
//! > **Router** is the the only module that knows anything about HTTP. Every other part of the
//! > system has no knowledge of how the request is really being made. The router's responsibility
//! > is to call into the domain logic, and then render that response data with an appropriate view.

mod errors;
mod gate;
mod pages;
mod peaks;
mod users;
mod util;

use crate::{
    dal::{GeoDb, DB},
    router::util::set,
};
use futures::{
    future::{loop_fn, ok, Loop},
    Future,
};
use log::{info, warn};
use std::net::SocketAddr;
use warp::Filter;

/// Starts an HTTP server at the given address. The polymorphism in the return type indicates that
/// the future will never resolve, since it can be trivially used as
/// `impl Future<Item = Void, Error = Void>`.
pub fn serve_on<T, E>(
    addr: SocketAddr,
    db: DB,
    geodb: GeoDb,
    allowed_country: String,
) -> impl Future<Item = T, Error = E> {
    loop_fn((), move |()| {
        info!("Starting to serve...");
        let server = routes(db.clone(), geodb.clone(), allowed_country.clone())
            .with(warp::log("peakmap::router"));
        warp::serve(server).bind(addr).then(|r| {
            let status = match r {
                Ok(()) => "success",
                Err(()) => "failure",
            };
            warn!("HTTP server exited with {}; restarting...", status);
            ok(Loop::Continue(()))
        })
    })
}

/// All the routes, with the country gate ahead of them.
fn routes(db: DB, geodb: GeoDb, allowed_country: String) -> Resp!() {
    gate::allow_country(geodb, allowed_country)
        .and(api(db))
        .recover(errors::recover)
        .recover(errors::last_chance)
        .boxed()
}

/// The API and page routes, with the database handle injected per request.
pub fn api(db: DB) -> Resp!() {
    set(db)
        .and(route_any! {
            POST ("users") => users::create(),
            GET ("users") => users::list(),
            GET ("users") => users::detail(),
            POST ("users") => peaks::create(),
            GET ("peaks") => peaks::list(),
            GET ("generate_data") => pages::generate_data(),
            GET () => pages::index(),
        })
        .recover(errors::recover)
        .recover(errors::last_chance)
        .boxed()
}
