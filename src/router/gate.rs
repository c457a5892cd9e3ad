use crate::{dal::GeoDb, logic::errors::ApiError};
use failure::Error;
use std::net::SocketAddr;
use warp::{Filter, Rejection};

/// A filter that rejects callers whose address resolves to any country but the allowed one.
/// Runs ahead of every route, so a rejected caller never reaches a handler.
pub fn allow_country(
    geodb: GeoDb,
    allowed: String,
) -> impl Clone + Filter<Extract = (), Error = Rejection> {
    warp::addr::remote()
        .and_then(move |addr: Option<SocketAddr>| {
            let ip = match addr {
                Some(addr) => addr.ip(),
                None => return Ok(()),
            };
            let country = geodb.country_code(ip).map_err(reject_with)?;
            if passes(country.as_ref().map(String::as_str), &allowed) {
                Ok(())
            } else {
                Err(reject_with(ApiError::Forbidden(ip).into()))
            }
        })
        .untuple_one()
}

/// Whether a caller resolving to `country` may pass. Addresses the geo database doesn't know
/// resolve to `None` and are let through.
fn passes(country: Option<&str>, allowed: &str) -> bool {
    match country {
        Some(code) => code == allowed,
        None => true,
    }
}

fn reject_with(err: Error) -> Rejection {
    warp::reject::custom(err.compat())
}

#[cfg(test)]
mod tests {
    use super::passes;

    #[test]
    fn unknown_addresses_pass() {
        assert!(passes(None, "FR"));
    }

    #[test]
    fn the_allowed_country_passes() {
        assert!(passes(Some("FR"), "FR"));
    }

    #[test]
    fn other_countries_do_not() {
        assert!(!passes(Some("DE"), "FR"));
        assert!(!passes(Some("fr"), "FR"));
    }
}
