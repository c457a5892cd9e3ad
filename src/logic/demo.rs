//! The demo fixtures behind `GET /generate_data`.

use crate::{
    dal::DB,
    schema::{PeakCreate, UserCreate},
};
use failure::Error;
use futures::{future::join_all, Future};

const DEMO_EMAIL: &str = "frank@x.fr";
const DEMO_PASSWORD: &str = "tfp";

/// Three Pyrenean peaks.
const DEMO_PEAKS: [(&str, f64, f64); 3] = [
    ("aneto", 42.6311, 0.657252),
    ("campbieil", 42.7923, 0.11978),
    ("montcalm", 42.6719, 1.40614),
];

/// Seeds the demo user and their peaks. Running it again changes nothing: both entities go
/// through the insert-or-fetch upserts in the DAL.
pub fn seed(db: DB) -> impl Future<Item = (), Error = Error> {
    db.get_or_create_user(UserCreate {
        email: DEMO_EMAIL.to_owned(),
        password: DEMO_PASSWORD.to_owned(),
    })
    .and_then(move |user| {
        join_all(
            DEMO_PEAKS
                .iter()
                .map(|&(name, lat, lon)| {
                    db.get_or_create_peak(
                        user.id,
                        PeakCreate {
                            name: name.to_owned(),
                            lat,
                            lon,
                        },
                    )
                })
                .collect::<Vec<_>>(),
        )
    })
    .map(|_| ())
}
