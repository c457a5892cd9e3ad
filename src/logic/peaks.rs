//! Recording and reading peaks.

use crate::{
    dal::DB,
    logic::errors::peak_storage_error,
    schema::{Page, Peak, PeakCreate},
};
use failure::Error;
use futures::Future;

/// Records a peak owned by the user with id `owner_id`. The owner is deliberately not looked up
/// first; an id no user has surfaces as the foreign key failure `peak_storage_error` classifies.
pub fn record(db: DB, owner_id: i32, peak: PeakCreate) -> impl Future<Item = Peak, Error = Error> {
    db.create_peak(owner_id, peak).map_err(peak_storage_error)
}

/// Lists peaks in creation order.
pub fn list(db: DB, page: Page) -> impl Future<Item = Vec<Peak>, Error = Error> {
    db.list_peaks(page.skip, page.limit)
}
