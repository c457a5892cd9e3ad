//! Registering and reading users.

use crate::{
    dal::DB,
    logic::errors::{user_storage_error, ApiError},
    schema::{Page, UserCreate, UserRead},
};
use failure::Error;
use futures::{
    future::{err, Either},
    Future,
};

/// Registers a new user, refusing an email some user already registered under.
pub fn register(db: DB, new: UserCreate) -> impl Future<Item = UserRead, Error = Error> {
    let writer = db.clone();
    db.get_user_by_email(new.email.clone())
        .and_then(move |existing| {
            if existing.is_some() {
                Either::A(err(ApiError::EmailRegistered.into()))
            } else {
                Either::B(writer.create_user(new).map_err(user_storage_error))
            }
        })
        .map(|user| UserRead::from((user, Vec::new())))
}

/// Lists users in creation order, peaks included.
pub fn list(db: DB, page: Page) -> impl Future<Item = Vec<UserRead>, Error = Error> {
    db.list_users_with_peaks(page.skip, page.limit)
        .map(|rows| rows.into_iter().map(UserRead::from).collect())
}

/// Reads a single user by id, peaks included.
pub fn detail(db: DB, user_id: i32) -> impl Future<Item = UserRead, Error = Error> {
    db.get_user_with_peaks(user_id)
        .and_then(|found| match found {
            Some(row) => Ok(UserRead::from(row)),
            None => Err(ApiError::UserNotFound.into()),
        })
}
