//! The failures we're willing to show to clients.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use failure::{Error, Fail};
use std::net::IpAddr;

/// A failure with a client-facing rendering. Anything else that bubbles out of a handler stays
/// an internal error.
#[derive(Clone, Debug, Fail)]
pub enum ApiError {
    /// A registration used an email some user already registered under.
    #[fail(display = "Email already registered")]
    EmailRegistered,

    /// A recording used a name some peak already has.
    #[fail(display = "Peak name already registered")]
    PeakRegistered,

    /// A peak was recorded under an owner id that matches no user.
    #[fail(display = "Owner does not exist")]
    OwnerMissing,

    /// A user lookup matched nothing.
    #[fail(display = "User not found")]
    UserNotFound,

    /// The caller's address resolved to some country other than the allowed one.
    #[fail(display = "Forbidden for IP {}", _0)]
    Forbidden(IpAddr),
}

/// Rewrites the storage failures a user insert can produce. The handler checks the email first
/// for a friendlier path, but the unique constraint is what actually guards the race.
pub fn user_storage_error(err: Error) -> Error {
    match err.downcast_ref::<DieselError>() {
        Some(&DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            ApiError::EmailRegistered.into()
        }
        _ => err,
    }
}

/// Rewrites the storage failures a peak insert can produce: a taken name, or an owner id no
/// user has.
pub fn peak_storage_error(err: Error) -> Error {
    match err.downcast_ref::<DieselError>() {
        Some(&DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            ApiError::PeakRegistered.into()
        }
        Some(&DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
            ApiError::OwnerMissing.into()
        }
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failure::format_err;

    fn database_error(kind: DatabaseErrorKind) -> Error {
        DieselError::DatabaseError(kind, Box::new("violation".to_owned())).into()
    }

    #[test]
    fn unique_violations_become_conflicts() {
        let err = user_storage_error(database_error(DatabaseErrorKind::UniqueViolation));
        match err.downcast_ref::<ApiError>() {
            Some(&ApiError::EmailRegistered) => {}
            other => panic!("classified as {:?}", other),
        }

        let err = peak_storage_error(database_error(DatabaseErrorKind::UniqueViolation));
        match err.downcast_ref::<ApiError>() {
            Some(&ApiError::PeakRegistered) => {}
            other => panic!("classified as {:?}", other),
        }
    }

    #[test]
    fn foreign_key_violations_blame_the_owner() {
        let err = peak_storage_error(database_error(DatabaseErrorKind::ForeignKeyViolation));
        match err.downcast_ref::<ApiError>() {
            Some(&ApiError::OwnerMissing) => {}
            other => panic!("classified as {:?}", other),
        }
    }

    #[test]
    fn unrelated_errors_pass_through() {
        let err = user_storage_error(format_err!("the database is on fire"));
        assert!(err.downcast_ref::<ApiError>().is_none());
        let err = peak_storage_error(format_err!("still on fire"));
        assert!(err.downcast_ref::<ApiError>().is_none());
    }
}
