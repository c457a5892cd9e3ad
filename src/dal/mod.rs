//! Bindings to the database.
//!
//! > **DAL**, for lack of a better term (borrowing this one from "data access layer" since I don't
//! > want to use "model"), is the only module that does any talking to the database, or any other
//! > IO or interaction with other kinds of externalized state for that matter.

mod geoip;
#[allow(proc_macro_derive_resolution_fallback, unused_import_braces)]
mod schema;

embed_migrations!("migrations");

pub use crate::dal::geoip::GeoDb;
use crate::{
    dal::schema::{peaks, users},
    schema::{Peak, PeakCreate, User, UserCreate},
    util::blocking,
};
use diesel::{
    dsl::insert_into,
    prelude::*,
    r2d2::{ConnectionManager, Pool},
};
use failure::Error;
use futures::{
    future::{err, Either},
    Future,
};
use std::sync::Arc;

/// A pool of connections to the database.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct DB {
    pool: Arc<Pool<ConnectionManager<PgConnection>>>,
}

impl DB {
    /// Connects to the database at the given URL, running any pending migrations.
    pub fn connect(database_url: &str) -> Result<DB, Error> {
        let pool = Arc::new(Pool::new(ConnectionManager::new(database_url))?);
        embedded_migrations::run(&pool.get()?)?;
        Ok(DB { pool })
    }

    /// Creates a user, returning the stored record.
    pub fn create_user(&self, new: UserCreate) -> impl Future<Item = User, Error = Error> {
        self.async_query(move |conn| {
            insert_into(users::table)
                .values((
                    users::email.eq(&new.email),
                    users::password.eq(&new.password),
                ))
                .get_result(conn)
        })
    }

    /// Creates a peak recorded by the user with id `owner`. The owner is not looked up first;
    /// a bad id surfaces as a foreign key violation.
    pub fn create_peak(&self, owner: i32, new: PeakCreate) -> impl Future<Item = Peak, Error = Error> {
        self.async_query(move |conn| {
            insert_into(peaks::table)
                .values((
                    peaks::name.eq(&new.name),
                    peaks::lat.eq(new.lat),
                    peaks::lon.eq(new.lon),
                    peaks::owner_id.eq(owner),
                ))
                .get_result(conn)
        })
    }

    /// Gets a user by email.
    pub fn get_user_by_email(&self, email: String) -> impl Future<Item = Option<User>, Error = Error> {
        self.async_query(move |conn| {
            users::table
                .filter(users::email.eq(&email))
                .first(conn)
                .optional()
        })
    }

    /// Gets a user by ID, along with the peaks they recorded, in creation order.
    pub fn get_user_with_peaks(
        &self,
        user: i32,
    ) -> impl Future<Item = Option<(User, Vec<Peak>)>, Error = Error> {
        self.async_query(move |conn| -> Result<Option<(User, Vec<Peak>)>, Error> {
            let user = match users::table.find(user).first::<User>(conn).optional()? {
                Some(user) => user,
                None => return Ok(None),
            };
            let peaks = peaks::table
                .filter(peaks::owner_id.eq(user.id))
                .order(peaks::id.asc())
                .load(conn)?;
            Ok(Some((user, peaks)))
        })
    }

    /// Fetches the user with the given email, creating it if there is none. The insert and the
    /// fetch run in one transaction against the unique constraint on email, so concurrent calls
    /// converge on a single row; the password plays no part in the match and is ignored when the
    /// row already exists.
    pub fn get_or_create_user(&self, new: UserCreate) -> impl Future<Item = User, Error = Error> {
        self.async_query(move |conn| {
            conn.transaction(|| {
                let _ = insert_into(users::table)
                    .values((
                        users::email.eq(&new.email),
                        users::password.eq(&new.password),
                    ))
                    .on_conflict(users::email)
                    .do_nothing()
                    .execute(conn)?;
                users::table
                    .filter(users::email.eq(&new.email))
                    .first(conn)
                    .map_err(Error::from)
            })
        })
    }

    /// Fetches the peak with the given name, creating it if there is none. Works like
    /// `get_or_create_user`: the name is the match key, and the coordinates and owner are
    /// ignored when the row already exists.
    pub fn get_or_create_peak(
        &self,
        owner: i32,
        new: PeakCreate,
    ) -> impl Future<Item = Peak, Error = Error> {
        self.async_query(move |conn| {
            conn.transaction(|| {
                let _ = insert_into(peaks::table)
                    .values((
                        peaks::name.eq(&new.name),
                        peaks::lat.eq(new.lat),
                        peaks::lon.eq(new.lon),
                        peaks::owner_id.eq(owner),
                    ))
                    .on_conflict(peaks::name)
                    .do_nothing()
                    .execute(conn)?;
                peaks::table
                    .filter(peaks::name.eq(&new.name))
                    .first(conn)
                    .map_err(Error::from)
            })
        })
    }

    /// Lists peaks in creation order.
    pub fn list_peaks(&self, skip: i64, limit: i64) -> impl Future<Item = Vec<Peak>, Error = Error> {
        self.async_query(move |conn| {
            peaks::table
                .order(peaks::id.asc())
                .offset(skip)
                .limit(limit)
                .load(conn)
        })
    }

    /// Lists every peak along with its owner's email, in creation order. This is the map page's
    /// query, so it is unpaginated.
    pub fn list_peaks_with_owner(&self) -> impl Future<Item = Vec<(Peak, String)>, Error = Error> {
        self.async_query(move |conn| {
            peaks::table
                .inner_join(users::table)
                .select((peaks::all_columns, users::email))
                .order(peaks::id.asc())
                .load(conn)
        })
    }

    /// Lists users in creation order, each with the peaks they recorded. The peaks come from a
    /// second query over the listed ids rather than a query per user.
    pub fn list_users_with_peaks(
        &self,
        skip: i64,
        limit: i64,
    ) -> impl Future<Item = Vec<(User, Vec<Peak>)>, Error = Error> {
        self.async_query(move |conn| -> Result<Vec<(User, Vec<Peak>)>, Error> {
            let users = users::table
                .order(users::id.asc())
                .offset(skip)
                .limit(limit)
                .load::<User>(conn)?;
            let ids = users.iter().map(|user| user.id).collect::<Vec<_>>();
            let peaks = peaks::table
                .filter(peaks::owner_id.eq_any(ids))
                .order(peaks::id.asc())
                .load::<Peak>(conn)?;
            let mut grouped = users
                .into_iter()
                .map(|user| (user, Vec::new()))
                .collect::<Vec<_>>();
            for peak in peaks {
                if let Some(entry) = grouped.iter_mut().find(|entry| entry.0.id == peak.owner_id) {
                    entry.1.push(peak);
                }
            }
            Ok(grouped)
        })
    }

    /// Performs a query "asynchronously" (but not really). Diesel currently does not support
    /// async/futures, so we use `crate::util::blocking` so the database operations don't block
    /// the thread. This does, however, require the future to be run inside a threadpool.
    ///
    /// This isn't really Diesel's fault; libpq exposes a synchronous interface.
    fn async_query<E, F, T>(&self, mut func: F) -> impl Future<Item = T, Error = Error>
    where
        E: Into<Error>,
        F: FnMut(&PgConnection) -> Result<T, E>,
    {
        match self.pool.get() {
            Ok(conn) => Either::A(blocking(move || func(&*conn).map_err(|e| e.into()))),
            Err(e) => Either::B(err(e.into())),
        }
    }
}
