//! Types used throughout.
//!
//! > Schema defines the plain old data types that views operate on. Notably, the schema module has
//! > no knowledge of the database, nor any dependencies on any of the rest of the system.
//!
//! The `*Create` types are the shapes clients submit; `Peak` and `UserRead` are the shapes they
//! get back.

use serde_derive::{Deserialize, Serialize};

/// A user of the peak app.
#[derive(Clone, Debug, Queryable)]
pub struct User {
    /// The user's database ID.
    pub id: i32,

    /// The user's email address.
    pub email: String,

    /// The user's password, stored as given. Nothing ever checks it.
    pub password: String,

    /// Whether the account is active. Nothing clears it yet either.
    pub is_active: bool,
}

/// A mountain peak. Serializes to exactly the shape peak read operations return.
#[derive(Clone, Debug, Queryable, Serialize)]
pub struct Peak {
    /// The peak's database ID.
    pub id: i32,

    /// The peak's name.
    pub name: String,

    /// Degrees of latitude.
    pub lat: f64,

    /// Degrees of longitude.
    pub lon: f64,

    /// The database ID of the user who recorded the peak.
    pub owner_id: i32,
}

/// The fields a client submits to register a user.
#[derive(Clone, Debug, Deserialize)]
pub struct UserCreate {
    /// The email address to register under. Its format is not checked.
    pub email: String,

    /// The password, kept verbatim.
    pub password: String,
}

/// The fields a client submits to record a peak.
#[derive(Clone, Debug, Deserialize)]
pub struct PeakCreate {
    /// The peak's name.
    pub name: String,

    /// Degrees of latitude.
    pub lat: f64,

    /// Degrees of longitude.
    pub lon: f64,
}

/// A user as returned by read operations, carrying the peaks they recorded. The password stays
/// out of this shape entirely.
#[derive(Clone, Debug, Serialize)]
pub struct UserRead {
    /// The user's database ID.
    pub id: i32,

    /// The user's email address.
    pub email: String,

    /// Whether the account is active.
    pub is_active: bool,

    /// The peaks the user recorded, in creation order.
    pub peaks: Vec<Peak>,
}

impl From<(User, Vec<Peak>)> for UserRead {
    fn from((user, peaks): (User, Vec<Peak>)) -> UserRead {
        UserRead {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
            peaks,
        }
    }
}

/// The windowing parameters the list endpoints accept.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Page {
    /// Rows to skip from the start, in creation order.
    #[serde(default)]
    pub skip: i64,

    /// The most rows to return. There is deliberately no ceiling.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for Page {
    fn default() -> Page {
        Page {
            skip: 0,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_value, json, to_value};

    fn aneto() -> Peak {
        Peak {
            id: 1,
            name: "aneto".to_owned(),
            lat: 42.6311,
            lon: 0.657252,
            owner_id: 1,
        }
    }

    #[test]
    fn peak_read_shape() {
        assert_eq!(
            to_value(aneto()).unwrap(),
            json!({
                "id": 1,
                "owner_id": 1,
                "name": "aneto",
                "lat": 42.6311,
                "lon": 0.657252,
            })
        );
    }

    #[test]
    fn user_read_shape_nests_peaks_and_hides_the_password() {
        let user = User {
            id: 1,
            email: "a@b.fr".to_owned(),
            password: "x".to_owned(),
            is_active: true,
        };
        assert_eq!(
            to_value(UserRead::from((user, vec![aneto()]))).unwrap(),
            json!({
                "id": 1,
                "email": "a@b.fr",
                "is_active": true,
                "peaks": [{
                    "id": 1,
                    "owner_id": 1,
                    "name": "aneto",
                    "lat": 42.6311,
                    "lon": 0.657252,
                }],
            })
        );
    }

    #[test]
    fn create_shapes_insist_on_their_fields() {
        assert!(from_value::<UserCreate>(json!({ "email": "a@b.fr", "password": "x" })).is_ok());
        assert!(from_value::<UserCreate>(json!({ "email": "a@b.fr" })).is_err());
        assert!(from_value::<UserCreate>(json!({ "email": 5, "password": "x" })).is_err());
        assert!(
            from_value::<PeakCreate>(json!({ "name": "aneto", "lat": 42.6311, "lon": 0.657252 }))
                .is_ok()
        );
        assert!(
            from_value::<PeakCreate>(json!({ "name": "aneto", "lat": "high", "lon": 0.0 })).is_err()
        );
    }

    #[test]
    fn pages_default_to_the_first_hundred() {
        let page: Page = from_value(json!({})).unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 100);
        let page = Page::default();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 100);
    }
}
