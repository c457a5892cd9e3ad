//! End-to-end tests against a live Postgres instance.
//!
//! These need `TEST_DATABASE_URL` to point at a database the tests may wipe, and are ignored by
//! default so a plain `cargo test` stays hermetic. Run them with `cargo test -- --ignored`.

use diesel::{connection::SimpleConnection, prelude::*};
use futures::future::{lazy, Future};
use peakmap::{dal::DB, router};
use serde_json::{json, Value};
use std::env;
use tokio::runtime::Runtime;

fn database_url() -> String {
    env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set")
}

/// Connects, migrates, and wipes both tables.
fn fresh_db() -> DB {
    let url = database_url();
    let db = DB::connect(&url).expect("couldn't connect to the test database");
    let conn = PgConnection::establish(&url).expect("couldn't connect to the test database");
    conn.batch_execute("TRUNCATE peaks, users RESTART IDENTITY CASCADE")
        .expect("couldn't wipe the test database");
    db
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("response body wasn't JSON")
}

#[test]
#[ignore]
fn crud_end_to_end() {
    let db = fresh_db();
    let seed_check = db.clone();
    let api = router::api(db);

    let mut runtime = Runtime::new().expect("couldn't start a runtime");
    runtime
        .block_on(lazy(move || -> Result<(), ()> {
            // Registration returns the read shape, with no peaks yet.
            let resp = warp::test::request()
                .method("POST")
                .path("/users")
                .header("content-type", "application/json")
                .body(r#"{"email":"a@b.fr","password":"x"}"#)
                .reply(&api);
            assert_eq!(resp.status(), 200);
            assert_eq!(
                body_json(resp.body()),
                json!({ "id": 1, "email": "a@b.fr", "is_active": true, "peaks": [] })
            );

            // The same email a second time is a conflict, and doesn't add a row.
            let resp = warp::test::request()
                .method("POST")
                .path("/users")
                .header("content-type", "application/json")
                .body(r#"{"email":"a@b.fr","password":"other"}"#)
                .reply(&api);
            assert_eq!(resp.status(), 400);
            assert_eq!(
                body_json(resp.body()),
                json!({ "detail": "Email already registered" })
            );

            // A body missing a required field never reaches the database.
            let resp = warp::test::request()
                .method("POST")
                .path("/users")
                .header("content-type", "application/json")
                .body(r#"{"email":"b@b.fr"}"#)
                .reply(&api);
            assert_eq!(resp.status(), 400);

            // Reads: hit and miss.
            let resp = warp::test::request().path("/users/1").reply(&api);
            assert_eq!(resp.status(), 200);
            assert_eq!(
                body_json(resp.body()),
                json!({ "id": 1, "email": "a@b.fr", "is_active": true, "peaks": [] })
            );
            let resp = warp::test::request().path("/users/999").reply(&api);
            assert_eq!(resp.status(), 404);
            assert_eq!(body_json(resp.body()), json!({ "detail": "User not found" }));

            // Recording a peak echoes the read shape back.
            let resp = warp::test::request()
                .method("POST")
                .path("/users/1/peaks")
                .header("content-type", "application/json")
                .body(r#"{"name":"aneto","lat":42.6311,"lon":0.657252}"#)
                .reply(&api);
            assert_eq!(resp.status(), 200);
            assert_eq!(
                body_json(resp.body()),
                json!({
                    "id": 1,
                    "owner_id": 1,
                    "name": "aneto",
                    "lat": 42.6311,
                    "lon": 0.657252,
                })
            );

            // An owner nobody has fails at the foreign key, not silently.
            let resp = warp::test::request()
                .method("POST")
                .path("/users/999/peaks")
                .header("content-type", "application/json")
                .body(r#"{"name":"posets","lat":42.6531,"lon":0.43561}"#)
                .reply(&api);
            assert_eq!(resp.status(), 400);
            assert_eq!(
                body_json(resp.body()),
                json!({ "detail": "Owner does not exist" })
            );

            // Peak names are unique.
            let resp = warp::test::request()
                .method("POST")
                .path("/users/1/peaks")
                .header("content-type", "application/json")
                .body(r#"{"name":"aneto","lat":0.0,"lon":0.0}"#)
                .reply(&api);
            assert_eq!(resp.status(), 400);
            assert_eq!(
                body_json(resp.body()),
                json!({ "detail": "Peak name already registered" })
            );

            // Seeding twice redirects home both times and stays idempotent; "aneto" already
            // exists, so it keeps its original owner.
            for _ in 0..2 {
                let resp = warp::test::request().path("/generate_data").reply(&api);
                assert_eq!(resp.status(), 302);
                assert_eq!(resp.headers()["location"], "/");
            }

            // Pagination windows over the three seeded peaks, in creation order.
            let resp = warp::test::request()
                .path("/peaks?skip=0&limit=2")
                .reply(&api);
            assert_eq!(resp.status(), 200);
            let peaks = body_json(resp.body());
            let names = peaks
                .as_array()
                .expect("expected a JSON array")
                .iter()
                .map(|peak| peak["name"].as_str().expect("peak without a name").to_owned())
                .collect::<Vec<_>>();
            assert_eq!(names, ["aneto", "campbieil"]);

            let resp = warp::test::request()
                .path("/peaks?skip=2&limit=2")
                .reply(&api);
            let peaks = body_json(resp.body());
            assert_eq!(peaks.as_array().map(Vec::len), Some(1));
            assert_eq!(peaks[0]["name"], "montcalm");

            // Listing users nests each user's peaks.
            let resp = warp::test::request().path("/users").reply(&api);
            let users = body_json(resp.body());
            let users = users.as_array().expect("expected a JSON array");
            assert_eq!(users.len(), 2);
            assert_eq!(users[0]["email"], "a@b.fr");
            assert_eq!(users[0]["peaks"][0]["name"], "aneto");
            assert_eq!(users[1]["email"], "frank@x.fr");
            assert_eq!(users[1]["peaks"].as_array().map(Vec::len), Some(2));

            // The index is an HTML map naming every peak.
            let resp = warp::test::request().path("/").reply(&api);
            assert_eq!(resp.status(), 200);
            assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
            let page = String::from_utf8_lossy(resp.body());
            assert!(page.contains("montcalm"));

            // get_or_create is keyed on the email alone; a different password changes nothing.
            let seeded = seed_check
                .get_or_create_user(peakmap::schema::UserCreate {
                    email: "frank@x.fr".to_owned(),
                    password: "not-tfp".to_owned(),
                })
                .wait()
                .expect("get_or_create_user failed");
            assert_eq!(seeded.id, 2);
            assert_eq!(seeded.password, "tfp");

            Ok(())
        }))
        .expect("the end-to-end flow panicked");

    // What actually prevents duplicate users is the unique constraint, not the handler's
    // pre-check; prove the constraint is there.
    let conn = PgConnection::establish(&database_url()).expect("couldn't connect");
    let dup = conn.batch_execute("INSERT INTO users (email, password) VALUES ('frank@x.fr', 'z')");
    let msg = format!("{}", dup.expect_err("duplicate email was accepted"));
    assert!(msg.contains("users_email_key"), "unexpected error: {}", msg);
}
