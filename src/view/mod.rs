//! Rendering to templates.
//!
//! > View is the only module that knows anything about HTML, or JSON, or other "renderings" of the
//! > response. I'm happy to call this "view" in common with traditional stateless MVC, because
//! > it's role is largely the same.

use crate::schema::Peak;
use failure::{Error, Fallible, SyncFailure};
use packer::Packer;
use serde::Serialize;
use serde_json::json;
use tera::Tera;
use warp::{
    http::{header::CONTENT_TYPE, Response},
    reject::custom,
    Rejection,
};

/// Where the map starts out: roughly centered on France.
const MAP_CENTER: (f64, f64) = (46.0, 2.0);
const MAP_ZOOM: u32 = 6;

lazy_static::lazy_static! {
    static ref TERA: Tera = {
        #[derive(Packer)]
        #[folder = "src/view/templates"]
        struct Templates;

        let mut tera = Tera::default();
        let templates = Templates::list()
            .map(|name| (name, Templates::get_str(name).unwrap()))
            .collect::<Vec<_>>();
        tera.add_raw_templates(templates).unwrap();
        tera.build_inheritance_chains().unwrap();
        tera
    };
}

/// Renders a template as HTML to a String.
pub fn render<T: Serialize>(name: &str, data: T) -> Fallible<String> {
    TERA.render(name, &data)
        .map_err(|err| SyncFailure::new(err).into())
}

/// Renders a template as HTML to a `warp::Reply`.
pub fn render_html<T: Serialize>(name: &str, data: T) -> Result<Response<String>, Rejection> {
    render(name, data)
        .and_then(|body| {
            Response::builder()
                .header(CONTENT_TYPE, "text/html; charset=utf-8")
                .body(body)
                .map_err(Error::from)
        })
        .map_err(|err| custom(err.compat()))
}

/// Renders the map page: one marker per peak, each labelled with the peak's display string.
pub fn peak_map(peaks: &[(Peak, String)]) -> Result<Response<String>, Rejection> {
    let markers = peaks
        .iter()
        .map(|&(ref peak, ref owner)| {
            json!({
                "lat": peak.lat,
                "lon": peak.lon,
                "popup": format!(
                    "{} peak located at {},{} created by {}",
                    peak.name, peak.lat, peak.lon, owner
                ),
            })
        })
        .collect::<Vec<_>>();
    render_html(
        "map.html",
        json!({
            "markers": markers,
            "center_lat": MAP_CENTER.0,
            "center_lon": MAP_CENTER.1,
            "zoom": MAP_ZOOM,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_map_page_renders_markers() {
        let aneto = Peak {
            id: 1,
            name: "aneto".to_owned(),
            lat: 42.6311,
            lon: 0.657252,
            owner_id: 1,
        };
        let resp = peak_map(&[(aneto, "frank@x.fr".to_owned())]).unwrap();
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let body = resp.body();
        assert!(body.contains("aneto peak located at 42.6311,0.657252 created by frank@x.fr"));
        assert!(body.contains("L.marker"));
    }

    #[test]
    fn the_map_page_renders_without_peaks_too() {
        let resp = peak_map(&[]).unwrap();
        assert!(resp.body().contains("L.map"));
    }
}
