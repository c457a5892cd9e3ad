use failure::Fallible;
use maxminddb::{geoip2, MaxMindDBError, Reader};
use std::{net::IpAddr, path::Path, sync::Arc};

/// The IP-to-country database.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct GeoDb {
    reader: Arc<Reader<Vec<u8>>>,
}

impl GeoDb {
    /// Opens a GeoLite2-Country database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Fallible<GeoDb> {
        let reader = Reader::open_readfile(path)?;
        Ok(GeoDb {
            reader: Arc::new(reader),
        })
    }

    /// Resolves an address to its ISO country code. Addresses the database doesn't cover
    /// (private and reserved ranges, mostly) resolve to `None`, as do records without a
    /// country part.
    pub fn country_code(&self, addr: IpAddr) -> Fallible<Option<String>> {
        match self.reader.lookup::<geoip2::Country>(addr) {
            Ok(country) => Ok(country.country.and_then(|c| c.iso_code)),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
