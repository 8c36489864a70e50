//! WGS84 geographic coordinates → projected survey grid.
//!
//! Two grid families are supported:
//!
//! - `EPSG:27700` British National Grid: WGS84 is shifted onto OSGB36 with the
//!   published seven-parameter Helmert transform, then projected with the
//!   Airy 1830 transverse Mercator. Accuracy is a few metres, which is the
//!   same class as the drone's own GPS fix.
//! - `EPSG:326NN` / `EPSG:327NN` WGS84 UTM, north/south hemisphere.
//!
//! Both use the Ordnance Survey series expansion of the transverse Mercator.

use std::fmt;
use std::str::FromStr;

use crate::error::GeoError;

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn validate(self) -> Result<Self, GeoError> {
        let ok = self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude);
        if ok {
            Ok(self)
        } else {
            Err(GeoError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// Grid position in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub easting: f64,
    pub northing: f64,
}

// ---------------------------------------------------------------------------
// Ellipsoids + datum shift
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Ellipsoid {
    a: f64,
    b: f64,
}

impl Ellipsoid {
    fn e2(&self) -> f64 {
        (self.a * self.a - self.b * self.b) / (self.a * self.a)
    }

    fn geodetic_to_cartesian(&self, p: LatLon) -> [f64; 3] {
        let phi = p.latitude.to_radians();
        let lambda = p.longitude.to_radians();
        let e2 = self.e2();
        let nu = self.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
        [
            nu * phi.cos() * lambda.cos(),
            nu * phi.cos() * lambda.sin(),
            (1.0 - e2) * nu * phi.sin(),
        ]
    }

    fn cartesian_to_geodetic(&self, [x, y, z]: [f64; 3]) -> LatLon {
        let e2 = self.e2();
        let p = x.hypot(y);
        let mut phi = (z / (p * (1.0 - e2))).atan();
        for _ in 0..16 {
            let nu = self.a / (1.0 - e2 * phi.sin().powi(2)).sqrt();
            let next = ((z + e2 * nu * phi.sin()) / p).atan();
            let converged = (next - phi).abs() < 1e-13;
            phi = next;
            if converged {
                break;
            }
        }
        LatLon::new(phi.to_degrees(), y.atan2(x).to_degrees())
    }
}

const AIRY_1830: Ellipsoid = Ellipsoid { a: 6_377_563.396, b: 6_356_256.909 };
const WGS84: Ellipsoid = Ellipsoid { a: 6_378_137.0, b: 6_356_752.314_245 };

/// Seven-parameter Helmert transform (translations in metres, scale in ppm,
/// rotations in arc-seconds).
#[derive(Debug, Clone, Copy)]
struct Helmert {
    tx: f64,
    ty: f64,
    tz: f64,
    scale_ppm: f64,
    rx: f64,
    ry: f64,
    rz: f64,
}

const WGS84_TO_OSGB36: Helmert = Helmert {
    tx: -446.448,
    ty: 125.157,
    tz: -542.060,
    scale_ppm: 20.4894,
    rx: -0.1502,
    ry: -0.2470,
    rz: -0.8421,
};

impl Helmert {
    fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        let s = 1.0 + self.scale_ppm * 1e-6;
        let rx = (self.rx / 3600.0).to_radians();
        let ry = (self.ry / 3600.0).to_radians();
        let rz = (self.rz / 3600.0).to_radians();
        [
            self.tx + s * x - rz * y + ry * z,
            self.ty + rz * x + s * y - rx * z,
            self.tz - ry * x + rx * y + s * z,
        ]
    }

    fn shift(&self, p: LatLon, from: Ellipsoid, to: Ellipsoid) -> LatLon {
        to.cartesian_to_geodetic(self.apply(from.geodetic_to_cartesian(p)))
    }
}

// ---------------------------------------------------------------------------
// Transverse Mercator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct TransverseMercator {
    ellipsoid: Ellipsoid,
    scale: f64,
    origin_lat: f64,
    origin_lon: f64,
    false_easting: f64,
    false_northing: f64,
}

const NATIONAL_GRID: TransverseMercator = TransverseMercator {
    ellipsoid: AIRY_1830,
    scale: 0.999_601_271_7,
    origin_lat: 49.0,
    origin_lon: -2.0,
    false_easting: 400_000.0,
    false_northing: -100_000.0,
};

impl TransverseMercator {
    fn utm(zone: u8, north: bool) -> Self {
        Self {
            ellipsoid: WGS84,
            scale: 0.9996,
            origin_lat: 0.0,
            origin_lon: f64::from(zone) * 6.0 - 183.0,
            false_easting: 500_000.0,
            false_northing: if north { 0.0 } else { 10_000_000.0 },
        }
    }

    fn project(&self, p: LatLon) -> Projected {
        let Ellipsoid { a, b } = self.ellipsoid;
        let f0 = self.scale;
        let e2 = self.ellipsoid.e2();
        let n = (a - b) / (a + b);
        let (n2, n3) = (n * n, n * n * n);

        let phi = p.latitude.to_radians();
        let phi0 = self.origin_lat.to_radians();
        let dl = (p.longitude - self.origin_lon).to_radians();

        let (sin_phi, cos_phi) = phi.sin_cos();
        let tan2 = phi.tan().powi(2);
        let tan4 = tan2 * tan2;
        let cos3 = cos_phi.powi(3);
        let cos5 = cos_phi.powi(5);

        let s2 = 1.0 - e2 * sin_phi * sin_phi;
        let nu = a * f0 / s2.sqrt();
        let rho = a * f0 * (1.0 - e2) / s2.powf(1.5);
        let eta2 = nu / rho - 1.0;

        // Meridional arc from the true origin
        let dphi = phi - phi0;
        let sphi = phi + phi0;
        let m = b
            * f0
            * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * dphi
                - (3.0 * n + 3.0 * n2 + 21.0 / 8.0 * n3) * dphi.sin() * sphi.cos()
                + (15.0 / 8.0 * n2 + 15.0 / 8.0 * n3) * (2.0 * dphi).sin() * (2.0 * sphi).cos()
                - 35.0 / 24.0 * n3 * (3.0 * dphi).sin() * (3.0 * sphi).cos());

        let i = m + self.false_northing;
        let ii = nu / 2.0 * sin_phi * cos_phi;
        let iii = nu / 24.0 * sin_phi * cos3 * (5.0 - tan2 + 9.0 * eta2);
        let iiia = nu / 720.0 * sin_phi * cos5 * (61.0 - 58.0 * tan2 + tan4);
        let iv = nu * cos_phi;
        let v = nu / 6.0 * cos3 * (nu / rho - tan2);
        let vi = nu / 120.0 * cos5 * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta2 - 58.0 * tan2 * eta2);

        Projected {
            easting: self.false_easting + iv * dl + v * dl.powi(3) + vi * dl.powi(5),
            northing: i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6),
        }
    }
}

// ---------------------------------------------------------------------------
// CRS
// ---------------------------------------------------------------------------

/// Target grid for reprojection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crs {
    /// EPSG:27700
    #[default]
    BritishNationalGrid,
    /// EPSG:326NN (north) / EPSG:327NN (south)
    Utm { zone: u8, north: bool },
}

impl Crs {
    pub fn epsg(&self) -> u32 {
        match self {
            Self::BritishNationalGrid => 27700,
            Self::Utm { zone, north: true } => 32600 + u32::from(*zone),
            Self::Utm { zone, north: false } => 32700 + u32::from(*zone),
        }
    }

    /// Project a WGS84 position onto this grid.
    pub fn project(&self, p: LatLon) -> Result<Projected, GeoError> {
        let p = p.validate()?;
        Ok(match *self {
            Self::BritishNationalGrid => {
                NATIONAL_GRID.project(WGS84_TO_OSGB36.shift(p, WGS84, AIRY_1830))
            }
            Self::Utm { zone, north } => TransverseMercator::utm(zone, north).project(p),
        })
    }
}

impl FromStr for Crs {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("epsg:") => &trimmed[5..],
            _ => trimmed,
        };
        let code: u32 = digits
            .parse()
            .map_err(|_| GeoError::UnsupportedCrs(s.to_string()))?;

        match code {
            27700 => Ok(Self::BritishNationalGrid),
            32601..=32660 => Ok(Self::Utm { zone: (code - 32600) as u8, north: true }),
            32701..=32760 => Ok(Self::Utm { zone: (code - 32700) as u8, north: false }),
            _ => Err(GeoError::UnsupportedCrs(s.to_string())),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}
