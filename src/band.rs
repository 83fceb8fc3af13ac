//! Bands of the hosted mosaics and the naming of their files
//!
//! The mosaics come in three instrument families, each with its own file
//! naming and its own set of extensions:
//! * NIRCam: one file per band covering the whole survey, science only
//! * ground-based (CFHT, UltraVISTA): one file per band and extension
//! * HSC: one file per band, extension and tile

use std::fmt;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::tiles::TileId;

/// Where the mosaics are hosted
pub const DEFAULT_BASE_URL: &str = "https://exchg.calet.org/cosmosweb/.misc";

pub const BAND_NAMES: [&str; 14] = [
    "f115w", "f150w", "f277w", "f444w", "uvista_Y", "uvista_J", "uvista_H", "uvista_Ks", "hsc_g",
    "hsc_r", "hsc_i", "hsc_z", "hsc_y", "cfht_u",
];

/// Image extension of a mosaic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    /// science image
    #[default]
    Sci,
    /// error map
    Err,
    /// weight map
    Wht,
}

impl Extension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Sci => "sci",
            Extension::Err => "err",
            Extension::Wht => "wht",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Extension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "sci" => Ok(Extension::Sci),
            "err" => Ok(Extension::Err),
            "wht" => Ok(Extension::Wht),
            _ => Err(Error::InvalidExtension("any", s.to_string())),
        }
    }
}

const ALL_EXTENSIONS: &[Extension] = &[Extension::Sci, Extension::Err, Extension::Wht];

/// What a family of mosaics knows about its files
#[enum_dispatch]
pub trait Mosaic {
    /// Band name as used in file names, e.g. `f277w` or `uvista_Ks`
    fn name(&self) -> &'static str;
    /// Pixel size of the hosted mosaic, in arcsec
    fn native_pixel_scale(&self) -> f64;
    fn extensions(&self) -> &'static [Extension];
    /// File name of the mosaic holding `tile` in extension `ext`
    fn file_name(&self, tile: &TileId, ext: Extension) -> String;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NircamBand {
    F115w,
    F150w,
    F277w,
    F444w,
}

impl Mosaic for NircamBand {
    fn name(&self) -> &'static str {
        match self {
            NircamBand::F115w => "f115w",
            NircamBand::F150w => "f150w",
            NircamBand::F277w => "f277w",
            NircamBand::F444w => "f444w",
        }
    }

    fn native_pixel_scale(&self) -> f64 {
        0.06
    }

    fn extensions(&self) -> &'static [Extension] {
        &[Extension::Sci]
    }

    fn file_name(&self, _: &TileId, _: Extension) -> String {
        format!("CW_{}_60mas_tot_v8.fits", self.name())
    }
}

/// CFHT and UltraVISTA
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundBand {
    CfhtU,
    UvistaY,
    UvistaJ,
    UvistaH,
    UvistaKs,
}

impl Mosaic for GroundBand {
    fn name(&self) -> &'static str {
        match self {
            GroundBand::CfhtU => "cfht_u",
            GroundBand::UvistaY => "uvista_Y",
            GroundBand::UvistaJ => "uvista_J",
            GroundBand::UvistaH => "uvista_H",
            GroundBand::UvistaKs => "uvista_Ks",
        }
    }

    fn native_pixel_scale(&self) -> f64 {
        0.15
    }

    fn extensions(&self) -> &'static [Extension] {
        ALL_EXTENSIONS
    }

    fn file_name(&self, _: &TileId, ext: Extension) -> String {
        format!("{}_{}.fits", self.name(), ext)
    }
}

/// Hyper Suprime-Cam, split per tile
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HscBand {
    G,
    R,
    I,
    Z,
    Y,
}

impl Mosaic for HscBand {
    fn name(&self) -> &'static str {
        match self {
            HscBand::G => "hsc_g",
            HscBand::R => "hsc_r",
            HscBand::I => "hsc_i",
            HscBand::Z => "hsc_z",
            HscBand::Y => "hsc_y",
        }
    }

    fn native_pixel_scale(&self) -> f64 {
        0.168
    }

    fn extensions(&self) -> &'static [Extension] {
        ALL_EXTENSIONS
    }

    fn file_name(&self, tile: &TileId, ext: Extension) -> String {
        format!("{}_{}_{}.fits", self.name(), ext, tile)
    }
}

#[enum_dispatch(Mosaic)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Nircam(NircamBand),
    Ground(GroundBand),
    Hsc(HscBand),
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Band names are case sensitive, e.g. `uvista_Ks`
impl FromStr for Band {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let band: Band = match s {
            "f115w" => NircamBand::F115w.into(),
            "f150w" => NircamBand::F150w.into(),
            "f277w" => NircamBand::F277w.into(),
            "f444w" => NircamBand::F444w.into(),
            "cfht_u" => GroundBand::CfhtU.into(),
            "uvista_Y" => GroundBand::UvistaY.into(),
            "uvista_J" => GroundBand::UvistaJ.into(),
            "uvista_H" => GroundBand::UvistaH.into(),
            "uvista_Ks" => GroundBand::UvistaKs.into(),
            "hsc_g" => HscBand::G.into(),
            "hsc_r" => HscBand::R.into(),
            "hsc_i" => HscBand::I.into(),
            "hsc_z" => HscBand::Z.into(),
            "hsc_y" => HscBand::Y.into(),
            _ => return Err(Error::UnknownBand(s.to_string())),
        };
        Ok(band)
    }
}

/// Download URL of the mosaic holding `tile` for `band` and `ext`
///
/// # Params
/// * `base`: where the mosaics are hosted, see [`DEFAULT_BASE_URL`]
pub fn download_url(base: &str, band: &Band, tile: &TileId, ext: Extension) -> Result<String, Error> {
    if !band.extensions().contains(&ext) {
        return Err(Error::InvalidExtension(band.name(), ext.to_string()));
    }

    let url = format!("{}/{}", base.trim_end_matches('/'), band.file_name(tile, ext));
    log::debug!("{} {} tile {}: {}", band, ext, tile, url);
    Ok(url)
}
