//! Native GeoTIFF reading/writing built on the `tiff` crate.
//!
//! Writes single-band 32-bit float imagery with the GeoTIFF tags needed to
//! round-trip georeferencing: ModelPixelScale (33550), ModelTiepoint
//! (33922) and a GeoKey directory (34735) carrying the EPSG code.

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;

// GeoKey ids
const KEY_GT_MODEL_TYPE: u16 = 1024;
const KEY_GT_RASTER_TYPE: u16 = 1025;
const KEY_GEOGRAPHIC_TYPE: u16 = 2048;
const KEY_PROJECTED_CS_TYPE: u16 = 3072;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Reserved; the native writer is always uncompressed.
    pub compression: Option<String>,
}

/// Read a single-band GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    let mut decoder =
        Decoder::new(file).map_err(|e| Error::Other(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Other(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Other(format!("Cannot read image data: {}", e)))?;

    let data: Vec<T> = match result {
        DecodingResult::F32(buf) => cast_buffer(&buf),
        DecodingResult::F64(buf) => cast_buffer(&buf),
        DecodingResult::U8(buf) => cast_buffer(&buf),
        DecodingResult::U16(buf) => cast_buffer(&buf),
        DecodingResult::I32(buf) => cast_buffer(&buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "Unsupported TIFF pixel format".to_string(),
            ))
        }
    };

    if data.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Ok(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));

    Ok(raster)
}

fn cast_buffer<S, T>(buf: &[S]) -> Vec<T>
where
    S: Copy + num_traits::NumCast,
    T: RasterElement,
{
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(T::default_nodata()))
        .collect()
}

/// GeoTransform from ModelPixelScale + ModelTiepoint
fn read_geotransform(decoder: &mut Decoder<File>) -> Result<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::ModelPixelScaleTag)
        .map_err(|_| Error::Other("No pixel scale tag".into()))?;

    let tiepoint = decoder
        .get_tag_f64_vec(Tag::ModelTiepointTag)
        .map_err(|_| Error::Other("No tiepoint tag".into()))?;

    if scale.len() >= 2 && tiepoint.len() >= 6 {
        // tiepoint: [I, J, K, X, Y, Z]; scale: [ScaleX, ScaleY, ScaleZ]
        let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
        let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
        let pixel_width = scale[0];
        let pixel_height = -scale[1]; // negative for north-up

        return Ok(GeoTransform::new(
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
        ));
    }

    Err(Error::Other("Cannot determine geotransform".into()))
}

/// CRS from the GeoKey directory.
///
/// GeographicTypeGeoKey (2048) and ProjectedCSTypeGeoKey (3072) both hold
/// an EPSG code inline when the TIFF tag location field is 0.
fn read_crs(decoder: &mut Decoder<File>) -> Option<Crs> {
    let keys = decoder
        .get_tag_u16_vec(Tag::GeoKeyDirectoryTag)
        .ok()?;

    // [version, revision, minor, count, key_id, location, count, value, ...]
    if keys.len() < 4 {
        return None;
    }
    let num_keys = keys[3] as usize;

    for i in 0..num_keys {
        let base = 4 + i * 4;
        if base + 4 > keys.len() {
            break;
        }
        let key_id = keys[base];
        let location = keys[base + 1];
        let value = keys[base + 3];

        if location == 0
            && value > 0
            && (key_id == KEY_GEOGRAPHIC_TYPE || key_id == KEY_PROJECTED_CS_TYPE)
        {
            return Some(Crs::from_epsg(value as u32));
        }
    }

    None
}

/// Write a Raster to a single-band GeoTIFF file.
///
/// Samples are stored as 32-bit float regardless of `T`.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, _options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut encoder =
        TiffEncoder::new(file).map_err(|e| Error::Other(format!("TIFF encoder error: {}", e)))?;

    let (rows, cols) = raster.shape();
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let data: Vec<f32> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(|e| Error::Other(format!("Cannot create TIFF image: {}", e)))?;

    let gt = raster.transform();

    // ModelPixelScaleTag
    let scale = vec![gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), scale.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write scale tag: {}", e)))?;

    // ModelTiepointTag: raster (0,0,0) pins to the transform origin
    let tiepoint = vec![0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), tiepoint.as_slice())
        .map_err(|e| Error::Other(format!("Cannot write tiepoint tag: {}", e)))?;

    image
        .encoder()
        .write_tag(
            Tag::Unknown(TAG_GEO_KEY_DIRECTORY),
            geokey_directory(raster.crs()).as_slice(),
        )
        .map_err(|e| Error::Other(format!("Cannot write geokey tag: {}", e)))?;

    image
        .write_data(&data)
        .map_err(|e| Error::Other(format!("Cannot write image data: {}", e)))?;

    Ok(())
}

/// Build the GeoKey directory: model type, raster type and, when the CRS
/// carries an EPSG code, the geographic or projected CS key.
fn geokey_directory(crs: Option<&Crs>) -> Vec<u16> {
    let epsg = crs.and_then(|c| c.epsg()).filter(|&code| code <= u16::MAX as u32);
    let geographic = crs.map(|c| c.is_geographic()).unwrap_or(false);

    // GTModelTypeGeoKey: 1 = projected, 2 = geographic
    let model_type: u16 = if geographic { 2 } else { 1 };
    let num_keys: u16 = if epsg.is_some() { 3 } else { 2 };

    let mut keys: Vec<u16> = vec![
        1, 1, 0, num_keys, // version 1.1.0
        KEY_GT_MODEL_TYPE, 0, 1, model_type,
        KEY_GT_RASTER_TYPE, 0, 1, 1, // RasterPixelIsArea
    ];

    if let Some(code) = epsg {
        let key_id = if geographic {
            KEY_GEOGRAPHIC_TYPE
        } else {
            KEY_PROJECTED_CS_TYPE
        };
        keys.extend_from_slice(&[key_id, 0, 1, code as u16]);
    }

    keys
}
