//! Plain binary encoding: big-endian IEEE-754 doubles and `u32` counts,
//! with one-byte tags and presence flags. No compression, no versioning.

use std::io::{Read, Write};

use crate::error::{CodecError, Result};
use crate::geometry::{Area, GeoShape, Geometry, LineSet, LineString, PointSet, Ring};
use crate::math::{Tolerance, Vect};

/// Values that can be written to and read back from a byte stream.
pub trait BinaryCodec: Sized {
    /// Writes the value.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Io` if the stream fails.
    fn write<W: Write>(&self, w: &mut W) -> Result<()>;

    /// Reads a value written by [`BinaryCodec::write`].
    ///
    /// # Errors
    ///
    /// Returns `CodecError::Io` if the stream fails or ends early,
    /// `CodecError::Malformed` for an unknown tag or flag, and a geometry
    /// error if the decoded coordinates do not form a valid value.
    fn read<R: Read>(r: &mut R) -> Result<Self>;
}

fn write_f64<W: Write>(w: &mut W, v: f64) -> Result<()> {
    w.write_all(&v.to_be_bytes()).map_err(CodecError::from)?;
    Ok(())
}

fn read_f64<R: Read>(r: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).map_err(CodecError::from)?;
    Ok(f64::from_be_bytes(buf))
}

fn write_count<W: Write>(w: &mut W, n: usize) -> Result<()> {
    let n = u32::try_from(n)
        .map_err(|_| CodecError::Malformed(format!("count {n} does not fit in 32 bits")))?;
    w.write_all(&n.to_be_bytes()).map_err(CodecError::from)?;
    Ok(())
}

fn read_count<R: Read>(r: &mut R) -> Result<usize> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf).map_err(CodecError::from)?;
    let n = u32::from_be_bytes(buf);
    Ok(usize::try_from(n).map_err(|_| CodecError::Malformed(format!("count {n} is too large")))?)
}

fn write_u8<W: Write>(w: &mut W, v: u8) -> Result<()> {
    w.write_all(&[v]).map_err(CodecError::from)?;
    Ok(())
}

fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf).map_err(CodecError::from)?;
    Ok(buf[0])
}

fn write_points<W: Write>(w: &mut W, points: &[Vect]) -> Result<()> {
    write_count(w, points.len())?;
    points.iter().try_for_each(|p| p.write(w))
}

fn read_points<R: Read>(r: &mut R) -> Result<Vec<Vect>> {
    let n = read_count(r)?;
    (0..n).map(|_| Vect::read(r)).collect()
}

fn write_option<W: Write, T: BinaryCodec>(w: &mut W, value: Option<&T>) -> Result<()> {
    match value {
        Some(v) => {
            write_u8(w, 1)?;
            v.write(w)
        }
        None => write_u8(w, 0),
    }
}

fn read_option<R: Read, T: BinaryCodec>(r: &mut R) -> Result<Option<T>> {
    match read_u8(r)? {
        0 => Ok(None),
        1 => T::read(r).map(Some),
        flag => Err(CodecError::Malformed(format!("invalid presence flag {flag}")).into()),
    }
}

impl BinaryCodec for Vect {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_f64(w, self.x())?;
        write_f64(w, self.y())
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        let x = read_f64(r)?;
        let y = read_f64(r)?;
        Vect::new(x, y)
    }
}

impl BinaryCodec for LineString {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_points(w, self.vertices())
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        LineString::new(read_points(r)?)
    }
}

impl BinaryCodec for Ring {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_points(w, self.vertices())
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ring::new(read_points(r)?)
    }
}

impl BinaryCodec for LineSet {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_count(w, self.len())?;
        self.lines().iter().try_for_each(|l| l.write(w))
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        let n = read_count(r)?;
        let lines = (0..n).map(|_| LineString::read(r)).collect::<Result<Vec<_>>>()?;
        Ok(LineSet::value_of(lines)
            .ok_or_else(|| CodecError::Malformed("line set has no lines".to_owned()))?)
    }
}

impl BinaryCodec for PointSet {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_points(w, self.points())
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ok(PointSet::value_of(read_points(r)?, Tolerance::default())
            .ok_or_else(|| CodecError::Malformed("point set has no points".to_owned()))?)
    }
}

impl BinaryCodec for Area {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_option(w, self.shell())?;
        write_count(w, self.children().len())?;
        self.children().iter().try_for_each(|c| c.write(w))
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        let shell = read_option::<R, Ring>(r)?;
        let n = read_count(r)?;
        let children = (0..n).map(|_| Area::read(r)).collect::<Result<Vec<_>>>()?;
        if shell.is_none() && children.is_empty() {
            let reason = "area has neither shell nor children".to_owned();
            return Err(CodecError::Malformed(reason).into());
        }
        Ok(Area::from_parts(shell, children))
    }
}

impl BinaryCodec for GeoShape {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_option(w, self.area())?;
        write_option(w, self.lines())?;
        write_option(w, self.points())
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        let area = read_option(r)?;
        let lines = read_option(r)?;
        let points = read_option(r)?;
        Ok(GeoShape::value_of(area, lines, points)
            .ok_or_else(|| CodecError::Malformed("shape has no parts".to_owned()))?)
    }
}

const TAG_POINT: u8 = 1;
const TAG_LINE_STRING: u8 = 2;
const TAG_LINE_SET: u8 = 3;
const TAG_RING: u8 = 4;
const TAG_AREA: u8 = 5;
const TAG_POINT_SET: u8 = 6;
const TAG_GEO_SHAPE: u8 = 7;

impl BinaryCodec for Geometry {
    fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        match self {
            Geometry::Point(p) => {
                write_u8(w, TAG_POINT)?;
                p.write(w)
            }
            Geometry::LineString(ls) => {
                write_u8(w, TAG_LINE_STRING)?;
                ls.write(w)
            }
            Geometry::LineSet(set) => {
                write_u8(w, TAG_LINE_SET)?;
                set.write(w)
            }
            Geometry::Ring(ring) => {
                write_u8(w, TAG_RING)?;
                ring.write(w)
            }
            Geometry::Area(area) => {
                write_u8(w, TAG_AREA)?;
                area.write(w)
            }
            Geometry::PointSet(set) => {
                write_u8(w, TAG_POINT_SET)?;
                set.write(w)
            }
            Geometry::GeoShape(shape) => {
                write_u8(w, TAG_GEO_SHAPE)?;
                shape.write(w)
            }
        }
    }

    fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ok(match read_u8(r)? {
            TAG_POINT => Geometry::Point(Vect::read(r)?),
            TAG_LINE_STRING => Geometry::LineString(LineString::read(r)?),
            TAG_LINE_SET => Geometry::LineSet(LineSet::read(r)?),
            TAG_RING => Geometry::Ring(Ring::read(r)?),
            TAG_AREA => Geometry::Area(Area::read(r)?),
            TAG_POINT_SET => Geometry::PointSet(PointSet::read(r)?),
            TAG_GEO_SHAPE => Geometry::GeoShape(GeoShape::read(r)?),
            tag => return Err(CodecError::Malformed(format!("unknown geometry tag {tag}")).into()),
        })
    }
}
