//! Bracketed literal encoding.
//!
//! Each value is a JSON array whose first element is a two-letter tag:
//!
//! | Tag  | Layout                                        |
//! |------|-----------------------------------------------|
//! | `PT` | `["PT", x, y]`                                |
//! | `LN` | `["LN", x0, y0, x1, y1, ...]`                 |
//! | `RG` | `["RG", x0, y0, ..., x0, y0]` (closed)        |
//! | `LT` | `["LT", [x, y, ...], [x, y, ...], ...]`       |
//! | `PS` | `["PS", x, y, x, y, ...]`                     |
//! | `AR` | `["AR", shell or null, child AR, ...]`        |
//! | `GS` | `["GS", AR or null, LT or null, PS or null]`  |
//!
//! Numbers are written in their shortest round-tripping form, so decoding
//! an encoded value yields an equal value.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{CodecError, PolynetError, Result};
use crate::geometry::{Area, GeoShape, Geometry, LineSet, LineString, PointSet, Ring};
use crate::math::{Tolerance, Vect};

fn push_points(out: &mut Vec<Value>, points: &[Vect]) {
    for p in points {
        out.push(Value::from(p.x()));
        out.push(Value::from(p.y()));
    }
}

fn tagged(tag: &str) -> Vec<Value> {
    vec![Value::from(tag)]
}

fn ring_value(ring: &Ring) -> Value {
    let mut out = tagged("RG");
    push_points(&mut out, ring.vertices());
    push_points(&mut out, &ring.vertices()[..1]);
    Value::Array(out)
}

fn line_string_value(ls: &LineString) -> Value {
    let mut out = tagged("LN");
    push_points(&mut out, ls.vertices());
    Value::Array(out)
}

fn line_set_value(set: &LineSet) -> Value {
    let mut out = tagged("LT");
    for line in set.lines() {
        let mut coords = Vec::with_capacity(line.vertices().len() * 2);
        push_points(&mut coords, line.vertices());
        out.push(Value::Array(coords));
    }
    Value::Array(out)
}

fn point_set_value(set: &PointSet) -> Value {
    let mut out = tagged("PS");
    push_points(&mut out, set.points());
    Value::Array(out)
}

fn area_value(area: &Area) -> Value {
    let mut out = tagged("AR");
    out.push(area.shell().map_or(Value::Null, ring_value));
    out.extend(area.children().iter().map(area_value));
    Value::Array(out)
}

fn geo_shape_value(shape: &GeoShape) -> Value {
    let mut out = tagged("GS");
    out.push(shape.area().map_or(Value::Null, area_value));
    out.push(shape.lines().map_or(Value::Null, line_set_value));
    out.push(shape.points().map_or(Value::Null, point_set_value));
    Value::Array(out)
}

/// Encodes a geometry as a JSON value.
#[must_use]
pub fn to_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(p) => {
            let mut out = tagged("PT");
            push_points(&mut out, std::slice::from_ref(p));
            Value::Array(out)
        }
        Geometry::LineString(ls) => line_string_value(ls),
        Geometry::LineSet(set) => line_set_value(set),
        Geometry::Ring(ring) => ring_value(ring),
        Geometry::Area(area) => area_value(area),
        Geometry::PointSet(set) => point_set_value(set),
        Geometry::GeoShape(shape) => geo_shape_value(shape),
    }
}

/// Decodes a geometry from a JSON value.
///
/// # Errors
///
/// Returns `CodecError::MissingValue` for a `null` where a value is
/// required, `CodecError::UnknownTag` for an unrecognised tag, and
/// `CodecError::Malformed` or a geometry error for anything else that does
/// not describe a valid geometry.
pub fn from_value(value: &Value) -> Result<Geometry> {
    let (tag, items) = split_tag(value, "geometry")?;
    Ok(match tag {
        "PT" => {
            let coords = numbers(items)?;
            match coords.as_slice() {
                &[x, y] => Geometry::Point(Vect::new(x, y)?),
                _ => return Err(malformed(format!("point needs 2 numbers, got {}", coords.len()))),
            }
        }
        "LN" => Geometry::LineString(LineString::from_coords(&numbers(items)?)?),
        "RG" => Geometry::Ring(decode_ring(value)?),
        "LT" => Geometry::LineSet(decode_line_set(value)?),
        "PS" => Geometry::PointSet(decode_point_set(value)?),
        "AR" => Geometry::Area(decode_area(value)?),
        "GS" => Geometry::GeoShape(decode_geo_shape(items)?),
        other => return Err(CodecError::UnknownTag(other.to_owned()).into()),
    })
}

fn malformed(message: String) -> PolynetError {
    CodecError::Malformed(message).into()
}

fn split_tag<'v>(value: &'v Value, what: &'static str) -> Result<(&'v str, &'v [Value])> {
    match value {
        Value::Null => Err(CodecError::MissingValue(what).into()),
        Value::Array(items) => match items.split_first() {
            Some((Value::String(tag), rest)) => Ok((tag.as_str(), rest)),
            _ => Err(malformed(format!("{what} literal must start with a tag"))),
        },
        other => Err(malformed(format!("expected a {what} literal, got {other}"))),
    }
}

fn expect_tag<'v>(value: &'v Value, tag: &str, what: &'static str) -> Result<&'v [Value]> {
    let (found, items) = split_tag(value, what)?;
    if found == tag {
        Ok(items)
    } else {
        Err(malformed(format!("expected {tag} for {what}, got {found}")))
    }
}

fn numbers(items: &[Value]) -> Result<Vec<f64>> {
    items
        .iter()
        .map(|v| match v {
            Value::Null => Err(CodecError::MissingValue("coordinate").into()),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| malformed(format!("{n} is not a coordinate"))),
            other => Err(malformed(format!("{other} is not a coordinate"))),
        })
        .collect()
}

fn decode_ring(value: &Value) -> Result<Ring> {
    Ring::from_coords(&numbers(expect_tag(value, "RG", "ring")?)?)
}

fn decode_line_set(value: &Value) -> Result<LineSet> {
    let lines = expect_tag(value, "LT", "line set")?
        .iter()
        .map(|line| match line {
            Value::Array(coords) => LineString::from_coords(&numbers(coords)?),
            Value::Null => Err(CodecError::MissingValue("line").into()),
            other => Err(malformed(format!("{other} is not a coordinate list"))),
        })
        .collect::<Result<Vec<_>>>()?;
    LineSet::value_of(lines).ok_or_else(|| malformed("line set has no lines".to_owned()))
}

fn decode_point_set(value: &Value) -> Result<PointSet> {
    let coords = numbers(expect_tag(value, "PS", "point set")?)?;
    let points = crate::geometry::points_from_coords(&coords)?;
    PointSet::value_of(points, Tolerance::default())
        .ok_or_else(|| malformed("point set has no points".to_owned()))
}

fn decode_area(value: &Value) -> Result<Area> {
    let items = expect_tag(value, "AR", "area")?;
    let Some((shell, children)) = items.split_first() else {
        return Err(CodecError::MissingValue("area shell").into());
    };
    let shell = match shell {
        Value::Null => None,
        ring => Some(decode_ring(ring)?),
    };
    let children = children.iter().map(decode_area).collect::<Result<Vec<_>>>()?;
    if shell.is_none() && children.is_empty() {
        return Err(malformed("area has neither shell nor children".to_owned()));
    }
    Ok(Area::from_parts(shell, children))
}

fn decode_geo_shape(items: &[Value]) -> Result<GeoShape> {
    let [area, lines, points] = items else {
        return Err(malformed(format!("shape needs 3 parts, got {}", items.len())));
    };
    let area = (!area.is_null()).then(|| decode_area(area)).transpose()?;
    let lines = (!lines.is_null()).then(|| decode_line_set(lines)).transpose()?;
    let points = (!points.is_null()).then(|| decode_point_set(points)).transpose()?;
    GeoShape::value_of(area, lines, points)
        .ok_or_else(|| malformed("shape has no parts".to_owned()))
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_value(self))
    }
}

impl fmt::Display for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ring_value(self))
    }
}

impl fmt::Display for LineString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", line_string_value(self))
    }
}

impl fmt::Display for LineSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", line_set_value(self))
    }
}

impl fmt::Display for PointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", point_set_value(self))
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", area_value(self))
    }
}

impl fmt::Display for GeoShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", geo_shape_value(self))
    }
}

impl FromStr for Geometry {
    type Err = PolynetError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| CodecError::Malformed(e.to_string()))?;
        from_value(&value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeometryError;

    fn round_trip(g: &Geometry) {
        let text = g.to_string();
        let back: Geometry = text.parse().unwrap();
        assert_eq!(&back, g, "{text}");
        assert_eq!(back.to_string(), text);
    }

    fn square(x: f64, y: f64, size: f64) -> Ring {
        Ring::from_coords(&[x, y, x + size, y, x + size, y + size, x, y + size]).unwrap()
    }

    #[test]
    fn ring_literal_is_closed() {
        let ring = Ring::from_coords(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0]).unwrap();
        assert_eq!(ring.to_string(), r#"["RG",0.0,0.0,10.0,0.0,10.0,10.0,0.0,0.0]"#);
    }

    #[test]
    fn line_set_literal() {
        let set = LineSet::value_of(vec![
            LineString::from_coords(&[0.0, 0.0, 1.0, 1.0]).unwrap(),
            LineString::from_coords(&[2.0, 2.0, 3.0, 3.5]).unwrap(),
        ])
        .unwrap();
        assert_eq!(set.to_string(), r#"["LT",[0.0,0.0,1.0,1.0],[2.0,2.0,3.0,3.5]]"#);
    }

    #[test]
    fn round_trips() {
        round_trip(&Geometry::from(Vect::new(0.1, -2.5e-7).unwrap()));
        round_trip(&Geometry::from(square(0.1, 0.2, 1.0 / 3.0)));
        round_trip(&Geometry::from(
            LineString::from_coords(&[0.0, 0.0, 1.0, 1.0, 2.0, 0.0]).unwrap(),
        ));
        round_trip(&Geometry::from(
            PointSet::value_of(
                vec![Vect::new(3.0, 1.0).unwrap(), Vect::new(-1.0, 7.25).unwrap()],
                Tolerance::default(),
            )
            .unwrap(),
        ));
        let area = Area::assemble(
            vec![
                square(0.0, 0.0, 10.0),
                square(2.0, 2.0, 6.0),
                square(4.0, 4.0, 2.0),
                square(20.0, 0.0, 1.0),
            ],
            Tolerance::default(),
        )
        .unwrap();
        round_trip(&Geometry::from(area.clone()));

        let line = LineString::from_coords(&[30.0, 0.0, 31.0, 0.0]).unwrap();
        let lines = LineSet::value_of(vec![line]);
        let shape = GeoShape::value_of(Some(area), lines, None).unwrap();
        round_trip(&Geometry::from(shape));
    }

    #[test]
    fn decode_errors() {
        let err = "null".parse::<Geometry>().unwrap_err();
        assert!(matches!(err, PolynetError::Codec(CodecError::MissingValue(_))));

        let err = r#"["XX",1,2]"#.parse::<Geometry>().unwrap_err();
        assert!(matches!(err, PolynetError::Codec(CodecError::UnknownTag(t)) if t == "XX"));

        let err = r#"["RG",0,0,1"#.parse::<Geometry>().unwrap_err();
        assert!(matches!(err, PolynetError::Codec(CodecError::Malformed(_))));

        let err = r#"["RG",0,0,1,1,0,0]"#.parse::<Geometry>().unwrap_err();
        assert!(matches!(err, PolynetError::Geometry(GeometryError::TooFewPoints { .. })));

        let err = r#"["PT",1,null]"#.parse::<Geometry>().unwrap_err();
        assert!(matches!(err, PolynetError::Codec(CodecError::MissingValue("coordinate"))));

        let err = r#"["GS",null,null,null]"#.parse::<Geometry>().unwrap_err();
        assert!(matches!(err, PolynetError::Codec(CodecError::Malformed(_))));
    }
}
