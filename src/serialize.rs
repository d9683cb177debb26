//! serde helpers for complex config fields. num-complex's own serde
//! support writes `[re, im]` tuples; config files use `{"re":..,"im":..}`
//! maps, so these go through a local rectangular mirror instead.

use num_complex::Complex64;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
struct Rect {
    re: f64,
    im: f64,
}

pub fn serialize_cx<S>(c: &Complex64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Rect { re: c.re, im: c.im }.serialize(serializer)
}

pub fn deserialize_cx<'de, D>(deserializer: D) -> Result<Complex64, D::Error>
where
    D: Deserializer<'de>,
{
    Rect::deserialize(deserializer).map(|r| Complex64::new(r.re, r.im))
}

pub fn serialize_cx_vec<S>(v: &[Complex64], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    v.iter()
        .map(|c| Rect { re: c.re, im: c.im })
        .collect::<Vec<_>>()
        .serialize(serializer)
}

pub fn deserialize_cx_vec<'de, D>(deserializer: D) -> Result<Vec<Complex64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Rect>::deserialize(deserializer)
        .map(|v| v.into_iter().map(|r| Complex64::new(r.re, r.im)).collect())
}
