//! Loading an orrery from a text scene description.
//!
//! One body per line:
//!
//! ```text
//! name  color  scale  parent  orbit_radius  orbit_speed  spin_speed  [options...]
//! ```
//!
//! Speeds are in degrees per second, the parent is `-` for a body circling the origin, and
//! the options are any of `orbit_axis=x,y,z`, `spin_axis=x,y,z`,
//! `outline=rrggbb`, `light` and `model=path`. A parent has to be declared
//! before its children; `reparent child parent` lines can change the links
//! afterwards. Blank lines and lines starting with `#` are ignored.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use nalgebra::{Point3, Unit, Vector3};

use crate::error::{Error, Result};
use crate::model::orrery::{BodyID, BodyInfo, Motion, Orrery};

pub fn read_scene<P: AsRef<Path>>(path: P, clockwise: bool) -> Result<Orrery> {
    let text = fs::read_to_string(path)?;
    parse_scene(&text, clockwise)
}

pub fn parse_scene(text: &str, clockwise: bool) -> Result<Orrery> {
    let mut orrery = Orrery::new(clockwise);
    let mut name_to_id: HashMap<String, BodyID> = HashMap::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = Fields::new(line, line_no);
        let first = fields.next_str("name")?;

        if first == "reparent" {
            let child = lookup(&name_to_id, fields.next_str("child")?)?;
            let parent = match fields.next_str("parent")? {
                "-" => None,
                name => Some(lookup(&name_to_id, name)?),
            };
            fields.finish()?;
            orrery.set_parent(child, parent)?;
            continue;
        }

        if name_to_id.contains_key(first) {
            return Err(Error::DuplicateBody(first.to_owned()));
        }

        let mut info = BodyInfo::new(first, parse_color(fields.next_str("color")?, line_no)?, 1.0);
        info.scale = fields.next_parsed("scale")?;
        let parent = fields.next_str("parent")?;

        let mut motion = Motion::circular(
            fields.next_parsed("orbit radius")?,
            fields.next_parsed::<f32>("orbit speed")?.to_radians(),
            fields.next_parsed::<f32>("spin speed")?.to_radians(),
        );
        apply_options(&mut fields, &mut info, &mut motion)?;

        // Bodies without a parent orbit the world origin
        let id = match parent {
            "-" => orrery.add_root_body(info, motion),
            parent => {
                let parent_id = lookup(&name_to_id, parent)?;
                orrery.add_body(info, motion, parent_id)
            }
        };

        name_to_id.insert(first.to_owned(), id);
    }

    log::info!("Loaded {} bodies", orrery.num_bodies());
    Ok(orrery)
}

fn lookup(name_to_id: &HashMap<String, BodyID>, name: &str) -> Result<BodyID> {
    name_to_id
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnknownBody(name.to_owned()))
}

fn apply_options(fields: &mut Fields, info: &mut BodyInfo, motion: &mut Motion) -> Result<()> {
    while let Some(option) = fields.next_optional() {
        let (key, value) = match option.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (option, None),
        };

        match (key, value) {
            ("light", None) => info.emits_light = true,
            ("outline", Some(value)) => info.outline = Some(parse_color(value, fields.line)?),
            ("model", Some(value)) => info.model = Some(PathBuf::from(value)),
            ("orbit_axis", Some(value)) => {
                motion.orbit_axis = parse_axis(value, fields.line, &info.name)?;
            }
            ("spin_axis", Some(value)) => {
                motion.spin_axis = parse_axis(value, fields.line, &info.name)?;
            }
            _ => return Err(parse_error(fields.line, format!("unknown option {:?}", option))),
        }
    }
    Ok(())
}

fn parse_axis(s: &str, line: usize, name: &str) -> Result<Unit<Vector3<f32>>> {
    let coords = s
        .split(',')
        .map(|c| c.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| parse_error(line, format!("bad axis {:?}: {}", s, e)))?;

    let v = match coords.as_slice() {
        &[x, y, z] => Vector3::new(x, y, z),
        _ => return Err(parse_error(line, format!("axis {:?} needs three components", s))),
    };

    Unit::try_new(v, 1e-6).ok_or_else(|| Error::ZeroAxis(name.to_owned()))
}

/// Parses `rrggbb` into a color with components in [0, 1].
pub fn parse_color(s: &str, line: usize) -> Result<Point3<f32>> {
    let s = s.trim_start_matches('#');
    if s.len() != 6 || !s.is_ascii() {
        return Err(parse_error(line, format!("bad color {:?}", s)));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16)
            .map(|c| c as f32 / 255.0)
            .map_err(|e| parse_error(line, format!("bad color {:?}: {}", s, e)))
    };
    Ok(Point3::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn parse_error(line: usize, message: String) -> Error {
    Error::Parse { line, message }
}

struct Fields<'a> {
    inner: std::str::SplitAsciiWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Fields {
            inner: text.split_ascii_whitespace(),
            line,
        }
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| parse_error(self.line, format!("missing {}", what)))
    }

    fn next_parsed<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let s = self.next_str(what)?;
        s.parse()
            .map_err(|e| parse_error(self.line, format!("bad {} {:?}: {}", what, s, e)))
    }

    fn next_optional(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    fn finish(&mut self) -> Result<()> {
        match self.inner.next() {
            Some(extra) => Err(parse_error(self.line, format!("unexpected {:?}", extra))),
            None => Ok(()),
        }
    }
}
