//! Saving and loading diagrams.
//!
//! A diagram file is CSV: a version line, a header, then one record per object
//! in list order.
//!
//! ```text
//! # spacetime-diagram v1
//! kind,name,t,x,beta
//! event,launch,0,0,
//! traveller,ship,0,0,0.5
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::objects::ObjectList;
use crate::spacetime::SpacetimeEntity;

/// Bumped every time the record layout changes.
pub const FILE_VERSION: u32 = 1;

const VERSION_PREFIX: &str = "# spacetime-diagram v";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Kind {
    Event,
    Traveller,
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    kind: Kind,
    name: String,
    t: f64,
    x: f64,
    beta: Option<f64>,
}

impl From<&SpacetimeEntity> for Record {
    fn from(object: &SpacetimeEntity) -> Self {
        let (kind, beta) = match object.as_traveller() {
            Some(traveller) => (Kind::Traveller, Some(traveller.rest_beta())),
            None => (Kind::Event, None),
        };
        Record {
            kind,
            name: object.name().to_string(),
            t: object.rest_t(),
            x: object.rest_x(),
            beta,
        }
    }
}

impl Record {
    fn into_entity(self, row: usize) -> Result<SpacetimeEntity, StoreError> {
        match self.kind {
            Kind::Event => Ok(SpacetimeEntity::event(self.name, self.t, self.x)),
            Kind::Traveller => {
                let beta = self.beta.ok_or(StoreError::MissingBeta { row })?;
                SpacetimeEntity::traveller(self.name, beta, self.t, self.x)
                    .map_err(|source| StoreError::Velocity { row, source })
            }
        }
    }
}

pub fn write_diagram<W: Write>(mut writer: W, objects: &ObjectList) -> Result<(), StoreError> {
    writeln!(writer, "{VERSION_PREFIX}{FILE_VERSION}")?;
    let mut csv = csv::Writer::from_writer(writer);
    for object in objects {
        csv.serialize(Record::from(object))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn read_diagram<R: Read>(reader: R) -> Result<ObjectList, StoreError> {
    let mut reader = BufReader::new(reader);

    let mut first = String::new();
    reader.read_line(&mut first)?;
    let version = first
        .trim()
        .strip_prefix(VERSION_PREFIX)
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or(StoreError::MissingVersion)?;
    if version != FILE_VERSION {
        return Err(StoreError::UnsupportedVersion(version));
    }

    let mut csv = csv::Reader::from_reader(reader);
    let mut objects = ObjectList::new();
    for (i, record) in csv.deserialize::<Record>().enumerate() {
        // rows counted from 1, after the header
        objects.push(record?.into_entity(i + 1)?);
    }
    Ok(objects)
}

pub fn save(path: &Path, objects: &ObjectList) -> Result<(), StoreError> {
    let file = File::create(path)?;
    write_diagram(file, objects)?;
    log::info!("saved {} objects to {}", objects.len(), path.display());
    Ok(())
}

pub fn load(path: &Path) -> Result<ObjectList, StoreError> {
    let objects = read_diagram(File::open(path)?)?;
    log::info!("loaded {} objects from {}", objects.len(), path.display());
    Ok(objects)
}
