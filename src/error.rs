use thiserror::Error;

use crate::model::orrery::BodyID;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read scene file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("No body named {0:?}")]
    UnknownBody(String),
    #[error("A body named {0:?} already exists")]
    DuplicateBody(String),
    #[error("Making {child:?} orbit {parent:?} would create a cycle")]
    ParentCycle { child: BodyID, parent: BodyID },
    #[error("{child:?} was updated before its parent {parent:?} in this frame")]
    StaleParent { child: BodyID, parent: BodyID },
    #[error("Axis for {0:?} has zero length")]
    ZeroAxis(String),
}
