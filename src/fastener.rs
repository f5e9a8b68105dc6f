//! Fastener kinds and the records the Wood's fastener field is made of.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::surface::Surface;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fastener {
    OffsetNail,
    FlushNail,
    Staple,
    Screw,
}

impl Fastener {
    pub const ALL: [Fastener; 4] = [
        Fastener::OffsetNail,
        Fastener::FlushNail,
        Fastener::Staple,
        Fastener::Screw,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Fastener::OffsetNail => "OffsetNail",
            Fastener::FlushNail => "FlushNail",
            Fastener::Staple => "Staple",
            Fastener::Screw => "Screw",
        }
    }
}

impl fmt::Display for Fastener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One fastener embedded in the board. Positions are real numbers along a
/// single axis; `position <= 0` lies in the buffer region not yet entered
/// the work area.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FastenerRecord {
    pub position: f64,
    pub surface: Surface,
    pub kind: Fastener,
}

impl FastenerRecord {
    pub fn new(position: f64, surface: Surface, kind: Fastener) -> Self {
        FastenerRecord {
            position,
            surface,
            kind,
        }
    }
}
