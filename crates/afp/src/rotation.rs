use crate::error::AfpError;

/// Page and object orientation, restricted to quarter turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// The next quarter turn clockwise.
    pub fn quarter_turn(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// MO:DCA 2-byte orientation code (degrees / 2 in the high byte).
    pub fn orientation(self) -> [u8; 2] {
        [(self.degrees() / 2) as u8, 0x00]
    }
}

impl TryFrom<i32> for Rotation {
    type Error = AfpError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(AfpError::InvalidRotation(other)),
        }
    }
}
