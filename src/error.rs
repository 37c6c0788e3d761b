use std::fmt;

/// On-disk structure a failure or warning belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    Mbr,
    BootSector,
    BackupBootSector,
    FsInfo,
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Structure::Mbr => write!(f, "MBR"),
            Structure::BootSector => write!(f, "FAT boot sector"),
            Structure::BackupBootSector => write!(f, "FAT backup boot sector"),
            Structure::FsInfo => write!(f, "FSINFO sector"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of image at byte offset {offset}")]
    Eof { offset: u64 },
    #[error("{structure} truncated at byte offset {offset}")]
    Truncated { structure: Structure, offset: u64 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("scroll read failed")]
    Scroll(#[from] scroll::Error),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
    #[error("unsupported partition type 0x{0:02X}")]
    UnsupportedPartitionType(u8),
}

impl Error {
    /// Attributes an end-of-data failure to the structure being decoded.
    pub fn within(self, structure: Structure) -> Self {
        match self {
            Error::Eof { offset } => Error::Truncated { structure, offset },
            e => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Signature fields checked during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    MbrEnd,
    BootSectorEnd,
    FsInfoLead,
    FsInfoStruct,
    FsInfoTrail,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::MbrEnd => write!(f, "MBR end signature"),
            Signature::BootSectorEnd => write!(f, "FAT VBR end signature"),
            Signature::FsInfoLead => write!(f, "FSINFO lead signature"),
            Signature::FsInfoStruct => write!(f, "FSINFO structure signature"),
            Signature::FsInfoTrail => write!(f, "FSINFO trail signature"),
        }
    }
}

/// Non-fatal findings attached to an otherwise decoded structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    SignatureMismatch {
        signature: Signature,
        expected: u32,
        found: u32,
    },
    ExtendedBootSignature(u8),
    BackupBootSectorMismatch,
}

impl Warning {
    pub(crate) fn check(signature: Signature, expected: u32, found: u32) -> Option<Self> {
        if expected == found {
            return None;
        }
        let warning = Warning::SignatureMismatch {
            signature,
            expected,
            found,
        };
        log::warn!("{}", warning);
        Some(warning)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SignatureMismatch {
                signature,
                expected,
                found,
            } => write!(
                f,
                "{} does not match (expected 0x{:X}, found 0x{:X})",
                signature, expected, found
            ),
            Warning::ExtendedBootSignature(sig) => {
                write!(f, "extended boot signature 0x{:02X} is not 0x29", sig)
            }
            Warning::BackupBootSectorMismatch => {
                write!(f, "backup boot sector differs from the primary boot sector")
            }
        }
    }
}
