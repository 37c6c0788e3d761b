// References:
// [1] https://download.microsoft.com/download/1/6/1/161ba512-40e2-4cc9-843a-923143f3456c/fatgen103.doc
// [2] http://elm-chan.org/docs/fat_e.html
// [3] https://en.wikipedia.org/wiki/Design_of_the_FAT_file_system#FAT

pub mod boot_sector;
pub mod fsinfo;
pub mod geometry;

use crate::error::{Error, Result, Warning};
use crate::mbr::PartitionType;

pub use boot_sector::{decode_boot_sector, Bpb, BpbLayout, BootSector, Ebpb, Fat32Bpb};
pub use fsinfo::{decode_fsinfo, FsInfo};

/// FAT flavours recognised from the MBR partition type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatType {
    Fat12,
    Fat16B,
    Fat32,
}

impl TryFrom<PartitionType> for FatType {
    type Error = Error;
    fn try_from(typ: PartitionType) -> Result<Self> {
        match typ {
            PartitionType::Fat12 => Ok(FatType::Fat12),
            PartitionType::Fat16B => Ok(FatType::Fat16B),
            PartitionType::Fat32 => Ok(FatType::Fat32),
            other => Err(Error::UnsupportedPartitionType(other.into())),
        }
    }
}

impl From<FatType> for PartitionType {
    fn from(typ: FatType) -> Self {
        match typ {
            FatType::Fat12 => PartitionType::Fat12,
            FatType::Fat16B => PartitionType::Fat16B,
            FatType::Fat32 => PartitionType::Fat32,
        }
    }
}

/// A FAT volume located through the MBR.
#[derive(Debug)]
pub struct Partition {
    pub typ: FatType,
    pub start_pos: u64, // byte offset of the boot sector in the image
    pub boot_sector: BootSector,
    pub fsinfo: Option<Result<FsInfo>>, // FAT32 only
    pub backup_boot_sector: Option<BootSector>, // FAT32 only
    pub warnings: Vec<Warning>,
}

impl Partition {
    /// Byte offset in the image of a sector relative to this partition.
    pub fn absolute_offset(&self, sector: u32) -> u64 {
        geometry::absolute_offset(self.start_pos, &self.boot_sector, sector)
    }

    pub fn fsinfo(&self) -> Option<&FsInfo> {
        match &self.fsinfo {
            Some(Ok(fsinfo)) => Some(fsinfo),
            _ => None,
        }
    }

    /// Warnings of the partition and every structure it owns.
    pub fn all_warnings(&self) -> Vec<&Warning> {
        let mut warnings: Vec<&Warning> = self.boot_sector.warnings.iter().collect();
        if let Some(fsinfo) = self.fsinfo() {
            warnings.extend(fsinfo.warnings.iter());
        }
        warnings.extend(self.warnings.iter());
        warnings
    }
}
