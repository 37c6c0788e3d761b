use scroll::Pread;

use crate::device::{ByteCursor, Device};
use crate::error::{Result, Signature, Structure, Warning};

pub const MBR_SIZE: usize = 512;
pub const BOOT_LOADER_SIZE: usize = 446;

/// One of the four 16-byte slots of the MBR partition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pread)]
pub struct PartitionEntry {
    pub boot_indicator: u8, // 0x80 = bootable
    pub head_start: u8,
    pub sector_start: u8,
    pub cylinder_start: u8,
    pub typ: u8,
    pub head_end: u8,
    pub sector_end: u8,
    pub cylinder_end: u8,
    pub relative_sector: u32, // LBA of the first sector
    pub num_sectors: u32,
}

impl PartitionEntry {
    pub const SIZE: usize = 16;

    pub fn partition_type(&self) -> PartitionType {
        self.typ.into()
    }

    pub fn is_bootable(&self) -> bool {
        self.boot_indicator == 0x80
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionType {
    Empty,
    Fat12,
    Fat16B, // over 32MB
    Ntfs,
    Fat32,
    Other(u8),
}

impl From<u8> for PartitionType {
    fn from(typ: u8) -> Self {
        match typ {
            0x00 => PartitionType::Empty,
            0x01 => PartitionType::Fat12,
            0x06 => PartitionType::Fat16B,
            0x07 => PartitionType::Ntfs,
            0x0B => PartitionType::Fat32,
            other => PartitionType::Other(other),
        }
    }
}

impl From<PartitionType> for u8 {
    fn from(typ: PartitionType) -> Self {
        match typ {
            PartitionType::Empty => 0x00,
            PartitionType::Fat12 => 0x01,
            PartitionType::Fat16B => 0x06,
            PartitionType::Ntfs => 0x07,
            PartitionType::Fat32 => 0x0B,
            PartitionType::Other(other) => other,
        }
    }
}

impl PartitionType {
    pub fn name(&self) -> &'static str {
        match self {
            PartitionType::Empty => "Empty",
            PartitionType::Fat12 => "DOS 12-bit FAT",
            PartitionType::Fat16B => "DOS 16-bit FAT for partitions larger than 32 MB",
            PartitionType::Ntfs => "NTFS",
            PartitionType::Fat32 => "DOS 32-bit FAT",
            PartitionType::Other(_) => "Unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MasterBootRecord {
    pub boot_loader: [u8; BOOT_LOADER_SIZE],
    pub entries: [PartitionEntry; 4],
    pub signature: [u8; 2], // 0x55 0xAA
    pub warnings: Vec<Warning>,
}

impl MasterBootRecord {
    pub fn has_valid_signature(&self) -> bool {
        self.signature == [0x55, 0xAA]
    }
}

/// Decodes the 512-byte MBR at the cursor's current position.
pub fn decode_mbr<D: Device>(cursor: &mut ByteCursor<D>) -> Result<MasterBootRecord> {
    read_mbr(cursor).map_err(|e| e.within(Structure::Mbr))
}

fn read_mbr<D: Device>(cursor: &mut ByteCursor<D>) -> Result<MasterBootRecord> {
    let boot_loader = cursor.read_array::<BOOT_LOADER_SIZE>()?;
    let entries = [
        read_entry(cursor)?,
        read_entry(cursor)?,
        read_entry(cursor)?,
        read_entry(cursor)?,
    ];
    let signature = cursor.read_array::<2>()?;

    let warnings = Warning::check(
        Signature::MbrEnd,
        0xAA55,
        u16::from_le_bytes(signature) as u32,
    )
    .into_iter()
    .collect();

    for (i, e) in entries.iter().enumerate() {
        log::debug!(
            "mbr slot {}: type 0x{:02X} lba {} sectors {}",
            i,
            e.typ,
            e.relative_sector,
            e.num_sectors
        );
    }

    Ok(MasterBootRecord {
        boot_loader,
        entries,
        signature,
        warnings,
    })
}

fn read_entry<D: Device>(cursor: &mut ByteCursor<D>) -> Result<PartitionEntry> {
    cursor.read_record(PartitionEntry::SIZE)
}
