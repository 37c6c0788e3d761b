use crate::device::{ByteCursor, Device};
use crate::error::{Result, Signature, Structure, Warning};

use super::FatType;

pub const FAT16_BOOTSTRAP_SIZE: usize = 448;
pub const FAT32_BOOTSTRAP_SIZE: usize = 420;

const FAT32_RESERVED_SIZE: u64 = 12;

/// BIOS Parameter Block. The FAT32 extension is only present when the partition
/// was declared FAT32.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bpb {
    pub bytes_per_sector: u16, // 512, 1024, 2048, 4096
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16, // boot sector, FSINFO and friends
    pub num_fats: u8,
    pub root_entries_f16: u16, // 0 on FAT32
    pub total_sectors_16bit: u16, // 0 => see total_sectors_32bit
    pub media_descriptor: u8,
    pub sectors_per_fat_f16: u16, // 0 on FAT32
    pub sectors_per_track: u16,
    pub num_heads: u16,
    pub hidden_sectors: u32,
    pub total_sectors_32bit: u32,
    pub layout: BpbLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BpbLayout {
    Fat12,
    Fat16B,
    Fat32(Fat32Bpb),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fat32Bpb {
    pub sectors_per_fat: u32,
    pub eflags: u16, // bits 0-3: active FAT, bit 7: mirroring disabled
    pub version: u16,
    pub root_cluster: u32,
    pub fsinfo_sector: u16,
    pub backup_sector: u16, // 0 => no backup boot sector
}

impl Bpb {
    pub fn fat_type(&self) -> FatType {
        match self.layout {
            BpbLayout::Fat12 => FatType::Fat12,
            BpbLayout::Fat16B => FatType::Fat16B,
            BpbLayout::Fat32(_) => FatType::Fat32,
        }
    }

    pub fn fat32(&self) -> Option<&Fat32Bpb> {
        match &self.layout {
            BpbLayout::Fat32(ext) => Some(ext),
            _ => None,
        }
    }
}

/// Extended BIOS Parameter Block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ebpb {
    pub physical_drive_num: u8,
    pub reserved: u8,
    pub eb_sig: u8, // 0x29
    pub volume_serial: u32,
    pub volume_label: [u8; 11],
    pub system_id: [u8; 8], // "FAT32   ", "FAT16   ", ...
}

#[derive(Debug, Clone)]
pub struct BootSector {
    pub jump: [u8; 3],
    pub oem_id: [u8; 8],
    pub bpb: Bpb,
    pub ebpb: Ebpb,
    pub bootstrap_code: Vec<u8>, // FAT16_BOOTSTRAP_SIZE or FAT32_BOOTSTRAP_SIZE
    pub signature: [u8; 2],
    pub warnings: Vec<Warning>,
}

impl BootSector {
    pub fn has_valid_signature(&self) -> bool {
        self.signature == [0x55, 0xAA]
    }

    pub fn oem_name(&self) -> String {
        ascii(&self.oem_id)
    }

    pub fn volume_label(&self) -> String {
        ascii(&self.ebpb.volume_label)
    }

    pub fn system_id(&self) -> String {
        ascii(&self.ebpb.system_id)
    }
}

// `imprecise`, non printable bytes become '.'
fn ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        })
        .collect()
}

/// Decodes a FAT volume boot record at the cursor's position, reading the field
/// set `typ` dictates.
pub fn decode_boot_sector<D: Device>(
    cursor: &mut ByteCursor<D>,
    typ: FatType,
) -> Result<BootSector> {
    decode_boot_sector_as(cursor, typ, Structure::BootSector)
}

pub(crate) fn decode_boot_sector_as<D: Device>(
    cursor: &mut ByteCursor<D>,
    typ: FatType,
    structure: Structure,
) -> Result<BootSector> {
    read_boot_sector(cursor, typ).map_err(|e| e.within(structure))
}

fn read_boot_sector<D: Device>(cursor: &mut ByteCursor<D>, typ: FatType) -> Result<BootSector> {
    let jump = cursor.read_array::<3>()?;
    let oem_id = cursor.read_array::<8>()?;
    let bpb = read_bpb(cursor, typ)?;
    let ebpb = read_ebpb(cursor)?;

    let bootstrap_code = match typ {
        FatType::Fat32 => cursor.read_bytes(FAT32_BOOTSTRAP_SIZE)?,
        FatType::Fat12 | FatType::Fat16B => cursor.read_bytes(FAT16_BOOTSTRAP_SIZE)?,
    };
    let signature = cursor.read_array::<2>()?;

    let mut warnings: Vec<Warning> = Warning::check(
        Signature::BootSectorEnd,
        0xAA55,
        u16::from_le_bytes(signature) as u32,
    )
    .into_iter()
    .collect();
    if ebpb.eb_sig != 0x29 && ebpb.eb_sig != 0x28 {
        let warning = Warning::ExtendedBootSignature(ebpb.eb_sig);
        log::warn!("{}", warning);
        warnings.push(warning);
    }

    log::debug!(
        "{:?} boot sector: {} bytes/sector, {} sectors/cluster, {} reserved, {} FATs",
        typ,
        bpb.bytes_per_sector,
        bpb.sectors_per_cluster,
        bpb.reserved_sectors,
        bpb.num_fats
    );

    Ok(BootSector {
        jump,
        oem_id,
        bpb,
        ebpb,
        bootstrap_code,
        signature,
        warnings,
    })
}

fn read_bpb<D: Device>(cursor: &mut ByteCursor<D>, typ: FatType) -> Result<Bpb> {
    let bytes_per_sector = cursor.read_u16_le()?;
    let sectors_per_cluster = cursor.read_u8()?;
    let reserved_sectors = cursor.read_u16_le()?;
    let num_fats = cursor.read_u8()?;
    let root_entries_f16 = cursor.read_u16_le()?;
    let total_sectors_16bit = cursor.read_u16_le()?;
    let media_descriptor = cursor.read_u8()?;
    let sectors_per_fat_f16 = cursor.read_u16_le()?;
    let sectors_per_track = cursor.read_u16_le()?;
    let num_heads = cursor.read_u16_le()?;
    let hidden_sectors = cursor.read_u32_le()?;
    let total_sectors_32bit = cursor.read_u32_le()?;

    let layout = match typ {
        FatType::Fat12 => BpbLayout::Fat12,
        FatType::Fat16B => BpbLayout::Fat16B,
        FatType::Fat32 => {
            let ext = Fat32Bpb {
                sectors_per_fat: cursor.read_u32_le()?,
                eflags: cursor.read_u16_le()?,
                version: cursor.read_u16_le()?,
                root_cluster: cursor.read_u32_le()?,
                fsinfo_sector: cursor.read_u16_le()?,
                backup_sector: cursor.read_u16_le()?,
            };
            cursor.skip(FAT32_RESERVED_SIZE)?;
            BpbLayout::Fat32(ext)
        }
    };

    Ok(Bpb {
        bytes_per_sector,
        sectors_per_cluster,
        reserved_sectors,
        num_fats,
        root_entries_f16,
        total_sectors_16bit,
        media_descriptor,
        sectors_per_fat_f16,
        sectors_per_track,
        num_heads,
        hidden_sectors,
        total_sectors_32bit,
        layout,
    })
}

fn read_ebpb<D: Device>(cursor: &mut ByteCursor<D>) -> Result<Ebpb> {
    Ok(Ebpb {
        physical_drive_num: cursor.read_u8()?,
        reserved: cursor.read_u8()?,
        eb_sig: cursor.read_u8()?,
        volume_serial: cursor.read_u32_le()?,
        volume_label: cursor.read_array()?,
        system_id: cursor.read_array()?,
    })
}
