//! Sector arithmetic over a decoded boot sector.
//!
//! Results are sector numbers counted from the partition's boot sector, except
//! that the data region start also adds the hidden sectors. Turn them into
//! image offsets with [`absolute_offset`].

use crate::error::{Error, Result};

use super::boot_sector::{BootSector, BpbLayout};

const DIR_ENTRY_SIZE: u32 = 32;

fn ensure_sector_size(bs: &BootSector) -> Result<()> {
    if bs.bpb.bytes_per_sector == 0 {
        return Err(Error::InvalidGeometry("bytes per sector is 0"));
    }
    Ok(())
}

fn overflow() -> Error {
    Error::InvalidGeometry("sector arithmetic overflow")
}

pub fn sectors_per_fat(bs: &BootSector) -> u32 {
    match &bs.bpb.layout {
        BpbLayout::Fat32(ext) => ext.sectors_per_fat,
        BpbLayout::Fat12 | BpbLayout::Fat16B => bs.bpb.sectors_per_fat_f16 as u32,
    }
}

pub fn total_sectors(bs: &BootSector) -> u32 {
    match bs.bpb.total_sectors_16bit {
        0 => bs.bpb.total_sectors_32bit,
        n => n as u32,
    }
}

/// Last sector occupied by the FAT copies.
pub fn fat_area_end_sector(bs: &BootSector) -> Result<u32> {
    ensure_sector_size(bs)?;
    sectors_per_fat(bs)
        .checked_mul(bs.bpb.num_fats as u32)
        .and_then(|fats| fats.checked_add(bs.bpb.reserved_sectors as u32))
        .and_then(|end| end.checked_sub(1))
        .ok_or_else(overflow)
}

/// 0 on FAT32, where the root directory lives in the data region.
pub fn root_dir_size_sectors(bs: &BootSector) -> Result<u32> {
    ensure_sector_size(bs)?;
    match bs.bpb.layout {
        BpbLayout::Fat32(_) => Ok(0),
        BpbLayout::Fat12 | BpbLayout::Fat16B => Ok((bs.bpb.root_entries_f16 as u32
            * DIR_ENTRY_SIZE)
            .div_ceil(bs.bpb.bytes_per_sector as u32)),
    }
}

pub fn root_dir_start_sector(bs: &BootSector) -> Result<u32> {
    fat_area_end_sector(bs)?.checked_add(1).ok_or_else(overflow)
}

/// First data sector, counted with the hidden sectors preceding the volume.
pub fn data_region_start_sector(bs: &BootSector) -> Result<u32> {
    root_dir_start_sector(bs)?
        .checked_add(root_dir_size_sectors(bs)?)
        .and_then(|s| s.checked_add(bs.bpb.hidden_sectors))
        .ok_or_else(overflow)
}

pub fn data_region_sectors(bs: &BootSector) -> Result<u32> {
    let metadata = root_dir_start_sector(bs)?
        .checked_add(root_dir_size_sectors(bs)?)
        .ok_or_else(overflow)?;
    total_sectors(bs)
        .checked_sub(metadata)
        .ok_or(Error::InvalidGeometry("metadata exceeds volume size"))
}

pub fn cluster_count(bs: &BootSector) -> Result<u32> {
    match bs.bpb.sectors_per_cluster {
        0 => Err(Error::InvalidGeometry("sectors per cluster is 0")),
        n => Ok(data_region_sectors(bs)? / n as u32),
    }
}

/// First sector of a data cluster; cluster numbering starts at 2.
pub fn cluster_to_sector(bs: &BootSector, cluster: u32) -> Result<u32> {
    let index = cluster
        .checked_sub(2)
        .ok_or(Error::InvalidGeometry("cluster numbers start at 2"))?;
    let start = data_region_start_sector(bs)?;
    index
        .checked_mul(bs.bpb.sectors_per_cluster as u32)
        .and_then(|off| off.checked_add(start))
        .ok_or_else(overflow)
}

pub fn absolute_offset(start_pos: u64, bs: &BootSector, sector: u32) -> u64 {
    start_pos + sector as u64 * bs.bpb.bytes_per_sector as u64
}
