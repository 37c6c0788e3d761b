use crate::device::{ByteCursor, Device};
use crate::error::{Result, Signature, Structure, Warning};

pub const LEAD_SIG: u32 = 0x41615252; // "RRaA"
pub const STRUCT_SIG: u32 = 0x61417272; // "rrAa"
pub const TRAIL_SIG: u32 = 0xAA550000;

/// Marks an unknown free count and a missing next-free hint.
pub const UNKNOWN: u32 = 0xFFFFFFFF;

const RESERVED1_SIZE: u64 = 480;
const RESERVED2_SIZE: u64 = 12;

/// FAT32 file system information sector.
#[derive(Debug, Clone)]
pub struct FsInfo {
    pub sig_begin: u32,
    pub sig_data_begin: u32,
    pub free_cluster_count: u32,
    pub next_free_cluster: u32,
    pub sig_end: u32,
    pub warnings: Vec<Warning>,
}

impl FsInfo {
    pub fn free_clusters(&self) -> Option<u32> {
        (self.free_cluster_count != UNKNOWN).then_some(self.free_cluster_count)
    }

    /// Where a driver should start looking for free clusters.
    pub fn next_free_hint(&self) -> Option<u32> {
        (self.next_free_cluster != UNKNOWN).then_some(self.next_free_cluster)
    }
}

pub fn decode_fsinfo<D: Device>(cursor: &mut ByteCursor<D>) -> Result<FsInfo> {
    read_fsinfo(cursor).map_err(|e| e.within(Structure::FsInfo))
}

fn read_fsinfo<D: Device>(cursor: &mut ByteCursor<D>) -> Result<FsInfo> {
    let sig_begin = cursor.read_u32_le()?;
    cursor.skip(RESERVED1_SIZE)?;
    let sig_data_begin = cursor.read_u32_le()?;
    let free_cluster_count = cursor.read_u32_le()?;
    let next_free_cluster = cursor.read_u32_le()?;
    cursor.skip(RESERVED2_SIZE)?;
    let sig_end = cursor.read_u32_le()?;

    // each signature is reported on its own
    let warnings = [
        Warning::check(Signature::FsInfoLead, LEAD_SIG, sig_begin),
        Warning::check(Signature::FsInfoStruct, STRUCT_SIG, sig_data_begin),
        Warning::check(Signature::FsInfoTrail, TRAIL_SIG, sig_end),
    ]
    .into_iter()
    .flatten()
    .collect();

    Ok(FsInfo {
        sig_begin,
        sig_data_begin,
        free_cluster_count,
        next_free_cluster,
        sig_end,
        warnings,
    })
}
