use crate::device::{ByteCursor, Device};
use crate::error::{Error, Result, Structure, Warning};
use crate::fat::boot_sector::decode_boot_sector_as;
use crate::fat::{decode_boot_sector, decode_fsinfo, BootSector, FatType, FsInfo, Partition};
use crate::mbr::{decode_mbr, MasterBootRecord, PartitionEntry, PartitionType};

/// Sector size used to locate partitions from MBR LBAs.
pub const SECTOR_SIZE: u64 = 512;

/// Outcome of decoding one MBR slot.
#[derive(Debug)]
pub enum PartitionSlot {
    Decoded(Partition),
    Unsupported(PartitionType),
    Failed(Error),
}

impl PartitionSlot {
    pub fn partition(&self) -> Option<&Partition> {
        match self {
            PartitionSlot::Decoded(part) => Some(part),
            _ => None,
        }
    }
}

/// Everything decoded from one disk image.
#[derive(Debug)]
pub struct DiskImage {
    pub mbr: MasterBootRecord,
    pub partitions: [PartitionSlot; 4],
}

impl DiskImage {
    /// Decodes the MBR at offset 0 and then every FAT partition it lists.
    pub fn decode<D: Device>(device: D) -> Result<Self> {
        let mut cursor = ByteCursor::new(device)?;
        cursor.seek_absolute(0)?;
        let mbr = decode_mbr(&mut cursor)?;
        let partitions = decode_partitions(&mut cursor, &mbr);
        Ok(DiskImage { mbr, partitions })
    }

    pub fn fat_partitions(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter().filter_map(PartitionSlot::partition)
    }
}

/// Decodes each MBR slot on its own; a failure in one slot leaves the others untouched.
pub fn decode_partitions<D: Device>(
    cursor: &mut ByteCursor<D>,
    mbr: &MasterBootRecord,
) -> [PartitionSlot; 4] {
    std::array::from_fn(|slot| {
        let entry = &mbr.entries[slot];
        let typ = match FatType::try_from(entry.partition_type()) {
            Ok(typ) => typ,
            Err(_) => {
                log::info!(
                    "slot {}: could not read partition of type 0x{:02X} ({})",
                    slot,
                    entry.typ,
                    entry.partition_type().name()
                );
                return PartitionSlot::Unsupported(entry.partition_type());
            }
        };
        match decode_partition(cursor, entry, typ) {
            Ok(part) => PartitionSlot::Decoded(part),
            Err(e) => {
                log::warn!("slot {}: {}", slot, e);
                PartitionSlot::Failed(e)
            }
        }
    })
}

fn decode_partition<D: Device>(
    cursor: &mut ByteCursor<D>,
    entry: &PartitionEntry,
    typ: FatType,
) -> Result<Partition> {
    let start_pos = entry.relative_sector as u64 * SECTOR_SIZE;
    log::debug!("{:?} partition at byte offset 0x{:X}", typ, start_pos);
    cursor.seek_absolute(start_pos)?;
    let boot_sector = decode_boot_sector(cursor, typ)?;

    let mut part = Partition {
        typ,
        start_pos,
        boot_sector,
        fsinfo: None,
        backup_boot_sector: None,
        warnings: Vec::new(),
    };

    let fsinfo_sector = match part.boot_sector.bpb.fat32() {
        Some(ext) => ext.fsinfo_sector,
        None => return Ok(part),
    };

    let fsinfo = decode_partition_fsinfo(cursor, &part, fsinfo_sector);
    if let Err(e) = &fsinfo {
        log::warn!("FSINFO of partition at 0x{:X}: {}", start_pos, e);
    }
    part.fsinfo = Some(fsinfo);

    part.backup_boot_sector = decode_backup(cursor, &part);
    if let Some(backup) = &part.backup_boot_sector {
        if backup.bpb != part.boot_sector.bpb || backup.ebpb != part.boot_sector.ebpb {
            log::warn!("{}", Warning::BackupBootSectorMismatch);
            part.warnings.push(Warning::BackupBootSectorMismatch);
        }
    }

    Ok(part)
}

/// The FSINFO sector number counts the boot sector itself as sector 1.
fn decode_partition_fsinfo<D: Device>(
    cursor: &mut ByteCursor<D>,
    part: &Partition,
    fsinfo_sector: u16,
) -> Result<FsInfo> {
    let bytes_per_sector = part.boot_sector.bpb.bytes_per_sector as u64;
    if bytes_per_sector == 0 {
        return Err(Error::InvalidGeometry("bytes per sector is 0"));
    }
    if fsinfo_sector == 0 {
        return Err(Error::InvalidGeometry("FSINFO cannot live in the boot sector"));
    }
    cursor.seek_absolute(part.start_pos + bytes_per_sector * (fsinfo_sector as u64 - 1))?;
    decode_fsinfo(cursor)
}

fn decode_backup<D: Device>(cursor: &mut ByteCursor<D>, part: &Partition) -> Option<BootSector> {
    let bs = &part.boot_sector;
    let backup_sector = bs.bpb.fat32()?.backup_sector;
    if backup_sector == 0 || bs.bpb.bytes_per_sector == 0 {
        return None;
    }
    let pos = part.absolute_offset(backup_sector as u32);
    let decoded = cursor
        .seek_absolute(pos)
        .and_then(|_| decode_boot_sector_as(cursor, part.typ, Structure::BackupBootSector));
    match decoded {
        Ok(backup) => Some(backup),
        Err(e) => {
            log::warn!("backup boot sector at 0x{:X}: {}", pos, e);
            None
        }
    }
}
