use std::fmt::{Result, Write};

use pretty_hex::pretty_hex;

use crate::disk::{DiskImage, PartitionSlot};
use crate::fat::{geometry, BpbLayout, FsInfo, Partition};
use crate::mbr::MasterBootRecord;

const RULE: &str = "==================================================";

pub fn render(disk: &DiskImage, detailed: bool) -> String {
    let mut out = String::new();
    write_disk(&mut out, disk, detailed).expect("writing to a String");
    out
}

pub fn write_disk(out: &mut impl Write, disk: &DiskImage, detailed: bool) -> Result {
    writeln!(out, "MBR ANALYSIS")?;
    write_mbr(out, &disk.mbr, detailed)?;
    writeln!(out)?;

    writeln!(out, "VBR ANALYSIS")?;
    for (i, slot) in disk.partitions.iter().enumerate() {
        match slot {
            PartitionSlot::Decoded(part) => write_partition(out, i, part, detailed)?,
            PartitionSlot::Unsupported(typ) => writeln!(
                out,
                "Partition {}: printing for type 0x{:02X} not supported",
                i + 1,
                u8::from(*typ)
            )?,
            PartitionSlot::Failed(e) => writeln!(out, "Partition {}: {}", i + 1, e)?,
        }
    }
    Ok(())
}

pub fn write_mbr(out: &mut impl Write, mbr: &MasterBootRecord, detailed: bool) -> Result {
    writeln!(out, "{}", RULE)?;
    if detailed {
        writeln!(out, "Boot Loader:")?;
        writeln!(out, "{}", pretty_hex(&mbr.boot_loader))?;
        writeln!(out)?;
    }

    for (i, pe) in mbr.entries.iter().enumerate() {
        let name = pe.partition_type().name();
        if detailed {
            writeln!(out, "Partition {}", i + 1)?;
            writeln!(out, "Boot Indicator: 0x{:02x}", pe.boot_indicator)?;
            writeln!(out, "Head Start: 0x{:02x}", pe.head_start)?;
            writeln!(out, "Sector Start: 0x{:02x}", pe.sector_start)?;
            writeln!(out, "Cylinder Start: 0x{:02x}", pe.cylinder_start)?;
            writeln!(out, "Type: 0x{:02x} {}", pe.typ, name)?;
            writeln!(out, "Head End: 0x{:02x}", pe.head_end)?;
            writeln!(out, "Sector End: 0x{:02x}", pe.sector_end)?;
            writeln!(out, "Cylinder End: 0x{:02x}", pe.cylinder_end)?;
            writeln!(out, "Relative Sector: {}", pe.relative_sector)?;
            writeln!(out, "Num Sectors: {}", pe.num_sectors)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "({:02x}) {}, {}, {}",
                pe.typ, name, pe.relative_sector, pe.num_sectors
            )?;
        }
    }
    for w in &mbr.warnings {
        writeln!(out, "Warning: {}", w)?;
    }
    Ok(())
}

pub fn write_partition(
    out: &mut impl Write,
    index: usize,
    part: &Partition,
    detailed: bool,
) -> Result {
    let bs = &part.boot_sector;
    let bpb = &bs.bpb;

    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "Partition {}: {:?} at byte offset {}",
        index + 1,
        part.typ,
        part.start_pos
    )?;
    writeln!(out, "OEM Name: {}", bs.oem_name())?;
    writeln!(out, "Volume Label: {}", bs.volume_label())?;
    writeln!(out, "System ID: {}", bs.system_id())?;
    writeln!(out, "Volume Serial: {:08X}", bs.ebpb.volume_serial)?;
    writeln!(out, "Bytes per Sector: {}", bpb.bytes_per_sector)?;
    writeln!(out, "Sectors per Cluster: {}", bpb.sectors_per_cluster)?;
    writeln!(out, "Reserved Sectors: {}", bpb.reserved_sectors)?;
    writeln!(out, "Number of FATs: {}", bpb.num_fats)?;
    writeln!(out, "Sectors per FAT: {}", geometry::sectors_per_fat(bs))?;
    writeln!(out, "Total Sectors: {}", geometry::total_sectors(bs))?;

    if detailed {
        writeln!(out, "Jump: {:02x?}", bs.jump)?;
        writeln!(out, "Root Entries: {}", bpb.root_entries_f16)?;
        writeln!(out, "Total Sectors (16-bit): {}", bpb.total_sectors_16bit)?;
        writeln!(out, "Total Sectors (32-bit): {}", bpb.total_sectors_32bit)?;
        writeln!(out, "Media Descriptor: 0x{:02x}", bpb.media_descriptor)?;
        writeln!(out, "Sectors per Track: {}", bpb.sectors_per_track)?;
        writeln!(out, "Number of Heads: {}", bpb.num_heads)?;
        writeln!(out, "Hidden Sectors: {}", bpb.hidden_sectors)?;
        if let BpbLayout::Fat32(ext) = &bpb.layout {
            writeln!(out, "Flags: 0x{:04x}", ext.eflags)?;
            writeln!(out, "Version: {}.{}", ext.version >> 8, ext.version & 0xFF)?;
            writeln!(out, "Root Cluster: {}", ext.root_cluster)?;
            writeln!(out, "FSINFO Sector: {}", ext.fsinfo_sector)?;
            writeln!(out, "Backup Boot Sector: {}", ext.backup_sector)?;
        }
        writeln!(out, "Physical Drive: 0x{:02x}", bs.ebpb.physical_drive_num)?;
        writeln!(out, "Extended Boot Signature: 0x{:02x}", bs.ebpb.eb_sig)?;
        writeln!(out, "Bootstrap Code:")?;
        writeln!(out, "{}", pretty_hex(&bs.bootstrap_code))?;
    }

    write_geometry(out, part)?;

    match &part.fsinfo {
        Some(Ok(fsinfo)) => write_fsinfo(out, fsinfo)?,
        Some(Err(e)) => writeln!(out, "FSINFO: {}", e)?,
        None => (),
    }
    if let Some(backup) = &part.backup_boot_sector {
        writeln!(out, "Backup Boot Sector OEM Name: {}", backup.oem_name())?;
    }
    for w in part.all_warnings() {
        writeln!(out, "Warning: {}", w)?;
    }
    Ok(())
}

fn write_geometry(out: &mut impl Write, part: &Partition) -> Result {
    let bs = &part.boot_sector;
    match geometry::fat_area_end_sector(bs) {
        Ok(end) => writeln!(
            out,
            "FAT Area: sectors {}-{} (byte offset {})",
            bpb_reserved(part),
            end,
            part.absolute_offset(bpb_reserved(part))
        )?,
        Err(e) => writeln!(out, "FAT Area: {}", e)?,
    }
    match geometry::root_dir_size_sectors(bs) {
        Ok(0) => (),
        Ok(size) => writeln!(out, "Root Directory Size: {} sectors", size)?,
        Err(e) => writeln!(out, "Root Directory Size: {}", e)?,
    }
    match geometry::data_region_start_sector(bs) {
        Ok(start) => writeln!(
            out,
            "Data Region Start: sector {} (byte offset {})",
            start,
            part.absolute_offset(start)
        )?,
        Err(e) => writeln!(out, "Data Region Start: {}", e)?,
    }
    if let Ok(count) = geometry::cluster_count(bs) {
        writeln!(out, "Clusters: {}", count)?;
    }
    Ok(())
}

fn bpb_reserved(part: &Partition) -> u32 {
    part.boot_sector.bpb.reserved_sectors as u32
}

fn write_fsinfo(out: &mut impl Write, fsinfo: &FsInfo) -> Result {
    match fsinfo.free_clusters() {
        Some(n) => writeln!(out, "Free Clusters: {}", n)?,
        None => writeln!(out, "Free Clusters: unknown")?,
    }
    match fsinfo.next_free_hint() {
        Some(n) => writeln!(out, "Next Free Cluster: {}", n)?,
        None => writeln!(out, "Next Free Cluster: no hint")?,
    }
    Ok(())
}
