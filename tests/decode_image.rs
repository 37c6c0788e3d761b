use std::io::Cursor;

use ddreader::fat::{geometry, FatType};
use ddreader::{report, DiskImage, Error, PartitionSlot, PartitionType, Warning};
use scroll::{Pwrite, LE};

fn entry(image: &mut [u8], slot: usize, typ: u8, lba: u32, nsecs: u32) {
    let off = 446 + slot * 16;
    image[off + 4] = typ;
    image.pwrite_with(lba, off + 8, LE).unwrap();
    image.pwrite_with(nsecs, off + 12, LE).unwrap();
}

/// 1.44M floppy style FAT12 boot sector.
fn fat12_boot_sector(image: &mut [u8], at: usize) {
    let bs = &mut image[at..at + 512];
    bs[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
    bs[3..11].copy_from_slice(b"MSDOS5.0");
    bs.pwrite_with(512u16, 11, LE).unwrap();
    bs[13] = 1;
    bs.pwrite_with(1u16, 14, LE).unwrap();
    bs[16] = 2;
    bs.pwrite_with(224u16, 17, LE).unwrap();
    bs.pwrite_with(2880u16, 19, LE).unwrap();
    bs[21] = 0xF0;
    bs.pwrite_with(9u16, 22, LE).unwrap();
    bs.pwrite_with(18u16, 24, LE).unwrap();
    bs.pwrite_with(2u16, 26, LE).unwrap();
    bs[38] = 0x29;
    bs.pwrite_with(0x0BADCAFEu32, 39, LE).unwrap();
    bs[43..54].copy_from_slice(b"FLOPPY     ");
    bs[54..62].copy_from_slice(b"FAT12   ");
    bs[510] = 0x55;
    bs[511] = 0xAA;
}

fn image() -> Vec<u8> {
    let mut image = vec![0u8; 8 * 512];
    entry(&mut image, 0, 0x01, 4, 2880);
    entry(&mut image, 1, 0x83, 100, 100);
    entry(&mut image, 2, 0x0B, 1000, 100);
    image[510] = 0x55;
    image[511] = 0xAA;
    fat12_boot_sector(&mut image, 4 * 512);
    image
}

#[test]
fn decodes_every_slot_independently() {
    let disk = DiskImage::decode(Cursor::new(image())).unwrap();
    assert!(disk.mbr.warnings.is_empty());

    let fat12 = disk.partitions[0].partition().unwrap();
    assert_eq!(fat12.typ, FatType::Fat12);
    assert_eq!(fat12.start_pos, 2048);
    assert_eq!(fat12.boot_sector.volume_label(), "FLOPPY     ");
    assert_eq!(fat12.boot_sector.bootstrap_code.len(), 448);
    assert!(fat12.all_warnings().is_empty());

    let bs = &fat12.boot_sector;
    assert_eq!(geometry::fat_area_end_sector(bs).unwrap(), 18);
    assert_eq!(geometry::root_dir_size_sectors(bs).unwrap(), 14);
    assert_eq!(geometry::data_region_start_sector(bs).unwrap(), 33);
    assert_eq!(geometry::cluster_count(bs).unwrap(), 2847);
    assert_eq!(fat12.absolute_offset(33), 2048 + 33 * 512);

    assert!(matches!(
        disk.partitions[1],
        PartitionSlot::Unsupported(PartitionType::Other(0x83))
    ));
    assert!(matches!(
        disk.partitions[2],
        PartitionSlot::Failed(Error::Truncated { .. })
    ));
    assert!(matches!(
        disk.partitions[3],
        PartitionSlot::Unsupported(PartitionType::Empty)
    ));
}

#[test]
fn corrupt_vbr_trailer_is_reported_not_fatal() {
    let mut image = image();
    image[4 * 512 + 510] = 0x54;
    let disk = DiskImage::decode(Cursor::new(image)).unwrap();
    let fat12 = disk.partitions[0].partition().unwrap();
    assert_eq!(fat12.boot_sector.ebpb.volume_serial, 0x0BADCAFE);
    assert_eq!(fat12.all_warnings().len(), 1);
    assert!(matches!(
        fat12.all_warnings()[0],
        Warning::SignatureMismatch { found: 0xAA54, .. }
    ));

    let out = report::render(&disk, false);
    assert!(out.contains("Warning: FAT VBR end signature does not match"));
    assert!(out.contains("(01) DOS 12-bit FAT, 4, 2880"));
}

#[test]
fn short_image_decodes_nothing() {
    let image = image();
    assert!(matches!(
        DiskImage::decode(Cursor::new(image[..20].to_vec())),
        Err(Error::Truncated { .. })
    ));
}

/// FAT32 volume at LBA 64 whose FSINFO sits in the second reserved sector.
#[test]
fn fat32_fsinfo_follows_the_boot_sector() {
    let start = 64 * 512;
    let mut image = vec![0u8; start + 3 * 512];
    entry(&mut image, 0, 0x0B, 64, 204800);
    image[510] = 0x55;
    image[511] = 0xAA;

    let bs = &mut image[start..start + 512];
    bs[0..3].copy_from_slice(&[0xEB, 0x58, 0x90]);
    bs[3..11].copy_from_slice(b"MSWIN4.1");
    bs.pwrite_with(512u16, 11, LE).unwrap();
    bs[13] = 8;
    bs.pwrite_with(32u16, 14, LE).unwrap();
    bs[16] = 2;
    bs[21] = 0xF8;
    bs.pwrite_with(204800u32, 32, LE).unwrap();
    bs.pwrite_with(1913u32, 36, LE).unwrap();
    bs.pwrite_with(2u32, 44, LE).unwrap();
    bs.pwrite_with(2u16, 48, LE).unwrap();
    bs[66] = 0x29;
    bs[82..90].copy_from_slice(b"FAT32   ");
    bs[510] = 0x55;
    bs[511] = 0xAA;

    let fsinfo = &mut image[start + 512..start + 1024];
    fsinfo.pwrite_with(0x41615252u32, 0, LE).unwrap();
    fsinfo.pwrite_with(0x61417272u32, 484, LE).unwrap();
    fsinfo.pwrite_with(24000u32, 488, LE).unwrap();
    fsinfo.pwrite_with(3u32, 492, LE).unwrap();
    fsinfo.pwrite_with(0xAA550000u32, 508, LE).unwrap();

    let disk = DiskImage::decode(Cursor::new(image)).unwrap();
    let fat32 = disk.partitions[0].partition().unwrap();
    assert_eq!(fat32.typ, FatType::Fat32);
    let fsinfo = fat32.fsinfo().unwrap();
    assert!(fsinfo.warnings.is_empty());
    assert_eq!(fsinfo.free_clusters(), Some(24000));
    assert_eq!(fsinfo.next_free_hint(), Some(3));
    assert!(fat32.all_warnings().is_empty());

    let out = report::render(&disk, false);
    assert!(out.contains("Free Clusters: 24000"));
}
