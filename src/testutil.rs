//! Hand-built sectors for unit tests.

use scroll::{Pwrite, LE};

use crate::mbr::MBR_SIZE;

/// Copies `bytes` into `image` at `offset`, zero-filling any gap.
pub fn place(image: &mut Vec<u8>, offset: usize, bytes: &[u8]) {
    if image.len() < offset + bytes.len() {
        image.resize(offset + bytes.len(), 0);
    }
    image[offset..offset + bytes.len()].copy_from_slice(bytes);
}

/// MBR with `(type, relative_sector, num_sectors)` in the first slots.
pub fn mbr_sector(entries: &[(u8, u32, u32)]) -> Vec<u8> {
    let mut buf = vec![0u8; MBR_SIZE];
    for (i, &(typ, lba, nsecs)) in entries.iter().enumerate() {
        let off = 446 + i * 16;
        buf.pwrite_with(typ, off + 4, LE).unwrap();
        buf.pwrite_with(lba, off + 8, LE).unwrap();
        buf.pwrite_with(nsecs, off + 12, LE).unwrap();
    }
    buf[510] = 0x55;
    buf[511] = 0xAA;
    buf
}

fn common_bpb(buf: &mut [u8], bpb: [u32; 12]) {
    let [bps, spc, rsvd, fats, root, tot16, media, spf16, spt, heads, hidden, tot32] = bpb;
    buf[0..3].copy_from_slice(&[0xEB, 0x58, 0x90]);
    buf[3..11].copy_from_slice(b"MSWIN4.1");
    buf.pwrite_with(bps as u16, 11, LE).unwrap();
    buf.pwrite_with(spc as u8, 13, LE).unwrap();
    buf.pwrite_with(rsvd as u16, 14, LE).unwrap();
    buf.pwrite_with(fats as u8, 16, LE).unwrap();
    buf.pwrite_with(root as u16, 17, LE).unwrap();
    buf.pwrite_with(tot16 as u16, 19, LE).unwrap();
    buf.pwrite_with(media as u8, 21, LE).unwrap();
    buf.pwrite_with(spf16 as u16, 22, LE).unwrap();
    buf.pwrite_with(spt as u16, 24, LE).unwrap();
    buf.pwrite_with(heads as u16, 26, LE).unwrap();
    buf.pwrite_with(hidden, 28, LE).unwrap();
    buf.pwrite_with(tot32, 32, LE).unwrap();
}

fn ebpb(buf: &mut [u8], off: usize, serial: u32, system_id: &[u8; 8]) {
    buf[off] = 0x80;
    buf[off + 2] = 0x29;
    buf.pwrite_with(serial, off + 3, LE).unwrap();
    buf[off + 7..off + 18].copy_from_slice(b"NO NAME    ");
    buf[off + 18..off + 26].copy_from_slice(system_id);
}

/// 100 MB FAT32 volume: 32 reserved sectors, 2 FATs of 1913 sectors, FSINFO at 2, backup at 6.
pub fn fat32_boot_sector() -> Vec<u8> {
    let mut buf = vec![0u8; 512];
    common_bpb(
        &mut buf,
        [512, 8, 32, 2, 0, 0, 0xF8, 0, 63, 255, 2048, 204800],
    );
    buf.pwrite_with(1913u32, 36, LE).unwrap();
    buf.pwrite_with(0u16, 40, LE).unwrap();
    buf.pwrite_with(0u16, 42, LE).unwrap();
    buf.pwrite_with(2u32, 44, LE).unwrap();
    buf.pwrite_with(2u16, 48, LE).unwrap();
    buf.pwrite_with(6u16, 50, LE).unwrap();
    ebpb(&mut buf, 64, 0x1234ABCD, b"FAT32   ");
    buf[90] = 0xFA; // bootstrap code starts with cli
    buf[510] = 0x55;
    buf[511] = 0xAA;
    buf
}

/// FAT16 volume: 4 reserved sectors, 2 FATs of 200 sectors, 512 root entries.
pub fn fat16_boot_sector() -> Vec<u8> {
    let mut buf = vec![0u8; 512];
    common_bpb(
        &mut buf,
        [512, 4, 4, 2, 512, 0, 0xF8, 200, 63, 255, 128, 100000],
    );
    ebpb(&mut buf, 36, 0xCAFEF00D, b"FAT16   ");
    buf[62] = 0xFA;
    buf[510] = 0x55;
    buf[511] = 0xAA;
    buf
}

pub fn fsinfo_sector(free: u32, next: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 512];
    buf.pwrite_with(0x41615252u32, 0, LE).unwrap();
    buf.pwrite_with(0x61417272u32, 484, LE).unwrap();
    buf.pwrite_with(free, 488, LE).unwrap();
    buf.pwrite_with(next, 492, LE).unwrap();
    buf.pwrite_with(0xAA550000u32, 508, LE).unwrap();
    buf
}
