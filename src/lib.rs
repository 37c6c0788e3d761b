//! Decoder for the MBR partition table and FAT volume boot records of raw disk images.

pub mod device;
pub mod disk;
pub mod error;
pub mod fat;
pub mod mbr;
pub mod report;

#[cfg(test)]
mod testutil;

pub use device::{ByteCursor, Device};
pub use disk::{decode_partitions, DiskImage, PartitionSlot};
pub use error::{Error, Result, Warning};
pub use mbr::{decode_mbr, MasterBootRecord, PartitionEntry, PartitionType};
