//! # Device Discovery
//!
//! Finds the hidraw node of a USB HID printer.
//!
//! The kernel lists HID devices under `/sys/bus/hid/devices` as
//! `BUS:VENDOR:PRODUCT.INSTANCE` (bus `0003` is USB). Each one has a
//! `hidraw/hidrawN/dev` file holding the `major:minor` of its node. The
//! node itself is then located, in order, through:
//!
//! 1. the `/dev/char/MAJOR:MINOR` symlink
//! 2. `/dev/hidrawN`, if its device number matches
//! 3. a walk of `/dev` for any node with that device number

use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use log::debug;

use super::hidraw::udev_hint;
use crate::error::Error;

/// sysfs directory listing HID devices
pub const SYSFS_HID_DEVICES: &str = "/sys/bus/hid/devices";

/// Root of the device tree
pub const DEV_ROOT: &str = "/dev";

/// HID bus number of USB
const BUS_USB: u16 = 0x0003;

/// Find the hidraw node for a USB vendor/product pair.
pub fn find_hidraw(vendor_id: u16, product_id: u16) -> Result<PathBuf, Error> {
    find_hidraw_in(
        Path::new(SYSFS_HID_DEVICES),
        Path::new(DEV_ROOT),
        vendor_id,
        product_id,
    )
}

/// [`find_hidraw`] against an arbitrary sysfs directory and device root.
pub fn find_hidraw_in(
    sysfs: &Path,
    dev_root: &Path,
    vendor_id: u16,
    product_id: u16,
) -> Result<PathBuf, Error> {
    let prefix = format!("{:04X}:{:04X}:{:04X}.", BUS_USB, vendor_id, product_id);
    let not_found = |reason: String| Error::DeviceUnavailable {
        path: sysfs.join(format!("{}*", prefix)),
        reason,
        hint: "Check that the printer is plugged in and switched on.".to_string(),
    };

    let entries = fs::read_dir(sysfs)
        .map_err(|e| not_found(format!("cannot list {}: {}", sysfs.display(), e)))?;
    let mut candidates: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(&prefix))
        .collect();
    candidates.sort();

    for candidate in &candidates {
        let hidraw_dir = sysfs.join(candidate).join("hidraw");
        let Ok(nodes) = fs::read_dir(&hidraw_dir) else {
            debug!("{} has no hidraw interface", candidate);
            continue;
        };
        let mut names: Vec<String> = nodes
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        for name in names {
            let Some((major, minor)) = read_dev_numbers(&hidraw_dir.join(&name).join("dev")) else {
                continue;
            };
            debug!("{} → {} ({}:{})", candidate, name, major, minor);
            if let Some(path) = resolve_node(dev_root, &name, major, minor) {
                return Ok(path);
            }
            return Err(Error::DeviceUnavailable {
                path: dev_root.join(&name),
                reason: format!("no device node for {}:{}", major, minor),
                hint: udev_hint(vendor_id, product_id),
            });
        }
    }

    Err(not_found(format!(
        "no HID device {:04x}:{:04x} attached",
        vendor_id, product_id
    )))
}

/// Parse a sysfs `dev` file (`"247:0\n"`).
fn read_dev_numbers(path: &Path) -> Option<(u32, u32)> {
    let text = fs::read_to_string(path).ok()?;
    let (major, minor) = text.trim().split_once(':')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn resolve_node(dev_root: &Path, name: &str, major: u32, minor: u32) -> Option<PathBuf> {
    let symlink = dev_root.join("char").join(format!("{}:{}", major, minor));
    if symlink.exists() {
        return fs::canonicalize(&symlink).ok();
    }

    let devnum = libc::makedev(major, minor);
    let named = dev_root.join(name);
    if has_devnum(&named, devnum) {
        return Some(named);
    }

    walk(dev_root, devnum)
}

fn has_devnum(path: &Path, devnum: libc::dev_t) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.rdev() == devnum)
}

/// Depth-first search for a node with the given device number. Symlinked
/// directories are not followed.
fn walk(dir: &Path, devnum: libc::dev_t) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.filter_map(|entry| entry.ok()) {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if let Some(found) = walk(&path, devnum) {
                return Some(found);
            }
        } else if has_devnum(&path, devnum) {
            return Some(path);
        }
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================
