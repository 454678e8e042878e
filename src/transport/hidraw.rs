//! # hidraw Transport
//!
//! This module talks to the LabelManager through the Linux hidraw driver.
//! The printer enumerates as a USB HID device; the kernel exposes it as a
//! character device (`/dev/hidrawN`) that accepts raw report bytes.
//!
//! ## Write Pattern
//!
//! ```text
//! for each segment:
//!     write 64-byte chunks ──► printer
//!     poll (5 s)           ◄── 8-byte status reply
//! ```
//!
//! The device is opened at the start of [`Transport::send`] and closed when
//! it returns, on success and failure alike.
//!
//! ## Permissions
//!
//! By default only root may open hidraw nodes. A udev rule grants access
//! to the printer:
//!
//! ```text
//! # /etc/udev/rules.d/91-dymo-labelmanager-pnp.rules
//! SUBSYSTEMS=="usb", ATTRS{idVendor}=="0922", ATTRS{idProduct}=="1002", MODE="0666"
//! ```
//!
//! Reload udev and replug the printer after adding it.

use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};

use super::{STATUS_LEN, StatusReply, Transport, discover};
use crate::error::Error;
use crate::printer::Capability;
use crate::protocol::PrinterFrame;

/// Bytes per write; one HID report
const WRITE_CHUNK: usize = 64;

/// How long to wait for the status reply after each segment
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// # hidraw Printer Transport
///
/// ## Example
///
/// ```no_run
/// use dymoprint::printer::Capability;
/// use dymoprint::protocol::{Encoder, labelmanager::LabelManagerPnp};
/// use dymoprint::render::Bitmap;
/// use dymoprint::transport::{HidTransport, Transport};
///
/// let cap = Capability::LABELMANAGER_PNP;
/// let frame = LabelManagerPnp.encode(&Bitmap::new(20, 64), &cap)?;
///
/// let mut transport = HidTransport::auto(&cap);
/// transport.send(&frame)?;
/// # Ok::<(), dymoprint::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HidTransport {
    /// Device node; looked up through sysfs on every send when `None`
    path: Option<PathBuf>,
    name: &'static str,
    vendor_id: u16,
    product_id: u16,
    status_timeout: Duration,
}

impl HidTransport {
    /// Transport for an explicit device node.
    ///
    /// Nothing is opened until [`Transport::send`].
    pub fn new<P: Into<PathBuf>>(path: P, capability: &Capability) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::auto(capability)
        }
    }

    /// Transport for the first attached printer matching the capability's
    /// USB ids. The node is looked up when a frame is sent.
    pub fn auto(capability: &Capability) -> Self {
        Self {
            path: None,
            name: capability.name,
            vendor_id: capability.vendor_id,
            product_id: capability.product_id,
            status_timeout: STATUS_TIMEOUT,
        }
    }

    /// Explicit device node, if one was given
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set how long to wait for each status reply.
    pub fn set_status_timeout(&mut self, timeout: Duration) {
        self.status_timeout = timeout;
    }

    fn resolve(&self) -> Result<PathBuf, Error> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let path = discover::find_hidraw(self.vendor_id, self.product_id)?;
        info!("found {} at {}", self.name, path.display());
        Ok(path)
    }

    fn open(&self, path: &Path) -> Result<File, Error> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => Error::DeviceUnavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                    hint: udev_hint(self.vendor_id, self.product_id),
                },
                _ => Error::Transport(format!("Failed to open {}: {}", path.display(), e)),
            })
    }
}

impl Transport for HidTransport {
    fn send(&mut self, frame: &PrinterFrame) -> Result<Vec<Option<StatusReply>>, Error> {
        let path = self.resolve()?;
        let mut file = self.open(&path)?;
        debug!(
            "sending {} bytes in {} segment(s) to {}",
            frame.len(),
            frame.segments().len(),
            path.display()
        );

        let total = frame.segments().len();
        let mut replies = Vec::with_capacity(total);
        for (i, segment) in frame.segments().iter().enumerate() {
            for chunk in segment.chunks(WRITE_CHUNK) {
                file.write_all(chunk).map_err(|e| {
                    Error::Transport(format!("Write failed in segment {} of {}: {}", i + 1, total, e))
                })?;
            }
            file.flush()
                .map_err(|e| Error::Transport(format!("Flush failed: {}", e)))?;

            let reply = read_status(&mut file, self.status_timeout)?;
            match &reply {
                Some(StatusReply(bytes)) => debug!("status after segment {}: {:02x?}", i + 1, bytes),
                None => warn!(
                    "no status reply from {} within {:?} after segment {}",
                    path.display(),
                    self.status_timeout,
                    i + 1
                ),
            }
            replies.push(reply);
        }
        Ok(replies)
    }
}

/// Remediation text for a printer node that cannot be opened.
pub fn udev_hint(vendor_id: u16, product_id: u16) -> String {
    format!(
        "Add a udev rule such as\n  \
         SUBSYSTEMS==\"usb\", ATTRS{{idVendor}}==\"{:04x}\", ATTRS{{idProduct}}==\"{:04x}\", MODE=\"0666\"\n\
         to /etc/udev/rules.d/91-dymo-labelmanager-pnp.rules, reload udev and replug the printer.",
        vendor_id, product_id
    )
}

/// Wait for the status reply and read it.
///
/// `Ok(None)` when the printer stays silent for `timeout` or the read
/// returns nothing.
fn read_status(file: &mut File, timeout: Duration) -> Result<Option<StatusReply>, Error> {
    let mut pfd = libc::pollfd {
        fd: file.as_raw_fd(),
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
    let ready = unsafe { libc::poll(&mut pfd, 1, millis) };
    if ready < 0 {
        return Err(Error::Transport(format!(
            "poll failed: {}",
            io::Error::last_os_error()
        )));
    }
    if ready == 0 {
        return Ok(None);
    }

    let mut buf = [0u8; STATUS_LEN];
    let n = file
        .read(&mut buf)
        .map_err(|e| Error::Transport(format!("Status read failed: {}", e)))?;
    if n == 0 {
        return Ok(None);
    }
    if n < STATUS_LEN {
        warn!("short status reply: {} of {} bytes", n, STATUS_LEN);
    }
    Ok(Some(StatusReply(buf)))
}

// ============================================================================
// TESTS
// ============================================================================
