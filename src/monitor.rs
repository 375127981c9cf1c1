use std::{fmt, ops::Deref};

use tracing::{debug, warn};

use crate::{
    cap::Capabilities,
    input::{InputSource, INPUT_SELECT_CODE},
    Result,
};

/// The size of a physical monitor description in the platform ABI, in
/// UTF-16 code units.
pub const DESCRIPTION_LEN: usize = 128;

/// An OS display output. It isn't owned, so nothing releases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogicalMonitorHandle(pub isize);

/// A handle to a physical monitor's DDC/CI channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PhysicalMonitorHandle(pub isize);

impl fmt::Display for PhysicalMonitorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical monitor description with the ABI padding removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    pub fn new(s: &str) -> Description {
        // Bounded in UTF-16 code units like the platform field, without
        // splitting a surrogate pair.
        let mut units = 0;
        let truncated: String = s
            .chars()
            .take_while(|c| {
                units += c.len_utf16();
                units <= DESCRIPTION_LEN
            })
            .collect();
        Description(trim_padding(&truncated).to_owned())
    }

    /// Builds a description from a fixed-size, NUL-padded UTF-16 buffer.
    pub fn from_wide(wide: &[u16]) -> Description {
        let wide = &wide[..wide.len().min(DESCRIPTION_LEN)];
        let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
        let s = String::from_utf16_lossy(&wide[..len]);
        Description(trim_padding(&s).to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive substring match.
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

fn trim_padding(s: &str) -> &str {
    s.trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicalMonitor {
    pub handle: PhysicalMonitorHandle,
    pub description: Description,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.right - self.left,
            self.bottom - self.top,
            self.left,
            self.top
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicalMonitorInfo {
    pub device_name: String,
    pub rect: Rect,
    pub primary: bool,
}

/// The display APIs the switcher is built on.
///
/// Calls block until the OS returns. Handles returned by
/// [`Platform::physical_monitors`] must be passed back to
/// [`Platform::destroy_physical_monitor`]; [`list_physical_monitors`] takes
/// care of that.
pub trait Platform {
    /// Returns every logical monitor in enumeration order.
    fn logical_monitors(&self) -> Result<Vec<LogicalMonitorHandle>>;

    fn logical_monitor_info(
        &self,
        monitor: LogicalMonitorHandle,
    ) -> Result<LogicalMonitorInfo>;

    fn physical_monitor_count(&self, monitor: LogicalMonitorHandle)
        -> Result<u32>;

    /// Fills a buffer of `count` physical monitors backing `monitor`.
    fn physical_monitors(
        &self,
        monitor: LogicalMonitorHandle,
        count: u32,
    ) -> Result<Vec<PhysicalMonitor>>;

    fn destroy_physical_monitor(
        &self,
        monitor: PhysicalMonitorHandle,
    ) -> Result<()>;

    fn set_vcp_feature(
        &self,
        monitor: PhysicalMonitorHandle,
        code: u8,
        value: u32,
    ) -> Result<()>;

    fn capabilities_string(
        &self,
        monitor: PhysicalMonitorHandle,
    ) -> Result<String>;
}

/// Physical monitors that are released when dropped.
pub struct PhysicalMonitors<'p, P: Platform + ?Sized> {
    platform: &'p P,
    monitors: Vec<PhysicalMonitor>,
}

impl<'p, P: Platform + ?Sized> PhysicalMonitors<'p, P> {
    fn new(
        platform: &'p P,
        monitors: Vec<PhysicalMonitor>,
    ) -> PhysicalMonitors<'p, P> {
        PhysicalMonitors { platform, monitors }
    }
}

impl<P: Platform + ?Sized> Deref for PhysicalMonitors<'_, P> {
    type Target = [PhysicalMonitor];

    fn deref(&self) -> &[PhysicalMonitor] {
        &self.monitors
    }
}

impl<P: Platform + ?Sized> fmt::Debug for PhysicalMonitors<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.monitors).finish()
    }
}

impl<P: Platform + ?Sized> Drop for PhysicalMonitors<'_, P> {
    fn drop(&mut self) {
        for monitor in &self.monitors {
            if let Err(err) =
                self.platform.destroy_physical_monitor(monitor.handle)
            {
                warn!(
                    "failed to release physical monitor '{}': {}",
                    monitor.description, err
                );
            }
        }
    }
}

/// Returns the handles of all logical monitors.
pub fn logical_monitors<P: Platform + ?Sized>(
    platform: &P,
) -> Result<Vec<LogicalMonitorHandle>> {
    let monitors = platform.logical_monitors()?;
    debug!("found {} logical monitor(s)", monitors.len());
    Ok(monitors)
}

pub fn first_monitor_handle<P: Platform + ?Sized>(
    platform: &P,
) -> Result<Option<LogicalMonitorHandle>> {
    Ok(logical_monitors(platform)?.into_iter().next())
}

/// Returns the physical monitors backing a logical monitor.
///
/// A monitor without physical monitors yields an empty list, and the fill
/// call is skipped.
pub fn list_physical_monitors<P: Platform + ?Sized>(
    platform: &P,
    monitor: LogicalMonitorHandle,
) -> Result<PhysicalMonitors<'_, P>> {
    let count = platform.physical_monitor_count(monitor)?;
    debug!("logical monitor {:?} has {} physical monitor(s)", monitor, count);
    if count == 0 {
        return Ok(PhysicalMonitors::new(platform, Vec::new()));
    }

    let monitors = platform.physical_monitors(monitor, count)?;
    Ok(PhysicalMonitors::new(platform, monitors))
}

/// Returns the first monitor whose description contains `name`.
pub fn find_monitor<'a>(
    monitors: impl IntoIterator<Item = &'a PhysicalMonitor>,
    name: &str,
) -> Option<&'a PhysicalMonitor> {
    monitors
        .into_iter()
        .find(|monitor| monitor.description.contains(name))
}

/// Sets the input select VCP code. There's no read-back, so success only
/// means the monitor accepted the command.
pub fn switch_input<P: Platform + ?Sized>(
    platform: &P,
    monitor: PhysicalMonitorHandle,
    input: InputSource,
) -> Result<()> {
    debug!(
        "setting VCP code {:#04x} to {:#04x} on physical monitor {}",
        INPUT_SELECT_CODE,
        input.code(),
        monitor
    );
    platform.set_vcp_feature(monitor, INPUT_SELECT_CODE, input.code().into())
}

pub fn capabilities<P: Platform + ?Sized>(
    platform: &P,
    monitor: PhysicalMonitorHandle,
) -> Result<Capabilities> {
    let capabilities_string = platform.capabilities_string(monitor)?;
    debug!("capabilities: {}", capabilities_string);
    Capabilities::parse(&capabilities_string)
}
