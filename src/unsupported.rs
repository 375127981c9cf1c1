use crate::{
    monitor::{
        LogicalMonitorHandle, LogicalMonitorInfo, PhysicalMonitor,
        PhysicalMonitorHandle, Platform,
    },
    Error, Result,
};

enum Never {}

/// Stands in for the Windows backend on other targets. It can't be
/// constructed, so its methods are unreachable.
pub struct Unsupported(Never);

pub fn connect() -> Result<Unsupported> {
    Err(Error::PlatformUnavailable(format!(
        "the monitor configuration API isn't available on {}",
        std::env::consts::OS
    )))
}

impl Platform for Unsupported {
    fn logical_monitors(&self) -> Result<Vec<LogicalMonitorHandle>> {
        match self.0 {}
    }

    fn logical_monitor_info(
        &self,
        _: LogicalMonitorHandle,
    ) -> Result<LogicalMonitorInfo> {
        match self.0 {}
    }

    fn physical_monitor_count(&self, _: LogicalMonitorHandle) -> Result<u32> {
        match self.0 {}
    }

    fn physical_monitors(
        &self,
        _: LogicalMonitorHandle,
        _: u32,
    ) -> Result<Vec<PhysicalMonitor>> {
        match self.0 {}
    }

    fn destroy_physical_monitor(&self, _: PhysicalMonitorHandle) -> Result<()> {
        match self.0 {}
    }

    fn set_vcp_feature(
        &self,
        _: PhysicalMonitorHandle,
        _: u8,
        _: u32,
    ) -> Result<()> {
        match self.0 {}
    }

    fn capabilities_string(&self, _: PhysicalMonitorHandle) -> Result<String> {
        match self.0 {}
    }
}
