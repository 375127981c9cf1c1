use std::{ffi::CStr, mem, ptr, slice};

use tracing::debug;
use windows::{
    core::w,
    Win32::{
        Devices::Display::{
            CapabilitiesRequestAndCapabilitiesReply, DestroyPhysicalMonitor,
            GetCapabilitiesStringLength,
            GetNumberOfPhysicalMonitorsFromHMONITOR,
            GetPhysicalMonitorsFromHMONITOR, SetVCPFeature, PHYSICAL_MONITOR,
        },
        Foundation::{FreeLibrary, BOOL, FALSE, HANDLE, LPARAM, RECT, TRUE},
        Graphics::Gdi::{
            EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR,
            MONITORINFOEXW,
        },
        System::LibraryLoader::LoadLibraryW,
    },
};

use crate::{
    monitor::{
        Description, LogicalMonitorHandle, LogicalMonitorInfo,
        PhysicalMonitor, PhysicalMonitorHandle, Platform, Rect,
    },
    Error, Result,
};

const MONITORINFOF_PRIMARY: u32 = 0x1;

/// The monitor configuration API (dxva2.dll) and the display monitor
/// functions from user32.dll.
pub struct Windows(());

/// Checks that dxva2.dll can be loaded.
pub fn connect() -> Result<Windows> {
    // SAFETY: The library name is a valid null-terminated wide string.
    let module = unsafe { LoadLibraryW(w!("dxva2.dll")) }.map_err(|err| {
        Error::PlatformUnavailable(format!("unable to load dxva2.dll: {err}"))
    })?;
    // SAFETY: `module` was returned by LoadLibraryW above.
    let _ = unsafe { FreeLibrary(module) };

    Ok(Windows(()))
}

fn hmonitor(monitor: LogicalMonitorHandle) -> HMONITOR {
    HMONITOR(monitor.0 as _)
}

fn handle(monitor: PhysicalMonitorHandle) -> HANDLE {
    HANDLE(monitor.0 as _)
}

fn last_error(call: &'static str) -> Error {
    Error::platform_call(call, windows::core::Error::from_win32())
}

fn string_from_wide(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    String::from_utf16_lossy(&wide[..len])
}

unsafe extern "system" fn enum_display_monitors_callback(
    hmonitor: HMONITOR,
    _: HDC,
    _: *mut RECT,
    data: LPARAM,
) -> BOOL {
    let monitors = &mut *(data.0 as *mut Vec<LogicalMonitorHandle>);
    monitors.push(LogicalMonitorHandle(hmonitor.0 as isize));

    // Return TRUE to continue the enumeration.
    TRUE
}

impl Platform for Windows {
    fn logical_monitors(&self) -> Result<Vec<LogicalMonitorHandle>> {
        let mut monitors: Vec<LogicalMonitorHandle> = Vec::new();

        // SAFETY: The callback only casts the LPARAM back to the `Vec` it
        // was created from, which outlives the call.
        unsafe {
            // Pass None, i.e., NULL, for the first two parameters to
            // enumerate all display monitors.
            EnumDisplayMonitors(
                None,
                None,
                Some(enum_display_monitors_callback),
                LPARAM(ptr::addr_of_mut!(monitors) as _),
            )
            .ok()
        }
        .map_err(|err| Error::platform_call("EnumDisplayMonitors", err))?;

        Ok(monitors)
    }

    fn logical_monitor_info(
        &self,
        monitor: LogicalMonitorHandle,
    ) -> Result<LogicalMonitorInfo> {
        let mut monitor_info = MONITORINFOEXW::default();
        monitor_info.monitorInfo.cbSize =
            mem::size_of_val(&monitor_info) as u32;

        // SAFETY: cbSize says the buffer is a MONITORINFOEXW, so the device
        // name is written too.
        unsafe {
            GetMonitorInfoW(
                hmonitor(monitor),
                ptr::addr_of_mut!(monitor_info) as _,
            )
            .ok()
        }
        .map_err(|err| Error::platform_call("GetMonitorInfoW", err))?;

        let rect = monitor_info.monitorInfo.rcMonitor;
        Ok(LogicalMonitorInfo {
            device_name: string_from_wide(&monitor_info.szDevice),
            rect: Rect {
                left: rect.left,
                top: rect.top,
                right: rect.right,
                bottom: rect.bottom,
            },
            primary: monitor_info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY
                != 0,
        })
    }

    fn physical_monitor_count(
        &self,
        monitor: LogicalMonitorHandle,
    ) -> Result<u32> {
        let mut num_physical_monitors: u32 = 0;
        // SAFETY: The pointer argument isn't null.
        unsafe {
            GetNumberOfPhysicalMonitorsFromHMONITOR(
                hmonitor(monitor),
                ptr::addr_of_mut!(num_physical_monitors),
            )
        }
        .map_err(|err| {
            Error::platform_call("GetNumberOfPhysicalMonitorsFromHMONITOR", err)
        })?;

        Ok(num_physical_monitors)
    }

    fn physical_monitors(
        &self,
        monitor: LogicalMonitorHandle,
        count: u32,
    ) -> Result<Vec<PhysicalMonitor>> {
        let mut physical_monitors =
            vec![PHYSICAL_MONITOR::default(); count as usize];
        // SAFETY: The slice is sized to the count the OS reported.
        unsafe {
            GetPhysicalMonitorsFromHMONITOR(
                hmonitor(monitor),
                &mut physical_monitors,
            )
        }
        .map_err(|err| {
            Error::platform_call("GetPhysicalMonitorsFromHMONITOR", err)
        })?;

        Ok(physical_monitors
            .iter()
            .map(|physical_monitor| {
                let monitor = PhysicalMonitor {
                    handle: PhysicalMonitorHandle(
                        physical_monitor.hPhysicalMonitor.0 as isize,
                    ),
                    description: Description::from_wide(
                        &physical_monitor.szPhysicalMonitorDescription,
                    ),
                };
                debug!(
                    "physical monitor '{}' has handle {}",
                    monitor.description, monitor.handle
                );
                monitor
            })
            .collect())
    }

    fn destroy_physical_monitor(
        &self,
        monitor: PhysicalMonitorHandle,
    ) -> Result<()> {
        // SAFETY: The handle came from GetPhysicalMonitorsFromHMONITOR and is
        // only destroyed once.
        unsafe { DestroyPhysicalMonitor(handle(monitor)) }
            .map_err(|err| Error::platform_call("DestroyPhysicalMonitor", err))
    }

    fn set_vcp_feature(
        &self,
        monitor: PhysicalMonitorHandle,
        code: u8,
        value: u32,
    ) -> Result<()> {
        // SAFETY: The handle is a live physical monitor handle.
        if unsafe { SetVCPFeature(handle(monitor), code, value) } == FALSE.0 {
            return Err(last_error("SetVCPFeature"));
        }

        Ok(())
    }

    fn capabilities_string(
        &self,
        monitor: PhysicalMonitorHandle,
    ) -> Result<String> {
        let mut capabilities_string_len: u32 = 0;
        // SAFETY: The pointer argument isn't null.
        if unsafe {
            GetCapabilitiesStringLength(
                handle(monitor),
                ptr::addr_of_mut!(capabilities_string_len),
            )
        } == FALSE.0
        {
            return Err(last_error("GetCapabilitiesStringLength"));
        }

        if capabilities_string_len == 0 {
            return Err(Error::platform_call(
                "GetCapabilitiesStringLength",
                "received an empty capabilities string",
            ));
        }

        let mut capabilities_string_bytes =
            Vec::with_capacity(capabilities_string_len as usize);
        // SAFETY: The slice covers the capacity reserved above, and the
        // length is only set after the OS initializes the bytes.
        unsafe {
            if CapabilitiesRequestAndCapabilitiesReply(
                handle(monitor),
                slice::from_raw_parts_mut(
                    capabilities_string_bytes.as_mut_ptr(),
                    capabilities_string_len as usize,
                ),
            ) == FALSE.0
            {
                return Err(last_error("CapabilitiesRequestAndCapabilitiesReply"));
            }
            capabilities_string_bytes
                .set_len(capabilities_string_len as usize);
        }

        let capabilities_string =
            CStr::from_bytes_until_nul(&capabilities_string_bytes)
                .map_err(|err| {
                    Error::platform_call(
                        "CapabilitiesRequestAndCapabilitiesReply",
                        err,
                    )
                })?;

        Ok(capabilities_string.to_string_lossy().into_owned())
    }
}
