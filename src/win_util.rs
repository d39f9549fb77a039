#[cfg(target_os = "windows")]
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
#[cfg(target_os = "windows")]
use windows::Win32::Foundation::HWND;

#[cfg(target_os = "windows")]
pub fn get_hwnd(frame: &eframe::Frame) -> Option<HWND> {
    frame
        .window_handle()
        .ok()
        .and_then(|wh| match wh.as_raw() {
            RawWindowHandle::Win32(handle) => {
                Some(HWND(handle.hwnd.get() as *mut core::ffi::c_void))
            }
            _ => None,
        })
}

/// Ask the compositor to leave the overlay out of screen captures, so region
/// grabs see what is behind it instead of its own last frame.
#[cfg(target_os = "windows")]
pub fn exclude_from_capture(frame: &eframe::Frame) -> anyhow::Result<()> {
    use windows::Win32::UI::WindowsAndMessaging::{
        SetWindowDisplayAffinity, WDA_EXCLUDEFROMCAPTURE,
    };

    let hwnd = get_hwnd(frame).ok_or_else(|| anyhow::anyhow!("overlay has no Win32 handle"))?;
    unsafe { SetWindowDisplayAffinity(hwnd, WDA_EXCLUDEFROMCAPTURE) }?;
    Ok(())
}

#[cfg(not(target_os = "windows"))]
pub fn exclude_from_capture(_frame: &eframe::Frame) -> anyhow::Result<()> {
    Ok(())
}

/// Whether the process runs elevated. `None` where the platform has no such
/// notion or the query is unsupported.
#[cfg(target_os = "windows")]
pub fn is_elevated() -> Option<bool> {
    use windows::Win32::UI::Shell::IsUserAnAdmin;

    Some(unsafe { IsUserAnAdmin() }.as_bool())
}

#[cfg(not(target_os = "windows"))]
pub fn is_elevated() -> Option<bool> {
    None
}

pub fn log_privilege_diagnostic() {
    match is_elevated() {
        Some(true) => tracing::info!("running with administrator privileges"),
        Some(false) => tracing::info!(
            "running without administrator privileges; elevated windows may not be captured"
        ),
        None => tracing::debug!("privilege level unknown on this platform"),
    }
}
