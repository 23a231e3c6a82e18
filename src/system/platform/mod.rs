pub trait PlatformExtensions {
    /// Whether the monitor runs with enough privilege to read and signal
    /// processes owned by other users.
    fn is_elevated() -> bool;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn is_elevated() -> bool {
    platform_impl::Platform::is_elevated()
}
