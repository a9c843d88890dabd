//! System metrics - platform, memory, disk, CPU

use super::{OsError, OsResult};
use serde::Serialize;
use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};
use tokio::task;

#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub platform: String,
    pub os_version: String,
    pub kernel_version: String,
    pub hostname: String,
    pub architecture: String,
    pub processor: String,
    pub memory: MemoryInfo,
    pub disk: DiskInfo,
    pub cpu_percent: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub available: u64,
    pub percent: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiskInfo {
    pub total: u64,
    pub free: u64,
    pub percent: f32,
}

fn used_percent(total: u64, free: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (total.saturating_sub(free) as f64 / total as f64 * 100.0) as f32
}

/// Snapshot host metrics. CPU usage needs two samples, so this takes
/// at least `MINIMUM_CPU_UPDATE_INTERVAL`.
pub async fn system_info() -> OsResult<SystemInfo> {
    task::spawn_blocking(|| {
        let mut system = System::new_all();
        system.refresh_all();
        std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        system.refresh_cpu();

        let processor = system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default();

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .iter()
            .next()
            .map(|disk| DiskInfo {
                total: disk.total_space(),
                free: disk.available_space(),
                percent: used_percent(disk.total_space(), disk.available_space()),
            })
            .unwrap_or(DiskInfo {
                total: 0,
                free: 0,
                percent: 0.0,
            });

        Ok(SystemInfo {
            platform: System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: System::long_os_version().unwrap_or_default(),
            kernel_version: System::kernel_version().unwrap_or_default(),
            hostname: System::host_name().unwrap_or_default(),
            architecture: std::env::consts::ARCH.to_string(),
            processor,
            memory: MemoryInfo {
                total: system.total_memory(),
                available: system.available_memory(),
                percent: used_percent(system.total_memory(), system.available_memory()),
            },
            disk,
            cpu_percent: system.global_cpu_info().cpu_usage(),
        })
    })
    .await
    .map_err(|e| OsError::OperationFailed(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_used_percent() {
        assert_eq!(used_percent(0, 0), 0.0);
        assert_eq!(used_percent(200, 50), 75.0);
        assert_eq!(used_percent(100, 150), 0.0);
    }
}
