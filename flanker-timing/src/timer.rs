use std::time::{Duration, Instant};

/// Monotonic clock used by the trial phase controller. Timestamps are
/// nanoseconds since an arbitrary epoch and never go backwards.
pub trait Timer: Clone + Send + Sync {
    fn now_ns(&self) -> u64;

    fn elapsed(&self, since_ns: u64) -> Duration {
        Duration::from_nanos(self.now_ns().saturating_sub(since_ns))
    }

    /// Give up the CPU for a short, bounded time. The trial loop calls this
    /// between deadline polls so quit requests stay serviced.
    fn sleep(&self, d: Duration);
}

/// Wall timer backed by `Instant`, with platform sleep primitives that hold
/// sub-millisecond accuracy where the OS allows it.
#[derive(Debug, Clone)]
pub struct PrecisionTimer {
    start: Instant,
}

impl PrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    #[cfg(target_os = "linux")]
    fn platform_sleep(&self, duration: Duration) {
        use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

        let req = timespec {
            tv_sec: duration.as_secs() as libc::time_t,
            tv_nsec: duration.subsec_nanos() as libc::c_long,
        };

        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
        }
    }

    #[cfg(windows)]
    fn platform_sleep(&self, duration: Duration) {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{
            CreateWaitableTimerW, SetWaitableTimer, WaitForSingleObject,
        };

        unsafe {
            if let Ok(timer) = CreateWaitableTimerW(None, true, None) {
                // Relative due time in 100 ns intervals.
                let due = -(duration.as_nanos() as i64 / 100);
                if SetWaitableTimer(timer, &due, 0, None, None, false).is_ok() {
                    WaitForSingleObject(timer, u32::MAX);
                }
                let _ = CloseHandle(timer);
            } else {
                std::thread::sleep(duration);
            }
        }
    }

    #[cfg(target_os = "macos")]
    fn platform_sleep(&self, duration: Duration) {
        use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};

        // Below ~100 us the scheduler overshoot dominates, so spin instead.
        if duration.as_nanos() < 100_000 {
            unsafe {
                let start = mach_absolute_time();
                let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
                mach_timebase_info(&mut timebase);
                let target_ticks =
                    duration.as_nanos() as u64 * timebase.denom as u64 / timebase.numer as u64;
                while mach_absolute_time() - start < target_ticks {
                    std::hint::spin_loop();
                }
            }
        } else {
            std::thread::sleep(duration);
        }
    }

    #[cfg(not(any(target_os = "linux", windows, target_os = "macos")))]
    fn platform_sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl Timer for PrecisionTimer {
    fn now_ns(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn sleep(&self, d: Duration) {
        self.platform_sleep(d);
    }
}

impl Default for PrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_monotonic() {
        let timer = PrecisionTimer::new();
        let a = timer.now_ns();
        let b = timer.now_ns();
        assert!(b >= a);
    }

    #[test]
    fn sleep_advances_the_clock() {
        let timer = PrecisionTimer::new();
        let before = timer.now_ns();
        timer.sleep(Duration::from_millis(2));
        assert!(timer.elapsed(before) >= Duration::from_millis(2));
    }
}
