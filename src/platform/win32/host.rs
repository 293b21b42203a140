//! `Host` backed by a Win32 window

use windows::Win32::Foundation::{HWND, POINT, RECT};
use windows::Win32::Graphics::Gdi::{
    BeginPaint, EndPaint, InvalidateRect, ScreenToClient, SetDIBitsToDevice, BITMAPINFO,
    BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, PAINTSTRUCT,
};
use windows::Win32::UI::WindowsAndMessaging::{KillTimer, SetTimer};

use crate::platform::Host;
use crate::render::Bitmap;
use crate::theme::types::{Point, Rect};
use crate::timer::TimerId;

/// Timers, invalidation and coordinate mapping for one window.
///
/// Timer ids are `TimerId::to_raw`, so WM_TIMER's wparam maps straight back
/// with `TimerId::from_raw`.
#[derive(Debug)]
pub struct Win32Host {
    hwnd: HWND,
    suspend_depth: u32,
    /// An invalidation arrived while layout was suspended
    pending_invalidate: bool,
}

impl Win32Host {
    pub fn new(hwnd: HWND) -> Self {
        Self {
            hwnd,
            suspend_depth: 0,
            pending_invalidate: false,
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl Host for Win32Host {
    fn suspend_layout(&mut self) {
        self.suspend_depth += 1;
    }

    fn resume_layout(&mut self) {
        self.suspend_depth = self.suspend_depth.saturating_sub(1);
        if self.suspend_depth == 0 && self.pending_invalidate {
            self.pending_invalidate = false;
            unsafe {
                let _ = InvalidateRect(self.hwnd, None, false);
            }
        }
    }

    fn invalidate(&mut self, rect: Rect) {
        if self.suspend_depth > 0 {
            self.pending_invalidate = true;
            return;
        }
        let rect = RECT {
            left: rect.x,
            top: rect.y,
            right: rect.right(),
            bottom: rect.bottom(),
        };
        unsafe {
            let _ = InvalidateRect(self.hwnd, Some(&rect), false);
        }
    }

    fn start_timer(&mut self, timer: TimerId, interval_ms: u32) {
        unsafe {
            if SetTimer(self.hwnd, timer.to_raw(), interval_ms, None) == 0 {
                log!("SetTimer failed for {:?}", timer);
            }
        }
    }

    fn stop_timer(&mut self, timer: TimerId) {
        unsafe {
            let _ = KillTimer(self.hwnd, timer.to_raw());
        }
    }

    fn screen_to_client(&self, point: Point) -> Point {
        let mut pt = POINT {
            x: point.x,
            y: point.y,
        };
        unsafe {
            let _ = ScreenToClient(self.hwnd, &mut pt);
        }
        Point::new(pt.x, pt.y)
    }
}

/// Copy an offscreen bitmap to the window (call from WM_PAINT)
pub fn present(hwnd: HWND, bitmap: &Bitmap) {
    let pixels = bitmap.to_bgra();
    let info = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: bitmap.width(),
            // Negative height: top-down rows
            biHeight: -bitmap.height(),
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    };

    unsafe {
        let mut ps = PAINTSTRUCT::default();
        let hdc = BeginPaint(hwnd, &mut ps);
        SetDIBitsToDevice(
            hdc,
            0,
            0,
            bitmap.width() as u32,
            bitmap.height() as u32,
            0,
            0,
            0,
            bitmap.height() as u32,
            pixels.as_ptr().cast(),
            &info,
            DIB_RGB_COLORS,
        );
        let _ = EndPaint(hwnd, &ps);
    }
}
