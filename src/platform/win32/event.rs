//! Win32 message translation

use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    TrackMouseEvent, TME_LEAVE, TRACKMOUSEEVENT, VK_DOWN, VK_ESCAPE, VK_RETURN, VK_SPACE, VK_TAB,
    VK_UP,
};
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::platform::{Event, KeyCode, MouseButton};

fn key_from_vk(vk: u32) -> KeyCode {
    match vk {
        v if v == VK_SPACE.0 as u32 => KeyCode::Space,
        v if v == VK_RETURN.0 as u32 => KeyCode::Enter,
        v if v == VK_UP.0 as u32 => KeyCode::Up,
        v if v == VK_DOWN.0 as u32 => KeyCode::Down,
        v if v == VK_TAB.0 as u32 => KeyCode::Tab,
        v if v == VK_ESCAPE.0 as u32 => KeyCode::Escape,
        other => KeyCode::Other(other),
    }
}

fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as i16 as i32;
    (x, y)
}

/// Translate a Win32 message into a pane event
pub fn translate_message(msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<Event> {
    match msg {
        WM_KEYDOWN => Some(Event::KeyDown {
            key: key_from_vk(wparam.0 as u32),
        }),
        WM_MOUSEMOVE => {
            let (x, y) = point_from_lparam(lparam);
            Some(Event::MouseMove { x, y })
        }
        WM_MOUSELEAVE => Some(Event::MouseLeave),
        WM_LBUTTONDOWN | WM_RBUTTONDOWN | WM_MBUTTONDOWN => {
            let (x, y) = point_from_lparam(lparam);
            let button = match msg {
                WM_LBUTTONDOWN => MouseButton::Left,
                WM_RBUTTONDOWN => MouseButton::Right,
                _ => MouseButton::Middle,
            };
            Some(Event::MouseDown { x, y, button })
        }
        WM_LBUTTONUP | WM_RBUTTONUP | WM_MBUTTONUP => {
            let (x, y) = point_from_lparam(lparam);
            let button = match msg {
                WM_LBUTTONUP => MouseButton::Left,
                WM_RBUTTONUP => MouseButton::Right,
                _ => MouseButton::Middle,
            };
            Some(Event::MouseUp { x, y, button })
        }
        WM_SIZE => Some(Event::Resize {
            width: (lparam.0 & 0xFFFF) as i32,
            height: ((lparam.0 >> 16) & 0xFFFF) as i32,
        }),
        _ => None,
    }
}

/// Ask for a WM_MOUSELEAVE when the pointer leaves the window
pub fn track_mouse_leave(hwnd: HWND) {
    let mut tme = TRACKMOUSEEVENT {
        cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
        dwFlags: TME_LEAVE,
        hwndTrack: hwnd,
        dwHoverTime: 0,
    };
    unsafe {
        let _ = TrackMouseEvent(&mut tme);
    }
}

/// Run the Windows message loop until WM_QUIT
pub fn run_message_loop() {
    unsafe {
        let mut msg = MSG::default();
        loop {
            let ret = GetMessageW(&mut msg, None, 0, 0);
            if ret.0 <= 0 {
                break;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
