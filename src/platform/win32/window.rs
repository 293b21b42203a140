//! Win32 window creation

use std::cell::RefCell;

use windows::core::{w, Error, PCWSTR};
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::HBRUSH;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::*;

/// Window configuration
#[derive(Clone, Debug)]
pub struct WindowConfig {
    pub title: String,
    /// Client width in pixels
    pub width: i32,
    /// Client height in pixels
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Explorer Bar".to_string(),
            width: 240,
            height: 600,
        }
    }
}

type WindowCallback = Box<dyn FnMut(HWND, u32, WPARAM, LPARAM) -> Option<LRESULT>>;

thread_local! {
    static WINDOW_CALLBACK: RefCell<Option<WindowCallback>> = RefCell::new(None);
}

/// Set the window procedure callback
pub fn set_window_callback<F>(callback: F)
where
    F: FnMut(HWND, u32, WPARAM, LPARAM) -> Option<LRESULT> + 'static,
{
    WINDOW_CALLBACK.with(|cb| {
        *cb.borrow_mut() = Some(Box::new(callback));
    });
}

pub fn clear_window_callback() {
    WINDOW_CALLBACK.with(|cb| {
        *cb.borrow_mut() = None;
    });
}

unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // try_borrow_mut: a re-entrant message while the callback runs falls
    // through to default handling
    let result = WINDOW_CALLBACK.with(|cb| match cb.try_borrow_mut() {
        Ok(mut callback) => callback
            .as_mut()
            .and_then(|callback| callback(hwnd, msg, wparam, lparam)),
        Err(_) => None,
    });
    if let Some(r) = result {
        return r;
    }

    match msg {
        WM_DESTROY => {
            log!("WM_DESTROY received - posting quit message");
            PostQuitMessage(0);
            LRESULT(0)
        }
        WM_ERASEBKGND => {
            // We paint everything
            LRESULT(1)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

const WINDOW_CLASS_NAME: PCWSTR = w!("ExplorerBarWindowClass");

/// Register the window class (call once at startup)
pub fn register_window_class() -> Result<(), Error> {
    unsafe {
        let hinstance = GetModuleHandleW(None)?;

        let wc = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
            style: CS_HREDRAW | CS_VREDRAW,
            lpfnWndProc: Some(wnd_proc),
            hInstance: hinstance.into(),
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: HBRUSH::default(),
            lpszClassName: WINDOW_CLASS_NAME,
            ..Default::default()
        };

        if RegisterClassExW(&wc) == 0 {
            return Err(Error::from_win32());
        }
        Ok(())
    }
}

pub fn unregister_window_class() {
    unsafe {
        let _ = GetModuleHandleW(None).map(|h| {
            let _ = UnregisterClassW(WINDOW_CLASS_NAME, h);
        });
    }
}

/// Create a framed, resizable window whose client area has the configured size
pub fn create_window(config: &WindowConfig) -> Result<HWND, Error> {
    unsafe {
        let hinstance = GetModuleHandleW(None)?;

        let style = WS_OVERLAPPEDWINDOW;
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: config.width,
            bottom: config.height,
        };
        AdjustWindowRect(&mut rect, style, false)?;

        let title: Vec<u16> = config.title.encode_utf16().chain(Some(0)).collect();
        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            WINDOW_CLASS_NAME,
            PCWSTR(title.as_ptr()),
            style,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            rect.right - rect.left,
            rect.bottom - rect.top,
            None,
            None,
            hinstance,
            None,
        )?;
        Ok(hwnd)
    }
}

pub fn show_window(hwnd: HWND) {
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
    }
}

/// Window client area size
pub fn get_client_size(hwnd: HWND) -> (i32, i32) {
    let mut rect = RECT::default();
    unsafe {
        let _ = GetClientRect(hwnd, &mut rect);
    }
    (rect.right - rect.left, rect.bottom - rect.top)
}
