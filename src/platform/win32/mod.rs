//! Win32 platform implementation

pub mod event;
pub mod host;
pub mod window;

pub use event::{run_message_loop, track_mouse_leave, translate_message};
pub use host::{present, Win32Host};
pub use window::{
    clear_window_callback, create_window, get_client_size, register_window_class,
    set_window_callback, show_window, unregister_window_class, WindowConfig,
};
