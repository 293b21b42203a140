//! Explorerbar demo
//!
//! On Windows this opens a window showing the configured panels. Elsewhere,
//! or with `--headless`, it runs a scripted session against the headless
//! host and logs what happened.

use explorerbar::log;
use explorerbar::platform::headless::HeadlessHost;
use explorerbar::platform::{Event, MouseButton};
use explorerbar::render::Bitmap;
use explorerbar::theme::Size;
use explorerbar::{ExplorerBarConfig, TaskPane};

const PANE_SIZE: Size = Size::new(240, 600);

fn main() {
    log::init();
    log!("main() starting");

    let config = ExplorerBarConfig::load();

    #[cfg(windows)]
    if !std::env::args().any(|arg| arg == "--headless") {
        if let Err(e) = windowed::run(&config) {
            log!("FATAL: {}", e);
            eprintln!("explorerbar: {}", e);
        }
        return;
    }

    if let Err(e) = run_headless(&config) {
        log!("Headless session failed: {}", e);
        eprintln!("explorerbar: {}", e);
    }
}

fn describe(pane: &TaskPane) {
    for expando in pane.expandos() {
        let bounds = expando.bounds();
        println!(
            "  {:<24} y={:<4} height={:<4} {}",
            expando.text(),
            bounds.y,
            bounds.height,
            if expando.is_collapsed() { "collapsed" } else { "expanded" }
        );
    }
}

/// Collapse the first panel, then drag the last one to the top
fn run_headless(config: &ExplorerBarConfig) -> explorerbar::Result<()> {
    let mut host = HeadlessHost::new();
    let mut pane = config.build_pane(PANE_SIZE, &mut host)?;
    pane.set_allow_dragging(true);
    println!("Initial layout:");
    describe(&pane);

    let Some(first) = pane.expandos().first().map(|e| e.id()) else {
        println!("No panels configured");
        return Ok(());
    };

    pane.collapse(first, &mut host)?;
    let ticks = host.pump(1000, |id, host| pane.on_timer(id, host));
    log!("Collapse finished after {} ticks ({} ms)", ticks, host.now_ms());
    println!("After collapsing {} ({} frames):", first, ticks);
    describe(&pane);

    if let Some(last) = pane.expandos().last().map(|e| e.bounds()) {
        let header = (last.x + 20, last.y + 10);
        let press = Event::MouseDown {
            x: header.0,
            y: header.1,
            button: MouseButton::Left,
        };
        let top = pane.expandos()[0].bounds().y;
        pane.handle_event(&press, &mut host);
        pane.handle_event(&Event::MouseMove { x: header.0, y: top + 2 }, &mut host);
        pane.handle_event(
            &Event::MouseUp {
                x: header.0,
                y: top + 2,
                button: MouseButton::Left,
            },
            &mut host,
        );
        println!("After dragging the last panel to the top:");
        describe(&pane);
    }

    for event in pane.drain_events() {
        log!("Pane event: {:?}", event);
        println!("  event: {:?}", event);
    }

    let mut surface = Bitmap::new(PANE_SIZE.width, PANE_SIZE.height);
    pane.paint(&mut surface);
    log!("Painted {}x{} frame", surface.width(), surface.height());
    Ok(())
}

#[cfg(windows)]
mod windowed {
    use std::cell::RefCell;
    use std::rc::Rc;

    use windows::Win32::Foundation::LRESULT;
    use windows::Win32::UI::WindowsAndMessaging::{WM_MOUSEMOVE, WM_PAINT, WM_TIMER};

    use explorerbar::log;
    use explorerbar::platform::win32::{
        clear_window_callback, create_window, get_client_size, present, register_window_class,
        run_message_loop, set_window_callback, show_window, track_mouse_leave,
        translate_message, unregister_window_class, Win32Host, WindowConfig,
    };
    use explorerbar::render::Bitmap;
    use explorerbar::theme::Size;
    use explorerbar::timer::TimerId;
    use explorerbar::ExplorerBarConfig;

    use super::PANE_SIZE;

    pub fn run(config: &ExplorerBarConfig) -> Result<(), Box<dyn std::error::Error>> {
        register_window_class()?;
        let hwnd = create_window(&WindowConfig {
            width: PANE_SIZE.width,
            height: PANE_SIZE.height,
            ..WindowConfig::default()
        })?;
        log!("Window created: {:?}", hwnd);

        let mut host = Win32Host::new(hwnd);
        let (width, height) = get_client_size(hwnd);
        let pane = config.build_pane(Size::new(width, height), &mut host)?;

        let pane = Rc::new(RefCell::new(pane));
        let host = Rc::new(RefCell::new(host));
        let surface = Rc::new(RefCell::new(Bitmap::new(width, height)));
        let mut tracking = false;

        set_window_callback(move |hwnd, msg, wparam, lparam| {
            let mut pane = pane.borrow_mut();
            let mut host = host.borrow_mut();
            match msg {
                WM_PAINT => {
                    let mut surface = surface.borrow_mut();
                    let size = pane.size();
                    if surface.width() != size.width || surface.height() != size.height {
                        surface.resize(size.width, size.height);
                    }
                    pane.paint(&mut *surface);
                    present(hwnd, &surface);
                    Some(LRESULT(0))
                }
                WM_TIMER => {
                    pane.on_timer(TimerId::from_raw(wparam.0), &mut *host);
                    Some(LRESULT(0))
                }
                _ => {
                    let event = translate_message(msg, wparam, lparam)?;
                    if msg == WM_MOUSEMOVE && !tracking {
                        track_mouse_leave(hwnd);
                        tracking = true;
                    }
                    if matches!(event, explorerbar::platform::Event::MouseLeave) {
                        tracking = false;
                    }
                    pane.handle_event(&event, &mut *host);
                    for event in pane.drain_events() {
                        log!("Pane event: {:?}", event);
                    }
                    Some(LRESULT(0))
                }
            }
        });

        show_window(hwnd);
        run_message_loop();

        clear_window_callback();
        unregister_window_class();
        Ok(())
    }
}
