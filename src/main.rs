use std::{cell::RefCell, io, rc::Rc};

use prophecy_flame::input::{ClickState, InputEvent};
use prophecy_flame::ProphecyGame;
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// Host clock in milliseconds.
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Resolve a mouse position against the DOM grid and the registered targets.
fn dom_tap(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<InputEvent> {
    let document = web_sys::window()?.document()?;
    // DomBackend renders its grid into the first <div> under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let event = cs.tap(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    );
    log::debug!(
        "tap at ({mouse_x}, {mouse_y}) -> {event:?} ({} targets)",
        cs.targets.len()
    );
    event
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("logger init failed: {e}").into());
    }
    log::info!("Prophecy Flame starting");

    #[cfg(target_arch = "wasm32")]
    let game = ProphecyGame::restore(now_ms());
    #[cfg(not(target_arch = "wasm32"))]
    let game = ProphecyGame::new(now_ms());

    let game = Rc::new(RefCell::new(game));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let event = dom_tap(mouse_event.x, mouse_event.y, &click_state.borrow());
            if let Some(event) = event {
                game.borrow_mut().handle_input(&event, now_ms());
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                game.borrow_mut().handle_input(&InputEvent::Key(c), now_ms());
            }
        }
    });

    terminal.draw_web(move |f| {
        let mut game = game.borrow_mut();
        let now = now_ms();
        if game.tick(now) {
            #[cfg(target_arch = "wasm32")]
            prophecy_flame::prophecy::save::save_game(game.engine.state());
        }

        let size = f.area();
        click_state.borrow_mut().begin_frame(size.width, size.height);
        game.render(f, size, &click_state);
    });

    Ok(())
}
