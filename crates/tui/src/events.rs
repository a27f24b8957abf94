use std::time::{Duration, Instant};

use crossterm::event::{self, Event, MouseButton, MouseEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::{app::App, ui};

// Upper bound on how long the loop sleeps waiting for input.
const IDLE_POLL: Duration = Duration::from_millis(120);

pub fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let mut last_draw = Instant::now();
    let heartbeat = Duration::from_millis(500);
    loop {
        if app.dirty || last_draw.elapsed() >= heartbeat {
            terminal.draw(|f| ui::draw(f, app))?;
            app.dirty = false;
            last_draw = Instant::now();
        }

        // Wake up in time for a pending debounced search.
        let timeout = match app.widget.next_deadline() {
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .min(IDLE_POLL),
            None => IDLE_POLL,
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    app.on_key(key);
                }
                Event::Paste(s) => {
                    app.on_paste(&s);
                }
                Event::Resize(_, _) => {
                    app.dirty = true;
                }
                Event::Mouse(me) => {
                    if !app.show_help {
                        if let MouseEventKind::Down(MouseButton::Left) = me.kind {
                            app.on_mouse_down(me.column, me.row);
                        }
                    }
                }
                _ => {}
            }
        }

        app.on_tick();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
