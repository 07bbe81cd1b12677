//! Runtime: terminal lifecycle and the event loop.
//!
//! - A dedicated input task blocks on `crossterm` and forwards events over a
//!   channel, so polling and reading stay on one thread.
//! - One `tokio::select!` loop multiplexes input, the background category
//!   load and a ticker that only runs fast while something is loading.
//! - Components return `Effect`s; the loop executes them and re-renders only
//!   when something changed.
use std::sync::Arc;
use std::time::{Duration, Instant};

use aisle_api::CategorySource;
use aisle_catalog::CategoryTree;
use aisle_util::DraftStore;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::{App, Effect, Msg, SharedCtx};
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

type LoadHandle = JoinHandle<Result<CategoryTree, String>>;

/// Spawn a dedicated input task that blocks on terminal input and forwards
/// `crossterm` events over a Tokio channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).is_ok_and(|ready| ready) {
                match event::read() {
                    Ok(event) => {
                        // Throttle mouse move events to once per 16 ms.
                        let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move || last_mouse_event.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_event = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            } else if sender.is_closed() {
                break;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(&app.selector, Some(old_focus));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| {
        let area = frame.area();
        main_view.render(frame, area, app);
    })?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, &Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

fn spawn_category_load(source: Arc<dyn CategorySource>) -> LoadHandle {
    tokio::spawn(async move {
        debug!(source = %source.describe(), "loading category tree");
        source.load().await.map_err(|error| format!("{error:#}"))
    })
}

/// Entry point for the TUI runtime: sets up the terminal, spawns the event
/// producer, runs the async event loop, and performs cleanup on exit.
pub async fn run_app(source: Arc<dyn CategorySource>, drafts: Arc<dyn DraftStore>) -> Result<()> {
    let mut input_receiver = spawn_input_thread().await;
    let mut main_view = MainView::default();
    let mut app = App::new(SharedCtx::new(source, drafts));
    let mut terminal = setup_terminal()?;

    let mut pending_load: Option<LoadHandle> = None;
    // Load once the loop runs so the first frame appears immediately.
    let mut effects: Vec<Effect> = vec![Effect::LoadCategories];

    // Ticking strategy: fast while loading, very slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    // Some terminals drop resize notifications; compare sizes each iteration.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    'event_loop: loop {
        if !effects.is_empty() {
            let batch = std::mem::take(&mut effects);
            if process_effects(&mut app, batch, &mut pending_load) {
                break 'event_loop;
            }
            render(&mut terminal, &mut app, &mut main_view)?;
            continue;
        }

        let needs_animation = app.is_loading();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break 'event_loop;
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break 'event_loop;
                }
                effects.extend(handle_input_event(&mut app, &mut main_view, event));
                needs_render = true;
            }

            joined = async {
                match pending_load.as_mut() {
                    Some(handle) => Some(handle.await),
                    None => None,
                }
            }, if pending_load.is_some() => {
                pending_load = None;
                let Some(joined) = joined else {
                    continue 'event_loop;
                };
                let outcome = joined.unwrap_or_else(|error| Err(format!("load task failed: {error}")));
                effects.extend(main_view.handle_message(&mut app, &Msg::CategoriesLoaded(outcome)));
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, &Msg::Tick));
                needs_render = needs_animation;
            }

            // Handle Ctrl+C delivered as a signal (e.g. before raw mode applies)
            _ = signal::ctrl_c() => { break 'event_loop; }
        }

        if let Ok((w, h)) = crossterm::terminal::size()
            && last_size != Some((w, h))
        {
            last_size = Some((w, h));
            effects.extend(main_view.handle_message(&mut app, &Msg::Resize(w, h)));
            needs_render = true;
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    if let Some(handle) = pending_load.take() {
        handle.abort();
    }
    cleanup_terminal(&mut terminal)?;
    Ok(())
}

/// Execute effects; returns `true` when the application should quit.
fn process_effects(app: &mut App, effects: Vec<Effect>, pending_load: &mut Option<LoadHandle>) -> bool {
    for effect in effects {
        match effect {
            Effect::SelectionChanged(path) => app.persist_selection(&path),
            Effect::LoadCategories => {
                if pending_load.is_some() {
                    debug!("category load already in flight");
                    continue;
                }
                info!(source = %app.ctx.source_label, "requesting category tree");
                app.mark_loading();
                *pending_load = Some(spawn_category_load(app.ctx.source.clone()));
            }
            Effect::Quit => return true,
        }
    }
    false
}
