//! Tray shell: owns the icon, the context menu and the event loop.
//!
//! One process-scoped [`TrayShell`] is constructed at startup and drives
//! everything; menu activations are resolved through a `MenuId` map and
//! dispatched on short-lived worker threads so the keystroke delay never
//! stalls the loop.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use tracing::{debug, info, warn};
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{TrayIcon, TrayIconBuilder};

use crate::config::Config;
use crate::dispatch::{self, DesktopActions};
use crate::menu::{self, MenuEntry, MenuTree};
use crate::platform;

const RELOAD_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
enum UserEvent {
    Menu(MenuEvent),
    ReloadRequested,
    DispatchFailed(String),
}

/// The rendered context menu plus the lookup tables the event loop needs.
struct MenuState {
    menu: Menu,
    actions: HashMap<MenuId, MenuEntry>,
    reload_id: MenuId,
    exit_id: MenuId,
}

pub struct TrayShell {
    base_dir: PathBuf,
    config: Config,
}

impl TrayShell {
    pub fn new(base_dir: PathBuf, config: Config) -> Self {
        Self { base_dir, config }
    }

    /// Loads the menu and runs the event loop. Returns early only when the
    /// initial load fails; once the loop is running, exits happen through
    /// `std::process::exit`.
    pub fn run(self) -> Result<()> {
        let mut menu_state = rebuild_menu(&self.base_dir)?;

        let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

        let proxy = event_loop.create_proxy();
        MenuEvent::set_event_handler(Some(move |event| {
            let _ = proxy.send_event(UserEvent::Menu(event));
        }));

        // Moved into the run closure below so the watch stays alive.
        let watcher = if self.config.watch {
            start_csv_watcher(&self.base_dir, event_loop.create_proxy())
        } else {
            None
        };

        let dispatch_proxy = event_loop.create_proxy();
        let delay = Duration::from_millis(self.config.send_key_delay_ms);
        let mut tray_icon: Option<TrayIcon> = None;
        let mut last_reload = Instant::now();

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Wait;

            match event {
                Event::NewEvents(StartCause::Init) => {
                    match build_tray_icon(&self.config.tooltip, &menu_state.menu) {
                        Ok(tray) => tray_icon = Some(tray),
                        Err(err) => fail(&format!("{err:#}")),
                    }
                    info!(
                        watching = watcher.is_some(),
                        "tray icon ready, menu dir: {}",
                        self.base_dir.display()
                    );
                }

                Event::UserEvent(UserEvent::Menu(menu_event)) => {
                    if menu_event.id == menu_state.reload_id {
                        info!("reload requested from menu");
                        reload(&self.base_dir, &mut menu_state, &tray_icon);
                        last_reload = Instant::now();
                    } else if menu_event.id == menu_state.exit_id {
                        info!("exit requested from menu");
                        tray_icon = None;
                        std::process::exit(0);
                    } else if let Some(entry) = menu_state.actions.get(&menu_event.id) {
                        spawn_dispatch(entry.clone(), delay, dispatch_proxy.clone());
                    }
                }

                Event::UserEvent(UserEvent::ReloadRequested) => {
                    if last_reload.elapsed() < RELOAD_DEBOUNCE {
                        debug!("ignoring reload burst from file watcher");
                    } else {
                        info!("CSV change detected, reloading menu");
                        reload(&self.base_dir, &mut menu_state, &tray_icon);
                        last_reload = Instant::now();
                    }
                }

                Event::UserEvent(UserEvent::DispatchFailed(message)) => {
                    warn!("dispatch failed: {message}");
                    show_error(&message);
                }

                _ => {}
            }
        });
    }
}

/// Samples the input state on the loop thread, then runs the dispatch on a
/// worker so the fixed focus delay cannot block repainting. Failures come
/// back through the proxy as a dialog.
fn spawn_dispatch(entry: MenuEntry, delay: Duration, proxy: EventLoopProxy<UserEvent>) {
    let modifiers = platform::modifier_state();
    let button = platform::pressed_button();
    debug!(label = %entry.label, ?button, control = modifiers.control, "menu item activated");

    std::thread::spawn(move || {
        let mut actions = DesktopActions;
        match dispatch::dispatch(&entry, modifiers, button, delay, &mut actions) {
            Ok(outcome) => debug!(?outcome, "dispatch complete"),
            Err(err) => {
                let _ = proxy.send_event(UserEvent::DispatchFailed(err.to_string()));
            }
        }
    });
}

/// Full reload: walk the CSV files, rebuild the tree and swap the menu in
/// place. Any load failure is fatal, matching startup behavior.
fn reload(base_dir: &Path, menu_state: &mut MenuState, tray_icon: &Option<TrayIcon>) {
    match rebuild_menu(base_dir) {
        Ok(state) => {
            *menu_state = state;
            if let Some(tray) = tray_icon {
                tray.set_menu(Some(Box::new(menu_state.menu.clone())));
            }
        }
        Err(err) => fail(&format!("{err:#}")),
    }
}

fn rebuild_menu(base_dir: &Path) -> Result<MenuState> {
    let tree = menu::load_menu(base_dir)?;
    build_menu(&tree)
}

/// Renders the tree into a tray context menu. Entries with an empty
/// submenu label hang directly off their main group; the fixed Reload and
/// Exit items always close the menu, behind a separator whenever any
/// group exists.
fn build_menu(tree: &MenuTree) -> Result<MenuState> {
    let menu = Menu::new();
    let mut actions = HashMap::new();

    for (main_label, subs) in tree {
        let main_item = Submenu::new(main_label, true);
        for (sub_label, leaves) in subs {
            if sub_label.is_empty() {
                for entry in leaves {
                    main_item.append(&leaf_item(entry, &mut actions))?;
                }
            } else {
                let sub_item = Submenu::new(sub_label, true);
                for entry in leaves {
                    sub_item.append(&leaf_item(entry, &mut actions))?;
                }
                main_item.append(&sub_item)?;
            }
        }
        menu.append(&main_item)?;
    }

    if !tree.is_empty() {
        menu.append(&PredefinedMenuItem::separator())?;
    }

    let reload = MenuItem::new("Reload", true, None);
    let exit = MenuItem::new("Exit", true, None);
    menu.append(&reload)?;
    menu.append(&exit)?;

    Ok(MenuState {
        menu,
        actions,
        reload_id: reload.id().clone(),
        exit_id: exit.id().clone(),
    })
}

fn leaf_item(entry: &MenuEntry, actions: &mut HashMap<MenuId, MenuEntry>) -> MenuItem {
    let item = MenuItem::new(&entry.label, true, None);
    actions.insert(item.id().clone(), entry.clone());
    item
}

fn build_tray_icon(tooltip: &str, menu: &Menu) -> Result<TrayIcon> {
    TrayIconBuilder::new()
        .with_menu(Box::new(menu.clone()))
        .with_tooltip(tooltip)
        .with_icon(tray_icon_image()?)
        .build()
        .context("Failed to create tray icon")
}

/// 32x32 flat glyph drawn in code so the binary needs no icon asset: a
/// dark border around a filled square.
fn tray_icon_image() -> Result<tray_icon::Icon> {
    const SIZE: u32 = 32;
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let border = x < 2 || y < 2 || x >= SIZE - 2 || y >= SIZE - 2;
            if border {
                rgba.extend_from_slice(&[0x1f, 0x2a, 0x33, 0xff]);
            } else {
                rgba.extend_from_slice(&[0x2e, 0x7d, 0xd2, 0xff]);
            }
        }
    }
    tray_icon::Icon::from_rgba(rgba, SIZE, SIZE).context("Failed to build tray icon image")
}

/// Watches the menu directory for CSV edits and requests a debounced
/// reload. Watch failures downgrade to manual reloads only.
fn start_csv_watcher(
    base_dir: &Path,
    proxy: EventLoopProxy<UserEvent>,
) -> Option<RecommendedWatcher> {
    let watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            let Ok(event) = res else { return };
            let touches_csv = event
                .paths
                .iter()
                .any(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")));
            if touches_csv {
                let _ = proxy.send_event(UserEvent::ReloadRequested);
            }
        },
        notify::Config::default(),
    );

    match watcher {
        Ok(mut watcher) => match watcher.watch(base_dir, RecursiveMode::Recursive) {
            Ok(()) => Some(watcher),
            Err(err) => {
                warn!("Failed to watch {}: {err}", base_dir.display());
                None
            }
        },
        Err(err) => {
            warn!("Failed to create file watcher: {err}");
            None
        }
    }
}

/// Modal error dialog, the single surface for all user-facing failures.
pub fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

/// Fatal-path exit used for load failures after startup; the dialog is
/// shown first, mirroring the startup path in `main`.
fn fail(message: &str) -> ! {
    show_error(message);
    std::process::exit(1);
}
