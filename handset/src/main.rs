mod config;
mod display;
mod events;
mod input;
mod link;
mod pages;
mod power;
mod widgets;

use anyhow::{Context, Result};
use clap::Parser;
use config::HandsetConfig;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use display::FrameBuffer;
use events::AppEvent;
use handset_ui::{JoystickPosition, Page, PageId, PageManager, PageRef, UiManager};
use input::SharedTouch;
use link::{SimulatedLink, WirelessLink};
use pages::{ConnectionPage, HomePage, InfoPage, RemotePage};
use power::SimulatedBattery;
use std::cell::RefCell;
use std::io::BufRead;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// Touchscreen UI for the handheld remote controller, driven by text
/// commands on stdin
#[derive(Parser, Debug)]
#[command(name = "handset")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write a PPM frame dump here on the `dump` command
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Page id to show at startup
    #[arg(long)]
    start_page: Option<u16>,

    /// Save the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = HandsetConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dump) = cli.dump {
        config.frame_dump = Some(dump);
    }
    if let Some(page) = cli.start_page {
        config.start_page = page;
    }
    config.validate().context("Invalid configuration")?;

    if let Some(path) = cli.write_config {
        config.save(&path)?;
        log::info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let (app_tx, app_rx) = crossbeam_channel::unbounded();

    // Set up signal handler - send shutdown event directly to UI loop
    let tx_for_signal = app_tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down...");
        let _ = tx_for_signal.send(AppEvent::Shutdown);
    }) {
        log::error!("Failed to set Ctrl-C handler: {e}");
    }

    // Scripted input stands in for the touch panel and joystick
    let tx_for_input = app_tx;
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match input::parse_command(&line) {
                Ok(Some(event)) => {
                    if tx_for_input.send(event).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("{e}"),
            }
        }
        log::info!("Input closed, shutting down");
        let _ = tx_for_input.send(AppEvent::Shutdown);
    });

    run_ui_loop(&config, &app_rx)
}

/// Keep `page` alive in `owned` and register it under `id`.
fn register<P: Page<FrameBuffer> + 'static>(
    manager: &mut PageManager<FrameBuffer>,
    owned: &mut Vec<PageRef<FrameBuffer>>,
    page: P,
    id: PageId,
) -> Result<()> {
    let page: PageRef<FrameBuffer> = Rc::new(RefCell::new(page));
    manager
        .add_page(page.clone(), id)
        .with_context(|| format!("Failed to register page {id}"))?;
    owned.push(page);
    Ok(())
}

fn run_ui_loop(config: &HandsetConfig, rx: &Receiver<AppEvent>) -> Result<()> {
    let settings = config.chrome_settings();
    let mut display = FrameBuffer::new(settings.screen);
    let touch = SharedTouch::default();
    let mut manager = PageManager::new(UiManager::new(Box::new(touch.clone())), settings);

    let battery = Rc::new(SimulatedBattery::new(&config.battery));
    let link: Rc<dyn WirelessLink> = Rc::new(SimulatedLink::new(&config.link));
    manager
        .init(Some(battery.clone()))
        .context("Failed to initialize the page manager")?;

    let mut owned = Vec::new();
    let navigator = manager.navigator();
    register(
        &mut manager,
        &mut owned,
        HomePage::new(navigator, link.clone()),
        pages::HOME,
    )?;
    register(
        &mut manager,
        &mut owned,
        RemotePage::new(link.clone(), battery.clone()),
        pages::REMOTE,
    )?;
    register(
        &mut manager,
        &mut owned,
        ConnectionPage::new(link.clone()),
        pages::CONNECTION,
    )?;
    register(
        &mut manager,
        &mut owned,
        InfoPage::new(&pages::info::system_info(config)),
        pages::INFO,
    )?;

    let start = PageId(config.start_page);
    manager
        .show_page(start)
        .with_context(|| format!("Failed to show start page {start}"))?;
    manager.set_status("Ready");
    manager.draw_full(&mut display)?;
    display.flush();

    let tick = Duration::from_millis(config.tick_ms);
    loop {
        match rx.recv_timeout(tick) {
            Ok(AppEvent::Shutdown) => {
                log::info!("Shutting down after {} flushes", display.flushes());
                break;
            }
            Ok(event) => {
                handle_event(
                    event,
                    &mut manager,
                    &touch,
                    link.as_ref(),
                    &battery,
                    &display,
                    config,
                );
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("Event channel disconnected, exiting event loop");
                break;
            }
        }

        manager.update();
        manager.draw(&mut display)?;
        display.flush();
    }

    Ok(())
}

fn handle_event(
    event: AppEvent,
    manager: &mut PageManager<FrameBuffer>,
    touch: &SharedTouch,
    link: &dyn WirelessLink,
    battery: &SimulatedBattery,
    display: &FrameBuffer,
    config: &HandsetConfig,
) {
    let navigation = match event {
        AppEvent::TouchDown { x, y } => {
            touch.press(x, y);
            Ok(())
        }
        AppEvent::TouchUp => {
            touch.lift();
            Ok(())
        }
        AppEvent::Tap { x, y } => {
            // Press now, release on the regular tick that follows
            touch.press(x, y);
            manager.update();
            touch.lift();
            Ok(())
        }
        AppEvent::Joystick { x, y } => {
            manager.update_joystick(JoystickPosition::new(x, y));
            Ok(())
        }
        AppEvent::NextPage => manager.next_page(),
        AppEvent::PreviousPage => manager.previous_page(),
        AppEvent::ShowPage(id) => manager.show_page(PageId(id)),
        AppEvent::Pair => {
            link.start_pairing();
            Ok(())
        }
        AppEvent::Charging(charging) => {
            battery.set_charging(charging);
            Ok(())
        }
        AppEvent::Status(text) => {
            manager.set_status(&text);
            Ok(())
        }
        AppEvent::Dump => {
            manager.ui().debug_dump();
            if let Some(path) = &config.frame_dump
                && let Err(e) = display.write_ppm(path)
            {
                log::error!("Frame dump failed: {e:#}");
            }
            Ok(())
        }
        AppEvent::Shutdown => Ok(()),
    };

    if let Err(e) = navigation {
        log::warn!("Navigation failed: {e}");
    }
}
