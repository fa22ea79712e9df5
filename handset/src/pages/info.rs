//! System information page.

use super::{HOME, place, small_label};
use crate::config::HandsetConfig;
use crate::link::format_mac;
use handset_ui::{
    Page, PageCore, Surface, UiManager, UiResult,
    widgets::{Label, TextBlock},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Lines shown on the info page for `config`.
#[must_use]
pub fn system_info(config: &HandsetConfig) -> String {
    let firmware = config
        .version_label
        .clone()
        .unwrap_or_else(|| format!("v{}", env!("CARGO_PKG_VERSION")));
    format!(
        "Handset Controller {firmware}\n\
         Display: {}x{} RGB565\n\
         UI tick: {} ms\n\
         Peer: {}\n\
         Link rate: {} pkt/s",
        config.screen_width,
        config.screen_height,
        config.tick_ms,
        format_mac(&config.link.peer_mac),
        config.link.send_rate,
    )
}

fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!(
        "Uptime: {:02}:{:02}:{:02}",
        secs / 3600,
        secs / 60 % 60,
        secs % 60
    )
}

pub struct InfoPage<D: Surface> {
    core: PageCore<D>,
    text: String,
    started: Instant,
    uptime: Option<Rc<RefCell<Label>>>,
}

impl<D: Surface> InfoPage<D> {
    pub fn new(text: &str) -> Self {
        let mut core = PageCore::new("Info");
        core.set_back_button(true, Some(HOME));
        Self {
            core,
            text: text.to_string(),
            started: Instant::now(),
            uptime: None,
        }
    }
}

impl<D: Surface> Page<D> for InfoPage<D> {
    fn core(&self) -> &PageCore<D> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PageCore<D> {
        &mut self.core
    }

    fn build(&mut self, ui: &mut UiManager<D>) -> UiResult<()> {
        let area = self.core.content_area();
        let width = area.size.width.saturating_sub(20);
        let body = TextBlock::new(place(area, 10, 10, width, 170), &self.text);
        self.core
            .add_content_element(ui, Rc::new(RefCell::new(body)))?;

        let uptime = Rc::new(RefCell::new(small_label(
            place(area, 10, 196, width, 24),
            &format_uptime(self.started.elapsed()),
        )));
        self.core.add_content_element(ui, uptime.clone())?;
        self.uptime = Some(uptime);
        Ok(())
    }

    fn update(&mut self) {
        if let Some(uptime) = &self.uptime {
            uptime
                .borrow_mut()
                .set_text(&format_uptime(self.started.elapsed()));
        }
    }
}
