//! Application state and event handling.

use crate::host::TerminalHost;
use crate::settings::{self, PadSettings, SHOW_HELP, THEME};
use anyhow::Context;
use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEventKind};
use easel_keybinds::{ActionId, Binding, KeyBinder, KeyDisplayConfig, KeybindsConfig, RawKeyEvent, ScopeId};
use easel_widgets::{
    paste_clipboard, EditBox, EditLines, EditTarget, Host, ParamGui, Point, Rect, ScaleModel,
    ScaleParams, WheelZoom,
};
use ratatui::layout::Rect as Area;
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{info, warn};

pub struct App {
    pub binder: KeyBinder,
    pub host: Rc<TerminalHost>,
    pub title: Rc<RefCell<EditBox>>,
    pub body: Rc<RefCell<EditLines>>,
    pub settings: Rc<RefCell<PadSettings>>,
    pub path: Option<PathBuf>,
    pub message: Option<String>,
    /// View zoom, stepped by the mouse wheel.
    pub zoom: ScaleModel,
    wheel: WheelZoom,
    quit: Rc<Cell<bool>>,
    save_requested: Rc<Cell<bool>>,
}

impl App {
    pub fn new(path: Option<PathBuf>, keybinds: &KeybindsConfig) -> anyhow::Result<Self> {
        let host = Rc::new(TerminalHost::new());
        let settings = Rc::new(RefCell::new(PadSettings::default()));
        let style = settings.borrow().text_style();
        let mut binder = KeyBinder::new();

        let title = EditBox::new(&mut binder, Rect::new(0.0, 0.0, 40.0, 1.0), style.clone(), host.clone())?;
        let body = EditLines::new(&mut binder, Rect::new(0.0, 3.0, 40.0, 10.0), style, host.clone())?;

        let mut app = Self {
            binder,
            host,
            title,
            body,
            settings: settings.clone(),
            path,
            message: None,
            zoom: ScaleModel::new(ScaleParams::default())?,
            wheel: WheelZoom::default(),
            quit: Rc::new(Cell::new(false)),
            save_requested: Rc::new(Cell::new(false)),
        };
        app.load()?;
        app.install_keys(Rc::new(RefCell::new(settings::param_gui(settings))))?;

        for scope in [app.title_scope(), app.body_scope()] {
            if let Err(e) = app.binder.apply_config(scope, keybinds) {
                warn!(%scope, error = %e, "ignoring key binding overrides");
            }
        }

        app.body.borrow().on_click(&mut app.binder);
        Ok(app)
    }

    fn load(&mut self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        self.title.borrow_mut().set_text(&path.display().to_string());
        if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let mut body = self.body.borrow_mut();
            body.set_text(&text);
            body.edit_box_mut().buffer_mut().move_to(easel_widgets::Motion::Start);
            body.repaint();
        }
        Ok(())
    }

    /// Application keys, bound in every scope so they work wherever focus is.
    fn install_keys(&mut self, params: Rc<RefCell<ParamGui>>) -> anyhow::Result<()> {
        let quit = Rc::clone(&self.quit);
        let quit = Binding::new("quit", move |_| {
            quit.set(true);
            Ok(false)
        });

        let save = Rc::clone(&self.save_requested);
        let save = Binding::new("save", move |_| {
            save.set(true);
            Ok(false)
        });

        let gui = Rc::clone(&params);
        let help = Binding::new("toggle-help", move |_| {
            settings::cycle(&mut *gui.try_borrow_mut()?, SHOW_HELP)?;
            Ok(false)
        });

        let gui = params;
        let theme = Binding::new("next-theme", move |_| {
            let value = settings::cycle(&mut *gui.try_borrow_mut()?, THEME)?;
            info!(%value, "theme changed");
            Ok(false)
        });

        let (title, body) = (self.title_scope(), self.body_scope());
        for scope in [ScopeId::GLOBAL, title, body] {
            self.binder.set_key(scope, "C-q", Some(quit.clone()))?;
            self.binder.set_key(scope, "C-s", Some(save.clone()))?;
            self.binder.set_key(scope, "F1", Some(help.clone()))?;
            self.binder.set_key(scope, "F2", Some(theme.clone()))?;
        }
        for (from, to) in [(ScopeId::GLOBAL, body), (title, body), (body, title)] {
            self.binder.set_key(
                from,
                "Tab",
                Some(Binding::new("next-box", move |ctx| {
                    ctx.set_focus(to);
                    Ok(false)
                })),
            )?;
        }
        self.binder.set_key(body, "Escape", Some(Binding::new("blur", |ctx| {
            ctx.set_focus(ScopeId::GLOBAL);
            Ok(false)
        })))?;
        Ok(())
    }

    pub fn title_scope(&self) -> ScopeId {
        self.title.borrow().scope()
    }

    pub fn body_scope(&self) -> ScopeId {
        self.body.borrow().edit_box().scope()
    }

    pub fn should_quit(&self) -> bool {
        self.quit.get()
    }

    pub fn show_help(&self) -> bool {
        self.settings.borrow().show_help
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.message = None;
                let mut raw = RawKeyEvent::from(key);
                self.binder.dispatch_event(&mut raw);
                self.host.request_repaint();
            }
            Event::Paste(text) => {
                self.host.set_clipboard(text);
                if self.binder.has_focus(self.title_scope()) {
                    paste_clipboard(&self.title);
                } else if self.binder.has_focus(self.body_scope()) {
                    paste_clipboard(&self.body);
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let (x, y) = (f32::from(mouse.column), f32::from(mouse.row));
                if self.title.borrow().rect().contains(x, y) {
                    self.title.borrow().on_click(&mut self.binder);
                } else if self.body.borrow().edit_box().rect().contains(x, y) {
                    self.body.borrow().on_click(&mut self.binder);
                } else {
                    self.title.borrow().blur(&mut self.binder);
                    self.body.borrow().edit_box().blur(&mut self.binder);
                }
                self.host.request_repaint();
            }
            Event::Mouse(mouse)
                if matches!(mouse.kind, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown) =>
            {
                let delta = if mouse.kind == MouseEventKind::ScrollUp { 1.0 } else { -1.0 };
                let steps = self.wheel.scroll(delta);
                if steps != 0 {
                    let at = Point::new(f64::from(mouse.column), f64::from(mouse.row));
                    self.zoom.zoom(steps, at);
                    self.host.request_repaint();
                }
            }
            Event::Resize(..) => self.host.request_repaint(),
            _ => {}
        }

        if self.save_requested.replace(false) {
            self.message = Some(match self.save() {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "save failed");
                    format!("save failed: {e:#}")
                }
            });
        }
    }

    fn save(&self) -> anyhow::Result<String> {
        let path = self.path.as_ref().context("no file to save to")?;
        let text = self.body.borrow().text();
        std::fs::write(path, &text).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), bytes = text.len(), "saved");
        Ok(format!("wrote {} bytes", text.len()))
    }

    /// Complete clipboard reads from earlier turns.
    pub fn tick(&self) {
        self.host.pump();
    }

    /// Fit the widgets to the areas they are drawn in, restyling them for
    /// the current theme.
    pub fn layout(&mut self, title: Area, body: Area) {
        let style = self.settings.borrow().text_style();
        {
            let mut t = self.title.borrow_mut();
            t.set_rect(to_rect(title));
            t.set_style(style.clone());
        }
        let mut b = self.body.borrow_mut();
        b.edit_box_mut().set_style(style);
        b.set_rect(to_rect(body));
    }

    pub fn focus_name(&self) -> &'static str {
        let focus = self.binder.focus();
        if focus == self.title_scope() {
            "title"
        } else if focus == self.body_scope() {
            "body"
        } else {
            "none"
        }
    }

    pub fn last_action(&self) -> Option<&ActionId> {
        self.binder.last_action(self.binder.focus())
    }

    pub fn key_help(&self) -> Vec<(String, ActionId)> {
        self.binder
            .describe_bindings(self.body_scope(), &KeyDisplayConfig::text())
    }
}

fn to_rect(area: Area) -> Rect {
    Rect::new(
        f32::from(area.x),
        f32::from(area.y),
        f32::from(area.width),
        f32::from(area.height),
    )
}
