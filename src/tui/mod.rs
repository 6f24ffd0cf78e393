use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context as _};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line, Points},
        Block, Borders, List, ListItem, ListState, Paragraph,
    },
    Frame, Terminal,
};

use crate::export::export_png;
use crate::objects::ObjectList;
use crate::relativity::{set_speed_of_light, speed_of_light, ObserverFrame};
use crate::render::{Colour, DiagramView, Mark};
use crate::spacetime::SpacetimeEntity;
use crate::store;

const BETA_STEP: f64 = 0.01;
const MAX_OBSERVER_BETA: f64 = 0.99;
const NUDGE: f64 = 1.0;
const VELOCITY_NUDGE: f64 = 0.05;

/// Interactive diagram state.
pub struct App {
    pub objects: ObjectList,
    pub observer_beta: f64,
    pub view: DiagramView,
    pub path: PathBuf,
    pub image_path: PathBuf,
    selected: usize,
    added: usize,
    status: String,
    /// Command line being typed after `:`.
    input: Option<String>,
}

impl App {
    pub fn new(objects: ObjectList, view: DiagramView, path: PathBuf) -> Self {
        Self {
            objects,
            observer_beta: 0.0,
            view,
            image_path: path.with_extension("png"),
            path,
            selected: 0,
            added: 0,
            status: String::from("ready"),
            input: None,
        }
    }

    pub fn frame(&self) -> anyhow::Result<ObserverFrame> {
        Ok(ObserverFrame::new(self.observer_beta)?)
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.objects.is_empty()).then(|| self.selected.min(self.objects.len() - 1))
    }

    fn change_observer_beta(&mut self, delta: f64) {
        // snap to hundredths so repeated steps don't drift
        let beta = ((self.observer_beta + delta) * 100.0).round() / 100.0;
        self.observer_beta = beta.clamp(-MAX_OBSERVER_BETA, MAX_OBSERVER_BETA);
    }

    fn nudge_x(&mut self, delta: f64) -> anyhow::Result<()> {
        let frame = self.frame()?;
        if let Some(object) = self.selected().and_then(|i| self.objects.get_mut(i)) {
            let x = object.x(&frame) + delta;
            object.set_x(&frame, x);
        }
        Ok(())
    }

    fn nudge_t(&mut self, delta: f64) -> anyhow::Result<()> {
        let frame = self.frame()?;
        if let Some(object) = self.selected().and_then(|i| self.objects.get_mut(i)) {
            let t = object.t(&frame) + delta;
            object.set_t(&frame, t);
        }
        Ok(())
    }

    fn nudge_beta(&mut self, delta: f64) -> anyhow::Result<()> {
        let frame = self.frame()?;
        let Some(traveller) = self
            .selected()
            .and_then(|i| self.objects.get_mut(i))
            .and_then(SpacetimeEntity::as_traveller_mut)
        else {
            self.status = "only travellers have a velocity".into();
            return Ok(());
        };

        let observed = traveller.beta(&frame) + delta;
        self.status = match traveller.set_beta(&frame, observed) {
            Ok(beta) => format!("{} now moves at {beta:.3}c", traveller.event().name()),
            Err(err) => format!("rejected: {err}"),
        };
        Ok(())
    }

    fn add_event(&mut self) {
        self.added += 1;
        self.objects
            .push(SpacetimeEntity::event(format!("Event {}", self.added), 0.0, 0.0));
        self.selected = self.objects.len() - 1;
    }

    /// Adds a traveller at rest relative to the current observer.
    fn add_traveller(&mut self) -> anyhow::Result<()> {
        self.added += 1;
        let traveller = SpacetimeEntity::traveller(
            format!("Traveller {}", self.added),
            self.observer_beta,
            0.0,
            0.0,
        )?;
        self.objects.push(traveller);
        self.selected = self.objects.len() - 1;
        Ok(())
    }

    fn delete_selected(&mut self) {
        if let Some(removed) = self.selected().and_then(|i| self.objects.remove(i)) {
            self.status = format!("removed {}", removed.name());
        }
    }

    fn save(&mut self) {
        self.status = match store::save(&self.path, &self.objects) {
            Ok(()) => format!("saved to {}", self.path.display()),
            Err(err) => {
                log::error!("failed to save {}: {err}", self.path.display());
                format!("save failed: {err}")
            }
        };
    }

    /// Replace the objects with the last saved copy of the diagram.
    fn reload(&mut self) {
        self.status = match store::load(&self.path) {
            Ok(objects) => {
                self.objects.replace_all(objects);
                format!("reloaded {} objects from {}", self.objects.len(), self.path.display())
            }
            Err(err) => {
                log::error!("failed to reload {}: {err}", self.path.display());
                format!("reload failed: {err}")
            }
        };
    }

    fn submit(&mut self) {
        let Some(line) = self.input.take() else {
            return;
        };
        self.status = match self.apply_command(line.trim()) {
            Ok(status) => status,
            Err(err) => format!("{err:#}"),
        };
    }

    /// Run one typed command. Values are given in the current observer frame.
    ///
    /// `frame <β>` sets the observer speed; `name <text>`, `x <x>`, `t <t>`,
    /// `at <x> <t>` and `beta <β>` edit the selected object.
    fn apply_command(&mut self, line: &str) -> anyhow::Result<String> {
        let (command, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = arg.trim();
        if command == "frame" {
            let frame = ObserverFrame::new(parse_number(arg)?)?;
            self.observer_beta = frame.beta();
            return Ok(format!("observer speed {:+.3}c", frame.beta()));
        }

        let frame = self.frame()?;
        let Some(object) = self.selected().and_then(|i| self.objects.get_mut(i)) else {
            bail!("no object selected");
        };
        match command {
            "name" => {
                if arg.is_empty() {
                    bail!("usage: name <text>");
                }
                object.set_name(arg);
            }
            "x" => object.set_x(&frame, parse_number(arg)?),
            "t" => object.set_t(&frame, parse_number(arg)?),
            "at" => {
                let Some((x, t)) = arg.split_once(char::is_whitespace) else {
                    bail!("usage: at <x> <t>");
                };
                object.set_position(&frame, parse_number(x)?, parse_number(t.trim())?);
            }
            "beta" => {
                let beta = parse_number(arg)?;
                let name = object.name().to_string();
                let Some(traveller) = object.as_traveller_mut() else {
                    bail!("'{name}' is an event and has no velocity");
                };
                traveller
                    .set_beta(&frame, beta)
                    .with_context(|| format!("rejected velocity for '{name}'"))?;
            }
            _ => bail!("unknown command '{command}'"),
        }
        Ok(format!("updated {}", object.name()))
    }

    fn export(&mut self) -> anyhow::Result<()> {
        let frame = self.frame()?;
        self.status = match export_png(&self.image_path, &self.objects, &frame, &self.view) {
            Ok(()) => format!("exported {}", self.image_path.display()),
            Err(err) => {
                log::error!("failed to export: {err:#}");
                format!("export failed: {err}")
            }
        };
        Ok(())
    }

    /// Apply one key press. Returns `false` once the user asks to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> anyhow::Result<bool> {
        if let Some(input) = &mut self.input {
            match code {
                KeyCode::Enter => self.submit(),
                KeyCode::Esc => self.input = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return Ok(true);
        }

        match code {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Right => self.change_observer_beta(BETA_STEP),
            KeyCode::Left => self.change_observer_beta(-BETA_STEP),
            KeyCode::Down => {
                if let Some(i) = self.selected() {
                    self.selected = (i + 1).min(self.objects.len() - 1);
                }
            }
            KeyCode::Up => self.selected = self.selected().unwrap_or(0).saturating_sub(1),
            KeyCode::Char('x') => self.nudge_x(-NUDGE)?,
            KeyCode::Char('X') => self.nudge_x(NUDGE)?,
            KeyCode::Char('t') => self.nudge_t(-NUDGE)?,
            KeyCode::Char('T') => self.nudge_t(NUDGE)?,
            KeyCode::Char('b') => self.nudge_beta(-VELOCITY_NUDGE)?,
            KeyCode::Char('B') => self.nudge_beta(VELOCITY_NUDGE)?,
            KeyCode::Char('a') => self.add_event(),
            KeyCode::Char('A') => self.add_traveller()?,
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('C') => {
                self.objects.clear();
                self.selected = 0;
            }
            KeyCode::Char('c') => {
                set_speed_of_light(speed_of_light().cycle());
                self.status = speed_of_light().to_string();
            }
            KeyCode::Char('l') => self.view.light_cone = !self.view.light_cone,
            KeyCode::Char('n') => self.view.labels = !self.view.labels,
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char(':') => self.input = Some(String::new()),
            KeyCode::Char('e') => self.export()?,
            _ => {}
        }
        Ok(true)
    }
}

fn parse_number(text: &str) -> anyhow::Result<f64> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => bail!("'{text}' is not a number"),
    }
}

fn colour(colour: Colour) -> Color {
    match colour {
        Colour::Red => Color::Red,
        Colour::Blue => Color::Blue,
        Colour::Green => Color::Green,
    }
}

fn draw(f: &mut Frame, app: &App, frame: &ObserverFrame) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(f.area());
    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3), Constraint::Length(7)])
        .split(columns[1]);

    let view = &app.view;
    let marks = view.scene(&app.objects, frame);
    let half = view.half_width();
    let diagram = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Spacetime diagram"))
        .marker(Marker::Braille)
        .x_bounds([-half, half])
        .y_bounds([0.0, view.height])
        .paint(|ctx| {
            for axis in view.axes() {
                ctx.draw(&Line::new(axis.from.x, axis.from.t, axis.to.x, axis.to.t, Color::Gray));
            }
            for mark in &marks {
                match mark {
                    Mark::LightCone(line) => ctx.draw(&Line::new(
                        line.from.x,
                        line.from.t,
                        line.to.x,
                        line.to.t,
                        Color::Yellow,
                    )),
                    Mark::Dot { at, colour: c, .. } => ctx.draw(&Points {
                        coords: &[(at.x, at.t)],
                        color: colour(*c),
                    }),
                    Mark::Worldline { line, colour: c, .. } => ctx.draw(&Line::new(
                        line.from.x,
                        line.from.t,
                        line.to.x,
                        line.to.t,
                        colour(*c),
                    )),
                }
            }
            ctx.layer();
            for mark in &marks {
                match mark {
                    Mark::Dot { at, label: Some(label), .. }
                    | Mark::Worldline { anchor: at, label: Some(label), .. } => {
                        ctx.print(at.x, at.t, label.clone());
                    }
                    _ => {}
                }
            }
        });
    f.render_widget(diagram, columns[0]);

    let frame_text = format!(
        "Observer speed: {:+.2}c\n{}",
        frame.beta(),
        speed_of_light()
    );
    f.render_widget(
        Paragraph::new(frame_text).block(Block::default().borders(Borders::ALL).title("Reference frame")),
        sidebar[0],
    );

    let items: Vec<ListItem> = app
        .objects
        .iter()
        .map(|object| {
            let mut text = format!(
                "{:<12} x={:>9.3} t={:>9.3}",
                object.name(),
                object.x(frame),
                object.t(frame)
            );
            if let Some(traveller) = object.as_traveller() {
                text.push_str(&format!(" β={:+.3}", traveller.beta(frame)));
            }
            ListItem::new(text)
        })
        .collect();
    let mut state = ListState::default().with_selected(app.selected());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Objects"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(list, sidebar[1], &mut state);

    let prompt = match &app.input {
        Some(input) => format!(":{input}"),
        None => app.status.clone(),
    };
    let help = format!(
        "{prompt}\n←/→ frame  ↑/↓ select  x/X t/T b/B edit\na event  A traveller  d delete  C clear\nc speed of light  l cone  n labels\ns save  r reload  e export  : command"
    );
    f.render_widget(
        Paragraph::new(help).block(Block::default().borders(Borders::ALL)),
        sidebar[2],
    );
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        let frame = app.frame()?;
        terminal.draw(|f| draw(f, app, &frame))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !app.handle_key(key.code)? {
                    return Ok(());
                }
            }
        }
    }
}

pub fn start(app: &mut App) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    enable_raw_mode()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("interactive session failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut objects = ObjectList::new();
        objects.push(SpacetimeEntity::event("baz", 50.0, -50.0));
        objects.push(SpacetimeEntity::traveller("foo", 0.1, 0.0, 0.0).unwrap());
        App::new(objects, DiagramView::default(), PathBuf::from("test.diagram"))
    }

    #[test]
    fn test_observer_speed_is_bounded() {
        let mut app = app();
        for _ in 0..150 {
            app.handle_key(KeyCode::Right).unwrap();
        }
        assert_eq!(app.observer_beta, MAX_OBSERVER_BETA);
        app.handle_key(KeyCode::Left).unwrap();
        assert!((app.observer_beta - 0.98).abs() < 1e-12);
    }

    #[test]
    fn test_selection_and_delete() {
        let mut app = app();
        assert_eq!(app.selected(), Some(0));
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        assert_eq!(app.selected(), Some(1));
        app.handle_key(KeyCode::Char('d')).unwrap();
        assert_eq!(app.objects.len(), 1);
        assert_eq!(app.selected(), Some(0));
        app.handle_key(KeyCode::Char('C')).unwrap();
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn test_add_objects() {
        let mut app = app();
        app.handle_key(KeyCode::Char('a')).unwrap();
        app.handle_key(KeyCode::Char('A')).unwrap();
        assert_eq!(app.objects.len(), 4);
        assert_eq!(app.selected(), Some(3));
        assert_eq!(app.objects.get(3).unwrap().kind(), "traveller");
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
    }

    fn type_line(app: &mut App, line: &str) {
        app.handle_key(KeyCode::Char(':')).unwrap();
        for c in line.chars() {
            app.handle_key(KeyCode::Char(c)).unwrap();
        }
        app.handle_key(KeyCode::Enter).unwrap();
    }

    #[test]
    fn test_reload_restores_saved_diagram() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.path = dir.path().join("reload.diagram");

        app.handle_key(KeyCode::Char('s')).unwrap();
        app.handle_key(KeyCode::Char('C')).unwrap();
        app.handle_key(KeyCode::Char('a')).unwrap();
        assert_eq!(app.objects.len(), 1);

        app.handle_key(KeyCode::Char('r')).unwrap();
        let names: Vec<_> = app.objects.iter().map(|o| o.name().to_string()).collect();
        assert_eq!(names, ["baz", "foo"]);
        assert_eq!(app.objects.get(1).unwrap().as_traveller().unwrap().rest_beta(), 0.1);
    }

    #[test]
    fn test_reload_failure_keeps_objects() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.path = dir.path().join("missing.diagram");
        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(app.objects.len(), 2);
        assert!(app.status.starts_with("reload failed"));
    }

    #[test]
    fn test_typed_edits_apply_to_selection() {
        let mut app = app();
        type_line(&mut app, "name flash");
        assert_eq!(app.objects.get(0).unwrap().name(), "flash");

        type_line(&mut app, "frame 0.6");
        assert_eq!(app.observer_beta, 0.6);
        type_line(&mut app, "at 3 4");
        let frame = app.frame().unwrap();
        let flash = app.objects.get(0).unwrap();
        assert!((flash.x(&frame) - 3.0).abs() < 1e-9);
        assert!((flash.t(&frame) - 4.0).abs() < 1e-9);

        type_line(&mut app, "x -2.5");
        assert!((app.objects.get(0).unwrap().x(&frame) + 2.5).abs() < 1e-9);
        assert!(app.input.is_none());
    }

    #[test]
    fn test_typed_velocity_is_validated() {
        let mut app = app();
        app.handle_key(KeyCode::Down).unwrap();
        type_line(&mut app, "beta -0.25");
        let frame = app.frame().unwrap();
        let foo = app.objects.get(1).unwrap().as_traveller().unwrap();
        assert!((foo.beta(&frame) + 0.25).abs() < 1e-12);

        type_line(&mut app, "beta 1");
        assert!(app.status.starts_with("rejected velocity for 'foo'"));
        assert!((app.objects.get(1).unwrap().as_traveller().unwrap().rest_beta() + 0.25).abs() < 1e-12);

        app.handle_key(KeyCode::Up).unwrap();
        type_line(&mut app, "beta 0.5");
        assert_eq!(app.status, "'baz' is an event and has no velocity");

        type_line(&mut app, "frame 1.0");
        assert_eq!(app.observer_beta, 0.0);
        type_line(&mut app, "x fast");
        assert_eq!(app.status, "'fast' is not a number");
    }

    #[test]
    fn test_input_line_captures_keys_until_cancelled() {
        let mut app = app();
        app.handle_key(KeyCode::Char(':')).unwrap();
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        app.handle_key(KeyCode::Char('d')).unwrap();
        app.handle_key(KeyCode::Backspace).unwrap();
        assert_eq!(app.input.as_deref(), Some("q"));
        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.input.is_none());
        assert_eq!(app.objects.len(), 2);
    }

    #[test]
    fn test_toggles() {
        let mut app = app();
        app.handle_key(KeyCode::Char('l')).unwrap();
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert!(app.view.light_cone);
        assert!(!app.view.labels);
    }
}
