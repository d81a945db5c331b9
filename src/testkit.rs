//! Small schema, model and recorder widget shared by unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cache::Fingerprint;
use crate::geom::Point;
use crate::model::Model;
use crate::signal::{Handled, Outbox, Schema, Signal};
use crate::surface::display_list::DisplayList;
use crate::surface::{Canvas, SurfaceError};
use crate::widget::{RegionCx, Widget};

pub struct Demo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoInputKind {
    Click,
    Key,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DemoInput {
    Click(Point),
    Key(char),
}

impl Signal for DemoInput {
    type Kind = DemoInputKind;

    fn kind(&self) -> DemoInputKind {
        match self {
            Self::Click(_) => DemoInputKind::Click,
            Self::Key(_) => DemoInputKind::Key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoEventKind {
    Ping,
    Note,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DemoEvent {
    Ping(u32),
    Note(&'static str),
}

impl Signal for DemoEvent {
    type Kind = DemoEventKind;

    fn kind(&self) -> DemoEventKind {
        match self {
            Self::Ping(_) => DemoEventKind::Ping,
            Self::Note(_) => DemoEventKind::Note,
        }
    }
}

/// Route `tracing` output to the test harness. Safe to call from every test;
/// only the first call installs a subscriber.
pub fn init_tracing() {
    tracing_subscriber::fmt().with_test_writer().with_max_level(tracing::Level::TRACE).try_init().unwrap_or_default();
}

/// Shared, ordered record of what every listener saw.
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

#[derive(Default)]
pub struct DemoModel {
    pub version: u64,
    pub ticks: Vec<u64>,
    pub inputs: Vec<DemoInputKind>,
    pub events: Vec<DemoEventKind>,
    /// Re-emit `Ping(n + 1)` for every `Ping(n)` below this bound.
    pub ping_until: u32,
    pub journal: Option<Journal>,
}

impl DemoModel {
    fn note(&self, line: String) {
        if let Some(journal) = &self.journal {
            journal.borrow_mut().push(line);
        }
    }
}

impl Model<Demo> for DemoModel {
    fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_raw(self.version)
    }

    fn update_for_tick(&mut self, tick: u64) {
        self.ticks.push(tick);
    }

    fn input_kinds(&self) -> Vec<DemoInputKind> {
        self.inputs.clone()
    }

    fn event_kinds(&self) -> Vec<DemoEventKind> {
        self.events.clone()
    }

    fn handle_input(&mut self, input: &DemoInput, _out: &mut Outbox<DemoEvent>) -> Handled {
        self.note(format!("model:{input:?}"));
        Handled::Yes
    }

    fn handle_event(&mut self, event: &DemoEvent, out: &mut Outbox<DemoEvent>) -> Handled {
        self.note(format!("model:{event:?}"));
        if let DemoEvent::Ping(n) = event
            && *n < self.ping_until
        {
            out.emit(DemoEvent::Ping(n + 1));
        }
        Handled::Yes
    }
}

impl Schema for Demo {
    type Input = DemoInput;
    type Event = DemoEvent;
    type Model = DemoModel;
    type Surface = DisplayList;
    type InputSurface = ();
}

/// Widget that journals every delivery and render.
pub struct Recorder {
    name: &'static str,
    journal: Journal,
    inputs: Vec<DemoInputKind>,
    events: Vec<DemoEventKind>,
    bubble: Option<DemoEvent>,
    recognizes: bool,
}

impl Recorder {
    pub fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: Rc::clone(journal),
            inputs: Vec::new(),
            events: Vec::new(),
            bubble: None,
            recognizes: true,
        }
    }

    pub fn inputs(mut self, kinds: &[DemoInputKind]) -> Self {
        self.inputs = kinds.to_vec();
        self
    }

    pub fn events(mut self, kinds: &[DemoEventKind]) -> Self {
        self.events = kinds.to_vec();
        self
    }

    /// Bubble `event` whenever an input is delivered.
    pub fn bubbling(mut self, event: DemoEvent) -> Self {
        self.bubble = Some(event);
        self
    }

    /// Declare kinds but report every delivery as unknown.
    pub fn unrecognizing(mut self) -> Self {
        self.recognizes = false;
        self
    }

    fn outcome(&self) -> Handled {
        if self.recognizes { Handled::Yes } else { Handled::Unknown }
    }
}

impl Widget<Demo> for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn input_kinds(&self) -> Vec<DemoInputKind> {
        self.inputs.clone()
    }

    fn event_kinds(&self) -> Vec<DemoEventKind> {
        self.events.clone()
    }

    fn handle_input(&mut self, input: &DemoInput, cx: &mut RegionCx<'_, Demo>) -> Handled {
        self.journal.borrow_mut().push(format!("{}:{input:?}", self.name));
        if let Some(event) = self.bubble.clone() {
            cx.bubble(event);
        }
        self.outcome()
    }

    fn handle_event(&mut self, event: &DemoEvent, _cx: &mut RegionCx<'_, Demo>) -> Handled {
        self.journal.borrow_mut().push(format!("{}:{event:?}", self.name));
        self.outcome()
    }

    fn render(&self, canvas: &mut dyn Canvas, _cx: &mut RegionCx<'_, Demo>) -> Result<(), SurfaceError> {
        self.journal.borrow_mut().push(format!("render:{}", self.name));
        canvas.fill_text(self.name, 0.0, 0.0)
    }
}
