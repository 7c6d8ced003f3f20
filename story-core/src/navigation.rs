use std::collections::BTreeSet;
use std::fmt;

use story_script::{ScriptGraph, Segment};

use crate::error::NavigationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The text effect (and possibly other animations) is still running.
    Showing,
    AwaitingChoice,
    AwaitingAdvance,
    Ending,
}

/// What the orchestrator has to draw after a successful transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavCommand {
    /// Show the segment with its effects.
    Render(String),
    /// Show the segment in its settled state, no animation.
    RenderStatic(String),
    Ending,
}

type NavResult = Result<NavCommand, NavigationError>;

/// Current segment, history and phase. The only place that mutates them.
pub struct Navigator {
    graph: ScriptGraph,
    current_id: String,
    history: Vec<String>,
    at_ending: bool,
    phase: Phase,
}

impl Navigator {
    pub fn new(graph: ScriptGraph) -> Self {
        Self {
            graph,
            current_id: String::new(),
            history: Vec::new(),
            at_ending: false,
            phase: Phase::Ending,
        }
    }

    /// Enters the start segment without touching history.
    pub fn start(&mut self) -> NavCommand {
        self.current_id = self.graph.start_id().to_string();
        self.history.clear();
        self.enter_current()
    }

    pub fn show(&mut self, id: &str) -> NavCommand {
        let previous = std::mem::replace(&mut self.current_id, id.to_string());
        self.history.push(previous);
        log::debug!("Navigate -> '{}' (history {})", id, self.history.len());
        self.enter_current()
    }

    pub fn advance(&mut self) -> NavResult {
        match self.phase {
            Phase::Showing => return Err(NavigationError::Busy),
            Phase::Ending => return Err(NavigationError::AtEnding),
            _ => {}
        }
        let Some(segment) = self.graph.get(&self.current_id) else {
            return Ok(self.enter_ending());
        };
        if segment.has_choices() {
            return Err(NavigationError::ChoiceRequired);
        }
        let next = segment.next_id().map(str::to_string);
        match next {
            Some(next) => Ok(self.show(&next)),
            None => Ok(self.enter_ending()),
        }
    }

    pub fn select(&mut self, index: usize) -> NavResult {
        if self.phase != Phase::AwaitingChoice {
            return Err(NavigationError::NotAwaitingChoice);
        }
        let choices = self
            .graph
            .get(&self.current_id)
            .map(|s| s.choices.as_slice())
            .unwrap_or(&[]);
        let Some(choice) = choices.get(index) else {
            return Err(NavigationError::ChoiceOutOfRange { index, len: choices.len() });
        };
        // 没写 next 的选项不响应，仍停在选择界面
        if choice.next.is_empty() {
            return Err(NavigationError::ChoiceWithoutTarget { index });
        }
        let next = choice.next.clone();
        Ok(self.show(&next))
    }

    /// Pops the previous segment and settles it without replaying effects.
    pub fn back(&mut self) -> NavResult {
        if self.phase == Phase::Showing {
            return Err(NavigationError::Busy);
        }
        let Some(previous) = self.history.pop() else {
            return Err(NavigationError::NoHistory);
        };
        log::debug!("Back -> '{}'", previous);
        self.current_id = previous;
        self.at_ending = false;

        match self.graph.get(&self.current_id) {
            Some(segment) => {
                self.phase = settled_phase(segment);
                Ok(NavCommand::RenderStatic(self.current_id.clone()))
            }
            None => Ok(self.enter_ending()),
        }
    }

    /// Ends the `Showing` phase once the text effect completes or is skipped.
    pub fn effect_finished(&mut self) -> Phase {
        if self.phase == Phase::Showing {
            self.phase = match self.graph.get(&self.current_id) {
                Some(segment) => settled_phase(segment),
                None => Phase::Ending,
            };
        }
        self.phase
    }

    pub fn progress(&self) -> Progress {
        let total = self.graph.total_count();
        if self.graph.is_linear() {
            match self.current_id.parse::<usize>() {
                Ok(idx) => Progress::Linear { position: idx + 1, total },
                Err(_) => Progress::Unknown,
            }
        } else {
            Progress::Explored { visited: self.history.len() + 1, total }
        }
    }

    /// History ids plus the current one.
    pub fn visited(&self) -> BTreeSet<String> {
        let mut visited: BTreeSet<String> = self.history.iter().cloned().collect();
        if !self.current_id.is_empty() {
            visited.insert(self.current_id.clone());
        }
        visited
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    pub fn current_segment(&self) -> Option<&Segment> {
        if self.at_ending {
            None
        } else {
            self.graph.get(&self.current_id)
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_at_ending(&self) -> bool {
        self.at_ending
    }

    pub fn graph(&self) -> &ScriptGraph {
        &self.graph
    }

    fn enter_current(&mut self) -> NavCommand {
        self.at_ending = false;
        if self.graph.contains(&self.current_id) {
            self.phase = Phase::Showing;
            NavCommand::Render(self.current_id.clone())
        } else {
            log::debug!("'{}' does not resolve, story ends", self.current_id);
            self.enter_ending()
        }
    }

    fn enter_ending(&mut self) -> NavCommand {
        self.at_ending = true;
        self.phase = Phase::Ending;
        NavCommand::Ending
    }
}

fn settled_phase(segment: &Segment) -> Phase {
    if segment.has_choices() {
        Phase::AwaitingChoice
    } else {
        Phase::AwaitingAdvance
    }
}

/// Reading progress as shown next to the text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Progress {
    Linear { position: usize, total: usize },
    /// Graph scripts count history length, so revisits inflate `visited`.
    Explored { visited: usize, total: usize },
    Unknown,
}

impl Progress {
    pub fn ratio(&self) -> Option<f64> {
        match *self {
            Progress::Linear { position, total } => Some(position as f64 / total.max(1) as f64),
            Progress::Explored { visited, total } => {
                Some(visited.min(total) as f64 / total.max(1) as f64)
            }
            Progress::Unknown => None,
        }
    }

    fn percent(&self) -> u32 {
        self.ratio().map(|r| (r * 100.0) as u32).unwrap_or(0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Progress::Linear { position, total } => {
                write!(f, "{} / {} ({}%)", position, total, self.percent())
            }
            Progress::Explored { visited, .. } => {
                write!(f, "Explored {} segments ({}%)", visited, self.percent())
            }
            Progress::Unknown => write!(f, "-"),
        }
    }
}
