//! Text rendering of replay transcripts.

use owo_colors::{OwoColorize, Rgb};

use crate::deck::{DeckEvent, Phase, RenderSet};
use crate::geometry::Vec2;
use crate::gesture::GestureOutcome;
use crate::script::{Step, Transcript};
use crate::ui::colors::Theme;

/// Width of the event column.
const EVENT_COL: usize = 18;
/// Width of the phase column.
const PHASE_COL: usize = 20;

/// Renders a [`Transcript`] as one line per step plus a summary.
#[derive(Debug, Clone)]
pub struct TranscriptRenderer {
    theme: Theme,
    colors_enabled: bool,
}

impl Default for TranscriptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptRenderer {
    /// Colors follow the NO_COLOR environment variable.
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            colors_enabled: std::env::var("NO_COLOR").is_err(),
        }
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.colors_enabled = enabled;
        self
    }

    fn paint(&self, text: &str, color: Rgb) -> String {
        if self.colors_enabled {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn outcome_color(&self, outcome: GestureOutcome) -> Rgb {
        match outcome {
            GestureOutcome::Accept => self.theme.accept,
            GestureOutcome::Reject => self.theme.reject,
            GestureOutcome::Cancel => self.theme.cancel,
        }
    }

    pub fn render(&self, transcript: &Transcript) -> String {
        let mut output = self.paint(
            &format!(
                "replay on {} x {} viewport",
                transcript.viewport.width, transcript.viewport.height
            ),
            self.theme.highlight,
        );
        output.push('\n');

        for step in &transcript.steps {
            output.push_str(&self.render_step(step));
            output.push('\n');
        }

        output.push_str(&format!("cursor: {}\n", transcript.cursor));
        output.push_str(&format!(
            "render set: {}\n",
            format_render_set(&transcript.render_set)
        ));
        let stats = transcript.stats;
        output.push_str(&format!(
            "{} liked, {} noped, {} cancelled\n",
            self.paint(&stats.accepted.to_string(), self.theme.accept),
            self.paint(&stats.rejected.to_string(), self.theme.reject),
            self.paint(&stats.cancelled.to_string(), self.theme.cancel),
        ));
        if transcript.exhausted {
            output.push_str(&self.paint("no more profiles", self.theme.muted));
            output.push('\n');
        }
        output
    }

    /// One line: index, event, resulting phase, cursor and detail.
    pub fn render_step(&self, step: &Step) -> String {
        let phase = format!("{:<width$}", step.phase.to_string(), width = PHASE_COL);
        let phase = match step.phase {
            Phase::Resolving { outcome } => self.paint(&phase, self.outcome_color(outcome)),
            _ => phase,
        };
        let mut line = format!(
            "{:>3}  {:<event_w$}{}cursor {}",
            step.index,
            step.event.to_string(),
            phase,
            step.cursor,
            event_w = EVENT_COL,
        );

        if !step.handled {
            line.push_str(&format!("  {}", self.paint("ignored", self.theme.muted)));
        }
        if let (Some(release), Some(target)) = (step.release, step.target) {
            line.push_str(&format!(
                "  {} -> {}",
                self.paint(release.outcome.as_str(), self.outcome_color(release.outcome)),
                format_vec(target)
            ));
        }
        match step.completed {
            Some(DeckEvent::Dismissed { id, outcome }) => line.push_str(&format!(
                "  #{} {}",
                id,
                self.paint(
                    &format!("dismissed ({})", outcome.as_str()),
                    self.outcome_color(outcome)
                )
            )),
            Some(DeckEvent::Restored { id }) => line.push_str(&format!(
                "  #{} {}",
                id,
                self.paint("restored", self.theme.cancel)
            )),
            None => {
                if step.handled && step.phase == Phase::Dragging && step.offset != Vec2::ZERO {
                    line.push_str(&format!("  offset {}", format_vec(step.offset)));
                }
            }
        }
        line
    }
}

fn format_vec(v: Vec2) -> String {
    format!("({}, {})", v.x, v.y)
}

/// `{active, next}` with missing ids left out.
pub fn format_render_set(set: &RenderSet) -> String {
    let ids: Vec<String> = set
        .active
        .into_iter()
        .chain(set.next)
        .map(|id| id.to_string())
        .collect();
    format!("{{{}}}", ids.join(", "))
}
