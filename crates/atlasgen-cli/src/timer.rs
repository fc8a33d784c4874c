//! Nested wall-clock timers for progress output.
//!
//! A [`Timer`] prints `Start <name>` when created and `End <name>, took <ms>ms`
//! when dropped, indented four spaces per nesting level. Nesting is carried by
//! the value itself: [`Timer::child`] starts a timer one level deeper.

use std::time::{Duration, Instant};

use colored::Colorize;

/// Spaces of indentation per nesting level.
const INDENT: usize = 4;

/// A scoped timer. Reports on drop.
#[derive(Debug)]
pub struct Timer {
    name: String,
    depth: usize,
    start: Instant,
    quiet: bool,
}

impl Timer {
    /// Start a top-level timer.
    pub fn root(name: impl Into<String>) -> Self {
        Self::start(name.into(), 0, false)
    }

    /// Start a top-level timer that prints nothing, nor do its children.
    pub fn silent(name: impl Into<String>) -> Self {
        Self::start(name.into(), 0, true)
    }

    /// Start a timer nested one level below this one.
    pub fn child(&self, name: impl Into<String>) -> Timer {
        Self::start(name.into(), self.depth + 1, self.quiet)
    }

    fn start(name: String, depth: usize, quiet: bool) -> Self {
        if !quiet {
            println!("{}", start_line(&name, depth));
        }
        Self {
            name,
            depth,
            start: Instant::now(),
            quiet,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nesting level; 0 for a root timer.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.quiet {
            println!("{}", end_line(&self.name, self.depth, self.elapsed()).dimmed());
        }
    }
}

fn indent(depth: usize) -> String {
    " ".repeat(depth * INDENT)
}

/// The line printed when a timer starts.
pub fn start_line(name: &str, depth: usize) -> String {
    format!("{}Start {}", indent(depth), name)
}

/// The line printed when a timer ends.
pub fn end_line(name: &str, depth: usize, elapsed: Duration) -> String {
    format!(
        "{}End {}, took {}ms",
        indent(depth),
        name,
        elapsed.as_millis()
    )
}
