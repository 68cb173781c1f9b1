//! `.rethrow` / `.rt` / `.ct` argument parsing
//!
//! ```text
//! .rt                     rethrow the latest grenade
//! .rt index=2 delay=1000  rethrow the second newest after one second
//! .rt type=1              rethrow the newest smoke
//! .rt back=3              return to the third newest throw position
//! .rt list | .rt clear
//! ```

use std::time::Duration;

/// Raw `.rethrow` arguments
///
/// Unparsable values are dropped rather than reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RethrowArgs {
    pub clear: bool,
    pub list: bool,
    /// Grenade type code (1..=5 when valid)
    pub kind: Option<i32>,
    pub index: Option<i32>,
    /// Delay in milliseconds
    pub delay: Option<u64>,
    pub back: Option<i32>,
}

/// Mutually exclusive arguments given together
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RethrowConflict {
    #[error("type and index cannot be used together")]
    TypeAndIndex,
    #[error("back and delay cannot be used together")]
    BackAndDelay,
}

/// What a rethrow invocation resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RethrowPlan {
    /// Clear the caller's history
    Clear,
    /// Show the caller's history
    List,
    /// Teleport back to the throw position at this index
    Back(i32),
    /// Rethrow the newest grenade of this type code
    ByKind { code: i32, delay: Option<Duration> },
    /// Rethrow the grenade at this index
    ByIndex { index: i32, delay: Option<Duration> },
    /// Rethrow the newest grenade
    Latest { delay: Option<Duration> },
}

impl RethrowArgs {
    /// Parse `key=value` and flag tokens
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let mut parsed = Self::default();

        for arg in args {
            let arg = arg.as_ref();
            let lower = arg.to_lowercase();

            if lower == "clear" {
                parsed.clear = true;
            } else if lower == "list" {
                parsed.list = true;
            } else if let Some(value) = lower.strip_prefix("type=") {
                if let Ok(code) = value.parse() {
                    parsed.kind = Some(code);
                }
            } else if let Some(value) = lower.strip_prefix("index=") {
                if let Ok(index) = value.parse() {
                    parsed.index = Some(index);
                }
            } else if let Some(value) = lower.strip_prefix("delay=") {
                if let Ok(delay) = value.parse() {
                    parsed.delay = Some(delay);
                }
            } else if let Some(value) = lower.strip_prefix("back=") {
                if let Ok(back) = value.parse() {
                    parsed.back = Some(back);
                }
            }
        }

        parsed
    }

    /// Resolve the arguments into a single action
    ///
    /// Precedence is clear, list, back, type, index, then latest.
    pub fn plan(&self) -> Result<RethrowPlan, RethrowConflict> {
        if self.kind.is_some() && self.index.is_some() {
            return Err(RethrowConflict::TypeAndIndex);
        }
        if self.back.is_some() && self.delay.is_some() {
            return Err(RethrowConflict::BackAndDelay);
        }

        let delay = self.delay.map(Duration::from_millis);

        let plan = if self.clear {
            RethrowPlan::Clear
        } else if self.list {
            RethrowPlan::List
        } else if let Some(back) = self.back {
            RethrowPlan::Back(back)
        } else if let Some(code) = self.kind {
            RethrowPlan::ByKind { code, delay }
        } else if let Some(index) = self.index {
            RethrowPlan::ByIndex { index, delay }
        } else {
            RethrowPlan::Latest { delay }
        };

        Ok(plan)
    }
}
