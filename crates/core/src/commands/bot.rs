//! `.bot spawn` argument parsing
//!
//! Arguments are free-form and order-independent:
//!
//! ```text
//! .bot spawn TestBot side ct at 100 100 64 status crouch
//! .bot spawn crouch side t
//! ```
//!
//! Parsing never fails. Malformed segments are dropped and leave their
//! field unset.

use cs2prac_sdk::{Team, Vector};

/// Tokens that can never become a bot name
const RESERVED: &[&str] = &["spawn", "kick", "kickall", "ct", "t", "crouch", "normal"];

/// Single-word synonyms for `status crouch`
const CROUCH_SYNONYMS: &[&str] = &["crouch", "duck", "squat"];

/// Parsed `.bot spawn` arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotSpawnArgs {
    /// First non-reserved token, original case preserved
    pub name: Option<String>,
    /// `ct` or `t`, lower-cased
    pub side: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    /// `crouch` or `normal`, lower-cased
    pub status: Option<String>,
}

impl BotSpawnArgs {
    /// Parse argument tokens in a single left-to-right pass
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let mut parsed = Self::default();
        let mut i = 0;

        while i < args.len() {
            let token = args[i].as_ref();
            let lower = token.to_lowercase();

            match lower.as_str() {
                "side" => {
                    if let Some(side) = args.get(i + 1).map(|s| s.as_ref().to_lowercase()) {
                        if side == "ct" || side == "t" {
                            parsed.side = Some(side);
                            i += 1;
                        }
                    }
                }
                "at" => {
                    if let Some(pos) = parse_triple(args.get(i + 1..i + 4)) {
                        parsed.x = Some(pos.x);
                        parsed.y = Some(pos.y);
                        parsed.z = Some(pos.z);
                        i += 3;
                    }
                }
                "status" => {
                    if let Some(status) = args.get(i + 1).map(|s| s.as_ref().to_lowercase()) {
                        if status == "crouch" || status == "normal" {
                            parsed.status = Some(status);
                            i += 1;
                        }
                    }
                }
                word if CROUCH_SYNONYMS.contains(&word) => {
                    parsed.status = Some("crouch".to_string());
                }
                word => {
                    if parsed.name.is_none() && !RESERVED.contains(&word) {
                        parsed.name = Some(token.to_string());
                    }
                }
            }

            i += 1;
        }

        parsed
    }

    /// Whether all three coordinates were given
    pub fn has_coordinates(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }

    /// Whether the bot should spawn crouched
    pub fn is_crouch(&self) -> bool {
        self.status.as_deref() == Some("crouch")
    }

    /// Requested spawn position, if complete
    pub fn position(&self) -> Option<Vector> {
        Some(Vector::new(self.x?, self.y?, self.z?))
    }

    /// Requested team, if any
    pub fn team(&self) -> Option<Team> {
        self.side.as_deref().and_then(Team::from_side)
    }
}

fn parse_triple<S: AsRef<str>>(tokens: Option<&[S]>) -> Option<Vector> {
    let tokens = tokens?;
    let x = tokens.first()?.as_ref().parse().ok()?;
    let y = tokens.get(1)?.as_ref().parse().ok()?;
    let z = tokens.get(2)?.as_ref().parse().ok()?;
    Some(Vector::new(x, y, z))
}
