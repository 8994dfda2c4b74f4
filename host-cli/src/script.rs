//! Button timelines for the simulator.
//!
//! A script is a comma-separated list of `tap`, `hold:TICKS`, and `wait:TICKS`. Every press is
//! followed by one released tick so that two consecutive presses stay two presses.
use shared::error::SharedError;

/// Ticks a `tap` keeps the button down.
pub const TAP_TICKS: u16 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Press(u16),
    Release(u16),
}

impl Step {
    pub fn pressed(self) -> bool {
        matches!(self, Step::Press(_))
    }

    pub fn ticks(self) -> u16 {
        match self {
            Step::Press(ticks) | Step::Release(ticks) => ticks,
        }
    }
}

pub fn parse(script: &str) -> Result<Vec<Step>, SharedError> {
    let mut steps = Vec::new();
    for (index, token) in script.split(',').map(str::trim).enumerate() {
        let step = index + 1;
        let (name, argument) = match token.split_once(':') {
            Some((name, argument)) => (name.trim(), Some(argument.trim())),
            None => (token, None),
        };

        match (name, argument) {
            ("tap", None) => {
                steps.push(Step::Press(TAP_TICKS));
                steps.push(Step::Release(1));
            }
            ("hold", Some(argument)) => {
                steps.push(Step::Press(ticks(step, argument)?));
                steps.push(Step::Release(1));
            }
            ("wait", Some(argument)) => steps.push(Step::Release(ticks(step, argument)?)),
            ("", None) => {
                return Err(SharedError::Script {
                    step,
                    message: "empty step".into(),
                });
            }
            _ => {
                return Err(SharedError::Script {
                    step,
                    message: format!("unrecognised step '{token}'"),
                });
            }
        }
    }
    Ok(steps)
}

fn ticks(step: usize, argument: &str) -> Result<u16, SharedError> {
    match argument.parse::<u16>() {
        Ok(0) => Err(SharedError::Script {
            step,
            message: "tick count must be positive".into(),
        }),
        Ok(ticks) => Ok(ticks),
        Err(err) => Err(SharedError::Script {
            step,
            message: format!("invalid tick count '{argument}': {err}"),
        }),
    }
}
