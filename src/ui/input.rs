//! Line commands accepted on stdin, mapped to [`Event`]s.
//!
//! | Command                 | Event                          |
//! |-------------------------|--------------------------------|
//! | `size-min N`            | `SetSizeMin(N)`                |
//! | `size-max N`            | `SetSizeMax(N)`                |
//! | `size N M`              | `SetSizeRange { N, M }`        |
//! | `hire-min N`            | `SetHirePeriodMin(N)`          |
//! | `hire-max N`            | `SetHirePeriodMax(N)`          |
//! | `hire N M`              | `SetHirePeriodRange { N, M }`  |
//! | `heavy any\|yes\|no`    | `SetHeavyWaste(..)`            |
//! | `road any\|yes\|no`     | `SetRoadPlacement(..)`         |
//! | `reset`                 | `ResetFilters`                 |
//! | `select ID`             | `Select(ID)`                   |
//! | `deselect`              | `Deselect`                     |
//! | `retry`                 | `Retry`                        |
//! | `location POSTCODE AREA`| `ChangeLocation(..)`           |
//! | `continue`              | `Continue`                     |
//! | `quit` / `q`            | `Close`                        |

use crate::app::Event;
use crate::domain::{LocationKey, Requirement};
use std::str::FromStr;

/// Parses one input line.
///
/// Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a message suitable for showing to the user when the command is
/// unknown or its arguments do not parse.
pub fn parse_command(line: &str) -> Result<Option<Event>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let event = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("size-min", [n]) => Event::SetSizeMin(number(n)?),
        ("size-max", [n]) => Event::SetSizeMax(number(n)?),
        ("size", [min, max]) => Event::SetSizeRange {
            min: number(min)?,
            max: number(max)?,
        },
        ("hire-min", [n]) => Event::SetHirePeriodMin(number(n)?),
        ("hire-max", [n]) => Event::SetHirePeriodMax(number(n)?),
        ("hire", [min, max]) => Event::SetHirePeriodRange {
            min: number(min)?,
            max: number(max)?,
        },
        ("heavy", [value]) => Event::SetHeavyWaste(Requirement::from_str(value)?),
        ("road", [value]) => Event::SetRoadPlacement(Requirement::from_str(value)?),
        ("reset", []) => Event::ResetFilters,
        ("select", [id]) => Event::Select(id.parse().map_err(|_| format!("invalid skip id '{id}'"))?),
        ("deselect", []) => Event::Deselect,
        ("retry", []) => Event::Retry,
        ("location", [postcode, area @ ..]) if !area.is_empty() => {
            let key = LocationKey::new(*postcode, area.join(" ")).map_err(|e| e.to_string())?;
            Event::ChangeLocation(key)
        }
        ("continue", []) => Event::Continue,
        ("quit" | "q" | "exit", []) => Event::Close,
        (other, _) => return Err(format!("unrecognised command '{other}' with {} argument(s)", args.len())),
    };

    Ok(Some(event))
}

fn number(text: &str) -> Result<u32, String> {
    text.parse().map_err(|_| format!("expected a whole number, got '{text}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_commands() {
        assert_eq!(parse_command("size-min 6"), Ok(Some(Event::SetSizeMin(6))));
        assert_eq!(
            parse_command("hire 0 7"),
            Ok(Some(Event::SetHirePeriodRange { min: 0, max: 7 }))
        );
        assert_eq!(
            parse_command("heavy yes"),
            Ok(Some(Event::SetHeavyWaste(Requirement::RequireTrue)))
        );
        assert_eq!(
            parse_command("ROAD any"),
            Ok(Some(Event::SetRoadPlacement(Requirement::Unconstrained)))
        );
    }

    #[test]
    fn location_area_may_contain_spaces() {
        let expected = LocationKey::new("CO1", "Colchester Town").unwrap();
        assert_eq!(
            parse_command("location CO1 Colchester Town"),
            Ok(Some(Event::ChangeLocation(expected)))
        );
        assert!(parse_command("location CO1").is_err());
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse_command("size-min lots").is_err());
        assert!(parse_command("heavy maybe").is_err());
        assert!(parse_command("select").is_err());
        assert!(parse_command("dance").is_err());
    }
}
