//! Plain-text rendering of a [`UIViewModel`].
//!
//! The layout follows the storefront page top to bottom: header, progress
//! steps, then the main area (filters and cards, or a status message), then
//! the size guide, selection summary and the continue control.

use crate::domain::Requirement;
use crate::ui::viewmodel::{
    FilterPanelInfo, ScreenState, SkipCard, StepState, UIViewModel,
};
use std::fmt::Write;

/// Renders the view model as text, one screen per call.
#[must_use]
pub fn render(vm: &UIViewModel) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_viewmodel(&mut out, vm);
    out
}

fn write_viewmodel(out: &mut String, vm: &UIViewModel) -> std::fmt::Result {
    write!(out, "{} | Postcode: {}", vm.header.title, vm.header.location)?;
    if vm.header.is_refreshing {
        write!(out, " | Updating...")?;
    }
    writeln!(out)?;

    let steps: Vec<String> = vm
        .steps
        .iter()
        .map(|step| match step.state {
            StepState::Completed => format!("[x] {}", step.label),
            StepState::Current => format!("[>] {}", step.label),
            StepState::Upcoming => format!("[ ] {}", step.label),
        })
        .collect();
    writeln!(out, "{}", steps.join("  "))?;
    writeln!(out)?;

    match &vm.screen {
        ScreenState::Loading => writeln!(out, "Loading skip options...")?,
        ScreenState::Error { message, retry_enabled } => {
            writeln!(out, "Unable to Load Skip Options")?;
            writeln!(out, "{message}")?;
            if *retry_enabled {
                writeln!(out, "Type 'retry' to try again.")?;
            } else {
                writeln!(out, "Retrying...")?;
            }
        }
        ScreenState::Empty => {
            writeln!(out, "No Skips Available")?;
            writeln!(out, "No skip options found for this location.")?;
        }
        ScreenState::NoMatches | ScreenState::Listing => {
            if let Some(panel) = &vm.filter_panel {
                write_filter_panel(out, panel)?;
            }
            if vm.screen == ScreenState::NoMatches {
                writeln!(out, "No Skips Match Your Filters")?;
                writeln!(out, "Try adjusting your filter criteria to see more options.")?;
            }
            for card in &vm.cards {
                write_card(out, card)?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Skip Size Guide")?;
    for row in &vm.use_cases {
        let marker = if row.is_match { " <- Perfect Match" } else { "" };
        writeln!(out, "  {}: {} yard skips{marker}", row.label, row.sizes)?;
    }

    if let Some(selection) = &vm.selection {
        writeln!(out)?;
        writeln!(
            out,
            "Your Selection: {} Yards, {} Days, {}",
            selection.size, selection.hire_period_days, selection.total_price
        )?;
    }

    writeln!(out)?;
    if vm.continue_enabled {
        writeln!(out, "Type 'continue' to proceed to the permit check.")?;
    } else {
        writeln!(out, "Select a skip to continue.")?;
    }

    Ok(())
}

fn write_filter_panel(out: &mut String, panel: &FilterPanelInfo) -> std::fmt::Result {
    writeln!(
        out,
        "Filters ({} of {} shown){}",
        panel.visible_count,
        panel.total_count,
        if panel.show_reset { "  [reset available]" } else { "" }
    )?;
    writeln!(
        out,
        "  Size: {} yards (limits {})",
        panel.size_range, panel.size_limits
    )?;
    writeln!(
        out,
        "  Hire period: {} days (limits {})",
        panel.hire_period_range, panel.hire_period_limits
    )?;
    writeln!(out, "  Heavy waste: {}", requirement_label(panel.heavy_waste))?;
    writeln!(out, "  Road placement: {}", requirement_label(panel.road_placement))?;
    writeln!(out)
}

fn write_card(out: &mut String, card: &SkipCard) -> std::fmt::Result {
    let marker = if card.is_selected { "*" } else { " " };
    write!(
        out,
        "{marker} #{} {} | {} days | {} {}",
        card.id, card.title, card.hire_period_days, card.total_price, card.price_breakdown
    )?;
    if card.heavy_waste_allowed {
        write!(out, " | heavy waste")?;
    }
    if card.road_placement_allowed {
        write!(out, " | road placement")?;
    }
    if card.permit_required {
        write!(out, " | Permit Required")?;
    }
    writeln!(out)
}

const fn requirement_label(requirement: Requirement) -> &'static str {
    match requirement {
        Requirement::Unconstrained => "any",
        Requirement::RequireTrue => "yes",
        Requirement::RequireFalse => "no",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::domain::LocationKey;

    #[test]
    fn loading_screen_mentions_location_and_steps() {
        let state = AppState::new(LocationKey::new("NR32", "Lowestoft").unwrap());
        let text = render(&state.compute_viewmodel());

        assert!(text.starts_with("WeWantWaste | Postcode: NR32 Lowestoft\n"));
        assert!(text.contains("[>] Select Skip"));
        assert!(text.contains("Loading skip options..."));
        assert!(text.contains("Select a skip to continue."));
    }
}
